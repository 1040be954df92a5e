//! Error type shared by the GPU-facing components.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced while building GPU objects.
///
/// Link and compile failures carry the driver's info log so the caller can
/// show it when it aborts shader-pack activation.
#[derive(Debug, Error)]
pub enum Error {
    /// The context refused to allocate an object.
    #[error("failed to allocate {object}: {reason}")]
    Allocation {
        /// Kind of object that was requested (`"program"`, `"buffer"`, ...).
        object: &'static str,
        /// Driver-provided reason.
        reason: String,
    },

    /// A shader stage failed to compile.
    #[error("shader compilation failed for {name} ({stage}): {log}")]
    Compile {
        /// Diagnostic name of the stage.
        name: String,
        /// Stage kind, e.g. `vertex`.
        stage: &'static str,
        /// Compiler info log.
        log: String,
    },

    /// A shader program failed to link.
    #[error("shader program linking failed for {name}: {log}")]
    Link {
        /// Diagnostic name of the program.
        name: String,
        /// Linker info log.
        log: String,
    },
}
