//! GPU-side core of a shader-pack rendering pipeline, using OpenGL via
//! [glow].
//!
//! The crate provides three independent pieces a host renderer wires into
//! its frame:
//!
//! - [`ProgramLinker`] links shader programs from compiled stages, pinning the
//!   host vertex format's extra inputs (`mc_Entity`, `mc_midTexCoord`,
//!   `at_tangent`) to fixed attribute locations before link time.
//! - [`FullScreenQuadRenderer`] owns a static full-screen quad and draws
//!   composite/deferred passes in normalized device coordinates, saving and
//!   restoring the host's transforms and depth state around each pass.
//! - [`blend`] is a mipmap downsampling filter that averages in linear light
//!   and weights colors by alpha; [`generate_mip_levels`] drives it over an
//!   RGBA8 image.
//!
//! # Graphics context
//!
//! GPU calls go through an explicit [`GraphicsContext`] instead of ambient
//! global state. With the default `glow` feature, [`GlowContext`] implements
//! it on top of a [`glow::Context`], emulating the legacy matrix stacks on the
//! CPU.
//!
//! # Safety
//!
//! Creating a [`GlowContext`] requires a valid OpenGL context that is current
//! on the calling thread; everything built on it must stay on that thread.
//!
//! [glow]: https://docs.rs/glow

mod color;
mod context;
mod error;
#[cfg(feature = "glow")]
mod glow_context;
mod matrix;
mod mipmap;
mod program;
mod quad;
mod shaders;
mod types;

pub use color::{linear_to_srgb, pack_linear, srgb_to_linear, Pixel};
pub use context::{
    GraphicsContext, MatrixMode, Primitive, ShaderStage, VertexAttribute, VertexLayout,
};
pub use error::{Error, Result};
#[cfg(feature = "glow")]
pub use glow_context::GlowContext;
pub use matrix::MatrixStack;
pub use mipmap::{blend, blend2, generate_mip_levels};
pub use program::{AttributeBindings, ProgramLinker, ShaderProgram, RESERVED_ATTRIBUTES};
pub use quad::{FullScreenQuadRenderer, QuadPass};
pub use shaders::{
    compile_composite_program, CompiledShader, COMPOSITE_ATTRIBUTES, COMPOSITE_VERTEX_SRC,
    COPY_FRAGMENT_SRC,
};
