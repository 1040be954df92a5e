//! CPU-side emulation of the legacy GL matrix stack.

use glam::Mat4;

/// A stack of transforms whose top is the current matrix.
///
/// The stack is never empty: it starts with a single identity entry and a pop
/// that would remove the last entry is refused, mirroring the underflow error
/// a fixed-function driver reports.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    /// A stack holding only the identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
        }
    }

    /// Current matrix.
    #[must_use]
    pub fn top(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Number of entries, including the base entry.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Duplicate the current matrix.
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    /// Discard the current matrix, restoring the one below it.
    ///
    /// Returns `false` without modifying the stack on underflow.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }

    /// Replace the current matrix.
    pub fn load(&mut self, matrix: Mat4) {
        if let Some(top) = self.stack.last_mut() {
            *top = matrix;
        }
    }

    /// Replace the current matrix with the identity.
    pub fn load_identity(&mut self) {
        self.load(Mat4::IDENTITY);
    }
}
