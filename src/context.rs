//! The graphics-context seam.
//!
//! Every GPU-facing operation in this crate goes through a
//! [`GraphicsContext`] passed in by the caller instead of reaching for
//! ambient global GL state. The trait covers exactly the calls the linker and
//! the full-screen quad renderer issue, which keeps it small enough to back
//! with something other than a real driver.

use std::fmt;

use crate::error::Result;

/// Which legacy matrix stack subsequent matrix operations target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    /// The projection transform.
    Projection,
    /// The combined model and view transform.
    ModelView,
}

/// Primitive topology for [`GraphicsContext::draw_arrays`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Independent triangles.
    Triangles,
    /// Each vertex after the second forms a triangle with the previous two.
    TriangleStrip,
}

/// Programmable pipeline stage of a shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Geometry stage.
    Geometry,
    /// Fragment stage.
    Fragment,
}

impl ShaderStage {
    /// Lower-case stage name for diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Geometry => "geometry",
            Self::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One float attribute inside an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute location.
    pub location: u32,
    /// Number of `f32` components.
    pub components: i32,
    /// Byte offset from the start of the vertex.
    pub offset: i32,
}

/// An interleaved all-float vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Bytes between consecutive vertices.
    pub stride: i32,
    /// Attributes, in location order.
    pub attributes: &'static [VertexAttribute],
}

impl VertexLayout {
    /// Position (`vec3`) followed by texture coordinate (`vec2`).
    pub const POSITION_TEX: Self = Self {
        stride: 20,
        attributes: &[
            VertexAttribute {
                location: 0,
                components: 3,
                offset: 0,
            },
            VertexAttribute {
                location: 1,
                components: 2,
                offset: 12,
            },
        ],
    };

    /// Number of `f32`s making up one vertex.
    #[must_use]
    pub fn floats_per_vertex(&self) -> usize {
        self.attributes
            .iter()
            .map(|attribute| attribute.components.unsigned_abs() as usize)
            .sum()
    }
}

/// The subset of a graphics API this crate drives.
///
/// Implementations must be used from the thread that owns the underlying
/// context. Methods take `&self` because the host's context is itself a
/// process-wide state machine, not a value with Rust-level exclusivity.
pub trait GraphicsContext {
    /// Program object handle.
    type Program: Copy + fmt::Debug;
    /// Shader object handle.
    type Shader: Copy + fmt::Debug;
    /// Buffer object handle.
    type Buffer: Copy + fmt::Debug;
    /// Vertex array object handle.
    type VertexArray: Copy + fmt::Debug;

    /// Allocate an empty program object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`](crate::Error::Allocation) if the context
    /// cannot provide one.
    fn create_program(&self) -> Result<Self::Program>;
    /// Pin a named vertex input to `location`. Takes effect at the next link.
    fn bind_attrib_location(&self, program: Self::Program, location: u32, name: &str);
    /// Attach a compiled stage.
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// Link the attached stages.
    fn link_program(&self, program: Self::Program);
    /// Info log produced by the last link.
    fn program_info_log(&self, program: Self::Program) -> String;
    /// Whether the last link succeeded.
    fn program_link_status(&self, program: Self::Program) -> bool;
    /// Make `program` current, or clear the current program.
    fn use_program(&self, program: Option<Self::Program>);
    /// Free a program object.
    fn delete_program(&self, program: Self::Program);

    /// Allocate a shader object for `stage`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`](crate::Error::Allocation) if the context
    /// cannot provide one.
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader>;
    /// Replace the source of a shader object.
    fn shader_source(&self, shader: Self::Shader, source: &str);
    /// Compile the current source.
    fn compile_shader(&self, shader: Self::Shader);
    /// Whether the last compile succeeded.
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    /// Info log produced by the last compile.
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    /// Free a shader object.
    fn delete_shader(&self, shader: Self::Shader);

    /// Allocate a buffer object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`](crate::Error::Allocation) if the context
    /// cannot provide one.
    fn create_buffer(&self) -> Result<Self::Buffer>;
    /// Bind `buffer` as the array buffer, or unbind with `None`.
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Upload immutable data into the bound array buffer.
    fn array_buffer_data_static(&self, data: &[u8]);
    /// Free a buffer object.
    fn delete_buffer(&self, buffer: Self::Buffer);

    /// Allocate a vertex array object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`](crate::Error::Allocation) if the context
    /// cannot provide one.
    fn create_vertex_array(&self) -> Result<Self::VertexArray>;
    /// The currently bound vertex array object, if any.
    fn vertex_array_binding(&self) -> Option<Self::VertexArray>;
    /// Bind `vertex_array`, or unbind with `None`.
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    /// Free a vertex array object.
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    /// Toggle depth testing.
    fn set_depth_test(&self, enabled: bool);
    /// Select the matrix stack that following matrix calls act on.
    fn matrix_mode(&self, mode: MatrixMode);
    /// Duplicate the top of the current matrix stack.
    fn push_matrix(&self);
    /// Discard the top of the current matrix stack.
    fn pop_matrix(&self);
    /// Replace the top of the current matrix stack with the identity.
    fn load_identity(&self);
    /// Set the constant vertex tint.
    fn color4f(&self, r: f32, g: f32, b: f32, a: f32);

    /// Enable and describe the attributes of `layout` against the bound
    /// array buffer. The state lands in the bound vertex array object.
    fn enable_vertex_layout(&self, layout: &VertexLayout);
    /// Disable the attributes of `layout`.
    fn disable_vertex_layout(&self, layout: &VertexLayout);
    /// Draw `count` vertices starting at `first`.
    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_tex_matches_stride() {
        let layout = VertexLayout::POSITION_TEX;
        assert_eq!(layout.floats_per_vertex(), 5);
        assert_eq!(
            layout.stride,
            i32::try_from(layout.floats_per_vertex() * std::mem::size_of::<f32>()).unwrap_or(0)
        );
        let last = layout.attributes[layout.attributes.len() - 1];
        assert_eq!(last.offset + last.components * 4, layout.stride);
    }

    #[test]
    fn stage_names() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Geometry.name(), "geometry");
        assert_eq!(ShaderStage::Fragment.name(), "fragment");
    }
}
