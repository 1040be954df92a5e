//! Full-screen quad rendering for composite and deferred passes.

use std::fmt;

use crate::context::{GraphicsContext, MatrixMode, Primitive, VertexLayout};
use crate::error::Result;
use crate::types::{QuadVertex, FULL_SCREEN_QUAD};

/// Number of vertices in the quad's triangle strip.
const QUAD_VERTEX_COUNT: i32 = 4;

/// Draws a textured quad covering the whole viewport.
///
/// The vertex buffer and its vertex array object are created once in
/// [`new`](Self::new) and reused for every pass. Construct one per context
/// during pipeline setup and hand it to each pass by reference.
///
/// # Example
///
/// ```no_run
/// # use shaderpack_gl::{FullScreenQuadRenderer, GraphicsContext, ShaderProgram};
/// # fn example<C: GraphicsContext>(ctx: &C, passes: &[ShaderProgram<C::Program>]) -> shaderpack_gl::Result<()> {
/// let quad = FullScreenQuadRenderer::new(ctx)?;
///
/// // Each frame:
/// let pass = quad.begin(ctx);
/// for program in passes {
///     program.bind(ctx);
///     pass.render_quad();
/// }
/// pass.end();
/// # Ok(())
/// # }
/// ```
pub struct FullScreenQuadRenderer<C: GraphicsContext> {
    buffer: C::Buffer,
    vertex_array: C::VertexArray,
}

impl<C: GraphicsContext> fmt::Debug for FullScreenQuadRenderer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullScreenQuadRenderer")
            .field("buffer", &self.buffer)
            .field("vertex_array", &self.vertex_array)
            .finish()
    }
}

impl<C: GraphicsContext> FullScreenQuadRenderer<C> {
    /// Create and upload the quad's vertex buffer and allocate the vertex
    /// array object its attribute state lives in.
    ///
    /// The array buffer binding is cleared afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`](crate::Error::Allocation) if either
    /// object cannot be created. Nothing is leaked in that case.
    pub fn new(ctx: &C) -> Result<Self> {
        let buffer = ctx.create_buffer()?;
        ctx.bind_array_buffer(Some(buffer));
        ctx.array_buffer_data_static(bytemuck::cast_slice::<QuadVertex, u8>(
            &FULL_SCREEN_QUAD,
        ));
        ctx.bind_array_buffer(None);

        let vertex_array = match ctx.create_vertex_array() {
            Ok(vertex_array) => vertex_array,
            Err(err) => {
                ctx.delete_buffer(buffer);
                return Err(err);
            }
        };

        log::debug!(
            "Created full-screen quad buffer {buffer:?} with vertex array {vertex_array:?}"
        );

        Ok(Self {
            buffer,
            vertex_array,
        })
    }

    /// Handle of the quad's vertex buffer.
    #[must_use]
    pub fn buffer(&self) -> C::Buffer {
        self.buffer
    }

    /// Handle of the quad's vertex array object.
    #[must_use]
    pub fn vertex_array(&self) -> C::VertexArray {
        self.vertex_array
    }

    /// Draw the quad once with whatever program and textures are bound.
    pub fn render(&self, ctx: &C) {
        let pass = self.begin(ctx);
        pass.render_quad();
        pass.end();
    }

    /// Set up state for drawing the quad in normalized device coordinates.
    ///
    /// Disables depth testing, resets the projection and model-view
    /// transforms to identity (saving the previous ones), sets an opaque
    /// white tint, and binds the quad's vertex array, buffer and layout.
    /// Everything is undone when the returned pass ends, including the
    /// host's vertex array binding.
    #[must_use = "dropping the pass immediately ends it"]
    pub fn begin<'a>(&self, ctx: &'a C) -> QuadPass<'a, C> {
        ctx.set_depth_test(false);

        ctx.matrix_mode(MatrixMode::Projection);
        ctx.push_matrix();
        ctx.load_identity();
        ctx.matrix_mode(MatrixMode::ModelView);
        ctx.push_matrix();
        ctx.load_identity();

        ctx.color4f(1.0, 1.0, 1.0, 1.0);

        let previous_vertex_array = ctx.vertex_array_binding();
        ctx.bind_vertex_array(Some(self.vertex_array));
        ctx.bind_array_buffer(Some(self.buffer));
        ctx.enable_vertex_layout(&VertexLayout::POSITION_TEX);

        QuadPass {
            ctx,
            previous_vertex_array,
        }
    }

    /// Free the vertex buffer and vertex array object.
    pub fn destroy(self, ctx: &C) {
        ctx.delete_vertex_array(self.vertex_array);
        ctx.delete_buffer(self.buffer);
    }
}

/// An open full-screen pass, returned by [`FullScreenQuadRenderer::begin`].
///
/// Ending the pass, explicitly with [`end`](Self::end) or by dropping it,
/// restores the state `begin` changed: the vertex layout is disabled, the
/// array buffer unbound, the previously bound vertex array rebound, depth
/// testing re-enabled, and both matrix stacks popped. The current matrix mode
/// is left at model-view.
pub struct QuadPass<'a, C: GraphicsContext> {
    ctx: &'a C,
    previous_vertex_array: Option<C::VertexArray>,
}

impl<C: GraphicsContext> QuadPass<'_, C> {
    /// Draw the quad. May be called any number of times per pass, e.g. once
    /// per bound program.
    pub fn render_quad(&self) {
        self.ctx
            .draw_arrays(Primitive::TriangleStrip, 0, QUAD_VERTEX_COUNT);
    }

    /// Close the pass.
    pub fn end(self) {}
}

impl<C: GraphicsContext> Drop for QuadPass<'_, C> {
    fn drop(&mut self) {
        let ctx = self.ctx;

        ctx.disable_vertex_layout(&VertexLayout::POSITION_TEX);
        ctx.bind_array_buffer(None);
        ctx.bind_vertex_array(self.previous_vertex_array);

        ctx.set_depth_test(true);

        ctx.matrix_mode(MatrixMode::Projection);
        ctx.pop_matrix();
        ctx.matrix_mode(MatrixMode::ModelView);
        ctx.pop_matrix();
    }
}
