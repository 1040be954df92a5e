//! [`GraphicsContext`] backed by a [`glow::Context`].
//!
//! Core-profile OpenGL has no fixed-function matrix stack or current color,
//! so this backend keeps the projection and model-view stacks and the tint on
//! the CPU. Shaders that want them read [`GlowContext::matrix`] and
//! [`GlowContext::tint`] and upload them as uniforms.
//!
//! Targets desktop OpenGL: vertex array names are read back from the driver
//! as native handles.

use std::cell::{Cell, RefCell};
use std::num::NonZeroU32;
use std::sync::Arc;

use glam::Mat4;
use glow::HasContext;

use crate::context::{GraphicsContext, MatrixMode, Primitive, ShaderStage, VertexLayout};
use crate::error::{Error, Result};
use crate::matrix::MatrixStack;

/// Wraps a shared [`glow::Context`] together with emulated legacy state.
///
/// Not `Sync`: all calls must come from the render thread.
pub struct GlowContext {
    gl: Arc<glow::Context>,
    mode: Cell<MatrixMode>,
    projection: RefCell<MatrixStack>,
    model_view: RefCell<MatrixStack>,
    tint: Cell<[f32; 4]>,
}

impl GlowContext {
    /// Wrap `gl`.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread and stay current and valid
    /// for as long as the returned value is used.
    #[must_use]
    pub unsafe fn new(gl: Arc<glow::Context>) -> Self {
        Self {
            gl,
            mode: Cell::new(MatrixMode::ModelView),
            projection: RefCell::new(MatrixStack::new()),
            model_view: RefCell::new(MatrixStack::new()),
            tint: Cell::new([1.0; 4]),
        }
    }

    /// The wrapped context, for calls outside this crate's surface.
    #[must_use]
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Current top of the given matrix stack.
    #[must_use]
    pub fn matrix(&self, mode: MatrixMode) -> Mat4 {
        self.stack(mode).borrow().top()
    }

    /// Depth of the given matrix stack, including its base entry.
    #[must_use]
    pub fn matrix_depth(&self, mode: MatrixMode) -> usize {
        self.stack(mode).borrow().depth()
    }

    /// Replace the top of the current matrix stack, e.g. with the host's
    /// camera projection.
    pub fn load_matrix(&self, matrix: Mat4) {
        self.stack(self.mode.get()).borrow_mut().load(matrix);
    }

    /// Tint set by the last [`color4f`](GraphicsContext::color4f).
    #[must_use]
    pub fn tint(&self) -> [f32; 4] {
        self.tint.get()
    }

    fn stack(&self, mode: MatrixMode) -> &RefCell<MatrixStack> {
        match mode {
            MatrixMode::Projection => &self.projection,
            MatrixMode::ModelView => &self.model_view,
        }
    }
}

fn gl_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn gl_primitive(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Triangles => glow::TRIANGLES,
        Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
    }
}

// SAFETY (all impls below): `GlowContext::new` obliges the caller to keep the
// context current on this thread for the wrapper's lifetime.
impl GraphicsContext for GlowContext {
    type Program = glow::Program;
    type Shader = glow::Shader;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;

    fn create_program(&self) -> Result<Self::Program> {
        unsafe { self.gl.create_program() }.map_err(|reason| Error::Allocation {
            object: "program",
            reason,
        })
    }

    fn bind_attrib_location(&self, program: Self::Program, location: u32, name: &str) {
        unsafe { self.gl.bind_attrib_location(program, location, name) };
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) };
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) };
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) };
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) };
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader> {
        unsafe { self.gl.create_shader(gl_stage(stage)) }.map_err(|reason| Error::Allocation {
            object: "shader",
            reason,
        })
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) };
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) };
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) };
    }

    fn create_buffer(&self) -> Result<Self::Buffer> {
        unsafe { self.gl.create_buffer() }.map_err(|reason| Error::Allocation {
            object: "buffer",
            reason,
        })
    }

    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer) };
    }

    fn array_buffer_data_static(&self, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) };
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray> {
        unsafe { self.gl.create_vertex_array() }.map_err(|reason| Error::Allocation {
            object: "vertex array",
            reason,
        })
    }

    fn vertex_array_binding(&self) -> Option<Self::VertexArray> {
        let name = unsafe { self.gl.get_parameter_i32(glow::VERTEX_ARRAY_BINDING) };
        u32::try_from(name)
            .ok()
            .and_then(NonZeroU32::new)
            .map(glow::NativeVertexArray)
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) };
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) };
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn matrix_mode(&self, mode: MatrixMode) {
        self.mode.set(mode);
    }

    fn push_matrix(&self) {
        self.stack(self.mode.get()).borrow_mut().push();
    }

    fn pop_matrix(&self) {
        let mode = self.mode.get();
        if !self.stack(mode).borrow_mut().pop() {
            log::error!("{mode:?} matrix stack underflow; pop ignored");
        }
    }

    fn load_identity(&self) {
        self.stack(self.mode.get()).borrow_mut().load_identity();
    }

    fn color4f(&self, r: f32, g: f32, b: f32, a: f32) {
        self.tint.set([r, g, b, a]);
    }

    fn enable_vertex_layout(&self, layout: &VertexLayout) {
        for attribute in layout.attributes {
            unsafe {
                self.gl.enable_vertex_attrib_array(attribute.location);
                self.gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    glow::FLOAT,
                    false,
                    layout.stride,
                    attribute.offset,
                );
            }
        }
    }

    fn disable_vertex_layout(&self, layout: &VertexLayout) {
        for attribute in layout.attributes {
            unsafe { self.gl.disable_vertex_attrib_array(attribute.location) };
        }
    }

    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(gl_primitive(primitive), first, count) };
    }
}
