//! Shared fixtures: a [`GraphicsContext`] that records every call and
//! simulates the state the crate depends on, and a per-thread capturing
//! logger.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::sync::Once;

use shaderpack_gl::{
    Error, GraphicsContext, MatrixMode, MatrixStack, Primitive, Result, ShaderStage, VertexLayout,
};

/// One recorded context call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateProgram(u32),
    BindAttribLocation(u32, u32, String),
    AttachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateShader(u32, ShaderStage),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateBuffer(u32),
    BindArrayBuffer(Option<u32>),
    BufferData(Vec<u8>),
    DeleteBuffer(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    DepthTest(bool),
    MatrixMode(MatrixMode),
    PushMatrix,
    PopMatrix,
    LoadIdentity,
    Color([f32; 4]),
    EnableLayout(i32),
    DisableLayout(i32),
    DrawArrays(Primitive, i32, i32),
}

/// Simulated context with scripted link and compile outcomes.
pub struct RecordingContext {
    pub calls: RefCell<Vec<Call>>,
    next_handle: Cell<u32>,
    pub link_succeeds: Cell<bool>,
    pub link_log: RefCell<String>,
    pub compile_succeeds: Cell<bool>,
    pub compile_log: RefCell<String>,
    pub depth_test: Cell<bool>,
    mode: Cell<MatrixMode>,
    projection: RefCell<MatrixStack>,
    model_view: RefCell<MatrixStack>,
    pub underflows: Cell<usize>,
    pub allocation_fails: Cell<bool>,
    pub vertex_array_fails: Cell<bool>,
    /// Currently bound vertex array object.
    pub vertex_array: Cell<Option<u32>>,
    /// Vertex array that was bound when a layout was last enabled.
    pub layout_vertex_array: Cell<Option<u32>>,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            next_handle: Cell::new(1),
            link_succeeds: Cell::new(true),
            link_log: RefCell::new(String::new()),
            compile_succeeds: Cell::new(true),
            compile_log: RefCell::new(String::new()),
            depth_test: Cell::new(true),
            mode: Cell::new(MatrixMode::ModelView),
            projection: RefCell::new(MatrixStack::new()),
            model_view: RefCell::new(MatrixStack::new()),
            underflows: Cell::new(0),
            allocation_fails: Cell::new(false),
            vertex_array_fails: Cell::new(false),
            vertex_array: Cell::new(None),
            layout_vertex_array: Cell::new(None),
        }
    }
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_link(log: &str) -> Self {
        let ctx = Self::default();
        ctx.link_succeeds.set(false);
        *ctx.link_log.borrow_mut() = log.to_owned();
        ctx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn depth(&self, mode: MatrixMode) -> usize {
        self.stack(mode).borrow().depth()
    }

    pub fn matrix_mode(&self) -> MatrixMode {
        self.mode.get()
    }

    pub fn stack(&self, mode: MatrixMode) -> &RefCell<MatrixStack> {
        match mode {
            MatrixMode::Projection => &self.projection,
            MatrixMode::ModelView => &self.model_view,
        }
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self, object: &'static str) -> Result<u32> {
        if self.allocation_fails.get() {
            return Err(Error::Allocation {
                object,
                reason: "out of handles".to_owned(),
            });
        }
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        Ok(handle)
    }
}

impl GraphicsContext for RecordingContext {
    type Program = u32;
    type Shader = u32;
    type Buffer = u32;
    type VertexArray = u32;

    fn create_program(&self) -> Result<u32> {
        let handle = self.allocate("program")?;
        self.record(Call::CreateProgram(handle));
        Ok(handle)
    }

    fn bind_attrib_location(&self, program: u32, location: u32, name: &str) {
        self.record(Call::BindAttribLocation(program, location, name.to_owned()));
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.link_log.borrow().clone()
    }

    fn program_link_status(&self, _program: u32) -> bool {
        self.link_succeeds.get()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32> {
        let handle = self.allocate("shader")?;
        self.record(Call::CreateShader(handle, stage));
        Ok(handle)
    }

    fn shader_source(&self, shader: u32, _source: &str) {
        self.record(Call::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, _shader: u32) -> bool {
        self.compile_succeeds.get()
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        self.compile_log.borrow().clone()
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_buffer(&self) -> Result<u32> {
        let handle = self.allocate("buffer")?;
        self.record(Call::CreateBuffer(handle));
        Ok(handle)
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    fn array_buffer_data_static(&self, data: &[u8]) {
        self.record(Call::BufferData(data.to_vec()));
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> Result<u32> {
        if self.vertex_array_fails.get() {
            return Err(Error::Allocation {
                object: "vertex array",
                reason: "out of handles".to_owned(),
            });
        }
        let handle = self.allocate("vertex array")?;
        self.record(Call::CreateVertexArray(handle));
        Ok(handle)
    }

    fn vertex_array_binding(&self) -> Option<u32> {
        self.vertex_array.get()
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.vertex_array.set(vertex_array);
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn set_depth_test(&self, enabled: bool) {
        self.depth_test.set(enabled);
        self.record(Call::DepthTest(enabled));
    }

    fn matrix_mode(&self, mode: MatrixMode) {
        self.mode.set(mode);
        self.record(Call::MatrixMode(mode));
    }

    fn push_matrix(&self) {
        self.stack(self.mode.get()).borrow_mut().push();
        self.record(Call::PushMatrix);
    }

    fn pop_matrix(&self) {
        let popped = self.stack(self.mode.get()).borrow_mut().pop();
        if !popped {
            self.underflows.set(self.underflows.get() + 1);
        }
        self.record(Call::PopMatrix);
    }

    fn load_identity(&self) {
        self.stack(self.mode.get()).borrow_mut().load_identity();
        self.record(Call::LoadIdentity);
    }

    fn color4f(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::Color([r, g, b, a]));
    }

    fn enable_vertex_layout(&self, layout: &VertexLayout) {
        self.layout_vertex_array.set(self.vertex_array.get());
        self.record(Call::EnableLayout(layout.stride));
    }

    fn disable_vertex_layout(&self, layout: &VertexLayout) {
        self.record(Call::DisableLayout(layout.stride));
    }

    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        self.record(Call::DrawArrays(primitive, first, count));
    }
}

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CapturingLogger;

impl log::Log for CapturingLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()));
        });
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static INIT: Once = Once::new();

/// Install the capturing logger (once per test binary) and clear this
/// thread's records.
pub fn capture_logs() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Messages logged on this thread at `level` since [`capture_logs`].
pub fn logged(level: log::Level) -> Vec<String> {
    RECORDS.with(|records| {
        records
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}
