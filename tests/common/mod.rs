//! Recording graphics driver shared by the integration tests.
//!
//! Implements [`GraphicsDriver`] on plain host memory: every command is
//! appended to a call log, object tables are slotmaps, and compile, link
//! and validate outcomes are scripted per test.

#![allow(dead_code)]

use std::cell::RefCell;

use slotmap::SlotMap;

use asteroids::driver::{
    BufferId, BufferTarget, BufferUsage, DriverError, GraphicsDriver, ProgramId, ShaderId,
    ShaderStage, Topology, VertexAttribute,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage),
    ShaderSource(ShaderId),
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram,
    AttachShader(ProgramId, ShaderId),
    DetachShader(ProgramId, ShaderId),
    LinkProgram(ProgramId),
    ValidateProgram(ProgramId),
    UseProgram(ProgramId),
    DeleteProgram(ProgramId),
    GenBuffers(usize),
    BindBuffer(BufferTarget, BufferId),
    BufferData { len: usize, usage: BufferUsage },
    BufferSubData { offset: u64, len: usize },
    DeleteBuffer(BufferId),
    EnableAttribute(u32),
    AttributePointer(VertexAttribute),
    Clear,
    Draw { mode: Topology, first: u32, count: u32 },
    Present,
    Resize(u32, u32),
}

#[derive(Default)]
struct ShaderRecord {
    stage: Option<ShaderStage>,
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct ProgramRecord {
    attached: Vec<ShaderId>,
    linked: bool,
    validated: bool,
}

#[derive(Default)]
struct State {
    shaders: SlotMap<ShaderId, ShaderRecord>,
    programs: SlotMap<ProgramId, ProgramRecord>,
    buffers: SlotMap<BufferId, Option<Vec<u8>>>,
    array_buffer: Option<BufferId>,
    current_program: Option<ProgramId>,
    calls: Vec<Call>,
}

/// Scripted outcome for one of the pipeline steps.
#[derive(Debug, Clone, Default)]
struct Failure {
    compile: Option<(ShaderStage, String)>,
    link: Option<String>,
    validate: Option<String>,
    sub_data: bool,
}

#[derive(Default)]
pub struct RecordingDriver {
    failure: Failure,
    state: RefCell<State>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiling any `stage` shader fails with `log`.
    pub fn failing_compile(mut self, stage: ShaderStage, log: &str) -> Self {
        self.failure.compile = Some((stage, log.to_string()));
        self
    }

    pub fn failing_link(mut self, log: &str) -> Self {
        self.failure.link = Some(log.to_string());
        self
    }

    pub fn failing_validate(mut self, log: &str) -> Self {
        self.failure.validate = Some(log.to_string());
        self
    }

    /// Every buffer rewrite is recorded and then rejected by the device.
    pub fn failing_sub_data(mut self) -> Self {
        self.failure.sub_data = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| matches(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn shader_text(&self, shader: ShaderId) -> Option<String> {
        self.state
            .borrow()
            .shaders
            .get(shader)
            .map(|s| s.source.clone())
    }

    pub fn buffer_contents(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(buffer).cloned().flatten()
    }

    pub fn current_program(&self) -> Option<ProgramId> {
        self.state.borrow().current_program
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl GraphicsDriver for RecordingDriver {
    fn create_shader(&self, stage: ShaderStage) -> ShaderId {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::CreateShader(stage));
        state.shaders.insert(ShaderRecord {
            stage: Some(stage),
            ..Default::default()
        })
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ShaderSource(shader));
        if let Some(record) = state.shaders.get_mut(shader) {
            record.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::CompileShader(shader));
        let failing = self.failure.compile.as_ref().map(|(stage, _)| *stage);
        if let Some(record) = state.shaders.get_mut(shader) {
            record.compiled = record.stage != failing;
        }
    }

    fn compile_status(&self, shader: ShaderId) -> bool {
        self.state
            .borrow()
            .shaders
            .get(shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        if self.compile_status(shader) {
            return String::new();
        }
        self.failure
            .compile
            .as_ref()
            .map(|(_, log)| log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::DeleteShader(shader));
        state.shaders.remove(shader);
    }

    fn create_program(&self) -> ProgramId {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::CreateProgram);
        state.programs.insert(ProgramRecord::default())
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::AttachShader(program, shader));
        if let Some(record) = state.programs.get_mut(program) {
            record.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::DetachShader(program, shader));
        if let Some(record) = state.programs.get_mut(program) {
            record.attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::LinkProgram(program));
        let link_ok = self.failure.link.is_none();
        let state = &mut *state;
        if let Some(record) = state.programs.get_mut(program) {
            let stages_ready = record
                .attached
                .iter()
                .all(|s| state.shaders.get(*s).is_some_and(|s| s.compiled));
            record.linked = link_ok && stages_ready && record.attached.len() == 2;
        }
    }

    fn link_status(&self, program: ProgramId) -> bool {
        self.state
            .borrow()
            .programs
            .get(program)
            .is_some_and(|p| p.linked)
    }

    fn validate_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ValidateProgram(program));
        let validate_ok = self.failure.validate.is_none();
        if let Some(record) = state.programs.get_mut(program) {
            record.validated = record.linked && validate_ok;
        }
    }

    fn validate_status(&self, program: ProgramId) -> bool {
        self.state
            .borrow()
            .programs
            .get(program)
            .is_some_and(|p| p.validated)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        if !self.link_status(program) {
            return self.failure.link.clone().unwrap_or_default();
        }
        if !self.validate_status(program) {
            return self.failure.validate.clone().unwrap_or_default();
        }
        String::new()
    }

    fn use_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::UseProgram(program));
        state.current_program = Some(program);
    }

    fn delete_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::DeleteProgram(program));
        state.programs.remove(program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
    }

    fn gen_buffers(&self, count: usize) -> Vec<BufferId> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::GenBuffers(count));
        (0..count).map(|_| state.buffers.insert(None)).collect()
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: BufferId) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BindBuffer(target, buffer));
        state.array_buffer = Some(buffer);
    }

    fn buffer_data(
        &self,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), DriverError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BufferData {
            len: data.len(),
            usage,
        });
        let bound = state.array_buffer.ok_or(DriverError::NoBufferBound(target))?;
        let store = state
            .buffers
            .get_mut(bound)
            .ok_or(DriverError::UnknownBuffer)?;
        *store = Some(data.to_vec());
        Ok(())
    }

    fn buffer_sub_data(
        &self,
        target: BufferTarget,
        offset: u64,
        data: &[u8],
    ) -> Result<(), DriverError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BufferSubData {
            offset,
            len: data.len(),
        });
        if self.failure.sub_data {
            return Err(DriverError::Surface("device lost".to_string()));
        }
        let bound = state.array_buffer.ok_or(DriverError::NoBufferBound(target))?;
        let store = state
            .buffers
            .get_mut(bound)
            .ok_or(DriverError::UnknownBuffer)?
            .as_mut()
            .ok_or(DriverError::BufferUninitialized)?;

        let start = offset as usize;
        let end = start + data.len();
        if end > store.len() {
            return Err(DriverError::RangeOutOfBounds {
                offset,
                len: data.len() as u64,
                size: store.len() as u64,
            });
        }
        store[start..end].copy_from_slice(data);
        Ok(())
    }

    fn delete_buffer(&self, buffer: BufferId) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::DeleteBuffer(buffer));
        state.buffers.remove(buffer);
        if state.array_buffer == Some(buffer) {
            state.array_buffer = None;
        }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(Call::EnableAttribute(location));
    }

    fn vertex_attrib_pointer(&self, attribute: VertexAttribute) -> Result<(), DriverError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::AttributePointer(attribute));
        if state.array_buffer.is_none() {
            return Err(DriverError::NoBufferBound(BufferTarget::Array));
        }
        Ok(())
    }

    fn clear(&self, _color: wgpu::Color) {
        self.record(Call::Clear);
    }

    fn draw_arrays(&self, mode: Topology, first: u32, count: u32) -> Result<(), DriverError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Draw { mode, first, count });
        if state.current_program.is_none() {
            return Err(DriverError::NoProgramInUse);
        }
        Ok(())
    }

    fn present(&self) -> Result<(), DriverError> {
        self.record(Call::Present);
        Ok(())
    }

    fn resize(&self, width: u32, height: u32) {
        self.record(Call::Resize(width, height));
    }
}
