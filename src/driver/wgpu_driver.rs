//! wgpu Driver
//!
//! [`WgpuDriver`] implements the GL-style [`GraphicsDriver`] command set on
//! top of wgpu. It owns the device, queue and window surface, and emulates
//! the bind-and-draw state machine:
//!
//! - Shader objects are compiled with naga ([`super::wgsl`]); linking creates
//!   the wgpu shader modules.
//! - Buffer objects map one-to-one to `wgpu::Buffer`s.
//! - `clear` and `draw_arrays` are recorded into the current frame; `present`
//!   resolves render pipelines (cached per program, topology and vertex
//!   layout), encodes one render pass and presents the surface texture.
//!
//! Object creation that the device may reject (shader modules, pipelines)
//! runs inside a validation error scope, and the captured error lands in the
//! program info log. Anything else the device reports is logged by the
//! uncaptured-error handler installed in [`WgpuDriver::new`].

use std::borrow::Cow;
use std::cell::RefCell;
use std::sync::Arc;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;
use wgpu::util::DeviceExt;

use super::wgsl::{self, CompiledModule, LinkedInterface};
use super::{
    BufferId, BufferTarget, BufferUsage, DriverError, GraphicsDriver, ProgramId, ShaderId,
    ShaderStage, Topology, VertexAttribute,
};
use crate::errors::{Error, Result};
use crate::settings::GameSettings;

struct ShaderObject {
    stage: ShaderStage,
    source: String,
    compiled: Option<CompiledModule>,
    info_log: String,
}

struct LinkedProgram {
    interface: LinkedInterface,
    vertex_module: wgpu::ShaderModule,
    fragment_module: wgpu::ShaderModule,
}

#[derive(Default)]
struct ProgramObject {
    attached: SmallVec<[ShaderId; 2]>,
    linked: Option<LinkedProgram>,
    validated: bool,
    info_log: String,
}

#[derive(Default)]
struct BufferObject {
    store: Option<wgpu::Buffer>,
    size: u64,
}

/// An attribute pointer resolved to the buffer it reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BoundAttribute {
    attribute: VertexAttribute,
    buffer: BufferId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    program: ProgramId,
    topology: Topology,
    /// (vertex buffer slot, attribute), sorted by location.
    layout: SmallVec<[(u32, VertexAttribute); 2]>,
}

struct DrawCall {
    program: ProgramId,
    topology: Topology,
    attributes: SmallVec<[BoundAttribute; 2]>,
    first: u32,
    count: u32,
}

#[derive(Default)]
struct FrameCommands {
    clear: Option<wgpu::Color>,
    draws: Vec<DrawCall>,
}

#[derive(Default)]
struct DriverState {
    shaders: SlotMap<ShaderId, ShaderObject>,
    programs: SlotMap<ProgramId, ProgramObject>,
    buffers: SlotMap<BufferId, BufferObject>,

    array_buffer: Option<BufferId>,
    current_program: Option<ProgramId>,
    enabled_attributes: SmallVec<[u32; 4]>,
    attribute_pointers: FxHashMap<u32, BoundAttribute>,

    pipelines: FxHashMap<PipelineKey, wgpu::RenderPipeline>,
    frame: FrameCommands,
}

impl DriverState {
    fn bound(&self, target: BufferTarget) -> std::result::Result<BufferId, DriverError> {
        match target {
            BufferTarget::Array => self.array_buffer.ok_or(DriverError::NoBufferBound(target)),
        }
    }

    /// Enabled attributes with a declared pointer, sorted by location.
    fn active_attributes(&self) -> SmallVec<[BoundAttribute; 2]> {
        let mut active: SmallVec<[BoundAttribute; 2]> = self
            .enabled_attributes
            .iter()
            .filter_map(|loc| self.attribute_pointers.get(loc).copied())
            .collect();
        active.sort_by_key(|a| a.attribute.location);
        active
    }
}

/// A draw call with every GPU object it needs resolved.
struct ResolvedDraw {
    pipeline: wgpu::RenderPipeline,
    vertex_buffers: SmallVec<[wgpu::Buffer; 2]>,
    first: u32,
    count: u32,
}

/// GL-style command set implemented on wgpu.
///
/// Holds the core GPU handles (device, queue, surface, surface config) plus
/// the emulated object tables.
pub struct WgpuDriver {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: RefCell<wgpu::SurfaceConfiguration>,
    state: RefCell<DriverState>,
}

impl WgpuDriver {
    /// Creates the surface for `window`, requests an adapter and device and
    /// configures the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if GPU initialization fails due to:
    /// - Surface creation failure
    /// - No compatible GPU adapter found
    /// - Device request failure
    pub async fn new<W>(window: W, settings: &GameSettings, width: u32, height: u32) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: settings.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Asteroids Device"),
                ..Default::default()
            })
            .await?;

        install_diagnostics(&device);

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or_else(|| Error::DriverInit("Surface not supported by adapter".to_string()))?;

        config.present_mode = if settings.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config: RefCell::new(config),
            state: RefCell::new(DriverState::default()),
        })
    }

    /// Runs `create` inside a validation error scope.
    ///
    /// Returns the device's error message if `create` raised one.
    fn scoped<T>(&self, create: impl FnOnce() -> T) -> std::result::Result<T, String> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create();
        match pollster::block_on(scope.pop()) {
            None => Ok(value),
            Some(error) => Err(error.to_string()),
        }
    }

    /// Returns the current surface dimensions.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        let config = self.config.borrow();
        (config.width, config.height)
    }

    fn link(&self, program: &ProgramObject, shaders: &SlotMap<ShaderId, ShaderObject>) -> std::result::Result<LinkedProgram, String> {
        let find = |stage: ShaderStage| {
            let mut matching = program
                .attached
                .iter()
                .filter_map(|id| shaders.get(*id))
                .filter(|s| s.stage == stage);
            match (matching.next(), matching.next()) {
                (Some(shader), None) => Ok(shader),
                (None, _) => Err(format!("no {stage} shader attached")),
                (Some(_), Some(_)) => Err(format!("more than one {stage} shader attached")),
            }
        };

        let vertex = find(ShaderStage::Vertex)?;
        let fragment = find(ShaderStage::Fragment)?;

        let (Some(vs), Some(fs)) = (&vertex.compiled, &fragment.compiled) else {
            return Err("attached shaders are not compiled".to_string());
        };
        let interface = wgsl::link(vs, fs)?;

        let vertex_module = self.scoped(|| {
            self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Vertex Stage"),
                source: wgpu::ShaderSource::Wgsl(Cow::Owned(vertex.source.clone())),
            })
        })?;
        let fragment_module = self.scoped(|| {
            self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Fragment Stage"),
                source: wgpu::ShaderSource::Wgsl(Cow::Owned(fragment.source.clone())),
            })
        })?;

        Ok(LinkedProgram {
            interface,
            vertex_module,
            fragment_module,
        })
    }

    fn create_pipeline(&self, key: &PipelineKey, program: &LinkedProgram) -> std::result::Result<wgpu::RenderPipeline, DriverError> {
        let mut slots: Vec<(u64, Vec<wgpu::VertexAttribute>)> = Vec::new();
        for (slot, attribute) in &key.layout {
            let format = vertex_format(attribute)?;
            let slot = *slot as usize;
            if slots.len() <= slot {
                slots.resize_with(slot + 1, || (attribute.stride, Vec::new()));
            }
            let (stride, attributes) = &mut slots[slot];
            if *stride != attribute.stride {
                return Err(DriverError::StrideConflict);
            }
            attributes.push(wgpu::VertexAttribute {
                format,
                offset: attribute.offset,
                shader_location: attribute.location,
            });
        }

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = slots
            .iter()
            .map(|(stride, attributes)| wgpu::VertexBufferLayout {
                array_stride: *stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            })
            .collect();

        let format = self.config.borrow().format;

        self.scoped(|| self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Program Pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &program.vertex_module,
                entry_point: Some(program.interface.vertex_entry.as_str()),
                buffers: &buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.fragment_module,
                entry_point: Some(program.interface.fragment_entry.as_str()),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: primitive_topology(key.topology),
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        }))
        .map_err(DriverError::Pipeline)
    }

    /// Returns the cached pipeline for `program` drawing `topology` from
    /// `attributes`, creating it on first use, plus the buffer bound to each
    /// vertex buffer slot.
    fn pipeline_for(
        &self,
        state: &mut DriverState,
        program: ProgramId,
        topology: Topology,
        attributes: &[BoundAttribute],
    ) -> std::result::Result<(wgpu::RenderPipeline, SmallVec<[BufferId; 2]>), DriverError> {
        let mut slot_buffers: SmallVec<[BufferId; 2]> = SmallVec::new();
        let mut layout = SmallVec::new();
        for bound in attributes {
            let slot = match slot_buffers.iter().position(|b| *b == bound.buffer) {
                Some(slot) => slot,
                None => {
                    slot_buffers.push(bound.buffer);
                    slot_buffers.len() - 1
                }
            };
            layout.push((slot as u32, bound.attribute));
        }

        let key = PipelineKey {
            program,
            topology,
            layout,
        };

        if let Some(pipeline) = state.pipelines.get(&key) {
            return Ok((pipeline.clone(), slot_buffers));
        }

        let linked = state
            .programs
            .get(program)
            .and_then(|p| p.linked.as_ref())
            .ok_or(DriverError::NoProgramInUse)?;
        let pipeline = self.create_pipeline(&key, linked)?;
        state.pipelines.insert(key, pipeline.clone());
        Ok((pipeline, slot_buffers))
    }

    fn resolve_draw(&self, state: &mut DriverState, draw: &DrawCall) -> std::result::Result<ResolvedDraw, DriverError> {
        let (pipeline, slot_buffers) =
            self.pipeline_for(state, draw.program, draw.topology, &draw.attributes)?;

        let vertex_buffers = slot_buffers
            .iter()
            .map(|id| {
                state
                    .buffers
                    .get(*id)
                    .ok_or(DriverError::UnknownBuffer)?
                    .store
                    .clone()
                    .ok_or(DriverError::BufferUninitialized)
            })
            .collect::<std::result::Result<_, _>>()?;

        Ok(ResolvedDraw {
            pipeline,
            vertex_buffers,
            first: draw.first,
            count: draw.count,
        })
    }
}

impl GraphicsDriver for WgpuDriver {
    fn create_shader(&self, stage: ShaderStage) -> ShaderId {
        self.state.borrow_mut().shaders.insert(ShaderObject {
            stage,
            source: String::new(),
            compiled: None,
            info_log: String::new(),
        })
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        if let Some(object) = self.state.borrow_mut().shaders.get_mut(shader) {
            object.source = source.to_owned();
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        let Some(object) = state.shaders.get_mut(shader) else {
            return;
        };
        match wgsl::compile(object.stage, &object.source) {
            Ok(module) => {
                object.compiled = Some(module);
                object.info_log.clear();
            }
            Err(log) => {
                object.compiled = None;
                object.info_log = log;
            }
        }
    }

    fn compile_status(&self, shader: ShaderId) -> bool {
        self.state
            .borrow()
            .shaders
            .get(shader)
            .is_some_and(|s| s.compiled.is_some())
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.state
            .borrow()
            .shaders
            .get(shader)
            .map(|s| s.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        self.state.borrow_mut().shaders.remove(shader);
    }

    fn create_program(&self) -> ProgramId {
        self.state.borrow_mut().programs.insert(ProgramObject::default())
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let Some(object) = self.state.borrow_mut().programs.get_mut(program)
            && !object.attached.contains(&shader)
        {
            object.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let Some(object) = self.state.borrow_mut().programs.get_mut(program) {
            object.attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let Some(object) = state.programs.get(program) else {
            return;
        };
        let outcome = self.link(object, &state.shaders);

        state.pipelines.retain(|key, _| key.program != program);
        if let Some(object) = state.programs.get_mut(program) {
            object.validated = false;
            match outcome {
                Ok(linked) => {
                    object.linked = Some(linked);
                    object.info_log.clear();
                }
                Err(log) => {
                    object.linked = None;
                    object.info_log = log;
                }
            }
        }
    }

    fn link_status(&self, program: ProgramId) -> bool {
        self.state
            .borrow()
            .programs
            .get(program)
            .is_some_and(|p| p.linked.is_some())
    }

    fn validate_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let active = state.active_attributes();

        let outcome = match state.programs.get(program).map(|p| p.linked.as_ref()) {
            None => return,
            Some(None) => Err("program is not linked".to_string()),
            Some(Some(linked)) => check_vertex_inputs(&linked.interface, &active, &state.buffers),
        };

        // A device rejection of the pipeline becomes the validation log.
        let outcome = outcome.and_then(|()| {
            self.pipeline_for(state, program, Topology::Triangles, &active)
                .map(|_| ())
                .map_err(|e| e.to_string())
        });

        if let Some(object) = state.programs.get_mut(program) {
            match outcome {
                Ok(()) => object.validated = true,
                Err(log) => {
                    object.validated = false;
                    object.info_log = log;
                }
            }
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
        self.state
            .borrow()
            .programs
            .get(program)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        if state.programs.contains_key(program) {
            state.current_program = Some(program);
        }
    }

    fn delete_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(program);
        state.pipelines.retain(|key, _| key.program != program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
    }

    fn gen_buffers(&self, count: usize) -> Vec<BufferId> {
        let mut state = self.state.borrow_mut();
        (0..count)
            .map(|_| state.buffers.insert(BufferObject::default()))
            .collect()
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: BufferId) {
        let mut state = self.state.borrow_mut();
        if !state.buffers.contains_key(buffer) {
            return;
        }
        match target {
            BufferTarget::Array => state.array_buffer = Some(buffer),
        }
    }

    fn buffer_data(
        &self,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> std::result::Result<(), DriverError> {
        let mut state = self.state.borrow_mut();
        let id = state.bound(target)?;
        let object = state.buffers.get_mut(id).ok_or(DriverError::UnknownBuffer)?;

        let label = match usage {
            BufferUsage::Static => "Static Vertex Buffer",
            BufferUsage::Dynamic => "Dynamic Vertex Buffer",
        };

        if let Some(old) = object.store.take() {
            old.destroy();
        }
        object.store = Some(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: data,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        }));
        object.size = data.len() as u64;
        Ok(())
    }

    fn buffer_sub_data(
        &self,
        target: BufferTarget,
        offset: u64,
        data: &[u8],
    ) -> std::result::Result<(), DriverError> {
        let state = self.state.borrow();
        let id = state.bound(target)?;
        let object = state.buffers.get(id).ok_or(DriverError::UnknownBuffer)?;
        let store = object.store.as_ref().ok_or(DriverError::BufferUninitialized)?;

        let len = data.len() as u64;
        if offset.checked_add(len).is_none_or(|end| end > object.size) {
            return Err(DriverError::RangeOutOfBounds {
                offset,
                len,
                size: object.size,
            });
        }
        if offset % wgpu::COPY_BUFFER_ALIGNMENT != 0 || len % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(DriverError::MisalignedWrite { offset, len });
        }

        self.queue.write_buffer(store, offset, data);
        Ok(())
    }

    fn delete_buffer(&self, buffer: BufferId) {
        let mut state = self.state.borrow_mut();
        if let Some(object) = state.buffers.remove(buffer)
            && let Some(store) = object.store
        {
            store.destroy();
        }
        if state.array_buffer == Some(buffer) {
            state.array_buffer = None;
        }
        state.attribute_pointers.retain(|_, bound| bound.buffer != buffer);
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        let mut state = self.state.borrow_mut();
        if !state.enabled_attributes.contains(&location) {
            state.enabled_attributes.push(location);
        }
    }

    fn vertex_attrib_pointer(&self, attribute: VertexAttribute) -> std::result::Result<(), DriverError> {
        vertex_format(&attribute)?;
        let mut state = self.state.borrow_mut();
        let buffer = state.bound(BufferTarget::Array)?;
        state
            .attribute_pointers
            .insert(attribute.location, BoundAttribute { attribute, buffer });
        Ok(())
    }

    fn clear(&self, color: wgpu::Color) {
        let mut state = self.state.borrow_mut();
        state.frame.clear = Some(color);
        // Clearing discards anything drawn earlier in the frame.
        state.frame.draws.clear();
    }

    fn draw_arrays(&self, mode: Topology, first: u32, count: u32) -> std::result::Result<(), DriverError> {
        let mut state = self.state.borrow_mut();
        let program = state
            .current_program
            .filter(|p| state.programs.get(*p).is_some_and(|p| p.linked.is_some()))
            .ok_or(DriverError::NoProgramInUse)?;
        let attributes = state.active_attributes();
        state.frame.draws.push(DrawCall {
            program,
            topology: mode,
            attributes,
            first,
            count,
        });
        Ok(())
    }

    fn present(&self) -> std::result::Result<(), DriverError> {
        let frame = std::mem::take(&mut self.state.borrow_mut().frame);

        let output = match self.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output)
            | wgpu::CurrentSurfaceTexture::Suboptimal(output) => output,
            wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                self.surface.configure(&self.device, &self.config.borrow());
                return Ok(());
            }
            wgpu::CurrentSurfaceTexture::Timeout | wgpu::CurrentSurfaceTexture::Occluded => {
                log::debug!("Surface texture unavailable, skipping frame");
                return Ok(());
            }
            wgpu::CurrentSurfaceTexture::Validation => {
                return Err(DriverError::Surface("surface texture acquisition failed validation".to_string()));
            }
        };

        let resolved = {
            let mut state = self.state.borrow_mut();
            frame
                .draws
                .iter()
                .map(|draw| self.resolve_draw(&mut state, draw))
                .collect::<std::result::Result<Vec<_>, _>>()?
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let load = match frame.clear {
                Some(color) => wgpu::LoadOp::Clear(color),
                None => wgpu::LoadOp::Load,
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                ..Default::default()
            });

            for draw in &resolved {
                pass.set_pipeline(&draw.pipeline);
                for (slot, buffer) in draw.vertex_buffers.iter().enumerate() {
                    pass.set_vertex_buffer(slot as u32, buffer.slice(..));
                }
                pass.draw(draw.first..draw.first + draw.count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            let mut config = self.config.borrow_mut();
            config.width = width;
            config.height = height;
            self.surface.configure(&self.device, &config);
        }
    }
}

/// Every vertex input must read an enabled `Float32` attribute backed by a
/// buffer with a data store.
fn check_vertex_inputs(
    interface: &LinkedInterface,
    active: &[BoundAttribute],
    buffers: &SlotMap<BufferId, BufferObject>,
) -> std::result::Result<(), String> {
    let mut problems = Vec::new();
    for input in &interface.vertex_inputs {
        let fed = active.iter().any(|a| {
            a.attribute.location == input.location
                && buffers.get(a.buffer).is_some_and(|b| b.store.is_some())
        });
        if !fed {
            problems.push(format!(
                "vertex input location {} has no enabled attribute with a data store",
                input.location
            ));
        }
        if !input.ty.is_some_and(|ty| ty.accepts_f32()) {
            problems.push(format!(
                "vertex input location {} is not a 32-bit float type and cannot read a Float32 attribute",
                input.location
            ));
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("\n"))
    }
}

fn install_diagnostics(device: &wgpu::Device) {
    device.on_uncaptured_error(Arc::new(|error: wgpu::Error| {
        let kind = match &error {
            wgpu::Error::OutOfMemory { .. } => "out of memory",
            wgpu::Error::Validation { .. } => "validation",
            wgpu::Error::Internal { .. } => "internal",
        };
        log::error!("GPU error ({kind}): {error}");
    }));
    device.set_device_lost_callback(|reason, message| {
        log::error!("GPU device lost ({reason:?}): {message}");
    });
}

fn vertex_format(attribute: &VertexAttribute) -> std::result::Result<wgpu::VertexFormat, DriverError> {
    match attribute.components {
        1 => Ok(wgpu::VertexFormat::Float32),
        2 => Ok(wgpu::VertexFormat::Float32x2),
        3 => Ok(wgpu::VertexFormat::Float32x3),
        4 => Ok(wgpu::VertexFormat::Float32x4),
        components => Err(DriverError::UnsupportedAttribute {
            location: attribute.location,
            components,
        }),
    }
}

const fn primitive_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::wgsl::InterfaceVar;

    #[test]
    fn vertex_format_covers_float_vectors() {
        let attr = VertexAttribute::packed_f32(0, 2);
        assert_eq!(vertex_format(&attr), Ok(wgpu::VertexFormat::Float32x2));
        assert_eq!(attr.stride, 8);

        let bad = VertexAttribute::packed_f32(1, 5);
        assert_eq!(
            vertex_format(&bad),
            Err(DriverError::UnsupportedAttribute {
                location: 1,
                components: 5
            })
        );
    }

    fn interface(vertex_inputs: Vec<InterfaceVar>) -> LinkedInterface {
        LinkedInterface {
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            vertex_inputs,
        }
    }

    #[test]
    fn vertex_input_without_attribute_fails_validation() {
        let buffers = SlotMap::with_key();
        let position = wgsl::compile(
            ShaderStage::Vertex,
            "@vertex fn vs_main(@location(0) p: vec2<f32>) -> @builtin(position) vec4<f32> { return vec4<f32>(p, 0.0, 1.0); }",
        )
        .unwrap()
        .inputs;

        let log = check_vertex_inputs(&interface(position), &[], &buffers).unwrap_err();
        assert!(log.contains("location 0"), "{log}");
        assert!(log.contains("data store"), "{log}");
    }

    #[test]
    fn integer_vertex_input_fails_validation() {
        let buffers = SlotMap::with_key();
        let inputs = wgsl::compile(
            ShaderStage::Vertex,
            "@vertex fn vs_main(@location(0) p: vec2<u32>) -> @builtin(position) vec4<f32> { return vec4<f32>(vec2<f32>(p), 0.0, 1.0); }",
        )
        .unwrap()
        .inputs;

        let log = check_vertex_inputs(&interface(inputs), &[], &buffers).unwrap_err();
        assert!(log.contains("32-bit float"), "{log}");
    }

    #[test]
    fn shader_without_vertex_inputs_validates() {
        let buffers = SlotMap::with_key();
        assert!(check_vertex_inputs(&interface(Vec::new()), &[], &buffers).is_ok());
    }

    #[test]
    fn triangles_map_to_triangle_list() {
        assert_eq!(
            primitive_topology(Topology::Triangles),
            wgpu::PrimitiveTopology::TriangleList
        );
    }
}
