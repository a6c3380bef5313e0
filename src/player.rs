//! The player ship: a triangle in normalized device coordinates, mirrored in
//! one dynamic vertex buffer.

use std::rc::Rc;

use glam::Vec2;

use crate::driver::{BufferTarget, BufferUsage, GraphicsDriver, VertexAttribute};
use crate::errors::Result;
use crate::input::MovementCommand;
use crate::mesh::GpuMeshBuffer;

/// Number of vertices in the ship mesh.
pub const PLAYER_VERTEX_COUNT: u32 = 3;

/// Number of position floats (x, y per vertex).
pub const PLAYER_COMPONENTS: usize = PLAYER_VERTEX_COUNT as usize * 2;

/// Shader location of the position attribute.
pub const POSITION_LOCATION: u32 = 0;

/// Ship outline at spawn, centered on the origin.
pub const PLAYER_SPAWN: [f32; PLAYER_COMPONENTS] = [
    -0.05, -0.05, //
    0.0, 0.05, //
    0.05, -0.05,
];

pub struct Player<D: GraphicsDriver + ?Sized> {
    mesh: GpuMeshBuffer<D>,
    positions: [f32; PLAYER_COMPONENTS],
}

impl<D: GraphicsDriver + ?Sized> Player<D> {
    /// Uploads the ship at its spawn position.
    pub fn load(driver: &Rc<D>) -> Result<Self> {
        Self::with_positions(driver, PLAYER_SPAWN)
    }

    /// Uploads the ship with the given vertex positions and declares the
    /// position attribute (2 x f32, tightly packed).
    pub fn with_positions(driver: &Rc<D>, positions: [f32; PLAYER_COMPONENTS]) -> Result<Self> {
        let mut mesh = GpuMeshBuffer::allocate(driver, 1);
        mesh.initialize(
            BufferTarget::Array,
            bytemuck::cast_slice(&positions),
            BufferUsage::Dynamic,
        )?;
        mesh.declare_layout(VertexAttribute::packed_f32(POSITION_LOCATION, 2))?;

        Ok(Self { mesh, positions })
    }

    /// Moves the ship by `command.delta`.
    ///
    /// The host positions change only once the GPU buffer accepted the new data.
    pub fn apply(&mut self, command: MovementCommand) -> Result<()> {
        let next = translate_positions(&self.positions, command.delta);
        self.mesh.rewrite(bytemuck::cast_slice(&next))?;
        self.positions = next;
        Ok(())
    }

    #[must_use]
    pub fn positions(&self) -> &[f32; PLAYER_COMPONENTS] {
        &self.positions
    }

    #[must_use]
    pub fn mesh(&self) -> &GpuMeshBuffer<D> {
        &self.mesh
    }
}

/// Offsets interleaved `x, y` positions by `delta`: even indices by `delta.x`,
/// odd indices by `delta.y`.
#[must_use]
pub fn translate_positions<const N: usize>(positions: &[f32; N], delta: Vec2) -> [f32; N] {
    let mut next = *positions;
    for (i, value) in next.iter_mut().enumerate() {
        *value += if i % 2 == 0 { delta.x } else { delta.y };
    }
    next
}
