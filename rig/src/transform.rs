//! Per-part transform table and per-frame shader constants
//!
//! The renderer indexes world matrices by the part id stored in each
//! vertex. Matrices are stored transposed (row-major rows of the
//! column-vector matrix), which is the layout the shader constant block
//! expects.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::registry::PartId;

/// Number of world matrix slots. Every registered part id must be below this.
pub const TRANSFORM_TABLE_CAPACITY: usize = 10;

/// Fixed-capacity world matrices indexed by part id, plus the view matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformTable {
    world: [Mat4; TRANSFORM_TABLE_CAPACITY],
    view: Mat4,
}

impl Default for TransformTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformTable {
    pub fn new() -> Self {
        Self {
            world: [Mat4::IDENTITY; TRANSFORM_TABLE_CAPACITY],
            view: Mat4::IDENTITY,
        }
    }

    /// Overwrite every slot with identity.
    ///
    /// Called at the start of each frame so that no slot carries a matrix
    /// from a previous frame.
    pub fn reset(&mut self) {
        self.world = [Mat4::IDENTITY; TRANSFORM_TABLE_CAPACITY];
        self.view = Mat4::IDENTITY;
    }

    /// Store the world matrix of `id`
    pub fn set_world(&mut self, id: PartId, matrix: Mat4) {
        match self.world.get_mut(id.index()) {
            Some(slot) => *slot = matrix.transpose(),
            None => tracing::warn!(
                "part {} outside transform table capacity {}",
                id,
                TRANSFORM_TABLE_CAPACITY
            ),
        }
    }

    /// World matrix of `id` in column-vector form
    pub fn world(&self, id: PartId) -> Option<Mat4> {
        self.world.get(id.index()).map(Mat4::transpose)
    }

    pub fn set_view(&mut self, matrix: Mat4) {
        self.view = matrix.transpose();
    }

    /// View matrix in column-vector form
    pub fn view(&self) -> Mat4 {
        self.view.transpose()
    }

    /// Stored (transposed) world slots
    pub fn slots(&self) -> &[Mat4; TRANSFORM_TABLE_CAPACITY] {
        &self.world
    }
}

/// Shader constant block for one frame (800 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct FrameConstants {
    pub world: [Mat4; TRANSFORM_TABLE_CAPACITY],
    pub view: Mat4,
    pub proj: Mat4,
    pub light_color: [f32; 4],
    pub light_direction: [f32; 4],
}

impl FrameConstants {
    /// Assemble from a table and a column-vector projection matrix
    pub fn new(
        table: &TransformTable,
        proj: Mat4,
        light_color: [f32; 4],
        light_direction: [f32; 4],
    ) -> Self {
        Self {
            world: table.world,
            view: table.view,
            proj: proj.transpose(),
            light_color,
            light_direction,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
