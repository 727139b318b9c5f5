use bytemuck::{Pod, Zeroable};
use earthmap::{Placement, UniformValue};
use glam::Mat4;

/// Host copy of the `EarthMapParams` std140 block.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FadeUniforms {
    pub view_projection: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub fade_start: f32,
    pub max_distance: f32,
    pub strength: f32,
    pub noise_strength: f32,
    pub noise_speed: f32,
    pub move_speed: f32,
    pub offset: [f32; 2],
    pub time: f32,
    pub _padding: [f32; 3],
}

unsafe impl Zeroable for FadeUniforms {}
unsafe impl Pod for FadeUniforms {}

impl FadeUniforms {
    pub fn new() -> Self {
        Self::zeroed()
    }

    pub fn set_matrices(&mut self, view_projection: Mat4, model: Mat4) {
        self.view_projection = view_projection.to_cols_array_2d();
        self.model = model.to_cols_array_2d();
    }

    /// Copies the program's named uniforms into the block. Names the block
    /// does not carry are skipped.
    pub fn set_uniforms(&mut self, uniforms: &[(&str, UniformValue)]) {
        for (name, value) in uniforms {
            match (*name, *value) {
                ("uFadeStart", UniformValue::Float(v)) => self.fade_start = v,
                ("uMaxDistance", UniformValue::Float(v)) => self.max_distance = v,
                ("uStrength", UniformValue::Float(v)) => self.strength = v,
                ("uNoiseStrength", UniformValue::Float(v)) => self.noise_strength = v,
                ("uNoiseSpeed", UniformValue::Float(v)) => self.noise_speed = v,
                ("uMoveSpeed", UniformValue::Float(v)) => self.move_speed = v,
                ("uOffset", UniformValue::Vec2(v)) => self.offset = v.to_array(),
                ("uTime", UniformValue::Float(v)) => self.time = v,
                _ => tracing::trace!(uniform = *name, "uniform not in block"),
            }
        }
    }
}

/// Placement matrix rebuilt only when the placement revision moves.
#[derive(Debug, Default)]
pub(crate) struct ModelCache {
    revision: Option<u64>,
    matrix: Mat4,
}

impl ModelCache {
    pub fn model_matrix(&mut self, placement: &Placement) -> Mat4 {
        let revision = placement.revision();
        if self.revision != Some(revision) {
            self.matrix = placement.model_matrix();
            self.revision = Some(revision);
        }
        self.matrix
    }
}
