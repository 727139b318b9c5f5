use std::sync::Arc;

use glam::Vec2;

use crate::params::FadeParameters;
use crate::registry::TextureImage;
use crate::shader::ShaderProgram;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
}

/// How the earth texture is sampled: pixel-art friendly nearest filtering
/// with repeat wrapping so the scrolling uv stays continuous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureSampling {
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub repeat: Vec2,
}

impl Default for TextureSampling {
    fn default() -> Self {
        Self {
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Nearest,
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            repeat: Vec2::ONE,
        }
    }
}

/// Shader program, texture and live fade parameters for the earth map mesh.
#[derive(Debug, Clone)]
pub struct Material {
    pub program: ShaderProgram,
    pub texture: Arc<TextureImage>,
    pub sampling: TextureSampling,
    pub params: FadeParameters,
    pub transparent: bool,
    pub double_sided: bool,
}

impl Material {
    pub fn earth_map(texture: Arc<TextureImage>, params: FadeParameters) -> Self {
        Self {
            program: ShaderProgram::earth_map(),
            texture,
            sampling: TextureSampling::default(),
            params,
            transparent: true,
            double_sided: true,
        }
    }
}
