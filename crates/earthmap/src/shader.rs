//! GLSL program for the earth map plane and the uniform contract it exposes.
//!
//! The vertex stage transforms the plane by `uViewProjection * uModel`; the
//! fragment stage samples `uTexture` and attenuates alpha with a radial fade
//! between `uFadeStart` and `uMaxDistance`, roughened by time-driven noise.
//! Uniforms are re-read on every draw; nothing here caches them.
use glam::Vec2;

use crate::params::{FadeField, FadeParameters};

pub const VERTEX_SOURCE: &str = include_str!("shaders/earth_map.vert");
pub const FRAGMENT_SOURCE: &str = include_str!("shaders/earth_map.frag");

pub const TEXTURE_UNIFORM: &str = "uTexture";
pub const OFFSET_UNIFORM: &str = "uOffset";
pub const TIME_UNIFORM: &str = "uTime";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

impl ShaderProgram {
    pub fn earth_map() -> Self {
        Self {
            vertex: VERTEX_SOURCE,
            fragment: FRAGMENT_SOURCE,
        }
    }

    /// Every scalar and vector uniform, by GLSL name, sampled from `params`.
    pub fn uniforms(&self, params: &FadeParameters) -> Vec<(&'static str, UniformValue)> {
        let mut values: Vec<_> = FadeField::ALL
            .iter()
            .map(|field| (field.uniform_name(), UniformValue::Float(params.get(*field))))
            .collect();
        values.push((OFFSET_UNIFORM, UniformValue::Vec2(params.offset)));
        values.push((TIME_UNIFORM, UniformValue::Float(params.time)));
        values
    }
}

impl Default for ShaderProgram {
    fn default() -> Self {
        Self::earth_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_declare_every_uniform() {
        let program = ShaderProgram::earth_map();
        for (name, _) in program.uniforms(&FadeParameters::default()) {
            assert!(program.vertex.contains(name), "vertex stage missing {name}");
            assert!(program.fragment.contains(name), "fragment stage missing {name}");
        }
        assert!(program.fragment.contains(TEXTURE_UNIFORM));
    }

    #[test]
    fn uniforms_reflect_current_values() {
        let mut params = FadeParameters::default();
        params.time = 3.5;
        params.strength = 0.8;
        params.offset = Vec2::new(0.1, -0.2);
        let uniforms = ShaderProgram::earth_map().uniforms(&params);
        let lookup = |name| {
            uniforms
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, value)| *value)
        };
        assert_eq!(lookup("uTime"), Some(UniformValue::Float(3.5)));
        assert_eq!(lookup("uStrength"), Some(UniformValue::Float(0.8)));
        assert_eq!(
            lookup("uOffset"),
            Some(UniformValue::Vec2(Vec2::new(0.1, -0.2)))
        );
        assert_eq!(uniforms.len(), 8);
    }
}
