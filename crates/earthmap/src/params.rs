use std::fmt;

use glam::Vec2;
use sceneconfig::{MaterialConfig, TransitionConfig};
use serde::Serialize;

/// Live shader inputs for the earth map material.
///
/// The transition controller writes the fade fields while its schedule runs,
/// the surface node writes `time` once per frame, and the render pass reads
/// every field on each draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FadeParameters {
    pub fade_start: f32,
    pub max_distance: f32,
    pub strength: f32,
    pub noise_strength: f32,
    pub noise_speed: f32,
    pub move_speed: f32,
    pub offset: Vec2,
    pub time: f32,
}

impl FadeParameters {
    /// Values before the reveal has advanced: the fade boundary collapsed at
    /// the centre and full fade strength.
    pub fn initial(transition: &TransitionConfig, material: &MaterialConfig) -> Self {
        Self {
            fade_start: 0.0,
            max_distance: transition.max_distance.from,
            strength: transition.strength.from,
            noise_strength: material.noise_strength,
            noise_speed: material.noise_speed,
            move_speed: material.move_speed,
            offset: Vec2::from_array(material.offset),
            time: 0.0,
        }
    }

    pub fn get(&self, field: FadeField) -> f32 {
        match field {
            FadeField::FadeStart => self.fade_start,
            FadeField::MaxDistance => self.max_distance,
            FadeField::Strength => self.strength,
            FadeField::NoiseStrength => self.noise_strength,
            FadeField::NoiseSpeed => self.noise_speed,
            FadeField::MoveSpeed => self.move_speed,
        }
    }

    pub fn set(&mut self, field: FadeField, value: f32) {
        let slot = match field {
            FadeField::FadeStart => &mut self.fade_start,
            FadeField::MaxDistance => &mut self.max_distance,
            FadeField::Strength => &mut self.strength,
            FadeField::NoiseStrength => &mut self.noise_strength,
            FadeField::NoiseSpeed => &mut self.noise_speed,
            FadeField::MoveSpeed => &mut self.move_speed,
        };
        *slot = value;
    }
}

impl Default for FadeParameters {
    fn default() -> Self {
        Self::initial(&TransitionConfig::default(), &MaterialConfig::default())
    }
}

/// Scalar fields of [`FadeParameters`] that tweens and debug bindings target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeField {
    FadeStart,
    MaxDistance,
    Strength,
    NoiseStrength,
    NoiseSpeed,
    MoveSpeed,
}

impl FadeField {
    pub const ALL: [FadeField; 6] = [
        FadeField::FadeStart,
        FadeField::MaxDistance,
        FadeField::Strength,
        FadeField::NoiseStrength,
        FadeField::NoiseSpeed,
        FadeField::MoveSpeed,
    ];

    /// Shader uniform fed by this field.
    pub fn uniform_name(self) -> &'static str {
        match self {
            FadeField::FadeStart => "uFadeStart",
            FadeField::MaxDistance => "uMaxDistance",
            FadeField::Strength => "uStrength",
            FadeField::NoiseStrength => "uNoiseStrength",
            FadeField::NoiseSpeed => "uNoiseSpeed",
            FadeField::MoveSpeed => "uMoveSpeed",
        }
    }
}

impl fmt::Display for FadeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FadeField::FadeStart => "fade_start",
            FadeField::MaxDistance => "max_distance",
            FadeField::Strength => "strength",
            FadeField::NoiseStrength => "noise_strength",
            FadeField::NoiseSpeed => "noise_speed",
            FadeField::MoveSpeed => "move_speed",
        };
        f.write_str(name)
    }
}
