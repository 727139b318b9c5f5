//! Developer tuning panel.
//!
//! The panel is a plain description of folders and numeric bindings; the
//! host decides how to present it (the CLI dumps it as JSON and accepts
//! `PATH=VALUE` overrides). Edits are clamped, snapped to the binding's step
//! and written straight through to the target, so the next frame sees them.
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::params::FadeField;
use crate::surface::SurfaceNode;

pub const EARTH_MAP_FOLDER: &str = "Earth Map";
pub const MATERIAL_FOLDER: &str = "Material";

#[derive(Debug, Error, PartialEq)]
pub enum DebugError {
    #[error("no debug binding at `{0}`")]
    UnknownBinding(String),
    #[error("value for `{path}` is not a finite number")]
    NotFinite { path: String },
    #[error("malformed override `{0}`, expected PATH=VALUE")]
    MalformedOverride(String),
    #[error("debug panel is not active")]
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(label)
    }
}

/// What a binding reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingTarget {
    Position { axis: Axis },
    Rotation { axis: Axis },
    Fade { field: FadeField },
}

impl BindingTarget {
    pub fn read(self, surface: &SurfaceNode) -> f32 {
        match self {
            BindingTarget::Position { axis } => surface.placement().position.get()[axis.index()],
            BindingTarget::Rotation { axis } => surface.placement().rotation.get()[axis.index()],
            BindingTarget::Fade { field } => surface.material().params.get(field),
        }
    }

    pub fn write(self, surface: &mut SurfaceNode, value: f32) {
        match self {
            BindingTarget::Position { axis } => {
                surface
                    .placement_mut()
                    .position
                    .update(|v| v[axis.index()] = value);
            }
            BindingTarget::Rotation { axis } => {
                surface
                    .placement_mut()
                    .rotation
                    .update(|v| v[axis.index()] = value);
            }
            BindingTarget::Fade { field } => surface.material_mut().params.set(field, value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericBinding {
    pub label: String,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub target: BindingTarget,
}

impl NumericBinding {
    pub fn new(label: impl Into<String>, min: f32, max: f32, step: f32, target: BindingTarget) -> Self {
        Self {
            label: label.into(),
            min,
            max,
            step,
            target,
        }
    }

    /// Clamp into `[min, max]` and snap to the nearest multiple of `step`.
    pub fn constrain(&self, value: f32) -> f32 {
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let snapped = (clamped / self.step).round() * self.step;
        snapped.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugFolder {
    pub title: String,
    pub expanded: bool,
    pub bindings: Vec<NumericBinding>,
    pub folders: Vec<DebugFolder>,
}

impl DebugFolder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            expanded: true,
            bindings: Vec::new(),
            folders: Vec::new(),
        }
    }

    pub fn binding(mut self, binding: NumericBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn collapsed(mut self) -> Self {
        self.expanded = false;
        self
    }

    pub fn folder(mut self, folder: DebugFolder) -> Self {
        self.folders.push(folder);
        self
    }

    /// Placement axes plus a "Material" sub-folder with every fade field.
    pub fn earth_map() -> Self {
        let mut folder = Self::new(EARTH_MAP_FOLDER).collapsed();
        for axis in Axis::ALL {
            folder = folder.binding(NumericBinding::new(
                format!("Position {axis}"),
                -10.0,
                10.0,
                0.01,
                BindingTarget::Position { axis },
            ));
        }
        for axis in Axis::ALL {
            folder = folder.binding(NumericBinding::new(
                format!("Rotation {axis}"),
                -PI,
                PI,
                0.01,
                BindingTarget::Rotation { axis },
            ));
        }

        let mut material = Self::new(MATERIAL_FOLDER).collapsed();
        for field in FadeField::ALL {
            let (label, max, step) = match field {
                FadeField::FadeStart => ("Fade Start", 1.0, 0.01),
                FadeField::MaxDistance => ("Max Distance", 1.0, 0.01),
                FadeField::Strength => ("Strength", 1.0, 0.01),
                FadeField::NoiseStrength => ("Noise Strength", 0.1, 0.001),
                FadeField::NoiseSpeed => ("Noise Speed", 4.0, 0.1),
                FadeField::MoveSpeed => ("Move Speed", 5.0, 0.1),
            };
            material = material.binding(NumericBinding::new(
                label,
                0.0,
                max,
                step,
                BindingTarget::Fade { field },
            ));
        }
        folder.folder(material)
    }

    fn find(&self, segments: &[&str]) -> Option<&NumericBinding> {
        match segments {
            [] => None,
            [label] => self
                .bindings
                .iter()
                .find(|binding| binding.label == *label),
            [title, rest @ ..] => self
                .folders
                .iter()
                .find(|folder| folder.title == *title)
                .and_then(|folder| folder.find(rest)),
        }
    }

    fn visit<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a NumericBinding)>) {
        let prefix = format!("{prefix}{}/", self.title);
        for binding in &self.bindings {
            out.push((format!("{prefix}{}", binding.label), binding));
        }
        for folder in &self.folders {
            folder.visit(&prefix, out);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebugPanel {
    pub folders: Vec<DebugFolder>,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&mut self, folder: DebugFolder) {
        self.folders.push(folder);
    }

    /// Looks a binding up by slash-separated path, e.g.
    /// `"Earth Map/Material/Fade Start"`.
    pub fn find(&self, path: &str) -> Option<&NumericBinding> {
        let segments: Vec<&str> = path.split('/').map(str::trim).collect();
        let (title, rest) = segments.split_first()?;
        self.folders
            .iter()
            .find(|folder| folder.title == *title)
            .and_then(|folder| folder.find(rest))
    }

    /// Every binding with its full path, depth first.
    pub fn paths(&self) -> Vec<(String, &NumericBinding)> {
        let mut out = Vec::new();
        for folder in &self.folders {
            folder.visit("", &mut out);
        }
        out
    }

    /// Constrains `value` for the binding at `path` and writes it to `surface`.
    pub fn apply(&self, surface: &mut SurfaceNode, path: &str, value: f32) -> Result<f32, DebugError> {
        if !value.is_finite() {
            return Err(DebugError::NotFinite {
                path: path.to_string(),
            });
        }
        let binding = self
            .find(path)
            .ok_or_else(|| DebugError::UnknownBinding(path.to_string()))?;
        let applied = binding.constrain(value);
        binding.target.write(surface, applied);
        Ok(applied)
    }
}

/// A `PATH=VALUE` edit supplied from outside the process.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverride {
    pub path: String,
    pub value: f32,
}

impl FromStr for DebugOverride {
    type Err = DebugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, value) = s
            .rsplit_once('=')
            .ok_or_else(|| DebugError::MalformedOverride(s.to_string()))?;
        let path = path.trim();
        if path.is_empty() {
            return Err(DebugError::MalformedOverride(s.to_string()));
        }
        let value = value
            .trim()
            .parse::<f32>()
            .map_err(|_| DebugError::MalformedOverride(s.to_string()))?;
        Ok(Self {
            path: path.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Vec3;

    use super::*;
    use crate::geometry::GeometryStore;
    use crate::material::Material;
    use crate::params::FadeParameters;
    use crate::registry::TextureImage;
    use crate::surface::Placement;

    fn panel() -> DebugPanel {
        let mut panel = DebugPanel::new();
        panel.add_folder(DebugFolder::earth_map());
        panel
    }

    fn surface(store: &GeometryStore) -> SurfaceNode {
        let material = Material::earth_map(
            Arc::new(TextureImage::solid([0, 0, 0, 255])),
            FadeParameters::default(),
        );
        SurfaceNode::new(store, 1.0, material, Placement::default())
    }

    #[test]
    fn earth_map_layout_matches_tuning_ranges() {
        let panel = panel();
        let noise = panel
            .find("Earth Map/Material/Noise Strength")
            .expect("noise binding");
        assert_eq!((noise.min, noise.max, noise.step), (0.0, 0.1, 0.001));
        let rotation = panel.find("Earth Map/Rotation Z").expect("rotation binding");
        assert_eq!(rotation.max, PI);
        assert_eq!(panel.paths().len(), 12);
        assert!(panel.find("Earth Map/Scale").is_none());
        assert!(panel.find("Material/Strength").is_none());
    }

    #[test]
    fn earth_map_folders_start_collapsed() {
        let folder = DebugFolder::earth_map();
        assert!(!folder.expanded);
        assert!(folder.folders.iter().all(|sub| !sub.expanded));
        assert!(DebugFolder::new("Scratch").expanded);
    }

    #[test]
    fn edits_clamp_and_snap() {
        let panel = panel();
        let store = GeometryStore::new();
        let mut surface = surface(&store);

        let applied = panel
            .apply(&mut surface, "Earth Map/Material/Strength", 1.7)
            .expect("apply");
        assert!((applied - 1.0).abs() < 1e-5);
        assert_eq!(surface.material().params.strength, applied);

        let applied = panel
            .apply(&mut surface, "Earth Map/Material/Move Speed", 2.34)
            .expect("apply");
        assert!((applied - 2.3).abs() < 1e-5);

        panel
            .apply(&mut surface, "Earth Map/Position Y", -0.5)
            .expect("apply");
        let position = surface.placement().position.get();
        assert!((position - Vec3::new(0.0, -0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn unknown_paths_and_nan_are_rejected() {
        let panel = panel();
        let store = GeometryStore::new();
        let mut surface = surface(&store);
        assert_eq!(
            panel.apply(&mut surface, "Earth Map/Opacity", 0.5),
            Err(DebugError::UnknownBinding("Earth Map/Opacity".into()))
        );
        assert!(matches!(
            panel.apply(&mut surface, "Earth Map/Position X", f32::NAN),
            Err(DebugError::NotFinite { .. })
        ));
    }

    #[test]
    fn parses_overrides() {
        let parsed: DebugOverride = "Earth Map/Material/Fade Start=0.3".parse().expect("parse");
        assert_eq!(parsed.path, "Earth Map/Material/Fade Start");
        assert_eq!(parsed.value, 0.3);
        assert!("Earth Map/Position X".parse::<DebugOverride>().is_err());
        assert!("=1".parse::<DebugOverride>().is_err());
        assert!("Earth Map/Position X=abc".parse::<DebugOverride>().is_err());
    }
}
