//! Scene configuration: the tuned constants of the earth map reveal, the
//! mesh placement, camera and floating helper settings, and the resource
//! descriptor list. Every section defaults to the shipped values, so a file
//! containing only `version = 1` reproduces the stock scene.
mod sources;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

pub use sources::{
    default_sources, SourceDescriptor, SourceKind, CUBE_FACE_STEMS, EARTH_TEXTURE,
    ENVIRONMENT_MAP_TEXTURE,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Interpolation curve applied to every step of the reveal schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    Linear,
    Smoothstep,
    /// Quadratic in/out (`power1.inOut`).
    QuadInOut,
    /// Cubic in/out (`power2.inOut`).
    #[default]
    CubicInOut,
}

impl FromStr for Easing {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "linear" | "none" | "power0" | "power0.inout" => Ok(Self::Linear),
            "smoothstep" => Ok(Self::Smoothstep),
            "quad.inout" | "power1.inout" | "ease-in-out" => Ok(Self::QuadInOut),
            "cubic.inout" | "power2.inout" => Ok(Self::CubicInOut),
            other => Err(format!("invalid easing '{other}'")),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::Smoothstep => f.write_str("smoothstep"),
            Easing::QuadInOut => f.write_str("power1.inOut"),
            Easing::CubicInOut => f.write_str("power2.inOut"),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(value: Easing) -> Self {
        value.to_string()
    }
}

/// A start/end pair written as `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Span {
    pub from: f32,
    pub to: f32,
}

impl Span {
    pub const fn new(from: f32, to: f32) -> Self {
        Self { from, to }
    }
}

impl From<[f32; 2]> for Span {
    fn from(value: [f32; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<Span> for [f32; 2] {
    fn from(value: Span) -> Self {
        [value.from, value.to]
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneConfig {
    pub version: u32,
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub material: MaterialConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub float: FloatConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceDescriptor>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransitionConfig {
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub duration: Duration,
    pub easing: Easing,
    pub fade_start_peak: f32,
    pub max_distance: Span,
    pub strength: Span,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: default_transition_duration(),
            easing: Easing::default(),
            fade_start_peak: 0.24,
            max_distance: Span::new(0.24, 1.0),
            strength: Span::new(1.0, 0.72),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub noise_strength: f32,
    pub noise_speed: f32,
    pub move_speed: f32,
    pub offset: [f32; 2],
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            noise_strength: 0.02,
            noise_speed: 0.5,
            move_speed: 1.0,
            offset: [0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub position: [f32; 3],
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: [f32; 3],
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            position: [-0.11, -0.2, 0.75],
            rotation: [-0.75, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FloatConfig {
    pub speed: f32,
    pub intensity: f32,
    pub rotation_intensity: f32,
}

impl Default for FloatConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            intensity: 2.0,
            rotation_intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 35.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 0.0, 3.0],
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            version: 1,
            assets_root: default_assets_root(),
            debug: false,
            transition: TransitionConfig::default(),
            material: MaterialConfig::default(),
            placement: PlacementConfig::default(),
            float: FloatConfig::default(),
            camera: CameraConfig::default(),
            sources: default_sources(),
        }
    }
}

fn default_assets_root() -> PathBuf {
    PathBuf::from("static")
}

fn default_transition_duration() -> Duration {
    Duration::from_secs_f32(2.5)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs_f64(v))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*duration).to_string())
}

fn check_unit(name: &str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{name} must lie within [0, 1], got {value}"
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

impl SceneConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SceneConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|err| ConfigError::Invalid(format!("failed to serialize config: {err}")))
    }

    pub fn source(&self, name: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|source| source.name == name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        let transition = &self.transition;
        if transition.duration.is_zero() {
            return Err(ConfigError::Invalid(
                "transition.duration must be greater than zero".into(),
            ));
        }
        check_unit("transition.fade_start_peak", transition.fade_start_peak)?;
        check_unit("transition.max_distance[0]", transition.max_distance.from)?;
        check_unit("transition.max_distance[1]", transition.max_distance.to)?;
        check_unit("transition.strength[0]", transition.strength.from)?;
        check_unit("transition.strength[1]", transition.strength.to)?;

        check_non_negative("material.noise_strength", self.material.noise_strength)?;
        check_non_negative("material.noise_speed", self.material.noise_speed)?;
        check_non_negative("material.move_speed", self.material.move_speed)?;

        check_non_negative("float.speed", self.float.speed)?;
        check_non_negative("float.intensity", self.float.intensity)?;
        check_non_negative("float.rotation_intensity", self.float.rotation_intensity)?;

        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov must lie within (0, 180) degrees, got {}",
                camera.fov
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }

        for (index, source) in self.sources.iter().enumerate() {
            if source.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "source #{index} has an empty name"
                )));
            }
            if self.sources[..index]
                .iter()
                .any(|earlier| earlier.name == source.name)
            {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' is declared more than once",
                    source.name
                )));
            }
            if source
                .paths()
                .iter()
                .any(|path| path.as_os_str().is_empty())
            {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' contains an empty path",
                    source.name
                )));
            }
        }

        Ok(())
    }
}
