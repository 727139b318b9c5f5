//! Resource descriptor list consumed by the texture registry at start-up.
//!
//! Each descriptor names a resource, declares whether it is a flat texture or
//! a six-face cube texture, and points at the file(s) relative to the assets
//! root. The registry publishes decoded results under `name`.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name under which the earth map texture is published.
pub const EARTH_TEXTURE: &str = "earthTexture";
/// Name under which the environment cube map is published.
pub const ENVIRONMENT_MAP_TEXTURE: &str = "environmentMapTexture";

/// Cube faces in +X, -X, +Y, -Y, +Z, -Z order.
pub const CUBE_FACE_STEMS: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub kind: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceKind {
    Texture { path: PathBuf },
    CubeTexture { path: [PathBuf; 6] },
}

impl SourceDescriptor {
    pub fn texture(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::Texture { path: path.into() },
        }
    }

    pub fn cube_texture(name: impl Into<String>, faces: [PathBuf; 6]) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::CubeTexture { path: faces },
        }
    }

    /// Every file this descriptor needs, in declaration order.
    pub fn paths(&self) -> Vec<&PathBuf> {
        match &self.kind {
            SourceKind::Texture { path } => vec![path],
            SourceKind::CubeTexture { path } => path.iter().collect(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            SourceKind::Texture { .. } => "texture",
            SourceKind::CubeTexture { .. } => "cubeTexture",
        }
    }
}

/// The scene's shipped resources: the environment cube map, then the earth map.
pub fn default_sources() -> Vec<SourceDescriptor> {
    let faces = CUBE_FACE_STEMS
        .map(|stem| PathBuf::from(format!("textures/environmentMap/{stem}.jpg")));
    vec![
        SourceDescriptor::cube_texture(ENVIRONMENT_MAP_TEXTURE, faces),
        SourceDescriptor::texture(EARTH_TEXTURE, "textures/earthMap/chart (7).png"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize, Serialize)]
    struct Wrapper {
        sources: Vec<SourceDescriptor>,
    }

    #[test]
    fn default_list_keeps_declaration_order() {
        let sources = default_sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, ENVIRONMENT_MAP_TEXTURE);
        assert_eq!(sources[0].type_name(), "cubeTexture");
        assert_eq!(sources[0].paths().len(), 6);
        assert_eq!(
            sources[0].paths()[1],
            &PathBuf::from("textures/environmentMap/nx.jpg")
        );
        assert_eq!(sources[1].name, EARTH_TEXTURE);
        assert_eq!(sources[1].type_name(), "texture");
    }

    #[test]
    fn parses_tagged_descriptors() {
        let wrapper: Wrapper = toml::from_str(
            r#"
[[sources]]
name = "sky"
type = "cubeTexture"
path = ["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg", "f.jpg"]

[[sources]]
name = "map"
type = "texture"
path = "map.png"
"#,
        )
        .expect("parse sources");
        assert_eq!(wrapper.sources[0].type_name(), "cubeTexture");
        assert_eq!(
            wrapper.sources[1],
            SourceDescriptor::texture("map", "map.png")
        );
    }

    #[test]
    fn cube_texture_requires_six_faces() {
        let result: Result<Wrapper, _> = toml::from_str(
            r#"
[[sources]]
name = "sky"
type = "cubeTexture"
path = ["a.jpg", "b.jpg"]
"#,
        );
        assert!(result.is_err());
    }
}
