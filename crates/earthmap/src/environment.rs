use std::sync::Arc;

use sceneconfig::ENVIRONMENT_MAP_TEXTURE;
use tracing::{debug, warn};

use crate::registry::{CubeTexture, Resources};

const FALLBACK_BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Scene backdrop derived from the environment cube map.
#[derive(Debug, Clone)]
pub struct Environment {
    map: Option<Arc<CubeTexture>>,
    background: [f32; 4],
}

impl Environment {
    pub fn new(resources: &Resources) -> Self {
        match resources.cube_texture(ENVIRONMENT_MAP_TEXTURE) {
            Some(map) => {
                let [r, g, b, _] = map.average_color();
                debug!(r, g, b, "environment background");
                Self {
                    map: Some(map),
                    background: [r, g, b, 1.0],
                }
            }
            None => {
                warn!("`{ENVIRONMENT_MAP_TEXTURE}` missing, using a black background");
                Self {
                    map: None,
                    background: FALLBACK_BACKGROUND,
                }
            }
        }
    }

    pub fn map(&self) -> Option<&Arc<CubeTexture>> {
        self.map.as_ref()
    }

    /// Opaque clear colour in linear `[0, 1]` RGBA.
    pub fn background(&self) -> [f32; 4] {
        self.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TextureImage;

    #[test]
    fn background_averages_cube_faces() {
        let faces = [
            TextureImage::solid([255, 0, 0, 255]),
            TextureImage::solid([255, 0, 0, 255]),
            TextureImage::solid([0, 0, 255, 255]),
            TextureImage::solid([0, 0, 255, 255]),
            TextureImage::solid([0, 0, 255, 255]),
            TextureImage::solid([0, 0, 255, 255]),
        ];
        let cube = CubeTexture::new(faces).expect("uniform faces");
        let resources = Resources::new().with_cube_texture(ENVIRONMENT_MAP_TEXTURE, cube);
        let environment = Environment::new(&resources);
        let [r, g, b, a] = environment.background();
        assert!((r - 1.0 / 3.0).abs() < 1e-5);
        assert_eq!(g, 0.0);
        assert!((b - 2.0 / 3.0).abs() < 1e-5);
        assert_eq!(a, 1.0);
        assert!(environment.map().is_some());
    }

    #[test]
    fn missing_map_falls_back_to_black() {
        let environment = Environment::new(&Resources::new());
        assert_eq!(environment.background(), FALLBACK_BACKGROUND);
        assert!(environment.map().is_none());
    }
}
