//! Texture registry: decodes the declared resources on a worker thread and
//! publishes them once, all together, through a [`ReadySignal`].
//!
//! The signal is a one-shot channel. If any resource fails to load the error
//! is logged, the worker exits without sending, and the signal never fires;
//! hosts can observe that through [`ReadySignal::stalled`].
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, TryRecvError};
use image::imageops::flip_vertical_in_place;
use sceneconfig::{SourceDescriptor, SourceKind};
use tracing::{debug, error, info};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("resource file not found: {0}")]
    Missing(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cube texture '{name}' needs six square faces of equal size")]
    CubeMismatch { name: String },
    #[error("failed to spawn resource loader: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Decoded RGBA8 pixels in upload order (2D textures already flipped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureImage {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: color.to_vec(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mean RGBA in `[0, 1]`.
    pub fn average_color(&self) -> [f32; 4] {
        let mut sums = [0u64; 4];
        for texel in self.pixels.chunks_exact(4) {
            for (sum, channel) in sums.iter_mut().zip(texel) {
                *sum += u64::from(*channel);
            }
        }
        let count = (self.pixels.len() / 4).max(1) as f32;
        sums.map(|sum| sum as f32 / count / 255.0)
    }
}

/// Six faces in +X, -X, +Y, -Y, +Z, -Z order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeTexture {
    faces: [TextureImage; 6],
}

impl CubeTexture {
    pub fn new(faces: [TextureImage; 6]) -> Option<Self> {
        let size = faces[0].width;
        let uniform = faces
            .iter()
            .all(|face| face.width == size && face.height == size);
        uniform.then_some(Self { faces })
    }

    pub fn faces(&self) -> &[TextureImage; 6] {
        &self.faces
    }

    pub fn face_size(&self) -> u32 {
        self.faces[0].width
    }

    pub fn average_color(&self) -> [f32; 4] {
        let mut total = [0.0f32; 4];
        for face in &self.faces {
            for (sum, channel) in total.iter_mut().zip(face.average_color()) {
                *sum += channel;
            }
        }
        total.map(|sum| sum / 6.0)
    }
}

#[derive(Debug, Clone)]
pub enum Resource {
    Texture(Arc<TextureImage>),
    CubeTexture(Arc<CubeTexture>),
}

/// Decoded resources keyed by descriptor name.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    items: HashMap<String, Resource>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, resource: Resource) {
        self.items.insert(name.into(), resource);
    }

    pub fn with_texture(mut self, name: impl Into<String>, image: TextureImage) -> Self {
        self.insert(name, Resource::Texture(Arc::new(image)));
        self
    }

    pub fn with_cube_texture(mut self, name: impl Into<String>, cube: CubeTexture) -> Self {
        self.insert(name, Resource::CubeTexture(Arc::new(cube)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.items.get(name)
    }

    pub fn texture(&self, name: &str) -> Option<Arc<TextureImage>> {
        match self.items.get(name)? {
            Resource::Texture(image) => Some(Arc::clone(image)),
            Resource::CubeTexture(_) => None,
        }
    }

    pub fn cube_texture(&self, name: &str) -> Option<Arc<CubeTexture>> {
        match self.items.get(name)? {
            Resource::CubeTexture(cube) => Some(Arc::clone(cube)),
            Resource::Texture(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One-shot "resources ready" notification.
#[derive(Debug)]
pub struct ReadySignal {
    receiver: Receiver<Resources>,
    fired: bool,
    stalled: bool,
}

impl ReadySignal {
    /// A signal that resolves on the first poll with the given resources.
    pub fn resolved(resources: Resources) -> Self {
        let (sender, receiver) = bounded(1);
        // Capacity 1 and a fresh channel: the send cannot fail.
        let _ = sender.send(resources);
        Self::from_receiver(receiver)
    }

    fn from_receiver(receiver: Receiver<Resources>) -> Self {
        Self {
            receiver,
            fired: false,
            stalled: false,
        }
    }

    /// Returns the resources the first time they are available, `None` before
    /// that and forever after.
    pub fn poll(&mut self) -> Option<Resources> {
        if self.fired || self.stalled {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(resources) => {
                self.fired = true;
                Some(resources)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.stalled = true;
                None
            }
        }
    }

    /// Blocks up to `timeout` for the resources.
    pub fn wait(&mut self, timeout: Duration) -> Option<Resources> {
        if self.fired || self.stalled {
            return None;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(resources) => {
                self.fired = true;
                Some(resources)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.stalled = true;
                None
            }
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// The loader exited without publishing; the signal will never fire.
    pub fn stalled(&self) -> bool {
        self.stalled
    }
}

pub struct TextureRegistry;

impl TextureRegistry {
    /// Starts decoding `sources` (relative to `root`) in the background.
    pub fn load(
        root: impl Into<PathBuf>,
        sources: Vec<SourceDescriptor>,
    ) -> Result<ReadySignal, LoadError> {
        let root = root.into();
        let (sender, receiver) = bounded(1);
        thread::Builder::new()
            .name("earthmap-resources".into())
            .spawn(move || match Self::load_blocking(&root, &sources) {
                Ok(resources) => {
                    info!(count = resources.len(), "all resources loaded");
                    let _ = sender.send(resources);
                }
                Err(err) => {
                    error!(error = %err, root = %root.display(), "resource loading stopped");
                }
            })
            .map_err(LoadError::Spawn)?;
        Ok(ReadySignal::from_receiver(receiver))
    }

    pub fn load_blocking(root: &Path, sources: &[SourceDescriptor]) -> Result<Resources, LoadError> {
        let total = sources.len();
        let mut resources = Resources::new();
        for (index, source) in sources.iter().enumerate() {
            let resource = match &source.kind {
                SourceKind::Texture { path } => {
                    let mut image = decode_rgba(&root.join(path))?;
                    // uv (0, 0) samples the bottom-left corner of the picture.
                    flip_vertical_in_place(&mut image);
                    Resource::Texture(Arc::new(into_texture(image)))
                }
                SourceKind::CubeTexture { path } => {
                    let mut faces = Vec::with_capacity(6);
                    for face in path {
                        faces.push(into_texture(decode_rgba(&root.join(face))?));
                    }
                    let faces: [TextureImage; 6] =
                        faces.try_into().map_err(|_| LoadError::CubeMismatch {
                            name: source.name.clone(),
                        })?;
                    let cube = CubeTexture::new(faces).ok_or_else(|| LoadError::CubeMismatch {
                        name: source.name.clone(),
                    })?;
                    Resource::CubeTexture(Arc::new(cube))
                }
            };
            resources.insert(source.name.clone(), resource);
            debug!(
                name = %source.name,
                kind = source.type_name(),
                loaded = index + 1,
                total,
                "resource loaded"
            );
        }
        Ok(resources)
    }
}

fn decode_rgba(path: &Path) -> Result<image::RgbaImage, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }
    let image = image::open(path).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

fn into_texture(image: image::RgbaImage) -> TextureImage {
    let (width, height) = image.dimensions();
    TextureImage {
        width,
        height,
        pixels: image.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use sceneconfig::{CUBE_FACE_STEMS, EARTH_TEXTURE, ENVIRONMENT_MAP_TEXTURE};

    fn write_png(path: &Path, width: u32, height: u32, top: [u8; 4], bottom: [u8; 4]) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let image = RgbaImage::from_fn(width, height, |_, y| {
            if y < height / 2 {
                Rgba(top)
            } else {
                Rgba(bottom)
            }
        });
        image.save(path).unwrap();
    }

    fn sample_sources(root: &Path) -> Vec<SourceDescriptor> {
        let faces = CUBE_FACE_STEMS.map(|stem| PathBuf::from(format!("env/{stem}.png")));
        for face in &faces {
            write_png(&root.join(face), 4, 4, [0, 0, 255, 255], [0, 0, 255, 255]);
        }
        write_png(&root.join("map.png"), 2, 2, [255, 0, 0, 255], [0, 255, 0, 255]);
        vec![
            SourceDescriptor::cube_texture(ENVIRONMENT_MAP_TEXTURE, faces),
            SourceDescriptor::texture(EARTH_TEXTURE, "map.png"),
        ]
    }

    #[test]
    fn loads_textures_and_cube_maps() {
        let temp = tempfile::tempdir().unwrap();
        let sources = sample_sources(temp.path());
        let resources = TextureRegistry::load_blocking(temp.path(), &sources).expect("load");
        assert_eq!(resources.len(), 2);

        let map = resources.texture(EARTH_TEXTURE).expect("earth texture");
        assert_eq!((map.width(), map.height()), (2, 2));
        // Flipped: the picture's bottom (green) row comes first.
        assert_eq!(&map.pixels()[..4], &[0, 255, 0, 255]);

        let cube = resources
            .cube_texture(ENVIRONMENT_MAP_TEXTURE)
            .expect("environment map");
        assert_eq!(cube.face_size(), 4);
        assert_eq!(cube.average_color(), [0.0, 0.0, 1.0, 1.0]);
        assert!(resources.texture(ENVIRONMENT_MAP_TEXTURE).is_none());
    }

    #[test]
    fn missing_file_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let sources = vec![SourceDescriptor::texture(EARTH_TEXTURE, "nowhere.png")];
        let err = TextureRegistry::load_blocking(temp.path(), &sources).unwrap_err();
        assert!(matches!(err, LoadError::Missing(_)));
    }

    #[test]
    fn mismatched_cube_faces_are_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let faces = CUBE_FACE_STEMS.map(|stem| PathBuf::from(format!("{stem}.png")));
        for (index, face) in faces.iter().enumerate() {
            let size = if index == 3 { 8 } else { 4 };
            write_png(&temp.path().join(face), size, size, [1, 2, 3, 4], [1, 2, 3, 4]);
        }
        let sources = vec![SourceDescriptor::cube_texture("sky", faces)];
        let err = TextureRegistry::load_blocking(temp.path(), &sources).unwrap_err();
        assert!(matches!(err, LoadError::CubeMismatch { .. }));
    }

    #[test]
    fn background_load_fires_exactly_once() {
        let temp = tempfile::tempdir().unwrap();
        let sources = sample_sources(temp.path());
        let mut signal = TextureRegistry::load(temp.path(), sources).expect("spawn loader");
        let resources = signal.wait(Duration::from_secs(10)).expect("ready");
        assert_eq!(resources.len(), 2);
        assert!(signal.has_fired());
        assert!(signal.poll().is_none());
        assert!(!signal.stalled());
    }

    #[test]
    fn failed_load_stalls_without_firing() {
        let temp = tempfile::tempdir().unwrap();
        let sources = vec![SourceDescriptor::texture(EARTH_TEXTURE, "missing.png")];
        let mut signal = TextureRegistry::load(temp.path(), sources).expect("spawn loader");
        assert!(signal.wait(Duration::from_secs(10)).is_none());
        assert!(signal.stalled());
        assert!(!signal.has_fired());
        assert!(signal.poll().is_none());
    }

    #[test]
    fn resolved_signal_fires_on_first_poll() {
        let mut signal =
            ReadySignal::resolved(Resources::new().with_texture("a", TextureImage::solid([1; 4])));
        let first = signal.poll().expect("fires");
        assert!(first.texture("a").is_some());
        assert!(signal.poll().is_none());
    }

    #[test]
    fn rejects_mis_sized_pixel_buffers() {
        assert!(TextureImage::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(TextureImage::from_rgba(0, 2, vec![]).is_none());
        let image = TextureImage::from_rgba(1, 2, vec![255, 0, 0, 255, 0, 0, 0, 255]).unwrap();
        assert_eq!(image.average_color(), [0.5, 0.0, 0.0, 1.0]);
    }
}
