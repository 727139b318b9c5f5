//! Scene model for the earth map reveal.
//!
//! A [`World`] waits for the texture registry to publish its resources, then
//! builds an [`EarthMap`]: a textured plane whose shader fades the image in
//! radially while a single-shot [`TransitionController`] eases the fade
//! parameters to their resting values. Nothing in this crate touches the GPU;
//! the renderer reads [`FadeParameters`] and the plane geometry every frame.
pub mod context;
pub mod debug;
pub mod earth;
pub mod easing;
pub mod edits;
pub mod environment;
pub mod float;
pub mod geometry;
pub mod material;
pub mod observable;
pub mod params;
pub mod registry;
pub mod shader;
pub mod surface;
pub mod transition;
pub mod world;

pub use context::{SceneContext, Sizes, Time};
pub use debug::{DebugError, DebugFolder, DebugOverride, DebugPanel, NumericBinding};
pub use earth::{EarthMap, EarthMapError};
pub use easing::Ease;
pub use edits::DebugEdits;
pub use environment::Environment;
pub use float::Float;
pub use geometry::{GeometryStore, PlaneGeometry, Vertex};
pub use material::{FilterMode, Material, TextureSampling, WrapMode};
pub use params::{FadeField, FadeParameters};
pub use registry::{
    CubeTexture, LoadError, ReadySignal, Resource, Resources, TextureImage, TextureRegistry,
};
pub use shader::{ShaderProgram, UniformValue};
pub use surface::{Placement, SurfaceNode};
pub use transition::{TransitionController, TransitionSchedule, TransitionState};
pub use world::{World, WorldState};
