use sceneconfig::EARTH_TEXTURE;
use thiserror::Error;
use tracing::{debug, info};

use crate::context::{SceneContext, Sizes, Time};
use crate::debug::{DebugError, DebugFolder, DebugPanel};
use crate::geometry::GeometryStore;
use crate::material::Material;
use crate::params::FadeParameters;
use crate::registry::Resources;
use crate::surface::{Placement, SurfaceNode};
use crate::transition::{TransitionController, TransitionSchedule};

#[derive(Debug, Error)]
pub enum EarthMapError {
    #[error("texture `{0}` is not among the loaded resources")]
    MissingTexture(&'static str),
}

/// The textured plane with its reveal transition and optional debug bindings.
#[derive(Debug)]
pub struct EarthMap {
    surface: SurfaceNode,
    transition: TransitionController,
    debug: Option<DebugPanel>,
}

impl EarthMap {
    /// Builds the mesh and starts the reveal right away.
    pub fn new(
        context: &SceneContext,
        resources: &Resources,
        store: &GeometryStore,
    ) -> Result<Self, EarthMapError> {
        let config = &context.config;
        let texture = resources
            .texture(EARTH_TEXTURE)
            .ok_or(EarthMapError::MissingTexture(EARTH_TEXTURE))?;

        let params = FadeParameters::initial(&config.transition, &config.material);
        let material = Material::earth_map(texture, params);
        let placement = Placement::from_config(&config.placement);
        let mut surface = SurfaceNode::new(store, context.sizes.aspect(), material, placement);

        let mut transition =
            TransitionController::new(TransitionSchedule::reveal(&config.transition));
        transition.start(&mut surface.material_mut().params);

        let debug = context.debug.then(|| {
            let mut panel = DebugPanel::new();
            panel.add_folder(DebugFolder::earth_map());
            panel
        });

        let debug_enabled = debug.is_some();
        info!(
            aspect = context.sizes.aspect(),
            debug = debug_enabled,
            "earth map ready"
        );
        Ok(Self {
            surface,
            transition,
            debug,
        })
    }

    /// Advances the reveal by `time.delta`, then stamps `time.elapsed` on the
    /// material.
    pub fn update(&mut self, time: &Time) {
        self.transition
            .tick(time.delta, &mut self.surface.material_mut().params);
        self.surface.update(time.elapsed);
    }

    pub fn resize(&mut self, sizes: &Sizes) {
        self.surface.resize(sizes.aspect());
    }

    /// Applies a tuning edit; returns the value after clamping and snapping.
    pub fn apply_debug(&mut self, path: &str, value: f32) -> Result<f32, DebugError> {
        let panel = self.debug.as_ref().ok_or(DebugError::Inactive)?;
        let applied = panel.apply(&mut self.surface, path, value)?;
        debug!(path, requested = value, applied, "debug edit");
        Ok(applied)
    }

    /// Current value behind every debug binding, keyed by path.
    pub fn debug_values(&self) -> Vec<(String, f32)> {
        let Some(panel) = &self.debug else {
            return Vec::new();
        };
        panel
            .paths()
            .into_iter()
            .map(|(path, binding)| (path, binding.target.read(&self.surface)))
            .collect()
    }

    pub fn surface(&self) -> &SurfaceNode {
        &self.surface
    }

    pub fn params(&self) -> &FadeParameters {
        &self.surface.material().params
    }

    pub fn transition(&self) -> &TransitionController {
        &self.transition
    }

    pub fn debug_panel(&self) -> Option<&DebugPanel> {
        self.debug.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use sceneconfig::SceneConfig;

    use super::*;
    use crate::registry::TextureImage;
    use crate::transition::TransitionState;

    fn resources() -> Resources {
        Resources::new().with_texture(EARTH_TEXTURE, TextureImage::solid([40, 90, 160, 255]))
    }

    fn context(debug: bool) -> SceneContext {
        let mut config = SceneConfig::default();
        config.debug = debug;
        SceneContext::new(config, Sizes::new(1600, 900, 1.0))
    }

    #[test]
    fn construction_starts_reveal() {
        let store = GeometryStore::new();
        let map = EarthMap::new(&context(false), &resources(), &store).expect("earth map");
        assert_eq!(map.transition().state(), TransitionState::Running);
        assert_eq!(map.params().fade_start, 0.0);
        assert_eq!(map.params().max_distance, 0.24);
        assert_eq!(map.params().strength, 1.0);
        assert!(map.debug_panel().is_none());
        assert_eq!(store.live(), 1);
    }

    #[test]
    fn update_drives_transition_and_clock() {
        let store = GeometryStore::new();
        let map_context = context(false);
        let mut map = EarthMap::new(&map_context, &resources(), &store).expect("earth map");
        let mut time = Time::new(0.0);
        time.tick(1.25);
        map.update(&time);
        assert_eq!(map.params().time, 1.25);
        assert!((map.params().max_distance - 0.62).abs() < 1e-4);
        assert!((map.params().strength - 0.86).abs() < 1e-4);

        time.tick(5.0);
        map.update(&time);
        assert_eq!(map.transition().state(), TransitionState::Finished);
        assert!((map.params().max_distance - 1.0).abs() < 1e-6);
        assert!((map.params().strength - 0.72).abs() < 1e-6);
        assert_eq!(map.params().fade_start, 0.0);
    }

    #[test]
    fn resize_keeps_one_geometry() {
        let store = GeometryStore::new();
        let mut map = EarthMap::new(&context(false), &resources(), &store).expect("earth map");
        map.resize(&Sizes::new(800, 800, 2.0));
        assert_eq!(store.live(), 1);
        assert_eq!(map.surface().geometry().width(), 2.0);
    }

    #[test]
    fn debug_edits_need_active_panel() {
        let store = GeometryStore::new();
        let mut quiet = EarthMap::new(&context(false), &resources(), &store).expect("earth map");
        assert_eq!(
            quiet.apply_debug("Earth Map/Material/Strength", 0.5),
            Err(DebugError::Inactive)
        );

        let mut tuned = EarthMap::new(&context(true), &resources(), &store).expect("earth map");
        let applied = tuned
            .apply_debug("Earth Map/Material/Noise Speed", 1.0)
            .expect("edit");
        assert!((tuned.params().noise_speed - applied).abs() < 1e-6);
        assert_eq!(tuned.debug_values().len(), 12);
    }

    #[test]
    fn missing_texture_is_reported() {
        let store = GeometryStore::new();
        let err = EarthMap::new(&context(false), &Resources::new(), &store).unwrap_err();
        assert!(matches!(err, EarthMapError::MissingTexture(EARTH_TEXTURE)));
        assert_eq!(store.live(), 0);
    }
}
