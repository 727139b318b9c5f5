use glam::Mat4;
use tracing::{debug, error, info, warn};

use crate::context::{SceneContext, Sizes, Time};
use crate::earth::EarthMap;
use crate::edits::DebugEdits;
use crate::environment::Environment;
use crate::float::Float;
use crate::geometry::GeometryStore;
use crate::registry::{ReadySignal, Resources};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldState {
    Uninitialized,
    WaitingForResources,
    Ready,
}

/// Scene composer: waits for resources, then builds the environment and
/// the earth map. The float helper runs from the first frame.
#[derive(Debug)]
pub struct World {
    context: SceneContext,
    state: WorldState,
    store: GeometryStore,
    float: Float,
    environment: Option<Environment>,
    earth_map: Option<EarthMap>,
}

impl World {
    pub fn new(context: SceneContext) -> Self {
        let float = Float::new(&context.config.float);
        let mut world = Self {
            context,
            state: WorldState::Uninitialized,
            store: GeometryStore::new(),
            float,
            environment: None,
            earth_map: None,
        };
        world.state = WorldState::WaitingForResources;
        world
    }

    /// Delivers the ready event if the loader has published.
    pub fn poll(&mut self, signal: &mut ReadySignal) -> bool {
        match signal.poll() {
            Some(resources) => {
                self.on_ready(resources);
                true
            }
            None => false,
        }
    }

    /// Builds the scene contents. Only the first call has any effect.
    pub fn on_ready(&mut self, resources: Resources) {
        if self.state != WorldState::WaitingForResources {
            warn!(state = ?self.state, "resources ready fired again; ignoring");
            return;
        }
        self.state = WorldState::Ready;
        self.environment = Some(Environment::new(&resources));
        match EarthMap::new(&self.context, &resources, &self.store) {
            Ok(map) => self.earth_map = Some(map),
            Err(err) => error!("earth map unavailable: {err}"),
        }
        info!(resources = resources.len(), "world ready");
    }

    /// Applies every queued debug edit to the earth map. Edits that arrive
    /// before the map exists stay queued. Returns how many were applied.
    pub fn apply_debug_edits(&mut self, edits: &DebugEdits) -> usize {
        let Some(map) = self.earth_map.as_mut() else {
            return 0;
        };
        let mut applied = 0;
        for edit in edits.drain() {
            match map.apply_debug(&edit.path, edit.value) {
                Ok(value) => {
                    info!(path = %edit.path, value, "debug edit applied");
                    applied += 1;
                }
                Err(err) => warn!("debug edit ignored: {err}"),
            }
        }
        applied
    }

    pub fn update(&mut self, time: &Time) {
        self.context.time = *time;
        self.float.update(time.elapsed);
        if let Some(map) = &mut self.earth_map {
            map.update(time);
        }
    }

    /// Forwards a new surface size. Zero-area sizes (a minimised window) are
    /// ignored so the plane keeps its last good extent.
    pub fn resize(&mut self, sizes: &Sizes) {
        if sizes.is_empty() {
            debug!(width = sizes.width, height = sizes.height, "ignoring empty resize");
            return;
        }
        self.context.sizes = *sizes;
        if let Some(map) = &mut self.earth_map {
            map.resize(sizes);
        }
    }

    pub fn state(&self) -> WorldState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == WorldState::Ready
    }

    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    pub fn geometry_store(&self) -> &GeometryStore {
        &self.store
    }

    pub fn root_transform(&self) -> Mat4 {
        self.float.transform()
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    pub fn earth_map(&self) -> Option<&EarthMap> {
        self.earth_map.as_ref()
    }

    pub fn earth_map_mut(&mut self) -> Option<&mut EarthMap> {
        self.earth_map.as_mut()
    }
}
