use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::trace;

/// Interleaved plane vertex: object-space position plus texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Default)]
struct StoreInner {
    live: BTreeSet<u64>,
    next_id: u64,
}

/// Bookkeeping for live geometry resources.
///
/// Every [`PlaneGeometry`] registers an id on creation and releases it when
/// rebuilt or dropped, so the store can tell exactly which geometries are
/// still alive. Ids double as generations for GPU buffer invalidation.
#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plane(&self, width: f32, height: f32) -> PlaneGeometry {
        let id = self.register();
        PlaneGeometry {
            id,
            width,
            height,
            store: self.clone(),
        }
    }

    pub fn live(&self) -> usize {
        self.inner.borrow().live.len()
    }

    pub fn is_live(&self, id: u64) -> bool {
        self.inner.borrow().live.contains(&id)
    }

    fn register(&self) -> u64 {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.live.insert(id);
        id
    }

    fn release(&self, id: u64) {
        if self.inner.borrow_mut().live.remove(&id) {
            trace!(id, "geometry released");
        }
    }
}

/// Flat `width x height` rectangle centred on the origin in the XY plane,
/// facing +Z, one segment each way.
#[derive(Debug)]
pub struct PlaneGeometry {
    id: u64,
    width: f32,
    height: f32,
    store: GeometryStore,
}

impl PlaneGeometry {
    pub const INDICES: [u16; 6] = [0, 2, 1, 2, 3, 1];

    /// Releases the current geometry and installs a new one of the given size.
    /// The old id is dead before the new id exists.
    pub fn rebuild(&mut self, width: f32, height: f32) {
        self.store.release(self.id);
        self.id = self.store.register();
        self.width = width;
        self.height = height;
    }

    pub fn generation(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Top-left, top-right, bottom-left, bottom-right; uv (0, 0) is bottom-left.
    pub fn vertices(&self) -> [Vertex; 4] {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        [
            Vertex {
                position: [-half_w, half_h, 0.0],
                uv: [0.0, 1.0],
            },
            Vertex {
                position: [half_w, half_h, 0.0],
                uv: [1.0, 1.0],
            },
            Vertex {
                position: [-half_w, -half_h, 0.0],
                uv: [0.0, 0.0],
            },
            Vertex {
                position: [half_w, -half_h, 0.0],
                uv: [1.0, 0.0],
            },
        ]
    }

    pub fn indices(&self) -> &'static [u16] {
        &Self::INDICES
    }
}

impl Drop for PlaneGeometry {
    fn drop(&mut self) {
        self.store.release(self.id);
    }
}
