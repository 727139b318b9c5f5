use glam::{EulerRot, Mat4, Quat, Vec3};
use sceneconfig::PlacementConfig;
use tracing::debug;

use crate::geometry::{GeometryStore, PlaneGeometry};
use crate::material::Material;
use crate::observable::Observable;

/// Mesh transform; rotation is Euler radians applied in XYZ order.
#[derive(Debug, Default)]
pub struct Placement {
    pub position: Observable<Vec3>,
    pub rotation: Observable<Vec3>,
}

impl Placement {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position: Observable::new(position),
            rotation: Observable::new(rotation),
        }
    }

    pub fn from_config(config: &PlacementConfig) -> Self {
        Self::new(
            Vec3::from_array(config.position),
            Vec3::from_array(config.rotation),
        )
    }

    /// Moves whenever position or rotation changes; equal revisions mean an
    /// equal `model_matrix`.
    pub fn revision(&self) -> u64 {
        self.position.revision() + self.rotation.revision()
    }

    pub fn model_matrix(&self) -> Mat4 {
        let rotation = self.rotation.get();
        let orientation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
        Mat4::from_rotation_translation(orientation, self.position.get())
    }
}

/// The plane mesh: one geometry, one material, one placement.
#[derive(Debug)]
pub struct SurfaceNode {
    geometry: PlaneGeometry,
    material: Material,
    placement: Placement,
}

impl SurfaceNode {
    pub fn new(store: &GeometryStore, aspect: f32, material: Material, placement: Placement) -> Self {
        let (width, height) = plane_extent(aspect);
        Self {
            geometry: store.plane(width, height),
            material,
            placement,
        }
    }

    /// Swaps in a `(aspect * 2, 2)` plane; the previous geometry is released
    /// first.
    pub fn resize(&mut self, aspect: f32) {
        let (width, height) = plane_extent(aspect);
        self.geometry.rebuild(width, height);
        debug!(width, height, generation = self.geometry.generation(), "surface resized");
    }

    /// Per-frame hook. Only the material's clock is touched.
    pub fn update(&mut self, time: f32) {
        self.material.params.time = time;
    }

    pub fn geometry(&self) -> &PlaneGeometry {
        &self.geometry
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }
}

fn plane_extent(aspect: f32) -> (f32, f32) {
    (aspect * 2.0, 2.0)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;
    use std::sync::Arc;

    use super::*;
    use crate::params::FadeParameters;
    use crate::registry::TextureImage;

    fn node(store: &GeometryStore, aspect: f32) -> SurfaceNode {
        let material = Material::earth_map(
            Arc::new(TextureImage::solid([255, 255, 255, 255])),
            FadeParameters::default(),
        );
        SurfaceNode::new(store, aspect, material, Placement::default())
    }

    #[test]
    fn resize_leaves_single_live_geometry() {
        let store = GeometryStore::new();
        let mut surface = node(&store, 1.0);
        let initial = surface.geometry().generation();
        surface.resize(16.0 / 9.0);
        surface.resize(1.5);
        assert_eq!(store.live(), 1);
        assert!(!store.is_live(initial));
        assert_eq!(surface.geometry().width(), 3.0);
        assert_eq!(surface.geometry().height(), 2.0);
    }

    #[test]
    fn update_only_touches_time() {
        let store = GeometryStore::new();
        let mut surface = node(&store, 1.0);
        let before = surface.material().params;
        surface.update(7.25);
        let after = surface.material().params;
        assert_eq!(after.time, 7.25);
        assert_eq!(FadeParameters { time: before.time, ..after }, before);
    }

    #[test]
    fn revision_tracks_both_observables() {
        let mut placement = Placement::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(placement.revision(), 0);
        placement.position.update(|p| p.x = 1.0);
        placement.rotation.update(|r| r.z = 0.5);
        placement.rotation.set(Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(placement.revision(), 2);
    }

    #[test]
    fn model_matrix_rotates_x_first() {
        let placement = Placement::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(FRAC_PI_2, 0.0, 0.0));
        let matrix = placement.model_matrix();
        let up = matrix.transform_vector3(Vec3::Y);
        assert!((up - Vec3::Z).length() < 1e-5);
        assert_eq!(matrix.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
    }
}
