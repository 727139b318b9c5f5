use glam::{Mat4, Vec3};
use sceneconfig::CameraConfig;

/// Perspective camera looking down -Z from its configured position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    fov_y: f32,
    near: f32,
    far: f32,
    position: Vec3,
    aspect: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            fov_y: config.fov.to_radians(),
            near: config.near,
            far: config.far,
            position: Vec3::from_array(config.position),
            aspect: aspect.max(f32::EPSILON),
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect.max(f32::EPSILON);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    /// Depth mapped to `[0, 1]`, as wgpu expects.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn origin_projects_to_screen_centre() {
        let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
        let clip = camera.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn wider_aspect_shrinks_horizontal_extent() {
        let mut camera = Camera::new(&CameraConfig::default(), 1.0);
        let point = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let square = camera.view_projection() * point;
        camera.set_aspect(2.0);
        let wide = camera.view_projection() * point;
        assert!((wide.x / wide.w) < (square.x / square.w));
    }
}
