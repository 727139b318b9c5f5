use glam::{EulerRot, Mat4, Quat, Vec3};
use sceneconfig::FloatConfig;

/// Gentle bob-and-sway applied to the scene root.
#[derive(Debug, Clone, PartialEq)]
pub struct Float {
    pub speed: f32,
    pub float_intensity: f32,
    pub rotation_intensity: f32,
    rotation: Vec3,
    offset_y: f32,
}

impl Float {
    pub fn new(config: &FloatConfig) -> Self {
        Self {
            speed: config.speed,
            float_intensity: config.intensity,
            rotation_intensity: config.rotation_intensity,
            rotation: Vec3::ZERO,
            offset_y: 0.0,
        }
    }

    pub fn update(&mut self, elapsed: f32) {
        let t = elapsed / 4.0 * self.speed;
        self.rotation = Vec3::new(
            t.cos() / 8.0,
            t.sin() / 8.0,
            t.sin() / 20.0,
        ) * self.rotation_intensity;
        self.offset_y = t.sin() / 10.0 * self.float_intensity;
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    pub fn transform(&self) -> Mat4 {
        let orientation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(orientation, Vec3::new(0.0, self.offset_y, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_rest_offset() {
        let mut float = Float::new(&FloatConfig::default());
        float.update(0.0);
        assert_eq!(float.offset_y(), 0.0);
        assert!((float.rotation().x - 0.125 * float.rotation_intensity).abs() < 1e-6);
    }

    #[test]
    fn bob_stays_within_intensity() {
        let mut float = Float::new(&FloatConfig::default());
        for step in 0..2_000 {
            float.update(step as f32 * 0.5);
            assert!(float.offset_y().abs() <= float.float_intensity / 10.0 + 1e-6);
        }
    }

    #[test]
    fn zero_intensity_is_identity() {
        let mut float = Float::new(&FloatConfig {
            speed: 1.5,
            intensity: 0.0,
            rotation_intensity: 0.0,
        });
        float.update(12.0);
        assert_eq!(float.transform(), Mat4::IDENTITY);
    }
}
