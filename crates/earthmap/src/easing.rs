use sceneconfig::Easing;

/// Time remapping applied to normalised tween progress.
pub trait Ease {
    /// Maps `t` (clamped to `[0, 1]`) onto the curve; `0 -> 0` and `1 -> 1`.
    fn sample(self, t: f32) -> f32;
}

impl Ease for Easing {
    fn sample(self, t: f32) -> f32 {
        let clamped = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => clamped,
            Easing::Smoothstep => clamped * clamped * (3.0 - 2.0 * clamped),
            Easing::QuadInOut => {
                if clamped < 0.5 {
                    2.0 * clamped * clamped
                } else {
                    -1.0 + (4.0 - 2.0 * clamped) * clamped
                }
            }
            Easing::CubicInOut => {
                if clamped < 0.5 {
                    4.0 * clamped * clamped * clamped
                } else {
                    let inv = -2.0 * clamped + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}
