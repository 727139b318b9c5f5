//! One-shot reveal transition for the earth map material.
//!
//! A [`TransitionSchedule`] is a set of [`Track`]s that all start at time zero.
//! Each track animates one [`FadeField`] through an ordered list of eased
//! [`Tween`]s. The [`TransitionController`] owns a schedule plus its elapsed
//! time and is advanced with [`TransitionController::tick`] once per frame;
//! every tick writes the sampled values straight into the live
//! [`FadeParameters`] before the frame is drawn.
//!
//! The reveal built by [`TransitionSchedule::reveal`] has three tracks over a
//! total envelope `D`:
//!
//! ```text
//!   fade_start    0 ──(D/2)──▶ peak ──(D/2)──▶ 0
//!   max_distance  from ─────────(D)─────────▶ to
//!   strength      from ─────────(D)─────────▶ to
//! ```
use sceneconfig::{Easing, TransitionConfig};
use tracing::{debug, info, warn};

use crate::easing::Ease;
use crate::params::{FadeField, FadeParameters};

/// A single eased interpolation step of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub field: FadeField,
    pub from: f32,
    pub to: f32,
    /// Seconds.
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    /// Value at `local` seconds after this step began.
    pub fn value_at(&self, local: f32) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let progress = self.easing.sample(local / self.duration);
        self.from + (self.to - self.from) * progress
    }
}

/// Sequential tweens against a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    field: FadeField,
    steps: Vec<Tween>,
}

impl Track {
    pub fn new(field: FadeField) -> Self {
        Self {
            field,
            steps: Vec::new(),
        }
    }

    /// Appends a step that starts when the previous one ends.
    pub fn then(mut self, from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        self.steps.push(Tween {
            field: self.field,
            from,
            to,
            duration: duration.max(0.0),
            easing,
        });
        self
    }

    pub fn field(&self) -> FadeField {
        self.field
    }

    pub fn steps(&self) -> &[Tween] {
        &self.steps
    }

    pub fn duration(&self) -> f32 {
        self.steps.iter().map(|step| step.duration).sum()
    }

    /// Holds the first `from` before the track starts and the last `to` after
    /// it ends.
    pub fn value_at(&self, t: f32) -> Option<f32> {
        let first = self.steps.first()?;
        if t <= 0.0 {
            return Some(first.from);
        }
        let mut start = 0.0;
        for step in &self.steps {
            let end = start + step.duration;
            if t < end {
                return Some(step.value_at(t - start));
            }
            start = end;
        }
        self.steps.last().map(|step| step.to)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionSchedule {
    tracks: Vec<Track>,
}

impl TransitionSchedule {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn reveal(config: &TransitionConfig) -> Self {
        let total = config.duration.as_secs_f32();
        let half = total / 2.0;
        let easing = config.easing;
        Self::new(vec![
            Track::new(FadeField::FadeStart)
                .then(0.0, config.fade_start_peak, half, easing)
                .then(config.fade_start_peak, 0.0, half, easing),
            Track::new(FadeField::MaxDistance).then(
                config.max_distance.from,
                config.max_distance.to,
                total,
                easing,
            ),
            Track::new(FadeField::Strength).then(
                config.strength.from,
                config.strength.to,
                total,
                easing,
            ),
        ])
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Length of the longest track in seconds.
    pub fn duration(&self) -> f32 {
        self.tracks
            .iter()
            .map(Track::duration)
            .fold(0.0, f32::max)
    }

    pub fn value_at(&self, field: FadeField, t: f32) -> Option<f32> {
        self.tracks
            .iter()
            .find(|track| track.field() == field)
            .and_then(|track| track.value_at(t))
    }

    /// Writes every tracked field sampled at `t`; untracked fields are left alone.
    pub fn apply(&self, t: f32, params: &mut FadeParameters) {
        for track in &self.tracks {
            if let Some(value) = track.value_at(t) {
                params.set(track.field(), value);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    Running,
    Finished,
    Cancelled,
}

/// Drives a [`TransitionSchedule`] against live parameters.
///
/// Single-shot: once started it cannot be restarted, paused or seeked. The
/// controller is owned by the earth map, so tearing the map down drops the
/// schedule and nothing writes into the discarded parameters afterwards.
#[derive(Debug, Clone)]
pub struct TransitionController {
    schedule: TransitionSchedule,
    elapsed: f32,
    state: TransitionState,
}

impl TransitionController {
    pub fn new(schedule: TransitionSchedule) -> Self {
        Self {
            schedule,
            elapsed: 0.0,
            state: TransitionState::Idle,
        }
    }

    pub fn start(&mut self, params: &mut FadeParameters) {
        if self.state != TransitionState::Idle {
            warn!(state = ?self.state, "transition already started; ignoring restart");
            return;
        }
        self.state = TransitionState::Running;
        self.elapsed = 0.0;
        self.schedule.apply(0.0, params);
        info!(
            duration = self.schedule.duration(),
            tracks = self.schedule.tracks().len(),
            "reveal transition started"
        );
    }

    /// Advances by `dt` seconds and writes the sampled values. Returns whether
    /// anything was written.
    pub fn tick(&mut self, dt: f32, params: &mut FadeParameters) -> bool {
        if self.state != TransitionState::Running {
            return false;
        }
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        let duration = self.schedule.duration();
        self.schedule.apply(self.elapsed.min(duration), params);
        if self.elapsed >= duration {
            self.state = TransitionState::Finished;
            info!(
                fade_start = params.fade_start,
                max_distance = params.max_distance,
                strength = params.strength,
                "reveal transition finished"
            );
        }
        true
    }

    /// Stops the schedule where it stands; parameters keep their last values.
    pub fn cancel(&mut self) {
        if self.state == TransitionState::Running || self.state == TransitionState::Idle {
            debug!(elapsed = self.elapsed, "reveal transition cancelled");
            self.state = TransitionState::Cancelled;
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TransitionState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == TransitionState::Finished
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.schedule.duration()
    }

    pub fn schedule(&self) -> &TransitionSchedule {
        &self.schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sceneconfig::Span;
    use std::time::Duration;

    const D: f32 = 2.5;
    const TOLERANCE: f32 = 1e-4;

    fn reveal() -> TransitionSchedule {
        TransitionSchedule::reveal(&TransitionConfig::default())
    }

    fn samples(steps: usize, end: f32) -> impl Iterator<Item = f32> {
        (0..=steps).map(move |step| end * step as f32 / steps as f32)
    }

    #[test]
    fn reveal_has_expected_timing_split() {
        let schedule = reveal();
        assert!((schedule.duration() - D).abs() < TOLERANCE);
        let tracks = schedule.tracks();
        assert_eq!(tracks.len(), 3);

        assert_eq!(tracks[0].field(), FadeField::FadeStart);
        assert_eq!(tracks[0].steps().len(), 2);
        assert!((tracks[0].steps()[0].duration - D / 2.0).abs() < TOLERANCE);
        assert!((tracks[0].steps()[1].duration - D / 2.0).abs() < TOLERANCE);

        for track in &tracks[1..] {
            assert_eq!(track.steps().len(), 1);
            assert!((track.duration() - D).abs() < TOLERANCE);
        }
    }

    #[test]
    fn fade_start_rises_then_falls() {
        let schedule = reveal();
        let mut last = 0.0;
        for t in samples(200, D / 2.0) {
            let value = schedule.value_at(FadeField::FadeStart, t).unwrap();
            assert!(value >= last - 1e-6, "fade_start dipped at {t}");
            last = value;
        }
        assert!((last - 0.24).abs() < TOLERANCE);
        for t in samples(200, D / 2.0).map(|t| t + D / 2.0) {
            let value = schedule.value_at(FadeField::FadeStart, t).unwrap();
            assert!(value <= last + 1e-6, "fade_start rose at {t}");
            last = value;
        }
        assert!(schedule.value_at(FadeField::FadeStart, D).unwrap().abs() < TOLERANCE);
    }

    #[test]
    fn max_distance_and_strength_are_monotonic() {
        let schedule = reveal();
        let mut last_distance = 0.0;
        let mut last_strength = f32::MAX;
        for t in samples(400, D) {
            let distance = schedule.value_at(FadeField::MaxDistance, t).unwrap();
            let strength = schedule.value_at(FadeField::Strength, t).unwrap();
            assert!(distance >= last_distance - 1e-6);
            assert!(strength <= last_strength + 1e-6);
            last_distance = distance;
            last_strength = strength;
        }
    }

    #[test]
    fn endpoints_match_configured_values() {
        let schedule = reveal();
        let at = |field, t| schedule.value_at(field, t).unwrap();
        assert_eq!(at(FadeField::FadeStart, 0.0), 0.0);
        assert!((at(FadeField::MaxDistance, 0.0) - 0.24).abs() < TOLERANCE);
        assert_eq!(at(FadeField::Strength, 0.0), 1.0);

        for t in [D, D + 0.5, 100.0] {
            assert!(at(FadeField::FadeStart, t).abs() < TOLERANCE);
            assert!((at(FadeField::MaxDistance, t) - 1.0).abs() < TOLERANCE);
            assert!((at(FadeField::Strength, t) - 0.72).abs() < TOLERANCE);
        }
        assert_eq!(schedule.value_at(FadeField::NoiseSpeed, 1.0), None);
    }

    #[test]
    fn midpoint_peaks_fade_start_and_halves_the_rest() {
        let schedule = reveal();
        let fade_start = schedule.value_at(FadeField::FadeStart, 1.25).unwrap();
        let distance = schedule.value_at(FadeField::MaxDistance, 1.25).unwrap();
        let strength = schedule.value_at(FadeField::Strength, 1.25).unwrap();
        assert!((fade_start - 0.24).abs() < 1e-3);
        assert!(distance > 0.24 && distance < 1.0);
        assert!(strength < 1.0 && strength > 0.72);
        // The in/out curve is symmetric, so the midpoint sits halfway.
        assert!((distance - 0.62).abs() < 1e-3);
        assert!((strength - 0.86).abs() < 1e-3);
    }

    #[test]
    fn controller_writes_on_each_tick_then_goes_inert() {
        let mut params = FadeParameters::default();
        params.fade_start = 0.9;
        let mut controller = TransitionController::new(reveal());
        controller.start(&mut params);
        assert!(controller.is_running());
        assert_eq!(params.fade_start, 0.0);

        let dt = 1.0 / 60.0;
        let mut frames = 0;
        while controller.tick(dt, &mut params) {
            frames += 1;
            assert!(frames < 1000, "transition never finished");
        }
        assert!(controller.is_finished());
        assert!(params.fade_start.abs() < TOLERANCE);
        assert!((params.max_distance - 1.0).abs() < TOLERANCE);
        assert!((params.strength - 0.72).abs() < TOLERANCE);
        assert!((149..=151).contains(&frames), "unexpected frame count {frames}");

        params.strength = 0.3;
        assert!(!controller.tick(dt, &mut params));
        assert_eq!(params.strength, 0.3);
    }

    #[test]
    fn controller_leaves_untracked_fields_alone() {
        let mut params = FadeParameters::default();
        params.time = 42.0;
        params.noise_speed = 3.0;
        let mut controller = TransitionController::new(reveal());
        controller.start(&mut params);
        controller.tick(0.5, &mut params);
        assert_eq!(params.time, 42.0);
        assert_eq!(params.noise_speed, 3.0);
    }

    #[test]
    fn controller_cannot_restart() {
        let mut params = FadeParameters::default();
        let mut controller = TransitionController::new(reveal());
        controller.start(&mut params);
        controller.tick(1.0, &mut params);
        let elapsed = controller.elapsed();
        controller.start(&mut params);
        assert_eq!(controller.elapsed(), elapsed);
        assert!(controller.is_running());
    }

    #[test]
    fn cancel_stops_further_writes() {
        let mut params = FadeParameters::default();
        let mut controller = TransitionController::new(reveal());
        controller.start(&mut params);
        controller.tick(0.5, &mut params);
        let snapshot = params;
        controller.cancel();
        assert_eq!(controller.state(), TransitionState::Cancelled);
        assert!(!controller.tick(0.5, &mut params));
        assert_eq!(params, snapshot);
    }

    #[test]
    fn ignores_negative_and_non_finite_deltas() {
        let mut params = FadeParameters::default();
        let mut controller = TransitionController::new(reveal());
        controller.start(&mut params);
        controller.tick(-1.0, &mut params);
        controller.tick(f32::NAN, &mut params);
        assert_eq!(controller.elapsed(), 0.0);
    }

    #[test]
    fn reveal_follows_custom_constants() {
        let config = TransitionConfig {
            duration: Duration::from_secs(4),
            easing: Easing::Linear,
            fade_start_peak: 0.5,
            max_distance: Span::new(0.1, 0.6),
            strength: Span::new(0.9, 0.1),
        };
        let schedule = TransitionSchedule::reveal(&config);
        assert!((schedule.duration() - 4.0).abs() < TOLERANCE);
        let at = |field, t| schedule.value_at(field, t).unwrap();
        assert!((at(FadeField::FadeStart, 1.0) - 0.25).abs() < TOLERANCE);
        assert!((at(FadeField::FadeStart, 2.0) - 0.5).abs() < TOLERANCE);
        assert!((at(FadeField::MaxDistance, 2.0) - 0.35).abs() < TOLERANCE);
        assert!((at(FadeField::Strength, 4.0) - 0.1).abs() < TOLERANCE);
    }
}
