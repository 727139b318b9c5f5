//! Headless views of the scene: the sampled reveal timeline and the debug
//! panel layout, both as JSON on stdout.
use std::io::Write;

use anyhow::{Context, Result};
use earthmap::{
    DebugFolder, DebugPanel, FadeParameters, TransitionController, TransitionSchedule,
    TransitionState,
};
use sceneconfig::SceneConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineSample {
    pub frame: u32,
    pub t: f32,
    pub fade_start: f32,
    pub max_distance: f32,
    pub strength: f32,
    pub finished: bool,
}

/// Runs the reveal at a fixed frame rate from t = 0 until it finishes.
pub fn sample_timeline(config: &SceneConfig, fps: f32) -> Vec<TimelineSample> {
    let mut params = FadeParameters::initial(&config.transition, &config.material);
    let mut controller =
        TransitionController::new(TransitionSchedule::reveal(&config.transition));
    controller.start(&mut params);

    let dt = 1.0 / fps;
    let mut samples = vec![sample(0, &controller, &params)];
    let mut frame = 0;
    while controller.is_running() {
        frame += 1;
        controller.tick(dt, &mut params);
        samples.push(sample(frame, &controller, &params));
    }
    samples
}

fn sample(frame: u32, controller: &TransitionController, params: &FadeParameters) -> TimelineSample {
    TimelineSample {
        frame,
        t: controller.elapsed().min(controller.duration()),
        fade_start: params.fade_start,
        max_distance: params.max_distance,
        strength: params.strength,
        finished: controller.state() == TransitionState::Finished,
    }
}

pub fn print_timeline(config: &SceneConfig, fps: f32) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for sample in sample_timeline(config, fps) {
        let line = serde_json::to_string(&sample).context("failed to encode timeline sample")?;
        writeln!(out, "{line}")?;
    }
    Ok(())
}

pub fn debug_panel() -> DebugPanel {
    let mut panel = DebugPanel::new();
    panel.add_folder(DebugFolder::earth_map());
    panel
}

pub fn print_debug_panel() -> Result<()> {
    let json = serde_json::to_string_pretty(&debug_panel()).context("failed to encode panel")?;
    println!("{json}");
    Ok(())
}
