//! Windowed presentation of the earth map scene.
//!
//! The renderer owns a `winit` window and a `wgpu` surface, drives the
//! [`earthmap::World`] once per redraw and draws the fading plane with the
//! GLSL program the scene supplies. Everything scene-specific lives in the
//! `earthmap` crate; this crate only uploads and draws.

mod camera;
mod compile;
mod gpu;
mod types;
mod window;

use anyhow::Result;

pub use camera::Camera;
pub use types::{Antialiasing, ColorSpaceMode, ViewerConfig};

/// Entry point that owns the chosen configuration.
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Opens the window and runs until it is closed.
    pub fn run(self) -> Result<()> {
        tracing::info!(
            width = self.config.surface_size.0,
            height = self.config.surface_size.1,
            antialiasing = ?self.config.antialiasing,
            color_space = ?self.config.color_space,
            "starting viewer"
        );
        window::run(self.config)
    }
}
