use earthmap::DebugOverride;
use sceneconfig::SceneConfig;

/// Output color handling for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Gamma-encoded swapchain, matching how the texture was authored.
    #[default]
    Auto,
    /// Treat shader output as gamma-encoded; use non-sRGB surfaces.
    Gamma,
    /// Treat shader output as linear and let an sRGB swapchain convert it.
    Linear,
}

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    #[default]
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

/// Everything the viewer needs at start-up.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    pub antialiasing: Antialiasing,
    pub color_space: ColorSpaceMode,
    pub scene: SceneConfig,
    /// Debug edits applied once the earth map exists.
    pub debug_overrides: Vec<DebugOverride>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            antialiasing: Antialiasing::default(),
            color_space: ColorSpaceMode::default(),
            scene: SceneConfig::default(),
            debug_overrides: Vec::new(),
        }
    }
}
