use sceneconfig::SceneConfig;

/// Drawable size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizes {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Sizes {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// True for a minimised window or any other zero-area surface.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height; a zero-height surface reports 1.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for Sizes {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

/// Frame clock in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Time {
    pub start: f64,
    current: f64,
    pub elapsed: f32,
    pub delta: f32,
}

impl Time {
    pub fn new(start: f64) -> Self {
        Self {
            start,
            current: start,
            elapsed: 0.0,
            delta: 0.0,
        }
    }

    /// Advances to `now`. Going backwards yields a zero delta.
    pub fn tick(&mut self, now: f64) {
        let now = now.max(self.current);
        self.delta = (now - self.current) as f32;
        self.current = now;
        self.elapsed = (now - self.start) as f32;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Everything a scene component needs from its host, passed explicitly.
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub sizes: Sizes,
    pub time: Time,
    pub debug: bool,
    pub config: SceneConfig,
}

impl SceneContext {
    pub fn new(config: SceneConfig, sizes: Sizes) -> Self {
        Self {
            sizes,
            time: Time::default(),
            debug: config.debug,
            config,
        }
    }
}
