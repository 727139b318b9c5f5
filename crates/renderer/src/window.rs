use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use earthmap::{DebugEdits, ReadySignal, SceneContext, Sizes, Time, TextureRegistry, World};
use tracing::{error, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::types::ViewerConfig;

/// Per-window state. `gpu` is declared first so the surface is dropped
/// before the window it was created from.
struct WindowState {
    gpu: GpuState,
    window: Arc<Window>,
    world: World,
    ready: ReadySignal,
    clock: Instant,
    time: Time,
    edits: Option<DebugEdits>,
    stall_reported: bool,
}

impl WindowState {
    fn new(window: Arc<Window>, config: ViewerConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.as_ref(), size, &config)?;
        let sizes = sizes_for(window.as_ref(), size);
        let ready = TextureRegistry::load(
            config.scene.assets_root.clone(),
            config.scene.sources.clone(),
        )
        .context("failed to start resource loading")?;
        let edits = if config.scene.debug {
            Some(
                DebugEdits::from_stdin(config.debug_overrides)
                    .context("failed to start debug edit reader")?,
            )
        } else {
            None
        };
        let world = World::new(SceneContext::new(config.scene, sizes));

        Ok(Self {
            gpu,
            window,
            world,
            ready,
            clock: Instant::now(),
            time: Time::new(0.0),
            edits,
            stall_reported: false,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.gpu.resize(new_size);
        let sizes = sizes_for(self.window.as_ref(), new_size);
        self.world.resize(&sizes);
    }

    /// One frame: clock, ready event, debug edits, scene update, then upload
    /// and draw.
    fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.time.tick(self.clock.elapsed().as_secs_f64());
        if !self.world.poll(&mut self.ready) && self.ready.stalled() && !self.stall_reported {
            warn!("resource loading stopped before completion; the scene will stay empty");
            self.stall_reported = true;
        }
        if let Some(edits) = &self.edits {
            self.world.apply_debug_edits(edits);
        }
        self.world.update(&self.time);
        self.gpu.render(&self.world)
    }
}

fn sizes_for(window: &Window, size: PhysicalSize<u32>) -> Sizes {
    Sizes::new(size.width, size.height, window.scale_factor() as f32)
}

pub(crate) fn run(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title("Earth Map")
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window, config)?;
    state.window.request_redraw();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);
            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                        WindowEvent::Resized(new_size) => state.resize(new_size),
                        WindowEvent::RedrawRequested => match state.frame() {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                let size = state.gpu.size();
                                state.gpu.resize(size);
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("surface out of memory; exiting");
                                elwt.exit();
                            }
                            Err(other) => warn!("surface error: {other:?}; retrying next frame"),
                        },
                        _ => {}
                    }
                }
                Event::AboutToWait => state.window.request_redraw(),
                _ => {}
            }
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
