//! Windowed canvas builder and runner.

use std::sync::Arc;

use glam::Vec2;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FluidConfig;
use crate::controls::Command;
use crate::error::SimulationError;
use crate::gpu::GpuState;
use crate::input::{self, CanvasRect, Input, KeyCode};
use crate::scene::Scene;
use crate::time::FrameClock;

const TITLE: &str = "Fluid Canvas";

/// A fluid canvas window.
///
/// ```ignore
/// Simulation::new()
///     .with_config(FluidConfig::load("fluid.json")?)
///     .with_window_size(1280, 720)
///     .run()?;
/// ```
pub struct Simulation {
    config: FluidConfig,
    window_size: (u32, u32),
    title: String,
}

impl Simulation {
    /// Reference settings in a 1280×720 window.
    pub fn new() -> Self {
        Self {
            config: FluidConfig::default(),
            window_size: (1280, 720),
            title: TITLE.to_string(),
        }
    }

    pub fn with_config(mut self, config: FluidConfig) -> Self {
        self.config = config;
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    settings: Simulation,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    scene: Scene,
    input: Input,
    clock: FrameClock,
    error: Option<SimulationError>,
}

impl App {
    fn new(settings: Simulation) -> Self {
        let scene = Scene::new(settings.config.clone(), 0, 0);
        Self {
            settings,
            window: None,
            gpu_state: None,
            scene,
            input: Input::new(),
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let (width, height) = self.settings.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.settings.title.as_str())
            .with_inner_size(LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.fit_canvas(&window, window.inner_size());

        let backdrop = self.scene.backdrop();
        let canvas = self.scene.canvas();
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), canvas.width(), canvas.height(), &backdrop))?;

        info!(width = canvas.width(), height = canvas.height(), "Canvas ready");
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    /// Size the canvas for the window and point input mapping at it.
    fn fit_canvas(&mut self, window: &Window, physical: PhysicalSize<u32>) {
        let scale_factor = window.scale_factor();
        let logical = Vec2::new(physical.width as f32, physical.height as f32) / scale_factor as f32;
        let (width, height) = input::canvas_size(logical, scale_factor, self.scene.config().render.render_scale);

        self.scene.resize(width, height);
        let rect = CanvasRect::from_size(physical.width as f32, physical.height as f32);
        self.input.set_viewport(rect, width, height);
    }

    fn apply(&mut self, command: Command) {
        if let Err(e) = self.scene.apply(command) {
            warn!("{}", e);
        }
    }

    fn handle_keys(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
            return;
        }
        let commands: Vec<Command> = self.input.pressed_keys().filter_map(Command::from_key).collect();
        for command in commands {
            self.apply(command);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
            return;
        };

        #[cfg(feature = "egui")]
        {
            let (output, commands) = gpu_state.egui.run_panel(window, self.scene.controls());
            gpu_state.set_overlay(output);
            for command in commands {
                if let Err(e) = self.scene.apply(command) {
                    warn!("{}", e);
                }
            }
        }

        let stats = self.scene.frame();

        if self.clock.tick() {
            let fps = self.clock.fps();
            debug!(fps, live = stats.live, culled = stats.culled, "Frame stats");
            window.set_title(&format!("{} | {} particles | {:.0} fps", self.settings.title, stats.live, fps));
        }

        let canvas = self.scene.canvas();
        if canvas.width() > 0 && canvas.height() > 0 {
            match gpu_state.render(canvas) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    warn!("Surface lost, reconfiguring");
                    gpu_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => warn!("Skipped frame: {:?}", e),
            }
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            error!("{}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        {
            if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                let consumed = gpu_state.egui.on_window_event(window, &event);
                // Releases always reach the pointer so a drag ending over the panel stops.
                let blocked = consumed || (input::starts_gesture(&event) && gpu_state.egui.wants_pointer());
                if blocked && !input::ends_gesture(&event) {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(window) = self.window.clone() {
                    self.fit_canvas(&window, physical_size);
                }
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.handle_keys(event_loop);
                self.input.begin_frame();
                self.redraw(event_loop);
            }
            event => {
                if let Some(segment) = self.input.handle_event(&event) {
                    self.scene.drag(segment);
                }
                self.scene.set_interacting(self.input.pointer().is_down());
            }
        }
    }
}
