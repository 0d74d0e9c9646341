//! Windowed host: runs a [`ParticleFieldRenderer`] inside a winit event loop.
//!
//! | winit | renderer |
//! |-------|----------|
//! | `RedrawRequested` with a frame pending | `on_frame` |
//! | `Resized`, `ScaleFactorChanged` | `on_resize` (swapchain resizes now, the field's backing store once resizing settles) |
//! | timer deadline reached in `about_to_wait` | `on_timer` |
//! | `Occluded`, `suspended`/`resumed` | `on_visibility_change` |
//!
//! If the GPU cannot be initialized the window still opens; the renderer is
//! simply never created, exactly as if there were no drawing surface.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FieldConfig;
use crate::error::RunError;
use crate::gpu::GpuState;
use crate::renderer::{Environment, ParticleFieldRenderer, Visibility};
use crate::scheduler::{FrameHandle, Scheduler, TimerHandle, TimerQueue};
use crate::surface::{DisplayList, Viewport};
use crate::time::FrameClock;

/// Window settings that are not part of the field itself.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    /// Initial logical width.
    pub width: f64,
    /// Initial logical height.
    pub height: f64,
    /// Treat the user as preferring reduced motion.
    pub reduced_motion: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Ambient Field".to_string(),
            width: 1280.0,
            height: 720.0,
            reduced_motion: false,
        }
    }
}

/// [`Scheduler`] backed by winit redraw requests and event-loop deadlines.
///
/// winit cannot withdraw a redraw request, so cancelling a frame only
/// forgets the handle; the redraw still arrives and finds nothing to deliver.
pub struct WindowScheduler {
    window: Arc<Window>,
    next_id: u64,
    frame: Option<FrameHandle>,
    timers: TimerQueue<Instant>,
}

impl WindowScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_id: 0,
            frame: None,
            timers: TimerQueue::new(),
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// The frame to deliver on this redraw, if one was requested.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.frame.take()
    }

    /// Remove and return timers whose deadline is at or before `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerHandle> {
        self.timers.take_due(now)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }
}

impl Scheduler for WindowScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frame = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.frame == Some(handle) {
            self.frame = None;
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.insert(handle, Instant::now() + delay);
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.remove(handle);
    }
}

type WindowRenderer = ParticleFieldRenderer<DisplayList, WindowScheduler>;

/// Logical viewport of a window.
fn viewport_of(window: &Window) -> Viewport {
    let scale = window.scale_factor();
    let logical: LogicalSize<f64> = window.inner_size().to_logical(scale);
    Viewport::new(logical.width as f32, logical.height as f32, scale as f32)
}

struct App {
    config: FieldConfig,
    options: WindowOptions,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    renderer: Option<WindowRenderer>,
    clock: FrameClock,
    error: Option<RunError>,
}

impl App {
    fn new(config: FieldConfig, options: WindowOptions) -> Self {
        Self {
            config,
            options,
            window: None,
            gpu_state: None,
            renderer: None,
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => self.clock.pause(),
            Visibility::Visible => self.clock.resume(),
        }
        if let Some(renderer) = &mut self.renderer {
            renderer.on_visibility_change(visibility);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let mut advanced = false;
        if let Some(renderer) = &mut self.renderer {
            if let Some(handle) = renderer.scheduler_mut().take_frame() {
                renderer.on_frame(handle);
                advanced = true;
            }
        }

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };
        let list = self.renderer.as_ref().map(|r| r.surface());
        match gpu_state.render(list) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory; exiting");
                event_loop.exit();
                return;
            }
            Err(e) => warn!("Render error: {:?}", e),
        }

        if advanced && self.clock.tick() {
            let fps = self.clock.fps();
            debug!(fps, frame = self.clock.frame(), "frame rate");
            if let Some(window) = &self.window {
                window.set_title(&format!("{} - {:.0} fps", self.options.title, fps));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.set_visibility(Visibility::Visible);
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.options.title.clone())
            .with_inner_size(LogicalSize::new(self.options.width, self.options.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        self.gpu_state = match pollster::block_on(GpuState::new(window.clone(), self.config.background)) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("{}; particle field disabled", e);
                None
            }
        };

        let env = Environment::new(viewport_of(&window)).with_reduced_motion(self.options.reduced_motion);
        let surface = self.gpu_state.as_ref().map(|_| DisplayList::new());
        self.renderer = ParticleFieldRenderer::create(
            self.config.clone(),
            &env,
            surface,
            WindowScheduler::new(window.clone()),
        );
        if let Some(renderer) = &mut self.renderer {
            renderer.start();
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.set_visibility(Visibility::Hidden);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(renderer) = self.renderer.take() {
                    renderer.dispose();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let Some(window) = &self.window else {
                    return;
                };
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let Some(renderer) = &mut self.renderer {
                    renderer.on_resize(viewport_of(window));
                }
                window.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(window), Some(renderer)) = (&self.window, &mut self.renderer) {
                    renderer.on_resize(viewport_of(window));
                }
            }
            WindowEvent::Occluded(occluded) => {
                let visibility = if occluded {
                    Visibility::Hidden
                } else {
                    Visibility::Visible
                };
                self.set_visibility(visibility);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = &mut self.renderer else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        for handle in renderer.scheduler_mut().take_due(Instant::now()) {
            renderer.on_timer(handle);
        }

        let control_flow = match renderer.scheduler().next_deadline() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        };
        event_loop.set_control_flow(control_flow);
    }
}

/// Open a window and animate the field until it is closed.
pub fn run(config: FieldConfig, options: WindowOptions) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, options);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
