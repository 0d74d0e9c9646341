//! The particle field renderer and its lifecycle.
//!
//! [`ParticleFieldRenderer`] ties a [`ParticleField`] to a host [`Surface`]
//! and [`Scheduler`]. The host owns the event loop and forwards four kinds
//! of events:
//!
//! | Host event | Renderer entry point |
//! |------------|----------------------|
//! | display refresh for a requested frame | [`on_frame`](ParticleFieldRenderer::on_frame) |
//! | viewport resized | [`on_resize`](ParticleFieldRenderer::on_resize) |
//! | a timer came due | [`on_timer`](ParticleFieldRenderer::on_timer) |
//! | page/window shown or hidden | [`on_visibility_change`](ParticleFieldRenderer::on_visibility_change) |
//!
//! # Lifecycle
//!
//! ```ignore
//! let env = Environment::new(Viewport::new(1280.0, 720.0, 2.0));
//! let Some(mut renderer) = ParticleFieldRenderer::create(config, &env, Some(surface), scheduler) else {
//!     return; // reduced motion, or nothing to draw on
//! };
//! renderer.start();
//! // ... forward host events ...
//! renderer.dispose();
//! ```
//!
//! Exactly one frame request is outstanding while running and none while
//! stopped. Frame callbacks carrying any other handle are ignored, which is
//! what keeps repeated stop/start cycles from stacking up loops.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::config::FieldConfig;
use crate::debounce::Debouncer;
use crate::field::ParticleField;
use crate::scheduler::{FrameHandle, Scheduler, TimerHandle};
use crate::surface::{Surface, SurfaceSize, Viewport};

/// Whether the host page or window can currently be seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Host facts the renderer needs at creation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub viewport: Viewport,
    /// The user asked the platform to minimise animation.
    pub prefers_reduced_motion: bool,
}

impl Environment {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            prefers_reduced_motion: false,
        }
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.prefers_reduced_motion = reduced;
        self
    }
}

/// Animates a [`ParticleField`] onto a host surface.
pub struct ParticleFieldRenderer<S: Surface, H: Scheduler> {
    config: FieldConfig,
    surface: S,
    scheduler: H,
    rng: StdRng,
    field: ParticleField,
    viewport: Viewport,
    surface_size: SurfaceSize,
    /// The one outstanding frame request while running.
    frame: Option<FrameHandle>,
    resize: Debouncer<Viewport>,
    frames_rendered: u64,
}

impl<S: Surface, H: Scheduler> ParticleFieldRenderer<S, H> {
    /// Size the surface and populate the field.
    ///
    /// Returns `None`, without touching the surface or scheduler, when the
    /// environment prefers reduced motion or no surface is available.
    pub fn create(config: FieldConfig, env: &Environment, surface: Option<S>, scheduler: H) -> Option<Self> {
        if env.prefers_reduced_motion {
            debug!("reduced motion preferred; particle field disabled");
            return None;
        }
        let Some(mut surface) = surface else {
            debug!("no drawing surface; particle field disabled");
            return None;
        };

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let viewport = env.viewport;
        let surface_size = SurfaceSize::for_viewport(viewport, config.max_pixel_ratio);
        surface.configure(surface_size);

        let mut field = ParticleField::new();
        field.reset(&mut rng, viewport, &config);

        debug!(
            particles = field.len(),
            width = viewport.width,
            height = viewport.height,
            scale = surface_size.scale,
            "particle field created"
        );

        let resize = Debouncer::new(config.resize_debounce);
        Some(Self {
            config,
            surface,
            scheduler,
            rng,
            field,
            viewport,
            surface_size,
            frame: None,
            resize,
            frames_rendered: 0,
        })
    }

    /// Begin animating: draw a frame now and request the next one.
    ///
    /// Does nothing if already running.
    pub fn start(&mut self) {
        if self.frame.is_some() {
            return;
        }
        debug!("particle field started");
        self.render_frame();
    }

    /// Withdraw the pending frame request. Does nothing if already stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
            debug!("particle field stopped");
        }
    }

    /// Stop, drop any pending resize, and release the field.
    pub fn dispose(mut self) {
        self.stop();
        self.resize.cancel(&mut self.scheduler);
        self.field.clear();
        debug!(frames = self.frames_rendered, "particle field disposed");
    }

    /// Display-refresh callback for a frame this renderer requested.
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if self.frame != Some(handle) {
            trace!(?handle, "ignoring stale frame");
            return;
        }
        self.frame = None;
        self.render_frame();
    }

    /// Note a viewport change; the field is rebuilt once resizing settles.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.resize.trigger(&mut self.scheduler, viewport);
    }

    /// Timer callback. Returns `true` if it completed a debounced resize.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        match self.resize.fire(handle) {
            Some(viewport) => {
                self.apply_viewport(viewport);
                true
            }
            None => false,
        }
    }

    /// Pause while hidden, resume when visible again.
    pub fn on_visibility_change(&mut self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => self.stop(),
            Visibility::Visible => self.start(),
        }
    }

    fn render_frame(&mut self) {
        self.surface.clear();
        self.field.step();
        self.field.draw(&mut self.surface, &self.config);
        self.frames_rendered += 1;

        let next = self.scheduler.request_frame();
        self.frame = Some(next);
        trace!(frame = self.frames_rendered, ?next, "particle field frame");
    }

    fn apply_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.surface_size = SurfaceSize::for_viewport(viewport, self.config.max_pixel_ratio);
        self.surface.configure(self.surface_size);
        self.field.reset(&mut self.rng, viewport, &self.config);

        debug!(
            particles = self.field.len(),
            width = viewport.width,
            height = viewport.height,
            scale = self.surface_size.scale,
            "particle field regenerated"
        );
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    /// The frame request currently outstanding, if running.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    /// Whether a resize is waiting out its debounce delay.
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.surface_size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &H {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut H {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use crate::surface::DisplayList;

    fn env(width: f32) -> Environment {
        Environment::new(Viewport::new(width, 600.0, 1.0))
    }

    fn renderer(width: f32) -> ParticleFieldRenderer<DisplayList, ManualScheduler> {
        ParticleFieldRenderer::create(
            FieldConfig::default().with_seed(11),
            &env(width),
            Some(DisplayList::new()),
            ManualScheduler::new(),
        )
        .expect("renderer should be enabled")
    }

    #[test]
    fn test_create_does_not_schedule() {
        let r = renderer(800.0);
        assert!(!r.is_running());
        assert_eq!(r.scheduler().frames_requested(), 0);
        assert_eq!(r.field().len(), 36);
        assert_eq!(r.surface().configure_count(), 1);
    }

    #[test]
    fn test_start_draws_and_schedules() {
        let mut r = renderer(800.0);
        r.start();
        assert!(r.is_running());
        assert_eq!(r.frames_rendered(), 1);
        assert_eq!(r.scheduler().pending_frames(), 1);
        assert_eq!(r.surface().circles().count(), 36);

        r.start();
        assert_eq!(r.frames_rendered(), 1);
        assert_eq!(r.scheduler().pending_frames(), 1);
    }

    #[test]
    fn test_on_frame_ignores_unknown_handle() {
        let mut r = renderer(800.0);
        r.start();
        r.on_frame(FrameHandle(9_999));
        assert_eq!(r.frames_rendered(), 1);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let mut r = renderer(800.0);
        r.start();
        r.stop();
        assert!(!r.is_running());
        assert_eq!(r.scheduler().pending_frames(), 0);
        assert_eq!(r.scheduler().frames_cancelled(), 1);

        r.stop();
        assert_eq!(r.scheduler().frames_cancelled(), 1);
    }

    #[test]
    fn test_seeded_fields_match() {
        let a = renderer(640.0);
        let b = renderer(640.0);
        assert_eq!(a.field().particles(), b.field().particles());
    }
}
