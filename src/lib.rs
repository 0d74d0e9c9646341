//! # Ambient Field
//!
//! A quiet background animation: a few dozen particles drift across the
//! viewport, bounce off its edges, and are joined by faint lines whenever two
//! of them come close.
//!
//! The crate is split into a host-agnostic core and one concrete host:
//!
//! - [`ParticleField`] holds the particles and knows how to step and draw them.
//! - [`ParticleFieldRenderer`] runs the field against a [`Surface`] and a
//!   [`Scheduler`] supplied by the host, handling start/stop, visibility and
//!   debounced resizes.
//! - [`window::run`] is a winit + wgpu host that puts it all in a window.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ambient_field::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     ambient_field::window::run(FieldConfig::default(), WindowOptions::default())
//! }
//! ```
//!
//! ## Driving it yourself
//!
//! Any event loop can host the renderer. [`ManualScheduler`] and
//! [`DisplayList`] make a fully deterministic one:
//!
//! ```ignore
//! let env = Environment::new(Viewport::new(1000.0, 700.0, 2.0));
//! let mut renderer = ParticleFieldRenderer::create(
//!     FieldConfig::default().with_seed(1),
//!     &env,
//!     Some(DisplayList::new()),
//!     ManualScheduler::new(),
//! )
//! .expect("motion allowed and a surface present");
//!
//! renderer.start();
//! for _ in 0..60 {
//!     for frame in renderer.scheduler_mut().take_frames() {
//!         renderer.on_frame(frame);
//!     }
//! }
//! assert_eq!(renderer.field().len(), 45);
//! ```
//!
//! ## Behavior
//!
//! | Aspect | Default |
//! |--------|---------|
//! | Particle count | `min(56, floor(width / 22))` |
//! | Speed | each axis uniform in `[-0.2, 0.2)` units/frame |
//! | Radius | uniform in `[0.8, 2.6)` |
//! | Links | pairs closer than 118, opacity `(1 - d/118) * 0.2` |
//! | Resize | field rebuilt 120 ms after the last resize event |
//! | Hidden | no frames are scheduled |
//! | Reduced motion | nothing is created at all |

pub mod config;
pub mod debounce;
pub mod error;
pub mod field;
mod gpu;
pub mod particle;
pub mod renderer;
pub mod scheduler;
mod shader;
pub mod surface;
pub mod time;
pub mod window;

pub use config::FieldConfig;
pub use debounce::Debouncer;
pub use error::{GpuError, RunError};
pub use field::{Link, ParticleField};
pub use glam::Vec2;
pub use particle::Particle;
pub use renderer::{Environment, ParticleFieldRenderer, Visibility};
pub use scheduler::{FrameHandle, ManualScheduler, Scheduler, TimerHandle, TimerQueue};
pub use surface::{Color, DisplayList, DrawCommand, Surface, SurfaceSize, Viewport};
pub use time::FrameClock;
pub use window::{WindowOptions, WindowScheduler};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use ambient_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::FieldConfig;
    pub use crate::error::RunError;
    pub use crate::field::ParticleField;
    pub use crate::renderer::{Environment, ParticleFieldRenderer, Visibility};
    pub use crate::scheduler::{ManualScheduler, Scheduler};
    pub use crate::surface::{Color, DisplayList, Surface, Viewport};
    pub use crate::window::WindowOptions;
    pub use crate::Vec2;
}
