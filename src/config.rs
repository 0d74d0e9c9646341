//! Tunable constants for the particle field.
//!
//! Every number the renderer uses lives on [`FieldConfig`]. The defaults
//! reproduce the ambient background this crate was built for; use the
//! `with_*` methods to adjust them.
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_max_particles(80)
//!     .with_link_distance(140.0)
//!     .with_seed(7);
//! ```

use std::ops::Range;
use std::time::Duration;

use crate::surface::Color;

/// Upper bound on the number of particles in a field.
pub const MAX_PARTICLES: usize = 56;
/// One particle per this many logical units of viewport width.
pub const PARTICLE_SPACING: f32 = 22.0;
/// Pairs closer than this are linked.
pub const LINK_DISTANCE: f32 = 118.0;
/// Link opacity at zero distance.
pub const LINK_MAX_OPACITY: f32 = 0.2;
/// Trailing delay before a resize regenerates the field.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(120);
/// Device pixel ratios above this are clamped.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Configuration for a [`ParticleFieldRenderer`](crate::ParticleFieldRenderer).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Hard cap on particle count.
    pub max_particles: usize,
    /// Logical width per particle; count is `floor(width / spacing)`.
    pub particle_spacing: f32,
    /// Per-axis speed bound. Velocities are drawn from `[-max_speed, max_speed)`.
    pub max_speed: f32,
    /// Radius range for new particles.
    pub size_range: Range<f32>,
    /// Link threshold distance.
    pub link_distance: f32,
    /// Opacity of a link between coincident particles.
    pub link_max_opacity: f32,
    /// Stroke width of links.
    pub link_width: f32,
    /// Particle fill.
    pub particle_color: Color,
    /// Link stroke; alpha is replaced by the distance falloff.
    pub link_color: Color,
    /// Quiet period after the last resize before regenerating.
    pub resize_debounce: Duration,
    /// Clamp for the device pixel ratio used to size the surface.
    pub max_pixel_ratio: f32,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Clear color used by the windowed host behind the field.
    pub background: Color,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_particles: MAX_PARTICLES,
            particle_spacing: PARTICLE_SPACING,
            max_speed: 0.2,
            size_range: 0.8..2.6,
            link_distance: LINK_DISTANCE,
            link_max_opacity: LINK_MAX_OPACITY,
            link_width: 1.0,
            particle_color: Color::from_rgba8(34, 211, 238, 0.42),
            link_color: Color::from_rgba8(157, 176, 207, 1.0),
            resize_debounce: RESIZE_DEBOUNCE,
            max_pixel_ratio: MAX_PIXEL_RATIO,
            seed: None,
            background: Color::from_rgba8(5, 8, 20, 1.0),
        }
    }
}

impl FieldConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the particle cap.
    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.max_particles = max;
        self
    }

    /// Set the logical width allotted to each particle.
    pub fn with_particle_spacing(mut self, spacing: f32) -> Self {
        self.particle_spacing = spacing;
        self
    }

    /// Set the per-axis speed bound.
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.max_speed = speed.abs();
        self
    }

    /// Set the radius range for spawned particles.
    pub fn with_size_range(mut self, range: Range<f32>) -> Self {
        self.size_range = range;
        self
    }

    /// Set the link threshold distance.
    pub fn with_link_distance(mut self, distance: f32) -> Self {
        self.link_distance = distance;
        self
    }

    /// Set the opacity of links at zero distance.
    pub fn with_link_max_opacity(mut self, opacity: f32) -> Self {
        self.link_max_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set the link stroke width.
    pub fn with_link_width(mut self, width: f32) -> Self {
        self.link_width = width;
        self
    }

    /// Set the particle fill color.
    pub fn with_particle_color(mut self, color: Color) -> Self {
        self.particle_color = color;
        self
    }

    /// Set the link stroke color.
    pub fn with_link_color(mut self, color: Color) -> Self {
        self.link_color = color;
        self
    }

    /// Set the resize debounce delay.
    pub fn with_resize_debounce(mut self, delay: Duration) -> Self {
        self.resize_debounce = delay;
        self
    }

    /// Set the device pixel ratio clamp.
    pub fn with_max_pixel_ratio(mut self, ratio: f32) -> Self {
        self.max_pixel_ratio = ratio;
        self
    }

    /// Seed the particle RNG for reproducible fields.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the host clear color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Number of particles for a viewport of the given logical width.
    ///
    /// `min(max_particles, floor(width / spacing))`. Degenerate widths
    /// (negative, NaN, or a non-positive spacing) yield zero.
    pub fn particle_count(&self, viewport_width: f32) -> usize {
        if !(self.particle_spacing > 0.0) || !(viewport_width > 0.0) {
            return 0;
        }
        let per_width = (viewport_width / self.particle_spacing).floor();
        if per_width >= self.max_particles as f32 {
            self.max_particles
        } else {
            per_width as usize
        }
    }

    /// Link opacity for a pair at `distance`, or `None` when they are too far apart.
    ///
    /// Falls off linearly from `link_max_opacity` at 0 to 0 at `link_distance`.
    pub fn link_opacity(&self, distance: f32) -> Option<f32> {
        if distance < self.link_distance {
            Some((1.0 - distance / self.link_distance) * self.link_max_opacity)
        } else {
            None
        }
    }
}
