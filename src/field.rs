//! The particle field: population, per-frame motion and proximity links.
//!
//! A field owns an ordered `Vec` of [`Particle`]s and the logical bounds
//! they bounce inside. It is rebuilt wholesale by [`ParticleField::reset`]
//! whenever the viewport changes; nothing is carried over between resets.
//!
//! Link detection is a plain O(n²) sweep over unordered pairs: at most 1540
//! distance checks per frame with the default cap of 56.

use glam::Vec2;
use rand::Rng;

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::surface::{Surface, Viewport};

/// A visible connection between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Index of the first particle (always `< b`).
    pub a: usize,
    /// Index of the second particle.
    pub b: usize,
    pub distance: f32,
    pub opacity: f32,
}

/// Ordered set of particles bouncing inside a logical viewport.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Vec2,
}

impl ParticleField {
    /// An empty field with zero bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every particle and repopulate for `viewport`.
    ///
    /// The count is recomputed from the viewport width, so a reset after a
    /// resize can grow or shrink the field.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R, viewport: Viewport, config: &FieldConfig) {
        self.bounds = Vec2::new(viewport.width.max(0.0), viewport.height.max(0.0));
        let count = config.particle_count(viewport.width);

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle::random(rng, self.bounds, config));
        }
    }

    /// Advance every particle by one frame, bouncing off the bounds.
    pub fn step(&mut self) {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.advance(bounds);
        }
    }

    /// All pairs closer than the link distance, with their opacity.
    pub fn links<'a>(&'a self, config: &'a FieldConfig) -> impl Iterator<Item = Link> + 'a {
        (0..self.particles.len()).flat_map(move |a| self.links_from(a, config))
    }

    /// Links from particle `a` to every later particle.
    fn links_from<'a>(&'a self, a: usize, config: &'a FieldConfig) -> impl Iterator<Item = Link> + 'a {
        let particles = &self.particles;
        ((a + 1)..particles.len()).filter_map(move |b| {
            let distance = particles[a].position.distance(particles[b].position);
            config.link_opacity(distance).map(|opacity| Link {
                a,
                b,
                distance,
                opacity,
            })
        })
    }

    /// Draw particles and links at their current positions.
    ///
    /// Call after [`step`](Self::step): every particle has already moved, so
    /// each link joins two post-step positions. Particle `i` is filled first,
    /// then its links to every later particle, in [`links`](Self::links) order.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, config: &FieldConfig) {
        for (a, p) in self.particles.iter().enumerate() {
            surface.fill_circle(p.position, p.size, config.particle_color);

            for link in self.links_from(a, config) {
                surface.stroke_line(
                    p.position,
                    self.particles[link.b].position,
                    config.link_width,
                    config.link_color.with_alpha(link.opacity),
                );
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access, mostly for placing particles deliberately.
    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Logical bounds particles bounce inside.
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Drop every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
