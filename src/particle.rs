//! A single drifting particle.

use glam::Vec2;
use rand::Rng;

use crate::config::FieldConfig;

/// Position, velocity (units per frame) and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, size: f32) -> Self {
        Self {
            position,
            velocity,
            size,
        }
    }

    /// Spawn a particle uniformly inside `bounds` with a random drift and size.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2, config: &FieldConfig) -> Self {
        let speed = config.max_speed;
        Self {
            position: Vec2::new(sample(rng, 0.0, bounds.x), sample(rng, 0.0, bounds.y)),
            velocity: Vec2::new(sample(rng, -speed, speed), sample(rng, -speed, speed)),
            size: sample(rng, config.size_range.start, config.size_range.end),
        }
    }

    /// Move one frame and reflect velocity off the `[0, bounds]` box.
    ///
    /// Position is not clamped: a particle that overshoots an edge stays
    /// outside for a frame and is carried back by the reversed velocity.
    pub fn advance(&mut self, bounds: Vec2) {
        self.position += self.velocity;

        if self.position.x <= 0.0 || self.position.x >= bounds.x {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y <= 0.0 || self.position.y >= bounds.y {
            self.velocity.y = -self.velocity.y;
        }
    }
}

// `gen_range` panics on empty ranges; a zero-sized viewport or a collapsed
// size range pins the value to the lower end instead.
fn sample<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}
