//! Frame timing for the windowed host.
//!
//! The field itself advances a fixed amount per frame and never looks at the
//! clock. [`FrameClock`] exists so the host can report a frame rate and so
//! time spent hidden does not count against it.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! // every presented frame:
//! if clock.tick() {
//!     window.set_title(&format!("ambient field - {:.0} fps", clock.fps()));
//! }
//! ```

use std::time::{Duration, Instant};

/// Counts presented frames and derives a periodically refreshed FPS.
#[derive(Debug)]
pub struct FrameClock {
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Clock that refreshes its FPS figure every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: Instant::now(),
            fps_update_interval: interval,
            paused: false,
        }
    }

    /// Record one presented frame.
    ///
    /// Returns `true` when the FPS figure was refreshed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> bool {
        if self.paused {
            return false;
        }
        self.frame_count += 1;

        let elapsed = now.duration_since(self.fps_update_time);
        if elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    /// Stop counting, e.g. while the window is hidden.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume counting. The FPS window restarts so the pause is not averaged in.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = Instant::now();
        }
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
