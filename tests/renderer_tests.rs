//! Integration tests for the renderer lifecycle.
//!
//! These drive [`ParticleFieldRenderer`] through a [`ManualScheduler`] and a
//! [`DisplayList`], so every frame, timer and draw call is observable.

use std::time::Duration;

use ambient_field::prelude::*;
use ambient_field::{FrameHandle, Particle, TimerHandle};
use approx::assert_relative_eq;

type TestRenderer<'a> = ParticleFieldRenderer<DisplayList, &'a mut ManualScheduler>;

fn env(width: f32, height: f32) -> Environment {
    Environment::new(Viewport::new(width, height, 1.0))
}

fn config() -> FieldConfig {
    FieldConfig::default().with_seed(2024)
}

/// Deliver every pending frame, `rounds` times.
fn pump(renderer: &mut TestRenderer<'_>, rounds: usize) {
    for _ in 0..rounds {
        for frame in renderer.scheduler_mut().take_frames() {
            renderer.on_frame(frame);
        }
    }
}

/// Advance the virtual clock and deliver any timers that came due.
fn elapse(renderer: &mut TestRenderer<'_>, elapsed: Duration) -> Vec<TimerHandle> {
    let due = renderer.scheduler_mut().advance(elapsed);
    for &timer in &due {
        renderer.on_timer(timer);
    }
    due
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_count_for_width_1000() {
    let mut sched = ManualScheduler::new();
    let renderer = ParticleFieldRenderer::create(config(), &env(1000.0, 800.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");
    assert_eq!(renderer.field().len(), 45);
}

#[test]
fn test_surface_sized_with_clamped_ratio() {
    let mut sched = ManualScheduler::new();
    let env = Environment::new(Viewport::new(800.0, 600.0, 3.0));
    let renderer = ParticleFieldRenderer::create(config(), &env, Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    let size = renderer.surface().size().expect("configured");
    assert_eq!(size.scale, 2.0);
    assert_eq!((size.pixel_width, size.pixel_height), (1600, 1200));
    assert_eq!((size.logical_width, size.logical_height), (800.0, 600.0));
    assert_eq!(renderer.surface_size(), size);
}

#[test]
fn test_reduced_motion_disables_everything() {
    let mut sched = ManualScheduler::new();
    let mut surface = DisplayList::new();

    let renderer = ParticleFieldRenderer::create(
        config(),
        &env(1000.0, 800.0).with_reduced_motion(true),
        Some(&mut surface),
        &mut sched,
    );

    assert!(renderer.is_none());
    assert_eq!(sched.frames_requested(), 0);
    assert_eq!(sched.timers_set(), 0);
    assert_eq!(surface.configure_count(), 0);
    assert!(surface.is_empty());
}

#[test]
fn test_missing_surface_disables() {
    let mut sched = ManualScheduler::new();
    let renderer: Option<TestRenderer<'_>> =
        ParticleFieldRenderer::create(config(), &env(1000.0, 800.0), None, &mut sched);

    assert!(renderer.is_none());
    assert_eq!(sched.frames_requested(), 0);
}

// ============================================================================
// Frame loop
// ============================================================================

#[test]
fn test_one_frame_outstanding_while_running() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(900.0, 600.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    renderer.start();
    for _ in 0..100 {
        assert_eq!(renderer.scheduler().pending_frames(), 1);
        pump(&mut renderer, 1);
    }
    assert_eq!(renderer.frames_rendered(), 101);
}

#[test]
fn test_each_frame_clears_and_redraws() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(900.0, 600.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    renderer.start();
    pump(&mut renderer, 10);
    assert_eq!(renderer.surface().circles().count(), renderer.field().len());
}

#[test]
fn test_frame_draws_particles_and_links() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(1000.0, 1000.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    {
        let particles = renderer.field_mut().particles_mut();
        particles.clear();
        particles.push(Particle::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 2.0));
        particles.push(Particle::new(Vec2::new(159.0, 100.0), Vec2::ZERO, 1.0));
        particles.push(Particle::new(Vec2::new(700.0, 700.0), Vec2::ZERO, 1.5));
    }
    renderer.start();

    let list = renderer.surface();
    assert_eq!(list.circles().count(), 3);

    let lines: Vec<_> = list.lines().collect();
    assert_eq!(lines.len(), 1);
    let (from, to, width, color) = lines[0];
    assert_eq!(from, Vec2::new(100.0, 100.0));
    assert_eq!(to, Vec2::new(159.0, 100.0));
    assert_eq!(width, 1.0);
    assert_relative_eq!(color.a, 0.1, epsilon = 1e-6);
}

#[test]
fn test_no_link_at_or_beyond_threshold() {
    let mut sched = ManualScheduler::new();
    let cfg = config();
    let threshold = cfg.link_distance;
    let mut renderer = ParticleFieldRenderer::create(cfg, &env(1200.0, 700.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    renderer.start();
    for _ in 0..300 {
        pump(&mut renderer, 1);
        for (from, to, _, color) in renderer.surface().lines() {
            assert!(from.distance(to) < threshold);
            assert!(color.a > 0.0 && color.a <= 0.2);
        }
    }
}

#[test]
fn test_speed_unchanged_across_frames() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(200.0, 150.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    let speeds: Vec<Vec2> = renderer.field().particles().iter().map(|p| p.velocity.abs()).collect();
    renderer.start();
    pump(&mut renderer, 3_000);

    for (p, speed) in renderer.field().particles().iter().zip(speeds) {
        assert_eq!(p.velocity.abs(), speed);
    }
}

#[test]
fn test_stale_frame_ignored_after_restart() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(600.0, 400.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    renderer.start();
    let old = renderer.pending_frame().expect("running");
    renderer.stop();
    renderer.start();
    let rendered = renderer.frames_rendered();

    renderer.on_frame(old);
    assert_eq!(renderer.frames_rendered(), rendered);
    assert_ne!(renderer.pending_frame(), Some(old));
    assert_eq!(renderer.scheduler().pending_frames(), 1);

    renderer.on_frame(FrameHandle(u64::MAX));
    assert_eq!(renderer.frames_rendered(), rendered);
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn test_visibility_toggle_never_duplicates_loops() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(800.0, 600.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    renderer.start();
    pump(&mut renderer, 5);

    renderer.on_visibility_change(Visibility::Hidden);
    assert!(!renderer.is_running());
    assert_eq!(renderer.scheduler().pending_frames(), 0);

    renderer.on_visibility_change(Visibility::Visible);
    assert!(renderer.is_running());
    assert_eq!(renderer.scheduler().pending_frames(), 1);

    // Repeated notifications are no-ops
    renderer.on_visibility_change(Visibility::Visible);
    assert_eq!(renderer.scheduler().pending_frames(), 1);

    renderer.on_visibility_change(Visibility::Hidden);
    renderer.on_visibility_change(Visibility::Hidden);
    assert_eq!(renderer.scheduler().pending_frames(), 0);
    assert!(!renderer.is_running());
}

#[test]
fn test_hidden_renderer_does_not_advance() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(800.0, 600.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    renderer.start();
    renderer.on_visibility_change(Visibility::Hidden);
    let frozen = renderer.field().particles().to_vec();
    let rendered = renderer.frames_rendered();

    pump(&mut renderer, 50);
    assert_eq!(renderer.frames_rendered(), rendered);
    assert_eq!(renderer.field().particles(), &frozen[..]);
}

#[test]
fn test_rapid_toggling_keeps_single_schedule() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(800.0, 600.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    renderer.start();
    for i in 0..40 {
        let visibility = if i % 2 == 0 { Visibility::Hidden } else { Visibility::Visible };
        renderer.on_visibility_change(visibility);
        assert!(renderer.scheduler().pending_frames() <= 1);
        if i % 3 == 0 {
            pump(&mut renderer, 1);
        }
    }
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_waits_for_quiet_period() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(1000.0, 800.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");
    renderer.start();

    renderer.on_resize(Viewport::new(500.0, 400.0, 1.0));
    assert!(elapse(&mut renderer, Duration::from_millis(100)).is_empty());
    assert_eq!(renderer.field().len(), 45);
    assert!(renderer.resize_pending());

    // Frames keep flowing with the old field meanwhile
    pump(&mut renderer, 3);
    assert_eq!(renderer.surface().circles().count(), 45);

    assert_eq!(elapse(&mut renderer, Duration::from_millis(20)).len(), 1);
    assert!(!renderer.resize_pending());
    assert_eq!(renderer.field().len(), 22);
    assert_eq!(renderer.viewport(), Viewport::new(500.0, 400.0, 1.0));
    assert_eq!(renderer.field().bounds(), Vec2::new(500.0, 400.0));
    assert_eq!(renderer.surface().configure_count(), 2);
}

#[test]
fn test_resize_burst_regenerates_once_with_latest_size() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(1000.0, 800.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    for width in [900.0, 800.0, 700.0, 660.0] {
        renderer.on_resize(Viewport::new(width, 500.0, 1.0));
        assert!(elapse(&mut renderer, Duration::from_millis(60)).is_empty());
    }
    assert_eq!(renderer.scheduler().pending_timers(), 1);

    assert_eq!(elapse(&mut renderer, Duration::from_millis(60)).len(), 1);
    assert_eq!(renderer.field().len(), 30);
    assert_eq!(renderer.surface().configure_count(), 2);
}

#[test]
fn test_resize_fully_regenerates() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(1000.0, 800.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");
    let before = renderer.field().particles().to_vec();

    renderer.on_resize(Viewport::new(1000.0, 800.0, 1.0));
    elapse(&mut renderer, Duration::from_millis(120));

    assert_eq!(renderer.field().len(), before.len());
    assert_ne!(renderer.field().particles(), &before[..]);
}

#[test]
fn test_resize_count_matches_fresh_creation() {
    for width in [0.0, 21.0, 22.0, 500.0, 1000.0, 1231.0, 1232.0, 4000.0] {
        let mut sched = ManualScheduler::new();
        let mut renderer =
            ParticleFieldRenderer::create(config(), &env(640.0, 480.0), Some(DisplayList::new()), &mut sched)
                .expect("enabled");
        renderer.on_resize(Viewport::new(width, 480.0, 1.0));
        elapse(&mut renderer, Duration::from_millis(120));

        let expected = config().particle_count(width);
        assert_eq!(renderer.field().len(), expected, "width {}", width);
        assert_eq!(expected, 56.min((width / 22.0).floor() as usize));
    }
}

#[test]
fn test_resize_applies_while_hidden() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(1000.0, 800.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");
    renderer.start();
    renderer.on_visibility_change(Visibility::Hidden);

    renderer.on_resize(Viewport::new(440.0, 300.0, 2.0));
    elapse(&mut renderer, Duration::from_millis(150));

    assert_eq!(renderer.field().len(), 20);
    assert!(!renderer.is_running());
    assert_eq!(renderer.scheduler().pending_frames(), 0);
    assert_eq!(renderer.surface_size().pixel_width, 880);
}

#[test]
fn test_foreign_timer_ignored() {
    let mut sched = ManualScheduler::new();
    let mut renderer = ParticleFieldRenderer::create(config(), &env(1000.0, 800.0), Some(DisplayList::new()), &mut sched)
        .expect("enabled");

    assert!(!renderer.on_timer(TimerHandle(12345)));
    assert_eq!(renderer.field().len(), 45);
}

// ============================================================================
// Dispose
// ============================================================================

#[test]
fn test_dispose_releases_schedules() {
    let mut sched = ManualScheduler::new();
    {
        let mut renderer =
            ParticleFieldRenderer::create(config(), &env(1000.0, 800.0), Some(DisplayList::new()), &mut sched)
                .expect("enabled");
        renderer.start();
        renderer.on_resize(Viewport::new(300.0, 300.0, 1.0));
        renderer.dispose();
    }

    assert_eq!(sched.pending_frames(), 0);
    assert_eq!(sched.pending_timers(), 0);
    assert_eq!(sched.frames_requested(), 1);
    assert_eq!(sched.frames_cancelled(), 1);
    assert_eq!(sched.timers_cleared(), 1);
}
