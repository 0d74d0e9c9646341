//! Benchmarks for the per-frame CPU work: stepping, link search and drawing.
//!
//! Run with: `cargo bench`

use ambient_field::prelude::*;
use ambient_field::Particle;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn field(width: f32, config: &FieldConfig) -> ParticleField {
    let mut rng = StdRng::seed_from_u64(7);
    let mut field = ParticleField::new();
    field.reset(&mut rng, Viewport::new(width, 900.0, 2.0), config);
    field
}

fn bench_step(c: &mut Criterion) {
    let config = FieldConfig::default();
    let mut field = field(1600.0, &config);

    c.bench_function("field_step", |b| b.iter(|| black_box(&mut field).step()));
}

fn bench_links(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_links");

    for max in [16usize, 56, 256] {
        let config = FieldConfig::default().with_max_particles(max);
        let field = field(max as f32 * config.particle_spacing, &config);
        group.bench_with_input(BenchmarkId::from_parameter(max), &field, |b, field| {
            b.iter(|| black_box(field.links(&config).count()))
        });
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let config = FieldConfig::default();
    let mut field = field(1600.0, &config);
    let mut list = DisplayList::new();

    c.bench_function("field_frame", |b| {
        b.iter(|| {
            list.clear();
            field.step();
            field.draw(&mut list, &config);
            black_box(list.commands().len())
        })
    });
}

fn bench_renderer_frame(c: &mut Criterion) {
    let env = Environment::new(Viewport::new(1600.0, 900.0, 2.0));
    let Some(mut renderer) = ParticleFieldRenderer::create(
        FieldConfig::default().with_seed(7),
        &env,
        Some(DisplayList::new()),
        ManualScheduler::new(),
    ) else {
        return;
    };
    renderer.start();

    c.bench_function("renderer_frame", |b| {
        b.iter(|| {
            for frame in renderer.scheduler_mut().take_frames() {
                renderer.on_frame(frame);
            }
        })
    });
}

fn bench_particle_advance(c: &mut Criterion) {
    let bounds = Vec2::new(1600.0, 900.0);
    let mut particle = Particle::new(Vec2::new(800.0, 450.0), Vec2::new(0.17, -0.12), 1.4);

    c.bench_function("particle_advance", |b| b.iter(|| black_box(&mut particle).advance(bounds)));
}

criterion_group!(
    benches,
    bench_step,
    bench_links,
    bench_frame,
    bench_renderer_frame,
    bench_particle_advance,
);
criterion_main!(benches);
