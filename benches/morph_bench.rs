//! Benchmarks for easing curves and per-frame morph ticks.
#![allow(missing_docs, clippy::unwrap_used)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use morpho::animation::{MorphId, MorphRunner, Transition};
use morpho::renderer::headless::HeadlessRenderer;
use morpho::renderer::InstanceRenderer;
use morpho::shape::Shape;
use morpho::util::easing::EasingFunction;
use web_time::{Duration, Instant};

fn cloud(name: &str, count: usize, offset: f32) -> Arc<Shape> {
    let positions = (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            Vec3::new(t.cos() + offset, t.sin(), t)
        })
        .collect();
    Arc::new(Shape::new(name, positions, Vec3::ONE))
}

fn easing_benchmark(c: &mut Criterion) {
    let cubic = EasingFunction::CubicInOut;
    c.bench_function("cubic_in_out_easing", |b| {
        b.iter(|| black_box(cubic.evaluate(black_box(0.3))))
    });
    let damped = EasingFunction::bounce();
    c.bench_function("damped_oscillation_easing", |b| {
        b.iter(|| black_box(damped.evaluate(black_box(0.3))))
    });
}

fn morph_tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("directed_tick");

    for count in [1_000, 10_000, 50_000] {
        let start = cloud("start", count, 0.0);
        let end = cloud("end", count, 2.0);
        let mut renderer = HeadlessRenderer::new();
        let handle = renderer.create_instance_set(&start.positions, start.color);
        let mut runner = MorphRunner::directed(
            MorphId::FIRST,
            Transition::directed(Duration::from_secs(3600)),
            start,
            end,
        )
        .unwrap();
        let t0 = Instant::now();
        let _ = runner.tick(t0, &mut renderer, handle).unwrap();

        group.bench_function(format!("{count}_instances"), |b| {
            b.iter(|| {
                black_box(
                    runner
                        .tick(t0 + Duration::from_millis(500), &mut renderer, handle)
                        .unwrap(),
                )
            })
        });
    }
    group.finish();
}

fn bounce_sample_benchmark(c: &mut Criterion) {
    let shape = cloud("shape", 10_000, 0.0);
    let noise = vec![Vec3::splat(0.5); shape.len()];
    let runner = MorphRunner::bounce(
        MorphId::FIRST,
        Transition::bounce(Duration::from_secs(3), 10.0),
        shape,
        noise,
        Vec3::ONE,
    )
    .unwrap();
    c.bench_function("bounce_sample_10000", |b| {
        b.iter(|| black_box(runner.sample(black_box(0.7))))
    });
}

criterion_group!(
    benches,
    easing_benchmark,
    morph_tick_benchmark,
    bounce_sample_benchmark
);
criterion_main!(benches);
