//! CPU-side costs of rebuilding the swarm: mesh tessellation, grid layout
//! and per-frame draw planning.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use sphere_swarm::renderer::DrawRecorder;
use sphere_swarm::{grid_layout, DrawPlan, DrawStrategy, SphereMesh, SphereParams};

struct NullRecorder(u32);

impl DrawRecorder for NullRecorder {
    fn draw_indexed(
        &mut self,
        _indices: std::ops::Range<u32>,
        _base_vertex: i32,
        _instances: std::ops::Range<u32>,
    ) {
        self.0 += 1;
    }

    fn multi_draw_indexed_indirect(&mut self, _offset: u64, count: u32) {
        self.0 += count;
    }
}

fn mesh_generation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("sphere_mesh");
    for segments in [8, 16, 32] {
        let Ok(params) = SphereParams::new(0.02, segments) else {
            continue;
        };
        let _ = group.bench_function(format!("{segments}_segments"), |b| {
            b.iter(|| black_box(SphereMesh::generate(black_box(params))));
        });
    }
    group.finish();
}

fn grid_layout_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_layout");
    for count in [1_000, 10_000, 100_000] {
        let _ = group.bench_function(format!("{count}_instances"), |b| {
            b.iter(|| black_box(grid_layout(black_box(count), 0.1)));
        });
    }
    group.finish();
}

fn draw_plan_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_plan_encode");
    for strategy in DrawStrategy::ALL {
        let _ = group.bench_function(format!("{strategy:?}"), |b| {
            b.iter(|| {
                let plan = DrawPlan::new(strategy, 2790, black_box(10_000));
                let mut recorder = NullRecorder(0);
                plan.encode(&mut recorder);
                black_box(recorder.0)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    mesh_generation_benchmark,
    grid_layout_benchmark,
    draw_plan_benchmark
);
criterion_main!(benches);
