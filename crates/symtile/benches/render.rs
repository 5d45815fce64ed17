mod common;

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use symtile::prelude::{
    create_radial_simple, create_uniform_coloring, create_wallpaper, Affine2D, LatticeExtent,
    ObjectId, Polygon, RenderRequest, Tiling,
};

const GROUPS: [&str; 4] = ["p1", "p4m", "p6m", "pgg"];
const EXTENTS: [i32; 4] = [4, 16, 32, 64];

fn unit(rng: &mut StdRng) -> f64 {
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}

/// Star-shaped boundary with jittered radii around `center`.
fn jagged_boundary(rng: &mut StdRng, center: [f64; 2], radius: f64, points: usize) -> Polygon {
    Polygon::from_points((0..points).map(|i| {
        let angle = i as f64 / points as f64 * TAU;
        let r = radius * (0.6 + 0.4 * unit(rng));
        [center[0] + r * angle.cos(), center[1] + r * angle.sin()]
    }))
}

fn render_range_benches(c: &mut Criterion) {
    let renderer = common::bench_renderer();

    for group_name in GROUPS {
        let Some(tiling) = create_wallpaper(group_name) else {
            continue;
        };
        let mut group = c.benchmark_group(format!("render/range/{group_name}"));

        for &n in &EXTENTS {
            let request = common::square_request(n);
            group.throughput(common::clone_throughput(&renderer, &tiling, &request, &()));

            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| {
                    let out = renderer.render(&tiling, &request, &());
                    black_box(out.map(|o| o.instance_count()).ok());
                });
            });
        }

        group.finish();
    }
}

fn render_boundary_benches(c: &mut Criterion) {
    let renderer = common::bench_renderer();
    let tiling = create_uniform_coloring("truncated trihexagonal").unwrap_or_else(|| Tiling::new("", ""));
    let mut group = c.benchmark_group("render/boundary/truncated_trihexagonal");

    for &radius in &[5.0, 20.0, 60.0] {
        let mut rng = StdRng::seed_from_u64(0xB0B0_u64 ^ (radius as u64));
        let boundary = jagged_boundary(&mut rng, [0.0, 0.0], radius, 48);
        let request = RenderRequest::new(LatticeExtent::Boundary(boundary));
        group.throughput(common::clone_throughput(&renderer, &tiling, &request, &()));

        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                let out = renderer.render(&tiling, &request, &());
                black_box(out.map(|o| o.cells_visited).ok());
            });
        });
    }

    group.finish();
}

fn render_sources_benches(c: &mut Criterion) {
    let renderer = common::bench_renderer();
    let Some(tiling) = create_wallpaper("p6m") else {
        return;
    };
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut lookup: HashMap<ObjectId, Affine2D> = HashMap::new();
    let mut request = common::square_request(16).with_trace_cells(false);
    for i in 0..8u64 {
        let id = ObjectId(i);
        lookup.insert(
            id,
            Affine2D::from_translation([unit(&mut rng) * 0.5, unit(&mut rng) * 0.5]),
        );
        request = request.with_source(0, id);
    }

    let mut group = c.benchmark_group("render/sources/p6m");
    group.throughput(common::clone_throughput(&renderer, &tiling, &request, &lookup));
    group.bench_function("8_sources_16x16", |b| {
        b.iter(|| {
            let out = renderer.render(&tiling, &request, &lookup);
            black_box(out.map(|o| o.instance_count()).ok());
        });
    });
    group.finish();
}

fn render_radial_benches(c: &mut Criterion) {
    let renderer = common::bench_renderer();
    let mut group = c.benchmark_group("render/radial");

    for &divisions in &[8u32, 64, 512] {
        let Some(tiling) = create_radial_simple(true, divisions) else {
            continue;
        };
        let request = RenderRequest::default();
        group.throughput(common::clone_throughput(&renderer, &tiling, &request, &()));
        group.bench_with_input(
            BenchmarkId::from_parameter(divisions),
            &divisions,
            |b, _| {
                b.iter(|| {
                    let out = renderer.render(&tiling, &request, &());
                    black_box(out.map(|o| o.instance_count()).ok());
                });
            },
        );
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::tiling_criterion();
    targets = render_range_benches, render_boundary_benches, render_sources_benches, render_radial_benches
}
criterion_main!(benches);
