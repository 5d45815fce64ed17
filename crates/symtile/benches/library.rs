mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use symtile::prelude::{builtin_count, builtin_tiling, create_wallpaper, Tiling, BUILTIN_TILINGS};

fn build_catalog_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("library/build");
    group.throughput(criterion::Throughput::Elements(builtin_count() as u64));

    group.bench_function("all_builtins", |b| {
        b.iter(|| {
            let built = (0..builtin_count())
                .filter_map(builtin_tiling)
                .map(|t| t.basecells.len())
                .sum::<usize>();
            black_box(built);
        });
    });

    group.finish();
}

fn text_format_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("library/text");

    for (index, key) in BUILTIN_TILINGS.iter().enumerate().step_by(9) {
        let Some(tiling) = builtin_tiling(index) else {
            continue;
        };
        let text = tiling.to_text();
        group.throughput(common::text_throughput(&text));

        group.bench_with_input(BenchmarkId::new("write", key), &tiling, |b, t| {
            b.iter(|| black_box(t.to_text().len()));
        });
        group.bench_with_input(BenchmarkId::new("parse", key), &text, |b, s| {
            b.iter(|| black_box(Tiling::from_text(s).map(|t| t.basecells.len()).ok()));
        });
    }

    group.finish();
}

fn validate_benches(c: &mut Criterion) {
    let Some(tiling) = create_wallpaper("p6m") else {
        return;
    };
    c.bench_function("library/validate/p6m", |b| {
        b.iter(|| black_box(tiling.validate().is_ok()));
    });
}

criterion_group! {
    name = benches;
    config = common::tiling_criterion();
    targets = build_catalog_benches, text_format_benches, validate_benches
}
criterion_main!(benches);
