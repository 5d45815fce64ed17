#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use symtile::prelude::{
    CellRange, LatticeExtent, RenderConfig, RenderRequest, SourceLookup, Tiling, TilingRenderer,
};

/// Short runs: a render of the largest extent finishes well under a second.
pub fn tiling_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(30)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3))
}

/// Renderer with room for the largest benchmarked extent.
pub fn bench_renderer() -> TilingRenderer {
    TilingRenderer::new(RenderConfig::new().with_max_instances(2_000_000))
}

/// Request covering cells `0..n` on both axes.
pub fn square_request(n: i32) -> RenderRequest {
    RenderRequest::new(LatticeExtent::Range(CellRange::new(0, n - 1, 0, n - 1)))
}

/// Clones produced by one render of `request`, reported per element.
pub fn clone_throughput(
    renderer: &TilingRenderer,
    tiling: &Tiling,
    request: &RenderRequest,
    sources: &(impl SourceLookup + ?Sized),
) -> Throughput {
    let clones = renderer
        .render(tiling, request, sources)
        .map_or(0, |out| out.instance_count());
    Throughput::Elements(clones.max(1) as u64)
}

pub fn text_throughput(text: &str) -> Throughput {
    Throughput::Bytes(text.len() as u64)
}
