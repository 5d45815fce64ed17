use std::f64::consts::TAU;

use symtile::prelude::*;
use symtile_examples::{init_tracing, outline_shapes, render_shapes_to_png, ImageConfig, Shape};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Hexagonal coloring clipped to a five-pointed star
    let tiling = create_uniform_coloring("hexagonal 3")
        .ok_or_else(|| anyhow::anyhow!("unknown coloring"))?;
    let star = Polygon::from_points((0..10).map(|i| {
        let r = if i % 2 == 0 { 9.0 } else { 4.0 };
        let a = TAU * f64::from(i) / 10.0 + TAU / 4.0;
        [r * a.cos(), r * a.sin()]
    }));

    let request = RenderRequest::default().with_boundary(star.clone());
    let output = render(&tiling, &request, &())?;
    info!(
        inside = output.cells_visited,
        skipped = output.cells_skipped,
        outlines = output.instance_count(),
        "Clipped to star."
    );

    let mut shapes = outline_shapes(&tiling, &output);
    shapes.push(Shape {
        polygon: star.clone(),
        fill: None,
        stroke: Some([200, 30, 30]),
    });
    let bbox = star.bbox().ok_or_else(|| anyhow::anyhow!("empty boundary"))?;
    let config = ImageConfig::fit(&bbox, (900, 900), 2.0);
    render_shapes_to_png(&shapes, &config, "boundary-clip.png")?;

    Ok(())
}
