use std::f64::consts::PI;

use symtile::prelude::*;
use symtile_examples::{init_tracing, outline_shapes, render_shapes_to_png, shapes_bbox, ImageConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Plain and mirrored rosettes, then a two-turn spiral
    let patterns = [
        ("radial-rosette-12.png", create_radial_simple(false, 12)),
        ("radial-rosette-mirrored-6.png", create_radial_simple(true, 6)),
        ("radial-annulus-8.png", create_radial(0.0, 0.0, 0.5, 1.0, 8, false)),
        ("radial-spiral.png", create_spiral(0.0, 4.0 * PI, 5.0, 3.0, 24)),
    ];

    for (path, tiling) in patterns {
        let tiling = tiling.ok_or_else(|| anyhow::anyhow!("could not build {path}"))?;
        let output = render(&tiling, &RenderRequest::default(), &())?;
        let shapes = outline_shapes(&tiling, &output);
        let Some(bbox) = shapes_bbox(&shapes) else {
            continue;
        };
        let config = ImageConfig::fit(&bbox, (800, 800), 0.1).with_background([250, 248, 240]);
        render_shapes_to_png(&shapes, &config, path)?;
    }

    Ok(())
}
