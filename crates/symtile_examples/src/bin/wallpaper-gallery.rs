use symtile::library::wallpaper::WALLPAPER_GROUPS;
use symtile::prelude::*;
use symtile_examples::{init_tracing, outline_shapes, render_shapes_to_png, shapes_bbox, ImageConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let renderer = TilingRenderer::try_new(RenderConfig::default())?;
    // Same 4×4 cell window for every group
    let request = RenderRequest::default().with_range(0, 3, 0, 3);

    for group in WALLPAPER_GROUPS {
        let Some(tiling) = create_wallpaper(group) else {
            continue;
        };
        let output = renderer.render(&tiling, &request, &())?;
        let shapes = outline_shapes(&tiling, &output);
        let Some(bbox) = shapes_bbox(&shapes) else {
            continue;
        };
        let config = ImageConfig::fit(&bbox, (800, 800), 0.25);
        render_shapes_to_png(&shapes, &config, format!("wallpaper-{group}.png"))?;
    }

    Ok(())
}
