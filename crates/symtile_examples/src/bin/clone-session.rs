use std::collections::HashMap;

use symtile::prelude::*;
use symtile_examples::{
    init_tracing, outline_shapes, render_shapes_to_png, shapes_bbox, source_shapes, ImageConfig,
};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut doc = MemoryDocument::new();
    let leaf = doc.add_object(Affine2D::from_translation([0.15, 0.1]));
    let dot = doc.add_object(Affine2D::from_translation([0.3, 0.25]));
    let geometry = HashMap::from([
        (
            leaf,
            (
                Polygon::from_points([[0.0, 0.0], [0.2, 0.05], [0.05, 0.2]]),
                [30, 120, 60],
            ),
        ),
        (dot, (Polygon::regular([0.0, 0.0], 0.05, true, 12), [220, 140, 20])),
    ]);

    let sink = FnSink::new(|event: SessionEvent| tracing::info!(?event, "Session event."));
    let tiling = BuiltinCatalog::global().get("Wallpaper/p4m")?;
    let mut session = CloneSession::try_with_sink(SessionConfig::default(), tiling, sink)?;
    session.assign_source(0, leaf)?;
    session.assign_source(0, dot)?;
    session.activate(&mut doc)?;
    session.toggle_trace_cells(&mut doc)?;

    // Walk a few catalog entries, writing one frame per tiling
    for frame in 0..4 {
        if let Some(output) = session.preview().and_then(|node| doc.node(node)) {
            let mut shapes = outline_shapes(session.tiling(), output);
            shapes.extend(source_shapes(output, &geometry));
            if let Some(bbox) = shapes_bbox(&shapes) {
                let config = ImageConfig::fit(&bbox, (800, 800), 0.2);
                render_shapes_to_png(
                    &shapes,
                    &config,
                    format!("clone-session-{frame}-{}.png", session.tiling().name),
                )?;
            }
        }
        session.next_tiling(&mut doc)?;
    }

    session.shutdown(&mut doc);
    Ok(())
}
