use std::collections::HashMap;
use std::path::Path;

use glam::DVec2;
use image::RgbaImage;
use symtile::prelude::{BBox, ObjectId, Polygon, RenderOutput, Tiling};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::info;

/// Installs a stderr `tracing` subscriber honoring `RUST_LOG`, at `info` by default.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// A polygon to draw, in world units.
#[derive(Debug, Clone)]
pub struct Shape {
    pub polygon: Polygon,
    pub fill: Option<[u8; 3]>,
    pub stroke: Option<[u8; 3]>,
}

/// Output image size and the world rectangle it shows.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub image_size: (u32, u32),
    pub view_min: DVec2,
    pub view_max: DVec2,
    pub background: [u8; 3],
}

impl ImageConfig {
    pub fn new(image_size: (u32, u32), view_min: [f64; 2], view_max: [f64; 2]) -> Self {
        Self {
            image_size,
            view_min: DVec2::from(view_min),
            view_max: DVec2::from(view_max),
            background: [255, 255, 255],
        }
    }

    /// View of `bbox` grown by `margin` on every side, keeping square pixels.
    pub fn fit(bbox: &BBox, image_size: (u32, u32), margin: f64) -> Self {
        let aspect = f64::from(image_size.0) / f64::from(image_size.1.max(1));
        let mut half = (bbox.max - bbox.min) * 0.5 + DVec2::splat(margin);
        if half.x / half.y.max(f64::EPSILON) < aspect {
            half.x = half.y * aspect;
        } else {
            half.y = half.x / aspect;
        }
        let center = bbox.center();
        Self {
            image_size,
            view_min: center - half,
            view_max: center + half,
            background: [255, 255, 255],
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    fn to_pixel(&self, p: DVec2) -> DVec2 {
        let (w, h) = (f64::from(self.image_size.0), f64::from(self.image_size.1));
        let span = (self.view_max - self.view_min).max(DVec2::splat(f64::EPSILON));
        let t = (p - self.view_min) / span;
        DVec2::new(t.x * w, (1.0 - t.y) * h)
    }
}

/// Guide color for base cell `index` out of `count`, red to blue.
pub fn base_cell_color(index: usize, count: usize) -> [u8; 3] {
    let t = if count > 1 {
        (index as f64 / (count - 1) as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let light = |v: f64| (110.0 + 145.0 * v).round() as u8;
    [light(1.0 - t), 110, light(t)]
}

/// Trace outlines of `output`, filled by base cell.
pub fn outline_shapes(tiling: &Tiling, output: &RenderOutput) -> Vec<Shape> {
    let count = tiling.basecells.len();
    output
        .clones
        .outlines()
        .filter_map(|instance| {
            let polygon = instance.placed_outline(tiling)?;
            Some(Shape {
                polygon,
                fill: Some(base_cell_color(instance.base_cell, count)),
                stroke: Some([40, 40, 40]),
            })
        })
        .collect()
}

/// Source clones of `output`, drawing each object's geometry at its clone transform.
pub fn source_shapes(
    output: &RenderOutput,
    geometry: &HashMap<ObjectId, (Polygon, [u8; 3])>,
) -> Vec<Shape> {
    output
        .clones
        .iter()
        .filter_map(|instance| {
            let (polygon, color) = geometry.get(&instance.source()?)?;
            Some(Shape {
                polygon: polygon.transformed(&instance.transform),
                fill: Some(*color),
                stroke: None,
            })
        })
        .collect()
}

/// Union of the shapes' bounding boxes.
pub fn shapes_bbox(shapes: &[Shape]) -> Option<BBox> {
    let mut boxes = shapes.iter().filter_map(|s| s.polygon.bbox());
    let mut out = boxes.next()?;
    for b in boxes {
        out.include(b.min);
        out.include(b.max);
    }
    Some(out)
}

/// Rasterizes `shapes` in order onto an opaque image.
pub fn render_shapes(shapes: &[Shape], config: &ImageConfig) -> anyhow::Result<RgbaImage> {
    let (w, h) = config.image_size;
    let mut pixmap = Pixmap::new(w, h)
        .ok_or_else(|| anyhow::anyhow!("cannot allocate a {w}x{h} pixmap"))?;
    let [r, g, b] = config.background;
    pixmap.fill(Color::from_rgba8(r, g, b, 255));

    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };
    for shape in shapes {
        let Some(path) = shape_path(&shape.polygon, config) else {
            continue;
        };
        if let Some(color) = shape.fill {
            let paint = solid(color);
            pixmap.fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);
        }
        if let Some(color) = shape.stroke {
            let paint = solid(color);
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    // Every pixel is opaque, so premultiplied bytes equal straight RGBA.
    RgbaImage::from_raw(w, h, pixmap.take())
        .ok_or_else(|| anyhow::anyhow!("pixmap size does not match {w}x{h}"))
}

/// Rasterizes `shapes` and writes a PNG.
pub fn render_shapes_to_png(
    shapes: &[Shape],
    config: &ImageConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let out_path = out_path.as_ref();
    let img = render_shapes(shapes, config)?;
    img.save(out_path)?;
    info!(
        path = %out_path.display(),
        shapes = shapes.len(),
        width = img.width(),
        height = img.height(),
        "Wrote image."
    );
    Ok(())
}

fn shape_path(polygon: &Polygon, config: &ImageConfig) -> Option<tiny_skia::Path> {
    let mut points = polygon.points().iter().map(|p| config.to_pixel(*p));
    let first = points.next()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.x as f32, first.y as f32);
    for p in points {
        builder.line_to(p.x as f32, p.y as f32);
    }
    if polygon.is_closed() {
        builder.close();
    }
    builder.finish()
}

fn solid(color: [u8; 3]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], 255);
    paint.anti_alias = true;
    paint
}
