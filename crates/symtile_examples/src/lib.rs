#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    base_cell_color, init_tracing, outline_shapes, render_shapes, render_shapes_to_png,
    shapes_bbox, source_shapes, ImageConfig, Shape,
};
