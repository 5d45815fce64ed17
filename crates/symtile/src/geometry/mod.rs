//! Geometry primitives shared by tilings and the renderer.
pub mod affine;
pub mod polygon;

pub use affine::{Affine2D, SINGULAR_EPSILON};
pub use polygon::{bbox_of_points, point_in_polygon, BBox, Polygon};
