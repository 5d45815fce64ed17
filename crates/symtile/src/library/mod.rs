//! Built-in pattern builders.
//!
//! Every builder is a pure factory returning `Some(Tiling)`, or `None` when
//! the requested name or parameters do not describe a known pattern.
//! Pattern names match case-insensitively.
//!
//! Families:
//! - [`wallpaper`]: the 17 plane groups on square and hexagonal lattices
//! - [`frieze`]: the 7 single-axis groups, reusing wallpaper cells
//! - [`radial`]: rosettes and spirals driven by one repeating destination
//! - [`uniform`]: colorings of the Archimedean tilings
//! - [`catalog`]: the ordered list of every built-in pattern
use crate::geometry::affine::Affine2D;
use crate::geometry::polygon::Polygon;

pub mod catalog;
pub mod frieze;
pub mod radial;
pub mod uniform;
pub mod wallpaper;

pub use catalog::{builtin_by_key, builtin_count, builtin_tiling, BuiltinCatalog};
pub use frieze::create_frieze;
pub use radial::{create_radial, create_radial_simple, create_spiral, update_radial};
pub use uniform::create_uniform_coloring;
pub use wallpaper::create_wallpaper;

pub(crate) fn sqrt3() -> f64 {
    3f64.sqrt()
}

pub(crate) fn rotation(angle: f64, pivot: [f64; 2]) -> Affine2D {
    let mut m = Affine2D::IDENTITY;
    m.rotate(angle, pivot);
    m
}

pub(crate) fn translation(x: f64, y: f64) -> Affine2D {
    Affine2D::from_translation([x, y])
}

pub(crate) fn flip(p1: [f64; 2], p2: [f64; 2]) -> Affine2D {
    Affine2D::from_flip(p1, p2)
}

pub(crate) fn polygon(points: &[[f64; 2]]) -> Polygon {
    Polygon::from_points(points.iter().copied())
}
