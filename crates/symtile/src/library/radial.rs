//! Rosettes and spirals.
//!
//! These are the only built-ins that rely on a recursive destination: one
//! wedge is carried around the origin by repeating a single rotation.
use std::f64::consts::TAU;

use glam::DVec2;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::affine::Affine2D;
use crate::geometry::polygon::Polygon;
use crate::tiling::dest::TilingDest;
use crate::tiling::{RepeatAxes, Tiling};

pub const CIRCULAR_CATEGORY: &str = "Circular";

/// Builds a rosette of `divisions` wedges between `start_radius` and
/// `end_radius`. When `end_angle == start_angle` the wedges span a full turn.
///
/// A mirrored rosette halves each wedge and adds its reflection across the
/// half-wedge edge, rotated into every slice.
pub fn create_radial(
    start_angle: f64,
    end_angle: f64,
    start_radius: f64,
    end_radius: f64,
    divisions: u32,
    mirrored: bool,
) -> Option<Tiling> {
    if divisions == 0 || !(start_angle.is_finite() && end_angle.is_finite()) {
        debug!(
            "Radial pattern needs finite angles and at least one division; got {}.",
            divisions
        );
        return None;
    }
    let mut tiling = Tiling::new(if mirrored { "rm" } else { "r" }, CIRCULAR_CATEGORY);
    fill_radial(
        &mut tiling,
        start_angle,
        end_angle,
        start_radius,
        end_radius,
        divisions,
        mirrored,
    );
    Some(tiling)
}

/// Full-turn rosette of unit radius.
pub fn create_radial_simple(mirrored: bool, divisions: u32) -> Option<Tiling> {
    create_radial(0.0, 0.0, 0.0, 1.0, divisions, mirrored)
}

/// Builds a logarithmic spiral of `divisions` cells per sweep.
///
/// Each step turns by `(end_angle - start_angle) / divisions` and scales by
/// the factor that takes `start_radius` to `end_radius` over a full turn.
/// Both radii must be positive.
pub fn create_spiral(
    start_angle: f64,
    end_angle: f64,
    start_radius: f64,
    end_radius: f64,
    divisions: u32,
) -> Option<Tiling> {
    if divisions == 0 || start_radius <= 0.0 || end_radius <= 0.0 {
        debug!(
            "Spiral needs positive radii and divisions; got {}, {}, {}.",
            start_radius, end_radius, divisions
        );
        return None;
    }
    let mut tiling = Tiling::new("spiral", CIRCULAR_CATEGORY);
    fill_spiral(
        &mut tiling,
        start_angle,
        end_angle,
        start_radius,
        end_radius,
        divisions,
        divisions as i32,
    );
    Some(tiling)
}

/// Rebuilds a circular built-in with a new division count.
///
/// Rosettes are rebuilt at unit radius. A spiral keeps the iteration count
/// of its current destination.
pub fn update_radial(tiling: &mut Tiling, divisions: u32) -> Result<()> {
    if tiling.category != CIRCULAR_CATEGORY {
        return Err(Error::UnsupportedTiling(format!(
            "'{}' is not a circular pattern",
            tiling.name
        )));
    }
    if divisions < 1 {
        return Err(Error::UnsupportedTiling(
            "radial patterns need at least one division".into(),
        ));
    }

    match tiling.name.as_str() {
        "spiral" => {
            let iterations = tiling
                .basecells
                .first()
                .and_then(|op| op.transforms.first())
                .map_or(divisions as i32, |d| d.max_iterations);
            tiling.basecells.clear();
            fill_spiral(tiling, 0.0, 2.0 * TAU, 5.0, 3.0, divisions, iterations);
        }
        "r" | "rm" => {
            let mirrored = tiling.name == "rm";
            tiling.basecells.clear();
            fill_radial(tiling, 0.0, 0.0, 0.0, 1.0, divisions, mirrored);
        }
        other => {
            return Err(Error::UnsupportedTiling(format!(
                "no radial builder for '{other}'"
            )));
        }
    }
    Ok(())
}

fn sweep(start_angle: f64, end_angle: f64) -> f64 {
    if end_angle == start_angle {
        TAU
    } else {
        end_angle - start_angle
    }
}

fn mark_circular(tiling: &mut Tiling, divisions: u32) {
    tiling.repeatable = RepeatAxes::NONE;
    tiling.radial_divisions = divisions;
    tiling.required_interface = "radial".into();
}

fn fill_radial(
    tiling: &mut Tiling,
    start_angle: f64,
    end_angle: f64,
    start_radius: f64,
    end_radius: f64,
    divisions: u32,
    mirrored: bool,
) {
    mark_circular(tiling, divisions);
    let step = sweep(start_angle, end_angle) / divisions as f64;
    let cell = if mirrored { step / 2.0 } else { step };

    let mut outline = Polygon::new();
    outline.append_point(start_radius * DVec2::from_angle(start_angle));
    outline.append_point(end_radius * DVec2::from_angle(start_angle));
    outline.append_arc(DVec2::ZERO, cell);
    if start_radius != 0.0 {
        outline.append_point(start_radius * DVec2::from_angle(start_angle + cell));
        outline.append_arc(DVec2::ZERO, -cell);
    }
    outline.close();

    let op = tiling.add_base(outline);
    op.add_dest(TilingDest::repeated(
        Affine2D::from_rotation(step),
        divisions as i32,
    ));

    if mirrored {
        let mut slice = Affine2D::from_flip(DVec2::ZERO, DVec2::from_angle(start_angle + cell));
        op.add_dest(TilingDest::repeated(slice, 1));
        for _ in 1..divisions {
            slice.rotate(step, DVec2::ZERO);
            op.add_transform(slice);
        }
    }
}

fn fill_spiral(
    tiling: &mut Tiling,
    start_angle: f64,
    end_angle: f64,
    start_radius: f64,
    end_radius: f64,
    divisions: u32,
    iterations: i32,
) {
    mark_circular(tiling, divisions);
    let step = sweep(start_angle, end_angle) / divisions as f64;
    let growth = (step / TAU * (end_radius / start_radius).ln()).exp();
    let next_angle = start_angle + step;

    let outline = Polygon::from_points([
        end_radius * DVec2::from_angle(start_angle),
        start_radius * DVec2::from_angle(start_angle),
        start_radius * growth * DVec2::from_angle(next_angle),
        end_radius * growth * DVec2::from_angle(next_angle),
    ]);

    let mut transform = Affine2D::from_rotation(step);
    transform.scale(growth, DVec2::ZERO);
    tiling
        .add_base(outline)
        .add_dest(TilingDest::repeated(transform, iterations));
}
