//! The 17 wallpaper groups.
//!
//! Each group lists, per base cell, the explicit rigid motions that fill one
//! repeat unit. Square-lattice groups tile the unit square; the hexagonal
//! ones use [`Tiling::default_hex`] with side 1.
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};

use tracing::debug;

use crate::geometry::affine::Affine2D;
use crate::geometry::polygon::Polygon;
use crate::library::{flip, polygon, rotation, sqrt3, translation};
use crate::tiling::{RepeatAxes, Tiling};

/// Canonical names, in catalog order.
pub const WALLPAPER_GROUPS: [&str; 17] = [
    "p1", "p2", "pm", "pg", "cm", "pmm", "pmg", "pgg", "cmm", "p4", "p4m", "p4g", "p3", "p3m1",
    "p31m", "p6", "p6m",
];

/// Builds the wallpaper group `group`. An empty name means `p1`.
pub fn create_wallpaper(group: &str) -> Option<Tiling> {
    let canonical = canonical_name(group)?;
    let mut tiling = Tiling::new(canonical, "Wallpaper");
    fill_wallpaper(&mut tiling, canonical).then_some(tiling)
}

fn canonical_name(group: &str) -> Option<&'static str> {
    let group = group.trim();
    if group.is_empty() {
        return Some("p1");
    }
    let found = WALLPAPER_GROUPS
        .iter()
        .copied()
        .find(|name| name.eq_ignore_ascii_case(group));
    if found.is_none() {
        debug!("Unknown wallpaper group '{}'.", group);
    }
    found
}

/// Adds the base cells of `group` to `tiling`, keeping its name and category.
pub(crate) fn fill_wallpaper(tiling: &mut Tiling, group: &str) -> bool {
    let Some(group) = canonical_name(group) else {
        return false;
    };
    tiling.repeatable = RepeatAxes::BOTH;
    let s3 = sqrt3();
    let id = Affine2D::IDENTITY;

    match group {
        "p1" => {
            let op = tiling.add_base(Polygon::rect(0.0, 0.0, 1.0, 1.0));
            op.shearable = true;
            op.flexible_aspect = true;
            op.add_transform(id);
        }
        "p2" => {
            let op = tiling.add_base(Polygon::rect(0.0, 0.0, 0.5, 1.0));
            op.shearable = true;
            op.flexible_aspect = true;
            op.add_transform(id);
            op.add_transform(rotation(PI, [0.5, 0.5]));
        }
        "pm" => {
            let op = tiling.add_base(Polygon::rect(0.0, 0.0, 0.5, 1.0));
            op.flexible_aspect = true;
            op.add_transform(id);
            op.add_transform(flip([0.5, 0.0], [0.5, 1.0]));
        }
        "pg" => {
            let op = tiling.add_base(Polygon::rect(0.0, 0.0, 0.5, 1.0));
            op.flexible_aspect = true;
            op.add_transform(id);
            op.add_transform(translation(0.5, 0.0).then(&flip([0.0, 0.5], [1.0, 0.5])));
        }
        "cm" => {
            let op = tiling.add_base(Polygon::rect(0.0, 0.0, 0.5, 0.5));
            op.flexible_aspect = true;
            op.add_transform(id);
            op.add_transform(flip([0.0, 0.5], [1.0, 0.5]));
            op.add_transform(translation(0.5, 0.0).then(&flip([0.0, 0.25], [1.0, 0.25])));
            op.add_transform(translation(0.5, 0.5));
        }
        "pmm" => {
            let flip_h = flip([0.0, 0.5], [1.0, 0.5]);
            let flip_v = flip([0.5, 0.0], [0.5, 1.0]);
            let op = tiling.add_base(Polygon::rect(0.0, 0.0, 0.5, 0.5));
            op.flexible_aspect = true;
            op.add_transform(id);
            op.add_transform(flip_h);
            op.add_transform(flip_v);
            op.add_transform(flip_h.then(&flip_v));
        }
        "pmg" => {
            let flip_h = flip([0.0, 0.5], [1.0, 0.5]);
            let half_turn = rotation(PI, [0.5, 0.25]);
            let op = tiling.add_base(Polygon::rect(0.0, 0.0, 0.5, 0.5));
            op.flexible_aspect = true;
            op.add_transform(id);
            op.add_transform(flip_h);
            op.add_transform(half_turn);
            op.add_transform(half_turn.then(&flip_h));
        }
        "pgg" => {
            let op = tiling.add_base(Polygon::rect(0.0, 0.0, 0.5, 0.5));
            op.flexible_aspect = true;
            op.add_transform(id);
            op.add_transform(rotation(PI, [0.25, 0.5]));
            op.add_transform(translation(0.5, 0.0).then(&flip([0.0, 0.25], [1.0, 0.25])));
            op.add_transform(translation(0.0, 0.5).then(&flip([0.5, 0.0], [0.5, 1.0])));
        }
        "cmm" => {
            let op = tiling.add_base(Polygon::rect(0.0, 0.0, 0.25, 0.5));
            op.flexible_aspect = true;
            op.add_transform(id);
            op.add_transform(flip([0.25, 0.0], [0.25, 1.0]));
            op.add_transform(translation(0.5, 0.0).then(&flip([0.0, 0.25], [1.0, 0.25])));
            op.add_transform(rotation(PI, [0.5, 0.25]));
            op.add_transform(flip([0.0, 0.5], [1.0, 0.5]));
            op.add_transform(rotation(PI, [0.25, 0.5]));
            op.add_transform(translation(0.5, 0.5));
            op.add_transform(flip([0.5, 0.0], [0.5, 1.0]).then(&translation(0.0, 0.5)));
        }
        "p4" => {
            let op = tiling.add_base(Polygon::rect(0.0, 0.0, 0.5, 0.5));
            for angle in [0.0, FRAC_PI_2, PI, -FRAC_PI_2] {
                op.add_transform(rotation(angle, [0.5, 0.5]));
            }
        }
        "p4m" => {
            let outline = polygon(&[[0.0, 0.0], [0.5, 0.0], [0.5, 0.5]]);
            add_square_dihedral(tiling, outline, flip([0.0, 0.0], [0.5, 0.5]));
        }
        "p4g" => {
            let outline = polygon(&[[0.0, 0.0], [0.5, 0.0], [0.0, 0.5]]);
            add_square_dihedral(tiling, outline, flip([0.5, 0.0], [0.0, 0.5]));
        }
        "p3" => {
            tiling.default_hex(1.0);
            let center = [s3 / 2.0, 1.0];
            let op = tiling.add_base(polygon(&[
                [s3 / 2.0, 0.0],
                [s3 / 2.0, 1.0],
                [0.0, 1.5],
                [0.0, 0.5],
            ]));
            op.add_transform(id);
            op.add_transform(rotation(2.0 * PI / 3.0, center));
            op.add_transform(rotation(-2.0 * PI / 3.0, center));
        }
        "p3m1" => {
            tiling.default_hex(1.0);
            let center = [s3 / 2.0, 1.0];
            let mirror = flip(center, [0.0, 0.5]);
            let op = tiling.add_base(polygon(&[[s3 / 2.0, 0.0], [s3 / 2.0, 1.0], [0.0, 0.5]]));
            op.add_transform(id);
            op.add_transform(rotation(2.0 * PI / 3.0, center));
            op.add_transform(rotation(-2.0 * PI / 3.0, center));
            op.add_transform(mirror);
            op.add_transform(mirror.then(&rotation(2.0 * PI / 3.0, center)));
            op.add_transform(mirror.then(&rotation(-2.0 * PI / 3.0, center)));
        }
        "p31m" => {
            tiling.default_hex(1.0);
            let center = [s3 / 2.0, 1.0];
            let posts = [
                id,
                flip(center, [0.0, 1.5]),
                rotation(2.0 * PI / 3.0, center),
                flip([s3 / 2.0, 0.0], center),
                rotation(-2.0 * PI / 3.0, center),
                flip(center, [0.0, 0.5]),
            ];
            add_triad_clusters(tiling, &posts);
        }
        "p6" => {
            tiling.default_hex(1.0);
            let center = [s3 / 2.0, 1.0];
            let posts: Vec<Affine2D> = (0..6)
                .map(|c| rotation(c as f64 * FRAC_PI_3, center))
                .collect();
            add_triad_clusters(tiling, &posts);
        }
        "p6m" => {
            tiling.default_hex(1.0);
            let center = [s3 / 2.0, 1.0];
            let mirror = flip([0.0, 1.0], [s3, 1.0]);
            let op = tiling.add_base(polygon(&[[0.0, 0.5], [s3 / 2.0, 1.0], [0.0, 1.0]]));
            op.add_transform(id);
            op.add_transform(mirror);
            for c in 1..6 {
                let turn = rotation(c as f64 * FRAC_PI_3, center);
                op.add_transform(turn);
                op.add_transform(mirror.then(&turn));
            }
        }
        _ => return false,
    }
    true
}

/// Triangle reflected across `mirror`, then both turned about the square
/// center by a quarter, half and three quarters.
fn add_square_dihedral(tiling: &mut Tiling, outline: Polygon, mirror: Affine2D) {
    let center = [0.5, 0.5];
    let op = tiling.add_base(outline);
    op.add_transform(Affine2D::IDENTITY);
    op.add_transform(mirror);
    for angle in [FRAC_PI_2, PI, -FRAC_PI_2] {
        op.add_transform(mirror.then(&rotation(angle, center)));
    }
    for angle in [FRAC_PI_2, PI, -FRAC_PI_2] {
        op.add_transform(rotation(angle, center));
    }
}

/// Thin triangle turned three ways about its own center, with that
/// cluster then carried by each of `posts`.
fn add_triad_clusters(tiling: &mut Tiling, posts: &[Affine2D]) {
    let s3 = sqrt3();
    let triad_center = [1.0 / 2.0 / s3, 1.0];
    let cluster = [
        Affine2D::IDENTITY,
        rotation(2.0 * PI / 3.0, triad_center),
        rotation(-2.0 * PI / 3.0, triad_center),
    ];
    let op = tiling.add_base(polygon(&[[0.0, 0.5], triad_center, [0.0, 1.5]]));
    for post in posts {
        for member in &cluster {
            op.add_transform(member.then(post));
        }
    }
}
