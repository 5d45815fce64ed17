//! Colorings of the uniform (Archimedean) tilings.
//!
//! Each numbered variant of a tiling distinguishes its tiles by placing them
//! through different base cells: tiles that share a base cell share a color.
//! All outlines use unit edge length.
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI, SQRT_2};

use tracing::debug;

use crate::geometry::affine::Affine2D;
use crate::geometry::polygon::Polygon;
use crate::library::wallpaper::fill_wallpaper;
use crate::library::{polygon, rotation, sqrt3, translation};
use crate::tiling::{Tiling, TilingOp};

pub const UNIFORM_CATEGORY: &str = "Uniform Coloring";

/// Coloring names, in catalog order.
pub const UNIFORM_COLORINGS: [&str; 32] = [
    "elongated triangular",
    "hexagonal 1",
    "hexagonal 2",
    "hexagonal 3",
    "rhombi trihexagonal",
    "snub hexagonal",
    "snub square 1",
    "snub square 2",
    "square 1",
    "square 2",
    "square 3",
    "square 4",
    "square 5",
    "square 6",
    "square 7",
    "square 8",
    "square 9",
    "triangular 1",
    "triangular 2",
    "triangular 3",
    "triangular 4",
    "triangular 5",
    "triangular 6",
    "triangular 7",
    "triangular 8",
    "triangular 9",
    "trihexagonal 1",
    "trihexagonal 2",
    "truncated hexagonal",
    "truncated trihexagonal",
    "truncated square 1",
    "truncated square 2",
];

/// Builds the coloring `name`, e.g. `"snub square 2"`.
pub fn create_uniform_coloring(name: &str) -> Option<Tiling> {
    let name = name.trim();
    let Some(canonical) = UNIFORM_COLORINGS
        .iter()
        .copied()
        .find(|n| n.eq_ignore_ascii_case(name))
    else {
        debug!("Unknown uniform coloring '{}'.", name);
        return None;
    };

    let mut tiling = Tiling::new(canonical, UNIFORM_CATEGORY);
    let (family, variant) = match canonical.rsplit_once(' ') {
        Some((family, n)) if n.chars().all(|c| c.is_ascii_digit()) => {
            (family, n.parse::<u8>().unwrap_or(1))
        }
        _ => (canonical, 1),
    };

    match family {
        "square" => square(&mut tiling, variant),
        "hexagonal" => hexagonal(&mut tiling, variant),
        "snub square" => snub_square(&mut tiling, variant),
        "elongated triangular" => elongated_triangular(&mut tiling),
        "truncated square" => truncated_square(&mut tiling, variant),
        "triangular" => triangular(&mut tiling, variant),
        "trihexagonal" => trihexagonal(&mut tiling, variant),
        "snub hexagonal" => snub_hexagonal(&mut tiling),
        "rhombi trihexagonal" => rhombi_trihexagonal(&mut tiling),
        "truncated hexagonal" => truncated_hexagonal(&mut tiling),
        "truncated trihexagonal" => truncated_trihexagonal(&mut tiling),
        _ => return None,
    }
    Some(tiling)
}

fn unit_square(tiling: &mut Tiling, x: f64, y: f64) -> &mut TilingOp {
    let op = tiling.add_base(Polygon::rect(x, y, 1.0, 1.0));
    op.shearable = true;
    op.flexible_aspect = true;
    op
}

fn square(tiling: &mut Tiling, variant: u8) {
    let id = Affine2D::IDENTITY;
    match variant {
        1 => {
            fill_wallpaper(tiling, "p1");
        }
        2 | 3 => {
            tiling.set_repeat_x([2.0, 0.0]);
            tiling.set_repeat_y(if variant == 3 { [1.0, 2.0] } else { [0.0, 2.0] });
            let op = unit_square(tiling, 0.0, 0.0);
            op.add_transform(id);
            op.add_transform(translation(1.0, 0.0));
            op.add_transform(translation(0.0, 1.0));
            unit_square(tiling, 1.0, 1.0).add_transform(id);
        }
        4 | 5 => {
            if variant == 5 {
                tiling.set_repeat_x([1.0, 1.0]);
            }
            tiling.set_repeat_y([0.0, 2.0]);
            unit_square(tiling, 0.0, 0.0).add_transform(id);
            unit_square(tiling, 0.0, 1.0).add_transform(id);
        }
        _ => {
            tiling.set_repeat_x([2.0, 0.0]);
            tiling.set_repeat_y(if variant == 7 { [1.0, 2.0] } else { [0.0, 2.0] });
            let op = unit_square(tiling, 0.0, 0.0);
            op.add_transform(id);
            match variant {
                9 => {
                    unit_square(tiling, 1.0, 0.0).add_transform(id);
                }
                8 => {
                    op.add_transform(translation(1.0, 1.0));
                }
                _ => {
                    op.add_transform(translation(1.0, 0.0));
                }
            }
            unit_square(tiling, 0.0, 1.0).add_transform(id);
            let corner_y = if variant == 8 { 0.0 } else { 1.0 };
            unit_square(tiling, 1.0, corner_y).add_transform(id);
        }
    }
}

fn hexagon(center: [f64; 2]) -> Polygon {
    Polygon::regular(center, 1.0, false, 6)
}

fn hexagonal(tiling: &mut Tiling, variant: u8) {
    let s3 = sqrt3();
    let id = Affine2D::IDENTITY;
    if variant == 1 {
        tiling.default_hex(1.0);
        tiling.add_base(hexagon([s3 / 2.0, 1.0])).add_transform(id);
        return;
    }

    tiling.set_repeat_x([1.5 * s3, 1.5]);
    tiling.set_repeat_y([0.0, 3.0]);
    let op = tiling.add_base(hexagon([s3 / 2.0, 1.0]));
    op.add_transform(id);
    if variant == 2 {
        op.add_transform(translation(s3, 0.0));
    } else {
        tiling.add_base(hexagon([1.5 * s3, 1.0])).add_transform(id);
    }
    tiling.add_base(hexagon([s3, 2.5])).add_transform(id);
}

fn snub_square(tiling: &mut Tiling, variant: u8) {
    let s = sqrt3() / 2.0;
    tiling.set_repeat_x([1.0 + 2.0 * s, 0.0]);
    tiling.set_repeat_y([0.5 + s, 0.5 + s]);

    let diamond = tiling.add_base(polygon(&[[0.0, s], [0.5, 0.0], [1.0, s], [0.5, 2.0 * s]]));
    diamond.add_transform(Affine2D::IDENTITY);
    diamond.add_transform(rotation(FRAC_PI_2, [0.5, s]).then(&translation(0.5 + s, 0.0)));

    let square = tiling.add_base(polygon(&[
        [0.5, 0.0],
        [0.5 + s, -0.5],
        [1.0 + s, -0.5 + s],
        [1.0, s],
    ]));
    square.add_transform(Affine2D::IDENTITY);
    if variant == 1 {
        square.add_transform(rotation(-FRAC_PI_3, [1.0, s]).then(&translation(-0.5, s)));
    } else {
        tiling
            .add_base(polygon(&[
                [1.0, s],
                [1.0 + s, s + 0.5],
                [0.5 + s, 2.0 * s + 0.5],
                [0.5, 2.0 * s],
            ]))
            .add_transform(Affine2D::IDENTITY);
    }
}

fn elongated_triangular(tiling: &mut Tiling) {
    let s3 = sqrt3();
    tiling.set_repeat_y([-0.5, 1.0 + s3 / 2.0]);
    let triangle = tiling.add_base(upward_triangle());
    triangle.add_transform(Affine2D::IDENTITY);
    triangle.add_transform(rotation(PI, [0.75, s3 / 4.0]));
    tiling
        .add_base(Polygon::rect(0.0, -1.0, 1.0, 1.0))
        .add_transform(Affine2D::IDENTITY);
}

fn truncated_square(tiling: &mut Tiling, variant: u8) {
    let span = 1.0 + SQRT_2;
    if variant == 2 {
        tiling.set_repeat_x([2.0 * span, 0.0]);
        tiling.set_repeat_y([span, span]);
    } else {
        tiling.set_repeat_x([span, 0.0]);
        tiling.set_repeat_y([0.0, span]);
    }

    let x = 0.5 + 1.0 / SQRT_2;
    let octagon = Polygon::regular([x, x], (0.25 + x * x).sqrt(), false, 8);
    if variant == 2 {
        let mut shifted = octagon.clone();
        shifted.translate([span, 0.0]);
        tiling.add_base(octagon).add_transform(Affine2D::IDENTITY);
        tiling.add_base(shifted).add_transform(Affine2D::IDENTITY);
    } else {
        tiling.add_base(octagon).add_transform(Affine2D::IDENTITY);
    }

    let a = 1.0 / SQRT_2;
    let square = tiling.add_base(polygon(&[[-a, 0.0], [0.0, a], [a, 0.0], [0.0, -a]]));
    square.add_transform(Affine2D::IDENTITY);
    if variant == 2 {
        square.add_transform(translation(span, 0.0));
    }
}

/// Unit triangle standing on the x axis, apex up.
fn upward_triangle() -> Polygon {
    polygon(&[[0.0, 0.0], [1.0, 0.0], [0.5, sqrt3() / 2.0]])
}

fn downward_triangle() -> Polygon {
    polygon(&[[0.0, 0.0], [1.0, 0.0], [0.5, -sqrt3() / 2.0]])
}

fn triangular(tiling: &mut Tiling, variant: u8) {
    let s3 = sqrt3();
    let s = s3 / 2.0;
    let id = Affine2D::IDENTITY;
    let pivot = [1.0, 0.0];

    match variant {
        1 => {
            tiling.set_repeat_y([0.5, -s]);
            let op = tiling.add_base(upward_triangle());
            op.add_transform(id);
            op.add_transform(rotation(PI, [0.75, s3 / 4.0]));
        }
        2 => {
            tiling.set_repeat_x([1.5, -s]);
            tiling.set_repeat_y([0.0, s3]);
            let op = tiling.add_base(upward_triangle());
            let mut fan = id;
            op.add_transform(fan);
            for _ in 0..4 {
                fan.rotate(-FRAC_PI_3, pivot);
                op.add_transform(fan);
            }
            tiling
                .add_base(polygon(&[[0.5, s], [1.0, 0.0], [1.5, s]]))
                .add_transform(id);
        }
        3 => {
            tiling.set_repeat_y([0.5, s]);
            tiling.add_base(upward_triangle()).add_transform(id);
            tiling
                .add_base(polygon(&[[0.5, s], [1.0, 0.0], [1.5, s]]))
                .add_transform(id);
        }
        4 => {
            tiling.set_repeat_x([2.0, 0.0]);
            tiling.set_repeat_y([0.0, s3]);

            let up = tiling.add_base(upward_triangle());
            let mut m = id;
            up.add_transform(m);
            m.rotate(PI, [0.75, s3 / 4.0]);
            up.add_transform(m);
            m.rotate(FRAC_PI_3, pivot).translate([0.5, -s]);
            up.add_transform(m);
            m.rotate(PI, [1.75, -s3 / 4.0]);
            up.add_transform(m);

            let down = tiling.add_base(downward_triangle());
            let mut m = id;
            down.add_transform(m);
            m.rotate(PI, [0.75, -s3 / 4.0]);
            down.add_transform(m);
            m.rotate(-FRAC_PI_3, pivot).translate([0.5, s]);
            down.add_transform(m);
            m.rotate(PI, [1.75, s3 / 4.0]);
            down.add_transform(m);
        }
        5 | 8 => {
            tiling.set_repeat_x([1.5, -s]);
            tiling.set_repeat_y([0.0, s3]);

            let wedge = polygon(&[[1.0, 0.0], [1.5, s], [0.5, s]]);
            let turned = wedge.transformed(&rotation(-2.0 * PI / 3.0, pivot));
            let op = tiling.add_base(wedge);
            op.add_transform(id);
            if variant == 8 {
                tiling.add_base(turned).add_transform(id);
            } else {
                op.add_transform(rotation(-2.0 * PI / 3.0, pivot));
            }

            let op = tiling.add_base(upward_triangle());
            let mut m = id;
            op.add_transform(m);
            for angle in [2.0 * PI / 3.0, FRAC_PI_3, FRAC_PI_3] {
                m.rotate(angle, pivot);
                op.add_transform(m);
            }
        }
        6 | 9 => {
            tiling.set_repeat_x([1.5, -s]);
            tiling.set_repeat_y([0.0, s3]);

            let third = rotation(2.0 * PI / 3.0, pivot);
            let wedge = polygon(&[[0.5, s], [1.0, 0.0], [1.5, s]]);
            let second = wedge.transformed(&third);
            tiling.add_base(wedge).add_transform(id);
            let op = tiling.add_base(second.clone());
            op.add_transform(id);
            if variant == 9 {
                tiling
                    .add_base(second.transformed(&third))
                    .add_transform(id);
            } else {
                op.add_transform(translation(-1.0, 0.0));
            }

            let op = tiling.add_base(upward_triangle());
            let mut m = id;
            op.add_transform(m);
            for _ in 0..2 {
                m.rotate(2.0 * PI / 3.0, pivot);
                op.add_transform(m);
            }
        }
        _ => {
            tiling.set_repeat_y([0.0, s3]);
            let up = tiling.add_base(upward_triangle());
            up.add_transform(id);
            up.add_transform(rotation(PI, [0.75, s3 / 4.0]));
            let down = tiling.add_base(downward_triangle());
            down.add_transform(id);
            down.add_transform(rotation(PI, [0.75, -s3 / 4.0]));
        }
    }
}

fn trihexagonal(tiling: &mut Tiling, variant: u8) {
    let s = sqrt3() / 2.0;
    tiling.set_repeat_x([2.0, 0.0]);
    tiling.set_repeat_y([1.0, 2.0 * s]);

    tiling
        .add_base(Polygon::regular([1.0, 0.0], 1.0, true, 6))
        .add_transform(Affine2D::IDENTITY);

    let triangle = polygon(&[[2.0, 0.0], [2.5, s], [1.5, s]]);
    let half_turn = rotation(PI, [2.0, 0.0]);
    let flipped = triangle.transformed(&half_turn);
    let op = tiling.add_base(triangle);
    op.add_transform(Affine2D::IDENTITY);
    if variant == 2 {
        tiling.add_base(flipped).add_transform(Affine2D::IDENTITY);
    } else {
        op.add_transform(half_turn);
    }
}

fn snub_hexagonal(tiling: &mut Tiling) {
    let s3 = sqrt3();
    let s = s3 / 2.0;
    tiling.set_repeat_x([2.5, -s]);
    tiling.set_repeat_y([2.0, s3]);

    tiling
        .add_base(Polygon::regular([1.0, 0.0], 1.0, true, 6))
        .add_transform(Affine2D::IDENTITY);

    let op = tiling.add_base(polygon(&[[0.0, 0.0], [-0.5, s], [-1.0, 0.0]]));
    let mut m = Affine2D::IDENTITY;
    op.add_transform(m);
    for step in [[0.5, s], [1.0, 0.0], [1.0, 0.0]] {
        m.translate(step);
        op.add_transform(m);
    }
    let mut m = rotation(PI, [-0.25, s3 / 4.0]);
    op.add_transform(m);
    for step in [[0.5, s], [1.0, 0.0], [0.5, -s]] {
        m.translate(step);
        op.add_transform(m);
    }
}

fn rhombi_trihexagonal(tiling: &mut Tiling) {
    let s3 = sqrt3();
    let s = s3 / 2.0;
    tiling.set_repeat_x([(3.0 + s3) / 2.0, (1.0 + s3) / 2.0]);
    tiling.set_repeat_y([0.0, 1.0 + s3]);

    tiling
        .add_base(Polygon::regular([1.0, 0.0], 1.0, true, 6))
        .add_transform(Affine2D::IDENTITY);

    let op = tiling.add_base(polygon(&[
        [0.0, 0.0],
        [0.5, s],
        [0.5 - s, 0.5 + s],
        [-s, 0.5],
    ]));
    let mut m = Affine2D::IDENTITY;
    op.add_transform(m);
    m.rotate(FRAC_PI_3, [0.5, s]).translate([1.0, 0.0]);
    op.add_transform(m);
    m.translate([1.0, 0.0]).rotate(FRAC_PI_3, [1.5, s]);
    op.add_transform(m);

    let op = tiling.add_base(polygon(&[[0.5, s], [0.5, 1.0 + s], [0.5 - s, 0.5 + s]]));
    op.add_transform(Affine2D::IDENTITY);
    op.add_transform(rotation(FRAC_PI_3, [0.5, s]).then(&translation(1.0, 0.0)));
}

/// Circumradius and inradius of the unit-edge dodecagon.
fn dodecagon_radii() -> (f64, f64) {
    let half_angle = PI / 12.0;
    (0.5 / half_angle.sin(), 0.5 / half_angle.tan())
}

fn truncated_hexagonal(tiling: &mut Tiling) {
    let s3 = sqrt3();
    let (r, rx) = dodecagon_radii();
    tiling.set_repeat_x([2.0 * rx, 0.0]);
    tiling.set_repeat_y([rx, rx * s3]);

    tiling
        .add_base(Polygon::regular([0.0, 0.0], r, false, 12))
        .add_transform(Affine2D::IDENTITY);

    let op = tiling.add_base(polygon(&[
        [-0.5, -rx],
        [0.5, -rx],
        [0.0, -rx - s3 / 2.0],
    ]));
    op.add_transform(Affine2D::IDENTITY);
    op.add_transform(
        rotation(PI, [0.0, -rx]).then(&translation(rx, rx - s3 / 2.0 - 0.5)),
    );
}

fn truncated_trihexagonal(tiling: &mut Tiling) {
    let s3 = sqrt3();
    let s = s3 / 2.0;
    let (r, rx) = dodecagon_radii();
    let span = 1.0 + 2.0 * rx;
    tiling.set_repeat_x([span * s, span / 2.0]);
    tiling.set_repeat_y([0.0, span]);

    tiling
        .add_base(Polygon::regular([0.0, 0.0], r, false, 12))
        .add_transform(Affine2D::IDENTITY);

    let op = tiling.add_base(Polygon::rect(-0.5, rx, 1.0, 1.0));
    op.add_transform(Affine2D::IDENTITY);
    op.add_transform(translation(rx - 0.5, 0.5 - rx).then(&rotation(FRAC_PI_3, [rx, 0.5])));
    op.add_transform(translation(0.5 - rx, 0.5 - rx).then(&rotation(-FRAC_PI_3, [-rx, 0.5])));

    let mut hex = Polygon::regular([0.0, 0.0], 1.0, false, 6);
    hex.translate([-(0.5 + s), rx + 0.5]);
    let op = tiling.add_base(hex);
    op.add_transform(Affine2D::IDENTITY);
    op.add_transform(translation(1.0 + s3, 0.0));
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    fn area(points: &[DVec2]) -> f64 {
        let n = points.len();
        (0..n)
            .map(|i| points[i].perp_dot(points[(i + 1) % n]))
            .sum::<f64>()
            .abs()
            / 2.0
    }

    fn covered_area(tiling: &Tiling) -> f64 {
        tiling
            .basecells
            .iter()
            .map(|op| area(op.outline.points()) * op.transforms.len() as f64)
            .sum()
    }

    #[test]
    fn every_coloring_builds_and_validates() {
        for name in UNIFORM_COLORINGS {
            let tiling = create_uniform_coloring(name).unwrap();
            assert_eq!(tiling.name, name);
            assert_eq!(tiling.category, UNIFORM_CATEGORY);
            assert!(tiling.validate().is_ok(), "{name}");
        }
    }

    #[test]
    fn tiles_fill_one_repeat_unit() {
        for name in UNIFORM_COLORINGS {
            let tiling = create_uniform_coloring(name).unwrap();
            let unit = tiling.repeat_x().perp_dot(tiling.repeat_y()).abs();
            let covered = covered_area(&tiling);
            assert!(
                (covered - unit).abs() < 1e-9 * unit.max(1.0),
                "{name}: {covered} vs {unit}"
            );
        }
    }

    #[test]
    fn color_counts_follow_variant() {
        let cells = |name: &str| create_uniform_coloring(name).unwrap().basecells.len();
        assert_eq!(cells("square 1"), 1);
        assert_eq!(cells("square 2"), 2);
        assert_eq!(cells("square 6"), 3);
        assert_eq!(cells("square 9"), 4);
        assert_eq!(cells("hexagonal 3"), 3);
        assert_eq!(cells("triangular 8"), 3);
        assert_eq!(cells("triangular 9"), 4);
        assert_eq!(cells("trihexagonal 2"), 3);
    }

    #[test]
    fn square_one_matches_p1_cells() {
        let tiling = create_uniform_coloring("Square 1").unwrap();
        let p1 = crate::library::wallpaper::create_wallpaper("p1").unwrap();
        assert_eq!(tiling.basecells, p1.basecells);
        assert_eq!(tiling.name, "square 1");
    }

    #[test]
    fn unknown_coloring_is_absent() {
        assert!(create_uniform_coloring("square 10").is_none());
        assert!(create_uniform_coloring("pentagonal").is_none());
    }
}
