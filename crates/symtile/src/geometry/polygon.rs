//! Polygon outlines, bounding boxes and the winding-number containment test.
use std::f64::consts::{PI, TAU};

use glam::DVec2;
use mint::Vector2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::affine::Affine2D;

/// Largest angle a single flattened arc segment may span.
pub const ARC_SEGMENT_ANGLE: f64 = PI / 16.0;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BBox {
    /// Degenerate box around a single point.
    pub fn from_point(p: DVec2) -> Self {
        Self { min: p, max: p }
    }

    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).length()
    }
}

/// Bounding box of `points`, or `None` when empty.
pub fn bbox_of_points(points: &[DVec2]) -> Option<BBox> {
    let (first, rest) = points.split_first()?;
    let mut bbox = BBox::from_point(*first);
    for p in rest {
        bbox.include(*p);
    }
    Some(bbox)
}

/// Winding number of `points` (implicitly closed) around `p`.
///
/// Edges are half-open in y: an upward edge includes its start vertex and
/// excludes its end vertex, a downward edge the reverse. A point lying
/// exactly on an edge therefore resolves the same way every time, but may
/// count as either inside or outside depending on the edge direction.
pub fn point_in_polygon(points: &[DVec2], p: DVec2) -> i32 {
    if points.len() < 3 {
        return 0;
    }
    let mut winding = 0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let side = (b - *a).perp_dot(p - *a);
        if a.y <= p.y {
            if b.y > p.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// A polygonal outline made of straight segments.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon {
    points: Vec<DVec2>,
    closed: bool,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed polygon through `points`.
    pub fn from_points<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Vector2<f64>>,
    {
        Self {
            points: points.into_iter().map(|p| DVec2::from(p.into())).collect(),
            closed: true,
        }
    }

    /// Closed axis-aligned rectangle with corner `(x, y)`.
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::from_points([[x, y], [x + w, y], [x + w, y + h], [x, y + h]])
    }

    /// Regular polygon inscribed in a circle of `radius` about `center`.
    ///
    /// The first vertex sits on the positive x axis when `vertex_on_x_axis`,
    /// otherwise half a step (`π / sides`) further around.
    pub fn regular(
        center: impl Into<Vector2<f64>>,
        radius: f64,
        vertex_on_x_axis: bool,
        sides: usize,
    ) -> Self {
        let center = DVec2::from(center.into());
        let sides = sides.max(3);
        let step = TAU / sides as f64;
        let start = if vertex_on_x_axis { 0.0 } else { step / 2.0 };
        Self::from_points(
            (0..sides).map(|k| center + radius * DVec2::from_angle(start + k as f64 * step)),
        )
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn append_point(&mut self, p: impl Into<Vector2<f64>>) -> &mut Self {
        self.points.push(DVec2::from(p.into()));
        self
    }

    /// Continues the outline along a circular arc about `center`, starting
    /// at the last point and sweeping `angle` radians (counter-clockwise
    /// when positive). The arc is flattened into straight segments.
    pub fn append_arc(&mut self, center: impl Into<Vector2<f64>>, angle: f64) -> &mut Self {
        let center = DVec2::from(center.into());
        let Some(&start) = self.points.last() else {
            return self;
        };
        let offset = start - center;
        if offset.length_squared() == 0.0 || angle == 0.0 {
            return self;
        }
        let segments = (angle.abs() / ARC_SEGMENT_ANGLE - 1e-9).ceil().max(1.0) as usize;
        let step = angle / segments as f64;
        for k in 1..=segments {
            let rot = DVec2::from_angle(step * k as f64);
            self.points.push(center + rot.rotate(offset));
        }
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.closed = true;
        self
    }

    pub(crate) fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn bbox(&self) -> Option<BBox> {
        bbox_of_points(&self.points)
    }

    pub fn winding_number(&self, p: impl Into<Vector2<f64>>) -> i32 {
        point_in_polygon(&self.points, DVec2::from(p.into()))
    }

    /// Non-zero winding rule.
    pub fn contains(&self, p: impl Into<Vector2<f64>>) -> bool {
        self.winding_number(p) != 0
    }

    /// Moves every point by `v`.
    pub fn translate(&mut self, v: impl Into<Vector2<f64>>) -> &mut Self {
        let v = DVec2::from(v.into());
        for p in &mut self.points {
            *p += v;
        }
        self
    }

    /// Bakes `m` into the points.
    pub fn apply(&mut self, m: &Affine2D) -> &mut Self {
        for p in &mut self.points {
            *p = m.transform_point(*p);
        }
        self
    }

    #[must_use]
    pub fn transformed(&self, m: &Affine2D) -> Polygon {
        let mut out = self.clone();
        out.apply(m);
        out
    }

    /// Largest of bbox width and height, zero when empty.
    pub fn max_dimension(&self) -> f64 {
        self.bbox().map_or(0.0, |b| b.width().max(b.height()))
    }

    pub fn abs_diff_eq(&self, other: &Polygon, max_abs_diff: f64) -> bool {
        self.closed == other.closed
            && self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| a.abs_diff_eq(*b, max_abs_diff))
    }
}
