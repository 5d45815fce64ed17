//! 2D affine transform value type.
//!
//! [`Affine2D`] stores the six numbers `(a, b, c, d, tx, ty)` with
//! `x' = a·x + c·y + tx` and `y' = b·x + d·y + ty`. Every mutating operation
//! composes *after* the current transform: `m.rotate(..)` means "apply `m`,
//! then rotate".
use std::fmt;

use glam::{DAffine2, DMat2, DVec2};
use mint::Vector2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Relative determinant threshold below which a transform counts as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// A 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Affine2D(pub DAffine2);

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2D {
    pub const IDENTITY: Self = Self(DAffine2::IDENTITY);

    /// Builds a transform from `(a, b, c, d, tx, ty)`.
    pub fn from_matrix(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self(DAffine2::from_cols_array(&[a, b, c, d, tx, ty]))
    }

    /// Returns `(a, b, c, d, tx, ty)`.
    pub fn to_matrix(&self) -> [f64; 6] {
        self.0.to_cols_array()
    }

    /// Frame with the given origin and axis vectors.
    pub fn from_basis(
        origin: impl Into<Vector2<f64>>,
        x_axis: impl Into<Vector2<f64>>,
        y_axis: impl Into<Vector2<f64>>,
    ) -> Self {
        Self(DAffine2::from_mat2_translation(
            DMat2::from_cols(to_vec(x_axis), to_vec(y_axis)),
            to_vec(origin),
        ))
    }

    pub fn from_translation(v: impl Into<Vector2<f64>>) -> Self {
        Self(DAffine2::from_translation(to_vec(v)))
    }

    /// Pure rotation about the origin.
    pub fn from_rotation(angle: f64) -> Self {
        Self(DAffine2::from_angle(angle))
    }

    /// Uniform scale about the origin.
    pub fn from_scale(factor: f64) -> Self {
        Self(DAffine2::from_scale(DVec2::splat(factor)))
    }

    /// Reflection across the line through `p1` and `p2`.
    ///
    /// Coincident points describe no line, so the result is the identity.
    pub fn from_flip(p1: impl Into<Vector2<f64>>, p2: impl Into<Vector2<f64>>) -> Self {
        let p1 = to_vec(p1);
        let dir = to_vec(p2) - p1;
        let Some(u) = dir.try_normalize() else {
            return Self::IDENTITY;
        };
        let (c2, s2) = (u.x * u.x - u.y * u.y, 2.0 * u.x * u.y);
        let reflect = DMat2::from_cols(DVec2::new(c2, s2), DVec2::new(s2, -c2));
        Self(about(p1, DAffine2::from_mat2(reflect)))
    }

    pub fn translation(&self) -> DVec2 {
        self.0.translation
    }

    pub fn x_axis(&self) -> DVec2 {
        self.0.matrix2.x_axis
    }

    pub fn y_axis(&self) -> DVec2 {
        self.0.matrix2.y_axis
    }

    pub fn determinant(&self) -> f64 {
        self.0.matrix2.determinant()
    }

    pub fn is_identity(&self) -> bool {
        self.0 == DAffine2::IDENTITY
    }

    /// Applies `v` after this transform.
    pub fn translate(&mut self, v: impl Into<Vector2<f64>>) -> &mut Self {
        self.0 = DAffine2::from_translation(to_vec(v)) * self.0;
        self
    }

    /// Applies a rotation by `angle` radians about `pivot` after this transform.
    pub fn rotate(&mut self, angle: f64, pivot: impl Into<Vector2<f64>>) -> &mut Self {
        self.0 = about(to_vec(pivot), DAffine2::from_angle(angle)) * self.0;
        self
    }

    /// Applies a uniform scale about `pivot` after this transform.
    pub fn scale(&mut self, factor: f64, pivot: impl Into<Vector2<f64>>) -> &mut Self {
        self.0 = about(to_vec(pivot), DAffine2::from_scale(DVec2::splat(factor))) * self.0;
        self
    }

    /// Applies a reflection across the line through `p1` and `p2` after this transform.
    pub fn flip(&mut self, p1: impl Into<Vector2<f64>>, p2: impl Into<Vector2<f64>>) -> &mut Self {
        self.0 = Self::from_flip(p1, p2).0 * self.0;
        self
    }

    /// Applies `other` after this transform.
    pub fn multiply(&mut self, other: &Affine2D) -> &mut Self {
        self.0 = other.0 * self.0;
        self
    }

    /// Applies `other` before this transform.
    pub fn pre_multiply(&mut self, other: &Affine2D) -> &mut Self {
        self.0 = self.0 * other.0;
        self
    }

    /// Returns the composition "this, then `other`".
    #[must_use]
    pub fn then(&self, other: &Affine2D) -> Affine2D {
        Affine2D(other.0 * self.0)
    }

    /// Whether the linear part collapses area, measured relative to the
    /// squared length of the longest axis.
    pub fn is_singular(&self, epsilon: f64) -> bool {
        let x = self.x_axis().length_squared();
        let y = self.y_axis().length_squared();
        let scale = x.max(y).max(f64::MIN_POSITIVE);
        let det = self.determinant();
        !det.is_finite() || det.abs() <= epsilon * scale
    }

    /// Returns the inverse transform.
    pub fn inverse(&self) -> Result<Affine2D> {
        self.inverse_with(SINGULAR_EPSILON)
    }

    pub fn inverse_with(&self, epsilon: f64) -> Result<Affine2D> {
        if self.is_singular(epsilon) {
            return Err(Error::singular(format!(
                "determinant {:e} of {self}",
                self.determinant()
            )));
        }
        Ok(Affine2D(self.0.inverse()))
    }

    /// Replaces this transform with its inverse.
    pub fn invert(&mut self) -> Result<()> {
        *self = self.inverse()?;
        Ok(())
    }

    pub fn transform_point(&self, p: impl Into<Vector2<f64>>) -> DVec2 {
        self.0.transform_point2(to_vec(p))
    }

    pub fn transform_vector(&self, v: impl Into<Vector2<f64>>) -> DVec2 {
        self.0.transform_vector2(to_vec(v))
    }

    /// Maps `p` through the inverse without modifying `self`.
    pub fn transform_point_inverse(&self, p: impl Into<Vector2<f64>>) -> Result<DVec2> {
        Ok(self.inverse()?.transform_point(p))
    }

    pub fn abs_diff_eq(&self, other: &Affine2D, max_abs_diff: f64) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }
}

impl From<DAffine2> for Affine2D {
    fn from(value: DAffine2) -> Self {
        Self(value)
    }
}

impl From<Affine2D> for DAffine2 {
    fn from(value: Affine2D) -> Self {
        value.0
    }
}

/// Formats as `matrix(a b c d tx ty)`.
impl fmt::Display for Affine2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, tx, ty] = self.to_matrix();
        write!(f, "matrix({a} {b} {c} {d} {tx} {ty})")
    }
}

#[inline]
fn to_vec(v: impl Into<Vector2<f64>>) -> DVec2 {
    DVec2::from(v.into())
}

fn about(pivot: DVec2, m: DAffine2) -> DAffine2 {
    DAffine2::from_translation(pivot) * m * DAffine2::from_translation(-pivot)
}
