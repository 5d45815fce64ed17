//! Tiling data model.
//!
//! A [`Tiling`] is a named set of base cells ([`TilingOp`]), each with its
//! list of destinations ([`TilingDest`]), plus a repeat lattice and a final
//! corrective transform. Tilings are built by [`crate::library`] or read
//! from the attribute-tree text format in [`serialize`].
use std::collections::BTreeMap;
use std::fmt;

use glam::DVec2;
use mint::Vector2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::affine::{Affine2D, SINGULAR_EPSILON};
use crate::geometry::polygon::Polygon;

pub mod attribute;
pub mod dest;
pub mod op;
pub mod serialize;

pub use dest::{StopConditions, TilingDest};
pub use op::TilingOp;

/// Lattice axes along which a tiling may repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepeatAxes(u8);

impl RepeatAxes {
    pub const NONE: Self = Self(0);
    pub const X: Self = Self(1);
    pub const Y: Self = Self(2);
    pub const BOTH: Self = Self(3);

    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0b11)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn x(self) -> bool {
        self.0 & 1 != 0
    }

    pub const fn y(self) -> bool {
        self.0 & 2 != 0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// `no`, `x`, `y` or `x y`.
impl fmt::Display for RepeatAxes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match (self.x(), self.y()) {
            (false, false) => "no",
            (true, false) => "x",
            (false, true) => "y",
            (true, true) => "x y",
        })
    }
}

/// A complete symmetry pattern.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tiling {
    pub name: String,
    /// Browsing group such as "Wallpaper" or "Frieze".
    pub category: String,
    pub icon_file: Option<String>,
    /// Advisory name of a specialized editor, e.g. "radial". Empty when none.
    pub required_interface: String,
    pub repeatable: RepeatAxes,
    /// Lattice frame: translation is the origin, the axes are the repeat vectors.
    pub repeat_basis: Affine2D,
    /// Editor hint for how many slices a circular pattern has.
    pub radial_divisions: u32,
    /// Free-form string hints.
    pub properties: BTreeMap<String, String>,
    /// Applied to every rendered instance after lattice placement.
    pub final_transform: Affine2D,
    pub basecells: Vec<TilingOp>,
}

impl Default for Tiling {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl Tiling {
    /// Empty tiling repeating on both axes of the unit square lattice.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            icon_file: None,
            required_interface: String::new(),
            repeatable: RepeatAxes::BOTH,
            repeat_basis: Affine2D::IDENTITY,
            radial_divisions: 0,
            properties: BTreeMap::new(),
            final_transform: Affine2D::IDENTITY,
            basecells: Vec::new(),
        }
    }

    /// Adds a base cell and returns it so destinations can be attached.
    pub fn add_base(&mut self, outline: Polygon) -> &mut TilingOp {
        self.push_base(TilingOp::new(outline))
    }

    pub fn push_base(&mut self, op: TilingOp) -> &mut TilingOp {
        self.basecells.push(op);
        let last = self.basecells.len() - 1;
        &mut self.basecells[last]
    }

    /// Number of destinations that place more than once.
    pub fn has_recursion(&self) -> usize {
        self.basecells
            .iter()
            .flat_map(|op| &op.transforms)
            .filter(|d| d.max_iterations > 1)
            .count()
    }

    pub fn is_x_repeatable(&self) -> bool {
        self.repeatable.x()
    }

    pub fn is_y_repeatable(&self) -> bool {
        self.repeatable.y()
    }

    pub fn repeat_origin(&self) -> DVec2 {
        self.repeat_basis.translation()
    }

    pub fn repeat_x(&self) -> DVec2 {
        self.repeat_basis.x_axis()
    }

    pub fn repeat_y(&self) -> DVec2 {
        self.repeat_basis.y_axis()
    }

    pub fn set_repeat_origin(&mut self, origin: impl Into<Vector2<f64>>) {
        self.repeat_basis.0.translation = DVec2::from(origin.into());
    }

    pub fn set_repeat_x(&mut self, x: impl Into<Vector2<f64>>) {
        self.repeat_basis.0.matrix2.x_axis = DVec2::from(x.into());
    }

    pub fn set_repeat_y(&mut self, y: impl Into<Vector2<f64>>) {
        self.repeat_basis.0.matrix2.y_axis = DVec2::from(y.into());
    }

    /// Hexagonal lattice sized for a hexagon of `side` with its long axis
    /// vertical: x points right, y leans 60° from x. Repeats on both axes.
    pub fn default_hex(&mut self, side: f64) {
        self.repeatable = RepeatAxes::BOTH;
        self.set_repeat_x([side * 3f64.sqrt(), 0.0]);
        self.set_repeat_y([side * 3f64.sqrt() / 2.0, side * 1.5]);
    }

    /// Icon lookup key, `"<category>__<name>"` with spaces replaced by `_`.
    pub fn icon_key(&self) -> String {
        let key = if self.category.is_empty() {
            self.name.clone()
        } else {
            format!("{}__{}", self.category, self.name)
        };
        key.replace(' ', "_")
    }

    /// Whether both axes repeat along (nearly) parallel vectors.
    pub fn lattice_is_degenerate(&self) -> bool {
        self.repeatable == RepeatAxes::BOTH && self.repeat_basis.is_singular(SINGULAR_EPSILON)
    }

    /// Checks the invariants rendering depends on.
    pub fn validate(&self) -> Result<()> {
        self.validate_with(SINGULAR_EPSILON)
    }

    /// [`Tiling::validate`] with a caller-chosen relative singularity threshold.
    pub fn validate_with(&self, epsilon: f64) -> Result<()> {
        if self.basecells.is_empty() {
            return Err(Error::EmptyTiling);
        }
        if self.repeatable == RepeatAxes::BOTH && self.repeat_basis.is_singular(epsilon) {
            return Err(Error::DegenerateLattice);
        }
        if self.final_transform.is_singular(epsilon) {
            return Err(Error::singular(format!(
                "final transform of tiling '{}'",
                self.name
            )));
        }
        for (c, op) in self.basecells.iter().enumerate() {
            for (d, dest) in op.transforms.iter().enumerate() {
                if dest.transform.is_singular(epsilon) {
                    return Err(Error::singular(format!(
                        "base cell {c} destination {d} of tiling '{}'",
                        self.name
                    )));
                }
                if !dest.is_bounded() {
                    return Err(Error::UnboundedDestination {
                        base_cell: c,
                        destination: d,
                    });
                }
            }
        }
        Ok(())
    }
}
