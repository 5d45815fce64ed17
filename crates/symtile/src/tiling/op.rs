//! One base cell: an outline plus the destinations that form its orbit.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::affine::Affine2D;
use crate::geometry::polygon::Polygon;
use crate::tiling::dest::TilingDest;

/// A base cell of a tiling.
///
/// The outline is authored in the tiling's default unit, so a lattice
/// repeat spans the same offsets every builder of a family assumes.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TilingOp {
    pub outline: Polygon,
    /// Ordered placements. Order only affects trace coloring.
    pub transforms: Vec<TilingDest>,
    /// Editor hint: shearing keeps the symmetry intact.
    pub shearable: bool,
    /// Editor hint: the aspect ratio may change freely.
    pub flexible_aspect: bool,
    pub basecell_is_editable: bool,
}

impl TilingOp {
    pub fn new(outline: Polygon) -> Self {
        Self {
            outline,
            transforms: Vec::new(),
            shearable: false,
            flexible_aspect: false,
            basecell_is_editable: true,
        }
    }

    pub fn with_shearable(mut self, shearable: bool) -> Self {
        self.shearable = shearable;
        self
    }

    pub fn with_flexible_aspect(mut self, flexible_aspect: bool) -> Self {
        self.flexible_aspect = flexible_aspect;
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.basecell_is_editable = editable;
        self
    }

    /// Adds a single placement and returns it for further tweaking.
    pub fn add_transform(&mut self, transform: Affine2D) -> &mut TilingDest {
        self.add_dest(TilingDest::new(transform))
    }

    pub fn add_dest(&mut self, dest: TilingDest) -> &mut TilingDest {
        self.transforms.push(dest);
        let last = self.transforms.len() - 1;
        &mut self.transforms[last]
    }

    /// Transform of destination `which`, identity when out of range.
    pub fn transform(&self, which: usize) -> Affine2D {
        self.transforms
            .get(which)
            .map_or(Affine2D::IDENTITY, |d| d.transform)
    }

    pub fn is_recursive(&self, which: usize) -> bool {
        self.transforms
            .get(which)
            .is_some_and(TilingDest::is_recursive)
    }
}
