//! Rendered clone instances.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::affine::Affine2D;
use crate::geometry::polygon::Polygon;
use crate::render::ObjectId;
use crate::tiling::Tiling;

/// What a clone instance refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InstanceKind {
    /// The base cell's outline, drawn as a trace guide.
    Outline,
    /// A by-reference copy of an external source object.
    Source(ObjectId),
}

/// One placed copy of a base cell outline or source object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CloneInstance {
    pub kind: InstanceKind,
    pub base_cell: usize,
    pub destination: usize,
    /// Zero-based repetition of the destination.
    pub iteration: usize,
    /// Lattice cell `(x, y)`.
    pub cell: (i32, i32),
    /// Full placement, including the final orientation.
    pub transform: Affine2D,
}

impl CloneInstance {
    pub fn is_outline(&self) -> bool {
        self.kind == InstanceKind::Outline
    }

    pub fn source(&self) -> Option<ObjectId> {
        match self.kind {
            InstanceKind::Source(id) => Some(id),
            InstanceKind::Outline => None,
        }
    }

    /// The base cell outline of `tiling` moved to this placement.
    pub fn placed_outline(&self, tiling: &Tiling) -> Option<Polygon> {
        tiling
            .basecells
            .get(self.base_cell)
            .map(|op| op.outline.transformed(&self.transform))
    }
}

/// Ordered collection of clone instances.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CloneGroup {
    instances: Vec<CloneInstance>,
}

impl CloneGroup {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            instances: Vec::with_capacity(cap),
        }
    }

    pub fn push(&mut self, instance: CloneInstance) {
        self.instances.push(instance);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn as_slice(&self) -> &[CloneInstance] {
        &self.instances
    }

    pub fn into_inner(self) -> Vec<CloneInstance> {
        self.instances
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CloneInstance> {
        self.instances.iter()
    }

    pub fn outlines(&self) -> impl Iterator<Item = &CloneInstance> {
        self.instances.iter().filter(|i| i.is_outline())
    }

    /// Instances cloned from `id`.
    pub fn clones_of(&self, id: ObjectId) -> impl Iterator<Item = &CloneInstance> {
        self.instances
            .iter()
            .filter(move |i| i.kind == InstanceKind::Source(id))
    }
}

impl Extend<CloneInstance> for CloneGroup {
    fn extend<T: IntoIterator<Item = CloneInstance>>(&mut self, iter: T) {
        self.instances.extend(iter);
    }
}

impl<'a> IntoIterator for &'a CloneGroup {
    type Item = &'a CloneInstance;
    type IntoIter = std::slice::Iter<'a, CloneInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}

impl IntoIterator for CloneGroup {
    type Item = CloneInstance;
    type IntoIter = std::vec::IntoIter<CloneInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.into_iter()
    }
}

/// Result of one render.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderOutput {
    /// Every emitted instance, outlines and source clones alike.
    pub clones: CloneGroup,
    /// Outline instances alone, present when trace outlines were requested.
    pub trace: Option<CloneGroup>,
    /// Lattice cells that were expanded.
    pub cells_visited: usize,
    /// Candidate cells whose centre fell outside the boundary.
    pub cells_skipped: usize,
}

impl RenderOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instance_count(&self) -> usize {
        self.clones.len()
    }
}
