//! Expansion of a tiling over a lattice into clone instances.
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::affine::Affine2D;

pub mod config;
pub mod output;
pub mod renderer;

/// Stable handle of an external drawable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Resolves source objects to their current local-to-parent transform.
///
/// Sources are looked up at render time and never owned; `None` marks a
/// stale reference, which the renderer skips.
pub trait SourceLookup {
    fn local_transform(&self, id: ObjectId) -> Option<Affine2D>;
}

/// Lookup with no objects; every source is stale.
impl SourceLookup for () {
    #[inline]
    fn local_transform(&self, _id: ObjectId) -> Option<Affine2D> {
        None
    }
}

impl SourceLookup for HashMap<ObjectId, Affine2D> {
    fn local_transform(&self, id: ObjectId) -> Option<Affine2D> {
        self.get(&id).copied()
    }
}
