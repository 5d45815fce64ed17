#![forbid(unsafe_code)]
//! symtile: symmetry tiling engine with lattice rendering.
//!
//! Modules:
//! - geometry: affine transforms, polygon outlines, winding-number containment
//! - tiling: base cells, destinations, tilings and their text format
//! - library: wallpaper, frieze, radial/spiral and uniform-coloring builders
//! - render: expands a tiling over a lattice range or boundary into clone instances
//! - session: binds a shared tiling and its sources to a live document preview
//!
//! For examples, see the `symtile_examples` crate.
pub mod error;
pub mod geometry;
pub mod library;
pub mod render;
pub mod session;
pub mod tiling;

/// Convenient re-exports for common types. Import with `use symtile::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::affine::Affine2D;
    pub use crate::geometry::polygon::{bbox_of_points, point_in_polygon, BBox, Polygon};
    pub use crate::library::catalog::{
        builtin_by_key, builtin_count, builtin_icon_key, builtin_key, builtin_tiling,
        BuiltinCatalog, BUILTIN_TILINGS,
    };
    pub use crate::library::frieze::create_frieze;
    pub use crate::library::radial::{
        create_radial, create_radial_simple, create_spiral, update_radial,
    };
    pub use crate::library::uniform::create_uniform_coloring;
    pub use crate::library::wallpaper::create_wallpaper;
    pub use crate::render::config::RenderConfig;
    pub use crate::render::output::{CloneGroup, CloneInstance, InstanceKind, RenderOutput};
    pub use crate::render::renderer::{
        render, CellRange, LatticeExtent, RenderRequest, SourceAssignment, TilingRenderer,
    };
    pub use crate::render::{ObjectId, SourceLookup};
    pub use crate::session::document::{DocumentTree, MemoryDocument, NodeId};
    pub use crate::session::events::{EventSink, FnSink, SessionEvent, VecSink};
    pub use crate::session::{CloneSession, SessionConfig};
    pub use crate::tiling::dest::{StopConditions, TilingDest};
    pub use crate::tiling::op::TilingOp;
    pub use crate::tiling::{RepeatAxes, Tiling};
}
