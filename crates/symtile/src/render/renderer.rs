//! Lattice renderer: walks the requested cells and emits every placement of
//! every base cell, plus clones of the source objects assigned to it.
//!
//! Per lattice cell `(x, y)` the cell placement is a translation by
//! `origin + x·X + y·Y`. Iteration `k` of a destination `D` is placed at
//! `D^(k+1)` followed by that translation. Outline instances then apply the
//! tiling's final transform and the request's final orientation; source
//! clones first undo the base cell placement so the source keeps its own
//! local geometry.
use std::ops::RangeInclusive;

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::geometry::affine::Affine2D;
use crate::geometry::polygon::{bbox_of_points, point_in_polygon, BBox, Polygon};
use crate::render::config::RenderConfig;
use crate::render::output::{CloneGroup, CloneInstance, InstanceKind, RenderOutput};
use crate::render::{ObjectId, SourceLookup};
use crate::tiling::{Tiling, TilingOp};

/// Inclusive integer range of lattice cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellRange {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl CellRange {
    pub const fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// The origin cell alone.
    pub const fn single() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Raises a reversed maximum to its minimum.
    pub fn normalized(self) -> Self {
        Self {
            max_x: self.max_x.max(self.min_x),
            max_y: self.max_y.max(self.min_y),
            ..self
        }
    }

    pub fn cell_count(&self) -> u64 {
        let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1).max(0) as u64;
        span(self.min_x, self.max_x).saturating_mul(span(self.min_y, self.max_y))
    }
}

impl Default for CellRange {
    fn default() -> Self {
        Self::single()
    }
}

/// Which lattice cells to render.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LatticeExtent {
    /// Every cell of an explicit range.
    Range(CellRange),
    /// Cells whose centre lies inside this polygon, given in the same space
    /// as the base cell placement.
    Boundary(Polygon),
}

impl LatticeExtent {
    pub const fn range(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self::Range(CellRange::new(min_x, max_x, min_y, max_y))
    }
}

impl Default for LatticeExtent {
    fn default() -> Self {
        Self::Range(CellRange::single())
    }
}

/// Source object cloned into every placement of one base cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceAssignment {
    pub base_cell: usize,
    pub object: ObjectId,
}

impl SourceAssignment {
    pub fn new(base_cell: usize, object: ObjectId) -> Self {
        Self { base_cell, object }
    }
}

/// Parameters of a single render.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub extent: LatticeExtent,
    /// Where the base cells sit in the output space.
    pub base_cell_placement: Affine2D,
    /// Applied to every emitted instance last.
    pub final_orientation: Affine2D,
    /// Emit an outline instance for every traceable placement.
    pub trace_cells: bool,
    pub sources: Vec<SourceAssignment>,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            extent: LatticeExtent::default(),
            base_cell_placement: Affine2D::IDENTITY,
            final_orientation: Affine2D::IDENTITY,
            trace_cells: true,
            sources: Vec::new(),
        }
    }
}

impl RenderRequest {
    pub fn new(extent: LatticeExtent) -> Self {
        Self {
            extent,
            ..Default::default()
        }
    }

    pub fn with_range(mut self, min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        self.extent = LatticeExtent::range(min_x, max_x, min_y, max_y);
        self
    }

    pub fn with_boundary(mut self, boundary: Polygon) -> Self {
        self.extent = LatticeExtent::Boundary(boundary);
        self
    }

    pub fn with_base_cell_placement(mut self, placement: Affine2D) -> Self {
        self.base_cell_placement = placement;
        self
    }

    pub fn with_final_orientation(mut self, orientation: Affine2D) -> Self {
        self.final_orientation = orientation;
        self
    }

    pub fn with_trace_cells(mut self, trace_cells: bool) -> Self {
        self.trace_cells = trace_cells;
        self
    }

    pub fn with_source(mut self, base_cell: usize, object: ObjectId) -> Self {
        self.sources.push(SourceAssignment::new(base_cell, object));
        self
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = SourceAssignment>) -> Self {
        self.sources.extend(sources);
        self
    }
}

/// Renders tilings with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct TilingRenderer {
    pub config: RenderConfig,
}

impl TilingRenderer {
    pub fn try_new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn new(config: RenderConfig) -> Self {
        debug_assert!(config.max_instances > 0, "max_instances must be > 0");
        debug_assert!(
            config.singular_epsilon >= 0.0,
            "singular_epsilon must be >= 0"
        );
        Self { config }
    }

    /// Renders `tiling` as described by `request`.
    ///
    /// Fails without output on an invalid tiling, a singular transform that
    /// must be applied or inverted, or when the instance limit is exceeded.
    /// A boundary that excludes every cell is a successful, empty render.
    pub fn render(
        &self,
        tiling: &Tiling,
        request: &RenderRequest,
        sources: &(impl SourceLookup + ?Sized),
    ) -> Result<RenderOutput> {
        let eps = self.config.singular_epsilon;
        tiling.validate_with(eps)?;
        if request.final_orientation.is_singular(eps) {
            return Err(Error::singular("final orientation"));
        }

        let resolved = resolve_sources(tiling, &request.sources, sources);
        let needs_inverse = matches!(request.extent, LatticeExtent::Boundary(_))
            || resolved.iter().any(|s| !s.is_empty());
        let base_inverse = if needs_inverse {
            request
                .base_cell_placement
                .inverse_with(eps)
                .map_err(|_| Error::singular("base cell placement"))?
        } else {
            Affine2D::IDENTITY
        };

        let cells = CellWalk::new(tiling, &request.extent, &base_inverse, eps)?;
        let candidates = cells.candidate_count();
        if candidates > self.config.max_instances as u64 {
            return Err(Error::InstanceLimit {
                limit: self.config.max_instances,
            });
        }
        debug!(
            "Tiling '{}': cells x {:?}, y {:?} ({} candidates).",
            tiling.name, cells.x, cells.y, candidates
        );

        let finish = tiling.final_transform.then(&request.final_orientation);
        let mut emitter = Emitter::new(self.config.max_instances, request.trace_cells);
        let mut cells_visited = 0;
        let mut cells_skipped = 0;

        for x in cells.x.clone() {
            for y in cells.y.clone() {
                if !cells.admits(x, y) {
                    cells_skipped += 1;
                    continue;
                }
                cells_visited += 1;
                let cell = Affine2D::from_translation(
                    tiling.repeat_basis.transform_point([f64::from(x), f64::from(y)]),
                );
                for (c, op) in tiling.basecells.iter().enumerate() {
                    let placed = PlacedCell {
                        op,
                        base_cell: c,
                        cell: (x, y),
                        translation: &cell,
                        finish: &finish,
                        base_inverse: &base_inverse,
                        sources: &resolved[c],
                    };
                    placed.emit(&mut emitter, self.config.max_instances)?;
                }
            }
        }

        if emitter.halted > 0 {
            warn!(
                "Tiling '{}': {} destination runs stopped by size limits.",
                tiling.name, emitter.halted
            );
        }
        info!(
            "Rendered tiling '{}': {} cells, {} instances.",
            tiling.name,
            cells_visited,
            emitter.clones.len()
        );

        Ok(RenderOutput {
            clones: emitter.clones,
            trace: emitter.trace,
            cells_visited,
            cells_skipped,
        })
    }

    /// Renders and appends the clones to `target`, returning how many were
    /// added. `target` is left untouched on failure.
    pub fn render_into(
        &self,
        tiling: &Tiling,
        request: &RenderRequest,
        sources: &(impl SourceLookup + ?Sized),
        target: &mut CloneGroup,
    ) -> Result<usize> {
        let output = self.render(tiling, request, sources)?;
        let added = output.clones.len();
        target.extend(output.clones);
        Ok(added)
    }
}

/// Renders with the default configuration.
pub fn render(
    tiling: &Tiling,
    request: &RenderRequest,
    sources: &(impl SourceLookup + ?Sized),
) -> Result<RenderOutput> {
    TilingRenderer::default().render(tiling, request, sources)
}

fn resolve_sources(
    tiling: &Tiling,
    assignments: &[SourceAssignment],
    lookup: &(impl SourceLookup + ?Sized),
) -> Vec<Vec<(ObjectId, Affine2D)>> {
    let mut resolved = vec![Vec::new(); tiling.basecells.len()];
    for assignment in assignments {
        let Some(slot) = resolved.get_mut(assignment.base_cell) else {
            warn!(
                "Source {} targets missing base cell {}; skipping.",
                assignment.object, assignment.base_cell
            );
            continue;
        };
        match lookup.local_transform(assignment.object) {
            Some(local) => slot.push((assignment.object, local)),
            None => warn!("Source {} no longer exists; skipping.", assignment.object),
        }
    }
    resolved
}

/// Candidate cells plus the optional centre test.
struct CellWalk {
    x: RangeInclusive<i32>,
    y: RangeInclusive<i32>,
    /// Boundary in lattice coordinates.
    boundary: Option<Vec<DVec2>>,
    /// Test coordinate on an axis that cannot repeat: the boundary's mid line.
    fixed_x: Option<f64>,
    fixed_y: Option<f64>,
}

impl CellWalk {
    fn new(
        tiling: &Tiling,
        extent: &LatticeExtent,
        base_inverse: &Affine2D,
        eps: f64,
    ) -> Result<Self> {
        let mut walk = match extent {
            LatticeExtent::Range(range) => {
                let range = range.normalized();
                Self {
                    x: range.min_x..=range.max_x,
                    y: range.min_y..=range.max_y,
                    boundary: None,
                    fixed_x: None,
                    fixed_y: None,
                }
            }
            LatticeExtent::Boundary(polygon) => {
                let to_lattice = base_inverse.then(
                    &tiling
                        .repeat_basis
                        .inverse_with(eps)
                        .map_err(|_| Error::singular("repeat basis"))?,
                );
                let local: Vec<DVec2> = polygon
                    .points()
                    .iter()
                    .map(|p| to_lattice.transform_point(*p))
                    .collect();
                match bbox_of_points(&local) {
                    Some(bbox) => Self {
                        x: half_cell_span(bbox.min.x, bbox.max.x),
                        y: half_cell_span(bbox.min.y, bbox.max.y),
                        boundary: Some(local),
                        fixed_x: Some(bbox.center().x),
                        fixed_y: Some(bbox.center().y),
                    },
                    #[allow(clippy::reversed_empty_ranges)]
                    None => Self {
                        x: 0..=-1,
                        y: 0..=-1,
                        boundary: Some(local),
                        fixed_x: None,
                        fixed_y: None,
                    },
                }
            }
        };
        if !tiling.is_x_repeatable() && !walk.x.is_empty() {
            walk.x = 0..=0;
        } else {
            walk.fixed_x = None;
        }
        if !tiling.is_y_repeatable() && !walk.y.is_empty() {
            walk.y = 0..=0;
        } else {
            walk.fixed_y = None;
        }
        // A single pattern instance is placed whenever the boundary is non-empty
        if walk.fixed_x.is_some() && walk.fixed_y.is_some() {
            walk.boundary = None;
        }
        Ok(walk)
    }

    fn candidate_count(&self) -> u64 {
        let span = |r: &RangeInclusive<i32>| {
            (i64::from(*r.end()) - i64::from(*r.start()) + 1).max(0) as u64
        };
        span(&self.x).saturating_mul(span(&self.y))
    }

    fn admits(&self, x: i32, y: i32) -> bool {
        self.boundary.as_ref().is_none_or(|boundary| {
            let centre = DVec2::new(
                self.fixed_x.unwrap_or(f64::from(x) + 0.5),
                self.fixed_y.unwrap_or(f64::from(y) + 0.5),
            );
            point_in_polygon(boundary, centre) != 0
        })
    }
}

/// Cells whose centre `c + ½` can fall within `[min, max]`.
fn half_cell_span(min: f64, max: f64) -> RangeInclusive<i32> {
    let lo = (min - 0.5).floor().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
    let hi = (max - 0.5).ceil().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
    lo..=hi
}

struct Emitter {
    limit: usize,
    trace_cells: bool,
    clones: CloneGroup,
    trace: Option<CloneGroup>,
    halted: usize,
}

impl Emitter {
    fn new(limit: usize, trace_cells: bool) -> Self {
        Self {
            limit,
            trace_cells,
            clones: CloneGroup::new(),
            trace: trace_cells.then(CloneGroup::new),
            halted: 0,
        }
    }

    fn push(&mut self, instance: CloneInstance) -> Result<()> {
        if self.clones.len() >= self.limit {
            return Err(Error::InstanceLimit { limit: self.limit });
        }
        if instance.is_outline() {
            if let Some(trace) = self.trace.as_mut() {
                trace.push(instance.clone());
            }
        }
        self.clones.push(instance);
        Ok(())
    }
}

/// One base cell inside one lattice cell.
struct PlacedCell<'a> {
    op: &'a TilingOp,
    base_cell: usize,
    cell: (i32, i32),
    translation: &'a Affine2D,
    finish: &'a Affine2D,
    base_inverse: &'a Affine2D,
    sources: &'a [(ObjectId, Affine2D)],
}

impl PlacedCell<'_> {
    fn emit(&self, emitter: &mut Emitter, max_runs: usize) -> Result<()> {
        for (d, dest) in self.op.transforms.iter().enumerate() {
            let limit = dest.placement_limit();
            let sized = dest.max_size_active() || dest.min_size_active();
            let mut step = dest.transform;
            let mut iteration = 0;

            while limit.is_none_or(|n| iteration < n) {
                if iteration >= max_runs {
                    return Err(Error::InstanceLimit { limit: max_runs });
                }
                let placed = step.then(self.translation);

                if sized {
                    let diagonal = outline_diagonal(&self.op.outline, &placed);
                    let too_big = dest.max_size_active() && diagonal > dest.max_size;
                    let too_small = dest.min_size_active() && diagonal < dest.min_size;
                    if too_big || too_small || !diagonal.is_finite() {
                        emitter.halted += 1;
                        break;
                    }
                }

                let instance = |kind, transform| CloneInstance {
                    kind,
                    base_cell: self.base_cell,
                    destination: d,
                    iteration,
                    cell: self.cell,
                    transform,
                };
                if emitter.trace_cells && dest.traceable {
                    emitter.push(instance(InstanceKind::Outline, placed.then(self.finish)))?;
                }
                for (id, local) in self.sources {
                    let transform = local
                        .then(self.base_inverse)
                        .then(&placed)
                        .then(self.finish);
                    emitter.push(instance(InstanceKind::Source(*id), transform))?;
                }

                iteration += 1;
                step = step.then(&dest.transform);
            }
        }
        Ok(())
    }
}

fn outline_diagonal(outline: &Polygon, placement: &Affine2D) -> f64 {
    let mut points = outline.points().iter().map(|p| placement.transform_point(*p));
    let Some(first) = points.next() else {
        return 0.0;
    };
    let mut bbox = BBox::from_point(first);
    for p in points {
        bbox.include(p);
    }
    bbox.diagonal()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::f64::consts::{PI, TAU};

    use super::*;
    use crate::library::{create_frieze, create_radial_simple, create_wallpaper};
    use crate::tiling::dest::{StopConditions, TilingDest};
    use crate::tiling::RepeatAxes;

    fn unit_square() -> Tiling {
        let mut tiling = Tiling::new("square", "test");
        tiling
            .add_base(Polygon::rect(0.0, 0.0, 1.0, 1.0))
            .add_transform(Affine2D::IDENTITY);
        tiling
    }

    #[test]
    fn p1_fills_explicit_range() {
        let tiling = create_wallpaper("p1").unwrap();
        let request = RenderRequest::default().with_range(0, 2, 0, 2);
        let output = render(&tiling, &request, &()).unwrap();
        assert_eq!(output.clones.len(), 9);
        assert_eq!(output.cells_visited, 9);
        assert_eq!(output.trace.as_ref().map(CloneGroup::len), Some(9));
        let mut cells: Vec<_> = output.clones.iter().map(|i| i.cell).collect();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), 9);
    }

    #[test]
    fn p2_places_two_instances_per_cell() {
        let tiling = create_wallpaper("p2").unwrap();
        let output = render(&tiling, &RenderRequest::default(), &()).unwrap();
        assert_eq!(output.clones.len(), 2);
        let turned = output.clones.as_slice()[1].transform.transform_point([0.0, 0.0]);
        assert!(turned.abs_diff_eq(DVec2::new(1.0, 1.0), 1e-12));
    }

    #[test]
    fn cells_are_translated_by_lattice_vectors() {
        let mut tiling = unit_square();
        tiling.set_repeat_x([2.0, 0.0]);
        tiling.set_repeat_y([1.0, 3.0]);
        tiling.set_repeat_origin([0.5, 0.0]);
        let request = RenderRequest::default().with_range(1, 1, 2, 2);
        let output = render(&tiling, &request, &()).unwrap();
        let origin = output.clones.as_slice()[0].transform.transform_point([0.0, 0.0]);
        assert!(origin.abs_diff_eq(DVec2::new(0.5 + 2.0 + 2.0, 6.0), 1e-12));
    }

    #[test]
    fn reversed_range_is_normalised() {
        let tiling = unit_square();
        let request = RenderRequest::default().with_range(2, 0, 1, -3);
        let output = render(&tiling, &request, &()).unwrap();
        assert_eq!(output.clones.len(), 1);
        assert_eq!(output.clones.as_slice()[0].cell, (2, 1));
    }

    #[test]
    fn frieze_collapses_forbidden_axis() {
        let tiling = create_frieze("11").unwrap();
        assert_eq!(tiling.repeatable, RepeatAxes::X);
        let request = RenderRequest::default().with_range(0, 2, -5, 5);
        let output = render(&tiling, &request, &()).unwrap();
        assert_eq!(output.clones.len(), 3);
        assert!(output.clones.iter().all(|i| i.cell.1 == 0));
    }

    #[test]
    fn radial_rosette_repeats_its_rotation() {
        let tiling = create_radial_simple(false, 10).unwrap();
        let request = RenderRequest::default().with_range(-4, 4, -4, 4);
        let output = render(&tiling, &request, &()).unwrap();
        assert_eq!(output.clones.len(), 10);
        let angles: Vec<f64> = output
            .clones
            .iter()
            .map(|i| {
                let axis = i.transform.x_axis();
                axis.y.atan2(axis.x).rem_euclid(TAU)
            })
            .collect();
        for (k, pair) in angles.windows(2).enumerate() {
            let delta = (pair[1] - pair[0]).rem_euclid(TAU);
            assert!((delta - TAU / 10.0).abs() < 1e-9, "step {k}: {delta}");
        }
        assert_eq!(output.clones.as_slice()[9].iteration, 9);
    }

    #[test]
    fn non_repeating_pattern_ignores_boundary_position() {
        let tiling = create_radial_simple(false, 10).unwrap();
        let request =
            RenderRequest::default().with_boundary(Polygon::rect(-2.0, -2.0, 2.2, 4.0));
        let output = render(&tiling, &request, &()).unwrap();
        assert_eq!(output.clones.len(), 10);
        assert_eq!(output.cells_visited, 1);
        assert!(output.clones.iter().all(|i| i.cell == (0, 0)));
    }

    #[test]
    fn frieze_boundary_tests_along_its_strip() {
        let tiling = create_frieze("11").unwrap();
        let request = RenderRequest::default().with_boundary(Polygon::rect(0.0, 3.0, 4.0, 1.0));
        let output = render(&tiling, &request, &()).unwrap();
        let mut cells: Vec<_> = output.clones.iter().map(|i| i.cell).collect();
        cells.sort_unstable();
        assert_eq!(cells, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn frieze_boundary_still_clips_its_axis() {
        let tiling = create_frieze("11").unwrap();
        let request = RenderRequest::default().with_boundary(Polygon::rect(10.0, 3.0, 0.2, 1.0));
        let output = render(&tiling, &request, &()).unwrap();
        assert_eq!(output.clones.len(), 0);
    }

    #[test]
    fn boundary_selects_cells_by_centre() {
        let tiling = unit_square();
        let request = RenderRequest::default().with_boundary(Polygon::rect(0.0, 0.0, 2.0, 1.0));
        let output = render(&tiling, &request, &()).unwrap();
        let mut cells: Vec<_> = output.clones.iter().map(|i| i.cell).collect();
        cells.sort_unstable();
        assert_eq!(cells, vec![(0, 0), (1, 0)]);
        assert!(output.cells_skipped > 0);
    }

    #[test]
    fn boundary_is_mapped_through_base_placement() {
        let tiling = unit_square();
        let placement = Affine2D::from_translation([10.0, 0.0]);
        let request = RenderRequest::default()
            .with_boundary(Polygon::rect(10.0, 0.0, 1.0, 1.0))
            .with_base_cell_placement(placement);
        let output = render(&tiling, &request, &()).unwrap();
        assert_eq!(output.clones.len(), 1);
        assert_eq!(output.clones.as_slice()[0].cell, (0, 0));
    }

    #[test]
    fn boundary_excluding_everything_is_empty_success() {
        let tiling = create_wallpaper("p4m").unwrap();
        let request =
            RenderRequest::default().with_boundary(Polygon::rect(0.1, 0.1, 0.2, 0.2));
        let output = render(&tiling, &request, &()).unwrap();
        assert!(output.clones.is_empty());
        assert_eq!(output.cells_visited, 0);

        let empty = RenderRequest::default().with_boundary(Polygon::new());
        assert!(render(&tiling, &empty, &()).unwrap().clones.is_empty());
    }

    #[test]
    fn degenerate_lattice_fails_closed() {
        let mut tiling = unit_square();
        tiling.set_repeat_y([1.0, 0.0]);
        let request = RenderRequest::default().with_range(0, 3, 0, 3);
        let err = render(&tiling, &request, &()).unwrap_err();
        assert!(matches!(err, Error::DegenerateLattice));
    }

    #[test]
    fn empty_tiling_fails() {
        let tiling = Tiling::new("empty", "");
        let err = render(&tiling, &RenderRequest::default(), &()).unwrap_err();
        assert!(matches!(err, Error::EmptyTiling));
    }

    #[test]
    fn source_keeps_its_local_transform() {
        let mut tiling = Tiling::new("one", "test");
        let d = {
            let mut m = Affine2D::IDENTITY;
            m.rotate(PI / 2.0, [0.5, 0.5]);
            m
        };
        tiling
            .add_base(Polygon::rect(0.0, 0.0, 1.0, 1.0))
            .add_transform(d);
        let t = Affine2D::from_matrix(2.0, 0.0, 0.0, 1.0, 0.25, 0.1);
        let mut objects = HashMap::new();
        objects.insert(ObjectId(7), t);

        let request = RenderRequest::default()
            .with_trace_cells(false)
            .with_source(0, ObjectId(7));
        let output = render(&tiling, &request, &objects).unwrap();
        assert_eq!(output.clones.len(), 1);
        assert!(output.trace.is_none());
        let clone = &output.clones.as_slice()[0];
        assert_eq!(clone.source(), Some(ObjectId(7)));
        assert!(clone.transform.abs_diff_eq(&t.then(&d), 1e-12));
    }

    #[test]
    fn source_is_relative_to_base_placement() {
        let tiling = unit_square();
        let placement = Affine2D::from_translation([5.0, 5.0]);
        let local = Affine2D::from_translation([5.5, 5.5]);
        let objects = HashMap::from([(ObjectId(1), local)]);
        let request = RenderRequest::default()
            .with_range(1, 1, 0, 0)
            .with_base_cell_placement(placement)
            .with_final_orientation(placement)
            .with_trace_cells(false)
            .with_source(0, ObjectId(1));
        let output = render(&tiling, &request, &objects).unwrap();
        let moved = output.clones.as_slice()[0].transform.transform_point([0.0, 0.0]);
        assert!(moved.abs_diff_eq(DVec2::new(6.5, 5.5), 1e-12));
    }

    #[test]
    fn stale_and_misdirected_sources_are_skipped() {
        let tiling = unit_square();
        let objects = HashMap::from([(ObjectId(1), Affine2D::IDENTITY)]);
        let request = RenderRequest::default()
            .with_trace_cells(false)
            .with_source(0, ObjectId(1))
            .with_source(0, ObjectId(2))
            .with_source(3, ObjectId(1));
        let output = render(&tiling, &request, &objects).unwrap();
        assert_eq!(output.clones.len(), 1);
    }

    #[test]
    fn untraceable_destinations_emit_no_outline() {
        let mut tiling = unit_square();
        tiling.basecells[0].transforms[0].traceable = false;
        let output = render(&tiling, &RenderRequest::default(), &()).unwrap();
        assert!(output.clones.is_empty());
        assert_eq!(output.cells_visited, 1);
    }

    #[test]
    fn zero_iterations_place_once() {
        let mut tiling = unit_square();
        tiling.basecells[0].transforms[0].max_iterations = 0;
        let output = render(&tiling, &RenderRequest::default(), &()).unwrap();
        assert_eq!(output.clones.len(), 1);
    }

    #[test]
    fn min_size_stops_a_shrinking_destination() {
        let mut tiling = unit_square();
        tiling.repeatable = RepeatAxes::NONE;
        tiling.basecells[0].transforms.clear();
        let mut shrink = Affine2D::from_scale(0.5);
        shrink.translate([1.0, 0.0]);
        tiling.basecells[0].add_dest(
            TilingDest::new(shrink)
                .with_iterations(-1)
                .with_conditions(StopConditions::NONE)
                .with_min_size(0.1),
        );
        let output = render(&tiling, &RenderRequest::default(), &()).unwrap();
        // diagonals √2/2, √2/4, ... stay above 0.1 for three steps
        assert_eq!(output.clones.len(), 3);
    }

    #[test]
    fn max_size_halts_before_emitting() {
        let mut tiling = unit_square();
        tiling.basecells[0].transforms.clear();
        tiling.basecells[0].add_dest(
            TilingDest::repeated(Affine2D::from_scale(2.0), 10).with_max_size(5.0),
        );
        let output = render(&tiling, &RenderRequest::default(), &()).unwrap();
        // diagonals 2√2 then 4√2
        assert_eq!(output.clones.len(), 1);
    }

    #[test]
    fn unbounded_destination_is_rejected() {
        let mut tiling = unit_square();
        tiling.basecells[0].transforms[0].max_iterations = -1;
        let err = render(&tiling, &RenderRequest::default(), &()).unwrap_err();
        assert!(matches!(err, Error::UnboundedDestination { .. }));
    }

    #[test]
    fn instance_limit_fails_without_output() {
        let tiling = unit_square();
        let renderer = TilingRenderer::try_new(RenderConfig::new().with_max_instances(4)).unwrap();
        let request = RenderRequest::default().with_range(0, 2, 0, 0);
        assert_eq!(renderer.render(&tiling, &request, &()).unwrap().clones.len(), 3);

        let request = RenderRequest::default().with_range(0, 9, 0, 9);
        let mut target = CloneGroup::new();
        let err = renderer
            .render_into(&tiling, &request, &(), &mut target)
            .unwrap_err();
        assert!(matches!(err, Error::InstanceLimit { limit: 4 }));
        assert!(target.is_empty());
    }

    #[test]
    fn render_into_appends() {
        let tiling = unit_square();
        let renderer = TilingRenderer::default();
        let mut target = CloneGroup::new();
        let request = RenderRequest::default().with_range(0, 1, 0, 0);
        assert_eq!(renderer.render_into(&tiling, &request, &(), &mut target).unwrap(), 2);
        assert_eq!(renderer.render_into(&tiling, &request, &(), &mut target).unwrap(), 2);
        assert_eq!(target.len(), 4);
    }

    #[test]
    fn singular_orientation_fails() {
        let tiling = unit_square();
        let request =
            RenderRequest::default().with_final_orientation(Affine2D::from_scale(0.0));
        let err = render(&tiling, &request, &()).unwrap_err();
        assert!(matches!(err, Error::SingularTransform { .. }));
    }

    #[test]
    fn final_transform_is_applied_before_orientation() {
        let mut tiling = unit_square();
        tiling.final_transform = Affine2D::from_scale(2.0);
        let request = RenderRequest::default()
            .with_final_orientation(Affine2D::from_translation([1.0, 0.0]));
        let output = render(&tiling, &request, &()).unwrap();
        let corner = output.clones.as_slice()[0].transform.transform_point([1.0, 1.0]);
        assert!(corner.abs_diff_eq(DVec2::new(3.0, 2.0), 1e-12));
    }

    #[test]
    fn cell_range_counts() {
        assert_eq!(CellRange::new(0, 3, 0, 3).cell_count(), 16);
        assert_eq!(CellRange::new(3, 0, 0, 0).cell_count(), 0);
        assert_eq!(CellRange::new(3, 0, 0, 0).normalized().cell_count(), 1);
    }
}
