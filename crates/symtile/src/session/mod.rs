//! Interactive clone session.
//!
//! A [`CloneSession`] binds a shared, read-only [`Tiling`] and a list of
//! source objects to one preview node in a host [`DocumentTree`]. While
//! active, every state change re-renders and swaps the preview in place.
//! Mutations that do not need the document (assigning or removing sources,
//! picking the current base cell) never render on their own; call
//! [`CloneSession::refresh`] to apply them.
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::geometry::affine::Affine2D;
use crate::geometry::polygon::Polygon;
use crate::library::catalog::BuiltinCatalog;
use crate::library::radial::update_radial;
use crate::render::config::RenderConfig;
use crate::render::output::RenderOutput;
use crate::render::renderer::{
    CellRange, LatticeExtent, RenderRequest, SourceAssignment, TilingRenderer,
};
use crate::render::{ObjectId, SourceLookup};
use crate::session::document::{DocumentTree, NodeId};
use crate::session::events::{EventSink, SessionEvent, SessionEventKind};
use crate::tiling::Tiling;

pub mod document;
pub mod events;

/// Configuration for a [`CloneSession`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Cells rendered when no boundary is set.
    pub lattice_range: CellRange,
    /// Renderer settings.
    pub render: RenderConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lattice_range: CellRange::new(0, 3, 0, 3),
            render: RenderConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lattice range.
    pub fn with_lattice_range(mut self, lattice_range: CellRange) -> Self {
        self.lattice_range = lattice_range.normalized();
        self
    }

    /// Sets the renderer configuration.
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.render.validate()
    }
}

/// Live binding of a tiling to a document preview.
pub struct CloneSession<S: EventSink = ()> {
    config: SessionConfig,
    renderer: TilingRenderer,
    tiling: Arc<Tiling>,
    /// Position in [`BuiltinCatalog::global`], when the tiling came from it.
    catalog_index: Option<usize>,
    sources: Vec<SourceAssignment>,
    boundary: Option<Polygon>,
    base_cell_placement: Affine2D,
    trace_cells: bool,
    current_base: usize,
    preview: Option<NodeId>,
    sink: S,
}

impl CloneSession<()> {
    pub fn try_new(config: SessionConfig, tiling: Arc<Tiling>) -> Result<Self> {
        Self::try_with_sink(config, tiling, ())
    }

    /// Session on the built-in pattern `key`, e.g. `"Wallpaper/p4m"`.
    pub fn from_builtin(config: SessionConfig, key: &str) -> Result<Self> {
        let catalog = BuiltinCatalog::global();
        let tiling = catalog.get(key)?;
        let mut session = Self::try_new(config, tiling)?;
        session.catalog_index = catalog.index_of(key);
        Ok(session)
    }
}

impl<S: EventSink> CloneSession<S> {
    pub fn try_with_sink(config: SessionConfig, tiling: Arc<Tiling>, sink: S) -> Result<Self> {
        config.validate()?;
        let renderer = TilingRenderer::try_new(config.render.clone())?;
        Ok(Self {
            config,
            renderer,
            tiling,
            catalog_index: None,
            sources: Vec::new(),
            boundary: None,
            base_cell_placement: Affine2D::IDENTITY,
            trace_cells: false,
            current_base: 0,
            preview: None,
            sink,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tiling(&self) -> &Arc<Tiling> {
        &self.tiling
    }

    pub fn sources(&self) -> &[SourceAssignment] {
        &self.sources
    }

    pub fn boundary(&self) -> Option<&Polygon> {
        self.boundary.as_ref()
    }

    pub fn base_cell_placement(&self) -> Affine2D {
        self.base_cell_placement
    }

    pub fn trace_cells(&self) -> bool {
        self.trace_cells
    }

    pub fn current_base(&self) -> usize {
        self.current_base
    }

    pub fn preview(&self) -> Option<NodeId> {
        self.preview
    }

    pub fn is_active(&self) -> bool {
        self.preview.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Clones `object` into every placement of `base_cell`. Does not render.
    pub fn assign_source(&mut self, base_cell: usize, object: ObjectId) -> Result<()> {
        if base_cell >= self.tiling.basecells.len() {
            return Err(Error::InvalidConfig(format!(
                "base cell {base_cell} out of range for tiling '{}' ({} cells)",
                self.tiling.name,
                self.tiling.basecells.len()
            )));
        }
        let assignment = SourceAssignment::new(base_cell, object);
        if !self.sources.contains(&assignment) {
            self.sources.push(assignment);
        }
        Ok(())
    }

    /// Removes every assignment of `object`. Does not render.
    pub fn remove_source(&mut self, object: ObjectId) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.object != object);
        self.sources.len() != before
    }

    pub fn clear_sources(&mut self) {
        self.sources.clear();
    }

    /// Selects the base cell new sources are meant for. An out-of-range
    /// index leaves the selection unchanged and returns `false`.
    pub fn set_current_base(&mut self, index: usize) -> bool {
        if index >= self.tiling.basecells.len() {
            return false;
        }
        self.current_base = index;
        true
    }

    /// RGBA guide color of base cell `index`: red for the first cell, blue
    /// for the last, blended in between.
    pub fn base_cell_color(&self, index: usize) -> [f64; 4] {
        let n = self.tiling.basecells.len();
        let t = if n > 1 {
            (index as f64 / (n - 1) as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };
        [1.0 - t, 0.0, t, 1.0]
    }

    /// Render request reflecting the current state. Outlines are traced
    /// when asked to, or when there is nothing else to show.
    pub fn request(&self) -> RenderRequest {
        let extent = match &self.boundary {
            Some(boundary) => LatticeExtent::Boundary(boundary.clone()),
            None => LatticeExtent::Range(self.config.lattice_range),
        };
        RenderRequest::new(extent)
            .with_base_cell_placement(self.base_cell_placement)
            .with_final_orientation(self.base_cell_placement)
            .with_trace_cells(self.trace_cells || self.sources.is_empty())
            .with_sources(self.sources.iter().copied())
    }

    /// Renders the current state without touching any document.
    pub fn render(&self, lookup: &(impl SourceLookup + ?Sized)) -> Result<RenderOutput> {
        self.renderer.render(&self.tiling, &self.request(), lookup)
    }

    /// Renders and attaches the preview. Does nothing when already active.
    pub fn activate<D: DocumentTree + ?Sized>(&mut self, doc: &mut D) -> Result<()> {
        if self.preview.is_some() {
            return Ok(());
        }
        let node = self.render_into_document(doc)?;
        info!(
            "Clone session activated for tiling '{}' ({:?}).",
            self.tiling.name, node
        );
        self.emit(SessionEventKind::Activated, || SessionEvent::Activated {
            preview: node,
        });
        Ok(())
    }

    /// Removes exactly the preview this session inserted. Idempotent.
    pub fn deactivate<D: DocumentTree + ?Sized>(&mut self, doc: &mut D) {
        let Some(node) = self.preview.take() else {
            return;
        };
        if !doc.remove_node(node) {
            warn!("Preview {:?} was already gone from the document.", node);
            let context = self.tiling.name.clone();
            self.emit(SessionEventKind::Warning, || SessionEvent::Warning {
                context,
                message: format!("preview {node:?} was already removed"),
            });
        }
        doc.notify_changed();
        info!("Clone session deactivated ({:?}).", node);
        self.emit(SessionEventKind::Deactivated, || SessionEvent::Deactivated {
            preview: node,
        });
    }

    /// Detaches the preview before the session is dropped.
    pub fn shutdown<D: DocumentTree + ?Sized>(&mut self, doc: &mut D) {
        self.deactivate(doc);
    }

    /// Re-renders if active.
    pub fn refresh<D: DocumentTree + ?Sized>(&mut self, doc: &mut D) -> Result<()> {
        if self.preview.is_some() {
            self.render_into_document(doc)?;
        }
        Ok(())
    }

    /// Replaces the tiling. Source assignments to base cells the new tiling
    /// lacks are dropped.
    pub fn set_tiling<D: DocumentTree + ?Sized>(
        &mut self,
        doc: &mut D,
        tiling: Arc<Tiling>,
    ) -> Result<()> {
        self.replace_tiling(doc, tiling, None)
    }

    /// Switches to the next built-in pattern, wrapping at the end.
    pub fn next_tiling<D: DocumentTree + ?Sized>(&mut self, doc: &mut D) -> Result<()> {
        self.step_catalog(doc, 1)
    }

    /// Switches to the previous built-in pattern, wrapping at the start.
    pub fn previous_tiling<D: DocumentTree + ?Sized>(&mut self, doc: &mut D) -> Result<()> {
        self.step_catalog(doc, -1)
    }

    pub fn set_boundary<D: DocumentTree + ?Sized>(
        &mut self,
        doc: &mut D,
        boundary: Option<Polygon>,
    ) -> Result<()> {
        self.boundary = boundary;
        self.refresh(doc)
    }

    pub fn set_base_cell_placement<D: DocumentTree + ?Sized>(
        &mut self,
        doc: &mut D,
        placement: Affine2D,
    ) -> Result<()> {
        self.base_cell_placement = placement;
        self.refresh(doc)
    }

    /// Flips outline tracing and returns the new setting.
    pub fn toggle_trace_cells<D: DocumentTree + ?Sized>(&mut self, doc: &mut D) -> Result<bool> {
        self.trace_cells = !self.trace_cells;
        self.refresh(doc)?;
        Ok(self.trace_cells)
    }

    pub fn set_lattice_range<D: DocumentTree + ?Sized>(
        &mut self,
        doc: &mut D,
        range: CellRange,
    ) -> Result<()> {
        self.config.lattice_range = range.normalized();
        self.refresh(doc)
    }

    /// Rebuilds a circular tiling with `divisions` slices. Other sessions
    /// sharing the tiling keep the old one.
    pub fn set_radial_divisions<D: DocumentTree + ?Sized>(
        &mut self,
        doc: &mut D,
        divisions: u32,
    ) -> Result<()> {
        update_radial(Arc::make_mut(&mut self.tiling), divisions)?;
        let name = self.tiling.name.clone();
        let base_cells = self.tiling.basecells.len();
        self.emit(SessionEventKind::TilingChanged, || {
            SessionEvent::TilingChanged { name, base_cells }
        });
        self.refresh(doc)
    }

    fn step_catalog<D: DocumentTree + ?Sized>(&mut self, doc: &mut D, step: isize) -> Result<()> {
        let catalog = BuiltinCatalog::global();
        let len = catalog.len();
        if len == 0 {
            return Err(Error::Other("no built-in patterns available".into()));
        }
        let index = match (self.catalog_index, step >= 0) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        let tiling = catalog
            .by_index(index)
            .ok_or_else(|| Error::Other(format!("built-in pattern {index} missing")))?;
        self.replace_tiling(doc, tiling, Some(index))
    }

    fn replace_tiling<D: DocumentTree + ?Sized>(
        &mut self,
        doc: &mut D,
        tiling: Arc<Tiling>,
        catalog_index: Option<usize>,
    ) -> Result<()> {
        let cells = tiling.basecells.len();
        let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.sources)
            .into_iter()
            .partition(|s| s.base_cell < cells);
        self.sources = kept;
        if !dropped.is_empty() {
            warn!(
                "Tiling '{}' has {} base cells; dropping {} source assignments.",
                tiling.name,
                cells,
                dropped.len()
            );
            self.emit(SessionEventKind::SourcesDropped, || {
                SessionEvent::SourcesDropped { dropped }
            });
        }
        if self.current_base >= cells {
            self.current_base = 0;
        }

        self.tiling = tiling;
        self.catalog_index = catalog_index;
        info!("Clone session now uses tiling '{}'.", self.tiling.name);
        let name = self.tiling.name.clone();
        self.emit(SessionEventKind::TilingChanged, || {
            SessionEvent::TilingChanged {
                name,
                base_cells: cells,
            }
        });
        self.refresh(doc)
    }

    /// Renders, then swaps the preview node. On failure the document keeps
    /// its current preview.
    fn render_into_document<D: DocumentTree + ?Sized>(&mut self, doc: &mut D) -> Result<NodeId> {
        let output = match self.renderer.render(&self.tiling, &self.request(), &*doc) {
            Ok(output) => output,
            Err(err) => {
                warn!("Rendering tiling '{}' failed: {}.", self.tiling.name, err);
                let message = err.to_string();
                self.emit(SessionEventKind::RenderFailed, || {
                    SessionEvent::RenderFailed { message }
                });
                return Err(err);
            }
        };

        let instances = output.clones.len();
        let cells_visited = output.cells_visited;
        if let Some(old) = self.preview.take() {
            doc.remove_node(old);
        }
        let node = doc.insert_preview(output);
        self.preview = Some(node);
        doc.notify_changed();
        self.emit(SessionEventKind::Rendered, || SessionEvent::Rendered {
            preview: node,
            instances,
            cells_visited,
        });
        Ok(node)
    }

    fn emit(&mut self, kind: SessionEventKind, event: impl FnOnce() -> SessionEvent) {
        if self.sink.wants(kind) {
            self.sink.send(event());
        }
    }
}

impl<S: EventSink> Drop for CloneSession<S> {
    fn drop(&mut self) {
        if let Some(node) = self.preview {
            warn!(
                "Clone session for '{}' dropped while preview {:?} is still attached; call shutdown first.",
                self.tiling.name, node
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{create_radial_simple, create_uniform_coloring, create_wallpaper};
    use crate::session::document::MemoryDocument;
    use crate::session::events::VecSink;

    fn p1() -> Arc<Tiling> {
        Arc::new(create_wallpaper("p1").unwrap())
    }

    fn session_with_events(tiling: Arc<Tiling>) -> CloneSession<VecSink> {
        CloneSession::try_with_sink(SessionConfig::default(), tiling, VecSink::new()).unwrap()
    }

    fn preview_len(session: &CloneSession<VecSink>, doc: &MemoryDocument) -> usize {
        session
            .preview()
            .and_then(|node| doc.node(node))
            .map_or(0, |output| output.clones.len())
    }

    #[test]
    fn activate_inserts_one_preview() {
        let mut doc = MemoryDocument::new();
        let mut session = session_with_events(p1());
        session.activate(&mut doc).unwrap();
        assert!(session.is_active());
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.change_count(), 1);
        // 4×4 cells of outlines, traced because there are no sources
        assert_eq!(preview_len(&session, &doc), 16);
        assert_eq!(session.sink().count(SessionEventKind::Activated), 1);
        assert_eq!(session.sink().count(SessionEventKind::Rendered), 1);

        session.activate(&mut doc).unwrap();
        assert_eq!(doc.node_count(), 1);
        session.shutdown(&mut doc);
    }

    #[test]
    fn deactivate_is_idempotent() {
        let mut doc = MemoryDocument::new();
        let mut session = session_with_events(p1());
        session.activate(&mut doc).unwrap();
        session.deactivate(&mut doc);
        session.deactivate(&mut doc);
        assert!(!session.is_active());
        assert_eq!(doc.node_count(), 0);
        assert_eq!(session.sink().count(SessionEventKind::Deactivated), 1);
    }

    #[test]
    fn assigning_sources_does_not_render() {
        let mut doc = MemoryDocument::new();
        let object = doc.add_object(Affine2D::from_translation([0.25, 0.25]));
        let mut session = session_with_events(p1());
        session.activate(&mut doc).unwrap();
        let changes = doc.change_count();

        session.assign_source(0, object).unwrap();
        session.assign_source(0, object).unwrap();
        assert_eq!(session.sources().len(), 1);
        assert_eq!(doc.change_count(), changes);
        assert!(session.assign_source(1, object).is_err());

        session.refresh(&mut doc).unwrap();
        let node = session.preview().unwrap();
        let preview = doc.node(node).unwrap();
        assert_eq!(preview.clones.clones_of(object).count(), 16);
        assert_eq!(preview.clones.outlines().count(), 0);

        assert!(session.toggle_trace_cells(&mut doc).unwrap());
        assert_eq!(preview_len(&session, &doc), 32);
        session.shutdown(&mut doc);
    }

    #[test]
    fn set_tiling_drops_orphaned_sources() {
        let mut doc = MemoryDocument::new();
        let a = doc.add_object(Affine2D::IDENTITY);
        let b = doc.add_object(Affine2D::IDENTITY);
        let nine = Arc::new(create_uniform_coloring("square 9").unwrap());
        let mut session = session_with_events(nine);
        session.assign_source(0, a).unwrap();
        session.assign_source(3, b).unwrap();
        assert!(session.set_current_base(3));

        session.set_tiling(&mut doc, p1()).unwrap();
        assert_eq!(session.sources(), &[SourceAssignment::new(0, a)]);
        assert_eq!(session.current_base(), 0);
        let dropped = session
            .sink()
            .as_slice()
            .iter()
            .find_map(|e| match e {
                SessionEvent::SourcesDropped { dropped } => Some(dropped.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(dropped, vec![SourceAssignment::new(3, b)]);
        assert!(!session.is_active());
        assert_eq!(doc.node_count(), 0);
    }

    #[test]
    fn set_tiling_rerenders_when_active() {
        let mut doc = MemoryDocument::new();
        let mut session = session_with_events(p1());
        session.activate(&mut doc).unwrap();
        let first = session.preview().unwrap();

        session
            .set_tiling(&mut doc, Arc::new(create_wallpaper("p2").unwrap()))
            .unwrap();
        let second = session.preview().unwrap();
        assert_ne!(first, second);
        assert_eq!(doc.node_count(), 1);
        assert_eq!(preview_len(&session, &doc), 32);
        session.shutdown(&mut doc);
    }

    #[test]
    fn failed_render_keeps_previous_preview() {
        let mut doc = MemoryDocument::new();
        let mut session = session_with_events(p1());
        session.activate(&mut doc).unwrap();
        let node = session.preview().unwrap();

        let mut broken = create_wallpaper("p1").unwrap();
        broken.set_repeat_y([1.0, 0.0]);
        let err = session.set_tiling(&mut doc, Arc::new(broken)).unwrap_err();
        assert!(matches!(err, Error::DegenerateLattice));
        assert_eq!(session.preview(), Some(node));
        assert!(doc.node(node).is_some());
        assert_eq!(session.sink().count(SessionEventKind::RenderFailed), 1);
        session.shutdown(&mut doc);
    }

    #[test]
    fn failed_activation_leaves_session_inactive() {
        let mut doc = MemoryDocument::new();
        let mut session = session_with_events(Arc::new(Tiling::new("empty", "")));
        assert!(matches!(
            session.activate(&mut doc),
            Err(Error::EmptyTiling)
        ));
        assert!(!session.is_active());
        assert_eq!(doc.node_count(), 0);
    }

    #[test]
    fn boundary_and_range_trigger_rerender() {
        let mut doc = MemoryDocument::new();
        let mut session = session_with_events(p1());
        session.activate(&mut doc).unwrap();

        session
            .set_boundary(&mut doc, Some(Polygon::rect(0.0, 0.0, 2.0, 2.0)))
            .unwrap();
        assert_eq!(preview_len(&session, &doc), 4);
        session.set_boundary(&mut doc, None).unwrap();
        session
            .set_lattice_range(&mut doc, CellRange::new(0, 1, 0, 0))
            .unwrap();
        assert_eq!(preview_len(&session, &doc), 2);
        session
            .set_base_cell_placement(&mut doc, Affine2D::from_translation([3.0, 0.0]))
            .unwrap();
        let node = doc.node(session.preview().unwrap()).unwrap();
        let x = node.clones.as_slice()[0].transform.translation().x;
        assert!((x - 3.0).abs() < 1e-12);
        session.shutdown(&mut doc);
    }

    #[test]
    fn stale_source_is_skipped() {
        let mut doc = MemoryDocument::new();
        let object = doc.add_object(Affine2D::IDENTITY);
        let mut session = session_with_events(p1());
        session.assign_source(0, object).unwrap();
        session.activate(&mut doc).unwrap();
        assert_eq!(preview_len(&session, &doc), 16);

        doc.remove_object(object);
        session.refresh(&mut doc).unwrap();
        assert_eq!(preview_len(&session, &doc), 0);
        assert!(session.remove_source(object));
        assert!(!session.remove_source(object));
        session.shutdown(&mut doc);
    }

    #[test]
    fn catalog_navigation_wraps() {
        let mut doc = MemoryDocument::new();
        let mut session = CloneSession::from_builtin(SessionConfig::default(), "Wallpaper/p1").unwrap();
        session.next_tiling(&mut doc).unwrap();
        assert_eq!(session.tiling().name, "p2");
        session.previous_tiling(&mut doc).unwrap();
        session.previous_tiling(&mut doc).unwrap();
        assert_eq!(session.tiling().name, "truncated square 2");
        session.next_tiling(&mut doc).unwrap();
        assert_eq!(session.tiling().name, "p1");
    }

    #[test]
    fn radial_divisions_copy_on_write() {
        let mut doc = MemoryDocument::new();
        let shared = Arc::new(create_radial_simple(false, 10).unwrap());
        let mut session = session_with_events(Arc::clone(&shared));
        session.activate(&mut doc).unwrap();
        assert_eq!(preview_len(&session, &doc), 10);

        session.set_radial_divisions(&mut doc, 6).unwrap();
        assert_eq!(session.tiling().radial_divisions, 6);
        assert_eq!(shared.radial_divisions, 10);
        assert_eq!(preview_len(&session, &doc), 6);

        session.set_tiling(&mut doc, p1()).unwrap();
        assert!(matches!(
            session.set_radial_divisions(&mut doc, 6),
            Err(Error::UnsupportedTiling(_))
        ));
        session.shutdown(&mut doc);
    }

    #[test]
    fn base_cell_colors_run_red_to_blue() {
        let session = session_with_events(Arc::new(create_uniform_coloring("square 9").unwrap()));
        assert_eq!(session.base_cell_color(0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(session.base_cell_color(3), [0.0, 0.0, 1.0, 1.0]);
        let single = session_with_events(p1());
        assert_eq!(single.base_cell_color(0), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_preview_is_reported_on_deactivate() {
        let mut doc = MemoryDocument::new();
        let mut session = session_with_events(p1());
        session.activate(&mut doc).unwrap();
        let node = session.preview().unwrap();
        assert!(doc.remove_node(node));

        session.deactivate(&mut doc);
        assert!(!session.is_active());
        assert_eq!(session.sink().count(SessionEventKind::Warning), 1);
        assert_eq!(session.sink().count(SessionEventKind::Deactivated), 1);
    }

    #[test]
    fn invalid_base_selection_is_ignored() {
        let mut session = session_with_events(p1());
        assert!(!session.set_current_base(1));
        assert_eq!(session.current_base(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SessionConfig::new().with_render(RenderConfig::new().with_max_instances(0));
        assert!(CloneSession::try_new(config, p1()).is_err());
    }
}
