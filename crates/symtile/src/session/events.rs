//! Event types and sinks for observing a [`crate::session::CloneSession`].
//!
//! This module defines [`SessionEvent`] and the sinks that receive or
//! collect events while a session activates, re-renders and swaps tilings.
use crate::render::renderer::SourceAssignment;
use crate::session::document::NodeId;

/// Describes events emitted by a clone session.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The session now uses a different tiling.
    TilingChanged {
        /// Name of the new tiling.
        name: String,
        /// Number of base cells in the new tiling.
        base_cells: usize,
    },

    /// A preview node was attached to the document.
    Activated {
        /// The inserted node.
        preview: NodeId,
    },

    /// The preview node was removed from the document.
    Deactivated {
        /// The removed node.
        preview: NodeId,
    },

    /// A render finished and its preview was inserted.
    Rendered {
        /// Node holding the new preview.
        preview: NodeId,
        /// Number of emitted clone instances.
        instances: usize,
        /// Lattice cells that were expanded.
        cells_visited: usize,
    },

    /// A render failed; the document was left unchanged.
    RenderFailed {
        /// Human-readable reason.
        message: String,
    },

    /// Source assignments pointing at base cells the new tiling lacks.
    SourcesDropped {
        /// The removed assignments.
        dropped: Vec<SourceAssignment>,
    },

    /// Non-fatal warning generated by the session.
    Warning {
        /// Context string (e.g. tiling name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`SessionEvent`], used to skip building unwanted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    TilingChanged,
    Activated,
    Deactivated,
    Rendered,
    RenderFailed,
    SourcesDropped,
    Warning,
}

impl SessionEvent {
    pub fn kind(&self) -> SessionEventKind {
        match self {
            SessionEvent::TilingChanged { .. } => SessionEventKind::TilingChanged,
            SessionEvent::Activated { .. } => SessionEventKind::Activated,
            SessionEvent::Deactivated { .. } => SessionEventKind::Deactivated,
            SessionEvent::Rendered { .. } => SessionEventKind::Rendered,
            SessionEvent::RenderFailed { .. } => SessionEventKind::RenderFailed,
            SessionEvent::SourcesDropped { .. } => SessionEventKind::SourcesDropped,
            SessionEvent::Warning { .. } => SessionEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`SessionEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SessionEvent);

    /// Whether events of `kind` should be built at all.
    #[inline]
    fn wants(&self, _kind: SessionEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = SessionEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SessionEvent) {}

    #[inline]
    fn wants(&self, _kind: SessionEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SessionEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SessionEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SessionEvent),
{
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Debug, Default)]
pub struct VecSink {
    events: Vec<SessionEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<SessionEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: SessionEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        self.events.push(event);
    }
}
