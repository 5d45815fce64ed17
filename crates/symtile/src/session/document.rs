//! Host document seen by a clone session.
use std::collections::{BTreeMap, HashMap};

use crate::geometry::affine::Affine2D;
use crate::render::output::RenderOutput;
use crate::render::{ObjectId, SourceLookup};

/// Handle of a node inserted into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Document tree that hosts a session's preview.
///
/// The document also resolves the session's source objects, so a source
/// deleted from the document turns stale on the next render.
pub trait DocumentTree: SourceLookup {
    /// Attaches a rendered preview and returns its node.
    fn insert_preview(&mut self, preview: RenderOutput) -> NodeId;

    /// Removes `node`; returns `false` when it was not present.
    fn remove_node(&mut self, node: NodeId) -> bool;

    /// Tells dependent views the tree changed.
    fn notify_changed(&mut self);
}

/// In-memory document: a flat set of source objects and preview nodes.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    objects: HashMap<ObjectId, Affine2D>,
    nodes: BTreeMap<NodeId, RenderOutput>,
    next_object: u64,
    next_node: u64,
    changes: usize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source object with the given local transform.
    pub fn add_object(&mut self, transform: Affine2D) -> ObjectId {
        self.next_object += 1;
        let id = ObjectId(self.next_object);
        self.objects.insert(id, transform);
        id
    }

    pub fn set_transform(&mut self, id: ObjectId, transform: Affine2D) -> bool {
        match self.objects.get_mut(&id) {
            Some(slot) => {
                *slot = transform;
                true
            }
            None => false,
        }
    }

    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        self.objects.remove(&id).is_some()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&RenderOutput> {
        self.nodes.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &RenderOutput)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Number of change notifications received.
    pub fn change_count(&self) -> usize {
        self.changes
    }
}

impl SourceLookup for MemoryDocument {
    fn local_transform(&self, id: ObjectId) -> Option<Affine2D> {
        self.objects.get(&id).copied()
    }
}

impl DocumentTree for MemoryDocument {
    fn insert_preview(&mut self, preview: RenderOutput) -> NodeId {
        self.next_node += 1;
        let id = NodeId(self.next_node);
        self.nodes.insert(id, preview);
        id
    }

    fn remove_node(&mut self, node: NodeId) -> bool {
        self.nodes.remove(&node).is_some()
    }

    fn notify_changed(&mut self) {
        self.changes += 1;
    }
}
