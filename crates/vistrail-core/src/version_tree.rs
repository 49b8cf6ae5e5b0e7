//! The version tree of a history.
//!
//! [`VersionTree`] stores one vertex per [`ActionId`] with an edge from each
//! version to its declared parent (child → parent). The synthetic root
//! `ActionId(0)` is always present. Children are visited in the order their
//! edges were inserted; callers add versions in ascending id order to get
//! deterministic traversals.

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::id::ActionId;

/// Event produced while walking the tree depth-first from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// First visit of a version, before any of its descendants.
    Enter(ActionId),
    /// Last visit of a version, after all of its descendants.
    Leave(ActionId),
}

#[derive(Debug, Clone)]
pub struct VersionTree {
    graph: DiGraphMap<ActionId, ()>,
}

impl Default for VersionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionTree {
    /// Creates a tree holding only the root version.
    pub fn new() -> Self {
        let mut graph = DiGraphMap::new();
        graph.add_node(ActionId::ROOT);
        VersionTree { graph }
    }

    /// Adds `id` with an edge to `parent`. The parent vertex is created if it
    /// is not known yet; no validation is performed here.
    pub fn add_version(&mut self, id: ActionId, parent: ActionId) {
        self.graph.add_edge(id, parent, ());
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.graph.contains_node(id)
    }

    /// Number of versions, root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn parent_of(&self, id: ActionId) -> Option<ActionId> {
        if !self.contains(id) {
            return None;
        }
        self.graph
            .neighbors_directed(id, Direction::Outgoing)
            .next()
    }

    /// Direct children of `id`, in traversal order.
    pub fn children_of(&self, id: ActionId) -> Vec<ActionId> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.graph
            .neighbors_directed(id, Direction::Incoming)
            .collect()
    }

    /// Versions from the root (exclusive) down to `id` (inclusive).
    ///
    /// Returns `None` if `id` is unknown or its ancestry never reaches the
    /// root.
    pub fn path_from_root(&self, id: ActionId) -> Option<Vec<ActionId>> {
        if !self.contains(id) {
            return None;
        }
        let mut path = Vec::new();
        let mut current = id;
        while !current.is_root() {
            if path.len() >= self.len() {
                return None;
            }
            path.push(current);
            current = self.parent_of(current)?;
        }
        path.reverse();
        Some(path)
    }

    /// Returns `true` if `ancestor` lies on the path from the root to
    /// `descendant` (a version is its own ancestor).
    pub fn is_ancestor(&self, ancestor: ActionId, descendant: ActionId) -> bool {
        if ancestor.is_root() {
            return self.path_from_root(descendant).is_some();
        }
        self.path_from_root(descendant)
            .is_some_and(|path| path.contains(&ancestor))
    }

    /// Returns a version that lies on a cycle, if any.
    pub fn find_cycle(&self) -> Option<ActionId> {
        toposort(&self.graph, None).err().map(|cycle| cycle.node_id())
    }

    /// Walks every version reachable from the root depth-first, reporting
    /// enter/leave events. Stops at the first error returned by `visit`.
    /// Iterative: depth is not limited by the thread's call stack.
    pub fn walk<E>(&self, mut visit: impl FnMut(TreeEvent) -> Result<(), E>) -> Result<(), E> {
        let mut discovered = HashSet::new();
        discovered.insert(ActionId::ROOT);
        visit(TreeEvent::Enter(ActionId::ROOT))?;
        let mut stack = vec![(ActionId::ROOT, self.children_of(ActionId::ROOT).into_iter())];

        while let Some((id, children)) = stack.last_mut() {
            match children.next() {
                Some(child) => {
                    if !discovered.insert(child) {
                        continue;
                    }
                    visit(TreeEvent::Enter(child))?;
                    stack.push((child, self.children_of(child).into_iter()));
                }
                None => {
                    let id = *id;
                    stack.pop();
                    visit(TreeEvent::Leave(id))?;
                }
            }
        }
        Ok(())
    }
}
