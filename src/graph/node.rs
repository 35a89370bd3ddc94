//! Node storage and the [`NodeId`] handle.
//!
//! The original models a node as a heap object holding raw pointers to its
//! adjacent edges. Here the node's data lives in [`super::Graph`]'s slot
//! map and is referred to only by the generational [`NodeId`] key; methods
//! that need a node's neighbors take `&Graph` as an explicit parameter
//! rather than storing a back-reference.

use glam::DVec3;
use slotmap::new_key_type;
use smallvec::SmallVec;

use super::{edge::EdgeId, Graph};

new_key_type! {
  /// A generational handle to a live or tombstoned node.
  pub struct NodeId;
}

/// A vertex of the mesh under construction: a position, an outward unit
/// normal, and the edges currently incident to it.
#[derive(Clone, Debug)]
pub struct Node {
  pub(crate) pos: DVec3,
  pub(crate) normal: DVec3,
  pub(crate) edges: SmallVec<[EdgeId; 8]>,
  pub(crate) removed: bool,
}

impl Node {
  pub(crate) fn new(pos: DVec3, normal: DVec3) -> Self {
    debug_assert!(pos.is_finite(), "node position must be finite");
    debug_assert!(normal.is_finite(), "node normal must be finite");
    debug_assert!(normal.length_squared() > 0.0, "node normal must be nonzero");
    Self {
      pos,
      normal,
      edges: SmallVec::new(),
      removed: false,
    }
  }
}

impl NodeId {
  pub fn pos(self, graph: &Graph) -> DVec3 {
    graph.nodes[self].pos
  }

  pub fn normal(self, graph: &Graph) -> DVec3 {
    graph.nodes[self].normal
  }

  pub fn is_removed(self, graph: &Graph) -> bool {
    graph.nodes[self].removed
  }

  pub fn edges(self, graph: &Graph) -> &[EdgeId] {
    &graph.nodes[self].edges
  }

  /// Whether there is a live edge directly connecting `self` to `other`.
  pub fn has_edge_to(self, graph: &Graph, other: NodeId) -> bool {
    debug_assert_ne!(self, other, "has_edge_to(self) is a programmer error");
    graph.nodes[self].edges.iter().any(|&e| graph.edges[e].has_node(other))
  }

  /// The edge connecting `self` to `other`, if one exists.
  pub fn get_edge_to(self, graph: &Graph, other: NodeId) -> Option<EdgeId> {
    debug_assert_ne!(self, other, "get_edge_to(self) is a programmer error");
    graph.nodes[self].edges.iter().copied().find(|&e| graph.edges[e].has_node(other))
  }

  /// Tombstones the node: clears its adjacency and marks it removed. Does
  /// not touch edges still pointing at it; callers are responsible for
  /// detaching those first (see `SurfaceMemory::collapse_node`).
  pub(crate) fn mark_removed(self, graph: &mut Graph) {
    let node = &mut graph.nodes[self];
    node.edges.clear();
    node.removed = true;
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
