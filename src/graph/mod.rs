//! Arena-backed node/edge graph.
//!
//! The original back-pointers a node's adjacency list directly to `edge*`
//! and an edge directly to its two `node*` endpoints, all raw pointers
//! mutated in place. That is modeled here with two [`slotmap::SlotMap`]
//! arenas keyed by generational handles ([`NodeId`], [`EdgeId`]); nothing
//! outside this module dereferences a handle without going through
//! [`Graph`]. A handle captured before [`Graph::compact`] removes its
//! entity compares unequal to whatever later reuses that slot, so stale
//! handles fail safely instead of aliasing.

pub mod edge;
pub mod node;

use glam::DVec3;
use slotmap::SlotMap;

pub use edge::EdgeId;
pub use node::NodeId;

use edge::Edge;
use node::Node;

#[derive(Default)]
pub struct Graph {
  pub(crate) nodes: SlotMap<NodeId, Node>,
  pub(crate) edges: SlotMap<EdgeId, Edge>,
}

impl Graph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// Count of nodes not yet tombstoned (may be less than [`Self::node_count`]
  /// between a `collapse` and the next [`Self::compact`]).
  pub fn live_node_count(&self) -> usize {
    self.nodes.values().filter(|n| !n.removed).count()
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  pub fn add_node(&mut self, pos: DVec3, normal: DVec3) -> NodeId {
    self.nodes.insert(Node::new(pos, normal))
  }

  /// Links a brand-new unused edge between `a` and `b` into both
  /// adjacency lists. Asserts `a != b` and that no edge already connects
  /// them, mirroring the original's fatal preconditions on `push`.
  pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> EdgeId {
    debug_assert_ne!(a, b, "cannot add a self-edge");
    debug_assert!(!a.has_edge_to(self, b), "a parallel edge between these nodes already exists");
    let id = self.edges.insert(Edge::new(a, b));
    self.nodes[a].edges.push(id);
    self.nodes[b].edges.push(id);
    id
  }

  /// Removes `edge` from `node`'s adjacency list. No-op if absent.
  pub(crate) fn detach_edge_from_node(&mut self, node: NodeId, edge: EdgeId) {
    if let Some(node) = self.nodes.get_mut(node) {
      node.edges.retain(|e| *e != edge);
    }
  }

  /// Physically removes every tombstoned node and edge from the arenas.
  /// Live structures referring to a tombstoned entity only by its handle
  /// (the front queue, the spatial hash) must already have dropped that
  /// handle before calling this; it does not scrub them.
  pub fn compact(&mut self) {
    self.edges.retain(|_, e| !self.nodes[e.a].removed && !self.nodes[e.b].removed);
    self.nodes.retain(|_, n| !n.removed);
  }

  pub fn is_live_node(&self, id: NodeId) -> bool {
    self.nodes.contains_key(id) && !self.nodes[id].removed
  }

  pub fn is_live_edge(&self, id: EdgeId) -> bool {
    self.edges.contains_key(id)
  }

  /// Debug-only structural invariant check: no removed endpoints appear in
  /// any live adjacency list, and `2 * edge_count == sum(node.edges.len())`.
  #[cfg(debug_assertions)]
  pub fn validate(&self) {
    let mut adjacency_total = 0usize;
    for (_, node) in self.nodes.iter() {
      if node.removed {
        assert!(node.edges.is_empty(), "a removed node must have no adjacency");
        continue;
      }
      adjacency_total += node.edges.len();
      for &e in &node.edges {
        let edge = &self.edges[e];
        assert!(!self.nodes[edge.a].removed, "live node adjacency references a removed endpoint");
        assert!(!self.nodes[edge.b].removed, "live node adjacency references a removed endpoint");
      }
    }
    assert_eq!(adjacency_total, 2 * self.edges.len(), "adjacency accounting mismatch");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn add_edge_links_both_adjacencies() {
    let mut g = Graph::new();
    let a = g.add_node(DVec3::ZERO, DVec3::X);
    let b = g.add_node(DVec3::Y, DVec3::X);
    let e = g.add_edge(a, b);
    assert!(a.edges(&g).contains(&e));
    assert!(b.edges(&g).contains(&e));
    assert_eq!(e.a(&g), a);
    assert_eq!(e.b(&g), b);
  }

  #[test]
  fn compact_removes_tombstoned_nodes_and_their_edges() {
    let mut g = Graph::new();
    let a = g.add_node(DVec3::ZERO, DVec3::X);
    let b = g.add_node(DVec3::Y, DVec3::X);
    g.add_edge(a, b);
    g.detach_edge_from_node(b, a.edges(&g)[0]);
    a.mark_removed(&mut g);
    g.compact();
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.edge_count(), 0);
  }

  #[test]
  #[cfg(debug_assertions)]
  fn validate_passes_on_a_healthy_triangle() {
    let mut g = Graph::new();
    let a = g.add_node(DVec3::new(0.0, 0.0, 1.0), DVec3::X);
    let b = g.add_node(DVec3::new(1.0, 0.0, 1.0), DVec3::X);
    let c = g.add_node(DVec3::new(0.0, 1.0, 1.0), DVec3::X);
    g.add_edge(a, b);
    g.add_edge(b, c);
    g.add_edge(c, a);
    g.validate();
  }
}
