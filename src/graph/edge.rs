//! Edge storage and the [`EdgeId`] handle.

use slotmap::new_key_type;

use super::{node::NodeId, Graph};

new_key_type! {
  /// A generational handle to a live or tombstoned edge.
  pub struct EdgeId;
}

/// A front/mesh edge between two distinct nodes, with a used/unused bit:
/// unused means "currently on the front", used means "not currently
/// enqueued" (it may return to the front later via [`EdgeId::reuse`]).
#[derive(Clone, Copy, Debug)]
pub struct Edge {
  pub(crate) a: NodeId,
  pub(crate) b: NodeId,
  pub(crate) used: bool,
}

impl Edge {
  pub(crate) fn new(a: NodeId, b: NodeId) -> Self {
    debug_assert_ne!(a, b, "an edge must connect two distinct nodes");
    Self { a, b, used: false }
  }

  pub(crate) fn has_node(&self, n: NodeId) -> bool {
    self.a == n || self.b == n
  }
}

impl EdgeId {
  pub fn a(self, graph: &Graph) -> NodeId {
    graph.edges[self].a
  }

  pub fn b(self, graph: &Graph) -> NodeId {
    graph.edges[self].b
  }

  pub fn is_used(self, graph: &Graph) -> bool {
    graph.edges[self].used
  }

  pub fn has_node(self, graph: &Graph, n: NodeId) -> bool {
    graph.edges[self].has_node(n)
  }

  /// Marks the edge used. Idempotent.
  pub fn mark_used(self, graph: &mut Graph) {
    graph.edges[self].used = true;
  }

  /// Marks a *used* edge unused again so it can be pushed back onto the
  /// front. Calling this on an edge that is already unused is a
  /// precondition violation in the original and is asserted here too.
  pub fn reuse(self, graph: &mut Graph) {
    let edge = &mut graph.edges[self];
    debug_assert!(edge.used, "reuse() called on an edge that was never marked used");
    edge.used = false;
  }

  /// The node shared between `self` and `other`, if the two edges share
  /// exactly one endpoint.
  pub fn common_node(self, graph: &Graph, other: EdgeId) -> Option<NodeId> {
    let (sa, sb) = (self.a(graph), self.b(graph));
    let (oa, ob) = (other.a(graph), other.b(graph));
    if sa == oa || sa == ob {
      Some(sa)
    } else if sb == oa || sb == ob {
      Some(sb)
    } else {
      None
    }
  }

  /// The endpoint of `self` that is not `n`. Panics if `n` is not an
  /// endpoint of `self`, matching the original's asserting accessor.
  pub fn other(self, graph: &Graph, n: NodeId) -> NodeId {
    let edge = &graph.edges[self];
    if edge.a == n {
      edge.b
    } else if edge.b == n {
      edge.a
    } else {
      panic!("other() called with a node that is not an endpoint of this edge");
    }
  }
}

#[cfg(test)]
#[path = "edge_test.rs"]
mod edge_test;
