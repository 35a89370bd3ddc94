//! Owns the node/edge graph, the front queue, and the spatial index over
//! live nodes, and mediates every mutation of the mesh under construction.
//!
//! This is the Rust analogue of the original's `surface_memory` class:
//! same two-phase removal split (`collapse_node` tombstones and cascades
//! re-enqueued front edges; `delete_removed` is the explicit compaction
//! sweep), same responsibility of being the only thing that touches the
//! spatial hash and the only thing that calls into the mesh sink.

use std::collections::VecDeque;

use glam::DVec3;
use smallvec::SmallVec;

use crate::graph::{EdgeId, Graph, NodeId};
use crate::spatial_hash::PointSpatialHash;
use crate::volume::MeshSink;

pub struct SurfaceMemory<S> {
  graph: Graph,
  front: VecDeque<EdgeId>,
  hash: PointSpatialHash<NodeId>,
  sink: S,
}

impl<S: MeshSink> SurfaceMemory<S> {
  pub fn new(cell_size: f64, sink: S) -> Self {
    Self {
      graph: Graph::new(),
      front: VecDeque::new(),
      hash: PointSpatialHash::new(cell_size),
      sink,
    }
  }

  pub fn graph(&self) -> &Graph {
    &self.graph
  }

  pub(crate) fn graph_mut(&mut self) -> &mut Graph {
    &mut self.graph
  }

  pub fn sink(&self) -> &S {
    &self.sink
  }

  pub fn sink_mut(&mut self) -> &mut S {
    &mut self.sink
  }

  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }

  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  pub fn front_len(&self) -> usize {
    self.front.len()
  }

  pub fn add_node(&mut self, pos: DVec3, normal: DVec3) -> NodeId {
    let id = self.graph.add_node(pos, normal);
    self.hash.add(id, pos);
    id
  }

  /// Links a brand-new edge between two distinct, not-yet-connected nodes
  /// and appends it to the front.
  pub fn push_new_edge(&mut self, a: NodeId, b: NodeId) -> EdgeId {
    let id = self.graph.add_edge(a, b);
    self.front.push_back(id);
    self.sink.on_add_edge(a.pos(&self.graph), b.pos(&self.graph));
    id
  }

  /// Re-arms a previously-used edge and appends it to the front.
  pub fn push_existing_edge(&mut self, edge: EdgeId) {
    edge.reuse(&mut self.graph);
    self.front.push_back(edge);
  }

  pub fn pop_edge(&mut self) -> Option<EdgeId> {
    self.front.pop_front()
  }

  /// Re-arms `edge` and pushes it back onto the tail of the front. Used to
  /// park the edge that closed a full front rotation under radius gating:
  /// marking it used first (by the caller) and then re-arming it here
  /// means it is not re-popped as part of the same rotation, but is back
  /// on the front, unused, for the next one.
  pub fn defer_edge(&mut self, edge: EdgeId) {
    self.push_existing_edge(edge);
  }

  pub fn get_nodes(&self, p: DVec3, r: f64) -> Vec<NodeId> {
    self.hash.radial_query(p, r)
  }

  /// Permanently removes a node: notifies the sink, drops it from the
  /// spatial hash, and tombstones it in the graph. The node's storage
  /// slot is not freed until [`Self::delete_removed`].
  pub fn remove_node(&mut self, n: NodeId) {
    if !self.graph.is_live_node(n) {
      return;
    }
    self.sink.on_remove_node(n.pos(&self.graph));
    self.hash.remove(n, n.pos(&self.graph));
    n.mark_removed(&mut self.graph);
  }

  /// Tombstones `n` and cascades: every edge incident to `n` is detached
  /// from its far endpoint; any already-used far edge that still connects
  /// back to `n` through a shared neighbor is re-armed (it lost a
  /// triangle and needs to be re-tried); a far endpoint left with no
  /// remaining edges is itself collapsed.
  pub fn collapse_node(&mut self, n: NodeId) {
    if !self.graph.is_live_node(n) {
      return;
    }

    let incident: SmallVec<[EdgeId; 8]> = n.edges(&self.graph).iter().copied().collect();
    for e in incident {
      if !self.graph.is_live_edge(e) {
        continue;
      }
      e.mark_used(&mut self.graph);
      let other = e.other(&self.graph, n);
      self.graph.detach_edge_from_node(other, e);

      let other_edges: SmallVec<[EdgeId; 8]> = other.edges(&self.graph).iter().copied().collect();
      for oe in other_edges {
        if oe.is_used(&self.graph) {
          let far = oe.other(&self.graph, other);
          if far == n || far.has_edge_to(&self.graph, n) {
            self.push_existing_edge(oe);
          }
        }
      }

      if other.edges(&self.graph).is_empty() {
        self.remove_node(other);
      }
    }

    self.remove_node(n);
  }

  /// Collapses every live node within `r` of `center`.
  pub fn collapse_nodes_inside(&mut self, center: DVec3, r: f64) {
    for n in self.get_nodes(center, r) {
      self.collapse_node(n);
    }
  }

  /// Collapses every live node farther than `r` from `center`, via a full
  /// traversal of the spatial hash. For large meshes prefer
  /// [`Self::collapse_node_cells_outside`].
  pub fn collapse_nodes_outside(&mut self, center: DVec3, r: f64) {
    let r2 = r * r;
    let mut to_collapse = Vec::new();
    self.hash.for_each_value(|n, pos| {
      if pos.distance_squared(center) > r2 {
        to_collapse.push(n);
      }
    });
    for n in to_collapse {
      self.collapse_node(n);
    }
  }

  /// Per-cell coarse variant of [`Self::collapse_nodes_outside`]: a cell
  /// is collapsed in its entirety if its first member lies outside `r`.
  /// Cheaper than a full node-by-node distance check at the cost of
  /// sometimes collapsing a node slightly inside `r` that happens to
  /// share a cell with one outside it.
  pub fn collapse_node_cells_outside(&mut self, center: DVec3, r: f64) {
    let r2 = r * r;
    let mut to_collapse = Vec::new();
    self.hash.for_each_cell(|bucket| {
      if let Some(&(_, rep_pos)) = bucket.first() {
        if rep_pos.distance_squared(center) > r2 {
          to_collapse.extend(bucket.iter().map(|&(n, _)| n));
        }
      }
    });
    for n in to_collapse {
      self.collapse_node(n);
    }
  }

  /// Physically compacts away every tombstoned node and edge: scrubs the
  /// front of any edge touching a removed endpoint, then frees the
  /// underlying graph storage.
  pub fn delete_removed(&mut self) {
    let graph = &self.graph;
    self.front.retain(|&e| {
      graph.is_live_edge(e) && !e.a(graph).is_removed(graph) && !e.b(graph).is_removed(graph)
    });
    self.graph.compact();
  }

  /// Debug-only structural invariant check across the front, the graph,
  /// and the spatial hash.
  #[cfg(debug_assertions)]
  pub fn validate(&self) {
    self.graph.validate();
    for &e in &self.front {
      assert!(self.graph.is_live_edge(e), "front references a dead edge");
      assert!(!e.a(&self.graph).is_removed(&self.graph), "front edge has a removed endpoint");
      assert!(!e.b(&self.graph).is_removed(&self.graph), "front edge has a removed endpoint");
    }
    assert_eq!(self.hash.len(), self.graph.live_node_count(), "spatial hash count diverged from live node count");
  }
}

#[cfg(test)]
#[path = "surface_memory_test.rs"]
mod surface_memory_test;
