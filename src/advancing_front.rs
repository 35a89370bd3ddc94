//! The advancing-front engine: pops a front edge, probes the field, and
//! decides whether to close an existing hole, connect to an existing node,
//! or grow a brand-new triangle.

use glam::DVec3;
use smallvec::SmallVec;

use crate::config::AdvancingFrontConfig;
use crate::constants::min_angle_cos;
use crate::graph::{EdgeId, NodeId};
use crate::probe::{calc_normal, find_surface_along_ray, follow_surface};
use crate::surface_memory::SurfaceMemory;
use crate::volume::{MeshSink, Volume, VolumeData};

const SEED_TEST_AXES: [DVec3; 6] = [DVec3::X, DVec3::Y, DVec3::Z, DVec3::NEG_X, DVec3::NEG_Y, DVec3::NEG_Z];

/// Drives incremental triangulation of `V`'s zero level set, notifying `S`
/// as triangles and edges are created.
pub struct AdvancingFront<'v, V, S> {
  volume: &'v V,
  memory: SurfaceMemory<S>,
  config: AdvancingFrontConfig,
  edge_len: f64,
  total_steps: u64,
}

impl<'v, V: Volume, S: MeshSink> AdvancingFront<'v, V, S> {
  pub fn new(volume: &'v V, sink: S, config: AdvancingFrontConfig) -> Self {
    let edge_len = config.edge_len();
    let memory = SurfaceMemory::new(crate::constants::SPATIAL_HASH_CELL_SCALE * edge_len, sink);
    Self {
      volume,
      memory,
      config,
      edge_len,
      total_steps: 0,
    }
  }

  pub fn memory(&self) -> &SurfaceMemory<S> {
    &self.memory
  }

  pub fn memory_mut(&mut self) -> &mut SurfaceMemory<S> {
    &mut self.memory
  }

  pub fn config(&self) -> &AdvancingFrontConfig {
    &self.config
  }

  pub fn total_steps(&self) -> u64 {
    self.total_steps
  }

  /// `true` once the mesh is empty and the front is empty: a session that
  /// has never seeded, or one that has been fully collapsed.
  pub fn need_seed(&self) -> bool {
    self.memory.front_len() == 0 && self.memory.node_count() == 0
  }

  /// Snaps `p` onto the surface and creates the two-node starting edge. If
  /// a companion node cannot be found in any of the six axis directions,
  /// the first node is left in the mesh (matching the reference
  /// algorithm) and this returns `false`.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
  pub fn try_find_surface(&mut self, p: DVec3) -> bool {
    let tolerance = self.config.error_margin_scale() * self.edge_len;
    let tolerance = tolerance.max(1.0);
    let dir = p.try_normalize().unwrap_or(DVec3::X);

    let Some(snapped) = find_surface_along_ray(self.volume, p, dir, tolerance) else {
      return false;
    };

    if !self.memory.get_nodes(snapped, self.edge_len).is_empty() {
      return false;
    }

    let Some(normal_a) = calc_normal(self.volume, snapped, self.edge_len) else {
      return false;
    };

    let a = self.memory.add_node(snapped, normal_a);

    let step = self.config.error_margin_scale() * self.edge_len;
    let mut companion = None;
    for axis in SEED_TEST_AXES {
      let Some(perp) = normal_a.cross(axis).try_normalize() else {
        continue;
      };
      if let Some(p_b) = follow_surface(self.volume, snapped, perp, step, self.edge_len, self.edge_len) {
        companion = Some(p_b);
        break;
      }
    }

    let Some(p_b) = companion else {
      return false;
    };

    let Some(normal_b) = calc_normal(self.volume, p_b, self.edge_len) else {
      return false;
    };

    let b = self.memory.add_node(p_b, normal_b);
    self.memory.push_new_edge(a, b);
    true
  }

  /// Advances up to `n` front pops. Returns `true` if any edge made
  /// non-trivial progress (was popped, unused, and within the creation
  /// radius), which callers use to loop until quiescence.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
  pub fn step(&mut self, generate_pos: DVec3, n: u32) -> bool {
    let mut popped = 0u32;
    let mut progress = false;
    let mut stop_edge: Option<EdgeId> = None;
    let radius2 = self.config.creation_radius() * self.config.creation_radius();

    while popped < n {
      let Some(e) = self.memory.pop_edge() else {
        break;
      };

      if stop_edge == Some(e) {
        e.mark_used(self.memory.graph_mut());
        self.memory.defer_edge(e);
        break;
      }

      if e.is_used(self.memory.graph()) {
        continue;
      }

      let graph = self.memory.graph();
      debug_assert!(!e.a(graph).is_removed(graph), "front edge has a removed endpoint");
      debug_assert!(!e.b(graph).is_removed(graph), "front edge has a removed endpoint");

      e.mark_used(self.memory.graph_mut());
      popped += 1;
      self.total_steps += 1;

      let a_pos = e.a(self.memory.graph()).pos(self.memory.graph());
      if a_pos.distance_squared(generate_pos) >= radius2 {
        if stop_edge.is_none() {
          stop_edge = Some(e);
        }
        // still unused as far as the front is concerned: re-arm and send
        // it to the back of the queue rather than leaving it parked.
        self.memory.push_existing_edge(e);
        continue;
      }

      progress = true;

      let Some((test_point, data)) = self.calc_test_pos(e) else {
        self.memory.sink_mut().inc_follow_surface_fails();
        continue;
      };

      self.triangulate(e, test_point, &data);
    }

    progress
  }

  /// Convenience for draining the entire front from a single seed point.
  /// Seeds first if the session has not started yet.
  pub fn build_full_surface(&mut self, p: DVec3) -> bool {
    if self.need_seed() && !self.try_find_surface(p) {
      return false;
    }
    while self.step(p, u32::MAX) {}
    true
  }

  fn calc_test_pos(&mut self, e: EdgeId) -> Option<(DVec3, VolumeData)> {
    let graph = self.memory.graph();
    let pa = e.a(graph).pos(graph);
    let pb = e.b(graph).pos(graph);
    let mid = (pa + pb) * 0.5;

    let mut data = VolumeData::with_edge_len(self.config.edge_len());
    self.volume.data_at(mid, &mut data);
    if self.config.use_resolution() {
      self.edge_len = data.edge_len;
    }

    let dir = (pb - pa).try_normalize()?;
    let step = self.config.error_margin_scale() * self.edge_len;
    let travel = self.edge_len;
    let t = follow_surface(self.volume, mid, dir, step, travel, self.edge_len)?;
    Some((t, data))
  }

  fn triangulate(&mut self, e: EdgeId, t: DVec3, data: &VolumeData) {
    if let Some(c) = self.find_close_with(e, t) {
      self.close_triangle(e, c, data);
    } else if let Some(n) = self.find_node(e, t) {
      self.new_or_close_triangle(e, n, data);
    }
  }

  fn is_valid_triangle(&self, p0: DVec3, p1: DVec3, p2: DVec3) -> bool {
    let Some(face_normal) = (p1 - p0).cross(p2 - p0).try_normalize() else {
      return false;
    };
    let centroid = (p0 + p1 + p2) / 3.0;
    let Some(expected) = calc_normal(self.volume, centroid, self.edge_len) else {
      return false;
    };
    face_normal.dot(expected) > 0.0
  }

  fn find_close_with(&self, e: EdgeId, t: DVec3) -> Option<EdgeId> {
    let graph = self.memory.graph();
    let a = e.a(graph);
    let b = e.b(graph);
    let edge_len2 = self.edge_len * self.edge_len;
    let min_angle = min_angle_cos();

    let mut candidates: SmallVec<[EdgeId; 16]> = SmallVec::new();
    candidates.extend(a.edges(graph).iter().copied().filter(|&c| c != e));
    candidates.extend(b.edges(graph).iter().copied().filter(|&c| c != e));

    let mut best: Option<(EdgeId, f64)> = None;
    for c in candidates {
      let Some(common) = c.common_node(graph, e) else {
        continue;
      };
      let neighbor = c.other(graph, common);
      if neighbor.pos(graph).distance_squared(t) > edge_len2 {
        continue;
      }

      let other = e.other(graph, common);
      let v1 = (other.pos(graph) - common.pos(graph)).try_normalize();
      let v2 = (neighbor.pos(graph) - common.pos(graph)).try_normalize();
      let (Some(v1), Some(v2)) = (v1, v2) else {
        continue;
      };
      let alignment = v1.dot(v2);
      if alignment < min_angle {
        continue;
      }
      if !self.is_valid_triangle(a.pos(graph), neighbor.pos(graph), b.pos(graph)) {
        continue;
      }
      if best.map_or(true, |(_, best_alignment)| alignment > best_alignment) {
        best = Some((c, alignment));
      }
    }

    best.map(|(c, _)| c)
  }

  fn find_node(&mut self, e: EdgeId, t: DVec3) -> Option<NodeId> {
    let Some(normal) = calc_normal(self.volume, t, self.edge_len) else {
      return None;
    };

    let (a, b) = {
      let graph = self.memory.graph();
      (e.a(graph), e.b(graph))
    };

    let candidates = self.memory.get_nodes(t, self.edge_len);
    let mut closest: Option<NodeId> = None;
    let mut closest_d2 = self.edge_len * self.edge_len;
    let mut found_invalid = false;

    for n in candidates {
      if n == a || n == b {
        continue;
      }
      let graph = self.memory.graph();
      let d2 = n.pos(graph).distance_squared(t);
      if d2 > closest_d2 {
        continue;
      }
      if n.normal(graph).dot(normal) < 0.0 {
        continue;
      }
      let (pa, pb) = (a.pos(graph), b.pos(graph));
      if !self.is_valid_triangle(pa, n.pos(graph), pb) {
        found_invalid = true;
        continue;
      }
      closest_d2 = d2;
      closest = Some(n);
    }

    if let Some(n) = closest {
      return Some(n);
    }
    if found_invalid {
      return None;
    }

    let graph = self.memory.graph();
    if !self.is_valid_triangle(a.pos(graph), t, b.pos(graph)) {
      return None;
    }

    Some(self.memory.add_node(t, normal))
  }

  fn new_or_close_triangle(&mut self, e: EdgeId, n: NodeId, data: &VolumeData) {
    let graph = self.memory.graph();
    let a = e.a(graph);
    let b = e.b(graph);

    if let Some(c) = a.get_edge_to(graph, n) {
      self.close_triangle(e, c, data);
    } else if let Some(c) = b.get_edge_to(graph, n) {
      self.close_triangle(e, c, data);
    } else {
      self.new_triangle(e, n, data);
    }
  }

  fn new_triangle(&mut self, e: EdgeId, n: NodeId, data: &VolumeData) {
    let graph = self.memory.graph();
    let a = e.a(graph);
    let b = e.b(graph);
    let (pa, pn, pb) = (a.pos(graph), n.pos(graph), b.pos(graph));

    self.memory.push_new_edge(a, n);
    self.memory.push_new_edge(n, b);
    self.memory.sink_mut().on_add_triangle(pa, pn, pb, data);
  }

  fn close_triangle(&mut self, e: EdgeId, c: EdgeId, data: &VolumeData) {
    let graph = self.memory.graph();
    let a = e.a(graph);
    let b = e.b(graph);
    let common = c.common_node(graph, e).expect("close candidate must share a node with e");
    let n = c.other(graph, common);
    let other = e.other(graph, common);

    debug_assert!(
      count_shared_edges(graph, a, b, n) <= 2,
      "closing this triangle would give {n:?} more than two edges shared with the front edge's endpoints"
    );

    c.mark_used(self.memory.graph_mut());

    if let Some(existing) = other.get_edge_to(self.memory.graph(), n) {
      existing.mark_used(self.memory.graph_mut());
    } else if other == a {
      self.memory.push_new_edge(n, other);
    } else {
      self.memory.push_new_edge(other, n);
    }

    let graph = self.memory.graph();
    let (pa, pn, pb) = (a.pos(graph), n.pos(graph), b.pos(graph));
    self.memory.sink_mut().on_add_triangle(pa, pn, pb, data);
  }
}

fn count_shared_edges(graph: &crate::graph::Graph, a: NodeId, b: NodeId, n: NodeId) -> usize {
  a.has_edge_to(graph, n) as usize + b.has_edge_to(graph, n) as usize
}

#[cfg(test)]
#[path = "advancing_front_test.rs"]
mod advancing_front_test;
