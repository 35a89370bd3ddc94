use super::*;
use crate::volume::NullSink;

fn mem() -> SurfaceMemory<NullSink> {
  SurfaceMemory::new(10.0, NullSink)
}

#[test]
fn push_new_edge_links_both_nodes_and_enqueues_front() {
  let mut m = mem();
  let a = m.add_node(DVec3::ZERO, DVec3::X);
  let b = m.add_node(DVec3::Y, DVec3::X);
  let e = m.push_new_edge(a, b);

  assert_eq!(m.front_len(), 1);
  assert_eq!(m.pop_edge(), Some(e));
  assert_eq!(m.front_len(), 0);
}

#[test]
fn collapse_lone_node_removes_it_with_no_edges() {
  let mut m = mem();
  let a = m.add_node(DVec3::ZERO, DVec3::X);
  m.collapse_node(a);
  assert!(a.is_removed(m.graph()));
  m.delete_removed();
  assert_eq!(m.node_count(), 0);
  m.validate();
}

#[test]
fn collapse_one_end_of_an_edge_removes_both_sides_edge() {
  let mut m = mem();
  let a = m.add_node(DVec3::new(0.0, 0.0, 0.0), DVec3::X);
  let b = m.add_node(DVec3::new(1.0, 0.0, 0.0), DVec3::X);
  m.push_new_edge(a, b);

  m.collapse_node(a);
  assert!(a.is_removed(m.graph()));
  // b loses its only edge and had no other connections, so it cascades.
  assert!(b.is_removed(m.graph()));

  m.delete_removed();
  assert_eq!(m.node_count(), 0);
  assert_eq!(m.edge_count(), 0);
  m.validate();
}

#[test]
fn collapse_t_joint_removes_center_and_isolated_arms() {
  // center -- left, center -- right: a "T" with two arms and no base edge.
  let mut m = mem();
  let center = m.add_node(DVec3::new(0.0, 0.0, 0.0), DVec3::X);
  let left = m.add_node(DVec3::new(-1.0, 0.0, 0.0), DVec3::X);
  let right = m.add_node(DVec3::new(1.0, 0.0, 0.0), DVec3::X);
  m.push_new_edge(center, left);
  m.push_new_edge(center, right);

  m.collapse_node(center);
  assert!(center.is_removed(m.graph()));
  // left and right each lose their only edge, so both cascade away too.
  assert!(left.is_removed(m.graph()));
  assert!(right.is_removed(m.graph()));

  m.delete_removed();
  assert_eq!(m.node_count(), 0);
  m.validate();
}

#[test]
fn collapse_triangle_apex_leaves_the_base_edge_on_the_front() {
  let mut m = mem();
  let apex = m.add_node(DVec3::new(0.0, 0.0, 1.0), DVec3::X);
  let left = m.add_node(DVec3::new(-1.0, 0.0, 0.0), DVec3::X);
  let right = m.add_node(DVec3::new(1.0, 0.0, 0.0), DVec3::X);
  let apex_left = m.push_new_edge(apex, left);
  let apex_right = m.push_new_edge(apex, right);
  let base = m.push_new_edge(left, right);
  // Pretend the triangle is already fully closed: mark every edge used.
  apex_left.mark_used(&mut m.graph);
  apex_right.mark_used(&mut m.graph);
  base.mark_used(&mut m.graph);
  m.front.clear();

  m.collapse_node(apex);

  assert!(apex.is_removed(m.graph()));
  assert!(!left.is_removed(m.graph()));
  assert!(!right.is_removed(m.graph()));
  // the base edge reconnects left and right once the apex is gone, and it
  // should be back on the front to be re-triangulated.
  assert_eq!(m.front_len(), 1);
  assert_eq!(m.pop_edge(), Some(base));

  m.delete_removed();
  assert_eq!(m.node_count(), 2);
  assert_eq!(m.edge_count(), 1);
  m.validate();
}

#[test]
fn collapse_fan_apex_with_back_edge_reenqueues_the_back_edge() {
  // A fan of 3 triangles sharing `apex`, with rim nodes r0..r3 and a
  // "back edge" r0-r3 that closes the fan into a partial cone.
  let mut m = mem();
  let apex = m.add_node(DVec3::new(0.0, 0.0, 2.0), DVec3::X);
  let r0 = m.add_node(DVec3::new(1.0, 0.0, 0.0), DVec3::X);
  let r1 = m.add_node(DVec3::new(0.0, 1.0, 0.0), DVec3::X);
  let r2 = m.add_node(DVec3::new(-1.0, 0.0, 0.0), DVec3::X);
  let r3 = m.add_node(DVec3::new(0.0, -1.0, 0.0), DVec3::X);

  let spokes = [
    m.push_new_edge(apex, r0),
    m.push_new_edge(apex, r1),
    m.push_new_edge(apex, r2),
    m.push_new_edge(apex, r3),
  ];
  let rim = [m.push_new_edge(r0, r1), m.push_new_edge(r1, r2), m.push_new_edge(r2, r3)];
  let back_edge = m.push_new_edge(r3, r0);

  for &e in spokes.iter().chain(rim.iter()).chain([&back_edge]) {
    e.mark_used(&mut m.graph);
  }
  m.front.clear();

  m.collapse_node(apex);

  assert!(apex.is_removed(m.graph()));
  for rim_node in [r0, r1, r2, r3] {
    assert!(!rim_node.is_removed(m.graph()), "rim nodes still have rim edges, they must survive");
  }
  // back_edge connects r3 and r0, both of which remain adjacent to each
  // other via a spoke-sharing neighbor through the collapsed apex, so it
  // is expected back on the front alongside the rim edges that lost a
  // triangle.
  assert!(m.front_len() >= 1);

  m.delete_removed();
  assert_eq!(m.node_count(), 4);
  m.validate();
}
