//! The implicit-volume and mesh-sink interfaces the engine consumes.
//!
//! Neither trait is implemented by this crate for production use; see
//! [`crate::samplers`] for bare fixtures used by tests and benchmarks.

use glam::DVec3;

/// A scalar field sampled by the advancing front. `value_at(p) >= 0.0` is
/// read as solid, `< 0.0` as air. The field need not be an exact signed
/// distance, but it must be continuous and locally monotone across the
/// zero set for [`crate::probe`] to converge.
pub trait Volume {
  /// Sample the field at a point.
  fn value_at(&self, p: DVec3) -> f64;

  /// Fill in per-point hints used to drive local resolution and to attach
  /// opaque payload data to the mesh the caller is building. The default
  /// implementation leaves `data` untouched, which keeps `edge_len` at
  /// whatever the caller seeded it with.
  #[allow(unused_variables)]
  fn data_at(&self, p: DVec3, data: &mut VolumeData) {}
}

/// Per-query output of [`Volume::data_at`].
///
/// `edge_len` is a local resolution hint: the advancing front overwrites its
/// running edge length with this value on every step when adaptive
/// resolution is enabled (see `AdvancingFrontConfig::with_resolution`).
/// `custom_data` is an opaque payload (e.g. a material id) a [`MeshSink`]
/// may want attached to the emitted triangle.
#[derive(Debug, Default)]
pub struct VolumeData {
  pub edge_len: f64,
  pub custom_data: Option<Box<dyn std::any::Any + Send + Sync>>,
}

impl VolumeData {
  pub fn with_edge_len(edge_len: f64) -> Self {
    Self {
      edge_len,
      custom_data: None,
    }
  }
}

/// Receives notifications as the advancing front grows the mesh. All
/// methods are optional no-ops so a caller implements only the hooks it
/// needs.
///
/// Sinks are called synchronously from the step loop and must not call back
/// into the front that is driving them.
pub trait MeshSink {
  /// A new triangle `(a, b, c)` was emitted, with the volume data sampled
  /// at its test point.
  #[allow(unused_variables)]
  fn on_add_triangle(&mut self, a: DVec3, b: DVec3, c: DVec3, data: &VolumeData) {}

  /// A new front edge `(a, b)` was created.
  #[allow(unused_variables)]
  fn on_add_edge(&mut self, a: DVec3, b: DVec3) {}

  /// A node at `pos` was permanently removed from the mesh.
  #[allow(unused_variables)]
  fn on_remove_node(&mut self, pos: DVec3) {}

  /// A tangential surface-follow attempt failed; incremented once per
  /// failure for host-side diagnostics.
  fn inc_follow_surface_fails(&mut self) {}
}

/// A no-op sink, useful when a caller only wants the final mesh queried out
/// of [`crate::surface_memory::SurfaceMemory`] directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MeshSink for NullSink {}

/// Fans notifications out to every sink in the collection, in order.
pub struct CompositeSink<S> {
  pub sinks: Vec<S>,
}

impl<S> CompositeSink<S> {
  pub fn new(sinks: Vec<S>) -> Self {
    Self { sinks }
  }
}

impl<S: MeshSink> MeshSink for CompositeSink<S> {
  fn on_add_triangle(&mut self, a: DVec3, b: DVec3, c: DVec3, data: &VolumeData) {
    for sink in &mut self.sinks {
      sink.on_add_triangle(a, b, c, data);
    }
  }

  fn on_add_edge(&mut self, a: DVec3, b: DVec3) {
    for sink in &mut self.sinks {
      sink.on_add_edge(a, b);
    }
  }

  fn on_remove_node(&mut self, pos: DVec3) {
    for sink in &mut self.sinks {
      sink.on_remove_node(pos);
    }
  }

  fn inc_follow_surface_fails(&mut self) {
    for sink in &mut self.sinks {
      sink.inc_follow_surface_fails();
    }
  }
}

#[cfg(test)]
#[path = "volume_test.rs"]
mod volume_test;
