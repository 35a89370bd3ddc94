//! Configuration for an [`crate::advancing_front::AdvancingFront`] session.

use crate::constants::DEFAULT_ERROR_MARGIN_SCALE;

/// Builder-style configuration, following the `with_*` chaining convention
/// used throughout this crate's ambient config types.
#[derive(Clone, Copy, Debug)]
pub struct AdvancingFrontConfig {
  pub(crate) edge_len: f64,
  pub(crate) creation_radius: f64,
  pub(crate) error_margin_scale: f64,
  pub(crate) use_resolution: bool,
}

impl AdvancingFrontConfig {
  /// `edge_len` is the default/initial local edge length; `creation_radius`
  /// bounds how far from the generation center the front is allowed to
  /// grow before an edge is deferred. Both panic if not positive.
  pub fn new(edge_len: f64, creation_radius: f64) -> Self {
    assert!(edge_len > 0.0, "edge_len must be positive");
    assert!(creation_radius > 0.0, "creation_radius must be positive");
    Self {
      edge_len,
      creation_radius,
      error_margin_scale: DEFAULT_ERROR_MARGIN_SCALE,
      use_resolution: true,
    }
  }

  pub fn with_error_margin_scale(mut self, scale: f64) -> Self {
    assert!(scale > 0.0, "error_margin_scale must be positive");
    self.error_margin_scale = scale;
    self
  }

  /// When `false`, the running edge length stays fixed at `edge_len`
  /// instead of being overwritten by the volume's per-point `edge_len`
  /// hint on every step.
  pub fn with_resolution(mut self, use_resolution: bool) -> Self {
    self.use_resolution = use_resolution;
    self
  }

  pub fn edge_len(&self) -> f64 {
    self.edge_len
  }

  pub fn creation_radius(&self) -> f64 {
    self.creation_radius
  }

  pub fn error_margin_scale(&self) -> f64 {
    self.error_margin_scale
  }

  pub fn use_resolution(&self) -> bool {
    self.use_resolution
  }
}

impl Default for AdvancingFrontConfig {
  fn default() -> Self {
    Self::new(1.0, 10.0)
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
