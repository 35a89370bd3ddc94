//! Bare implicit-volume fixtures for tests and benchmarks.
//!
//! These are deliberately not the compositional volume algebra (no union,
//! difference, noise, transforms) — just the couple of simple, easy-to-
//! verify-by-hand shapes a meshing test needs.

use glam::DVec3;

use crate::volume::Volume;

/// A sphere of `radius` centered at `center`. `value_at` is an exact
/// signed distance: positive inside, negative outside.
#[derive(Clone, Copy, Debug)]
pub struct Sphere {
  pub center: DVec3,
  pub radius: f64,
}

impl Sphere {
  pub fn new(radius: f64) -> Self {
    Self {
      center: DVec3::ZERO,
      radius,
    }
  }

  pub fn with_center(mut self, center: DVec3) -> Self {
    self.center = center;
    self
  }
}

impl Volume for Sphere {
  fn value_at(&self, p: DVec3) -> f64 {
    self.radius - p.distance(self.center)
  }
}

/// An axis-aligned box centered at `center` with the given `half_extents`.
/// `value_at` is an exact signed distance.
#[derive(Clone, Copy, Debug)]
pub struct AxisBox {
  pub center: DVec3,
  pub half_extents: DVec3,
}

impl AxisBox {
  pub fn new(half_extents: DVec3) -> Self {
    Self {
      center: DVec3::ZERO,
      half_extents,
    }
  }

  pub fn with_center(mut self, center: DVec3) -> Self {
    self.center = center;
    self
  }
}

impl Volume for AxisBox {
  fn value_at(&self, p: DVec3) -> f64 {
    let d = (p - self.center).abs() - self.half_extents;
    let outside = d.max(DVec3::ZERO).length();
    let inside = d.x.max(d.y).max(d.z).min(0.0);
    -(outside + inside)
  }
}

#[cfg(test)]
#[path = "samplers_test.rs"]
mod samplers_test;
