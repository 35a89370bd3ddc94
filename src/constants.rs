//! Numeric constants shared by the surface-probe and advancing-front modules.
//!
//! These pin the exact tolerances and iteration counts the algorithm was
//! tuned against. Changing any of them changes the emitted mesh for a given
//! volume, so they are centralized here rather than inlined at call sites.

/// Number of fixed-point ray-marching iterations in the first, coarse pass
/// of [`crate::probe::find_surface_along_ray`].
pub const SNAP_ITERATIONS_COARSE: u32 = 10;

/// Number of fixed-point ray-marching iterations in the second, refining
/// pass, used only when the coarse pass did not reach the requested
/// tolerance.
pub const SNAP_ITERATIONS_FINE: u32 = 20;

/// Offset (as a multiple of the local edge length) used for the central
/// difference when estimating the gradient normal.
pub const GRADIENT_OFFSET_SCALE: f64 = 0.4;

/// Squared-length epsilon below which a gradient or direction vector is
/// treated as degenerate and normalization fails.
pub const DEGENERATE_EPSILON_SQR: f64 = 1.0e-12;

/// Default error-margin scale `κ` applied to the local edge length to derive
/// a snap tolerance and a tangential-follow step size.
pub const DEFAULT_ERROR_MARGIN_SCALE: f64 = 0.1;

/// Multiple of `ℓ₀` used as the cell size of the node spatial hash.
pub const SPATIAL_HASH_CELL_SCALE: f64 = 15.0;

/// `cos(93°)`: the minimum alignment score accepted when closing a triangle
/// against an existing edge. `f64::cos` is not `const fn` on stable, so this
/// is computed once rather than hand-transcribed.
#[inline]
pub fn min_angle_cos() -> f64 {
  93.0f64.to_radians().cos()
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
