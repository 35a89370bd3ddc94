//! Pure numerical utilities for probing an implicit [`Volume`].
//!
//! Nothing here holds state; every function takes the volume and whatever
//! points/directions it needs and returns an `Option` (empty on
//! non-convergence, per the error taxonomy the rest of the crate follows).

use glam::DVec3;

use crate::constants::{DEGENERATE_EPSILON_SQR, GRADIENT_OFFSET_SCALE, SNAP_ITERATIONS_COARSE, SNAP_ITERATIONS_FINE};
use crate::volume::Volume;

/// `true` iff `v` classifies as air under the crate-wide convention
/// (solid is `>= 0`).
#[inline]
pub fn in_air(v: f64) -> bool {
  v < 0.0
}

#[inline]
pub fn in_solid(v: f64) -> bool {
  !in_air(v)
}

/// Central-difference gradient (not normalized), at offset
/// `GRADIENT_OFFSET_SCALE * local_scale` along each axis.
fn gradient(volume: &impl Volume, p: DVec3, local_scale: f64) -> DVec3 {
  let d = GRADIENT_OFFSET_SCALE * local_scale;
  DVec3::new(
    volume.value_at(p - DVec3::X * d) - volume.value_at(p + DVec3::X * d),
    volume.value_at(p - DVec3::Y * d) - volume.value_at(p + DVec3::Y * d),
    volume.value_at(p - DVec3::Z * d) - volume.value_at(p + DVec3::Z * d),
  )
}

/// Estimate the outward unit normal at `p` via central differences at
/// offset `0.4 * local_scale`. Returns `None` if the gradient is too small
/// to normalize reliably.
pub fn calc_normal(volume: &impl Volume, p: DVec3, local_scale: f64) -> Option<DVec3> {
  let g = gradient(volume, p, local_scale);
  if g.length_squared() < DEGENERATE_EPSILON_SQR {
    return None;
  }
  Some(g.normalize())
}

/// Gradient normal at `p`, oriented consistently with the convention that
/// the caller passes `p_is_air` when the walk started from inside air
/// rather than solid — matching the sign flip used to orient a
/// surface-search direction.
pub fn calc_surface_dir(volume: &impl Volume, p: DVec3, local_scale: f64, p_is_air: bool) -> Option<DVec3> {
  let n = calc_normal(volume, p, local_scale)?;
  Some(if p_is_air { -n } else { n })
}

/// Internal fixed-point ray march: repeatedly step by `d * value_at(p) * m`,
/// halving `m` whenever the sign of the field flips between iterations, for
/// up to `max_tries` iterations. Returns the best point reached and the
/// `|value|` at that point.
fn find_surface_along_ray_internal(volume: &impl Volume, start: DVec3, d: DVec3, max_tries: u32) -> (DVec3, f64) {
  let mut p = start;
  let mut m = 1.0;
  let mut v = volume.value_at(p);
  let mut best_p = p;
  let mut best_abs_v = v.abs();

  for _ in 0..max_tries {
    let next_p = p + d * v * m;
    let next_v = volume.value_at(next_p);

    if next_v.signum() != v.signum() && next_v != 0.0 && v != 0.0 {
      m *= 0.5;
    }

    p = next_p;
    v = next_v;

    let abs_v = v.abs();
    if abs_v < best_abs_v {
      best_abs_v = abs_v;
      best_p = p;
    }
  }

  (best_p, best_abs_v)
}

/// Snap `start` onto the zero level set by marching along `d`, to within
/// `tolerance`. Runs a coarse 10-iteration pass, then (if that did not
/// reach `tolerance`) a refining 20-iteration pass from the best point
/// found so far, keeping whichever result is closer to the surface.
pub fn find_surface_along_ray(volume: &impl Volume, start: DVec3, d: DVec3, tolerance: f64) -> Option<DVec3> {
  let (coarse_p, coarse_abs_v) = find_surface_along_ray_internal(volume, start, d, SNAP_ITERATIONS_COARSE);
  if coarse_abs_v <= tolerance {
    return Some(coarse_p);
  }

  let (fine_p, fine_abs_v) = find_surface_along_ray_internal(volume, coarse_p, d, SNAP_ITERATIONS_FINE);
  let (best_p, best_abs_v) = if fine_abs_v < coarse_abs_v {
    (fine_p, fine_abs_v)
  } else {
    (coarse_p, coarse_abs_v)
  };

  if best_abs_v <= tolerance {
    Some(best_p)
  } else {
    None
  }
}

/// Walk from `pos` along `dir` in `step`-sized increments, up to `max_len`,
/// and return the first point whose air/solid classification differs from
/// `pos_in_air`. No refinement: the returned point sits wherever the
/// `step`-sized sample first crossed the transition.
fn find_surface_in_direction(volume: &impl Volume, pos: DVec3, dir: DVec3, pos_in_air: bool, step: f64, max_len: f64) -> Option<DVec3> {
  let mut s = step;
  while s <= max_len {
    let test_pos = pos + dir * s;
    if pos_in_air != in_air(volume.value_at(test_pos)) {
      return Some(test_pos);
    }
    s += step;
  }
  None
}

/// Search outward from `p` along its gradient-derived surface direction
/// (away from solid, toward solid from air) for a transition between air
/// and solid, up to `max_len`. Returns `None` if the gradient at `p` is too
/// degenerate to derive a direction.
pub fn find_surface(volume: &impl Volume, p: DVec3, step: f64, max_len: f64) -> Option<DVec3> {
  let air = in_air(volume.value_at(p));
  let dir = calc_surface_dir(volume, p, max_len, air)?;
  find_surface_in_direction(volume, p, dir, air, step, max_len)
}

/// If `p` is already solid, return it; otherwise search for the nearest
/// solid point within `max_len`.
pub fn find_solid(volume: &impl Volume, p: DVec3, step: f64, max_len: f64) -> Option<DVec3> {
  if in_solid(volume.value_at(p)) {
    return Some(p);
  }
  find_surface(volume, p, step, max_len)
}

/// If `p` is already air, return it; otherwise search for the nearest air
/// point within `max_len`.
pub fn find_air(volume: &impl Volume, p: DVec3, step: f64, max_len: f64) -> Option<DVec3> {
  if in_air(volume.value_at(p)) {
    return Some(p);
  }
  find_surface(volume, p, step, max_len)
}

/// `true` if `from` is already solid (a line of sight can never leave
/// solid ground), or if the straight segment from `from` to `to` crosses
/// into solid before reaching `to`.
pub fn is_blocked(volume: &impl Volume, from: DVec3, to: DVec3, step: f64) -> bool {
  if in_solid(volume.value_at(from)) {
    return true;
  }
  let delta = to - from;
  let len = delta.length();
  if len * len < DEGENERATE_EPSILON_SQR {
    return false;
  }
  let dir = delta / len;
  find_surface_in_direction(volume, from, dir, true, step, len).is_some()
}

/// Walk tangentially along `tangent` from a point already on the surface,
/// taking `(travel_len / step).floor()` micro-steps. At each micro-step,
/// advance along `tangent × normal` by `step`, then snap back onto the
/// surface. Returns the last surface point successfully reached, or `None`
/// if the very first micro-step fails.
pub fn follow_surface(
  volume: &impl Volume,
  start: DVec3,
  tangent: DVec3,
  step: f64,
  travel_len: f64,
  local_scale: f64,
) -> Option<DVec3> {
  let tangent = tangent.try_normalize()?;
  let micro_steps = (travel_len / step).floor() as u32;
  if micro_steps == 0 {
    return Some(start);
  }

  let mut current = start;
  let mut last_success = None;

  for _ in 0..micro_steps {
    let normal = calc_normal(volume, current, local_scale)?;
    let walk_dir = tangent.cross(normal).try_normalize();
    let Some(walk_dir) = walk_dir else {
      break;
    };
    let test_point = current + walk_dir * step;
    let snap_dir = calc_surface_dir(volume, test_point, local_scale, in_air(volume.value_at(test_point)));
    let Some(snap_dir) = snap_dir else {
      break;
    };
    match find_surface_along_ray(volume, test_point, snap_dir, step) {
      Some(snapped) => {
        current = snapped;
        last_success = Some(snapped);
      }
      None => break,
    }
  }

  last_success
}

/// Try a handful of random directions from the origin and return the first
/// one that snaps onto the surface. `unit_dirs` supplies the candidate
/// directions (already normalized); the caller owns the randomness source,
/// this function owns none.
pub fn find_random_surface_pos(volume: &impl Volume, unit_dirs: impl IntoIterator<Item = DVec3>, tolerance: f64) -> Option<DVec3> {
  for dir in unit_dirs {
    if let Some(p) = find_surface_along_ray(volume, DVec3::ZERO, dir, tolerance) {
      return Some(p);
    }
  }
  None
}

#[cfg(test)]
#[path = "probe_test.rs"]
mod probe_test;
