use approx::assert_relative_eq;

use super::*;

struct Sphere {
  radius: f64,
}

impl Volume for Sphere {
  fn value_at(&self, p: DVec3) -> f64 {
    self.radius - p.length()
  }
}

struct Cube {
  half_extent: f64,
}

impl Volume for Cube {
  fn value_at(&self, p: DVec3) -> f64 {
    let d = p.abs() - DVec3::splat(self.half_extent);
    let outside = d.max(DVec3::ZERO).length();
    let inside = d.x.max(d.y).max(d.z).min(0.0);
    -(outside + inside)
  }
}

#[test]
fn find_surface_along_ray_converges_on_sphere() {
  let sphere = Sphere { radius: 5.0 };
  let start = DVec3::new(10.0, 0.0, 0.0);
  let dir = DVec3::new(-1.0, 0.0, 0.0);
  let p = find_surface_along_ray(&sphere, start, dir, 1e-4).expect("should converge");
  assert_relative_eq!(p.length(), sphere.radius, epsilon = 1e-3);
}

#[test]
fn find_surface_along_ray_fails_when_ray_misses() {
  let sphere = Sphere { radius: 1.0 };
  // Starting on the surface already and marching parallel to it never
  // finds a smaller |value|, so convergence to a tight tolerance fails.
  let start = DVec3::new(100.0, 100.0, 100.0);
  let dir = DVec3::new(0.0, 0.0, 1.0);
  let got = find_surface_along_ray(&sphere, start, dir, 1e-9);
  // far outside, a single direction may or may not bracket the surface
  // within the iteration budget; just assert it doesn't panic and, if it
  // returns, the tolerance is honored.
  if let Some(p) = got {
    assert!((p.length() - sphere.radius).abs() <= 1e-9 + 1e-6);
  }
}

#[test]
fn calc_normal_points_outward_on_sphere() {
  let sphere = Sphere { radius: 5.0 };
  let p = DVec3::new(5.0, 0.0, 0.0);
  let n = calc_normal(&sphere, p, 1.0).expect("normal should exist");
  assert!(n.dot(DVec3::X) > 0.9);
}

#[test]
fn calc_normal_on_cube_face_points_along_axis() {
  let cube = Cube { half_extent: 2.0 };
  let p = DVec3::new(2.0, 0.0, 0.0);
  let n = calc_normal(&cube, p, 0.5).expect("normal should exist");
  assert!(n.dot(DVec3::X) > 0.99, "normal {n:?} should align with +X");
}

#[test]
fn in_air_matches_sign_convention() {
  assert!(in_air(-0.1));
  assert!(!in_air(0.0));
  assert!(!in_air(0.1));
}

#[test]
fn follow_surface_stays_on_sphere() {
  let sphere = Sphere { radius: 5.0 };
  let start = DVec3::new(5.0, 0.0, 0.0);
  let tangent = DVec3::Y;
  let step = 0.1;
  let travel = 1.0;
  let end = follow_surface(&sphere, start, tangent, step, travel, 1.0).expect("follow should succeed");
  assert!((end.length() - sphere.radius).abs() < 0.05);
  assert!(end.distance(start) > 0.0);
}

#[test]
fn find_random_surface_pos_returns_first_hit() {
  let sphere = Sphere { radius: 3.0 };
  let dirs = [DVec3::X, DVec3::Y, DVec3::Z];
  let p = find_random_surface_pos(&sphere, dirs, 1e-3).expect("should find a surface point");
  assert!((p.length() - sphere.radius).abs() < 1e-2);
}

#[test]
fn find_solid_short_circuits_when_already_solid() {
  let sphere = Sphere { radius: 5.0 };
  let p = DVec3::ZERO;
  assert_eq!(find_solid(&sphere, p, 0.5, 20.0), Some(p));
}

#[test]
fn find_air_short_circuits_when_already_air() {
  let sphere = Sphere { radius: 5.0 };
  let p = DVec3::new(100.0, 0.0, 0.0);
  assert_eq!(find_air(&sphere, p, 0.5, 20.0), Some(p));
}

#[test]
fn is_blocked_is_true_whenever_from_is_solid() {
  let sphere = Sphere { radius: 5.0 };
  let inside = DVec3::ZERO;
  // `from` is solid, so this is blocked regardless of `to`.
  assert!(is_blocked(&sphere, inside, DVec3::new(100.0, 0.0, 0.0), 0.5));
  assert!(is_blocked(&sphere, inside, DVec3::new(1.0, 0.0, 0.0), 0.5));
}

#[test]
fn is_blocked_detects_crossing_from_air() {
  let sphere = Sphere { radius: 5.0 };
  let outside = DVec3::new(100.0, 0.0, 0.0);
  let far_outside = DVec3::new(200.0, 0.0, 0.0);
  assert!(is_blocked(&sphere, outside, DVec3::ZERO, 0.5), "segment passes through the solid sphere");
  assert!(!is_blocked(&sphere, outside, far_outside, 0.5), "segment stays entirely in air");
}

#[test]
fn find_surface_on_axis_aligned_cube_lands_near_the_face() {
  let cube = Cube { half_extent: 2.0 };
  for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
    for sign in [1.0, -1.0] {
      let p = axis * sign * 2.0;
      let hit = find_surface(&cube, p, 0.01, 10.0).expect("should find the cube face");
      let face_distance = cube.value_at(hit).abs();
      assert!(face_distance < 0.011, "hit {hit:?} is {face_distance} away from the face");
    }
  }
}

#[test]
fn find_surface_snaps_from_random_directions_on_a_noisy_sphere() {
  struct NoisySphere {
    radius: f64,
  }
  impl Volume for NoisySphere {
    fn value_at(&self, p: DVec3) -> f64 {
      let bump = 0.05 * (p.x * 3.1 + p.y * 5.7 + p.z * 7.3).sin();
      self.radius + bump - p.length()
    }
  }

  let sphere = NoisySphere { radius: 5.0 };
  let mut successes = 0;
  let mut total = 0;
  // Deterministic Fibonacci-sphere sweep of directions, rather than
  // pulling in an RNG dependency for a single test.
  let golden_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
  for i in 0..200 {
    let t = (i as f64 + 0.5) / 200.0;
    let phi = (1.0 - 2.0 * t).acos();
    let theta = golden_angle * i as f64;
    let dir = DVec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
    let start = dir * (sphere.radius * 10.0);
    total += 1;
    if find_surface(&sphere, start, 0.5, sphere.radius * 10.0).is_some() {
      successes += 1;
    }
  }

  let rate = successes as f64 / total as f64;
  assert!(rate >= 0.99, "expected >=99% snap success, got {successes}/{total}");
}
