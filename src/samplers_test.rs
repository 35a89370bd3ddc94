use super::*;

#[test]
fn sphere_is_solid_inside_and_air_outside() {
  let sphere = Sphere::new(5.0);
  assert!(sphere.value_at(DVec3::ZERO) > 0.0);
  assert!(sphere.value_at(DVec3::new(100.0, 0.0, 0.0)) < 0.0);
  assert!(sphere.value_at(DVec3::new(5.0, 0.0, 0.0)).abs() < 1e-9);
}

#[test]
fn sphere_with_center_shifts_the_solid_region() {
  let sphere = Sphere::new(1.0).with_center(DVec3::new(10.0, 0.0, 0.0));
  assert!(sphere.value_at(DVec3::new(10.0, 0.0, 0.0)) > 0.0);
  assert!(sphere.value_at(DVec3::ZERO) < 0.0);
}

#[test]
fn axis_box_is_solid_inside_and_air_outside() {
  let b = AxisBox::new(DVec3::splat(2.0));
  assert!(b.value_at(DVec3::ZERO) > 0.0);
  assert!(b.value_at(DVec3::new(10.0, 0.0, 0.0)) < 0.0);
}
