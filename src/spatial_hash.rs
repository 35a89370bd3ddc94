//! A generic 3D point spatial hash, keyed by cell coordinate.
//!
//! Consumed by [`crate::surface_memory::SurfaceMemory`] with `T = NodeId`,
//! but it has no dependency on the graph module and can hold any small
//! `Copy` value. Cells are dropped from the map as soon as they empty out,
//! so an unbounded sequence of inserts/removes does not leak empty
//! buckets.

use glam::DVec3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

type Cell = (i64, i64, i64);

fn cell_of(p: DVec3, cell_size: f64) -> Cell {
  (
    (p.x / cell_size).floor() as i64,
    (p.y / cell_size).floor() as i64,
    (p.z / cell_size).floor() as i64,
  )
}

/// A point-keyed spatial hash over values of type `T`.
pub struct PointSpatialHash<T> {
  cell_size: f64,
  cells: FxHashMap<Cell, SmallVec<[(T, DVec3); 4]>>,
}

impl<T: Copy + PartialEq> PointSpatialHash<T> {
  pub fn new(cell_size: f64) -> Self {
    debug_assert!(cell_size > 0.0, "cell_size must be positive");
    Self {
      cell_size,
      cells: FxHashMap::default(),
    }
  }

  pub fn len(&self) -> usize {
    self.cells.values().map(|v| v.len()).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn add(&mut self, value: T, pos: DVec3) {
    self.cells.entry(cell_of(pos, self.cell_size)).or_default().push((value, pos));
  }

  /// Removes one occurrence of `value` at `pos`. No-op if absent. Drops
  /// the cell bucket entirely once it empties.
  pub fn remove(&mut self, value: T, pos: DVec3) {
    let cell = cell_of(pos, self.cell_size);
    if let Some(bucket) = self.cells.get_mut(&cell) {
      if let Some(idx) = bucket.iter().position(|&(v, _)| v == value) {
        bucket.swap_remove(idx);
      }
      if bucket.is_empty() {
        self.cells.remove(&cell);
      }
    }
  }

  pub fn has_value(&self, value: T, pos: DVec3) -> bool {
    let cell = cell_of(pos, self.cell_size);
    self
      .cells
      .get(&cell)
      .map(|bucket| bucket.iter().any(|&(v, _)| v == value))
      .unwrap_or(false)
  }

  /// Every value within `radius` of `center`, examined only in the cells
  /// the query box touches.
  pub fn radial_query(&self, center: DVec3, radius: f64) -> Vec<T> {
    let mut out = Vec::new();
    self.for_each_value_within(center, radius, |v, _| out.push(v));
    out
  }

  /// Same as [`Self::radial_query`] but avoids allocating a result vector
  /// when the caller just wants to act on each hit.
  pub fn for_each_value_within(&self, center: DVec3, radius: f64, mut f: impl FnMut(T, DVec3)) {
    let r2 = radius * radius;
    let min_cell = cell_of(center - DVec3::splat(radius), self.cell_size);
    let max_cell = cell_of(center + DVec3::splat(radius), self.cell_size);

    for cx in min_cell.0..=max_cell.0 {
      for cy in min_cell.1..=max_cell.1 {
        for cz in min_cell.2..=max_cell.2 {
          if let Some(bucket) = self.cells.get(&(cx, cy, cz)) {
            for &(value, pos) in bucket {
              if pos.distance_squared(center) <= r2 {
                f(value, pos);
              }
            }
          }
        }
      }
    }
  }

  pub fn for_each_value(&self, mut f: impl FnMut(T, DVec3)) {
    for bucket in self.cells.values() {
      for &(value, pos) in bucket {
        f(value, pos);
      }
    }
  }

  pub fn for_each_cell(&self, mut f: impl FnMut(&[(T, DVec3)])) {
    for bucket in self.cells.values() {
      f(bucket);
    }
  }
}

#[cfg(test)]
#[path = "spatial_hash_test.rs"]
mod spatial_hash_test;
