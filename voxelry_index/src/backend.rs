// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::boxed::Box;

use crate::types::Aabb3D;
use core::fmt::Debug;

/// Spatial backend abstraction used by `IndexGeneric`.
pub trait Backend<T: Copy + PartialOrd + Debug, P: Copy + Debug> {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb3D<T>);

    /// Update an existing slot's AABB.
    fn update(&mut self, slot: usize, aabb: Aabb3D<T>);

    /// Remove a slot from the spatial structure.
    fn remove(&mut self, slot: usize);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Query slots whose AABB contains the point.
    fn query_point<'a>(&'a self, x: T, y: T, z: T) -> Box<dyn Iterator<Item = usize> + 'a>;

    /// Query slots whose AABB intersects the box.
    fn query_box<'a>(&'a self, aabb: Aabb3D<T>) -> Box<dyn Iterator<Item = usize> + 'a>;
}
