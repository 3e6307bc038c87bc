// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backends. Provide cell-based spatial indexing for integer scalars.

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb3D;

/// Uniform grid backend for i32 coordinates.
///
/// Uses a fixed-size cell grid to accelerate queries. AABBs are mapped to the
/// cells they cover; queries aggregate the candidates of the touched cells.
/// Cell keys are computed in i64 so coordinates near the i32 extremes stay
/// well-defined.
pub struct GridI32<P: Copy + Debug> {
    cell_w: i32,
    cell_h: i32,
    cell_d: i32,
    origin_x: i32,
    origin_y: i32,
    origin_z: i32,
    entries: Vec<Option<Aabb3D<i32>>>,
    cells: Vec<(i64, i64, i64, Vec<usize>)>,
    _p: core::marker::PhantomData<P>,
}

impl<P: Copy + Debug> GridI32<P> {
    /// Create an integer grid with the given cell size and origin offset.
    ///
    /// Mapping uses Euclidean division (`div_euclid`) so negative coordinates
    /// snap consistently toward negative infinity.
    pub fn new(
        cell_w: i32,
        cell_h: i32,
        cell_d: i32,
        origin_x: i32,
        origin_y: i32,
        origin_z: i32,
    ) -> Self {
        assert!(
            cell_w > 0 && cell_h > 0 && cell_d > 0,
            "cell sizes must be positive"
        );
        Self {
            cell_w,
            cell_h,
            cell_d,
            origin_x,
            origin_y,
            origin_z,
            entries: Vec::new(),
            cells: Vec::new(),
            _p: core::marker::PhantomData,
        }
    }

    #[inline]
    fn key_for(&self, x: i32, y: i32, z: i32) -> (i64, i64, i64) {
        let cx = (i64::from(x) - i64::from(self.origin_x)).div_euclid(i64::from(self.cell_w));
        let cy = (i64::from(y) - i64::from(self.origin_y)).div_euclid(i64::from(self.cell_h));
        let cz = (i64::from(z) - i64::from(self.origin_z)).div_euclid(i64::from(self.cell_d));
        (cx, cy, cz)
    }

    fn cells_for_aabb(&self, a: &Aabb3D<i32>) -> Vec<(i64, i64, i64)> {
        let (minx, miny, minz) = self.key_for(a.min_x, a.min_y, a.min_z);
        let (maxx, maxy, maxz) = self.key_for(a.max_x, a.max_y, a.max_z);
        let mut out = Vec::new();
        for z in minz..=maxz {
            for y in miny..=maxy {
                for x in minx..=maxx {
                    out.push((x, y, z));
                }
            }
        }
        out
    }

    fn find_cell_mut(&mut self, key: (i64, i64, i64)) -> usize {
        if let Some((idx, _)) = self
            .cells
            .iter()
            .enumerate()
            .find(|(_, (cx, cy, cz, _))| (*cx, *cy, *cz) == key)
        {
            idx
        } else {
            self.cells.push((key.0, key.1, key.2, Vec::new()));
            self.cells.len() - 1
        }
    }

    fn remove_from_cells(&mut self, slot: usize) {
        for (_, _, _, slots) in &mut self.cells {
            if let Some(pos) = slots.iter().position(|&s| s == slot) {
                slots.swap_remove(pos);
            }
        }
    }
}

impl<P: Copy + Debug> Backend<i32, P> for GridI32<P> {
    fn insert(&mut self, slot: usize, aabb: Aabb3D<i32>) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some(aabb);
        for key in self.cells_for_aabb(&aabb) {
            let idx = self.find_cell_mut(key);
            self.cells[idx].3.push(slot);
        }
    }
    fn update(&mut self, slot: usize, aabb: Aabb3D<i32>) {
        self.remove_from_cells(slot);
        if let Some(e) = self.entries.get_mut(slot) {
            *e = Some(aabb);
            for key in self.cells_for_aabb(&aabb) {
                let idx = self.find_cell_mut(key);
                self.cells[idx].3.push(slot);
            }
        }
    }
    fn remove(&mut self, slot: usize) {
        self.remove_from_cells(slot);
        if let Some(e) = self.entries.get_mut(slot) {
            *e = None;
        }
    }
    fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
    }
    fn query_point<'a>(&'a self, x: i32, y: i32, z: i32) -> Box<dyn Iterator<Item = usize> + 'a> {
        let key = self.key_for(x, y, z);
        let mut set = BTreeSet::new();
        if let Some((_, _, _, slots)) = self
            .cells
            .iter()
            .find(|(cx, cy, cz, _)| (*cx, *cy, *cz) == key)
        {
            for &s in slots {
                set.insert(s);
            }
        }
        Box::new(set.into_iter())
    }
    fn query_box<'a>(&'a self, aabb: Aabb3D<i32>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut set = BTreeSet::new();
        for key in self.cells_for_aabb(&aabb) {
            if let Some((_, _, _, slots)) = self
                .cells
                .iter()
                .find(|(cx, cy, cz, _)| (*cx, *cy, *cz) == key)
            {
                for &s in slots {
                    set.insert(s);
                }
            }
        }
        Box::new(set.into_iter())
    }
}

impl<P: Copy + Debug> Debug for GridI32<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        let cells = self.cells.len();
        f.debug_struct("GridI32")
            .field("cell_w", &self.cell_w)
            .field("cell_h", &self.cell_h)
            .field("cell_d", &self.cell_d)
            .field("origin_x", &self.origin_x)
            .field("origin_y", &self.origin_y)
            .field("origin_z", &self.origin_z)
            .field("total_slots", &total)
            .field("alive", &alive)
            .field("cells", &cells)
            .finish_non_exhaustive()
    }
}

/// Uniform grid backend for i64 coordinates.
pub struct GridI64<P: Copy + Debug> {
    cell_w: i64,
    cell_h: i64,
    cell_d: i64,
    origin_x: i64,
    origin_y: i64,
    origin_z: i64,
    entries: Vec<Option<Aabb3D<i64>>>,
    cells: Vec<(i64, i64, i64, Vec<usize>)>,
    _p: core::marker::PhantomData<P>,
}

impl<P: Copy + Debug> GridI64<P> {
    /// Create an integer grid with the given cell size and origin offset.
    ///
    /// Mapping uses Euclidean division (`div_euclid`) so negative coordinates
    /// snap consistently toward negative infinity.
    pub fn new(
        cell_w: i64,
        cell_h: i64,
        cell_d: i64,
        origin_x: i64,
        origin_y: i64,
        origin_z: i64,
    ) -> Self {
        assert!(
            cell_w > 0 && cell_h > 0 && cell_d > 0,
            "cell sizes must be positive"
        );
        Self {
            cell_w,
            cell_h,
            cell_d,
            origin_x,
            origin_y,
            origin_z,
            entries: Vec::new(),
            cells: Vec::new(),
            _p: core::marker::PhantomData,
        }
    }

    #[inline]
    fn key_for(&self, x: i64, y: i64, z: i64) -> (i64, i64, i64) {
        let cx = (x - self.origin_x).div_euclid(self.cell_w);
        let cy = (y - self.origin_y).div_euclid(self.cell_h);
        let cz = (z - self.origin_z).div_euclid(self.cell_d);
        (cx, cy, cz)
    }

    fn cells_for_aabb(&self, a: &Aabb3D<i64>) -> Vec<(i64, i64, i64)> {
        let (minx, miny, minz) = self.key_for(a.min_x, a.min_y, a.min_z);
        let (maxx, maxy, maxz) = self.key_for(a.max_x, a.max_y, a.max_z);
        let mut out = Vec::new();
        for z in minz..=maxz {
            for y in miny..=maxy {
                for x in minx..=maxx {
                    out.push((x, y, z));
                }
            }
        }
        out
    }

    fn find_cell_mut(&mut self, key: (i64, i64, i64)) -> usize {
        if let Some((idx, _)) = self
            .cells
            .iter()
            .enumerate()
            .find(|(_, (cx, cy, cz, _))| (*cx, *cy, *cz) == key)
        {
            idx
        } else {
            self.cells.push((key.0, key.1, key.2, Vec::new()));
            self.cells.len() - 1
        }
    }

    fn remove_from_cells(&mut self, slot: usize) {
        for (_, _, _, slots) in &mut self.cells {
            if let Some(pos) = slots.iter().position(|&s| s == slot) {
                slots.swap_remove(pos);
            }
        }
    }
}

impl<P: Copy + Debug> Backend<i64, P> for GridI64<P> {
    fn insert(&mut self, slot: usize, aabb: Aabb3D<i64>) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some(aabb);
        for key in self.cells_for_aabb(&aabb) {
            let idx = self.find_cell_mut(key);
            self.cells[idx].3.push(slot);
        }
    }
    fn update(&mut self, slot: usize, aabb: Aabb3D<i64>) {
        self.remove_from_cells(slot);
        if let Some(e) = self.entries.get_mut(slot) {
            *e = Some(aabb);
            for key in self.cells_for_aabb(&aabb) {
                let idx = self.find_cell_mut(key);
                self.cells[idx].3.push(slot);
            }
        }
    }
    fn remove(&mut self, slot: usize) {
        self.remove_from_cells(slot);
        if let Some(e) = self.entries.get_mut(slot) {
            *e = None;
        }
    }
    fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
    }
    fn query_point<'a>(&'a self, x: i64, y: i64, z: i64) -> Box<dyn Iterator<Item = usize> + 'a> {
        let key = self.key_for(x, y, z);
        let mut set = BTreeSet::new();
        if let Some((_, _, _, slots)) = self
            .cells
            .iter()
            .find(|(cx, cy, cz, _)| (*cx, *cy, *cz) == key)
        {
            for &s in slots {
                set.insert(s);
            }
        }
        Box::new(set.into_iter())
    }
    fn query_box<'a>(&'a self, aabb: Aabb3D<i64>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut set = BTreeSet::new();
        for key in self.cells_for_aabb(&aabb) {
            if let Some((_, _, _, slots)) = self
                .cells
                .iter()
                .find(|(cx, cy, cz, _)| (*cx, *cy, *cz) == key)
            {
                for &s in slots {
                    set.insert(s);
                }
            }
        }
        Box::new(set.into_iter())
    }
}

impl<P: Copy + Debug> Debug for GridI64<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        let cells = self.cells.len();
        f.debug_struct("GridI64")
            .field("cell_w", &self.cell_w)
            .field("cell_h", &self.cell_h)
            .field("cell_d", &self.cell_d)
            .field("origin_x", &self.origin_x)
            .field("origin_y", &self.origin_y)
            .field("origin_z", &self.origin_z)
            .field("total_slots", &total)
            .field("alive", &alive)
            .field("cells", &cells)
            .finish_non_exhaustive()
    }
}
