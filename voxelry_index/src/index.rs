// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::damage::Damage;
use crate::types::Aabb3D;

/// Generational handle for entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are intentionally 32-bit; higher bits are truncated by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mark {
    Added,
    Updated,
    Removed,
}

#[derive(Clone, Debug)]
struct Entry<T, P> {
    generation: u32,
    aabb: Aabb3D<T>,
    payload: P,
    mark: Option<Mark>,
    prev_aabb: Option<Aabb3D<T>>, // for moved damage
}

/// A generic AABB index parameterized by a spatial backend.
#[derive(Debug)]
pub struct IndexGeneric<T: Copy + PartialOrd + Debug, P: Copy + Debug, B: Backend<T, P>> {
    entries: Vec<Option<Entry<T, P>>>,
    // Vacated slots with the generation they retired at, so reuse bumps past
    // any key still held for the slot.
    free_list: Vec<(usize, u32)>,
    backend: B,
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T, P> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            backend: B::default(),
        }
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T, P>,
{
    /// Reserve space for at least `n` entries.
    pub fn reserve(&mut self, n: usize) {
        self.entries.reserve(n);
    }

    /// Insert a new AABB with payload. Returns a stable handle `Key`.
    pub fn insert(&mut self, aabb: Aabb3D<T>, payload: P) -> Key {
        let (idx, generation) = if let Some((idx, retired)) = self.free_list.pop() {
            let generation = retired.wrapping_add(1);
            self.entries[idx] = Some(Entry {
                generation,
                aabb,
                payload,
                mark: Some(Mark::Added),
                prev_aabb: None,
            });
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.entries.push(Some(Entry {
                generation,
                aabb,
                payload,
                mark: Some(Mark::Added),
                prev_aabb: None,
            }));
            (self.entries.len() - 1, generation)
        };
        Key::new(idx, generation)
    }

    /// Update an existing AABB.
    pub fn update(&mut self, key: Key, aabb: Aabb3D<T>) {
        if let Some(e) = self.entry_mut(key) {
            if e.mark.is_none() {
                e.prev_aabb = Some(e.aabb);
            }
            e.aabb = aabb;
            e.mark = Some(match e.mark {
                Some(Mark::Added) => Mark::Added,
                _ => Mark::Updated,
            });
        }
    }

    /// Remove an existing AABB.
    pub fn remove(&mut self, key: Key) {
        if let Some(e) = self.entry_mut(key) {
            if matches!(e.mark, Some(Mark::Added)) {
                let generation = e.generation;
                self.entries[key.idx()] = None;
                self.free_list.push((key.idx(), generation));
            } else {
                e.mark = Some(Mark::Removed);
            }
        }
    }

    /// Clear the index (without reporting damage).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.free_list.clear();
        self.backend.clear();
    }

    /// Apply pending changes and compute batched damage. Also synchronizes backend state.
    pub fn commit(&mut self) -> Damage<T> {
        let mut dmg = Damage::default();
        for i in 0..self.entries.len() {
            let Some(entry) = self.entries[i].as_mut() else {
                continue;
            };
            match entry.mark.take() {
                Some(Mark::Added) => {
                    self.backend.insert(i, entry.aabb);
                    dmg.added.push(entry.aabb);
                }
                Some(Mark::Removed) => {
                    self.backend.remove(i);
                    dmg.removed.push(entry.aabb);
                    let generation = entry.generation;
                    self.entries[i] = None;
                    self.free_list.push((i, generation));
                }
                Some(Mark::Updated) => {
                    self.backend.update(i, entry.aabb);
                    if let Some(prev) = entry.prev_aabb.take()
                        && prev != entry.aabb
                    {
                        dmg.moved.push((prev, entry.aabb));
                    }
                }
                None => {}
            }
        }
        dmg
    }

    /// Query for entries whose AABB contains the point.
    pub fn query_point(&self, x: T, y: T, z: T) -> impl Iterator<Item = (Key, P)> + '_ {
        let slots = self.backend.query_point(x, y, z);
        let mut out = Vec::new();
        for i in slots {
            if let Some(Some(e)) = self.entries.get(i) {
                out.push((Key::new(i, e.generation), e.payload));
            }
        }
        out.into_iter()
    }

    /// Query for entries whose AABB intersects the given box.
    pub fn query_box(&self, aabb: Aabb3D<T>) -> impl Iterator<Item = (Key, P)> + '_ {
        let slots = self.backend.query_box(aabb);
        let mut out = Vec::new();
        for i in slots {
            if let Some(Some(e)) = self.entries.get(i) {
                out.push((Key::new(i, e.generation), e.payload));
            }
        }
        out.into_iter()
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<T, P>> {
        let e = self.entries.get_mut(key.idx())?.as_mut()?;
        if e.generation != key.1 {
            return None;
        }
        Some(e)
    }
}

// Debug is derived above; backends implement Debug with concise, partial output.

/// Default index using a flat vector backend.
pub type Index<T, P> = IndexGeneric<T, P, crate::backends::flatvec::FlatVec<T, P>>;

impl<T: Copy + PartialOrd + Debug, P: Copy + Debug> Default for Index<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Copy + Debug> Index<i32, P> {
    /// Create an i32 R-tree-backed index using integer SAH splits.
    pub fn with_rtree() -> IndexGeneric<i32, P, crate::backends::rtree::RTreeI32<P>> {
        IndexGeneric {
            entries: Vec::new(),
            free_list: Vec::new(),
            backend: crate::backends::rtree::RTreeI32::default(),
        }
    }

    /// Build an i32 R-tree-backed index in bulk from entries.
    pub fn with_rtree_bulk(
        entries: &[(Aabb3D<i32>, P)],
    ) -> IndexGeneric<i32, P, crate::backends::rtree::RTreeI32<P>> {
        let mut idx = IndexGeneric {
            entries: Vec::with_capacity(entries.len()),
            free_list: Vec::new(),
            backend: crate::backends::rtree::RTreeI32::default(),
        };
        let mut pairs: Vec<(usize, Aabb3D<i32>)> = Vec::with_capacity(entries.len());
        for (i, (aabb, payload)) in entries.iter().copied().enumerate() {
            idx.entries.push(Some(Entry {
                generation: 1,
                aabb,
                payload,
                mark: None,
                prev_aabb: None,
            }));
            pairs.push((i, aabb));
        }
        idx.backend = crate::backends::rtree::RTreeI32::bulk_build_default(&pairs);
        idx
    }

    /// Create an i32 grid-backed index with the given cell size (origin at zero).
    pub fn with_uniform_grid(
        cell_w: i32,
        cell_h: i32,
        cell_d: i32,
    ) -> IndexGeneric<i32, P, crate::backends::grid::GridI32<P>> {
        IndexGeneric {
            entries: Vec::new(),
            free_list: Vec::new(),
            backend: crate::backends::grid::GridI32::<P>::new(cell_w, cell_h, cell_d, 0, 0, 0),
        }
    }

    /// Create an i32 grid-backed index with explicit origin offset.
    pub fn with_uniform_grid_with_origin(
        cell_w: i32,
        cell_h: i32,
        cell_d: i32,
        origin_x: i32,
        origin_y: i32,
        origin_z: i32,
    ) -> IndexGeneric<i32, P, crate::backends::grid::GridI32<P>> {
        IndexGeneric {
            entries: Vec::new(),
            free_list: Vec::new(),
            backend: crate::backends::grid::GridI32::<P>::new(
                cell_w, cell_h, cell_d, origin_x, origin_y, origin_z,
            ),
        }
    }
}

impl<P: Copy + Debug> Index<i64, P> {
    /// Create an i64 R-tree-backed index using integer SAH splits.
    pub fn with_rtree() -> IndexGeneric<i64, P, crate::backends::rtree::RTreeI64<P>> {
        IndexGeneric {
            entries: Vec::new(),
            free_list: Vec::new(),
            backend: crate::backends::rtree::RTreeI64::default(),
        }
    }

    /// Build an i64 R-tree-backed index in bulk from entries.
    pub fn with_rtree_bulk(
        entries: &[(Aabb3D<i64>, P)],
    ) -> IndexGeneric<i64, P, crate::backends::rtree::RTreeI64<P>> {
        let mut idx = IndexGeneric {
            entries: Vec::with_capacity(entries.len()),
            free_list: Vec::new(),
            backend: crate::backends::rtree::RTreeI64::default(),
        };
        let mut pairs: Vec<(usize, Aabb3D<i64>)> = Vec::with_capacity(entries.len());
        for (i, (aabb, payload)) in entries.iter().copied().enumerate() {
            idx.entries.push(Some(Entry {
                generation: 1,
                aabb,
                payload,
                mark: None,
                prev_aabb: None,
            }));
            pairs.push((i, aabb));
        }
        idx.backend = crate::backends::rtree::RTreeI64::bulk_build_default(&pairs);
        idx
    }

    /// Create an i64 grid-backed index.
    pub fn with_uniform_grid_i64(
        cell_w: i64,
        cell_h: i64,
        cell_d: i64,
        origin_x: i64,
        origin_y: i64,
        origin_z: i64,
    ) -> IndexGeneric<i64, P, crate::backends::grid::GridI64<P>> {
        IndexGeneric {
            entries: Vec::new(),
            free_list: Vec::new(),
            backend: crate::backends::grid::GridI64::<P>::new(
                cell_w, cell_h, cell_d, origin_x, origin_y, origin_z,
            ),
        }
    }
}
