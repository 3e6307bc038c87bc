// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object-level spatial index over voxel masks.

use alloc::vec::Vec;
use core::fmt::Debug;

use glam::IVec3;

use voxelry_index::{Aabb3D, Index, IndexGeneric, RTreeI32};

use crate::bounds::Bounds;
use crate::mask::VoxelMask;
use crate::overlap::has_intersecting;

/// Stable handle of a mask in a [`MaskIndex`].
///
/// Handles are plain slot ids: the index is built once and supports removal
/// but not insertion, so slots are never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaskId(pub(crate) u32);

impl MaskId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "mask ids are intentionally 32-bit; higher bits are truncated by design."
    )]
    pub(crate) const fn new(slot: usize) -> Self {
        Self(slot as u32)
    }

    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

type BoxIndex = IndexGeneric<i32, u32, RTreeI32<u32>>;

/// A spatial index over a fixed collection of [`VoxelMask`]s.
///
/// The index owns its masks in an arena addressed by [`MaskId`]. Bounding
/// boxes are mirrored into an R-tree (packed STR bulk build) for candidate
/// retrieval; wherever the query contract is voxel-exact, candidates are
/// confirmed against the masks before inclusion. Construction performs no
/// intersection testing.
///
/// Not internally thread-safe; build one index per worker when parallelizing.
pub struct MaskIndex {
    masks: Vec<Option<VoxelMask>>,
    boxes: BoxIndex,
    live: usize,
}

impl MaskIndex {
    /// Build an index over a collection of masks.
    ///
    /// Handles are assigned in input order.
    pub fn build(masks: Vec<VoxelMask>) -> Self {
        let entries: Vec<(Aabb3D<i32>, u32)> = masks
            .iter()
            .enumerate()
            .map(|(i, m)| (m.bounds().to_aabb(), MaskId::new(i).0))
            .collect();
        let boxes = Index::<i32, u32>::with_rtree_bulk(&entries);
        let live = masks.len();
        Self {
            masks: masks.into_iter().map(Some).collect(),
            boxes,
            live,
        }
    }

    /// Every mask whose bounds contain `p` and whose voxel at `p` is on.
    ///
    /// Ids ascending; the returned vector is freshly allocated.
    pub fn contains_point(&self, p: IVec3) -> Vec<MaskId> {
        let mut out: Vec<MaskId> = self
            .boxes
            .query_point(p.x, p.y, p.z)
            .filter_map(|(_, slot)| {
                let id = MaskId(slot);
                self.get(id).filter(|m| m.is_on_at(p)).map(|_| id)
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Every other mask with at least one voxel-level overlap with `id`.
    ///
    /// The queried mask is excluded. Unknown or removed ids yield an empty
    /// result. Ids ascending.
    pub fn intersects_with(&self, id: MaskId) -> Vec<MaskId> {
        let Some(mask) = self.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<MaskId> = self
            .boxes
            .query_box(mask.bounds().to_aabb())
            .filter_map(|(_, slot)| {
                let other = MaskId(slot);
                if other == id {
                    return None;
                }
                self.get(other)
                    .filter(|o| has_intersecting(mask, o))
                    .map(|_| other)
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Every mask whose bounds intersect the given box.
    ///
    /// Bounding boxes only: a bare box carries no mask, so no voxel
    /// confirmation happens here. Use [`Self::intersects_with`] for exact
    /// mask-vs-mask queries. Ids ascending.
    pub fn intersects_with_bounds(&self, bounds: &Bounds) -> Vec<MaskId> {
        let mut out: Vec<MaskId> = self
            .boxes
            .query_box(bounds.to_aabb())
            .filter_map(|(_, slot)| {
                let id = MaskId(slot);
                self.get(id).map(|_| id)
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Remove a mask. Removing an absent or already-removed id is a no-op.
    pub fn remove(&mut self, id: MaskId) {
        let Some(mask) = self.masks.get_mut(id.slot()).and_then(|slot| slot.take()) else {
            return;
        };
        // Locate the substrate entry through its exact stored box.
        let key = self
            .boxes
            .query_box(mask.bounds().to_aabb())
            .find(|(_, slot)| *slot == id.0)
            .map(|(key, _)| key);
        if let Some(key) = key {
            self.boxes.remove(key);
            let _ = self.boxes.commit();
        }
        self.live -= 1;
    }

    /// Number of live masks.
    pub fn len(&self) -> usize {
        self.live
    }

    /// True if no masks remain.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Borrow a mask by id.
    pub fn get(&self, id: MaskId) -> Option<&VoxelMask> {
        self.masks.get(id.slot()).and_then(Option::as_ref)
    }

    /// All live ids, ascending.
    pub fn ids(&self) -> Vec<MaskId> {
        self.masks
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.as_ref().map(|_| MaskId::new(i)))
            .collect()
    }

    /// Every unordered pair of live masks with a confirmed voxel overlap.
    ///
    /// Pairs are (smaller, larger) and the list is ordered by the first then
    /// second id.
    pub(crate) fn confirmed_pairs(&self) -> Vec<(MaskId, MaskId)> {
        let mut pairs = Vec::new();
        for (i, slot) in self.masks.iter().enumerate() {
            let Some(mask) = slot.as_ref() else {
                continue;
            };
            let a = MaskId::new(i);
            let mut candidates: Vec<MaskId> = self
                .boxes
                .query_box(mask.bounds().to_aabb())
                .filter_map(|(_, s)| {
                    let b = MaskId(s);
                    (b > a).then_some(b)
                })
                .collect();
            candidates.sort_unstable();
            for b in candidates {
                if let Some(other) = self.get(b)
                    && has_intersecting(mask, other)
                {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }
}

impl Debug for MaskIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MaskIndex")
            .field("live", &self.live)
            .field("total_slots", &self.masks.len())
            .finish_non_exhaustive()
    }
}
