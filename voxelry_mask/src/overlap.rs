// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Voxel-level overlap tests between two masks.
//!
//! Both functions walk the geometric intersection of the two bounds in
//! buffer order (z outer, then y, then x) and compare per-row byte slices
//! under each mask's own encoding. Masks whose bounds do not intersect
//! contribute nothing and no buffer indexing occurs.

use crate::mask::VoxelMask;

/// Number of positions where both masks have an on voxel.
pub fn count_intersecting(a: &VoxelMask, b: &VoxelMask) -> usize {
    let Some(r) = a.bounds().intersection(&b.bounds()) else {
        return 0;
    };
    let (ea, eb) = (a.bounds().extent(), b.bounds().extent());
    let (ca, cb) = (a.bounds().corner(), b.bounds().corner());
    let (enc_a, enc_b) = (a.encoding(), b.encoding());
    let x0 = r.corner().x;
    let max = r.max_corner();
    let width = r.extent().width as usize;
    let mut count = 0;
    for z in r.corner().z..=max.z {
        for y in r.corner().y..=max.y {
            let ia = ea.index_of(local(x0, ca.x), local(y, ca.y), local(z, ca.z));
            let ib = eb.index_of(local(x0, cb.x), local(y, cb.y), local(z, cb.z));
            let row_a = &a.bytes()[ia..ia + width];
            let row_b = &b.bytes()[ib..ib + width];
            count += row_a
                .iter()
                .zip(row_b)
                .filter(|&(&va, &vb)| enc_a.is_on(va) && enc_b.is_on(vb))
                .count();
        }
    }
    count
}

/// True iff at least one position is on in both masks.
///
/// Same traversal as [`count_intersecting`] but short-circuits on the first
/// doubly-on voxel; the overlap set is never materialized.
pub fn has_intersecting(a: &VoxelMask, b: &VoxelMask) -> bool {
    let Some(r) = a.bounds().intersection(&b.bounds()) else {
        return false;
    };
    let (ea, eb) = (a.bounds().extent(), b.bounds().extent());
    let (ca, cb) = (a.bounds().corner(), b.bounds().corner());
    let (enc_a, enc_b) = (a.encoding(), b.encoding());
    let x0 = r.corner().x;
    let max = r.max_corner();
    let width = r.extent().width as usize;
    for z in r.corner().z..=max.z {
        for y in r.corner().y..=max.y {
            let ia = ea.index_of(local(x0, ca.x), local(y, ca.y), local(z, ca.z));
            let ib = eb.index_of(local(x0, cb.x), local(y, cb.y), local(z, cb.z));
            let row_a = &a.bytes()[ia..ia + width];
            let row_b = &b.bytes()[ib..ib + width];
            if row_a
                .iter()
                .zip(row_b)
                .any(|(&va, &vb)| enc_a.is_on(va) && enc_b.is_on(vb))
            {
                return true;
            }
        }
    }
    false
}

/// Local coordinate of a world position relative to a mask corner.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "in-bounds positions are at most span - 1 voxels past the corner"
)]
fn local(v: i32, origin: i32) -> u32 {
    debug_assert!(v >= origin, "position must lie within the mask bounds");
    (i64::from(v) - i64::from(origin)) as u32
}
