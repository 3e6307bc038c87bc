// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree backend generic over scalar `T: Scalar` with SAH-like split.

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Aabb3D, Scalar, union_aabb, volume};

/// R-tree backend using SAH-like splits and widened accumulator metrics.
pub struct RTree<T: Scalar, P: Copy + Debug> {
    max_children: usize,
    min_children: usize,
    root: Option<NodeIdx>,
    arena: Vec<RNode<T, P>>,
    slots: Vec<Option<Aabb3D<T>>>,
}

#[derive(Clone)]
struct RNode<T: Scalar, P: Copy + Debug> {
    bbox: Aabb3D<T>,
    leaf: bool,
    children: Vec<RChild<T, P>>,
}

#[derive(Clone)]
enum RChild<T: Scalar, P: Copy + Debug> {
    Node(NodeIdx),
    Item {
        slot: usize,
        bbox: Aabb3D<T>,
        _p: core::marker::PhantomData<P>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

impl<T: Scalar, P: Copy + Debug> Default for RTree<T, P> {
    fn default() -> Self {
        Self {
            max_children: 8,
            min_children: 4,
            root: None,
            arena: Vec::new(),
            slots: Vec::new(),
        }
    }
}

// Reduce clippy::type_complexity noise for local helpers.
type RChildren<TS, PS> = Vec<RChild<TS, PS>>;
type RBestSplit<TS, PS> = Option<(
    crate::types::ScalarAcc<TS>,
    RChildren<TS, PS>,
    RChildren<TS, PS>,
)>;

impl<T: Scalar, P: Copy + Debug> RTree<T, P> {
    fn ensure_slot(&mut self, slot: usize, bbox: Aabb3D<T>) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(bbox);
    }

    #[inline]
    fn ceil_div(a: usize, b: usize) -> usize {
        a.div_ceil(b)
    }

    fn centroid_x_of_aabb(a: &Aabb3D<T>) -> T {
        Scalar::mid(a.min_x, a.max_x)
    }

    fn centroid_y_of_aabb(a: &Aabb3D<T>) -> T {
        Scalar::mid(a.min_y, a.max_y)
    }

    fn centroid_z_of_aabb(a: &Aabb3D<T>) -> T {
        Scalar::mid(a.min_z, a.max_z)
    }

    /// STR-like bulk builder: creates a packed tree from items in one pass into `arena`.
    ///
    /// Items are sorted into `gx` slabs along x, each slab into `gx` rows along y,
    /// and each row is chunked along z into leaves of `max_children` items.
    fn bulk_build_nodes(
        arena: &mut Vec<RNode<T, P>>,
        items: &mut [(usize, Aabb3D<T>)],
        max_children: usize,
    ) -> Option<NodeIdx> {
        if items.is_empty() {
            return None;
        }

        // Build leaf level (as node indices in the arena)
        let n = items.len();
        let num_leaves = Self::ceil_div(n, max_children);
        let mut gx = 1_usize;
        while gx * gx * gx < num_leaves {
            gx += 1;
        }
        items.sort_by(|a, b| {
            Self::centroid_x_of_aabb(&a.1)
                .partial_cmp(&Self::centroid_x_of_aabb(&b.1))
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        let slab_size = Self::ceil_div(n, gx);
        let mut leaves: Vec<usize> = Vec::new();
        for slab in items.chunks_mut(slab_size) {
            slab.sort_by(|a, b| {
                Self::centroid_y_of_aabb(&a.1)
                    .partial_cmp(&Self::centroid_y_of_aabb(&b.1))
                    .unwrap_or(core::cmp::Ordering::Equal)
            });
            let row_size = Self::ceil_div(slab.len(), gx);
            for row in slab.chunks_mut(row_size) {
                row.sort_by(|a, b| {
                    Self::centroid_z_of_aabb(&a.1)
                        .partial_cmp(&Self::centroid_z_of_aabb(&b.1))
                        .unwrap_or(core::cmp::Ordering::Equal)
                });
                for chunk in row.chunks(max_children) {
                    let mut children: Vec<RChild<T, P>> = Vec::with_capacity(chunk.len());
                    for (slot, bbox) in chunk.iter().copied() {
                        children.push(RChild::Item {
                            slot,
                            bbox,
                            _p: core::marker::PhantomData,
                        });
                    }
                    let bbox = Self::node_bbox(arena, &children);
                    let idx = arena.len();
                    arena.push(RNode {
                        bbox,
                        leaf: true,
                        children,
                    });
                    leaves.push(idx);
                }
            }
        }

        // Promote until a single root remains
        let mut level: Vec<usize> = leaves;
        while level.len() > max_children {
            let n_nodes = level.len();
            let num_parents = Self::ceil_div(n_nodes, max_children);
            let mut gx = 1_usize;
            while gx * gx * gx < num_parents {
                gx += 1;
            }
            level.sort_by(|&a, &b| {
                Self::centroid_x_of_aabb(&arena[a].bbox)
                    .partial_cmp(&Self::centroid_x_of_aabb(&arena[b].bbox))
                    .unwrap_or(core::cmp::Ordering::Equal)
            });
            let slab_size = Self::ceil_div(n_nodes, gx);
            let mut next: Vec<usize> = Vec::new();
            for slab in level.chunks_mut(slab_size) {
                slab.sort_by(|&a, &b| {
                    Self::centroid_y_of_aabb(&arena[a].bbox)
                        .partial_cmp(&Self::centroid_y_of_aabb(&arena[b].bbox))
                        .unwrap_or(core::cmp::Ordering::Equal)
                });
                let row_size = Self::ceil_div(slab.len(), gx);
                for row in slab.chunks_mut(row_size) {
                    row.sort_by(|&a, &b| {
                        Self::centroid_z_of_aabb(&arena[a].bbox)
                            .partial_cmp(&Self::centroid_z_of_aabb(&arena[b].bbox))
                            .unwrap_or(core::cmp::Ordering::Equal)
                    });
                    let mut i = 0;
                    while i < row.len() {
                        let end = core::cmp::min(i + max_children, row.len());
                        let chunk = &mut row[i..end];
                        let mut children: Vec<RChild<T, P>> = Vec::with_capacity(chunk.len());
                        for child_idx in chunk.iter_mut() {
                            let ch_idx = *child_idx;
                            children.push(RChild::Node(NodeIdx::new(ch_idx)));
                        }
                        let bbox = Self::node_bbox(arena, &children);
                        let idx = arena.len();
                        arena.push(RNode {
                            bbox,
                            leaf: false,
                            children,
                        });
                        next.push(idx);
                        i = end;
                    }
                }
            }
            level = next;
        }

        // Create root
        if level.len() == 1 {
            Some(NodeIdx::new(level[0]))
        } else {
            // Pack remaining nodes under a new root
            let mut children: Vec<RChild<T, P>> = Vec::with_capacity(level.len());
            for idx in level.into_iter() {
                children.push(RChild::Node(NodeIdx::new(idx)));
            }
            let bbox = Self::node_bbox(arena, &children);
            let root_idx = arena.len();
            arena.push(RNode {
                bbox,
                leaf: false,
                children,
            });
            Some(NodeIdx::new(root_idx))
        }
    }

    /// Build an `RTree` from a set of (slot, bbox) pairs using a packed layout.
    pub fn bulk_build_default(pairs: &[(usize, Aabb3D<T>)]) -> Self {
        let max_children = 8; // default matches Self::default
        let mut items = pairs.to_vec();
        let mut arena: Vec<RNode<T, P>> = Vec::new();
        let root = Self::bulk_build_nodes(&mut arena, &mut items[..], max_children);
        let mut slots: Vec<Option<Aabb3D<T>>> = Vec::new();
        for (slot, bbox) in pairs.iter().copied() {
            if slots.len() <= slot {
                slots.resize_with(slot + 1, || None);
            }
            slots[slot] = Some(bbox);
        }
        Self {
            max_children,
            min_children: 4,
            root,
            arena,
            slots,
        }
    }

    fn node_bbox(arena: &[RNode<T, P>], children: &[RChild<T, P>]) -> Aabb3D<T> {
        let mut it = children.iter();
        let first = match it.next() {
            Some(RChild::Node(i)) => arena[i.get()].bbox,
            Some(RChild::Item { bbox, .. }) => *bbox,
            None => Aabb3D::new(
                T::zero(),
                T::zero(),
                T::zero(),
                T::zero(),
                T::zero(),
                T::zero(),
            ),
        };
        it.fold(first, |acc, c| match c {
            RChild::Node(i) => union_aabb(acc, arena[i.get()].bbox),
            RChild::Item { bbox, .. } => union_aabb(acc, *bbox),
        })
    }

    fn enlarge_cost(a: &Aabb3D<T>, b: &Aabb3D<T>) -> T::Acc {
        let u = union_aabb(*a, *b);
        volume(&u) - volume(a)
    }

    fn choose_child(arena: &[RNode<T, P>], children: &[RChild<T, P>], bbox: &Aabb3D<T>) -> usize {
        let mut best_idx = 0_usize;
        let mut best_cost: Option<T::Acc> = None;
        for (i, c) in children.iter().enumerate() {
            let cb = match c {
                RChild::Node(idx) => arena[idx.get()].bbox,
                RChild::Item { bbox, .. } => *bbox,
            };
            let cost = Self::enlarge_cost(&cb, bbox);
            if best_cost.map(|bc| cost < bc).unwrap_or(true) {
                best_cost = Some(cost);
                best_idx = i;
            }
        }
        best_idx
    }

    /// SAH-like split: sort along an axis, precompute prefix/suffix AABBs, and
    /// choose `k` that minimizes `volume(LB_k) * k + volume(RB_k) * (n - k)`.
    fn split_children_with<F>(
        children: &mut [RChild<T, P>],
        _max_children: usize,
        min_children: usize,
        mut bbox_of: F,
    ) -> (RChildren<T, P>, RChildren<T, P>)
    where
        F: FnMut(&RChild<T, P>) -> Aabb3D<T>,
    {
        fn centroid_x<T: Scalar>(b: &Aabb3D<T>) -> T {
            Scalar::mid(b.min_x, b.max_x)
        }
        fn centroid_y<T: Scalar>(b: &Aabb3D<T>) -> T {
            Scalar::mid(b.min_y, b.max_y)
        }
        fn centroid_z<T: Scalar>(b: &Aabb3D<T>) -> T {
            Scalar::mid(b.min_z, b.max_z)
        }
        let n = children.len();
        let mut best: RBestSplit<T, P> = None;
        for axis in 0..3 {
            let mut v = children.to_owned();
            match axis {
                0 => v.sort_by(|a, b| {
                    centroid_x::<T>(&bbox_of(a))
                        .partial_cmp(&centroid_x::<T>(&bbox_of(b)))
                        .unwrap_or(core::cmp::Ordering::Equal)
                }),
                1 => v.sort_by(|a, b| {
                    centroid_y::<T>(&bbox_of(a))
                        .partial_cmp(&centroid_y::<T>(&bbox_of(b)))
                        .unwrap_or(core::cmp::Ordering::Equal)
                }),
                _ => v.sort_by(|a, b| {
                    centroid_z::<T>(&bbox_of(a))
                        .partial_cmp(&centroid_z::<T>(&bbox_of(b)))
                        .unwrap_or(core::cmp::Ordering::Equal)
                }),
            }

            // Precompute prefix and suffix bounding boxes to evaluate costs in O(1) per split.
            let mut prefix: Vec<Aabb3D<T>> = Vec::with_capacity(n);
            for (i, c) in v.iter().enumerate() {
                let bb = bbox_of(c);
                if i == 0 {
                    prefix.push(bb);
                } else {
                    let prev = *prefix.last().unwrap();
                    prefix.push(union_aabb(prev, bb));
                }
            }
            let mut suffix: Vec<Aabb3D<T>> = Vec::with_capacity(n);
            for (i, c) in v.iter().enumerate().rev() {
                let bb = bbox_of(c);
                if i == n - 1 {
                    suffix.push(bb);
                } else {
                    let prev = *suffix.last().unwrap();
                    suffix.push(union_aabb(bb, prev));
                }
            }
            suffix.reverse();

            for k in min_children..=(n - min_children) {
                let lb = prefix[k - 1];
                let rb = suffix[k];
                let c =
                    volume(&lb) * T::acc_from_usize(k) + volume(&rb) * T::acc_from_usize(n - k);
                if best.as_ref().map(|(bc, _, _)| c < *bc).unwrap_or(true) {
                    let left = v[..k].to_vec();
                    let right = v[k..].to_vec();
                    best = Some((c, left, right));
                }
            }
        }
        let (_, l, r) = best.expect("split requires overflow");
        (l, r)
    }

    fn insert_node(
        arena: &mut Vec<RNode<T, P>>,
        node_idx: usize,
        slot: usize,
        bbox: Aabb3D<T>,
        max_children: usize,
        min_children: usize,
    ) -> Option<usize> {
        if arena[node_idx].leaf {
            // Safe separate block to minimize mutable borrows
            {
                let node = &mut arena[node_idx];
                node.children.push(RChild::Item {
                    slot,
                    bbox,
                    _p: core::marker::PhantomData,
                });
                node.bbox = union_aabb(node.bbox, bbox);
                if node.children.len() <= max_children {
                    return None;
                }
            }
            // Overflow split for a leaf: children are Items
            let (left, right, l_bbox, r_bbox) =
                {
                    let mut items = core::mem::take(&mut arena[node_idx].children);
                    let (left, right) =
                        Self::split_children_with(&mut items, max_children, min_children, |c| {
                            match c {
                                RChild::Item { bbox, .. } => *bbox,
                                RChild::Node(_) => unreachable!(),
                            }
                        });
                    let l_bbox = Self::node_bbox(arena, &left);
                    let r_bbox = Self::node_bbox(arena, &right);
                    (left, right, l_bbox, r_bbox)
                };
            {
                let node = &mut arena[node_idx];
                node.leaf = true;
                node.children = left;
                node.bbox = l_bbox;
            }
            let r_idx = arena.len();
            arena.push(RNode {
                bbox: r_bbox,
                leaf: true,
                children: right,
            });
            Some(r_idx)
        } else {
            // Choose child without holding &mut to the node across arena borrows
            let idx = {
                let children = &arena[node_idx].children;
                Self::choose_child(arena, children, &bbox)
            };
            let split = match arena[node_idx].children[idx] {
                RChild::Node(child_idx) => Self::insert_node(
                    arena,
                    child_idx.get(),
                    slot,
                    bbox,
                    max_children,
                    min_children,
                ),
                RChild::Item { .. } => None,
            };
            // update node bbox
            arena[node_idx].bbox = union_aabb(arena[node_idx].bbox, bbox);
            if let Some(new_right_idx) = split {
                // Insert new right sibling and handle possible overflow
                arena[node_idx]
                    .children
                    .insert(idx + 1, RChild::Node(NodeIdx::new(new_right_idx)));
                if arena[node_idx].children.len() > max_children {
                    let (left, right, l_bbox, r_bbox) = {
                        let mut ch = core::mem::take(&mut arena[node_idx].children);
                        let (left, right) =
                            Self::split_children_with(&mut ch, max_children, min_children, |c| {
                                match c {
                                    RChild::Item { bbox, .. } => *bbox,
                                    RChild::Node(i) => arena[i.get()].bbox,
                                }
                            });
                        let l_bbox = Self::node_bbox(arena, &left);
                        let r_bbox = Self::node_bbox(arena, &right);
                        (left, right, l_bbox, r_bbox)
                    };
                    arena[node_idx].leaf = false;
                    arena[node_idx].children = left;
                    arena[node_idx].bbox = l_bbox;
                    let r_idx = arena.len();
                    arena.push(RNode {
                        bbox: r_bbox,
                        leaf: false,
                        children: right,
                    });
                    return Some(r_idx);
                }
            }
            None
        }
    }

    fn search_remove(
        arena: &mut Vec<RNode<T, P>>,
        node_idx: usize,
        slot: usize,
        old: &Aabb3D<T>,
    ) -> bool {
        let node_bbox = arena[node_idx].bbox;
        if node_bbox.intersect(old).is_empty() {
            return false;
        }
        if arena[node_idx].leaf {
            let before = arena[node_idx].children.len();
            arena[node_idx].children.retain(|c| match c {
                RChild::Item { slot: s, .. } => *s != slot,
                _ => true,
            });
            if arena[node_idx].children.len() != before {
                let bb = Self::node_bbox(arena, &arena[node_idx].children);
                arena[node_idx].bbox = bb;
                return true;
            }
            false
        } else {
            let mut removed = false;
            // Recurse into child nodes
            let child_indices: Vec<NodeIdx> = arena[node_idx]
                .children
                .iter()
                .filter_map(|c| {
                    if let RChild::Node(i) = c {
                        Some(*i)
                    } else {
                        None
                    }
                })
                .collect();
            for ci in child_indices {
                if Self::search_remove(arena, ci.get(), slot, old) {
                    removed = true;
                }
            }
            if removed {
                let new_children = {
                    let old_children = core::mem::take(&mut arena[node_idx].children);
                    old_children
                        .into_iter()
                        .filter(|c| match c {
                            RChild::Node(i) => !arena[i.get()].children.is_empty(),
                            _ => true,
                        })
                        .collect::<Vec<_>>()
                };
                arena[node_idx].children = new_children;
                if !arena[node_idx].children.is_empty() {
                    let bb = Self::node_bbox(arena, &arena[node_idx].children);
                    arena[node_idx].bbox = bb;
                }
            }
            removed
        }
    }

    /// Attempt to update an item's AABB in-place without remove+insert.
    /// Returns true if the item was found and updated; recomputes ancestor bboxes on the path.
    fn update_in_place(
        arena: &mut Vec<RNode<T, P>>,
        node_idx: usize,
        slot: usize,
        old: Aabb3D<T>,
        new: Aabb3D<T>,
    ) -> bool {
        let interest = union_aabb(old, new);
        if arena[node_idx].bbox.intersect(&interest).is_empty() {
            return false;
        }
        if arena[node_idx].leaf {
            let mut found = false;
            for c in &mut arena[node_idx].children {
                if let RChild::Item { slot: s, bbox, .. } = c
                    && *s == slot
                {
                    *bbox = new;
                    found = true;
                    break;
                }
            }
            if found {
                let bb = Self::node_bbox(arena, &arena[node_idx].children);
                arena[node_idx].bbox = bb;
            }
            found
        } else {
            let child_indices: Vec<NodeIdx> = arena[node_idx]
                .children
                .iter()
                .filter_map(|c| {
                    if let RChild::Node(i) = c {
                        Some(*i)
                    } else {
                        None
                    }
                })
                .collect();
            let mut updated = false;
            for ci in child_indices {
                if Self::update_in_place(arena, ci.get(), slot, old, new) {
                    updated = true;
                    break;
                }
            }
            if updated {
                let bb = Self::node_bbox(arena, &arena[node_idx].children);
                arena[node_idx].bbox = bb;
            }
            updated
        }
    }
}

impl<T: Scalar, P: Copy + Debug> Backend<T, P> for RTree<T, P> {
    fn insert(&mut self, slot: usize, aabb: Aabb3D<T>) {
        self.ensure_slot(slot, aabb);
        match self.root {
            None => {
                let mut leaf = RNode::<T, P> {
                    bbox: aabb,
                    leaf: true,
                    children: Vec::new(),
                };
                leaf.children.push(RChild::Item {
                    slot,
                    bbox: aabb,
                    _p: core::marker::PhantomData,
                });
                let idx = self.arena.len();
                self.arena.push(leaf);
                self.root = Some(NodeIdx::new(idx));
            }
            Some(root_idx) => {
                let split = Self::insert_node(
                    &mut self.arena,
                    root_idx.get(),
                    slot,
                    aabb,
                    self.max_children,
                    self.min_children,
                );
                if let Some(right_idx) = split {
                    // Create a new root combining old root and new right child
                    let left_bb = self.arena[root_idx.get()].bbox;
                    let right_bb = self.arena[right_idx].bbox;
                    let new_bb = union_aabb(left_bb, right_bb);
                    let children = vec![
                        RChild::Node(root_idx),
                        RChild::Node(NodeIdx::new(right_idx)),
                    ];
                    let idx = self.arena.len();
                    self.arena.push(RNode {
                        bbox: new_bb,
                        leaf: false,
                        children,
                    });
                    self.root = Some(NodeIdx::new(idx));
                }
            }
        }
    }

    fn update(&mut self, slot: usize, aabb: Aabb3D<T>) {
        if let Some(old) = self.slots.get(slot).and_then(|x| *x)
            && let Some(root_idx) = self.root
        {
            if Self::update_in_place(&mut self.arena, root_idx.get(), slot, old, aabb) {
                if let Some(s) = self.slots.get_mut(slot) {
                    *s = Some(aabb);
                }
                return;
            }
            let _ = Self::search_remove(&mut self.arena, root_idx.get(), slot, &old);
        }
        self.insert(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        if let Some(old) = self.slots.get(slot).and_then(|x| *x) {
            if let Some(root_idx) = self.root {
                let _ = Self::search_remove(&mut self.arena, root_idx.get(), slot, &old);
            }
            if let Some(s) = self.slots.get_mut(slot) {
                *s = None;
            }
        }
    }

    fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.slots.clear();
    }

    fn query_point<'a>(&'a self, x: T, y: T, z: T) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        let Some(root_idx) = self.root else {
            return Box::new(out.into_iter());
        };
        let p = Aabb3D::new(x, y, z, x, y, z);
        let mut stack = vec![root_idx];
        while let Some(i) = stack.pop() {
            let n = &self.arena[i.get()];
            if n.bbox.intersect(&p).is_empty() {
                continue;
            }
            if n.leaf {
                for c in &n.children {
                    if let RChild::Item { slot, bbox, .. } = c
                        && !bbox.intersect(&p).is_empty()
                    {
                        out.push(*slot);
                    }
                }
            } else {
                for c in &n.children {
                    if let RChild::Node(ci) = c {
                        stack.push(*ci);
                    }
                }
            }
        }
        Box::new(out.into_iter())
    }

    fn query_box<'a>(&'a self, aabb: Aabb3D<T>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        let Some(root_idx) = self.root else {
            return Box::new(out.into_iter());
        };
        let mut stack = vec![root_idx];
        while let Some(i) = stack.pop() {
            let n = &self.arena[i.get()];
            if n.bbox.intersect(&aabb).is_empty() {
                continue;
            }
            if n.leaf {
                for c in &n.children {
                    if let RChild::Item { slot, bbox, .. } = c
                        && !bbox.intersect(&aabb).is_empty()
                    {
                        out.push(*slot);
                    }
                }
            } else {
                for c in &n.children {
                    if let RChild::Node(ci) = c {
                        stack.push(*ci);
                    }
                }
            }
        }
        Box::new(out.into_iter())
    }
}

impl<T: Scalar, P: Copy + Debug> Debug for RTree<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.slots.len();
        let alive = self.slots.iter().filter(|e| e.is_some()).count();
        let has_root = self.root.is_some();
        f.debug_struct("RTree")
            .field("max_children", &self.max_children)
            .field("min_children", &self.min_children)
            .field("arena_nodes", &self.arena.len())
            .field("total_slots", &total)
            .field("alive", &alive)
            .field("has_root", &has_root)
            .finish_non_exhaustive()
    }
}

/// Convenience type aliases.
/// R-tree with i32 coordinates and i128 metrics.
pub type RTreeI32<P> = RTree<i32, P>;

/// R-tree with i64 coordinates and i128 metrics.
pub type RTreeI64<P> = RTree<i64, P>;
