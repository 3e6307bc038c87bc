// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 3D with inclusive corners.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb3D<T> {
    /// Minimum x
    pub min_x: T,
    /// Minimum y
    pub min_y: T,
    /// Minimum z (lowest slice)
    pub min_z: T,
    /// Maximum x
    pub max_x: T,
    /// Maximum y
    pub max_y: T,
    /// Maximum z (highest slice)
    pub max_z: T,
}

impl<T> Aabb3D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, min_z: T, max_x: T, max_y: T, max_z: T) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb3D<T> {
    /// Whether this AABB contains the point.
    pub fn contains_point(&self, x: T, y: T, z: T) -> bool {
        le(self.min_x, x)
            && le(self.min_y, y)
            && le(self.min_z, z)
            && le(x, self.max_x)
            && le(y, self.max_y)
            && le(z, self.max_z)
    }

    /// The intersection of two AABBs. May be inverted when the boxes are disjoint.
    pub fn intersect(&self, other: &Self) -> Self {
        let min_x = max_t(self.min_x, other.min_x);
        let min_y = max_t(self.min_y, other.min_y);
        let min_z = max_t(self.min_z, other.min_z);
        let max_x = min_t(self.max_x, other.max_x);
        let max_y = min_t(self.max_y, other.max_y);
        let max_z = min_t(self.max_z, other.max_z);
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Return true if the AABB is inverted on any axis (no volume).
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y) || lt(self.max_z, self.min_z)
    }
}

impl Aabb3D<i32> {
    /// Create an AABB from origin and size in i32.
    ///
    /// Sizes are in cells: a size of 1 covers exactly the origin cell.
    pub const fn from_origin_size(x: i32, y: i32, z: i32, w: i32, h: i32, d: i32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            min_z: z,
            max_x: x + w - 1,
            max_y: y + h - 1,
            max_z: z + d - 1,
        }
    }
}

impl Aabb3D<i64> {
    /// Create an AABB from origin and size in i64.
    ///
    /// Sizes are in cells: a size of 1 covers exactly the origin cell.
    pub const fn from_origin_size(x: i64, y: i64, z: i64, w: i64, h: i64, d: i64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            min_z: z,
            max_x: x + w - 1,
            max_y: y + h - 1,
            max_z: z + d - 1,
        }
    }
}

/// Numeric scalar abstraction for 3D AABBs used by backends.
///
/// This trait provides a minimal set of operations required for SAH metrics and
/// centroid computations, and an associated widened accumulator type for volume
/// (`i32` -> `i128`, `i64` -> `i128`).
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for volume/cost computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Midpoint between a and b (used for centroid ordering).
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert a `usize` to the accumulator type (for SAH weighting).
    fn acc_from_usize(n: usize) -> Self::Acc;
}

impl Scalar for i32 {
    type Acc = i128;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as i128
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as i128
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as i128
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as i128
    }
}

/// Compute the volume of an AABB, in cells, using the scalar's widened
/// accumulator type.
///
/// Boxes are inclusive, so each side counts `max - min + 1` cells and a
/// degenerate single-cell box still has volume 1. Inverted axes clamp to
/// zero.
#[inline]
pub fn volume<T: Scalar>(a: &Aabb3D<T>) -> T::Acc {
    let zero = T::acc_from_usize(0);
    let one = T::acc_from_usize(1);
    let w = max_t(T::widen(a.max_x) - T::widen(a.min_x) + one, zero);
    let h = max_t(T::widen(a.max_y) - T::widen(a.min_y) + one, zero);
    let d = max_t(T::widen(a.max_z) - T::widen(a.min_z) + one, zero);
    w * h * d
}

// Helper type to access Scalar::Acc in type aliases elsewhere.
/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}
pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb3D<T>, b: Aabb3D<T>) -> Aabb3D<T> {
    Aabb3D {
        min_x: min_t(a.min_x, b.min_x),
        min_y: min_t(a.min_y, b.min_y),
        min_z: min_t(a.min_z, b.min_z),
        max_x: max_t(a.max_x, b.max_x),
        max_y: max_t(a.max_y, b.max_y),
        max_z: max_t(a.max_z, b.max_z),
    }
}
