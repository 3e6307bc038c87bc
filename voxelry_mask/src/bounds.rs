// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer bounding boxes as corner plus extent.

use glam::{IVec3, UVec3};

use voxelry_index::Aabb3D;

use crate::error::{MaskError, MaskResult};
use crate::extent::Extent;

/// An axis-aligned integer box: a minimum corner and a non-degenerate extent.
///
/// The inclusive maximum corner is `corner + extent - 1` per axis and is
/// guaranteed to fit `i32` by construction. Values are immutable; geometric
/// operations return new boxes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    corner: IVec3,
    extent: Extent,
}

impl Bounds {
    /// Create bounds from a minimum corner and extent.
    ///
    /// Rejects degenerate extents and corners whose inclusive maximum would
    /// overflow `i32`.
    pub fn new(corner: IVec3, extent: Extent) -> MaskResult<Self> {
        if extent.is_degenerate() {
            return Err(MaskError::ZeroExtent {
                width: extent.width,
                height: extent.height,
                depth: extent.depth,
            });
        }
        axis_max(corner.x, extent.width)?;
        axis_max(corner.y, extent.height)?;
        axis_max(corner.z, extent.depth)?;
        Ok(Self { corner, extent })
    }

    /// Construct without validation. Callers must guarantee the invariants.
    pub(crate) const fn from_parts(corner: IVec3, extent: Extent) -> Self {
        Self { corner, extent }
    }

    /// The minimum corner.
    pub const fn corner(&self) -> IVec3 {
        self.corner
    }

    /// The extent.
    pub const fn extent(&self) -> Extent {
        self.extent
    }

    /// The inclusive maximum corner.
    pub fn max_corner(&self) -> IVec3 {
        IVec3::new(
            axis_top(self.corner.x, self.extent.width),
            axis_top(self.corner.y, self.extent.height),
            axis_top(self.corner.z, self.extent.depth),
        )
    }

    /// True iff the boxes share at least one voxel.
    pub fn intersects(&self, other: &Self) -> bool {
        let amax = self.max_corner();
        let bmax = other.max_corner();
        self.corner.x <= bmax.x
            && other.corner.x <= amax.x
            && self.corner.y <= bmax.y
            && other.corner.y <= amax.y
            && self.corner.z <= bmax.z
            && other.corner.z <= amax.z
    }

    /// The shared region of two boxes, or `None` when they do not intersect.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min = self.corner.max(other.corner);
        let max = self.max_corner().min(other.max_corner());
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return None;
        }
        let extent = Extent::new(
            span_u32(min.x, max.x),
            span_u32(min.y, max.y),
            span_u32(min.z, max.z),
        );
        Some(Self::from_parts(min, extent))
    }

    /// The smallest representable box covering both inputs. Total; never
    /// fails.
    ///
    /// An axis spanning the entire `i32` range is one voxel wider than the
    /// largest representable box; the result saturates at a maximum corner
    /// of `i32::MAX - 1` on that axis.
    pub fn union(&self, other: &Self) -> Self {
        let min = self.corner.min(other.corner);
        let max = self.max_corner().max(other.max_corner());
        let extent = Extent::new(
            span_u32(min.x, max.x),
            span_u32(min.y, max.y),
            span_u32(min.z, max.z),
        );
        Self::from_parts(min, extent)
    }

    /// True iff the point lies within the box (inclusive on all sides).
    pub fn contains_point(&self, p: IVec3) -> bool {
        let max = self.max_corner();
        self.corner.x <= p.x
            && p.x <= max.x
            && self.corner.y <= p.y
            && p.y <= max.y
            && self.corner.z <= p.z
            && p.z <= max.z
    }

    /// True iff `inner` lies entirely within this box.
    pub fn contains_box(&self, inner: &Self) -> bool {
        self.contains_point(inner.corner) && self.contains_point(inner.max_corner())
    }

    /// Map a world position to local coordinates, if inside.
    pub fn to_local(&self, p: IVec3) -> Option<UVec3> {
        if !self.contains_point(p) {
            return None;
        }
        Some(UVec3::new(
            local_offset(p.x, self.corner.x),
            local_offset(p.y, self.corner.y),
            local_offset(p.z, self.corner.z),
        ))
    }

    /// The same box with its corner moved by `delta`.
    pub fn shifted_by(&self, delta: IVec3) -> MaskResult<Self> {
        let corner = IVec3::new(
            checked_add(self.corner.x, delta.x)?,
            checked_add(self.corner.y, delta.y)?,
            checked_add(self.corner.z, delta.z)?,
        );
        Self::new(corner, self.extent)
    }

    /// The box enlarged by `neg` voxels on the low sides and `pos` on the high.
    pub fn grown_by(&self, neg: UVec3, pos: UVec3) -> MaskResult<Self> {
        let corner = IVec3::new(
            checked_sub_span(self.corner.x, neg.x)?,
            checked_sub_span(self.corner.y, neg.y)?,
            checked_sub_span(self.corner.z, neg.z)?,
        );
        let extent = Extent::new(
            grow_axis(self.extent.width, neg.x, pos.x)?,
            grow_axis(self.extent.height, neg.y, pos.y)?,
            grow_axis(self.extent.depth, neg.z, pos.z)?,
        );
        Self::new(corner, extent)
    }

    /// The bounds as an inclusive substrate box.
    pub fn to_aabb(&self) -> Aabb3D<i32> {
        let max = self.max_corner();
        Aabb3D::new(
            self.corner.x,
            self.corner.y,
            self.corner.z,
            max.x,
            max.y,
            max.z,
        )
    }

    /// Rebuild bounds from an inclusive substrate box.
    ///
    /// Inverted boxes are rejected as degenerate.
    pub fn from_aabb(aabb: &Aabb3D<i32>) -> MaskResult<Self> {
        let sx = i64::from(aabb.max_x) - i64::from(aabb.min_x) + 1;
        let sy = i64::from(aabb.max_y) - i64::from(aabb.min_y) + 1;
        let sz = i64::from(aabb.max_z) - i64::from(aabb.min_z) + 1;
        if sx <= 0 || sy <= 0 || sz <= 0 {
            return Err(MaskError::ZeroExtent {
                width: u32::try_from(sx.max(0)).unwrap_or(0),
                height: u32::try_from(sy.max(0)).unwrap_or(0),
                depth: u32::try_from(sz.max(0)).unwrap_or(0),
            });
        }
        let extent = Extent::new(
            u32::try_from(sx).map_err(|_| MaskError::CoordinateOverflow)?,
            u32::try_from(sy).map_err(|_| MaskError::CoordinateOverflow)?,
            u32::try_from(sz).map_err(|_| MaskError::CoordinateOverflow)?,
        );
        Self::new(IVec3::new(aabb.min_x, aabb.min_y, aabb.min_z), extent)
    }
}

/// Inclusive maximum on one axis, or an overflow error.
fn axis_max(min: i32, span: u32) -> MaskResult<i32> {
    // Callers have already rejected zero spans. Spans past 2^31 are fine as
    // long as the top corner lands within i32.
    let max = i64::from(min) + i64::from(span) - 1;
    i32::try_from(max).map_err(|_| MaskError::CoordinateOverflow)
}

/// Inclusive maximum on one axis of validated bounds.
#[allow(
    clippy::cast_possible_truncation,
    reason = "new() validates and span_u32() clamps so min + span - 1 fits i32"
)]
fn axis_top(min: i32, span: u32) -> i32 {
    (i64::from(min) + i64::from(span) - 1) as i32
}

/// Inclusive span of `[min, max]`, saturating so both the span fits `u32`
/// and `min + span - 1` fits `i32`.
fn span_u32(min: i32, max: i32) -> u32 {
    debug_assert!(min <= max, "span requires min <= max");
    let span = i64::from(max) - i64::from(min) + 1;
    let ceiling = i64::from(i32::MAX) - i64::from(min) + 1;
    u32::try_from(span.min(ceiling)).unwrap_or(u32::MAX)
}

/// Offset of a contained coordinate from the box corner.
#[allow(
    clippy::cast_possible_truncation,
    reason = "contained points are at most span - 1 voxels past the corner"
)]
fn local_offset(v: i32, origin: i32) -> u32 {
    debug_assert!(v >= origin, "offset requires a contained coordinate");
    (i64::from(v) - i64::from(origin)) as u32
}

fn checked_add(v: i32, delta: i32) -> MaskResult<i32> {
    v.checked_add(delta).ok_or(MaskError::CoordinateOverflow)
}

fn checked_sub_span(v: i32, by: u32) -> MaskResult<i32> {
    let by = i32::try_from(by).map_err(|_| MaskError::CoordinateOverflow)?;
    v.checked_sub(by).ok_or(MaskError::CoordinateOverflow)
}

fn grow_axis(span: u32, neg: u32, pos: u32) -> MaskResult<u32> {
    span.checked_add(neg)
        .and_then(|s| s.checked_add(pos))
        .ok_or(MaskError::CoordinateOverflow)
}
