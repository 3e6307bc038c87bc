// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Voxel volume sizes and row-major addressing.

/// Size of a voxel volume along the three axes.
///
/// Buffer addressing is row-major: x varies fastest, then y, then z.
/// `volume()` assumes the product of the axes fits `usize`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Size along x.
    pub width: u32,
    /// Size along y.
    pub height: u32,
    /// Size along z.
    pub depth: u32,
}

impl Extent {
    /// Create an extent. Axes may be zero here; [`Bounds`](crate::Bounds)
    /// construction rejects degenerate extents.
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Number of voxels in the volume.
    pub const fn volume(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// True if any axis is zero.
    pub const fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }

    /// True if the local position lies within the volume.
    pub const fn contains(&self, x: u32, y: u32, z: u32) -> bool {
        x < self.width && y < self.height && z < self.depth
    }

    /// Buffer offset of a local position within one z-slice.
    ///
    /// Only valid for `x < width`, `y < height`.
    pub const fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Buffer index of a local position in the full volume.
    ///
    /// Only valid for positions where [`Self::contains`] is true.
    pub const fn index_of(&self, x: u32, y: u32, z: u32) -> usize {
        (z as usize * self.height as usize + y as usize) * self.width as usize + x as usize
    }
}
