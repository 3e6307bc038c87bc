// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Voxel occupancy masks scoped to integer bounds.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use glam::{IVec3, UVec3};

use crate::bounds::Bounds;
use crate::encoding::BinaryEncoding;
use crate::error::{MaskError, MaskResult};
use crate::extent::Extent;

/// A voxel occupancy mask: bounds, an owned byte buffer, and an encoding.
///
/// The buffer holds exactly `extent.volume()` bytes in row-major order and is
/// exclusively owned; derivations ([`Self::shifted_by`], [`Self::flattened_z`],
/// [`Self::grown_by`]) copy it.
#[derive(Clone)]
pub struct VoxelMask {
    bounds: Bounds,
    bytes: Vec<u8>,
    encoding: BinaryEncoding,
}

impl VoxelMask {
    /// A mask with every voxel on.
    pub fn filled(bounds: Bounds, encoding: BinaryEncoding) -> Self {
        let bytes = vec![encoding.on; bounds.extent().volume()];
        Self {
            bounds,
            bytes,
            encoding,
        }
    }

    /// A mask with every voxel off.
    pub fn empty(bounds: Bounds, encoding: BinaryEncoding) -> Self {
        let bytes = vec![encoding.off; bounds.extent().volume()];
        Self {
            bounds,
            bytes,
            encoding,
        }
    }

    /// A mask over an existing buffer.
    ///
    /// The buffer length must equal the extent's volume.
    pub fn from_bytes(bounds: Bounds, bytes: Vec<u8>, encoding: BinaryEncoding) -> MaskResult<Self> {
        let expected = bounds.extent().volume();
        if bytes.len() != expected {
            return Err(MaskError::BufferSizeMismatch {
                expected,
                got: bytes.len(),
            });
        }
        Ok(Self {
            bounds,
            bytes,
            encoding,
        })
    }

    /// The mask's bounds.
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The mask's byte encoding.
    pub const fn encoding(&self) -> BinaryEncoding {
        self.encoding
    }

    /// The raw buffer, row-major within the bounds.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Set the voxel at a local position. Out-of-range positions are ignored.
    pub fn set_on(&mut self, local: UVec3) {
        self.paint(local, self.encoding.on);
    }

    /// Clear the voxel at a local position. Out-of-range positions are ignored.
    pub fn set_off(&mut self, local: UVec3) {
        self.paint(local, self.encoding.off);
    }

    fn paint(&mut self, local: UVec3, value: u8) {
        let e = self.bounds.extent();
        if e.contains(local.x, local.y, local.z) {
            let i = e.index_of(local.x, local.y, local.z);
            self.bytes[i] = value;
        }
    }

    /// True iff the world position lies in bounds and its voxel is on.
    pub fn is_on_at(&self, p: IVec3) -> bool {
        match self.bounds.to_local(p) {
            Some(l) => {
                let e = self.bounds.extent();
                self.encoding.is_on(self.bytes[e.index_of(l.x, l.y, l.z)])
            }
            None => false,
        }
    }

    /// Number of on voxels.
    pub fn on_voxel_count(&self) -> usize {
        self.bytes
            .iter()
            .filter(|&&b| self.encoding.is_on(b))
            .count()
    }

    /// The same mask with its corner moved by `delta`.
    pub fn shifted_by(&self, delta: IVec3) -> MaskResult<Self> {
        let bounds = self.bounds.shifted_by(delta)?;
        Ok(Self {
            bounds,
            bytes: self.bytes.clone(),
            encoding: self.encoding,
        })
    }

    /// A depth-1 projection: a voxel is on iff any slice is on at that (x, y).
    ///
    /// The projection keeps the original corner, including its z.
    pub fn flattened_z(&self) -> Self {
        let e = self.bounds.extent();
        let flat_extent = Extent::new(e.width, e.height, 1);
        let flat_bounds = Bounds::from_parts(self.bounds.corner(), flat_extent);
        let mut bytes = vec![self.encoding.off; flat_extent.volume()];
        for z in 0..e.depth {
            for y in 0..e.height {
                for x in 0..e.width {
                    if self.encoding.is_on(self.bytes[e.index_of(x, y, z)]) {
                        bytes[flat_extent.offset(x, y)] = self.encoding.on;
                    }
                }
            }
        }
        Self {
            bounds: flat_bounds,
            bytes,
            encoding: self.encoding,
        }
    }

    /// The mask enlarged by off voxels: `neg` on the low sides, `pos` on the
    /// high sides. The original content keeps its world position.
    pub fn grown_by(&self, neg: UVec3, pos: UVec3) -> MaskResult<Self> {
        let bounds = self.bounds.grown_by(neg, pos)?;
        let src = self.bounds.extent();
        let dst = bounds.extent();
        let mut bytes = vec![self.encoding.off; dst.volume()];
        let row = src.width as usize;
        for z in 0..src.depth {
            for y in 0..src.height {
                let s = src.index_of(0, y, z);
                let d = dst.index_of(neg.x, y + neg.y, z + neg.z);
                bytes[d..d + row].copy_from_slice(&self.bytes[s..s + row]);
            }
        }
        Ok(Self {
            bounds,
            bytes,
            encoding: self.encoding,
        })
    }
}

impl Debug for VoxelMask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VoxelMask")
            .field("bounds", &self.bounds)
            .field("encoding", &self.encoding)
            .field("on_voxels", &self.on_voxel_count())
            .finish_non_exhaustive()
    }
}
