// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! On/off byte encodings for voxel buffers.

/// The pair of byte values a mask uses for set and cleared voxels.
///
/// Masks carry their own encoding, so two masks being compared may use
/// different byte pairs. The `on` and `off` values should differ; a mask
/// whose bytes are neither value reads as off.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryEncoding {
    /// Byte value meaning "voxel set".
    pub on: u8,
    /// Byte value meaning "voxel cleared".
    pub off: u8,
}

impl BinaryEncoding {
    /// Create an encoding from explicit on/off bytes.
    pub const fn new(on: u8, off: u8) -> Self {
        Self { on, off }
    }

    /// True if `byte` is this encoding's "on" value.
    pub const fn is_on(&self, byte: u8) -> bool {
        byte == self.on
    }
}

impl Default for BinaryEncoding {
    /// On is 255, off is 0.
    fn default() -> Self {
        Self { on: 255, off: 0 }
    }
}
