// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for bounds and mask construction.

use thiserror::Error;

/// Result type for bounds and mask construction.
pub type MaskResult<T> = Result<T, MaskError>;

/// Errors that can occur constructing bounds or masks.
///
/// Construction is fail-fast: invalid geometry is rejected here, never at
/// query time. Query-time absence (unknown ids, empty results) is expressed
/// through empty collections and `Option`, not through this type.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MaskError {
    /// An extent axis was zero where a non-degenerate box is required.
    #[error("extent {width}x{height}x{depth} has a zero axis")]
    ZeroExtent {
        /// Size along x.
        width: u32,
        /// Size along y.
        height: u32,
        /// Size along z.
        depth: u32,
    },

    /// A voxel buffer length does not match its extent's volume.
    #[error("buffer holds {got} bytes but the extent needs {expected}")]
    BufferSizeMismatch {
        /// Bytes required by the extent.
        expected: usize,
        /// Bytes actually supplied.
        got: usize,
    },

    /// A corner or span does not fit the i32 coordinate range.
    #[error("coordinates overflow the i32 range")]
    CoordinateOverflow,
}
