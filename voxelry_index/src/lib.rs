// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=voxelry_index --heading-base-level=0

//! Voxelry Index: a generic 3D AABB index (boundary index).
//!
//! Voxelry Index is a reusable building block for spatial queries.
//!
//! - Insert, update, and remove axis-aligned bounding boxes (AABBs) with user payloads.
//! - Query by point or intersecting box.
//! - Batch updates with [`Index::commit`] and receive coarse damage (added/removed/moved boxes).
//!
//! It is generic over the scalar type `T` and does not depend on any geometry crate.
//! Higher layers (like a voxel mask index) can compute world-space AABBs and feed them here.
//!
//! Backends are pluggable via a simple trait so you can swap the spatial strategy without API churn.
//! The default backend is a flat vector (linear scan).
//! Uniform grid backends are available for `i32` and `i64` with explicit origin offsets.
//! The R-tree backend is generic over the scalar and uses widened accumulator types
//! (`i32`→`i128`, `i64`→`i128`) for SAH-like splits.
//!
//! # Example
//!
//! ```rust
//! use voxelry_index::{Index, Aabb3D};
//!
//! // Create an index and add two boxes.
//! let mut idx: Index<i32, u32> = Index::new();
//! let k1 = idx.insert(Aabb3D::new(0, 0, 0, 10, 10, 10), 1);
//! let k2 = idx.insert(Aabb3D::new(5, 5, 5, 15, 15, 15), 2);
//! let _damage0 = idx.commit();
//!
//! // Move the first box and commit a damage set.
//! idx.update(k1, Aabb3D::new(20, 0, 0, 30, 10, 10));
//! let damage = idx.commit();
//! assert!(!damage.is_empty());
//!
//! // Query a point inside the second box.
//! let hits: Vec<_> = idx.query_point(6, 6, 6).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].1, 2);
//! ```
//!
//! You can opt into the grid backend if your data clusters into
//! similarly sized regions and you want simple tuning:
//!
//! ```rust
//! use voxelry_index::{Index, IndexGeneric, Aabb3D};
//!
//! // Use a 64×64×64 uniform grid (i32) for indexing.
//! let mut idx: IndexGeneric<i32, u32, voxelry_index::GridI32<u32>> =
//!     Index::<i32, u32>::with_uniform_grid(64, 64, 64);
//!
//! let _k = idx.insert(Aabb3D::new(0, 0, 0, 100, 100, 100), 1);
//! let _ = idx.commit();
//!
//! // Query a point.
//! let hits: Vec<_> = idx.query_point(10, 10, 10).collect();
//! assert_eq!(hits.len(), 1);
//! ```
//!
//! ## Choosing a backend
//!
//! - `FlatVec` (default): simplest and smallest, linear scans. Good for very small sets
//!   or when inserts/updates vastly outnumber queries.
//! - `GridI32`/`GridI64`: uniform grid; great locality and simple tuning. Provide
//!   `origin` offsets to keep cells aligned with your world. Choose cell size so most
//!   AABBs fall within a handful of cells. Queries report cell-level candidates.
//! - `RTreeI32`/`RTreeI64`: R-tree with SAH-like splits and widened metrics; good
//!   general-purpose index when distribution is irregular and updates are frequent.
//!   Supports packed bulk builds via [`Index::with_rtree_bulk`].
//!   See the [`backends`] docs for a brief SAH overview.
//!
//! ### Integer semantics
//!
//! Coordinates are plain integers; queries and splits are exact. SAH metrics are
//! computed in `i128`, so for `i64` coordinates keep per-axis extents below roughly
//! 2^42 to leave headroom for the volume products.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod damage;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::grid::{GridI32, GridI64};
pub use backends::rtree::{RTreeI32, RTreeI64};
pub use damage::Damage;
pub use index::{Index, IndexGeneric, Key};
pub use types::Aabb3D;
