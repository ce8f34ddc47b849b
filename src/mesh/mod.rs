//! Resolution level data structures.
//!
//! This module provides the per-level mesh storage consumed by the
//! multiresolution algorithms in [`crate::algo::multires`].
//!
//! # Overview
//!
//! The primary type is [`LevelMesh`]: one mesh of a subdivision hierarchy
//! with positions, normals and colors sharing one indexing, a validated
//! triangle list, and the [`VertexRing`] one-ring tables derived from it.
//!
//! Levels above the base are produced by a [`Refinement`], which splits every
//! triangle into four and appends one vertex per coarse edge. Because coarse
//! vertices are never renumbered, the coarse level is an index prefix of the
//! fine one.
//!
//! # Construction
//!
//! ```
//! use multires::mesh::{build_level, Adjacency};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let level = build_level(&vertices, &faces).unwrap();
//! assert_eq!(level.ring().first_neighbor(0), 1);
//! ```

mod builder;
mod level;
mod normals;
pub mod primitives;
mod refine;
mod ring;

pub use builder::{build_level, build_level_with_colors, validate_triangles};
pub use level::{DetailBuffer, LevelMesh};
pub use normals::compute_vertex_normals;
pub use refine::{EdgeVertex, Refinement};
pub use ring::{Adjacency, VertexRing};
