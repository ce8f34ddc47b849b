//! # Multires
//!
//! Multiresolution editing for subdivided triangle meshes.
//!
//! A mesh is kept as a stack of resolution levels, each a 1-to-4 refinement
//! of the one below. The fine level stores its difference from a subdivision
//! prediction as detail vectors in per-vertex local frames, so edits made at
//! any level carry through to every other level.
//!
//! ## Features
//!
//! - **Level meshes**: positions, normals and colors with one-ring adjacency
//! - **Subdivision prediction**: midpoint and Loop schemes behind one trait
//! - **Detail codec**: frame-relative detail, exact round trip
//! - **Level stack**: add, select and delete resolution levels
//!
//! ## Quick Start
//!
//! ```
//! use multires::prelude::*;
//! use multires::mesh::primitives;
//! use nalgebra::Vector3;
//!
//! let base = primitives::icosahedron().unwrap();
//! let mut stack = Multimesh::new(base, SubdivisionScheme::Loop, MultiresOptions::default());
//! stack.add_level().unwrap();
//!
//! // Sculpt the fine level, go down to the base and back up
//! stack.selected_level_mut().positions_mut()[30] += Vector3::new(0.0, 0.0, 0.2);
//! stack.selected_level_mut().update_normals();
//! let sculpted = stack.selected_level().positions()[30];
//!
//! stack.select_resolution(0).unwrap();
//! stack.select_resolution(1).unwrap();
//! assert!((stack.selected_level().positions()[30] - sculpted).norm() < 1e-9);
//! ```
//!
//! ## Building Levels Programmatically
//!
//! ```
//! use multires::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let level = build_level(&vertices, &faces).unwrap();
//! assert_eq!(level.num_vertices(), 4);
//! assert_eq!(level.ring().valence(0), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use multires::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::multires::{higher_synthesis, lower_analysis, Multimesh, MultiresOptions};
    pub use crate::algo::subdivide::{SubdivisionOperator, SubdivisionScheme};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{build_level, Adjacency, DetailBuffer, LevelMesh, Refinement, VertexRing};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
