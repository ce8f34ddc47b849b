//! Error types for multires.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh and multiresolution operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no vertices or no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge has more than two incident faces.
    #[error("edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// A vertex is not referenced by any face, so it has no one-ring.
    #[error("vertex {vertex} has no neighbors")]
    IsolatedVertex {
        /// The isolated vertex.
        vertex: usize,
    },

    /// Two buffers that must share indexing have different lengths.
    #[error("size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Which buffer was mismatched.
        what: &'static str,
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        actual: usize,
    },

    /// The fine level is not a one-step refinement of the coarse level.
    #[error("level with {fine} vertices is not a refinement of a level with {coarse} vertices")]
    NotARefinement {
        /// Vertex count of the coarse level.
        coarse: usize,
        /// Vertex count of the fine level.
        fine: usize,
    },

    /// A local frame could not be built at a vertex (zero normal or tangent).
    #[error("degenerate local frame at vertex {vertex}")]
    DegenerateGeometry {
        /// The offending vertex.
        vertex: usize,
    },

    /// Subdivision would exceed the configured face budget.
    #[error("subdivision would exceed maximum mesh size ({current} -> {projected} faces, max {max})")]
    MeshTooLarge {
        /// Current face count.
        current: usize,
        /// Projected face count after subdivision.
        projected: usize,
        /// Maximum allowed face count.
        max: usize,
    },

    /// A resolution level index is outside the stack.
    #[error("resolution level {level} out of range (stack has {levels} levels)")]
    LevelOutOfRange {
        /// Requested level.
        level: usize,
        /// Number of levels in the stack.
        levels: usize,
    },

    /// Invalid mesh state for the requested operation.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Fail with [`MeshError::SizeMismatch`] unless `actual == expected`.
    pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(MeshError::SizeMismatch {
                what,
                expected,
                actual,
            })
        }
    }
}
