//! Subdivision operators.
//!
//! A subdivision operator predicts the geometry of a fine level from the
//! level below it, following a fixed [`Refinement`] of the connectivity. It
//! never applies detail: the prediction is the smooth (or flat) surface the
//! multiresolution codec measures detail against.
//!
//! # Midpoint
//!
//! [`MidpointOperator`] keeps coarse vertices in place and puts every edge
//! vertex at its edge midpoint. The refined surface is geometrically
//! identical to the coarse one.
//!
//! # Loop
//!
//! [`LoopOperator`] applies Loop's (1987) approximating rules:
//!
//! - **Interior edge vertex**: `3/8 * (v0 + v1) + 1/8 * (v_left + v_right)`
//! - **Boundary edge vertex**: `1/2 * (v0 + v1)`
//! - **Interior vertex**: `(1 - n*β) * v + β * Σ(neighbors)`
//! - **Boundary vertex**: `1/8 * (left + right) + 3/4 * v`
//!
//! Colors are interpolated with the same weights as positions.
//!
//! # Example
//!
//! ```
//! use multires::algo::subdivide::{subdivide_level, SubdivisionScheme};
//! use multires::mesh::primitives;
//!
//! let base = primitives::icosahedron().unwrap();
//! let fine = subdivide_level(&base, &SubdivisionScheme::Loop).unwrap();
//! assert_eq!(fine.num_faces(), 80);
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.

mod loop_subdivision;
mod midpoint;

pub use loop_subdivision::LoopOperator;
pub use midpoint::MidpointOperator;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{LevelMesh, Refinement};

/// Predicted fine geometry, without detail.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted positions, one per fine vertex.
    pub positions: Vec<Point3<f64>>,
    /// Predicted colors, one per fine vertex.
    pub colors: Vec<Vector3<f64>>,
}

impl Prediction {
    /// Number of predicted vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the prediction is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Predicts fine geometry from a coarse level and a target refinement.
///
/// Implementations must be deterministic and must not depend on anything
/// but `coarse` and `target`.
pub trait SubdivisionOperator: Sync {
    /// Predict positions and colors for every vertex of the refined level.
    fn predict(&self, coarse: &LevelMesh, target: &Refinement) -> Result<Prediction>;
}

/// The built-in subdivision schemes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubdivisionScheme {
    /// Edge midpoints, coarse vertices untouched.
    Midpoint,
    /// Loop subdivision.
    #[default]
    Loop,
}

impl SubdivisionOperator for SubdivisionScheme {
    fn predict(&self, coarse: &LevelMesh, target: &Refinement) -> Result<Prediction> {
        match self {
            SubdivisionScheme::Midpoint => MidpointOperator::default().predict(coarse, target),
            SubdivisionScheme::Loop => LoopOperator::default().predict(coarse, target),
        }
    }
}

impl SubdivisionScheme {
    /// The scheme's operator with the given execution mode.
    ///
    /// Predicting through the enum directly always runs in parallel.
    pub fn operator(self, parallel: bool) -> Box<dyn SubdivisionOperator> {
        match self {
            SubdivisionScheme::Midpoint => {
                Box::new(MidpointOperator::default().with_parallel(parallel))
            }
            SubdivisionScheme::Loop => Box::new(LoopOperator::default().with_parallel(parallel)),
        }
    }
}

impl<S: SubdivisionOperator + ?Sized> SubdivisionOperator for Box<S> {
    fn predict(&self, coarse: &LevelMesh, target: &Refinement) -> Result<Prediction> {
        (**self).predict(coarse, target)
    }
}

/// Subdivide a level once: refine its connectivity and predict geometry.
///
/// The returned level carries its [`Refinement`] and no detail buffer.
pub fn subdivide_level<S: SubdivisionOperator + ?Sized>(
    coarse: &LevelMesh,
    operator: &S,
) -> Result<LevelMesh> {
    let (refinement, faces) = Refinement::refine(coarse.faces(), coarse.num_vertices());
    let prediction = operator.predict(coarse, &refinement)?;
    log::trace!(
        "subdivided level: {} -> {} vertices",
        coarse.num_vertices(),
        refinement.fine_vertices()
    );
    LevelMesh::refined(prediction.positions, prediction.colors, faces, refinement)
}

/// Check that `target` refines `coarse`.
pub(crate) fn check_target(coarse: &LevelMesh, target: &Refinement) -> Result<()> {
    if target.coarse_vertices() != coarse.num_vertices() {
        return Err(MeshError::NotARefinement {
            coarse: coarse.num_vertices(),
            fine: target.fine_vertices(),
        });
    }
    Ok(())
}
