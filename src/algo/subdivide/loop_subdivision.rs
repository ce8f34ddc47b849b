//! Loop subdivision prediction for triangle meshes.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::error::Result;
use crate::mesh::{Adjacency, EdgeVertex, LevelMesh, Refinement};

use super::{check_target, Prediction, SubdivisionOperator};

/// Loop subdivision predictor.
///
/// Loop subdivision is an approximating scheme: coarse vertices move toward
/// the average of their neighbors, so the predicted fine level is a
/// smoothed version of the coarse one.
#[derive(Debug, Clone)]
pub struct LoopOperator {
    /// Whether to treat boundary edges with the boundary (curve) rules.
    /// If false, boundary vertices use the interior rule on their ring.
    pub preserve_boundary: bool,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for LoopOperator {
    fn default() -> Self {
        Self {
            preserve_boundary: true,
            parallel: true,
        }
    }
}

impl LoopOperator {
    /// Set whether to preserve boundary edges.
    pub fn with_preserve_boundary(mut self, preserve: bool) -> Self {
        self.preserve_boundary = preserve;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// A position and a color blended with the same weights.
type Sample = (Point3<f64>, Vector3<f64>);

impl SubdivisionOperator for LoopOperator {
    fn predict(&self, coarse: &LevelMesh, target: &Refinement) -> Result<Prediction> {
        check_target(coarse, target)?;

        let boundary_neighbors = if self.preserve_boundary {
            target.boundary_neighbors()
        } else {
            vec![Vec::new(); coarse.num_vertices()]
        };

        let vertex_point = |i: usize| compute_vertex_point(coarse, &boundary_neighbors, i);
        let edge_point = |edge: &EdgeVertex| compute_edge_point(coarse, edge, self.preserve_boundary);

        let (vertex_points, edge_points): (Vec<Sample>, Vec<Sample>) = if self.parallel {
            (
                (0..coarse.num_vertices()).into_par_iter().map(vertex_point).collect(),
                target.edges().par_iter().map(edge_point).collect(),
            )
        } else {
            (
                (0..coarse.num_vertices()).map(vertex_point).collect(),
                target.edges().iter().map(edge_point).collect(),
            )
        };

        let (positions, colors) = vertex_points.into_iter().chain(edge_points).unzip();
        Ok(Prediction { positions, colors })
    }
}

/// Compute the new position of an original vertex.
fn compute_vertex_point(coarse: &LevelMesh, boundary_neighbors: &[Vec<usize>], i: usize) -> Sample {
    let positions = coarse.positions();
    let colors = coarse.colors();
    let pos = positions[i];
    let col = colors[i];

    let boundary = &boundary_neighbors[i];
    if !boundary.is_empty() {
        if boundary.len() == 2 {
            // Regular boundary vertex: 1/8 * (left + right) + 3/4 * v
            let (l, r) = (boundary[0], boundary[1]);
            return (
                Point3::from(
                    (positions[l].coords + positions[r].coords) * (1.0 / 8.0)
                        + pos.coords * (3.0 / 4.0),
                ),
                (colors[l] + colors[r]) * (1.0 / 8.0) + col * (3.0 / 4.0),
            );
        }
        // Corner or irregular boundary: keep position
        return (pos, col);
    }

    let ring = coarse.ring().ring(i);
    let n = ring.len();
    let beta = compute_loop_beta(n);
    let neighbor_pos: Vector3<f64> = ring.iter().map(|&j| positions[j].coords).sum();
    let neighbor_col: Vector3<f64> = ring.iter().map(|&j| colors[j]).sum();
    let keep = 1.0 - n as f64 * beta;

    (
        Point3::from(pos.coords * keep + neighbor_pos * beta),
        col * keep + neighbor_col * beta,
    )
}

/// Compute the position of a vertex inserted on a coarse edge.
fn compute_edge_point(coarse: &LevelMesh, edge: &EdgeVertex, preserve_boundary: bool) -> Sample {
    let positions = coarse.positions();
    let colors = coarse.colors();
    let [a, b] = edge.ends;

    match edge.opposite {
        (left, Some(right)) => (
            Point3::from(
                (positions[a].coords + positions[b].coords) * (3.0 / 8.0)
                    + (positions[left].coords + positions[right].coords) * (1.0 / 8.0),
            ),
            (colors[a] + colors[b]) * (3.0 / 8.0) + (colors[left] + colors[right]) * (1.0 / 8.0),
        ),
        (left, None) if !preserve_boundary => {
            // Boundary edge smoothed like an interior edge with one wing
            (
                Point3::from(
                    (positions[a].coords + positions[b].coords) * (3.0 / 8.0)
                        + positions[left].coords * (1.0 / 4.0),
                ),
                (colors[a] + colors[b]) * (3.0 / 8.0) + colors[left] * (1.0 / 4.0),
            )
        }
        (_, None) => (
            Point3::from((positions[a].coords + positions[b].coords) * 0.5),
            (colors[a] + colors[b]) * 0.5,
        ),
    }
}

/// Compute the Loop subdivision beta coefficient for a vertex with n neighbors.
fn compute_loop_beta(n: usize) -> f64 {
    if n == 3 {
        3.0 / 16.0
    } else {
        // β = 1/n * (5/8 - (3/8 + 1/4 * cos(2π/n))²)
        let n_f = n as f64;
        let cos_term = (2.0 * std::f64::consts::PI / n_f).cos();
        let inner = 3.0 / 8.0 + 0.25 * cos_term;
        (1.0 / n_f) * (5.0 / 8.0 - inner * inner)
    }
}
