//! Midpoint (linear) prediction.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::error::Result;
use crate::mesh::{EdgeVertex, LevelMesh, Refinement};

use super::{check_target, Prediction, SubdivisionOperator};

/// Linear subdivision: coarse vertices stay, edge vertices sit at edge
/// midpoints.
#[derive(Debug, Clone)]
pub struct MidpointOperator {
    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for MidpointOperator {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl MidpointOperator {
    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl SubdivisionOperator for MidpointOperator {
    fn predict(&self, coarse: &LevelMesh, target: &Refinement) -> Result<Prediction> {
        check_target(coarse, target)?;

        let positions = coarse.positions();
        let colors = coarse.colors();

        let midpoint = |edge: &EdgeVertex| -> (Point3<f64>, Vector3<f64>) {
            let [a, b] = edge.ends;
            (
                Point3::from((positions[a].coords + positions[b].coords) * 0.5),
                (colors[a] + colors[b]) * 0.5,
            )
        };

        let edge_points: Vec<(Point3<f64>, Vector3<f64>)> = if self.parallel {
            target.edges().par_iter().map(midpoint).collect()
        } else {
            target.edges().iter().map(midpoint).collect()
        };

        let mut out_positions = Vec::with_capacity(target.fine_vertices());
        let mut out_colors = Vec::with_capacity(target.fine_vertices());
        out_positions.extend_from_slice(positions);
        out_colors.extend_from_slice(colors);
        for (p, c) in edge_points {
            out_positions.push(p);
            out_colors.push(c);
        }

        Ok(Prediction {
            positions: out_positions,
            colors: out_colors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives;

    #[test]
    fn test_midpoint_single_triangle() {
        let coarse = primitives::triangle()
            .unwrap()
            .with_colors(vec![
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ])
            .unwrap();
        let (refinement, _) = Refinement::refine(coarse.faces(), coarse.num_vertices());

        let prediction = MidpointOperator::default().predict(&coarse, &refinement).unwrap();

        assert_eq!(prediction.len(), 6);
        assert_eq!(&prediction.positions[..3], coarse.positions());
        // Vertex 3 sits on edge (0, 1)
        assert!((prediction.positions[3] - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-12);
        assert!((prediction.positions[4] - Point3::new(0.75, 0.5, 0.0)).norm() < 1e-12);
        assert!((prediction.colors[3] - Vector3::new(0.5, 0.5, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let coarse = primitives::icosahedron().unwrap();
        let (refinement, _) = Refinement::refine(coarse.faces(), coarse.num_vertices());

        let par = MidpointOperator::default().predict(&coarse, &refinement).unwrap();
        let seq = MidpointOperator::default()
            .with_parallel(false)
            .predict(&coarse, &refinement)
            .unwrap();
        assert_eq!(par, seq);
    }
}
