//! Vertex normal computation.

use nalgebra::{Point3, Vector3};

/// Compute area-weighted vertex normals.
///
/// Each face contributes its unnormalized cross product (twice its area) to
/// its three corners. Vertices whose accumulated normal vanishes keep a zero
/// vector; local frame construction treats that as a degenerate normal.
pub fn compute_vertex_normals(positions: &[Point3<f64>], faces: &[[usize; 3]]) -> Vec<Vector3<f64>> {
    let mut normals = vec![Vector3::zeros(); positions.len()];

    for &[i0, i1, i2] in faces {
        let p0 = &positions[i0];
        let e1 = positions[i1] - p0;
        let e2 = positions[i2] - p0;
        let n = e1.cross(&e2);
        normals[i0] += n;
        normals[i1] += n;
        normals[i2] += n;
    }

    for n in &mut normals {
        let len = n.norm();
        if len > 0.0 {
            *n /= len;
        }
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_triangle_normals() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let normals = compute_vertex_normals(&positions, &[[0, 1, 2]]);
        for n in normals {
            assert!((n - Vector3::z()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_winding_flips_normal() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let normals = compute_vertex_normals(&positions, &[[0, 2, 1]]);
        assert!((normals[0] + Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_area_weighting() {
        // A large face in the XY plane and a small one in the XZ plane share vertex 0
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
            Point3::new(0.0, 0.0, -0.1),
        ];
        let faces = [[0, 1, 2], [0, 3, 1]];
        let normals = compute_vertex_normals(&positions, &faces);

        assert!((normals[0].norm() - 1.0).abs() < 1e-12);
        // Dominated by the large face
        assert!(normals[0].z > 0.99);
    }

    #[test]
    fn test_unreferenced_vertex_has_zero_normal() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 5.0, 5.0),
        ];
        let normals = compute_vertex_normals(&positions, &[[0, 1, 2]]);
        assert_eq!(normals[3], Vector3::zeros());
    }
}
