//! Resolution level construction utilities.
//!
//! This module provides functions for building [`LevelMesh`] values from
//! face-vertex lists and for validating triangle lists before any adjacency
//! is derived from them.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::level::LevelMesh;
use crate::error::{MeshError, Result};

/// Build a base resolution level from vertices and triangle faces.
///
/// Colors start at zero and normals are computed from the positions.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Example
/// ```
/// use multires::mesh::build_level;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let level = build_level(&vertices, &faces).unwrap();
/// assert_eq!(level.num_vertices(), 3);
/// assert_eq!(level.num_faces(), 1);
/// ```
pub fn build_level(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<LevelMesh> {
    LevelMesh::new(vertices.to_vec(), faces.to_vec())
}

/// Build a base resolution level carrying per-vertex colors.
pub fn build_level_with_colors(
    vertices: &[Point3<f64>],
    colors: &[Vector3<f64>],
    faces: &[[usize; 3]],
) -> Result<LevelMesh> {
    LevelMesh::new(vertices.to_vec(), faces.to_vec())?.with_colors(colors.to_vec())
}

/// Validate a triangle list against a vertex count.
///
/// Rejects empty face lists, out-of-range indices, faces with repeated
/// corners and edges used by more than two faces.
pub fn validate_triangles(num_vertices: usize, faces: &[[usize; 3]]) -> Result<()> {
    if faces.is_empty() || num_vertices == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let mut edge_count: HashMap<(usize, usize), u32> = HashMap::with_capacity(faces.len() * 2);

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= num_vertices {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }

        for i in 0..3 {
            let v0 = face[i];
            let v1 = face[(i + 1) % 3];
            let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
            let count = edge_count.entry(key).or_insert(0);
            *count += 1;
            if *count > 2 {
                return Err(MeshError::NonManifoldEdge { v0: key.0, v1: key.1 });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        (vertices, vec![[0, 1, 2]])
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let level = build_level(&vertices, &faces).unwrap();

        assert_eq!(level.num_vertices(), 3);
        assert_eq!(level.num_faces(), 1);
        assert!(level.refinement().is_none());
        assert!(level.details().is_none());
        for n in level.normals() {
            assert!((n - Vector3::z()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_with_colors() {
        let (vertices, faces) = single_triangle();
        let colors = vec![Vector3::new(1.0, 0.0, 0.0); 3];
        let level = build_level_with_colors(&vertices, &colors, &faces).unwrap();
        assert_eq!(level.colors()[2], Vector3::new(1.0, 0.0, 0.0));

        let short = vec![Vector3::zeros(); 2];
        let result = build_level_with_colors(&vertices, &short, &faces);
        assert!(matches!(result, Err(MeshError::SizeMismatch { .. })));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]]; // Indices 1 and 2 are invalid

        let result = build_level(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = single_triangle();
        let faces = vec![[0, 0, 2]];

        let result = build_level(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_non_manifold_edge() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        // Edge (0, 1) is shared by three faces
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];

        let result = validate_triangles(vertices.len(), &faces);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { v0: 0, v1: 1 })));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(validate_triangles(3, &[]), Err(MeshError::EmptyMesh)));
        assert!(matches!(
            validate_triangles(0, &[[0, 1, 2]]),
            Err(MeshError::EmptyMesh)
        ));
    }
}
