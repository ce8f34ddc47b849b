//! Procedural base meshes.
//!
//! Small closed and open triangle meshes used as base levels by the CLI,
//! the benchmarks and the tests.

use nalgebra::Point3;

use super::level::LevelMesh;
use crate::error::Result;

/// A single triangle in the XY plane.
pub fn triangle() -> Result<LevelMesh> {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
    ];
    LevelMesh::new(vertices, vec![[0, 1, 2]])
}

/// A closed tetrahedron with outward-facing triangles.
pub fn tetrahedron() -> Result<LevelMesh> {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.5, 0.5, 1.0),
    ];
    let faces = vec![
        [0, 2, 1], // bottom
        [0, 1, 3], // front
        [1, 2, 3], // right
        [2, 0, 3], // left
    ];
    LevelMesh::new(vertices, faces)
}

/// A regular icosahedron inscribed in the unit sphere.
pub fn icosahedron() -> Result<LevelMesh> {
    let phi = (1.0 + 5.0_f64.sqrt()) * 0.5;
    let raw = [
        [-1.0, phi, 0.0],
        [1.0, phi, 0.0],
        [-1.0, -phi, 0.0],
        [1.0, -phi, 0.0],
        [0.0, -1.0, phi],
        [0.0, 1.0, phi],
        [0.0, -1.0, -phi],
        [0.0, 1.0, -phi],
        [phi, 0.0, -1.0],
        [phi, 0.0, 1.0],
        [-phi, 0.0, -1.0],
        [-phi, 0.0, 1.0],
    ];
    let vertices = raw
        .iter()
        .map(|&[x, y, z]| Point3::from(Point3::new(x, y, z).coords.normalize()))
        .collect();

    let faces = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    LevelMesh::new(vertices, faces)
}

/// An open `n` x `n` grid of unit squares in the XY plane, two triangles per
/// square.
pub fn grid(n: usize) -> Result<LevelMesh> {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    LevelMesh::new(vertices, faces)
}
