//! One-step 1-to-4 connectivity refinement.
//!
//! Refinement inserts one vertex on every edge of a coarse triangle mesh and
//! splits every triangle into four. Coarse vertices keep their indices; edge
//! vertices are appended after them, numbered in order of first appearance
//! while visiting faces in order. The coarse mesh is therefore always an
//! index prefix of the fine mesh.

use std::collections::HashMap;

/// A vertex inserted on a coarse edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeVertex {
    /// Coarse endpoints of the edge (smaller index first).
    pub ends: [usize; 2],
    /// Coarse vertex opposite the edge in the first incident face, and in
    /// the second one for interior edges.
    pub opposite: (usize, Option<usize>),
}

impl EdgeVertex {
    /// Whether the edge lies on the mesh boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.opposite.1.is_none()
    }
}

/// How a fine level was derived from the level below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refinement {
    coarse_vertices: usize,
    edges: Vec<EdgeVertex>,
}

impl Refinement {
    /// Refine a coarse triangle list.
    ///
    /// Returns the refinement record and the fine face list. Each coarse
    /// face `[v0, v1, v2]` becomes `[v0, e01, e20]`, `[v1, e12, e01]`,
    /// `[v2, e20, e12]` and `[e01, e12, e20]`.
    pub fn refine(coarse_faces: &[[usize; 3]], coarse_vertices: usize) -> (Self, Vec<[usize; 3]>) {
        let mut lookup: HashMap<(usize, usize), usize> = HashMap::with_capacity(coarse_faces.len() * 3 / 2 + 1);
        let mut edges: Vec<EdgeVertex> = Vec::with_capacity(coarse_faces.len() * 3 / 2 + 1);

        for face in coarse_faces {
            for i in 0..3 {
                let v0 = face[i];
                let v1 = face[(i + 1) % 3];
                let opposite = face[(i + 2) % 3];
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };

                match lookup.get(&key) {
                    Some(&e) => edges[e].opposite.1 = Some(opposite),
                    None => {
                        lookup.insert(key, edges.len());
                        edges.push(EdgeVertex {
                            ends: [key.0, key.1],
                            opposite: (opposite, None),
                        });
                    }
                }
            }
        }

        let edge_vertex = |a: usize, b: usize| -> usize {
            let key = if a < b { (a, b) } else { (b, a) };
            coarse_vertices + lookup[&key]
        };

        let mut fine_faces = Vec::with_capacity(coarse_faces.len() * 4);
        for &[v0, v1, v2] in coarse_faces {
            let e01 = edge_vertex(v0, v1);
            let e12 = edge_vertex(v1, v2);
            let e20 = edge_vertex(v2, v0);

            fine_faces.push([v0, e01, e20]);
            fine_faces.push([v1, e12, e01]);
            fine_faces.push([v2, e20, e12]);
            fine_faces.push([e01, e12, e20]);
        }

        (
            Self {
                coarse_vertices,
                edges,
            },
            fine_faces,
        )
    }

    /// Number of vertices of the coarse level.
    #[inline]
    pub fn coarse_vertices(&self) -> usize {
        self.coarse_vertices
    }

    /// Number of vertices of the fine level.
    #[inline]
    pub fn fine_vertices(&self) -> usize {
        self.coarse_vertices + self.edges.len()
    }

    /// Inserted edge vertices, in fine index order after the coarse prefix.
    #[inline]
    pub fn edges(&self) -> &[EdgeVertex] {
        &self.edges
    }

    /// For every coarse vertex, the coarse vertices it is joined to by a
    /// boundary edge. Empty for interior vertices.
    pub fn boundary_neighbors(&self) -> Vec<Vec<usize>> {
        let mut boundary: Vec<Vec<usize>> = vec![Vec::new(); self.coarse_vertices];

        for edge in self.edges.iter().filter(|e| e.is_boundary()) {
            let [a, b] = edge.ends;
            boundary[a].push(b);
            boundary[b].push(a);
        }

        boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refine_single_triangle() {
        let (refinement, faces) = Refinement::refine(&[[0, 1, 2]], 3);

        assert_eq!(refinement.coarse_vertices(), 3);
        assert_eq!(refinement.fine_vertices(), 6);
        assert_eq!(faces.len(), 4);

        // Edges numbered in order of first appearance
        assert_eq!(refinement.edges()[0].ends, [0, 1]);
        assert_eq!(refinement.edges()[1].ends, [1, 2]);
        assert_eq!(refinement.edges()[2].ends, [0, 2]);
        assert!(refinement.edges().iter().all(EdgeVertex::is_boundary));

        assert_eq!(faces[0], [0, 3, 5]);
        assert_eq!(faces[3], [3, 4, 5]);
    }

    #[test]
    fn test_refine_two_triangles() {
        let (refinement, faces) = Refinement::refine(&[[0, 1, 2], [0, 3, 1]], 4);

        // 4 original + 5 edge vertices
        assert_eq!(refinement.fine_vertices(), 9);
        assert_eq!(faces.len(), 8);

        let shared = refinement.edges()[0];
        assert_eq!(shared.ends, [0, 1]);
        assert_eq!(shared.opposite, (2, Some(3)));
        assert!(!shared.is_boundary());
    }

    #[test]
    fn test_refine_preserves_coarse_prefix() {
        let coarse = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let (refinement, faces) = Refinement::refine(&coarse, 4);

        // Every fine face has exactly one coarse corner, except the center ones
        let with_coarse = faces.iter().filter(|f| f.iter().any(|&v| v < 4)).count();
        assert_eq!(with_coarse, 12);
        assert!(faces.iter().flatten().all(|&v| v < refinement.fine_vertices()));
        // Closed tetrahedron: 6 edges, none on the boundary
        assert_eq!(refinement.edges().len(), 6);
        assert!(refinement.edges().iter().all(|e| !e.is_boundary()));
    }

    #[test]
    fn test_boundary_neighbors() {
        let (refinement, _) = Refinement::refine(&[[0, 1, 2], [0, 3, 1]], 4);
        let boundary = refinement.boundary_neighbors();

        // Vertex 0 lies on boundary edges (0, 2) and (0, 3)
        let mut b0 = boundary[0].clone();
        b0.sort_unstable();
        assert_eq!(b0, vec![2, 3]);
        assert_eq!(boundary[2].len(), 2);

        let (closed, _) = Refinement::refine(&[[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]], 4);
        assert!(closed.boundary_neighbors().iter().all(Vec::is_empty));
    }
}
