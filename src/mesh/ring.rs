//! One-ring adjacency tables.
//!
//! [`VertexRing`] stores, for every vertex, the ordered list of vertices it
//! shares an edge with. The tables are flattened: `start_count[v]` holds the
//! offset of `v`'s ring inside `neighbors` and the number of entries.
//!
//! The first neighbor of each ring is used as the tangent reference when
//! building local frames, so the ordering must be reproducible. Rings are
//! filled by visiting faces in order and, for every corner, appending the
//! next and then the previous corner when not already present. The same
//! face list always yields the same rings.

use crate::error::{MeshError, Result};

/// Access to the one-ring neighbors of the vertices of a mesh.
pub trait Adjacency {
    /// Number of vertices covered by the adjacency.
    fn num_vertices(&self) -> usize;

    /// Ordered neighbors of vertex `v`.
    fn ring(&self, v: usize) -> &[usize];

    /// The neighbor used as tangent reference for vertex `v`.
    #[inline]
    fn first_neighbor(&self, v: usize) -> usize {
        self.ring(v)[0]
    }
}

/// Flattened per-vertex neighbor lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexRing {
    start_count: Vec<[usize; 2]>,
    neighbors: Vec<usize>,
}

impl VertexRing {
    /// Build the one-ring tables of a triangle mesh.
    ///
    /// Every vertex must be referenced by at least one face; otherwise
    /// [`MeshError::IsolatedVertex`] is returned. Face indices are assumed
    /// to be in range (see [`validate_triangles`](super::validate_triangles)).
    pub fn from_triangles(num_vertices: usize, faces: &[[usize; 3]]) -> Result<Self> {
        let mut rings: Vec<Vec<usize>> = vec![Vec::with_capacity(6); num_vertices];

        for face in faces {
            for i in 0..3 {
                let v = face[i];
                let next = face[(i + 1) % 3];
                let prev = face[(i + 2) % 3];

                let ring = &mut rings[v];
                if !ring.contains(&next) {
                    ring.push(next);
                }
                if !ring.contains(&prev) {
                    ring.push(prev);
                }
            }
        }

        let mut start_count = Vec::with_capacity(num_vertices);
        let mut neighbors = Vec::with_capacity(rings.iter().map(Vec::len).sum());

        for (v, ring) in rings.into_iter().enumerate() {
            if ring.is_empty() {
                return Err(MeshError::IsolatedVertex { vertex: v });
            }
            start_count.push([neighbors.len(), ring.len()]);
            neighbors.extend(ring);
        }

        Ok(Self {
            start_count,
            neighbors,
        })
    }

    /// Number of neighbors (valence) of vertex `v`.
    #[inline]
    pub fn valence(&self, v: usize) -> usize {
        self.start_count[v][1]
    }

    /// Total number of stored neighbor entries.
    pub fn num_entries(&self) -> usize {
        self.neighbors.len()
    }

    /// Raw `(offset, count)` table, one entry per vertex.
    pub fn start_count(&self) -> &[[usize; 2]] {
        &self.start_count
    }

    /// Raw flattened neighbor table.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }
}

impl Adjacency for VertexRing {
    #[inline]
    fn num_vertices(&self) -> usize {
        self.start_count.len()
    }

    #[inline]
    fn ring(&self, v: usize) -> &[usize] {
        let [start, count] = self.start_count[v];
        &self.neighbors[start..start + count]
    }
}
