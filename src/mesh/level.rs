//! Resolution level storage.

use nalgebra::{Point3, Vector3};

use super::builder::validate_triangles;
use super::normals::compute_vertex_normals;
use super::refine::Refinement;
use super::ring::VertexRing;
use crate::error::{MeshError, Result};

/// Per-vertex detail stored on the fine side of a level pair.
///
/// `xyz` holds displacements in local frame coordinates, ordered
/// (normal, tangent, bitangent). `rgb` holds raw additive color deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailBuffer {
    /// Frame-relative displacement per vertex, (n, t, b) order.
    pub xyz: Vec<Vector3<f64>>,
    /// Color correction per vertex.
    pub rgb: Vec<Vector3<f64>>,
}

impl DetailBuffer {
    /// A buffer of `n` zero details.
    pub fn zeros(n: usize) -> Self {
        Self {
            xyz: vec![Vector3::zeros(); n],
            rgb: vec![Vector3::zeros(); n],
        }
    }

    /// Number of vertices covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.xyz.len()
    }

    /// Whether the buffer covers no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xyz.is_empty()
    }

    /// Largest displacement magnitude in the buffer.
    pub fn max_magnitude(&self) -> f64 {
        self.xyz.iter().map(|d| d.norm()).fold(0.0, f64::max)
    }
}

/// One mesh of a subdivision hierarchy.
///
/// Positions, normals and colors share indexing and always have the same
/// length. Faces are validated on construction and the one-ring tables are
/// derived from them once. A level produced by subdividing another level
/// carries the [`Refinement`] that relates the two, and once analysed, the
/// [`DetailBuffer`] that lets it be resynthesized from the level below.
#[derive(Debug, Clone)]
pub struct LevelMesh {
    positions: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
    colors: Vec<Vector3<f64>>,
    faces: Vec<[usize; 3]>,
    ring: VertexRing,
    refinement: Option<Refinement>,
    details: Option<DetailBuffer>,
}

impl LevelMesh {
    /// Create a level from positions and triangle faces.
    ///
    /// Colors start at zero and normals are computed from the positions.
    pub fn new(positions: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Result<Self> {
        validate_triangles(positions.len(), &faces)?;
        let ring = VertexRing::from_triangles(positions.len(), &faces)?;
        let normals = compute_vertex_normals(&positions, &faces);
        let colors = vec![Vector3::zeros(); positions.len()];

        Ok(Self {
            positions,
            normals,
            colors,
            faces,
            ring,
            refinement: None,
            details: None,
        })
    }

    /// Create the fine level of a refinement with the given geometry.
    pub(crate) fn refined(
        positions: Vec<Point3<f64>>,
        colors: Vec<Vector3<f64>>,
        faces: Vec<[usize; 3]>,
        refinement: Refinement,
    ) -> Result<Self> {
        MeshError::check_len("refined positions", refinement.fine_vertices(), positions.len())?;
        let mut level = Self::new(positions, faces)?.with_colors(colors)?;
        level.refinement = Some(refinement);
        Ok(level)
    }

    /// Replace the vertex colors.
    pub fn with_colors(mut self, colors: Vec<Vector3<f64>>) -> Result<Self> {
        MeshError::check_len("colors", self.positions.len(), colors.len())?;
        self.colors = colors;
        Ok(self)
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Mutable vertex positions, for editing a level in place.
    ///
    /// Normals are not refreshed automatically; call
    /// [`update_normals`](Self::update_normals) after editing.
    #[inline]
    pub fn positions_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.positions
    }

    /// Vertex normals.
    #[inline]
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Vertex colors.
    #[inline]
    pub fn colors(&self) -> &[Vector3<f64>] {
        &self.colors
    }

    /// Mutable vertex colors.
    #[inline]
    pub fn colors_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.colors
    }

    /// Triangle faces.
    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// One-ring adjacency.
    #[inline]
    pub fn ring(&self) -> &VertexRing {
        &self.ring
    }

    /// Refinement relating this level to the level below, if any.
    #[inline]
    pub fn refinement(&self) -> Option<&Refinement> {
        self.refinement.as_ref()
    }

    /// Stored detail buffer, if this level has been analysed.
    #[inline]
    pub fn details(&self) -> Option<&DetailBuffer> {
        self.details.as_ref()
    }

    /// Recompute vertex normals from the current positions.
    pub fn update_normals(&mut self) {
        self.normals = compute_vertex_normals(&self.positions, &self.faces);
    }

    /// Attach a detail buffer.
    pub fn set_details(&mut self, details: DetailBuffer) -> Result<()> {
        MeshError::check_len("details", self.positions.len(), details.len())?;
        MeshError::check_len("color details", self.positions.len(), details.rgb.len())?;
        self.details = Some(details);
        Ok(())
    }

    /// Drop the detail buffer.
    pub fn clear_details(&mut self) {
        self.details = None;
    }

    /// Turn this level into a base level: forget its refinement and details.
    pub fn detach(&mut self) {
        self.refinement = None;
        self.details = None;
    }

    /// Copy the first `positions.len()` positions and colors from another
    /// level (the fine side of a pair) into this one.
    pub(crate) fn copy_prefix_from(&mut self, fine: &LevelMesh) {
        let n = self.positions.len();
        self.positions.copy_from_slice(&fine.positions[..n]);
        self.colors.copy_from_slice(&fine.colors[..n]);
    }

    /// Replace geometry buffers wholesale. Lengths must already match.
    pub(crate) fn replace_geometry(&mut self, positions: Vec<Point3<f64>>, colors: Vec<Vector3<f64>>) {
        debug_assert_eq!(positions.len(), self.positions.len());
        debug_assert_eq!(colors.len(), self.colors.len());
        self.positions = positions;
        self.colors = colors;
    }

    /// Axis-aligned bounding box.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.positions.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &self.positions[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some((min, max))
    }
}
