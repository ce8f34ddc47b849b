//! Per-vertex local frames.
//!
//! A frame is a right-handed orthonormal basis (normal, tangent, bitangent)
//! attached to a vertex. The tangent points from the vertex toward a
//! reference neighbor, projected onto the plane orthogonal to the normal:
//!
//! 1. `n = normalize(N)`
//! 2. `t = normalize(r - n (r·n))` with `r = Q - P`
//! 3. `b = n × t`
//!
//! Given identical inputs the basis is bit-for-bit identical, which is what
//! makes stored detail vectors recoverable.
//!
//! The construction breaks down when `N` vanishes or when the reference
//! neighbor projects onto the vertex (coincident with it, or straight along
//! the normal). [`DegeneratePolicy`] decides what happens then.

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};

/// What to do when a frame cannot be built from the given inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DegeneratePolicy {
    /// Substitute a deterministic fallback axis: `+Z` for a vanishing
    /// normal, and the world axis least aligned with the normal for a
    /// vanishing tangent.
    #[default]
    Fallback,
    /// Fail with [`MeshError::DegenerateGeometry`] naming the vertex.
    Error,
}

/// Frame construction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOptions {
    /// Handling of degenerate normals and tangents.
    pub policy: DegeneratePolicy,
    /// Squared length below which a normal or projected tangent is
    /// considered degenerate.
    pub epsilon: f64,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            policy: DegeneratePolicy::Fallback,
            epsilon: 1e-12,
        }
    }
}

impl FrameOptions {
    /// Set the degenerate frame policy.
    pub fn with_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the degeneracy threshold (squared length).
    pub fn with_epsilon(mut self, epsilon: f64) -> Result<Self> {
        if !(epsilon.is_finite() && epsilon >= 0.0) {
            return Err(MeshError::invalid_param("epsilon", epsilon, "must be finite and non-negative"));
        }
        self.epsilon = epsilon;
        Ok(self)
    }

    /// Build the frame of `vertex`, applying the degenerate policy.
    ///
    /// The returned flag is true when the fallback construction was used.
    pub fn build(
        &self,
        vertex: usize,
        position: &Point3<f64>,
        normal: &Vector3<f64>,
        reference: &Point3<f64>,
    ) -> Result<(Frame, bool)> {
        if let Some(frame) = Frame::try_new(position, normal, reference, self.epsilon) {
            return Ok((frame, false));
        }
        match self.policy {
            DegeneratePolicy::Fallback => Ok((
                Frame::with_fallback(position, normal, reference, self.epsilon),
                true,
            )),
            DegeneratePolicy::Error => Err(MeshError::DegenerateGeometry { vertex }),
        }
    }
}

/// An orthonormal (normal, tangent, bitangent) basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Unit normal.
    pub normal: Vector3<f64>,
    /// Unit tangent, orthogonal to the normal.
    pub tangent: Vector3<f64>,
    /// `normal × tangent`.
    pub bitangent: Vector3<f64>,
}

impl Frame {
    /// Build a frame, or `None` if the normal or the projected tangent has
    /// squared length below `epsilon` or is not finite.
    pub fn try_new(
        position: &Point3<f64>,
        normal: &Vector3<f64>,
        reference: &Point3<f64>,
        epsilon: f64,
    ) -> Option<Self> {
        if !is_usable(normal.norm_squared(), epsilon) {
            return None;
        }
        let n = normal.normalize();
        let t = project_tangent(&n, &(reference - position), epsilon)?;
        Some(Self::from_unit(n, t))
    }

    /// Build a frame, substituting fallback axes for degenerate inputs.
    ///
    /// Identical to [`try_new`](Self::try_new) whenever that succeeds.
    pub fn with_fallback(
        position: &Point3<f64>,
        normal: &Vector3<f64>,
        reference: &Point3<f64>,
        epsilon: f64,
    ) -> Self {
        let n = if !is_usable(normal.norm_squared(), epsilon) {
            Vector3::z()
        } else {
            normal.normalize()
        };
        let t = project_tangent(&n, &(reference - position), epsilon)
            .or_else(|| project_tangent(&n, &least_aligned_axis(&n), 0.0))
            .unwrap_or_else(Vector3::x);
        Self::from_unit(n, t)
    }

    #[inline]
    fn from_unit(normal: Vector3<f64>, tangent: Vector3<f64>) -> Self {
        Self {
            normal,
            tangent,
            bitangent: normal.cross(&tangent),
        }
    }

    /// Express an object-space vector in frame coordinates, (n, t, b) order.
    #[inline]
    pub fn to_local(&self, d: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(self.normal.dot(d), self.tangent.dot(d), self.bitangent.dot(d))
    }

    /// Map frame coordinates, (n, t, b) order, back to object space.
    #[inline]
    pub fn to_world(&self, c: &Vector3<f64>) -> Vector3<f64> {
        self.normal * c.x + self.tangent * c.y + self.bitangent * c.z
    }
}

/// Remove the normal component of `r` and normalize the rest.
#[inline]
fn project_tangent(n: &Vector3<f64>, r: &Vector3<f64>, epsilon: f64) -> Option<Vector3<f64>> {
    let t = r - n * r.dot(n);
    let len2 = t.norm_squared();
    if is_usable(len2, epsilon) && len2 > 0.0 {
        Some(t / len2.sqrt())
    } else {
        None
    }
}

/// A squared length a frame axis can be normalized from: finite and at
/// least `epsilon`. NaN fails both.
#[inline]
fn is_usable(len2: f64, epsilon: f64) -> bool {
    len2.is_finite() && len2 >= epsilon
}

/// The world axis with the smallest component along `n` (x wins ties).
fn least_aligned_axis(n: &Vector3<f64>) -> Vector3<f64> {
    let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
    if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    }
}
