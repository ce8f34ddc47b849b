//! Detail encoding and decoding.
//!
//! [`compute_details`] measures how far a fine level deviates from its
//! predicted (detail-free) surface and stores the offsets in each vertex's
//! local frame. [`apply_details`] adds stored offsets back onto a freshly
//! predicted surface.
//!
//! Both directions build the frame of vertex `i` from the normal field
//! passed in and from the *predicted* position of `i`'s first ring
//! neighbor. Frames therefore depend only on the prediction, never on the
//! detail being measured, and the two functions invert each other up to
//! rounding.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::algo::subdivide::Prediction;
use crate::error::{MeshError, Result};
use crate::mesh::{Adjacency, DetailBuffer};

use super::{FrameOptions, MultiresOptions};

/// Compute the detail buffer of a fine level.
///
/// # Arguments
///
/// * `positions`, `colors` - The true geometry of the fine level
/// * `predicted` - The subdivision prediction for the same level
/// * `normals` - Normal field used for the frames
/// * `adjacency` - One-ring of the fine level
/// * `options` - Execution and frame parameters
///
/// For every vertex `i`, with `d = positions[i] - predicted[i]`:
/// `xyz[i] = (n·d, t·d, b·d)` and `rgb[i] = colors[i] - predicted_colors[i]`.
/// A vertex that sits exactly on its prediction gets an exactly zero detail.
pub fn compute_details<A: Adjacency + Sync>(
    positions: &[Point3<f64>],
    colors: &[Vector3<f64>],
    predicted: &Prediction,
    normals: &[Vector3<f64>],
    adjacency: &A,
    options: &MultiresOptions,
) -> Result<DetailBuffer> {
    let n = positions.len();
    MeshError::check_len("colors", n, colors.len())?;
    MeshError::check_len("predicted positions", n, predicted.positions.len())?;
    MeshError::check_len("predicted colors", n, predicted.colors.len())?;
    MeshError::check_len("normals", n, normals.len())?;
    MeshError::check_len("adjacency", n, adjacency.num_vertices())?;

    let frame_options = &options.frame;
    let encode = |i: usize| -> Result<(Vector3<f64>, Vector3<f64>, bool)> {
        let base = &predicted.positions[i];
        let reference = &predicted.positions[adjacency.first_neighbor(i)];
        let (frame, fallback) = frame_options.build(i, base, &normals[i], reference)?;

        let d = positions[i] - base;
        Ok((frame.to_local(&d), colors[i] - predicted.colors[i], fallback))
    };

    let encoded: Vec<(Vector3<f64>, Vector3<f64>, bool)> = if options.parallel {
        (0..n).into_par_iter().map(encode).collect::<Result<_>>()?
    } else {
        (0..n).map(encode).collect::<Result<_>>()?
    };

    let mut details = DetailBuffer {
        xyz: Vec::with_capacity(n),
        rgb: Vec::with_capacity(n),
    };
    let mut fallbacks = FallbackTally::default();
    for (i, (xyz, rgb, fallback)) in encoded.into_iter().enumerate() {
        details.xyz.push(xyz);
        details.rgb.push(rgb);
        fallbacks.record(i, fallback);
    }
    fallbacks.log("detail analysis");

    Ok(details)
}

/// Apply a detail buffer to a predicted surface, in place.
///
/// `positions` and `colors` hold the prediction on entry and the corrected
/// geometry on return. Frames are built from the pre-correction positions
/// of every vertex: corrected positions are written to a separate buffer
/// that replaces `positions` only after all vertices are processed. Colors
/// have no neighbor dependency and are updated in place.
///
/// On error nothing is modified.
pub fn apply_details<A: Adjacency + Sync>(
    positions: &mut Vec<Point3<f64>>,
    colors: &mut [Vector3<f64>],
    normals: &[Vector3<f64>],
    adjacency: &A,
    details: &DetailBuffer,
    options: &MultiresOptions,
) -> Result<()> {
    let n = positions.len();
    MeshError::check_len("colors", n, colors.len())?;
    MeshError::check_len("normals", n, normals.len())?;
    MeshError::check_len("adjacency", n, adjacency.num_vertices())?;
    MeshError::check_len("details", n, details.xyz.len())?;
    MeshError::check_len("color details", n, details.rgb.len())?;

    let frame_options: &FrameOptions = &options.frame;
    let current: &[Point3<f64>] = positions.as_slice();
    let decode = |i: usize| -> Result<(Point3<f64>, bool)> {
        let base = &current[i];
        let reference = &current[adjacency.first_neighbor(i)];
        let (frame, fallback) = frame_options.build(i, base, &normals[i], reference)?;

        Ok((base + frame.to_world(&details.xyz[i]), fallback))
    };

    let decoded: Vec<(Point3<f64>, bool)> = if options.parallel {
        (0..n).into_par_iter().map(decode).collect::<Result<_>>()?
    } else {
        (0..n).map(decode).collect::<Result<_>>()?
    };

    let mut corrected = Vec::with_capacity(n);
    let mut fallbacks = FallbackTally::default();
    for (i, (p, fallback)) in decoded.into_iter().enumerate() {
        corrected.push(p);
        fallbacks.record(i, fallback);
    }
    fallbacks.log("detail synthesis");

    *positions = corrected;
    for (c, dc) in colors.iter_mut().zip(&details.rgb) {
        *c += dc;
    }

    Ok(())
}

/// Counts vertices whose frame needed the fallback construction.
#[derive(Default)]
struct FallbackTally {
    count: usize,
    first: Option<usize>,
}

impl FallbackTally {
    #[inline]
    fn record(&mut self, vertex: usize, fallback: bool) {
        if fallback {
            self.count += 1;
            self.first.get_or_insert(vertex);
        }
    }

    fn log(&self, stage: &str) {
        if let Some(first) = self.first {
            log::warn!(
                "{}: {} degenerate frame(s) replaced by fallback axes (first at vertex {})",
                stage,
                self.count,
                first
            );
        }
    }
}
