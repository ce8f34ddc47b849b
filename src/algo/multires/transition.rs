//! Transitions between adjacent resolution levels.

use std::borrow::Cow;

use nalgebra::Vector3;

use crate::algo::subdivide::{Prediction, SubdivisionOperator};
use crate::error::{MeshError, Result};
use crate::mesh::{compute_vertex_normals, LevelMesh, Refinement};

use super::details::{apply_details, compute_details};
use super::{MultiresOptions, NormalSource};

/// Two adjacent levels related by one refinement step.
///
/// Construction checks that `fine` was refined from a level with exactly
/// `coarse`'s vertex count, so that `coarse` is an index prefix of `fine`.
#[derive(Debug)]
pub struct LevelPair<'a> {
    coarse: &'a mut LevelMesh,
    fine: &'a mut LevelMesh,
}

impl<'a> LevelPair<'a> {
    /// Pair two levels, checking that `fine` refines `coarse`.
    pub fn new(coarse: &'a mut LevelMesh, fine: &'a mut LevelMesh) -> Result<Self> {
        check_pair(coarse, fine)?;
        Ok(Self { coarse, fine })
    }

    /// The coarse side.
    pub fn coarse(&self) -> &LevelMesh {
        self.coarse
    }

    /// The fine side.
    pub fn fine(&self) -> &LevelMesh {
        self.fine
    }

    /// Refresh the coarse level and the fine level's details from the fine
    /// level's current geometry.
    pub fn lower_analysis<S: SubdivisionOperator + ?Sized>(
        &mut self,
        operator: &S,
        options: &MultiresOptions,
    ) -> Result<()> {
        analyse(self.fine, self.coarse, operator, options)
    }

    /// Regenerate the fine level from the coarse level and stored details.
    pub fn higher_synthesis<S: SubdivisionOperator + ?Sized>(
        &mut self,
        operator: &S,
        options: &MultiresOptions,
    ) -> Result<()> {
        synthesize(self.coarse, self.fine, operator, options)
    }
}

/// Go one level down: extract the coarse geometry from `fine` and store on
/// `fine` the details that recover it from `coarse`.
///
/// 1. The first `coarse.num_vertices()` positions and colors of `fine` are
///    copied into `coarse`.
/// 2. `fine` is predicted from `coarse`.
/// 3. The difference between `fine` and the prediction is encoded into
///    `fine`'s detail buffer.
///
/// On error neither level is modified.
pub fn lower_analysis<S: SubdivisionOperator + ?Sized>(
    fine: &mut LevelMesh,
    coarse: &mut LevelMesh,
    operator: &S,
    options: &MultiresOptions,
) -> Result<()> {
    check_pair(coarse, fine)?;
    analyse(fine, coarse, operator, options)
}

/// Go one level up: predict `fine` from `coarse` and apply `fine`'s stored
/// details to the prediction.
///
/// A fine level without a detail buffer (a freshly added level) becomes the
/// bare prediction. Fine normals are recomputed from the corrected
/// positions.
pub fn higher_synthesis<S: SubdivisionOperator + ?Sized>(
    coarse: &LevelMesh,
    fine: &mut LevelMesh,
    operator: &S,
    options: &MultiresOptions,
) -> Result<()> {
    check_pair(coarse, fine)?;
    synthesize(coarse, fine, operator, options)
}

fn analyse<S: SubdivisionOperator + ?Sized>(
    fine: &mut LevelMesh,
    coarse: &mut LevelMesh,
    operator: &S,
    options: &MultiresOptions,
) -> Result<()> {
    // Coarse and fine change only once the details are known
    let mut staged = coarse.clone();
    staged.copy_prefix_from(fine);
    staged.update_normals();

    let refinement = refinement_of(&staged, fine)?;
    let prediction = predict(&staged, fine, refinement, operator)?;
    let normals = frame_normals(fine, &prediction, options);

    let details = compute_details(
        fine.positions(),
        fine.colors(),
        &prediction,
        &normals,
        fine.ring(),
        options,
    )?;

    log::debug!(
        "analysis {} -> {} vertices, max detail {:.3e}",
        fine.num_vertices(),
        staged.num_vertices(),
        details.max_magnitude()
    );
    fine.set_details(details)?;
    *coarse = staged;
    Ok(())
}

fn synthesize<S: SubdivisionOperator + ?Sized>(
    coarse: &LevelMesh,
    fine: &mut LevelMesh,
    operator: &S,
    options: &MultiresOptions,
) -> Result<()> {
    let refinement = refinement_of(coarse, fine)?;
    let prediction = predict(coarse, fine, refinement, operator)?;

    let Some(details) = fine.details() else {
        log::debug!(
            "synthesis {} -> {} vertices without stored details",
            coarse.num_vertices(),
            fine.num_vertices()
        );
        fine.replace_geometry(prediction.positions, prediction.colors);
        fine.update_normals();
        return Ok(());
    };

    let normals = frame_normals(fine, &prediction, options);
    let Prediction {
        mut positions,
        mut colors,
    } = prediction;
    apply_details(&mut positions, &mut colors, &normals, fine.ring(), details, options)?;

    log::debug!(
        "synthesis {} -> {} vertices, max detail {:.3e}",
        coarse.num_vertices(),
        fine.num_vertices(),
        details.max_magnitude()
    );
    fine.replace_geometry(positions, colors);
    fine.update_normals();
    Ok(())
}

/// Run the operator and check the prediction covers every fine vertex.
fn predict<S: SubdivisionOperator + ?Sized>(
    coarse: &LevelMesh,
    fine: &LevelMesh,
    refinement: &Refinement,
    operator: &S,
) -> Result<Prediction> {
    let prediction = operator.predict(coarse, refinement)?;
    MeshError::check_len("predicted positions", fine.num_vertices(), prediction.positions.len())?;
    MeshError::check_len("predicted colors", fine.num_vertices(), prediction.colors.len())?;
    Ok(prediction)
}

/// The normal field frames are built from.
fn frame_normals<'a>(
    fine: &'a LevelMesh,
    prediction: &Prediction,
    options: &MultiresOptions,
) -> Cow<'a, [Vector3<f64>]> {
    match options.normals {
        NormalSource::Predicted => {
            Cow::Owned(compute_vertex_normals(&prediction.positions, fine.faces()))
        }
        NormalSource::Stored => Cow::Borrowed(fine.normals()),
    }
}

fn refinement_of<'a>(coarse: &LevelMesh, fine: &'a LevelMesh) -> Result<&'a Refinement> {
    fine.refinement()
        .filter(|r| r.coarse_vertices() == coarse.num_vertices())
        .ok_or(MeshError::NotARefinement {
            coarse: coarse.num_vertices(),
            fine: fine.num_vertices(),
        })
}

/// Check the level pair invariants: `fine` is a one-step refinement of a
/// level with `coarse`'s vertex and face counts.
fn check_pair(coarse: &LevelMesh, fine: &LevelMesh) -> Result<()> {
    let refinement = refinement_of(coarse, fine)?;
    MeshError::check_len("fine vertices", refinement.fine_vertices(), fine.num_vertices())?;
    MeshError::check_len("fine faces", coarse.num_faces() * 4, fine.num_faces())?;
    Ok(())
}
