//! A stack of resolution levels with one selected level.

use crate::algo::subdivide::{subdivide_level, SubdivisionOperator, SubdivisionScheme};
use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{DetailBuffer, LevelMesh};

use super::transition::{higher_synthesis, lower_analysis};
use super::MultiresOptions;

/// A multiresolution mesh: levels `0..n`, each a 1-to-4 refinement of the
/// one below, and a selected level that edits are made on.
///
/// Changing the selected level cascades analysis downward or synthesis
/// upward one level at a time, so an edit on any level propagates to every
/// level the next selection passes through.
///
/// # Example
///
/// ```
/// use multires::algo::multires::{Multimesh, MultiresOptions};
/// use multires::algo::subdivide::SubdivisionScheme;
/// use multires::mesh::primitives;
///
/// let base = primitives::icosahedron().unwrap();
/// let mut stack = Multimesh::new(base, SubdivisionScheme::Loop, MultiresOptions::default());
/// stack.add_level().unwrap();
/// stack.add_level().unwrap();
/// assert_eq!(stack.num_levels(), 3);
/// assert_eq!(stack.selected_level().num_faces(), 320);
///
/// stack.select_resolution(0).unwrap();
/// assert_eq!(stack.selected_level().num_faces(), 20);
/// ```
#[derive(Debug)]
pub struct Multimesh<S: SubdivisionOperator = SubdivisionScheme> {
    levels: Vec<LevelMesh>,
    selected: usize,
    operator: S,
    options: MultiresOptions,
}

impl<S: SubdivisionOperator> Multimesh<S> {
    /// Start a stack from a base level.
    ///
    /// Any refinement or details the base carries are dropped.
    pub fn new(mut base: LevelMesh, operator: S, options: MultiresOptions) -> Self {
        base.detach();
        Self {
            levels: vec![base],
            selected: 0,
            operator,
            options,
        }
    }

    /// Number of levels.
    #[inline]
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Index of the selected level.
    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Level `i`, if it exists.
    pub fn level(&self, i: usize) -> Option<&LevelMesh> {
        self.levels.get(i)
    }

    /// All levels, coarsest first.
    pub fn levels(&self) -> &[LevelMesh] {
        &self.levels
    }

    /// The selected level.
    pub fn selected_level(&self) -> &LevelMesh {
        &self.levels[self.selected]
    }

    /// The selected level, for editing.
    pub fn selected_level_mut(&mut self) -> &mut LevelMesh {
        &mut self.levels[self.selected]
    }

    /// The subdivision operator.
    pub fn operator(&self) -> &S {
        &self.operator
    }

    /// The transition options.
    pub fn options(&self) -> &MultiresOptions {
        &self.options
    }

    /// Subdivide the highest level and select the result.
    ///
    /// The new level starts with zero details. Fails with
    /// [`MeshError::InvalidState`] unless the highest level is selected,
    /// and with [`MeshError::MeshTooLarge`] if the new level would exceed
    /// the face budget.
    pub fn add_level(&mut self) -> Result<&LevelMesh> {
        let top = self.levels.len() - 1;
        if self.selected != top {
            return Err(MeshError::InvalidState(format!(
                "cannot add a level while level {} of {} is selected",
                self.selected,
                self.levels.len()
            )));
        }

        let current = self.levels[top].num_faces();
        let projected = current.saturating_mul(4);
        if projected > self.options.max_faces {
            return Err(MeshError::MeshTooLarge {
                current,
                projected,
                max: self.options.max_faces,
            });
        }

        let mut fine = subdivide_level(&self.levels[top], &self.operator)?;
        fine.set_details(DetailBuffer::zeros(fine.num_vertices()))?;
        log::info!(
            "added level {}: {} vertices, {} faces",
            top + 1,
            fine.num_vertices(),
            fine.num_faces()
        );

        self.levels.push(fine);
        self.selected = top + 1;
        Ok(&self.levels[self.selected])
    }

    /// Select another level, propagating edits through every level in
    /// between.
    pub fn select_resolution(&mut self, level: usize) -> Result<()> {
        self.select_resolution_with_progress(level, &Progress::none())
    }

    /// Select another level, reporting each analysis or synthesis step.
    pub fn select_resolution_with_progress(&mut self, level: usize, progress: &Progress) -> Result<()> {
        if level >= self.levels.len() {
            return Err(MeshError::LevelOutOfRange {
                level,
                levels: self.levels.len(),
            });
        }

        let from = self.selected;
        let total = from.abs_diff(level);
        if level < from {
            for (step, i) in (level..from).rev().enumerate() {
                progress.report(step, total, "Analysis");
                let (lower, upper) = self.levels.split_at_mut(i + 1);
                lower_analysis(&mut upper[0], &mut lower[i], &self.operator, &self.options)?;
                self.selected = i;
            }
            progress.report(total, total, "Analysis");
        } else if level > from {
            for (step, i) in (from..level).enumerate() {
                progress.report(step, total, "Synthesis");
                let (lower, upper) = self.levels.split_at_mut(i + 1);
                higher_synthesis(&lower[i], &mut upper[0], &self.operator, &self.options)?;
                self.selected = i + 1;
            }
            progress.report(total, total, "Synthesis");
        }

        log::debug!("selected level {} (was {})", self.selected, from);
        Ok(())
    }

    /// Delete every level below the selected one. The selected level
    /// becomes the base.
    pub fn delete_lower(&mut self) -> Result<()> {
        if self.selected == 0 {
            return Err(MeshError::InvalidState(
                "no level below the selected level".to_string(),
            ));
        }
        self.levels.drain(..self.selected);
        self.levels[0].detach();
        log::debug!("deleted {} lower levels", self.selected);
        self.selected = 0;
        Ok(())
    }

    /// Delete every level above the selected one.
    pub fn delete_higher(&mut self) -> Result<()> {
        if self.selected + 1 == self.levels.len() {
            return Err(MeshError::InvalidState(
                "no level above the selected level".to_string(),
            ));
        }
        log::debug!("deleted {} higher levels", self.levels.len() - self.selected - 1);
        self.levels.truncate(self.selected + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::subdivide::MidpointOperator;
    use crate::mesh::primitives;
    use nalgebra::Vector3;
    use std::sync::{Arc, Mutex};

    fn stack(levels: usize) -> Multimesh {
        let base = primitives::icosahedron().unwrap();
        let mut stack = Multimesh::new(base, SubdivisionScheme::Loop, MultiresOptions::default());
        for _ in 1..levels {
            stack.add_level().unwrap();
        }
        stack
    }

    #[test]
    fn test_add_level() {
        let stack = stack(3);
        assert_eq!(stack.num_levels(), 3);
        assert_eq!(stack.selected(), 2);

        let counts: Vec<_> = stack.levels().iter().map(|l| l.num_vertices()).collect();
        assert_eq!(counts, vec![12, 42, 162]);
        assert!(stack.level(0).unwrap().refinement().is_none());
        let details = stack.level(2).unwrap().details().unwrap();
        assert_eq!(details.max_magnitude(), 0.0);
    }

    #[test]
    fn test_add_level_requires_top_selected() {
        let mut stack = stack(2);
        stack.select_resolution(0).unwrap();
        assert!(matches!(stack.add_level(), Err(MeshError::InvalidState(_))));
    }

    #[test]
    fn test_add_level_face_budget() {
        let base = primitives::icosahedron().unwrap();
        let options = MultiresOptions::default().with_max_faces(100);
        let mut stack = Multimesh::new(base, MidpointOperator::default(), options);
        stack.add_level().unwrap();

        let result = stack.add_level();
        assert!(matches!(
            result,
            Err(MeshError::MeshTooLarge {
                current: 80,
                projected: 320,
                max: 100
            })
        ));
        assert_eq!(stack.num_levels(), 2);
    }

    #[test]
    fn test_edit_survives_level_switch() {
        let mut stack = stack(3);
        let bump = Vector3::new(0.0, 0.0, 0.05);
        stack.selected_level_mut().positions_mut()[100] += bump;
        stack.selected_level_mut().update_normals();
        let edited = stack.selected_level().positions().to_vec();

        stack.select_resolution(0).unwrap();
        stack.select_resolution(2).unwrap();
        for (a, b) in stack.selected_level().positions().iter().zip(&edited) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn test_coarse_edit_propagates_up() {
        let mut stack = stack(3);
        stack.select_resolution(0).unwrap();
        let shift = Vector3::new(1.0, 2.0, 3.0);
        let before = stack.level(2).unwrap().positions().to_vec();
        for p in stack.selected_level_mut().positions_mut() {
            *p += shift;
        }
        stack.selected_level_mut().update_normals();

        stack.select_resolution(2).unwrap();
        for (a, b) in stack.selected_level().positions().iter().zip(&before) {
            assert!((a - (b + shift)).norm() < 1e-9);
        }
    }

    #[test]
    fn test_select_out_of_range() {
        let mut stack = stack(2);
        assert!(matches!(
            stack.select_resolution(2),
            Err(MeshError::LevelOutOfRange { level: 2, levels: 2 })
        ));
        assert_eq!(stack.selected(), 1);
    }

    #[test]
    fn test_progress_steps() {
        let mut stack = stack(3);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, message| {
            sink.lock().unwrap().push((current, total, message.to_string()));
        });

        stack.select_resolution_with_progress(0, &progress).unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], (2, 2, "Analysis".to_string()));
    }

    #[test]
    fn test_delete_lower() {
        let mut stack = stack(3);
        stack.select_resolution(1).unwrap();
        stack.delete_lower().unwrap();

        assert_eq!(stack.num_levels(), 2);
        assert_eq!(stack.selected(), 0);
        assert_eq!(stack.selected_level().num_vertices(), 42);
        assert!(stack.selected_level().refinement().is_none());
        assert!(stack.selected_level().details().is_none());
        assert!(stack.delete_lower().is_err());

        // The remaining pair still transitions
        stack.select_resolution(1).unwrap();
        assert_eq!(stack.selected_level().num_vertices(), 162);
    }

    #[test]
    fn test_delete_higher() {
        let mut stack = stack(3);
        assert!(stack.delete_higher().is_err());
        stack.select_resolution(1).unwrap();
        stack.delete_higher().unwrap();
        assert_eq!(stack.num_levels(), 2);
        assert_eq!(stack.selected(), 1);
        stack.add_level().unwrap();
        assert_eq!(stack.num_levels(), 3);
    }
}
