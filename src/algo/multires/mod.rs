//! Multiresolution analysis and synthesis.
//!
//! A multiresolution mesh is a stack of levels, each one a 1-to-4
//! refinement of the level below. Moving between two adjacent levels goes
//! through a subdivision prediction and a per-vertex detail buffer:
//!
//! - **Analysis** ([`lower_analysis`]): the coarse level takes the fine
//!   level's index prefix as its geometry, the fine level is predicted from
//!   it, and the difference between the true and the predicted fine surface
//!   is stored on the fine level.
//! - **Synthesis** ([`higher_synthesis`]): the fine level is predicted from
//!   the (possibly edited) coarse level and the stored details are added
//!   back on top.
//!
//! Details are expressed in a local [`Frame`] per vertex, so a rigid motion
//! of the coarse level carries the fine detail along with it.
//!
//! # Example
//!
//! ```
//! use multires::algo::multires::{higher_synthesis, lower_analysis, MultiresOptions};
//! use multires::algo::subdivide::{subdivide_level, SubdivisionScheme};
//! use multires::mesh::primitives;
//! use nalgebra::Vector3;
//!
//! let mut coarse = primitives::icosahedron().unwrap();
//! let scheme = SubdivisionScheme::Loop;
//! let mut fine = subdivide_level(&coarse, &scheme).unwrap();
//! let options = MultiresOptions::default();
//!
//! // Sculpt the fine level
//! fine.positions_mut()[20] += Vector3::new(0.0, 0.1, 0.0);
//! fine.update_normals();
//! let sculpted = fine.positions().to_vec();
//!
//! lower_analysis(&mut fine, &mut coarse, &scheme, &options).unwrap();
//! higher_synthesis(&coarse, &mut fine, &scheme, &options).unwrap();
//!
//! for (a, b) in fine.positions().iter().zip(&sculpted) {
//!     assert!((a - b).norm() < 1e-9);
//! }
//! ```

mod details;
mod frame;
mod stack;
mod transition;

pub use details::{apply_details, compute_details};
pub use frame::{DegeneratePolicy, Frame, FrameOptions};
pub use stack::Multimesh;
pub use transition::{higher_synthesis, lower_analysis, LevelPair};

/// Which normal field local frames are built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalSource {
    /// Normals recomputed from the predicted fine surface, in both analysis
    /// and synthesis. Frames then depend on the coarse level alone.
    #[default]
    Predicted,
    /// The fine level's own stored normal field, used as-is. Callers must
    /// keep it current.
    Stored,
}

/// Options for multiresolution transitions.
#[derive(Debug, Clone)]
pub struct MultiresOptions {
    /// Whether to use parallel execution (default: true).
    pub parallel: bool,

    /// Normal field used for local frames.
    pub normals: NormalSource,

    /// Frame construction parameters.
    pub frame: FrameOptions,

    /// Maximum number of faces a new level may have.
    pub max_faces: usize,
}

impl Default for MultiresOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            normals: NormalSource::Predicted,
            frame: FrameOptions::default(),
            max_faces: 10_000_000,
        }
    }
}

impl MultiresOptions {
    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the normal field used for frames.
    pub fn with_normals(mut self, normals: NormalSource) -> Self {
        self.normals = normals;
        self
    }

    /// Set the frame construction parameters.
    pub fn with_frame(mut self, frame: FrameOptions) -> Self {
        self.frame = frame;
        self
    }

    /// Set the face budget for new levels.
    pub fn with_max_faces(mut self, max_faces: usize) -> Self {
        self.max_faces = max_faces;
        self
    }
}
