//! Multiresolution algorithms.
//!
//! - **Subdivision**: prediction of a fine level from the level below
//!   (midpoint, Loop)
//! - **Multiresolution**: detail analysis and synthesis between adjacent
//!   levels, and the [`Multimesh`](multires::Multimesh) level stack

pub mod multires;
mod progress;
pub mod subdivide;

pub use progress::Progress;
