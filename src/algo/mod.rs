//! Mesh processing algorithms.
//!
//! - **Subdivision**: Loop subdivision driven by edge splits and flips
//! - **Progress**: callbacks for long-running passes

pub mod progress;
pub mod subdivide;

pub use progress::Progress;
