//! Progress reporting for long-running algorithms.
//!
//! # Example
//!
//! ```
//! use loopmesh::algo::{subdivide::{loop_subdivide_with_progress, SubdivideOptions}, Progress};
//! use loopmesh::prelude::*;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//!
//! let mut mesh: HalfEdgeMesh = loopmesh::mesh::primitives::octahedron().unwrap();
//! loop_subdivide_with_progress(&mut mesh, &SubdivideOptions::new(2), &progress).unwrap();
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives the current step (0-based), the total number of
/// steps, and a short description of the operation.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// A reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
