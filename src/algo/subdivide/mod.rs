//! Loop subdivision.
//!
//! Loop subdivision (Loop, 1987) is an approximating subdivision scheme for
//! triangle meshes. Each pass:
//!
//! 1. Computes the smoothed position of every existing vertex and of every
//!    vertex about to be inserted on an edge, from the current topology
//! 2. Splits every original edge at its midpoint
//! 3. Flips the new edges that join an original vertex to an inserted one,
//!    so that every triangle becomes four
//! 4. Moves all vertices to the positions computed in step 1
//!
//! The topology is rebuilt in place with [`HalfEdgeMesh::split_edge`] and
//! [`HalfEdgeMesh::flip_edge`], so vertex, edge and face ids that existed
//! before a pass keep denoting the same elements after it.
//!
//! # Example
//!
//! ```
//! use loopmesh::prelude::*;
//! use loopmesh::algo::subdivide::{loop_subdivide, SubdivideOptions};
//!
//! let mut mesh: HalfEdgeMesh = loopmesh::mesh::primitives::icosahedron().unwrap();
//!
//! let stats = loop_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(stats.faces_after, 20 * 16);
//! assert!(mesh.is_valid());
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.
//!
//! [`HalfEdgeMesh::split_edge`]: crate::mesh::HalfEdgeMesh::split_edge
//! [`HalfEdgeMesh::flip_edge`]: crate::mesh::HalfEdgeMesh::flip_edge

mod loop_subdivision;

pub use loop_subdivision::{loop_subdivide, loop_subdivide_with_progress, upsample, SubdivisionStats};

/// Default upper bound on the face count subdivision may produce.
pub const DEFAULT_MAX_FACES: usize = 50_000_000;

/// Options for Loop subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision passes.
    pub iterations: usize,

    /// Whether to compute staged positions in parallel (default: true).
    pub parallel: bool,

    /// Refuse to run if the final face count would exceed this.
    pub max_faces: usize,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubdivideOptions {
    /// Create options with the specified number of passes.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            parallel: true,
            max_faces: DEFAULT_MAX_FACES,
        }
    }

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

    /// Set the face budget.
    pub fn with_max_faces(mut self, max_faces: usize) -> Self {
        self.max_faces = max_faces;
        self
    }
}
