//! Error types for loopmesh.
//!
//! Boundary edges handed to [`flip_edge`](crate::mesh::HalfEdgeMesh::flip_edge)
//! or [`split_edge`](crate::mesh::HalfEdgeMesh::split_edge) are not errors;
//! those operations return `None` instead. Everything here describes input
//! that the mesh core refuses to work on.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building, validating or subdividing a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references a vertex that does not exist.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face repeats a vertex.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// The same directed edge appears in two faces, so the edge has more
    /// than two incident faces or inconsistent winding.
    #[error("edge ({v0}, {v1}) has more than two incident faces or inconsistent winding")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The faces around a vertex form more than one fan.
    #[error("vertex {vertex} is pinched: its ring reaches {reached} of {incident} outgoing half-edges")]
    NonManifoldVertex {
        /// The vertex index.
        vertex: usize,
        /// Outgoing half-edges reached by walking the ring.
        reached: usize,
        /// Outgoing half-edges starting at the vertex.
        incident: usize,
    },

    /// The mesh needs more elements than the index type can address.
    #[error("{count} {element} do not fit the index type (limit {limit})")]
    IndexOverflow {
        /// Element kind that overflows.
        element: &'static str,
        /// Elements required.
        count: usize,
        /// Largest element count the index type can address.
        limit: usize,
    },

    /// Connectivity violates one of the half-edge invariants.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// Walking around a vertex did not return to the start.
    #[error("one-ring of vertex {vertex} did not close after {steps} steps")]
    CorruptRing {
        /// The vertex whose ring was walked.
        vertex: usize,
        /// Steps taken before giving up.
        steps: usize,
    },

    /// The operation requires a closed mesh.
    #[error("mesh has {boundary_edges} boundary edges; a closed mesh is required")]
    OpenBoundary {
        /// Number of boundary edges found.
        boundary_edges: usize,
    },

    /// Subdivision would exceed the configured face budget.
    #[error("subdivision would grow {current} faces to {projected} (limit {max})")]
    MeshTooLarge {
        /// Current face count.
        current: usize,
        /// Face count after all requested passes.
        projected: usize,
        /// Configured limit.
        max: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create an invariant violation error.
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        MeshError::InvalidState(message.into())
    }
}
