//! # loopmesh
//!
//! A half-edge triangle mesh with local topology edits and Loop subdivision.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe indices
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Local edits**: edge flip and edge split that keep every connectivity
//!   invariant intact
//! - **Loop subdivision**: in-place upsampling built from splits and flips
//! - **Bezier helpers**: de Casteljau evaluation of curves and patches
//!
//! ## Quick Start
//!
//! ```
//! use loopmesh::prelude::*;
//! use loopmesh::algo::subdivide::upsample;
//!
//! let mut mesh: HalfEdgeMesh = loopmesh::mesh::primitives::tetrahedron().unwrap();
//!
//! let stats = upsample(&mut mesh).unwrap();
//! assert_eq!(stats.vertices_after, 10);
//! assert_eq!(mesh.num_faces(), 16);
//!
//! for v in mesh.vertex_ids() {
//!     let normal = mesh.vertex_normal(v);
//!     assert!((normal.norm() - 1.0).abs() < 1e-12);
//! }
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use loopmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! // Define vertices and faces
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_faces(), 4);
//! ```
//!
//! ## Local Edits
//!
//! ```
//! use loopmesh::prelude::*;
//!
//! let mut mesh: HalfEdgeMesh = loopmesh::mesh::primitives::octahedron().unwrap();
//! let e = EdgeId::new(0);
//!
//! let m = mesh.split_edge(e).unwrap();
//! assert_eq!(mesh.valence(m), 4);
//!
//! // Splitting a boundary edge is refused rather than an error.
//! let mut grid: HalfEdgeMesh = loopmesh::mesh::primitives::grid(1, 1.0).unwrap();
//! let border = grid.edge_ids().find(|&e| grid.is_boundary_edge(e)).unwrap();
//! assert!(grid.flip_edge(border).is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod bezier;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use loopmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::subdivide::{loop_subdivide, upsample, SubdivideOptions, SubdivisionStats};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, EdgeId, EdgeSplit, Face, FaceId, HalfEdge,
        HalfEdgeId, HalfEdgeMesh, MeshIndex, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::mesh::primitives;

    #[test]
    fn test_tetrahedron() {
        let mesh: HalfEdgeMesh = primitives::tetrahedron().unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        // Closed: every half-edge bounds a face.
        assert_eq!(mesh.num_halfedges(), 12);
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v), "vertex {:?} should not be on boundary", v);
        }
    }

    #[test]
    fn test_subdivided_normals_point_outward() {
        let mut mesh: HalfEdgeMesh = primitives::icosahedron().unwrap();
        upsample(&mut mesh).unwrap();

        for v in mesh.vertex_ids() {
            let p = mesh.position(v).coords;
            assert!(mesh.vertex_normal(v).dot(&p) > 0.0);
        }
    }
}
