//! Mesh construction from indexed triangles.
//!
//! Everything the mesh core refuses to handle (out-of-range indices,
//! degenerate or non-manifold triangles) is rejected here, before a
//! [`HalfEdgeMesh`] exists.

use std::collections::{HashMap, HashSet};

use nalgebra::Point3;

use super::halfedge::HalfEdgeMesh;
use super::index::{HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// Faces must be consistently oriented: every directed edge `(a, b)` may
/// appear in at most one face. Edges are numbered in the order their first
/// half-edge appears in `faces`.
///
/// # Example
/// ```
/// use loopmesh::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_edges(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        if let Some(&vi) = face.iter().find(|&&vi| vi >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    check_index_capacity::<I>(vertices.len(), faces)?;

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());

    let vertex_ids: Vec<VertexId<I>> = vertices.iter().map(|&p| mesh.new_vertex(p)).collect();

    // Directed edge (v0, v1) -> half-edge running v0 -> v1.
    let mut directed: HashMap<(usize, usize), HalfEdgeId<I>> =
        HashMap::with_capacity(faces.len() * 3);

    // First pass: one face and three linked half-edges per triangle.
    for face in faces {
        let f = mesh.new_face();
        let hes = [mesh.new_halfedge(), mesh.new_halfedge(), mesh.new_halfedge()];
        mesh.face_mut(f).halfedge = hes[0];

        for i in 0..3 {
            let (v0, v1) = (face[i], face[(i + 1) % 3]);
            if directed.insert((v0, v1), hes[i]).is_some() {
                return Err(MeshError::NonManifoldEdge { v0, v1 });
            }

            let he = mesh.halfedge_mut(hes[i]);
            he.origin = vertex_ids[v0];
            he.next = hes[(i + 1) % 3];
            he.face = f;

            // Overwritten for shared vertices; any outgoing half-edge will do.
            mesh.vertex_mut(vertex_ids[v0]).halfedge = hes[i];
        }
    }

    // Second pass: pair twins into edges, in half-edge order so that edge
    // numbering is deterministic. Unpaired half-edges get a boundary twin.
    let interior_count = mesh.num_halfedges();
    for hi in 0..interior_count {
        let he = HalfEdgeId::<I>::new(hi);
        if mesh.edge_of(he).is_valid() {
            continue;
        }

        let v0 = mesh.origin(he).index();
        let v1 = mesh.origin(mesh.next(he)).index();

        let twin = match directed.get(&(v1, v0)) {
            Some(&twin) => twin,
            None => {
                let boundary = mesh.new_halfedge();
                mesh.halfedge_mut(boundary).origin = vertex_ids[v1];
                boundary
            }
        };

        let e = mesh.new_edge();
        mesh.edge_mut(e).halfedge = he;
        for (a, b) in [(he, twin), (twin, he)] {
            let h = mesh.halfedge_mut(a);
            h.twin = b;
            h.edge = e;
        }
    }

    // Third pass: link boundary half-edges into loops.
    link_boundary_loops(&mut mesh, interior_count)?;

    // Fourth pass: boundary vertices point to boundary half-edges.
    fix_boundary_vertex_halfedges(&mut mesh);

    // Two fans meeting at a single vertex.
    mesh.check_vertex_fans()?;

    Ok(mesh)
}

/// Reject meshes whose element counts do not fit the index type `I`.
///
/// The half-edge count is exact: three per face plus one boundary twin for
/// every directed edge whose reverse is missing.
fn check_index_capacity<I: MeshIndex>(num_vertices: usize, faces: &[[usize; 3]]) -> Result<()> {
    let limit = I::MAX.to_usize().saturating_add(1);
    let overflow = |element, count| MeshError::IndexOverflow {
        element,
        count,
        limit,
    };

    if num_vertices > limit {
        return Err(overflow("vertices", num_vertices));
    }
    if faces.len() > limit {
        return Err(overflow("faces", faces.len()));
    }

    let mut directed: HashSet<(usize, usize)> = HashSet::with_capacity(faces.len() * 3);
    for face in faces {
        for i in 0..3 {
            let (v0, v1) = (face[i], face[(i + 1) % 3]);
            if !directed.insert((v0, v1)) {
                return Err(MeshError::NonManifoldEdge { v0, v1 });
            }
        }
    }
    let boundary = directed
        .iter()
        .filter(|&&(v0, v1)| !directed.contains(&(v1, v0)))
        .count();

    let halfedges = directed.len() + boundary;
    if halfedges > limit {
        return Err(overflow("half-edges", halfedges));
    }
    Ok(())
}

/// Link boundary half-edges (created from `first` onwards) into loops.
fn link_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, first: usize) -> Result<()> {
    let boundary: Vec<HalfEdgeId<I>> = (first..mesh.num_halfedges())
        .map(HalfEdgeId::new)
        .collect();

    let mut outgoing: HashMap<VertexId<I>, HalfEdgeId<I>> = HashMap::with_capacity(boundary.len());
    for &he in &boundary {
        let origin = mesh.origin(he);
        if outgoing.insert(origin, he).is_some() {
            return Err(MeshError::invalid_state(format!(
                "{:?} joins more than one boundary loop",
                origin
            )));
        }
    }

    for &he in &boundary {
        // The next boundary half-edge starts where this one ends.
        let dest = mesh.dest(he);
        if let Some(&next) = outgoing.get(&dest) {
            mesh.halfedge_mut(he).next = next;
        }
    }

    Ok(())
}

/// Ensure boundary vertices point to a boundary half-edge.
fn fix_boundary_vertex_halfedges<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    for v in mesh.vertex_ids() {
        let boundary = mesh
            .vertex_halfedges(v)
            .find(|&he| mesh.is_boundary_halfedge(he));
        if let Some(he) = boundary {
            mesh.vertex_mut(v).halfedge = he;
        }
    }
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| mesh.face_triangle(f).map(|v| v.index()))
        .collect();

    (vertices, faces)
}
