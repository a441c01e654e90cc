//! Property-based tests for local edits and subdivision.
//!
//! Random sequences of edge flips and splits are applied to the built-in
//! meshes; every intermediate mesh must pass validation.
//!
//! Run with: cargo test --test proptest_edits

use loopmesh::mesh::primitives;
use loopmesh::prelude::*;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Edit {
    Flip(usize),
    Split(usize),
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..10_000usize).prop_map(Edit::Flip),
        (0..10_000usize).prop_map(Edit::Split),
    ]
}

fn closed_shape(which: usize) -> HalfEdgeMesh {
    match which % 4 {
        0 => primitives::tetrahedron(),
        1 => primitives::octahedron(),
        2 => primitives::icosahedron(),
        _ => primitives::cube(),
    }
    .unwrap()
}

/// A flip that keeps the mesh a simplicial surface: both endpoints keep at
/// least three neighbours and the new diagonal is not already an edge.
fn can_flip(mesh: &HalfEdgeMesh, e: EdgeId) -> bool {
    if mesh.is_boundary_edge(e) {
        return false;
    }
    let [a, b] = mesh.edge_vertices(e);
    if mesh.valence(a) <= 3 || mesh.valence(b) <= 3 {
        return false;
    }
    let h = mesh.edge_halfedge(e);
    let c = mesh.origin(mesh.prev(h));
    let d = mesh.origin(mesh.prev(mesh.twin(h)));
    c != d && mesh.vertex_neighbors(c).all(|n| n != d)
}

/// Apply an edit, checking the counts it must change. Returns whether the
/// mesh changed.
fn apply(mesh: &mut HalfEdgeMesh, edit: Edit) -> std::result::Result<bool, TestCaseError> {
    let (v, e, f, h) = (
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces(),
        mesh.num_halfedges(),
    );

    match edit {
        Edit::Flip(i) => {
            let edge = EdgeId::new(i % e);
            if !can_flip(mesh, edge) {
                return Ok(false);
            }
            prop_assert_eq!(mesh.flip_edge(edge), Some(edge));
            prop_assert_eq!(mesh.num_edges(), e);
            prop_assert_eq!(mesh.num_faces(), f);
        }
        Edit::Split(i) => {
            let edge = EdgeId::new(i % e);
            match mesh.split_edge(edge) {
                Some(m) => {
                    prop_assert_eq!(m.index(), v);
                    prop_assert_eq!(mesh.num_vertices(), v + 1);
                    prop_assert_eq!(mesh.num_edges(), e + 3);
                    prop_assert_eq!(mesh.num_faces(), f + 2);
                    prop_assert_eq!(mesh.num_halfedges(), h + 6);
                }
                None => {
                    prop_assert!(mesh.is_boundary_edge(edge));
                    prop_assert_eq!(mesh.num_vertices(), v);
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}

// =============================================================================
// Property Tests: Local Edits
// =============================================================================

proptest! {
    /// Flips and splits on closed meshes keep every invariant.
    #[test]
    fn edits_preserve_closed_invariants(
        which in 0..4usize,
        edits in prop::collection::vec(arb_edit(), 0..40),
    ) {
        let mut mesh = closed_shape(which);
        for edit in edits {
            apply(&mut mesh, edit)?;
            prop_assert!(mesh.validate().is_ok(), "{:?}: {:?}", edit, mesh.validate());
            prop_assert!(mesh.is_closed());
            prop_assert_eq!(mesh.euler_characteristic(), 2);
        }
    }

    /// Edits on an open grid never touch the boundary.
    #[test]
    fn edits_on_grid_keep_boundary(
        cells in 1..5usize,
        edits in prop::collection::vec(arb_edit(), 0..40),
    ) {
        let mut mesh: HalfEdgeMesh = primitives::grid(cells, 1.0).unwrap();
        let boundary = mesh.num_boundary_edges();
        for edit in edits {
            apply(&mut mesh, edit)?;
            prop_assert!(mesh.validate().is_ok());
            prop_assert_eq!(mesh.num_boundary_edges(), boundary);
            prop_assert_eq!(mesh.euler_characteristic(), 1);
        }
    }

    /// Flipping any interior edge twice restores the triangle set.
    #[test]
    fn double_flip_is_identity(which in 0..4usize, edge in 0..10_000usize) {
        let mut mesh = closed_shape(which);
        let e = EdgeId::new(edge % mesh.num_edges());
        let before = to_face_vertex(&mesh);

        mesh.flip_edge(e);
        mesh.flip_edge(e);

        let after = to_face_vertex(&mesh);
        prop_assert_eq!(before.0, after.0);
        let canon = |faces: Vec<[usize; 3]>| {
            let mut out: Vec<[usize; 3]> = faces
                .into_iter()
                .map(|mut t| {
                    let k = (0..3).min_by_key(|&i| t[i]).unwrap();
                    t.rotate_left(k);
                    t
                })
                .collect();
            out.sort_unstable();
            out
        };
        prop_assert_eq!(canon(before.1), canon(after.1));
    }
}

// =============================================================================
// Property Tests: Subdivision
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Upsampling an edited closed mesh obeys the Loop counting rules.
    #[test]
    fn upsample_after_edits(
        which in 0..4usize,
        edits in prop::collection::vec(arb_edit(), 0..20),
    ) {
        let mut mesh = closed_shape(which);
        for edit in edits {
            apply(&mut mesh, edit)?;
        }
        let (v, e, f) = (mesh.num_vertices(), mesh.num_edges(), mesh.num_faces());

        let stats = upsample(&mut mesh).unwrap();

        prop_assert_eq!(stats.vertices_after, v + e);
        prop_assert_eq!(stats.edges_after, 2 * e + 3 * f);
        prop_assert_eq!(stats.faces_after, 4 * f);
        prop_assert!(mesh.validate().is_ok());

        // No edge joins two original vertices afterwards, and every old
        // triangle leaves three edges between inserted vertices.
        let mut inner = 0;
        for edge in mesh.edge_ids() {
            let [a, b] = mesh.edge_vertices(edge).map(|x| x.index() >= v);
            prop_assert!(a || b, "edge {:?} joins two original vertices", edge);
            if a && b {
                inner += 1;
            }
        }
        prop_assert_eq!(inner, 3 * f);
        prop_assert_eq!(stats.flips, f);
    }
}
