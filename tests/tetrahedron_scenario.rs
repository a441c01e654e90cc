//! End-to-end Loop subdivision of a tetrahedron built from raw triangles.

use loopmesh::prelude::*;
use nalgebra::{Point3, Vector3};

fn tetrahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = vec![
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(-1.0, 1.0, -1.0),
        Point3::new(-1.0, -1.0, 1.0),
    ];
    let faces = vec![[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];
    (vertices, faces)
}

#[test]
fn tetrahedron_upsamples_to_ten_vertices() {
    let (vertices, faces) = tetrahedron();
    let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
    assert!(mesh.is_closed());
    assert_eq!(mesh.num_edges(), 6);

    let edges: Vec<[VertexId; 2]> = mesh.edge_ids().map(|e| mesh.edge_vertices(e)).collect();

    let stats = upsample(&mut mesh).unwrap();

    assert_eq!(stats.vertices_before, 4);
    assert_eq!(stats.vertices_after, 10);
    assert_eq!(stats.edges_after, 24);
    assert_eq!(stats.faces_after, 16);
    mesh.validate().unwrap();

    // Every face is still a triangle with three distinct corners.
    let (_, out_faces) = to_face_vertex(&mesh);
    assert_eq!(out_faces.len(), 16);
    for [a, b, c] in out_faces {
        assert!(a != b && b != c && a != c);
    }

    // Regular tetrahedron centred at the origin: the neighbour sum of a
    // vertex is its own negation, so it lands at 7/16 p - 3/16 p = p / 4.
    for (i, p) in vertices.iter().enumerate() {
        let moved = mesh.position(VertexId::new(i));
        assert!((moved.coords - p.coords * 0.25).norm() < 1e-12);
    }

    // Edge vertex: 3/8 (a + b) + 1/8 (c + d) = 1/4 (a + b) here.
    for (k, [a, b]) in edges.iter().enumerate() {
        let expected: Vector3<f64> = (vertices[a.index()].coords + vertices[b.index()].coords) * 0.25;
        let actual = mesh.position(VertexId::new(4 + k));
        assert!((actual.coords - expected).norm() < 1e-12);
    }

    // Old vertices keep valence 3, inserted ones reach 6.
    for v in mesh.vertex_ids() {
        let expected = if v.index() < 4 { 3 } else { 6 };
        assert_eq!(mesh.valence(v), expected);
    }
}

#[test]
fn second_pass_keeps_identities() {
    let (vertices, faces) = tetrahedron();
    let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

    upsample(&mut mesh).unwrap();
    let (v, e, f) = (mesh.num_vertices(), mesh.num_edges(), mesh.num_faces());
    upsample(&mut mesh).unwrap();

    assert_eq!(mesh.num_vertices(), v + e);
    assert_eq!(mesh.num_edges(), 2 * e + 3 * f);
    assert_eq!(mesh.num_faces(), 4 * f);
    assert_eq!(mesh.euler_characteristic(), 2);
    mesh.validate().unwrap();
}

#[test]
fn open_mesh_is_left_untouched() {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.5, -1.0, 0.0),
    ];
    let faces = vec![[0, 1, 2], [1, 0, 3]];
    let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

    let err = upsample(&mut mesh).unwrap_err();
    assert!(matches!(err, MeshError::OpenBoundary { boundary_edges: 4 }));
    assert_eq!(to_face_vertex(&mesh), (vertices, faces));
}
