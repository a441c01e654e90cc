//! Small reference meshes.
//!
//! All closed shapes are outward-oriented (counter-clockwise seen from
//! outside) 2-manifolds; [`grid`] is an open planar patch.

use nalgebra::Point3;

use super::builder::build_from_triangles;
use super::halfedge::HalfEdgeMesh;
use super::index::MeshIndex;
use crate::error::{MeshError, Result};

/// Tetrahedron: 4 vertices, 6 edges, 4 faces, every vertex of valence 3.
pub fn tetrahedron<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.5, 0.5, 1.0),
    ];
    let faces = [
        [0, 2, 1], // bottom
        [0, 1, 3], // front
        [1, 2, 3], // right
        [2, 0, 3], // left
    ];
    build_from_triangles(&vertices, &faces)
}

/// Octahedron with vertices on the unit axes: 6 vertices, 12 edges, 8 faces.
pub fn octahedron<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, -1.0),
    ];
    let faces = [
        [0, 2, 4],
        [2, 1, 4],
        [1, 3, 4],
        [3, 0, 4],
        [2, 0, 5],
        [1, 2, 5],
        [3, 1, 5],
        [0, 3, 5],
    ];
    build_from_triangles(&vertices, &faces)
}

/// Icosahedron inscribed in the unit sphere: 12 vertices, 30 edges, 20 faces.
pub fn icosahedron<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let vertices: Vec<Point3<f64>> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::from(Point3::new(x, y, z).coords.normalize()))
    .collect();
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    build_from_triangles(&vertices, &faces)
}

/// Unit cube split into 12 triangles: 8 vertices, 18 edges.
pub fn cube<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let faces = [
        [0, 2, 1],
        [0, 3, 2], // z = 0
        [4, 5, 6],
        [4, 6, 7], // z = 1
        [0, 1, 5],
        [0, 5, 4], // y = 0
        [3, 7, 6],
        [3, 6, 2], // y = 1
        [0, 4, 7],
        [0, 7, 3], // x = 0
        [1, 2, 6],
        [1, 6, 5], // x = 1
    ];
    build_from_triangles(&vertices, &faces)
}

/// Open `cells × cells` grid in the z = 0 plane, two triangles per cell.
pub fn grid<I: MeshIndex>(cells: usize, spacing: f64) -> Result<HalfEdgeMesh<I>> {
    if cells == 0 {
        return Err(MeshError::invalid_param("cells", cells, "must be at least 1"));
    }

    let side = cells + 1;
    let mut vertices = Vec::with_capacity(side * side);
    let mut faces = Vec::with_capacity(cells * cells * 2);

    for j in 0..side {
        for i in 0..side {
            vertices.push(Point3::new(i as f64 * spacing, j as f64 * spacing, 0.0));
        }
    }

    for j in 0..cells {
        for i in 0..cells {
            let v00 = j * side + i;
            let v10 = v00 + 1;
            let v01 = v00 + side;
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    build_from_triangles(&vertices, &faces)
}
