//! Benchmarks for mesh operations.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use loopmesh::algo::subdivide::{loop_subdivide, SubdivideOptions};
use loopmesh::mesh::primitives;
use loopmesh::prelude::*;

fn bench_mesh_construction(c: &mut Criterion) {
    let grid: HalfEdgeMesh = primitives::grid(50, 1.0).unwrap();
    let (vertices, faces) = to_face_vertex(&grid);

    c.bench_function("build_grid_50x50", |b| {
        b.iter(|| {
            let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
            mesh
        });
    });
}

fn bench_mesh_traversal(c: &mut Criterion) {
    let mut mesh: HalfEdgeMesh = primitives::icosahedron().unwrap();
    loop_subdivide(&mut mesh, &SubdivideOptions::new(4)).unwrap();

    c.bench_function("vertex_neighbors_all", |b| {
        b.iter(|| {
            let mut count = 0;
            for v in mesh.vertex_ids() {
                count += mesh.vertex_neighbors(v).count();
            }
            count
        });
    });

    c.bench_function("vertex_normals_all", |b| {
        b.iter(|| {
            let mut sum = nalgebra::Vector3::zeros();
            for v in mesh.vertex_ids() {
                sum += mesh.vertex_normal(v);
            }
            sum
        });
    });

    c.bench_function("validate", |b| b.iter(|| mesh.validate().is_ok()));
}

fn bench_local_edits(c: &mut Criterion) {
    let base: HalfEdgeMesh = primitives::icosahedron().unwrap();

    c.bench_function("split_all_edges", |b| {
        b.iter_batched(
            || base.clone(),
            |mut mesh| {
                for e in mesh.edge_ids() {
                    black_box(mesh.split_edge(e));
                }
                mesh
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("flip_all_edges_twice", |b| {
        b.iter_batched(
            || base.clone(),
            |mut mesh| {
                for e in mesh.edge_ids() {
                    mesh.flip_edge(e);
                    mesh.flip_edge(e);
                }
                mesh
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_subdivision(c: &mut Criterion) {
    let base: HalfEdgeMesh = primitives::icosahedron().unwrap();

    for (name, options) in [
        ("loop_subdivide_3_parallel", SubdivideOptions::new(3)),
        ("loop_subdivide_3_sequential", SubdivideOptions::new(3).sequential()),
    ] {
        c.bench_function(name, |b| {
            b.iter_batched(
                || base.clone(),
                |mut mesh| {
                    loop_subdivide(&mut mesh, &options).unwrap();
                    mesh
                },
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group!(
    benches,
    bench_mesh_construction,
    bench_mesh_traversal,
    bench_local_edits,
    bench_subdivision
);
criterion_main!(benches);
