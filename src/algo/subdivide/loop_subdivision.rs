//! Loop subdivision driver built on edge split and edge flip.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, EdgeSplit, HalfEdgeMesh, MeshIndex, VertexId};

use super::SubdivideOptions;

/// Summary of a subdivision run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubdivisionStats {
    /// Vertex count before the first pass.
    pub vertices_before: usize,
    /// Edge count before the first pass.
    pub edges_before: usize,
    /// Face count before the first pass.
    pub faces_before: usize,
    /// Vertex count after the last pass.
    pub vertices_after: usize,
    /// Edge count after the last pass.
    pub edges_after: usize,
    /// Face count after the last pass.
    pub faces_after: usize,
    /// Edges split during the last pass.
    pub splits: usize,
    /// Edges flipped during the last pass.
    pub flips: usize,
    /// Number of passes run.
    pub passes: usize,
}

impl SubdivisionStats {
    fn start<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Self {
        let mut stats = Self {
            vertices_before: mesh.num_vertices(),
            edges_before: mesh.num_edges(),
            faces_before: mesh.num_faces(),
            ..Self::default()
        };
        stats.finish(mesh);
        stats
    }

    fn finish<I: MeshIndex>(&mut self, mesh: &HalfEdgeMesh<I>) {
        self.vertices_after = mesh.num_vertices();
        self.edges_after = mesh.num_edges();
        self.faces_after = mesh.num_faces();
    }
}

/// Run one pass of Loop subdivision with default options.
///
/// On a closed mesh with `V` vertices, `E` edges and `F` faces the result has
/// `V + E` vertices, `2E + 3F` edges and `4F` faces. The original vertices
/// keep their ids; the vertex inserted on original edge `k` gets id `V + k`.
pub fn upsample<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<SubdivisionStats> {
    loop_subdivide(mesh, &SubdivideOptions::default())
}

/// Performs Loop subdivision on a closed triangle mesh.
///
/// # Arguments
///
/// * `mesh` - The mesh to subdivide (modified in place)
/// * `options` - Subdivision parameters
///
/// # Errors
///
/// Fails without touching the mesh if it is empty
/// ([`MeshError::EmptyMesh`]), has boundary edges
/// ([`MeshError::OpenBoundary`]), fails [`HalfEdgeMesh::validate`], or would
/// grow past `options.max_faces` ([`MeshError::MeshTooLarge`]).
///
/// # Vertex Rules
///
/// - **Edge vertex**: `3/8 * (a + b) + 1/8 * (c + d)`, where `c` and `d` are
///   the vertices opposite the edge
/// - **Original vertex** of degree `n`: `(1 - n*u) * v + u * Σ(neighbors)`
///   with `u = 3/16` for `n = 3` and `u = 3/(8n)` otherwise
pub fn loop_subdivide<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SubdivideOptions,
) -> Result<SubdivisionStats> {
    loop_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Loop subdivision with progress reporting.
pub fn loop_subdivide_with_progress<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<SubdivisionStats> {
    let mut stats = SubdivisionStats::start(mesh);
    if options.iterations == 0 {
        return Ok(stats);
    }

    check_input(mesh, options)?;

    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Loop subdivision");
        let (splits, flips) = subdivide_once(mesh, options.parallel)?;
        stats.splits = splits;
        stats.flips = flips;
        stats.passes += 1;
        debug!(
            pass = iter + 1,
            vertices = mesh.num_vertices(),
            edges = mesh.num_edges(),
            faces = mesh.num_faces(),
            "subdivision pass complete"
        );
    }
    progress.report(options.iterations, options.iterations, "Loop subdivision");

    stats.finish(mesh);
    Ok(stats)
}

/// Reject meshes the driver cannot subdivide.
fn check_input<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, options: &SubdivideOptions) -> Result<()> {
    if mesh.num_faces() == 0 {
        return Err(MeshError::EmptyMesh);
    }

    mesh.validate()?;

    let boundary_edges = mesh.num_boundary_edges();
    if boundary_edges > 0 {
        return Err(MeshError::OpenBoundary { boundary_edges });
    }

    // Each face owns three half-edges, which must stay addressable by `I`.
    let max = options.max_faces.min(I::MAX.to_usize() / 3);
    let current = mesh.num_faces();
    let projected = u32::try_from(options.iterations)
        .ok()
        .and_then(|n| 4usize.checked_pow(n))
        .and_then(|growth| current.checked_mul(growth))
        .unwrap_or(usize::MAX);
    if projected > max {
        return Err(MeshError::MeshTooLarge {
            current,
            projected,
            max,
        });
    }

    Ok(())
}

/// Per-pass subdivision state, indexed by element id.
///
/// Lives only for the duration of one pass.
struct PassState {
    /// Target position of every vertex, old and inserted.
    positions: Vec<Point3<f64>>,
    /// Target position of the vertex to insert on each original edge.
    edge_points: Vec<Point3<f64>>,
    /// Edge crosses an old triangle (created by a split, not along an old edge).
    is_new: Vec<bool>,
    /// Edge lies on, or was produced by splitting, an original edge.
    is_split: Vec<bool>,
    /// Vertices with an id at or above this were inserted by this pass.
    original_vertices: usize,
}

impl PassState {
    fn grow_edges(&mut self, num_edges: usize) {
        self.is_new.resize(num_edges, false);
        self.is_split.resize(num_edges, false);
    }

    fn record_split<I: MeshIndex>(&mut self, split: &EdgeSplit<I>, position: Point3<f64>) {
        let vi = split.vertex.index();
        if self.positions.len() <= vi {
            self.positions.resize(vi + 1, position);
        }
        self.positions[vi] = position;

        for e in split.halves {
            self.is_split[e.index()] = true;
        }
        for e in split.spokes {
            self.is_split[e.index()] = true;
            self.is_new[e.index()] = true;
        }
    }

    fn is_inserted<I: MeshIndex>(&self, v: VertexId<I>) -> bool {
        v.index() >= self.original_vertices
    }
}

/// One subdivision pass. Returns the number of splits and flips.
fn subdivide_once<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, parallel: bool) -> Result<(usize, usize)> {
    let original_vertices = mesh.num_vertices();
    let original_edges = mesh.num_edges();

    // Stage positions from the current topology.
    let (positions, edge_points) = {
        let mesh: &HalfEdgeMesh<I> = mesh;
        if parallel {
            let positions = (0..original_vertices)
                .into_par_iter()
                .map(|i| smoothed_vertex(mesh, VertexId::new(i)))
                .collect::<Result<Vec<_>>>()?;
            let edge_points = (0..original_edges)
                .into_par_iter()
                .map(|i| edge_point(mesh, EdgeId::new(i)))
                .collect::<Vec<_>>();
            (positions, edge_points)
        } else {
            let positions = mesh
                .vertex_ids()
                .map(|v| smoothed_vertex(mesh, v))
                .collect::<Result<Vec<_>>>()?;
            let edge_points = mesh
                .edge_ids()
                .map(|e| edge_point(mesh, e))
                .collect::<Vec<_>>();
            (positions, edge_points)
        }
    };
    debug!(
        vertices = original_vertices,
        edges = original_edges,
        "staged subdivision positions"
    );

    let mut state = PassState {
        positions,
        edge_points,
        is_new: vec![false; original_edges],
        is_split: vec![false; original_edges],
        original_vertices,
    };

    // Split every original edge. Edges created here are never visited.
    let mut splits = 0;
    for e in mesh.edge_ids() {
        if state.is_split[e.index()] {
            continue;
        }
        match mesh.split_edge_detailed(e) {
            Some(split) => {
                state.grow_edges(mesh.num_edges());
                let position = state.edge_points[e.index()];
                state.record_split(&split, position);
                splits += 1;
            }
            None => warn!(?e, "boundary edge left unsplit"),
        }
    }
    debug!(splits, "split pass complete");

    // Flip new edges that touch an original vertex.
    let mut flips = 0;
    for e in mesh.edge_ids() {
        if !state.is_new[e.index()] {
            continue;
        }
        let [a, b] = mesh.edge_vertices(e);
        if state.is_inserted(a) && state.is_inserted(b) {
            continue;
        }
        match mesh.flip_edge(e) {
            Some(_) => flips += 1,
            None => warn!(?e, "boundary edge left unflipped"),
        }
    }
    debug!(flips, "flip pass complete");

    for v in mesh.vertex_ids() {
        mesh.set_position(v, state.positions[v.index()]);
    }

    Ok((splits, flips))
}

/// Loop weight for an original vertex of degree `n`.
fn vertex_weight(n: usize) -> f64 {
    if n == 3 {
        3.0 / 16.0
    } else {
        3.0 / (8.0 * n as f64)
    }
}

/// Smoothed position of an original vertex.
fn smoothed_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> Result<Point3<f64>> {
    let ring = mesh.vertex_ring(v)?;
    let position = mesh.position(v);
    if ring.is_empty() {
        return Ok(*position);
    }

    let n = ring.len();
    let u = vertex_weight(n);
    let neighbor_sum: Vector3<f64> = ring
        .iter()
        .map(|&he| mesh.position(mesh.dest(he)).coords)
        .sum();

    Ok(Point3::from(
        position.coords * (1.0 - n as f64 * u) + neighbor_sum * u,
    ))
}

/// Position of the vertex to insert on an interior edge.
fn edge_point<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, e: EdgeId<I>) -> Point3<f64> {
    let h = mesh.edge_halfedge(e);
    let t = mesh.twin(h);
    let a = mesh.position(mesh.origin(h)).coords;
    let b = mesh.position(mesh.origin(t)).coords;
    let c = mesh.position(mesh.origin(mesh.next(mesh.next(h)))).coords;
    let d = mesh.position(mesh.origin(mesh.next(mesh.next(t)))).coords;

    Point3::from((a + b) * (3.0 / 8.0) + (c + d) * (1.0 / 8.0))
}
