//! Half-edge mesh store.
//!
//! The store owns four arenas (vertices, edges, faces and half-edges) and
//! every link between elements is a typed handle into one of them. Elements
//! are appended, never removed, so handles remain valid across edits and
//! traversal order is insertion order.
//!
//! # Structure
//!
//! - Each undirected **edge** owns two **half-edges** pointing in opposite
//!   directions; each stores the other as its **twin**
//! - Each half-edge knows its **origin** vertex, its **edge**, its **face**
//!   and the **next** half-edge around that face
//! - Each vertex stores one outgoing half-edge
//! - Each face stores one half-edge on its boundary
//!
//! # Boundary Handling
//!
//! A boundary half-edge has an invalid face handle. Its twin is the interior
//! half-edge, and boundary half-edges are linked into loops with `next`, so
//! the `twin → next` walk around a vertex always closes.

use nalgebra::{Point3, Vector3};

use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    /// For boundary vertices built by the builder, this is a boundary half-edge.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create an unlinked vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }

    /// Create an unlinked vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// An undirected edge: the pair of twin half-edges between two vertices.
#[derive(Debug, Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    /// Either of the edge's two half-edges.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Default for Edge<I> {
    fn default() -> Self {
        Self {
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A directed half-edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge of the same edge.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId<I>,

    /// The undirected edge this half-edge belongs to.
    pub edge: EdgeId<I>,

    /// The face this half-edge bounds.
    /// Invalid for boundary half-edges.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create an unlinked half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            edge: EdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A triangular face.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a face bounded by the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self {
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge mesh for triangle meshes.
///
/// All elements are owned here; everything else refers to them by handle.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) edges: Vec<Edge<I>>,
    pub(crate) faces: Vec<Face<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            halfedges: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Closed triangle mesh: E = 3F/2. Leave some slack for boundary edges.
        let num_edges = num_faces * 3 / 2 + num_faces / 2;

        Self {
            vertices: Vec::with_capacity(num_vertices),
            edges: Vec::with_capacity(num_edges),
            faces: Vec::with_capacity(num_faces),
            halfedges: Vec::with_capacity(num_edges * 2),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of half-edges, including boundary half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get a mutable edge by ID.
    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId<I>) -> &mut Edge<I> {
        &mut self.edges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get a mutable face by ID.
    #[inline]
    pub fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        &mut self.faces[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by ID.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Allocation ====================
    //
    // Freshly allocated elements carry invalid links. The caller is
    // responsible for wiring them before handing the mesh to anything that
    // assumes the invariants.

    /// Append a vertex at `position` and return its ID.
    pub fn new_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Append an unlinked edge and return its ID.
    pub fn new_edge(&mut self) -> EdgeId<I> {
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge::default());
        id
    }

    /// Append an unlinked face and return its ID.
    pub fn new_face(&mut self) -> FaceId<I> {
        let id = FaceId::new(self.faces.len());
        self.faces.push(Face::default());
        id
    }

    /// Append an unlinked half-edge and return its ID.
    pub fn new_halfedge(&mut self) -> HalfEdgeId<I> {
        let id = HalfEdgeId::new(self.halfedges.len());
        self.halfedges.push(HalfEdge::new());
        id
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    ///
    /// Walks the `next` loop; returns an invalid handle if the loop does not
    /// come back to `he`.
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        let mut current = he;
        for _ in 0..self.halfedges.len() {
            let next = self.next(current);
            if next == he {
                return current;
            }
            if !next.is_valid() {
                break;
            }
            current = next;
        }
        HalfEdgeId::invalid()
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the undirected edge of a half-edge.
    #[inline]
    pub fn edge_of(&self, he: HalfEdgeId<I>) -> EdgeId<I> {
        self.halfedge(he).edge
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Get the representative half-edge of an edge.
    #[inline]
    pub fn edge_halfedge(&self, e: EdgeId<I>) -> HalfEdgeId<I> {
        self.edge(e).halfedge
    }

    /// Get the two endpoints of an edge, starting with the origin of its
    /// representative half-edge.
    pub fn edge_vertices(&self, e: EdgeId<I>) -> [VertexId<I>; 2] {
        let he = self.edge_halfedge(e);
        [self.origin(he), self.dest(he)]
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if an edge borders an open boundary.
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        let he = self.edge_halfedge(e);
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    /// Check if a vertex is on the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        if !self.vertex(v).halfedge.is_valid() {
            return true; // Isolated vertex
        }
        self.vertex_halfedges(v)
            .any(|he| self.is_boundary_halfedge(he))
    }

    /// Count the edges that border an open boundary.
    pub fn num_boundary_edges(&self) -> usize {
        self.edge_ids().filter(|&e| self.is_boundary_edge(e)).count()
    }

    /// Check whether the mesh has no boundary.
    pub fn is_closed(&self) -> bool {
        self.halfedges.iter().all(|he| !he.is_boundary())
    }

    // ==================== Iteration ====================
    //
    // The `*_ids` iterators capture only the element count at the time of the
    // call and do not borrow the mesh. A loop over them may keep editing the
    // mesh: it visits exactly the elements that existed when it started.

    /// Iterate over all vertex IDs present now.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all edge IDs present now.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all face IDs present now.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all half-edge IDs present now.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all edges with their IDs.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId<I>, &Edge<I>)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over half-edges around a vertex (outgoing half-edges).
    ///
    /// The walk is bounded by the number of half-edges in the mesh, so a
    /// corrupted ring ends the iteration early instead of spinning forever.
    /// Use [`vertex_ring`](Self::vertex_ring) to detect that case.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Collect the outgoing half-edges of a vertex, failing if the ring does
    /// not close.
    pub fn vertex_ring(&self, v: VertexId<I>) -> Result<Vec<HalfEdgeId<I>>> {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return Ok(Vec::new());
        }

        let limit = self.halfedges.len();
        let mut ring = Vec::with_capacity(8);
        let mut he = start;
        loop {
            ring.push(he);
            if ring.len() > limit {
                return Err(MeshError::CorruptRing {
                    vertex: v.index(),
                    steps: ring.len(),
                });
            }

            let twin = self.twin(he);
            if !twin.is_valid() || !self.next(twin).is_valid() {
                return Err(MeshError::CorruptRing {
                    vertex: v.index(),
                    steps: ring.len(),
                });
            }
            he = self.next(twin);
            if he == start {
                return Ok(ring);
            }
        }
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over faces adjacent to a vertex.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v)
            .map(|he| self.face_of(he))
            .filter(|f| f.is_valid())
    }

    /// Compute the valence (degree) of a vertex.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Get the three vertices of a triangular face.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    /// Get the positions of the three vertices of a triangular face.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    // ==================== Geometry ====================

    /// Compute the unit normal of a face, or zero for a degenerate face.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        self.face_area_vector(f)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Cross product of two edge vectors of a face. Its length is twice the
    /// face area.
    fn face_area_vector(&self, f: FaceId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        0.5 * self.face_area_vector(f).norm()
    }

    /// Compute the area-weighted unit normal at a vertex.
    ///
    /// Sums the unnormalized face normals of the incident faces, so larger
    /// triangles pull harder. Returns the zero vector when the sum vanishes
    /// (isolated vertex or degenerate neighbourhood).
    pub fn vertex_normal(&self, v: VertexId<I>) -> Vector3<f64> {
        let sum: Vector3<f64> = self
            .vertex_faces(v)
            .map(|f| self.face_area_vector(f))
            .sum();
        sum.try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Compute the length of an edge.
    pub fn edge_length(&self, e: EdgeId<I>) -> f64 {
        let [a, b] = self.edge_vertices(e);
        (self.position(b) - self.position(a)).norm()
    }

    /// Compute the midpoint of an edge.
    pub fn edge_midpoint(&self, e: EdgeId<I>) -> Point3<f64> {
        let [a, b] = self.edge_vertices(e);
        Point3::from((self.position(a).coords + self.position(b).coords) * 0.5)
    }

    /// Compute the centroid of a face.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let bounds = self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        });
        Some(bounds)
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Euler characteristic `V - E + F`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    // ==================== Validation ====================

    /// Check the connectivity invariants, reporting the first violation.
    ///
    /// - every half-edge has a twin, `twin(twin(h)) == h`, and both share
    ///   one edge
    /// - `next` stays within the face and starts where the previous half-edge
    ///   ended
    /// - every face is a loop of exactly three half-edges
    /// - every edge, vertex and face points at a half-edge that belongs to it
    /// - an edge never has the same face on both sides
    pub fn validate(&self) -> Result<()> {
        let nh = self.halfedges.len();
        let in_range = |he: HalfEdgeId<I>| he.is_valid() && he.index() < nh;

        for (hid, he) in self.halfedges() {
            if !in_range(he.twin) {
                return Err(MeshError::invalid_state(format!("{:?} has no twin", hid)));
            }
            let twin = self.halfedge(he.twin);
            if he.twin == hid || twin.twin != hid {
                return Err(MeshError::invalid_state(format!(
                    "{:?} and {:?} are not mutual twins",
                    hid, he.twin
                )));
            }
            if !he.edge.is_valid() || he.edge.index() >= self.edges.len() || twin.edge != he.edge
            {
                return Err(MeshError::invalid_state(format!(
                    "{:?} and its twin disagree on their edge",
                    hid
                )));
            }
            if !he.origin.is_valid() || he.origin.index() >= self.vertices.len() {
                return Err(MeshError::invalid_state(format!("{:?} has no origin", hid)));
            }
            if !in_range(he.next) {
                return Err(MeshError::invalid_state(format!("{:?} has no next", hid)));
            }
            let next = self.halfedge(he.next);
            if next.origin != twin.origin {
                return Err(MeshError::invalid_state(format!(
                    "{:?} ends at {:?} but next {:?} starts at {:?}",
                    hid, twin.origin, he.next, next.origin
                )));
            }
            if next.face != he.face {
                return Err(MeshError::invalid_state(format!(
                    "{:?} and next {:?} bound different faces",
                    hid, he.next
                )));
            }
            if he.face.is_valid() && he.face.index() >= self.faces.len() {
                return Err(MeshError::invalid_state(format!(
                    "{:?} references missing {:?}",
                    hid, he.face
                )));
            }
        }

        for (eid, edge) in self.edges() {
            if !in_range(edge.halfedge) || self.edge_of(edge.halfedge) != eid {
                return Err(MeshError::invalid_state(format!(
                    "{:?} does not point at one of its half-edges",
                    eid
                )));
            }
            let he = edge.halfedge;
            let (f0, f1) = (self.face_of(he), self.face_of(self.twin(he)));
            if !f0.is_valid() && !f1.is_valid() {
                return Err(MeshError::invalid_state(format!("{:?} has no face", eid)));
            }
            if f0 == f1 {
                return Err(MeshError::invalid_state(format!(
                    "{:?} has {:?} on both sides",
                    eid, f0
                )));
            }
        }

        for (vid, v) in self.vertices() {
            if v.halfedge.is_valid() && (!in_range(v.halfedge) || self.origin(v.halfedge) != vid) {
                return Err(MeshError::invalid_state(format!(
                    "{:?} points at {:?} which does not start there",
                    vid, v.halfedge
                )));
            }
        }

        for (fid, f) in self.faces() {
            if !in_range(f.halfedge) || self.face_of(f.halfedge) != fid {
                return Err(MeshError::invalid_state(format!(
                    "{:?} does not point at one of its half-edges",
                    fid
                )));
            }
            let sides = self.face_halfedges(fid).take(4).count();
            if sides != 3 {
                return Err(MeshError::invalid_state(format!(
                    "{:?} has {} sides",
                    fid, sides
                )));
            }
        }

        self.check_vertex_fans()
    }

    /// Every outgoing half-edge of a vertex must lie on its ring walk.
    ///
    /// Fails with [`MeshError::NonManifoldVertex`] for a vertex shared by
    /// two fans that only meet at that vertex.
    pub(crate) fn check_vertex_fans(&self) -> Result<()> {
        let mut incident = vec![0usize; self.vertices.len()];
        for (_, he) in self.halfedges() {
            if let Some(count) = incident.get_mut(he.origin.index()) {
                *count += 1;
            }
        }

        for v in self.vertex_ids() {
            let reached = self.vertex_ring(v)?.len();
            if reached != incident[v.index()] {
                return Err(MeshError::NonManifoldVertex {
                    vertex: v.index(),
                    reached,
                    incident: incident[v.index()],
                });
            }
        }
        Ok(())
    }

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    remaining: usize,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            remaining: if start.is_valid() { mesh.num_halfedges() } else { 0 },
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.current;

        // If he goes v -> w, twin(he) goes w -> v and the half-edge after it
        // in its face leaves v again.
        let twin = self.mesh.twin(self.current);
        self.current = if twin.is_valid() {
            self.mesh.next(twin)
        } else {
            HalfEdgeId::invalid()
        };

        if self.current == self.start || !self.current.is_valid() {
            self.remaining = 0;
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    remaining: usize,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            remaining: if start.is_valid() { mesh.num_halfedges() } else { 0 },
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start || !self.current.is_valid() {
            self.remaining = 0;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives;

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::<u32>::from_coords(1.0, 2.0, 3.0);
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!v.halfedge.is_valid());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_edges(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.is_valid());
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_allocation_is_unlinked() {
        let mut mesh = HalfEdgeMesh::<u32>::new();
        let v = mesh.new_vertex(Point3::new(1.0, 0.0, 0.0));
        let e = mesh.new_edge();
        let f = mesh.new_face();
        let h = mesh.new_halfedge();

        assert_eq!(v.index(), 0);
        assert_eq!(e.index(), 0);
        assert_eq!(f.index(), 0);
        assert_eq!(h.index(), 0);
        assert!(!mesh.vertex(v).halfedge.is_valid());
        assert!(!mesh.edge(e).halfedge.is_valid());
        assert!(!mesh.face(f).halfedge.is_valid());
        assert!(!mesh.twin(h).is_valid());
        assert!(!mesh.is_valid());
    }

    #[test]
    fn test_id_iterators_are_snapshots() {
        let mut mesh: HalfEdgeMesh = primitives::tetrahedron().unwrap();
        let mut visited = 0;
        for _e in mesh.edge_ids() {
            mesh.new_edge();
            visited += 1;
        }
        assert_eq!(visited, 6);
        assert_eq!(mesh.num_edges(), 12);
    }

    #[test]
    fn test_tetrahedron_queries() {
        let mesh: HalfEdgeMesh = primitives::tetrahedron().unwrap();
        assert!(mesh.is_closed());
        assert_eq!(mesh.num_boundary_edges(), 0);
        assert_eq!(mesh.euler_characteristic(), 2);

        for v in mesh.vertex_ids() {
            assert_eq!(mesh.valence(v), 3);
            assert_eq!(mesh.vertex_ring(v).unwrap().len(), 3);
            assert_eq!(mesh.vertex_faces(v).count(), 3);
            assert!(!mesh.is_boundary_vertex(v));
        }

        for he in mesh.halfedge_ids() {
            let prev = mesh.prev(he);
            assert_eq!(mesh.next(prev), he);
            assert_eq!(mesh.next(mesh.next(he)), prev);
        }
    }

    #[test]
    fn test_vertex_normal_points_outward() {
        let mesh: HalfEdgeMesh = primitives::octahedron().unwrap();
        for v in mesh.vertex_ids() {
            let n = mesh.vertex_normal(v);
            let p = mesh.position(v).coords.normalize();
            assert!((n.norm() - 1.0).abs() < 1e-12);
            assert!((n - p).norm() < 1e-12, "normal {:?} at {:?}", n, p);
        }
    }

    #[test]
    fn test_vertex_normal_degenerate_is_zero() {
        let mut mesh = HalfEdgeMesh::<u32>::new();
        let v = mesh.new_vertex(Point3::origin());
        assert_eq!(mesh.vertex_normal(v), Vector3::zeros());
    }

    #[test]
    fn test_corrupt_ring_is_reported() {
        let mut mesh: HalfEdgeMesh = primitives::octahedron().unwrap();
        let v = VertexId::new(0);
        let start = mesh.vertex(v).halfedge;
        // Send the walk somewhere that never returns to the start.
        let twin = mesh.twin(start);
        let detour = mesh.twin(mesh.next(start));
        mesh.halfedge_mut(twin).next = detour;

        assert!(mesh.validate().is_err());
        assert!(mesh.valence(v) <= mesh.num_halfedges());
        assert!(matches!(
            mesh.vertex_ring(v),
            Err(MeshError::CorruptRing { vertex: 0, .. })
        ));
    }

    #[test]
    fn test_pinched_vertex_fails_validation() {
        let mut mesh: HalfEdgeMesh = primitives::octahedron().unwrap();
        // Detach one outgoing half-edge of vertex 0 from the walk by
        // pointing the vertex at a ring that skips it.
        let v = VertexId::new(0);
        let start = mesh.vertex(v).halfedge;
        let skipped = mesh.next(mesh.twin(start));
        let after = mesh.next(mesh.twin(skipped));
        let twin = mesh.twin(start);
        mesh.halfedge_mut(twin).next = after;

        assert!(matches!(
            mesh.check_vertex_fans(),
            Err(MeshError::NonManifoldVertex { vertex: 0, reached: 3, incident: 4 })
        ));
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_geometry_of_unit_square() {
        let mesh: HalfEdgeMesh = primitives::grid(1, 1.0).unwrap();
        assert!((mesh.surface_area() - 1.0).abs() < 1e-12);
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
        for f in mesh.face_ids() {
            assert!((mesh.face_normal(f).z - 1.0).abs() < 1e-12);
            assert!((mesh.face_area(f) - 0.5).abs() < 1e-12);
        }
    }
}
