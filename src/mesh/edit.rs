//! Local topology edits: edge flip and edge split.
//!
//! Both operations rewrite the two triangles on either side of an interior
//! edge and leave every invariant checked by
//! [`HalfEdgeMesh::validate`] intact. Boundary edges are outside their domain:
//! asking for one returns `None` and touches nothing.
//!
//! Every new link is computed from a snapshot of the neighbourhood taken
//! before the first write, so the order of the assignments below does not
//! matter.

use nalgebra::Point3;
use tracing::trace;

use super::halfedge::HalfEdgeMesh;
use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};

/// The two triangles around an interior edge, as seen from its
/// representative half-edge `h0 = a → b`.
///
/// ```text
///            c
///          /   ^
///        h2     h1
///        v       \
///   a ---- h0 ---> b        face f0 = (a, b, c)
///   a <--- t0 ---- b        face f1 = (b, a, d)
///        \       ^
///        t1     t2
///          v   /
///            d
/// ```
#[derive(Debug, Clone, Copy)]
struct Diamond<I: MeshIndex> {
    h0: HalfEdgeId<I>,
    h1: HalfEdgeId<I>,
    h2: HalfEdgeId<I>,
    t0: HalfEdgeId<I>,
    t1: HalfEdgeId<I>,
    t2: HalfEdgeId<I>,
    a: VertexId<I>,
    b: VertexId<I>,
    c: VertexId<I>,
    d: VertexId<I>,
    f0: FaceId<I>,
    f1: FaceId<I>,
}

/// Result of [`HalfEdgeMesh::split_edge_detailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSplit<I: MeshIndex = u32> {
    /// The inserted midpoint vertex. Its half-edge lies on `halves[0]`.
    pub vertex: VertexId<I>,

    /// The two edges lying along the original edge: the original edge itself
    /// (now joining the midpoint to the old half-edge's destination) and the
    /// freshly created other half.
    pub halves: [EdgeId<I>; 2],

    /// The two new edges joining the midpoint to the vertices opposite the
    /// original edge.
    pub spokes: [EdgeId<I>; 2],

    /// The two new faces.
    pub faces: [FaceId<I>; 2],
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Snapshot the two triangles around `e`, or `None` for a boundary edge.
    fn diamond(&self, e: EdgeId<I>) -> Option<Diamond<I>> {
        if self.is_boundary_edge(e) {
            return None;
        }

        let h0 = self.edge_halfedge(e);
        let h1 = self.next(h0);
        let h2 = self.next(h1);
        let t0 = self.twin(h0);
        let t1 = self.next(t0);
        let t2 = self.next(t1);

        Some(Diamond {
            h0,
            h1,
            h2,
            t0,
            t1,
            t2,
            a: self.origin(h0),
            b: self.origin(t0),
            c: self.origin(h2),
            d: self.origin(t2),
            f0: self.face_of(h0),
            f1: self.face_of(t0),
        })
    }

    fn link(
        &mut self,
        he: HalfEdgeId<I>,
        origin: VertexId<I>,
        next: HalfEdgeId<I>,
        face: FaceId<I>,
    ) {
        let h = self.halfedge_mut(he);
        h.origin = origin;
        h.next = next;
        h.face = face;
    }

    fn pair(&mut self, e: EdgeId<I>, he: HalfEdgeId<I>, twin: HalfEdgeId<I>) {
        self.edge_mut(e).halfedge = he;
        for (a, b) in [(he, twin), (twin, he)] {
            let h = self.halfedge_mut(a);
            h.twin = b;
            h.edge = e;
        }
    }

    /// Flip an interior edge.
    ///
    /// The triangles `(a, b, c)` and `(b, a, d)` sharing edge `ab` become
    /// `(a, d, c)` and `(d, b, c)`; the edge keeps its handle and now joins
    /// `d` and `c`. No element is created or destroyed. Flipping the same
    /// edge twice restores the original triangles.
    ///
    /// Returns `None` (and leaves the mesh untouched) for a boundary edge.
    ///
    /// # Example
    /// ```
    /// use loopmesh::prelude::*;
    ///
    /// let mut mesh: HalfEdgeMesh = loopmesh::mesh::primitives::octahedron().unwrap();
    /// let e = EdgeId::new(0);
    /// let before = mesh.edge_vertices(e);
    ///
    /// assert_eq!(mesh.flip_edge(e), Some(e));
    /// assert_ne!(mesh.edge_vertices(e), before);
    /// assert!(mesh.is_valid());
    /// ```
    pub fn flip_edge(&mut self, e: EdgeId<I>) -> Option<EdgeId<I>> {
        let Diamond {
            h0,
            h1,
            h2,
            t0,
            t1,
            t2,
            a,
            b,
            c,
            d,
            f0,
            f1,
        } = self.diamond(e)?;

        // f0 = (a, d, c): t1 a->d, h0 d->c, h2 c->a
        self.link(h0, d, h2, f0);
        self.link(h2, c, t1, f0);
        self.link(t1, a, h0, f0);

        // f1 = (d, b, c): t2 d->b, h1 b->c, t0 c->d
        self.link(t0, c, t2, f1);
        self.link(t2, d, h1, f1);
        self.link(h1, b, t0, f1);

        self.vertex_mut(a).halfedge = t1;
        self.vertex_mut(b).halfedge = h1;
        self.vertex_mut(c).halfedge = t0;
        self.vertex_mut(d).halfedge = h0;

        self.face_mut(f0).halfedge = h0;
        self.face_mut(f1).halfedge = t0;
        self.edge_mut(e).halfedge = h0;

        trace!(?e, ?a, ?b, ?c, ?d, "flipped edge");
        Some(e)
    }

    /// Split an interior edge at its midpoint.
    ///
    /// Inserts one vertex, three edges, six half-edges and two faces; the two
    /// triangles around the edge become four. Returns the new vertex, whose
    /// outgoing half-edge runs along the original edge.
    ///
    /// Returns `None` (and leaves the mesh untouched) for a boundary edge.
    pub fn split_edge(&mut self, e: EdgeId<I>) -> Option<VertexId<I>> {
        self.split_edge_detailed(e).map(|split| split.vertex)
    }

    /// Split an interior edge at its midpoint and report every element the
    /// split produced.
    ///
    /// For the edge `ab` between triangles `(a, b, c)` and `(b, a, d)`, the
    /// midpoint `m` ends up in the four triangles `(m, b, c)`, `(m, c, a)`,
    /// `(m, a, d)` and `(m, d, b)`. The original edge keeps its handle and
    /// joins `m` to `b`.
    pub fn split_edge_detailed(&mut self, e: EdgeId<I>) -> Option<EdgeSplit<I>> {
        let Diamond {
            h0,
            h1,
            h2,
            t0,
            t1,
            t2,
            a,
            b,
            c,
            d,
            f0,
            f1,
        } = self.diamond(e)?;

        let midpoint = Point3::from((self.position(a).coords + self.position(b).coords) * 0.5);
        let m = self.new_vertex(midpoint);

        let e_am = self.new_edge();
        let e_cm = self.new_edge();
        let e_dm = self.new_edge();

        let am = self.new_halfedge(); // a -> m
        let ma = self.new_halfedge(); // m -> a
        let cm = self.new_halfedge(); // c -> m
        let mc = self.new_halfedge(); // m -> c
        let dm = self.new_halfedge(); // d -> m
        let md = self.new_halfedge(); // m -> d

        let f2 = self.new_face();
        let f3 = self.new_face();

        self.pair(e_am, am, ma);
        self.pair(e_cm, cm, mc);
        self.pair(e_dm, dm, md);

        // f0 = (m, b, c)
        self.link(h0, m, h1, f0);
        self.link(h1, b, cm, f0);
        self.link(cm, c, h0, f0);

        // f2 = (m, c, a)
        self.link(mc, m, h2, f2);
        self.link(h2, c, am, f2);
        self.link(am, a, mc, f2);

        // f3 = (m, a, d)
        self.link(ma, m, t1, f3);
        self.link(t1, a, dm, f3);
        self.link(dm, d, ma, f3);

        // f1 = (m, d, b)
        self.link(md, m, t2, f1);
        self.link(t2, d, t0, f1);
        self.link(t0, b, md, f1);

        self.vertex_mut(m).halfedge = h0;
        self.vertex_mut(a).halfedge = am;
        self.vertex_mut(b).halfedge = h1;
        self.vertex_mut(c).halfedge = h2;
        self.vertex_mut(d).halfedge = t2;

        self.face_mut(f0).halfedge = h0;
        self.face_mut(f1).halfedge = t0;
        self.face_mut(f2).halfedge = mc;
        self.face_mut(f3).halfedge = ma;

        self.edge_mut(e).halfedge = h0;

        trace!(?e, ?m, ?a, ?b, "split edge");
        Some(EdgeSplit {
            vertex: m,
            halves: [e, e_am],
            spokes: [e_cm, e_dm],
            faces: [f2, f3],
        })
    }
}
