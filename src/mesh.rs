// Copyright 2025 Lars Brubaker
// License: BSD-3-Clause (Poly2Tri Copyright (c) 2009-2011, Poly2Tri Contributors)
//
// The triangle mesh. Triangles live in a Vec arena and refer to each other and
// to points by u32 index; INVALID (u32::MAX) is the null link.
//
// Conventions:
//   - points[0..3] are counter-clockwise.
//   - neighbors[i] is the triangle across the edge opposite points[i].
//   - constrained_edge[i] / delaunay_edge[i] flag that same edge.
//   - For a point at index i, "cw" means index (i + 2) % 3 and "ccw" means
//     index (i + 1) % 3; the cw edge is the one opposite the ccw point.

use crate::error::{P2tError, P2tResult};
use crate::geom::{orient2d, Orientation, Point, Real};

pub const INVALID: u32 = u32::MAX;

/// Index into the point list of a sweep.
pub type PointIdx = u32;
/// Index into Mesh::triangles
pub type TriIdx = u32;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    pub points: [PointIdx; 3],
    pub neighbors: [TriIdx; 3],
    /// Edges that must never be flipped.
    pub constrained_edge: [bool; 3],
    /// Edges already known to be Delaunay during the current legalization.
    pub delaunay_edge: [bool; 3],
    /// Set by the finalizer on triangles that belong to the output.
    pub interior: bool,
}

impl Triangle {
    pub fn new(a: PointIdx, b: PointIdx, c: PointIdx) -> Self {
        Triangle {
            points: [a, b, c],
            neighbors: [INVALID; 3],
            constrained_edge: [false; 3],
            delaunay_edge: [false; 3],
            interior: false,
        }
    }

    #[inline]
    pub fn index(&self, p: PointIdx) -> Option<usize> {
        self.points.iter().position(|&q| q == p)
    }

    #[inline]
    pub fn contains(&self, p: PointIdx) -> bool {
        self.points.contains(&p)
    }

    #[inline]
    pub fn contains_edge(&self, p: PointIdx, q: PointIdx) -> bool {
        self.contains(p) && self.contains(q)
    }

    /// Index of the edge (p, q), i.e. the index of the third point.
    pub fn edge_index(&self, p: PointIdx, q: PointIdx) -> Option<usize> {
        let i = self.index(p)?;
        let j = self.index(q)?;
        if i == j {
            return None;
        }
        Some(3 - i - j)
    }

    /// Slot of `p`. The cw/ccw accessors below take a vertex of the
    /// triangle; any other point is a broken mesh and panics here.
    #[inline]
    fn idx(&self, p: PointIdx) -> usize {
        match self.index(p) {
            Some(i) => i,
            None => panic!("point {} not in triangle {:?}", p, self.points),
        }
    }

    #[inline]
    pub fn point_cw(&self, p: PointIdx) -> PointIdx {
        self.points[(self.idx(p) + 2) % 3]
    }

    #[inline]
    pub fn point_ccw(&self, p: PointIdx) -> PointIdx {
        self.points[(self.idx(p) + 1) % 3]
    }

    #[inline]
    pub fn neighbor_cw(&self, p: PointIdx) -> TriIdx {
        self.neighbors[(self.idx(p) + 1) % 3]
    }

    #[inline]
    pub fn neighbor_ccw(&self, p: PointIdx) -> TriIdx {
        self.neighbors[(self.idx(p) + 2) % 3]
    }

    #[inline]
    pub fn neighbor_across(&self, p: PointIdx) -> TriIdx {
        self.neighbors[self.idx(p)]
    }

    #[inline]
    pub fn constrained_edge_cw(&self, p: PointIdx) -> bool {
        self.constrained_edge[(self.idx(p) + 1) % 3]
    }

    #[inline]
    pub fn constrained_edge_ccw(&self, p: PointIdx) -> bool {
        self.constrained_edge[(self.idx(p) + 2) % 3]
    }

    #[inline]
    pub fn constrained_edge_across(&self, p: PointIdx) -> bool {
        self.constrained_edge[self.idx(p)]
    }

    #[inline]
    pub fn set_constrained_edge_cw(&mut self, p: PointIdx, value: bool) {
        let i = (self.idx(p) + 1) % 3;
        self.constrained_edge[i] = value;
    }

    #[inline]
    pub fn set_constrained_edge_ccw(&mut self, p: PointIdx, value: bool) {
        let i = (self.idx(p) + 2) % 3;
        self.constrained_edge[i] = value;
    }

    #[inline]
    pub fn delaunay_edge_cw(&self, p: PointIdx) -> bool {
        self.delaunay_edge[(self.idx(p) + 1) % 3]
    }

    #[inline]
    pub fn delaunay_edge_ccw(&self, p: PointIdx) -> bool {
        self.delaunay_edge[(self.idx(p) + 2) % 3]
    }

    #[inline]
    pub fn set_delaunay_edge_cw(&mut self, p: PointIdx, value: bool) {
        let i = (self.idx(p) + 1) % 3;
        self.delaunay_edge[i] = value;
    }

    #[inline]
    pub fn set_delaunay_edge_ccw(&mut self, p: PointIdx, value: bool) {
        let i = (self.idx(p) + 2) % 3;
        self.delaunay_edge[i] = value;
    }

    /// Mark edge (p, q) constrained on this triangle only. Returns false if the
    /// triangle has no such edge.
    pub fn mark_constrained_edge(&mut self, p: PointIdx, q: PointIdx) -> bool {
        match self.edge_index(p, q) {
            Some(i) => {
                self.constrained_edge[i] = true;
                true
            }
            None => false,
        }
    }

    /// The vertex of `self` that is not on the edge shared with `t`, where the
    /// shared edge is the one opposite `p` in `t`. None if `p` is not in `t`
    /// or `self` does not hold that edge.
    #[inline]
    pub fn opposite_point(&self, t: &Triangle, p: PointIdx) -> Option<PointIdx> {
        let i = t.index(p)?;
        let j = self.edge_index(t.points[(i + 1) % 3], t.points[(i + 2) % 3])?;
        Some(self.points[j])
    }

    /// Rotate the triangle's vertices so that edge (o, n) replaces the edge
    /// opposite `o`'s ccw point. Used when flipping a shared edge one vertex
    /// clockwise: `o` stays, `n` is the opposite vertex of the neighbor.
    pub fn rotate(&mut self, o: PointIdx, n: PointIdx) {
        let i = self.idx(o);
        let cw = self.points[(i + 2) % 3];
        self.points[i] = cw;
        self.points[(i + 1) % 3] = o;
        self.points[(i + 2) % 3] = n;
    }

    #[inline]
    pub fn clear_neighbors(&mut self) {
        self.neighbors = [INVALID; 3];
    }

    #[inline]
    pub fn clear_delaunay_edges(&mut self) {
        self.delaunay_edge = [false; 3];
    }
}

/// Arena of triangles, exclusively owning every cell of one sweep.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Mesh {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Mesh {
            triangles: Vec::with_capacity(n),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn get(&self, t: TriIdx) -> &Triangle {
        &self.triangles[t as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, t: TriIdx) -> &mut Triangle {
        &mut self.triangles[t as usize]
    }

    /// Create the triangle (a, b, c). The vertices must turn counter-clockwise;
    /// a collinear or inverted triple is reported instead of stored.
    pub fn add_triangle(
        &mut self,
        points: &[Point],
        a: PointIdx,
        b: PointIdx,
        c: PointIdx,
        tolerance: Real,
    ) -> P2tResult<TriIdx> {
        let (pa, pb, pc) = (points[a as usize], points[b as usize], points[c as usize]);
        if orient2d(&pa, &pb, &pc, tolerance) != Orientation::CounterClockwise {
            return Err(P2tError::DegenerateGeometry { a: pa, b: pb, c: pc });
        }
        let idx = self.triangles.len() as TriIdx;
        self.triangles.push(Triangle::new(a, b, c));
        Ok(idx)
    }

    /// Link `a` and `b` across their shared edge. The constrained flag of the
    /// shared edge is the union of both sides. Returns false if they share no
    /// edge.
    pub fn mark_neighbor(&mut self, a: TriIdx, b: TriIdx) -> bool {
        let ta = self.triangles[a as usize];
        let tb = self.triangles[b as usize];
        for i in 0..3 {
            let p = ta.points[(i + 1) % 3];
            let q = ta.points[(i + 2) % 3];
            if let Some(j) = tb.edge_index(p, q) {
                let constrained = ta.constrained_edge[i] || tb.constrained_edge[j];
                let t = &mut self.triangles[a as usize];
                t.neighbors[i] = b;
                t.constrained_edge[i] = constrained;
                let t = &mut self.triangles[b as usize];
                t.neighbors[j] = a;
                t.constrained_edge[j] = constrained;
                return true;
            }
        }
        false
    }

    /// Mark edge (p, q) of `t` constrained on both sides.
    pub fn mark_constrained_edge(&mut self, t: TriIdx, p: PointIdx, q: PointIdx) -> bool {
        let tri = &mut self.triangles[t as usize];
        let Some(i) = tri.edge_index(p, q) else {
            return false;
        };
        tri.constrained_edge[i] = true;
        let n = tri.neighbors[i];
        if n != INVALID {
            self.triangles[n as usize].mark_constrained_edge(p, q);
        }
        true
    }

    /// Flip the edge shared by `t` and `ot` one vertex clockwise. `p` is the
    /// vertex of `t` opposite the shared edge and `op` the vertex of `ot`
    /// opposite it; afterwards both triangles share the edge (p, op), which is
    /// left unconstrained and carries `delaunay` as its Delaunay flag.
    ///
    /// Returns true if any of the four outer edges lies on the mesh boundary,
    /// i.e. the pair may need remapping onto the advancing front.
    pub fn rotate_pair(
        &mut self,
        t: TriIdx,
        p: PointIdx,
        ot: TriIdx,
        op: PointIdx,
        delaunay: bool,
    ) -> bool {
        let tt = self.triangles[t as usize];
        let oo = self.triangles[ot as usize];

        let n1 = tt.neighbor_ccw(p);
        let n2 = tt.neighbor_cw(p);
        let n3 = oo.neighbor_ccw(op);
        let n4 = oo.neighbor_cw(op);

        let ce1 = tt.constrained_edge_ccw(p);
        let ce2 = tt.constrained_edge_cw(p);
        let ce3 = oo.constrained_edge_ccw(op);
        let ce4 = oo.constrained_edge_cw(op);

        let de1 = tt.delaunay_edge_ccw(p);
        let de2 = tt.delaunay_edge_cw(p);
        let de3 = oo.delaunay_edge_ccw(op);
        let de4 = oo.delaunay_edge_cw(op);

        {
            let t_ref = &mut self.triangles[t as usize];
            t_ref.rotate(p, op);
            t_ref.set_delaunay_edge_cw(p, de2);
            t_ref.set_delaunay_edge_ccw(op, de3);
            t_ref.set_constrained_edge_cw(p, ce2);
            t_ref.set_constrained_edge_ccw(op, ce3);
            if let Some(diag) = t_ref.edge_index(p, op) {
                t_ref.constrained_edge[diag] = false;
                t_ref.delaunay_edge[diag] = delaunay;
            }
            t_ref.clear_neighbors();
        }
        {
            let o_ref = &mut self.triangles[ot as usize];
            o_ref.rotate(op, p);
            o_ref.set_delaunay_edge_ccw(p, de1);
            o_ref.set_delaunay_edge_cw(op, de4);
            o_ref.set_constrained_edge_ccw(p, ce1);
            o_ref.set_constrained_edge_cw(op, ce4);
            if let Some(diag) = o_ref.edge_index(p, op) {
                o_ref.constrained_edge[diag] = false;
                o_ref.delaunay_edge[diag] = delaunay;
            }
            o_ref.clear_neighbors();
        }

        if n1 != INVALID {
            self.mark_neighbor(ot, n1);
        }
        if n2 != INVALID {
            self.mark_neighbor(t, n2);
        }
        if n3 != INVALID {
            self.mark_neighbor(t, n3);
        }
        if n4 != INVALID {
            self.mark_neighbor(ot, n4);
        }
        self.mark_neighbor(t, ot);

        n1 == INVALID || n2 == INVALID || n3 == INVALID || n4 == INVALID
    }

    /// First triangle holding edge (p, q). Linear scan; diagnostics only.
    pub fn find_edge(&self, p: PointIdx, q: PointIdx) -> Option<TriIdx> {
        self.triangles
            .iter()
            .position(|t| t.contains_edge(p, q))
            .map(|i| i as TriIdx)
    }

    /// Check that every neighbor link is mirrored and that linked triangles
    /// share exactly one edge. Returns the first offending triangle.
    pub fn validate_neighbors(&self) -> Result<(), TriIdx> {
        for (i, t) in self.triangles.iter().enumerate() {
            for k in 0..3 {
                let n = t.neighbors[k];
                if n == INVALID {
                    continue;
                }
                let p = t.points[(k + 1) % 3];
                let q = t.points[(k + 2) % 3];
                let Some(other) = self.triangles.get(n as usize) else {
                    return Err(i as TriIdx);
                };
                match other.edge_index(p, q) {
                    Some(j) if other.neighbors[j] == i as TriIdx => {
                        if other.constrained_edge[j] != t.constrained_edge[k] {
                            return Err(i as TriIdx);
                        }
                    }
                    _ => return Err(i as TriIdx),
                }
            }
        }
        Ok(())
    }

    /// True if no unconstrained edge of `t` has its opposite neighbor vertex
    /// strictly inside the circumcircle of `t`.
    pub fn is_locally_delaunay(&self, t: TriIdx, points: &[Point]) -> bool {
        let tri = self.get(t);
        for i in 0..3 {
            let n = tri.neighbors[i];
            if n == INVALID || tri.constrained_edge[i] {
                continue;
            }
            let p = tri.points[i];
            let Some(op) = self.get(n).opposite_point(tri, p) else {
                return false;
            };
            if crate::geom::in_circle(
                &points[p as usize],
                &points[tri.point_ccw(p) as usize],
                &points[tri.point_cw(p) as usize],
                &points[op as usize],
            ) {
                return false;
            }
        }
        true
    }
}
