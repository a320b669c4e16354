// Copyright 2025 Lars Brubaker
// Constraint recovery: edge events, front filling along a constraint, and the
// flip / flip-scan procedure that clears every edge crossing it.

use tracing::{debug, trace};

use super::{EdgeEvent, Sweep};
use crate::context::Edge;
use crate::error::{P2tError, P2tResult};
use crate::front::NodeIdx;
use crate::geom::{in_scan_area, Orientation};
use crate::mesh::{PointIdx, TriIdx, INVALID};

/// Steps allowed per constraint, per triangle in the mesh.
const FLIP_BUDGET_PER_TRIANGLE: usize = 8;
const FLIP_BUDGET_MIN: usize = 256;

impl Sweep {
    /// Make `edge` an edge of the mesh. `node` is the front node of `edge.q`,
    /// the point just swept.
    pub(super) fn edge_event(&mut self, edge: Edge, node: NodeIdx) -> P2tResult<()> {
        self.edge_event = EdgeEvent {
            constrained_edge: edge,
            right: self.pt(edge.p).x > self.pt(edge.q).x,
        };
        self.flip_budget = (FLIP_BUDGET_PER_TRIANGLE * self.mesh.len()).max(FLIP_BUDGET_MIN);

        let t = self.front.triangle(node);
        if t != INVALID && self.is_edge_side_of_triangle(t, edge.p, edge.q) {
            return Ok(());
        }

        self.fill_edge_event(edge, node)?;

        let t = self.front.triangle(node);
        self.edge_event_points(edge.p, edge.q, t, edge.q)
    }

    /// If `t` already has the edge (ep, eq), mark it constrained on both sides.
    fn is_edge_side_of_triangle(&mut self, t: TriIdx, ep: PointIdx, eq: PointIdx) -> bool {
        self.mesh.mark_constrained_edge(t, ep, eq)
    }

    fn spend_flip_budget(&mut self, ep: PointIdx, eq: PointIdx) -> P2tResult<()> {
        if self.flip_budget == 0 {
            return Err(self.unresolvable(ep, eq, "flip budget exhausted"));
        }
        self.flip_budget -= 1;
        Ok(())
    }

    fn unresolvable(&self, ep: PointIdx, eq: PointIdx, reason: &str) -> P2tError {
        P2tError::UnresolvableConstraint {
            p: *self.pt(ep),
            q: *self.pt(eq),
            reason: reason.to_string(),
        }
    }

    fn degenerate(&self, a: PointIdx, b: PointIdx, c: PointIdx) -> P2tError {
        P2tError::DegenerateGeometry {
            a: *self.pt(a),
            b: *self.pt(b),
            c: *self.pt(c),
        }
    }

    // ─────── Walking around eq ────────────────────────────────────────────────

    /// Rotate around `p` (an endpoint of the constraint, in `t`) until the
    /// triangle the constraint leaves through is found, then flip it open.
    /// A point lying exactly on the constraint splits it: the part up to that
    /// point is marked and the walk continues from there.
    fn edge_event_points(
        &mut self,
        ep: PointIdx,
        mut eq: PointIdx,
        mut t: TriIdx,
        mut p: PointIdx,
    ) -> P2tResult<()> {
        loop {
            self.spend_flip_budget(ep, eq)?;
            if t == INVALID {
                return Err(self.unresolvable(ep, eq, "walked off the mesh"));
            }
            if self.is_edge_side_of_triangle(t, ep, eq) {
                return Ok(());
            }
            let tri = *self.mesh.get(t);
            if !tri.contains(p) {
                return Err(self.unresolvable(ep, eq, "lost the walk around the endpoint"));
            }

            let p1 = tri.point_ccw(p);
            let o1 = self.orient(eq, p1, ep);
            if o1.is_collinear() {
                if tri.contains_edge(eq, p1) {
                    self.mesh.mark_constrained_edge(t, eq, p1);
                    self.edge_event.constrained_edge.q = p1;
                    t = tri.neighbor_across(p);
                    eq = p1;
                    p = p1;
                    continue;
                }
                return Err(self.degenerate(eq, p1, ep));
            }

            let p2 = tri.point_cw(p);
            let o2 = self.orient(eq, p2, ep);
            if o2.is_collinear() {
                if tri.contains_edge(eq, p2) {
                    self.mesh.mark_constrained_edge(t, eq, p2);
                    self.edge_event.constrained_edge.q = p2;
                    t = tri.neighbor_across(p);
                    eq = p2;
                    p = p2;
                    continue;
                }
                return Err(self.degenerate(eq, p2, ep));
            }

            if o1 == o2 {
                // The constraint doesn't pass through this triangle; step
                // around p toward it.
                t = if o1.is_cw() {
                    tri.neighbor_ccw(p)
                } else {
                    tri.neighbor_cw(p)
                };
                continue;
            }

            return self.flip_edge_event(ep, eq, t, p);
        }
    }

    // ─────── Flipping ─────────────────────────────────────────────────────────

    /// Flip the edges crossing (ep, eq) one by one, starting with the edge of
    /// `t` opposite `p`, until the constraint is an edge.
    fn flip_edge_event(
        &mut self,
        ep: PointIdx,
        eq: PointIdx,
        mut t: TriIdx,
        p: PointIdx,
    ) -> P2tResult<()> {
        loop {
            self.spend_flip_budget(ep, eq)?;
            let tri = *self.mesh.get(t);
            if !tri.contains(p) {
                return Err(self.unresolvable(ep, eq, "lost the triangle being flipped"));
            }
            let ot = tri.neighbor_across(p);
            if ot == INVALID {
                return Err(self.unresolvable(ep, eq, "no neighbor across the crossing edge"));
            }
            if tri.constrained_edge_across(p) {
                let (a, b) = (tri.point_ccw(p), tri.point_cw(p));
                let reason = format!(
                    "crosses constrained edge ({}) -> ({})",
                    self.pt(a),
                    self.pt(b)
                );
                return Err(self.unresolvable(ep, eq, &reason));
            }
            let op = self
                .mesh
                .get(ot)
                .opposite_point(&tri, p)
                .ok_or_else(|| self.unresolvable(ep, eq, "neighbor lost the shared edge"))?;

            if in_scan_area(
                self.pt(p),
                self.pt(tri.point_ccw(p)),
                self.pt(tri.point_cw(p)),
                self.pt(op),
                self.tolerance,
            ) {
                self.mesh.rotate_pair(t, p, ot, op, false);
                trace!(p = p, op = op, "flip");
                self.map_triangle_to_nodes(t);
                self.map_triangle_to_nodes(ot);

                if p == eq && op == ep {
                    let ce = self.edge_event.constrained_edge;
                    if eq == ce.q && ep == ce.p {
                        self.mesh.mark_constrained_edge(t, ep, eq);
                        self.legalize(t);
                        self.legalize(ot);
                    }
                    return Ok(());
                }

                let o = self.orient(eq, op, ep);
                t = self.next_flip_triangle(o, t, ot, p, op);
            } else {
                let new_p = self.next_flip_point(ep, eq, ot, op)?;
                self.flip_scan_edge_event(ep, eq, t, ot, new_p)?;
                return self.edge_event_points(ep, eq, t, p);
            }
        }
    }

    /// After a flip, pick the triangle of the pair still crossed by the
    /// constraint. The other one is legalized with the new diagonal frozen.
    fn next_flip_triangle(
        &mut self,
        o: Orientation,
        t: TriIdx,
        ot: TriIdx,
        p: PointIdx,
        op: PointIdx,
    ) -> TriIdx {
        let (keep, done) = if o.is_ccw() { (t, ot) } else { (ot, t) };
        let done_tri = self.mesh.get_mut(done);
        if let Some(i) = done_tri.edge_index(p, op) {
            done_tri.delaunay_edge[i] = true;
        }
        self.legalize(done);
        keep
    }

    /// The vertex of `ot` on the far side of the constraint from `op`.
    fn next_flip_point(
        &self,
        ep: PointIdx,
        eq: PointIdx,
        ot: TriIdx,
        op: PointIdx,
    ) -> P2tResult<PointIdx> {
        let otri = self.mesh.get(ot);
        match self.orient(eq, op, ep) {
            Orientation::Clockwise => Ok(otri.point_ccw(op)),
            Orientation::CounterClockwise => Ok(otri.point_cw(op)),
            Orientation::Collinear => Err(self.degenerate(eq, op, ep)),
        }
    }

    /// The next opposing point can't be flipped to directly. Scan across the
    /// constraint for a point that can, and flip toward it first, so that
    /// `flip_triangle` becomes flippable.
    fn flip_scan_edge_event(
        &mut self,
        ep: PointIdx,
        eq: PointIdx,
        flip_triangle: TriIdx,
        t: TriIdx,
        p: PointIdx,
    ) -> P2tResult<()> {
        debug!(ep, eq, "flip scan");
        let mut t = t;
        let mut p = p;
        loop {
            self.spend_flip_budget(ep, eq)?;
            let tri = *self.mesh.get(t);
            if !tri.contains(p) {
                return Err(self.unresolvable(ep, eq, "lost the scan triangle"));
            }
            let ot = tri.neighbor_across(p);
            if ot == INVALID {
                return Err(self.unresolvable(ep, eq, "scan walked off the mesh"));
            }
            let op = self
                .mesh
                .get(ot)
                .opposite_point(&tri, p)
                .ok_or_else(|| self.unresolvable(ep, eq, "neighbor lost the shared edge"))?;

            let ft = *self.mesh.get(flip_triangle);
            if !ft.contains(eq) {
                return Err(self.unresolvable(ep, eq, "flip triangle lost the endpoint"));
            }
            let p1 = ft.point_ccw(eq);
            let p2 = ft.point_cw(eq);

            if in_scan_area(
                self.pt(eq),
                self.pt(p1),
                self.pt(p2),
                self.pt(op),
                self.tolerance,
            ) {
                // Flip with the new edge (op, eq) as the temporary target.
                return self.flip_edge_event(eq, op, ot, op);
            }

            p = self.next_flip_point(ep, eq, ot, op)?;
            t = ot;
        }
    }

    // ─────── Filling the front along the constraint ───────────────────────────

    fn fill_edge_event(&mut self, edge: Edge, node: NodeIdx) -> P2tResult<()> {
        if self.edge_event.right {
            self.fill_right_above_edge_event(edge, node)
        } else {
            self.fill_left_above_edge_event(edge, node)
        }
    }

    fn fill_right_above_edge_event(&mut self, edge: Edge, node: NodeIdx) -> P2tResult<()> {
        let px = self.pt(edge.p).x;
        let mut node = node;
        loop {
            let next = self.front.next(node);
            if next == INVALID || self.node_pt(next).x >= px {
                return Ok(());
            }
            if self.orient(edge.q, self.front.point(next), edge.p).is_ccw() {
                // Below the constraint
                if !self.fill_right_below_edge_event(edge, node)? {
                    return Ok(());
                }
            } else {
                node = next;
            }
        }
    }

    /// Returns whether anything was filled.
    fn fill_right_below_edge_event(&mut self, edge: Edge, node: NodeIdx) -> P2tResult<bool> {
        let px = self.pt(edge.p).x;
        let mut filled = false;
        loop {
            if self.node_pt(node).x >= px {
                return Ok(filled);
            }
            let next = self.front.next(node);
            let nn = if next == INVALID { INVALID } else { self.front.next(next) };
            if nn == INVALID {
                return Ok(filled);
            }
            let (a, b, c) = (
                self.front.point(node),
                self.front.point(next),
                self.front.point(nn),
            );
            if self.orient(a, b, c).is_ccw() {
                // Concave
                let concave = self.fill_right_concave_edge_event(edge, node)?;
                return Ok(filled || concave);
            }
            // Convex
            if !self.fill_right_convex_edge_event(edge, node)? {
                return Ok(filled);
            }
            filled = true;
        }
    }

    fn fill_right_concave_edge_event(&mut self, edge: Edge, node: NodeIdx) -> P2tResult<bool> {
        let mut filled = false;
        loop {
            let next = self.front.next(node);
            if next == INVALID || !self.fill(next)? {
                return Ok(filled);
            }
            filled = true;
            let next = self.front.next(node);
            if next == INVALID || self.front.point(next) == edge.p {
                return Ok(true);
            }
            if !self.orient(edge.q, self.front.point(next), edge.p).is_ccw() {
                return Ok(true);
            }
            // Below the constraint: keep going while the front stays concave.
            let nn = self.front.next(next);
            if nn == INVALID
                || !self
                    .orient(self.front.point(node), self.front.point(next), self.front.point(nn))
                    .is_ccw()
            {
                return Ok(true);
            }
        }
    }

    fn fill_right_convex_edge_event(&mut self, edge: Edge, node: NodeIdx) -> P2tResult<bool> {
        let mut node = node;
        loop {
            let next = self.front.next(node);
            let nn = if next == INVALID { INVALID } else { self.front.next(next) };
            let nnn = if nn == INVALID { INVALID } else { self.front.next(nn) };
            if nnn == INVALID {
                return Ok(false);
            }
            let (a, b, c) = (
                self.front.point(next),
                self.front.point(nn),
                self.front.point(nnn),
            );
            if self.orient(a, b, c).is_ccw() {
                // Concave
                return self.fill_right_concave_edge_event(edge, next);
            }
            // Convex: go on only while still below the constraint.
            if !self.orient(edge.q, b, edge.p).is_ccw() {
                return Ok(false);
            }
            node = next;
        }
    }

    fn fill_left_above_edge_event(&mut self, edge: Edge, node: NodeIdx) -> P2tResult<()> {
        let px = self.pt(edge.p).x;
        let mut node = node;
        loop {
            let prev = self.front.prev(node);
            if prev == INVALID || self.node_pt(prev).x <= px {
                return Ok(());
            }
            if self.orient(edge.q, self.front.point(prev), edge.p).is_cw() {
                // Below the constraint
                if !self.fill_left_below_edge_event(edge, node)? {
                    return Ok(());
                }
            } else {
                node = prev;
            }
        }
    }

    fn fill_left_below_edge_event(&mut self, edge: Edge, node: NodeIdx) -> P2tResult<bool> {
        let px = self.pt(edge.p).x;
        let mut filled = false;
        loop {
            if self.node_pt(node).x <= px {
                return Ok(filled);
            }
            let prev = self.front.prev(node);
            let pp = if prev == INVALID { INVALID } else { self.front.prev(prev) };
            if pp == INVALID {
                return Ok(filled);
            }
            let (a, b, c) = (
                self.front.point(node),
                self.front.point(prev),
                self.front.point(pp),
            );
            if self.orient(a, b, c).is_cw() {
                // Concave
                let concave = self.fill_left_concave_edge_event(edge, node)?;
                return Ok(filled || concave);
            }
            // Convex
            if !self.fill_left_convex_edge_event(edge, node)? {
                return Ok(filled);
            }
            filled = true;
        }
    }

    fn fill_left_concave_edge_event(&mut self, edge: Edge, node: NodeIdx) -> P2tResult<bool> {
        let mut filled = false;
        loop {
            let prev = self.front.prev(node);
            if prev == INVALID || !self.fill(prev)? {
                return Ok(filled);
            }
            filled = true;
            let prev = self.front.prev(node);
            if prev == INVALID || self.front.point(prev) == edge.p {
                return Ok(true);
            }
            if !self.orient(edge.q, self.front.point(prev), edge.p).is_cw() {
                return Ok(true);
            }
            let pp = self.front.prev(prev);
            if pp == INVALID
                || !self
                    .orient(self.front.point(node), self.front.point(prev), self.front.point(pp))
                    .is_cw()
            {
                return Ok(true);
            }
        }
    }

    fn fill_left_convex_edge_event(&mut self, edge: Edge, node: NodeIdx) -> P2tResult<bool> {
        let mut node = node;
        loop {
            let prev = self.front.prev(node);
            let pp = if prev == INVALID { INVALID } else { self.front.prev(prev) };
            let ppp = if pp == INVALID { INVALID } else { self.front.prev(pp) };
            if ppp == INVALID {
                return Ok(false);
            }
            let (a, b, c) = (
                self.front.point(prev),
                self.front.point(pp),
                self.front.point(ppp),
            );
            if self.orient(a, b, c).is_cw() {
                // Concave
                return self.fill_left_concave_edge_event(edge, prev);
            }
            if !self.orient(edge.q, b, edge.p).is_cw() {
                return Ok(false);
            }
            node = prev;
        }
    }
}
