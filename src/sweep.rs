// Copyright 2025 Lars Brubaker
// License: BSD-3-Clause (Poly2Tri Copyright (c) 2009-2011, Poly2Tri Contributors)
//
// Port of the Poly2Tri sweep (Domiter & Zalik, 2008).
//
// The sweep-line engine: points are consumed in (y, x) order, each one
// attached to the triangulation below it through the advancing front, and
// every constraint edge is recovered as soon as its upper endpoint is swept.
//
// Point events, front filling and basin filling live here. Delaunay
// legalization is in sweep/legalize.rs, constraint recovery in
// sweep/edge_event.rs and the interior classification in sweep/finalize.rs.

mod edge_event;
mod finalize;
mod legalize;

use tracing::trace;

use crate::context::Edge;
use crate::error::{P2tError, P2tResult};
use crate::front::{AdvancingFront, NodeIdx};
use crate::geom::{
    angle, angle_exceeds_90_degrees, angle_exceeds_plus_90_degrees_or_is_negative, orient2d,
    Orientation, Point, Real,
};
use crate::mesh::{Mesh, PointIdx, TriIdx, INVALID};

const PI_3_DIV_4: Real = 3.0 * core::f64::consts::FRAC_PI_4;

/// Valley of the advancing front currently being filled.
#[derive(Clone, Debug, Default)]
struct Basin {
    left_node: NodeIdx,
    bottom_node: NodeIdx,
    right_node: NodeIdx,
    width: Real,
    left_highest: bool,
}

/// The constraint currently being recovered.
#[derive(Copy, Clone, Debug)]
struct EdgeEvent {
    constrained_edge: Edge,
    right: bool,
}

/// State of one triangulation run. Built from a prepared point set, consumed
/// by `triangulate`.
pub(crate) struct Sweep {
    /// Input points followed by the two sentinels.
    points: Vec<Point>,
    /// Input point indices in sweep order.
    order: Vec<PointIdx>,
    /// For every point q, the lower endpoints p of the constraints (p, q).
    edge_lists: Vec<Vec<PointIdx>>,
    head: PointIdx,
    tail: PointIdx,
    tolerance: Real,

    mesh: Mesh,
    front: AdvancingFront,
    basin: Basin,
    edge_event: EdgeEvent,
    /// Steps left for the constraint being recovered.
    flip_budget: usize,

    legalize_stack: Vec<TriIdx>,
    legalize_touched: Vec<TriIdx>,
}

impl Sweep {
    /// Set up the initial triangle (first point, head, tail) and the
    /// three-node front over it. `points` must end with the head and tail
    /// sentinels.
    pub(crate) fn new(
        points: Vec<Point>,
        order: Vec<PointIdx>,
        edge_lists: Vec<Vec<PointIdx>>,
        tolerance: Real,
    ) -> P2tResult<Self> {
        if order.len() < 3 || points.len() != order.len() + 2 {
            return Err(P2tError::InvalidBoundary(format!(
                "need at least 3 points, got {}",
                order.len()
            )));
        }
        let tail = (points.len() - 1) as PointIdx;
        let head = tail - 1;
        let first = order[0];

        let mut mesh = Mesh::with_capacity(2 * points.len());
        let t = mesh.add_triangle(&points, first, head, tail, tolerance)?;

        let mut front = AdvancingFront::new(
            points.len(),
            head,
            points[head as usize].x,
            tail,
            points[tail as usize].x,
        );
        let middle = front.insert_after(front.head(), first, points[first as usize].x);
        front.set_triangle(front.head(), t);
        front.set_triangle(middle, t);

        Ok(Sweep {
            points,
            order,
            edge_lists,
            head,
            tail,
            tolerance,
            mesh,
            front,
            basin: Basin::default(),
            edge_event: EdgeEvent {
                constrained_edge: Edge { p: first, q: first },
                right: false,
            },
            flip_budget: 0,
            legalize_stack: Vec::new(),
            legalize_touched: Vec::new(),
        })
    }

    /// Sweep every point, classify the mesh and settle the interior's
    /// remaining illegal edges. Returns the whole mesh and the indices of its
    /// interior triangles in arena order.
    pub(crate) fn triangulate(mut self) -> P2tResult<(Mesh, Vec<TriIdx>)> {
        self.sweep_points()?;
        let result = self.finalize_polygon()?;
        self.refine_delaunay(&result);
        Ok((self.mesh, result))
    }

    fn sweep_points(&mut self) -> P2tResult<()> {
        for i in 1..self.order.len() {
            let point = self.order[i];
            self.point_event(point)?;
            let lower = std::mem::take(&mut self.edge_lists[point as usize]);
            for &p in &lower {
                let edge = Edge { p, q: point };
                let node = self.front.locate_point(point).ok_or_else(|| {
                    P2tError::Precondition(format!("point {} left the front", point))
                })?;
                self.edge_event(edge, node)?;
            }
            self.edge_lists[point as usize] = lower;
        }
        Ok(())
    }

    #[inline]
    fn pt(&self, p: PointIdx) -> &Point {
        &self.points[p as usize]
    }

    #[inline]
    fn node_pt(&self, node: NodeIdx) -> &Point {
        self.pt(self.front.point(node))
    }

    #[inline]
    fn orient(&self, a: PointIdx, b: PointIdx, c: PointIdx) -> Orientation {
        orient2d(self.pt(a), self.pt(b), self.pt(c), self.tolerance)
    }

    fn add_triangle(&mut self, a: PointIdx, b: PointIdx, c: PointIdx) -> P2tResult<TriIdx> {
        self.mesh.add_triangle(&self.points, a, b, c, self.tolerance)
    }

    /// Point the front nodes at `t` for every edge of `t` that has no
    /// neighbor, i.e. every front edge it owns.
    fn map_triangle_to_nodes(&mut self, t: TriIdx) {
        let tri = *self.mesh.get(t);
        for i in 0..3 {
            if tri.neighbors[i] == INVALID {
                if let Some(node) = self.front.locate_point(tri.point_cw(tri.points[i])) {
                    self.front.set_triangle(node, t);
                }
            }
        }
    }

    // ─────── Point event ──────────────────────────────────────────────────────

    /// Attach `point` to the front segment below it and fill what the new
    /// node leaves behind. Returns the new node.
    fn point_event(&mut self, point: PointIdx) -> P2tResult<NodeIdx> {
        let p = *self.pt(point);
        let node = self.front.locate_node(p.x).ok_or_else(|| {
            P2tError::Precondition(format!("point ({}) outside the advancing front", p))
        })?;
        trace!(point, x = p.x, y = p.y, "point event");

        let new_node = self.new_front_triangle(point, node)?;

        // Only when the point lands on a node's x; the triangle to the left of
        // it would otherwise be degenerate.
        if p.x <= self.front.value(node) + self.tolerance {
            self.fill(node)?;
        }

        self.fill_advancing_front(new_node)?;
        Ok(new_node)
    }

    fn new_front_triangle(&mut self, point: PointIdx, node: NodeIdx) -> P2tResult<NodeIdx> {
        let next = self.front.next(node);
        let t = self.add_triangle(point, self.front.point(node), self.front.point(next))?;
        let below = self.front.triangle(node);
        if below != INVALID {
            self.mesh.mark_neighbor(t, below);
        }
        let x = self.pt(point).x;
        let new_node = self.front.insert_after(node, point, x);
        self.legalize(t);
        Ok(new_node)
    }

    /// Close the front at `node` with a triangle over its two neighbors and
    /// drop it from the front. Returns false if `node` is a front end.
    fn fill(&mut self, node: NodeIdx) -> P2tResult<bool> {
        let prev = self.front.prev(node);
        let next = self.front.next(node);
        if prev == INVALID || next == INVALID {
            return Ok(false);
        }
        let t = self.add_triangle(
            self.front.point(prev),
            self.front.point(node),
            self.front.point(next),
        )?;
        let left = self.front.triangle(prev);
        if left != INVALID {
            self.mesh.mark_neighbor(t, left);
        }
        let right = self.front.triangle(node);
        if right != INVALID {
            self.mesh.mark_neighbor(t, right);
        }
        self.front.remove(node);
        self.legalize(t);
        Ok(true)
    }

    /// Fill holes left on both sides of a new node, then any basin to its
    /// right.
    fn fill_advancing_front(&mut self, n: NodeIdx) -> P2tResult<()> {
        let mut node = self.front.next(n);
        while node != INVALID && self.front.next(node) != INVALID {
            if self.large_hole_dont_fill(node) {
                break;
            }
            let next = self.front.next(node);
            self.fill(node)?;
            node = next;
        }

        let mut node = self.front.prev(n);
        while node != INVALID && self.front.prev(node) != INVALID {
            if self.large_hole_dont_fill(node) {
                break;
            }
            let prev = self.front.prev(node);
            self.fill(node)?;
            node = prev;
        }

        let next = self.front.next(n);
        if next != INVALID && self.front.next(next) != INVALID && self.basin_angle(n) < PI_3_DIV_4
        {
            self.fill_basin(n)?;
        }
        Ok(())
    }

    /// Leave a reflex front vertex alone unless filling it still closes a
    /// reasonably shaped triangle.
    fn large_hole_dont_fill(&self, node: NodeIdx) -> bool {
        let next = self.front.next(node);
        let prev = self.front.prev(node);
        let (o, a, b) = (self.node_pt(node), self.node_pt(next), self.node_pt(prev));
        if !angle_exceeds_90_degrees(o, a, b) {
            return false;
        }
        // A negative angle means (prev, node, next) turns clockwise.
        if angle(o, a, b) < 0.0 {
            return true;
        }

        let next2 = self.front.next(next);
        if next2 != INVALID
            && !angle_exceeds_plus_90_degrees_or_is_negative(o, self.node_pt(next2), b)
        {
            return false;
        }

        let prev2 = self.front.prev(prev);
        if prev2 != INVALID
            && !angle_exceeds_plus_90_degrees_or_is_negative(o, a, self.node_pt(prev2))
        {
            return false;
        }
        true
    }

    fn basin_angle(&self, node: NodeIdx) -> Real {
        let nn = self.front.next(self.front.next(node));
        let a = self.node_pt(node);
        let b = self.node_pt(nn);
        (a.y - b.y).atan2(a.x - b.x)
    }

    // ─────── Basin ────────────────────────────────────────────────────────────

    /// Fill the valley starting right of `node`: descend to its bottom, find
    /// the rising side, and fill up from the bottom while the valley is
    /// deeper than it is wide.
    fn fill_basin(&mut self, node: NodeIdx) -> P2tResult<()> {
        let next = self.front.next(node);
        let nn = self.front.next(next);
        if nn == INVALID {
            return Ok(());
        }
        let left_node = if self
            .orient(self.front.point(node), self.front.point(next), self.front.point(nn))
            .is_ccw()
        {
            nn
        } else {
            next
        };

        // Bottom
        let mut bottom = left_node;
        loop {
            let next = self.front.next(bottom);
            if next == INVALID || self.node_pt(bottom).y < self.node_pt(next).y {
                break;
            }
            bottom = next;
        }
        if bottom == left_node {
            return Ok(());
        }

        // Right side
        let mut right = bottom;
        loop {
            let next = self.front.next(right);
            if next == INVALID || self.node_pt(right).y >= self.node_pt(next).y {
                break;
            }
            right = next;
        }
        if right == bottom {
            return Ok(());
        }

        let left_y = self.node_pt(left_node).y;
        let right_y = self.node_pt(right).y;
        self.basin = Basin {
            left_node,
            bottom_node: bottom,
            right_node: right,
            width: self.node_pt(right).x - self.node_pt(left_node).x,
            left_highest: left_y > right_y,
        };
        trace!(
            left = self.front.point(left_node),
            bottom = self.front.point(bottom),
            right = self.front.point(right),
            "fill basin"
        );
        self.fill_basin_req(self.basin.bottom_node)
    }

    fn fill_basin_req(&mut self, mut node: NodeIdx) -> P2tResult<()> {
        loop {
            if self.is_shallow(node) {
                return Ok(());
            }
            let prev = self.front.prev(node);
            let next = self.front.next(node);
            let point = self.front.point(node);
            if !self.fill(node)? {
                return Ok(());
            }

            if prev == self.basin.left_node && next == self.basin.right_node {
                return Ok(());
            } else if prev == self.basin.left_node {
                let nn = self.front.next(next);
                if nn == INVALID
                    || self
                        .orient(point, self.front.point(next), self.front.point(nn))
                        .is_cw()
                {
                    return Ok(());
                }
                node = next;
            } else if next == self.basin.right_node {
                let pp = self.front.prev(prev);
                if pp == INVALID
                    || self
                        .orient(point, self.front.point(prev), self.front.point(pp))
                        .is_ccw()
                {
                    return Ok(());
                }
                node = prev;
            } else if self.node_pt(prev).y < self.node_pt(next).y {
                node = prev;
            } else {
                node = next;
            }
        }
    }

    fn is_shallow(&self, node: NodeIdx) -> bool {
        let side = if self.basin.left_highest {
            self.basin.right_node
        } else {
            self.basin.left_node
        };
        let height = self.node_pt(side).y - self.node_pt(node).y;
        self.basin.width > height
    }
}
