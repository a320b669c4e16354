// Copyright 2025 Lars Brubaker
// Delaunay legalization of freshly created triangles.

use tracing::{debug, warn};

use super::Sweep;
use crate::geom::in_circle;
use crate::mesh::{TriIdx, INVALID};

impl Sweep {
    /// Restore the local Delaunay property around `t` by flipping illegal
    /// edges until none is left.
    ///
    /// Works off an explicit stack: a flip pushes both triangles of the pair
    /// back for re-examination. The new diagonal of each flip is marked
    /// Delaunay so it is not examined again during this call; those marks are
    /// cleared before returning. Constrained edges are never flipped.
    /// Finally every triangle touched is remapped onto the front.
    pub(super) fn legalize(&mut self, t: TriIdx) {
        let mut stack = std::mem::take(&mut self.legalize_stack);
        let mut touched = std::mem::take(&mut self.legalize_touched);
        stack.clear();
        touched.clear();

        stack.push(t);
        touched.push(t);

        while let Some(t) = stack.pop() {
            for i in 0..3 {
                let tri = *self.mesh.get(t);
                if tri.delaunay_edge[i] {
                    continue;
                }
                let ot = tri.neighbors[i];
                if ot == INVALID {
                    continue;
                }

                let p = tri.points[i];
                let otri = *self.mesh.get(ot);
                let Some(op) = otri.opposite_point(&tri, p) else {
                    continue;
                };
                let Some(oi) = otri.index(op) else {
                    continue;
                };

                // Constrained or already-legal edges stay; only the constraint
                // flag is carried over to this side.
                if otri.constrained_edge[oi] || otri.delaunay_edge[oi] {
                    self.mesh.get_mut(t).constrained_edge[i] = otri.constrained_edge[oi];
                    continue;
                }
                if tri.constrained_edge[i] {
                    continue;
                }

                let inside = in_circle(
                    self.pt(p),
                    self.pt(tri.point_ccw(p)),
                    self.pt(tri.point_cw(p)),
                    self.pt(op),
                );
                if inside {
                    self.mesh.rotate_pair(t, p, ot, op, true);
                    touched.push(ot);
                    stack.push(t);
                    stack.push(ot);
                    break;
                }
            }
        }

        for &t in &touched {
            self.mesh.get_mut(t).clear_delaunay_edges();
        }
        for &t in &touched {
            self.map_triangle_to_nodes(t);
        }

        self.legalize_stack = stack;
        self.legalize_touched = touched;
    }

    /// Flip every unconstrained interior edge that fails the in-circle test
    /// until none is left.
    ///
    /// `legalize` freezes each new diagonal for the rest of its call and
    /// FlipScan flips toward the constraint regardless of the circle test,
    /// so a few illegal edges can survive the sweep. Unconstrained edges of
    /// interior triangles only ever join interior triangles, so the pass
    /// never leaves the result set. Flips reuse both arena slots, which keeps
    /// `interior` indices valid.
    ///
    /// A triangle is re-examined whenever it or a neighbor changes, so on
    /// return every interior triangle passes `Mesh::is_locally_delaunay`
    /// unless the iteration cap was hit.
    pub(super) fn refine_delaunay(&mut self, interior: &[TriIdx]) {
        let mut stack: Vec<TriIdx> = interior.to_vec();
        let mut queued = vec![false; self.mesh.len()];
        for &t in interior {
            queued[t as usize] = true;
        }

        let max_iter = stack.len() * stack.len() + 1;
        let mut iter = 0;
        let mut flips = 0usize;

        while let Some(t) = stack.pop() {
            if iter >= max_iter {
                warn!(flips, "delaunay refinement hit its iteration cap");
                break;
            }
            iter += 1;
            queued[t as usize] = false;

            for i in 0..3 {
                let tri = *self.mesh.get(t);
                let ot = tri.neighbors[i];
                if ot == INVALID || tri.constrained_edge[i] {
                    continue;
                }
                let p = tri.points[i];
                let Some(op) = self.mesh.get(ot).opposite_point(&tri, p) else {
                    continue;
                };
                let illegal = in_circle(
                    self.pt(p),
                    self.pt(tri.point_ccw(p)),
                    self.pt(tri.point_cw(p)),
                    self.pt(op),
                );
                if illegal {
                    self.mesh.rotate_pair(t, p, ot, op, false);
                    flips += 1;
                    // The pair and every interior triangle facing it.
                    for n in [t, ot] {
                        let nbs = self.mesh.get(n).neighbors;
                        for m in [n, nbs[0], nbs[1], nbs[2]] {
                            if m != INVALID
                                && !queued[m as usize]
                                && self.mesh.get(m).interior
                            {
                                queued[m as usize] = true;
                                stack.push(m);
                            }
                        }
                    }
                    break;
                }
            }
        }

        debug!(flips, "refined interior");
    }
}
