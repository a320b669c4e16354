// Copyright 2025 Lars Brubaker
// License: BSD-3-Clause (Poly2Tri Copyright (c) 2009-2011, Poly2Tri Contributors)
//
// The advancing front: the upper boundary of the region triangulated so far,
// kept as a doubly-linked list of nodes sorted by x.
//
// Nodes live in a Vec and link by index; INVALID ends the list on both sides.
// The first and last nodes carry the two sentinel points and are never
// removed. A position hint from the previous lookup makes `locate_node`
// amortized near-constant for inputs processed in sweep order.

use crate::geom::Real;
use crate::mesh::{PointIdx, TriIdx, INVALID};

/// Index into AdvancingFront::nodes
pub type NodeIdx = u32;

#[derive(Copy, Clone, Debug)]
pub struct FrontNode {
    pub point: PointIdx,
    /// Ordering key: the point's x coordinate.
    pub value: Real,
    /// Triangle lying directly above the front edge (this, next).
    pub triangle: TriIdx,
    pub next: NodeIdx,
    pub prev: NodeIdx,
}

impl Default for FrontNode {
    fn default() -> Self {
        FrontNode {
            point: INVALID,
            value: 0.0,
            triangle: INVALID,
            next: INVALID,
            prev: INVALID,
        }
    }
}

pub struct AdvancingFront {
    pub nodes: Vec<FrontNode>,
    head: NodeIdx,
    tail: NodeIdx,
    search_node: NodeIdx,
    /// Node currently holding each point, or INVALID.
    point_node: Vec<NodeIdx>,
}

impl AdvancingFront {
    /// Build a two-node front from the sentinel points. `point_count` bounds
    /// every PointIdx that will be inserted.
    pub fn new(
        point_count: usize,
        head: PointIdx,
        head_x: Real,
        tail: PointIdx,
        tail_x: Real,
    ) -> Self {
        let mut front = AdvancingFront {
            nodes: Vec::with_capacity(point_count),
            head: 0,
            tail: 1,
            search_node: 0,
            point_node: vec![INVALID; point_count],
        };
        front.nodes.push(FrontNode {
            point: head,
            value: head_x,
            next: 1,
            ..FrontNode::default()
        });
        front.nodes.push(FrontNode {
            point: tail,
            value: tail_x,
            prev: 0,
            ..FrontNode::default()
        });
        front.point_node[head as usize] = 0;
        front.point_node[tail as usize] = 1;
        front
    }

    #[inline]
    pub fn head(&self) -> NodeIdx {
        self.head
    }

    #[inline]
    pub fn tail(&self) -> NodeIdx {
        self.tail
    }

    #[inline]
    pub fn next(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].next
    }

    #[inline]
    pub fn prev(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].prev
    }

    #[inline]
    pub fn point(&self, node: NodeIdx) -> PointIdx {
        self.nodes[node as usize].point
    }

    #[inline]
    pub fn value(&self, node: NodeIdx) -> Real {
        self.nodes[node as usize].value
    }

    #[inline]
    pub fn triangle(&self, node: NodeIdx) -> TriIdx {
        self.nodes[node as usize].triangle
    }

    #[inline]
    pub fn set_triangle(&mut self, node: NodeIdx, t: TriIdx) {
        self.nodes[node as usize].triangle = t;
    }

    /// Splice a node for `point` right after `after`. O(1).
    pub fn insert_after(&mut self, after: NodeIdx, point: PointIdx, x: Real) -> NodeIdx {
        let next = self.nodes[after as usize].next;
        let idx = self.nodes.len() as NodeIdx;
        self.nodes.push(FrontNode {
            point,
            value: x,
            triangle: INVALID,
            next,
            prev: after,
        });
        self.nodes[after as usize].next = idx;
        if next != INVALID {
            self.nodes[next as usize].prev = idx;
        }
        self.point_node[point as usize] = idx;
        idx
    }

    /// Unlink `node`. The sentinels can't be removed. The removed node is
    /// detached: its links are reset and its point no longer locates it.
    pub fn remove(&mut self, node: NodeIdx) {
        debug_assert!(node != self.head && node != self.tail, "removing a sentinel node");
        let FrontNode {
            point, next, prev, ..
        } = self.nodes[node as usize];
        if next != INVALID {
            self.nodes[next as usize].prev = prev;
        }
        if prev != INVALID {
            self.nodes[prev as usize].next = next;
        }
        if self.search_node == node {
            self.search_node = prev;
        }
        if self.point_node[point as usize] == node {
            self.point_node[point as usize] = INVALID;
        }
        let n = &mut self.nodes[node as usize];
        n.next = INVALID;
        n.prev = INVALID;
        n.triangle = INVALID;
    }

    /// The node whose segment to its next node lies under `x`:
    /// `node.value <= x < next.value`. None if `x` is outside the front's span.
    pub fn locate_node(&mut self, x: Real) -> Option<NodeIdx> {
        let mut node = self.search_node;
        if x < self.value(node) {
            loop {
                node = self.prev(node);
                if node == INVALID {
                    return None;
                }
                if x >= self.value(node) {
                    self.search_node = node;
                    return Some(node);
                }
            }
        } else {
            loop {
                node = self.next(node);
                if node == INVALID {
                    return None;
                }
                if x < self.value(node) {
                    let found = self.prev(node);
                    self.search_node = found;
                    return Some(found);
                }
            }
        }
    }

    /// The node currently holding `point`, if the point is on the front.
    #[inline]
    pub fn locate_point(&self, point: PointIdx) -> Option<NodeIdx> {
        match self.point_node.get(point as usize) {
            Some(&n) if n != INVALID => Some(n),
            _ => None,
        }
    }

    /// Iterate nodes from head to tail.
    pub fn iter(&self) -> FrontIter<'_> {
        FrontIter {
            front: self,
            node: self.head,
        }
    }
}

pub struct FrontIter<'a> {
    front: &'a AdvancingFront,
    node: NodeIdx,
}

impl<'a> Iterator for FrontIter<'a> {
    type Item = &'a FrontNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.node == INVALID {
            return None;
        }
        let n = &self.front.nodes[self.node as usize];
        self.node = n.next;
        Some(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Points 0..4 are regular, 5 is the left sentinel and 6 the right one.
    fn front() -> AdvancingFront {
        let mut f = AdvancingFront::new(7, 5, -10.0, 6, 10.0);
        let a = f.insert_after(f.head(), 0, -5.0);
        let b = f.insert_after(a, 1, 0.0);
        f.insert_after(b, 2, 5.0);
        f
    }

    fn values(f: &AdvancingFront) -> Vec<Real> {
        f.iter().map(|n| n.value).collect()
    }

    #[test]
    fn insert_keeps_order() {
        let f = front();
        assert_eq!(values(&f), vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
        let points: Vec<PointIdx> = f.iter().map(|n| n.point).collect();
        assert_eq!(points, vec![5, 0, 1, 2, 6]);
    }

    #[test]
    fn locate_node_finds_segment_below() {
        let mut f = front();
        let n = f.locate_node(1.0).unwrap();
        assert_eq!(f.point(n), 1);
        // Exactly on a node: that node's segment.
        let n = f.locate_node(-5.0).unwrap();
        assert_eq!(f.point(n), 0);
        // Moving left from the hint.
        let n = f.locate_node(-9.0).unwrap();
        assert_eq!(f.point(n), 5);
        let n = f.locate_node(9.99).unwrap();
        assert_eq!(f.point(n), 2);
    }

    #[test]
    fn locate_node_outside_span() {
        let mut f = front();
        assert!(f.locate_node(-11.0).is_none());
        assert!(f.locate_node(10.0).is_none());
    }

    #[test]
    fn remove_unlinks_and_forgets_point() {
        let mut f = front();
        let n = f.locate_point(1).unwrap();
        f.remove(n);
        assert_eq!(values(&f), vec![-10.0, -5.0, 5.0, 10.0]);
        assert!(f.locate_point(1).is_none());
        let left = f.locate_point(0).unwrap();
        let right = f.locate_point(2).unwrap();
        assert_eq!(f.next(left), right);
        assert_eq!(f.prev(right), left);
    }

    #[test]
    fn remove_search_hint_node() {
        let mut f = front();
        let n = f.locate_node(0.5).unwrap();
        assert_eq!(f.point(n), 1);
        f.remove(n);
        let m = f.locate_node(0.5).unwrap();
        assert_eq!(f.point(m), 0);
    }
}
