// Copyright 2025 Lars Brubaker
// Interior classification of the finished mesh.

use std::collections::VecDeque;

use tracing::debug;

use super::Sweep;
use crate::error::{P2tError, P2tResult};
use crate::mesh::{TriIdx, INVALID};

impl Sweep {
    /// Mark and collect the triangles inside the boundary and outside every
    /// hole.
    ///
    /// A triangle's depth is the least number of constrained edges crossed
    /// on a path to it from the sentinel triangles, found with a 0-1 BFS.
    /// Odd depth is interior. Result order is arena order.
    pub(super) fn finalize_polygon(&mut self) -> P2tResult<Vec<TriIdx>> {
        let n = self.mesh.len();
        let mut depth = vec![u32::MAX; n];
        let mut queue: VecDeque<TriIdx> = VecDeque::new();

        for (i, t) in self.mesh.triangles.iter().enumerate() {
            if t.contains(self.head) || t.contains(self.tail) {
                depth[i] = 0;
                queue.push_back(i as TriIdx);
            }
        }

        while let Some(t) = queue.pop_front() {
            let d = depth[t as usize];
            let tri = self.mesh.get(t);
            for k in 0..3 {
                let nb = tri.neighbors[k];
                if nb == INVALID {
                    continue;
                }
                let crossing = tri.constrained_edge[k];
                let nd = d + crossing as u32;
                if nd < depth[nb as usize] {
                    depth[nb as usize] = nd;
                    if crossing {
                        queue.push_back(nb);
                    } else {
                        queue.push_front(nb);
                    }
                }
            }
        }

        let mut result = Vec::new();
        for (i, t) in self.mesh.triangles.iter_mut().enumerate() {
            let d = depth[i];
            t.interior = d != u32::MAX && d % 2 == 1;
            if t.interior {
                result.push(i as TriIdx);
            }
        }

        debug!(
            mesh = n,
            interior = result.len(),
            "classified triangles"
        );
        if result.is_empty() {
            return Err(P2tError::InvalidBoundary(
                "no triangle lies inside the boundary".to_string(),
            ));
        }
        Ok(result)
    }
}
