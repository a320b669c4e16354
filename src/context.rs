// Copyright 2025 Lars Brubaker
// License: BSD-3-Clause (Poly2Tri Copyright (c) 2009-2011, Poly2Tri Contributors)
//
// SweepContext: the caller-owned entry point. It collects the boundary, holes
// and Steiner points, derives the sweep order and sentinel points, runs the
// sweep, and keeps the resulting mesh for inspection.

use core::cmp::Ordering;

use tracing::{debug, warn};

use crate::error::{P2tError, P2tResult};
use crate::geom::{sweep_cmp, Point, Real, DEFAULT_TOLERANCE};
use crate::mesh::{Mesh, PointIdx, TriIdx, Triangle};
use crate::sweep::Sweep;

/// Default margin of the sentinel triangle, as a fraction of the input extent.
pub const DEFAULT_SENTINEL_MARGIN: Real = 0.3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SweepOption {
    /// Half-width of the band in which orientation tests report collinear.
    Tolerance(Real),
    /// Distance of the sentinel points from the input's bounding box, as a
    /// fraction of its width and height.
    SentinelMargin(Real),
}

/// A constraint edge. `p` precedes `q` in sweep order, so the edge is handled
/// when `q` is swept.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub p: PointIdx,
    pub q: PointIdx,
}

impl Edge {
    /// Orient the segment between points `a` and `b` so that `q` is the later
    /// one in sweep order.
    pub fn new(points: &[Point], a: PointIdx, b: PointIdx) -> P2tResult<Edge> {
        let pa = points[a as usize];
        let pb = points[b as usize];
        if pa == pb {
            return Err(P2tError::DuplicatePoint { x: pa.x, y: pa.y });
        }
        if sweep_cmp(&pa, &pb) == Ordering::Greater {
            Ok(Edge { p: b, q: a })
        } else {
            Ok(Edge { p: a, q: b })
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage {
    Empty,
    Initialized,
    Triangulated,
}

pub struct SweepContext {
    stage: Stage,
    tolerance: Real,
    sentinel_margin: Real,

    // Input
    points: Vec<Point>,
    edges: Vec<Edge>,
    holes: Vec<core::ops::Range<PointIdx>>,

    // Output of the last triangulation
    sentinels: [Point; 2],
    mesh: Mesh,
    result: Vec<TriIdx>,
    out_vertices: Vec<Real>,
    out_elements: Vec<u32>,
}

impl SweepContext {
    pub fn new() -> Self {
        SweepContext {
            stage: Stage::Empty,
            tolerance: DEFAULT_TOLERANCE,
            sentinel_margin: DEFAULT_SENTINEL_MARGIN,
            points: Vec::new(),
            edges: Vec::new(),
            holes: Vec::new(),
            sentinels: [Point::default(); 2],
            mesh: Mesh::new(),
            result: Vec::new(),
            out_vertices: Vec::new(),
            out_elements: Vec::new(),
        }
    }

    /// Build a context from the outer boundary in one step.
    pub fn from_polyline(polyline: &[Point]) -> P2tResult<Self> {
        let mut ctx = SweepContext::new();
        ctx.initialize(polyline)?;
        Ok(ctx)
    }

    pub fn set_option(&mut self, option: SweepOption) {
        match option {
            SweepOption::Tolerance(t) => self.tolerance = t.abs(),
            SweepOption::SentinelMargin(m) => self.sentinel_margin = m.abs(),
        }
    }

    /// Register the outer boundary: a simple polygon given as an open ring
    /// (the closing edge from the last point back to the first is implied).
    pub fn initialize(&mut self, polyline: &[Point]) -> P2tResult<()> {
        if self.stage != Stage::Empty {
            return Err(P2tError::Precondition(
                "context is already initialized".to_string(),
            ));
        }
        if polyline.len() < 3 {
            return Err(P2tError::InvalidBoundary(format!(
                "boundary needs at least 3 points, got {}",
                polyline.len()
            )));
        }
        self.add_polyline(polyline)?;
        self.stage = Stage::Initialized;
        Ok(())
    }

    /// Register a hole. Its triangles are excluded from the result.
    pub fn add_hole(&mut self, polyline: &[Point]) -> P2tResult<()> {
        self.check_accepting_input("add_hole")?;
        if polyline.len() < 3 {
            return Err(P2tError::InvalidBoundary(format!(
                "hole needs at least 3 points, got {}",
                polyline.len()
            )));
        }
        let start = self.points.len() as PointIdx;
        self.add_polyline(polyline)?;
        self.holes.push(start..self.points.len() as PointIdx);
        Ok(())
    }

    /// Register a Steiner point: swept like any other point but bound by no
    /// constraint edge. Points are stored with `-0.0` turned into `0.0`.
    pub fn add_point(&mut self, point: Point) -> P2tResult<()> {
        self.check_accepting_input("add_point")?;
        check_coordinate(&point)?;
        self.points.push(point.canonical());
        Ok(())
    }

    pub fn add_points(&mut self, points: impl IntoIterator<Item = Point>) -> P2tResult<()> {
        for p in points {
            self.add_point(p)?;
        }
        Ok(())
    }

    /// Run the sweep from scratch over everything registered so far and return
    /// the triangles inside the boundary and outside every hole.
    ///
    /// Running it again without changes yields the same triangles. On failure
    /// no mesh is kept.
    pub fn triangulate(&mut self) -> P2tResult<Vec<Triangle>> {
        if self.stage == Stage::Empty {
            return Err(P2tError::Precondition(
                "triangulate called before initialize".to_string(),
            ));
        }
        self.stage = Stage::Triangulated;
        self.clear_output();

        debug!(
            points = self.points.len(),
            edges = self.edges.len(),
            holes = self.holes.len(),
            "triangulating"
        );

        match self.run_sweep() {
            Ok(()) => {
                debug!(
                    mesh = self.mesh.len(),
                    triangles = self.result.len(),
                    "triangulation done"
                );
                Ok(self.triangles())
            }
            Err(e) => {
                warn!(error = %e, "triangulation failed");
                self.clear_output();
                Err(e)
            }
        }
    }

    fn run_sweep(&mut self) -> P2tResult<()> {
        let order = self.sweep_order()?;
        let sentinels = self.sentinel_points();

        let mut points = Vec::with_capacity(self.points.len() + 2);
        points.extend_from_slice(&self.points);
        points.extend_from_slice(&sentinels);

        let mut edge_lists: Vec<Vec<PointIdx>> = vec![Vec::new(); points.len()];
        for e in &self.edges {
            edge_lists[e.q as usize].push(e.p);
        }

        let sweep = Sweep::new(points, order, edge_lists, self.tolerance)?;
        let (mesh, result) = sweep.triangulate()?;

        self.sentinels = sentinels;
        self.mesh = mesh;
        self.result = result;
        self.build_output();
        Ok(())
    }

    /// Input point indices sorted by (y, x). Identical coordinates are
    /// rejected here, before any triangle is built.
    fn sweep_order(&self) -> P2tResult<Vec<PointIdx>> {
        let mut order: Vec<PointIdx> = (0..self.points.len() as PointIdx).collect();
        order.sort_by(|&a, &b| sweep_cmp(&self.points[a as usize], &self.points[b as usize]));
        for w in order.windows(2) {
            let a = self.points[w[0] as usize];
            if a == self.points[w[1] as usize] {
                return Err(P2tError::DuplicatePoint { x: a.x, y: a.y });
            }
        }
        Ok(order)
    }

    /// The two points below the input that close the initial triangle: left
    /// and right of the bounding box, one margin below its bottom.
    fn sentinel_points(&self) -> [Point; 2] {
        let first = self.points[0];
        let (mut xmin, mut xmax, mut ymin, mut ymax) = (first.x, first.x, first.y, first.y);
        for p in &self.points {
            xmin = xmin.min(p.x);
            xmax = xmax.max(p.x);
            ymin = ymin.min(p.y);
            ymax = ymax.max(p.y);
        }
        let dx = self.sentinel_margin * (xmax - xmin);
        let dy = self.sentinel_margin * (ymax - ymin);
        [
            Point::new(xmin - dx, ymin - dy),
            Point::new(xmax + dx, ymin - dy),
        ]
    }

    fn add_polyline(&mut self, polyline: &[Point]) -> P2tResult<()> {
        for p in polyline {
            check_coordinate(p)?;
        }
        let start = self.points.len() as PointIdx;
        let n = polyline.len() as PointIdx;
        self.points.extend(polyline.iter().map(|p| p.canonical()));

        let mut edges = Vec::with_capacity(polyline.len());
        for i in 0..n {
            let j = (i + 1) % n;
            match Edge::new(&self.points, start + i, start + j) {
                Ok(e) => edges.push(e),
                Err(e) => {
                    self.points.truncate(start as usize);
                    return Err(e);
                }
            }
        }
        self.edges.extend(edges);
        Ok(())
    }

    fn check_accepting_input(&self, op: &str) -> P2tResult<()> {
        match self.stage {
            Stage::Initialized => Ok(()),
            Stage::Empty => Err(P2tError::Precondition(format!(
                "{} called before initialize",
                op
            ))),
            Stage::Triangulated => Err(P2tError::Precondition(format!(
                "{} called after triangulation started",
                op
            ))),
        }
    }

    fn clear_output(&mut self) {
        self.mesh = Mesh::new();
        self.result.clear();
        self.out_vertices.clear();
        self.out_elements.clear();
    }

    fn build_output(&mut self) {
        self.out_vertices.clear();
        for p in &self.points {
            self.out_vertices.push(p.x);
            self.out_vertices.push(p.y);
        }
        self.out_elements.clear();
        for &t in &self.result {
            self.out_elements.extend_from_slice(&self.mesh.get(t).points);
        }
    }

    // ─────── Accessors ────────────────────────────────────────────────────────

    /// Every registered point: boundary first, then holes and Steiner points
    /// in call order. Triangle vertices index this slice.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Coordinates of any point a triangle may refer to. The two sentinels
    /// follow the registered points while a mesh is held.
    pub fn point(&self, idx: PointIdx) -> Option<Point> {
        let i = idx as usize;
        if let Some(p) = self.points.get(i) {
            return Some(*p);
        }
        if self.mesh.is_empty() {
            return None;
        }
        self.sentinels.get(i - self.points.len()).copied()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Point ranges of the registered holes.
    pub fn holes(&self) -> &[core::ops::Range<PointIdx>] {
        &self.holes
    }

    pub fn tolerance(&self) -> Real {
        self.tolerance
    }

    pub fn triangle_points(&self, t: &Triangle) -> Option<[Point; 3]> {
        Some([
            self.point(t.points[0])?,
            self.point(t.points[1])?,
            self.point(t.points[2])?,
        ])
    }

    /// The triangles of the last successful triangulation.
    pub fn triangles(&self) -> Vec<Triangle> {
        self.result.iter().map(|&t| *self.mesh.get(t)).collect()
    }

    /// The whole mesh of the last successful triangulation, including
    /// triangles outside the boundary and inside holes. For diagnostics.
    pub fn mesh(&self) -> Vec<Triangle> {
        self.mesh.triangles.clone()
    }

    pub fn raw_mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.result.len()
    }

    /// Flat `[x0, y0, x1, y1, ...]` of every registered point.
    pub fn vertices(&self) -> &[Real] {
        &self.out_vertices
    }

    /// Flat `[i0, i1, i2, ...]` vertex triples of the output triangles.
    pub fn elements(&self) -> &[u32] {
        &self.out_elements
    }
}

impl Default for SweepContext {
    fn default() -> Self {
        Self::new()
    }
}

fn check_coordinate(p: &Point) -> P2tResult<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(P2tError::InvalidCoordinate { x: p.x, y: p.y })
    }
}
