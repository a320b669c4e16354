// Copyright 2025 Lars Brubaker
// Shared test utilities for p2t-rust tests.

#![allow(dead_code)]

use p2t_rust::{Point, SweepContext, Triangle};

/// Parse the `.dat` polygon format: one vertex per line as `x y` or `x, y`.
/// Blank lines separate contours; the first contour is the boundary, the
/// rest are holes. Lines starting with `#` are comments.
pub fn parse_contours(data: &str) -> Vec<Vec<Point>> {
    let mut contours: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            if !current.is_empty() {
                contours.push(std::mem::take(&mut current));
            }
            continue;
        }
        let floats: Vec<f64> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<f64>().ok())
            .collect();
        if floats.len() >= 2 {
            current.push(Point::new(floats[0], floats[1]));
        }
    }
    if !current.is_empty() {
        contours.push(current);
    }
    contours
}

pub fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// Signed area of a triangle; positive when counter-clockwise.
pub fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
}

/// Absolute area of a simple polygon (shoelace formula).
pub fn polygon_area(ring: &[Point]) -> f64 {
    p2t_rust::geom::signed_area(ring).abs()
}

/// Boundary area minus hole areas.
pub fn expected_area(contours: &[Vec<Point>]) -> f64 {
    let mut area = polygon_area(&contours[0]);
    for hole in &contours[1..] {
        area -= polygon_area(hole);
    }
    area
}

/// Total signed area of the output triangles.
pub fn total_area(ctx: &SweepContext) -> f64 {
    ctx.triangles()
        .iter()
        .map(|t| {
            let [a, b, c] = ctx.triangle_points(t).unwrap();
            triangle_area(a, b, c)
        })
        .sum()
}

pub fn centroid(ctx: &SweepContext, t: &Triangle) -> Point {
    let [a, b, c] = ctx.triangle_points(t).unwrap();
    Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
}

/// Even-odd point-in-polygon test.
pub fn point_in_polygon(p: Point, ring: &[Point]) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Build a context from a boundary and holes and triangulate it.
pub fn triangulate_contours(contours: &[Vec<Point>]) -> SweepContext {
    let mut ctx = SweepContext::from_polyline(&contours[0]).expect("boundary rejected");
    for hole in &contours[1..] {
        ctx.add_hole(hole).expect("hole rejected");
    }
    ctx.triangulate().expect("triangulation failed");
    ctx
}

/// Every output triangle is counter-clockwise with non-zero area and only
/// refers to registered points.
pub fn verify_ccw(ctx: &SweepContext) {
    let n = ctx.points().len() as u32;
    for (i, t) in ctx.triangles().iter().enumerate() {
        assert!(
            t.points.iter().all(|&p| p < n),
            "triangle {} {:?} refers to a sentinel",
            i,
            t.points
        );
        let [a, b, c] = ctx.triangle_points(t).unwrap();
        let area = triangle_area(a, b, c);
        assert!(
            area > 0.0,
            "triangle {} is not ccw (area={}, ({}) ({}) ({}))",
            i,
            area,
            a,
            b,
            c
        );
    }
}

/// Every input constraint is an edge of the mesh, flagged constrained on
/// each triangle holding it.
pub fn verify_constraints(ctx: &SweepContext) {
    let mesh = ctx.mesh();
    for e in ctx.edges() {
        let holders: Vec<&Triangle> = mesh.iter().filter(|t| t.contains_edge(e.p, e.q)).collect();
        assert!(
            !holders.is_empty() && holders.len() <= 2,
            "constraint ({}) -> ({}) held by {} triangles",
            ctx.points()[e.p as usize],
            ctx.points()[e.q as usize],
            holders.len()
        );
        for t in holders {
            let i = t.edge_index(e.p, e.q).unwrap();
            assert!(
                t.constrained_edge[i],
                "constraint ({}) -> ({}) not flagged",
                ctx.points()[e.p as usize],
                ctx.points()[e.q as usize]
            );
        }
    }
}

/// Every unconstrained edge between output triangles passes the in-circle
/// test.
pub fn verify_delaunay(ctx: &SweepContext) {
    let mesh = ctx.raw_mesh();
    for (i, t) in mesh.triangles.iter().enumerate() {
        if t.interior {
            assert!(
                mesh.is_locally_delaunay(i as u32, ctx.points()),
                "triangle {} {:?} is not locally Delaunay",
                i,
                t.points
            );
        }
    }
}

/// All checks every successful triangulation must pass.
pub fn verify_valid_output(ctx: &SweepContext) {
    assert!(ctx.raw_mesh().validate_neighbors().is_ok());
    for v in ctx.vertices() {
        assert!(v.is_finite());
    }
    assert_eq!(ctx.elements().len(), 3 * ctx.triangle_count());
    verify_ccw(ctx);
    verify_constraints(ctx);
    verify_delaunay(ctx);
}
