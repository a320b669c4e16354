// Copyright 2025 Lars Brubaker
// Triangulation of simple polygons without holes.

mod helpers;

use approx::assert_relative_eq;
use helpers::pts;
use p2t_rust::{Point, SweepContext};

fn triangulate(boundary: &[Point]) -> SweepContext {
    helpers::triangulate_contours(&[boundary.to_vec()])
}

#[test]
fn triangle_yields_one_triangle() {
    let ctx = triangulate(&pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]));
    assert_eq!(ctx.triangle_count(), 1);
    helpers::verify_valid_output(&ctx);
    let t = ctx.triangles()[0];
    assert!(t.constrained_edge.iter().all(|&c| c));
}

#[test]
fn clockwise_triangle_yields_one_ccw_triangle() {
    let ctx = triangulate(&pts(&[(0.0, 0.0), (0.0, 3.0), (4.0, 0.0)]));
    assert_eq!(ctx.triangle_count(), 1);
    helpers::verify_valid_output(&ctx);
    assert_relative_eq!(helpers::total_area(&ctx), 6.0, epsilon = 1e-9);
}

#[test]
fn negative_zero_coordinates() {
    let ctx = triangulate(&pts(&[(0.0, 0.0), (10.0, -0.0), (10.0, 10.0), (-0.0, 10.0)]));
    assert_eq!(ctx.triangle_count(), 2);
    helpers::verify_valid_output(&ctx);
    assert_relative_eq!(helpers::total_area(&ctx), 100.0, epsilon = 1e-9);
}

#[test]
fn square_yields_two_triangles_sharing_a_diagonal() {
    let ctx = triangulate(&pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]));
    let tris = ctx.triangles();
    assert_eq!(tris.len(), 2);
    helpers::verify_valid_output(&ctx);

    let shared: Vec<u32> = tris[0]
        .points
        .iter()
        .copied()
        .filter(|&p| tris[1].contains(p))
        .collect();
    assert_eq!(shared.len(), 2, "triangles must share exactly one edge");
    let diagonal = tris[0].edge_index(shared[0], shared[1]).unwrap();
    assert!(!tris[0].constrained_edge[diagonal]);
    // Every other edge of both triangles is a side of the square.
    for t in &tris {
        let constrained = t.constrained_edge.iter().filter(|&&c| c).count();
        assert_eq!(constrained, 2);
    }
    assert_relative_eq!(helpers::total_area(&ctx), 1.0, epsilon = 1e-12);
}

#[test]
fn convex_polygon_triangle_count() {
    // n-gon without interior points: n - 2 triangles.
    let n = 11;
    let ring: Vec<Point> = (0..n)
        .map(|i| {
            let a = 0.1 + i as f64 * std::f64::consts::TAU / n as f64;
            Point::new(5.0 * a.cos(), 5.0 * a.sin())
        })
        .collect();
    let ctx = triangulate(&ring);
    assert_eq!(ctx.triangle_count(), n - 2);
    helpers::verify_valid_output(&ctx);
    assert_relative_eq!(
        helpers::total_area(&ctx),
        helpers::polygon_area(&ring),
        epsilon = 1e-9
    );
}

#[test]
fn concave_l_shape() {
    let ring = pts(&[
        (0.0, 0.0),
        (6.0, 0.1),
        (6.1, 2.0),
        (2.2, 2.1),
        (2.0, 6.0),
        (-0.1, 5.9),
    ]);
    let ctx = triangulate(&ring);
    assert_eq!(ctx.triangle_count(), 4);
    helpers::verify_valid_output(&ctx);
    assert_relative_eq!(
        helpers::total_area(&ctx),
        helpers::polygon_area(&ring),
        epsilon = 1e-9
    );
    // Nothing is placed in the notch.
    for t in ctx.triangles() {
        let c = helpers::centroid(&ctx, &t);
        assert!(helpers::point_in_polygon(c, &ring));
    }
}

#[test]
fn star_fixture() {
    let contours = helpers::parse_contours(include_str!("data/star.dat"));
    assert_eq!(contours.len(), 1);
    assert_eq!(contours[0].len(), 10);
    let ctx = helpers::triangulate_contours(&contours);
    assert_eq!(ctx.triangle_count(), 8);
    helpers::verify_valid_output(&ctx);
    assert_relative_eq!(
        helpers::total_area(&ctx),
        helpers::expected_area(&contours),
        epsilon = 1e-6
    );
}

#[test]
fn comb_fixture() {
    let contours = helpers::parse_contours(include_str!("data/comb.dat"));
    assert_eq!(contours.len(), 1);
    let ctx = helpers::triangulate_contours(&contours);
    assert_eq!(ctx.triangle_count(), contours[0].len() - 2);
    helpers::verify_valid_output(&ctx);
    assert_relative_eq!(
        helpers::total_area(&ctx),
        helpers::expected_area(&contours),
        epsilon = 1e-9
    );
    for t in ctx.triangles() {
        let c = helpers::centroid(&ctx, &t);
        assert!(helpers::point_in_polygon(c, &contours[0]));
    }
}

#[test]
fn flat_arrays_match_triangles() {
    let ring = pts(&[(0.0, 0.0), (4.0, 0.3), (3.8, 3.0), (0.2, 2.7)]);
    let ctx = triangulate(&ring);
    let verts = ctx.vertices();
    assert_eq!(verts.len(), 8);
    for (t, tri) in ctx.elements().chunks(3).zip(ctx.triangles()) {
        assert_eq!(t, &tri.points[..]);
    }
}
