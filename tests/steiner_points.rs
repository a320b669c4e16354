// Copyright 2025 Lars Brubaker
// Steiner points: swept like any vertex, bound by no constraint.

mod helpers;

use approx::assert_relative_eq;
use helpers::pts;
use p2t_rust::{Point, SweepContext};

fn square_ctx() -> SweepContext {
    SweepContext::from_polyline(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]))
        .unwrap()
}

#[test]
fn steiner_points_become_vertices() {
    let mut ctx = square_ctx();
    let steiner = pts(&[(3.1, 4.2), (6.7, 5.3), (4.4, 7.9)]);
    ctx.add_points(steiner.iter().copied()).unwrap();
    ctx.triangulate().unwrap();
    helpers::verify_valid_output(&ctx);

    // Boundary n, interior k: n + 2k - 2 triangles.
    assert_eq!(ctx.triangle_count(), 4 + 2 * 3 - 2);
    assert_relative_eq!(helpers::total_area(&ctx), 100.0, epsilon = 1e-9);
    for idx in 4..7u32 {
        assert!(
            ctx.triangles().iter().any(|t| t.contains(idx)),
            "steiner point {} unused",
            idx
        );
    }
}

#[test]
fn steiner_point_edges_are_free() {
    let mut ctx = square_ctx();
    ctx.add_point(Point::new(5.2, 4.9)).unwrap();
    ctx.triangulate().unwrap();
    for t in ctx.triangles() {
        let i = t.index(4).unwrap();
        // Both edges at the Steiner point are unconstrained.
        assert!(!t.constrained_edge[(i + 1) % 3]);
        assert!(!t.constrained_edge[(i + 2) % 3]);
        // The edge across from it is a side of the square.
        assert!(t.constrained_edge[i]);
    }
    assert_eq!(ctx.triangle_count(), 4);
}

#[test]
fn steiner_grid() {
    let mut ctx = square_ctx();
    for i in 1..5 {
        for j in 1..5 {
            // Jitter keeps the grid out of cocircular configurations.
            let x = 2.0 * i as f64 + 0.013 * j as f64;
            let y = 2.0 * j as f64 + 0.017 * i as f64;
            ctx.add_point(Point::new(x, y)).unwrap();
        }
    }
    ctx.triangulate().unwrap();
    helpers::verify_valid_output(&ctx);
    assert_eq!(ctx.triangle_count(), 4 + 2 * 16 - 2);
    assert_relative_eq!(helpers::total_area(&ctx), 100.0, epsilon = 1e-9);
}

#[test]
fn steiner_points_inside_hole_region_are_kept_out() {
    let mut ctx = square_ctx();
    ctx.add_hole(&pts(&[(3.0, 3.0), (7.0, 3.2), (6.8, 7.1), (3.2, 6.9)]))
        .unwrap();
    ctx.add_point(Point::new(1.5, 8.3)).unwrap();
    ctx.triangulate().unwrap();
    helpers::verify_valid_output(&ctx);
    let hole_area = helpers::polygon_area(&pts(&[(3.0, 3.0), (7.0, 3.2), (6.8, 7.1), (3.2, 6.9)]));
    assert_relative_eq!(
        helpers::total_area(&ctx),
        100.0 - hole_area,
        epsilon = 1e-9
    );
}

#[test]
fn hexagon_with_sunflower_points_is_delaunay() {
    let hexagon: Vec<Point> = (0..6)
        .map(|k| {
            let a = k as f64 * std::f64::consts::FRAC_PI_3 + 0.1;
            Point::new(10.0 * a.cos(), 10.0 * a.sin())
        })
        .collect();
    let mut ctx = SweepContext::from_polyline(&hexagon).unwrap();
    let n = 30;
    for k in 0..n {
        let r = 8.0 * ((k as f64 + 0.5) / n as f64).sqrt();
        let a = k as f64 * 2.399_963_229_728_653;
        ctx.add_point(Point::new(r * a.cos(), r * a.sin())).unwrap();
    }
    ctx.triangulate().unwrap();
    assert_eq!(ctx.triangle_count(), 6 + 2 * n - 2);
    helpers::verify_valid_output(&ctx);
    helpers::verify_delaunay(&ctx);
}
