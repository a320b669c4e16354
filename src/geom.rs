// Copyright 2025 Lars Brubaker
// License: BSD-3-Clause (Poly2Tri Copyright (c) 2009-2011, Poly2Tri Contributors)
//
// Geometric primitives for the sweep: points, the sweep order, and the
// orientation / in-circle predicates. These predicates are the only place a
// floating-point tolerance is applied; the rest of the engine trusts them.

use core::cmp::Ordering;
use core::fmt;

pub type Real = f64;

/// Default half-width of the band in which `orient2d` reports `Collinear`.
pub const DEFAULT_TOLERANCE: Real = 1e-12;

const PI_DIV_2: Real = core::f64::consts::FRAC_PI_2;

/// A 2D input point. Equality is by coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    /// The same point with `-0.0` coordinates turned into `0.0`, so that
    /// `sweep_cmp` and `==` agree on it.
    #[inline]
    pub fn canonical(self) -> Self {
        Point::new(self.x + 0.0, self.y + 0.0)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point::new(x, y)
    }
}

impl From<[Real; 2]> for Point {
    fn from([x, y]: [Real; 2]) -> Self {
        Point::new(x, y)
    }
}

/// Sweep order: ascending y, ties broken by ascending x.
#[inline]
pub fn sweep_cmp(a: &Point, b: &Point) -> Ordering {
    a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

impl Orientation {
    #[inline]
    pub fn is_ccw(self) -> bool {
        self == Orientation::CounterClockwise
    }

    #[inline]
    pub fn is_cw(self) -> bool {
        self == Orientation::Clockwise
    }

    #[inline]
    pub fn is_collinear(self) -> bool {
        self == Orientation::Collinear
    }
}

/// Twice the signed area of (pa, pb, pc); positive when counter-clockwise.
#[inline]
pub fn orient2d_det(pa: &Point, pb: &Point, pc: &Point) -> Real {
    let det_left = (pa.x - pc.x) * (pb.y - pc.y);
    let det_right = (pa.y - pc.y) * (pb.x - pc.x);
    det_left - det_right
}

/// Orientation of the turn pa -> pb -> pc. Determinants inside
/// `(-tolerance, tolerance)` count as collinear.
#[inline]
pub fn orient2d(pa: &Point, pb: &Point, pc: &Point, tolerance: Real) -> Orientation {
    let val = orient2d_det(pa, pb, pc);
    if val > -tolerance && val < tolerance {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

/// Returns true if `pd` lies strictly inside the circumcircle of the
/// counter-clockwise triangle (pa, pb, pc).
///
/// The quadrilateral pa, pb, pd, pc must be strictly convex at `pa` for the
/// answer to be true; a reflex quadrilateral can't be flipped, so it is
/// reported as "outside" before the lifted determinant is evaluated.
pub fn in_circle(pa: &Point, pb: &Point, pc: &Point, pd: &Point) -> bool {
    let adx = pa.x - pd.x;
    let ady = pa.y - pd.y;
    let bdx = pb.x - pd.x;
    let bdy = pb.y - pd.y;

    let oabd = adx * bdy - bdx * ady;
    if oabd <= 0.0 {
        return false;
    }

    let cdx = pc.x - pd.x;
    let cdy = pc.y - pd.y;

    let ocad = cdx * ady - adx * cdy;
    if ocad <= 0.0 {
        return false;
    }

    let bc_det = bdx * cdy - cdx * bdy;

    let a_lift = adx * adx + ady * ady;
    let b_lift = bdx * bdx + bdy * bdy;
    let c_lift = cdx * cdx + cdy * cdy;

    a_lift * bc_det + b_lift * ocad + c_lift * oabd > 0.0
}

/// Returns true if `pd` lies in the open wedge at `pa` spanned by `pb` and
/// `pc`, i.e. the diagonal pa-pd can replace pb-pc.
pub fn in_scan_area(pa: &Point, pb: &Point, pc: &Point, pd: &Point, tolerance: Real) -> bool {
    let oadb = (pa.x - pb.x) * (pd.y - pb.y) - (pd.x - pb.x) * (pa.y - pb.y);
    if oadb >= -tolerance {
        return false;
    }

    let oadc = (pa.x - pc.x) * (pd.y - pc.y) - (pd.x - pc.x) * (pa.y - pc.y);
    if oadc <= tolerance {
        return false;
    }
    true
}

/// Signed angle at `origin` from `pa` to `pb`, in (-pi, pi].
#[inline]
pub fn angle(origin: &Point, pa: &Point, pb: &Point) -> Real {
    let ax = pa.x - origin.x;
    let ay = pa.y - origin.y;
    let bx = pb.x - origin.x;
    let by = pb.y - origin.y;
    let x = ax * by - ay * bx;
    let y = ax * bx + ay * by;
    x.atan2(y)
}

#[inline]
pub fn angle_exceeds_90_degrees(origin: &Point, pa: &Point, pb: &Point) -> bool {
    let a = angle(origin, pa, pb);
    a > PI_DIV_2 || a < -PI_DIV_2
}

/// Only angles on the same side as the point being added count.
#[inline]
pub fn angle_exceeds_plus_90_degrees_or_is_negative(
    origin: &Point,
    pa: &Point,
    pb: &Point,
) -> bool {
    let a = angle(origin, pa, pb);
    a > PI_DIV_2 || a < 0.0
}

/// Signed area of a polygon given as a closed ring (shoelace formula).
pub fn signed_area(ring: &[Point]) -> Real {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut prev = ring[ring.len() - 1];
    for p in ring {
        sum += prev.x * p.y - p.x * prev.y;
        prev = *p;
    }
    sum * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: Real, y: Real) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn sweep_order_is_y_then_x() {
        assert_eq!(sweep_cmp(&p(5.0, 0.0), &p(0.0, 1.0)), Ordering::Less);
        assert_eq!(sweep_cmp(&p(0.0, 1.0), &p(1.0, 1.0)), Ordering::Less);
        assert_eq!(sweep_cmp(&p(1.0, 1.0), &p(1.0, 1.0)), Ordering::Equal);
    }

    #[test]
    fn canonical_drops_negative_zero() {
        let q = p(-0.0, -0.0).canonical();
        assert!(q.x.is_sign_positive() && q.y.is_sign_positive());
        assert_eq!(sweep_cmp(&q, &p(0.0, 0.0)), Ordering::Equal);
        assert_eq!(p(-2.5, 3.0).canonical(), p(-2.5, 3.0));
    }

    #[test]
    fn orient2d_basic() {
        let tol = DEFAULT_TOLERANCE;
        assert!(orient2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.5, 1.0), tol).is_ccw());
        assert!(orient2d(&p(0.0, 0.0), &p(0.5, 1.0), &p(1.0, 0.0), tol).is_cw());
        assert!(orient2d(&p(0.0, 0.0), &p(1.0, 1.0), &p(2.0, 2.0), tol).is_collinear());
    }

    #[test]
    fn orient2d_tolerance_band() {
        // det = 1e-13: collinear under the default band, not under a zero band.
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        let c = p(0.5, 1e-13);
        assert!(orient2d(&a, &b, &c, DEFAULT_TOLERANCE).is_collinear());
        assert!(orient2d(&a, &b, &c, 0.0).is_ccw());
    }

    #[test]
    fn in_circle_inside_and_outside() {
        let a = p(0.0, 1.0);
        let b = p(-1.0, 0.0);
        let c = p(1.0, 0.0);
        assert!(in_circle(&a, &b, &c, &p(0.0, -0.5)));
        assert!(!in_circle(&a, &b, &c, &p(0.0, -2.0)));
        // On the circle is not strictly inside.
        assert!(!in_circle(&a, &b, &c, &p(0.0, -1.0)));
    }

    #[test]
    fn in_scan_area_wedge() {
        let tol = DEFAULT_TOLERANCE;
        let a = p(0.0, 0.0);
        let b = p(1.0, 1.0);
        let c = p(-1.0, 1.0);
        assert!(in_scan_area(&a, &b, &c, &p(0.0, 2.0), tol));
        assert!(!in_scan_area(&a, &b, &c, &p(3.0, 1.0), tol));
        assert!(!in_scan_area(&a, &b, &c, &p(2.0, 2.0), tol));
    }

    #[test]
    fn angle_signs() {
        let o = p(0.0, 0.0);
        assert_relative_eq!(angle(&o, &p(1.0, 0.0), &p(0.0, 1.0)), PI_DIV_2);
        assert!(angle(&o, &p(0.0, 1.0), &p(1.0, 0.0)) < 0.0);
        assert!(angle_exceeds_90_degrees(&o, &p(1.0, 0.0), &p(-1.0, 0.1)));
        assert!(!angle_exceeds_90_degrees(&o, &p(1.0, 1.0), &p(-1.0, 1.0)));
        assert!(angle_exceeds_plus_90_degrees_or_is_negative(
            &o,
            &p(0.0, 1.0),
            &p(1.0, 0.0)
        ));
    }

    #[test]
    fn signed_area_of_unit_square() {
        let ring = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert_relative_eq!(signed_area(&ring), 1.0);
        let rev: Vec<Point> = ring.iter().rev().copied().collect();
        assert_relative_eq!(signed_area(&rev), -1.0);
    }
}
