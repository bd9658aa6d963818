//! Planar polyline primitives shared by the extraction stages.
//!
//! Points are `[x, y]` in image pixel coordinates (y grows downward).
//! Vector arithmetic goes through `nalgebra::Vector2`.

use nalgebra::Vector2;

/// A 2D point in pixel coordinates.
pub type Point = [f64; 2];

/// Steps shorter than this are treated as coincident points.
pub(crate) const COINCIDENT_EPS: f64 = 1e-9;

#[inline]
pub(crate) fn vec2(p: Point) -> Vector2<f64> {
    Vector2::new(p[0], p[1])
}

#[inline]
pub(crate) fn sub(a: Point, b: Point) -> Vector2<f64> {
    vec2(a) - vec2(b)
}

#[inline]
pub(crate) fn dist(a: Point, b: Point) -> f64 {
    sub(b, a).norm()
}

#[inline]
pub(crate) fn lerp(a: Point, b: Point, t: f64) -> Point {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

#[inline]
pub(crate) fn midpoint(a: Point, b: Point) -> Point {
    [0.5 * (a[0] + b[0]), 0.5 * (a[1] + b[1])]
}

#[inline]
pub(crate) fn is_finite(p: Point) -> bool {
    p[0].is_finite() && p[1].is_finite()
}

/// Signed rotation from `u` to `v` in radians, in `(-π, π]`.
///
/// Positive when `v` is reached from `u` by increasing `atan2` angle.
#[inline]
pub(crate) fn turn_angle(u: Vector2<f64>, v: Vector2<f64>) -> f64 {
    u.perp(&v).atan2(u.dot(&v))
}

/// Cumulative arc length; `out[0] == 0` and `out.len() == pts.len()`.
pub(crate) fn cumulative_lengths(pts: &[Point]) -> Vec<f64> {
    let mut out = Vec::with_capacity(pts.len());
    let mut acc = 0.0;
    for (i, p) in pts.iter().enumerate() {
        if i > 0 {
            acc += dist(pts[i - 1], *p);
        }
        out.push(acc);
    }
    out
}

pub(crate) fn polyline_length(pts: &[Point]) -> f64 {
    pts.windows(2).map(|w| dist(w[0], w[1])).sum()
}

/// Point at arc-length fraction `t` (clamped to `[0, 1]`).
///
/// `cum` must be `cumulative_lengths(pts)`.
pub(crate) fn point_at_fraction(pts: &[Point], cum: &[f64], t: f64) -> Point {
    debug_assert_eq!(pts.len(), cum.len());
    let Some(&total) = cum.last() else {
        return [f64::NAN, f64::NAN];
    };
    if total <= 0.0 || t <= 0.0 {
        return pts[0];
    }
    if t >= 1.0 {
        return pts[pts.len() - 1];
    }
    let target = t * total;
    let i = cum.partition_point(|&c| c < target).clamp(1, pts.len() - 1);
    let span = cum[i] - cum[i - 1];
    if span <= 0.0 {
        return pts[i];
    }
    lerp(pts[i - 1], pts[i], (target - cum[i - 1]) / span)
}

/// Sub-polyline between arc-length fractions `f0 <= f1`, including the
/// interpolated cut points and every original vertex strictly between them.
pub(crate) fn sub_polyline(pts: &[Point], cum: &[f64], f0: f64, f1: f64) -> Vec<Point> {
    let total = cum.last().copied().unwrap_or(0.0);
    let (f0, f1) = (f0.clamp(0.0, 1.0), f1.clamp(0.0, 1.0));
    let (s0, s1) = (f0 * total, f1 * total);

    let mut out = vec![point_at_fraction(pts, cum, f0)];
    for (p, &c) in pts.iter().zip(cum) {
        if c > s0 && c < s1 {
            out.push(*p);
        }
    }
    out.push(point_at_fraction(pts, cum, f1));
    out
}

/// Arc length between two fractions, summed step by step over the
/// sub-polyline.
pub(crate) fn arc_length_between(pts: &[Point], cum: &[f64], f0: f64, f1: f64) -> f64 {
    let (lo, hi) = if f0 <= f1 { (f0, f1) } else { (f1, f0) };
    polyline_length(&sub_polyline(pts, cum, lo, hi))
}

/// Resample to `n >= 2` points evenly spaced in arc length.
pub(crate) fn resample(pts: &[Point], n: usize) -> Vec<Point> {
    let cum = cumulative_lengths(pts);
    let denom = (n.max(2) - 1) as f64;
    (0..n.max(2))
        .map(|k| point_at_fraction(pts, &cum, k as f64 / denom))
        .collect()
}

/// Remove consecutive points closer than [`COINCIDENT_EPS`].
pub(crate) fn dedup_consecutive(pts: &mut Vec<Point>) {
    pts.dedup_by(|b, a| dist(*a, *b) < COINCIDENT_EPS);
}

/// Shoelace signed area of a closed ring.
///
/// With y pointing down, a positive value means the ring runs clockwise on
/// screen.
pub(crate) fn signed_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        acc += a[0] * b[1] - b[0] * a[1];
    }
    0.5 * acc
}

/// Closest point on segment `ab` to `p`: `(t, point, distance)`.
pub(crate) fn project_on_segment(p: Point, a: Point, b: Point) -> (f64, Point, f64) {
    let ab = sub(b, a);
    let len2 = ab.norm_squared();
    let t = if len2 <= 0.0 {
        0.0
    } else {
        (sub(p, a).dot(&ab) / len2).clamp(0.0, 1.0)
    };
    let q = if t >= 1.0 { b } else { lerp(a, b, t) };
    (t, q, dist(p, q))
}

/// Location on a closed ring: edge `i` runs from `ring[i]` to `ring[(i+1) % n]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RingPosition {
    pub edge: usize,
    pub t: f64,
    pub point: Point,
    pub distance: f64,
}

/// Nearest point on a closed ring. Ties resolve to the lowest edge index.
pub(crate) fn project_onto_ring(ring: &[Point], p: Point) -> Option<RingPosition> {
    let n = ring.len();
    let mut best: Option<RingPosition> = None;
    for i in 0..n {
        let (t, point, distance) = project_on_segment(p, ring[i], ring[(i + 1) % n]);
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(RingPosition {
                edge: i,
                t,
                point,
                distance,
            });
        }
    }
    best
}

/// Forward walk along a closed ring from `from` to `to`, inclusive of both
/// positions. Walking from a position to one behind it on the same edge
/// goes all the way around.
pub(crate) fn walk_ring(ring: &[Point], from: &RingPosition, to: &RingPosition) -> Vec<Point> {
    let n = ring.len();
    let mut out = vec![from.point];
    let direct = from.edge == to.edge && from.t <= to.t;
    if !direct {
        let mut i = (from.edge + 1) % n;
        loop {
            out.push(ring[i]);
            if i == to.edge {
                break;
            }
            i = (i + 1) % n;
        }
    }
    out.push(to.point);
    dedup_consecutive(&mut out);
    // Dedup keeps the earlier of two coincident points; the end must be exact.
    if let Some(last) = out.last_mut() {
        *last = to.point;
    }
    out
}

#[inline]
fn orient(a: Point, b: Point, c: Point) -> f64 {
    sub(b, a).perp(&sub(c, a))
}

/// `orient` with points closer than [`COINCIDENT_EPS`] to the line through
/// `a` and `b` treated as lying on it.
#[inline]
fn side(a: Point, b: Point, c: Point) -> f64 {
    let o = orient(a, b, c);
    if o.abs() <= COINCIDENT_EPS * dist(a, b) {
        0.0
    } else {
        o
    }
}

#[inline]
fn within_box(a: Point, b: Point, p: Point) -> bool {
    p[0] >= a[0].min(b[0]) - COINCIDENT_EPS
        && p[0] <= a[0].max(b[0]) + COINCIDENT_EPS
        && p[1] >= a[1].min(b[1]) - COINCIDENT_EPS
        && p[1] <= a[1].max(b[1]) + COINCIDENT_EPS
}

/// Strict crossing: each segment has the other's endpoints on opposite sides.
/// Touching at an endpoint, within [`COINCIDENT_EPS`] of one, or collinear
/// overlap does not count.
pub(crate) fn segments_cross_properly(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    let o1 = side(a0, a1, b0);
    let o2 = side(a0, a1, b1);
    let o3 = side(b0, b1, a0);
    let o4 = side(b0, b1, a1);
    o1 * o2 < 0.0 && o3 * o4 < 0.0
}

/// Any contact between two closed segments, including touching.
pub(crate) fn segments_intersect(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    if segments_cross_properly(a0, a1, b0, b1) {
        return true;
    }
    (side(a0, a1, b0) == 0.0 && within_box(a0, a1, b0))
        || (side(a0, a1, b1) == 0.0 && within_box(a0, a1, b1))
        || (side(b0, b1, a0) == 0.0 && within_box(b0, b1, a0))
        || (side(b0, b1, a1) == 0.0 && within_box(b0, b1, a1))
}

/// Minimum distance between two closed segments (0 when they meet).
pub(crate) fn segment_distance(a0: Point, a1: Point, b0: Point, b1: Point) -> f64 {
    if segments_intersect(a0, a1, b0, b1) {
        return 0.0;
    }
    project_on_segment(a0, b0, b1)
        .2
        .min(project_on_segment(a1, b0, b1).2)
        .min(project_on_segment(b0, a0, a1).2)
        .min(project_on_segment(b1, a0, a1).2)
}

/// Minimum distance between two open polylines.
pub(crate) fn polyline_distance(a: &[Point], b: &[Point]) -> f64 {
    let mut best = f64::INFINITY;
    for sa in a.windows(2) {
        for sb in b.windows(2) {
            best = best.min(segment_distance(sa[0], sa[1], sb[0], sb[1]));
            if best == 0.0 {
                return best;
            }
        }
    }
    best
}
