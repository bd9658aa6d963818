//! Synthetic larva outlines shared by unit tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::geometry::Point;
use crate::roi::Roi;

/// Ellipse sampled at `n` angles `2πk/n`, starting at the `+x` apex.
///
/// For even `n` the second half mirrors the first through the centre, so
/// both apexes are exact.
pub(crate) fn ellipse_points(center: Point, a: f64, b: f64, n: usize) -> Vec<Point> {
    let half = n / 2;
    (0..n)
        .map(|k| {
            let (k0, sign) = if n % 2 == 0 && k >= half {
                (k - half, -1.0)
            } else {
                (k, 1.0)
            };
            let th = TAU * k0 as f64 / n as f64;
            [center[0] + sign * a * th.cos(), center[1] + sign * b * th.sin()]
        })
        .collect()
}

/// The 200×60 px reference body: apexes at (0,30) and (200,30).
pub(crate) fn ellipse_roi() -> Roi {
    Roi::new(ellipse_points([100.0, 30.0], 100.0, 30.0, 120)).expect("ellipse ROI")
}

/// Two r=50 lobes centred at (50,30) and (150,30) touching at (100,30).
///
/// Both lobes start and end at the shared point, so the outline is simple in
/// the "no crossing" sense but pinched to zero width in the middle.
pub(crate) fn figure_eight_points(per_lobe: usize) -> Vec<Point> {
    let r = 50.0;
    let mut pts = Vec::with_capacity(2 * per_lobe);
    // Left lobe from its rightmost point, right lobe from its leftmost point,
    // both clockwise on screen.
    for k in 0..per_lobe {
        let th = TAU * k as f64 / per_lobe as f64;
        pts.push([50.0 + r * th.cos(), 30.0 + r * th.sin()]);
    }
    for k in 0..per_lobe {
        let th = PI + TAU * k as f64 / per_lobe as f64;
        pts.push([150.0 + r * th.cos(), 30.0 + r * th.sin()]);
    }
    pts
}

/// Teardrop: sharp tip at (0,50), round r=20 end with apex at (160,50).
pub(crate) fn teardrop_points() -> Vec<Point> {
    let mut pts = Vec::new();
    pts.push([0.0, 50.0]);
    for k in 1..=14 {
        let t = k as f64 / 14.0;
        pts.push([140.0 * t, 50.0 - 20.0 * t]);
    }
    // Semicircle from the top tangent point (140,30) to (140,70), 5° steps.
    for k in 1..36 {
        let phi = -FRAC_PI_2 + PI * k as f64 / 36.0;
        pts.push([140.0 + 20.0 * phi.cos(), 50.0 + 20.0 * phi.sin()]);
    }
    for k in 0..14 {
        let t = 1.0 - k as f64 / 14.0;
        pts.push([140.0 * t, 50.0 + 20.0 * t]);
    }
    pts
}

/// Bent body: annular band of radii 100..130 around (150,200) spanning
/// 120°, closed by r=15 caps. The centreline has radius 115.
///
/// Returns the outline and the two cap apexes `(head, tail)`.
pub(crate) fn banana() -> (Vec<Point>, Point, Point) {
    let c = [150.0, 200.0];
    let (r_in, r_out, r_mid, r_cap) = (100.0, 130.0, 115.0, 15.0);
    let (phi0, phi1) = (-150f64.to_radians(), -30f64.to_radians());
    let on = |r: f64, phi: f64| [c[0] + r * phi.cos(), c[1] + r * phi.sin()];
    let steps = 60;

    let mut pts = Vec::new();
    for k in 0..=steps {
        pts.push(on(r_out, phi0 + (phi1 - phi0) * k as f64 / steps as f64));
    }
    let cap1 = on(r_mid, phi1);
    for k in 1..12 {
        // Outward normal at phi1 rotates through the tangent to the inward normal.
        let a = phi1 + PI * k as f64 / 12.0;
        pts.push([cap1[0] + r_cap * a.cos(), cap1[1] + r_cap * a.sin()]);
    }
    for k in 0..=steps {
        pts.push(on(r_in, phi1 - (phi1 - phi0) * k as f64 / steps as f64));
    }
    let cap0 = on(r_mid, phi0);
    for k in 1..12 {
        let a = phi0 + PI + PI * k as f64 / 12.0;
        pts.push([cap0[0] + r_cap * a.cos(), cap0[1] + r_cap * a.sin()]);
    }

    let head = [
        cap0[0] + r_cap * (phi0 - FRAC_PI_2).cos(),
        cap0[1] + r_cap * (phi0 - FRAC_PI_2).sin(),
    ];
    let tail = [
        cap1[0] + r_cap * (phi1 + FRAC_PI_2).cos(),
        cap1[1] + r_cap * (phi1 + FRAC_PI_2).sin(),
    ];
    (pts, head, tail)
}

/// Ellipse with seeded radial jitter of at most `amp` pixels.
pub(crate) fn jittered_ellipse(seed: u64, n: usize, amp: f64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|k| {
            let th = TAU * k as f64 / n as f64;
            let dr = rng.gen_range(-amp..=amp);
            [
                100.0 + (100.0 + dr) * th.cos(),
                30.0 + (30.0 + dr) * th.sin(),
            ]
        })
        .collect()
}

/// Straight horizontal polyline from `(x0, y)` with `n` unit steps.
pub(crate) fn straight_line(x0: f64, y: f64, n: usize) -> Vec<Point> {
    (0..n).map(|k| [x0 + k as f64, y]).collect()
}
