use crate::geometry::{self, Point};

/// Map any angle in degrees into `(-180, 180]`.
pub fn normalize_angle_deg(a: f64) -> f64 {
    let r = a.rem_euclid(360.0);
    if r > 180.0 {
        r - 360.0
    } else {
        r
    }
}

/// Orientation of the head→tail vector in degrees, `(-180, 180]`.
///
/// Uses `atan2(dy, dx)` in image coordinates. `None` when head and tail
/// coincide.
pub fn body_angle_deg(head: Point, tail: Point) -> Option<f64> {
    let d = geometry::sub(tail, head);
    if d.norm() < geometry::COINCIDENT_EPS {
        return None;
    }
    Some(normalize_angle_deg(d.y.atan2(d.x).to_degrees()))
}

/// Signed circular difference `current - previous` in `[-180, 180]`.
///
/// A half-turn reports as `+180`.
pub fn turning_angle_deg(previous: f64, current: f64) -> f64 {
    normalize_angle_deg(current - previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn normalization_range() {
        assert_eq!(normalize_angle_deg(180.0), 180.0);
        assert_eq!(normalize_angle_deg(-180.0), 180.0);
        assert_eq!(normalize_angle_deg(540.0), 180.0);
        assert_abs_diff_eq!(normalize_angle_deg(190.0), -170.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle_deg(-725.0), -5.0, epsilon = 1e-12);
    }

    #[test]
    fn body_angle_of_axis_vectors() {
        assert_eq!(body_angle_deg([0.0, 30.0], [200.0, 30.0]), Some(0.0));
        assert_eq!(body_angle_deg([200.0, 30.0], [0.0, 30.0]), Some(180.0));
        // y grows downward: a tail below the head is +90.
        assert_abs_diff_eq!(body_angle_deg([0.0, 0.0], [0.0, 5.0]).unwrap(), 90.0);
        assert_eq!(body_angle_deg([1.0, 1.0], [1.0, 1.0]), None);
    }

    #[test]
    fn turning_angle_wraps_through_180() {
        assert_abs_diff_eq!(turning_angle_deg(170.0, -170.0), 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(turning_angle_deg(-170.0, 170.0), -20.0, epsilon = 1e-12);
        assert_eq!(turning_angle_deg(0.0, 180.0), 180.0);
        assert_eq!(turning_angle_deg(90.0, -90.0), 180.0);
    }

    #[test]
    fn turning_angle_reconstructs_current_angle() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let prev = normalize_angle_deg(rng.gen_range(-720.0..720.0));
            let cur = normalize_angle_deg(rng.gen_range(-720.0..720.0));
            let turn = turning_angle_deg(prev, cur);
            assert!((-180.0..=180.0).contains(&turn));
            // Equal modulo 360.
            let diff = normalize_angle_deg(prev + turn - cur);
            assert!(diff.abs() < 1e-9, "{prev} {cur} {turn}");
        }
    }

    #[test]
    fn swap_adds_half_turn() {
        let (h, t) = ([12.0, 40.0], [130.0, -15.0]);
        let a = body_angle_deg(h, t).unwrap();
        let b = body_angle_deg(t, h).unwrap();
        assert_abs_diff_eq!(normalize_angle_deg(a + 180.0), b, epsilon = 1e-9);
    }
}
