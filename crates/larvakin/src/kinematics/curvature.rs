use super::AbsenceReason;
use crate::geometry::{self, Point};

/// Cross products below this fraction of `|u||v|` count as collinear.
const COLLINEAR_REL_EPS: f64 = 1e-9;

/// Mean signed discrete curvature over the interior samples of `pts`, in
/// 1/pixel.
///
/// At each interior sample the turn between the incoming and outgoing steps
/// is divided by the mean of the two step lengths. Positive values turn the
/// same way as a positive turning angle (increasing `atan2` angle).
pub fn mean_signed_curvature(pts: &[Point]) -> Result<f64, AbsenceReason> {
    if pts.len() < 3 {
        return Err(AbsenceReason::TooFewPoints);
    }
    let mut sum = 0.0;
    for w in pts.windows(3) {
        let u = geometry::sub(w[1], w[0]);
        let v = geometry::sub(w[2], w[1]);
        let (lu, lv) = (u.norm(), v.norm());
        if lu < geometry::COINCIDENT_EPS || lv < geometry::COINCIDENT_EPS {
            return Err(AbsenceReason::ZeroLength);
        }
        let turn = if u.perp(&v).abs() <= COLLINEAR_REL_EPS * lu * lv && u.dot(&v) > 0.0 {
            0.0
        } else {
            geometry::turn_angle(u, v)
        };
        sum += turn / (0.5 * (lu + lv));
    }
    let mean = sum / (pts.len() - 2) as f64;
    if mean.is_finite() {
        Ok(mean)
    } else {
        Err(AbsenceReason::NonFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::straight_line;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    #[test]
    fn straight_lines_have_zero_curvature() {
        assert_eq!(mean_signed_curvature(&straight_line(0.0, 30.0, 50)), Ok(0.0));
        let diagonal: Vec<Point> = (0..20).map(|k| [0.1 * k as f64, 0.3 * k as f64 + 7.0]).collect();
        assert_eq!(mean_signed_curvature(&diagonal), Ok(0.0));
    }

    #[test]
    fn circle_arc_has_inverse_radius() {
        let r = 40.0;
        let arc: Vec<Point> = (0..=90)
            .map(|k| {
                let th = TAU * 0.25 * k as f64 / 90.0;
                [r * th.cos(), r * th.sin()]
            })
            .collect();
        let k = mean_signed_curvature(&arc).unwrap();
        assert_relative_eq!(k, 1.0 / r, max_relative = 1e-3);

        let mut rev = arc.clone();
        rev.reverse();
        assert_relative_eq!(mean_signed_curvature(&rev).unwrap(), -k, max_relative = 1e-12);
    }

    #[test]
    fn degenerate_inputs_are_absent() {
        assert_eq!(
            mean_signed_curvature(&[[0.0, 0.0], [1.0, 0.0]]),
            Err(AbsenceReason::TooFewPoints)
        );
        assert_eq!(
            mean_signed_curvature(&[[0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [2.0, 0.0]]),
            Err(AbsenceReason::ZeroLength)
        );
        assert_eq!(
            mean_signed_curvature(&[[0.0, 0.0], [1.0, 0.0], [f64::NAN, 0.0]]),
            Err(AbsenceReason::NonFinite)
        );
    }
}
