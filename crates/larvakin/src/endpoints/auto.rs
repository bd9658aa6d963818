//! Automatic head/tail detection from the outline alone.

use nalgebra::{Matrix2, SymmetricEigen, Vector2};

use super::{EndpointConfig, Endpoints};
use crate::error::GeometryError;
use crate::geometry::{self, Point};
use crate::roi::Roi;

/// Strategy for picking the head in [`super::EndpointMode::Auto`].
///
/// The directional rules put the head at the extreme boundary vertex in that
/// screen direction and the tail at the opposite extreme. `Tapered` looks for
/// the sharper of the two ends along the body's long axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadRule {
    Topmost,
    Bottommost,
    Leftmost,
    Rightmost,
    #[default]
    Tapered,
}

impl HeadRule {
    pub const ALL: [HeadRule; 5] = [
        HeadRule::Topmost,
        HeadRule::Bottommost,
        HeadRule::Leftmost,
        HeadRule::Rightmost,
        HeadRule::Tapered,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HeadRule::Topmost => "topmost",
            HeadRule::Bottommost => "bottommost",
            HeadRule::Leftmost => "leftmost",
            HeadRule::Rightmost => "rightmost",
            HeadRule::Tapered => "tapered",
        }
    }
}

impl std::str::FromStr for HeadRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeadRule::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = HeadRule::ALL.iter().map(|r| r.name()).collect();
                format!("unknown head rule '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Long-axis direction and elongation (major/minor spread) of the outline.
struct PrincipalAxis {
    direction: Vector2<f64>,
    elongation: f64,
}

/// Second moments of the boundary, each edge weighted by its length.
fn principal_axis(ring: &[Point]) -> Option<PrincipalAxis> {
    let n = ring.len();
    let mut w_sum = 0.0;
    let mut mean = Vector2::zeros();
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let w = geometry::dist(a, b);
        mean += geometry::vec2(geometry::midpoint(a, b)) * w;
        w_sum += w;
    }
    if w_sum <= 0.0 {
        return None;
    }
    mean /= w_sum;

    let mut cov = Matrix2::zeros();
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let w = geometry::dist(a, b);
        let d = geometry::vec2(geometry::midpoint(a, b)) - mean;
        cov += d * d.transpose() * w;
    }
    cov /= w_sum;

    let eig = SymmetricEigen::new(cov);
    let (major, minor) = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
        (0, 1)
    } else {
        (1, 0)
    };
    let (l_major, l_minor) = (eig.eigenvalues[major], eig.eigenvalues[minor].max(0.0));
    let elongation = if l_minor > 0.0 {
        (l_major / l_minor).sqrt()
    } else {
        f64::INFINITY
    };
    Some(PrincipalAxis {
        direction: eig.eigenvectors.column(major).into_owned(),
        elongation,
    })
}

/// Index of the vertex minimizing `key`; first one wins ties.
fn argmin_by(ring: &[Point], key: impl Fn(Point) -> f64) -> usize {
    let mut best = 0;
    for i in 1..ring.len() {
        if key(ring[i]) < key(ring[best]) {
            best = i;
        }
    }
    best
}

/// Sum of absolute vertex turning within `window` arc length of vertex `i`.
fn turning_concentration(ring: &[Point], i: usize, window: f64) -> f64 {
    let n = ring.len();
    let turn_at = |k: usize| {
        let prev = ring[(k + n - 1) % n];
        let next = ring[(k + 1) % n];
        geometry::turn_angle(geometry::sub(ring[k], prev), geometry::sub(next, ring[k])).abs()
    };

    let mut total = turn_at(i);
    // Walk outward in both directions until the window is exhausted.
    for step in [1, n - 1] {
        let mut k = i;
        let mut travelled = 0.0;
        for _ in 0..n / 2 {
            let next = (k + step) % n;
            travelled += geometry::dist(ring[k], ring[next]);
            if travelled > window {
                break;
            }
            k = next;
            total += turn_at(k);
        }
    }
    total
}

pub(super) fn detect(roi: &Roi, config: &EndpointConfig) -> Result<Endpoints, GeometryError> {
    let ring = roi.points();
    let axis = principal_axis(ring)
        .ok_or_else(|| GeometryError::DetectionAmbiguous("outline has no extent".to_string()))?;
    if axis.elongation < config.min_elongation {
        return Err(GeometryError::DetectionAmbiguous(format!(
            "outline elongation {:.3} below {:.3}",
            axis.elongation, config.min_elongation
        )));
    }

    let (head, tail) = match config.head_rule {
        HeadRule::Topmost => (argmin_by(ring, |p| p[1]), argmin_by(ring, |p| -p[1])),
        HeadRule::Bottommost => (argmin_by(ring, |p| -p[1]), argmin_by(ring, |p| p[1])),
        HeadRule::Leftmost => (argmin_by(ring, |p| p[0]), argmin_by(ring, |p| -p[0])),
        HeadRule::Rightmost => (argmin_by(ring, |p| -p[0]), argmin_by(ring, |p| p[0])),
        HeadRule::Tapered => tapered_ends(ring, &axis, roi.perimeter(), config)?,
    };
    tracing::trace!(
        rule = config.head_rule.name(),
        elongation = axis.elongation,
        head = ?ring[head],
        tail = ?ring[tail],
        "auto endpoints"
    );
    Endpoints::new(ring[head], ring[tail])
}

fn tapered_ends(
    ring: &[Point],
    axis: &PrincipalAxis,
    perimeter: f64,
    config: &EndpointConfig,
) -> Result<(usize, usize), GeometryError> {
    let along = |p: Point| geometry::vec2(p).dot(&axis.direction);
    let end_a = argmin_by(ring, along);
    let end_b = argmin_by(ring, |p| -along(p));

    let window = config.taper_window_frac * perimeter;
    let ca = turning_concentration(ring, end_a, window);
    let cb = turning_concentration(ring, end_b, window);
    let contrast = (ca - cb).abs() / ca.max(cb).max(f64::EPSILON);
    if contrast < config.min_taper_contrast {
        return Err(GeometryError::DetectionAmbiguous(format!(
            "end taper contrast {contrast:.3} below {:.3}",
            config.min_taper_contrast
        )));
    }
    Ok(if ca > cb { (end_a, end_b) } else { (end_b, end_a) })
}

#[cfg(test)]
mod tests {
    use super::super::{resolve_endpoints, EndpointMode};
    use super::*;
    use crate::test_utils::{ellipse_points, ellipse_roi, teardrop_points};
    use approx::assert_relative_eq;

    fn config(rule: HeadRule) -> EndpointConfig {
        EndpointConfig {
            head_rule: rule,
            ..Default::default()
        }
    }

    #[test]
    fn tapered_rule_picks_the_sharp_end() {
        let roi = Roi::new(teardrop_points()).unwrap();
        let e = resolve_endpoints(&roi, &EndpointMode::Auto, &config(HeadRule::Tapered)).unwrap();
        assert_eq!(e.head(), [0.0, 50.0]);
        assert_relative_eq!(e.tail()[0], 160.0, epsilon = 1e-9);
        assert_relative_eq!(e.tail()[1], 50.0, epsilon = 1e-9);
    }

    #[test]
    fn tapered_rule_is_orientation_independent() {
        let mut pts = teardrop_points();
        pts.reverse();
        let roi = Roi::new(pts).unwrap();
        let e = resolve_endpoints(&roi, &EndpointMode::Auto, &config(HeadRule::Tapered)).unwrap();
        assert_eq!(e.head(), [0.0, 50.0]);
    }

    #[test]
    fn symmetric_ellipse_is_ambiguous_for_tapered_rule() {
        let err = resolve_endpoints(&ellipse_roi(), &EndpointMode::Auto, &config(HeadRule::Tapered))
            .unwrap_err();
        assert!(matches!(err, GeometryError::DetectionAmbiguous(msg) if msg.contains("taper")));
    }

    #[test]
    fn near_circle_is_ambiguous_for_every_rule() {
        let roi = Roi::new(ellipse_points([50.0, 50.0], 30.0, 29.0, 90)).unwrap();
        for rule in HeadRule::ALL {
            let err = resolve_endpoints(&roi, &EndpointMode::Auto, &config(rule)).unwrap_err();
            assert!(
                matches!(err, GeometryError::DetectionAmbiguous(ref msg) if msg.contains("elongation")),
                "{rule:?}: {err}"
            );
        }
    }

    #[test]
    fn directional_rules_use_extreme_vertices() {
        let roi = ellipse_roi();
        let left = resolve_endpoints(&roi, &EndpointMode::Auto, &config(HeadRule::Leftmost)).unwrap();
        assert_relative_eq!(left.head()[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(left.tail()[0], 200.0, epsilon = 1e-9);

        let right =
            resolve_endpoints(&roi, &EndpointMode::Auto, &config(HeadRule::Rightmost)).unwrap();
        assert_eq!(right, left.swapped());

        let top = resolve_endpoints(&roi, &EndpointMode::Auto, &config(HeadRule::Topmost)).unwrap();
        assert_relative_eq!(top.head()[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(top.tail()[1], 60.0, epsilon = 1e-9);
    }

    #[test]
    fn head_rule_parses_case_insensitively() {
        assert_eq!("Topmost".parse::<HeadRule>().unwrap(), HeadRule::Topmost);
        assert!("sideways".parse::<HeadRule>().is_err());
    }
}
