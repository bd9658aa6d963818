//! Midline extraction and side-contour split.
//!
//! The boundary is cut at head and tail into two arcs. The arc reached by
//! walking clockwise on screen (image coordinates, y down) from head to tail
//! is the right side; the other arc is the left side. Both arcs are resampled
//! to the same count by arc length and the midline is the sequence of
//! pointwise midpoints.

use crate::endpoints::Endpoints;
use crate::error::GeometryError;
use crate::geometry::{self, Point};
use crate::landmarks::MIN_CONTOUR_POINTS;
use crate::roi::Roi;

/// Midline extraction parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MidlineConfig {
    /// Number of midline samples, head and tail included.
    pub resample_count: usize,
    /// Side arcs closer than this (pixels) outside the end windows mean the
    /// outline is pinched.
    pub pinch_tolerance_px: f64,
    /// Fraction of each arc, at both ends, ignored by the pinch check. The
    /// arcs necessarily meet at head and tail.
    pub end_exclusion_frac: f64,
}

impl Default for MidlineConfig {
    fn default() -> Self {
        Self {
            resample_count: 100,
            pinch_tolerance_px: 1.0,
            end_exclusion_frac: 0.05,
        }
    }
}

impl MidlineConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.resample_count < MIN_CONTOUR_POINTS {
            return Err(format!(
                "midline.resample_count must be >= {MIN_CONTOUR_POINTS}, got {}",
                self.resample_count
            ));
        }
        if !(self.pinch_tolerance_px.is_finite() && self.pinch_tolerance_px >= 0.0) {
            return Err(format!(
                "midline.pinch_tolerance_px must be finite and >= 0, got {}",
                self.pinch_tolerance_px
            ));
        }
        if !(self.end_exclusion_frac >= 0.0 && self.end_exclusion_frac < 0.5) {
            return Err(format!(
                "midline.end_exclusion_frac must be in [0, 0.5), got {}",
                self.end_exclusion_frac
            ));
        }
        Ok(())
    }
}

/// Midline plus the two side contours, all ordered head to tail.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BodyGeometry {
    midline: Vec<Point>,
    left: Vec<Point>,
    right: Vec<Point>,
}

impl BodyGeometry {
    /// Resampled central axis, `resample_count` points.
    pub fn midline(&self) -> &[Point] {
        &self.midline
    }

    /// Left boundary arc (raw vertices plus the split points).
    pub fn left(&self) -> &[Point] {
        &self.left
    }

    /// Right boundary arc (raw vertices plus the split points).
    pub fn right(&self) -> &[Point] {
        &self.right
    }

    pub fn midline_length(&self) -> f64 {
        geometry::polyline_length(&self.midline)
    }
}

/// Split `roi` at the endpoints and derive the midline.
pub fn extract_midline(
    roi: &Roi,
    endpoints: &Endpoints,
    config: &MidlineConfig,
) -> Result<BodyGeometry, GeometryError> {
    let ring = roi.clockwise_points();
    let head = geometry::project_onto_ring(&ring, endpoints.head())
        .ok_or(GeometryError::IncompleteFrame("roi"))?;
    let tail = geometry::project_onto_ring(&ring, endpoints.tail())
        .ok_or(GeometryError::IncompleteFrame("roi"))?;
    if geometry::dist(head.point, tail.point) < geometry::COINCIDENT_EPS {
        return Err(GeometryError::DegenerateMidline(
            "head and tail fall on the same boundary point".to_string(),
        ));
    }

    let right = geometry::walk_ring(&ring, &head, &tail);
    let mut left = geometry::walk_ring(&ring, &tail, &head);
    left.reverse();

    check_pinch(&left, &right, config)?;

    let n = config.resample_count;
    let left_rs = geometry::resample(&left, n);
    let right_rs = geometry::resample(&right, n);
    let midline: Vec<Point> = left_rs
        .iter()
        .zip(&right_rs)
        .map(|(l, r)| geometry::midpoint(*l, *r))
        .collect();

    if let Some(k) = midline
        .windows(2)
        .position(|w| geometry::dist(w[0], w[1]) < geometry::COINCIDENT_EPS)
    {
        return Err(GeometryError::DegenerateMidline(format!(
            "midline collapses between samples {k} and {}",
            k + 1
        )));
    }

    tracing::trace!(
        samples = midline.len(),
        left_vertices = left.len(),
        right_vertices = right.len(),
        length = geometry::polyline_length(&midline),
        "midline extracted"
    );
    Ok(BodyGeometry {
        midline,
        left,
        right,
    })
}

fn check_pinch(left: &[Point], right: &[Point], config: &MidlineConfig) -> Result<(), GeometryError> {
    let e = config.end_exclusion_frac;
    let core = |arc: &[Point]| {
        let cum = geometry::cumulative_lengths(arc);
        geometry::sub_polyline(arc, &cum, e, 1.0 - e)
    };
    let (lc, rc) = (core(left), core(right));
    let gap = geometry::polyline_distance(&lc, &rc);
    if gap <= config.pinch_tolerance_px {
        return Err(GeometryError::DegenerateMidline(format!(
            "side contours come within {gap:.2} px of each other (tolerance {:.2} px)",
            config.pinch_tolerance_px
        )));
    }
    Ok(())
}
