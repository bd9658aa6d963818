use super::AbsenceReason;
use crate::geometry::{self, Point};
use crate::landmarks::{Landmark, LandmarkSet};
use crate::midline::BodyGeometry;

/// Arc length between consecutive landmarks, one entry per
/// [`Landmark::SEGMENT_PAIRS`] pair, for each polyline.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentDistances {
    pub midline: [f64; 11],
    pub left: [f64; 11],
    pub right: [f64; 11],
}

impl SegmentDistances {
    /// `HEAD`..`TAIL` length along the midline.
    pub fn midline_total(&self) -> f64 {
        self.midline.iter().sum()
    }

    fn scaled(mut self, factor: f64) -> Self {
        for v in self
            .midline
            .iter_mut()
            .chain(self.left.iter_mut())
            .chain(self.right.iter_mut())
        {
            *v *= factor;
        }
        self
    }

    pub(crate) fn in_units(self, pixels_per_unit: f64) -> Self {
        self.scaled(1.0 / pixels_per_unit)
    }
}

fn pair_lengths(pts: &[Point], landmarks: &LandmarkSet) -> [f64; 11] {
    let cum = geometry::cumulative_lengths(pts);
    let fr = landmarks.fractions();
    std::array::from_fn(|i| {
        let (a, b) = Landmark::SEGMENT_PAIRS[i];
        geometry::arc_length_between(pts, &cum, fr[a.index()], fr[b.index()])
    })
}

/// Segment arc lengths in pixels along midline, left and right contour.
pub fn segment_distances(
    body: &BodyGeometry,
    landmarks: &LandmarkSet,
) -> Result<SegmentDistances, AbsenceReason> {
    let d = SegmentDistances {
        midline: pair_lengths(body.midline(), landmarks),
        left: pair_lengths(body.left(), landmarks),
        right: pair_lengths(body.right(), landmarks),
    };
    let all_finite = d
        .midline
        .iter()
        .chain(&d.left)
        .chain(&d.right)
        .all(|v| v.is_finite());
    if !all_finite {
        return Err(AbsenceReason::NonFinite);
    }
    Ok(d)
}

/// Straight left-to-right distance at each internal landmark, in pixels.
pub fn body_widths(landmarks: &LandmarkSet) -> Result<[f64; 10], AbsenceReason> {
    let mut out = [0.0; 10];
    let mut n = 0;
    for (slot, (_, sides)) in out.iter_mut().zip(landmarks.internal()) {
        *slot = geometry::dist(sides.left, sides.right);
        n += 1;
    }
    if n != out.len() {
        return Err(AbsenceReason::TooFewPoints);
    }
    if out.iter().any(|w| !w.is_finite()) {
        return Err(AbsenceReason::NonFinite);
    }
    Ok(out)
}
