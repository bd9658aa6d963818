//! Per-frame input and the sealed per-frame record.

use crate::endpoints::{EndpointMode, Endpoints};
use crate::error::{FrameError, GeometryError};
use crate::geometry::Point;
use crate::kinematics::{AbsenceReason, Kinematics};
use crate::landmarks::LandmarkSet;
use crate::midline::BodyGeometry;
use crate::roi::Roi;

/// Everything the engine needs to analyze one frame.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameInput {
    pub frame: u64,
    /// Seconds from the start of the recording, if known.
    #[serde(default)]
    pub timestamp: Option<f64>,
    /// Raw outline vertices; validated when the frame is analyzed.
    #[serde(default)]
    pub roi: Option<Vec<Point>>,
    /// Translation applied to the outline (and to snap/manual coordinates
    /// given in the same frame of reference) before analysis.
    #[serde(default)]
    pub offset: [f64; 2],
    #[serde(default)]
    pub mode: EndpointMode,
}

impl FrameInput {
    pub fn new(frame: u64, roi: Vec<Point>) -> Self {
        Self {
            frame,
            timestamp: None,
            roi: Some(roi),
            offset: [0.0, 0.0],
            mode: EndpointMode::Auto,
        }
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_offset(mut self, offset: [f64; 2]) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_mode(mut self, mode: EndpointMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validated, translated ROI.
    pub(crate) fn build_roi(&self) -> Result<Roi, GeometryError> {
        let pts = self.roi.clone().ok_or(GeometryError::IncompleteFrame("roi"))?;
        Roi::with_offset(pts, self.offset)
    }

    /// Endpoint mode with coordinates shifted by `offset`.
    pub(crate) fn translated_mode(&self) -> EndpointMode {
        let [dx, dy] = self.offset;
        let shift = |p: Point| [p[0] + dx, p[1] + dy];
        match self.mode {
            EndpointMode::Auto => EndpointMode::Auto,
            EndpointMode::Snap { head, tail } => EndpointMode::Snap {
                head: shift(head),
                tail: shift(tail),
            },
            EndpointMode::Manual { head, tail } => EndpointMode::Manual {
                head: shift(head),
                tail: shift(tail),
            },
        }
    }
}

/// Stage outputs gathered for sealing. Geometry fields are optional so the
/// assembler, not the caller, decides what is missing.
#[derive(Debug, Clone, Default)]
pub struct FrameParts {
    pub frame: u64,
    pub timestamp: Option<f64>,
    pub roi: Option<Roi>,
    pub endpoints: Option<Endpoints>,
    pub body: Option<BodyGeometry>,
    pub landmarks: Option<LandmarkSet>,
    pub kinematics: Option<Kinematics>,
}

/// Immutable analysis result for one frame.
///
/// Re-analysis of a frame produces a new record that replaces the old one
/// in the [`crate::SessionTimeline`]; records are never edited in place.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameRecord {
    frame: u64,
    timestamp: Option<f64>,
    roi: Roi,
    endpoints: Endpoints,
    body: BodyGeometry,
    landmarks: LandmarkSet,
    kinematics: Kinematics,
}

impl FrameRecord {
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn timestamp(&self) -> Option<f64> {
        self.timestamp
    }

    pub fn roi(&self) -> &Roi {
        &self.roi
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn midline(&self) -> &[Point] {
        self.body.midline()
    }

    pub fn body(&self) -> &BodyGeometry {
        &self.body
    }

    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    /// Shorthand for the body angle value, if measured.
    pub fn body_angle_deg(&self) -> Option<f64> {
        self.kinematics.body_angle_deg.get()
    }

    /// New record equal to this one except for the turning angle, which is
    /// recomputed against `previous_angle`.
    pub fn with_previous_angle(&self, previous_angle: Option<f64>) -> FrameRecord {
        let mut next = self.clone();
        next.kinematics.turning_angle_deg =
            crate::kinematics::turning_from(self.body_angle_deg(), previous_angle);
        next
    }
}

/// Seal stage outputs into a [`FrameRecord`].
///
/// Missing ROI, endpoints, midline or landmarks fail with
/// [`GeometryError::IncompleteFrame`]. The landmark set is re-checked for
/// fraction order and pair adjacency. Missing kinematics are not an error:
/// the caller marks each family absent inside [`Kinematics`].
pub fn assemble_record(parts: FrameParts) -> Result<FrameRecord, FrameError> {
    let frame = parts.frame;
    let fail = |kind| FrameError::new(frame, kind);
    let roi = parts.roi.ok_or_else(|| fail(GeometryError::IncompleteFrame("roi")))?;
    let endpoints = parts
        .endpoints
        .ok_or_else(|| fail(GeometryError::IncompleteFrame("endpoints")))?;
    let body = parts
        .body
        .ok_or_else(|| fail(GeometryError::IncompleteFrame("midline")))?;
    let landmarks = parts
        .landmarks
        .ok_or_else(|| fail(GeometryError::IncompleteFrame("landmarks")))?;
    if body.midline().len() < 2 {
        return Err(fail(GeometryError::IncompleteFrame("midline")));
    }
    landmarks.validate().map_err(fail)?;
    let kinematics = parts
        .kinematics
        .unwrap_or_else(|| Kinematics::absent(AbsenceReason::TooFewPoints));

    Ok(FrameRecord {
        frame,
        timestamp: parts.timestamp,
        roi,
        endpoints,
        body,
        landmarks,
        kinematics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::compute_kinematics;
    use crate::landmarks::{place_landmarks, SegmentProportions};
    use crate::midline::{extract_midline, MidlineConfig};
    use crate::test_utils::ellipse_roi;
    use crate::Measurement;

    fn full_parts() -> FrameParts {
        let roi = ellipse_roi();
        let e = Endpoints::new([0.0, 30.0], [200.0, 30.0]).unwrap();
        let body = extract_midline(&roi, &e, &MidlineConfig::default()).unwrap();
        let set = place_landmarks(&body, &SegmentProportions::default()).unwrap();
        let kin = compute_kinematics(&body, &set, None, None);
        FrameParts {
            frame: 4,
            timestamp: Some(0.125),
            roi: Some(roi),
            endpoints: Some(e),
            body: Some(body),
            landmarks: Some(set),
            kinematics: Some(kin),
        }
    }

    #[test]
    fn missing_geometry_is_incomplete() {
        let mut parts = full_parts();
        parts.body = None;
        let err = assemble_record(parts).unwrap_err();
        assert_eq!(err.frame, 4);
        assert_eq!(err.kind, GeometryError::IncompleteFrame("midline"));

        let mut parts = full_parts();
        parts.endpoints = None;
        assert_eq!(
            assemble_record(parts).unwrap_err().kind,
            GeometryError::IncompleteFrame("endpoints")
        );
    }

    #[test]
    fn missing_measurements_are_tolerated() {
        let mut parts = full_parts();
        parts.kinematics = None;
        let rec = assemble_record(parts).unwrap();
        assert!(rec.kinematics().mean_curvature.is_absent());
        assert_eq!(rec.body_angle_deg(), None);
    }

    #[test]
    fn record_round_trips_through_json() {
        let rec = assemble_record(full_parts()).unwrap();
        assert_eq!(rec.frame(), 4);
        assert_eq!(rec.midline().len(), 100);
        assert_eq!(
            rec.kinematics().turning_angle_deg,
            Measurement::Absent(AbsenceReason::NoPriorFrame)
        );
        let json = serde_json::to_string(&rec).unwrap();
        let back: FrameRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn frame_input_json_defaults() {
        let input: FrameInput =
            serde_json::from_str(r#"{"frame": 3, "roi": [[0,0],[4,0],[4,3]]}"#).unwrap();
        assert_eq!(input.mode, EndpointMode::Auto);
        assert_eq!(input.offset, [0.0, 0.0]);
        assert!(input.timestamp.is_none());

        let missing: FrameInput = serde_json::from_str(r#"{"frame": 5}"#).unwrap();
        assert_eq!(missing.build_roi(), Err(GeometryError::IncompleteFrame("roi")));
    }

    #[test]
    fn offset_moves_roi_and_hints_together() {
        let input = FrameInput::new(0, vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0]])
            .with_offset([10.0, 20.0])
            .with_mode(EndpointMode::Manual {
                head: [0.0, 0.0],
                tail: [4.0, 3.0],
            });
        let roi = input.build_roi().unwrap();
        assert_eq!(roi.points()[0], [10.0, 20.0]);
        assert_eq!(
            input.translated_mode(),
            EndpointMode::Manual {
                head: [10.0, 20.0],
                tail: [14.0, 23.0]
            }
        );
    }
}
