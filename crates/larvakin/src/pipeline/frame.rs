//! Single-frame stage sequence.

use crate::config::AnalysisConfig;
use crate::endpoints::{resolve_endpoints, EndpointMode, Endpoints};
use crate::error::FrameError;
use crate::kinematics::{compute_kinematics, landmark_body_angle};
use crate::landmarks::{place_landmarks, LandmarkSet};
use crate::midline::{extract_midline, BodyGeometry};
use crate::record::{assemble_record, FrameInput, FrameParts, FrameRecord};
use crate::roi::Roi;

/// Geometry-stage output of one frame, before measurement.
#[derive(Debug, Clone)]
pub(super) struct FrameGeometry {
    pub frame: u64,
    pub timestamp: Option<f64>,
    pub roi: Roi,
    pub endpoints: Endpoints,
    pub body: BodyGeometry,
    pub landmarks: LandmarkSet,
}

impl FrameGeometry {
    pub fn body_angle_deg(&self) -> Option<f64> {
        landmark_body_angle(&self.landmarks).ok()
    }
}

/// Run the geometry stages with an already translated endpoint `mode`.
pub(super) fn resolve_geometry(
    input: &FrameInput,
    mode: &EndpointMode,
    config: &AnalysisConfig,
) -> Result<FrameGeometry, FrameError> {
    let scoped = |kind| FrameError::new(input.frame, kind);
    let roi = input.build_roi().map_err(scoped)?;
    let endpoints = resolve_endpoints(&roi, mode, &config.endpoints).map_err(scoped)?;
    let body = extract_midline(&roi, &endpoints, &config.midline).map_err(scoped)?;
    let landmarks = place_landmarks(&body, &config.proportions).map_err(scoped)?;
    tracing::debug!(
        frame = input.frame,
        head = ?endpoints.head(),
        tail = ?endpoints.tail(),
        midline_len = body.midline_length(),
        "frame geometry resolved"
    );
    Ok(FrameGeometry {
        frame: input.frame,
        timestamp: input.timestamp,
        roi,
        endpoints,
        body,
        landmarks,
    })
}

/// Measure and seal a resolved frame.
pub(super) fn seal(
    geometry: FrameGeometry,
    previous_angle: Option<f64>,
    config: &AnalysisConfig,
) -> Result<FrameRecord, FrameError> {
    let kinematics = compute_kinematics(
        &geometry.body,
        &geometry.landmarks,
        previous_angle,
        config.calibration.as_ref(),
    );
    assemble_record(FrameParts {
        frame: geometry.frame,
        timestamp: geometry.timestamp,
        roi: Some(geometry.roi),
        endpoints: Some(geometry.endpoints),
        body: Some(geometry.body),
        landmarks: Some(geometry.landmarks),
        kinematics: Some(kinematics),
    })
}

pub(crate) fn analyze_frame(
    input: &FrameInput,
    previous_angle: Option<f64>,
    config: &AnalysisConfig,
) -> Result<FrameRecord, FrameError> {
    let geometry = resolve_geometry(input, &input.translated_mode(), config)?;
    seal(geometry, previous_angle, config)
}
