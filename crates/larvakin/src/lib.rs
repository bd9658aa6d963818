//! larvakin: frame-wise body geometry and locomotion kinematics for
//! single-larva video analysis.
//!
//! Given the outline (ROI polygon) of a larva in each frame, the engine
//! derives a head-to-tail midline, splits the outline into left and right
//! side contours, places the twelve anatomical landmarks and measures body
//! angle, turning angle, mean curvature, inter-landmark distances and body
//! widths. The stages are:
//!
//! 1. **Endpoints** – automatic head/tail detection, snapping of approximate
//!    hints onto the outline, or validated manual coordinates.
//! 2. **Midline** – split at head and tail, resample both arcs, take
//!    pointwise midpoints.
//! 3. **Landmarks** – `HEAD, T1..T3, A1..A7, TAIL` at fixed arc-length
//!    fractions from an anatomical proportion table.
//! 4. **Kinematics** – independent measurement families; a family that
//!    cannot be computed is marked absent, it never fails the frame.
//! 5. **Record** – sealing into an immutable [`FrameRecord`], collected in a
//!    caller-owned [`SessionTimeline`].
//!
//! # Public API
//! - [`Analyzer`] as the primary entry point
//! - [`AnalysisConfig`] and its parts for tuning
//! - the stage functions, each a pure function of its inputs
//!
//! Frames are independent apart from the previous body angle, which is always
//! passed explicitly. Sequences are analyzed in parallel unless endpoint
//! propagation is requested.

mod api;
mod config;
mod endpoints;
mod error;
mod geometry;
mod kinematics;
mod landmarks;
mod midline;
mod pipeline;
mod record;
mod roi;
mod timeline;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::Analyzer;
pub use config::AnalysisConfig;
pub use endpoints::{resolve_endpoints, EndpointConfig, EndpointMode, Endpoints, HeadRule};
pub use error::{BodyEnd, ConfigError, ContourKind, FrameError, GeometryError};
pub use geometry::Point;
pub use kinematics::{
    body_angle_deg, body_widths, compute_kinematics, mean_signed_curvature, normalize_angle_deg,
    segment_distances, turning_angle_deg, AbsenceReason, Calibration, Kinematics, Measurement,
    SegmentDistances,
};
pub use landmarks::{
    place_landmarks, Landmark, LandmarkPoint, LandmarkSet, SegmentProportions, SidePoints,
    MIN_CONTOUR_POINTS,
};
pub use midline::{extract_midline, BodyGeometry, MidlineConfig};
pub use pipeline::BatchOptions;
pub use record::{assemble_record, FrameInput, FrameParts, FrameRecord};
pub use roi::Roi;
pub use timeline::{BatchReport, SessionTimeline};
