//! Error types for frame analysis.
//!
//! Geometry-stage failures abort a frame and are surfaced as [`FrameError`].
//! Measurement-stage problems never become errors; they are recorded as
//! [`crate::Measurement::Absent`] on the affected field only.

use std::fmt;

/// Which end of the body an endpoint error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEnd {
    Head,
    Tail,
}

impl fmt::Display for BodyEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("head"),
            Self::Tail => f.write_str("tail"),
        }
    }
}

/// Polyline an error or a measurement refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourKind {
    Midline,
    Left,
    Right,
}

impl fmt::Display for ContourKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Midline => f.write_str("midline"),
            Self::Left => f.write_str("left contour"),
            Self::Right => f.write_str("right contour"),
        }
    }
}

/// Geometry-stage failure. Any of these aborts the record for its frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// The ROI polygon is unusable (too few points, non-finite, zero area,
    /// properly crossing edges).
    #[error("invalid ROI: {0}")]
    InvalidRoi(String),

    /// No automatic head/tail rule produced a confident winner.
    #[error("automatic head/tail detection is ambiguous: {0}")]
    DetectionAmbiguous(String),

    /// A snap hint has no boundary point within tolerance.
    #[error("{end} hint lies {distance:.2} px from the ROI boundary (snap tolerance {tolerance:.2} px)")]
    SnapOutOfRange {
        end: BodyEnd,
        distance: f64,
        tolerance: f64,
    },

    /// A supplied endpoint is off the boundary band, non-finite, or
    /// coincides with the other endpoint.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Side arcs pinch together or the midline collapses.
    #[error("degenerate midline: {0}")]
    DegenerateMidline(String),

    /// A polyline is too coarse for monotonic landmark lookup.
    #[error("insufficient resolution: {contour} has {points} points, need at least {required}")]
    InsufficientResolution {
        contour: ContourKind,
        points: usize,
        required: usize,
    },

    /// Required geometry was not supplied to the record assembler.
    #[error("incomplete frame: missing {0}")]
    IncompleteFrame(&'static str),

    /// Landmark fractions or pair adjacency failed the seal-time check.
    #[error("inconsistent landmark set: {0}")]
    InconsistentLandmarks(String),
}

/// A [`GeometryError`] scoped to the frame it occurred in.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("frame {frame}: {kind}")]
pub struct FrameError {
    /// Frame index of the failed analysis.
    pub frame: u64,
    /// Underlying geometry failure.
    #[source]
    pub kind: GeometryError,
}

impl FrameError {
    pub fn new(frame: u64, kind: GeometryError) -> Self {
        Self { frame, kind }
    }
}

/// Errors raised while loading or validating an [`crate::AnalysisConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_error_names_frame_and_kind() {
        let err = FrameError::new(
            17,
            GeometryError::SnapOutOfRange {
                end: BodyEnd::Tail,
                distance: 21.5,
                tolerance: 15.0,
            },
        );
        let msg = err.to_string();
        assert!(msg.starts_with("frame 17:"), "{msg}");
        assert!(msg.contains("tail hint lies 21.50 px"), "{msg}");
    }

    #[test]
    fn insufficient_resolution_message_names_contour() {
        let err = GeometryError::InsufficientResolution {
            contour: ContourKind::Left,
            points: 4,
            required: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient resolution: left contour has 4 points, need at least 10"
        );
    }
}
