//! Per-frame scalar measurements.
//!
//! The measurement families (body angle, turning angle, curvature, segment
//! distances, body widths) are computed independently. A family that cannot
//! be computed is recorded as [`Measurement::Absent`] without touching the
//! others.

mod angle;
mod curvature;
mod distances;

use std::fmt;

use crate::landmarks::{Landmark, LandmarkSet};
use crate::midline::BodyGeometry;

pub use angle::{body_angle_deg, normalize_angle_deg, turning_angle_deg};
pub use curvature::mean_signed_curvature;
pub use distances::{body_widths, segment_distances, SegmentDistances};

/// Why a measurement has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceReason {
    /// First analyzed frame: there is no previous body angle.
    NoPriorFrame,
    /// Not enough samples.
    TooFewPoints,
    /// The computation produced NaN or infinity.
    NonFinite,
    /// Consecutive samples coincide.
    ZeroLength,
}

impl fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoPriorFrame => "no prior frame",
            Self::TooFewPoints => "too few points",
            Self::NonFinite => "non-finite result",
            Self::ZeroLength => "zero-length step",
        })
    }
}

/// A measured value, or the reason it is missing.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Measurement<T> {
    Value(T),
    Absent(AbsenceReason),
}

impl<T> Measurement<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Measurement::Value(v) => Some(v),
            Measurement::Absent(_) => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Measurement::Absent(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Measurement<U> {
        match self {
            Measurement::Value(v) => Measurement::Value(f(v)),
            Measurement::Absent(r) => Measurement::Absent(r),
        }
    }
}

impl<T: Copy> Measurement<T> {
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

impl<T> From<Result<T, AbsenceReason>> for Measurement<T> {
    fn from(r: Result<T, AbsenceReason>) -> Self {
        match r {
            Ok(v) => Measurement::Value(v),
            Err(reason) => Measurement::Absent(reason),
        }
    }
}

/// Pixel scale applied to lengths and curvature.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Calibration {
    pub pixels_per_unit: f64,
}

impl Calibration {
    pub fn new(pixels_per_unit: f64) -> Result<Self, String> {
        let c = Self { pixels_per_unit };
        c.validate()?;
        Ok(c)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.pixels_per_unit.is_finite() && self.pixels_per_unit > 0.0 {
            Ok(())
        } else {
            Err(format!(
                "calibration.pixels_per_unit must be finite and > 0, got {}",
                self.pixels_per_unit
            ))
        }
    }

    pub fn length(&self, px: f64) -> f64 {
        px / self.pixels_per_unit
    }

    /// 1/px to 1/unit.
    pub fn curvature(&self, per_px: f64) -> f64 {
        per_px * self.pixels_per_unit
    }
}

/// All scalar outputs for one frame. Lengths are in calibrated units when a
/// [`Calibration`] was supplied, pixels otherwise.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Kinematics {
    /// Head→tail orientation, degrees in `(-180, 180]`.
    pub body_angle_deg: Measurement<f64>,
    /// Change from the previous analyzed frame, degrees in `[-180, 180]`.
    pub turning_angle_deg: Measurement<f64>,
    /// Mean signed midline curvature, 1/length.
    pub mean_curvature: Measurement<f64>,
    pub segment_distances: Measurement<SegmentDistances>,
    /// Left-right distance at each internal landmark.
    pub body_widths: Measurement<[f64; 10]>,
}

impl Kinematics {
    /// Every family absent for the same reason.
    pub fn absent(reason: AbsenceReason) -> Self {
        Self {
            body_angle_deg: Measurement::Absent(reason),
            turning_angle_deg: Measurement::Absent(reason),
            mean_curvature: Measurement::Absent(reason),
            segment_distances: Measurement::Absent(reason),
            body_widths: Measurement::Absent(reason),
        }
    }
}

/// Compute every measurement family for one frame.
///
/// The body angle runs from the HEAD to the TAIL landmark. `previous_angle`
/// is the body angle of the previous analyzed frame; its absence yields
/// `Absent(NoPriorFrame)` for the turning angle only.
pub fn compute_kinematics(
    body: &BodyGeometry,
    landmarks: &LandmarkSet,
    previous_angle: Option<f64>,
    calibration: Option<&Calibration>,
) -> Kinematics {
    let body_angle: Measurement<f64> = landmark_body_angle(landmarks).into();
    let turning = turning_from(body_angle.get(), previous_angle);

    let mut curvature: Measurement<f64> = mean_signed_curvature(body.midline()).into();
    let mut distances: Measurement<SegmentDistances> = segment_distances(body, landmarks).into();
    let mut widths: Measurement<[f64; 10]> = body_widths(landmarks).into();
    if let Some(cal) = calibration {
        curvature = curvature.map(|k| cal.curvature(k));
        distances = distances.map(|d| d.in_units(cal.pixels_per_unit));
        widths = widths.map(|w| w.map(|v| cal.length(v)));
    }

    tracing::trace!(
        body_angle = ?body_angle.get(),
        turning = ?turning.get(),
        curvature = ?curvature.get(),
        "kinematics"
    );
    Kinematics {
        body_angle_deg: body_angle,
        turning_angle_deg: turning,
        mean_curvature: curvature,
        segment_distances: distances,
        body_widths: widths,
    }
}

/// Body angle between the HEAD and TAIL landmarks on the midline.
pub(crate) fn landmark_body_angle(landmarks: &LandmarkSet) -> Result<f64, AbsenceReason> {
    let (Some(head), Some(tail)) = (landmarks.get(Landmark::Head), landmarks.get(Landmark::Tail))
    else {
        return Err(AbsenceReason::TooFewPoints);
    };
    body_angle_deg(head.midline, tail.midline).ok_or(AbsenceReason::ZeroLength)
}

/// Turning angle from an optional current and previous body angle.
pub(crate) fn turning_from(current: Option<f64>, previous: Option<f64>) -> Measurement<f64> {
    match (current, previous) {
        (Some(cur), Some(prev)) if prev.is_finite() => {
            Measurement::Value(turning_angle_deg(prev, cur))
        }
        (Some(_), Some(_)) => Measurement::Absent(AbsenceReason::NonFinite),
        (Some(_), None) => Measurement::Absent(AbsenceReason::NoPriorFrame),
        (None, _) => Measurement::Absent(AbsenceReason::ZeroLength),
    }
}
