//! Head/tail endpoint resolution.
//!
//! A single entry point, [`resolve_endpoints`], evaluates an
//! [`EndpointMode`]: automatic detection, snapping of approximate hints to the
//! boundary, or validated pass-through of manual coordinates.

mod auto;

use crate::error::{BodyEnd, GeometryError};
use crate::geometry::{self, Point};
use crate::roi::Roi;

pub use auto::HeadRule;

/// Head and tail coordinates for one frame. Head and tail are distinct.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawEndpoints", into = "RawEndpoints")]
pub struct Endpoints {
    head: Point,
    tail: Point,
}

#[derive(Clone, Copy, serde::Serialize, serde::Deserialize)]
struct RawEndpoints {
    head: Point,
    tail: Point,
}

impl Endpoints {
    /// Validate a head/tail pair: finite and separated by a non-zero distance.
    pub fn new(head: Point, tail: Point) -> Result<Self, GeometryError> {
        if !geometry::is_finite(head) || !geometry::is_finite(tail) {
            return Err(GeometryError::InvalidEndpoint(
                "endpoint coordinates must be finite".to_string(),
            ));
        }
        if geometry::dist(head, tail) < geometry::COINCIDENT_EPS {
            return Err(GeometryError::InvalidEndpoint(
                "head and tail coincide".to_string(),
            ));
        }
        Ok(Self { head, tail })
    }

    pub fn head(&self) -> Point {
        self.head
    }

    pub fn tail(&self) -> Point {
        self.tail
    }

    /// Straight-line head-to-tail distance in pixels.
    pub fn span(&self) -> f64 {
        geometry::dist(self.head, self.tail)
    }

    /// Same pair with head and tail exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            head: self.tail,
            tail: self.head,
        }
    }
}

impl TryFrom<RawEndpoints> for Endpoints {
    type Error = GeometryError;

    fn try_from(raw: RawEndpoints) -> Result<Self, Self::Error> {
        Self::new(raw.head, raw.tail)
    }
}

impl From<Endpoints> for RawEndpoints {
    fn from(e: Endpoints) -> Self {
        Self {
            head: e.head,
            tail: e.tail,
        }
    }
}

/// How endpoints are obtained for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EndpointMode {
    /// Detect from the ROI shape using [`EndpointConfig::head_rule`].
    #[default]
    Auto,
    /// Replace approximate hints with the nearest boundary points.
    Snap { head: Point, tail: Point },
    /// Use the given points as-is after checking they sit on the boundary band.
    Manual { head: Point, tail: Point },
}

impl EndpointMode {
    /// Snap hints carried over from already resolved endpoints.
    pub fn snap_from(previous: &Endpoints) -> Self {
        Self::Snap {
            head: previous.head,
            tail: previous.tail,
        }
    }
}

/// Endpoint resolution parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Strategy used in [`EndpointMode::Auto`].
    pub head_rule: HeadRule,
    /// Minimum ratio of principal-axis spreads (major / minor) for automatic
    /// detection. Rounder outlines are reported as ambiguous.
    pub min_elongation: f64,
    /// Half-width of the boundary window examined around each candidate end,
    /// as a fraction of the perimeter ([`HeadRule::Tapered`] only).
    pub taper_window_frac: f64,
    /// Minimum relative difference in curvature concentration between the two
    /// ends ([`HeadRule::Tapered`] only).
    pub min_taper_contrast: f64,
    /// Maximum hint-to-boundary distance accepted in snap mode (pixels).
    pub snap_tolerance_px: f64,
    /// Maximum point-to-boundary distance accepted in manual mode (pixels).
    pub manual_tolerance_px: f64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            head_rule: HeadRule::default(),
            min_elongation: 1.3,
            taper_window_frac: 0.05,
            min_taper_contrast: 0.1,
            snap_tolerance_px: 15.0,
            manual_tolerance_px: 3.0,
        }
    }
}

impl EndpointConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.min_elongation.is_finite() && self.min_elongation >= 1.0) {
            return Err(format!(
                "endpoints.min_elongation must be >= 1, got {}",
                self.min_elongation
            ));
        }
        if !(self.taper_window_frac > 0.0 && self.taper_window_frac < 0.5) {
            return Err(format!(
                "endpoints.taper_window_frac must be in (0, 0.5), got {}",
                self.taper_window_frac
            ));
        }
        if !(self.min_taper_contrast >= 0.0 && self.min_taper_contrast < 1.0) {
            return Err(format!(
                "endpoints.min_taper_contrast must be in [0, 1), got {}",
                self.min_taper_contrast
            ));
        }
        for (name, v) in [
            ("snap_tolerance_px", self.snap_tolerance_px),
            ("manual_tolerance_px", self.manual_tolerance_px),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(format!("endpoints.{name} must be finite and >= 0, got {v}"));
            }
        }
        Ok(())
    }
}

/// Resolve head and tail for `roi` according to `mode`. Pure.
pub fn resolve_endpoints(
    roi: &Roi,
    mode: &EndpointMode,
    config: &EndpointConfig,
) -> Result<Endpoints, GeometryError> {
    match *mode {
        EndpointMode::Auto => auto::detect(roi, config),
        EndpointMode::Snap { head, tail } => {
            let head = snap(roi, head, BodyEnd::Head, config.snap_tolerance_px)?;
            let tail = snap(roi, tail, BodyEnd::Tail, config.snap_tolerance_px)?;
            Endpoints::new(head, tail)
        }
        EndpointMode::Manual { head, tail } => {
            check_on_boundary(roi, head, BodyEnd::Head, config.manual_tolerance_px)?;
            check_on_boundary(roi, tail, BodyEnd::Tail, config.manual_tolerance_px)?;
            Endpoints::new(head, tail)
        }
    }
}

fn snap(roi: &Roi, hint: Point, end: BodyEnd, tolerance: f64) -> Result<Point, GeometryError> {
    if !geometry::is_finite(hint) {
        return Err(GeometryError::InvalidEndpoint(format!("{end} hint is not finite")));
    }
    let pos = roi.project(hint).ok_or(GeometryError::IncompleteFrame("roi"))?;
    if pos.distance > tolerance {
        return Err(GeometryError::SnapOutOfRange {
            end,
            distance: pos.distance,
            tolerance,
        });
    }
    Ok(pos.point)
}

fn check_on_boundary(
    roi: &Roi,
    p: Point,
    end: BodyEnd,
    tolerance: f64,
) -> Result<(), GeometryError> {
    if !geometry::is_finite(p) {
        return Err(GeometryError::InvalidEndpoint(format!("{end} is not finite")));
    }
    let d = roi.distance_to_boundary(p);
    if d > tolerance {
        return Err(GeometryError::InvalidEndpoint(format!(
            "{end} at ({:.1}, {:.1}) is {d:.2} px from the ROI boundary (tolerance {tolerance:.2} px)",
            p[0], p[1]
        )));
    }
    Ok(())
}
