//! Named landmarks at fixed arc-length fractions.
//!
//! Each internal landmark is placed at the same fraction on the midline and
//! on both side contours. The three points share a fraction; they are not a
//! perpendicular cross-section of the body.

mod proportions;

use crate::error::{ContourKind, GeometryError};
use crate::geometry::{self, Point};
use crate::midline::BodyGeometry;

pub use proportions::SegmentProportions;

/// Fewest points a polyline may have for landmark lookup.
pub const MIN_CONTOUR_POINTS: usize = 10;

/// Anatomical landmark names, head to tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Landmark {
    Head,
    T1,
    T2,
    T3,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    Tail,
}

impl Landmark {
    pub const ALL: [Landmark; 12] = [
        Landmark::Head,
        Landmark::T1,
        Landmark::T2,
        Landmark::T3,
        Landmark::A1,
        Landmark::A2,
        Landmark::A3,
        Landmark::A4,
        Landmark::A5,
        Landmark::A6,
        Landmark::A7,
        Landmark::Tail,
    ];

    /// The 11 adjacent pairs `HEAD-T1 … A7-TAIL`.
    pub const SEGMENT_PAIRS: [(Landmark, Landmark); 11] = [
        (Landmark::Head, Landmark::T1),
        (Landmark::T1, Landmark::T2),
        (Landmark::T2, Landmark::T3),
        (Landmark::T3, Landmark::A1),
        (Landmark::A1, Landmark::A2),
        (Landmark::A2, Landmark::A3),
        (Landmark::A3, Landmark::A4),
        (Landmark::A4, Landmark::A5),
        (Landmark::A5, Landmark::A6),
        (Landmark::A6, Landmark::A7),
        (Landmark::A7, Landmark::Tail),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Landmark::Head => "HEAD",
            Landmark::T1 => "T1",
            Landmark::T2 => "T2",
            Landmark::T3 => "T3",
            Landmark::A1 => "A1",
            Landmark::A2 => "A2",
            Landmark::A3 => "A3",
            Landmark::A4 => "A4",
            Landmark::A5 => "A5",
            Landmark::A6 => "A6",
            Landmark::A7 => "A7",
            Landmark::Tail => "TAIL",
        }
    }

    pub fn is_internal(self) -> bool {
        !matches!(self, Landmark::Head | Landmark::Tail)
    }

    /// Position in [`Landmark::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Landmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Left and right contour points sharing an internal landmark's fraction.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SidePoints {
    pub left: Point,
    pub right: Point,
}

/// One placed landmark.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LandmarkPoint {
    pub landmark: Landmark,
    /// Arc-length fraction along each polyline.
    pub fraction: f64,
    pub midline: Point,
    /// Present exactly for internal landmarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<SidePoints>,
}

/// The 12 landmarks of one frame, in head-to-tail order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<LandmarkPoint>", into = "Vec<LandmarkPoint>")]
pub struct LandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl LandmarkSet {
    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn get(&self, landmark: Landmark) -> Option<&LandmarkPoint> {
        self.points.get(landmark.index()).filter(|p| p.landmark == landmark)
    }

    /// Fractions in head-to-tail order.
    pub fn fractions(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.fraction).collect()
    }

    /// Internal landmarks with their side points.
    pub fn internal(&self) -> impl Iterator<Item = (Landmark, SidePoints)> + '_ {
        self.points.iter().filter_map(|p| p.sides.map(|s| (p.landmark, s)))
    }

    /// Names in [`Landmark::ALL`] order (which makes every consecutive pair
    /// one of [`Landmark::SEGMENT_PAIRS`]), fractions running
    /// `0 = HEAD < … < TAIL = 1`, side points on exactly the internal names,
    /// all coordinates finite.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let bad = |msg: String| Err(GeometryError::InconsistentLandmarks(msg));
        if self.points.len() != Landmark::ALL.len() {
            return bad(format!("expected 12 landmarks, got {}", self.points.len()));
        }
        for (p, expected) in self.points.iter().zip(Landmark::ALL) {
            if p.landmark != expected {
                return bad(format!("found {} where {expected} belongs", p.landmark));
            }
            if p.sides.is_some() != expected.is_internal() {
                return bad(format!("{expected} has wrong side points"));
            }
            let finite = geometry::is_finite(p.midline)
                && p.sides
                    .map_or(true, |s| geometry::is_finite(s.left) && geometry::is_finite(s.right));
            if !(finite && p.fraction.is_finite()) {
                return bad(format!("{expected} has non-finite coordinates"));
            }
        }
        let first = self.points[0].fraction;
        let last = self.points[self.points.len() - 1].fraction;
        if first != 0.0 || last != 1.0 {
            return bad(format!("end fractions must be 0 and 1, got {first} and {last}"));
        }
        for (a, b) in Landmark::SEGMENT_PAIRS {
            let (fa, fb) = (self.points[a.index()].fraction, self.points[b.index()].fraction);
            if fb <= fa {
                return bad(format!("fraction of {b} ({fb}) does not exceed {a} ({fa})"));
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<LandmarkPoint>> for LandmarkSet {
    type Error = GeometryError;

    fn try_from(points: Vec<LandmarkPoint>) -> Result<Self, Self::Error> {
        let set = Self { points };
        set.validate()?;
        Ok(set)
    }
}

impl From<LandmarkSet> for Vec<LandmarkPoint> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}

fn require_resolution(
    contour: ContourKind,
    pts: &[Point],
    required: usize,
) -> Result<(), GeometryError> {
    if pts.len() < required {
        return Err(GeometryError::InsufficientResolution {
            contour,
            points: pts.len(),
            required,
        });
    }
    Ok(())
}

/// Place the 12 landmarks on `body` using `proportions`.
///
/// The midline must carry at least [`MIN_CONTOUR_POINTS`] samples. It is
/// built from the side arcs resampled to the same count, so the raw side
/// arcs only need two points each for arc-length lookup.
pub fn place_landmarks(
    body: &BodyGeometry,
    proportions: &SegmentProportions,
) -> Result<LandmarkSet, GeometryError> {
    require_resolution(ContourKind::Midline, body.midline(), MIN_CONTOUR_POINTS)?;
    require_resolution(ContourKind::Left, body.left(), 2)?;
    require_resolution(ContourKind::Right, body.right(), 2)?;

    let mid_cum = geometry::cumulative_lengths(body.midline());
    let left_cum = geometry::cumulative_lengths(body.left());
    let right_cum = geometry::cumulative_lengths(body.right());
    let internal = proportions.fractions();

    let points = Landmark::ALL
        .iter()
        .map(|&landmark| {
            let fraction = match landmark {
                Landmark::Head => 0.0,
                Landmark::Tail => 1.0,
                _ => internal[landmark.index() - 1],
            };
            let sides = landmark.is_internal().then(|| SidePoints {
                left: geometry::point_at_fraction(body.left(), &left_cum, fraction),
                right: geometry::point_at_fraction(body.right(), &right_cum, fraction),
            });
            LandmarkPoint {
                landmark,
                fraction,
                midline: geometry::point_at_fraction(body.midline(), &mid_cum, fraction),
                sides,
            }
        })
        .collect();

    let set = LandmarkSet { points };
    set.validate()?;
    Ok(set)
}
