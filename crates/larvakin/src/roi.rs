//! Region-of-interest polygon enclosing the larva body in one frame.

use crate::error::GeometryError;
use crate::geometry::{self, Point, RingPosition};

/// Closed boundary polygon of the larva in pixel coordinates.
///
/// Construction validates the polygon: at least three distinct vertices,
/// finite coordinates, non-zero area, and no two edges crossing each other.
/// Edges that merely touch (a pinched, self-touching outline) are accepted
/// here; the midline extractor is the stage that rejects them.
///
/// The closing edge is implicit. A trailing vertex equal to the first one is
/// dropped.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Roi {
    points: Vec<Point>,
}

impl Roi {
    /// Validate and build an ROI from boundary vertices.
    pub fn new(points: Vec<Point>) -> Result<Self, GeometryError> {
        let mut points = points;
        if let Some(p) = points.iter().find(|p| !geometry::is_finite(**p)) {
            return Err(GeometryError::InvalidRoi(format!(
                "non-finite vertex ({}, {})",
                p[0], p[1]
            )));
        }
        geometry::dedup_consecutive(&mut points);
        while points.len() > 1
            && geometry::dist(points[0], points[points.len() - 1]) < geometry::COINCIDENT_EPS
        {
            points.pop();
        }
        if points.len() < 3 {
            return Err(GeometryError::InvalidRoi(format!(
                "need at least 3 distinct vertices, got {}",
                points.len()
            )));
        }
        if geometry::signed_area(&points).abs() <= geometry::COINCIDENT_EPS {
            return Err(GeometryError::InvalidRoi("polygon has zero area".to_string()));
        }
        if let Some((i, j)) = first_crossing(&points) {
            return Err(GeometryError::InvalidRoi(format!(
                "edges {i} and {j} cross; polygon is not simple"
            )));
        }
        Ok(Self { points })
    }

    /// Build an ROI and translate it by `offset` in one step.
    pub fn with_offset(points: Vec<Point>, offset: [f64; 2]) -> Result<Self, GeometryError> {
        Ok(Self::new(points)?.translated(offset))
    }

    /// Copy of this ROI shifted by `offset`. Translation preserves validity.
    pub fn translated(&self, offset: [f64; 2]) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| [p[0] + offset[0], p[1] + offset[1]])
                .collect(),
        }
    }

    /// Boundary vertices in the order supplied.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed ROI; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Boundary length including the closing edge.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| geometry::dist(self.points[i], self.points[(i + 1) % n]))
            .sum()
    }

    /// Enclosed area in square pixels.
    pub fn area(&self) -> f64 {
        geometry::signed_area(&self.points).abs()
    }

    /// Whether the supplied vertex order runs clockwise on screen (y down).
    pub fn is_clockwise(&self) -> bool {
        geometry::signed_area(&self.points) > 0.0
    }

    /// Vertices reordered, if needed, to run clockwise on screen.
    pub fn clockwise_points(&self) -> Vec<Point> {
        let mut pts = self.points.clone();
        if !self.is_clockwise() {
            pts.reverse();
        }
        pts
    }

    /// Nearest point on the boundary polyline (edges, not only vertices).
    pub fn nearest_boundary_point(&self, p: Point) -> Point {
        self.project(p).map_or(p, |pos| pos.point)
    }

    /// Euclidean distance from `p` to the boundary polyline.
    pub fn distance_to_boundary(&self, p: Point) -> f64 {
        self.project(p).map_or(f64::INFINITY, |pos| pos.distance)
    }

    pub(crate) fn project(&self, p: Point) -> Option<RingPosition> {
        geometry::project_onto_ring(&self.points, p)
    }
}

impl TryFrom<Vec<Point>> for Roi {
    type Error = GeometryError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Roi> for Vec<Point> {
    fn from(roi: Roi) -> Self {
        roi.points
    }
}

/// First pair of non-adjacent edges that cross properly, if any.
fn first_crossing(ring: &[Point]) -> Option<(usize, usize)> {
    let n = ring.len();
    for i in 0..n {
        let (a0, a1) = (ring[i], ring[(i + 1) % n]);
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b0, b1) = (ring[j], ring[(j + 1) % n]);
            if geometry::segments_cross_properly(a0, a1, b0, b1) {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ellipse_points, figure_eight_points};
    use approx::assert_relative_eq;

    #[test]
    fn rejects_too_few_points_and_closing_duplicate() {
        let err = Roi::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidRoi(_)));

        let roi = Roi::new(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 0.0]]).unwrap();
        assert_eq!(roi.len(), 3);
        assert_relative_eq!(roi.perimeter(), 12.0);
        assert_relative_eq!(roi.area(), 6.0);
    }

    #[test]
    fn rejects_non_finite_and_collinear() {
        assert!(Roi::new(vec![[0.0, 0.0], [f64::NAN, 1.0], [1.0, 1.0]]).is_err());
        assert!(Roi::new(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]).is_err());
    }

    #[test]
    fn rejects_bow_tie() {
        // Lopsided so the signed area is non-zero and the crossing is what fails.
        let err = Roi::new(vec![[0.0, 0.0], [10.0, 10.0], [10.0, 0.0], [0.0, 4.0]]).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidRoi(msg) if msg.contains("cross")));
    }

    #[test]
    fn accepts_self_touching_figure_eight() {
        let roi = Roi::new(figure_eight_points(48)).unwrap();
        assert!(roi.area() > 0.0);
    }

    #[test]
    fn translation_and_boundary_queries() {
        let roi = Roi::new(ellipse_points([100.0, 30.0], 100.0, 30.0, 120)).unwrap();
        let moved = roi.translated([5.0, -2.0]);
        assert_relative_eq!(moved.points()[0][0], roi.points()[0][0] + 5.0);
        assert_relative_eq!(moved.area(), roi.area(), max_relative = 1e-12);

        assert!(roi.distance_to_boundary([0.0, 30.0]) < 1e-9);
        let snapped = roi.nearest_boundary_point([-4.0, 30.0]);
        assert_relative_eq!(snapped[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(snapped[1], 30.0, epsilon = 1e-6);
    }

    #[test]
    fn clockwise_points_are_oriented() {
        let mut pts = ellipse_points([0.0, 0.0], 10.0, 5.0, 32);
        pts.reverse();
        let roi = Roi::new(pts).unwrap();
        let cw = roi.clockwise_points();
        assert!(crate::geometry::signed_area(&cw) > 0.0);
    }

    #[test]
    fn serde_round_trip_validates() {
        let roi = Roi::new(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0]]).unwrap();
        let json = serde_json::to_string(&roi).unwrap();
        let back: Roi = serde_json::from_str(&json).unwrap();
        assert_eq!(back, roi);
        assert!(serde_json::from_str::<Roi>("[[0,0],[1,1]]").is_err());
    }
}
