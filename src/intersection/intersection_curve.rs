use nalgebra::Point3;

use crate::misc::FloatingPoint;
use crate::surface::ParametricSurface;

use super::SurfacePointPair;

/// An ordered sequence of point pairs along a surface-surface intersection,
/// spaced one arc-length step apart. The sequence stores parameter pairs, not
/// baked 3D positions, so positions can be re-derived from either surface on
/// demand; if a surface's control points move the curve must be re-traced.
///
/// A closed curve repeats its first point pair as its last.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionCurve<T: FloatingPoint> {
    points: Vec<SurfacePointPair<T>>,
    closed: bool,
    /// Mean of the sampled 3D positions, kept for placement purposes.
    centroid: Point3<T>,
}

impl<T: FloatingPoint> IntersectionCurve<T> {
    /// Wrap a traced point sequence, deriving the centroid from the first
    /// surface's positions.
    pub fn new(
        points: Vec<SurfacePointPair<T>>,
        closed: bool,
        surface: &dyn ParametricSurface<T>,
    ) -> Self {
        let mut centroid = Point3::origin();
        if !points.is_empty() {
            for pair in points.iter() {
                centroid += surface.point_at(pair.a().x, pair.a().y).coords;
            }
            centroid /= T::from_usize(points.len()).unwrap();
        }
        Self {
            points,
            closed,
            centroid,
        }
    }

    pub fn points(&self) -> &[SurfacePointPair<T>] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn centroid(&self) -> &Point3<T> {
        &self.centroid
    }

    /// Positions along the curve evaluated through the first surface.
    pub fn points_on_a(&self, surface: &dyn ParametricSurface<T>) -> Vec<Point3<T>> {
        self.points
            .iter()
            .map(|pair| surface.point_at(pair.a().x, pair.a().y))
            .collect()
    }

    /// Positions along the curve evaluated through the second surface.
    pub fn points_on_b(&self, surface: &dyn ParametricSurface<T>) -> Vec<Point3<T>> {
        self.points
            .iter()
            .map(|pair| surface.point_at(pair.b().x, pair.b().y))
            .collect()
    }
}
