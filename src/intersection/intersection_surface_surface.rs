use argmin::core::ArgminFloat;

use crate::misc::FloatingPoint;
use crate::surface::{BezierSurface, ParametricSurface, Torus};

use super::{
    IntersectionCurve, IntersectionCurveBuilder, Intersects, SurfaceIntersectionSolverOptions,
};

impl<'a, T, S> Intersects<'a, &'a S> for Torus<T>
where
    T: FloatingPoint + ArgminFloat,
    S: ParametricSurface<T>,
{
    type Output = anyhow::Result<Option<IntersectionCurve<T>>>;
    type Option = Option<SurfaceIntersectionSolverOptions<T>>;

    /// Trace the intersection curve with another surface.
    /// * `other` - The other surface to intersect with
    /// * `option` - Hyperparameters for the intersection solver
    /// # Example
    /// ```
    /// use intersurf::prelude::*;
    /// use nalgebra::Point3;
    /// let torus = Torus::new(Point3::origin(), 2., 0.5);
    /// let plane = BezierSurface::bilinear(
    ///     Point3::new(-4., -4., 0.),
    ///     Point3::new(4., -4., 0.),
    ///     Point3::new(-4., 4., 0.),
    ///     Point3::new(4., 4., 0.),
    /// );
    ///
    /// // The z = 0 midplane cuts the torus in two circles; the tracer
    /// // follows the one found by the closest-sample search until it closes.
    /// let curve = torus
    ///     .find_intersection_curve(&plane, None)
    ///     .unwrap()
    ///     .expect("the midplane cuts the torus");
    /// assert!(curve.is_closed());
    /// assert_eq!(curve.points().first(), curve.points().last());
    /// ```
    fn find_intersection_curve(&'a self, other: &'a S, option: Self::Option) -> Self::Output {
        IntersectionCurveBuilder::new(self, other)
            .with_options(option.unwrap_or_default())
            .build()
    }
}

impl<'a, T, S> Intersects<'a, &'a S> for BezierSurface<T>
where
    T: FloatingPoint + ArgminFloat,
    S: ParametricSurface<T>,
{
    type Output = anyhow::Result<Option<IntersectionCurve<T>>>;
    type Option = Option<SurfaceIntersectionSolverOptions<T>>;

    /// Trace the intersection curve with another surface.
    /// * `other` - The other surface to intersect with
    /// * `option` - Hyperparameters for the intersection solver
    fn find_intersection_curve(&'a self, other: &'a S, option: Self::Option) -> Self::Output {
        IntersectionCurveBuilder::new(self, other)
            .with_options(option.unwrap_or_default())
            .build()
    }
}
