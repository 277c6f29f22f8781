use argmin::core::{CostFunction, Gradient};
use nalgebra::Vector4;

use crate::misc::FloatingPoint;
use crate::surface::ParametricSurface;

/// Squared distance between two surface positions as a function of the
/// stacked parameter vector `(u0, v0, u1, v1)`.
/// The parameters are not clamped to the unit square: only convergence to
/// the distance tolerance matters while refining a seed, so the descent may
/// wander outside the domain.
pub struct SurfaceIntersectionProblem<'a, T: FloatingPoint> {
    a: &'a dyn ParametricSurface<T>,
    b: &'a dyn ParametricSurface<T>,
}

impl<'a, T: FloatingPoint> SurfaceIntersectionProblem<'a, T> {
    pub fn new(a: &'a dyn ParametricSurface<T>, b: &'a dyn ParametricSurface<T>) -> Self {
        Self { a, b }
    }
}

impl<T: FloatingPoint> CostFunction for SurfaceIntersectionProblem<'_, T> {
    type Param = Vector4<T>;
    type Output = T;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, anyhow::Error> {
        let p0 = self.a.point_at(param[0], param[1]);
        let p1 = self.b.point_at(param[2], param[3]);
        Ok((p0 - p1).norm_squared())
    }
}

impl<T: FloatingPoint> Gradient for SurfaceIntersectionProblem<'_, T> {
    type Param = Vector4<T>;
    type Gradient = Vector4<T>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, anyhow::Error> {
        let diff = self.a.point_at(param[0], param[1]) - self.b.point_at(param[2], param[3]);
        let du0 = self.a.u_derivative_at(param[0], param[1]);
        let dv0 = self.a.v_derivative_at(param[0], param[1]);
        let du1 = self.b.u_derivative_at(param[2], param[3]);
        let dv1 = self.b.v_derivative_at(param[2], param[3]);
        Ok(Vector4::new(
            du0.dot(&diff),
            dv0.dot(&diff),
            -du1.dot(&diff),
            -dv1.dot(&diff),
        ) * T::from_f64(2.0).unwrap())
    }
}
