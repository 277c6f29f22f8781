use nalgebra::{Point3, Vector3};

use crate::misc::FloatingPoint;

/// A 3D surface parameterized over the unit square.
/// Position and both partial derivatives must be defined and continuous over
/// `[0,1]²`, extended periodically on a wrapped axis.
pub trait ParametricSurface<T: FloatingPoint> {
    /// Evaluate the surface position at the given parameters.
    fn point_at(&self, u: T, v: T) -> Point3<T>;

    /// First partial derivative with respect to `u`.
    fn u_derivative_at(&self, u: T, v: T) -> Vector3<T>;

    /// First partial derivative with respect to `v`.
    fn v_derivative_at(&self, u: T, v: T) -> Vector3<T>;

    /// Whether `u = 0` and `u = 1` identify the same points on the surface.
    fn u_closed(&self) -> bool;

    /// Whether `v = 0` and `v = 1` identify the same points on the surface.
    fn v_closed(&self) -> bool;

    /// Surface normal as the cross product of the two partial derivatives.
    /// Not normalized; zero-length at degenerate points, so callers that
    /// divide by its norm must guard against that.
    fn normal_at(&self, u: T, v: T) -> Vector3<T> {
        self.u_derivative_at(u, v).cross(&self.v_derivative_at(u, v))
    }
}
