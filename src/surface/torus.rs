use nalgebra::{Point3, Vector3};

use crate::misc::FloatingPoint;
use crate::surface::ParametricSurface;

/// Torus around the z axis through `center`.
/// `u` runs around the main axis, `v` around the tube; both axes wrap.
/// A minor radius larger than the major radius gives a spindle torus whose
/// tube passes through the axis.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Torus<T: FloatingPoint> {
    center: Point3<T>,
    major_radius: T,
    minor_radius: T,
}

impl<T: FloatingPoint> Torus<T> {
    pub fn new(center: Point3<T>, major_radius: T, minor_radius: T) -> Self {
        Self {
            center,
            major_radius,
            minor_radius,
        }
    }

    pub fn center(&self) -> &Point3<T> {
        &self.center
    }

    pub fn major_radius(&self) -> T {
        self.major_radius
    }

    pub fn minor_radius(&self) -> T {
        self.minor_radius
    }
}

impl<T: FloatingPoint> ParametricSurface<T> for Torus<T> {
    fn point_at(&self, u: T, v: T) -> Point3<T> {
        let tau = T::two_pi();
        let (su, cu) = (tau * u).sin_cos();
        let (sv, cv) = (tau * v).sin_cos();
        let ring = self.major_radius + self.minor_radius * cv;
        self.center + Vector3::new(ring * cu, ring * su, self.minor_radius * sv)
    }

    fn u_derivative_at(&self, u: T, v: T) -> Vector3<T> {
        let tau = T::two_pi();
        let (su, cu) = (tau * u).sin_cos();
        let cv = (tau * v).cos();
        let ring = self.major_radius + self.minor_radius * cv;
        Vector3::new(-ring * su, ring * cu, T::zero()) * tau
    }

    fn v_derivative_at(&self, u: T, v: T) -> Vector3<T> {
        let tau = T::two_pi();
        let (su, cu) = (tau * u).sin_cos();
        let (sv, cv) = (tau * v).sin_cos();
        let r = self.minor_radius;
        Vector3::new(-r * sv * cu, -r * sv * su, r * cv) * tau
    }

    fn u_closed(&self) -> bool {
        true
    }

    fn v_closed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    use super::*;

    #[test]
    fn point_at_known_locations() {
        let torus = Torus::new(Point3::origin(), 2., 0.5);
        assert_relative_eq!(torus.point_at(0., 0.), Point3::new(2.5, 0., 0.), epsilon = 1e-12);
        assert_relative_eq!(torus.point_at(0.25, 0.), Point3::new(0., 2.5, 0.), epsilon = 1e-12);
        assert_relative_eq!(torus.point_at(0., 0.5), Point3::new(1.5, 0., 0.), epsilon = 1e-12);
        assert_relative_eq!(
            torus.point_at(0., 0.25),
            Point3::new(2., 0., 0.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn wraps_in_both_directions() {
        let torus = Torus::new(Point3::new(1., -2., 3.), 1.5, 0.25);
        assert_relative_eq!(torus.point_at(0., 0.3), torus.point_at(1., 0.3), epsilon = 1e-12);
        assert_relative_eq!(torus.point_at(0.7, 0.), torus.point_at(0.7, 1.), epsilon = 1e-12);
        assert!(torus.u_closed());
        assert!(torus.v_closed());
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let torus = Torus::new(Point3::origin(), 2., 0.75);
        let h = 1e-6;
        for &(u, v) in &[(0.1, 0.2), (0.5, 0.9), (0.825, 0.4)] {
            let du = (torus.point_at(u + h, v) - torus.point_at(u - h, v)) / (2. * h);
            let dv = (torus.point_at(u, v + h) - torus.point_at(u, v - h)) / (2. * h);
            assert_relative_eq!(torus.u_derivative_at(u, v), du, epsilon = 1e-4);
            assert_relative_eq!(torus.v_derivative_at(u, v), dv, epsilon = 1e-4);
        }
    }

    #[test]
    fn normal_points_outward_on_the_outer_equator() {
        let torus = Torus::<f64>::new(Point3::origin(), 2., 0.5);
        let n = torus.normal_at(0., 0.);
        assert!(n.normalize().dot(&Vector3::x()) > 0.99);
    }
}
