use nalgebra::{Point3, Vector3};

use crate::misc::FloatingPoint;
use crate::surface::ParametricSurface;

/// Tensor-product Bezier patch defined by a rectangular control net.
/// `control_points[i][j]` is the control point at `u` index `i`, `v` index `j`,
/// so the patch degrees are `rows - 1` in `u` and `cols - 1` in `v`.
/// The domain is the open unit square; neither axis wraps.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezierSurface<T: FloatingPoint> {
    control_points: Vec<Vec<Point3<T>>>,
}

impl<T: FloatingPoint> BezierSurface<T> {
    /// Create a patch from a rectangular control net.
    /// Fails if the net is smaller than 2×2 or its rows are ragged.
    pub fn try_new(control_points: Vec<Vec<Point3<T>>>) -> anyhow::Result<Self> {
        if control_points.len() < 2 {
            anyhow::bail!("bezier surface requires at least 2 control point rows");
        }
        let cols = control_points[0].len();
        if cols < 2 {
            anyhow::bail!("bezier surface requires at least 2 control point columns");
        }
        if control_points.iter().any(|row| row.len() != cols) {
            anyhow::bail!("bezier surface control net must be rectangular");
        }
        Ok(Self { control_points })
    }

    /// Flat quad patch interpolating four corners bilinearly.
    /// `p00` maps to `(0,0)`, `p10` to `(1,0)`, `p01` to `(0,1)`, `p11` to `(1,1)`.
    pub fn bilinear(p00: Point3<T>, p10: Point3<T>, p01: Point3<T>, p11: Point3<T>) -> Self {
        Self {
            control_points: vec![vec![p00, p01], vec![p10, p11]],
        }
    }

    pub fn u_degree(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn v_degree(&self) -> usize {
        self.control_points[0].len() - 1
    }

    pub fn control_points(&self) -> &Vec<Vec<Point3<T>>> {
        &self.control_points
    }

    /// Evaluate the net at `(u, v)`, reducing columns in `u` first.
    fn de_casteljau(&self, u: T, v: T) -> Vector3<T> {
        let cols = self.v_degree() + 1;
        let mut isoline = Vec::with_capacity(cols);
        for j in 0..cols {
            let column: Vec<_> = self
                .control_points
                .iter()
                .map(|row| row[j].coords)
                .collect();
            isoline.push(de_casteljau_1d(column, u));
        }
        de_casteljau_1d(isoline, v)
    }
}

/// Repeated linear interpolation of a single control polygon.
fn de_casteljau_1d<T: FloatingPoint>(mut points: Vec<Vector3<T>>, t: T) -> Vector3<T> {
    let mut n = points.len();
    while n > 1 {
        for i in 0..n - 1 {
            points[i] = points[i].lerp(&points[i + 1], t);
        }
        n -= 1;
    }
    points[0]
}

impl<T: FloatingPoint> ParametricSurface<T> for BezierSurface<T> {
    fn point_at(&self, u: T, v: T) -> Point3<T> {
        Point3::from(self.de_casteljau(u, v))
    }

    fn u_derivative_at(&self, u: T, v: T) -> Vector3<T> {
        // The derivative patch is the scaled difference net of one lower degree in u.
        let degree = T::from_usize(self.u_degree()).unwrap();
        let rows = self.control_points.len();
        let cols = self.v_degree() + 1;
        let mut isoline = Vec::with_capacity(cols);
        for j in 0..cols {
            let diffs: Vec<_> = (0..rows - 1)
                .map(|i| {
                    (self.control_points[i + 1][j].coords - self.control_points[i][j].coords)
                        * degree
                })
                .collect();
            isoline.push(de_casteljau_1d(diffs, u));
        }
        de_casteljau_1d(isoline, v)
    }

    fn v_derivative_at(&self, u: T, v: T) -> Vector3<T> {
        let degree = T::from_usize(self.v_degree()).unwrap();
        let cols = self.v_degree() + 1;
        let mut isoline = Vec::with_capacity(cols - 1);
        for j in 0..cols - 1 {
            let diffs: Vec<_> = self
                .control_points
                .iter()
                .map(|row| (row[j + 1].coords - row[j].coords) * degree)
                .collect();
            isoline.push(de_casteljau_1d(diffs, u));
        }
        de_casteljau_1d(isoline, v)
    }

    fn u_closed(&self) -> bool {
        false
    }

    fn v_closed(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use super::*;

    fn saddle() -> BezierSurface<f64> {
        BezierSurface::try_new(vec![
            vec![Point3::new(0., 0., 0.), Point3::new(0., 1., 1.)],
            vec![Point3::new(1., 0., 1.), Point3::new(1., 1., 0.)],
        ])
        .unwrap()
    }

    #[test]
    fn rejects_degenerate_nets() {
        assert!(BezierSurface::try_new(vec![vec![Point3::<f64>::origin()]]).is_err());
        assert!(BezierSurface::try_new(vec![
            vec![Point3::<f64>::origin(), Point3::new(1., 0., 0.)],
            vec![Point3::new(0., 1., 0.)],
        ])
        .is_err());
    }

    #[test]
    fn bilinear_patch_interpolates_corners_and_center() {
        let patch = BezierSurface::bilinear(
            Point3::new(-1., -1., 0.),
            Point3::new(1., -1., 0.),
            Point3::new(-1., 1., 0.),
            Point3::new(1., 1., 0.),
        );
        assert_relative_eq!(patch.point_at(0., 0.), Point3::new(-1., -1., 0.));
        assert_relative_eq!(patch.point_at(1., 1.), Point3::new(1., 1., 0.));
        assert_relative_eq!(patch.point_at(0.5, 0.5), Point3::new(0., 0., 0.));
        assert!(!patch.u_closed());
        assert!(!patch.v_closed());
    }

    #[test]
    fn saddle_center_lies_between_the_corner_heights() {
        let patch = saddle();
        assert_relative_eq!(patch.point_at(0.5, 0.5).z, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let patch = BezierSurface::try_new(vec![
            vec![Point3::new(0., 0., 0.), Point3::new(0., 1., 0.5), Point3::new(0., 2., 0.)],
            vec![Point3::new(1., 0., 1.), Point3::new(1., 1., -1.), Point3::new(1., 2., 1.)],
            vec![Point3::new(2., 0., 0.), Point3::new(2., 1., 0.5), Point3::new(2., 2., 0.)],
        ])
        .unwrap();
        let h = 1e-6;
        for &(u, v) in &[(0.2, 0.3), (0.5, 0.5), (0.9, 0.1)] {
            let du = (patch.point_at(u + h, v) - patch.point_at(u - h, v)) / (2. * h);
            let dv = (patch.point_at(u, v + h) - patch.point_at(u, v - h)) / (2. * h);
            assert_relative_eq!(patch.u_derivative_at(u, v), du, epsilon = 1e-4);
            assert_relative_eq!(patch.v_derivative_at(u, v), dv, epsilon = 1e-4);
        }
    }
}
