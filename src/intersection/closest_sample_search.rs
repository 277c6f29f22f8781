use itertools::Itertools;
use nalgebra::{Point3, Vector2};

use crate::misc::FloatingPoint;
use crate::surface::ParametricSurface;

use super::SurfacePointPair;

/// Brute-force grid search over the parameter domains of one or two surfaces,
/// producing a plausible starting point pair without any derivative
/// information. The worst case is a poor seed that the refinement pass
/// rejects; the search itself cannot fail.
pub struct ClosestSampleSearch<'a, T: FloatingPoint> {
    a: &'a dyn ParametricSurface<T>,
    b: &'a dyn ParametricSurface<T>,
    resolution: usize,
}

impl<'a, T: FloatingPoint> ClosestSampleSearch<'a, T> {
    pub fn new(
        a: &'a dyn ParametricSurface<T>,
        b: &'a dyn ParametricSurface<T>,
        resolution: usize,
    ) -> Self {
        Self { a, b, resolution }
    }

    /// Find a starting point pair, optionally biased toward `reference`.
    /// When both handles refer to the same surface the search switches to
    /// self-intersection mode, which rejects trivially coincident samples.
    pub fn find_seed(&self, reference: Option<&Point3<T>>) -> SurfacePointPair<T> {
        if std::ptr::addr_eq(self.a, self.b) {
            self.find_self_seed(reference)
        } else {
            self.find_pair_seed(reference)
        }
    }

    fn find_pair_seed(&self, reference: Option<&Point3<T>>) -> SurfacePointPair<T> {
        let grid_a = self.sample_grid(self.a);
        let grid_b = self.sample_grid(self.b);

        match reference {
            Some(point) => {
                // Each surface is searched independently for the sample
                // closest to the reference position.
                let pa = closest_to(&grid_a, point);
                let pb = closest_to(&grid_b, point);
                SurfacePointPair::new(pa, pb)
            }
            None => {
                let closest = grid_a
                    .iter()
                    .cartesian_product(grid_b.iter())
                    .min_by(|x, y| {
                        let dx = (x.0 .1 - x.1 .1).norm_squared();
                        let dy = (y.0 .1 - y.1 .1).norm_squared();
                        dx.partial_cmp(&dy).unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .map(|(pa, pb)| SurfacePointPair::new(pa.0, pb.0));
                // The grid is never empty for a positive resolution.
                closest.unwrap_or_else(|| {
                    SurfacePointPair::new(Vector2::zeros(), Vector2::zeros())
                })
            }
        }
    }

    fn find_self_seed(&self, reference: Option<&Point3<T>>) -> SurfacePointPair<T> {
        let grid = self.sample_grid(self.a);

        match reference {
            Some(point) => {
                // The two closest-but-distinct samples to the reference.
                let first = grid
                    .iter()
                    .position_min_by(|x, y| {
                        let dx = (x.1 - point).norm_squared();
                        let dy = (y.1 - point).norm_squared();
                        dx.partial_cmp(&dy).unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .unwrap_or(0);
                let second = grid
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != first)
                    .min_by(|(_, x), (_, y)| {
                        let dx = (x.1 - point).norm_squared();
                        let dy = (y.1 - point).norm_squared();
                        dx.partial_cmp(&dy).unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .map(|(i, _)| i)
                    .unwrap_or(first);
                SurfacePointPair::new(grid[first].0, grid[second].0)
            }
            None => {
                // Trivially adjacent samples always have near-zero 3D
                // distance, so pairs whose parameter-space images are close
                // are penalized out of the running.
                let best = grid
                    .iter()
                    .enumerate()
                    .cartesian_product(grid.iter().enumerate())
                    .filter(|((i, _), (j, _))| i != j)
                    .min_by(|x, y| {
                        let sx = self.self_score(x.0 .1, x.1 .1);
                        let sy = self.self_score(y.0 .1, y.1 .1);
                        sx.partial_cmp(&sy).unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .map(|((_, p0), (_, p1))| SurfacePointPair::new(p0.0, p1.0));
                best.unwrap_or_else(|| {
                    SurfacePointPair::new(Vector2::zeros(), Vector2::zeros())
                })
            }
        }
    }

    /// 3D proximity minus the periodic parameter-space proximity of the pair.
    fn self_score(&self, p0: &(Vector2<T>, Point3<T>), p1: &(Vector2<T>, Point3<T>)) -> T {
        (p0.1 - p1.1).norm_squared() - self.parameter_distance_squared(&p0.0, &p1.0)
    }

    /// Squared parameter-space distance, taken over the periodic images of
    /// the second pair on wrapped axes.
    fn parameter_distance_squared(&self, p0: &Vector2<T>, p1: &Vector2<T>) -> T {
        let du = axis_distance(p0.x, p1.x, self.a.u_closed());
        let dv = axis_distance(p0.y, p1.y, self.a.v_closed());
        du * du + dv * dv
    }

    /// Sample the unit square on a fixed-resolution grid, dropping the seam
    /// sample on a wrapped axis.
    fn sample_grid(&self, surface: &dyn ParametricSurface<T>) -> Vec<(Vector2<T>, Point3<T>)> {
        let us = sample_axis::<T>(self.resolution, surface.u_closed());
        let vs = sample_axis::<T>(self.resolution, surface.v_closed());
        us.iter()
            .cartesian_product(vs.iter())
            .map(|(&u, &v)| (Vector2::new(u, v), surface.point_at(u, v)))
            .collect_vec()
    }
}

fn closest_to<T: FloatingPoint>(grid: &[(Vector2<T>, Point3<T>)], point: &Point3<T>) -> Vector2<T> {
    grid.iter()
        .min_by(|x, y| {
            let dx = (x.1 - point).norm_squared();
            let dy = (y.1 - point).norm_squared();
            dx.partial_cmp(&dy).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(param, _)| *param)
        .unwrap_or_else(Vector2::zeros)
}

fn axis_distance<T: FloatingPoint>(x0: T, x1: T, closed: bool) -> T {
    let d = (x0 - x1).abs();
    if closed {
        d.min(T::one() - d)
    } else {
        d
    }
}

fn sample_axis<T: FloatingPoint>(resolution: usize, closed: bool) -> Vec<T> {
    let last = resolution - 1;
    let count = if closed { last } else { resolution };
    (0..count)
        .map(|i| T::from_usize(i).unwrap() / T::from_usize(last).unwrap())
        .collect()
}
