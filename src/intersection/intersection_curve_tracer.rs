use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};

use crate::misc::FloatingPoint;
use crate::surface::ParametricSurface;

use super::{SurfaceIntersectionSolverOptions, SurfacePointPair};

/// Result of tracing the intersection manifold from one refined point pair.
#[derive(Debug)]
pub struct TraceResult<T: FloatingPoint> {
    /// Ordered point pairs along the curve, one fixed arc-length step apart.
    pub points: Vec<SurfacePointPair<T>>,
    /// Whether the trace returned to its starting point and was closed.
    pub closed: bool,
    /// Whether either direction left a surface domain.
    pub hit_boundary: bool,
}

/// Marches along the 1D intersection manifold of two surfaces from a refined
/// starting point pair, advancing by a fixed arc-length step per accepted
/// Newton solve, in both directions.
///
/// Each step solves a 4×4 system for `(u0, v0, u1, v1)`: three coincidence
/// equations between the surface positions and one arc-length constraint
/// along the tangent of the segment start. A direction ends when the
/// manifold leaves a non-wrapped domain axis, the per-step Newton fails to
/// converge, the point budget runs out, or the forward pass closes a loop.
pub struct IntersectionCurveTracer<'a, T: FloatingPoint> {
    a: &'a dyn ParametricSurface<T>,
    b: &'a dyn ParametricSurface<T>,
    options: SurfaceIntersectionSolverOptions<T>,
}

impl<'a, T: FloatingPoint> IntersectionCurveTracer<'a, T> {
    pub fn new(
        a: &'a dyn ParametricSurface<T>,
        b: &'a dyn ParametricSurface<T>,
        options: SurfaceIntersectionSolverOptions<T>,
    ) -> Self {
        Self { a, b, options }
    }

    /// Trace in both directions from `seed` and combine the results.
    /// The backward pass is skipped when the forward pass already closed a
    /// loop; otherwise it is reversed, its duplicated seed dropped, and
    /// prepended to the forward sequence.
    pub fn trace(&self, seed: SurfacePointPair<T>) -> TraceResult<T> {
        let (fwd, closed, hit_f) = self.trace_direction(seed, T::one(), true);

        if closed {
            #[cfg(feature = "log")]
            log::debug!("forward pass closed a loop after {} points", fwd.len());
            return TraceResult {
                points: fwd,
                closed: true,
                hit_boundary: hit_f,
            };
        }

        let (mut bwd, _, hit_b) = self.trace_direction(seed, -T::one(), false);
        bwd.reverse();
        bwd.pop(); // drop the duplicated seed

        let mut points = bwd;
        points.extend(fwd);
        points.dedup_by(|x, y| {
            (x.a() - y.a()).amax() < T::from_f64(1e-12).unwrap()
                && (x.b() - y.b()).amax() < T::from_f64(1e-12).unwrap()
        });

        TraceResult {
            points,
            closed: false,
            hit_boundary: hit_f || hit_b,
        }
    }

    /// March in one direction. Returns the traced points, whether the trace
    /// closed into a loop, and whether it left a surface domain.
    fn trace_direction(
        &self,
        seed: SurfacePointPair<T>,
        sign: T,
        close_on_loop: bool,
    ) -> (Vec<SurfacePointPair<T>>, bool, bool) {
        let mut points = Vec::with_capacity(64);
        points.push(seed);

        let first_position = self.a.point_at(seed.a().x, seed.a().y);
        let closure_distance =
            T::from_f64(1.5).unwrap() * self.options.step_size;

        let mut current = seed;
        let mut current_position = first_position;
        let mut previous_position: Option<Point3<T>> = None;

        while points.len() < self.options.max_points {
            let tangent = match self.tangent_at(&current) {
                Some(t) => t,
                // Parallel surface normals leave the marching direction
                // undefined.
                None => break,
            };
            let tangent = match previous_position {
                None => tangent * sign,
                Some(prev) => {
                    // Keep the march pointing away from where it came from.
                    if tangent.dot(&(current_position - prev)) < T::zero() {
                        -tangent
                    } else {
                        tangent
                    }
                }
            };

            let next = match self.newton_step(&current, &current_position, &tangent) {
                Some(pair) => self.wrap_pair(pair),
                None => break,
            };
            let next_position = self.a.point_at(next.a().x, next.a().y);

            if close_on_loop
                && points.len() > self.options.closure_min_steps
                && (next_position - first_position).norm() < closure_distance
            {
                points.push(points[0]);
                return (points, true, false);
            }

            points.push(next);

            if self.left_domain(&next) {
                return (points, false, true);
            }

            previous_position = Some(current_position);
            current = next;
            current_position = next_position;
        }

        (points, false, false)
    }

    /// Tangent of the intersection curve: the cross product of the two
    /// surface normals, normalized. `None` when the normals are parallel.
    fn tangent_at(&self, pair: &SurfacePointPair<T>) -> Option<Vector3<T>> {
        let n0 = self.a.normal_at(pair.a().x, pair.a().y);
        let n1 = self.b.normal_at(pair.b().x, pair.b().y);
        let tangent = n0.cross(&n1);
        let norm = tangent.norm();
        if norm < T::default_epsilon() {
            None
        } else {
            Some(tangent / norm)
        }
    }

    /// One constrained Newton solve: find the point pair coincident on both
    /// surfaces and exactly one arc-length step along `tangent` from
    /// `start_position`. `None` if the iteration fails to converge.
    fn newton_step(
        &self,
        start: &SurfacePointPair<T>,
        start_position: &Point3<T>,
        tangent: &Vector3<T>,
    ) -> Option<SurfacePointPair<T>> {
        let mut x = Vector4::new(start.a().x, start.a().y, start.b().x, start.b().y);

        for _ in 0..self.options.newton_max_iters {
            let p0 = self.a.point_at(x[0], x[1]);
            let p1 = self.b.point_at(x[2], x[3]);
            let residual = Vector4::new(
                p0.x - p1.x,
                p0.y - p1.y,
                p0.z - p1.z,
                tangent.dot(&(p0 - start_position)) - self.options.step_size,
            );

            if residual.norm_squared() < self.options.newton_tolerance {
                return Some(SurfacePointPair::new(
                    Vector2::new(x[0], x[1]),
                    Vector2::new(x[2], x[3]),
                ));
            }

            let du0 = self.a.u_derivative_at(x[0], x[1]);
            let dv0 = self.a.v_derivative_at(x[0], x[1]);
            let du1 = self.b.u_derivative_at(x[2], x[3]);
            let dv1 = self.b.v_derivative_at(x[2], x[3]);

            #[rustfmt::skip]
            let jacobian = Matrix4::new(
                du0.x, dv0.x, -du1.x, -dv1.x,
                du0.y, dv0.y, -du1.y, -dv1.y,
                du0.z, dv0.z, -du1.z, -dv1.z,
                tangent.dot(&du0), tangent.dot(&dv0), T::zero(), T::zero(),
            );

            let delta = jacobian.lu().solve(&residual)?;
            x -= delta;
        }

        None
    }

    /// Renormalize wrapped parameter axes into the unit interval.
    fn wrap_pair(&self, pair: SurfacePointPair<T>) -> SurfacePointPair<T> {
        let a = wrap_axes(*pair.a(), self.a.u_closed(), self.a.v_closed());
        let b = wrap_axes(*pair.b(), self.b.u_closed(), self.b.v_closed());
        SurfacePointPair::new(a, b)
    }

    /// Whether the pair fell outside the unit square on a non-wrapped axis
    /// of either surface.
    fn left_domain(&self, pair: &SurfacePointPair<T>) -> bool {
        outside_axis(pair.a().x, self.a.u_closed())
            || outside_axis(pair.a().y, self.a.v_closed())
            || outside_axis(pair.b().x, self.b.u_closed())
            || outside_axis(pair.b().y, self.b.v_closed())
    }
}

fn wrap_axes<T: FloatingPoint>(mut param: Vector2<T>, u_closed: bool, v_closed: bool) -> Vector2<T> {
    if u_closed {
        let floor_x = param.x.floor();
        param.x -= floor_x;
    }
    if v_closed {
        let floor_y = param.y.floor();
        param.y -= floor_y;
    }
    param
}

fn outside_axis<T: FloatingPoint>(value: T, closed: bool) -> bool {
    !closed && (value < T::zero() || value > T::one())
}
