use argmin::core::{ArgminFloat, Executor, State};
use nalgebra::{Point3, Vector2, Vector4};

use crate::misc::FloatingPoint;
use crate::surface::ParametricSurface;

use super::{
    ClosestSampleSearch, IntersectionCurve, IntersectionCurveTracer,
    SurfaceIntersectionGradientDescent, SurfaceIntersectionProblem,
    SurfaceIntersectionSolverOptions, SurfacePointPair,
};

/// Entry point for tracing the intersection curve of two parametric surfaces.
///
/// Seeds a starting point by closest-sample search (optionally biased toward
/// a 3D reference point, which also disambiguates between intersection
/// branches), refines it by gradient descent, and marches the intersection
/// manifold in both directions. Passing the same surface for both sides
/// switches the search into self-intersection mode.
pub struct IntersectionCurveBuilder<'a, T: FloatingPoint> {
    a: &'a dyn ParametricSurface<T>,
    b: &'a dyn ParametricSurface<T>,
    reference_point: Option<Point3<T>>,
    options: SurfaceIntersectionSolverOptions<T>,
}

impl<'a, T: FloatingPoint + ArgminFloat> IntersectionCurveBuilder<'a, T> {
    pub fn new(a: &'a dyn ParametricSurface<T>, b: &'a dyn ParametricSurface<T>) -> Self {
        Self {
            a,
            b,
            reference_point: None,
            options: SurfaceIntersectionSolverOptions::default(),
        }
    }

    /// Bias the starting-point search toward a 3D position, e.g. a cursor.
    pub fn with_reference_point(mut self, reference_point: Point3<T>) -> Self {
        self.reference_point = Some(reference_point);
        self
    }

    pub fn with_options(mut self, options: SurfaceIntersectionSolverOptions<T>) -> Self {
        self.options = options;
        self
    }

    /// Trace the intersection curve.
    ///
    /// Returns `Ok(None)` when the starting-point refinement does not
    /// converge near the seed, i.e. no intersection was found there. All
    /// other failure modes only truncate the traced curve.
    pub fn build(&self) -> anyhow::Result<Option<IntersectionCurve<T>>> {
        let search = ClosestSampleSearch::new(self.a, self.b, self.options.sample_resolution);
        let seed = search.find_seed(self.reference_point.as_ref());

        let refined = match self.refine(&seed)? {
            Some(pair) => pair,
            None => {
                #[cfg(feature = "log")]
                log::debug!("starting point refinement did not converge, no intersection");
                return Ok(None);
            }
        };

        let tracer = IntersectionCurveTracer::new(self.a, self.b, self.options.clone());
        let traced = tracer.trace(refined);

        Ok(Some(IntersectionCurve::new(
            traced.points,
            traced.closed,
            self.a,
        )))
    }

    /// Gradient descent from the sampled seed onto the true intersection.
    /// `None` when the squared distance between the two surface positions
    /// does not reach the tolerance within the iteration budget.
    fn refine(&self, seed: &SurfacePointPair<T>) -> anyhow::Result<Option<SurfacePointPair<T>>> {
        let problem = SurfaceIntersectionProblem::new(self.a, self.b);
        let solver = SurfaceIntersectionGradientDescent::new()
            .with_step_size(self.options.descent_step_size)
            .with_step_decay(self.options.descent_step_decay)
            .with_cost_tolerance(self.options.descent_tolerance);

        let init_param = Vector4::new(seed.a().x, seed.a().y, seed.b().x, seed.b().y);
        let max_iters = self.options.descent_max_iters;

        let res = Executor::new(problem, solver)
            .configure(|state| state.param(init_param).max_iters(max_iters))
            .run()?;

        let state = res.state();
        let converged = state.get_best_cost() < self.options.descent_tolerance;
        let refined = state.get_best_param().filter(|_| converged).map(|param| {
            SurfacePointPair::new(
                Vector2::new(param[0], param[1]),
                Vector2::new(param[2], param[3]),
            )
        });

        Ok(refined)
    }
}
