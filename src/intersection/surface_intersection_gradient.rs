use argmin::{argmin_error_closure, core::*, float};
use nalgebra::Vector4;

use crate::misc::FloatingPoint;

/// Gradient descent refinement of a coarse starting point pair.
/// Pulls both parameter pairs toward each other along the projected surface
/// derivatives until the squared distance between the two positions drops
/// below the cost tolerance. The step size starts small and decays
/// multiplicatively each iteration to avoid oscillation near convergence.
#[derive(Clone, Copy)]
pub struct SurfaceIntersectionGradientDescent<F> {
    /// Current descent step size.
    step_size: F,

    /// Multiplicative decay applied to the step size each iteration.
    step_decay: F,

    /// Tolerance for the cost function to determine convergence.
    cost_tolerance: F,
}

impl<F> Default for SurfaceIntersectionGradientDescent<F>
where
    F: FloatingPoint,
{
    fn default() -> Self {
        Self {
            step_size: float!(1e-4),
            step_decay: float!(0.9999),
            cost_tolerance: float!(1e-6),
        }
    }
}

impl<F> SurfaceIntersectionGradientDescent<F>
where
    F: FloatingPoint,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step_size(mut self, step_size: F) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn with_step_decay(mut self, step_decay: F) -> Self {
        self.step_decay = step_decay;
        self
    }

    pub fn with_cost_tolerance(mut self, cost_tolerance: F) -> Self {
        self.cost_tolerance = cost_tolerance;
        self
    }
}

impl<O, F> Solver<O, IterState<Vector4<F>, Vector4<F>, (), (), (), F>>
    for SurfaceIntersectionGradientDescent<F>
where
    O: Gradient<Param = Vector4<F>, Gradient = Vector4<F>>
        + CostFunction<Param = Vector4<F>, Output = F>,
    F: FloatingPoint + ArgminFloat,
{
    const NAME: &'static str = "Surface intersection gradient descent";

    fn init(
        &mut self,
        problem: &mut Problem<O>,
        state: IterState<Vector4<F>, Vector4<F>, (), (), (), F>,
    ) -> Result<
        (
            IterState<Vector4<F>, Vector4<F>, (), (), (), F>,
            Option<KV>,
        ),
        Error,
    > {
        let x0 = state.get_param().ok_or_else(argmin_error_closure!(
            NotInitialized,
            concat!(
                "`SurfaceIntersectionGradientDescent` requires an initial parameter vector. ",
                "Please provide an initial guess via `Executor`s `configure` method."
            )
        ))?;
        let cost = problem.cost(x0)?;

        Ok((state.cost(cost), None))
    }

    fn next_iter(
        &mut self,
        problem: &mut Problem<O>,
        state: IterState<Vector4<F>, Vector4<F>, (), (), (), F>,
    ) -> Result<
        (
            IterState<Vector4<F>, Vector4<F>, (), (), (), F>,
            Option<KV>,
        ),
        Error,
    > {
        let x0 = state.get_param().ok_or_else(argmin_error_closure!(
            NotInitialized,
            concat!(
                "`SurfaceIntersectionGradientDescent` requires an initial parameter vector. ",
                "Please provide an initial guess via `Executor`s `configure` method."
            )
        ))?;

        let g = problem.gradient(x0)?;
        let x1 = x0 - g * self.step_size;
        let f1 = problem.cost(&x1)?;

        self.step_size = self.step_size * self.step_decay;

        Ok((state.param(x1).cost(f1).gradient(g), None))
    }

    fn terminate(
        &mut self,
        state: &IterState<Vector4<F>, Vector4<F>, (), (), (), F>,
    ) -> TerminationStatus {
        if state.iter > state.max_iters {
            return TerminationStatus::Terminated(TerminationReason::MaxItersReached);
        }

        let cost = state.get_cost();
        if cost.is_nan() || cost.is_infinite() {
            return TerminationStatus::Terminated(TerminationReason::SolverExit(
                "cost is NaN or infinite".into(),
            ));
        }

        if cost < self.cost_tolerance {
            return TerminationStatus::Terminated(TerminationReason::SolverConverged);
        }

        TerminationStatus::NotTerminated
    }
}
