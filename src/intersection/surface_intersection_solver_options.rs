use crate::misc::FloatingPoint;

/// Hyperparameters for the surface-surface intersection solver.
/// The defaults are tuned values; callers can trade accuracy for performance
/// through the `with_*` methods.
#[derive(Clone, Debug)]
pub struct SurfaceIntersectionSolverOptions<T: FloatingPoint> {
    /// Number of samples per parameter axis for the initial closest-sample search.
    /// The seam sample is dropped on a wrapped axis.
    pub sample_resolution: usize,
    /// Initial step size of the gradient descent starting-point refinement.
    pub descent_step_size: T,
    /// Multiplicative decay applied to the descent step size each iteration.
    pub descent_step_decay: T,
    /// Squared distance between the two surface positions under which the
    /// refined starting point is accepted.
    pub descent_tolerance: T,
    /// Maximum number of gradient descent iterations before the seed is
    /// rejected as "no intersection".
    pub descent_max_iters: u64,
    /// Arc length advanced along the intersection curve per accepted step.
    pub step_size: T,
    /// Squared residual norm under which a marching Newton step converges.
    pub newton_tolerance: T,
    /// Maximum number of Newton iterations per marching step.
    pub newton_max_iters: u64,
    /// Maximum number of traced points per marching direction.
    pub max_points: usize,
    /// Number of accepted steps required before loop closure is tested.
    pub closure_min_steps: usize,
}

impl<T: FloatingPoint> Default for SurfaceIntersectionSolverOptions<T> {
    fn default() -> Self {
        Self {
            sample_resolution: 30,
            descent_step_size: T::from_f64(1e-4).unwrap(),
            descent_step_decay: T::from_f64(0.9999).unwrap(),
            descent_tolerance: T::from_f64(1e-6).unwrap(),
            descent_max_iters: 10_000,
            step_size: T::from_f64(1e-2).unwrap(),
            newton_tolerance: T::from_f64(1e-8).unwrap(),
            newton_max_iters: 10_000,
            max_points: 10_000,
            closure_min_steps: 5,
        }
    }
}

impl<T: FloatingPoint> SurfaceIntersectionSolverOptions<T> {
    pub fn with_sample_resolution(mut self, sample_resolution: usize) -> Self {
        self.sample_resolution = sample_resolution;
        self
    }

    pub fn with_descent_step_size(mut self, descent_step_size: T) -> Self {
        self.descent_step_size = descent_step_size;
        self
    }

    pub fn with_descent_step_decay(mut self, descent_step_decay: T) -> Self {
        self.descent_step_decay = descent_step_decay;
        self
    }

    pub fn with_descent_tolerance(mut self, descent_tolerance: T) -> Self {
        self.descent_tolerance = descent_tolerance;
        self
    }

    pub fn with_descent_max_iters(mut self, descent_max_iters: u64) -> Self {
        self.descent_max_iters = descent_max_iters;
        self
    }

    pub fn with_step_size(mut self, step_size: T) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn with_newton_tolerance(mut self, newton_tolerance: T) -> Self {
        self.newton_tolerance = newton_tolerance;
        self
    }

    pub fn with_newton_max_iters(mut self, newton_max_iters: u64) -> Self {
        self.newton_max_iters = newton_max_iters;
        self
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    pub fn with_closure_min_steps(mut self, closure_min_steps: usize) -> Self {
        self.closure_min_steps = closure_min_steps;
        self
    }
}
