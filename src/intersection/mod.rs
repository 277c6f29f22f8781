pub mod closest_sample_search;
pub mod intersection_curve;
pub mod intersection_curve_builder;
pub mod intersection_curve_tracer;
pub mod intersection_surface_surface;
pub mod surface_intersection_gradient;
pub mod surface_intersection_problem;
pub mod surface_intersection_solver_options;
pub mod surface_point_pair;

#[cfg(test)]
mod tests;

pub use closest_sample_search::*;
pub use intersection_curve::*;
pub use intersection_curve_builder::*;
pub use intersection_curve_tracer::*;
pub use surface_intersection_gradient::*;
pub use surface_intersection_problem::*;
pub use surface_intersection_solver_options::*;
pub use surface_point_pair::*;

/// Intersection curve between two objects trait
pub trait Intersects<'a, T> {
    type Output;
    type Option;

    fn find_intersection_curve(&'a self, other: T, option: Self::Option) -> Self::Output;
}
