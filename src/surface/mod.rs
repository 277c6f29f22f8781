pub mod bezier_surface;
pub mod parametric_surface;
pub mod torus;

pub use bezier_surface::*;
pub use parametric_surface::*;
pub use torus::*;
