use nalgebra::RealField;
use num_traits::ToPrimitive;

/// Scalar trait the whole crate is generic over (f32, f64)
/// Ties the nalgebra field type to the conversions the solvers need
pub trait FloatingPoint: RealField + ToPrimitive + Copy {}

impl FloatingPoint for f32 {}
impl FloatingPoint for f64 {}
