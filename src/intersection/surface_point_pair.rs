use nalgebra::Vector2;

use crate::misc::FloatingPoint;

/// A single location on an intersection curve, expressed in both surfaces'
/// parameter spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfacePointPair<T: FloatingPoint> {
    /// Parameters on the first surface at the shared 3D location.
    a: Vector2<T>,
    /// Parameters on the second surface at the shared 3D location.
    b: Vector2<T>,
}

impl<T: FloatingPoint> SurfacePointPair<T> {
    pub fn new(a: Vector2<T>, b: Vector2<T>) -> Self {
        Self { a, b }
    }

    pub fn a(&self) -> &Vector2<T> {
        &self.a
    }

    pub fn b(&self) -> &Vector2<T> {
        &self.b
    }
}
