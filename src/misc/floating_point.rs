use nalgebra::{convert, RealField};
use num_traits::ToPrimitive;

/// Trait for floating point types (f32, f64)
/// Mainly used to identify the type of the field in nalgebra
pub trait FloatingPoint: RealField + ToPrimitive + Copy {
    /// Magnitude at or below which a weight is treated as zero by the projective divide.
    /// Single precision machine epsilon regardless of the scalar type.
    fn weight_epsilon() -> Self {
        convert(f32::EPSILON as f64)
    }
}

impl FloatingPoint for f32 {}
impl FloatingPoint for f64 {}
