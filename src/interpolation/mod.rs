pub mod curve;
pub mod curve_builder;
pub mod interpolation_system;
pub mod knot_style;
pub use curve_builder::*;
pub use interpolation_system::*;
pub use knot_style::*;

/// Interpolation trait
pub trait Interpolation {
    type Input: ?Sized;
    type Output;
    fn interpolate(input: &Self::Input, degree: usize) -> Self::Output;
}
