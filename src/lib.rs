#![allow(clippy::needless_range_loop)]
//! NURBS curves: knot vector mathematics, rational evaluation,
//! and global interpolation of a curve through sample points.

mod curve;
mod error;
mod interpolation;
mod knot;
mod misc;

pub mod prelude {
    pub use crate::curve::*;
    pub use crate::error::*;
    pub use crate::interpolation::*;
    pub use crate::knot::*;
    pub use crate::misc::*;
}
