pub mod control_point;
pub mod nurbs_curve;
pub use control_point::*;
pub use nurbs_curve::*;
