pub mod floating_point;
pub mod line_string_helper;

pub use floating_point::*;
pub use line_string_helper::*;
