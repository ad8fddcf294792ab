use thiserror::Error;

/// Result type for curve construction, interpolation and sampling
pub type Result<T> = std::result::Result<T, NurbsError>;

/// Errors raised while constructing or interpolating NURBS curves
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NurbsError {
    #[error("Knots not valid: knot[{lower}] > knot[{upper}] ({lower_value} > {upper_value})")]
    InvalidKnotSequence {
        lower: usize,
        upper: usize,
        lower_value: f64,
        upper_value: f64,
    },

    #[error("Too few knots for degree {degree}: got {knots}, need at least {}", .degree + 2)]
    InsufficientKnots { knots: usize, degree: usize },

    #[error(
        "Curve has wrong knot number: got {knots}, expected {} for degree {degree} and {control_points} control points",
        .degree + .control_points + 1
    )]
    MalformedCurve {
        knots: usize,
        degree: usize,
        control_points: usize,
    },

    #[error("Singular interpolation system ({size}x{size}): {reason}")]
    SingularSystem { size: usize, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
