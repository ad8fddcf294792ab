use nalgebra::Point3;

use crate::curve::NurbsCurve;
use crate::error::Result;
use crate::misc::FloatingPoint;

use super::{CurveBuilder, Interpolation};

impl<T: FloatingPoint> Interpolation for NurbsCurve<T> {
    type Input = [Point3<T>];
    type Output = Result<Self>;

    /// Interpolate a non-rational NURBS curve through the points
    /// with the centripetal parameterization and averaged knots
    /// # Example
    /// ```
    /// use nurbs_fit::prelude::*;
    /// use nalgebra::Point3;
    ///
    /// let points: Vec<Point3<f64>> = vec![
    ///     Point3::new(-1.0, -1.0, 0.),
    ///     Point3::new(1.0, -1.0, 0.),
    ///     Point3::new(1.0, 1.0, 0.),
    ///     Point3::new(-1.0, 1.0, 0.),
    /// ];
    /// let curve = NurbsCurve::interpolate(&points[..], 2).unwrap();
    /// assert_eq!(curve.control_points().len(), 4);
    /// assert!((curve.point_at(1.) - points[3]).norm() < 1e-9);
    /// ```
    fn interpolate(input: &Self::Input, degree: usize) -> Self::Output {
        CurveBuilder::new(degree).build(input)
    }
}
