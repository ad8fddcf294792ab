use nalgebra::{DMatrix, DVector, Point3};

use crate::curve::{ControlPoint, NurbsCurve};
use crate::error::{NurbsError, Result};
use crate::knot::KnotVector;
use crate::misc::FloatingPoint;

use super::{InterpolationSystem, KnotStyle};

/// Builder of non-rational NURBS curves passing through a sequence of points
/// (global interpolation).
///
/// Each point gets a parameter from the [`KnotStyle`], the knot vector is averaged
/// from those parameters, and the control points solve `A P = Q` where row `k` of `A`
/// holds the basis functions evaluated at the `k`-th parameter.
///
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
///     Point3::new(-1.0, 2.0, 0.),
/// ];
/// let (curve, params) = CurveBuilder::new(3).build_with_parameters(&points).unwrap();
/// for (point, u) in points.iter().zip(params) {
///     assert!((curve.point_at(u) - point).norm() < 1e-9);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct CurveBuilder<T: FloatingPoint> {
    degree: usize,
    knot_style: KnotStyle,
    pivot_tolerance: T,
}

impl<T: FloatingPoint> CurveBuilder<T> {
    pub fn new(degree: usize) -> Self {
        Self {
            degree,
            knot_style: KnotStyle::default(),
            pivot_tolerance: T::default_epsilon(),
        }
    }

    pub fn with_knot_style(mut self, knot_style: KnotStyle) -> Self {
        self.knot_style = knot_style;
        self
    }

    /// LU pivots with a magnitude at or below the tolerance mark the system as singular
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: T) -> Self {
        self.pivot_tolerance = pivot_tolerance;
        self
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knot_style(&self) -> KnotStyle {
        self.knot_style
    }

    pub fn pivot_tolerance(&self) -> T {
        self.pivot_tolerance
    }

    /// Parameters assigned to the points, in the same order
    pub fn parameterize(&self, points: &[Point3<T>]) -> Result<Vec<T>> {
        self.validate(points)?;
        self.knot_style.parameterize(points)
    }

    /// Interpolate the points with a curve of the builder's degree
    /// # Failures
    /// - if the degree is zero or any coordinate is not finite
    /// - if there are not more points than the degree
    /// - if the points collapse onto each other so the system becomes singular
    pub fn build(&self, points: &[Point3<T>]) -> Result<NurbsCurve<T>> {
        self.build_with_parameters(points).map(|(curve, _)| curve)
    }

    /// Interpolate the points and return the curve with the parameter of each point
    pub fn build_with_parameters(&self, points: &[Point3<T>]) -> Result<(NurbsCurve<T>, Vec<T>)> {
        self.validate(points)?;

        let size = points.len();
        #[cfg(feature = "log")]
        log::debug!(
            "Interpolating {} points with degree {} ({:?} parameterization)",
            size,
            self.degree,
            self.knot_style
        );

        let params = self.knot_style.parameterize(points)?;
        let knots = KnotVector::try_averaging(&params, self.degree)?;
        #[cfg(feature = "log")]
        log::trace!("parameters: {:?}", params);
        #[cfg(feature = "log")]
        log::trace!("knots: {:?}", knots.as_slice());

        let system =
            InterpolationSystem::try_factorize(basis_matrix(&knots, &params), self.pivot_tolerance)?;

        let channels = (0..3)
            .map(|axis| {
                let b = DVector::from_iterator(size, points.iter().map(|p| p[axis]));
                system.solve(&b)
            })
            .collect::<Result<Vec<_>>>()?;

        let control_points = (0..size)
            .map(|i| {
                ControlPoint::from_point(Point3::new(
                    channels[0][i],
                    channels[1][i],
                    channels[2][i],
                ))
            })
            .collect();

        let curve = NurbsCurve::try_new(control_points, knots)?;
        #[cfg(feature = "log")]
        log::debug!(
            "Interpolated curve with {} control points and {} knots",
            curve.control_points().len(),
            curve.knots().len()
        );

        Ok((curve, params))
    }

    fn validate(&self, points: &[Point3<T>]) -> Result<()> {
        if self.degree == 0 {
            return Err(NurbsError::InvalidInput(
                "interpolation requires a degree of at least 1".to_string(),
            ));
        }

        if let Some(index) = points
            .iter()
            .position(|p| p.iter().any(|c| !c.is_finite()))
        {
            return Err(NurbsError::InvalidInput(format!(
                "point {} has a non-finite coordinate",
                index
            )));
        }

        if points.len() <= self.degree {
            return Err(NurbsError::SingularSystem {
                size: points.len(),
                reason: format!(
                    "degree {} requires at least {} points, got {}",
                    self.degree,
                    self.degree + 1,
                    points.len()
                ),
            });
        }

        Ok(())
    }
}

/// Square matrix whose row `i` holds the non-zero basis functions at `params[i]`,
/// placed at the columns `span - degree ..= span`
fn basis_matrix<T: FloatingPoint>(knots: &KnotVector<T>, params: &[T]) -> DMatrix<T> {
    let size = params.len();
    let degree = knots.degree();
    let mut matrix = DMatrix::zeros(size, size);
    for (i, u) in params.iter().enumerate() {
        let span = knots.find_span(*u);
        let basis = knots.basis_functions(span, *u);
        for (j, b) in basis.into_iter().enumerate() {
            matrix[(i, span - degree + j)] = b;
        }
    }
    matrix
}
