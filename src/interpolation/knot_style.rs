use itertools::Itertools;
use nalgebra::{convert, Point3};

use crate::error::{NurbsError, Result};
use crate::misc::FloatingPoint;

/// Knot parameterization for points interpolation
/// https://en.wikipedia.org/wiki/Centripetal_Catmull%E2%80%93Rom_spline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnotStyle {
    Uniform,
    Chordal,
    #[default]
    Centripetal,
}

impl KnotStyle {
    /// Assign a parameter in `[0, 1]` to each point
    /// The first parameter is 0, the last is 1 and the gaps between them are
    /// proportional to `|p[i] - p[i - 1]| ^ alpha`.
    ///
    /// # Example
    /// ```
    /// use nurbs_fit::prelude::*;
    /// use nalgebra::Point3;
    ///
    /// let points = vec![
    ///     Point3::<f64>::new(0., 0., 0.),
    ///     Point3::new(1., 0., 0.),
    ///     Point3::new(5., 0., 0.),
    /// ];
    /// let params = KnotStyle::Centripetal.parameterize(&points).unwrap();
    /// assert_eq!(params.len(), 3);
    /// assert!((params[1] - 1. / 3.).abs() < 1e-12);
    /// assert_eq!(params[2], 1.);
    /// ```
    pub fn parameterize<T: FloatingPoint>(&self, points: &[Point3<T>]) -> Result<Vec<T>> {
        if points.len() < 2 {
            return Err(NurbsError::InvalidInput(format!(
                "parameterization requires at least 2 points, got {}",
                points.len()
            )));
        }

        let deltas: Vec<T> = match self {
            KnotStyle::Uniform => vec![T::one(); points.len() - 1],
            KnotStyle::Chordal | KnotStyle::Centripetal => {
                let alpha = self.alpha::<T>();
                points
                    .iter()
                    .tuple_windows()
                    .map(|(a, b)| (b - a).norm().powf(alpha))
                    .collect()
            }
        };

        let total = deltas.iter().fold(T::zero(), |acc, d| acc + *d);
        if !(total > T::zero()) || !total.is_finite() {
            return Err(NurbsError::SingularSystem {
                size: points.len(),
                reason: format!("points span no distance (total chord {})", total),
            });
        }

        let inv = T::one() / total;
        let mut params = Vec::with_capacity(points.len());
        params.push(T::zero());
        for d in &deltas[..deltas.len() - 1] {
            let last = params[params.len() - 1];
            params.push(last + *d * inv);
        }
        params.push(T::one());

        Ok(params)
    }

    /// Exponent applied to the chord lengths
    pub fn alpha<T: FloatingPoint>(&self) -> T {
        match self {
            KnotStyle::Uniform => T::zero(),
            KnotStyle::Chordal => T::one(),
            KnotStyle::Centripetal => convert(0.5),
        }
    }
}
