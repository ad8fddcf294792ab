use nalgebra::{convert, Point3};
use simba::scalar::SupersetOf;

use crate::error::{NurbsError, Result};
use crate::interpolation::Interpolation;
use crate::knot::KnotVector;
use crate::misc::{to_line_string, FloatingPoint};

use super::ControlPoint;

/// NURBS curve representation
/// By generics, it can be used with f32 or f64 scalar types
#[derive(Clone, Debug, PartialEq)]
pub struct NurbsCurve<T: FloatingPoint> {
    /// control points in euclidean form, each carrying its weight
    control_points: Vec<ControlPoint<T>>,
    /// knot vector for the NURBS curve, holding the degree
    /// the length of the knot vector is equal to the `# of control points + degree + 1`
    knots: KnotVector<T>,
}

impl<T: FloatingPoint> NurbsCurve<T> {
    /// Create a new NURBS curve
    /// # Failures
    /// - the number of knots is not equal to the number of control points + the degree + 1
    ///
    /// # Example
    /// ```
    /// use nurbs_fit::prelude::*;
    /// use nalgebra::Point3;
    ///
    /// let control_points: Vec<ControlPoint<f64>> = vec![
    ///     Point3::new(50., 50., 0.),
    ///     Point3::new(30., 370., 0.),
    ///     Point3::new(180., 350., 0.),
    ///     Point3::new(150., 100., 0.),
    ///     Point3::new(250., 50., 0.),
    /// ]
    /// .into_iter()
    /// .map(ControlPoint::from)
    /// .collect();
    /// let knots = KnotVector::try_new(vec![0., 0., 0., 0., 0.5, 1., 1., 1., 1.], 3).unwrap();
    /// let nurbs = NurbsCurve::try_new(control_points.clone(), knots);
    /// assert!(nurbs.is_ok());
    ///
    /// let knots = KnotVector::try_new(vec![0., 0., 0., 0., 1., 1., 1., 1.], 3).unwrap();
    /// assert!(NurbsCurve::try_new(control_points, knots).is_err());
    /// ```
    pub fn try_new(control_points: Vec<ControlPoint<T>>, knots: KnotVector<T>) -> Result<Self> {
        if knots.len() != knots.degree() + control_points.len() + 1 {
            return Err(NurbsError::MalformedCurve {
                knots: knots.len(),
                degree: knots.degree(),
                control_points: control_points.len(),
            });
        }

        Ok(Self {
            control_points,
            knots,
        })
    }

    /// Try to create an interpolated NURBS curve passing through the points
    /// Uses the centripetal parameterization, see [`crate::prelude::CurveBuilder`] for the other options.
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
    ///     Point3::new(1.0, 2.5, 0.),
    /// ];
    /// let curve = NurbsCurve::try_interpolate(&points, 3).unwrap();
    ///
    /// // Check equality of the first and last points
    /// assert!((curve.point_at(0.) - points[0]).norm() < 1e-9);
    /// assert!((curve.point_at(1.) - points[5]).norm() < 1e-9);
    /// ```
    pub fn try_interpolate(points: &[Point3<T>], degree: usize) -> Result<Self> {
        <Self as Interpolation>::interpolate(points, degree)
    }

    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    pub fn knots(&self) -> &KnotVector<T> {
        &self.knots
    }

    pub fn control_points(&self) -> &[ControlPoint<T>] {
        &self.control_points
    }

    pub fn control_points_iter(&self) -> impl Iterator<Item = &ControlPoint<T>> {
        self.control_points.iter()
    }

    pub fn weights(&self) -> Vec<T> {
        self.control_points.iter().map(|p| p.weight()).collect()
    }

    pub fn knots_domain(&self) -> (T, T) {
        self.knots.domain()
    }

    pub fn is_clamped(&self) -> bool {
        self.knots.is_clamped()
    }

    /// Evaluate the curve at a given parameter
    ///
    /// Parameters whose knot span falls outside `[degree, n]` evaluate to the origin,
    /// as do points whose accumulated weight vanishes.
    pub fn point_at(&self, u: T) -> Point3<T> {
        *self.point(u).unweighted().coordinate()
    }

    /// Evaluate the curve at a given parameter to get a point in homogeneous form
    pub(crate) fn point(&self, u: T) -> ControlPoint<T> {
        let degree = self.degree();
        let span = self.knots.find_span(u);
        if span < degree || span > self.knots.n() {
            return ControlPoint::zero();
        }

        let basis = self.knots.basis_functions(span, u);
        self.control_points[span - degree..=span]
            .iter()
            .zip(basis)
            .fold(ControlPoint::zero(), |acc, (p, b)| acc + p.weighted() * b)
    }

    /// Sample the curve at `count` parameters evenly spaced over `[0, 1]`, both ends included
    /// # Failures
    /// - if `count` is less than 2
    pub fn try_sample(&self, count: usize) -> Result<Vec<Point3<T>>> {
        self.try_sample_regular_range(T::zero(), T::one(), count)
    }

    /// Sample the curve at a given number of points between the start and end parameters
    /// # Failures
    /// - if `count` is less than 2
    pub fn try_sample_regular_range(&self, start: T, end: T, count: usize) -> Result<Vec<Point3<T>>> {
        if count < 2 {
            return Err(NurbsError::InvalidInput(format!(
                "sampling requires at least 2 points, got {}",
                count
            )));
        }

        let last: T = convert((count - 1) as f64);
        Ok((0..count)
            .map(|i| {
                let t = convert::<f64, T>(i as f64) / last;
                self.point_at(start + (end - start) * t)
            })
            .collect())
    }

    /// Sample the curve into a planar `geo::LineString`, dropping the z coordinate
    pub fn try_sample_line_string(&self, count: usize) -> Result<geo::LineString<f64>> {
        self.try_sample(count).map(|points| to_line_string(&points))
    }

    /// Cast the curve to another floating point type
    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> NurbsCurve<F> {
        NurbsCurve {
            control_points: self.control_points.iter().map(|p| p.cast()).collect(),
            knots: self.knots.cast(),
        }
    }
}

#[cfg(feature = "serde")]
impl<T> serde::Serialize for NurbsCurve<T>
where
    T: FloatingPoint + serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("NurbsCurve", 2)?;
        state.serialize_field("control_points", &self.control_points)?;
        state.serialize_field("knots", &self.knots)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for NurbsCurve<T>
where
    T: FloatingPoint + serde::Deserialize<'de>,
{
    fn deserialize<S>(deserializer: S) -> std::result::Result<Self, S::Error>
    where
        S: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};

        #[derive(Debug)]
        enum Field {
            ControlPoints,
            Knots,
        }

        impl<'de> serde::Deserialize<'de> for Field {
            fn deserialize<S>(deserializer: S) -> std::result::Result<Self, S::Error>
            where
                S: serde::Deserializer<'de>,
            {
                struct FieldVisitor;

                impl Visitor<'_> for FieldVisitor {
                    type Value = Field;

                    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                        formatter.write_str("`control_points` or `knots`")
                    }

                    fn visit_str<E>(self, value: &str) -> std::result::Result<Field, E>
                    where
                        E: de::Error,
                    {
                        match value {
                            "control_points" => Ok(Field::ControlPoints),
                            "knots" => Ok(Field::Knots),
                            _ => Err(de::Error::unknown_field(value, FIELDS)),
                        }
                    }
                }

                deserializer.deserialize_identifier(FieldVisitor)
            }
        }

        struct NurbsCurveVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T> Visitor<'de> for NurbsCurveVisitor<T>
        where
            T: FloatingPoint + serde::Deserialize<'de>,
        {
            type Value = NurbsCurve<T>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("struct NurbsCurve")
            }

            fn visit_map<V>(self, mut map: V) -> std::result::Result<Self::Value, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut control_points: Option<Vec<ControlPoint<T>>> = None;
                let mut knots: Option<KnotVector<T>> = None;
                while let Some(key) = map.next_key()? {
                    match key {
                        Field::ControlPoints => {
                            if control_points.is_some() {
                                return Err(de::Error::duplicate_field("control_points"));
                            }
                            control_points = Some(map.next_value()?);
                        }
                        Field::Knots => {
                            if knots.is_some() {
                                return Err(de::Error::duplicate_field("knots"));
                            }
                            knots = Some(map.next_value()?);
                        }
                    }
                }

                let control_points =
                    control_points.ok_or_else(|| de::Error::missing_field("control_points"))?;
                let knots = knots.ok_or_else(|| de::Error::missing_field("knots"))?;
                NurbsCurve::try_new(control_points, knots).map_err(de::Error::custom)
            }
        }

        const FIELDS: &[&str] = &["control_points", "knots"];
        deserializer.deserialize_struct(
            "NurbsCurve",
            FIELDS,
            NurbsCurveVisitor::<T>(std::marker::PhantomData),
        )
    }
}
