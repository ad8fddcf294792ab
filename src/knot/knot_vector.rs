use std::ops::Index;

use nalgebra::convert;
use simba::scalar::SupersetOf;

use crate::error::{NurbsError, Result};
use crate::misc::FloatingPoint;

/// Knot vector representation
/// Owns the degree of the curve it parameterizes together with its non-decreasing knots.
#[derive(Clone, Debug, PartialEq)]
pub struct KnotVector<T> {
    knots: Vec<T>,
    degree: usize,
    /// index of the last valid control point (`knots.len() - degree - 2`)
    n: usize,
    clamped: bool,
}

impl<T: FloatingPoint> KnotVector<T> {
    /// Create a knot vector of the given degree
    /// # Failures
    /// - if a knot is smaller than its predecessor (or is NaN)
    /// - if there are fewer than `degree + 2` knots
    ///
    /// # Example
    /// ```
    /// use nurbs_fit::prelude::*;
    /// let knots = KnotVector::try_new(vec![0., 0., 0., 1., 2., 3., 3., 3.], 2).unwrap();
    /// assert_eq!(knots.n(), 4);
    /// assert!(knots.is_clamped());
    ///
    /// let invalid = KnotVector::try_new(vec![0., 0., 2., 1., 3., 3.], 2);
    /// assert!(invalid.is_err());
    /// ```
    pub fn try_new(knots: Vec<T>, degree: usize) -> Result<Self> {
        if let Some(lower) = knots
            .windows(2)
            .position(|pair| !(pair[0] <= pair[1]))
        {
            return Err(NurbsError::InvalidKnotSequence {
                lower,
                upper: lower + 1,
                lower_value: knots[lower].to_f64().unwrap_or(f64::NAN),
                upper_value: knots[lower + 1].to_f64().unwrap_or(f64::NAN),
            });
        }

        if knots.len() < degree + 2 {
            return Err(NurbsError::InsufficientKnots {
                knots: knots.len(),
                degree,
            });
        }

        let n = knots.len() - degree - 2;
        let clamped = Self::has_clamped_ends(&knots, degree);

        Ok(Self {
            knots,
            degree,
            n,
            clamped,
        })
    }

    /// Create a clamped knot vector by averaging `degree` consecutive parameters
    /// The result has `params.len() + degree + 1` knots,
    /// the first and last `degree + 1` of them being 0 and 1.
    ///
    /// # Example
    /// ```
    /// use nurbs_fit::prelude::*;
    /// let knots = KnotVector::try_averaging(&[0., 0.25, 0.5, 0.75, 1.], 2).unwrap();
    /// assert_eq!(knots.to_vec(), vec![0., 0., 0., 0.375, 0.625, 1., 1., 1.]);
    /// ```
    pub fn try_averaging(params: &[T], degree: usize) -> Result<Self> {
        if degree == 0 {
            return Err(NurbsError::InvalidInput(
                "knot averaging requires a degree of at least 1".to_string(),
            ));
        }
        if params.len() <= degree {
            return Err(NurbsError::InvalidInput(format!(
                "knot averaging of degree {} requires more than {} parameters, got {}",
                degree,
                degree,
                params.len()
            )));
        }

        let inv: T = T::one() / convert::<f64, T>(degree as f64);
        let interior = params.len() - degree - 1;

        let mut knots = vec![T::zero(); degree + 1];
        knots.extend((1..=interior).map(|j| {
            params[j..j + degree]
                .iter()
                .fold(T::zero(), |acc, u| acc + *u)
                * inv
        }));
        knots.extend(std::iter::repeat_n(T::one(), degree + 1));

        Self::try_new(knots, degree)
    }

    fn has_clamped_ends(knots: &[T], degree: usize) -> bool {
        let head = &knots[..=degree];
        let tail = &knots[knots.len() - degree - 1..];
        head.iter().all(|k| *k == head[0]) && tail.iter().all(|k| *k == tail[0])
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Index of the last valid control point
    pub fn n(&self) -> usize {
        self.n
    }

    /// Check if the knot vector is clamped
    /// `clamped` means the first and last `degree + 1` knots are equal
    /// e.g. [0, 0, 0, 1, 2, 3, 3, 3] with degree 2 is clamped
    pub fn is_clamped(&self) -> bool {
        self.clamped
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.knots.clone()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.knots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.knots.iter()
    }

    pub fn first(&self) -> T {
        self.knots[0]
    }

    pub fn last(&self) -> T {
        self.knots[self.knots.len() - 1]
    }

    /// Get the parametric domain `[knots[degree], knots[n + 1]]`
    pub fn domain(&self) -> (T, T) {
        (self.knots[self.degree], self.knots[self.n + 1])
    }

    /// Find the knot span index by binary search
    /// Returns `i` with `knots[i] <= u < knots[i + 1]`;
    /// parameters at or beyond the end of the domain map to the last span `n`.
    ///
    /// # Example
    /// ```
    /// use nurbs_fit::prelude::*;
    /// let knots = KnotVector::try_new(vec![0., 0., 0., 1., 2., 3., 3., 3.], 2).unwrap();
    /// assert_eq!(knots.find_span(2.5), 4);
    /// assert_eq!(knots.find_span(3.), 4);
    /// assert_eq!(knots.find_span(0.), 2);
    /// ```
    pub fn find_span(&self, u: T) -> usize {
        let n = self.n;
        if u >= self[n + 1] {
            return n;
        }

        let mut low = self.degree;
        let mut high = n + 1;
        let mut mid = (low + high) / 2;
        while (u < self[mid] || u >= self[mid + 1]) && low < high {
            if u < self[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }

        mid
    }

    /// Compute the `degree + 1` non-vanishing basis functions `N[span - degree] ..= N[span]` at `u`
    pub fn basis_functions(&self, span: usize, u: T) -> Vec<T> {
        let degree = self.degree;
        let mut basis_functions = vec![T::zero(); degree + 1];
        let mut left = vec![T::zero(); degree + 1];
        let mut right = vec![T::zero(); degree + 1];

        basis_functions[0] = T::one();

        for j in 1..=degree {
            left[j] = u - self[span + 1 - j];
            right[j] = self[span + j] - u;
            let mut saved = T::zero();

            for r in 0..j {
                let temp = basis_functions[r] / (right[r + 1] + left[j - r]);
                basis_functions[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }

            basis_functions[j] = saved;
        }

        basis_functions
    }

    /// Cast the knot vector to another floating point type
    /// # Example
    /// ```
    /// use nurbs_fit::prelude::*;
    /// let knots: KnotVector<f64> = KnotVector::try_new(vec![0., 0., 1., 1.], 1).unwrap();
    /// let knots2 = knots.cast::<f32>();
    /// assert_eq!(knots2.last(), 1.0f32);
    /// ```
    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> KnotVector<F> {
        KnotVector {
            knots: self.knots.iter().map(|v| convert(*v)).collect(),
            degree: self.degree,
            n: self.n,
            clamped: self.clamped,
        }
    }
}

impl<T> Index<usize> for KnotVector<T> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        &self.knots[index]
    }
}

#[cfg(feature = "serde")]
impl<T> serde::Serialize for KnotVector<T>
where
    T: FloatingPoint + serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("KnotVector", 2)?;
        state.serialize_field("knots", &self.knots)?;
        state.serialize_field("degree", &self.degree)?;
        state.end()
    }
}

/// `n` and `clamped` are derived from the knots, so only `knots` and `degree` are read
/// and the result goes through [`KnotVector::try_new`].
#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for KnotVector<T>
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
            Knots,
            Degree,
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
                        formatter.write_str("`knots` or `degree`")
                    }

                    fn visit_str<E>(self, value: &str) -> std::result::Result<Field, E>
                    where
                        E: de::Error,
                    {
                        match value {
                            "knots" => Ok(Field::Knots),
                            "degree" => Ok(Field::Degree),
                            _ => Err(de::Error::unknown_field(value, FIELDS)),
                        }
                    }
                }

                deserializer.deserialize_identifier(FieldVisitor)
            }
        }

        struct KnotVectorVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T> Visitor<'de> for KnotVectorVisitor<T>
        where
            T: FloatingPoint + serde::Deserialize<'de>,
        {
            type Value = KnotVector<T>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("struct KnotVector")
            }

            fn visit_map<V>(self, mut map: V) -> std::result::Result<Self::Value, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut knots: Option<Vec<T>> = None;
                let mut degree: Option<usize> = None;
                while let Some(key) = map.next_key()? {
                    match key {
                        Field::Knots => {
                            if knots.is_some() {
                                return Err(de::Error::duplicate_field("knots"));
                            }
                            knots = Some(map.next_value()?);
                        }
                        Field::Degree => {
                            if degree.is_some() {
                                return Err(de::Error::duplicate_field("degree"));
                            }
                            degree = Some(map.next_value()?);
                        }
                    }
                }

                let knots = knots.ok_or_else(|| de::Error::missing_field("knots"))?;
                let degree = degree.ok_or_else(|| de::Error::missing_field("degree"))?;
                KnotVector::try_new(knots, degree).map_err(de::Error::custom)
            }
        }

        const FIELDS: &[&str] = &["knots", "degree"];
        deserializer.deserialize_struct(
            "KnotVector",
            FIELDS,
            KnotVectorVisitor::<T>(std::marker::PhantomData),
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::KnotVector;
    use crate::error::NurbsError;

    fn clamped_cubic() -> KnotVector<f64> {
        KnotVector::try_new(
            vec![0., 0., 0., 0., 0.2, 0.45, 0.5, 0.8, 1., 1., 1., 1.],
            3,
        )
        .unwrap()
    }

    #[test]
    fn rejects_decreasing_knots() {
        let err = KnotVector::try_new(vec![0., 0., 0.7, 0.5, 1., 1.], 1).unwrap_err();
        assert_eq!(
            err,
            NurbsError::InvalidKnotSequence {
                lower: 2,
                upper: 3,
                lower_value: 0.7,
                upper_value: 0.5,
            }
        );
    }

    #[test]
    fn rejects_nan_knots() {
        let err = KnotVector::try_new(vec![0., f64::NAN, 1., 1.], 1).unwrap_err();
        assert!(matches!(
            err,
            NurbsError::InvalidKnotSequence { lower: 0, upper: 1, .. }
        ));
    }

    #[test]
    fn rejects_too_few_knots() {
        let err = KnotVector::try_new(vec![0., 0., 1.], 2).unwrap_err();
        assert_eq!(err, NurbsError::InsufficientKnots { knots: 3, degree: 2 });
    }

    #[test]
    fn clamped_flag() {
        assert!(clamped_cubic().is_clamped());
        let uniform = KnotVector::try_new(vec![0., 1., 2., 3., 4., 5., 6.], 2).unwrap();
        assert!(!uniform.is_clamped());
        assert_eq!(uniform.n(), 3);
        assert_eq!(uniform.domain(), (2., 4.));
    }

    #[test]
    fn span_bounds() {
        let knots = clamped_cubic();
        assert_eq!(knots.n(), 7);
        assert_eq!(knots.find_span(0.), 3);
        assert_eq!(knots.find_span(0.2), 4);
        assert_eq!(knots.find_span(0.47), 5);
        assert_eq!(knots.find_span(0.99), 7);
        assert_eq!(knots.find_span(1.), 7);
        assert_eq!(knots.find_span(1.5), 7);
        assert_eq!(knots.find_span(-0.5), 3);
    }

    #[test]
    fn span_is_monotonic() {
        let knots = clamped_cubic();
        let mut prev = knots.find_span(0.);
        for i in 1..=1000 {
            let span = knots.find_span(i as f64 / 1000.);
            assert!(span >= prev);
            assert!(span >= knots.degree() && span <= knots.n());
            prev = span;
        }
    }

    #[test]
    fn span_contains_parameter() {
        let knots = clamped_cubic();
        for i in 0..1000 {
            let u = i as f64 / 1000.;
            let span = knots.find_span(u);
            assert!(knots[span] <= u && u < knots[span + 1]);
        }
    }

    #[test]
    fn partition_of_unity() {
        let knots = clamped_cubic();
        for i in 0..=500 {
            let u = i as f64 / 500.;
            let span = knots.find_span(u);
            let basis = knots.basis_functions(span, u);
            assert_eq!(basis.len(), 4);
            assert!(basis.iter().all(|b| *b >= -1e-12));
            assert_relative_eq!(basis.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn basis_at_domain_ends() {
        let knots = clamped_cubic();
        let start = knots.basis_functions(knots.find_span(0.), 0.);
        assert_relative_eq!(start[0], 1.0);
        let end = knots.basis_functions(knots.find_span(1.), 1.);
        assert_relative_eq!(end[3], 1.0);
    }

    #[test]
    fn linear_basis() {
        let knots = KnotVector::try_new(vec![0., 0., 0.5, 1., 1.], 1).unwrap();
        let span = knots.find_span(0.25);
        assert_eq!(span, 1);
        let basis = knots.basis_functions(span, 0.25);
        assert_relative_eq!(basis[0], 0.5);
        assert_relative_eq!(basis[1], 0.5);
    }

    #[test]
    fn averaging_rejects_degenerate_input() {
        assert!(KnotVector::try_averaging(&[0., 0.5, 1.], 0).is_err());
        assert!(KnotVector::try_averaging(&[0., 0.5, 1.], 3).is_err());
    }

    #[test]
    fn averaging_length() {
        let params = [0., 0.1, 0.3, 0.4, 0.7, 0.8, 1.];
        let knots = KnotVector::try_averaging(&params, 3).unwrap();
        assert_eq!(knots.len(), params.len() + 3 + 1);
        assert!(knots.is_clamped());
        assert_relative_eq!(knots[4], (0.1 + 0.3 + 0.4) / 3., epsilon = 1e-12);
        assert_relative_eq!(knots[6], (0.4 + 0.7 + 0.8) / 3., epsilon = 1e-12);
    }
}
