use std::ops::{Add, Mul};

use nalgebra::{convert, Point3};
use simba::scalar::SupersetOf;

use crate::misc::FloatingPoint;

/// Control point of a NURBS curve: a 3D coordinate paired with a weight.
///
/// The same type carries both the euclidean form (the weight is metadata)
/// and the homogeneous form (the coordinate is premultiplied by the weight).
/// [`ControlPoint::weighted`] and [`ControlPoint::unweighted`] move between the two,
/// the caller keeps track of which one it holds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint<T: FloatingPoint> {
    coordinate: Point3<T>,
    weight: T,
}

impl<T: FloatingPoint> ControlPoint<T> {
    pub fn new(coordinate: Point3<T>, weight: T) -> Self {
        Self { coordinate, weight }
    }

    /// Create a non-rational control point (weight = 1)
    pub fn from_point(coordinate: Point3<T>) -> Self {
        Self::new(coordinate, T::one())
    }

    /// Homogeneous origin, the neutral element of [`Add`]
    pub fn zero() -> Self {
        Self::new(Point3::origin(), T::zero())
    }

    pub fn coordinate(&self) -> &Point3<T> {
        &self.coordinate
    }

    pub fn weight(&self) -> T {
        self.weight
    }

    /// Multiply both the coordinate and the weight by `s`
    pub fn scale(&self, s: T) -> Self {
        Self::new(Point3::from(self.coordinate.coords * s), self.weight * s)
    }

    /// Projective lift: the coordinate becomes `weight * coordinate`, the weight is kept
    pub fn weighted(&self) -> Self {
        Self::new(
            Point3::from(self.coordinate.coords * self.weight),
            self.weight,
        )
    }

    /// Projective divide: the coordinate becomes `coordinate / weight`, the weight is kept
    ///
    /// A weight with magnitude at or below [`FloatingPoint::weight_epsilon`] divides to the origin
    /// instead of producing infinite or NaN coordinates.
    ///
    /// # Example
    /// ```
    /// use nurbs_fit::prelude::*;
    /// use nalgebra::Point3;
    ///
    /// let p = ControlPoint::new(Point3::new(2., 4., 6.), 2.);
    /// assert_eq!(p.unweighted().coordinate(), &Point3::new(1., 2., 3.));
    ///
    /// let degenerate = ControlPoint::new(Point3::new(2., 4., 6.), 0.);
    /// assert_eq!(degenerate.unweighted().coordinate(), &Point3::origin());
    /// ```
    pub fn unweighted(&self) -> Self {
        let inv = if self.weight.abs() > T::weight_epsilon() {
            T::one() / self.weight
        } else {
            T::zero()
        };
        Self::new(Point3::from(self.coordinate.coords * inv), self.weight)
    }

    /// Cast the control point to another floating point type
    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> ControlPoint<F> {
        ControlPoint::new(self.coordinate.cast::<F>(), convert(self.weight))
    }
}

impl<T: FloatingPoint> From<Point3<T>> for ControlPoint<T> {
    fn from(coordinate: Point3<T>) -> Self {
        Self::from_point(coordinate)
    }
}

impl<T: FloatingPoint> Add for ControlPoint<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            Point3::from(self.coordinate.coords + rhs.coordinate.coords),
            self.weight + rhs.weight,
        )
    }
}

impl<T: FloatingPoint> Mul<T> for ControlPoint<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output {
        self.scale(rhs)
    }
}
