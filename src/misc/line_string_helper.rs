use nalgebra::Point3;
use num_traits::NumCast;

use crate::misc::FloatingPoint;

/// Convert points into a planar `geo::LineString`, dropping the z coordinate
pub fn to_line_string<T: FloatingPoint>(points: &[Point3<T>]) -> geo::LineString {
    geo::LineString::new(
        points
            .iter()
            .map(|p| {
                geo::Coord::from([
                    <f64 as NumCast>::from(p.x).unwrap_or(f64::NAN),
                    <f64 as NumCast>::from(p.y).unwrap_or(f64::NAN),
                ])
            })
            .collect(),
    )
}

/// Lift the vertices of a planar `geo::LineString` into points on the `z = 0` plane
pub fn points_from_line_string(line: &geo::LineString) -> Vec<Point3<f64>> {
    line.coords().map(|c| Point3::new(c.x, c.y, 0.)).collect()
}
