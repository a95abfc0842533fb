use nalgebra::Point2;
use thiserror::Error;

pub mod bulge;
pub mod transform;

pub use bulge::*;
pub use transform::*;

/// Numerical floor below which bulges and chords are treated as zero.
pub const GEOMETRY_EPSILON: f64 = 1e-10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("{name} is not a finite number, value: {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{name} must be greater than zero, value: {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("Polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),
}

pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64, GeometryError> {
    match value.is_finite() {
        true => Ok(value),
        false => Err(GeometryError::NonFinite {
            name,
            value,
        }),
    }
}

pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64, GeometryError> {
    let value = ensure_finite(name, value)?;
    match value > 0.0 {
        true => Ok(value),
        false => Err(GeometryError::NonPositive {
            name,
            value,
        }),
    }
}

pub(crate) fn ensure_finite_point(name: &'static str, point: Point2<f64>) -> Result<Point2<f64>, GeometryError> {
    ensure_finite(name, point.x)?;
    ensure_finite(name, point.y)?;
    Ok(point)
}

pub(crate) fn ensure_polygon(points: &[Point2<f64>]) -> Result<(), GeometryError> {
    if points.len() < 3 {
        return Err(GeometryError::TooFewPoints(points.len()));
    }
    for point in points {
        ensure_finite_point("polygon point", *point)?;
    }
    Ok(())
}
