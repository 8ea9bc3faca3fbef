//! Strategies for property-based testing of manifolds.
use ::proptest::prelude::*;
use nalgebra::{Point2, Point3};
use std::f64::consts::PI;

pub fn point2() -> impl Strategy<Value = Point2<f64>> {
    // Pick a reasonably small range to pick coordinates from,
    // otherwise we can easily get floating point numbers that are
    // so ridiculously large as to break anything we might want to do with them
    let range = -10.0..10.0;
    [range.clone(), range.clone()].prop_map(|[x, y]| Point2::new(x, y))
}

pub fn point3() -> impl Strategy<Value = Point3<f64>> {
    let range = -10.0..10.0;
    [range.clone(), range.clone(), range.clone()].prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Polar chart points `(rho, theta)` with `rho` in `[0, 10)` and `theta` in `[0, 2pi)`.
pub fn polar_chart_point() -> impl Strategy<Value = Point2<f64>> {
    (0.0..10.0, 0.0..2.0 * PI).prop_map(|(rho, theta)| Point2::new(rho, theta))
}

/// Spherical chart points `(rho, theta, phi)` with `rho` in `[0, 10)`, `theta` in `[0, pi]` and
/// `phi` in `[0, 2pi)`.
pub fn spherical_chart_point() -> impl Strategy<Value = Point3<f64>> {
    (0.0..10.0, 0.0..=PI, 0.0..2.0 * PI).prop_map(|(rho, theta, phi)| Point3::new(rho, theta, phi))
}

/// Non-negative weights that sum to one, for `num_points` points.
pub fn partition_of_unity(num_points: usize) -> impl Strategy<Value = Vec<f64>> {
    ::proptest::collection::vec(0.01..1.0, num_points).prop_map(|weights: Vec<f64>| {
        let sum: f64 = weights.iter().sum();
        weights.into_iter().map(|w| w / sum).collect()
    })
}
