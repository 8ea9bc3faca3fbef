//! Error conditions for manifolds and weighted point sets.
//!
//! Most of these conditions are contract violations: the panicking entry points (such as
//! [`SphericalManifold::new`](crate::manifold::SphericalManifold::new)) use the [`Display`]
//! representation of a [`ManifoldError`] as their panic message, while the `try_*` variants
//! return it directly.
use std::error::Error;
use std::fmt;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ManifoldError {
    /// The manifold has no meaningful definition in an ambient space of the given dimension.
    ImpossibleInDimension { dim: usize },
    /// A chart point with a negative radius coordinate was passed to a push-forward.
    NegativeRadius { radius: f64 },
    /// A code path that only supports certain ambient dimensions was reached with another one.
    UnsupportedDimension { dim: usize },
    /// A negative period was given for a chart axis.
    NegativePeriod { axis: usize, period: f64 },
    /// The weighted point set has no points.
    EmptyQuadrature,
    /// The number of weights does not match the number of points.
    LengthMismatch { weights: usize, points: usize },
    /// A weight in the weighted point set is negative.
    NegativeWeight { index: usize, weight: f64 },
}

impl Display for ManifoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImpossibleInDimension { dim } => {
                write!(f, "Manifold is impossible in ambient dimension {}.", dim)
            }
            Self::NegativeRadius { radius } => {
                write!(f, "Negative radius for given chart point (radius = {}).", radius)
            }
            Self::UnsupportedDimension { dim } => {
                write!(f, "Internal error: ambient dimension {} is not supported here.", dim)
            }
            Self::NegativePeriod { axis, period } => {
                write!(f, "Period of chart axis {} must be non-negative, got {}.", axis, period)
            }
            Self::EmptyQuadrature => {
                write!(f, "Weighted point set must contain at least one point.")
            }
            Self::LengthMismatch { weights, points } => {
                write!(
                    f,
                    "Number of weights ({}) does not match number of points ({}).",
                    weights, points
                )
            }
            Self::NegativeWeight { index, weight } => {
                write!(f, "Weight {} is negative ({}).", index, weight)
            }
        }
    }
}

impl Error for ManifoldError {}
