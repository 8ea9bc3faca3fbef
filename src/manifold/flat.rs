use crate::error::ManifoldError;
use crate::manifold::{chart_new_point, ChartManifold, Manifold};
use crate::quadrature::Quadrature;
use manifem_traits::allocators::DimAllocator;
use manifem_traits::Real;
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint, OVector, Scalar};
use serde::{Deserialize, Serialize};

/// Straight-sided geometry, optionally periodic along some coordinate axes.
///
/// New points are weighted centroids. Along periodic axes the centroid is taken with
/// wraparound and wrapped into `[0, period)`, which is what is needed to refine across the seam
/// of a periodic domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "FlatManifoldParams<T, D>",
    into = "FlatManifoldParams<T, D>",
    bound(
        serialize = "OVector<T, D>: Serialize",
        deserialize = "T: Real, OVector<T, D>: Deserialize<'de>"
    )
)]
pub struct FlatManifold<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    periodicity: OVector<T, D>,
}

/// Serialized form of a [`FlatManifold`]; periods are validated when deserializing.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "OVector<T, D>: Serialize",
    deserialize = "OVector<T, D>: Deserialize<'de>"
))]
struct FlatManifoldParams<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    periodicity: OVector<T, D>,
}

impl<T, D> From<FlatManifold<T, D>> for FlatManifoldParams<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    fn from(manifold: FlatManifold<T, D>) -> Self {
        Self {
            periodicity: manifold.periodicity,
        }
    }
}

impl<T, D> TryFrom<FlatManifoldParams<T, D>> for FlatManifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    type Error = ManifoldError;

    fn try_from(params: FlatManifoldParams<T, D>) -> Result<Self, Self::Error> {
        Self::try_with_periodicity(params.periodicity)
    }
}

impl<T, D> FlatManifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// A flat manifold without any periodic axes.
    pub fn new() -> Self {
        Self {
            periodicity: OVector::zeros(),
        }
    }

    pub fn try_with_periodicity(periodicity: OVector<T, D>) -> Result<Self, ManifoldError> {
        if let Some((axis, period)) = periodicity.iter().enumerate().find(|(_, period)| **period < T::zero()) {
            return Err(ManifoldError::NegativePeriod {
                axis,
                period: period.to_subset().unwrap_or(f64::NAN),
            });
        }
        Ok(Self { periodicity })
    }

    /// # Panics
    ///
    /// Panics if any period is negative.
    pub fn with_periodicity(periodicity: OVector<T, D>) -> Self {
        Self::try_with_periodicity(periodicity).unwrap_or_else(|err| panic!("{}", err))
    }
}

impl<T, D> Default for FlatManifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, D> ChartManifold<T, D> for FlatManifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn push_forward(&self, chart_point: &OPoint<T, D>) -> OPoint<T, D> {
        chart_point.clone()
    }

    fn pull_back(&self, space_point: &OPoint<T, D>) -> OPoint<T, D> {
        space_point.clone()
    }

    fn periodicity(&self) -> &OVector<T, D> {
        &self.periodicity
    }
}

impl<T, D> Manifold<T, D> for FlatManifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn get_new_point<Q>(&self, quadrature: &Q) -> OPoint<T, D>
    where
        Q: Quadrature<T, D> + ?Sized,
    {
        chart_new_point(self, quadrature)
    }
}
