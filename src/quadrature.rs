//! Weighted point sets used to construct new points on manifolds.
//!
//! A "quadrature" here is an ordered collection of ambient points with non-negative weights.
//! When the weights sum to one, the collection describes a weighted centroid, which is what
//! [`Manifold::get_new_point`](crate::manifold::Manifold::get_new_point) consumes.
use crate::error::ManifoldError;
use manifem_traits::allocators::DimAllocator;
use manifem_traits::Real;
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint, Scalar};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use std::slice;

/// A set of ambient points with associated weights.
pub trait Quadrature<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T];
    fn points(&self) -> &[OPoint<T, D>];

    fn len(&self) -> usize {
        self.weights().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> QuadratureIter<T, D> {
        QuadratureIter {
            weights_iter: self.weights().iter(),
            points_iter: self.points().iter(),
        }
    }

    /// The sum of all weights.
    fn total_weight(&self) -> T
    where
        T: Real,
    {
        self.weights().iter().fold(T::zero(), |sum, w| sum + *w)
    }

    /// Whether the weights are non-negative and sum to one up to the given absolute tolerance.
    fn is_partition_of_unity(&self, tol: T) -> bool
    where
        T: Real,
    {
        self.weights().iter().all(|w| *w >= T::zero()) && (self.total_weight() - T::one()).abs() <= tol
    }
}

#[derive(Debug, Clone)]
pub struct QuadratureIter<'a, T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    weights_iter: slice::Iter<'a, T>,
    points_iter: slice::Iter<'a, OPoint<T, D>>,
}

impl<'a, T, D> Iterator for QuadratureIter<'a, T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    type Item = (&'a T, &'a OPoint<T, D>);

    fn next(&mut self) -> Option<Self::Item> {
        Some((self.weights_iter.next()?, self.points_iter.next()?))
    }
}

impl<'a, T, D> FusedIterator for QuadratureIter<'a, T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
}

impl<T, D, A, B> Quadrature<T, D> for (A, B)
where
    T: Scalar,
    D: DimName,
    A: AsRef<[T]>,
    B: AsRef<[OPoint<T, D>]>,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T] {
        self.0.as_ref()
    }

    fn points(&self) -> &[OPoint<T, D>] {
        self.1.as_ref()
    }
}

impl<T, D, X> Quadrature<T, D> for &X
where
    T: Scalar,
    D: DimName,
    X: Quadrature<T, D> + ?Sized,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T] {
        X::weights(self)
    }

    fn points(&self) -> &[OPoint<T, D>] {
        X::points(self)
    }
}

/// An owned, validated weighted point set.
///
/// Guaranteed to be non-empty, with as many weights as points and no negative weights.
/// The weights are *not* required to sum to one; see [`Quadrature::is_partition_of_unity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize, OPoint<T, D>: Serialize",
    deserialize = "T: Deserialize<'de>, OPoint<T, D>: Deserialize<'de>"
))]
pub struct WeightedPointSet<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    weights: Vec<T>,
    points: Vec<OPoint<T, D>>,
}

impl<T, D> WeightedPointSet<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn try_from_weights_and_points(weights: Vec<T>, points: Vec<OPoint<T, D>>) -> Result<Self, ManifoldError> {
        if weights.len() != points.len() {
            return Err(ManifoldError::LengthMismatch {
                weights: weights.len(),
                points: points.len(),
            });
        }
        if weights.is_empty() {
            return Err(ManifoldError::EmptyQuadrature);
        }
        if let Some((index, weight)) = weights.iter().enumerate().find(|(_, w)| **w < T::zero()) {
            return Err(ManifoldError::NegativeWeight {
                index,
                weight: weight.to_subset().unwrap_or(f64::NAN),
            });
        }
        Ok(Self { weights, points })
    }

    /// # Panics
    ///
    /// Panics if the set is empty, the lengths differ or a weight is negative.
    pub fn from_weights_and_points(weights: Vec<T>, points: Vec<OPoint<T, D>>) -> Self {
        Self::try_from_weights_and_points(weights, points).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Equal weights `1/n` for each of the `n` given points.
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty.
    pub fn uniform(points: Vec<OPoint<T, D>>) -> Self {
        let n = T::from_usize(points.len()).expect("Must be able to fit usize in T");
        let weights = vec![T::one() / n; points.len()];
        Self::from_weights_and_points(weights, points)
    }

    /// The two-point set `[(p1, 1 - w), (p2, w)]`.
    ///
    /// # Panics
    ///
    /// Panics if `w` is not contained in `[0, 1]`.
    pub fn two_point(p1: OPoint<T, D>, p2: OPoint<T, D>, w: T) -> Self {
        Self::from_weights_and_points(vec![T::one() - w, w], vec![p1, p2])
    }

    pub fn into_weights_and_points(self) -> (Vec<T>, Vec<OPoint<T, D>>) {
        (self.weights, self.points)
    }
}

impl<T, D> Quadrature<T, D> for WeightedPointSet<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T] {
        &self.weights
    }

    fn points(&self) -> &[OPoint<T, D>] {
        &self.points
    }
}
