//! Manifolds describing curved geometry that mesh refinement must respect.
//!
//! A [`Manifold`] answers a single question: given a weighted set of existing points, where
//! should a new point be placed? For straight-sided geometry the answer is the weighted
//! centroid ([`FlatManifold`]). For curved geometry the averaging is typically carried out in a
//! *chart* (see [`ChartManifold`]), in which the geometry is flatter than in ambient space.
//! [`SphericalManifold`] describes circles, spheres and the shells between them.
use crate::quadrature::Quadrature;
use manifem_traits::allocators::DimAllocator;
use manifem_traits::Real;
use nalgebra::{DefaultAllocator, DimName, OPoint};

mod chart;
mod flat;
mod spherical;

pub use chart::*;
pub use flat::*;
pub use spherical::*;

/// A geometric feature (boundary or interior region) on which new mesh points are placed.
pub trait Manifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Computes a new point on the manifold from a weighted set of ambient points.
    ///
    /// The weights are expected to be non-negative and to sum to one.
    ///
    /// # Panics
    ///
    /// Implementations panic if the weighted point set is empty, if the number of weights
    /// does not match the number of points, or if a weight is negative.
    fn get_new_point<Q>(&self, quadrature: &Q) -> OPoint<T, D>
    where
        Q: Quadrature<T, D> + ?Sized;

    /// Computes the point at parameter `w` between `p1` and `p2`, i.e. the new point for the
    /// weighted set `[(p1, 1 - w), (p2, w)]`.
    ///
    /// With `w = 1/2` this is the point used when bisecting an edge on the manifold.
    ///
    /// # Panics
    ///
    /// Panics if `w` is not contained in `[0, 1]`.
    fn get_intermediate_point(&self, p1: &OPoint<T, D>, p2: &OPoint<T, D>, w: T) -> OPoint<T, D> {
        assert!(
            w >= T::zero() && w <= T::one(),
            "Intermediate point parameter must be in [0, 1], got {:?}.",
            w
        );
        let quadrature = ([T::one() - w, w], [p1.clone(), p2.clone()]);
        self.get_new_point(&quadrature)
    }
}

impl<T, D, M> Manifold<T, D> for &M
where
    T: Real,
    D: DimName,
    M: Manifold<T, D>,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn get_new_point<Q>(&self, quadrature: &Q) -> OPoint<T, D>
    where
        Q: Quadrature<T, D> + ?Sized,
    {
        M::get_new_point(self, quadrature)
    }
}
