//! Helper traits for allocator trait bounds.
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, Scalar};

/// An allocator for a single dimension.
///
/// Covers points and vectors in ambient or chart space. Generic `manifem` routines name this
/// alias instead of spelling out the individual nalgebra allocator bounds.
pub trait DimAllocator<T: Scalar, D: DimName>: Allocator<T, D> {}

impl<T, D> DimAllocator<T, D> for DefaultAllocator
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
}
