use crate::error::ManifoldError;
use crate::quadrature::Quadrature;
use itertools::izip;
use manifem_traits::allocators::DimAllocator;
use manifem_traits::Real;
use nalgebra::{DefaultAllocator, DimName, OPoint, OVector};
use numeric_literals::replace_float_literals;

/// A manifold described by a two-way map between ambient coordinates and chart coordinates.
///
/// The chart has the same dimension as the ambient space. Chart axes may be periodic, in which
/// case [`periodicity`](Self::periodicity) holds the (positive) period of that axis. Axes with
/// period zero are not periodic.
///
/// Implementors typically implement [`Manifold`](super::Manifold) by delegating to
/// [`chart_new_point`], possibly overriding it where averaging in the chart is ill-conditioned.
pub trait ChartManifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Maps chart coordinates to ambient coordinates.
    ///
    /// Must be a left inverse of [`pull_back`](Self::pull_back) away from chart singularities.
    fn push_forward(&self, chart_point: &OPoint<T, D>) -> OPoint<T, D>;

    /// Maps ambient coordinates to chart coordinates.
    fn pull_back(&self, space_point: &OPoint<T, D>) -> OPoint<T, D>;

    fn periodicity(&self) -> &OVector<T, D>;
}

/// Computes a new point by averaging in the chart of the given manifold.
///
/// Every point is pulled back to the chart, where the weighted average is formed and then
/// pushed forward again. Periodic chart axes are averaged with wraparound: before averaging,
/// coordinates lying more than half a period above the smallest coordinate are shifted down by
/// one period, and the averaged coordinate is wrapped back into `[0, period)`.
///
/// # Panics
///
/// Panics if the weighted point set is empty, if the number of weights does not match the
/// number of points, or if a weight is negative.
pub fn chart_new_point<T, D, M, Q>(manifold: &M, quadrature: &Q) -> OPoint<T, D>
where
    T: Real,
    D: DimName,
    M: ChartManifold<T, D> + ?Sized,
    Q: Quadrature<T, D> + ?Sized,
    DefaultAllocator: DimAllocator<T, D>,
{
    assert_valid_quadrature(quadrature);

    let mut chart_points: Vec<_> = quadrature
        .points()
        .iter()
        .map(|p| manifold.pull_back(p))
        .collect();

    let periodicity = manifold.periodicity();
    for (d, &period) in periodicity.iter().enumerate() {
        if period > T::zero() {
            unwrap_periodic_axis(&mut chart_points, d, period);
        }
    }

    let mut middle = OPoint::<T, D>::origin();
    for (&w, p) in izip!(quadrature.weights(), &chart_points) {
        middle.coords += &p.coords * w;
    }

    for (d, &period) in periodicity.iter().enumerate() {
        if period > T::zero() {
            middle[d] = wrap_into_period(middle[d], period);
        }
    }

    manifold.push_forward(&middle)
}

/// Shifts coordinates along axis `d` so that all of them lie within half a period of the
/// smallest one.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn unwrap_periodic_axis<T, D>(chart_points: &mut [OPoint<T, D>], d: usize, period: T)
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    let min = match chart_points.iter().map(|p| p[d]).reduce(|a, b| a.min(b)) {
        Some(min) => min,
        None => return,
    };
    for p in chart_points {
        if p[d] - min > period / 2.0 {
            p[d] -= period;
        }
    }
}

/// Wraps `value` into `[0, period)`.
///
/// Values that only round to `period` after shifting are mapped to zero, so that the upper
/// bound stays exclusive.
pub(crate) fn wrap_into_period<T: Real>(value: T, period: T) -> T {
    let wrapped = value - period * (value / period).floor();
    if wrapped >= period || wrapped < T::zero() {
        T::zero()
    } else {
        wrapped
    }
}

pub(crate) fn assert_valid_quadrature<T, D, Q>(quadrature: &Q)
where
    T: Real,
    D: DimName,
    Q: Quadrature<T, D> + ?Sized,
    DefaultAllocator: DimAllocator<T, D>,
{
    let (num_weights, num_points) = (quadrature.weights().len(), quadrature.points().len());
    assert_eq!(
        num_weights,
        num_points,
        "{}",
        ManifoldError::LengthMismatch {
            weights: num_weights,
            points: num_points
        }
    );
    assert!(num_points > 0, "{}", ManifoldError::EmptyQuadrature);
    if let Some((index, weight)) = quadrature.weights().iter().enumerate().find(|(_, w)| **w < T::zero()) {
        panic!(
            "{}",
            ManifoldError::NegativeWeight {
                index,
                weight: weight.to_subset().unwrap_or(f64::NAN)
            }
        );
    }
}
