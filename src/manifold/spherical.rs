use crate::error::ManifoldError;
use crate::manifold::chart::{assert_valid_quadrature, wrap_into_period};
use crate::manifold::{chart_new_point, ChartManifold, Manifold};
use crate::quadrature::Quadrature;
use log::warn;
use manifem_traits::allocators::DimAllocator;
use manifem_traits::Real;
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint, OVector, Scalar, U2, U3};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

/// Polar (2D) or spherical (3D) coordinates around a fixed center.
///
/// Chart coordinates are ordered as `(rho, theta)` in 2D and `(rho, theta, phi)` in 3D, where
/// `rho` is the distance to the center, `theta` the polar angle and `phi` the azimuthal angle.
/// In 2D, `theta` is measured counter-clockwise from the positive x-axis and lies in
/// `[0, 2pi)`. In 3D, `theta` is measured from the positive z-axis and lies in `[0, pi]`, while
/// `phi` lies in `[0, 2pi)`. The last chart axis is periodic with period `2pi`.
///
/// The manifold describes every sphere around `center` simultaneously, so it can be attached to
/// circular or spherical boundaries as well as to the interior of balls and shells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "SphericalManifoldParams<T, D>",
    into = "SphericalManifoldParams<T, D>",
    bound(
        serialize = "OPoint<T, D>: Serialize",
        deserialize = "T: Real, OPoint<T, D>: Deserialize<'de>"
    )
)]
pub struct SphericalManifold<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    center: OPoint<T, D>,
    periodicity: OVector<T, D>,
}

pub type PolarManifold<T> = SphericalManifold<T, U2>;
pub type SphericalManifold3d<T> = SphericalManifold<T, U3>;

/// Serialized form of a [`SphericalManifold`]. The periodicity is derived, not stored.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "OPoint<T, D>: Serialize",
    deserialize = "OPoint<T, D>: Deserialize<'de>"
))]
struct SphericalManifoldParams<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    center: OPoint<T, D>,
}

impl<T, D> From<SphericalManifold<T, D>> for SphericalManifoldParams<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    fn from(manifold: SphericalManifold<T, D>) -> Self {
        Self {
            center: manifold.center,
        }
    }
}

impl<T, D> TryFrom<SphericalManifoldParams<T, D>> for SphericalManifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    type Error = ManifoldError;

    fn try_from(params: SphericalManifoldParams<T, D>) -> Result<Self, Self::Error> {
        Self::try_new(params.center)
    }
}

impl<T, D> SphericalManifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Radii at or below this threshold are treated as the center itself.
    pub const RADIUS_TOLERANCE: f64 = 1e-10;

    /// Returns an error if the ambient dimension is less than two.
    pub fn try_new(center: OPoint<T, D>) -> Result<Self, ManifoldError> {
        if D::dim() < 2 {
            return Err(ManifoldError::ImpossibleInDimension { dim: D::dim() });
        }
        Ok(Self {
            center,
            periodicity: Self::compute_periodicity(),
        })
    }

    /// # Panics
    ///
    /// Panics if the ambient dimension is less than two.
    pub fn new(center: OPoint<T, D>) -> Self {
        Self::try_new(center).unwrap_or_else(|err| panic!("{}", err))
    }

    pub fn center(&self) -> &OPoint<T, D> {
        &self.center
    }

    fn compute_periodicity() -> OVector<T, D> {
        let mut periodicity = OVector::zeros();
        periodicity[D::dim() - 1] = T::two_pi();
        periodicity
    }

    fn radius_tolerance() -> T {
        T::from_f64(Self::RADIUS_TOLERANCE).expect("Literal must fit in T")
    }

    /// Places the new point on the sphere whose radius is the weighted average of the distances
    /// to the center, in the direction of the weighted Cartesian centroid.
    ///
    /// If the centroid (nearly) coincides with the center it carries no direction, and the
    /// chart average is used instead. This requires a chart, so in dimensions above 3 it
    /// panics unless all points sit at the center.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn project_weighted_centroid<Q>(&self, quadrature: &Q) -> OPoint<T, D>
    where
        Q: Quadrature<T, D> + ?Sized,
    {
        assert_valid_quadrature(quadrature);

        let mut rho_average = 0.0;
        let mut mid_point = OVector::<T, D>::zeros();
        for (&w, p) in quadrature.iter() {
            rho_average += w * (p - &self.center).norm();
            mid_point += &p.coords * w;
        }

        let r = mid_point - &self.center.coords;
        let r_norm = r.norm();
        if r_norm <= Self::radius_tolerance() * rho_average.max(1.0) {
            // All points sit at the center
            if rho_average <= Self::radius_tolerance() {
                return self.center.clone();
            }
            if D::dim() > 3 {
                panic!("{}", ManifoldError::UnsupportedDimension { dim: D::dim() });
            }
            warn!(
                "Weighted centroid coincides with sphere center {:?} (average radius {:?}). \
                 Falling back to averaging in spherical coordinates.",
                self.center, rho_average
            );
            return chart_new_point(self, quadrature);
        }

        &self.center + r * (rho_average / r_norm)
    }
}

impl<T, D> ChartManifold<T, D> for SphericalManifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// # Panics
    ///
    /// Panics if the radius coordinate is negative, or if the ambient dimension is neither
    /// 2 nor 3 (unless the radius is below [`RADIUS_TOLERANCE`](Self::RADIUS_TOLERANCE)).
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn push_forward(&self, spherical_point: &OPoint<T, D>) -> OPoint<T, D> {
        let rho = spherical_point[0];
        assert!(
            rho >= 0.0,
            "{}",
            ManifoldError::NegativeRadius {
                radius: rho.to_subset().unwrap_or(f64::NAN)
            }
        );
        let theta = spherical_point[1];

        // The angles carry no information at the center
        let mut r = OVector::<T, D>::zeros();
        if rho > Self::radius_tolerance() {
            match D::dim() {
                2 => {
                    r[0] = rho * theta.cos();
                    r[1] = rho * theta.sin();
                }
                3 => {
                    let phi = spherical_point[2];
                    r[0] = rho * theta.sin() * phi.cos();
                    r[1] = rho * theta.sin() * phi.sin();
                    r[2] = rho * theta.cos();
                }
                dim => panic!("{}", ManifoldError::UnsupportedDimension { dim }),
            }
        }
        &self.center + r
    }

    /// # Panics
    ///
    /// Panics if the ambient dimension is neither 2 nor 3.
    fn pull_back(&self, space_point: &OPoint<T, D>) -> OPoint<T, D> {
        let r = space_point - &self.center;
        let rho = r.norm();
        let (x, y) = (r[0], r[1]);

        let mut p = OPoint::<T, D>::origin();
        p[0] = rho;
        match D::dim() {
            2 => {
                p[1] = wrap_into_period(y.atan2(x), T::two_pi());
            }
            3 => {
                let z = r[2];
                // phi
                p[2] = wrap_into_period(y.atan2(x), T::two_pi());
                // theta
                p[1] = (x * x + y * y).sqrt().atan2(z);
            }
            dim => panic!("{}", ManifoldError::UnsupportedDimension { dim }),
        }
        p
    }

    fn periodicity(&self) -> &OVector<T, D> {
        &self.periodicity
    }
}

impl<T, D> Manifold<T, D> for SphericalManifold<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// In 2D, the new point is the average in polar coordinates (with wraparound of the angle).
    ///
    /// In 3D, the new point lies at distance `sum_i w_i |p_i - c|` from the center `c`, in the
    /// direction of the weighted Cartesian centroid `sum_i w_i p_i`. This is not the geodesic
    /// centroid when the points are far apart, but it does not involve any angles and so
    /// behaves the same everywhere on the sphere. Higher dimensions use the same projection.
    ///
    /// # Panics
    ///
    /// In dimensions above 3, panics if the weighted centroid coincides with the center while
    /// the points do not.
    fn get_new_point<Q>(&self, quadrature: &Q) -> OPoint<T, D>
    where
        Q: Quadrature<T, D> + ?Sized,
    {
        if D::dim() == 2 {
            chart_new_point(self, quadrature)
        } else {
            self.project_weighted_centroid(quadrature)
        }
    }
}
