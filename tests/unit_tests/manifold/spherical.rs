use manifem::error::ManifoldError;
use manifem::manifold::{ChartManifold, Manifold, PolarManifold, SphericalManifold, SphericalManifold3d};
use manifem::proptest::{partition_of_unity, point2, point3, polar_chart_point, spherical_chart_point};
use manifem::quadrature::WeightedPointSet;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq, prop_assert_matrix_eq, prop_assert_scalar_eq};
use nalgebra::{point, vector, Point1, Point2, Point3, Point4, U1, U3, U4};
use proptest::collection::vec;
use proptest::prelude::*;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};
use util::{angular_distance, assert_panics};

#[test]
fn spherical_manifold_is_impossible_in_1d() {
    let result = SphericalManifold::<f64, U1>::try_new(Point1::new(0.0));
    assert!(matches!(result, Err(ManifoldError::ImpossibleInDimension { dim: 1 })));
    assert_panics!(SphericalManifold::<f64, U1>::new(Point1::new(0.0)));
}

#[test]
fn spherical_manifold_periodicity() {
    let polar = PolarManifold::new(point![1.0, 2.0]);
    assert_eq!(polar.periodicity(), &vector![0.0, 2.0 * PI]);

    let spherical = SphericalManifold3d::new(point![1.0, 2.0, 3.0]);
    assert_eq!(spherical.periodicity(), &vector![0.0, 0.0, 2.0 * PI]);
    assert_eq!(spherical.center(), &point![1.0, 2.0, 3.0]);
}

#[test]
fn polar_push_forward_and_pull_back() {
    let manifold = PolarManifold::new(point![1.0, 2.0]);

    let p = manifold.push_forward(&point![2.0, FRAC_PI_2]);
    assert_matrix_eq!(p.coords, vector![1.0, 4.0], comp = abs, tol = 1e-14);

    // Straight below the center
    let chart = manifold.pull_back(&point![1.0, 1.0]);
    assert_matrix_eq!(chart.coords, vector![1.0, 3.0 * FRAC_PI_2], comp = abs, tol = 1e-14);
}

#[test]
fn spherical_push_forward_and_pull_back() {
    let manifold = SphericalManifold3d::new(Point3::origin());

    let p = manifold.push_forward(&point![1.0, FRAC_PI_2, 0.0]);
    assert_matrix_eq!(p.coords, vector![1.0, 0.0, 0.0], comp = abs, tol = 1e-14);
    let p = manifold.push_forward(&point![2.0, 0.0, 1.234]);
    assert_matrix_eq!(p.coords, vector![0.0, 0.0, 2.0], comp = abs, tol = 1e-14);
    let p = manifold.push_forward(&point![3.0, FRAC_PI_2, FRAC_PI_2]);
    assert_matrix_eq!(p.coords, vector![0.0, 3.0, 0.0], comp = abs, tol = 1e-14);

    let chart = manifold.pull_back(&point![0.0, 0.0, -3.0]);
    assert_matrix_eq!(chart.coords, vector![3.0, PI, 0.0], comp = abs, tol = 1e-14);
    let chart = manifold.pull_back(&point![0.0, -2.0, 0.0]);
    assert_matrix_eq!(chart.coords, vector![2.0, FRAC_PI_2, 3.0 * FRAC_PI_2], comp = abs, tol = 1e-14);
}

#[test]
fn push_forward_at_degenerate_radius_returns_center() {
    let polar = PolarManifold::new(point![1.0, 2.0]);
    assert_eq!(polar.push_forward(&point![0.0, 1.3]), point![1.0, 2.0]);
    assert_eq!(polar.push_forward(&point![1e-11, 1.3]), point![1.0, 2.0]);

    let spherical = SphericalManifold3d::new(point![1.0, 2.0, 3.0]);
    assert_eq!(spherical.push_forward(&point![1e-11, 1.3, 4.0]), point![1.0, 2.0, 3.0]);
}

#[test]
fn push_forward_rejects_negative_radius() {
    let polar = PolarManifold::new(Point2::origin());
    assert_panics!(polar.push_forward(&point![-1.0, 0.0]));

    let spherical = SphericalManifold3d::new(Point3::origin());
    assert_panics!(spherical.push_forward(&point![-1e-12, 0.0, 0.0]));
}

#[test]
fn pull_back_angle_is_wrapped_below_two_pi() {
    let manifold = PolarManifold::new(Point2::origin());
    // atan2 returns a tiny negative angle here, which must not be wrapped to exactly 2 pi
    let chart = manifold.pull_back(&point![1.0, -1e-17]);
    assert!(chart[1] >= 0.0 && chart[1] < 2.0 * PI, "theta = {}", chart[1]);
}

#[test]
fn chart_maps_panic_in_unsupported_dimensions() {
    let manifold = SphericalManifold::<f64, U4>::new(Point4::origin());
    assert_panics!(manifold.push_forward(&Point4::new(1.0, 0.0, 0.0, 0.0)));
    assert_panics!(manifold.pull_back(&Point4::new(1.0, 0.0, 0.0, 0.0)));

    // The angles are irrelevant at the center
    assert_eq!(manifold.push_forward(&Point4::origin()), Point4::origin());
}

#[test]
fn centroid_projection_in_higher_dimensions() {
    let manifold = SphericalManifold::<f64, U4>::new(Point4::origin());
    let p = manifold.get_intermediate_point(&Point4::new(1.0, 0.0, 0.0, 0.0), &Point4::new(0.0, 1.0, 0.0, 0.0), 0.5);
    assert_matrix_eq!(
        p.coords,
        vector![FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0, 0.0],
        comp = abs,
        tol = 1e-14
    );
}

#[test]
fn centroid_projection_in_higher_dimensions_without_direction() {
    let manifold = SphericalManifold::<f64, U4>::new(Point4::origin());

    let p = manifold.get_new_point(&([1.0], [Point4::<f64>::origin()]));
    assert_eq!(p, Point4::origin());

    let (p1, p2) = (Point4::new(1.0, 0.0, 0.0, 0.0), Point4::new(-1.0, 0.0, 0.0, 0.0));
    assert_panics!(manifold.get_intermediate_point(&p1, &p2, 0.5));
}

#[test]
fn polar_new_point_wraps_around_angle_seam() {
    let manifold = PolarManifold::new(Point2::origin());
    let p1 = manifold.push_forward(&point![1.0, 0.01]);
    let p2 = manifold.push_forward(&point![1.0, 6.27]);

    let p = manifold.get_intermediate_point(&p1, &p2, 0.5);
    let theta = manifold.pull_back(&p)[1];
    // The naive average of the angles would be close to pi
    assert!(angular_distance(theta, 0.0) < 0.01, "theta = {}", theta);

    let expected_angle = (0.01 + (6.27 - 2.0 * PI)) / 2.0;
    assert_matrix_eq!(
        p.coords,
        vector![expected_angle.cos(), expected_angle.sin()],
        comp = abs,
        tol = 1e-12
    );
}

#[test]
fn polar_new_point_on_quarter_circle() {
    let center = point![-1.0, 3.0];
    let manifold = PolarManifold::new(center);
    let p = manifold.get_intermediate_point(&(center + vector![2.0, 0.0]), &(center + vector![0.0, 2.0]), 0.5);
    assert_matrix_eq!(
        p.coords,
        center.coords + vector![2.0 * FRAC_1_SQRT_2, 2.0 * FRAC_1_SQRT_2],
        comp = abs,
        tol = 1e-12
    );
}

#[test]
fn spherical_new_point_between_orthogonal_unit_vectors() {
    let manifold = SphericalManifold3d::new(Point3::origin());
    let quadrature = WeightedPointSet::two_point(point![1.0, 0.0, 0.0], point![0.0, 1.0, 0.0], 0.5);
    let p = manifold.get_new_point(&quadrature);
    assert_matrix_eq!(p.coords, vector![FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0], comp = abs, tol = 1e-14);
}

#[test]
fn spherical_new_point_with_offset_center() {
    let center = point![1.0, 2.0, 3.0];
    let manifold = SphericalManifold3d::new(center);
    let (p1, p2) = (center + vector![2.0, 0.0, 0.0], center + vector![0.0, 0.0, 2.0]);
    let p = manifold.get_intermediate_point(&p1, &p2, 0.5);
    let expected = center.coords + vector![2.0 * FRAC_1_SQRT_2, 0.0, 2.0 * FRAC_1_SQRT_2];
    assert_matrix_eq!(p.coords, expected, comp = abs, tol = 1e-14);
}

#[test]
fn spherical_new_point_for_antipodal_points() {
    // The weighted centroid is the center itself and carries no direction
    let manifold = SphericalManifold3d::new(Point3::<f64>::origin());
    let p = manifold.get_intermediate_point(&point![1.0, 0.0, 0.0], &point![-1.0, 0.0, 0.0], 0.5);
    assert!(p.coords.iter().all(|x| x.is_finite()));
    assert_scalar_eq!(p.coords.norm(), 1.0, comp = abs, tol = 1e-12);
    assert_matrix_eq!(p.coords, vector![0.0, 1.0, 0.0], comp = abs, tol = 1e-12);
}

#[test]
fn spherical_new_point_for_points_at_center() {
    let center = point![1.0, 2.0, 3.0];
    let manifold = SphericalManifold3d::new(center);
    let p = manifold.get_intermediate_point(&center, &center, 0.5);
    assert_eq!(p, center);
}

#[test]
fn spherical_new_point_rejects_invalid_quadrature() {
    let manifold = SphericalManifold3d::new(Point3::origin());
    let p = point![1.0, 0.0, 0.0];
    assert_panics!(manifold.get_new_point(&(vec![0.5, 0.5], vec![p])));
    assert_panics!(manifold.get_new_point(&(Vec::<f64>::new(), Vec::<Point3<f64>>::new())));
    // The total weight is negative, which would place the point on the far side of the center
    assert_panics!(manifold.get_new_point(&([-0.5, 0.25], [p, point![0.0, 1.0, 0.0]])));
}

#[test]
fn spherical_manifold_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PolarManifold<f64>>();
    assert_send_sync::<SphericalManifold<f64, U3>>();
}

#[test]
fn spherical_manifold_serde_round_trip() {
    let manifold = SphericalManifold3d::new(point![1.0, 2.0, 3.0]);
    let json = serde_json::to_string(&manifold).unwrap();
    assert!(!json.contains("periodicity"));

    let deserialized: SphericalManifold3d<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, manifold);
    assert_eq!(deserialized.periodicity(), &vector![0.0, 0.0, 2.0 * PI]);
}

#[test]
fn spherical_manifold_deserialization_rejects_1d() {
    let json = serde_json::json!({ "center": Point1::new(0.0) });
    let result = serde_json::from_value::<SphericalManifold<f64, U1>>(json);
    assert!(result.is_err());
}

fn points_and_weights<S>(point: S) -> impl Strategy<Value = (Vec<S::Value>, Vec<f64>)>
where
    S: Strategy + Clone,
    S::Value: Clone,
{
    vec(point, 1..6).prop_flat_map(|points| {
        let n = points.len();
        (Just(points), partition_of_unity(n))
    })
}

proptest! {
    #[test]
    fn polar_pull_back_push_forward_round_trip(center in point2(), p in point2()) {
        prop_assume!((p - center).norm() > 1e-6);
        let manifold = PolarManifold::new(center);
        let q = manifold.push_forward(&manifold.pull_back(&p));
        prop_assert_matrix_eq!(q.coords, p.coords, comp = abs, tol = 1e-10);
    }

    #[test]
    fn spherical_pull_back_push_forward_round_trip(center in point3(), p in point3()) {
        prop_assume!((p - center).norm() > 1e-6);
        let manifold = SphericalManifold3d::new(center);
        let q = manifold.push_forward(&manifold.pull_back(&p));
        prop_assert_matrix_eq!(q.coords, p.coords, comp = abs, tol = 1e-10);
    }

    #[test]
    fn polar_push_forward_pull_back_round_trip(center in point2(), chart in polar_chart_point()) {
        prop_assume!(chart[0] > 1e-6);
        let manifold = PolarManifold::new(center);
        let pulled = manifold.pull_back(&manifold.push_forward(&chart));
        prop_assert_scalar_eq!(pulled[0], chart[0], comp = abs, tol = 1e-10);
        prop_assert!(angular_distance(pulled[1], chart[1]) < 1e-8);
    }

    #[test]
    fn polar_pull_back_angle_range(center in point2(), p in point2()) {
        let manifold = PolarManifold::new(center);
        let chart = manifold.pull_back(&p);
        prop_assert!(chart[0] >= 0.0);
        prop_assert!(chart[1] >= 0.0 && chart[1] < 2.0 * PI);
    }

    #[test]
    fn spherical_pull_back_angle_ranges(center in point3(), p in point3()) {
        let manifold = SphericalManifold3d::new(center);
        let chart = manifold.pull_back(&p);
        prop_assert!(chart[0] >= 0.0);
        prop_assert!(chart[1] >= 0.0 && chart[1] <= PI);
        prop_assert!(chart[2] >= 0.0 && chart[2] < 2.0 * PI);
    }

    #[test]
    fn spherical_push_forward_preserves_radius(center in point3(), chart in spherical_chart_point()) {
        let manifold = SphericalManifold3d::new(center);
        let p = manifold.push_forward(&chart);
        let expected_radius = if chart[0] <= 1e-10 { 0.0 } else { chart[0] };
        prop_assert_scalar_eq!((p - center).norm(), expected_radius, comp = abs, tol = 1e-10);
    }

    #[test]
    fn polar_new_point_of_single_point_is_identity(center in point2(), p in point2()) {
        prop_assume!((p - center).norm() > 1e-6);
        let manifold = PolarManifold::new(center);
        let q = manifold.get_new_point(&([1.0], [p]));
        prop_assert_matrix_eq!(q.coords, p.coords, comp = abs, tol = 1e-10);
    }

    #[test]
    fn spherical_new_point_of_single_point_is_identity(center in point3(), p in point3()) {
        prop_assume!((p - center).norm() > 1e-6);
        let manifold = SphericalManifold3d::new(center);
        let q = manifold.get_new_point(&([1.0], [p]));
        prop_assert_matrix_eq!(q.coords, p.coords, comp = abs, tol = 1e-10);
    }

    #[test]
    fn polar_new_point_preserves_average_radius(
        center in point2(),
        (angles, weights) in points_and_weights(0.0..2.0 * PI),
        radius in 0.1..10.0
    ) {
        let manifold = PolarManifold::new(center);
        let points: Vec<_> = angles
            .iter()
            .map(|&theta| manifold.push_forward(&point![radius, theta]))
            .collect();
        let p = manifold.get_new_point(&(&weights, &points));
        prop_assert_scalar_eq!((p - center).norm(), radius, comp = abs, tol = 1e-9);
    }

    #[test]
    fn spherical_new_point_preserves_average_radius(
        center in point3(),
        (angles, weights) in points_and_weights((0.0..=PI, 0.0..2.0 * PI)),
        radius in 0.1..10.0
    ) {
        let manifold = SphericalManifold3d::new(center);
        let points: Vec<_> = angles
            .iter()
            .map(|&(theta, phi)| manifold.push_forward(&point![radius, theta, phi]))
            .collect();
        let p = manifold.get_new_point(&(&weights, &points));
        prop_assert_scalar_eq!((p - center).norm(), radius, comp = abs, tol = 1e-9);
    }
}
