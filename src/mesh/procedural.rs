//! Coarse meshes of curved domains, intended as starting points for refinement on a manifold.
use crate::connectivity::{SegmentConnectivity, TriangleConnectivity};
use crate::mesh::{SegmentMesh2d, TriangleMesh3d};
use manifem_traits::Real;
use nalgebra::{Point2, Point3, Vector2, Vector3};

/// A closed polyline with `num_segments` vertices evenly distributed on the given circle.
///
/// Vertex `i` is placed at angle `2 pi i / num_segments`, measured counter-clockwise from the
/// positive x-axis, and segment `i` connects vertex `i` with vertex `i + 1` (cyclically).
///
/// # Panics
///
/// Panics if `num_segments < 3` or if the radius is not positive.
pub fn create_circle_segment_mesh<T>(center: &Point2<T>, radius: T, num_segments: usize) -> SegmentMesh2d<T>
where
    T: Real,
{
    assert!(num_segments >= 3, "A circle needs at least three segments.");
    assert!(radius > T::zero(), "Radius must be positive.");

    let n = T::from_usize(num_segments).expect("Must be able to fit usize in T");
    let vertices = (0..num_segments)
        .map(|i| {
            let i = T::from_usize(i).expect("Must be able to fit usize in T");
            let angle = T::two_pi() * i / n;
            center + Vector2::new(angle.cos(), angle.sin()) * radius
        })
        .collect();
    let segments = (0..num_segments)
        .map(|i| SegmentConnectivity([i, (i + 1) % num_segments]))
        .collect();
    SegmentMesh2d::from_vertices_and_connectivity(vertices, segments)
}

/// The surface of an octahedron inscribed in the given sphere.
///
/// The six vertices lie on the coordinate axes through the center, in the order
/// `+x, -x, +y, -y, +z, -z`. All eight triangles are oriented counter-clockwise when seen from
/// outside the sphere.
///
/// # Panics
///
/// Panics if the radius is not positive.
pub fn create_octahedron_sphere_mesh<T>(center: &Point3<T>, radius: T) -> TriangleMesh3d<T>
where
    T: Real,
{
    assert!(radius > T::zero(), "Radius must be positive.");

    let vertices = vec![
        center + Vector3::x() * radius,
        center - Vector3::x() * radius,
        center + Vector3::y() * radius,
        center - Vector3::y() * radius,
        center + Vector3::z() * radius,
        center - Vector3::z() * radius,
    ];
    let triangles = vec![
        TriangleConnectivity([0, 2, 4]),
        TriangleConnectivity([2, 1, 4]),
        TriangleConnectivity([1, 3, 4]),
        TriangleConnectivity([3, 0, 4]),
        TriangleConnectivity([2, 0, 5]),
        TriangleConnectivity([1, 2, 5]),
        TriangleConnectivity([3, 1, 5]),
        TriangleConnectivity([0, 3, 5]),
    ];
    TriangleMesh3d::from_vertices_and_connectivity(vertices, triangles)
}
