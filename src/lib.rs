//! Chart-based manifold geometry for finite element meshes.
//!
//! The central abstraction is the [`Manifold`](manifold::Manifold): given a weighted set of
//! existing points, it determines where a new point on a curved (or straight) geometric
//! feature is placed. Manifolds expressible through a chart implement
//! [`ChartManifold`](manifold::ChartManifold) and get chart-space averaging with periodic
//! wraparound through [`chart_new_point`](manifold::chart_new_point).
//!
//! The [`mesh::refinement`] module uses manifolds to place the vertices created by uniform
//! refinement, e.g. to keep a refined circle or sphere round.
pub mod connectivity;
pub mod error;
pub mod manifold;
pub mod mesh;
pub mod quadrature;

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate nalgebra;

pub use manifem_traits::Real;
