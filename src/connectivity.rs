//! Cell connectivity for the meshes that are refined on manifolds.
//!
//! Connectivities only store vertex indices; they are independent of the ambient dimension,
//! so the same triangle connectivity serves planar meshes and surface meshes in 3D.
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

pub trait Connectivity: Clone {
    fn vertex_indices(&self) -> &[usize];
}

/// Connectivity for a two-node line segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SegmentConnectivity(pub [usize; 2]);

impl Connectivity for SegmentConnectivity {
    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }
}

impl Deref for SegmentConnectivity {
    type Target = [usize; 2];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SegmentConnectivity {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Connectivity for a three-node triangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TriangleConnectivity(pub [usize; 3]);

impl Connectivity for TriangleConnectivity {
    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }
}

impl Deref for TriangleConnectivity {
    type Target = [usize; 3];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TriangleConnectivity {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
