use crate::connectivity::{Connectivity, SegmentConnectivity, TriangleConnectivity};
use eyre::eyre;
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint, Scalar, U2, U3};
use serde::{Deserialize, Serialize};

pub mod procedural;
pub mod refinement;

/// Index-based data structure for conforming meshes (i.e. no hanging nodes).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Mesh<T: Scalar, D, C>
where
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    // serde's not able correctly determine the necessary trait bounds in this case,
    // so write our own
    #[serde(bound(
        serialize = "<DefaultAllocator as Allocator<T, D>>::Buffer: Serialize",
        deserialize = "<DefaultAllocator as Allocator<T, D>>::Buffer: Deserialize<'de>"
    ))]
    vertices: Vec<OPoint<T, D>>,
    #[serde(bound(serialize = "C: Serialize", deserialize = "C: Deserialize<'de>"))]
    connectivity: Vec<C>,
}

/// Closed or open polylines, e.g. the boundary of a disk.
pub type SegmentMesh2d<T> = Mesh<T, U2, SegmentConnectivity>;
pub type SegmentMesh3d<T> = Mesh<T, U3, SegmentConnectivity>;
pub type TriangleMesh2d<T> = Mesh<T, U2, TriangleConnectivity>;
/// Triangulated surfaces embedded in 3D, e.g. the boundary of a ball.
pub type TriangleMesh3d<T> = Mesh<T, U3, TriangleConnectivity>;

impl<T, D, C> Mesh<T, D, C>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    pub fn vertices_mut(&mut self) -> &mut [OPoint<T, D>] {
        &mut self.vertices
    }

    pub fn vertices(&self) -> &[OPoint<T, D>] {
        &self.vertices
    }

    pub fn connectivity(&self) -> &[C] {
        &self.connectivity
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_cells(&self) -> usize {
        self.connectivity.len()
    }

    /// Construct a mesh from vertices and connectivity.
    ///
    /// The connectivity is not checked here. Routines that consume the mesh, such as
    /// [`refinement::refine_mesh`], check that every referenced vertex index is in bounds.
    pub fn from_vertices_and_connectivity(vertices: Vec<OPoint<T, D>>, connectivity: Vec<C>) -> Self {
        Self { vertices, connectivity }
    }
}

impl<T, D, C> Mesh<T, D, C>
where
    T: Scalar,
    D: DimName,
    C: Connectivity,
    DefaultAllocator: Allocator<T, D>,
{
    /// Returns an error naming the first cell that references a vertex out of bounds.
    pub fn check_connectivity(&self) -> eyre::Result<()> {
        let num_vertices = self.num_vertices();
        for (cell_index, cell) in self.connectivity.iter().enumerate() {
            if let Some(vertex_index) = cell
                .vertex_indices()
                .iter()
                .find(|&&idx| idx >= num_vertices)
            {
                return Err(eyre!(
                    "Cell {} references vertex {}, but the mesh only has {} vertices",
                    cell_index,
                    vertex_index,
                    num_vertices
                ));
            }
        }
        Ok(())
    }
}
