//! Functionality and abstractions for mesh refinement on manifolds.
//!
//! Currently we only provide uniform refinement of segment and triangle meshes through
//! [`refine_mesh`] and [`UniformRefinement`]. Every vertex created by refinement is placed by a
//! [`Manifold`], so refining the boundary of a disk with a
//! [`SphericalManifold`](crate::manifold::SphericalManifold) keeps all new vertices on the circle.
use crate::connectivity::Connectivity;
use crate::manifold::Manifold;
use crate::mesh::Mesh;
use log::debug;
use manifem_traits::allocators::DimAllocator;
use manifem_traits::Real;
use nalgebra::{DefaultAllocator, DimName, OPoint};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::hash::Hash;

pub mod detail;

#[derive(Debug, Clone)]
pub struct InvalidVertexCount;

pub trait VertexRepresentation: Clone {
    /// Constructs the vertex represented by this label, placing any new vertex with the
    /// given manifold.
    fn construct_vertex<T, D, M>(&self, all_vertices: &[OPoint<T, D>], manifold: &M) -> OPoint<T, D>
    where
        T: Real,
        D: DimName,
        M: Manifold<T, D>,
        DefaultAllocator: DimAllocator<T, D>;
}

/// Defines a refinement scheme for a given connectivity.
pub trait RefineConnectivity<Connectivity> {
    /// An intermediate connectivity type that holds the necessary information
    /// to represent the connectivity in a manner independent of the index labeling of
    /// new vertices.
    ///
    /// This is generally an internal detail.
    type Intermediate;
    /// The resulting connectivity type after refinement.
    type OutputConnectivity;
    /// The kind of label used to define vertices in a globally consistent fashion.
    type VertexLabel: VertexRepresentation;

    /// For a given connectivity, produce a set of intermediate connectivities that represent
    /// refined connectivities.
    fn populate_refined_connectivity(&self, connectivity: &Connectivity, intermediates: &mut Vec<Self::Intermediate>);

    /// Populate a set of vertex labels associated with an intermediate connectivity.
    fn populate_vertex_labels(&self, intermediate: &Self::Intermediate, labels: &mut Vec<Self::VertexLabel>);

    /// Construct the final connectivity from an intermediate given final,
    /// globally consistent vertex indices.
    ///
    /// The implementation must succeed if the number of vertex indices is equal to the
    /// number of vertex labels associated with the intermediate, as defined by
    /// the number of vertex labels produced by
    /// [`populate_vertex_labels`](Self::populate_vertex_labels).
    fn construct_output_connectivity(
        &self,
        intermediate: &Self::Intermediate,
        vertex_indices: &[usize],
    ) -> Result<Self::OutputConnectivity, InvalidVertexCount>;
}

/// Splits segments in two and triangles in four, at edge midpoints.
pub struct UniformRefinement;

/// Refine a mesh with the provided refinement scheme, placing new vertices with the given
/// manifold.
///
/// Vertex indices of the refined mesh are assigned in the order in which the vertex labels are
/// first encountered, so the result is deterministic even though vertices are constructed
/// in parallel.
///
/// Returns an error if the mesh connectivity references vertices out of bounds.
pub fn refine_mesh<T, D, C, Refinement, M>(
    mesh: &Mesh<T, D, C>,
    refinement_scheme: Refinement,
    manifold: &M,
) -> eyre::Result<Mesh<T, D, Refinement::OutputConnectivity>>
where
    T: Real,
    D: DimName,
    C: Connectivity,
    Refinement: RefineConnectivity<C>,
    Refinement::VertexLabel: Eq + Hash + Sync,
    M: Manifold<T, D> + Sync,
    OPoint<T, D>: Send + Sync,
    DefaultAllocator: DimAllocator<T, D>,
{
    mesh.check_connectivity()?;

    let mut label_to_idx_map = FxHashMap::default();
    let mut labels_by_idx = Vec::new();

    let mut new_connectivity = Vec::new();

    // Local buffers
    let mut intermediates = Vec::new();
    let mut vertex_labels = Vec::new();
    let mut new_vertex_indices = Vec::new();
    for connectivity in mesh.connectivity() {
        intermediates.clear();
        refinement_scheme.populate_refined_connectivity(connectivity, &mut intermediates);
        for intermediate in &intermediates {
            vertex_labels.clear();
            new_vertex_indices.clear();
            refinement_scheme.populate_vertex_labels(intermediate, &mut vertex_labels);
            for label in &vertex_labels {
                let idx = label_to_idx_map.entry(label.clone()).or_insert_with(|| {
                    labels_by_idx.push(label.clone());
                    labels_by_idx.len() - 1
                });
                new_vertex_indices.push(*idx);
            }
            let new_cell_connectivity = refinement_scheme
                .construct_output_connectivity(intermediate, &new_vertex_indices)
                .expect("Must succeed since vertex label count is consistent with vertex index count");
            new_connectivity.push(new_cell_connectivity);
        }
    }

    let old_vertices = mesh.vertices();
    let new_vertices: Vec<_> = labels_by_idx
        .par_iter()
        .map(|label| label.construct_vertex(old_vertices, manifold))
        .collect();

    debug!(
        "Refined mesh from {} to {} vertices and from {} to {} cells",
        mesh.num_vertices(),
        new_vertices.len(),
        mesh.num_cells(),
        new_connectivity.len()
    );

    Ok(Mesh::from_vertices_and_connectivity(new_vertices, new_connectivity))
}

/// Apply one round of uniform mesh refinement on the given manifold.
///
/// This is a convenience function for `refine_mesh(mesh, UniformRefinement, manifold)`.
pub fn refine_uniformly<T, D, C, M>(mesh: &Mesh<T, D, C>, manifold: &M) -> eyre::Result<Mesh<T, D, C>>
where
    T: Real,
    D: DimName,
    C: Connectivity,
    UniformRefinement: RefineConnectivity<C, OutputConnectivity = C>,
    <UniformRefinement as RefineConnectivity<C>>::VertexLabel: Eq + Hash + Sync,
    M: Manifold<T, D> + Sync,
    OPoint<T, D>: Send + Sync,
    DefaultAllocator: DimAllocator<T, D>,
{
    refine_mesh(mesh, UniformRefinement, manifold)
}

/// Repeatedly applies uniform mesh refinement on the given manifold.
pub fn refine_uniformly_repeat<T, D, C, M>(
    mesh: &Mesh<T, D, C>,
    manifold: &M,
    repeat_times: usize,
) -> eyre::Result<Mesh<T, D, C>>
where
    T: Real,
    D: DimName,
    C: Connectivity,
    UniformRefinement: RefineConnectivity<C, OutputConnectivity = C>,
    <UniformRefinement as RefineConnectivity<C>>::VertexLabel: Eq + Hash + Sync,
    M: Manifold<T, D> + Sync,
    OPoint<T, D>: Send + Sync,
    DefaultAllocator: DimAllocator<T, D>,
{
    let mut mesh: Mesh<_, _, _> = mesh.clone();
    for _ in 0..repeat_times {
        mesh = refine_uniformly(&mesh, manifold)?;
    }
    Ok(mesh)
}
