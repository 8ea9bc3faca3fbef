//! Lower level details for refinement abstractions.

use crate::connectivity::{SegmentConnectivity, TriangleConnectivity};
use crate::manifold::Manifold;
use crate::mesh::refinement::{InvalidVertexCount, RefineConnectivity, UniformRefinement, VertexRepresentation};
use core::cmp::{max, min};
use core::hash::{Hash, Hasher};
use manifem_traits::allocators::DimAllocator;
use manifem_traits::Real;
use nalgebra::base::default_allocator::DefaultAllocator;
use nalgebra::base::dimension::DimName;
use nalgebra::OPoint;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VertexLabel(pub usize);

impl VertexRepresentation for VertexLabel {
    fn construct_vertex<T, D, M>(&self, all_vertices: &[OPoint<T, D>], _manifold: &M) -> OPoint<T, D>
    where
        T: Real,
        D: DimName,
        M: Manifold<T, D>,
        DefaultAllocator: DimAllocator<T, D>,
    {
        let &Self(vertex_idx) = self;
        all_vertices[vertex_idx].clone()
    }
}

/// The point halfway between two vertices, as measured by the manifold.
///
/// Labels compare equal regardless of the order of the two vertex indices.
#[derive(Debug, Copy, Clone, Eq)]
pub struct EdgeMidpointLabel(pub [usize; 2]);

impl EdgeMidpointLabel {
    fn canonical_vertex_indices(&self) -> [usize; 2] {
        let &EdgeMidpointLabel([a, b]) = self;
        [min(a, b), max(a, b)]
    }
}

impl VertexRepresentation for EdgeMidpointLabel {
    fn construct_vertex<T, D, M>(&self, all_vertices: &[OPoint<T, D>], manifold: &M) -> OPoint<T, D>
    where
        T: Real,
        D: DimName,
        M: Manifold<T, D>,
        DefaultAllocator: DimAllocator<T, D>,
    {
        // Canonical order, so that both cells sharing the edge would produce the same point
        let [a, b] = self
            .canonical_vertex_indices()
            .map(|idx| &all_vertices[idx]);
        manifold.get_intermediate_point(a, b, T::from_subset(&0.5))
    }
}

impl PartialEq for EdgeMidpointLabel {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_vertex_indices() == other.canonical_vertex_indices()
    }
}

impl Hash for EdgeMidpointLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_vertex_indices().hash(state)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexOrEdgeMidpointVertex {
    Vertex(VertexLabel),
    EdgeMidpoint(EdgeMidpointLabel),
}

impl From<VertexLabel> for VertexOrEdgeMidpointVertex {
    fn from(label: VertexLabel) -> Self {
        Self::Vertex(label)
    }
}

impl From<EdgeMidpointLabel> for VertexOrEdgeMidpointVertex {
    fn from(label: EdgeMidpointLabel) -> Self {
        Self::EdgeMidpoint(label)
    }
}

impl VertexRepresentation for VertexOrEdgeMidpointVertex {
    fn construct_vertex<T, D, M>(&self, all_vertices: &[OPoint<T, D>], manifold: &M) -> OPoint<T, D>
    where
        T: Real,
        D: DimName,
        M: Manifold<T, D>,
        DefaultAllocator: DimAllocator<T, D>,
    {
        match self {
            Self::Vertex(label) => label.construct_vertex(all_vertices, manifold),
            Self::EdgeMidpoint(label) => label.construct_vertex(all_vertices, manifold),
        }
    }
}

pub fn edge_midpoint(vertices: [usize; 2]) -> EdgeMidpointLabel {
    EdgeMidpointLabel(vertices)
}

pub fn vertex(vertex: usize) -> VertexLabel {
    VertexLabel(vertex)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IntermediateSegment([VertexOrEdgeMidpointVertex; 2]);

impl RefineConnectivity<SegmentConnectivity> for UniformRefinement {
    type Intermediate = IntermediateSegment;
    type OutputConnectivity = SegmentConnectivity;
    type VertexLabel = VertexOrEdgeMidpointVertex;

    fn populate_refined_connectivity(
        &self,
        connectivity: &SegmentConnectivity,
        intermediates: &mut Vec<Self::Intermediate>,
    ) {
        let &SegmentConnectivity([a, b]) = connectivity;
        let m = edge_midpoint([a, b]).into();
        let [a, b] = [a, b].map(|vertex_idx| vertex(vertex_idx).into());

        intermediates.extend_from_slice(&[IntermediateSegment([a, m]), IntermediateSegment([m, b])]);
    }

    fn populate_vertex_labels(&self, intermediate: &Self::Intermediate, labels: &mut Vec<Self::VertexLabel>) {
        labels.extend_from_slice(&intermediate.0);
    }

    fn construct_output_connectivity(
        &self,
        _intermediate: &Self::Intermediate,
        vertex_indices: &[usize],
    ) -> Result<Self::OutputConnectivity, InvalidVertexCount> {
        Ok(SegmentConnectivity(
            vertex_indices.try_into().map_err(|_| InvalidVertexCount)?,
        ))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IntermediateTriangle([VertexOrEdgeMidpointVertex; 3]);

impl RefineConnectivity<TriangleConnectivity> for UniformRefinement {
    type Intermediate = IntermediateTriangle;
    type OutputConnectivity = TriangleConnectivity;
    type VertexLabel = VertexOrEdgeMidpointVertex;

    fn populate_refined_connectivity(
        &self,
        connectivity: &TriangleConnectivity,
        intermediates: &mut Vec<Self::Intermediate>,
    ) {
        let &TriangleConnectivity([a, b, c]) = connectivity;
        let d = edge_midpoint([a, b]).into();
        let e = edge_midpoint([b, c]).into();
        let f = edge_midpoint([c, a]).into();
        let [a, b, c] = [a, b, c].map(|vertex_idx| vertex(vertex_idx).into());

        intermediates.extend_from_slice(&[
            IntermediateTriangle([a, d, f]),
            IntermediateTriangle([d, b, e]),
            IntermediateTriangle([f, e, c]),
            IntermediateTriangle([d, e, f]),
        ]);
    }

    fn populate_vertex_labels(&self, intermediate: &Self::Intermediate, labels: &mut Vec<Self::VertexLabel>) {
        labels.extend_from_slice(&intermediate.0);
    }

    fn construct_output_connectivity(
        &self,
        _intermediate: &Self::Intermediate,
        vertex_indices: &[usize],
    ) -> Result<Self::OutputConnectivity, InvalidVertexCount> {
        Ok(TriangleConnectivity(
            vertex_indices.try_into().map_err(|_| InvalidVertexCount)?,
        ))
    }
}
