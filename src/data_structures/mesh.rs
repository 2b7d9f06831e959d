//! CPU-side mesh data produced by the shape generators.
//!
//! A [`MeshData`] keeps every vertex attribute in its own array so generators
//! can fill them independently. Before upload the arrays are interleaved into
//! [`ModelVertex`]es, which is the layout the render pipelines expect.

use cgmath::Vector3;

/// Immutable bundle of parallel vertex arrays plus a triangle list.
///
/// All per-vertex arrays have the same length and every index refers to an
/// existing vertex, as long as the generator was given a resolution of at
/// least two in each dimension.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<Vector3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub tangents: Vec<Vector3<f32>>,
    pub binormals: Vec<Vector3<f32>>,
    /// Texture coordinates, `z` is unused.
    pub texcoords: Vec<Vector3<f32>>,
    pub indices: Vec<[u32; 3]>,
}

impl MeshData {
    /// Allocate zeroed attribute arrays for `vertex_count` vertices and room for `triangle_count` triangles.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        let zero = Vector3::new(0.0, 0.0, 0.0);
        Self {
            positions: vec![zero; vertex_count],
            normals: vec![zero; vertex_count],
            tangents: vec![zero; vertex_count],
            binormals: vec![zero; vertex_count],
            texcoords: vec![zero; vertex_count],
            indices: Vec::with_capacity(triangle_count),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of indices a draw call has to consume (three per triangle).
    pub fn index_count(&self) -> u32 {
        (self.indices.len() * 3) as u32
    }

    /// `true` if all attribute arrays line up and no triangle points past the vertex arrays.
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.len();
        let lengths_match = [
            self.normals.len(),
            self.tangents.len(),
            self.binormals.len(),
            self.texcoords.len(),
        ]
        .iter()
        .all(|&len| len == n);
        lengths_match
            && self
                .indices
                .iter()
                .flatten()
                .all(|&index| (index as usize) < n)
    }

    /// Interleave the attribute arrays into the GPU vertex layout.
    pub fn to_vertices(&self) -> Vec<ModelVertex> {
        (0..self.vertex_count())
            .map(|i| ModelVertex {
                position: self.positions[i].into(),
                tex_coords: self.texcoords[i].into(),
                normal: self.normals[i].into(),
                tangent: self.tangents[i].into(),
                binormal: self.binormals[i].into(),
            })
            .collect()
    }

    pub fn flat_indices(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }
}

/// One interleaved vertex as stored in the vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub binormal: [f32; 3],
}

impl ModelVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x3,
        3 => Float32x3,
        4 => Float32x3,
    ];

    /// Buffer layout matching the `VertexInput` struct of the lab shaders.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        let mut mesh = MeshData::with_capacity(3, 1);
        mesh.positions[1] = Vector3::new(1.0, 0.0, 0.0);
        mesh.positions[2] = Vector3::new(0.0, 1.0, 0.0);
        mesh.texcoords[2] = Vector3::new(0.0, 1.0, 0.0);
        mesh.indices.push([0, 1, 2]);
        mesh
    }

    #[test]
    fn counts_follow_the_triangle_list() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.flat_indices(), vec![0, 1, 2]);
        assert!(mesh.is_consistent());
    }

    #[test]
    fn out_of_range_index_is_inconsistent() {
        let mut mesh = triangle();
        mesh.indices.push([0, 2, 3]);
        assert!(!mesh.is_consistent());
    }

    #[test]
    fn mismatched_arrays_are_inconsistent() {
        let mut mesh = triangle();
        mesh.normals.pop();
        assert!(!mesh.is_consistent());
    }

    #[test]
    fn interleaving_keeps_attribute_order() {
        let vertices = triangle().to_vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[2].tex_coords, [0.0, 1.0, 0.0]);
        assert_eq!(
            std::mem::size_of::<ModelVertex>(),
            15 * std::mem::size_of::<f32>()
        );
    }
}
