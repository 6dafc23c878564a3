//! CPU-side mesh representation used by loaders.

use bytemuck::{Pod, Zeroable};

/// Vertex with position/normal/uv. Values are in object space.
///
/// `repr(C)` + [`Pod`] so a vertex slice can be handed to a GPU upload as
/// raw bytes without repacking.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both buffers are non-empty and every index points
    /// at a vertex.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.indices.is_empty()
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex buffer contents, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer contents, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default(); 3], vec![0, 1, 2]);
        assert!(data.is_valid());
        assert_eq!(data.triangle_count(), 1);
    }

    #[test]
    fn out_of_range_index_is_invalid() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0, 1, 2]);
        assert!(!data.is_valid());
    }

    #[test]
    fn vertex_bytes_are_tightly_packed() {
        let data = MeshData::new(vec![MeshVertex::default(); 2], vec![0, 1, 0]);
        assert_eq!(
            data.vertex_bytes().len(),
            2 * std::mem::size_of::<MeshVertex>()
        );
        assert_eq!(data.index_bytes().len(), 3 * 4);
    }
}
