//! GPU meshes and the renderer's mesh registry handle.

use crate::vertex::Vertex;
use procgen::MeshData;
use wgpu::util::DeviceExt;

/// Non-owning reference to a mesh in the renderer's registry.
///
/// Handles stay valid for the life of the renderer; a handle that does not
/// resolve (constructed by hand, or from another renderer) is skipped at
/// draw time rather than treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }

    /// Upload procedurally generated mesh data.
    pub fn from_data(device: &wgpu::Device, data: &MeshData) -> Self {
        let vertices: Vec<Vertex> = data
            .vertices
            .iter()
            .map(|v| Vertex::new(v.position, v.normal, v.uv))
            .collect();
        Self::new(device, &vertices, &data.indices)
    }

    pub fn triangle_count(&self) -> u32 {
        self.num_indices / 3
    }
}
