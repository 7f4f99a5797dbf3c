//! Vertex and per-draw instance layouts.

use crate::material::Material;
use bytemuck::{Pod, Zeroable};
use engine_core::normal_matrix;
use glam::Mat4;

/// Standard vertex with position, normal, and UV coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Per-draw data: world matrix, normal matrix, and material parameters.
///
/// Each queued command gets one region of the shared instance buffer, so the
/// whole draw state travels as instance attributes instead of per-object
/// bind groups.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct InstanceData {
    /// World (model) matrix columns.
    pub model: [[f32; 4]; 4],
    /// Normal matrix columns, padded to vec4 for attribute alignment.
    pub normal: [[f32; 4]; 3],
    /// xyz = ambient color, w = shininess.
    pub ambient_shininess: [f32; 4],
    /// xyz = diffuse color, w = opacity.
    pub diffuse_opacity: [f32; 4],
    /// xyz = specular color, w unused.
    pub specular: [f32; 4],
}

impl InstanceData {
    pub fn new(world: &Mat4, material: &Material) -> Self {
        let n = normal_matrix(world);
        Self {
            model: world.to_cols_array_2d(),
            normal: [
                n.x_axis.extend(0.0).into(),
                n.y_axis.extend(0.0).into(),
                n.z_axis.extend(0.0).into(),
            ],
            ambient_shininess: material.ambient.extend(material.shininess).into(),
            diffuse_opacity: material.diffuse.extend(material.opacity).into(),
            specular: material.specular.extend(0.0).into(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const VEC4: u64 = std::mem::size_of::<[f32; 4]>() as u64;
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Model matrix columns 0-3
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: VEC4,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 2 * VEC4,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 3 * VEC4,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Normal matrix columns 0-2
                wgpu::VertexAttribute {
                    offset: 4 * VEC4,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 5 * VEC4,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 6 * VEC4,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Material
                wgpu::VertexAttribute {
                    offset: 7 * VEC4,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 8 * VEC4,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 9 * VEC4,
                    shader_location: 12,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn instance_packs_material_and_transform() {
        let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let material = Material::glass();
        let instance = InstanceData::new(&world, &material);

        assert_eq!(instance.model[3][0], 1.0);
        assert_eq!(instance.model[3][1], 2.0);
        assert_eq!(instance.diffuse_opacity[3], material.opacity);
        assert_eq!(instance.ambient_shininess[3], material.shininess);
    }
}
