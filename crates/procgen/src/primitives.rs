//! Primitive mesh builders.
//!
//! Everything here is CPU-side data; the renderer uploads it to the GPU.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::TAU;

/// Vertex with position, normal, and UV.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
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

/// Mesh data before GPU upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> u32 {
        self.indices.len() as u32 / 3
    }

    /// Append a quad given four corner vertices in CCW order.
    fn push_quad(&mut self, corners: [MeshVertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

/// An XZ ground plane centered at the origin, normal +Y, with tiled UVs.
pub fn plane(width: f32, depth: f32, u_tiles: f32, v_tiles: f32) -> MeshData {
    let hw = width / 2.0;
    let hd = depth / 2.0;

    let mut data = MeshData::new();
    data.push_quad([
        MeshVertex::new([-hw, 0.0, -hd], [0.0, 1.0, 0.0], [0.0, 0.0]),
        MeshVertex::new([hw, 0.0, -hd], [0.0, 1.0, 0.0], [u_tiles, 0.0]),
        MeshVertex::new([hw, 0.0, hd], [0.0, 1.0, 0.0], [u_tiles, v_tiles]),
        MeshVertex::new([-hw, 0.0, hd], [0.0, 1.0, 0.0], [0.0, v_tiles]),
    ]);
    data
}

/// A cube centered at the origin.
pub fn cube(size: f32) -> MeshData {
    let h = size / 2.0;
    let mut data = MeshData::new();

    // Front (+Z)
    data.push_quad([
        MeshVertex::new([-h, -h, h], [0.0, 0.0, 1.0], [0.0, 0.0]),
        MeshVertex::new([h, -h, h], [0.0, 0.0, 1.0], [1.0, 0.0]),
        MeshVertex::new([h, h, h], [0.0, 0.0, 1.0], [1.0, 1.0]),
        MeshVertex::new([-h, h, h], [0.0, 0.0, 1.0], [0.0, 1.0]),
    ]);
    // Back (-Z)
    data.push_quad([
        MeshVertex::new([h, -h, -h], [0.0, 0.0, -1.0], [0.0, 0.0]),
        MeshVertex::new([-h, -h, -h], [0.0, 0.0, -1.0], [1.0, 0.0]),
        MeshVertex::new([-h, h, -h], [0.0, 0.0, -1.0], [1.0, 1.0]),
        MeshVertex::new([h, h, -h], [0.0, 0.0, -1.0], [0.0, 1.0]),
    ]);
    // Top (+Y)
    data.push_quad([
        MeshVertex::new([-h, h, h], [0.0, 1.0, 0.0], [0.0, 0.0]),
        MeshVertex::new([h, h, h], [0.0, 1.0, 0.0], [1.0, 0.0]),
        MeshVertex::new([h, h, -h], [0.0, 1.0, 0.0], [1.0, 1.0]),
        MeshVertex::new([-h, h, -h], [0.0, 1.0, 0.0], [0.0, 1.0]),
    ]);
    // Bottom (-Y)
    data.push_quad([
        MeshVertex::new([-h, -h, -h], [0.0, -1.0, 0.0], [0.0, 0.0]),
        MeshVertex::new([h, -h, -h], [0.0, -1.0, 0.0], [1.0, 0.0]),
        MeshVertex::new([h, -h, h], [0.0, -1.0, 0.0], [1.0, 1.0]),
        MeshVertex::new([-h, -h, h], [0.0, -1.0, 0.0], [0.0, 1.0]),
    ]);
    // Right (+X)
    data.push_quad([
        MeshVertex::new([h, -h, h], [1.0, 0.0, 0.0], [0.0, 0.0]),
        MeshVertex::new([h, -h, -h], [1.0, 0.0, 0.0], [1.0, 0.0]),
        MeshVertex::new([h, h, -h], [1.0, 0.0, 0.0], [1.0, 1.0]),
        MeshVertex::new([h, h, h], [1.0, 0.0, 0.0], [0.0, 1.0]),
    ]);
    // Left (-X)
    data.push_quad([
        MeshVertex::new([-h, -h, -h], [-1.0, 0.0, 0.0], [0.0, 0.0]),
        MeshVertex::new([-h, -h, h], [-1.0, 0.0, 0.0], [1.0, 0.0]),
        MeshVertex::new([-h, h, h], [-1.0, 0.0, 0.0], [1.0, 1.0]),
        MeshVertex::new([-h, h, -h], [-1.0, 0.0, 0.0], [0.0, 1.0]),
    ]);

    data
}

/// A Y-axis cylinder centered at the origin, with side wall and both caps.
pub fn cylinder(radius: f32, height: f32, sectors: u32) -> MeshData {
    let mut data = MeshData::new();
    let half = height / 2.0;
    let step = TAU / sectors as f32;

    // Side wall: two rings of vertices, outward normals.
    for ring in 0..=1 {
        let y = if ring == 0 { -half } else { half };
        let v = ring as f32;
        for j in 0..=sectors {
            let angle = j as f32 * step;
            let (sin, cos) = angle.sin_cos();
            let x = radius * cos;
            let z = radius * sin;
            let normal = Vec3::new(x, 0.0, z).normalize();
            data.vertices.push(MeshVertex::new(
                [x, y, z],
                normal.into(),
                [j as f32 / sectors as f32, v],
            ));
        }
    }
    for j in 0..sectors {
        let k1 = j;
        let k2 = j + sectors + 1;
        data.indices
            .extend_from_slice(&[k1, k2, k1 + 1, k1 + 1, k2, k2 + 1]);
    }

    // Caps: center vertex plus a rim fan.
    for (y, ny) in [(half, 1.0_f32), (-half, -1.0_f32)] {
        let base = data.vertices.len() as u32;
        data.vertices
            .push(MeshVertex::new([0.0, y, 0.0], [0.0, ny, 0.0], [0.5, 0.5]));
        for j in 0..=sectors {
            let angle = j as f32 * step;
            let (sin, cos) = angle.sin_cos();
            data.vertices.push(MeshVertex::new(
                [radius * cos, y, radius * sin],
                [0.0, ny, 0.0],
                [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
            ));
        }
        for j in 0..sectors {
            if ny > 0.0 {
                data.indices
                    .extend_from_slice(&[base, base + j + 2, base + j + 1]);
            } else {
                data.indices
                    .extend_from_slice(&[base, base + j + 1, base + j + 2]);
            }
        }
    }

    data
}

/// A UV sphere centered at the origin.
pub fn sphere(radius: f32, sectors: u32, stacks: u32) -> MeshData {
    let mut data = MeshData::new();

    for i in 0..=stacks {
        let phi = std::f32::consts::PI * i as f32 / stacks as f32;
        let y = radius * phi.cos();
        let ring_radius = radius * phi.sin();

        for j in 0..=sectors {
            let theta = TAU * j as f32 / sectors as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();
            let normal = Vec3::new(x, y, z).normalize_or_zero();
            data.vertices.push(MeshVertex::new(
                [x, y, z],
                normal.into(),
                [j as f32 / sectors as f32, i as f32 / stacks as f32],
            ));
        }
    }

    for i in 0..stacks {
        for j in 0..sectors {
            let current = i * (sectors + 1) + j;
            let next = current + sectors + 1;
            data.indices
                .extend_from_slice(&[current, next, current + 1]);
            data.indices
                .extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    data
}

/// A car wheel: a squat cylinder meant to be rotated onto its side.
pub fn wheel(radius: f32, width: f32) -> MeshData {
    cylinder(radius, width, 24)
}

/// Proportions of the generated car body, shared with wheel/seat placement.
pub const CAR_LENGTH: f32 = 4.0;
pub const CAR_WIDTH: f32 = 1.8;
pub const CAR_BODY_HEIGHT: f32 = 0.8;
pub const CAR_CABIN_HEIGHT: f32 = 0.7;
pub const CAR_HOOD_LENGTH: f32 = 1.2;
pub const CAR_TRUNK_LENGTH: f32 = 0.8;

/// A simplified car body: box lower body, hood and trunk decks, and a
/// slanted cabin. X runs along the car length, origin at ground level.
pub fn car_body() -> MeshData {
    let hl = CAR_LENGTH / 2.0;
    let hw = CAR_WIDTH / 2.0;
    let body = CAR_BODY_HEIGHT;
    let cabin_top = body + CAR_CABIN_HEIGHT;
    let hood_start = hl - CAR_HOOD_LENGTH;
    let trunk_end = -hl + CAR_TRUNK_LENGTH;
    let cabin_hw = hw * 0.9;

    let mut data = MeshData::new();

    // Lower body box sides
    data.push_quad([
        MeshVertex::new([-hl, 0.0, -hw], [0.0, 0.0, -1.0], [0.0, 0.0]),
        MeshVertex::new([hl, 0.0, -hw], [0.0, 0.0, -1.0], [1.0, 0.0]),
        MeshVertex::new([hl, body, -hw], [0.0, 0.0, -1.0], [1.0, 1.0]),
        MeshVertex::new([-hl, body, -hw], [0.0, 0.0, -1.0], [0.0, 1.0]),
    ]);
    data.push_quad([
        MeshVertex::new([hl, 0.0, hw], [0.0, 0.0, 1.0], [0.0, 0.0]),
        MeshVertex::new([-hl, 0.0, hw], [0.0, 0.0, 1.0], [1.0, 0.0]),
        MeshVertex::new([-hl, body, hw], [0.0, 0.0, 1.0], [1.0, 1.0]),
        MeshVertex::new([hl, body, hw], [0.0, 0.0, 1.0], [0.0, 1.0]),
    ]);
    data.push_quad([
        MeshVertex::new([-hl, 0.0, hw], [-1.0, 0.0, 0.0], [0.0, 0.0]),
        MeshVertex::new([-hl, 0.0, -hw], [-1.0, 0.0, 0.0], [1.0, 0.0]),
        MeshVertex::new([-hl, body, -hw], [-1.0, 0.0, 0.0], [1.0, 1.0]),
        MeshVertex::new([-hl, body, hw], [-1.0, 0.0, 0.0], [0.0, 1.0]),
    ]);
    data.push_quad([
        MeshVertex::new([hl, 0.0, -hw], [1.0, 0.0, 0.0], [0.0, 0.0]),
        MeshVertex::new([hl, 0.0, hw], [1.0, 0.0, 0.0], [1.0, 0.0]),
        MeshVertex::new([hl, body, hw], [1.0, 0.0, 0.0], [1.0, 1.0]),
        MeshVertex::new([hl, body, -hw], [1.0, 0.0, 0.0], [0.0, 1.0]),
    ]);
    data.push_quad([
        MeshVertex::new([-hl, 0.0, hw], [0.0, -1.0, 0.0], [0.0, 0.0]),
        MeshVertex::new([hl, 0.0, hw], [0.0, -1.0, 0.0], [1.0, 0.0]),
        MeshVertex::new([hl, 0.0, -hw], [0.0, -1.0, 0.0], [1.0, 1.0]),
        MeshVertex::new([-hl, 0.0, -hw], [0.0, -1.0, 0.0], [0.0, 1.0]),
    ]);

    // Hood deck
    data.push_quad([
        MeshVertex::new([hood_start, body, -hw], [0.0, 1.0, 0.0], [0.0, 0.0]),
        MeshVertex::new([hl, body, -hw], [0.0, 1.0, 0.0], [1.0, 0.0]),
        MeshVertex::new([hl, body, hw], [0.0, 1.0, 0.0], [1.0, 1.0]),
        MeshVertex::new([hood_start, body, hw], [0.0, 1.0, 0.0], [0.0, 1.0]),
    ]);
    // Trunk deck
    data.push_quad([
        MeshVertex::new([-hl, body, -hw], [0.0, 1.0, 0.0], [0.0, 0.0]),
        MeshVertex::new([trunk_end, body, -hw], [0.0, 1.0, 0.0], [1.0, 0.0]),
        MeshVertex::new([trunk_end, body, hw], [0.0, 1.0, 0.0], [1.0, 1.0]),
        MeshVertex::new([-hl, body, hw], [0.0, 1.0, 0.0], [0.0, 1.0]),
    ]);

    // Cabin: slanted windshield frame, rear slope, roof.
    let slant = 0.3;
    data.push_quad([
        MeshVertex::new([hood_start, body, -cabin_hw], [0.7, 0.7, 0.0], [0.0, 0.0]),
        MeshVertex::new(
            [hood_start + slant, cabin_top, -cabin_hw],
            [0.7, 0.7, 0.0],
            [1.0, 0.0],
        ),
        MeshVertex::new(
            [hood_start + slant, cabin_top, cabin_hw],
            [0.7, 0.7, 0.0],
            [1.0, 1.0],
        ),
        MeshVertex::new([hood_start, body, cabin_hw], [0.7, 0.7, 0.0], [0.0, 1.0]),
    ]);
    data.push_quad([
        MeshVertex::new([trunk_end, body, cabin_hw], [-0.7, 0.7, 0.0], [0.0, 0.0]),
        MeshVertex::new(
            [trunk_end - slant, cabin_top, cabin_hw],
            [-0.7, 0.7, 0.0],
            [1.0, 0.0],
        ),
        MeshVertex::new(
            [trunk_end - slant, cabin_top, -cabin_hw],
            [-0.7, 0.7, 0.0],
            [1.0, 1.0],
        ),
        MeshVertex::new([trunk_end, body, -cabin_hw], [-0.7, 0.7, 0.0], [0.0, 1.0]),
    ]);
    data.push_quad([
        MeshVertex::new(
            [hood_start + slant, cabin_top, -cabin_hw],
            [0.0, 1.0, 0.0],
            [0.0, 0.0],
        ),
        MeshVertex::new(
            [trunk_end - slant, cabin_top, -cabin_hw],
            [0.0, 1.0, 0.0],
            [1.0, 0.0],
        ),
        MeshVertex::new(
            [trunk_end - slant, cabin_top, cabin_hw],
            [0.0, 1.0, 0.0],
            [1.0, 1.0],
        ),
        MeshVertex::new(
            [hood_start + slant, cabin_top, cabin_hw],
            [0.0, 1.0, 0.0],
            [0.0, 1.0],
        ),
    ]);

    data
}

/// Windshield glass quad matching the cabin front slope, slightly inset so
/// it never z-fights the body frame.
pub fn windshield() -> MeshData {
    let hl = CAR_LENGTH / 2.0;
    let hw = CAR_WIDTH / 2.0 * 0.9;
    let body = CAR_BODY_HEIGHT;
    let cabin_top = body + CAR_CABIN_HEIGHT;
    let cabin_front = hl - CAR_HOOD_LENGTH;

    let mut data = MeshData::new();
    data.push_quad([
        MeshVertex::new(
            [cabin_front + 0.05, body + 0.05, -hw + 0.05],
            [0.7, 0.7, 0.0],
            [0.0, 0.0],
        ),
        MeshVertex::new(
            [cabin_front + 0.35, cabin_top - 0.05, -hw + 0.05],
            [0.7, 0.7, 0.0],
            [1.0, 0.0],
        ),
        MeshVertex::new(
            [cabin_front + 0.35, cabin_top - 0.05, hw - 0.05],
            [0.7, 0.7, 0.0],
            [1.0, 1.0],
        ),
        MeshVertex::new(
            [cabin_front + 0.05, body + 0.05, hw - 0.05],
            [0.7, 0.7, 0.0],
            [0.0, 1.0],
        ),
    ]);
    data
}

/// Dashboard panel for the detailed car interior.
pub fn dashboard() -> MeshData {
    let hl = CAR_LENGTH / 2.0;
    let hw = CAR_WIDTH / 2.0 * 0.9;
    let cabin_front = hl - CAR_HOOD_LENGTH;
    let dash_y = CAR_BODY_HEIGHT + 0.1;

    let mut data = MeshData::new();
    data.push_quad([
        MeshVertex::new([cabin_front - 0.1, dash_y, -hw + 0.1], [0.0, 1.0, 0.0], [0.0, 0.0]),
        MeshVertex::new(
            [cabin_front + 0.2, dash_y + 0.3, -hw + 0.1],
            [0.0, 1.0, 0.0],
            [1.0, 0.0],
        ),
        MeshVertex::new(
            [cabin_front + 0.2, dash_y + 0.3, hw - 0.1],
            [0.0, 1.0, 0.0],
            [1.0, 1.0],
        ),
        MeshVertex::new([cabin_front - 0.1, dash_y, hw - 0.1], [0.0, 1.0, 0.0], [0.0, 1.0]),
    ]);
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_is_one_quad() {
        let p = plane(10.0, 10.0, 5.0, 5.0);
        assert_eq!(p.vertices.len(), 4);
        assert_eq!(p.triangle_count(), 2);
        assert_relative_eq!(p.vertices[2].uv[0], 5.0);
    }

    #[test]
    fn cube_has_six_faces() {
        let c = cube(1.0);
        assert_eq!(c.vertices.len(), 24);
        assert_eq!(c.triangle_count(), 12);
    }

    /// Side-wall normals must point radially outward, never vertically.
    #[test]
    fn cylinder_side_normals_are_radial() {
        let c = cylinder(0.5, 1.0, 8);
        // The first 2 * (sectors + 1) vertices are the side wall.
        for v in &c.vertices[..18] {
            assert_relative_eq!(v.normal[1], 0.0, epsilon = 1e-6);
            let len = (v.normal[0] * v.normal[0] + v.normal[2] * v.normal[2]).sqrt();
            assert_relative_eq!(len, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let s = sphere(2.0, 12, 8);
        for v in &s.vertices {
            let len = Vec3::from(v.position).length();
            assert_relative_eq!(len, 2.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn car_body_is_closed_quads() {
        let body = car_body();
        assert_eq!(body.indices.len() % 6, 0);
        assert!(body.triangle_count() >= 20);
        // Everything sits at or above ground level.
        for v in &body.vertices {
            assert!(v.position[1] >= 0.0);
        }
    }
}
