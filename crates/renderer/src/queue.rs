//! Per-frame render queue with opaque/transparent classification.
//!
//! Commands are collected during the frame and executed in two phases:
//! opaque draws rely on the depth test and run in submission order, then
//! transparent draws run farthest-first with blending, because alpha
//! compositing is only correct back-to-front and the depth test cannot
//! resolve transparent-over-transparent ordering.

use crate::material::Material;
use crate::mesh::MeshHandle;
use glam::{Mat4, Vec3};

/// One queued draw. Lives for a single frame; no identity persists.
#[derive(Debug, Clone, Copy)]
pub struct RenderCommand {
    /// Non-owning reference into the renderer's mesh registry.
    pub mesh: MeshHandle,
    /// Material snapshot taken at submission. Changing the source material
    /// afterwards does not reclassify this command.
    pub material: Material,
    pub world: Mat4,
    /// Distance from the camera, recorded for transparent commands only and
    /// used purely for ordering.
    pub distance: f32,
}

/// Two-phase command queue, rebuilt every frame.
#[derive(Debug, Default)]
pub struct RenderQueue {
    opaque: Vec<RenderCommand>,
    transparent: Vec<RenderCommand>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all commands from the previous frame.
    pub fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
    }

    /// Queue a draw. Transparency is decided here, once, from the material's
    /// current opacity; transparent commands record their camera distance
    /// from the world transform's translation.
    pub fn push(&mut self, mesh: MeshHandle, material: Material, world: Mat4, camera_pos: Vec3) {
        if material.is_transparent() {
            let translation = world.w_axis.truncate();
            let distance = (camera_pos - translation).length();
            self.transparent.push(RenderCommand {
                mesh,
                material,
                world,
                distance,
            });
        } else {
            self.opaque.push(RenderCommand {
                mesh,
                material,
                world,
                distance: 0.0,
            });
        }
    }

    /// Sort the transparent sequence back-to-front (descending distance).
    ///
    /// `sort_unstable_by` gives a deterministic order for a fixed input
    /// sequence; equal distances may land either way, which the draw
    /// semantics allow. NaN distances (degenerate submissions) compare as
    /// equal rather than poisoning the sort.
    pub fn sort_transparent(&mut self) {
        self.transparent.sort_unstable_by(|a, b| {
            b.distance
                .partial_cmp(&a.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    pub fn opaque(&self) -> &[RenderCommand] {
        &self.opaque
    }

    pub fn transparent(&self) -> &[RenderCommand] {
        &self.transparent
    }

    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.transparent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_at(queue: &mut RenderQueue, opacity: f32, position: Vec3, camera: Vec3) {
        let material = Material::default().with_opacity(opacity);
        let world = Mat4::from_translation(position);
        queue.push(MeshHandle(0), material, world, camera);
    }

    /// One opaque and one transparent submission must land in exactly one
    /// sequence each.
    #[test]
    fn classification_splits_by_opacity() {
        let mut queue = RenderQueue::new();
        push_at(&mut queue, 1.0, Vec3::ZERO, Vec3::ZERO);
        push_at(&mut queue, 0.4, Vec3::ZERO, Vec3::ZERO);

        assert_eq!(queue.opaque().len(), 1);
        assert_eq!(queue.transparent().len(), 1);
        assert_eq!(queue.len(), 2);
    }

    /// Distances {5, 1, 3} must execute as {5, 3, 1}: farthest first.
    #[test]
    fn transparent_sorts_back_to_front() {
        let mut queue = RenderQueue::new();
        let camera = Vec3::ZERO;
        push_at(&mut queue, 0.5, Vec3::new(5.0, 0.0, 0.0), camera);
        push_at(&mut queue, 0.5, Vec3::new(1.0, 0.0, 0.0), camera);
        push_at(&mut queue, 0.5, Vec3::new(3.0, 0.0, 0.0), camera);

        queue.sort_transparent();

        let distances: Vec<f32> = queue.transparent().iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![5.0, 3.0, 1.0]);
    }

    #[test]
    fn opaque_keeps_submission_order() {
        let mut queue = RenderQueue::new();
        for x in 0..4 {
            push_at(&mut queue, 1.0, Vec3::new(x as f32, 0.0, 0.0), Vec3::ZERO);
        }
        queue.sort_transparent();

        let xs: Vec<f32> = queue.opaque().iter().map(|c| c.world.w_axis.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    /// Distance measures the translation component against the camera
    /// position recorded at submission.
    #[test]
    fn distance_uses_translation_component() {
        let mut queue = RenderQueue::new();
        let world = Mat4::from_translation(Vec3::new(0.0, 3.0, 4.0))
            * Mat4::from_rotation_y(1.0)
            * Mat4::from_scale(Vec3::splat(2.0));
        queue.push(
            MeshHandle(0),
            Material::glass(),
            world,
            Vec3::ZERO,
        );
        let d = queue.transparent()[0].distance;
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn sort_is_deterministic_for_fixed_input() {
        let build = || {
            let mut queue = RenderQueue::new();
            for x in [4.0, 2.0, 2.0, 7.0, 1.0] {
                push_at(&mut queue, 0.3, Vec3::new(x, 0.0, 0.0), Vec3::ZERO);
            }
            queue.sort_transparent();
            queue
                .transparent()
                .iter()
                .map(|c| c.world.w_axis.x)
                .collect::<Vec<f32>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn clear_empties_both_sequences() {
        let mut queue = RenderQueue::new();
        push_at(&mut queue, 1.0, Vec3::ZERO, Vec3::ZERO);
        push_at(&mut queue, 0.5, Vec3::ZERO, Vec3::ZERO);
        queue.clear();
        assert!(queue.is_empty());
    }

    /// Material edits after submission must not move a command between
    /// sequences: classification is a submission-time snapshot.
    #[test]
    fn classification_is_immutable_after_submit() {
        let mut queue = RenderQueue::new();
        let mut material = Material::default();
        queue.push(MeshHandle(0), material, Mat4::IDENTITY, Vec3::ZERO);

        material.opacity = 0.2;
        assert_eq!(queue.opaque().len(), 1);
        assert_eq!(queue.transparent().len(), 0);
        assert!(!queue.opaque()[0].material.is_transparent());
    }
}
