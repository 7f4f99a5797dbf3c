//! Scene objects: a transform plus mesh/material parts.

use crate::material::Material;
use crate::mesh::MeshHandle;
use engine_core::Transform;
use glam::Mat4;

/// One drawable piece of a model: a mesh, its material, and an optional
/// local matrix composed on top of the model transform (wheels, doors).
#[derive(Debug, Clone, Copy)]
pub struct ModelPart {
    pub mesh: MeshHandle,
    pub material: Material,
    /// Local transform relative to the model, identity for static parts.
    pub local: Mat4,
}

impl ModelPart {
    pub fn new(mesh: MeshHandle, material: Material) -> Self {
        Self {
            mesh,
            material,
            local: Mat4::IDENTITY,
        }
    }

    pub fn with_local(mesh: MeshHandle, material: Material, local: Mat4) -> Self {
        Self {
            mesh,
            material,
            local,
        }
    }
}

/// A named scene object. The renderer reads parts and the composed world
/// matrix at submission; it never mutates the model.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    pub transform: Transform,
    parts: Vec<ModelPart>,
    visible: bool,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            parts: Vec::new(),
            visible: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a part and return its index.
    pub fn add_part(&mut self, part: ModelPart) -> usize {
        self.parts.push(part);
        self.parts.len() - 1
    }

    pub fn parts(&self) -> &[ModelPart] {
        &self.parts
    }

    pub fn part_mut(&mut self, index: usize) -> Option<&mut ModelPart> {
        self.parts.get_mut(index)
    }

    /// Replace the material on every part.
    pub fn set_material(&mut self, material: Material) {
        for part in &mut self.parts {
            part.material = material;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// World matrix for a part: model transform, then the part's local.
    pub fn part_world(&self, part: &ModelPart) -> Mat4 {
        self.transform.matrix() * part.local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn part_world_composes_on_top_of_transform() {
        let mut model = Model::new("test");
        model.transform.set_position(Vec3::new(10.0, 0.0, 0.0));

        let local = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let part = ModelPart::with_local(MeshHandle(0), Material::default(), local);
        model.add_part(part);

        let world = model.part_world(&model.parts()[0]);
        let origin = world.transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(10.0, 1.0, 0.0));
    }

    #[test]
    fn set_material_covers_all_parts() {
        let mut model = Model::new("test");
        model.add_part(ModelPart::new(MeshHandle(0), Material::default()));
        model.add_part(ModelPart::new(MeshHandle(1), Material::default()));

        model.set_material(Material::car_paint_blue());
        for part in model.parts() {
            assert_eq!(part.material, Material::car_paint_blue());
        }
    }
}
