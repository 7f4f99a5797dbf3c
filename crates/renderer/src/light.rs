//! Light types and per-frame light aggregation.
//!
//! The scene re-submits its lights every frame; the aggregate is a snapshot,
//! not long-lived state. At upload time every GPU slot is written: populated
//! slots carry parameters with an enabled flag, empty slots are explicitly
//! disabled so a previous frame's data can never leak into shading.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Maximum point lights shaded per frame. Extra submissions are dropped.
pub const MAX_POINT_LIGHTS: usize = 4;
/// Maximum spot lights shaded per frame. Extra submissions are dropped.
pub const MAX_SPOT_LIGHTS: usize = 2;

/// Distant light with parallel rays, like a skylight. No attenuation.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Direction the light shines, from the light toward the scene.
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
            ambient,
            diffuse,
            specular,
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(
            Vec3::new(-0.2, -1.0, -0.3),
            Vec3::splat(0.1),
            Vec3::splat(0.8),
            Vec3::splat(1.0),
        )
    }
}

/// Omnidirectional light with distance attenuation
/// `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    pub fn new(position: Vec3, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        Self {
            position,
            ambient,
            diffuse,
            specular,
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }

    /// Fit attenuation so intensity is negligible past `range` world units
    /// (empirical coefficients from the Ogre attenuation tables).
    pub fn set_range(&mut self, range: f32) {
        self.constant = 1.0;
        self.linear = 4.5 / range;
        self.quadratic = 75.0 / (range * range);
    }
}

/// Cone of light: position, direction, and inner/outer cutoff angles with a
/// smooth falloff between them.
#[derive(Debug, Clone, Copy)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Inner cone angle in degrees; full intensity inside.
    pub inner_cutoff_degrees: f32,
    /// Outer cone angle in degrees; zero intensity outside.
    pub outer_cutoff_degrees: f32,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl SpotLight {
    pub fn new(
        position: Vec3,
        direction: Vec3,
        ambient: Vec3,
        diffuse: Vec3,
        specular: Vec3,
        inner_cutoff_degrees: f32,
        outer_cutoff_degrees: f32,
    ) -> Self {
        Self {
            position,
            direction: direction.normalize(),
            ambient,
            diffuse,
            specular,
            inner_cutoff_degrees,
            outer_cutoff_degrees,
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

/// Per-frame light aggregate with fixed slot capacities.
#[derive(Debug, Default)]
pub struct LightRig {
    directional: Option<DirectionalLight>,
    points: Vec<PointLight>,
    spots: Vec<SpotLight>,
}

impl LightRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the previous frame's lights.
    pub fn clear(&mut self) {
        self.directional = None;
        self.points.clear();
        self.spots.clear();
    }

    /// Set the directional light. At most one is shaded; the last one wins.
    pub fn set_directional(&mut self, light: DirectionalLight) {
        self.directional = Some(light);
    }

    /// Add a point light. Beyond [`MAX_POINT_LIGHTS`] the submission is a
    /// silent no-op.
    pub fn add_point(&mut self, light: PointLight) {
        if self.points.len() < MAX_POINT_LIGHTS {
            self.points.push(light);
        } else {
            log::debug!("point light capacity reached, dropping submission");
        }
    }

    /// Add a spot light. Beyond [`MAX_SPOT_LIGHTS`] the submission is a
    /// silent no-op.
    pub fn add_spot(&mut self, light: SpotLight) {
        if self.spots.len() < MAX_SPOT_LIGHTS {
            self.spots.push(light);
        } else {
            log::debug!("spot light capacity reached, dropping submission");
        }
    }

    pub fn directional(&self) -> Option<&DirectionalLight> {
        self.directional.as_ref()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn spot_count(&self) -> usize {
        self.spots.len()
    }

    /// Snapshot the aggregate for upload. Every slot up to capacity is
    /// written; unpopulated slots carry an explicit disabled flag.
    pub fn to_uniform(&self) -> LightsUniform {
        let mut uniform = LightsUniform::zeroed();

        if let Some(dir) = &self.directional {
            uniform.directional = DirLightUniform::from_light(dir);
        }

        for (slot, light) in self.points.iter().enumerate() {
            uniform.points[slot] = PointLightUniform::from_light(light);
        }

        for (slot, light) in self.spots.iter().enumerate() {
            uniform.spots[slot] = SpotLightUniform::from_light(light);
        }

        uniform
    }
}

// GPU blocks. Fields are packed into vec4s so the layout matches WGSL
// uniform alignment without implicit padding.

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DirLightUniform {
    /// xyz = direction, w = enabled.
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl DirLightUniform {
    fn from_light(light: &DirectionalLight) -> Self {
        Self {
            direction: [light.direction.x, light.direction.y, light.direction.z, 1.0],
            ambient: light.ambient.extend(0.0).into(),
            diffuse: light.diffuse.extend(0.0).into(),
            specular: light.specular.extend(0.0).into(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PointLightUniform {
    /// xyz = position, w = enabled.
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// x = constant, y = linear, z = quadratic.
    pub attenuation: [f32; 4],
}

impl PointLightUniform {
    fn from_light(light: &PointLight) -> Self {
        Self {
            position: [light.position.x, light.position.y, light.position.z, 1.0],
            ambient: light.ambient.extend(0.0).into(),
            diffuse: light.diffuse.extend(0.0).into(),
            specular: light.specular.extend(0.0).into(),
            attenuation: [light.constant, light.linear, light.quadratic, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpotLightUniform {
    /// xyz = position, w = enabled.
    pub position: [f32; 4],
    /// xyz = direction, w = cos(inner cutoff).
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    /// xyz = specular, w = cos(outer cutoff).
    pub specular: [f32; 4],
    /// x = constant, y = linear, z = quadratic.
    pub attenuation: [f32; 4],
}

impl SpotLightUniform {
    fn from_light(light: &SpotLight) -> Self {
        Self {
            position: [light.position.x, light.position.y, light.position.z, 1.0],
            direction: [
                light.direction.x,
                light.direction.y,
                light.direction.z,
                light.inner_cutoff_degrees.to_radians().cos(),
            ],
            ambient: light.ambient.extend(0.0).into(),
            diffuse: light.diffuse.extend(0.0).into(),
            specular: [
                light.specular.x,
                light.specular.y,
                light.specular.z,
                light.outer_cutoff_degrees.to_radians().cos(),
            ],
            attenuation: [light.constant, light.linear, light.quadratic, 0.0],
        }
    }
}

/// Complete lighting state uploaded once per frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightsUniform {
    pub directional: DirLightUniform,
    pub points: [PointLightUniform; MAX_POINT_LIGHTS],
    pub spots: [SpotLightUniform; MAX_SPOT_LIGHTS],
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn point_at(x: f32) -> PointLight {
        PointLight::new(
            Vec3::new(x, 0.0, 0.0),
            Vec3::splat(0.1),
            Vec3::splat(0.8),
            Vec3::ONE,
        )
    }

    fn spot_at(x: f32) -> SpotLight {
        SpotLight::new(
            Vec3::new(x, 3.0, 0.0),
            -Vec3::Y,
            Vec3::ZERO,
            Vec3::ONE,
            Vec3::ONE,
            12.5,
            17.5,
        )
    }

    /// Six submissions against a capacity of four: exactly four enabled
    /// slots, the rest explicitly disabled.
    #[test]
    fn point_capacity_drops_overflow() {
        let mut rig = LightRig::new();
        rig.clear();
        for i in 0..6 {
            rig.add_point(point_at(i as f32));
        }
        assert_eq!(rig.point_count(), MAX_POINT_LIGHTS);

        let uniform = rig.to_uniform();
        let enabled = uniform.points.iter().filter(|p| p.position[3] > 0.5).count();
        assert_eq!(enabled, MAX_POINT_LIGHTS);

        // First-come-first-kept: slot order matches submission order.
        for (i, slot) in uniform.points.iter().enumerate() {
            assert_relative_eq!(slot.position[0], i as f32);
        }
    }

    #[test]
    fn spot_capacity_drops_overflow() {
        let mut rig = LightRig::new();
        for i in 0..5 {
            rig.add_spot(spot_at(i as f32));
        }
        assert_eq!(rig.spot_count(), MAX_SPOT_LIGHTS);
    }

    #[test]
    fn unused_slots_are_disabled() {
        let mut rig = LightRig::new();
        rig.add_point(point_at(1.0));
        let uniform = rig.to_uniform();

        assert!(uniform.points[0].position[3] > 0.5);
        for slot in &uniform.points[1..] {
            assert_eq!(slot.position[3], 0.0);
        }
        for slot in &uniform.spots {
            assert_eq!(slot.position[3], 0.0);
        }
        assert_eq!(uniform.directional.direction[3], 0.0);
    }

    #[test]
    fn last_directional_wins() {
        let mut rig = LightRig::new();
        rig.set_directional(DirectionalLight::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::ONE,
            Vec3::ONE,
        ));
        rig.set_directional(DirectionalLight::new(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::ZERO,
            Vec3::ONE,
            Vec3::ONE,
        ));

        let uniform = rig.to_uniform();
        assert_relative_eq!(uniform.directional.direction[1], -1.0);
        assert!(uniform.directional.direction[3] > 0.5);
    }

    #[test]
    fn clear_resets_everything() {
        let mut rig = LightRig::new();
        rig.set_directional(DirectionalLight::default());
        rig.add_point(point_at(0.0));
        rig.add_spot(spot_at(0.0));

        rig.clear();
        assert!(rig.directional().is_none());
        assert_eq!(rig.point_count(), 0);
        assert_eq!(rig.spot_count(), 0);

        // After a clear, more submissions fit again.
        rig.add_point(point_at(7.0));
        assert_eq!(rig.point_count(), 1);
    }

    #[test]
    fn spot_cutoffs_upload_as_cosines() {
        let mut rig = LightRig::new();
        rig.add_spot(spot_at(0.0));
        let uniform = rig.to_uniform();
        assert_relative_eq!(
            uniform.spots[0].direction[3],
            12.5_f32.to_radians().cos(),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            uniform.spots[0].specular[3],
            17.5_f32.to_radians().cos(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn set_range_tightens_attenuation() {
        let mut near = point_at(0.0);
        near.set_range(7.0);
        let mut far = point_at(0.0);
        far.set_range(50.0);
        assert!(near.quadratic > far.quadratic);
        assert!(near.linear > far.linear);
    }
}
