//! Blinn-Phong surface materials and showroom presets.

use glam::Vec3;

/// Surface material: how the lighting model colors a mesh.
///
/// Opacity below 1.0 routes the draw through the transparent pass; the
/// classification happens when the object is submitted for the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Color under indirect light.
    pub ambient: Vec3,
    /// Main surface color.
    pub diffuse: Vec3,
    /// Highlight color.
    pub specular: Vec3,
    /// Specular exponent; higher is a smaller, sharper highlight.
    pub shininess: f32,
    /// 1.0 fully opaque, 0.0 fully transparent.
    pub opacity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.5),
            shininess: 32.0,
            opacity: 1.0,
        }
    }
}

impl Material {
    pub fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Whether this material draws in the transparent pass.
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    // Car presets

    pub fn car_paint_red() -> Self {
        Self::new(
            Vec3::new(0.15, 0.02, 0.02),
            Vec3::new(0.8, 0.1, 0.1),
            Vec3::splat(0.9),
            64.0,
        )
    }

    pub fn car_paint_blue() -> Self {
        Self::new(
            Vec3::new(0.02, 0.02, 0.15),
            Vec3::new(0.1, 0.2, 0.8),
            Vec3::splat(0.9),
            64.0,
        )
    }

    pub fn car_paint_black() -> Self {
        Self::new(
            Vec3::splat(0.02),
            Vec3::splat(0.1),
            Vec3::splat(0.9),
            128.0,
        )
    }

    pub fn car_paint_white() -> Self {
        Self::new(
            Vec3::splat(0.2),
            Vec3::splat(0.95),
            Vec3::splat(0.9),
            64.0,
        )
    }

    pub fn car_paint_silver() -> Self {
        Self::new(
            Vec3::splat(0.15),
            Vec3::new(0.6, 0.6, 0.65),
            Vec3::splat(0.95),
            96.0,
        )
    }

    pub fn glass() -> Self {
        Self::new(
            Vec3::ZERO,
            Vec3::new(0.1, 0.1, 0.12),
            Vec3::splat(0.9),
            128.0,
        )
        .with_opacity(0.3)
    }

    pub fn glass_tinted() -> Self {
        Self::new(
            Vec3::ZERO,
            Vec3::new(0.05, 0.05, 0.08),
            Vec3::splat(0.8),
            128.0,
        )
        .with_opacity(0.4)
    }

    pub fn headlight_glass() -> Self {
        Self::new(Vec3::ZERO, Vec3::splat(0.05), Vec3::splat(0.95), 256.0).with_opacity(0.2)
    }

    /// Headlight glass with the lamp lit: bright diffuse so the lens reads
    /// as glowing even without an emissive term.
    pub fn headlight_glass_lit() -> Self {
        Self::new(
            Vec3::splat(0.8),
            Vec3::new(1.0, 1.0, 0.9),
            Vec3::splat(1.0),
            256.0,
        )
        .with_opacity(0.9)
    }

    pub fn rubber() -> Self {
        Self::new(Vec3::splat(0.02), Vec3::splat(0.1), Vec3::splat(0.1), 4.0)
    }

    pub fn leather() -> Self {
        Self::new(
            Vec3::new(0.1, 0.05, 0.02),
            Vec3::new(0.3, 0.15, 0.05),
            Vec3::splat(0.2),
            16.0,
        )
    }

    pub fn dashboard_plastic() -> Self {
        Self::new(
            Vec3::splat(0.02),
            Vec3::new(0.15, 0.15, 0.18),
            Vec3::splat(0.3),
            16.0,
        )
    }

    pub fn chrome() -> Self {
        Self::new(
            Vec3::splat(0.25),
            Vec3::splat(0.4),
            Vec3::splat(0.774597),
            76.8,
        )
    }

    // Environment presets

    pub fn concrete() -> Self {
        Self::new(Vec3::splat(0.1), Vec3::splat(0.5), Vec3::splat(0.1), 4.0)
    }

    pub fn tile() -> Self {
        Self::new(Vec3::splat(0.15), Vec3::splat(0.7), Vec3::splat(0.5), 32.0)
    }

    pub fn metal() -> Self {
        Self::new(
            Vec3::splat(0.1),
            Vec3::new(0.4, 0.4, 0.45),
            Vec3::splat(0.8),
            64.0,
        )
    }

    pub fn wood() -> Self {
        Self::new(
            Vec3::new(0.1, 0.05, 0.02),
            Vec3::new(0.4, 0.25, 0.1),
            Vec3::splat(0.2),
            16.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_below_one_is_transparent() {
        assert!(Material::glass().is_transparent());
        assert!(Material::glass_tinted().is_transparent());
        assert!(!Material::car_paint_red().is_transparent());
        assert!(!Material::default().is_transparent());
    }

    #[test]
    fn exact_one_is_opaque() {
        let m = Material::default().with_opacity(1.0);
        assert!(!m.is_transparent());
        let barely = Material::default().with_opacity(0.999);
        assert!(barely.is_transparent());
    }
}
