//! Axis-aligned bounding box collision.
//!
//! The showroom only needs to keep a drivable car inside four walls, so the
//! collision model is a set of static AABBs with penetration-based push-out.

use glam::{Mat4, Vec3, Vec4};

/// Axis-aligned bounding box defined by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered at `center` with the given full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Shift the box by a delta.
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// The AABB enclosing this box after a matrix transform. Computed from
    /// the eight transformed corners, so rotation grows the result.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut result = Aabb::new(Vec3::splat(f32::MAX), Vec3::splat(f32::MIN));
        for corner in corners {
            let t = *transform * Vec4::new(corner.x, corner.y, corner.z, 1.0);
            result.expand_to_include(t.truncate() / t.w);
        }
        result
    }

    /// Overlap test via separation on each axis.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Closest point on (or in) the box to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

/// Ray for wall probes and picking.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    /// Normalized at construction.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test against an AABB. Returns the entry distance on hit.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::MAX;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            if dir.abs() < 1e-4 {
                // Parallel to the slab: miss unless the origin is inside it.
                if origin < lo || origin > hi {
                    return None;
                }
            } else {
                let inv = 1.0 / dir;
                let mut t1 = (lo - origin) * inv;
                let mut t2 = (hi - origin) * inv;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max {
                    return None;
                }
            }
        }

        Some(t_min)
    }
}

/// Result of an AABB-vs-AABB response test.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResult {
    pub hit: bool,
    /// Push direction for the moving box, unit axis.
    pub normal: Vec3,
    /// Overlap depth along `normal`.
    pub penetration: f32,
}

/// Overlap response: the minimum-overlap axis gives normal and penetration.
pub fn aabb_response(moving: &Aabb, fixed: &Aabb) -> CollisionResult {
    if !moving.intersects(fixed) {
        return CollisionResult::default();
    }

    let overlap_x = (moving.max.x - fixed.min.x).min(fixed.max.x - moving.min.x);
    let overlap_y = (moving.max.y - fixed.min.y).min(fixed.max.y - moving.min.y);
    let overlap_z = (moving.max.z - fixed.min.z).min(fixed.max.z - moving.min.z);

    let (penetration, normal) = if overlap_x <= overlap_y && overlap_x <= overlap_z {
        let sign = if moving.center().x < fixed.center().x {
            -1.0
        } else {
            1.0
        };
        (overlap_x, Vec3::new(sign, 0.0, 0.0))
    } else if overlap_y <= overlap_x && overlap_y <= overlap_z {
        let sign = if moving.center().y < fixed.center().y {
            -1.0
        } else {
            1.0
        };
        (overlap_y, Vec3::new(0.0, sign, 0.0))
    } else {
        let sign = if moving.center().z < fixed.center().z {
            -1.0
        } else {
            1.0
        };
        (overlap_z, Vec3::new(0.0, 0.0, sign))
    };

    CollisionResult {
        hit: true,
        normal,
        penetration,
    }
}

/// Static collision geometry for the scene (showroom walls).
#[derive(Debug, Default)]
pub struct CollisionWorld {
    static_boxes: Vec<Aabb>,
}

/// Push-out margin so a resolved box does not re-collide next test.
const RESOLVE_EPSILON: f32 = 0.001;
/// Corner contacts can need more than one push; cap the iterations.
const RESOLVE_ITERATIONS: usize = 4;

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a static collider. Returns its index.
    pub fn add_static(&mut self, aabb: Aabb) -> usize {
        self.static_boxes.push(aabb);
        self.static_boxes.len() - 1
    }

    pub fn static_count(&self) -> usize {
        self.static_boxes.len()
    }

    pub fn clear(&mut self) {
        self.static_boxes.clear();
    }

    /// Test a moving box against every static collider and return the
    /// deepest penetration.
    pub fn test(&self, moving: &Aabb) -> CollisionResult {
        let mut deepest = CollisionResult::default();
        for fixed in &self.static_boxes {
            let result = aabb_response(moving, fixed);
            if result.hit && result.penetration > deepest.penetration {
                deepest = result;
            }
        }
        deepest
    }

    /// Resolve collisions for a box at `position` and return the corrected
    /// position. Iterates so corner contacts against two walls resolve fully.
    pub fn resolve(&self, moving: &Aabb, position: Vec3) -> Vec3 {
        let mut resolved = position;
        let mut test_box = *moving;

        for _ in 0..RESOLVE_ITERATIONS {
            let result = self.test(&test_box);
            if !result.hit {
                return resolved;
            }
            let push = result.normal * (result.penetration + RESOLVE_EPSILON);
            resolved += push;
            test_box = test_box.translated(push);
        }

        if self.test(&test_box).hit {
            log::debug!(
                "collision still unresolved after {} iterations",
                RESOLVE_ITERATIONS
            );
        }
        resolved
    }

    /// Nearest static hit along a ray within `max_distance`.
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<(f32, usize)> {
        let mut nearest: Option<(f32, usize)> = None;
        for (index, aabb) in self.static_boxes.iter().enumerate() {
            if let Some(t) = ray.intersect_aabb(aabb) {
                if t >= 0.0 && t < max_distance && nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, index));
                }
            }
        }
        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_size(center, Vec3::ONE)
    }

    #[test]
    fn separated_boxes_do_not_intersect() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(2.0, 0.0, 0.0));
        assert!(!a.intersects(&b));
        assert!(!aabb_response(&a, &b).hit);
    }

    #[test]
    fn response_pushes_along_minimum_overlap_axis() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(0.9, 0.0, 0.0));
        let result = aabb_response(&a, &b);
        assert!(result.hit);
        assert_eq!(result.normal, Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(result.penetration, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn resolve_moves_box_out_of_wall() {
        let mut world = CollisionWorld::new();
        // Wall occupying x in [5, 6].
        world.add_static(Aabb::new(
            Vec3::new(5.0, 0.0, -10.0),
            Vec3::new(6.0, 10.0, 10.0),
        ));

        let moving = unit_box_at(Vec3::new(5.2, 1.0, 0.0));
        let resolved = world.resolve(&moving, Vec3::new(5.2, 1.0, 0.0));
        assert!(resolved.x < 4.6);

        let settled = moving.translated(resolved - Vec3::new(5.2, 1.0, 0.0));
        assert!(!world.test(&settled).hit);
    }

    /// A box wedged into a corner needs pushes along two axes.
    #[test]
    fn resolve_handles_corner_contact() {
        let mut world = CollisionWorld::new();
        world.add_static(Aabb::new(
            Vec3::new(5.0, 0.0, -10.0),
            Vec3::new(6.0, 10.0, 10.0),
        ));
        world.add_static(Aabb::new(
            Vec3::new(-10.0, 0.0, 5.0),
            Vec3::new(10.0, 10.0, 6.0),
        ));

        let start = Vec3::new(5.2, 1.0, 5.2);
        let moving = unit_box_at(start);
        let resolved = world.resolve(&moving, start);
        let settled = moving.translated(resolved - start);
        assert!(!world.test(&settled).hit);
    }

    #[test]
    fn raycast_finds_nearest_wall() {
        let mut world = CollisionWorld::new();
        world.add_static(Aabb::new(
            Vec3::new(3.0, -1.0, -1.0),
            Vec3::new(4.0, 1.0, 1.0),
        ));
        world.add_static(Aabb::new(
            Vec3::new(8.0, -1.0, -1.0),
            Vec3::new(9.0, 1.0, 1.0),
        ));

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let (t, index) = world.raycast(&ray, 100.0).unwrap();
        assert_relative_eq!(t, 3.0, epsilon = 1e-4);
        assert_eq!(index, 0);
    }

    #[test]
    fn transformed_aabb_grows_under_rotation() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let rotated = aabb.transformed(&Mat4::from_rotation_y(45.0_f32.to_radians()));
        assert!(rotated.size().z > aabb.size().z);
    }
}
