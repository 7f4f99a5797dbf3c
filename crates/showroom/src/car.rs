//! The car model: procedural parts plus wheel, door, and headlight
//! animation.
//!
//! Car coordinate system: +X is forward (nose), +Y up, +Z the driver's
//! right. The origin sits at the center of the car at ground level.

use crate::animation::{ease, Tween};
use glam::{Mat4, Vec3};
use physics::Aabb;
use procgen::{CAR_BODY_HEIGHT, CAR_CABIN_HEIGHT, CAR_HOOD_LENGTH, CAR_LENGTH, CAR_WIDTH};
use renderer::{Material, Model, ModelPart, Renderer};

pub const WHEEL_RADIUS: f32 = 0.4;
const WHEEL_WIDTH: f32 = 0.2;
/// Fully open door angle in degrees.
const DOOR_OPEN_ANGLE: f32 = 60.0;
const DOOR_ANIM_DURATION: f32 = 0.8;
const CAR_HEIGHT: f32 = CAR_BODY_HEIGHT + CAR_CABIN_HEIGHT;

/// Doors that can open. The rear of the cabin has no doors on this body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Door {
    FrontLeft = 0,
    FrontRight = 1,
}

/// Mesh handles shared by every car in the scene; uploaded once.
pub struct CarMeshes {
    pub body: renderer::MeshHandle,
    pub wheel: renderer::MeshHandle,
    pub windshield: renderer::MeshHandle,
    pub dashboard: renderer::MeshHandle,
    pub door: renderer::MeshHandle,
    pub headlight: renderer::MeshHandle,
}

impl CarMeshes {
    pub fn upload(renderer: &mut Renderer) -> Self {
        Self {
            body: renderer.upload_mesh(&procgen::car_body()),
            wheel: renderer.upload_mesh(&procgen::wheel(WHEEL_RADIUS, WHEEL_WIDTH)),
            windshield: renderer.upload_mesh(&procgen::windshield()),
            dashboard: renderer.upload_mesh(&procgen::dashboard()),
            door: renderer.upload_mesh(&procgen::cube(1.0)),
            headlight: renderer.upload_mesh(&procgen::sphere(0.09, 12, 8)),
        }
    }
}

/// Level of detail for a car instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarKind {
    /// Featured car: windows, interior, doors, headlights.
    Detailed,
    /// Background car: body and wheels only.
    Simplified,
}

/// A car in the showroom: a [`Model`] plus animation state.
pub struct CarModel {
    model: Model,
    wheel_parts: [usize; 4],
    door_parts: Option<[usize; 2]>,
    headlight_parts: Option<[usize; 2]>,

    wheel_rotation: f32,
    door_open: [f32; 2],
    door_target_open: [bool; 2],
    door_tweens: [Option<Tween>; 2],

    current_speed: f32,
    /// Heading in degrees around +Y; 0 faces +X.
    heading: f32,
    headlights_on: bool,
}

impl CarModel {
    pub fn new(meshes: &CarMeshes, kind: CarKind, paint: Material) -> Self {
        let mut model = Model::new(match kind {
            CarKind::Detailed => "car",
            CarKind::Simplified => "display-car",
        });

        model.add_part(ModelPart::new(meshes.body, paint));

        let mut wheel_parts = [0usize; 4];
        for (i, slot) in wheel_parts.iter_mut().enumerate() {
            *slot = model.add_part(ModelPart::with_local(
                meshes.wheel,
                Material::rubber(),
                wheel_local(i, 0.0),
            ));
        }

        let (door_parts, headlight_parts) = match kind {
            CarKind::Detailed => {
                model.add_part(ModelPart::new(meshes.windshield, Material::glass()));
                model.add_part(ModelPart::new(
                    meshes.dashboard,
                    Material::dashboard_plastic(),
                ));

                let doors = [
                    model.add_part(ModelPart::with_local(
                        meshes.door,
                        paint,
                        door_local(Door::FrontLeft, 0.0),
                    )),
                    model.add_part(ModelPart::with_local(
                        meshes.door,
                        paint,
                        door_local(Door::FrontRight, 0.0),
                    )),
                ];

                let lights = [
                    model.add_part(ModelPart::with_local(
                        meshes.headlight,
                        Material::headlight_glass(),
                        headlight_local(-1.0),
                    )),
                    model.add_part(ModelPart::with_local(
                        meshes.headlight,
                        Material::headlight_glass(),
                        headlight_local(1.0),
                    )),
                ];

                (Some(doors), Some(lights))
            }
            CarKind::Simplified => (None, None),
        };

        Self {
            model,
            wheel_parts,
            door_parts,
            headlight_parts,
            wheel_rotation: 0.0,
            door_open: [0.0; 2],
            door_target_open: [false; 2],
            door_tweens: [None, None],
            current_speed: 0.0,
            heading: 0.0,
            headlights_on: false,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    // Animation

    /// Advance wheel spin and door tweens, then refresh part transforms.
    pub fn update(&mut self, dt: f32) {
        if self.current_speed.abs() > 0.01 {
            // Roll angle from distance over circumference.
            let distance = self.current_speed * dt;
            let circumference = std::f32::consts::TAU * WHEEL_RADIUS;
            self.wheel_rotation += (distance / circumference) * 360.0;
            if self.wheel_rotation > 360.0 {
                self.wheel_rotation -= 360.0;
            }
            if self.wheel_rotation < -360.0 {
                self.wheel_rotation += 360.0;
            }
        }

        for i in 0..2 {
            if let Some(tween) = &mut self.door_tweens[i] {
                self.door_open[i] = tween.update(dt);
                if tween.is_complete() {
                    self.door_tweens[i] = None;
                }
            }
        }

        self.refresh_part_transforms();
    }

    fn refresh_part_transforms(&mut self) {
        for (i, &part) in self.wheel_parts.iter().enumerate() {
            if let Some(p) = self.model.part_mut(part) {
                p.local = wheel_local(i, self.wheel_rotation);
            }
        }

        if let Some(doors) = self.door_parts {
            for (i, &part) in doors.iter().enumerate() {
                let door = if i == 0 {
                    Door::FrontLeft
                } else {
                    Door::FrontRight
                };
                if let Some(p) = self.model.part_mut(part) {
                    p.local = door_local(door, self.door_open[i] * DOOR_OPEN_ANGLE);
                }
            }
        }
    }

    /// Open or close a door; the motion eases over a fixed duration.
    pub fn set_door_open(&mut self, door: Door, open: bool) {
        let i = door as usize;
        if self.door_target_open[i] == open {
            return;
        }
        self.door_target_open[i] = open;
        let target = if open { 1.0 } else { 0.0 };
        self.door_tweens[i] = Some(Tween::new(
            self.door_open[i],
            target,
            DOOR_ANIM_DURATION,
            ease::ease_in_out_cubic,
        ));
    }

    pub fn toggle_door(&mut self, door: Door) {
        let open = !self.door_target_open[door as usize];
        self.set_door_open(door, open);
    }

    /// Door openness in [0, 1].
    pub fn door_open_amount(&self, door: Door) -> f32 {
        self.door_open[door as usize]
    }

    pub fn wheel_rotation(&self) -> f32 {
        self.wheel_rotation
    }

    pub fn set_headlights_on(&mut self, on: bool) {
        self.headlights_on = on;
        if let Some(lights) = self.headlight_parts {
            let material = if on {
                Material::headlight_glass_lit()
            } else {
                Material::headlight_glass()
            };
            for part in lights {
                if let Some(p) = self.model.part_mut(part) {
                    p.material = material;
                }
            }
        }
    }

    pub fn headlights_on(&self) -> bool {
        self.headlights_on
    }

    // Movement

    /// Drive forward/backward at `speed` world units per second.
    pub fn drive(&mut self, speed: f32, dt: f32) {
        self.current_speed = speed;
        if speed.abs() > 0.0 {
            let step = self.forward() * speed * dt;
            self.model.transform.translate(step);
        }
    }

    /// Turn at `rate` degrees per second (positive = right).
    pub fn turn(&mut self, rate: f32, dt: f32) {
        self.heading -= rate * dt;
        let mut rotation = self.model.transform.rotation();
        rotation.y = self.heading;
        self.model.transform.set_rotation(rotation);
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// World-space nose direction.
    pub fn forward(&self) -> Vec3 {
        let h = self.heading.to_radians();
        Vec3::new(h.cos(), 0.0, -h.sin())
    }

    /// World-space driver's right.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y)
    }

    pub fn position(&self) -> Vec3 {
        self.model.transform.position()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.model.transform.set_position(position);
    }

    /// Reset pose for the showroom platform.
    pub fn reset(&mut self, position: Vec3) {
        self.model.transform.set_position(position);
        self.model.transform.set_rotation(Vec3::ZERO);
        self.heading = 0.0;
        self.current_speed = 0.0;
    }

    // Camera anchors

    /// Orbit camera target: half the car height above the position.
    pub fn orbit_target(&self) -> Vec3 {
        self.position() + Vec3::new(0.0, CAR_HEIGHT * 0.5, 0.0)
    }

    /// Driver-seat camera position: left side, slightly forward of center.
    pub fn driver_seat_position(&self) -> Vec3 {
        self.position() + Vec3::Y + self.forward() * 0.3 - self.right() * 0.4
    }

    /// Camera yaw that looks out the windshield.
    pub fn driver_seat_forward_yaw(&self) -> f32 {
        -self.heading
    }

    // Collision

    /// World-space bounds, accounting for the current heading.
    pub fn bounding_aabb(&self) -> Aabb {
        let local = Aabb::new(
            Vec3::new(-CAR_LENGTH / 2.0, 0.0, -CAR_WIDTH / 2.0),
            Vec3::new(CAR_LENGTH / 2.0, CAR_HEIGHT, CAR_WIDTH / 2.0),
        );
        let world = Mat4::from_translation(self.position())
            * Mat4::from_rotation_y(self.heading.to_radians());
        local.transformed(&world)
    }
}

/// Wheel placement: front/rear at +/-35% of the length, left/right at the
/// body sides, axle along Z. The cylinder is generated along Y, so it is
/// tipped 90 degrees after the spin is applied.
fn wheel_local(index: usize, rotation_degrees: f32) -> Mat4 {
    let x = if index < 2 {
        CAR_LENGTH * 0.35
    } else {
        -CAR_LENGTH * 0.35
    };
    let z = if index % 2 == 0 {
        -CAR_WIDTH * 0.5
    } else {
        CAR_WIDTH * 0.5
    };

    Mat4::from_translation(Vec3::new(x, WHEEL_RADIUS, z))
        * Mat4::from_rotation_z(-rotation_degrees.to_radians())
        * Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2)
}

const DOOR_LENGTH: f32 = 1.1;
const DOOR_HEIGHT: f32 = 0.55;
const DOOR_THICKNESS: f32 = 0.06;

/// Door panel hinged at its front edge, swinging outward around Y.
fn door_local(door: Door, open_degrees: f32) -> Mat4 {
    let hw = CAR_WIDTH / 2.0;
    let hinge_x = CAR_LENGTH / 2.0 - CAR_HOOD_LENGTH;
    let (z, swing) = match door {
        Door::FrontLeft => (-hw, -open_degrees),
        Door::FrontRight => (hw, open_degrees),
    };

    Mat4::from_translation(Vec3::new(hinge_x, CAR_BODY_HEIGHT * 0.55, z))
        * Mat4::from_rotation_y(swing.to_radians())
        * Mat4::from_translation(Vec3::new(-DOOR_LENGTH / 2.0, 0.0, 0.0))
        * Mat4::from_scale(Vec3::new(DOOR_LENGTH, DOOR_HEIGHT, DOOR_THICKNESS))
}

/// Headlight lens at the nose, `side` -1 left / +1 right.
fn headlight_local(side: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(
        CAR_LENGTH / 2.0,
        CAR_BODY_HEIGHT * 0.7,
        side * CAR_WIDTH * 0.3,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn meshes() -> CarMeshes {
        // Handles are registry indices; tests never draw, so placeholder
        // values are fine.
        CarMeshes {
            body: renderer::MeshHandle(0),
            wheel: renderer::MeshHandle(1),
            windshield: renderer::MeshHandle(2),
            dashboard: renderer::MeshHandle(3),
            door: renderer::MeshHandle(4),
            headlight: renderer::MeshHandle(5),
        }
    }

    #[test]
    fn wheels_spin_with_speed() {
        let mut car = CarModel::new(&meshes(), CarKind::Detailed, Material::car_paint_red());
        car.drive(5.0, 0.1);
        car.update(0.1);

        let expected = (5.0 * 0.1) / (std::f32::consts::TAU * WHEEL_RADIUS) * 360.0;
        assert_relative_eq!(car.wheel_rotation(), expected, epsilon = 1e-4);
    }

    #[test]
    fn wheel_rotation_wraps() {
        let mut car = CarModel::new(&meshes(), CarKind::Detailed, Material::car_paint_red());
        car.drive(100.0, 0.0);
        // Many small steps, enough to exceed a full revolution.
        for _ in 0..100 {
            car.drive(100.0, 0.016);
            car.update(0.016);
        }
        assert!(car.wheel_rotation().abs() <= 360.0 + 1e-3);
    }

    #[test]
    fn door_converges_on_target() {
        let mut car = CarModel::new(&meshes(), CarKind::Detailed, Material::car_paint_red());
        car.set_door_open(Door::FrontLeft, true);

        for _ in 0..120 {
            car.update(0.016);
        }
        assert_relative_eq!(car.door_open_amount(Door::FrontLeft), 1.0, epsilon = 1e-4);

        car.set_door_open(Door::FrontLeft, false);
        for _ in 0..120 {
            car.update(0.016);
        }
        assert_relative_eq!(car.door_open_amount(Door::FrontLeft), 0.0, epsilon = 1e-4);
    }

    /// Re-toggling mid-swing restarts from the current openness, not from an
    /// endpoint.
    #[test]
    fn door_retarget_mid_swing_does_not_jump() {
        let mut car = CarModel::new(&meshes(), CarKind::Detailed, Material::car_paint_red());
        car.set_door_open(Door::FrontLeft, true);
        for _ in 0..10 {
            car.update(0.016);
        }
        let partially = car.door_open_amount(Door::FrontLeft);
        assert!(partially > 0.0 && partially < 1.0);

        car.set_door_open(Door::FrontLeft, false);
        car.update(0.001);
        let after = car.door_open_amount(Door::FrontLeft);
        assert!((after - partially).abs() < 0.05);
    }

    #[test]
    fn drive_moves_along_heading() {
        let mut car = CarModel::new(&meshes(), CarKind::Detailed, Material::car_paint_red());
        car.drive(2.0, 0.5);
        assert_relative_eq!(car.position().x, 1.0, epsilon = 1e-5);

        car.reset(Vec3::ZERO);
        car.turn(90.0, 1.0);
        car.drive(2.0, 0.5);
        // Heading -90: nose points toward +Z.
        assert_relative_eq!(car.position().x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(car.position().z.abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn seat_sits_left_of_center() {
        let car = CarModel::new(&meshes(), CarKind::Detailed, Material::car_paint_red());
        let seat = car.driver_seat_position();
        assert_relative_eq!(seat.y, 1.0);
        assert!(seat.z < 0.0); // left is -Z at heading 0
        assert!(seat.x > 0.0); // slightly forward
    }

    #[test]
    fn bounding_box_follows_rotation() {
        let mut car = CarModel::new(&meshes(), CarKind::Detailed, Material::car_paint_red());
        let straight = car.bounding_aabb();
        car.turn(90.0, 1.0);
        car.update(0.016);
        let turned = car.bounding_aabb();
        // Rotated 90 degrees: the long axis now spans Z.
        assert!(turned.size().z > straight.size().z);
    }

    #[test]
    fn simplified_car_has_no_doors() {
        let mut car = CarModel::new(&meshes(), CarKind::Simplified, Material::car_paint_blue());
        assert_eq!(car.model().parts().len(), 5); // body + 4 wheels
        // Door toggles are inert but safe.
        car.toggle_door(Door::FrontLeft);
        car.update(0.1);
    }

    #[test]
    fn headlight_toggle_swaps_material() {
        let mut car = CarModel::new(&meshes(), CarKind::Detailed, Material::car_paint_red());
        car.set_headlights_on(true);
        assert!(car.headlights_on());
        let lit = car
            .model()
            .parts()
            .iter()
            .filter(|p| p.material == Material::headlight_glass_lit())
            .count();
        assert_eq!(lit, 2);
    }
}
