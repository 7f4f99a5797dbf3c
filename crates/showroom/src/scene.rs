//! The showroom scene: environment, featured car, background cars, lights,
//! and the wall collision bounds.

use crate::car::{CarKind, CarMeshes, CarModel};
use glam::Vec3;
use physics::{Aabb, CollisionWorld};
use renderer::{
    DirectionalLight, Material, Model, ModelPart, PointLight, Renderer, SpotLight,
};

/// Showroom interior dimensions: width (X), height (Y), depth (Z).
const SHOWROOM_SIZE: Vec3 = Vec3::new(30.0, 10.0, 20.0);
const WALL_THICKNESS: f32 = 0.5;
/// Featured car rests on the display platform.
const PLATFORM_HEIGHT: f32 = 0.2;

pub struct ShowroomScene {
    environment: Vec<Model>,
    main_car: CarModel,
    background_cars: Vec<CarModel>,
    collision: CollisionWorld,
    lights_enabled: bool,
}

impl ShowroomScene {
    /// Build the scene, uploading all meshes through the renderer.
    pub fn new(renderer: &mut Renderer) -> Self {
        let environment = create_environment(renderer);

        let car_meshes = CarMeshes::upload(renderer);

        let mut main_car = CarModel::new(&car_meshes, CarKind::Detailed, Material::car_paint_red());
        main_car.set_position(Vec3::new(0.0, PLATFORM_HEIGHT, 0.0));

        let background_cars = create_background_cars(&car_meshes);

        let mut collision = CollisionWorld::new();
        setup_collision(&mut collision);

        Self {
            environment,
            main_car,
            background_cars,
            collision,
            lights_enabled: true,
        }
    }

    /// Advance all animated objects.
    pub fn update(&mut self, dt: f32) {
        self.main_car.update(dt);
        for car in &mut self.background_cars {
            car.update(dt);
        }
    }

    /// Submit this frame's lights and models. Lights are rebuilt from
    /// scratch every frame; the enable toggle simply skips submission.
    pub fn submit(&self, renderer: &mut Renderer) {
        if self.lights_enabled {
            self.submit_lights(renderer);
        }

        for model in &self.environment {
            renderer.submit(model);
        }
        renderer.submit(self.main_car.model());
        for car in &self.background_cars {
            renderer.submit(car.model());
        }
    }

    fn submit_lights(&self, renderer: &mut Renderer) {
        // Skylight through the glass front.
        renderer.set_directional_light(DirectionalLight::new(
            Vec3::new(-0.3, -1.0, -0.2),
            Vec3::new(0.2, 0.2, 0.25),
            Vec3::new(0.6, 0.6, 0.7),
            Vec3::new(0.8, 0.8, 0.9),
        ));

        // Ceiling lamps in the four quadrants.
        for (x, z) in [(-5.0, -5.0), (5.0, -5.0), (-5.0, 5.0), (5.0, 5.0)] {
            let mut lamp = PointLight::new(
                Vec3::new(x, 8.0, z),
                Vec3::splat(0.1),
                Vec3::new(0.8, 0.8, 0.75),
                Vec3::ONE,
            );
            lamp.set_range(15.0);
            renderer.add_point_light(lamp);
        }

        // Overhead spotlight on the featured car.
        renderer.add_spot_light(SpotLight::new(
            Vec3::new(0.0, 8.0, 0.0),
            -Vec3::Y,
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.95),
            Vec3::ONE,
            15.0,
            25.0,
        ));

        // Headlight beam when the featured car has its lamps on. One beam
        // stands in for the pair; the spot budget is two slots and the
        // showroom spotlight holds the other.
        if self.main_car.headlights_on() {
            let nose = self.main_car.position()
                + self.main_car.forward() * 2.0
                + Vec3::new(0.0, 0.6, 0.0);
            let beam_dir = (self.main_car.forward() - Vec3::new(0.0, 0.15, 0.0)).normalize();
            renderer.add_spot_light(SpotLight::new(
                nose,
                beam_dir,
                Vec3::ZERO,
                Vec3::new(1.0, 1.0, 0.85),
                Vec3::ONE,
                20.0,
                30.0,
            ));
        }
    }

    // Object access

    pub fn main_car(&self) -> &CarModel {
        &self.main_car
    }

    pub fn main_car_mut(&mut self) -> &mut CarModel {
        &mut self.main_car
    }

    pub fn set_lights_enabled(&mut self, enabled: bool) {
        self.lights_enabled = enabled;
    }

    pub fn lights_enabled(&self) -> bool {
        self.lights_enabled
    }

    pub fn car_reset_position(&self) -> Vec3 {
        Vec3::new(0.0, PLATFORM_HEIGHT, 0.0)
    }

    // Collision

    /// Push the featured car back inside the walls if it drove into one.
    pub fn constrain_main_car(&mut self) {
        let bounds = self.main_car.bounding_aabb();
        let position = self.main_car.position();
        let corrected = self.collision.resolve(&bounds, position);
        if corrected != position {
            self.main_car.set_position(corrected);
        }
    }

    /// Whether a box at `position` with `size` stays clear of the walls.
    pub fn is_position_valid(&self, position: Vec3, size: Vec3) -> bool {
        !self
            .collision
            .test(&Aabb::from_center_size(position, size))
            .hit
    }
}

fn create_environment(renderer: &mut Renderer) -> Vec<Model> {
    let mut environment = Vec::new();
    let half_width = SHOWROOM_SIZE.x / 2.0;
    let half_depth = SHOWROOM_SIZE.z / 2.0;
    let wall_height = SHOWROOM_SIZE.y;

    let floor_mesh = renderer.upload_mesh(&procgen::plane(SHOWROOM_SIZE.x, SHOWROOM_SIZE.z, 5.0, 5.0));
    let ceiling_mesh =
        renderer.upload_mesh(&procgen::plane(SHOWROOM_SIZE.x, SHOWROOM_SIZE.z, 3.0, 3.0));
    let end_wall_mesh = renderer.upload_mesh(&procgen::plane(SHOWROOM_SIZE.x, wall_height, 2.0, 1.0));
    let side_wall_mesh =
        renderer.upload_mesh(&procgen::plane(SHOWROOM_SIZE.z, wall_height, 2.0, 1.0));
    let platform_mesh = renderer.upload_mesh(&procgen::cylinder(3.0, PLATFORM_HEIGHT, 48));

    let mut floor = Model::new("floor");
    floor.add_part(ModelPart::new(floor_mesh, Material::tile()));
    environment.push(floor);

    let mut ceiling = Model::new("ceiling");
    ceiling.add_part(ModelPart::new(ceiling_mesh, Material::concrete()));
    ceiling
        .transform
        .set_position(Vec3::new(0.0, wall_height, 0.0));
    ceiling.transform.set_rotation(Vec3::new(180.0, 0.0, 0.0));
    environment.push(ceiling);

    // Walls are planes stood upright; rotations match their inward normals.
    let walls = [
        ("back-wall", end_wall_mesh, Vec3::new(0.0, wall_height / 2.0, -half_depth), Vec3::new(-90.0, 0.0, 0.0)),
        ("front-wall", end_wall_mesh, Vec3::new(0.0, wall_height / 2.0, half_depth), Vec3::new(90.0, 0.0, 0.0)),
        ("left-wall", side_wall_mesh, Vec3::new(-half_width, wall_height / 2.0, 0.0), Vec3::new(-90.0, 0.0, 90.0)),
        ("right-wall", side_wall_mesh, Vec3::new(half_width, wall_height / 2.0, 0.0), Vec3::new(-90.0, 0.0, -90.0)),
    ];
    for (name, mesh, position, rotation) in walls {
        let mut wall = Model::new(name);
        wall.add_part(ModelPart::new(mesh, Material::concrete()));
        wall.transform.set_position(position);
        wall.transform.set_rotation(rotation);
        environment.push(wall);
    }

    let mut platform = Model::new("platform");
    platform.add_part(ModelPart::new(platform_mesh, Material::metal()));
    platform
        .transform
        .set_position(Vec3::new(0.0, PLATFORM_HEIGHT / 2.0, 0.0));
    environment.push(platform);

    environment
}

fn create_background_cars(meshes: &CarMeshes) -> Vec<CarModel> {
    let placements = [
        (Vec3::new(-8.0, 0.0, -5.0), 30.0, Material::car_paint_blue()),
        (Vec3::new(8.0, 0.0, -5.0), -30.0, Material::car_paint_white()),
        (Vec3::new(-8.0, 0.0, 5.0), -45.0, Material::car_paint_silver()),
        (Vec3::new(8.0, 0.0, 5.0), 45.0, Material::car_paint_black()),
    ];

    placements
        .into_iter()
        .map(|(position, heading, paint)| {
            let mut car = CarModel::new(meshes, CarKind::Simplified, paint);
            car.set_position(position);
            car.turn(-heading, 1.0);
            car.update(0.0);
            car
        })
        .collect()
}

fn setup_collision(collision: &mut CollisionWorld) {
    let half_width = SHOWROOM_SIZE.x / 2.0;
    let half_depth = SHOWROOM_SIZE.z / 2.0;
    let height = SHOWROOM_SIZE.y;

    // Back wall
    collision.add_static(Aabb::new(
        Vec3::new(-half_width, 0.0, -half_depth - WALL_THICKNESS),
        Vec3::new(half_width, height, -half_depth),
    ));
    // Front wall
    collision.add_static(Aabb::new(
        Vec3::new(-half_width, 0.0, half_depth),
        Vec3::new(half_width, height, half_depth + WALL_THICKNESS),
    ));
    // Left wall
    collision.add_static(Aabb::new(
        Vec3::new(-half_width - WALL_THICKNESS, 0.0, -half_depth),
        Vec3::new(-half_width, height, half_depth),
    ));
    // Right wall
    collision.add_static(Aabb::new(
        Vec3::new(half_width, 0.0, -half_depth),
        Vec3::new(half_width + WALL_THICKNESS, height, half_depth),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collision_only() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        setup_collision(&mut world);
        world
    }

    #[test]
    fn four_walls_registered() {
        assert_eq!(collision_only().static_count(), 4);
    }

    #[test]
    fn center_is_clear_of_walls() {
        let world = collision_only();
        let car = Aabb::from_center_size(Vec3::new(0.0, 0.75, 0.0), Vec3::new(4.0, 1.5, 1.8));
        assert!(!world.test(&car).hit);
    }

    #[test]
    fn wall_overrun_is_pushed_back() {
        let world = collision_only();
        let start = Vec3::new(14.5, 0.75, 0.0); // nose into the right wall
        let car = Aabb::from_center_size(start, Vec3::new(4.0, 1.5, 1.8));
        let corrected = world.resolve(&car, start);
        assert!(corrected.x < start.x);
    }
}
