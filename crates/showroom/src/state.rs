//! Per-frame viewer state: input -> update -> render.

use crate::car::Door;
use crate::config::ShowroomConfig;
use crate::scene::ShowroomScene;
use anyhow::Result;
use engine_core::Time;
use glam::Vec3;
use input::InputState;
use renderer::{Camera, CameraMode, Renderer};
use std::sync::Arc;
use winit::event::{DeviceEvent, WindowEvent};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window};

/// Featured car drive speed in world units per second.
const CAR_DRIVE_SPEED: f32 = 8.0;
/// Featured car turn rate in degrees per second.
const CAR_TURN_RATE: f32 = 60.0;

/// Top-level viewer state owning every subsystem.
pub struct ShowroomApp {
    renderer: Renderer,
    camera: Camera,
    scene: ShowroomScene,
    input: InputState,
    time: Time,
    pub running: bool,
}

impl ShowroomApp {
    pub async fn new(window: Arc<Window>, config: ShowroomConfig) -> Result<Self> {
        let mut renderer = Renderer::new(window).await?;
        let scene = ShowroomScene::new(&mut renderer);

        let mut camera = Camera::new(Vec3::new(0.0, 3.0, 10.0), -90.0, -15.0);
        camera.set_mouse_sensitivity(config.sensitivity);
        camera.set_movement_speed(config.movement_speed);

        // Start orbiting the featured car.
        camera.set_orbit_target(scene.main_car().orbit_target());
        camera.set_mode(CameraMode::Orbit);

        Ok(Self {
            renderer,
            camera,
            scene,
            input: InputState::new(),
            time: Time::new(),
            running: true,
        })
    }

    /// Handle a window event. Returns true when the app should exit.
    pub fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => return true,
            WindowEvent::Resized(size) => self.renderer.resize(size),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.input.process_keyboard(code, event.state);
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.input.process_mouse_button(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_cursor_position((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                self.input.process_scroll(amount);
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        !self.running
    }

    /// Handle a device event (raw mouse motion while the cursor is locked).
    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.process_mouse_motion(delta);
        }
    }

    /// One frame: latch input, apply it, update the scene, render.
    fn frame(&mut self) {
        self.time.update();
        self.input.begin_frame();
        let dt = self.time.delta_seconds();

        self.process_input(dt);

        self.scene.update(dt);

        // Keep the camera anchored to the (possibly moving) car.
        match self.camera.mode() {
            CameraMode::Orbit => {
                self.camera
                    .set_orbit_target(self.scene.main_car().orbit_target());
            }
            CameraMode::DriverSeat => {
                let car = self.scene.main_car();
                self.camera
                    .set_seat_pose(car.driver_seat_position(), car.driver_seat_forward_yaw());
            }
            CameraMode::FreeRoam => {}
        }

        // Wall containment runs on the fixed step.
        while self.time.should_fixed_update() {
            self.scene.constrain_main_car();
        }

        self.render();
    }

    fn process_input(&mut self, dt: f32) {
        if self.input.is_escape_pressed() {
            if self.input.is_cursor_locked() {
                self.release_cursor();
            } else {
                self.running = false;
            }
            return;
        }

        // Click recaptures the cursor for mouse look.
        if !self.input.is_cursor_locked()
            && self.input.is_mouse_pressed(input::MouseButton::Left)
        {
            self.capture_cursor();
        }

        if let Some(mode) = self.input.selected_camera_mode() {
            self.switch_camera_mode(mode);
        }

        // Camera movement and look.
        let (forward, right, up) = self.input.camera_axes();
        self.camera.process_keyboard(forward, right, up, dt);

        if self.input.is_cursor_locked() {
            let delta = self.input.mouse_delta();
            if delta != glam::Vec2::ZERO {
                // Screen y grows downward; pitch grows upward.
                self.camera.process_mouse_movement(delta.x, -delta.y, true);
            }
        }

        let scroll = self.input.scroll_delta();
        if scroll != 0.0 {
            self.camera.process_mouse_scroll(scroll);
        }

        // Featured car controls.
        let drive = self.input.car_drive_axis();
        let turn = self.input.car_turn_axis();
        {
            let car = self.scene.main_car_mut();
            car.drive(drive * CAR_DRIVE_SPEED, dt);
            if turn != 0.0 {
                car.turn(turn * CAR_TURN_RATE, dt);
            }
        }

        if self.input.is_door_toggle_pressed() {
            let car = self.scene.main_car_mut();
            car.toggle_door(Door::FrontLeft);
            log::info!(
                "Door: {}",
                if car.door_open_amount(Door::FrontLeft) < 0.5 {
                    "opening"
                } else {
                    "closing"
                }
            );
        }

        if self.input.is_headlight_toggle_pressed() {
            let car = self.scene.main_car_mut();
            let on = !car.headlights_on();
            car.set_headlights_on(on);
            log::info!("Headlights: {}", if on { "on" } else { "off" });
        }

        if self.input.is_lights_toggle_pressed() {
            let enabled = !self.scene.lights_enabled();
            self.scene.set_lights_enabled(enabled);
            log::info!("Showroom lights: {}", if enabled { "on" } else { "off" });
        }

        if self.input.is_car_reset_pressed() {
            let reset = self.scene.car_reset_position();
            self.scene.main_car_mut().reset(reset);
            log::info!("Car position reset");
        }
    }

    fn switch_camera_mode(&mut self, selection: u8) {
        match selection {
            1 => {
                self.camera.set_mode(CameraMode::FreeRoam);
                log::info!("Camera mode: free-roam");
            }
            2 => {
                self.camera
                    .set_orbit_target(self.scene.main_car().orbit_target());
                self.camera.set_mode(CameraMode::Orbit);
                log::info!("Camera mode: orbit");
            }
            3 => {
                let car = self.scene.main_car();
                self.camera
                    .set_seat_pose(car.driver_seat_position(), car.driver_seat_forward_yaw());
                self.camera.set_mode(CameraMode::DriverSeat);
                log::info!("Camera mode: driver seat");
            }
            _ => {}
        }
    }

    fn render(&mut self) {
        self.renderer.begin_frame();
        self.renderer.set_camera(&self.camera);
        self.scene.submit(&mut self.renderer);
        if let Err(e) = self.renderer.end_frame() {
            log::error!("render failed: {}", e);
            self.running = false;
        }

        if self.time.frame_count() % 300 == 0 {
            log::debug!(
                "frame {}: {:.0} fps, {} draws, {} tris",
                self.time.frame_count(),
                self.time.fps(),
                self.renderer.draw_call_count(),
                self.renderer.triangle_count(),
            );
        }
    }

    fn capture_cursor(&mut self) {
        let window = self.renderer.window();
        if window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
            .is_ok()
        {
            window.set_cursor_visible(false);
            self.input.set_cursor_locked(true);
        }
    }

    fn release_cursor(&mut self) {
        let window = self.renderer.window();
        let _ = window.set_cursor_grab(CursorGrabMode::None);
        window.set_cursor_visible(true);
        self.input.set_cursor_locked(false);
    }
}
