//! Camera system with three interaction modes.
//!
//! Each mode is a rig strategy object implementing the same capability set
//! (keyboard, mouse, scroll, pose derivation) against shared camera state.
//! The camera holds one rig per mode and a mode tag, so a rig's state (orbit
//! radius and angles, seat pose) survives switching away and back.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Camera operating modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// FPS-style free movement.
    FreeRoam,
    /// Circle a target point at a fixed radius.
    Orbit,
    /// Fixed to the car seat with a limited look-around cone.
    DriverSeat,
}

/// State shared by every rig: pose, orientation basis, and lens parameters.
#[derive(Debug, Clone)]
pub struct CameraState {
    pub position: Vec3,
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub world_up: Vec3,
    /// Yaw in degrees; -90 looks along -Z.
    pub yaw: f32,
    /// Pitch in degrees, clamped by the active rig.
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraState {
    /// Rebuild front/right/up from yaw/pitch.
    ///
    /// Order matters: front first, then right = front x world_up, then
    /// up = right x front. Deriving up before right on a near-vertical front
    /// degenerates the basis; pitch clamping keeps front off the poles.
    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Point the basis at a world target (orbit mode).
    fn look_at(&mut self, target: Vec3) {
        self.front = (target - self.position).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

/// Free-roam rig: WASD translation along the basis, unconstrained look.
#[derive(Debug, Clone, Default)]
pub struct FreeRoamRig;

impl FreeRoamRig {
    /// Pitch limit that keeps the basis derivation away from the poles.
    pub const PITCH_LIMIT: f32 = 89.0;
    pub const FOV_MIN: f32 = 1.0;
    pub const FOV_MAX: f32 = 90.0;

    fn process_keyboard(&mut self, state: &mut CameraState, forward: f32, right: f32, up: f32, dt: f32) {
        let velocity = state.movement_speed * dt;
        let step = state.front * forward * velocity
            + state.right * right * velocity
            + state.world_up * up * velocity;
        state.position += step;
    }

    fn process_mouse(&mut self, state: &mut CameraState, dx: f32, dy: f32, constrain_pitch: bool) {
        state.yaw += dx;
        state.pitch += dy;
        if constrain_pitch {
            state.pitch = state.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        }
        state.update_vectors();
    }

    fn process_scroll(&mut self, state: &mut CameraState, dy: f32) {
        state.fov_degrees = (state.fov_degrees - dy).clamp(Self::FOV_MIN, Self::FOV_MAX);
    }

    fn derive_pose(&mut self, state: &mut CameraState) {
        state.update_vectors();
    }
}

/// Orbit rig: spherical coordinates around a target point.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    pub target: Vec3,
    pub radius: f32,
    /// Azimuth around the world up axis, degrees.
    pub yaw: f32,
    /// Elevation from the horizontal plane, degrees.
    pub pitch: f32,
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 5.0,
            yaw: 0.0,
            pitch: 20.0,
        }
    }
}

impl OrbitRig {
    /// Keeps the spherical conversion away from the poles where
    /// front x world_up degenerates.
    pub const PITCH_LIMIT: f32 = 80.0;
    pub const RADIUS_MIN: f32 = 2.0;
    pub const RADIUS_MAX: f32 = 20.0;
    /// Keyboard deltas reuse the movement axes as angle/radius rates. The
    /// factors are tuned per input device, deliberately distinct from the
    /// mouse path.
    pub const KEY_ANGLE_SCALE: f32 = 20.0;
    pub const KEY_RADIUS_SCALE: f32 = 2.0;
    pub const SCROLL_RADIUS_SCALE: f32 = 0.5;

    fn process_keyboard(&mut self, state: &mut CameraState, forward: f32, right: f32, up: f32, dt: f32) {
        let velocity = state.movement_speed * dt;

        // Keyboard orbits the target: right/up sweep the angles,
        // forward/backward moves along the view radius.
        self.yaw += right * velocity * Self::KEY_ANGLE_SCALE;
        self.pitch += up * velocity * Self::KEY_ANGLE_SCALE;
        self.pitch = self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);

        self.radius -= forward * velocity * Self::KEY_RADIUS_SCALE;
        self.radius = self.radius.clamp(Self::RADIUS_MIN, Self::RADIUS_MAX);

        self.derive_pose(state);
    }

    fn process_mouse(&mut self, state: &mut CameraState, dx: f32, dy: f32, _constrain_pitch: bool) {
        self.yaw -= dx;
        self.pitch += dy;
        self.pitch = self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.derive_pose(state);
    }

    fn process_scroll(&mut self, state: &mut CameraState, dy: f32) {
        self.radius -= dy * Self::SCROLL_RADIUS_SCALE;
        self.radius = self.radius.clamp(Self::RADIUS_MIN, Self::RADIUS_MAX);
        self.derive_pose(state);
    }

    /// Spherical-to-Cartesian conversion:
    /// position = target + r * (cos p * cos y, sin p, cos p * sin y),
    /// then the basis is rebuilt to look at the target.
    fn derive_pose(&mut self, state: &mut CameraState) {
        let pitch = self.pitch.to_radians();
        let yaw = self.yaw.to_radians();

        let offset = Vec3::new(
            self.radius * pitch.cos() * yaw.cos(),
            self.radius * pitch.sin(),
            self.radius * pitch.cos() * yaw.sin(),
        );

        state.position = self.target + offset;
        state.look_at(self.target);
    }
}

/// Driver-seat rig: camera pinned to the seat, look clamped to a cone
/// around the forward direction.
#[derive(Debug, Clone)]
pub struct DriverSeatRig {
    pub seat_position: Vec3,
    /// Yaw looking straight ahead out the windshield, degrees.
    pub forward_yaw: f32,
    /// Half-width of the yaw cone, degrees.
    pub yaw_limit: f32,
    /// Half-height of the pitch cone, degrees.
    pub pitch_limit: f32,
}

impl Default for DriverSeatRig {
    fn default() -> Self {
        Self {
            seat_position: Vec3::new(0.0, 1.0, 0.5),
            forward_yaw: -90.0,
            yaw_limit: 120.0,
            pitch_limit: 45.0,
        }
    }
}

impl DriverSeatRig {
    pub const FOV_MIN: f32 = 30.0;
    pub const FOV_MAX: f32 = 60.0;

    fn process_keyboard(&mut self, _state: &mut CameraState, _f: f32, _r: f32, _u: f32, _dt: f32) {
        // The seat holds the camera; movement keys drive the car instead.
    }

    fn process_mouse(&mut self, state: &mut CameraState, dx: f32, dy: f32, _constrain_pitch: bool) {
        state.yaw = (state.yaw + dx).clamp(
            self.forward_yaw - self.yaw_limit,
            self.forward_yaw + self.yaw_limit,
        );
        state.pitch = (state.pitch + dy).clamp(-self.pitch_limit, self.pitch_limit);
        state.update_vectors();
    }

    fn process_scroll(&mut self, state: &mut CameraState, dy: f32) {
        // Narrower range than free-roam: zooming stands in for leaning.
        state.fov_degrees = (state.fov_degrees - dy).clamp(Self::FOV_MIN, Self::FOV_MAX);
    }

    /// Snap to the seat looking straight ahead.
    fn derive_pose(&mut self, state: &mut CameraState) {
        state.position = self.seat_position;
        state.yaw = self.forward_yaw;
        state.pitch = 0.0;
        state.update_vectors();
    }
}

/// Camera with view/projection matrix derivation and mode switching.
#[derive(Debug, Clone)]
pub struct Camera {
    state: CameraState,
    mode: CameraMode,
    free_roam: FreeRoamRig,
    orbit: OrbitRig,
    driver_seat: DriverSeatRig,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 2.0, 5.0), -90.0, 0.0)
    }
}

impl Camera {
    /// Create a free-roam camera at `position` with the given yaw/pitch in
    /// degrees.
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut state = CameraState {
            position,
            front: -Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up: Vec3::Y,
            yaw,
            pitch,
            movement_speed: 5.0,
            mouse_sensitivity: 0.1,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        };
        state.update_vectors();

        Self {
            state,
            mode: CameraMode::FreeRoam,
            free_roam: FreeRoamRig,
            orbit: OrbitRig::default(),
            driver_seat: DriverSeatRig::default(),
        }
    }

    // Matrix getters

    /// View matrix: look-at from position along the front vector.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            self.state.position,
            self.state.position + self.state.front,
            self.state.up,
        )
    }

    /// Perspective projection. `aspect` must be positive; a degenerate
    /// aspect is the caller's bug, not a checked error.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.state.fov_degrees.to_radians(),
            aspect,
            self.state.near,
            self.state.far,
        )
    }

    // Mode state machine

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switch mode, re-deriving the pose once:
    /// - FreeRoam continues from the stored yaw/pitch/position (the basis is
    ///   rebuilt from them immediately, so the camera never renders with the
    ///   previous mode's look-at basis);
    /// - Orbit recomputes the position from the orbit parameters;
    /// - DriverSeat snaps to the seat looking forward.
    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
        match mode {
            CameraMode::FreeRoam => self.free_roam.derive_pose(&mut self.state),
            CameraMode::Orbit => self.orbit.derive_pose(&mut self.state),
            CameraMode::DriverSeat => self.driver_seat.derive_pose(&mut self.state),
        }
    }

    // Input processing

    /// Keyboard intent in mode-specific axes. Free-roam translates along the
    /// basis; orbit repurposes the axes as radius/yaw/pitch rates; driver
    /// seat ignores movement entirely.
    pub fn process_keyboard(&mut self, forward: f32, right: f32, up: f32, dt: f32) {
        match self.mode {
            CameraMode::FreeRoam => {
                self.free_roam
                    .process_keyboard(&mut self.state, forward, right, up, dt)
            }
            CameraMode::Orbit => self
                .orbit
                .process_keyboard(&mut self.state, forward, right, up, dt),
            CameraMode::DriverSeat => {
                self.driver_seat
                    .process_keyboard(&mut self.state, forward, right, up, dt)
            }
        }
    }

    /// Mouse look. Deltas are in device units; sensitivity scaling happens
    /// here so every rig sees the same units.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        let dx = dx * self.state.mouse_sensitivity;
        let dy = dy * self.state.mouse_sensitivity;
        match self.mode {
            CameraMode::FreeRoam => self
                .free_roam
                .process_mouse(&mut self.state, dx, dy, constrain_pitch),
            CameraMode::Orbit => self
                .orbit
                .process_mouse(&mut self.state, dx, dy, constrain_pitch),
            CameraMode::DriverSeat => {
                self.driver_seat
                    .process_mouse(&mut self.state, dx, dy, constrain_pitch)
            }
        }
    }

    /// Scroll zoom: fov in free-roam and driver seat, radius in orbit.
    pub fn process_mouse_scroll(&mut self, dy: f32) {
        match self.mode {
            CameraMode::FreeRoam => self.free_roam.process_scroll(&mut self.state, dy),
            CameraMode::Orbit => self.orbit.process_scroll(&mut self.state, dy),
            CameraMode::DriverSeat => self.driver_seat.process_scroll(&mut self.state, dy),
        }
    }

    // Accessors

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.state.position = position;
    }

    pub fn front(&self) -> Vec3 {
        self.state.front
    }

    pub fn right(&self) -> Vec3 {
        self.state.right
    }

    pub fn up(&self) -> Vec3 {
        self.state.up
    }

    /// Yaw in degrees.
    pub fn yaw(&self) -> f32 {
        self.state.yaw
    }

    /// Pitch in degrees.
    pub fn pitch(&self) -> f32 {
        self.state.pitch
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.state.yaw = yaw;
        self.state.update_vectors();
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.state.pitch = pitch.clamp(-FreeRoamRig::PITCH_LIMIT, FreeRoamRig::PITCH_LIMIT);
        self.state.update_vectors();
    }

    /// Field of view in degrees.
    pub fn fov_degrees(&self) -> f32 {
        self.state.fov_degrees
    }

    pub fn set_fov_degrees(&mut self, fov: f32) {
        self.state.fov_degrees = fov.clamp(1.0, 120.0);
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.state.near = near;
        self.state.far = far;
    }

    pub fn movement_speed(&self) -> f32 {
        self.state.movement_speed
    }

    pub fn set_movement_speed(&mut self, speed: f32) {
        self.state.movement_speed = speed;
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.state.mouse_sensitivity = sensitivity;
    }

    // Orbit parameters

    pub fn orbit_target(&self) -> Vec3 {
        self.orbit.target
    }

    /// Move the orbit target. Re-derives the pose when orbiting, so a moving
    /// car keeps the camera centered on it.
    pub fn set_orbit_target(&mut self, target: Vec3) {
        self.orbit.target = target;
        if self.mode == CameraMode::Orbit {
            self.orbit.derive_pose(&mut self.state);
        }
    }

    pub fn orbit_radius(&self) -> f32 {
        self.orbit.radius
    }

    pub fn set_orbit_radius(&mut self, radius: f32) {
        self.orbit.radius = radius.clamp(1.0, 50.0);
        if self.mode == CameraMode::Orbit {
            self.orbit.derive_pose(&mut self.state);
        }
    }

    // Driver seat parameters

    /// Update the seat pose (the car moved). Re-snaps position when the seat
    /// rig is active but leaves the look-around angles alone.
    pub fn set_seat_position(&mut self, seat: Vec3) {
        self.driver_seat.seat_position = seat;
        if self.mode == CameraMode::DriverSeat {
            self.state.position = seat;
        }
    }

    /// Update the seat pose and the forward direction the look cone centers
    /// on (the car turned). When seated, the current look angles are
    /// re-clamped into the moved cone.
    pub fn set_seat_pose(&mut self, seat: Vec3, forward_yaw: f32) {
        self.driver_seat.seat_position = seat;
        self.driver_seat.forward_yaw = forward_yaw;
        if self.mode == CameraMode::DriverSeat {
            self.state.position = seat;
            self.state.yaw = self.state.yaw.clamp(
                forward_yaw - self.driver_seat.yaw_limit,
                forward_yaw + self.driver_seat.yaw_limit,
            );
            self.state.update_vectors();
        }
    }
}

/// Camera uniform data for the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// Camera world position; w unused, padding.
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn update(&mut self, camera: &Camera, aspect: f32) {
        self.view = camera.view_matrix().to_cols_array_2d();
        self.proj = camera.projection_matrix(aspect).to_cols_array_2d();
        let pos = camera.position();
        self.position = [pos.x, pos.y, pos.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn default_looks_down_negative_z() {
        let camera = Camera::default();
        let front = camera.front();
        assert_relative_eq!(front.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(front.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(front.z, -1.0, epsilon = 1e-6);
    }

    /// The basis must stay a right-handed orthonormal set over the whole
    /// clamped pitch range.
    #[test]
    fn basis_orthonormal_across_pitch_range() {
        let mut camera = Camera::default();
        let mut pitch = -89.0_f32;
        while pitch <= 89.0 {
            camera.set_pitch(pitch);
            camera.set_yaw(pitch * 3.7); // arbitrary yaw alongside

            let (f, r, u) = (camera.front(), camera.right(), camera.up());
            assert_abs_diff_eq!(f.dot(r), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(f.dot(u), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(r.dot(u), 0.0, epsilon = 1e-5);
            assert_relative_eq!(f.length(), 1.0, epsilon = 1e-5);

            let cross = f.cross(r);
            assert_abs_diff_eq!(cross.x, u.x, epsilon = 1e-5);
            assert_abs_diff_eq!(cross.y, u.y, epsilon = 1e-5);
            assert_abs_diff_eq!(cross.z, u.z, epsilon = 1e-5);

            pitch += 8.9;
        }
    }

    #[test]
    fn pitch_clamps_at_89_degrees() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_relative_eq!(camera.pitch(), 89.0);
        camera.process_mouse_movement(0.0, -100_000.0, true);
        assert_relative_eq!(camera.pitch(), -89.0);
    }

    /// Orbit invariant: the derived position stays on the sphere, with
    /// height r * sin(pitch).
    #[test]
    fn orbit_position_stays_on_sphere() {
        let mut camera = Camera::default();
        camera.set_orbit_target(Vec3::new(1.0, 0.5, -2.0));
        camera.set_mode(CameraMode::Orbit);

        for (yaw, pitch, radius) in [
            (0.0, 20.0, 5.0),
            (135.0, -45.0, 3.0),
            (270.0, 79.0, 12.0),
            (45.0, -79.0, 2.0),
        ] {
            camera.set_orbit_radius(radius);
            // Drive the angles through the mouse path (sensitivity 0.1).
            camera.process_mouse_movement(
                (camera_orbit_yaw(&camera) - yaw) / 0.1,
                (pitch - camera_orbit_pitch(&camera)) / 0.1,
                true,
            );

            let to_camera = camera.position() - camera.orbit_target();
            assert_relative_eq!(to_camera.length(), radius, epsilon = 1e-3);
            assert_relative_eq!(
                to_camera.y,
                radius * camera_orbit_pitch(&camera).to_radians().sin(),
                epsilon = 1e-3
            );
        }
    }

    fn camera_orbit_yaw(camera: &Camera) -> f32 {
        camera.orbit.yaw
    }

    fn camera_orbit_pitch(camera: &Camera) -> f32 {
        camera.orbit.pitch
    }

    /// End-to-end: target origin, radius 5, both angles 0 puts the camera at
    /// (5, 0, 0) looking back along -X.
    #[test]
    fn orbit_pose_at_zero_angles() {
        let mut camera = Camera::default();
        camera.orbit.yaw = 0.0;
        camera.orbit.pitch = 0.0;
        camera.orbit.radius = 5.0;
        camera.orbit.target = Vec3::ZERO;
        camera.set_mode(CameraMode::Orbit);

        let pos = camera.position();
        assert_relative_eq!(pos.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(pos.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(pos.z, 0.0, epsilon = 1e-5);

        let front = camera.front();
        assert_relative_eq!(front.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(front.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(front.z, 0.0, epsilon = 1e-5);
    }

    /// Round trip FreeRoam -> Orbit -> FreeRoam keeps yaw/pitch and rebuilds
    /// the basis from them (documented decision: the view may jump back, but
    /// the camera is never left with the orbit look-at basis).
    #[test]
    fn mode_round_trip_preserves_yaw_pitch() {
        let mut camera = Camera::default();
        camera.set_yaw(-37.0);
        camera.set_pitch(12.0);
        let front_before = camera.front();

        camera.set_mode(CameraMode::Orbit);
        camera.process_mouse_movement(200.0, -100.0, true);
        camera.set_mode(CameraMode::FreeRoam);

        assert_relative_eq!(camera.yaw(), -37.0);
        assert_relative_eq!(camera.pitch(), 12.0);
        let front_after = camera.front();
        assert_relative_eq!(front_before.x, front_after.x, epsilon = 1e-6);
        assert_relative_eq!(front_before.y, front_after.y, epsilon = 1e-6);
        assert_relative_eq!(front_before.z, front_after.z, epsilon = 1e-6);
    }

    #[test]
    fn free_roam_keyboard_moves_along_basis() {
        let mut camera = Camera::default();
        let start = camera.position();
        camera.process_keyboard(1.0, 0.0, 0.0, 0.5);
        // Default speed 5, dt 0.5, forward is -Z.
        let moved = camera.position() - start;
        assert_relative_eq!(moved.z, -2.5, epsilon = 1e-5);
        assert_relative_eq!(moved.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn orbit_keyboard_clamps_radius() {
        let mut camera = Camera::default();
        camera.set_mode(CameraMode::Orbit);

        // Hold "forward" long enough to hit the near stop.
        camera.process_keyboard(1.0, 0.0, 0.0, 10.0);
        assert_relative_eq!(camera.orbit_radius(), OrbitRig::RADIUS_MIN);

        camera.process_keyboard(-1.0, 0.0, 0.0, 10.0);
        assert_relative_eq!(camera.orbit_radius(), OrbitRig::RADIUS_MAX);
    }

    #[test]
    fn orbit_scroll_adjusts_radius() {
        let mut camera = Camera::default();
        camera.set_mode(CameraMode::Orbit);
        let before = camera.orbit_radius();
        camera.process_mouse_scroll(2.0);
        assert_relative_eq!(
            camera.orbit_radius(),
            before - 2.0 * OrbitRig::SCROLL_RADIUS_SCALE,
            epsilon = 1e-5
        );
    }

    #[test]
    fn free_roam_scroll_clamps_fov() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(-1000.0);
        assert_relative_eq!(camera.fov_degrees(), FreeRoamRig::FOV_MAX);
        camera.process_mouse_scroll(1000.0);
        assert_relative_eq!(camera.fov_degrees(), FreeRoamRig::FOV_MIN);
    }

    #[test]
    fn driver_seat_ignores_keyboard() {
        let mut camera = Camera::default();
        camera.set_seat_position(Vec3::new(0.3, 1.0, 0.2));
        camera.set_mode(CameraMode::DriverSeat);
        let seat = camera.position();
        camera.process_keyboard(1.0, 1.0, 1.0, 1.0);
        assert_eq!(camera.position(), seat);
    }

    #[test]
    fn driver_seat_snaps_and_faces_forward() {
        let mut camera = Camera::default();
        camera.set_pitch(33.0);
        camera.set_seat_position(Vec3::new(-0.4, 1.1, 0.3));
        camera.set_mode(CameraMode::DriverSeat);

        assert_eq!(camera.position(), Vec3::new(-0.4, 1.1, 0.3));
        assert_relative_eq!(camera.yaw(), -90.0);
        assert_relative_eq!(camera.pitch(), 0.0);
    }

    #[test]
    fn driver_seat_look_clamped_to_cone() {
        let mut camera = Camera::default();
        camera.set_mode(CameraMode::DriverSeat);

        camera.process_mouse_movement(100_000.0, 100_000.0, true);
        assert_relative_eq!(camera.yaw(), -90.0 + 120.0);
        assert_relative_eq!(camera.pitch(), 45.0);

        camera.process_mouse_movement(-1_000_000.0, -1_000_000.0, true);
        assert_relative_eq!(camera.yaw(), -90.0 - 120.0);
        assert_relative_eq!(camera.pitch(), -45.0);
    }

    #[test]
    fn driver_seat_scroll_uses_narrow_fov_range() {
        let mut camera = Camera::default();
        camera.set_mode(CameraMode::DriverSeat);
        camera.process_mouse_scroll(1000.0);
        assert_relative_eq!(camera.fov_degrees(), DriverSeatRig::FOV_MIN);
        camera.process_mouse_scroll(-1000.0);
        assert_relative_eq!(camera.fov_degrees(), DriverSeatRig::FOV_MAX);
    }

    /// Orbit parameters persist across a switch away and back.
    #[test]
    fn orbit_state_survives_mode_switches() {
        let mut camera = Camera::default();
        camera.set_mode(CameraMode::Orbit);
        camera.process_mouse_scroll(4.0); // radius 5 -> 3
        let radius = camera.orbit_radius();

        camera.set_mode(CameraMode::FreeRoam);
        camera.set_mode(CameraMode::Orbit);
        assert_relative_eq!(camera.orbit_radius(), radius);
    }

    #[test]
    fn view_matrix_transforms_target_to_negative_z() {
        let mut camera = Camera::default();
        camera.orbit.target = Vec3::ZERO;
        camera.orbit.yaw = 0.0;
        camera.orbit.pitch = 0.0;
        camera.orbit.radius = 5.0;
        camera.set_mode(CameraMode::Orbit);

        let view = camera.view_matrix();
        let target_in_view = view * Vec3::ZERO.extend(1.0);
        assert_relative_eq!(target_in_view.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(target_in_view.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(target_in_view.z, -5.0, epsilon = 1e-4);
    }
}
