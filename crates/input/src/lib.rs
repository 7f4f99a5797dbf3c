//! Input handling for keyboard and mouse.

use glam::Vec2;
use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Mouse position in window coordinates.
    mouse_position: Vec2,
    /// Mouse movement delta this frame.
    mouse_delta: Vec2,
    /// Accumulated mouse delta (for when cursor is locked).
    accumulated_delta: Vec2,

    /// Accumulated scroll delta this frame (positive = up).
    scroll_delta: f32,
    accumulated_scroll: f32,

    /// Whether the cursor is captured/locked.
    cursor_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
        self.scroll_delta = self.accumulated_scroll;
        self.accumulated_scroll = 0.0;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process mouse movement.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Process cursor position update.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        self.mouse_position = Vec2::new(position.0 as f32, position.1 as f32);
    }

    /// Process a scroll event (line delta, positive = up).
    pub fn process_scroll(&mut self, delta: f32) {
        self.accumulated_scroll += delta;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Get the mouse position in window coordinates.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Get the scroll delta for this frame.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Check if the cursor is locked.
    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Set cursor lock state.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
    }

    // Showroom controls

    /// Camera movement axes as signed floats: (forward, right, up).
    /// WASD moves, Q/E and Space/Ctrl raise and lower.
    pub fn camera_axes(&self) -> (f32, f32, f32) {
        let mut forward = 0.0;
        let mut right = 0.0;
        let mut up = 0.0;

        if self.is_key_held(KeyCode::KeyW) || self.is_key_held(KeyCode::ArrowUp) {
            forward += 1.0;
        }
        if self.is_key_held(KeyCode::KeyS) || self.is_key_held(KeyCode::ArrowDown) {
            forward -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyD) || self.is_key_held(KeyCode::ArrowRight) {
            right += 1.0;
        }
        if self.is_key_held(KeyCode::KeyA) || self.is_key_held(KeyCode::ArrowLeft) {
            right -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyE) || self.is_key_held(KeyCode::Space) {
            up += 1.0;
        }
        if self.is_key_held(KeyCode::KeyQ) || self.is_key_held(KeyCode::ControlLeft) {
            up -= 1.0;
        }

        (forward, right, up)
    }

    /// Drive axis for the featured car: I forward, K reverse.
    pub fn car_drive_axis(&self) -> f32 {
        let mut drive = 0.0;
        if self.is_key_held(KeyCode::KeyI) {
            drive += 1.0;
        }
        if self.is_key_held(KeyCode::KeyK) {
            drive -= 1.0;
        }
        drive
    }

    /// Turn axis for the featured car: J left, L right.
    pub fn car_turn_axis(&self) -> f32 {
        let mut turn = 0.0;
        if self.is_key_held(KeyCode::KeyL) {
            turn += 1.0;
        }
        if self.is_key_held(KeyCode::KeyJ) {
            turn -= 1.0;
        }
        turn
    }

    /// Camera mode selection: 1 free-roam, 2 orbit, 3 driver seat.
    pub fn selected_camera_mode(&self) -> Option<u8> {
        if self.is_key_pressed(KeyCode::Digit1) {
            Some(1)
        } else if self.is_key_pressed(KeyCode::Digit2) {
            Some(2)
        } else if self.is_key_pressed(KeyCode::Digit3) {
            Some(3)
        } else {
            None
        }
    }

    /// Check if the door toggle was pressed (O).
    pub fn is_door_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyO)
    }

    /// Check if the headlight toggle was pressed (H).
    pub fn is_headlight_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyH)
    }

    /// Check if the showroom-lights toggle was pressed (T).
    pub fn is_lights_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyT)
    }

    /// Check if the car reset was pressed (R).
    pub fn is_car_reset_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyR)
    }

    /// Check if escape was pressed.
    pub fn is_escape_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_lasts_one_frame() {
        let mut input = InputState::new();
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyO, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::KeyO));
        assert!(input.is_key_held(KeyCode::KeyO));

        input.begin_frame();
        assert!(!input.is_key_pressed(KeyCode::KeyO));
        assert!(input.is_key_held(KeyCode::KeyO));
    }

    /// Key repeat from the OS must not re-trigger a press while held.
    #[test]
    fn repeat_does_not_retrigger_press() {
        let mut input = InputState::new();
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyH, ElementState::Pressed);
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyH, ElementState::Pressed);
        assert!(!input.is_key_pressed(KeyCode::KeyH));
    }

    #[test]
    fn camera_axes_cancel_out() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyS, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        let (forward, right, up) = input.camera_axes();
        assert_eq!(forward, 0.0);
        assert_eq!(right, 1.0);
        assert_eq!(up, 0.0);
    }

    #[test]
    fn mouse_delta_latches_on_begin_frame() {
        let mut input = InputState::new();
        input.process_mouse_motion((3.0, -2.0));
        input.process_mouse_motion((1.0, 1.0));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);

        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::new(4.0, -1.0));

        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn mode_selection_reads_digits() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Digit2, ElementState::Pressed);
        assert_eq!(input.selected_camera_mode(), Some(2));
    }
}
