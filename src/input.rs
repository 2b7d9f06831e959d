//! Keyboard and mouse state as seen by a lab during one frame.

use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Debug, Default)]
pub struct Input {
    pressed: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
    mouse_delta: (f64, f64),
    right_mouse: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed if !repeat => self.press(*key),
                ElementState::Pressed => {}
                ElementState::Released => self.release(*key),
            },
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => self.right_mouse = state.is_pressed(),
            WindowEvent::Focused(false) => self.pressed.clear(),
            _ => {}
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        if self.pressed.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.pressed.remove(&key);
    }

    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    /// Held down right now.
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Went down since the last frame.
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Mouse motion accumulated since the last frame.
    pub fn mouse_delta(&self) -> (f64, f64) {
        self.mouse_delta
    }

    pub fn right_mouse(&self) -> bool {
        self.right_mouse
    }

    /// Forget per-frame state; held keys stay held.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.mouse_delta = (0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_pressed_lasts_one_frame() {
        let mut input = Input::new();
        input.press(KeyCode::Space);
        assert!(input.is_pressed(KeyCode::Space));
        assert!(input.just_pressed(KeyCode::Space));

        input.end_frame();
        assert!(input.is_pressed(KeyCode::Space));
        assert!(!input.just_pressed(KeyCode::Space));

        input.release(KeyCode::Space);
        assert!(!input.is_pressed(KeyCode::Space));
    }

    #[test]
    fn holding_a_key_does_not_retrigger() {
        let mut input = Input::new();
        input.press(KeyCode::KeyZ);
        input.end_frame();
        input.press(KeyCode::KeyZ);
        assert!(!input.just_pressed(KeyCode::KeyZ));
    }

    #[test]
    fn mouse_motion_accumulates_until_end_of_frame() {
        let mut input = Input::new();
        input.mouse_motion(1.0, -2.0);
        input.mouse_motion(0.5, 1.0);
        assert_eq!(input.mouse_delta(), (1.5, -1.0));
        input.end_frame();
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
    }
}
