use std::collections::HashSet;
use std::hash::Hash;

use glam::{vec2, Vec2};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent};

/// Pixels per scroll line when the platform reports pixel deltas.
const PIXELS_PER_LINE: f32 = 40.0;

#[derive(Debug, Clone)]
pub struct State<T> {
    pressed: HashSet<T>,
    just_pressed: HashSet<T>,
    just_released: HashSet<T>,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> State<T> {
    pub fn begin_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    pub fn is_pressed(&self, value: &T) -> bool {
        self.pressed.contains(value)
    }

    pub fn just_pressed(&self, value: &T) -> bool {
        self.just_pressed.contains(value)
    }

    pub fn just_released(&self, value: &T) -> bool {
        self.just_released.contains(value)
    }

    pub fn set(&mut self, value: T) {
        // Key repeat sends Pressed again while held; only the first one is an edge.
        if self.pressed.insert(value) {
            self.just_pressed.insert(value);
        }
    }

    pub fn clear(&mut self, value: T) {
        if self.pressed.remove(&value) {
            self.just_released.insert(value);
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct KeyboardInput {
    pub state: State<VirtualKeyCode>,
}

impl KeyboardInput {
    pub fn begin_frame(&mut self) {
        self.state.begin_frame();
    }

    pub fn is_pressed(&self, key: VirtualKeyCode) -> bool {
        self.state.is_pressed(&key)
    }

    pub fn just_pressed(&self, key: VirtualKeyCode) -> bool {
        self.state.just_pressed(&key)
    }

    /// -1, 0 or 1 depending on which of the two keys are held.
    pub fn axis(&self, negative: VirtualKeyCode, positive: VirtualKeyCode) -> f32 {
        let mut value = 0.0;
        if self.is_pressed(negative) {
            value -= 1.0;
        }
        if self.is_pressed(positive) {
            value += 1.0;
        }
        value
    }

    pub fn shift(&self) -> bool {
        self.is_pressed(VirtualKeyCode::LShift) || self.is_pressed(VirtualKeyCode::RShift)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MouseInput {
    pub state: State<MouseButton>,
    /// Cursor position in physical pixels, origin top-left.
    pub pos: Vec2,
    prev_pos: Vec2,
    motion: Vec2,
    scroll: f32,
}

impl MouseInput {
    /// Cursor movement since the last frame.
    pub fn delta(&self) -> Vec2 {
        self.pos - self.prev_pos
    }

    /// Raw device motion accumulated since the last frame. Keeps working while the cursor is
    /// grabbed.
    pub fn motion(&self) -> Vec2 {
        self.motion
    }

    /// Scroll accumulated since the last frame, in lines. Positive scrolls up.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn begin_frame(&mut self) {
        self.state.begin_frame();
        self.prev_pos = self.pos;
        self.motion = Vec2::ZERO;
        self.scroll = 0.0;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Input {
    pub keyboard: KeyboardInput,
    pub mouse: MouseInput,
}

impl Input {
    pub fn begin_frame(&mut self) {
        self.mouse.begin_frame();
        self.keyboard.begin_frame();
    }

    pub fn apply_motion(&mut self, dx: f64, dy: f64) {
        self.mouse.motion += vec2(dx as _, dy as _);
    }

    /// Update the state from a window event. Returns whether the event was relevant to input.
    pub fn apply_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.mouse.state.set(*button),
                ElementState::Released => self.mouse.state.clear(*button),
            },
            WindowEvent::KeyboardInput {
                input:
                    winit::event::KeyboardInput {
                        state,
                        virtual_keycode: Some(vk),
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.keyboard.state.set(*vk),
                ElementState::Released => self.keyboard.state.clear(*vk),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.pos = vec2(position.x as _, position.y as _);
            }
            WindowEvent::Focused(false) => {
                // Releases are lost while unfocused; drop everything held.
                let keys = self.keyboard.state.pressed.iter().copied().collect::<Vec<_>>();
                for key in keys {
                    self.keyboard.state.clear(key);
                }
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_last_one_frame() {
        let mut state = State::default();
        state.set(VirtualKeyCode::E);
        assert!(state.is_pressed(&VirtualKeyCode::E));
        assert!(state.just_pressed(&VirtualKeyCode::E));

        state.begin_frame();
        assert!(state.is_pressed(&VirtualKeyCode::E));
        assert!(!state.just_pressed(&VirtualKeyCode::E));

        state.clear(VirtualKeyCode::E);
        assert!(state.just_released(&VirtualKeyCode::E));
        state.begin_frame();
        assert!(!state.just_released(&VirtualKeyCode::E));
        assert!(!state.is_pressed(&VirtualKeyCode::E));
    }

    #[test]
    fn key_repeat_is_not_an_edge() {
        let mut state = State::default();
        state.set(VirtualKeyCode::Space);
        state.begin_frame();
        state.set(VirtualKeyCode::Space);
        assert!(!state.just_pressed(&VirtualKeyCode::Space));
    }

    #[test]
    fn axis_cancels_out() {
        let mut keyboard = KeyboardInput::default();
        assert_eq!(keyboard.axis(VirtualKeyCode::A, VirtualKeyCode::D), 0.0);
        keyboard.state.set(VirtualKeyCode::A);
        assert_eq!(keyboard.axis(VirtualKeyCode::A, VirtualKeyCode::D), -1.0);
        keyboard.state.set(VirtualKeyCode::D);
        assert_eq!(keyboard.axis(VirtualKeyCode::A, VirtualKeyCode::D), 0.0);
        assert!(!keyboard.shift());
        keyboard.state.set(VirtualKeyCode::RShift);
        assert!(keyboard.shift());
    }

    #[test]
    fn mouse_accumulates_until_frame_start() {
        let mut input = Input::default();
        input.apply_motion(3.0, -1.0);
        input.apply_motion(1.0, -1.0);
        input.mouse.pos = vec2(10.0, 20.0);
        assert_eq!(input.mouse.motion(), vec2(4.0, -2.0));
        assert_eq!(input.mouse.delta(), vec2(10.0, 20.0));

        input.begin_frame();
        assert_eq!(input.mouse.motion(), Vec2::ZERO);
        assert_eq!(input.mouse.delta(), Vec2::ZERO);
        assert_eq!(input.mouse.scroll(), 0.0);
    }
}
