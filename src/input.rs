use std::collections::HashSet;

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels per wheel "line" notch
pub const LINE_HEIGHT: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MouseLeft,
    MouseRight,
    Escape,
}

/// Input gathered between two frames
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Cursor movement while the left button is held, in pixels
    pub drag: (f32, f32),
    /// Wheel travel in pixels; positive scrolls the content down
    pub wheel: f32,
}

impl FrameInput {
    pub fn is_idle(&self) -> bool {
        self.drag == (0.0, 0.0) && self.wheel == 0.0
    }
}

/// Bridges winit window events to per-frame pointer state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Button>,
    cursor: Option<(f32, f32)>,
    pending: FrameInput,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the wheel travel of this event so scroll listeners can react immediately
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<f32> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    self.set_button(Button::Escape, event.state);
                }
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => Button::MouseLeft,
                    MouseButton::Right => Button::MouseRight,
                    _ => return None,
                };
                self.set_button(button, *state);
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(position.x as f32, position.y as f32);
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let pixels = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                self.scroll(pixels);
                Some(pixels)
            }
            _ => None,
        }
    }

    fn set_button(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => self.press(button),
            ElementState::Released => self.release(button),
        }
    }

    pub fn press(&mut self, button: Button) {
        self.pressed.insert(button);
    }

    pub fn release(&mut self, button: Button) {
        self.pressed.remove(&button);
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    pub fn move_cursor(&mut self, x: f32, y: f32) {
        if let Some((old_x, old_y)) = self.cursor {
            if self.is_down(Button::MouseLeft) {
                self.pending.drag.0 += x - old_x;
                self.pending.drag.1 += y - old_y;
            }
        }
        self.cursor = Some((x, y));
    }

    pub fn scroll(&mut self, pixels: f32) {
        self.pending.wheel += pixels;
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Hand over everything accumulated since the last call
    pub fn take_frame(&mut self) -> FrameInput {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_only_counts_with_left_button() {
        let mut input = InputState::new();
        input.move_cursor(10.0, 10.0);
        input.move_cursor(20.0, 15.0);
        assert!(input.take_frame().is_idle());

        input.press(Button::MouseLeft);
        input.move_cursor(30.0, 25.0);
        input.move_cursor(35.0, 20.0);
        assert_eq!(input.take_frame().drag, (15.0, 5.0));
    }

    #[test]
    fn test_take_frame_resets() {
        let mut input = InputState::new();
        input.scroll(120.0);
        input.scroll(-40.0);
        assert_eq!(input.take_frame().wheel, 80.0);
        assert_eq!(input.take_frame(), FrameInput::default());
    }

    #[test]
    fn test_buttons() {
        let mut input = InputState::new();
        input.press(Button::Escape);
        assert!(input.is_down(Button::Escape));
        input.release(Button::Escape);
        assert!(!input.is_down(Button::Escape));
    }
}
