use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use super::controller::{Button, ButtonState, Controller, PointerEvent};

/// Pixels of touchpad scroll that count as one wheel line
const PIXELS_PER_LINE: f32 = 50.0;

/// Adapter that bridges Winit events to pointer events and tracked button state
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    buttons: ButtonState,
}

impl WinitController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Button and cursor state after the events processed so far
    pub fn buttons(&self) -> &ButtonState {
        &self.buttons
    }

    /// Update internal state and translate the event, if it is pointer input
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let button = Self::mouse_button_to_button(*button)?;
                match state {
                    ElementState::Pressed => self.buttons.press(button),
                    ElementState::Released => self.buttons.release(button),
                }
                // Buttons used before the first cursor move have no position
                let position = self.buttons.cursor()?;
                Some(match state {
                    ElementState::Pressed => PointerEvent::Pressed { button, position },
                    ElementState::Released => PointerEvent::Released { button, position },
                })
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                self.buttons.set_cursor(Some(position));
                Some(PointerEvent::Moved { position })
            }
            WindowEvent::CursorLeft { .. } => {
                self.buttons.set_cursor(None);
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                Some(PointerEvent::Scrolled { lines })
            }
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            MouseButton::Middle => Some(Button::MouseMiddle),
            _ => None,
        }
    }
}
