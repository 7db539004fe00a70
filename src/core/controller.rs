use glam::Vec2;

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MouseLeft,
    MouseRight,
    MouseMiddle,
}

/// Pointer input, positions in physical pixels relative to the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { button: Button, position: Vec2 },
    Released { button: Button, position: Vec2 },
    Moved { position: Vec2 },
    /// Wheel motion in lines, positive away from the user
    Scrolled { lines: f32 },
}

/// Controller - pointer button and cursor state
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_buttons(&self) -> &[Button];

    /// Last known cursor position
    fn cursor(&self) -> Option<Vec2>;
}

/// Pressed buttons and cursor position, as tracked from raw window input
#[derive(Debug, Clone, Default)]
pub struct ButtonState {
    /// Pressed buttons in press order
    pressed: Vec<Button>,
    cursor: Option<Vec2>,
}

impl ButtonState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: Button) {
        if !self.pressed.contains(&button) {
            self.pressed.push(button);
        }
    }

    pub fn release(&mut self, button: Button) {
        self.pressed.retain(|&b| b != button);
    }

    pub fn set_cursor(&mut self, cursor: Option<Vec2>) {
        self.cursor = cursor;
    }
}

impl Controller for ButtonState {
    fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn get_down_buttons(&self) -> &[Button] {
        &self.pressed
    }

    fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }
}
