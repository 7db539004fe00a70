use glam::Vec2;

use super::controller::{Button, Controller, PointerEvent};

/// Travel in pixels below which a press/release pair counts as a click
pub const CLICK_SLOP: f32 = 4.0;
/// Wheel lines per pixel of vertical middle-button drag
const DOLLY_LINES_PER_PIXEL: f32 = 0.05;

/// What a stream of pointer events means for the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Orbit(Vec2),
    Pan(Vec2),
    /// Positive zooms in
    Zoom(f32),
    Click(Vec2),
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    button: Button,
    start: Vec2,
    last: Vec2,
    dragging: bool,
}

/// Splits pointer input into clicks and drags: left drag orbits, right drag
/// pans, middle drag and the wheel dolly.
///
/// Releases can be missed (the overlay may swallow them), so every event is
/// checked against the tracked button state and a drag whose button is no
/// longer down is dropped.
#[derive(Debug, Clone, Default)]
pub struct PointerGestures {
    drag: Option<Drag>,
}

impl PointerGestures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some_and(|d| d.dragging)
    }

    pub fn handle(&mut self, event: PointerEvent, buttons: &impl Controller) -> Option<Gesture> {
        let released = matches!(event, PointerEvent::Released { .. });
        if !released && self.drag.is_some_and(|d| !buttons.is_down(d.button)) {
            log::debug!("Dropping drag whose release was not seen");
            self.drag = None;
        }

        match event {
            PointerEvent::Pressed { button, position } => {
                // A second press of the drag button means its release was lost
                if !self.drag.is_some_and(|d| d.button != button) {
                    self.drag = Some(Drag {
                        button,
                        start: position,
                        last: position,
                        dragging: false,
                    });
                }
                None
            }
            PointerEvent::Moved { position } => {
                let drag = self.drag.as_mut()?;
                let delta = if drag.dragging {
                    position - drag.last
                } else if position.distance(drag.start) > CLICK_SLOP {
                    drag.dragging = true;
                    position - drag.start
                } else {
                    return None;
                };
                drag.last = position;
                Some(match drag.button {
                    Button::MouseLeft => Gesture::Orbit(delta),
                    Button::MouseRight => Gesture::Pan(delta),
                    Button::MouseMiddle => Gesture::Zoom(-delta.y * DOLLY_LINES_PER_PIXEL),
                })
            }
            PointerEvent::Released { button, position } => {
                let drag = self.drag.filter(|d| d.button == button)?;
                self.drag = None;
                (!drag.dragging && button == Button::MouseLeft).then_some(Gesture::Click(position))
            }
            PointerEvent::Scrolled { lines } => Some(Gesture::Zoom(lines)),
        }
    }
}
