use crate::input::keys::{KeyCode, MouseButton};

/// Raw device events pushed by the host.
/// Pointer coordinates are canvas (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, button: MouseButton },
    PointerUp { x: f32, y: f32, button: MouseButton },
    PointerMove { x: f32, y: f32 },
    /// `repeat` is set for auto-repeat presses while a key is held.
    KeyDown { key: KeyCode, repeat: bool },
    KeyUp { key: KeyCode },
}

/// Events collected between two cycles.
/// The host pushes; the frame driver drains once per cycle.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
