use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::input::keys::{KeyCode, MouseButton};
use crate::input::queue::InputEvent;

/// Per-button state with one-cycle edge states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    IsUp,
    /// Pressed since the previous cycle.
    WentDown,
    IsDown,
    /// Released since the previous cycle.
    WentUp,
}

impl ButtonState {
    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::WentDown | ButtonState::IsDown)
    }

    fn press(self) -> ButtonState {
        if self.is_down() {
            self
        } else {
            ButtonState::WentDown
        }
    }

    fn release(self) -> ButtonState {
        if self.is_down() {
            ButtonState::WentUp
        } else {
            self
        }
    }

    fn settle(self) -> ButtonState {
        match self {
            ButtonState::WentDown => ButtonState::IsDown,
            ButtonState::WentUp => ButtonState::IsUp,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Button {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Keyboard and mouse state polled by user code.
///
/// Each button changes at most once per cycle, so an edge state is always
/// visible for exactly one cycle. A second change arriving in the same
/// batch (a press and its release between two cycles) is held back and
/// applied on the next cycle.
#[derive(Debug, Default)]
pub struct InputState {
    keys: HashMap<KeyCode, ButtonState>,
    mouse: [ButtonState; 3],
    pointer: Vec2,
    deferred: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one cycle's events, after any held back from the last cycle.
    pub fn apply_events(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        let mut changed: HashSet<Button> = HashSet::new();
        let pending: Vec<InputEvent> = std::mem::take(&mut self.deferred)
            .into_iter()
            .chain(events)
            .collect();

        for event in pending {
            let button = match event {
                InputEvent::KeyDown { repeat: true, .. } => continue,
                InputEvent::KeyDown { key, .. } | InputEvent::KeyUp { key } => Button::Key(key),
                InputEvent::PointerDown { x, y, button } | InputEvent::PointerUp { x, y, button } => {
                    self.pointer = Vec2::new(x, y);
                    Button::Mouse(button)
                }
                InputEvent::PointerMove { x, y } => {
                    self.pointer = Vec2::new(x, y);
                    continue;
                }
            };

            if changed.contains(&button) {
                self.deferred.push(event);
                continue;
            }

            let before = self.button(button);
            let after = match event {
                InputEvent::KeyDown { .. } | InputEvent::PointerDown { .. } => before.press(),
                _ => before.release(),
            };
            if after != before {
                self.set_button(button, after);
                changed.insert(button);
            }
        }
    }

    /// Settle edge states at the end of a cycle.
    pub fn end_cycle(&mut self) {
        self.keys.retain(|_, state| {
            *state = state.settle();
            *state != ButtonState::IsUp
        });
        for state in &mut self.mouse {
            *state = state.settle();
        }
    }

    fn button(&self, button: Button) -> ButtonState {
        match button {
            Button::Key(key) => self.key_state(key),
            Button::Mouse(mb) => self.mouse[mb.index()],
        }
    }

    fn set_button(&mut self, button: Button, state: ButtonState) {
        match button {
            Button::Key(key) => {
                self.keys.insert(key, state);
            }
            Button::Mouse(mb) => self.mouse[mb.index()] = state,
        }
    }

    pub fn key_state(&self, key: impl Into<KeyCode>) -> ButtonState {
        self.keys.get(&key.into()).copied().unwrap_or_default()
    }

    /// Held down this cycle, including the cycle it was pressed.
    pub fn key_down(&self, key: impl Into<KeyCode>) -> bool {
        self.key_state(key).is_down()
    }

    pub fn key_went_down(&self, key: impl Into<KeyCode>) -> bool {
        self.key_state(key) == ButtonState::WentDown
    }

    pub fn key_went_up(&self, key: impl Into<KeyCode>) -> bool {
        self.key_state(key) == ButtonState::WentUp
    }

    pub fn mouse_state(&self, button: MouseButton) -> ButtonState {
        self.mouse[button.index()]
    }

    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_state(button).is_down()
    }

    pub fn mouse_up(&self, button: MouseButton) -> bool {
        !self.mouse_down(button)
    }

    pub fn mouse_went_down(&self, button: MouseButton) -> bool {
        self.mouse_state(button) == ButtonState::WentDown
    }

    pub fn mouse_went_up(&self, button: MouseButton) -> bool {
        self.mouse_state(button) == ButtonState::WentUp
    }

    /// Whether any mouse button is held.
    pub fn mouse_is_pressed(&self) -> bool {
        self.mouse.iter().any(|s| s.is_down())
    }

    /// Last pointer position in canvas coordinates.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }
}
