/// Browser-style key code.
///
/// Letters and digits use their uppercase ASCII value, so `KeyCode::from('a')`
/// and `KeyCode::from("a")` both give 65.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

impl KeyCode {
    /// Returned for names that are not in the key table.
    pub const UNKNOWN: KeyCode = KeyCode(0);
    pub const BACKSPACE: KeyCode = KeyCode(8);
    pub const TAB: KeyCode = KeyCode(9);
    pub const ENTER: KeyCode = KeyCode(13);
    pub const SHIFT: KeyCode = KeyCode(16);
    pub const CONTROL: KeyCode = KeyCode(17);
    pub const ALT: KeyCode = KeyCode(18);
    pub const PAUSE: KeyCode = KeyCode(19);
    pub const CAPS_LOCK: KeyCode = KeyCode(20);
    pub const ESCAPE: KeyCode = KeyCode(27);
    pub const SPACE: KeyCode = KeyCode(32);
    pub const PAGE_UP: KeyCode = KeyCode(33);
    pub const PAGE_DOWN: KeyCode = KeyCode(34);
    pub const END: KeyCode = KeyCode(35);
    pub const HOME: KeyCode = KeyCode(36);
    pub const LEFT: KeyCode = KeyCode(37);
    pub const UP: KeyCode = KeyCode(38);
    pub const RIGHT: KeyCode = KeyCode(39);
    pub const DOWN: KeyCode = KeyCode(40);
    pub const INSERT: KeyCode = KeyCode(45);
    pub const DELETE: KeyCode = KeyCode(46);

    /// Look up a key by name (case-insensitive). Single characters map to
    /// their key code.
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let lower = name.trim().to_ascii_lowercase();
        let mut chars = lower.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::from(c));
        }

        let code = match lower.as_str() {
            "backspace" => Self::BACKSPACE,
            "tab" => Self::TAB,
            "enter" | "return" => Self::ENTER,
            "shift" => Self::SHIFT,
            "ctrl" | "control" => Self::CONTROL,
            "alt" => Self::ALT,
            "pause" | "break" => Self::PAUSE,
            "capslock" | "caps_lock" => Self::CAPS_LOCK,
            "esc" | "escape" => Self::ESCAPE,
            "space" => Self::SPACE,
            "pageup" | "page_up" => Self::PAGE_UP,
            "pagedown" | "page_down" => Self::PAGE_DOWN,
            "end" => Self::END,
            "home" => Self::HOME,
            "left" | "left_arrow" => Self::LEFT,
            "up" | "up_arrow" => Self::UP,
            "right" | "right_arrow" => Self::RIGHT,
            "down" | "down_arrow" => Self::DOWN,
            "insert" => Self::INSERT,
            "delete" => Self::DELETE,
            "plus" | "equal" => KeyCode(187),
            "comma" => KeyCode(188),
            "minus" => KeyCode(189),
            "period" => KeyCode(190),
            "slash" => KeyCode(191),
            other => {
                if let Some(n) = other.strip_prefix("numpad").and_then(|d| d.parse::<u32>().ok()) {
                    if n <= 9 {
                        return Some(KeyCode(96 + n));
                    }
                }
                if let Some(n) = other.strip_prefix('f').and_then(|d| d.parse::<u32>().ok()) {
                    if (1..=12).contains(&n) {
                        return Some(KeyCode(111 + n));
                    }
                }
                return None;
            }
        };
        Some(code)
    }
}

impl From<u32> for KeyCode {
    fn from(code: u32) -> Self {
        KeyCode(code)
    }
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        match c {
            ' ' => KeyCode::SPACE,
            _ => KeyCode(c.to_ascii_uppercase() as u32),
        }
    }
}

impl From<&str> for KeyCode {
    fn from(name: &str) -> Self {
        KeyCode::from_name(name).unwrap_or_else(|| {
            log::warn!("unknown key name {name:?}");
            KeyCode::UNKNOWN
        })
    }
}

/// Mouse buttons tracked by the input state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Center,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Center];

    pub(crate) fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Center => 2,
        }
    }

    /// DOM `MouseEvent.button` numbering: 0 left, 1 middle, 2 right.
    pub fn from_dom(button: u32) -> Option<MouseButton> {
        match button {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Center),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}
