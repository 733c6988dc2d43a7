//! Host-neutral input vocabulary.
//!
//! Hosts translate their native pointer and keyboard events into these types
//! and forward them to the controller.

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Keyboard keys the editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable character (letters, digits)
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    /// The "Clear" key found on some keypads
    Clear,
    Up,
    Down,
    Left,
    Right,
    Shift,
    Control,
    Alt,
    Meta,
    /// Anything else, by name (for logging)
    Other(&'static str),
}

impl Key {
    pub fn is_arrow(&self) -> bool {
        matches!(self, Key::Up | Key::Down | Key::Left | Key::Right)
    }

    /// Arrow direction, if this is an arrow key.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }

    /// Digit value for `'0'..='9'`.
    pub fn digit(&self) -> Option<u32> {
        match self {
            Key::Char(c) => c.to_digit(10),
            _ => None,
        }
    }
}

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    /// Whether the given modifier is held.
    pub fn holds(&self, modifier: ModifierKey) -> bool {
        match modifier {
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
            ModifierKey::Ctrl => self.ctrl,
        }
    }
}

/// A modifier that can be bound to an editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Alt,
    Meta,
    Ctrl,
}

impl ModifierKey {
    /// The key that, pressed on its own, toggles this modifier.
    pub fn key(&self) -> Key {
        match self {
            ModifierKey::Alt => Key::Alt,
            ModifierKey::Meta => Key::Meta,
            ModifierKey::Ctrl => Key::Control,
        }
    }
}

/// Pointer event in raw surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub button: MouseButton,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            button: MouseButton::Left,
        }
    }
}

/// Key press or release with the modifier state at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_keys() {
        assert_eq!(Key::Char('3').digit(), Some(3));
        assert_eq!(Key::Char('0').digit(), Some(0));
        assert_eq!(Key::Char('d').digit(), None);
        assert_eq!(Key::Enter.digit(), None);
    }

    #[test]
    fn test_arrow_direction() {
        assert_eq!(Key::Left.direction(), Some(Direction::Left));
        assert!(Key::Down.is_arrow());
        assert!(!Key::Enter.is_arrow());
        assert_eq!(Key::Escape.direction(), None);
    }

    #[test]
    fn test_modifier_holds() {
        let mods = Modifiers::alt();
        assert!(mods.holds(ModifierKey::Alt));
        assert!(!mods.holds(ModifierKey::Meta));
        assert_eq!(ModifierKey::Meta.key(), Key::Meta);
    }
}
