//! Keybindings for the region editor.
//!
//! Maps raw key presses to editor actions. The two mode modifiers (shrink and
//! expand) are configurable; everything else follows fixed conventions:
//! arrows deform, Delete/Backspace/Clear/`d` delete, digits set the label,
//! Escape cancels drawing, Enter/Shift+Enter cycle selection, Ctrl/Cmd+Z undoes.

use serde::{Deserialize, Serialize};

use crate::input::{Direction, Key, KeyEvent, ModifierKey};

/// How arrow keys act on the selected region, and which markers are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Translate the whole region
    #[default]
    Move,
    /// Push the edge in the arrow direction outward
    Expand,
    /// Pull the edge opposite the arrow direction inward
    Shrink,
}

impl EditMode {
    pub fn name(&self) -> &'static str {
        match self {
            EditMode::Move => "Move",
            EditMode::Expand => "Expand",
            EditMode::Shrink => "Shrink",
        }
    }
}

/// What a key press asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Move/expand/shrink the selected region one step
    Deform {
        mode: EditMode,
        direction: Direction,
        /// Use the fine step (a tenth of a tick)
        fine: bool,
    },
    /// Delete the selected region
    Delete,
    /// Set the selected region's label
    SetLabel(u32),
    /// Abort the region being drawn
    Cancel,
    SelectNext,
    SelectPrev,
    Undo,
    /// A mode modifier went down on its own
    EnterMode(EditMode),
}

/// Keybinding configuration for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Modifier that turns arrow keys into shrink operations
    pub shrink_modifier: ModifierKey,
    /// Modifier that turns arrow keys into expand operations
    pub expand_modifier: ModifierKey,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            shrink_modifier: ModifierKey::Alt,
            expand_modifier: ModifierKey::Meta,
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a key press to an action, if the editor handles it.
    pub fn resolve(&self, event: &KeyEvent) -> Option<EditorAction> {
        let mods = event.modifiers;

        if let Some(direction) = event.key.direction() {
            return Some(EditorAction::Deform {
                mode: self.arrow_mode(event),
                direction,
                fine: mods.shift,
            });
        }

        match event.key {
            Key::Char('z' | 'Z') if mods.ctrl || mods.meta => Some(EditorAction::Undo),
            Key::Delete | Key::Clear | Key::Backspace | Key::Char('d') => {
                Some(EditorAction::Delete)
            }
            Key::Char(c) if c.is_ascii_digit() => event.key.digit().map(EditorAction::SetLabel),
            Key::Escape => Some(EditorAction::Cancel),
            Key::Enter if mods.shift => Some(EditorAction::SelectPrev),
            Key::Enter => Some(EditorAction::SelectNext),
            key if key == self.expand_modifier.key() => {
                Some(EditorAction::EnterMode(EditMode::Expand))
            }
            key if key == self.shrink_modifier.key() => {
                Some(EditorAction::EnterMode(EditMode::Shrink))
            }
            _ => None,
        }
    }

    /// Mode an arrow press operates in, given the modifiers held.
    pub fn arrow_mode(&self, event: &KeyEvent) -> EditMode {
        if event.modifiers.holds(self.shrink_modifier) {
            EditMode::Shrink
        } else if event.modifiers.holds(self.expand_modifier) {
            EditMode::Expand
        } else {
            EditMode::Move
        }
    }

    /// Mode to fall back to when a key is released, if it was a mode modifier.
    ///
    /// Releasing one mode modifier while the other is still held switches to
    /// the other mode instead of back to [`EditMode::Move`].
    pub fn mode_after_release(&self, event: &KeyEvent) -> Option<EditMode> {
        let mods = event.modifiers;
        if event.key == self.expand_modifier.key() {
            if mods.holds(self.shrink_modifier) {
                return Some(EditMode::Shrink);
            }
            return Some(EditMode::Move);
        }
        if event.key == self.shrink_modifier.key() {
            if mods.holds(self.expand_modifier) {
                return Some(EditMode::Expand);
            }
            return Some(EditMode::Move);
        }
        None
    }

    /// Check that the two mode modifiers differ.
    pub fn is_valid(&self) -> bool {
        self.shrink_modifier != self.expand_modifier
    }
}
