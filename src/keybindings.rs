//! Keyboard shortcuts for the gallery.
//!
//! Only two bindings exist: Escape closes the image viewer, and Ctrl+Z is
//! reserved for undo. Undo is not implemented, so that binding only stops the
//! browser's default action.

use serde::{Deserialize, Serialize};

/// A key press as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Key name as in `KeyboardEvent.key` ("Escape", "z", ...)
    pub key: String,
    /// Whether Ctrl was held
    pub ctrl: bool,
}

impl KeyPress {
    /// A key press without modifiers.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
        }
    }

    /// A key press with Ctrl held.
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: true,
        }
    }
}

/// A key chord in a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    /// Key name, compared case-insensitively
    pub key: String,
    /// Whether Ctrl must be held
    #[serde(default)]
    pub ctrl: bool,
}

impl KeyChord {
    /// Check if a key press matches this chord.
    pub fn matches(&self, press: &KeyPress) -> bool {
        self.ctrl == press.ctrl && self.key.eq_ignore_ascii_case(&press.key)
    }
}

/// Actions a key press can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryAction {
    /// Close the image viewer
    CloseViewer,
    /// Undo (reserved, does nothing)
    Undo,
}

/// Keybinding configuration for the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Chord that closes the image viewer
    pub close_viewer: KeyChord,
    /// Chord reserved for undo
    pub undo: KeyChord,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            close_viewer: KeyChord {
                key: "Escape".to_string(),
                ctrl: false,
            },
            undo: KeyChord {
                key: "z".to_string(),
                ctrl: true,
            },
        }
    }
}

impl KeyBindings {
    /// Get the action bound to a key press, if any.
    pub fn action_for(&self, press: &KeyPress) -> Option<GalleryAction> {
        if self.close_viewer.matches(press) {
            Some(GalleryAction::CloseViewer)
        } else if self.undo.matches(press) {
            Some(GalleryAction::Undo)
        } else {
            None
        }
    }
}

/// What the platform should do with a key event after the gallery saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// The gallery acted on the key
    pub handled: bool,
    /// The platform's default action should be suppressed
    pub prevent_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.action_for(&KeyPress::new("Escape")),
            Some(GalleryAction::CloseViewer)
        );
        assert_eq!(
            bindings.action_for(&KeyPress::ctrl("z")),
            Some(GalleryAction::Undo)
        );
        assert_eq!(
            bindings.action_for(&KeyPress::ctrl("Z")),
            Some(GalleryAction::Undo)
        );
    }

    #[test]
    fn test_modifiers_must_match() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for(&KeyPress::new("z")), None);
        assert_eq!(bindings.action_for(&KeyPress::ctrl("Escape")), None);
        assert_eq!(bindings.action_for(&KeyPress::new("Enter")), None);
    }
}
