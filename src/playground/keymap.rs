//! Editor keybindings.
//!
//! The shell forwards bound chords only; everything else is handled by
//! the editor natively. `Mod` matches Ctrl or Cmd.

use serde::{Deserialize, Serialize};

/// A key press reported by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_mod(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

/// A bindable key combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chord {
    /// `KeyboardEvent.key`, compared case-insensitively.
    pub key: String,
    /// Requires Ctrl or Cmd.
    #[serde(rename = "mod")]
    pub modifier: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Chord {
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifier: false,
            shift: false,
            alt: false,
        }
    }

    pub fn with_mod(key: &str) -> Self {
        Self {
            modifier: true,
            ..Self::plain(key)
        }
    }

    fn matches(&self, press: &KeyPress) -> bool {
        self.key.eq_ignore_ascii_case(&press.key)
            && self.modifier == (press.ctrl || press.meta)
            && self.shift == press.shift
            && self.alt == press.alt
    }
}

/// What a binding does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Rebuild now ("save" gesture).
    Run,
    /// Insert text at the active slot's cursor ("soft newline" gesture).
    InsertText { text: String },
    /// Close the expanded preview.
    Collapse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    #[serde(flatten)]
    pub chord: Chord,
    #[serde(flatten)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        keymap.bind(Chord::with_mod("s"), Command::Run);
        keymap.bind(
            Chord::with_mod("Enter"),
            Command::InsertText { text: "\n".into() },
        );
        keymap.bind(Chord::plain("Escape"), Command::Collapse);
        keymap
    }
}

impl Keymap {
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Register a binding. A later binding for the same chord replaces it.
    pub fn bind(&mut self, chord: Chord, command: Command) {
        self.bindings.retain(|b| b.chord != chord);
        self.bindings.push(Binding { chord, command });
    }

    pub fn resolve(&self, press: &KeyPress) -> Option<&Command> {
        self.bindings
            .iter()
            .find(|b| b.chord.matches(press))
            .map(|b| &b.command)
    }

    #[cfg(test)]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_gesture_runs() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.resolve(&KeyPress::new("s").with_mod()),
            Some(&Command::Run)
        );
        // Cmd on macOS
        let press = KeyPress {
            key: "S".into(),
            meta: true,
            ..KeyPress::default()
        };
        assert_eq!(keymap.resolve(&press), Some(&Command::Run));
    }

    #[test]
    fn test_soft_newline_inserts() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.resolve(&KeyPress::new("Enter").with_mod()),
            Some(&Command::InsertText { text: "\n".into() })
        );
    }

    #[test]
    fn test_unbound_and_modifier_mismatch() {
        let keymap = Keymap::default();
        assert_eq!(keymap.resolve(&KeyPress::new("s")), None);
        assert_eq!(keymap.resolve(&KeyPress::new("Enter")), None);

        let shifted = KeyPress {
            shift: true,
            ..KeyPress::new("s").with_mod()
        };
        assert_eq!(keymap.resolve(&shifted), None);
    }

    #[test]
    fn test_rebind_replaces() {
        let mut keymap = Keymap::default();
        keymap.bind(Chord::with_mod("s"), Command::Collapse);
        assert_eq!(keymap.bindings().len(), 3);
        assert_eq!(
            keymap.resolve(&KeyPress::new("s").with_mod()),
            Some(&Command::Collapse)
        );
    }

    #[test]
    fn test_serialized_for_shell() {
        let json = serde_json::to_value(Keymap::default()).unwrap();
        let first = &json[0];
        assert_eq!(first["key"], "s");
        assert_eq!(first["mod"], true);
        assert_eq!(first["command"], "run");
        assert_eq!(json[1]["text"], "\n");
    }
}
