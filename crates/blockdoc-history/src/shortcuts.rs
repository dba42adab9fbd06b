//! Undo/redo keyboard shortcuts.
//!
//! Ctrl+Z / Cmd+Z undo, Ctrl+Shift+Z / Cmd+Shift+Z redo. Chords typed while
//! the editor is unfocused only resolve when `globalUndoRedo` is enabled.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: char) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

/// Parses chords such as `"Ctrl+Z"` or `"cmd+shift+z"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyChordError {
    #[error("invalid key chord: {0}")]
    Invalid(String),
    #[error("key chord has no key: {0}")]
    MissingKey(String),
}

impl FromStr for KeyChord {
    type Err = KeyChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = KeyChord::default();
        let mut key = None;
        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "cmd" | "meta" | "super" => chord.meta = true,
                "shift" => chord.shift = true,
                "alt" | "option" => chord.alt = true,
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next(), key) {
                        (Some(c), None, None) => key = Some(c),
                        _ => return Err(KeyChordError::Invalid(s.to_string())),
                    }
                }
            }
        }
        chord.key = key.ok_or_else(|| KeyChordError::MissingKey(s.to_string()))?;
        Ok(chord)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommand {
    Undo,
    Redo,
}

pub fn resolve_shortcut(chord: KeyChord, focused: bool, global: bool) -> Option<HistoryCommand> {
    if !focused && !global {
        return None;
    }
    if chord.alt || chord.ctrl == chord.meta || !chord.key.eq_ignore_ascii_case(&'z') {
        return None;
    }
    Some(if chord.shift {
        HistoryCommand::Redo
    } else {
        HistoryCommand::Undo
    })
}
