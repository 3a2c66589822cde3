use crate::error::NotesError;

/// A key press with its modifiers, as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn plain(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    pub fn meta(key: char) -> Self {
        Self {
            meta: true,
            ..Self::plain(key)
        }
    }

    /// Ctrl+Z or Cmd+Z. Shift+Z reports an uppercase key and does not match.
    pub fn is_undo(&self) -> bool {
        (self.ctrl || self.meta) && self.key == 'z'
    }
}

impl std::fmt::Display for KeyChord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.meta {
            f.write_str("cmd+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

impl std::str::FromStr for KeyChord {
    type Err = NotesError;

    /// Parse chords like `ctrl+z`, `cmd+z` or `shift+ctrl+z`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NotesError::InvalidInput(format!("key chord '{}'", s));
        let mut chord = KeyChord::plain(' ');
        let mut key = None;
        for part in s.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "cmd" | "meta" | "super" => chord.meta = true,
                "shift" => chord.shift = true,
                _ => {
                    let mut chars = part.chars();
                    match (chars.next(), chars.next(), key) {
                        (Some(c), None, None) => key = Some(c),
                        _ => return Err(invalid()),
                    }
                }
            }
        }
        let key = key.ok_or_else(invalid)?;
        chord.key = if chord.shift {
            key.to_ascii_uppercase()
        } else {
            key
        };
        Ok(chord)
    }
}
