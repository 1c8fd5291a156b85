use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    New,
    Open,
    Save,
    SaveAs,
}

impl Shortcut {
    /// Resolve a chord. `ctrl` and `command` are interchangeable, any other
    /// modifier combination is left to the platform.
    pub fn from_chord(chord: &KeyChord) -> Option<Self> {
        if !(chord.ctrl || chord.meta) || chord.alt {
            return None;
        }
        match (chord.key.to_ascii_lowercase(), chord.shift) {
            ('n', false) => Some(Self::New),
            ('o', false) => Some(Self::Open),
            ('s', false) => Some(Self::Save),
            ('s', true) => Some(Self::SaveAs),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "Ctrl + N",
            Self::Open => "Ctrl + O",
            Self::Save => "Ctrl + S",
            Self::SaveAs => "Ctrl + Shift + S",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyChord {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    pub key: char,
}

impl FromStr for KeyChord {
    type Err = anyhow::Error;

    /// Parses `ctrl+shift+s`, `command+o`, `Cmd+N` and the like.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = KeyChord::default();
        let mut key = None;
        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "cmd" | "command" | "meta" | "super" => chord.meta = true,
                "shift" => chord.shift = true,
                "alt" | "option" => chord.alt = true,
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next(), key) {
                        (Some(c), None, None) => key = Some(c),
                        _ => return Err(anyhow::anyhow!("Invalid key chord: {}", s)),
                    }
                }
            }
        }
        chord.key = key.ok_or_else(|| anyhow::anyhow!("Key chord has no key: {}", s))?;
        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.meta {
            f.write_str("command+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// What the host should do with a key event after the orchestrator saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// A shortcut ran; suppress the platform's own handling of the chord.
    Handled,
    PassThrough,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortcut(chord: &str) -> Option<Shortcut> {
        Shortcut::from_chord(&chord.parse().unwrap())
    }

    #[test]
    fn test_bindings() {
        assert_eq!(shortcut("ctrl+n"), Some(Shortcut::New));
        assert_eq!(shortcut("command+n"), Some(Shortcut::New));
        assert_eq!(shortcut("ctrl+o"), Some(Shortcut::Open));
        assert_eq!(shortcut("cmd+s"), Some(Shortcut::Save));
        assert_eq!(shortcut("ctrl+shift+s"), Some(Shortcut::SaveAs));
        assert_eq!(shortcut("Command+Shift+S"), Some(Shortcut::SaveAs));
    }

    #[test]
    fn test_unbound_chords() {
        assert_eq!(shortcut("ctrl+z"), None);
        assert_eq!(shortcut("ctrl+shift+n"), None);
        assert_eq!(shortcut("ctrl+alt+s"), None);
        // No modifier
        assert_eq!(shortcut("s"), None);
        assert_eq!(shortcut("shift+s"), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!("ctrl+".parse::<KeyChord>().is_err());
        assert!("ctrl+shift".parse::<KeyChord>().is_err());
        assert!("ctrl+ab".parse::<KeyChord>().is_err());
        assert!("ctrl+a+b".parse::<KeyChord>().is_err());
    }

    #[test]
    fn test_display() {
        let chord: KeyChord = "shift+ctrl+s".parse().unwrap();
        assert_eq!(chord.to_string(), "ctrl+shift+s");
    }
}
