//! Value formats that settings are validated against.
//!
//! Values are always stored as text. The format belongs to the key, not the
//! value: `client.gui.autostart` accepts booleans, `client.gui.hotkey`
//! accepts key sequences, and so on.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static INSTANCE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]([A-Za-z0-9-]*[A-Za-z0-9])?$").expect("instance name regex is valid")
});

/// Parse a boolean-like setting value, case-insensitive.
///
/// Accepts `true`/`false`, `on`/`off`, `yes`/`no` and `1`/`0`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Expected format of a setting's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueFormat {
    /// Boolean-like (see [`parse_bool`])
    Boolean,
    /// 64-bit signed integer
    Integer,
    /// Finite floating point number
    Float,
    /// Key sequence such as `Ctrl+Alt+U`, or empty to disable
    KeySequence,
    /// Instance name, or empty for none
    InstanceName,
    /// Exactly one of the listed values
    OneOf(Vec<String>),
    /// Any text
    Text,
}

impl ValueFormat {
    /// Check whether `value` is acceptable for this format.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ValueFormat::Boolean => parse_bool(value).is_some(),
            ValueFormat::Integer => value.parse::<i64>().is_ok(),
            ValueFormat::Float => value.parse::<f64>().is_ok_and(f64::is_finite),
            ValueFormat::KeySequence => value.is_empty() || KeySequence::parse(value).is_some(),
            ValueFormat::InstanceName => value.is_empty() || INSTANCE_NAME.is_match(value),
            ValueFormat::OneOf(choices) => choices.iter().any(|c| c == value),
            ValueFormat::Text => true,
        }
    }

    /// Human description of what this format expects.
    pub fn describe(&self) -> String {
        match self {
            ValueFormat::Boolean => "a boolean (true/false, on/off, yes/no, 1/0)".to_string(),
            ValueFormat::Integer => "an integer".to_string(),
            ValueFormat::Float => "a number".to_string(),
            ValueFormat::KeySequence => "a key sequence such as Ctrl+Alt+U, or empty".to_string(),
            ValueFormat::InstanceName => {
                "an instance name (letters, digits and hyphens, starting with a letter), or empty"
                    .to_string()
            }
            ValueFormat::OneOf(choices) => format!("one of: {}", choices.join(", ")),
            ValueFormat::Text => "any text".to_string(),
        }
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// A keyboard shortcut: a set of modifiers and one key.
///
/// Spelling and modifier order do not matter, so `alt+ctrl+u` and
/// `Ctrl+Alt+U` are the same sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySequence {
    ctrl: bool,
    alt: bool,
    shift: bool,
    meta: bool,
    key: String,
}

impl KeySequence {
    /// Parse a `+`-separated key sequence.
    ///
    /// Returns `None` for empty input, unknown modifiers or keys, repeated
    /// modifiers, or a missing final key.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key, modifiers) = parts.split_last()?;

        let mut seq = KeySequence {
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
            key: canonical_key(key)?,
        };

        for modifier in modifiers {
            let slot = match modifier.to_lowercase().as_str() {
                "ctrl" | "control" => &mut seq.ctrl,
                "alt" | "option" | "opt" => &mut seq.alt,
                "shift" => &mut seq.shift,
                "meta" | "cmd" | "command" | "super" | "win" => &mut seq.meta,
                _ => return None,
            };
            if *slot {
                return None;
            }
            *slot = true;
        }

        Some(seq)
    }

    /// The non-modifier key, in canonical spelling.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether any modifier is held.
    pub fn has_modifiers(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.meta
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = [
            (self.ctrl, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
            (self.meta, "Meta"),
        ];
        for (held, name) in modifiers {
            if held {
                write!(f, "{}+", name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

impl std::str::FromStr for KeySequence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid key sequence: {}", s))
    }
}

fn canonical_key(key: &str) -> Option<String> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return c
            .is_ascii_alphanumeric()
            .then(|| c.to_ascii_uppercase().to_string());
    }

    let lower = key.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=35).contains(&n).then(|| format!("F{}", n));
    }

    let named = match lower.as_str() {
        "space" => "Space",
        "tab" => "Tab",
        "enter" | "return" => "Return",
        "esc" | "escape" => "Esc",
        "backspace" => "Backspace",
        "delete" | "del" => "Del",
        "insert" | "ins" => "Ins",
        "home" => "Home",
        "end" => "End",
        "pgup" | "pageup" => "PgUp",
        "pgdown" | "pagedown" => "PgDown",
        "up" => "Up",
        "down" => "Down",
        "left" => "Left",
        "right" => "Right",
        _ => return None,
    };
    Some(named.to_string())
}
