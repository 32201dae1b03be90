//! Key identity model for heterogeneous hardware.
//!
//! The same logical action can arrive as a named key (F3) on one keyboard
//! and as a vendor virtual-key code (a media key) on another. Both are
//! represented by one tagged variant and matched by structural equality, so
//! a binding's key set can mix the two freely.

use std::fmt;

use murmur_core::{MurmurError, Result};

/// A raw key as delivered by the global listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyIdentity {
    /// A key the listener knows by name.
    Named(rdev::Key),
    /// A vendor/media key that only arrives as a raw code.
    VirtualCode(u32),
}

impl From<rdev::Key> for KeyIdentity {
    fn from(key: rdev::Key) -> Self {
        match key {
            rdev::Key::Unknown(code) => KeyIdentity::VirtualCode(code),
            named => KeyIdentity::Named(named),
        }
    }
}

impl fmt::Display for KeyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyIdentity::Named(key) => write!(f, "{:?}", key),
            KeyIdentity::VirtualCode(code) => write!(f, "vk{}", code),
        }
    }
}

/// Parse a configured key: a decimal virtual-key code or a key name.
pub fn parse_key(spec: &str) -> Result<KeyIdentity> {
    let spec = spec.trim();
    if !spec.is_empty() && spec.chars().all(|c| c.is_ascii_digit()) {
        let code: u32 = spec
            .parse()
            .map_err(|_| MurmurError::Config(format!("virtual-key code out of range: '{}'", spec)))?;
        return Ok(KeyIdentity::VirtualCode(code));
    }
    named_key(spec).map(KeyIdentity::Named)
}

fn named_key(name: &str) -> Result<rdev::Key> {
    use rdev::Key;
    let key = match name.to_lowercase().as_str() {
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        "space" => Key::Space,
        "tab" => Key::Tab,
        "return" | "enter" => Key::Return,
        "escape" => Key::Escape,
        "backspace" => Key::Backspace,
        "delete" => Key::Delete,
        "insert" => Key::Insert,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "up" | "uparrow" => Key::UpArrow,
        "down" | "downarrow" => Key::DownArrow,
        "left" | "leftarrow" => Key::LeftArrow,
        "right" | "rightarrow" => Key::RightArrow,
        "shiftleft" => Key::ShiftLeft,
        "shiftright" => Key::ShiftRight,
        "controlleft" => Key::ControlLeft,
        "controlright" => Key::ControlRight,
        "alt" => Key::Alt,
        "altgr" => Key::AltGr,
        "metaleft" => Key::MetaLeft,
        "metaright" => Key::MetaRight,
        "capslock" => Key::CapsLock,
        "printscreen" => Key::PrintScreen,
        other => {
            return Err(MurmurError::Config(format!("unknown key name: '{}'", other)));
        }
    };
    Ok(key)
}

/// Logical modifier classes tracked by the pressed-key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Shift,
    Control,
    Alt,
    Meta,
}

/// Parse a configured modifier name.
pub fn parse_modifier(spec: &str) -> Result<Modifier> {
    match spec.trim().to_lowercase().as_str() {
        "shift" => Ok(Modifier::Shift),
        "control" | "ctrl" => Ok(Modifier::Control),
        "alt" => Ok(Modifier::Alt),
        "meta" | "super" | "cmd" => Ok(Modifier::Meta),
        other => Err(MurmurError::Config(format!(
            "unknown modifier name: '{}'",
            other
        ))),
    }
}

/// The modifier class of a raw key, if it is one.
pub fn modifier_of(key: rdev::Key) -> Option<Modifier> {
    use rdev::Key;
    match key {
        Key::ShiftLeft | Key::ShiftRight => Some(Modifier::Shift),
        Key::ControlLeft | Key::ControlRight => Some(Modifier::Control),
        Key::Alt | Key::AltGr => Some(Modifier::Alt),
        Key::MetaLeft | Key::MetaRight => Some(Modifier::Meta),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_raw_key_normalizes_to_virtual_code() {
        let identity = KeyIdentity::from(rdev::Key::Unknown(269025046));
        assert_eq!(identity, KeyIdentity::VirtualCode(269025046));
    }

    #[test]
    fn test_named_key_stays_named() {
        assert_eq!(
            KeyIdentity::from(rdev::Key::F3),
            KeyIdentity::Named(rdev::Key::F3)
        );
    }

    #[test]
    fn test_structural_equality_across_variants() {
        assert_ne!(
            KeyIdentity::Named(rdev::Key::F3),
            KeyIdentity::VirtualCode(269025046)
        );
        assert_eq!(KeyIdentity::VirtualCode(7), KeyIdentity::VirtualCode(7));
    }

    #[test]
    fn test_parse_key_digits_is_virtual_code() {
        assert_eq!(
            parse_key("269025098").unwrap(),
            KeyIdentity::VirtualCode(269025098)
        );
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!(parse_key("F3").unwrap(), KeyIdentity::Named(rdev::Key::F3));
        assert_eq!(parse_key("f10").unwrap(), KeyIdentity::Named(rdev::Key::F10));
        assert_eq!(
            parse_key("MetaRight").unwrap(),
            KeyIdentity::Named(rdev::Key::MetaRight)
        );
    }

    #[test]
    fn test_parse_key_unknown_name_is_error() {
        assert!(parse_key("HyperMegaKey").is_err());
    }

    #[test]
    fn test_parse_key_overlong_code_is_error() {
        assert!(parse_key("99999999999999999999").is_err());
    }

    #[test]
    fn test_parse_modifier_aliases() {
        assert_eq!(parse_modifier("ctrl").unwrap(), Modifier::Control);
        assert_eq!(parse_modifier("control").unwrap(), Modifier::Control);
        assert_eq!(parse_modifier("super").unwrap(), Modifier::Meta);
        assert_eq!(parse_modifier("Shift").unwrap(), Modifier::Shift);
        assert!(parse_modifier("hyper").is_err());
    }

    #[test]
    fn test_modifier_of_classes() {
        assert_eq!(modifier_of(rdev::Key::ShiftLeft), Some(Modifier::Shift));
        assert_eq!(modifier_of(rdev::Key::ShiftRight), Some(Modifier::Shift));
        assert_eq!(modifier_of(rdev::Key::ControlRight), Some(Modifier::Control));
        assert_eq!(modifier_of(rdev::Key::AltGr), Some(Modifier::Alt));
        assert_eq!(modifier_of(rdev::Key::MetaLeft), Some(Modifier::Meta));
        assert_eq!(modifier_of(rdev::Key::F3), None);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(KeyIdentity::VirtualCode(42).to_string(), "vk42");
        assert_eq!(KeyIdentity::Named(rdev::Key::F3).to_string(), "F3");
    }
}
