//! Hotkey binding table with deterministic precedence.
//!
//! Multiple raw key identities map to one logical binding for hardware
//! portability. When two bindings could match the same raw key (overlapping
//! alternates), the first one in declaration order wins; the table preserves
//! configuration order exactly for that reason.

use std::collections::HashSet;

use murmur_core::config::BindingConfig;
use murmur_core::{MurmurError, Result};

use crate::keys::{parse_key, parse_modifier, KeyIdentity, Modifier};

/// What a binding does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Arms a recording session. `wants_selection` modes copy the current
    /// selection before capture starts.
    Record { wants_selection: bool },
    /// Instantaneous pin toggle; never records.
    TogglePin,
    /// Instantaneous speech-output toggle; never records.
    ToggleSpeech,
}

/// One logical hotkey binding.
#[derive(Debug, Clone)]
pub struct HotkeyBinding {
    pub mode_id: String,
    pub label: String,
    pub primary_key: KeyIdentity,
    pub alternate_keys: Vec<KeyIdentity>,
    pub required_modifiers: Vec<Modifier>,
    pub kind: BindingKind,
}

impl HotkeyBinding {
    /// Key-set membership: primary or any alternate, across identity
    /// variants.
    pub fn matches_key(&self, key: KeyIdentity) -> bool {
        self.primary_key == key || self.alternate_keys.contains(&key)
    }

    /// Full match: key-set membership, and if modifiers are required, at
    /// least one currently-held modifier is in the set.
    pub fn matches(&self, key: KeyIdentity, held: &HashSet<Modifier>) -> bool {
        if !self.matches_key(key) {
            return false;
        }
        self.required_modifiers.is_empty()
            || self.required_modifiers.iter().any(|m| held.contains(m))
    }
}

/// Ordered binding table; iteration order is match precedence.
#[derive(Debug, Clone)]
pub struct BindingTable {
    bindings: Vec<HotkeyBinding>,
}

impl BindingTable {
    pub fn from_config(configs: &[BindingConfig]) -> Result<Self> {
        let mut bindings = Vec::with_capacity(configs.len());
        for config in configs {
            bindings.push(parse_binding(config)?);
        }
        Ok(Self { bindings })
    }

    /// First binding matching `key` under the held modifiers, in
    /// declaration order.
    pub fn lookup(&self, key: KeyIdentity, held: &HashSet<Modifier>) -> Option<&HotkeyBinding> {
        self.bindings.iter().find(|b| b.matches(key, held))
    }

    pub fn by_mode(&self, mode_id: &str) -> Option<&HotkeyBinding> {
        self.bindings.iter().find(|b| b.mode_id == mode_id)
    }

    pub fn bindings(&self) -> &[HotkeyBinding] {
        &self.bindings
    }
}

fn parse_binding(config: &BindingConfig) -> Result<HotkeyBinding> {
    let kind = match config.action.as_str() {
        "record" => BindingKind::Record {
            wants_selection: config.capture_selection,
        },
        "pin" => BindingKind::TogglePin,
        "speech" => BindingKind::ToggleSpeech,
        other => {
            return Err(MurmurError::Config(format!(
                "unknown binding action '{}' for mode '{}'",
                other, config.mode
            )));
        }
    };

    let alternate_keys = config
        .alternates
        .iter()
        .map(|s| parse_key(s))
        .collect::<Result<Vec<_>>>()?;
    let required_modifiers = config
        .modifiers
        .iter()
        .map(|s| parse_modifier(s))
        .collect::<Result<Vec<_>>>()?;

    Ok(HotkeyBinding {
        mode_id: config.mode.clone(),
        label: config.label.clone(),
        primary_key: parse_key(&config.key)?,
        alternate_keys,
        required_modifiers,
        kind,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(mode: &str, key: &str, alternates: &[&str]) -> BindingConfig {
        BindingConfig {
            mode: mode.to_string(),
            label: key.to_string(),
            key: key.to_string(),
            alternates: alternates.iter().map(|s| s.to_string()).collect(),
            modifiers: vec![],
            action: "record".to_string(),
            capture_selection: false,
        }
    }

    fn no_modifiers() -> HashSet<Modifier> {
        HashSet::new()
    }

    #[test]
    fn test_from_config_parses_default_table() {
        let config = murmur_core::config::MurmurConfig::default();
        let table = BindingTable::from_config(&config.bindings).unwrap();
        assert_eq!(table.bindings().len(), 5);
        assert_eq!(
            table.by_mode("rewrite").unwrap().kind,
            BindingKind::Record {
                wants_selection: true
            }
        );
        assert_eq!(table.by_mode("pin").unwrap().kind, BindingKind::TogglePin);
        assert_eq!(
            table.by_mode("speech").unwrap().kind,
            BindingKind::ToggleSpeech
        );
    }

    #[test]
    fn test_matches_primary_and_alternates() {
        let table =
            BindingTable::from_config(&[record("dictation", "F3", &["269025098"])]).unwrap();
        let b = table.by_mode("dictation").unwrap();
        assert!(b.matches_key(KeyIdentity::Named(rdev::Key::F3)));
        assert!(b.matches_key(KeyIdentity::VirtualCode(269025098)));
        assert!(!b.matches_key(KeyIdentity::Named(rdev::Key::F4)));
    }

    #[test]
    fn test_lookup_declaration_order_precedence() {
        // Both bindings claim vk 500; the first declared wins.
        let table = BindingTable::from_config(&[
            record("first", "F3", &["500"]),
            record("second", "F4", &["500"]),
        ])
        .unwrap();
        let hit = table
            .lookup(KeyIdentity::VirtualCode(500), &no_modifiers())
            .unwrap();
        assert_eq!(hit.mode_id, "first");
    }

    #[test]
    fn test_lookup_miss() {
        let table = BindingTable::from_config(&[record("dictation", "F3", &[])]).unwrap();
        assert!(table
            .lookup(KeyIdentity::Named(rdev::Key::F8), &no_modifiers())
            .is_none());
    }

    #[test]
    fn test_required_modifiers_any_of() {
        let mut config = record("assistant", "F4", &[]);
        config.modifiers = vec!["control".to_string(), "meta".to_string()];
        let table = BindingTable::from_config(&[config]).unwrap();
        let key = KeyIdentity::Named(rdev::Key::F4);

        assert!(table.lookup(key, &no_modifiers()).is_none());

        let mut held = HashSet::new();
        held.insert(Modifier::Meta);
        assert!(table.lookup(key, &held).is_some());

        held.clear();
        held.insert(Modifier::Shift);
        assert!(table.lookup(key, &held).is_none());
    }

    #[test]
    fn test_unknown_action_is_config_error() {
        let mut config = record("weird", "F3", &[]);
        config.action = "dance".to_string();
        assert!(BindingTable::from_config(&[config]).is_err());
    }

    #[test]
    fn test_bad_key_name_is_config_error() {
        let config = record("dictation", "NotAKey", &[]);
        assert!(BindingTable::from_config(&[config]).is_err());
    }

    #[test]
    fn test_bad_modifier_is_config_error() {
        let mut config = record("dictation", "F3", &[]);
        config.modifiers = vec!["hyper".to_string()];
        assert!(BindingTable::from_config(&[config]).is_err());
    }
}
