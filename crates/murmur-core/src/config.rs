use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Murmur application.
///
/// Loaded from `~/.config/murmur/config.toml` by default. Each section
/// corresponds to one component or cross-cutting concern. The binding table
/// is an ordered array: declaration order is match precedence when two
/// bindings share a key code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MurmurConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default = "default_bindings")]
    pub bindings: Vec<BindingConfig>,
}

impl Default for MurmurConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            audio: AudioConfig::default(),
            history: HistoryConfig::default(),
            speech: SpeechConfig::default(),
            capture: CaptureConfig::default(),
            assistant: AssistantConfig::default(),
            bindings: default_bindings(),
        }
    }
}

impl MurmurConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MurmurConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Audio capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Capture sample rate in Hz (mono f32 stream).
    pub sample_rate: u32,
    /// Keep every Nth sample in the live preview feed.
    pub preview_decimation: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            preview_decimation: 10,
        }
    }
}

/// Conversation history limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Token budget for the conversation context window.
    pub token_budget: usize,
    /// Maximum entries retained in the recent-answer log.
    pub answer_log_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            token_budget: 32_000,
            answer_log_capacity: 15,
        }
    }
}

/// Speech synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether spoken responses are enabled at startup.
    pub enabled: bool,
    /// Default synthesis voice.
    pub voice: String,
    /// Voices offered by the synthesis collaborator.
    pub voices: Vec<String>,
    /// Responses longer than this are truncated before synthesis.
    pub max_chars: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            voice: "diana".to_string(),
            voices: vec![
                "diana".to_string(),
                "hannah".to_string(),
                "autumn".to_string(),
                "austin".to_string(),
                "daniel".to_string(),
                "troy".to_string(),
            ],
            max_chars: 4_000,
        }
    }
}

/// Capture session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Toggle mode: pressing the binding again stops the session.
    /// Hold mode (the default) stops on key release.
    pub toggle_mode: bool,
    /// Budget in milliseconds for the clipboard to settle after a simulated
    /// copy of the current selection.
    pub selection_settle_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            toggle_mode: false,
            selection_settle_ms: 100,
        }
    }
}

/// Conversational assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// System prompt prepended to every completion call.
    pub system_prompt: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are a concise desktop voice assistant. \
                            Return only the direct response, grounded and brief."
                .to_string(),
        }
    }
}

/// One entry in the ordered hotkey binding table.
///
/// `key` and `alternates` are either named keys ("F3", "MetaRight") or
/// decimal vendor virtual-key codes ("269025046" covers media keys that
/// arrive as raw codes on some keyboards).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Logical mode identifier ("dictation", "assistant", ...).
    pub mode: String,
    /// Human-readable label for presentation surfaces.
    pub label: String,
    /// Primary key.
    pub key: String,
    /// Vendor/media key variants of the same logical action.
    #[serde(default)]
    pub alternates: Vec<String>,
    /// If non-empty, at least one of these modifiers must be held.
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// "record" (default), "pin", or "speech".
    #[serde(default = "default_binding_action")]
    pub action: String,
    /// Copy the current selection before capture starts (rewrite-style modes).
    #[serde(default)]
    pub capture_selection: bool,
}

fn default_binding_action() -> String {
    "record".to_string()
}

fn default_bindings() -> Vec<BindingConfig> {
    vec![
        BindingConfig {
            mode: "dictation".to_string(),
            label: "F3".to_string(),
            key: "F3".to_string(),
            alternates: vec!["269025098".to_string(), "65027".to_string()],
            modifiers: vec![],
            action: "record".to_string(),
            capture_selection: false,
        },
        BindingConfig {
            mode: "assistant".to_string(),
            label: "F4".to_string(),
            key: "F4".to_string(),
            alternates: vec!["269025099".to_string(), "MetaRight".to_string()],
            modifiers: vec![],
            action: "record".to_string(),
            capture_selection: false,
        },
        BindingConfig {
            mode: "rewrite".to_string(),
            label: "F7".to_string(),
            key: "F7".to_string(),
            alternates: vec!["269025046".to_string()],
            modifiers: vec![],
            action: "record".to_string(),
            capture_selection: true,
        },
        BindingConfig {
            mode: "pin".to_string(),
            label: "F9".to_string(),
            key: "F9".to_string(),
            alternates: vec!["269025047".to_string()],
            modifiers: vec![],
            action: "pin".to_string(),
            capture_selection: false,
        },
        BindingConfig {
            mode: "speech".to_string(),
            label: "F10".to_string(),
            key: "F10".to_string(),
            alternates: vec!["269025042".to_string()],
            modifiers: vec![],
            action: "speech".to_string(),
            capture_selection: false,
        },
    ]
}
