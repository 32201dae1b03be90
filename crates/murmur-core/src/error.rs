use thiserror::Error;

/// Top-level error type for the Murmur system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates return
/// `MurmurError` directly so the `?` operator works across crate boundaries.
/// Worker-side failures are never surfaced to the user; they are logged and
/// the operation degrades to "no result".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MurmurError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Screenshot error: {0}")]
    Screenshot(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Bridge error: {0}")]
    Bridge(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MurmurError {
    fn from(err: toml::de::Error) -> Self {
        MurmurError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MurmurError {
    fn from(err: toml::ser::Error) -> Self {
        MurmurError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MurmurError {
    fn from(err: serde_json::Error) -> Self {
        MurmurError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Murmur operations.
pub type Result<T> = std::result::Result<T, MurmurError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MurmurError::Config("missing binding table".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing binding table");
    }

    #[test]
    fn test_subsystem_variants_display() {
        let cases: Vec<(MurmurError, &str)> = vec![
            (
                MurmurError::Audio("no input device".to_string()),
                "Audio error: no input device",
            ),
            (
                MurmurError::Capture("session already active".to_string()),
                "Capture error: session already active",
            ),
            (
                MurmurError::Transcription("service timeout".to_string()),
                "Transcription error: service timeout",
            ),
            (
                MurmurError::Routing("malformed reply".to_string()),
                "Routing error: malformed reply",
            ),
            (
                MurmurError::Completion("upstream 500".to_string()),
                "Completion error: upstream 500",
            ),
            (
                MurmurError::Speech("voice unavailable".to_string()),
                "Speech error: voice unavailable",
            ),
            (
                MurmurError::Screenshot("capture denied".to_string()),
                "Screenshot error: capture denied",
            ),
            (
                MurmurError::Clipboard("selection empty".to_string()),
                "Clipboard error: selection empty",
            ),
            (
                MurmurError::Output("focus lost".to_string()),
                "Output error: focus lost",
            ),
            (
                MurmurError::Bridge("actor gone".to_string()),
                "Bridge error: actor gone",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MurmurError = io_err.into();
        assert!(matches!(err, MurmurError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_de_error_conversion() {
        let bad_toml = "invalid = [[[";
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        let err: MurmurError = parsed.unwrap_err().into();
        assert!(matches!(err, MurmurError::Config(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let bad_json = "{ not json }";
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        let err: MurmurError = parsed.unwrap_err().into();
        assert!(matches!(err, MurmurError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(7);
            let _value = io_result?;
            Ok("success".to_string())
        }

        assert_eq!(inner().unwrap(), "success");
    }
}
