//! Transcript guard filtering spurious speech-to-text output.
//!
//! Transcription of silence or near-silence reliably produces a handful of
//! stock phrases ("Thank you.", "Untertitel", ...). Those must never reach
//! routing or history: a rejected transcript produces no action, no state
//! mutation, only a diagnostic log line. Applied to every transcript before
//! any routing happens.

/// Phrases produced from silence, compared after normalization.
const SILENCE_ARTIFACTS: [&str; 6] = [
    "thank you",
    "you're welcome",
    "thanks",
    "subtitle",
    "untertitel",
    "you",
];

/// Normalized transcripts shorter than this are noise.
const MIN_TRANSCRIPT_CHARS: usize = 2;

/// Lowercase, trim, and strip trailing `.`/`!` runs.
fn normalize(transcript: &str) -> String {
    transcript
        .trim()
        .to_lowercase()
        .trim_end_matches(['.', '!'])
        .to_string()
}

/// Returns true when the transcript should be silently dropped.
pub fn is_silence_artifact(transcript: &str) -> bool {
    let normalized = normalize(transcript);
    if normalized.chars().count() < MIN_TRANSCRIPT_CHARS {
        return true;
    }
    SILENCE_ARTIFACTS.contains(&normalized.as_str())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thank_you_with_period_rejected() {
        assert!(is_silence_artifact("Thank you."));
    }

    #[test]
    fn test_known_artifacts_rejected() {
        for artifact in ["Thanks!", "You're welcome", "Subtitle", "Untertitel", "You."] {
            assert!(is_silence_artifact(artifact), "{artifact} should be rejected");
        }
    }

    #[test]
    fn test_two_chars_accepted() {
        assert!(!is_silence_artifact("hi"));
    }

    #[test]
    fn test_single_char_rejected() {
        assert!(is_silence_artifact("h"));
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert!(is_silence_artifact(""));
        assert!(is_silence_artifact("   "));
        assert!(is_silence_artifact(" . "));
    }

    #[test]
    fn test_real_transcript_accepted() {
        assert!(!is_silence_artifact("what does this error mean"));
    }

    #[test]
    fn test_thank_you_in_longer_sentence_accepted() {
        // Only exact matches of the normalized phrase are artifacts.
        assert!(!is_silence_artifact("thank you for the meeting notes"));
    }

    #[test]
    fn test_trailing_punctuation_runs_stripped() {
        assert!(is_silence_artifact("Thank you!!!"));
        assert!(is_silence_artifact("thanks.."));
    }

    #[test]
    fn test_interior_punctuation_kept() {
        // "you're welcome" keeps its apostrophe; only trailing marks strip.
        assert!(is_silence_artifact("You're welcome."));
        assert!(!is_silence_artifact("thank. you"));
    }
}
