//! Murmur router crate - transcript intent classification.
//!
//! A cheap, zero-temperature classification pass decides how a finalized
//! transcript is handled before any expensive completion call is made. The
//! model reply is an untrusted, adversarial-shaped contract: it is parsed as
//! a strict two-field JSON object, and anything else degrades to the fixed
//! fallback `AGENT` with the original transcript. The router never produces
//! a hard failure; there is always a decision.

use std::sync::Arc;

use serde::Deserialize;

use murmur_core::types::{RouterAction, RouterDecision};
use murmur_core::Result;

/// Low-latency classification model boundary.
///
/// Implementations send `prompt` to the model at zero temperature and return
/// the raw textual reply.
pub trait IntentClassifier: Send + Sync {
    fn classify_intent(&self, prompt: &str) -> Result<String>;
}

/// Strict wire shape of the classification reply. Unknown fields or action
/// values outside the enum fail the parse.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireDecision {
    action: RouterAction,
    text: String,
}

/// Classifies transcripts into {DICTATION, AGENT, VISION}.
pub struct IntentRouter {
    classifier: Arc<dyn IntentClassifier>,
}

impl IntentRouter {
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self { classifier }
    }

    /// Classify a transcript. Infallible: any classifier failure, parse
    /// failure, or out-of-range action yields `(AGENT, transcript)` so the
    /// pipeline always makes forward progress.
    pub fn classify(&self, transcript: &str) -> RouterDecision {
        let prompt = build_prompt(transcript);
        let reply = match self.classifier.classify_intent(&prompt) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Intent classification failed; falling back to AGENT");
                return fallback(transcript);
            }
        };

        match parse_reply(&reply) {
            Some(decision) => {
                tracing::debug!(action = %decision.action, "Transcript classified");
                decision
            }
            None => {
                tracing::warn!(reply = %reply, "Unparseable classification reply; falling back to AGENT");
                fallback(transcript)
            }
        }
    }
}

fn fallback(transcript: &str) -> RouterDecision {
    RouterDecision::new(RouterAction::Agent, transcript)
}

/// Single classification prompt embedding the transcript.
fn build_prompt(transcript: &str) -> String {
    format!(
        "You route voice transcripts for a desktop assistant. Reply with ONLY a \
         JSON object {{\"action\": ..., \"text\": ...}} and nothing else.\n\
         Actions:\n\
         - \"DICTATION\": the user is dictating text to be typed verbatim; \
         \"text\" is the cleaned-up dictation.\n\
         - \"AGENT\": the user is asking the assistant something; \"text\" is \
         the request.\n\
         - \"VISION\": the user is asking about what is on their screen; \
         \"text\" is the question.\n\
         Transcript: {}",
        transcript
    )
}

/// Parse a reply into a decision, tolerating surrounding code-fence markup.
fn parse_reply(reply: &str) -> Option<RouterDecision> {
    let body = strip_fences(reply);
    let wire: WireDecision = serde_json::from_str(body).ok()?;
    Some(RouterDecision::new(wire.action, wire.text))
}

/// Strip a surrounding ``` fence (with optional `json` tag) if present.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

// =============================================================================
// Tests
// =============================================================================
