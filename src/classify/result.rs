// The local verdict produced for every request.
//
// Immutable once constructed; consumed by decision fusion and surfaced for
// logging and telemetry.

use serde::{Deserialize, Serialize};

use crate::text::Language;

/// Why a message was flagged (or tolerated). The wire tags are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// A lexicon word matched. The wire tag predates this engine and is
    /// kept for downstream compatibility.
    #[serde(rename = "glin")]
    Lexicon,
    Doxxing,
    SexualBody,
    Harassment,
    SelfHarm,
    PersonalSensitive,
    OffTopic,
    SafePhrase,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Lexicon => "glin",
            Reason::Doxxing => "doxxing",
            Reason::SexualBody => "sexual_body",
            Reason::Harassment => "harassment",
            Reason::SelfHarm => "self_harm",
            Reason::PersonalSensitive => "personal_sensitive",
            Reason::OffTopic => "off_topic",
            Reason::SafePhrase => "safe_phrase",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The structured verdict of the local rule engine for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalModerationResult {
    /// True iff an independent high-severity signal fired (the off-topic
    /// cue alone never flags).
    pub flagged: bool,
    /// The normalized form the heuristics ran against.
    pub normalized: String,
    /// Reasons in fixed assembly order.
    pub reasons: Vec<Reason>,
    /// Matched lexicon words, lowercased, allowlisted words excluded.
    pub lexicon_matches: Vec<String>,
    /// Languages whose lexicons were consulted.
    pub languages: Vec<Language>,
    /// Portfolio intent, tech intent, or the non-Latin carve-out.
    pub professional_intent: bool,
    pub tech_intent: bool,
    pub harassment_cue: bool,
    pub self_harm_cue: bool,
    pub personal_sensitive_cue: bool,
    /// Additive-then-clamped suspicion in [0, 1].
    pub suspicion_score: f64,
}
