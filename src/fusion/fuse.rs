// Decision fusion.
//
// Reconciles the external classifier's verdict with the local signals into
// one final outcome. An absent verdict fails closed. An unsafe label blocks
// when the external classifier is confident OR the local suspicion score is
// high on its own. An ambiguous unsafe verdict can be downgraded to safe on
// in-domain tech intent, except for the high-consequence doxxing and
// self-harm categories.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::label::ModerationLabel;
use crate::classify::Reason;

/// External confidence at or above this blocks an unsafe label outright.
pub const CONFIDENCE_BLOCK_THRESHOLD: f64 = 0.7;

/// Local suspicion at or above this blocks an unsafe label regardless of
/// external confidence.
pub const SUSPICION_BLOCK_THRESHOLD: f64 = 0.5;

/// The external classifier's verdict, treated as an opaque input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationDecision {
    pub label: ModerationLabel,
    /// Confidence in [0, 1]. Absent or non-finite values default to 1.0 —
    /// the most conservative reading.
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl ModerationDecision {
    pub fn new(label: ModerationLabel, confidence: Option<f64>) -> Self {
        Self {
            label,
            confidence,
            model: None,
            finish_reason: None,
            reason: None,
            raw: None,
        }
    }
}

/// The final decision artifact returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationOutcome {
    pub effective_label: ModerationLabel,
    pub should_block: bool,
    pub downgraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_label: Option<ModerationLabel>,
}

/// Combine the external verdict with the local signals.
pub fn fuse(
    decision: Option<&ModerationDecision>,
    tech_intent: bool,
    reasons: &[Reason],
    suspicion_score: f64,
) -> ModerationOutcome {
    // No external verdict: fail closed, not open.
    let Some(decision) = decision else {
        return ModerationOutcome {
            effective_label: ModerationLabel::OtherUnsafe,
            should_block: true,
            downgraded: false,
            decision_label: None,
        };
    };

    let confidence = decision
        .confidence
        .filter(|c| c.is_finite())
        .unwrap_or(1.0);
    let unsafe_label = !decision.label.is_safe();

    let meets_block_threshold = unsafe_label
        && (confidence >= CONFIDENCE_BLOCK_THRESHOLD
            || suspicion_score >= SUSPICION_BLOCK_THRESHOLD);

    if meets_block_threshold {
        debug!(label = %decision.label, confidence, suspicion_score, "Blocking");
        return ModerationOutcome {
            effective_label: decision.label,
            should_block: true,
            downgraded: false,
            decision_label: Some(decision.label),
        };
    }

    // Doxxing and self-harm are never eligible for the tech-intent
    // downgrade: false negatives there are worse than false positives.
    let downgrade_excluded = matches!(
        decision.label,
        ModerationLabel::PrivacyOrDoxxing | ModerationLabel::SelfHarmOrViolence
    ) || reasons.contains(&Reason::Doxxing);

    if unsafe_label && tech_intent && !downgrade_excluded {
        debug!(label = %decision.label, confidence, "Downgrading ambiguous unsafe verdict");
        return ModerationOutcome {
            effective_label: ModerationLabel::Safe,
            should_block: false,
            downgraded: true,
            decision_label: Some(decision.label),
        };
    }

    // An ambiguous unsafe verdict with no downgrade path passes through as
    // non-blocking but keeps its label for observability.
    ModerationOutcome {
        effective_label: decision.label,
        should_block: false,
        downgraded: false,
        decision_label: Some(decision.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_decision_fails_closed() {
        let outcome = fuse(None, true, &[], 0.0);
        assert!(outcome.should_block);
        assert_eq!(outcome.effective_label, ModerationLabel::OtherUnsafe);
        assert!(!outcome.downgraded);
        assert!(outcome.decision_label.is_none());
    }

    #[test]
    fn confident_unsafe_blocks() {
        let decision = ModerationDecision::new(ModerationLabel::Profanity, Some(0.9));
        let outcome = fuse(Some(&decision), true, &[], 0.0);
        assert!(outcome.should_block);
        assert_eq!(outcome.effective_label, ModerationLabel::Profanity);
    }

    #[test]
    fn absent_confidence_defaults_to_maximal() {
        let decision = ModerationDecision::new(ModerationLabel::Profanity, None);
        let outcome = fuse(Some(&decision), true, &[], 0.0);
        assert!(outcome.should_block);
    }

    #[test]
    fn non_finite_confidence_defaults_to_maximal() {
        let decision = ModerationDecision::new(ModerationLabel::Profanity, Some(f64::NAN));
        let outcome = fuse(Some(&decision), true, &[], 0.0);
        assert!(outcome.should_block);
    }

    #[test]
    fn safe_label_never_blocks() {
        let decision = ModerationDecision::new(ModerationLabel::Safe, Some(1.0));
        let outcome = fuse(Some(&decision), false, &[], 0.9);
        assert!(!outcome.should_block);
        assert_eq!(outcome.effective_label, ModerationLabel::Safe);
        assert!(!outcome.downgraded);
    }

    #[test]
    fn ambiguous_unsafe_with_tech_intent_downgrades() {
        let decision = ModerationDecision::new(ModerationLabel::HarassmentOrTrolling, Some(0.4));
        let outcome = fuse(Some(&decision), true, &[], 0.2);
        assert!(!outcome.should_block);
        assert_eq!(outcome.effective_label, ModerationLabel::Safe);
        assert!(outcome.downgraded);
        assert_eq!(
            outcome.decision_label,
            Some(ModerationLabel::HarassmentOrTrolling)
        );
    }

    #[test]
    fn high_local_suspicion_forces_block_at_low_confidence() {
        let decision = ModerationDecision::new(ModerationLabel::HarassmentOrTrolling, Some(0.4));
        let outcome = fuse(Some(&decision), true, &[], 0.6);
        assert!(outcome.should_block);
        assert_eq!(
            outcome.effective_label,
            ModerationLabel::HarassmentOrTrolling
        );
        assert!(!outcome.downgraded);
    }

    #[test]
    fn doxxing_label_never_downgrades() {
        let decision = ModerationDecision::new(ModerationLabel::PrivacyOrDoxxing, Some(0.1));
        let outcome = fuse(Some(&decision), true, &[], 0.0);
        assert!(!outcome.downgraded);
        assert_eq!(outcome.effective_label, ModerationLabel::PrivacyOrDoxxing);
    }

    #[test]
    fn self_harm_label_never_downgrades() {
        let decision = ModerationDecision::new(ModerationLabel::SelfHarmOrViolence, Some(0.1));
        let outcome = fuse(Some(&decision), true, &[], 0.0);
        assert!(!outcome.downgraded);
    }

    #[test]
    fn local_doxxing_reason_vetoes_downgrade() {
        let decision = ModerationDecision::new(ModerationLabel::OtherUnsafe, Some(0.2));
        let outcome = fuse(Some(&decision), true, &[Reason::Doxxing], 0.2);
        assert!(!outcome.downgraded);
        assert_eq!(outcome.effective_label, ModerationLabel::OtherUnsafe);
        assert!(!outcome.should_block);
    }

    #[test]
    fn ambiguous_unsafe_without_tech_intent_passes_through() {
        let decision = ModerationDecision::new(ModerationLabel::SexualInnuendo, Some(0.3));
        let outcome = fuse(Some(&decision), false, &[], 0.1);
        assert!(!outcome.should_block);
        assert!(!outcome.downgraded);
        assert_eq!(outcome.effective_label, ModerationLabel::SexualInnuendo);
    }
}
