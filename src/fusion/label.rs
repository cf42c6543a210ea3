// Moderation labels and normalization of external label strings.
//
// External classifiers return free-form label text. Normalization folds the
// string and maps it onto the closed label set through an ordered list of
// substring rules — first match wins, so the order is significant ("self"
// would otherwise collide with other categories).

use serde::{Deserialize, Serialize};

/// The closed set of moderation labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationLabel {
    Safe,
    Profanity,
    HarassmentOrTrolling,
    SexualInnuendo,
    PrivacyOrDoxxing,
    SelfHarmOrViolence,
    OtherUnsafe,
}

impl ModerationLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationLabel::Safe => "safe",
            ModerationLabel::Profanity => "profanity",
            ModerationLabel::HarassmentOrTrolling => "harassment_or_trolling",
            ModerationLabel::SexualInnuendo => "sexual_innuendo",
            ModerationLabel::PrivacyOrDoxxing => "privacy_or_doxxing",
            ModerationLabel::SelfHarmOrViolence => "self_harm_or_violence",
            ModerationLabel::OtherUnsafe => "other_unsafe",
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, ModerationLabel::Safe)
    }
}

impl std::fmt::Display for ModerationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered normalization rules: any listed needle contained in the folded
/// label selects the target.
const RULES: &[(&[&str], ModerationLabel)] = &[
    (&["safe"], ModerationLabel::Safe),
    (&["profan"], ModerationLabel::Profanity),
    (&["harass", "troll"], ModerationLabel::HarassmentOrTrolling),
    (&["sexual", "nsfw", "innuendo"], ModerationLabel::SexualInnuendo),
    (&["dox", "privacy"], ModerationLabel::PrivacyOrDoxxing),
    (&["self", "harm", "violence"], ModerationLabel::SelfHarmOrViolence),
];

/// Map an arbitrary external label string onto the closed label set.
pub fn normalize_label(raw: &str) -> ModerationLabel {
    let folded = fold(raw);
    for (needles, label) in RULES {
        if needles.iter().any(|n| folded.contains(n)) {
            return *label;
        }
    }
    ModerationLabel::OtherUnsafe
}

/// Lowercase and collapse non-letter runs to single underscores.
fn fold(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        if c.is_alphabetic() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_strings_round_trip() {
        for label in [
            ModerationLabel::Safe,
            ModerationLabel::Profanity,
            ModerationLabel::HarassmentOrTrolling,
            ModerationLabel::SexualInnuendo,
            ModerationLabel::PrivacyOrDoxxing,
        ] {
            assert_eq!(normalize_label(label.as_str()), label);
        }
    }

    #[test]
    fn free_form_labels_map_by_containment() {
        assert_eq!(normalize_label("SAFE"), ModerationLabel::Safe);
        assert_eq!(normalize_label("Profanity!"), ModerationLabel::Profanity);
        assert_eq!(
            normalize_label("Harassment & Trolling"),
            ModerationLabel::HarassmentOrTrolling
        );
        assert_eq!(normalize_label("nsfw-content"), ModerationLabel::SexualInnuendo);
        assert_eq!(normalize_label("doxxing attempt"), ModerationLabel::PrivacyOrDoxxing);
        assert_eq!(
            normalize_label("self-harm / violence"),
            ModerationLabel::SelfHarmOrViolence
        );
    }

    #[test]
    fn unknown_labels_fall_through_to_other_unsafe() {
        assert_eq!(normalize_label("gibberish"), ModerationLabel::OtherUnsafe);
        assert_eq!(normalize_label(""), ModerationLabel::OtherUnsafe);
    }

    #[test]
    fn priority_order_is_significant() {
        // "harmful profanity" contains needles for two rules; the earlier
        // rule (profanity) wins
        assert_eq!(normalize_label("harmful profanity"), ModerationLabel::Profanity);
    }

    #[test]
    fn fold_collapses_non_letter_runs() {
        assert_eq!(fold("Self-Harm / Violence"), "self_harm_violence");
    }
}
