// The local rule engine.
//
// `classify` runs the full pipeline for one message: normalization,
// language selection, safe-phrase pre-check, intent detection, lexicon
// matching, the heuristic families, and suspicion scoring. It never fails;
// every internal problem degrades to a weaker signal instead.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use regex_lite::Regex;
use tracing::debug;

use super::patterns::{HeuristicFamilies, PORTFOLIO_CJK_TOKENS};
use super::result::{LocalModerationResult, Reason};
use crate::lexicon::{expand_variants, find_matches, LexiconStore, MatcherConfig};
use crate::text::script::is_non_latin_letter;
use crate::text::{normalize, select_languages, Language};

/// Suspicion weights, summed per fired signal and clamped to [0, 1].
const WEIGHT_SELF_HARM: f64 = 0.5;
const WEIGHT_DOXXING: f64 = 0.4;
const WEIGHT_EXPLICIT_BODY: f64 = 0.25;
const WEIGHT_LEXICON: f64 = 0.25;
const WEIGHT_HARASSMENT: f64 = 0.25;
const WEIGHT_PERSONAL_SENSITIVE: f64 = 0.2;
const WEIGHT_OFF_TOPIC: f64 = 0.1;

/// Edit-distance allowance for the lexicon pass.
const FUZZY_TOLERANCE: usize = 1;

/// Words flagged regardless of what the lexicon files contain. Expanded
/// with the same plural rule as the files at construction time.
const CUSTOM_PROFANITY: &[&str] = &[
    "ass",
    "asshole",
    "arsehole",
    "bastard",
    "bitch",
    "bullshit",
    "cunt",
    "dickhead",
    "douchebag",
    "dumbass",
    "fuck",
    "fucker",
    "fucking",
    "jackass",
    "motherfucker",
    "prick",
    "shit",
    "shithead",
    "slut",
    "twat",
    "wanker",
    "whore",
];

/// Portfolio-safe vocabulary that morphologically overlaps profane roots
/// and must never count as a lexicon match.
const ALLOWLIST: &[&str] = &[
    "analysis",
    "analyst",
    "analytics",
    "assess",
    "assessment",
    "assessments",
    "asset",
    "assets",
    "assignment",
    "assignments",
    "assistant",
    "assistants",
    "associate",
    "associates",
    "banker",
    "bankers",
    "bass",
    "brass",
    "canvas",
    "cassandra",
    "class",
    "classes",
    "classic",
    "cockpit",
    "compass",
    "embassy",
    "glass",
    "grass",
    "mass",
    "masses",
    "massachusetts",
    "pass",
    "passed",
    "passes",
    "passing",
    "sass",
    "scss",
    "scunthorpe",
    "shiitake",
];

/// The core rule engine. Build once, reuse across requests; all regexes
/// compile at construction.
pub struct LocalClassifier {
    store: Arc<LexiconStore>,
    families: HeuristicFamilies,
    custom_profanity: HashSet<String>,
    allowlist: HashSet<String>,
    contractions: Vec<(Regex, String)>,
    second_person: Vec<(Regex, String)>,
    third_person: Vec<(Regex, String)>,
}

impl LocalClassifier {
    /// `subject` is the persona the assistant speaks for; safe phrases
    /// authored about the subject match questions asked in second person.
    pub fn new(store: Arc<LexiconStore>, subject: &str) -> Result<Self> {
        let subject = subject.trim().to_lowercase();
        let possessive = format!("{subject}'s");

        let mut custom_profanity = HashSet::new();
        for word in CUSTOM_PROFANITY {
            for variant in expand_variants(word) {
                custom_profanity.insert(variant);
            }
        }

        let contractions = compile_swaps(&[
            (r"\bwhat's\b", "what is"),
            (r"\bwho's\b", "who is"),
            (r"\bwhere's\b", "where is"),
            (r"\bhow's\b", "how is"),
            (r"\bhe's\b", "he is"),
            (r"\byou're\b", "you are"),
            (r"\bdoesn't\b", "does not"),
            (r"\bdon't\b", "do not"),
            (r"\bisn't\b", "is not"),
            (r"\bcan't\b", "cannot"),
            (r"\bwon't\b", "will not"),
            (r"\bi'm\b", "i am"),
        ])?;
        let second_person = compile_swaps(&[
            (r"\byour\b", possessive.as_str()),
            (r"\byours\b", possessive.as_str()),
            (r"\byourself\b", subject.as_str()),
            (r"\byou\b", subject.as_str()),
        ])?;
        let third_person = compile_swaps(&[
            (r"\bhis\b", possessive.as_str()),
            (r"\bhimself\b", subject.as_str()),
            (r"\bhe\b", subject.as_str()),
            (r"\bhim\b", subject.as_str()),
        ])?;

        Ok(Self {
            store,
            families: HeuristicFamilies::compile()?,
            custom_profanity,
            allowlist: ALLOWLIST.iter().map(|w| w.to_string()).collect(),
            contractions,
            second_person,
            third_person,
        })
    }

    /// Classify one message. Always returns a well-formed result.
    pub fn classify(&self, raw: &str) -> LocalModerationResult {
        let normalized = normalize(raw);
        let languages = select_languages(&normalized);
        let cjk_detected = languages.len() > 1;

        let safe_phrase_hit = self.safe_phrase_hit(&normalized);

        let portfolio_intent = self.families.portfolio.is_match(&normalized)
            || PORTFOLIO_CJK_TOKENS.iter().any(|t| normalized.contains(t));
        let tech_intent = self.families.tech.is_match(&normalized);

        let lexicon_matches = self.lexicon_matches(&normalized, &languages, cjk_detected);
        let lexicon_flagged = !lexicon_matches.is_empty();

        // Doxxing and personal-sensitive are gated on portfolio intent: a
        // question about location or availability in a career context is
        // not a doxxing request.
        let doxxing = !portfolio_intent
            && (self.families.doxxing.is_match(&normalized) || self.families.ssn_like(&normalized));
        let explicit_body = self.families.explicit_body.is_match(&normalized);
        let harassment = self.families.harassment.is_match(&normalized);
        let self_harm = self.families.self_harm.is_match(&normalized);
        let personal_sensitive =
            !portfolio_intent && self.families.personal_sensitive.is_match(&normalized);

        let severe = lexicon_flagged
            || doxxing
            || explicit_body
            || harassment
            || self_harm
            || personal_sensitive;

        // Safe-phrase short-circuit: an allowlisted utterance wins unless an
        // independent high-severity signal also fired.
        if safe_phrase_hit && !severe {
            return LocalModerationResult {
                flagged: false,
                normalized,
                reasons: vec![Reason::SafePhrase],
                lexicon_matches: Vec::new(),
                languages,
                professional_intent: true,
                tech_intent,
                harassment_cue: false,
                self_harm_cue: false,
                personal_sensitive_cue: false,
                suspicion_score: 0.0,
            };
        }

        // The heuristic batteries are English-centric; benign non-Latin text
        // that fired none of them is treated as contextually safe.
        let non_latin_safe = normalized.chars().any(is_non_latin_letter)
            && !(doxxing || explicit_body || harassment || self_harm || personal_sensitive);
        let professional_intent = portfolio_intent || tech_intent || non_latin_safe;
        let unprofessional_cue = !professional_intent;

        let mut reasons = Vec::new();
        if lexicon_flagged {
            reasons.push(Reason::Lexicon);
        }
        if doxxing {
            reasons.push(Reason::Doxxing);
        }
        if explicit_body {
            reasons.push(Reason::SexualBody);
        }
        if harassment {
            reasons.push(Reason::Harassment);
        }
        if self_harm {
            reasons.push(Reason::SelfHarm);
        }
        if personal_sensitive {
            reasons.push(Reason::PersonalSensitive);
        }
        if unprofessional_cue {
            reasons.push(Reason::OffTopic);
        }

        let mut suspicion = 0.0;
        if self_harm {
            suspicion += WEIGHT_SELF_HARM;
        }
        if doxxing {
            suspicion += WEIGHT_DOXXING;
        }
        if explicit_body {
            suspicion += WEIGHT_EXPLICIT_BODY;
        }
        if lexicon_flagged {
            suspicion += WEIGHT_LEXICON;
        }
        if harassment {
            suspicion += WEIGHT_HARASSMENT;
        }
        if personal_sensitive {
            suspicion += WEIGHT_PERSONAL_SENSITIVE;
        }
        if unprofessional_cue {
            suspicion += WEIGHT_OFF_TOPIC;
        }
        let suspicion_score = suspicion.clamp(0.0, 1.0);

        debug!(
            flagged = severe,
            suspicion = suspicion_score,
            reasons = ?reasons,
            "Classified message"
        );

        LocalModerationResult {
            flagged: severe,
            normalized,
            reasons,
            lexicon_matches,
            languages,
            professional_intent,
            tech_intent,
            harassment_cue: harassment,
            self_harm_cue: self_harm,
            personal_sensitive_cue: personal_sensitive,
            suspicion_score,
        }
    }

    /// Union the custom word list with every selected language's lexicon and
    /// run the matching pass. Boundary enforcement is dropped when CJK text
    /// was detected.
    fn lexicon_matches(
        &self,
        normalized: &str,
        languages: &[Language],
        cjk_detected: bool,
    ) -> Vec<String> {
        let mut combined: HashSet<String> = self.custom_profanity.clone();
        for language in languages {
            for word in self.store.words(*language).iter() {
                combined.insert(word.clone());
            }
        }

        let config = MatcherConfig {
            allowlist: self.allowlist.clone(),
            word_boundaries: !cjk_detected,
            fuzzy_tolerance: FUZZY_TOLERANCE,
        };
        find_matches(normalized, &combined, &config)
    }

    /// Test all text variants against the safe-phrase literals (substring)
    /// and the compiled safe-phrase patterns (full match).
    fn safe_phrase_hit(&self, normalized: &str) -> bool {
        let literals = self.store.safe_phrases();
        let patterns = self.store.safe_phrase_patterns();
        if literals.is_empty() && patterns.is_empty() {
            return false;
        }
        for variant in self.text_variants(normalized) {
            if literals.iter().any(|p| variant.contains(p.as_str())) {
                return true;
            }
            if patterns.iter().any(|re| re.is_match(&variant)) {
                return true;
            }
        }
        false
    }

    /// The normalized text plus contraction-expanded and pronoun-swapped
    /// forms, so phrases authored in either voice match.
    fn text_variants(&self, normalized: &str) -> Vec<String> {
        let expanded = apply_swaps(&self.contractions, normalized);
        let second = apply_swaps(&self.second_person, &expanded);
        let third = apply_swaps(&self.third_person, &expanded);

        let mut variants = vec![normalized.to_string()];
        for candidate in [expanded, second, third] {
            if !variants.contains(&candidate) {
                variants.push(candidate);
            }
        }
        variants
    }
}

fn compile_swaps(pairs: &[(&str, &str)]) -> Result<Vec<(Regex, String)>> {
    pairs
        .iter()
        .map(|(expr, replacement)| Ok((Regex::new(expr)?, replacement.to_string())))
        .collect()
}

fn apply_swaps(swaps: &[(Regex, String)], text: &str) -> String {
    let mut out = text.to_string();
    for (re, replacement) in swaps {
        out = re.replace_all(&out, replacement.as_str()).into_owned();
    }
    out
}
