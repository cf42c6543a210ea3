// Lexicon matching with obfuscation tolerance.
//
// Operates on a scrubbed copy of the normalized text (letters, digits, and
// whitespace only). Latin-script words match whole tokens when word
// boundaries are enabled; CJK words always match by substring since CJK
// text has no universal word separator. A small edit-distance allowance
// catches minor misspellings of longer words without over-matching.

use std::collections::{HashMap, HashSet};

use crate::text::script::is_cjk;

/// Minimum length (token and candidate word) before fuzzy matching applies.
/// Short words fuzz into too much ordinary vocabulary.
const FUZZY_MIN_LEN: usize = 6;

/// Configuration for one matching pass.
pub struct MatcherConfig {
    /// Tokens that never count as matches, regardless of overlap with
    /// profane roots (career/tech vocabulary).
    pub allowlist: HashSet<String>,
    /// Whole-token matching for Latin-script words. Disabled when CJK text
    /// was detected.
    pub word_boundaries: bool,
    /// Maximum edit distance for fuzzy token matches (0 disables).
    pub fuzzy_tolerance: usize,
}

/// Run a matching pass and collect matched lexicon words, lowercased and
/// deduplicated, excluding allowlisted tokens.
pub fn find_matches(text: &str, lexicon: &HashSet<String>, config: &MatcherConfig) -> Vec<String> {
    let scrubbed = canonicalize(&scrub(text));
    let tokens: Vec<&str> = scrubbed.split_whitespace().collect();
    let mut matches: Vec<String> = Vec::new();

    // Squeezed-form index: a word padded with extra repeats of its own
    // letters ("asssshole") collapses to the same squeezed form as the word
    // itself, even when the word has legitimate doubled letters.
    let squeezed_index: HashMap<String, &str> = lexicon
        .iter()
        .map(|word| (squeeze(word), word.as_str()))
        .collect();

    let record = |word: &str, found: &mut Vec<String>| {
        if !found.iter().any(|m| m == word) {
            found.push(word.to_string());
        }
    };

    // Token-level matching for Latin-script words
    for token in &tokens {
        if config.allowlist.contains(*token) {
            continue;
        }
        if lexicon.contains(*token) {
            record(token, &mut matches);
            continue;
        }
        // Obfuscation tolerance: compare squeezed forms, recording the
        // canonical lexicon word
        let squeezed = squeeze(token);
        if squeezed != *token {
            if let Some(word) = squeezed_index.get(squeezed.as_str()) {
                record(word, &mut matches);
                continue;
            }
        }
        if config.word_boundaries && config.fuzzy_tolerance > 0 && token.len() >= FUZZY_MIN_LEN {
            for word in lexicon {
                if word.len() >= FUZZY_MIN_LEN
                    && word.len().abs_diff(token.len()) <= config.fuzzy_tolerance
                    && within_distance(token, word, config.fuzzy_tolerance)
                {
                    record(word, &mut matches);
                    break;
                }
            }
        }
    }

    // Substring matching: always for CJK words, and for Latin words too when
    // boundaries are disabled (the containing token still gets the allowlist
    // check so career vocabulary survives mixed-script messages).
    for word in lexicon {
        if matches.iter().any(|m| m == word) {
            continue;
        }
        let cjk_word = word.chars().any(is_cjk);
        if !cjk_word && config.word_boundaries {
            continue;
        }
        if cjk_word {
            if scrubbed.contains(word.as_str()) {
                record(word, &mut matches);
            }
        } else if tokens
            .iter()
            .any(|t| t.contains(word.as_str()) && !config.allowlist.contains(*t))
        {
            record(word, &mut matches);
        }
    }

    matches
}

/// Strip everything but letters, digits, and whitespace.
fn scrub(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Rewrite a known singular/plural collision so it is not counted twice:
/// the standalone token `asses` matches as its singular.
fn canonicalize(scrubbed: &str) -> String {
    scrubbed
        .split_whitespace()
        .map(|t| if t == "asses" { "ass" } else { t })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse runs of the same character to a single occurrence.
fn squeeze(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut last = None;
    for c in token.chars() {
        if last != Some(c) {
            out.push(c);
        }
        last = Some(c);
    }
    out
}

/// Levenshtein distance check with an early exit once `max` is exceeded.
fn within_distance(a: &str, b: &str, max: usize) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > max {
        return false;
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        let mut row_min = current[0];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(current[j] + 1);
            row_min = row_min.min(current[j + 1]);
        }
        if row_min > max {
            return false;
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()] <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn config(boundaries: bool) -> MatcherConfig {
        MatcherConfig {
            allowlist: HashSet::new(),
            word_boundaries: boundaries,
            fuzzy_tolerance: 1,
        }
    }

    #[test]
    fn exact_token_match() {
        let matches = find_matches("what an asshole", &lexicon(&["asshole"]), &config(true));
        assert_eq!(matches, vec!["asshole"]);
    }

    #[test]
    fn carrier_word_does_not_match_with_boundaries() {
        // "debugger" contains "bugger" but is a different token
        let matches = find_matches(
            "the code failed in the debugger",
            &lexicon(&["bugger"]),
            &config(true),
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn punctuation_split_is_rejoined_by_scrubbing() {
        // Scrubbing removes the dots, leaving one matchable token
        let matches = find_matches("a.s.s.h.o.l.e", &lexicon(&["asshole"]), &config(true));
        assert_eq!(matches, vec!["asshole"]);
    }

    #[test]
    fn repeated_characters_are_squeezed() {
        // "asssshole" and "asshole" share the squeezed form "ashole"; the
        // canonical lexicon word is what gets recorded
        let matches = find_matches("asssshole", &lexicon(&["asshole"]), &config(true));
        assert_eq!(matches, vec!["asshole"]);
    }

    #[test]
    fn padding_inside_doubled_letters_is_caught() {
        let matches = find_matches(
            "what an assssshoooole",
            &lexicon(&["asshole"]),
            &config(true),
        );
        assert_eq!(matches, vec!["asshole"]);
    }

    #[test]
    fn fuzzy_catches_single_typo_on_long_words() {
        let matches = find_matches("total asshoke", &lexicon(&["asshole"]), &config(true));
        assert_eq!(matches, vec!["asshole"]);
    }

    #[test]
    fn fuzzy_ignores_short_words() {
        // "shot" is distance 1 from "shit" but both are under the length floor
        let matches = find_matches("nice shot", &lexicon(&["shit"]), &config(true));
        assert!(matches.is_empty());
    }

    #[test]
    fn fuzzy_respects_distance_limit() {
        // distance("debugger", "bugger") == 2, over the tolerance of 1
        let matches = find_matches("debugger", &lexicon(&["bugger"]), &config(true));
        assert!(matches.is_empty());
    }

    #[test]
    fn allowlisted_token_never_matches() {
        let mut cfg = config(true);
        cfg.allowlist.insert("passes".to_string());
        let matches = find_matches("all tests passes", &lexicon(&["asses"]), &cfg);
        assert!(matches.is_empty());
    }

    #[test]
    fn plural_collision_counts_once_as_singular() {
        let matches = find_matches("asses", &lexicon(&["ass", "asses"]), &config(true));
        assert_eq!(matches, vec!["ass"]);
    }

    #[test]
    fn cjk_word_matches_by_substring() {
        let matches = find_matches(
            "この傻逼という言葉",
            &lexicon(&["傻逼"]),
            &config(false),
        );
        assert_eq!(matches, vec!["傻逼"]);
    }

    #[test]
    fn latin_substring_match_without_boundaries_checks_allowlist() {
        let mut cfg = config(false);
        cfg.allowlist.insert("assistant".to_string());
        let matches = find_matches("日本の assistant です", &lexicon(&["ass"]), &cfg);
        assert!(matches.is_empty());
    }

    #[test]
    fn substring_pass_checks_every_containing_token() {
        // An allowlisted carrier earlier in the text must not shadow a
        // non-allowlisted one
        let mut cfg = config(false);
        cfg.allowlist.insert("assistant".to_string());
        let matches = find_matches("assistant と asshole", &lexicon(&["ass"]), &cfg);
        assert_eq!(matches, vec!["ass"]);
    }

    #[test]
    fn latin_substring_match_without_boundaries_fires_otherwise() {
        let matches = find_matches("日本の asshole です", &lexicon(&["ass"]), &config(false));
        assert_eq!(matches, vec!["ass"]);
    }

    #[test]
    fn distance_helper() {
        assert!(within_distance("kitten", "kitten", 0));
        assert!(within_distance("kitten", "sitten", 1));
        assert!(!within_distance("kitten", "sitting", 1));
    }
}
