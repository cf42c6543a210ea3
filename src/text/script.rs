// Script-based language selection.
//
// Detection operates on Unicode ranges, not letters, so it works the same
// before or after leet decoding. English is always consulted; CJK scripts
// add their lexicons on top.

use serde::{Deserialize, Serialize};

/// A language whose lexicon can be consulted during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Japanese,
    Chinese,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Japanese => "japanese",
            Language::Chinese => "chinese",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hiragana, Katakana, and the katakana phonetic extensions.
fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}')
}

/// Han ideographs: the unified block, extension A, and compatibility forms.
fn is_han(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

/// Any CJK character relevant to word-boundary handling.
pub fn is_cjk(c: char) -> bool {
    is_kana(c) || is_han(c)
}

/// A letter outside the Latin script (past Latin Extended-B).
pub fn is_non_latin_letter(c: char) -> bool {
    c.is_alphabetic() && c as u32 > 0x024F
}

/// Select the ordered, deduplicated list of languages whose lexicons should
/// be consulted: English first, then any detected CJK scripts.
pub fn select_languages(text: &str) -> Vec<Language> {
    let mut languages = vec![Language::English];
    if text.chars().any(is_kana) {
        languages.push(Language::Japanese);
    }
    if text.chars().any(is_han) {
        languages.push(Language::Chinese);
    }
    languages
}
