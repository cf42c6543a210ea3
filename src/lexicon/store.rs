// Lexicon and safe-phrase storage.
//
// Word lists load lazily from disk on first access and stay cached for the
// process lifetime. Caches are keyed by source file path, not language tag,
// so two tags backed by the same file share one load. A missing or
// unreadable source degrades to an empty set — moderation continues with
// that source contributing nothing.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use regex_lite::Regex;
use tracing::{debug, warn};

use crate::text::Language;

/// File names under the lexicon directory.
const SAFE_PHRASES_FILE: &str = "safe_phrases.txt";
const SAFE_PHRASE_PATTERNS_FILE: &str = "safe_phrase_patterns.txt";

fn lexicon_file(language: Language) -> &'static str {
    match language {
        Language::English => "profanity_en.txt",
        Language::Japanese => "profanity_ja.txt",
        Language::Chinese => "profanity_zh.txt",
    }
}

/// Expand a lexicon word with its plural variants: `+ies` for a trailing
/// `y`, `+es` after sibilant endings, `+s` otherwise.
pub fn expand_variants(word: &str) -> Vec<String> {
    let mut variants = vec![word.to_string()];
    if let Some(stem) = word.strip_suffix('y') {
        variants.push(format!("{stem}ies"));
    } else if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        variants.push(format!("{word}es"));
    } else if !word.is_empty() {
        variants.push(format!("{word}s"));
    }
    variants
}

/// Process-lifetime cache of lexicon words and safe phrases.
///
/// Population is guarded by a mutex per cache, held across the load, so
/// concurrent first access for the same source loads the file exactly once.
/// Steady-state reads clone an `Arc` and never touch the file system again.
pub struct LexiconStore {
    base_dir: PathBuf,
    words: Mutex<HashMap<PathBuf, Arc<HashSet<String>>>>,
    phrases: Mutex<HashMap<PathBuf, Arc<Vec<String>>>>,
    patterns: Mutex<HashMap<PathBuf, Arc<Vec<Regex>>>>,
}

impl LexiconStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            words: Mutex::new(HashMap::new()),
            phrases: Mutex::new(HashMap::new()),
            patterns: Mutex::new(HashMap::new()),
        }
    }

    /// The cached lexicon for a language, with plural variants expanded
    /// before insertion into the cache.
    pub fn words(&self, language: Language) -> Arc<HashSet<String>> {
        let path = self.base_dir.join(lexicon_file(language));
        let mut cache = self.words.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(set) = cache.get(&path) {
            return Arc::clone(set);
        }
        let set = Arc::new(load_words(&path));
        cache.insert(path, Arc::clone(&set));
        set
    }

    /// The cached safe-phrase literals.
    pub fn safe_phrases(&self) -> Arc<Vec<String>> {
        let path = self.base_dir.join(SAFE_PHRASES_FILE);
        let mut cache = self.phrases.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(list) = cache.get(&path) {
            return Arc::clone(list);
        }
        let list = Arc::new(load_lines(&path));
        cache.insert(path, Arc::clone(&list));
        list
    }

    /// The cached, compiled safe-phrase patterns. Each pattern is anchored
    /// so it must match a whole text variant.
    pub fn safe_phrase_patterns(&self) -> Arc<Vec<Regex>> {
        let path = self.base_dir.join(SAFE_PHRASE_PATTERNS_FILE);
        let mut cache = self.patterns.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(list) = cache.get(&path) {
            return Arc::clone(list);
        }
        let list = Arc::new(load_patterns(&path));
        cache.insert(path, Arc::clone(&list));
        list
    }
}

/// Load a newline-separated word list, lowercased, with plural variants.
/// Missing or unreadable files degrade to an empty set.
fn load_words(path: &Path) -> HashSet<String> {
    let mut set = HashSet::new();
    for line in read_lines(path) {
        for variant in expand_variants(&line) {
            set.insert(variant);
        }
    }
    debug!(path = %path.display(), words = set.len(), "Loaded lexicon");
    set
}

/// Load a newline-separated phrase list, lowercased, order preserved.
fn load_lines(path: &Path) -> Vec<String> {
    let lines = read_lines(path);
    debug!(path = %path.display(), phrases = lines.len(), "Loaded safe phrases");
    lines
}

/// Load and compile a pattern list. `#`-prefixed lines are comments.
/// Invalid patterns are skipped with a warning rather than aborting the load.
fn load_patterns(path: &Path) -> Vec<Regex> {
    let mut compiled = Vec::new();
    for line in read_lines(path) {
        if line.starts_with('#') {
            continue;
        }
        match Regex::new(&format!("^(?:{line})$")) {
            Ok(re) => compiled.push(re),
            Err(error) => {
                warn!(path = %path.display(), pattern = %line, %error, "Skipping invalid safe-phrase pattern");
            }
        }
    }
    debug!(path = %path.display(), patterns = compiled.len(), "Loaded safe-phrase patterns");
    compiled
}

fn read_lines(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(contents) => contents
            .lines()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect(),
        Err(error) => {
            warn!(path = %path.display(), %error, "Lexicon source unavailable, using empty set");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_plain_word() {
        assert_eq!(expand_variants("zap"), vec!["zap", "zaps"]);
    }

    #[test]
    fn expand_sibilant_endings() {
        assert_eq!(expand_variants("box"), vec!["box", "boxes"]);
        assert_eq!(expand_variants("pass"), vec!["pass", "passes"]);
        assert_eq!(expand_variants("blitz"), vec!["blitz", "blitzes"]);
        assert_eq!(expand_variants("punch"), vec!["punch", "punches"]);
        assert_eq!(expand_variants("smash"), vec!["smash", "smashes"]);
    }

    #[test]
    fn expand_trailing_y() {
        assert_eq!(expand_variants("fly"), vec!["fly", "flies"]);
    }

    #[test]
    fn missing_lexicon_degrades_to_empty() {
        let store = LexiconStore::new("/nonexistent/palisade-lexicons");
        assert!(store.words(Language::English).is_empty());
        assert!(store.safe_phrases().is_empty());
        assert!(store.safe_phrase_patterns().is_empty());
    }

    #[test]
    fn repeated_access_returns_same_cache_entry() {
        let store = LexiconStore::new("/nonexistent/palisade-lexicons");
        let a = store.words(Language::English);
        let b = store.words(Language::English);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
