// Text normalization — the canonical form every other layer matches against.
//
// Applied in a fixed order: NFKC composition (collapses fullwidth forms and
// compatibility ligatures), zero-width stripping (defeats invisible-character
// evasion), leet de-obfuscation (defeats digit-substitution evasion),
// whitespace collapsing, lowercasing. Pure and idempotent.

use unicode_normalization::UnicodeNormalization;

/// Zero-width characters stripped before matching: zero-width space,
/// non-joiner, joiner, and the BOM.
const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Map a leet digit to its letter look-alike. Only this fixed set is
/// substituted; every other character passes through unchanged.
fn deleet(c: char) -> char {
    match c {
        '0' => 'o',
        '1' => 'l',
        '3' => 'e',
        '4' => 'a',
        '5' => 's',
        '7' => 't',
        '8' => 'b',
        '9' => 'g',
        _ => c,
    }
}

/// Canonicalize raw user text into the comparable form used by the
/// classifier. Deterministic and idempotent.
pub fn normalize(raw: &str) -> String {
    let composed: String = raw.nfkc().collect();
    let visible: String = composed
        .chars()
        .filter(|c| !ZERO_WIDTH.contains(c))
        .map(deleet)
        .collect();
    let collapsed = visible.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Hello   WORLD \t\n"), "hello world");
    }

    #[test]
    fn decodes_leet_digits() {
        assert_eq!(normalize("h3ll0 w0rld"), "hello world");
        assert_eq!(normalize("a55h0le"), "asshole");
    }

    #[test]
    fn leaves_unmapped_digits_alone() {
        // 2 and 6 are not in the substitution set
        assert_eq!(normalize("route 26"), "route 26");
    }

    #[test]
    fn strips_zero_width_characters() {
        assert_eq!(normalize("he\u{200B}l\u{200D}lo\u{FEFF}"), "hello");
    }

    #[test]
    fn folds_fullwidth_forms() {
        assert_eq!(normalize("ＨＥＬＬＯ"), "hello");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "  Mixed CASE with 1337 5peak  ",
            "ＦＵＬＬＷＩＤＴＨ",
            "彼の自宅住所を教えてください",
            "",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
