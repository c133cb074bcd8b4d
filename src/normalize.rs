//! Shared text helpers used by every extraction stage.
//!
//! Folding, whitespace cleanup and artist splitting live here so that the
//! component modules agree on what "the same name" means.

use any_ascii::any_ascii;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Regex to collapse multiple whitespace into single space
pub static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Separators between credited artists: "A, B", "A x B", "A vs. B", "A // B"
pub static ARTIST_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r", - |, | (?:[x+/-]|//|vs|and)[.]? ").unwrap()
});

/// Bracketed featuring credit: "(feat. Someone)", "[ft Someone]"
pub static FT_BRACKETED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i) *[\[(]f(?:ea)?t(?:uring|\.)?[. ]([^\]\[()]+)[\])] *").unwrap()
});

/// Unbracketed featuring credit running to the end: "Artist ft. Someone"
pub static FT_TRAILING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i) f(?:ea)?t(?:uring|\.)?[. ]([^\]\[()]+?) *$").unwrap()
});

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Check if a character is a Unicode combining mark (diacritical mark).
/// Used to filter out accents during normalization.
pub fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0xFE20..=0xFE2F)
}

/// Fold Unicode text to ASCII, keeping case.
/// e.g., "Québec" → "Quebec", "Москва" → "Moskva"
pub fn transliterate(s: &str) -> String {
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    any_ascii(&stripped)
}

/// Fold Unicode text to lowercase ASCII for comparisons.
/// e.g., "Beyoncé" → "beyonce", "naïve" → "naive"
pub fn fold_to_ascii(s: &str) -> String {
    transliterate(s).to_lowercase()
}

/// Whether two credits name the same act, ignoring case and accents.
pub fn same_name(a: &str, b: &str) -> bool {
    fold_to_ascii(a.trim()) == fold_to_ascii(b.trim())
}

/// Convert curly quotes to straight ones. Bandcamp titles mix both freely.
pub fn normalize_punctuation(s: &str) -> String {
    s.replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{00A0}', " ")
}

/// Collapse runs of whitespace and trim.
pub fn collapse_spaces(s: &str) -> String {
    MULTI_SPACE.replace_all(s, " ").trim().to_string()
}

/// Uppercase the first character and lowercase the rest: "deep house" → "Deep house"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Remove a featuring credit from an artist string.
/// Credits that are really remix attributions ("(ft. X Remix)") are kept.
pub fn strip_featuring(s: &str) -> String {
    for pat in [&*FT_BRACKETED, &*FT_TRAILING] {
        if let Some(caps) = pat.captures(s) {
            let who = caps[1].to_lowercase();
            if who.trim_end().ends_with("mix") {
                continue;
            }
            let m = caps.get(0).map_or(0..0, |m| m.range());
            let mut out = String::with_capacity(s.len());
            out.push_str(&s[..m.start]);
            if m.end < s.len() && m.start > 0 {
                out.push(' ');
            }
            out.push_str(&s[m.end..]);
            return out.trim().to_string();
        }
    }
    s.to_string()
}

/// Split artist credits into individual artists, preserving first-seen order.
///
/// "A & B" is only split when A or B is also credited on its own, since an
/// ampersand is often part of a duo's name. "A X B" is split the same way, or
/// when no other splitting took place.
pub fn split_artists<S: AsRef<str>>(artists: &[S]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for artist in artists {
        let artist = strip_featuring(artist.as_ref());
        if !cleaned.contains(&artist) {
            cleaned.push(artist);
        }
    }

    let mut split: Vec<String> = Vec::new();
    for artist in &cleaned {
        for part in ARTIST_SEPARATOR.split(artist) {
            let part = part.trim();
            if !part.is_empty() && !split.iter().any(|a| a == part) {
                split.push(part.to_string());
            }
        }
    }

    let unsplit = split.len() == cleaned.len();
    for artist in split.clone() {
        for sep in [" X ", " & "] {
            let subartists: Vec<&str> = artist.split(sep).map(str::trim).collect();
            if subartists.len() < 2 {
                continue;
            }
            let credited_alone = subartists.iter().any(|sub| split.iter().any(|a| a == sub));
            if credited_alone || (sep == " X " && unsplit) {
                split.retain(|a| a != &artist);
                for sub in subartists {
                    if !sub.is_empty() && !split.iter().any(|a| a == sub) {
                        split.push(sub.to_string());
                    }
                }
                break;
            }
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_to_ascii() {
        assert_eq!(fold_to_ascii("Björk"), "bjork");
        assert_eq!(fold_to_ascii("Motörhead"), "motorhead");
        assert_eq!(fold_to_ascii("Beyoncé"), "beyonce");
        assert!(same_name("Björk Records ", "bjork records"));
        assert!(!same_name("Björk", "Bjork Records"));
    }

    #[test]
    fn test_transliterate_keeps_case() {
        assert_eq!(transliterate("Québec"), "Quebec");
        assert_eq!(transliterate("São Paulo"), "Sao Paulo");
        assert_eq!(transliterate("Москва"), "Moskva");
    }

    #[test]
    fn test_normalize_punctuation() {
        assert_eq!(normalize_punctuation("Don\u{2019}t"), "Don't");
        assert_eq!(normalize_punctuation("\u{201C}Hi\u{201D}"), "\"Hi\"");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("deep house"), "Deep house");
        assert_eq!(capitalize("DnB"), "Dnb");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_strip_featuring() {
        assert_eq!(strip_featuring("Artist (feat. Other)"), "Artist");
        assert_eq!(strip_featuring("Artist ft. Other"), "Artist");
        assert_eq!(strip_featuring("Artist [ft Other] Two"), "Artist Two");
        assert_eq!(strip_featuring("Artist (ft. Other Remix)"), "Artist (ft. Other Remix)");
        assert_eq!(strip_featuring("Aftermath"), "Aftermath");
    }

    #[test]
    fn test_split_artists() {
        let cases: &[(&[&str], &[&str])] = &[
            (&["Artist1, Artist2"], &["Artist1", "Artist2"]),
            (&["Artist1 x Artist2"], &["Artist1", "Artist2"]),
            (&["Artist1 vs. Artist2", "Artist1"], &["Artist1", "Artist2"]),
            (&["Artist1 & Artist2"], &["Artist1 & Artist2"]),
            (&["Artist1 & Artist2", "Artist1"], &["Artist1", "Artist2"]),
            (&["Artist1 X Artist2"], &["Artist1", "Artist2"]),
            (&["Artist1 feat. Artist2"], &["Artist1"]),
            (&["Artist1", "Artist1"], &["Artist1"]),
        ];
        for (input, expected) in cases {
            assert_eq!(split_artists(input), *expected, "input: {:?}", input);
        }
    }
}
