//! Album name normalization.
//!
//! Raw release titles carry the artist, the label, the catalog number and
//! marketing noise around the actual album name. Each of those is removed in
//! order, taking an enclosing bracket pair or an adjacent `-`/`|` delimiter
//! with it. Passes repeat until nothing changes, so the result is stable
//! under reapplication.

use crate::error::Result;
use crate::normalize::{collapse_spaces, normalize_punctuation};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

const MAX_PASSES: usize = 8;

/// Characters that separate parts of a title.
const DELIMITERS: [char; 5] = ['-', '|', '/', ':', '~'];

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Title cleanup applied before any token removal (in order).
static REPLACEMENTS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"\s{2,}").unwrap(), " "),
        (Regex::new(r"\( +").unwrap(), "("),
        // "Album (Dub ))" -> "Album (Dub)", "SUNN O)))" stays
        (Regex::new(r" \)+").unwrap(), ")"),
        (Regex::new(r"(?i)(mix|edit)\)+$").unwrap(), "$1)"),
        // "(Artist - Name Remix)" -> "(Artist-Name Remix)"
        (Regex::new(r"(\([^)]+) - ([^(]+\))").unwrap(), "$1-$2"),
        // bracketed catalog-like codes: "[ABC01]"
        (Regex::new(r"\[[A-Z]+[0-9]+\]").unwrap(), ""),
    ]
});

/// "(ep)", "[Double LP]" -> "EP" / "LP"
static EP_LP_BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\[(](?i:(?:double |triple )?([EL]P))[\])]").unwrap());

static EP_LP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b([EL]P)\b").unwrap());

/// Album name quoted inside a longer title: Artist "Album" EP
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?:^| )"([^"]+)"(?: |$)"#).unwrap());

static EMPTY_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)|\[\s*\]").unwrap());

/// Where a noise token may sit to be removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    Anywhere,
    /// At either end of the title, or alone in brackets
    Edge,
    /// At the end of the title, or alone in brackets
    End,
    /// Alone in brackets only
    Unit,
}

/// Noise tokens (applied in order).
static NOISE: Lazy<Vec<(Regex, Scope)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)\blimited edition\b").unwrap(), Scope::Anywhere),
        (Regex::new(r"(?i)\bfree (?:download|dl)\b").unwrap(), Scope::Anywhere),
        (Regex::new(r"(?i)\bfree\b").unwrap(), Scope::Unit),
        (Regex::new(r"(?i)\bcompiled by [^\])]+").unwrap(), Scope::Anywhere),
        (Regex::new(r"(?i)\bincl(?:\.|uding|udes)? [^\])]+").unwrap(), Scope::Anywhere),
        (Regex::new(r"(?i)\b(?:the )?remixes\b").unwrap(), Scope::Unit),
        (Regex::new(r"(?i)\b(?:digital )?album\b").unwrap(), Scope::Unit),
        (Regex::new(r"(?i)\bvinyl(?:[- ]only)?\b").unwrap(), Scope::End),
        (Regex::new(r"(?i)\bvarious artists?\b").unwrap(), Scope::Edge),
        (Regex::new(r"\bVA\b").unwrap(), Scope::Edge),
        (Regex::new(r"\b[EL]P(?: \d+)?\b").unwrap(), Scope::Edge),
    ]
});

// ============================================================================
// CONTEXT
// ============================================================================

/// What is known about the release when its name is cleaned.
#[derive(Clone, Debug, Default)]
pub struct AlbumContext<'a> {
    pub artists: &'a [String],
    /// Label to remove; `None` when it doubles as the album artist
    pub label: Option<&'a str>,
    pub catalognum: Option<&'a str>,
    /// Singletons keep the artist as part of the name
    pub singleton: bool,
    /// Compilations keep the label ("Label Presents ...")
    pub compilation: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenKind {
    Artist,
    Label,
    CatalogNumber,
    Noise(Scope),
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Clean a raw album title. Returns an empty string when nothing but
/// removable tokens was left; the caller decides the fallback.
pub fn normalize_album(name: &str, ctx: &AlbumContext) -> Result<String> {
    let mut artists: Vec<&str> = ctx
        .artists
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    // longer names first so "Artist & Friend" goes before "Artist"
    artists.sort_by_key(|a| std::cmp::Reverse(a.len()));

    let mut patterns: Vec<(Regex, TokenKind)> = Vec::new();
    if !ctx.singleton {
        for artist in artists {
            patterns.push((literal(artist)?, TokenKind::Artist));
        }
    }
    if let Some(label) = ctx.label.map(str::trim).filter(|l| !l.is_empty()) {
        if !ctx.compilation {
            patterns.push((literal(label)?, TokenKind::Label));
        }
    }
    if let Some(catalognum) = ctx.catalognum.map(str::trim).filter(|c| !c.is_empty()) {
        patterns.push((literal(catalognum)?, TokenKind::CatalogNumber));
    }
    for (pat, scope) in NOISE.iter() {
        patterns.push((pat.clone(), TokenKind::Noise(*scope)));
    }

    let mut current = normalize_punctuation(name);
    for _ in 0..MAX_PASSES {
        let next = clean_pass(&current, &patterns);
        if next == current {
            break;
        }
        current = next;
    }
    Ok(current)
}

fn clean_pass(name: &str, patterns: &[(Regex, TokenKind)]) -> String {
    let mut name = name.to_string();
    for (pat, repl) in REPLACEMENTS.iter() {
        name = pat.replace_all(&name, *repl).trim().to_string();
    }
    for pat in [&EP_LP_BRACKETED, &EP_LP] {
        name = pat
            .replace_all(&name, |caps: &Captures| caps[1].to_uppercase())
            .into_owned();
    }

    let quoted = QUOTED.captures(&name).map(|caps| caps[1].to_string());
    if let Some(inner) = quoted {
        name = inner;
    }

    for (pat, kind) in patterns {
        name = remove_tokens(&name, pat, *kind);
    }

    name = EMPTY_BRACKETS.replace_all(&name, "").into_owned();
    name = name.replace('"', "");
    collapse_spaces(&name)
        .trim_matches(|c: char| c == ' ' || DELIMITERS.contains(&c))
        .to_string()
}

/// Case-insensitive literal pattern for runtime text.
fn literal(text: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("(?i){}", regex::escape(text)))?)
}

/// Remove every acceptable occurrence of `pattern`.
fn remove_tokens(name: &str, pattern: &Regex, kind: TokenKind) -> String {
    let mut name = name.to_string();
    let mut pos = 0;
    while pos < name.len() {
        let Some(m) = pattern.find_at(&name, pos) else {
            break;
        };
        let span = m.range();
        if span.is_empty() {
            break;
        }
        if is_removable(&name, span.clone(), kind) {
            name = remove_span(&name, span);
            pos = 0;
        } else {
            pos = span.start + name[span.start..].chars().next().map_or(1, char::len_utf8);
        }
    }
    name
}

fn is_removable(name: &str, span: Range<usize>, kind: TokenKind) -> bool {
    let before = &name[..span.start];
    let after = &name[span.end..];

    // whole words only
    if before.chars().next_back().is_some_and(char::is_alphanumeric)
        || after.chars().next().is_some_and(char::is_alphanumeric)
    {
        return false;
    }
    let unit = is_unit(before, after);

    match kind {
        TokenKind::CatalogNumber | TokenKind::Noise(Scope::Anywhere) => true,
        TokenKind::Noise(Scope::Unit) => unit,
        TokenKind::Noise(Scope::Edge) => unit || is_edge(before, after),
        TokenKind::Noise(Scope::End) => unit || is_filler(after),
        TokenKind::Artist | TokenKind::Label => {
            if unit {
                return true;
            }
            if after.starts_with('\'') || inside_brackets(before) {
                return false;
            }
            let word_before = before.strip_suffix(' ').is_some_and(ends_with_word);
            let word_after = after.strip_prefix(' ').is_some_and(starts_with_word);
            // "Best of Artist Live": part of the name
            if word_before && word_after {
                return false;
            }
            // "Album Label": a plain trailing word is kept for labels
            !(kind == TokenKind::Label && word_before && after.trim().is_empty())
        }
    }
}

/// Token alone in a bracket pair: "[Label] Album", "Album (Limited Edition)"
fn is_unit(before: &str, after: &str) -> bool {
    before.trim_end().ends_with(['(', '[']) && after.trim_start().starts_with([')', ']'])
}

fn is_edge(before: &str, after: &str) -> bool {
    is_filler(before) || is_filler(after)
}

/// Nothing but spaces and delimiters.
fn is_filler(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || DELIMITERS.contains(&c))
}

fn inside_brackets(before: &str) -> bool {
    let depth = |open: char, close: char| {
        before.chars().filter(|c| *c == open).count() > before.chars().filter(|c| *c == close).count()
    };
    depth('(', ')') || depth('[', ']')
}

fn ends_with_word(s: &str) -> bool {
    s.chars().next_back().is_some_and(char::is_alphanumeric)
}

fn starts_with_word(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_alphanumeric)
}

/// Cut a token out together with its bracket pair or one adjacent delimiter.
fn remove_span(name: &str, span: Range<usize>) -> String {
    let mut left = name[..span.start].trim_end();
    let mut right = name[span.end..].trim_start();

    if is_unit(left, right) {
        left = left[..left.len() - 1].trim_end();
        right = right[1..].trim_start();
    } else if let Some(stripped) = left.strip_suffix(DELIMITERS) {
        left = stripped.trim_end();
    } else if let Some(stripped) = right.strip_prefix(DELIMITERS) {
        right = stripped.trim_start();
    }

    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (_, true) => left.to_string(),
        _ => format!("{} {}", left, right),
    }
}
