//! Track line splitting.
//!
//! Storefront track names pack the side label, the artist and the title
//! into one line: "A1 - Artist - Title (Someone Remix)". This module works
//! out the delimiter used across the release and takes each line apart.

use crate::catalognum::{CatalogNumberExtractor, Placement};
use crate::digital;
use crate::normalize::normalize_punctuation;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// First spaced non-word character: "hi | bye", "hi - bye"
pub static DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r" ([^\w&()+/\[\] ]) ").unwrap());

/// Vinyl side position at the start: "A1 ", "b2. ", "AA1 - "
pub static TRACK_ALT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([A-J]{1,3}[0-6])(?:[^\w(]|_)+").unwrap()
});

/// "Title (Someone Remix)", "Title ( Someone Edit)"
pub static REMIXER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\W*\( *([^)]+) (?i:(?:re)?mix|edit)\)").unwrap()
});

/// "Title [Some Album EP]"
pub static ELP_ALBUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[- ]*\[([^\]]+ [EL]P)\]+").unwrap());

static FT_BRACKETED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i) *[\[(](?:ft|feat|featuring)[. ]([^\]\[()]+)[\])] *").unwrap()
});

static FT_PLAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i) *\b(?:ft|feat|featuring)[. ]([^\]\[()]+)").unwrap()
});

/// Everything from the first remix or featuring qualifier on
static REMIX_OR_FT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" [\[(].*(?i:mix|edit|f(?:ea)?t(?:[.]|uring)?).*").unwrap()
});

/// Line cleanup (applied in order).
pub static CLEAN_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        // hi -bye -> hi - bye
        (Regex::new(r" -(\S)").unwrap(), " - $1"),
        // hi- bye -> hi - bye
        (Regex::new(r"(\S)- ").unwrap(), "$1 - "),
        (Regex::new(r"  +").unwrap(), " "),
        // hi ( bye) -> hi (bye)
        (Regex::new(r"\( +").unwrap(), "("),
        // hi (bye )) -> hi (bye); "SUNN O)))" stays
        (Regex::new(r" \)+").unwrap(), ")"),
        (Regex::new(r"(?i)(mix|edit)\)+$").unwrap(), "$1)"),
        // "bye" -> bye; hi - "bye" -> hi - bye
        (Regex::new(r#"(^|- )"([^"]+)"( \(|$)"#).unwrap(), "$1$2$3"),
        // (b - hi edit) -> (b-hi edit)
        (Regex::new(r"([\[(][^(-]+) - ([^\]()]+[\])])").unwrap(), "$1-$2"),
        (Regex::new(r"- Reworked").unwrap(), "(Reworked)"),
        (Regex::new(r"(?i) *[\[(]free(?: download| dl)?[\])]").unwrap(), ""),
    ]
});

// ============================================================================
// PARSED TRACK
// ============================================================================

/// One track line taken apart. Mutable until the release is assembled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedTrack {
    pub index: usize,
    pub track_alt: Option<String>,
    pub artist: String,
    pub title: String,
    /// Title without remix or featuring qualifiers
    pub main_title: String,
    pub ft: Option<String>,
    pub remixer: Option<String>,
    /// Album hinted at in the line: "[Some Album EP]"
    pub album: Option<String>,
    pub catalognum: Option<String>,
    pub digital_only: bool,
}

impl ParsedTrack {
    /// Artist credit including the featuring artist.
    pub fn full_artist(&self) -> String {
        match &self.ft {
            Some(ft) if !self.artist.is_empty() => format!("{} {}", self.artist, ft),
            Some(ft) => ft.clone(),
            None => self.artist.clone(),
        }
    }
}

/// Release-wide facts every line is split against.
#[derive(Clone, Copy, Debug)]
pub struct SplitContext<'a> {
    pub delimiter: char,
    pub label: &'a str,
    /// Catalog number already found at release scope
    pub catalognum: Option<&'a str>,
}

// ============================================================================
// RELEASE-WIDE HELPERS
// ============================================================================

/// The delimiter in effect across the release.
///
/// Each name votes for its first spaced delimiter. The winner is used when
/// it split more than half of the names; otherwise dash.
pub fn track_delimiter<S: AsRef<str>>(names: &[S]) -> char {
    let mut counts: Vec<(char, usize)> = Vec::new();
    for name in names {
        let delim = DELIMITER
            .captures(name.as_ref())
            .and_then(|caps| caps[1].chars().next())
            .unwrap_or('-');
        match counts.iter_mut().find(|(c, _)| *c == delim) {
            Some(entry) => entry.1 += 1,
            None => counts.push((delim, 1)),
        }
    }

    let mut best: Option<(char, usize)> = None;
    for &(delim, count) in &counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((delim, count));
        }
    }
    match best {
        Some((delim, count)) if names.len() == 1 || count * 2 > names.len() => delim,
        _ => '-',
    }
}

/// Look for a catalog number repeated in every track name.
///
/// The first and the last word common to all names are checked. When one
/// is a catalog number it is removed from every name.
pub fn common_catalognum(
    names: &[String],
    delimiter: char,
    catalog: &CatalogNumberExtractor,
) -> (Option<String>, Vec<String>) {
    let tokens: Vec<Vec<&str>> = names.iter().map(|n| n.split_whitespace().collect()).collect();
    let Some(first) = tokens.first() else {
        return (None, names.to_vec());
    };

    let delim = delimiter.to_string();
    let mut common: Vec<&str> = Vec::new();
    for &word in first {
        if word != delim && !common.contains(&word) && tokens.iter().all(|t| t.contains(&word)) {
            common.push(word);
        }
    }
    let (Some(&head), Some(&tail)) = (common.first(), common.last()) else {
        return (None, names.to_vec());
    };

    for word in [head, tail] {
        if let Some(found) = catalog.find(word, Placement::Anywhere) {
            let cleaned = tokens
                .iter()
                .map(|words| {
                    let mut words = words.clone();
                    if let Some(pos) = words.iter().position(|w| *w == word) {
                        words.remove(pos);
                    }
                    words.join(" ")
                })
                .collect();
            return (Some(found), cleaned);
        }
    }
    (None, names.to_vec())
}

/// Strip "01. ", "2 - " style numbering, but only when every name starts
/// with its own position. A lone "24 Hours" keeps its number.
pub fn strip_track_numbers(names: Vec<String>) -> Vec<String> {
    if names.len() < 2 {
        return names;
    }
    let stripped: Option<Vec<String>> = names
        .iter()
        .enumerate()
        .map(|(i, name)| strip_position(name, i + 1))
        .collect();
    stripped.unwrap_or(names)
}

fn strip_position(name: &str, position: usize) -> Option<String> {
    let rest = name.trim_start_matches('0').strip_prefix(&position.to_string())?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    // "1.5 Title" is not numbering
    if is_word_char(first) || chars.next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    let body = rest.trim_start_matches(|c: char| !is_word_char(c));
    if body.is_empty() {
        return None;
    }
    Some(body.to_string())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// ============================================================================
// LINE SPLITTING
// ============================================================================

/// Take a track line apart into side label, artist and title.
pub fn split_track(
    line: &str,
    json_artist: &str,
    index: usize,
    ctx: &SplitContext,
    catalog: &CatalogNumberExtractor,
) -> ParsedTrack {
    let mut name = normalize_punctuation(line);
    if ctx.delimiter != '-' {
        name = name.replace(&format!(" {} ", ctx.delimiter), " - ");
    }
    name = strip_trailing_label(&name, ctx.label);

    let mut json_artist = normalize_punctuation(json_artist);
    for (pat, repl) in CLEAN_PATTERNS.iter() {
        name = pat.replace_all(&name, *repl).into_owned();
        json_artist = pat.replace_all(&json_artist, *repl).into_owned();
    }
    let mut name = name.trim().trim_start_matches('-').trim_start().to_string();
    let mut track = ParsedTrack {
        index,
        catalognum: ctx.catalognum.map(str::to_string),
        ..Default::default()
    };

    let alt = TRACK_ALT.captures(&name).map(|caps| (caps[1].to_uppercase(), caps[0].len()));
    if let Some((alt, end)) = alt {
        track.track_alt = Some(alt);
        name = name[end..].to_string();
    }

    if track.catalognum.is_none() {
        if let Some(span) = catalog.find_span(&name, Placement::Delimited) {
            track.catalognum = Some(name[span.clone()].to_string());
            name = remove_bracketed(&name, span);
        }
    }

    if let Some(caps) = REMIXER.captures(&name) {
        track.remixer = Some(caps[1].trim().to_string());
    }

    let hint = ELP_ALBUM.captures(&name).and_then(|caps| Some((caps[1].to_string(), caps.get(0)?.range())));
    if let Some((album, range)) = hint {
        track.album = Some(album);
        name.replace_range(range, "");
    }

    find_featuring(&mut name, &mut json_artist, &mut track);

    let (mut name, digital_only) = digital::strip_markers(&name);
    track.digital_only = digital_only;

    let json_artist = json_artist.trim();
    if !json_artist.is_empty() && !name.contains(" - ") {
        name = format!("{} - {}", json_artist, name);
    }
    let name = name.trim();

    track.title = title_of(name);
    track.artist = artist_of(name, &track.title, track.remixer.as_deref());
    track.main_title = REMIX_OR_FT.replace(&track.title, "").trim().to_string();
    track
}

/// Fill in missing artists once every line is split.
///
/// A lone parsed side label is really an artist called like "B2". Failing
/// that, the album artist is used.
pub fn adjust_artists(tracks: &mut [ParsedTrack], album_artist: &str) {
    let mut track_alts: Vec<&str> = tracks.iter().filter_map(|t| t.track_alt.as_deref()).collect();
    track_alts.sort_unstable();
    track_alts.dedup();
    let single_alt = track_alts.len() == 1;
    let total = tracks.len();
    let with_artist = tracks.iter().filter(|t| !t.artist.is_empty()).count();

    for track in tracks.iter_mut() {
        if !track.artist.is_empty() {
            continue;
        }
        if single_alt && track.track_alt.is_some() {
            track.artist = track.track_alt.take().unwrap_or_default();
        } else if total > 1 && with_artist == total - 1 {
            // the only unparsed line: relax to an unspaced dash
            if let Some((artist, title)) = track.title.split_once('-') {
                if !title.contains('-') && !artist.trim().is_empty() && !title.trim().is_empty() {
                    track.artist = artist.trim().to_string();
                    track.title = title.trim().to_string();
                }
            }
        }
        if track.artist.is_empty() {
            track.artist = album_artist.to_string();
        }
    }
}

fn strip_trailing_label(name: &str, label: &str) -> String {
    let label = label.trim();
    if label.is_empty() || name.len() <= label.len() || !name.ends_with(label) {
        return name.to_string();
    }
    let head = &name[..name.len() - label.len()];
    let rest = head.trim_end_matches([' ', '-']);
    if rest.is_empty() || rest.len() == head.len() {
        return name.to_string();
    }
    rest.to_string()
}

/// Remove a bracketed catalog number together with its brackets.
fn remove_bracketed(name: &str, span: Range<usize>) -> String {
    let start = name[..span.start].rfind(['[', '(']).unwrap_or(span.start);
    let end = match name[span.end..].chars().next() {
        Some(c @ (']' | ')')) => span.end + c.len_utf8(),
        _ => span.end,
    };
    let mut out = String::with_capacity(name.len());
    out.push_str(name[..start].trim_end());
    let tail = name[end..].trim_start();
    if !out.is_empty() && !tail.is_empty() {
        out.push(' ');
    }
    out.push_str(tail);
    out
}

fn featuring_match(text: &str) -> Option<(Range<usize>, String)> {
    if let Some(caps) = FT_BRACKETED.captures(text) {
        let who = caps[1].trim();
        if !who.to_lowercase().ends_with("mix") {
            return Some((caps.get(0)?.range(), who.to_string()));
        }
    }
    let caps = FT_PLAIN.captures(text)?;
    let content = caps.get(1)?;
    // unbracketed credits must not swallow the rest of the line
    if text[content.start()..].contains(" - ") {
        return None;
    }
    let who = content.as_str().trim_end();
    if who.is_empty() || who.to_lowercase().ends_with("mix") {
        return None;
    }
    Some((caps.get(0)?.start()..content.start() + who.len(), who.to_string()))
}

/// Move a featuring credit from the line (or the per-track artist) to `ft`.
/// Credits belonging to the remixer stay where they are.
fn find_featuring(name: &mut String, json_artist: &mut String, track: &mut ParsedTrack) {
    for in_artist in [false, true] {
        let field = if in_artist { &mut *json_artist } else { &mut *name };
        let Some((range, who)) = featuring_match(field) else {
            continue;
        };
        if track.remixer.as_deref().is_some_and(|r| r.contains(&who)) {
            continue;
        }
        let matched = field[range].trim_end().to_string();
        *field = field.replacen(&matched, "", 1);
        if !json_artist.contains(&who) {
            track.ft = Some(matched.trim_matches([' ', '(', ')', '[', ']']).to_string());
        }
        break;
    }
}

/// Last " - " part, keeping trailing empty parts: "Title - -" stays whole.
fn title_of(name: &str) -> String {
    let parts: Vec<&str> = name.split(" - ").collect();
    let count = parts.len();
    for (idx, part) in parts.iter().rev().enumerate() {
        if part.trim_matches([' ', '-']).is_empty() {
            return parts[count.saturating_sub(idx + 2)..].join(" - ");
        }
    }
    parts[count - 1].to_string()
}

fn artist_of(name: &str, title: &str, remixer: Option<&str>) -> String {
    let cut = name.rfind(title).unwrap_or(0);
    let artist = name[..cut].trim_matches([',', ' ', '-']);
    let mut artist = REMIXER.replace_all(artist, "").into_owned();
    if let Some(remixer) = remixer {
        artist = artist.replace(remixer, "").trim_matches([' ', ',']).to_string();
    }
    artist.trim_matches([' ', '-']).to_string()
}
