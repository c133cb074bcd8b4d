//! Catalog number recognition.
//!
//! A single candidate expression finds anything shaped like a label's
//! release code; every match is then screened by the exclusion rules below.
//! Scopes are searched in the configured precedence and the first accepted
//! candidate wins.

use crate::config::{CatalogConfig, CatalogSource};
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tracing::debug;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Shapes of a catalog number, most specific first.
const CANDIDATE_CORE: &str = concat!(
    r"[A-Z][A-Z .]+\d{3}",        // HANDS D300, CC ATOM 101, LABEL SESSIONS 003
    r"|[A-Z-]{3,}\d+",            // RIV4
    r"|[A-Z]{2,}[A-Z.$-]*\d{2,}", // HS11, USE202, HEY-101, LI$INGLE025
    r"|[A-Z.]{2,} \d+",           // OBS.CUR 9
    r"|[A-Za-z]+-[A-Za-z]+ ?\d+", // o-ton 119
    r"|\w+[A-Za-z]0\d+",          // 1ØPILLS018, fa036
    r"|[a-z]+(?:cd|lp|:)\d+",     // ostgutlp45, reni:7
    r"|[A-Za-z]+\d+-\d+",         // P90-003
);

/// Optional tail: IBM001CD, ISMVA002.1
const CANDIDATE_SUFFIX: &str = r"-?[A-Z]+|\.[0-9]+";

pub static CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({})({})?\b", CANDIDATE_CORE, CANDIDATE_SUFFIX)).unwrap()
});

/// "Cat. no: ABC001", "Catalogue Number: ABC 001", "Catalog #: ABC001"
pub static WITH_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|\s)cat(?:alog(?:ue)?|\.)? ?(?:(?:no\.?|number|#) ?:?|:) ?(\w[^\n,]+?)(?:\W{2}|[\n,]|$)",
    )
    .unwrap()
});

/// Starts that are never catalog numbers: "LC 1234", "VA001", "EP 01"
static EXCLUDED_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:LC |VA[\d ]|[EL]P\W)").unwrap()
});

/// Words that look like a code when followed by a number: "Vol 30", "Vinyl 12"
static NON_CATALOG_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:vol|disc|number|mp3|christ|vinyl|session|record|artist|triple|double|the |maxi |rave )",
    )
    .unwrap()
});

/// Cassette durations: C30, C90, C120
static CASSETTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^C\d{2,3}$").unwrap());

static YEAR_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ .-](?:19|20)\d{2}$").unwrap());

/// A year or a VA marker later on the same sentence disqualifies the candidate
static YEAR_LATER: Lazy<Regex> = Lazy::new(|| Regex::new(r" (?:20\d{2}|VA[ \d])").unwrap());

// ============================================================================
// SCOPES
// ============================================================================

/// Where a candidate has to sit in the searched text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Anywhere, except right after ", "
    Anywhere,
    /// At the start or end of the text or of one of its lines
    StartOrEnd,
    /// Enclosed in brackets: "[ABC001]", "(ABC001"
    Delimited,
}

/// Text of every scope a release offers.
#[derive(Clone, Debug, Default)]
pub struct CatalogSources<'a> {
    pub title: &'a str,
    pub disctitle: &'a str,
    pub description: &'a str,
    pub label: Option<&'a str>,
}

// ============================================================================
// EXTRACTOR
// ============================================================================

pub struct CatalogNumberExtractor {
    short_forms: Vec<String>,
    precedence: Vec<CatalogSource>,
    ignored_artists: Vec<String>,
    track_text: String,
}

impl CatalogNumberExtractor {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            short_forms: config.short_forms.iter().map(|s| s.to_uppercase()).collect(),
            precedence: config.precedence.clone(),
            ignored_artists: Vec::new(),
            track_text: String::new(),
        }
    }

    /// Reject candidates equal to an artist name or found in a track title.
    pub fn with_context<A: AsRef<str>, T: AsRef<str>>(mut self, artists: &[A], tracks: &[T]) -> Self {
        self.ignored_artists = artists
            .iter()
            .map(|a| a.as_ref().trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        self.track_text = tracks.iter().map(|t| t.as_ref()).collect::<Vec<_>>().join("\n");
        self
    }

    /// Find the release catalog number.
    ///
    /// An explicit header in the description wins, then each configured
    /// scope in order, then a number built on the label's own name.
    pub fn extract(&self, sources: &CatalogSources) -> Result<Option<String>> {
        if let Some(found) = self.from_header(sources.description) {
            debug!(catalognum = %found, "catalog number from description header");
            return Ok(Some(found));
        }

        for source in &self.precedence {
            let found = match source {
                CatalogSource::Title => self.find(sources.title, Placement::Anywhere),
                CatalogSource::Disctitle => self.find_in_disctitle(sources.disctitle),
                CatalogSource::Description => self
                    .find(sources.description, Placement::StartOrEnd)
                    .or_else(|| self.find(sources.description, Placement::Anywhere)),
            };
            if let Some(found) = found {
                debug!(catalognum = %found, ?source, "catalog number found");
                return Ok(Some(found));
            }
        }

        if let Some(label) = sources.label.filter(|l| !l.trim().is_empty()) {
            let pattern = label_pattern(label)?;
            let text = [sources.title, sources.disctitle, sources.description].join("\n");
            if let Some(found) = self.find_with(&pattern, &text, Placement::Anywhere) {
                debug!(catalognum = %found, "catalog number from label pattern");
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// First accepted candidate in `text` at the given placement.
    pub fn find(&self, text: &str, placement: Placement) -> Option<String> {
        self.find_with(&CANDIDATE, text, placement)
    }

    /// Like `find`, also returning where the catalog number sits.
    pub fn find_span(&self, text: &str, placement: Placement) -> Option<Range<usize>> {
        self.first_span(&CANDIDATE, text, placement, false)
    }

    /// Disc titles are also matched uppercased ("Cat001 Vinyl") for
    /// single-word candidates, returning the text as written.
    pub fn find_in_disctitle(&self, disctitle: &str) -> Option<String> {
        if let Some(found) = self.find(disctitle, Placement::Anywhere) {
            return Some(found);
        }
        let upper = disctitle.to_ascii_uppercase();
        self.first_span(&CANDIDATE, &upper, Placement::Anywhere, true)
            .map(|span| disctitle[span].to_string())
    }

    fn from_header(&self, description: &str) -> Option<String> {
        let caps = WITH_HEADER.captures(description)?;
        let found = caps[1].trim();
        // the whole header value has to be one accepted catalog number
        let span = self.find_span(found, Placement::Anywhere)?;
        (span == (0..found.len())).then(|| found.to_string())
    }

    fn find_with(&self, pattern: &Regex, text: &str, placement: Placement) -> Option<String> {
        self.first_span(pattern, text, placement, false)
            .map(|span| text[span].to_string())
    }

    /// Leftmost accepted candidate. A rejected match is retried one
    /// character further so that "LP ABC001" still yields "ABC001".
    fn first_span(
        &self,
        pattern: &Regex,
        text: &str,
        placement: Placement,
        single_word: bool,
    ) -> Option<Range<usize>> {
        let mut pos = 0;
        while pos < text.len() {
            let caps = pattern.captures_at(text, pos)?;
            let core = caps.get(1)?;
            let end = match caps.get(2) {
                // a letter suffix needs two digits before it: IBM001CD
                Some(suffix) if suffix.as_str().starts_with('.') || ends_with_two_digits(core.as_str()) => {
                    suffix.end()
                }
                _ => core.end(),
            };
            let span = core.start()..end;
            if (!single_word || !text[span.clone()].contains(' '))
                && self.accepts(text, span.clone(), placement)
            {
                return Some(span);
            }
            pos = core.start() + text[core.start()..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }

    fn accepts(&self, text: &str, span: Range<usize>, placement: Placement) -> bool {
        let (start, end) = (span.start, span.end);
        let candidate = &text[start..end];
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();

        if matches!(before, Some(']' | '/' | '@' | '-')) || matches!(after, Some('"' | '%')) {
            return false;
        }
        if after.is_some_and(char::is_alphanumeric) {
            return false;
        }

        let placed = match placement {
            Placement::Anywhere => !text[..start].ends_with(", "),
            Placement::StartOrEnd => {
                start == 0 || text[..start].ends_with('\n') || end == text.len() || text[end..].starts_with('\n')
            }
            Placement::Delimited => {
                let rest_of_line = text[start..].lines().next().unwrap_or("");
                matches!(before, Some('[' | '('))
                    && (after.is_none() || matches!(after, Some(']' | ')')))
                    && !rest_of_line.contains("MIX")
            }
        };
        placed && self.is_valid(text, start, candidate) && !self.is_ignored(candidate)
    }

    /// Shape rules independent of where the candidate was found.
    fn is_valid(&self, text: &str, start: usize, candidate: &str) -> bool {
        if !candidate.chars().any(char::is_alphabetic) {
            return false;
        }
        if EXCLUDED_START.is_match(&text[start..])
            || NON_CATALOG_WORD.is_match(candidate)
            || CASSETTE.is_match(candidate)
            || YEAR_SUFFIX.is_match(candidate)
        {
            return false;
        }

        let line = text[start..].lines().next().unwrap_or("");
        let sentence = line.split('.').next().unwrap_or("");
        if YEAR_LATER.is_match(sentence) || line.to_lowercase().contains("shirt") {
            return false;
        }

        let digits = candidate.chars().filter(char::is_ascii_digit).count();
        digits >= 2 || self.is_short_form(candidate)
    }

    fn is_short_form(&self, candidate: &str) -> bool {
        let prefix = candidate
            .split(|c: char| c.is_ascii_digit())
            .next()
            .unwrap_or("")
            .trim_matches(|c: char| c == ' ' || c == '-')
            .to_uppercase();
        !prefix.is_empty() && self.short_forms.contains(&prefix)
    }

    fn is_ignored(&self, candidate: &str) -> bool {
        let lower = candidate.to_lowercase();
        self.ignored_artists.contains(&lower)
            || (!self.track_text.is_empty() && self.track_text.contains(candidate))
    }
}

fn ends_with_two_digits(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[bytes.len() - 2..].iter().all(u8::is_ascii_digit)
}

/// Catalog numbers built on the label name: "Label 001", "label-x LP12".
pub fn label_pattern(label: &str) -> Result<Regex> {
    let pattern = format!(
        r"\b((?i:{} ?[A-Z]*\d+[A-Z]*))({})?\b",
        regex::escape(label.trim()),
        CANDIDATE_SUFFIX
    );
    Ok(Regex::new(&pattern)?)
}
