//! Digital-only bonus track detection.
//!
//! Markers are stripped from the title while the track line is parsed; the
//! flagged tracks are dropped at the very end when a physical medium was
//! chosen and the configuration asks for it.

use crate::models::{MediumKind, Track};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Bonus-content markers (applied in order).
pub static DIGITAL_ONLY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Leading marker: "DIGI 1. Title", "Bonus -- Title"
        Regex::new(r"^(?:DIGI(?:TAL)? ?[\d.]+|Bonus\W{2,})\W*").unwrap(),
        // Trailing marker: "Title (Digital Only)", "Title [Bandcamp Exclusive]"
        Regex::new(r"(?i)[^\w)]+(?:bandcamp[^-]+|digi(?:tal)?)\W*(?:\W+|only|bonus|exclusive)\W*$").unwrap(),
        // "Title (Bonus Track)", "Title - Bandcamp Exclusive Bonus"
        Regex::new(r"(?i)[^\w)]+(?:bandcamp exclusive )?bonus(?: track)?(?:\]\W*|\W*$)").unwrap(),
    ]
});

/// Remove bonus-content markers from a track name.
/// Returns the cleaned name and whether anything was removed.
pub fn strip_markers(name: &str) -> (String, bool) {
    let mut clean = name.to_string();
    for pat in DIGITAL_ONLY_PATTERNS.iter() {
        clean = pat.replace_all(&clean, "").into_owned();
    }
    let flagged = clean != name;
    (clean.trim().to_string(), flagged)
}

/// Drop digital-only tracks from a physical medium unless they are wanted.
pub fn filter_tracks(tracks: Vec<Track>, medium: MediumKind, include_digital_only: bool) -> Vec<Track> {
    if include_digital_only || medium.is_digital() {
        return tracks;
    }
    let before = tracks.len();
    let kept: Vec<Track> = tracks.into_iter().filter(|t| !t.digital_only).collect();
    if kept.len() != before {
        debug!(removed = before - kept.len(), medium = medium.name(), "dropped digital-only tracks");
    }
    kept
}
