//! Release type and status classification.

use crate::models::{ReleaseDate, ReleaseStatus, ReleaseType};
use crate::normalize::ARTIST_SEPARATOR;
use crate::splitter::ParsedTrack;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;
use tracing::warn;

/// Most tracks an EP may have
pub const EP_MAX_TRACKS: usize = 6;

static EP_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bEP\b").unwrap());
static LP_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d?LP\b").unwrap());

/// Time of day and zone after the date: "17 Jul 2020 00:00:00 GMT"
static TIME_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r" \d{2}:.*$").unwrap());

/// Everything the classifier looks at.
#[derive(Clone, Copy, Debug)]
pub struct ReleaseShape<'a> {
    /// Raw release title
    pub album: &'a str,
    pub disctitle: Option<&'a str>,
    pub tracks: &'a [ParsedTrack],
    pub singleton: bool,
}

impl ReleaseShape<'_> {
    fn text(&self) -> String {
        match self.disctitle {
            Some(disctitle) => format!("{}\n{}", self.album, disctitle),
            None => self.album.to_string(),
        }
    }

    /// Same song throughout, or a lone track.
    pub fn is_single(&self) -> bool {
        if self.singleton || self.tracks.len() == 1 {
            return true;
        }
        let titles: FxHashSet<String> = self
            .tracks
            .iter()
            .map(|t| t.main_title.to_lowercase())
            .collect();
        titles.len() == 1
    }

    /// Titled as a various-artists release, or credited to many artists.
    pub fn is_compilation(&self) -> bool {
        if self.album.to_lowercase().contains("various artists") {
            return true;
        }
        let count = self.tracks.len();
        if count < 4 {
            return false;
        }
        let first_artists: FxHashSet<String> = self
            .tracks
            .iter()
            .filter(|t| !t.artist.is_empty())
            .filter_map(|t| {
                let artist = t.artist.replace(" & ", ", ");
                ARTIST_SEPARATOR.split(&artist).next().map(|a| a.trim().to_lowercase())
            })
            .collect();
        first_artists.len() > 4usize.min(count - 2)
    }
}

/// Infer the release type.
///
/// Precedence: single, then an explicit EP or LP marker in the title or disc
/// title, then compilation, and album otherwise.
pub fn classify(shape: &ReleaseShape) -> ReleaseType {
    if shape.is_single() {
        return ReleaseType::Single;
    }

    let text = shape.text();
    let ep_count = EP_WORD.find_iter(&text).count();
    let lp_count = LP_WORD.find_iter(&text).count();
    if ep_count > lp_count && shape.tracks.len() <= EP_MAX_TRACKS {
        return ReleaseType::Ep;
    }
    if lp_count > 0 && lp_count >= ep_count {
        return ReleaseType::Album;
    }

    if shape.is_compilation() {
        return ReleaseType::Compilation;
    }
    ReleaseType::Album
}

/// Parse a publication timestamp: "17 Jul 2020 00:00:00 GMT" or ISO 8601.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let day_first = TIME_SUFFIX.replace(raw, "");
    if let Ok(date) = NaiveDate::parse_from_str(&day_first, "%d %b %Y") {
        return Some(date);
    }
    let iso = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(date = raw, %err, "unparseable release date");
            None
        }
    }
}

/// Promotional when the release date lies after `today`.
pub fn release_status(date: Option<NaiveDate>, today: NaiveDate) -> ReleaseStatus {
    match date {
        Some(date) if date > today => ReleaseStatus::Promotional,
        _ => ReleaseStatus::Official,
    }
}

impl From<NaiveDate> for ReleaseDate {
    fn from(date: NaiveDate) -> Self {
        ReleaseDate {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tracks(specs: &[(&str, &str)]) -> Vec<ParsedTrack> {
        specs
            .iter()
            .map(|(artist, title)| ParsedTrack {
                artist: artist.to_string(),
                title: title.to_string(),
                main_title: title.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn classify_tracks(album: &str, specs: &[(&str, &str)]) -> ReleaseType {
        let tracks = tracks(specs);
        classify(&ReleaseShape {
            album,
            disctitle: None,
            tracks: &tracks,
            singleton: false,
        })
    }

    #[test]
    fn test_single() {
        assert_eq!(classify_tracks("Song", &[("A", "Song")]), ReleaseType::Single);
        assert_eq!(classify_tracks("Song", &[("A", "Song"), ("A", "song")]), ReleaseType::Single);
        let singleton = classify(&ReleaseShape {
            album: "Song EP",
            disctitle: None,
            tracks: &[],
            singleton: true,
        });
        assert_eq!(singleton, ReleaseType::Single);
    }

    #[test]
    fn test_ep_and_lp_markers() {
        let four = [("A", "One"), ("A", "Two"), ("A", "Three"), ("A", "Four")];
        assert_eq!(classify_tracks("Album EP", &four), ReleaseType::Ep);
        assert_eq!(classify_tracks("Album LP", &four), ReleaseType::Album);
        assert_eq!(classify_tracks("Album", &four), ReleaseType::Album);

        let eight: Vec<(&str, &str)> = ["1", "2", "3", "4", "5", "6", "7", "8"]
            .iter()
            .map(|t| ("A", *t))
            .collect();
        assert_eq!(classify_tracks("Album EP", &eight), ReleaseType::Album);

        let tracks = tracks(&four);
        let from_disctitle = classify(&ReleaseShape {
            album: "Album",
            disctitle: Some("12\" EP"),
            tracks: &tracks,
            singleton: false,
        });
        assert_eq!(from_disctitle, ReleaseType::Ep);
    }

    #[test]
    fn test_compilation() {
        let various = [("A", "One"), ("B", "Two"), ("C", "Three"), ("D", "Four")];
        assert_eq!(classify_tracks("Summer Sampler", &various), ReleaseType::Compilation);
        assert_eq!(
            classify_tracks("Various Artists Vol. 1", &[("A", "One"), ("A", "Two")]),
            ReleaseType::Compilation
        );

        let collaborations = [("A & B", "One"), ("A, C", "Two"), ("A", "Three"), ("B", "Four")];
        assert_eq!(classify_tracks("Together", &collaborations), ReleaseType::Album);
    }

    #[test]
    fn test_parse_release_date() {
        let cases = [
            ("17 Jul 2020 00:00:00 GMT", Some((2020, 7, 17))),
            ("01 Jan 2021", Some((2021, 1, 1))),
            ("2020-07-17T00:00:00Z", Some((2020, 7, 17))),
            ("soon", None),
            ("", None),
        ];
        for (input, expected) in cases {
            let parsed = parse_release_date(input).map(|d| (d.year(), d.month(), d.day()));
            assert_eq!(parsed, expected, "input: {}", input);
        }
    }

    #[test]
    fn test_release_status() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let tomorrow = today + Duration::days(1);
        assert_eq!(release_status(Some(tomorrow), today), ReleaseStatus::Promotional);
        assert_eq!(release_status(Some(today), today), ReleaseStatus::Official);
        assert_eq!(release_status(Some(today - Duration::days(30)), today), ReleaseStatus::Official);
        assert_eq!(release_status(None, today), ReleaseStatus::Official);
    }

    #[test]
    fn test_release_date_components() {
        let date = ReleaseDate::from(NaiveDate::from_ymd_opt(2020, 7, 17).unwrap());
        assert_eq!((date.year, date.month, date.day), (2020, 7, 17));
    }
}
