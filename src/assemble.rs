//! Release assembly.
//!
//! Runs every extraction stage over one raw descriptor, in dependency
//! order, and builds the output record. Nothing is cached between calls:
//! the same descriptor, configuration and date always give the same record.

use crate::album::{normalize_album, AlbumContext};
use crate::catalognum::{CatalogNumberExtractor, CatalogSources};
use crate::config::Config;
use crate::country;
use crate::digital;
use crate::error::{ExtractError, Result};
use crate::genre;
use crate::label::{self, Label};
use crate::models::{
    ItemType, MediumKind, RawMedium, RawRelease, RawTrack, ReleaseDate, ReleaseMetadata, ReleaseType, Track,
};
use crate::normalize::{same_name, split_artists};
use crate::release_type::{self, ReleaseShape};
use crate::splitter::{self, ParsedTrack, SplitContext, TRACK_ALT};
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Official album name given in the release text
static TITLE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Title: ?([^\n\r]+)").unwrap());

/// Official artist given in the release text
static ARTIST_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Artists?:([^\n]+)").unwrap());

/// Record count in a vinyl medium name: "2 x Vinyl LP", "2LP", "Double Vinyl"
static VINYL_COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([1-5]) ?(?:xLP|LP|x)\b|\b(single|double|triple)\b").unwrap()
});

/// ISO 8601 duration: "P00H04M05S"
static DURATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^P(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").unwrap());

/// Medium descriptions that only advertise the bundled download
const DOWNLOAD_BLURB: &str = "Includes high-quality";

// ============================================================================
// MEDIA
// ============================================================================

/// The medium the release is described for.
#[derive(Clone, Copy, Debug)]
pub struct SelectedMedium<'a> {
    pub kind: MediumKind,
    pub raw: Option<&'a RawMedium>,
}

impl SelectedMedium<'_> {
    /// Medium name, unless it is the digital download.
    pub fn disctitle(&self) -> Option<&str> {
        if self.kind.is_digital() {
            return None;
        }
        self.raw.map(|m| m.name.trim()).filter(|name| !name.is_empty())
    }

    /// Number of records for vinyl, one for everything else.
    pub fn count(&self) -> usize {
        match (self.kind, self.disctitle()) {
            (MediumKind::Vinyl, Some(name)) => vinyl_count(name),
            _ => 1,
        }
    }
}

fn is_sound_carrier(medium: &RawMedium) -> bool {
    let bundle = medium.name.to_lowercase().contains("bundle");
    let discography = medium.item_type.as_deref() == Some("b");
    !bundle && !discography && MediumKind::from(medium.format.as_deref()) != MediumKind::Other
}

/// Pick the first preferred format on offer, else the first medium listed.
pub fn select_medium<'a>(media: &'a [RawMedium], preferred: &[MediumKind]) -> SelectedMedium<'a> {
    let carriers: Vec<&RawMedium> = media.iter().filter(|m| is_sound_carrier(m)).collect();
    let kind_of = |m: &RawMedium| MediumKind::from(m.format.as_deref());

    let chosen = preferred
        .iter()
        .find_map(|want| carriers.iter().copied().find(|&m| kind_of(m) == *want))
        .or_else(|| carriers.first().copied());
    match chosen {
        Some(medium) => SelectedMedium {
            kind: kind_of(medium),
            raw: Some(medium),
        },
        None => SelectedMedium {
            kind: MediumKind::Digital,
            raw: None,
        },
    }
}

pub fn vinyl_count(name: &str) -> usize {
    let Some(caps) = VINYL_COUNT.captures(name) else {
        return 1;
    };
    if let Some(count) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
        return count;
    }
    match caps.get(2).map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("double") => 2,
        Some("triple") => 3,
        _ => 1,
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Release description, medium description and credits.
fn comments(raw: &RawRelease, medium: &SelectedMedium, separator: &str) -> String {
    let medium_desc = medium
        .raw
        .and_then(|m| m.description.as_deref())
        .filter(|d| !d.starts_with(DOWNLOAD_BLURB));
    [raw.description.as_deref(), medium_desc, raw.credits.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(separator)
        .replace('\r', "")
}

/// Every medium description followed by the comments; headers such as
/// "Label:" may sit in any of them.
fn release_text(raw: &RawRelease, comments: &str) -> String {
    let mut parts: Vec<&str> = raw
        .media
        .iter()
        .filter_map(|m| m.description.as_deref())
        .collect();
    parts.push(comments);
    parts.join("\n")
}

fn header(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Seconds in an ISO 8601 duration. Zero counts as unknown.
pub fn parse_duration(raw: &str) -> Option<u64> {
    let caps = DURATION.captures(raw.trim())?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok()).unwrap_or(0);
    let seconds = part(1) * 3600 + part(2) * 60 + part(3);
    (seconds > 0).then_some(seconds)
}

/// Artists credited in "Artist - Title" lines, before any parsing.
fn raw_artists(names: &[String]) -> Vec<String> {
    let artists: Vec<String> = names
        .iter()
        .filter(|name| name.contains(" - "))
        .filter_map(|name| {
            let name = TRACK_ALT.replace(name, "");
            name.split(" - ").next().map(|a| a.trim().to_string())
        })
        .filter(|a| !a.is_empty())
        .collect();
    split_artists(&artists)
}

/// Medium number from a side letter: A/B -> 1, C/D -> 2.
fn medium_of(track_alt: &str) -> Option<usize> {
    let letter = track_alt.chars().next()?.to_ascii_uppercase();
    letter
        .is_ascii_uppercase()
        .then(|| (letter as usize - 'A' as usize) / 2 + 1)
}

/// Fill in medium, medium index and medium total.
fn number_tracks(tracks: &mut [Track]) -> usize {
    let by_side: Option<Vec<usize>> = tracks
        .iter()
        .map(|t| t.track_alt.as_deref().and_then(medium_of))
        .collect();

    match by_side {
        Some(media) if !media.is_empty() => {
            let mut totals: Vec<usize> = Vec::new();
            for (track, medium) in tracks.iter_mut().zip(&media) {
                if totals.len() < *medium {
                    totals.resize(*medium, 0);
                }
                totals[medium - 1] += 1;
                track.medium = *medium;
                track.medium_index = Some(totals[medium - 1]);
            }
            for track in tracks.iter_mut() {
                track.medium_total = totals[track.medium - 1];
            }
            totals.len()
        }
        _ => {
            let total = tracks.len();
            for track in tracks.iter_mut() {
                track.medium = 1;
                track.medium_index = track.index;
                track.medium_total = total;
            }
            1
        }
    }
}

// ============================================================================
// ASSEMBLER
// ============================================================================

/// Builds [`ReleaseMetadata`] from raw descriptors.
pub struct ReleaseAssembler<'a> {
    config: &'a Config,
}

impl<'a> ReleaseAssembler<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Assemble against today's date.
    pub fn assemble(&self, raw: &RawRelease) -> Result<ReleaseMetadata> {
        self.assemble_on(raw, Local::now().date_naive())
    }

    /// Assemble with an explicit current date for the release status.
    pub fn assemble_on(&self, raw: &RawRelease, today: NaiveDate) -> Result<ReleaseMetadata> {
        let config = self.config;
        let singleton = raw.item_type == ItemType::Track;

        // Medium, comments, label and country come first: later stages
        // depend on them.
        let medium = select_medium(&raw.media, &config.preferred_media);
        let disctitle = medium.disctitle();
        let comments = comments(raw, &medium, &config.comments_separator);
        let text = release_text(raw, &comments);
        let label = label::resolve(raw, &text);
        let label_name = label.as_ref().map(|l| l.name.as_str());
        let country = country::resolve(raw.publisher.as_ref().and_then(|p| p.location.as_deref()));

        let raw_tracks = track_source(raw, &medium);
        if raw_tracks.is_empty() {
            let err = ExtractError::MissingData("track listing is empty".to_string());
            warn!(id = %raw.id, %err, "assembling without tracks");
        }

        // Track names: release-wide delimiter and catalog number
        let names: Vec<String> = raw_tracks.iter().map(|t| t.name.clone()).collect();
        let delimiter = splitter::track_delimiter(&names);
        let plain_catalog = CatalogNumberExtractor::new(&config.catalognum);
        let (common_catalognum, names) = splitter::common_catalognum(&names, delimiter, &plain_catalog);
        let names = splitter::strip_track_numbers(names);

        let mut known_artists = vec![raw.artist.clone()];
        if !singleton || names.len() > 1 {
            known_artists.extend(raw_artists(&names));
        }
        let catalog = CatalogNumberExtractor::new(&config.catalognum).with_context(&known_artists, &names);
        let sources = CatalogSources {
            title: &raw.title,
            disctitle: disctitle.unwrap_or(""),
            description: &text,
            label: label_name,
        };
        let catalognum = catalog.extract(&sources)?.or(common_catalognum);

        let split_ctx = SplitContext {
            delimiter,
            label: label_name.unwrap_or(""),
            catalognum: catalognum.as_deref(),
        };
        let mut parsed: Vec<ParsedTrack> = names
            .iter()
            .zip(&raw_tracks)
            .enumerate()
            .map(|(i, (name, raw_track))| {
                let index = raw_track.position.unwrap_or(i + 1);
                let artist = raw_track.artist.as_deref().unwrap_or("");
                splitter::split_track(name, artist, index, &split_ctx, &catalog)
            })
            .collect();

        // Classification works on the parsed artists and titles
        let kind = if singleton {
            ReleaseType::Single
        } else {
            release_type::classify(&ReleaseShape {
                album: &raw.title,
                disctitle,
                tracks: &parsed,
                singleton,
            })
        };
        let compilation = kind == ReleaseType::Compilation;

        let unique_artists = {
            let artists: Vec<&str> = parsed
                .iter()
                .map(|t| t.artist.as_str())
                .filter(|a| !a.is_empty())
                .collect();
            split_artists(&artists)
        };
        let album_artist = self.album_artist(raw, &text, label.as_ref(), &unique_artists, &split_ctx, &catalog);
        splitter::adjust_artists(&mut parsed, &album_artist);

        let album = self.album_name(
            raw,
            &text,
            &AlbumNames {
                album_artist: &album_artist,
                unique_artists: &unique_artists,
                label: label.as_ref(),
                catalognum: catalognum.as_deref(),
                singleton,
                compilation,
            },
            &parsed,
        )?;

        let style = genre::style(
            raw.publisher.as_ref().and_then(|p| p.genre_url.as_deref()),
            config.genre.capitalise,
        );
        let genres = genre::map_genres(&raw.keywords, style.as_deref(), &config.genre);

        let release_date = raw.release_date.as_deref().and_then(release_type::parse_release_date);
        let release_status = release_type::release_status(release_date, today);

        let tracks: Vec<Track> = parsed
            .into_iter()
            .zip(&raw_tracks)
            .map(|(track, raw_track)| Track {
                index: (!singleton).then_some(track.index),
                artist: track.full_artist(),
                title: track.title,
                track_alt: track.track_alt,
                length: raw_track.duration.as_deref().and_then(parse_duration),
                digital_only: track.digital_only,
                catalognum: track.catalognum,
                lyrics: raw_track.lyrics.as_ref().map(|l| l.replace('\r', "")),
                ..Default::default()
            })
            .collect();
        let mut tracks = digital::filter_tracks(tracks, medium.kind, config.include_digital_only_tracks);
        let numbered_media = number_tracks(&mut tracks);

        let mut release = ReleaseMetadata {
            id: raw.id.clone(),
            album,
            album_artist: if compilation {
                config.va_name.clone()
            } else {
                album_artist
            },
            label: label.map(|l| l.name),
            catalognum,
            country: Some(country),
            release_type: kind,
            release_status,
            genre: (!genres.is_empty()).then_some(genres),
            style,
            release_date: release_date.map(ReleaseDate::from),
            comments: (!comments.is_empty()).then_some(comments),
            media: Some(medium.kind.name().to_string()),
            disctitle: disctitle.map(str::to_string),
            mediums: medium.count().max(numbered_media),
            tracks,
        };
        self.apply_exclusions(&mut release);
        debug!(
            id = %release.id,
            album = %release.album,
            release_type = ?release.release_type,
            tracks = release.tracks.len(),
            "release assembled"
        );
        Ok(release)
    }

    /// Artist from an "Artist:" header or the page, unless that is just
    /// the label: then the artist in the title, or the track artists.
    fn album_artist(
        &self,
        raw: &RawRelease,
        text: &str,
        label: Option<&Label>,
        unique_artists: &[String],
        ctx: &SplitContext,
        catalog: &CatalogNumberExtractor,
    ) -> String {
        let artist = header(&ARTIST_HEADER, text).unwrap_or_else(|| raw.artist.trim().to_string());
        let is_label = label.is_some_and(|l| same_name(&l.name, &artist));
        if !is_label && !artist.is_empty() {
            return artist;
        }

        let from_title = splitter::split_track(&raw.title, "", 0, ctx, catalog).artist;
        if !from_title.is_empty() {
            return from_title;
        }
        if !unique_artists.is_empty() {
            return unique_artists.join(", ");
        }
        artist
    }

    fn album_name(
        &self,
        raw: &RawRelease,
        text: &str,
        names: &AlbumNames,
        parsed: &[ParsedTrack],
    ) -> Result<String> {
        if let Some(official) = header(&TITLE_HEADER, text) {
            return Ok(official);
        }

        let label_target = label::cleanup_target(names.label, names.album_artist);
        // a label doubling as the artist stays in the name
        let is_label = |a: &str| names.label.is_some_and(|l| same_name(&l.name, a)) && label_target.is_none();
        let mut artists: Vec<String> = Vec::new();
        for artist in std::iter::once(names.album_artist).chain(names.unique_artists.iter().map(String::as_str)) {
            if !artist.is_empty() && !is_label(artist) && !artists.iter().any(|a| a == artist) {
                artists.push(artist.to_string());
            }
        }

        let ctx = AlbumContext {
            artists: &artists,
            label: label_target,
            catalognum: names.catalognum,
            singleton: names.singleton,
            compilation: names.compilation,
        };
        let album = normalize_album(&raw.title, &ctx)?;
        if !album.is_empty() {
            return Ok(album);
        }

        let fallback = parsed
            .iter()
            .find_map(|t| t.album.clone())
            .or_else(|| names.catalognum.map(str::to_string))
            .unwrap_or_else(|| raw.title.trim().to_string());
        debug!(album = %fallback, "album name empty after cleanup");
        Ok(fallback)
    }

    fn apply_exclusions(&self, release: &mut ReleaseMetadata) {
        let config = self.config;
        if config.excluded_extra_fields.is_empty() {
            return;
        }
        let excluded = |field: &str| config.is_excluded(field);
        if excluded("comments") {
            release.comments = None;
        }
        if excluded("genre") {
            release.genre = None;
        }
        if excluded("style") {
            release.style = None;
        }
        if excluded("catalognum") {
            release.catalognum = None;
            release.tracks.iter_mut().for_each(|t| t.catalognum = None);
        }
        if excluded("country") {
            release.country = None;
        }
        if excluded("label") {
            release.label = None;
        }
        if excluded("lyrics") {
            release.tracks.iter_mut().for_each(|t| t.lyrics = None);
        }
        if excluded("disctitle") {
            release.disctitle = None;
        }
        if excluded("media") {
            release.media = None;
        }
        if excluded("release_date") {
            release.release_date = None;
        }
    }
}

/// Names the album title is cleaned against.
struct AlbumNames<'a> {
    album_artist: &'a str,
    unique_artists: &'a [String],
    label: Option<&'a Label>,
    catalognum: Option<&'a str>,
    singleton: bool,
    compilation: bool,
}

/// Tracks of the chosen medium, else of the release. A lone track page
/// describes itself.
fn track_source(raw: &RawRelease, medium: &SelectedMedium) -> Vec<RawTrack> {
    if let Some(medium) = medium.raw.filter(|m| !m.tracks.is_empty()) {
        return medium.tracks.clone();
    }
    if !raw.tracks.is_empty() {
        return raw.tracks.clone();
    }
    if raw.item_type == ItemType::Track && !raw.title.trim().is_empty() {
        return vec![RawTrack {
            name: raw.title.clone(),
            artist: Some(raw.artist.clone()).filter(|a| !a.trim().is_empty()),
            position: Some(1),
            ..Default::default()
        }];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CountryCode, RawPublisher, ReleaseStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn raw_track(name: &str) -> RawTrack {
        RawTrack {
            name: name.to_string(),
            duration: Some("P00H04M05S".to_string()),
            ..Default::default()
        }
    }

    fn release(title: &str, artist: &str, tracks: &[&str]) -> RawRelease {
        RawRelease {
            id: "https://label.bandcamp.com/album/album".to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            release_date: Some("17 Jul 2020 00:00:00 GMT".to_string()),
            publisher: Some(RawPublisher {
                name: "Label".to_string(),
                location: Some("Berlin, Germany".to_string()),
                genre_url: Some("https://bandcamp.com/tag/techno".to_string()),
            }),
            keywords: vec!["techno".to_string(), "dub techno".to_string(), "berlin".to_string()],
            tracks: tracks.iter().map(|t| raw_track(t)).collect(),
            ..Default::default()
        }
    }

    fn vinyl(name: &str) -> RawMedium {
        RawMedium {
            name: name.to_string(),
            format: Some("VinylFormat".to_string()),
            item_type: Some("p".to_string()),
            ..Default::default()
        }
    }

    fn assemble(raw: &RawRelease, config: &Config) -> ReleaseMetadata {
        ReleaseAssembler::new(config).assemble_on(raw, today()).unwrap()
    }

    #[test]
    fn test_vinyl_count() {
        let cases = [
            ("2 x Vinyl LP", 2),
            ("2LP", 2),
            ("Double Vinyl", 2),
            ("Triple LP", 3),
            ("12\" Vinyl", 1),
            ("Vinyl LP", 1),
        ];
        for (name, expected) in cases {
            assert_eq!(vinyl_count(name), expected, "name: {}", name);
        }
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("P00H04M05S"), Some(245));
        assert_eq!(parse_duration("P01H00M00S"), Some(3600));
        assert_eq!(parse_duration("P00H00M00S"), None);
        assert_eq!(parse_duration("4:05"), None);
    }

    #[test]
    fn test_select_medium() {
        let media = vec![
            RawMedium {
                name: "Digital Album".to_string(),
                format: Some("DigitalFormat".to_string()),
                ..Default::default()
            },
            RawMedium {
                name: "T-Shirt".to_string(),
                format: None,
                ..Default::default()
            },
            vinyl("Vinyl + Tape Bundle"),
            vinyl("2 x Vinyl LP"),
        ];
        let digital = select_medium(&media, &[]);
        assert_eq!(digital.kind, MediumKind::Digital);
        assert_eq!(digital.disctitle(), None);

        let chosen = select_medium(&media, &[MediumKind::Cassette, MediumKind::Vinyl]);
        assert_eq!(chosen.kind, MediumKind::Vinyl);
        assert_eq!(chosen.disctitle(), Some("2 x Vinyl LP"));
        assert_eq!(chosen.count(), 2);

        assert_eq!(select_medium(&[], &[MediumKind::Vinyl]).kind, MediumKind::Digital);
    }

    #[test]
    fn test_assemble_album() {
        let raw = release(
            "Artist - Album EP",
            "Artist",
            &["Artist - First", "Artist - Second (Someone Remix)", "Artist - Third"],
        );
        let release = assemble(&raw, &Config::default());

        assert_eq!(release.album, "Album");
        assert_eq!(release.album_artist, "Artist");
        assert_eq!(release.label.as_deref(), Some("Label"));
        assert_eq!(release.country, Some(CountryCode("DE")));
        assert_eq!(release.release_type, ReleaseType::Ep);
        assert_eq!(release.release_status, ReleaseStatus::Official);
        assert_eq!(release.style.as_deref(), Some("techno"));
        assert_eq!(release.genre, Some(vec!["dub techno".to_string()]));
        assert_eq!(release.release_date, Some(ReleaseDate { year: 2020, month: 7, day: 17 }));
        assert_eq!(release.media.as_deref(), Some("Digital Media"));
        assert_eq!(release.mediums, 1);

        let titles: Vec<&str> = release.tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second (Someone Remix)", "Third"]);
        let first = &release.tracks[0];
        assert_eq!(first.artist, "Artist");
        assert_eq!(first.index, Some(1));
        assert_eq!((first.medium, first.medium_index, first.medium_total), (1, Some(1), 3));
        assert_eq!(first.length, Some(245));
    }

    #[test]
    fn test_label_stripped_from_album() {
        let raw = release("Label | Album", "Someone", &["One", "Two"]);
        let assembled = assemble(&raw, &Config::default());
        assert_eq!(assembled.album, "Album");
        assert_eq!(assembled.tracks[0].artist, "Someone");

        let raw = release("[Label] Album EP", "Someone", &["One", "Two"]);
        assert_eq!(assemble(&raw, &Config::default()).album, "Album");
    }

    #[test]
    fn test_release_text_headers() {
        let mut raw = release("LBL001 - Some Title", "Label", &["One", "Two", "Three"]);
        raw.description = Some("Title: The Real Name\r\nArtist: Someone Else\nMastered somewhere".to_string());
        let release = assemble(&raw, &Config::default());

        assert_eq!(release.album, "The Real Name");
        assert_eq!(release.album_artist, "Someone Else");
    }

    #[test]
    fn test_pipe_delimited_tracks() {
        let raw = release(
            "Album",
            "Label",
            &["A1 | ArtistX | TitleY", "A2 | ArtistZ | Other", "B1 | ArtistX | Last"],
        );
        let release = assemble(&raw, &Config::default());
        let first = &release.tracks[0];
        assert_eq!(first.track_alt.as_deref(), Some("A1"));
        assert_eq!(first.artist, "ArtistX");
        assert_eq!(first.title, "TitleY");
        assert_eq!(release.album_artist, "ArtistX, ArtistZ");

        let sides: Vec<(usize, Option<usize>, usize)> = release
            .tracks
            .iter()
            .map(|t| (t.medium, t.medium_index, t.medium_total))
            .collect();
        assert_eq!(sides, vec![(1, Some(1), 3), (1, Some(2), 3), (1, Some(3), 3)]);
    }

    #[test]
    fn test_sides_map_to_media() {
        let raw = release("Album", "Artist", &["A1 - One", "B1 - Two", "C1 - Three", "D1 - Four"]);
        let release = assemble(&raw, &Config::default());
        let media: Vec<(usize, Option<usize>)> = release.tracks.iter().map(|t| (t.medium, t.medium_index)).collect();
        assert_eq!(media, vec![(1, Some(1)), (1, Some(2)), (2, Some(1)), (2, Some(2))]);
        assert_eq!(release.mediums, 2);
    }

    #[test]
    fn test_compilation() {
        let raw = release(
            "Summer Sampler",
            "Label",
            &["A - One", "B - Two", "C - Three", "D - Four", "E - Five"],
        );
        let release = assemble(&raw, &Config::default());
        assert_eq!(release.release_type, ReleaseType::Compilation);
        assert_eq!(release.album_artist, "Various Artists");
        assert_eq!(release.album, "Summer Sampler");
    }

    #[test]
    fn test_promotional_release() {
        let mut raw = release("Album", "Artist", &["One", "Two"]);
        raw.release_date = Some("02 May 2024 00:00:00 GMT".to_string());
        assert_eq!(assemble(&raw, &Config::default()).release_status, ReleaseStatus::Promotional);

        raw.release_date = Some("01 May 2024 00:00:00 GMT".to_string());
        assert_eq!(assemble(&raw, &Config::default()).release_status, ReleaseStatus::Official);
    }

    #[test]
    fn test_catalognum_and_comments() {
        let mut raw = release("Album", "Artist", &["One", "Two"]);
        raw.description = Some("Great record.\r\nCat. no: ABC001".to_string());
        raw.credits = Some("Mastered by Someone".to_string());
        let release = assemble(&raw, &Config::default());
        assert_eq!(release.catalognum.as_deref(), Some("ABC001"));
        assert_eq!(release.tracks[0].catalognum.as_deref(), Some("ABC001"));
        assert_eq!(
            release.comments.as_deref(),
            Some("Great record.\nCat. no: ABC001\n---\nMastered by Someone")
        );
    }

    #[test]
    fn test_digital_only_tracks_on_vinyl() {
        let mut raw = release("Album", "Artist", &["One", "Two", "Three (Digital Bonus)"]);
        raw.media = vec![vinyl("Vinyl LP")];
        let mut config = Config {
            preferred_media: vec![MediumKind::Vinyl],
            ..Default::default()
        };

        let kept = assemble(&raw, &config);
        assert_eq!(kept.tracks.len(), 3);
        assert!(kept.tracks[2].digital_only);
        assert_eq!(kept.tracks[2].title, "Three");

        config.include_digital_only_tracks = false;
        let filtered = assemble(&raw, &config);
        assert_eq!(filtered.tracks.len(), 2);
        assert_eq!(filtered.tracks[1].medium_total, 2);
        assert_eq!(filtered.disctitle.as_deref(), Some("Vinyl LP"));
    }

    #[test]
    fn test_singleton() {
        let raw = RawRelease {
            item_type: ItemType::Track,
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            ..Default::default()
        };
        let release = assemble(&raw, &Config::default());
        assert_eq!(release.release_type, ReleaseType::Single);
        assert_eq!(release.tracks.len(), 1);
        assert_eq!(release.tracks[0].index, None);
        assert_eq!(release.tracks[0].artist, "Artist");
        assert_eq!(release.tracks[0].title, "Song");
        assert_eq!(release.country, Some(CountryCode::UNKNOWN));
    }

    #[test]
    fn test_missing_tracks_is_not_fatal() {
        let raw = release("Album", "Artist", &[]);
        let release = assemble(&raw, &Config::default());
        assert!(release.tracks.is_empty());
        assert_eq!(release.album, "Album");
    }

    #[test]
    fn test_excluded_fields() {
        let mut raw = release("Album", "Artist", &["One", "Two"]);
        raw.description = Some("Cat. no: ABC001".to_string());
        let config = Config {
            excluded_extra_fields: vec!["comments".to_string(), "catalognum".to_string(), "genre".to_string()],
            ..Default::default()
        };
        let release = assemble(&raw, &config);
        assert_eq!(release.comments, None);
        assert_eq!(release.catalognum, None);
        assert_eq!(release.tracks[0].catalognum, None);
        assert_eq!(release.genre, None);
        assert_eq!(release.style.as_deref(), Some("techno"));
    }
}
