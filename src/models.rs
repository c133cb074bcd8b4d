//! Core data models for release extraction.
//!
//! Raw descriptors come in from the harvester, `ReleaseMetadata` goes out to
//! the cataloging host. Everything in between lives in the component modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Raw input
// ============================================================================

/// Whether the storefront page describes a whole release or a lone track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Album,
    Track,
}

/// Raw release descriptor as harvested from a product page. Never mutated.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRelease {
    pub id: String,                      // Page URL
    pub item_type: ItemType,
    pub title: String,                   // Release (or track) title as entered
    pub artist: String,                  // Official artist, often the label's name
    pub description: Option<String>,
    pub credits: Option<String>,
    pub release_date: Option<String>,    // "17 Jul 2020 00:00:00 GMT"
    pub label: Option<String>,           // Structured record label of the first medium
    pub publisher: Option<RawPublisher>,
    pub keywords: Vec<String>,           // Free-text tags
    pub media: Vec<RawMedium>,
    pub tracks: Vec<RawTrack>,
}

/// The account that publishes the page, usually the label or the artist.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPublisher {
    pub name: String,
    pub location: Option<String>,        // "Berlin, Germany"
    pub genre_url: Option<String>,       // "https://bandcamp.com/tag/techno"
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMedium {
    pub name: String,                    // "2 x Vinyl LP", "Compact Disc (CD)"
    pub format: Option<String>,          // "VinylFormat", "CDFormat", ...
    pub item_type: Option<String>,       // "a" album, "b" discography, "p" package
    pub description: Option<String>,
    /// Empty when the medium shares the release-level track list
    pub tracks: Vec<RawTrack>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTrack {
    pub name: String,
    pub artist: Option<String>,          // Per-track artist when the page has one
    pub duration: Option<String>,        // "P00H04M05S"
    pub position: Option<usize>,         // 1-based
    pub lyrics: Option<String>,
}

// ============================================================================
// Media
// ============================================================================

/// Physical or digital release format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediumKind {
    Vinyl,
    Cd,
    Cassette,
    Dvd,
    Digital,
    /// Merch and anything else that is not a sound carrier
    Other,
}

impl MediumKind {
    /// Human-readable medium name used in the output record.
    pub fn name(self) -> &'static str {
        match self {
            MediumKind::Vinyl => "Vinyl",
            MediumKind::Cd => "CD",
            MediumKind::Cassette => "Cassette",
            MediumKind::Dvd => "DVD",
            MediumKind::Digital => "Digital Media",
            MediumKind::Other => "Other",
        }
    }

    pub fn is_digital(self) -> bool {
        self == MediumKind::Digital
    }
}

impl From<Option<&str>> for MediumKind {
    fn from(s: Option<&str>) -> Self {
        match s {
            Some("VinylFormat") => MediumKind::Vinyl,
            Some("CDFormat") => MediumKind::Cd,
            Some("CassetteFormat") => MediumKind::Cassette,
            Some("DVDFormat") => MediumKind::Dvd,
            Some("DigitalFormat") | Some("USB Flash Drive") => MediumKind::Digital,
            _ => MediumKind::Other,
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Single,
    Ep,
    Album,
    Compilation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseStatus {
    Official,
    Promotional,
}

/// ISO 3166-1 alpha-2 code, or `CountryCode::UNKNOWN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CountryCode(pub &'static str);

impl CountryCode {
    /// "Worldwide", the sentinel for locations that map to no country
    pub const UNKNOWN: CountryCode = CountryCode("XW");

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

// ============================================================================
// Output
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReleaseDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// One track of the output record. Immutable once assembled.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Track {
    pub index: Option<usize>,            // None for singletons
    pub medium: usize,
    pub medium_index: Option<usize>,
    pub medium_total: usize,
    pub track_alt: Option<String>,       // "A1", "B2"
    pub artist: String,
    pub title: String,
    pub length: Option<u64>,             // Seconds
    pub digital_only: bool,
    pub catalognum: Option<String>,
    pub lyrics: Option<String>,
}

/// Canonical metadata for one release.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReleaseMetadata {
    pub id: String,
    pub album: String,
    pub album_artist: String,
    pub label: Option<String>,
    pub catalognum: Option<String>,
    pub country: Option<CountryCode>,
    pub release_type: ReleaseType,
    pub release_status: ReleaseStatus,
    pub genre: Option<Vec<String>>,
    pub style: Option<String>,
    pub release_date: Option<ReleaseDate>,
    pub comments: Option<String>,
    pub media: Option<String>,
    pub disctitle: Option<String>,
    pub mediums: usize,
    pub tracks: Vec<Track>,
}
