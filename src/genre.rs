//! Genre and style mapping.
//!
//! Keyword tags are free text. A keyword becomes a genre when it passes the
//! configured [`GenreMode`] against the canonical vocabulary below; generic
//! genres that are part of a more specific one are then dropped ("house"
//! goes when "garage house" is there).

use crate::config::{GenreConfig, GenreMode};
use crate::normalize::capitalize;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

/// Badly delimited keywords: "techno. house", "#techno #house", "dub - reggae"
static KEYWORD_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.] | #| - ").unwrap());

/// Canonical genre vocabulary, lowercase.
const GENRES: &[&str] = &[
    "abstract", "acid", "acid house", "acid jazz", "acid techno", "acoustic", "afro house",
    "afrobeat", "afrobeats", "alternative", "alternative rock", "ambient", "ambient dub",
    "ambient techno", "americana", "anarcho-punk", "art pop", "art rock", "avant-garde",
    "balearic", "baroque", "bass", "bass house", "bassline", "beats", "bebop", "big beat",
    "black metal", "bluegrass", "blues", "bossa nova", "breakbeat", "breakcore", "breaks",
    "broken beat", "chamber pop", "chicago house", "chillout", "chillwave", "chiptune",
    "classical", "club", "coldwave", "contemporary", "country", "cumbia", "dance",
    "dancehall", "dark ambient", "dark folk", "dark techno", "darkwave", "death metal",
    "deep house", "deep techno", "detroit techno", "disco", "doom metal", "downtempo",
    "dream pop", "drone", "drum and bass", "dub", "dub techno", "dubstep", "ebm",
    "electro", "electro house", "electroacoustic", "electronic", "electronica",
    "electropop", "emo", "experimental", "field recording", "flamenco", "folk",
    "folk rock", "footwork", "free improvisation", "free jazz", "funk", "fusion",
    "future garage", "futurepop", "gabber", "garage", "garage house", "garage rock",
    "ghettotech", "glitch", "gospel", "goth", "gothic rock", "grime", "grindcore",
    "grunge", "hard house", "hard techno", "hardcore", "hardcore punk", "hardstyle",
    "heavy metal", "hip hop", "house", "idm", "indie", "indie folk", "indie pop",
    "indie rock", "industrial", "industrial techno", "italo disco", "jazz", "jazz fusion",
    "jungle", "krautrock", "latin", "leftfield", "lo-fi", "lounge", "lovers rock",
    "math rock", "metal", "microhouse", "minimal", "minimal techno", "minimal wave",
    "modern classical", "musique concrete", "neo-psychedelia", "neoclassical",
    "new age", "new wave", "noise", "noise rock", "nu disco", "nu jazz", "pop",
    "pop punk", "post-hardcore", "post-punk", "post-rock", "power electronics",
    "progressive", "progressive house", "progressive rock", "progressive trance",
    "psychedelic", "psychedelic rock", "psytrance", "punk", "r&b", "rap", "reggae",
    "rock", "rocksteady", "roots reggae", "salsa", "shoegaze", "ska", "slowcore",
    "sludge metal", "soul", "sound art", "soundtrack", "southern soul", "space rock",
    "speed garage", "spoken word", "stoner rock", "surf rock", "synth-pop", "synthpop",
    "synthwave", "tech house", "techno", "thrash metal", "trance", "trap", "trip hop",
    "uk funky", "uk garage", "vaporwave", "witch house", "world", "zouk",
];

static VOCABULARY: Lazy<FxHashSet<&'static str>> = Lazy::new(|| GENRES.iter().copied().collect());

fn is_canonical(word: &str) -> bool {
    VOCABULARY.contains(word)
}

/// Whether a keyword counts as a genre under `mode`.
pub fn valid_for_mode(keyword: &str, mode: GenreMode) -> bool {
    if is_canonical(keyword) {
        return true;
    }
    let mut words = keyword.split(' ').map(str::trim).filter(|w| !w.is_empty()).peekable();
    if words.peek().is_none() {
        return false;
    }
    match mode {
        GenreMode::Classical => false,
        GenreMode::Progressive => words.all(is_canonical),
        GenreMode::Psychedelic => {
            let words: Vec<&str> = words.collect();
            words.iter().copied().all(is_canonical) || words.last().copied().is_some_and(is_canonical)
        }
    }
}

/// Style from the publisher's genre tag URL: ".../tag/folk" -> "folk"
pub fn style(genre_url: Option<&str>, capitalise: bool) -> Option<String> {
    let tag = genre_url?.trim().trim_end_matches('/').rsplit('/').next()?;
    if tag.is_empty() {
        return None;
    }
    let tag = tag.replace('-', " ");
    Some(if capitalise { capitalize(&tag) } else { tag })
}

/// Map keyword tags to genres.
///
/// The style keyword is skipped. Forced terms come first and survive the
/// `maximum` cut; the rest keep their keyword order.
pub fn map_genres<S: AsRef<str>>(keywords: &[S], style: Option<&str>, config: &GenreConfig) -> Vec<String> {
    let style = style.map(str::to_lowercase);
    let mut forced: Vec<String> = Vec::new();
    for term in &config.always_include {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !forced.contains(&term) {
            forced.push(term);
        }
    }

    let mut matched: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_ref().to_lowercase();
        if style.as_deref() == Some(keyword.as_str()) {
            continue;
        }
        for part in KEYWORD_SPLIT.split(&keyword) {
            let kw = part.replace(['.', '#'], "").replace('&', "and");
            let kw = kw.trim();
            if kw.is_empty() || forced.iter().any(|f| f == kw) || matched.iter().any(|m| m == kw) {
                continue;
            }
            if valid_for_mode(kw, config.mode) {
                matched.push(kw.to_string());
            }
        }
    }

    let specific: Vec<String> = matched
        .iter()
        .filter(|genre| !is_part_of_another(genre, &matched))
        .cloned()
        .collect();

    let kept = config.maximum.max(forced.len());
    let mut genres = forced;
    genres.extend(specific);
    if config.maximum > 0 {
        genres.truncate(kept);
    }
    if config.capitalise {
        genres = genres.iter().map(|g| capitalize(g)).collect();
    }
    genres
}

/// "house" within "garage house"; "darkfolk" within "dark folk" once spaces
/// are removed from the others.
fn is_part_of_another(genre: &str, all: &[String]) -> bool {
    all.iter().filter(|other| other.as_str() != genre).any(|other| {
        other.contains(genre) || other.replace(' ', "").contains(genre)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: GenreMode) -> GenreConfig {
        GenreConfig {
            mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_modes() {
        // keyword, classical, progressive, psychedelic
        let cases = [
            ("house", true, true, true),
            ("tech house", true, true, true),
            ("techno house", false, true, true),
            ("crazy techno", false, false, true),
            ("crazy music", false, false, false),
        ];
        for (kw, classical, progressive, psychedelic) in cases {
            assert_eq!(valid_for_mode(kw, GenreMode::Classical), classical, "classical: {}", kw);
            assert_eq!(valid_for_mode(kw, GenreMode::Progressive), progressive, "progressive: {}", kw);
            assert_eq!(valid_for_mode(kw, GenreMode::Psychedelic), psychedelic, "psychedelic: {}", kw);
        }
    }

    #[test]
    fn test_generic_genres_dropped() {
        let genres = map_genres(&["house", "garage house", "glitch"], None, &config(GenreMode::Classical));
        assert_eq!(genres, vec!["garage house", "glitch"]);

        let genres = map_genres(&["darkfolk", "dark folk"], None, &config(GenreMode::Psychedelic));
        assert_eq!(genres, vec!["dark folk"]);
    }

    #[test]
    fn test_keyword_cleanup() {
        let genres = map_genres(&["Techno. Dub", "#acid", "drum & bass"], None, &config(GenreMode::Classical));
        assert_eq!(genres, vec!["techno", "dub", "acid", "drum and bass"]);
    }

    #[test]
    fn test_capitalise_and_maximum() {
        let keywords = ["paris", "dubstep", "folk", "House", "grime", "Trance"];
        let style = style(Some("https://bandcamp.com/tag/dubstep"), true);
        assert_eq!(style.as_deref(), Some("Dubstep"));

        let cases = [
            (true, 0, vec!["Folk", "House", "Grime", "Trance"]),
            (true, 3, vec!["Folk", "House", "Grime"]),
            (false, 2, vec!["folk", "house"]),
        ];
        for (capitalise, maximum, expected) in cases {
            let config = GenreConfig {
                capitalise,
                maximum,
                ..Default::default()
            };
            assert_eq!(map_genres(&keywords, style.as_deref(), &config), expected);
        }
    }

    #[test]
    fn test_forced_terms() {
        let config = GenreConfig {
            maximum: 2,
            always_include: vec!["Field Recording".to_string()],
            ..Default::default()
        };
        let genres = map_genres(&["techno", "house", "ambient", "field recording"], None, &config);
        assert_eq!(genres, vec!["field recording", "techno"]);

        let genres = map_genres::<&str>(&[], None, &config);
        assert_eq!(genres, vec!["field recording"]);
    }

    #[test]
    fn test_forced_terms_deduplicated() {
        let config = GenreConfig {
            maximum: 3,
            always_include: vec!["Techno".to_string(), "techno".to_string(), " TECHNO ".to_string()],
            ..Default::default()
        };
        let genres = map_genres(&["techno", "house", "ambient"], None, &config);
        assert_eq!(genres, vec!["techno", "house", "ambient"]);
    }

    #[test]
    fn test_style() {
        assert_eq!(style(Some("bandcamp.com/tag/folk"), false).as_deref(), Some("folk"));
        assert_eq!(style(Some("https://bandcamp.com/tag/deep-house"), true).as_deref(), Some("Deep house"));
        assert_eq!(style(Some(""), false), None);
        assert_eq!(style(None, false), None);
    }
}
