//! Extraction configuration.
//!
//! One typed structure with documented defaults, loaded from TOML and
//! validated once before any release is processed.

use crate::error::{ExtractError, Result};
use crate::models::MediumKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output fields that may be blanked through `excluded_extra_fields`.
pub const EXTRA_FIELDS: &[&str] = &[
    "comments",
    "genre",
    "style",
    "catalognum",
    "country",
    "label",
    "lyrics",
    "disctitle",
    "media",
    "release_date",
];

// ============================================================================
// Genre
// ============================================================================

/// How strictly keywords are matched against the genre vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenreMode {
    /// Only keywords that are canonical genres
    Classical,
    /// Also keywords made up entirely of canonical words
    #[default]
    Progressive,
    /// Also keywords whose last word is canonical
    Psychedelic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenreConfig {
    pub capitalise: bool,
    /// 0 = unlimited
    pub maximum: usize,
    pub always_include: Vec<String>,
    pub mode: GenreMode,
}

impl Default for GenreConfig {
    fn default() -> Self {
        Self {
            capitalise: false,
            maximum: 0,
            always_include: Vec::new(),
            mode: GenreMode::Progressive,
        }
    }
}

// ============================================================================
// Catalog numbers
// ============================================================================

/// Text scopes searched for a catalog number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Title,
    Disctitle,
    Description,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Scopes in the order they are searched. The first accepted match wins.
    pub precedence: Vec<CatalogSource>,
    /// Prefixes whose catalog numbers may carry a single digit ("RIV1").
    pub short_forms: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            precedence: vec![
                CatalogSource::Title,
                CatalogSource::Disctitle,
                CatalogSource::Description,
            ],
            short_forms: vec!["RIV".to_string(), "OBS.CUR".to_string()],
        }
    }
}

// ============================================================================
// Top level
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub genre: GenreConfig,
    pub comments_separator: String,
    pub excluded_extra_fields: Vec<String>,
    pub include_digital_only_tracks: bool,
    /// Formats to pick the target medium from, in order of preference
    pub preferred_media: Vec<MediumKind>,
    pub va_name: String,
    pub catalognum: CatalogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            genre: GenreConfig::default(),
            comments_separator: "\n---\n".to_string(),
            excluded_extra_fields: Vec::new(),
            include_digital_only_tracks: true,
            preferred_media: Vec::new(),
            va_name: "Various Artists".to_string(),
            catalognum: CatalogConfig::default(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let genre = &self.genre;
        if genre.maximum > 0 && genre.always_include.len() > genre.maximum {
            return Err(ExtractError::InvalidConfig(format!(
                "genre.always_include has {} terms but genre.maximum is {}",
                genre.always_include.len(),
                genre.maximum
            )));
        }

        let precedence = &self.catalognum.precedence;
        if precedence.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "catalognum.precedence must name at least one source".to_string(),
            ));
        }
        for (i, source) in precedence.iter().enumerate() {
            if precedence[..i].contains(source) {
                return Err(ExtractError::InvalidConfig(format!(
                    "catalognum.precedence repeats {:?}",
                    source
                )));
            }
        }

        for field in &self.excluded_extra_fields {
            if !EXTRA_FIELDS.contains(&field.as_str()) {
                return Err(ExtractError::InvalidConfig(format!(
                    "unknown field in excluded_extra_fields: '{}'",
                    field
                )));
            }
        }
        Ok(())
    }

    pub fn is_excluded(&self, field: &str) -> bool {
        self.excluded_extra_fields.iter().any(|f| f == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.comments_separator, "\n---\n");
        assert!(config.include_digital_only_tracks);
        assert_eq!(config.genre.mode, GenreMode::Progressive);
        assert_eq!(config.genre.maximum, 0);
        assert_eq!(
            config.catalognum.precedence,
            vec![CatalogSource::Title, CatalogSource::Disctitle, CatalogSource::Description]
        );
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml_str(
            r#"
            include_digital_only_tracks = false
            preferred_media = ["vinyl", "cd"]

            [genre]
            capitalise = true
            maximum = 3
            always_include = ["Electronic"]
            mode = "psychedelic"
            "#,
        )
        .unwrap();
        assert!(!config.include_digital_only_tracks);
        assert_eq!(config.preferred_media, vec![MediumKind::Vinyl, MediumKind::Cd]);
        assert!(config.genre.capitalise);
        assert_eq!(config.genre.mode, GenreMode::Psychedelic);
        assert_eq!(config.va_name, "Various Artists");
    }

    #[test]
    fn test_too_many_forced_genres() {
        let result = Config::from_toml_str(
            r#"
            [genre]
            maximum = 1
            always_include = ["techno", "house"]
            "#,
        );
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_excluded_field() {
        let config = Config {
            excluded_extra_fields: vec!["bpm".to_string()],
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn test_repeated_precedence() {
        let mut config = Config::default();
        config.catalognum.precedence = vec![CatalogSource::Title, CatalogSource::Title];
        assert!(config.validate().is_err());
        config.catalognum.precedence.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            Config::from_toml_str("colour = true"),
            Err(ExtractError::Toml(_))
        ));
    }
}
