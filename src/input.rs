//! Reading raw release descriptors.
//!
//! An input document holds either one descriptor or an array of them.

use crate::error::Result;
use crate::models::RawRelease;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Many(Vec<RawRelease>),
    One(Box<RawRelease>),
}

/// Parse a JSON document into descriptors.
pub fn parse_releases(content: &str) -> Result<Vec<RawRelease>> {
    let releases = match serde_json::from_str::<Document>(content)? {
        Document::Many(releases) => releases,
        Document::One(release) => vec![*release],
    };
    Ok(releases)
}

pub fn read_releases(path: &Path) -> Result<Vec<RawRelease>> {
    let content = fs::read_to_string(path)?;
    parse_releases(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    #[test]
    fn test_parse_one_or_many() {
        let one = parse_releases(r#"{"id": "a", "title": "Album"}"#).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].title, "Album");

        let many = parse_releases(r#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
        let ids: Vec<&str> = many.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_releases("not json"), Err(ExtractError::Json(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_releases(Path::new("/nonexistent/releases.json"));
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }
}
