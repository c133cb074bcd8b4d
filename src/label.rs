//! Publishing label resolution.

use crate::error::ExtractError;
use crate::models::RawRelease;
use crate::normalize::same_name;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// "Label: Some Records" inside a description
static LABEL_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Label:([^/,\n]+)").unwrap());

/// Where the label name came from, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelSource {
    Description,
    Structured,
    Publisher,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub source: LabelSource,
}

/// Pick the label: a "Label:" line in the release text, then the
/// structured record label, then the publishing account.
pub fn resolve(raw: &RawRelease, comments: &str) -> Option<Label> {
    match lookup(raw, comments) {
        Ok(label) => {
            debug!(label = %label.name, source = ?label.source, "label resolved");
            Some(label)
        }
        Err(err) => {
            debug!(%err, "no label");
            None
        }
    }
}

fn lookup(raw: &RawRelease, comments: &str) -> Result<Label, ExtractError> {
    let from_text = LABEL_HEADER
        .captures(comments)
        .map(|caps| caps[1].trim_matches([' ', '\'', '"']).to_string())
        .filter(|l| !l.is_empty());
    if let Some(name) = from_text {
        return Ok(Label { name, source: LabelSource::Description });
    }

    let structured = raw.label.as_deref().map(str::trim).filter(|l| !l.is_empty());
    if let Some(name) = structured {
        return Ok(Label { name: name.to_string(), source: LabelSource::Structured });
    }

    let publisher = raw.publisher.as_ref().map(|p| p.name.trim()).filter(|l| !l.is_empty());
    if let Some(name) = publisher {
        return Ok(Label { name: name.to_string(), source: LabelSource::Publisher });
    }
    Err(ExtractError::MissingData("label and publisher are empty".to_string()))
}

/// The label to remove from the album name, if any. A label that is also
/// the album artist is left in place.
pub fn cleanup_target<'a>(label: Option<&'a Label>, album_artist: &str) -> Option<&'a str> {
    let label = label?;
    if same_name(&label.name, album_artist) {
        return None;
    }
    Some(label.name.as_str())
}
