//! Release metadata extraction library - shared modules for the extractor binary.

pub mod album;
pub mod assemble;
pub mod catalognum;
pub mod config;
pub mod country;
pub mod digital;
pub mod error;
pub mod genre;
pub mod input;
pub mod label;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod release_type;
pub mod safety;
pub mod splitter;

pub use assemble::ReleaseAssembler;
pub use config::Config;
pub use error::{ExtractError, Result};
pub use models::{RawRelease, ReleaseMetadata};
