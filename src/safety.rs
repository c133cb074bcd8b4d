//! Safety checks for the output file.
//!
//! The extractor overwrites its output, so the output path is validated
//! before anything is written: it must be a JSON file and must not be one
//! of the inputs.

use anyhow::{bail, Result};
use std::path::Path;

/// Validates that an output path is safe to overwrite.
///
/// Checks:
/// - Output must have a `.json` extension
/// - Output cannot be the same as any of the input paths
pub fn validate_output_path(output: &Path, input_paths: &[&Path]) -> Result<()> {
    let is_json = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        bail!(
            "Safety check failed: output file '{}' must have a .json extension",
            output.display()
        );
    }

    let resolved_output = output.canonicalize().ok();
    for input in input_paths {
        let same_file = output == *input
            || resolved_output
                .as_ref()
                .is_some_and(|out| input.canonicalize().ok().as_ref() == Some(out));
        if same_file {
            bail!(
                "Safety check failed: output '{}' cannot be the same as input '{}'",
                output.display(),
                input.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_output() {
        let output = PathBuf::from("/tmp/releases-extracted.json");
        let input = PathBuf::from("/data/releases.json");
        assert!(validate_output_path(&output, &[&input]).is_ok());
    }

    #[test]
    fn test_missing_json_extension() {
        let output = PathBuf::from("/tmp/output.sqlite3");
        let input = PathBuf::from("/data/releases.json");
        let result = validate_output_path(&output, &[&input]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must have a .json extension"));
    }

    #[test]
    fn test_output_equals_input() {
        let path = PathBuf::from("/data/releases.json");
        let result = validate_output_path(&path, &[&path]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("cannot be the same as input"));
    }
}
