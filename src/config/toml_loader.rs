//! TOML configuration file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Deserialize the TOML file at `path`.
///
/// Returns `Ok(None)` when the file does not exist, so callers can fall back
/// to built-in defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, and
/// [`ConfigError::Parse`] if it is not valid TOML or does not match `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::test_helpers::write_temp_toml;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        #[serde(default)]
        tags: Vec<String>,
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<Sample> = load_config(&dir.path().join("nope.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn parses_present_file() {
        let (_dir, path) = write_temp_toml("name = \"kit\"\ntags = [\"a\"]\n");
        let loaded: Sample = load_config(&path).unwrap().unwrap();
        assert_eq!(loaded.name, "kit");
        assert_eq!(loaded.tags, ["a"]);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let (_dir, path) = write_temp_toml("name = ");
        let err = load_config::<Sample>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Invalid TOML in"));
    }

    #[test]
    fn schema_mismatch_is_parse_error() {
        let (_dir, path) = write_temp_toml("tags = []\n");
        let err = load_config::<Sample>(&path).unwrap_err();
        assert!(err.to_string().contains("name"));
    }
}
