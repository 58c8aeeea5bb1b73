//! Configuration file support.
//!
//! # Configuration File Format
//!
//! ```toml
//! [feed]
//! base_url = "https://arxiv.org"
//! categories = ["astro-ph.EP", "astro-ph.SR"]
//! show = 200
//! timeout_seconds = 30
//!
//! [matching]
//! duplicate_policy = "keep_first"   # or "merge_authors"
//!
//! [display]
//! width = 80
//! color = true
//!
//! [logging]
//! level = "info"
//! ```

use std::path::Path;

use super::Config;

/// Read a TOML configuration file without environment overrides
pub fn read_config_file(path: &Path) -> Result<Config, ConfigFileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
}

/// Write a configuration as TOML, creating parent directories
pub fn write_config_file(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }
    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DuplicatePolicy;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.feed.categories = vec!["astro-ph".to_string()];
        config.matching.duplicate_policy = DuplicatePolicy::MergeAuthors;
        config.display.width = 100;

        write_config_file(&config, &path).unwrap();

        let loaded = read_config_file(&path).unwrap();
        assert_eq!(loaded.feed.categories, vec!["astro-ph"]);
        assert_eq!(
            loaded.matching.duplicate_policy,
            DuplicatePolicy::MergeAuthors
        );
        assert_eq!(loaded.display.width, 100);
    }

    #[test]
    fn test_config_file_nonexistent() {
        let path = PathBuf::from("/nonexistent/config.toml");
        assert!(matches!(
            read_config_file(&path),
            Err(ConfigFileError::Io(_))
        ));
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");

        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(matches!(
            read_config_file(&path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.feed.show, 200);
    }
}
