//! # Configuration
//!
//! Settings are managed by [`confique`], layered in priority order:
//! 1. **Environment variables**: `FLASHCARDS_DATABASE_PATH`, `FLASHCARDS_SEED_SAMPLE_CARDS`,
//!    `FLASHCARDS_SESSION_SEED`.
//! 2. **Config file**: `flashcards.toml` in the working directory, or the file named by
//!    `FLASHCARDS_CONFIG`. A missing file is not an error.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `database_path` | `flashcards.sqlite3` | SQLite file holding the cards |
//! | `seed_sample_cards` | `true` | Import the sample deck when the store is empty |
//! | `session_seed` | none | Fixed shuffle seed for reproducible study sessions |

use confique::Config;
use log::info;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "flashcards.toml";
/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "FLASHCARDS_CONFIG";

#[derive(Config, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[config(default = "flashcards.sqlite3", env = "FLASHCARDS_DATABASE_PATH")]
    pub database_path: PathBuf,

    #[config(default = true, env = "FLASHCARDS_SEED_SAMPLE_CARDS")]
    pub seed_sample_cards: bool,

    #[config(env = "FLASHCARDS_SESSION_SEED")]
    pub session_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("flashcards.sqlite3"),
            seed_sample_cards: true,
            session_seed: None,
        }
    }
}

impl AppConfig {
    /// Loads environment overrides on top of the file at `path` and the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, confique::Error> {
        let path = path.as_ref();
        let config = Self::builder().env().file(path).load()?;
        info!("Configuration loaded (file: '{}')", path.display());
        Ok(config)
    }

    /// The config file location: `$FLASHCARDS_CONFIG`, else `flashcards.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn load_file(path: &Path) -> Result<AppConfig, confique::Error> {
        AppConfig::builder().file(path).load()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashcards.toml");
        fs::write(&path, "session_seed = 42\nseed_sample_cards = false\n").unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.session_seed, Some(42));
        assert!(!config.seed_sample_cards);
        assert_eq!(config.database_path, PathBuf::from("flashcards.sqlite3"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashcards.toml");
        fs::write(&path, "database_path = [not toml").unwrap();

        assert!(load_file(&path).is_err());
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashcards.toml");
        fs::write(&path, "seed_sample_cards = \"maybe\"\n").unwrap();

        assert!(load_file(&path).is_err());
    }
}
