use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::view::DisplayMode;

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Location of the file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written.
    #[error("Failed to write config file {path}: {source}")]
    Write {
        /// Location of the file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Presentation settings for the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// How long the loading screen is shown after mount, in milliseconds.
    loading_delay_ms: u64,

    /// Card layout used when none is requested explicitly.
    pub display_mode: DisplayMode,

    /// Directory that image and logo paths are resolved against.
    pub assets_root: PathBuf,

    /// Image shown in banner mode when a listing's image cannot be loaded.
    pub placeholder_image: String,

    /// Number of characters of the description shown inline in avatar mode.
    description_preview: usize,

    /// Delay between consecutive cards entering the grid, in milliseconds.
    ///
    /// Zero disables the staggered entrance.
    stagger_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loading_delay_ms: default_loading_delay_ms(),
            display_mode: DisplayMode::default(),
            assets_root: default_assets_root(),
            placeholder_image: default_placeholder_image(),
            description_preview: default_description_preview(),
            stagger_ms: default_stagger_ms(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the configuration if the file exists, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, content).map_err(write_error)
    }

    /// Delay before the loading gate opens.
    #[must_use]
    pub const fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }

    /// Sets the loading delay.
    pub const fn set_loading_delay_ms(&mut self, value: u64) {
        self.loading_delay_ms = value;
    }

    /// Delay between consecutive cards entering the grid.
    #[must_use]
    pub const fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    /// Sets the stagger delay.
    pub const fn set_stagger_ms(&mut self, value: u64) {
        self.stagger_ms = value;
    }

    /// Characters of description shown inline in avatar mode.
    #[must_use]
    pub const fn description_preview(&self) -> usize {
        self.description_preview
    }

    /// Sets the inline description length. Values below one are raised to one.
    pub fn set_description_preview(&mut self, value: usize) {
        self.description_preview = value.max(1);
    }
}

const fn default_loading_delay_ms() -> u64 {
    800
}

fn default_assets_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_placeholder_image() -> String {
    "https://placehold.co/600x400?text=Authority+Image".to_string()
}

const fn default_description_preview() -> usize {
    80
}

const fn default_stagger_ms() -> u64 {
    100
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_loading_delay_ms")]
        loading_delay_ms: u64,

        #[serde(default)]
        display_mode: DisplayMode,

        #[serde(default = "default_assets_root")]
        assets_root: PathBuf,

        #[serde(default = "default_placeholder_image")]
        placeholder_image: String,

        #[serde(default = "default_description_preview")]
        description_preview: usize,

        #[serde(default = "default_stagger_ms")]
        stagger_ms: u64,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                loading_delay_ms,
                display_mode,
                assets_root,
                placeholder_image,
                description_preview,
                stagger_ms,
            } => Self {
                loading_delay_ms,
                display_mode,
                assets_root,
                placeholder_image,
                description_preview: description_preview.max(1),
                stagger_ms,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            loading_delay_ms: config.loading_delay_ms,
            display_mode: config.display_mode,
            assets_root: config.assets_root,
            placeholder_image: config.placeholder_image,
            description_preview: config.description_preview,
            stagger_ms: config.stagger_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nloading_delay_ms = 250\ndisplay_mode = \"avatar\"\nassets_root = \"public\"\ndescription_preview = 40\nstagger_ms = 0\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.loading_delay(), Duration::from_millis(250));
        assert_eq!(config.display_mode, DisplayMode::Avatar);
        assert_eq!(config.assets_root, PathBuf::from("public"));
        assert_eq!(config.description_preview(), 40);
        assert_eq!(config.stagger(), Duration::ZERO);
        assert_eq!(
            config.placeholder_image,
            "https://placehold.co/600x400?text=Authority+Image"
        );
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().starts_with("Failed to read config file"));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&tmp.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nloading_delay_ms = \"slow\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".kbm/config.toml");

        let mut config = Config::default();
        config.display_mode = DisplayMode::Avatar;
        config.set_loading_delay_ms(1200);
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn zero_preview_is_raised_to_one() {
        let actual: Config =
            toml::from_str("_version = \"1\"\ndescription_preview = 0\n").unwrap();
        assert_eq!(actual.description_preview(), 1);
    }
}
