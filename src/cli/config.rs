use std::path::{Path, PathBuf};

use kbmarket::{Config, DisplayMode};
use tracing::instrument;

use crate::cli::render::Tone;

const KEYS: &str = "loading_delay_ms\n  display_mode\n  assets_root\n  placeholder_image\n  \
                    description_preview\n  stagger_ms";

#[derive(Debug, clap::Parser)]
/// Show or modify marketplace configuration
///
/// Configuration is stored in .kbm/config.toml (or the file passed with
/// --config) and controls how the marketplace is presented.
///
/// Available configuration keys:
///   `loading_delay_ms`     Loading screen duration (default: 800)
///   `display_mode`         Card layout, banner or avatar (default: banner)
///   `assets_root`          Directory image paths resolve against (default: .)
///   `placeholder_image`    Image used when a banner image fails to load
///   `description_preview`  Inline description length in avatar mode
///   (default: 80)
///   `stagger_ms`           Delay between cards entering the grid (default: 100)
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show all configuration values
    Show,

    /// Get a specific configuration value
    Get {
        /// Configuration key to retrieve
        key: String,
    },

    /// Set a configuration value
    ///
    /// Examples:
    ///   kbm config set `display_mode` avatar
    ///   kbm config set `loading_delay_ms` 0
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let config = Config::load_or_default(config_path)?;

        match self.command {
            ConfigCommand::Show => {
                Self::show_config(&config);
                Ok(())
            }
            ConfigCommand::Get { key } => {
                println!("{}", Self::get_value(&config, &key)?);
                Ok(())
            }
            ConfigCommand::Set { key, value } => {
                let mut config = config;
                Self::set_value(&mut config, &key, &value)?;
                config.save(config_path)?;
                println!(
                    "{}",
                    Tone::Success.paint(&format!("Set {key} = {}", Self::get_value(&config, &key)?))
                );
                Ok(())
            }
        }
    }

    fn show_config(config: &Config) {
        println!("Configuration:");
        println!(
            "  loading_delay_ms: {} {}",
            config.loading_delay().as_millis(),
            if config.loading_delay().is_zero() {
                Tone::Muted.paint("(no loading screen)")
            } else {
                String::new()
            }
        );
        println!("  display_mode: {}", config.display_mode);
        println!("  assets_root: {}", config.assets_root.display());
        println!("  placeholder_image: {}", config.placeholder_image);
        println!("  description_preview: {}", config.description_preview());
        println!(
            "  stagger_ms: {} {}",
            config.stagger().as_millis(),
            if config.stagger().is_zero() {
                Tone::Muted.paint("(no staggered entrance)")
            } else {
                String::new()
            }
        );
    }

    fn get_value(config: &Config, key: &str) -> anyhow::Result<String> {
        Ok(match key {
            "loading_delay_ms" => config.loading_delay().as_millis().to_string(),
            "display_mode" => config.display_mode.to_string(),
            "assets_root" => config.assets_root.display().to_string(),
            "placeholder_image" => config.placeholder_image.clone(),
            "description_preview" => config.description_preview().to_string(),
            "stagger_ms" => config.stagger().as_millis().to_string(),
            _ => anyhow::bail!("Unknown configuration key: '{key}'\n\nAvailable keys:\n  {KEYS}"),
        })
    }

    fn set_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "loading_delay_ms" => config.set_loading_delay_ms(parse_number(value)?),
            "display_mode" => {
                config.display_mode = value.parse::<DisplayMode>().map_err(anyhow::Error::msg)?;
            }
            "assets_root" => config.assets_root = PathBuf::from(value),
            "placeholder_image" => {
                if value.trim().is_empty() {
                    anyhow::bail!("placeholder_image must not be empty");
                }
                config.placeholder_image = value.to_string();
            }
            "description_preview" => config.set_description_preview(parse_number(value)?),
            "stagger_ms" => config.set_stagger_ms(parse_number(value)?),
            _ => anyhow::bail!("Unknown configuration key: '{key}'\n\nAvailable keys:\n  {KEYS}"),
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(value: &str) -> anyhow::Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Value must be a non-negative integer, got '{value}'"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn set_then_get_round_trips_through_strings() {
        let mut config = Config::default();

        Command::set_value(&mut config, "display_mode", "avatar").unwrap();
        Command::set_value(&mut config, "loading_delay_ms", "0").unwrap();

        assert_eq!(config.display_mode, DisplayMode::Avatar);
        assert_eq!(config.loading_delay(), Duration::ZERO);
        assert_eq!(
            Command::get_value(&config, "display_mode").unwrap(),
            "avatar"
        );
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        let mut config = Config::default();

        assert!(Command::get_value(&config, "digits").is_err());
        assert!(Command::set_value(&mut config, "digits", "3").is_err());
        assert!(Command::set_value(&mut config, "stagger_ms", "-1").is_err());
        assert!(Command::set_value(&mut config, "display_mode", "grid").is_err());
        assert!(Command::set_value(&mut config, "placeholder_image", " ").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn set_persists_to_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".kbm/config.toml");

        let command = Command {
            command: ConfigCommand::Set {
                key: "stagger_ms".to_string(),
                value: "0".to_string(),
            },
        };
        command.run(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap().stagger(), Duration::ZERO);
    }
}
