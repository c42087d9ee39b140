use std::path::{Path, PathBuf};

mod browse;
mod config;
mod list;
mod render;
mod terminal;

use browse::Browse;
use clap::ArgAction;
use kbmarket::{view::DirectoryAssets, CardRenderer, Config, DisplayMode};
use list::List;

/// Default location of the configuration file, relative to the working
/// directory.
const DEFAULT_CONFIG_PATH: &str = ".kbm/config.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Browse(Browse::default()))
            .run(&self.config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // Logs go to stderr so that `list --output json` stays parseable.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Browse the marketplace interactively (default)
    Browse(Browse),

    /// Print the marketplace grid once and exit
    List(List),

    /// Show or modify configuration settings
    Config(config::Command),
}

impl Command {
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self {
            Self::Browse(command) => command.run(config_path)?,
            Self::List(command) => command.run(config_path)?,
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

/// Loads the configuration, falling back to defaults if the file is absent.
fn load_config(path: &Path) -> anyhow::Result<Config> {
    Ok(Config::load_or_default(path)?)
}

/// Builds a card renderer from the configuration, optionally overriding the
/// configured display mode.
fn card_renderer(config: &Config, mode: Option<DisplayMode>) -> CardRenderer<DirectoryAssets> {
    CardRenderer::new(
        DirectoryAssets::new(&config.assets_root),
        mode.unwrap_or(config.display_mode),
        config.placeholder_image.clone(),
        config.description_preview(),
    )
}
