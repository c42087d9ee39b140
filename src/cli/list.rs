use std::{fmt, path::Path};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use kbmarket::{
    view::{grid, Screen},
    Catalog, DisplayMode, ViewState,
};
use tracing::instrument;

use super::{card_renderer, load_config, render, terminal};

/// Command arguments for `kbm list`.
#[derive(Debug, Parser)]
#[command(about = "Print the marketplace grid once and exit")]
pub struct List {
    /// Case-insensitive substring match against title, description and
    /// authority.
    #[arg(long, short, default_value = "")]
    query: String,

    /// Card layout (defaults to the configured mode).
    #[arg(long, value_enum)]
    mode: Option<DisplayMode>,

    /// Output format (default: cards).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Show full descriptions instead of truncated previews.
    #[arg(long)]
    details: bool,

    /// Suppress headers and format rows for scripting.
    #[arg(long)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Cards,
    Table,
    Json,
}

impl List {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let config = load_config(config_path)?;
        let catalog = Catalog::builtin()?;
        let renderer = card_renderer(&config, self.mode);

        // Non-interactive output skips the loading gate.
        let mut state = ViewState::ready();
        state.set_query(self.query.as_str());

        let mut screen = grid::compose(&state, &catalog, &renderer);
        if self.details {
            expand_tooltips(&mut screen);
        }

        match self.output {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &screen)
                    .context("failed to render json output")?;
                println!();
            }
            OutputFormat::Table => {
                if !self.quiet {
                    render::header(&self.query).print();
                }
                match &screen {
                    Screen::Grid { cards, .. } => render::table(cards, self.quiet).print(),
                    Screen::Empty { empty, .. } if !self.quiet => {
                        render::empty_state(empty, 60).print();
                    }
                    Screen::Empty { .. } | Screen::Loading { .. } => {}
                }
            }
            OutputFormat::Cards => {
                let columns = terminal::grid_columns();
                let inner = render::inner_width(columns, terminal::terminal_width());
                if !self.quiet {
                    render::header(&self.query).print();
                }
                match &screen {
                    Screen::Grid { cards, .. } => render::grid(cards, columns, inner).print(),
                    Screen::Empty { empty, .. } => {
                        render::empty_state(empty, inner).print();
                    }
                    Screen::Loading { .. } => {}
                }
            }
        }

        Ok(())
    }
}

/// Replaces truncated descriptions with their full text.
fn expand_tooltips(screen: &mut Screen) {
    if let Screen::Grid { cards, .. } = screen {
        for card in cards {
            if let Some(full) = card.tooltip.take() {
                card.description = full;
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cards => "cards",
            Self::Table => "table",
            Self::Json => "json",
        })
    }
}
