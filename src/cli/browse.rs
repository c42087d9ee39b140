use std::{
    io::IsTerminal,
    path::Path,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use kbmarket::{
    view::{
        grid::{self, LOADING_MESSAGE},
        ActionKind, Activation, DirectoryAssets, Screen,
    },
    Card, CardRenderer, Catalog, DisplayMode, ListingId, ViewState,
};
use tracing::instrument;

use super::{card_renderer, load_config, render, render::Tone, terminal};

/// Spinner refresh interval while the loading gate is closed.
const TICK: Duration = Duration::from_millis(80);

/// Command arguments for `kbm browse`.
#[derive(Debug, Parser, Default)]
#[command(about = "Browse the marketplace interactively")]
pub struct Browse {
    /// Card layout (defaults to the configured mode).
    #[arg(long, value_enum)]
    mode: Option<DisplayMode>,

    /// Initial search query.
    #[arg(long, short)]
    query: Option<String>,
}

/// A line entered at the search prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Prompt {
    /// Replace the query.
    Search(String),
    /// Keep the current query and redraw.
    Keep,
    /// Reset the query.
    Clear,
    /// Switch between banner and avatar cards.
    ToggleMode,
    /// Show the full description of a card.
    Details(String),
    /// Activate a card's button, provided it performs `action`.
    Activate { action: ActionKind, id: String },
    Help,
    Quit,
    Unknown(String),
}

impl Prompt {
    fn parse(input: &str) -> Self {
        if input.is_empty() {
            return Self::Keep;
        }
        if let Some(literal) = input.strip_prefix("::") {
            return Self::Search(format!(":{literal}"));
        }
        let Some(command) = input.strip_prefix(':') else {
            return Self::Search(input.to_string());
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::to_string);
        match (name, arg) {
            ("q" | "quit", None) => Self::Quit,
            ("clear", None) => Self::Clear,
            ("mode", None) => Self::ToggleMode,
            ("help", None) => Self::Help,
            ("details", Some(id)) => Self::Details(id),
            ("open", Some(id)) => Self::Activate {
                action: ActionKind::ViewKnowledgeBase,
                id,
            },
            ("notify", Some(id)) => Self::Activate {
                action: ActionKind::NotifyMe,
                id,
            },
            _ => Self::Unknown(input.to_string()),
        }
    }
}

impl Browse {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!("browse needs an interactive terminal; use 'kbm list' instead");
        }

        let config = load_config(config_path)?;
        let catalog = Catalog::builtin()?;
        let mut renderer = card_renderer(&config, self.mode);

        let mut state = ViewState::mount(config.loading_delay(), Instant::now());
        if let Some(query) = self.query {
            state.set_query(query);
        }

        wait_for_gate(&mut state)?;

        let result = Session {
            state: &mut state,
            catalog: &catalog,
            renderer: &mut renderer,
            stagger: config.stagger(),
        }
        .run();

        state.unmount();
        result
    }
}

/// Shows the spinner until the loading gate opens.
fn wait_for_gate(state: &mut ViewState) -> anyhow::Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").context("invalid spinner template")?,
    );
    spinner.set_message(LOADING_MESSAGE);
    spinner.enable_steady_tick(TICK);

    while let Some(remaining) = state.gate().remaining(Instant::now()) {
        if state.poll(Instant::now()) {
            break;
        }
        thread::sleep(remaining.min(TICK));
    }

    spinner.finish_and_clear();
    Ok(())
}

struct Session<'a> {
    state: &'a mut ViewState,
    catalog: &'a Catalog,
    renderer: &'a mut CardRenderer<DirectoryAssets>,
    stagger: Duration,
}

impl Session<'_> {
    fn run(self) -> anyhow::Result<()> {
        let Self {
            state,
            catalog,
            renderer,
            stagger,
        } = self;
        let mut shown: Option<Vec<ListingId>> = None;

        loop {
            let screen = grid::compose(state, catalog, renderer);
            let ids: Vec<ListingId> = screen.cards().iter().map(|card| card.id.clone()).collect();
            // Cards only animate in when the visible set changes.
            let entering = shown.as_ref() != Some(&ids);
            draw(
                &screen,
                state.query().as_str(),
                if entering { stagger } else { Duration::ZERO },
            );
            shown = Some(ids);

            if let Screen::Empty { empty, .. } = &screen {
                let view_all = Confirm::new()
                    .with_prompt(empty.action)
                    .default(true)
                    .interact()?;
                if view_all {
                    state.clear_query();
                    continue;
                }
            }

            let input: String = Input::new()
                .with_prompt("Search (:help for commands)")
                .allow_empty(true)
                .interact_text()?;

            match Prompt::parse(&input) {
                Prompt::Quit => break,
                Prompt::Keep => {}
                Prompt::Search(text) => state.set_query(text),
                Prompt::Clear => state.clear_query(),
                Prompt::ToggleMode => {
                    let mode = renderer.mode().toggled();
                    renderer.set_mode(mode);
                    println!("{}", Tone::Info.paint(&format!("Display mode: {mode}")));
                }
                Prompt::Details(id) => match find(&screen, &id) {
                    Some(card) => {
                        let width = render::inner_width(1, terminal::terminal_width());
                        render::details(card, width).print();
                        pause()?;
                    }
                    None => not_visible(&id),
                },
                Prompt::Activate { action, id } => match find(&screen, &id) {
                    Some(card) => {
                        report(card, action, activate_as(card, action));
                        pause()?;
                    }
                    None => not_visible(&id),
                },
                Prompt::Help => {
                    print_help();
                    pause()?;
                }
                Prompt::Unknown(input) => {
                    eprintln!("{}", Tone::Warning.paint(&format!("Unknown command '{input}'")));
                    print_help();
                }
            }
        }

        Ok(())
    }
}

fn draw(screen: &Screen, query: &str, stagger: Duration) {
    render::header(query).print();

    let columns = terminal::grid_columns();
    let inner = render::inner_width(columns, terminal::terminal_width());
    match screen {
        Screen::Grid { cards, .. } => {
            let waits = stagger_schedule(cards.len(), columns, stagger);
            for (row, wait) in cards.chunks(columns).zip(waits) {
                if !wait.is_zero() {
                    thread::sleep(wait);
                }
                render::grid(row, columns, inner).print();
            }
        }
        Screen::Empty { empty, .. } => render::empty_state(empty, inner).print(),
        Screen::Loading { message } => println!("{}", Tone::Muted.paint(message)),
    }
}

/// How long to wait before printing each row of the grid.
///
/// Card `i` enters `i * stagger` after the first, and a row is printed once
/// its last card has entered. There is no wait before the first card or
/// after the last.
fn stagger_schedule(cards: usize, columns: usize, stagger: Duration) -> Vec<Duration> {
    let columns = columns.max(1);
    let mut previous = 0;
    (0..cards)
        .step_by(columns)
        .map(|start| {
            let last = (start + columns).min(cards) - 1;
            let steps = last - previous;
            previous = last;
            stagger * u32::try_from(steps).unwrap_or(u32::MAX)
        })
        .collect()
}

/// Runs the card's action only when it is the one that was asked for.
fn activate_as(card: &Card, requested: ActionKind) -> Activation {
    if card.action.kind == requested {
        card.activate()
    } else {
        tracing::debug!(id = %card.id, ?requested, "card does not offer the requested action");
        Activation::Ignored
    }
}

const fn command_label(action: ActionKind) -> &'static str {
    match action {
        ActionKind::ViewKnowledgeBase => "View Knowledge Base",
        ActionKind::NotifyMe => "Notify Me",
    }
}

fn find<'s>(screen: &'s Screen, id: &str) -> Option<&'s Card> {
    screen.cards().iter().find(|card| card.id.as_str() == id)
}

fn report(card: &Card, requested: ActionKind, activation: Activation) {
    let message = match activation {
        Activation::Open(_) => Tone::Success.paint(&format!("Opening {} ↗", card.title)),
        Activation::NotifyRequested(_) => Tone::Muted.paint(&format!(
            "Notifications for {} are not available yet",
            card.title
        )),
        Activation::Ignored if card.action.kind != requested => Tone::Warning.paint(&format!(
            "{} offers '{}', not '{}'",
            card.title,
            card.action.label,
            command_label(requested)
        )),
        Activation::Ignored => Tone::Warning.paint(&format!(
            "'{}' is unavailable for {}",
            card.action.label, card.title
        )),
    };
    println!("{message}");
}

fn not_visible(id: &str) {
    eprintln!(
        "{}",
        Tone::Warning.paint(&format!("No visible knowledge base with id '{id}'"))
    );
}

fn print_help() {
    println!("{}", Tone::Info.paint("Commands:"));
    println!("  <text>         search titles, descriptions and authorities");
    println!("  ::<text>       search for text that starts with ':'");
    println!("  <enter>        redraw with the current search");
    println!("  :clear         show all knowledge bases");
    println!("  :mode          switch between banner and avatar cards");
    println!("  :details <id>  show the full description of a card");
    println!("  :open <id>     open a subscribed knowledge base");
    println!("  :notify <id>   ask to be notified about a knowledge base");
    println!("  :quit          leave the marketplace");
}

fn pause() -> anyhow::Result<()> {
    Input::<String>::new()
        .with_prompt("Press enter to continue")
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}
