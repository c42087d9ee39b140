//! Text rendering of the marketplace screen.
//!
//! Layout is computed on plain text first and styled afterwards, so padding
//! is never thrown off by escape codes.

use kbmarket::{
    view::{
        grid::{HEADING, SEARCH_PLACEHOLDER, SUBTITLE},
        BadgeVariant, EmptyState, Media,
    },
    Card, DisplayMode,
};

use owo_colors::{colors::css, OwoColorize};

use super::terminal::supports_color;

/// Narrowest card content width.
const MIN_INNER: usize = 20;
/// Widest card content width.
const MAX_INNER: usize = 60;
/// Assumed terminal width when it cannot be detected.
const FALLBACK_WIDTH: usize = 80;
/// Gap between cards in a row.
const GUTTER: &str = "  ";

/// Terminal styles used across the marketplace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Muted,
    Success,
    Secondary,
    Warning,
    Info,
    Button,
    Disabled,
}

impl Tone {
    /// Styles `text`, or returns it unchanged when colour is unsupported.
    pub fn paint(self, text: &str) -> String {
        if !supports_color() {
            return text.to_string();
        }
        match self {
            Self::Plain => text.to_string(),
            Self::Heading => text.bold().to_string(),
            Self::Muted | Self::Disabled => text.dimmed().to_string(),
            Self::Success => text.fg::<css::Green>().to_string(),
            Self::Secondary | Self::Warning => text.fg::<css::Orange>().to_string(),
            Self::Info | Self::Button => text.fg::<css::LightBlue>().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Segment {
    text: String,
    tone: Tone,
}

/// Rendered lines, kept as styled segments until printed.
#[derive(Debug, Clone, Default)]
pub struct Output {
    lines: Vec<Vec<Segment>>,
}

impl Output {
    fn line(&mut self, text: impl Into<String>, tone: Tone) {
        self.lines.push(vec![Segment {
            text: text.into(),
            tone,
        }]);
    }

    fn blank(&mut self) {
        self.lines.push(Vec::new());
    }

    /// The output without styling.
    pub fn plain(&self) -> String {
        self.join(|segment| segment.text.clone())
    }

    /// The output with terminal styling, if the terminal supports it.
    pub fn painted(&self) -> String {
        self.join(|segment| segment.tone.paint(&segment.text))
    }

    fn join(&self, f: impl Fn(&Segment) -> String) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(&f)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Prints the output followed by a newline, styled if the terminal
    /// supports it.
    pub fn print(&self) {
        if supports_color() {
            println!("{}", self.painted());
        } else {
            println!("{}", self.plain());
        }
    }
}

/// One line inside a card, possibly mixing tones.
#[derive(Debug, Clone)]
struct CardLine {
    segments: Vec<Segment>,
}

impl CardLine {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            segments: vec![Segment {
                text: text.into(),
                tone,
            }],
        }
    }

    fn push(mut self, text: impl Into<String>, tone: Tone) -> Self {
        self.segments.push(Segment {
            text: text.into(),
            tone,
        });
        self
    }

    fn width(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| segment.text.chars().count())
            .sum()
    }
}

/// Content width of a card for a number of columns.
pub fn inner_width(columns: usize, terminal_width: Option<u16>) -> usize {
    let columns = columns.max(1);
    let total = terminal_width.map_or(FALLBACK_WIDTH, usize::from);
    let gutters = GUTTER.len() * (columns - 1);
    let outer = total.saturating_sub(gutters) / columns;
    outer.saturating_sub(4).clamp(MIN_INNER, MAX_INNER)
}

/// Heading, subtitle and the search field.
pub fn header(query: &str) -> Output {
    let mut out = Output::default();
    out.line(HEADING, Tone::Heading);
    out.line(SUBTITLE, Tone::Muted);
    out.blank();
    if query.is_empty() {
        out.lines.push(vec![
            Segment {
                text: "Search: ".to_string(),
                tone: Tone::Plain,
            },
            Segment {
                text: SEARCH_PLACEHOLDER.to_string(),
                tone: Tone::Muted,
            },
        ]);
    } else {
        out.line(format!("Search: {query}"), Tone::Plain);
    }
    out.blank();
    out
}

/// The empty-state block.
pub fn empty_state(empty: &EmptyState, width: usize) -> Output {
    let mut out = Output::default();
    let rule = "╌".repeat(width);
    out.line(&rule, Tone::Muted);
    out.line(center(empty.title, width), Tone::Heading);
    for line in wrap(empty.hint, width) {
        out.line(center(&line, width), Tone::Muted);
    }
    out.blank();
    out.line(center(&format!("[ {} ]", empty.action), width), Tone::Button);
    out.line(&rule, Tone::Muted);
    out
}

/// Cards laid out in rows of `columns`.
pub fn grid(cards: &[Card], columns: usize, inner: usize) -> Output {
    let mut out = Output::default();
    for row in cards.chunks(columns.max(1)) {
        append_row(&mut out, row, inner);
    }
    out
}

/// The full description of a card, shown on demand.
pub fn details(card: &Card, width: usize) -> Output {
    let mut out = Output::default();
    out.line(format!("{} ({})", card.title, card.authority), Tone::Heading);
    let description = card.tooltip.as_deref().unwrap_or(&card.description);
    for line in wrap(description, width) {
        out.line(line, Tone::Plain);
    }
    out
}

/// Cards as an aligned table, one row per card.
pub fn table(cards: &[Card], quiet: bool) -> Output {
    let headers = ["ID", "Title", "Authority", "Status", "Action"];
    let data: Vec<[String; 5]> = cards
        .iter()
        .map(|card| {
            [
                card.id.to_string(),
                card.title.clone(),
                card.authority.clone(),
                card.badge.label.to_string(),
                action_label(card),
            ]
        })
        .collect();

    let mut out = Output::default();
    if quiet {
        for row in data {
            out.line(row.join("\t"), Tone::Plain);
        }
        return out;
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            data.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    let format_row = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}  "))
            .collect::<String>()
    };

    out.line(format_row(&headers.map(str::to_string)[..]), Tone::Heading);
    out.line(
        widths
            .iter()
            .map(|&width| format!("{:-<width$}  ", ""))
            .collect::<String>(),
        Tone::Muted,
    );
    for row in data {
        out.line(format_row(&row[..]), Tone::Plain);
    }
    out
}

fn action_label(card: &Card) -> String {
    let mut label = card.action.label.to_string();
    if card.action.external {
        label.push_str(" ↗");
    }
    if !card.action.enabled {
        label.push_str(" (disabled)");
    }
    label
}

fn append_row(out: &mut Output, row: &[Card], inner: usize) {
    let laid_out: Vec<(Vec<CardLine>, Vec<CardLine>)> =
        row.iter().map(|card| card_body(card, inner)).collect();
    let height = laid_out.iter().map(|(body, _)| body.len()).max().unwrap_or(0);
    let footer_height = laid_out
        .iter()
        .map(|(_, footer)| footer.len())
        .max()
        .unwrap_or(0);

    let border = |left: &str, right: &str| {
        (0..row.len())
            .map(|_| {
                vec![Segment {
                    text: format!("{left}{}{right}", "─".repeat(inner + 2)),
                    tone: Tone::Muted,
                }]
            })
            .collect::<Vec<_>>()
            .join(&Segment {
                text: GUTTER.to_string(),
                tone: Tone::Plain,
            })
    };

    out.lines.push(border("╭", "╮"));
    for idx in 0..height + 1 + footer_height {
        let mut line = Vec::new();
        for (col, (body, footer)) in laid_out.iter().enumerate() {
            if col > 0 {
                line.push(Segment {
                    text: GUTTER.to_string(),
                    tone: Tone::Plain,
                });
            }
            // Bodies are padded to a common height so footers line up.
            let content = if idx < height {
                body.get(idx)
            } else if idx == height {
                None
            } else {
                footer.get(idx - height - 1)
            };
            line.push(Segment {
                text: "│ ".to_string(),
                tone: Tone::Muted,
            });
            let used = content.map_or(0, |cell| {
                line.extend(cell.segments.iter().cloned());
                cell.width()
            });
            line.push(Segment {
                text: " ".repeat(inner.saturating_sub(used)),
                tone: Tone::Plain,
            });
            line.push(Segment {
                text: " │".to_string(),
                tone: Tone::Muted,
            });
        }
        out.lines.push(line);
    }
    out.lines.push(border("╰", "╯"));
    out.blank();
}

fn card_body(card: &Card, inner: usize) -> (Vec<CardLine>, Vec<CardLine>) {
    let mut body = Vec::new();
    let mut footer = Vec::new();
    let badge = format!("[{}]", card.badge.label);
    let badge_tone = match card.badge.variant {
        BadgeVariant::Success => Tone::Success,
        BadgeVariant::Secondary => Tone::Secondary,
    };
    let button_tone = if card.action.enabled {
        Tone::Button
    } else {
        Tone::Disabled
    };
    let button = if card.action.external {
        format!("[ {} ↗ ]", card.action.label)
    } else {
        format!("[ {} ]", card.action.label)
    };

    match card.mode {
        DisplayMode::Banner => {
            let media = match &card.media {
                Media::Image { source } | Media::Logo { source } => format!("▣ {source}"),
                Media::Placeholder { source } => format!("▢ {source}"),
                Media::Initials { text } => format!("({text})"),
            };
            body.push(CardLine::new(fit(&media, inner), Tone::Muted));
            body.push(CardLine::new(align_right(&badge, inner), badge_tone));
            body.extend(
                wrap(&card.title, inner)
                    .into_iter()
                    .map(|line| CardLine::new(line, Tone::Heading)),
            );
            body.push(CardLine::new(fit(&card.authority, inner), Tone::Muted));
            body.push(CardLine::new("", Tone::Plain));
            body.extend(
                wrap(&card.description, inner)
                    .into_iter()
                    .map(|line| CardLine::new(line, Tone::Plain)),
            );
            footer.push(CardLine::new(center(&button, inner), button_tone));
        }
        DisplayMode::Avatar => {
            let avatar = match &card.media {
                Media::Initials { text } => format!("({text})"),
                Media::Image { .. } | Media::Logo { .. } | Media::Placeholder { .. } => {
                    "(◉)".to_string()
                }
            };
            let indent = avatar.chars().count() + 1;
            let title_width = inner.saturating_sub(indent).max(1);
            for (idx, line) in wrap(&card.title, title_width).into_iter().enumerate() {
                let prefix = if idx == 0 {
                    format!("{avatar} ")
                } else {
                    " ".repeat(indent)
                };
                body.push(CardLine::new(format!("{prefix}{line}"), Tone::Heading));
            }
            body.push(CardLine::new(
                format!("{}{}", " ".repeat(indent), fit(&card.authority, title_width)),
                Tone::Muted,
            ));
            body.push(CardLine::new("", Tone::Plain));
            body.extend(
                wrap(&card.description, inner)
                    .into_iter()
                    .map(|line| CardLine::new(line, Tone::Plain)),
            );
            if card.tooltip.is_some() {
                body.push(CardLine::new(
                    fit(&format!("ⓘ details {}", card.id), inner),
                    Tone::Muted,
                ));
            }

            let gap = inner.saturating_sub(badge.chars().count() + button.chars().count());
            if gap >= 1 {
                footer.push(
                    CardLine::new(badge, badge_tone)
                        .push(" ".repeat(gap), Tone::Plain)
                        .push(button, button_tone),
                );
            } else {
                footer.push(CardLine::new(fit(&badge, inner), badge_tone));
                footer.push(CardLine::new(fit(&button, inner), button_tone));
            }
        }
    }

    (body, footer)
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cuts `text` to `width` characters, marking the cut with an ellipsis.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn center(text: &str, width: usize) -> String {
    let text = fit(text, width);
    let left = width.saturating_sub(text.chars().count()) / 2;
    format!("{}{text}", " ".repeat(left))
}

fn align_right(text: &str, width: usize) -> String {
    let text = fit(text, width);
    format!("{}{text}", " ".repeat(width.saturating_sub(text.chars().count())))
}
