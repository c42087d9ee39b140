use serde::Serialize;

use crate::{
    domain::Catalog,
    view::{AssetResolver, Card, CardRenderer, ViewState},
};

/// Screen heading.
pub const HEADING: &str = "Knowledge Base Marketplace";

/// Line shown under the heading.
pub const SUBTITLE: &str =
    "Discover and subscribe to regulatory knowledge bases to enhance your compliance insights";

/// Hint shown in the empty search field.
pub const SEARCH_PLACEHOLDER: &str =
    "Search knowledge bases by title, description or authority...";

/// Text shown next to the loading indicator.
pub const LOADING_MESSAGE: &str = "Loading marketplace...";

/// Terminal widths at which the grid gains a column.
const BREAKPOINTS: [u16; 2] = [60, 120];

/// The block shown in place of the grid when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    /// Headline.
    pub title: &'static str,
    /// Suggestion below the headline.
    pub hint: &'static str,
    /// Label of the action that clears the search.
    pub action: &'static str,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            title: "No knowledge bases match your search",
            hint: "Try using different keywords or browse all available knowledge bases",
            action: "View All Knowledge Bases",
        }
    }
}

/// Everything the marketplace screen shows at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    /// The loading gate is still closed.
    Loading {
        /// Text next to the indicator.
        message: &'static str,
    },
    /// At least one listing matches the query.
    Grid {
        /// The current query.
        query: String,
        /// Cards in catalog order.
        cards: Vec<Card>,
    },
    /// No listing matches the query.
    Empty {
        /// The current query.
        query: String,
        /// The fallback block.
        empty: EmptyState,
    },
}

impl Screen {
    /// The cards on screen. Empty unless the grid is shown.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        match self {
            Self::Grid { cards, .. } => cards,
            Self::Loading { .. } | Self::Empty { .. } => &[],
        }
    }
}

/// Derives the screen from the view state.
#[must_use]
pub fn compose<R: AssetResolver>(
    state: &ViewState,
    catalog: &Catalog,
    renderer: &CardRenderer<R>,
) -> Screen {
    if state.is_loading() {
        return Screen::Loading {
            message: LOADING_MESSAGE,
        };
    }

    let query = state.query().as_str().to_string();
    let visible = state.visible(catalog);
    tracing::debug!(query = %query, matches = visible.len(), "composing grid");

    if visible.is_empty() {
        Screen::Empty {
            query,
            empty: EmptyState::default(),
        }
    } else {
        Screen::Grid {
            query,
            cards: renderer.render_all(visible),
        }
    }
}

/// Number of grid columns for a terminal width.
///
/// An unknown width yields a single column.
#[must_use]
pub fn columns_for_width(width: Option<u16>) -> usize {
    width.map_or(1, |width| {
        1 + BREAKPOINTS.iter().filter(|&&bp| width >= bp).count()
    })
}
