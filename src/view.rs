//! The presentation model of the marketplace screen.
//!
//! Nothing in here prints. The view state holds the loading gate and the
//! search query, the card renderer maps listings to cards for a display mode,
//! and [`grid::compose`] derives the whole screen from the two.

mod assets;
pub use assets::{initials, AssetError, AssetResolver, DirectoryAssets, ResolvedAsset};

mod card;
pub use card::{
    Action, ActionKind, Activation, Badge, BadgeVariant, ButtonVariant, Card, CardRenderer,
    DisplayMode, Media,
};

/// Screen composition and layout helpers.
pub mod grid;
pub use grid::{EmptyState, Screen};

mod loading;
pub use loading::{LoadingGate, Phase};

mod state;
pub use state::ViewState;
