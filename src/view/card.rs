use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Listing, ListingId, Status},
    view::assets::{initials, AssetResolver},
};

/// Card layout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Full-width image header with an overlaid status badge.
    #[default]
    Banner,
    /// Small logo with initials fallback and a truncated description.
    Avatar,
}

impl DisplayMode {
    /// The other layout.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Banner => Self::Avatar,
            Self::Avatar => Self::Banner,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Banner => "banner",
            Self::Avatar => "avatar",
        })
    }
}

impl std::str::FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "banner" => Ok(Self::Banner),
            "avatar" => Ok(Self::Avatar),
            other => Err(format!("unknown display mode: {other}")),
        }
    }
}

/// The visual at the top of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Media {
    /// Banner image that loaded.
    Image {
        /// Asset reference.
        source: String,
    },
    /// Banner image that failed to load, replaced by the placeholder.
    Placeholder {
        /// Placeholder image location.
        source: String,
    },
    /// Avatar logo that loaded.
    Logo {
        /// Asset reference.
        source: String,
    },
    /// Avatar logo that failed to load, replaced by the authority's initials.
    Initials {
        /// The computed initials.
        text: String,
    },
}

/// Visual weight of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    /// Positive state.
    Success,
    /// Neutral state.
    Secondary,
}

/// A status badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    /// Badge text.
    pub label: &'static str,
    /// Visual weight.
    pub variant: BadgeVariant,
}

/// What activating a card's button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Open the knowledge base.
    ViewKnowledgeBase,
    /// Ask to be notified when the knowledge base becomes available.
    NotifyMe,
}

/// Visual weight of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonVariant {
    /// Primary, filled button.
    Default,
    /// Secondary, outlined button.
    Outline,
}

/// The call-to-action button of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// What the button does.
    pub kind: ActionKind,
    /// Button text.
    pub label: &'static str,
    /// Whether the button reacts to activation.
    pub enabled: bool,
    /// Visual weight.
    pub variant: ButtonVariant,
    /// Whether the label carries an external-link marker.
    pub external: bool,
}

impl Action {
    const fn view_knowledge_base() -> Self {
        Self {
            kind: ActionKind::ViewKnowledgeBase,
            label: "View Knowledge Base",
            enabled: true,
            variant: ButtonVariant::Outline,
            external: true,
        }
    }

    const fn notify_me(enabled: bool) -> Self {
        Self {
            kind: ActionKind::NotifyMe,
            label: "Notify Me",
            enabled,
            variant: ButtonVariant::Default,
            external: false,
        }
    }
}

/// Outcome of activating a card's button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The knowledge base should be opened.
    Open(ListingId),
    /// A notification was requested. Nothing is delivered.
    NotifyRequested(ListingId),
    /// The button is disabled; nothing happened.
    Ignored,
}

/// A listing prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Render key.
    pub id: ListingId,
    /// Layout the card was rendered for.
    pub mode: DisplayMode,
    /// Rulebook name.
    pub title: String,
    /// Issuing regulator.
    pub authority: String,
    /// Description as shown inline. Truncated in avatar mode.
    pub description: String,
    /// Full description shown on demand. Only set when the inline text is
    /// shortened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Header visual.
    pub media: Media,
    /// Status badge.
    pub badge: Badge,
    /// Call to action.
    pub action: Action,
}

impl Card {
    /// Activates the card's button.
    #[must_use]
    pub fn activate(&self) -> Activation {
        if !self.action.enabled {
            tracing::debug!(id = %self.id, "ignoring activation of disabled action");
            return Activation::Ignored;
        }
        match self.action.kind {
            ActionKind::ViewKnowledgeBase => Activation::Open(self.id.clone()),
            ActionKind::NotifyMe => {
                tracing::debug!(id = %self.id, "notification requested");
                Activation::NotifyRequested(self.id.clone())
            }
        }
    }
}

/// Maps listings to cards for one display mode.
#[derive(Debug, Clone)]
pub struct CardRenderer<R> {
    resolver: R,
    mode: DisplayMode,
    placeholder_image: String,
    preview_chars: usize,
}

impl<R: AssetResolver> CardRenderer<R> {
    /// Creates a renderer.
    ///
    /// `placeholder_image` replaces banner images that fail to load and
    /// `preview_chars` bounds the inline description in avatar mode.
    #[must_use]
    pub fn new(
        resolver: R,
        mode: DisplayMode,
        placeholder_image: impl Into<String>,
        preview_chars: usize,
    ) -> Self {
        Self {
            resolver,
            mode,
            placeholder_image: placeholder_image.into(),
            preview_chars: preview_chars.max(1),
        }
    }

    /// The layout cards are rendered for.
    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Switches the layout.
    pub const fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    /// Renders one listing.
    #[must_use]
    pub fn render(&self, listing: &Listing) -> Card {
        match self.mode {
            DisplayMode::Banner => self.banner(listing),
            DisplayMode::Avatar => self.avatar(listing),
        }
    }

    /// Renders a sequence of listings, keeping their order.
    #[must_use]
    pub fn render_all<'a, I>(&self, listings: I) -> Vec<Card>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        listings
            .into_iter()
            .map(|listing| self.render(listing))
            .collect()
    }

    fn banner(&self, listing: &Listing) -> Card {
        let media = match self.resolver.resolve(listing.asset()) {
            Ok(asset) => Media::Image {
                source: asset.reference,
            },
            Err(e) => {
                tracing::debug!(id = %listing.id(), "using placeholder image: {e}");
                Media::Placeholder {
                    source: self.placeholder_image.clone(),
                }
            }
        };

        let (badge, action) = match listing.status() {
            Status::Subscribed => (
                Badge {
                    label: Status::Subscribed.label(),
                    variant: BadgeVariant::Success,
                },
                Action::view_knowledge_base(),
            ),
            Status::ComingSoon => (
                Badge {
                    label: Status::ComingSoon.label(),
                    variant: BadgeVariant::Secondary,
                },
                Action::notify_me(false),
            ),
        };

        Card {
            id: listing.id().clone(),
            mode: DisplayMode::Banner,
            title: listing.title().to_string(),
            authority: listing.authority().to_string(),
            description: listing.description().to_string(),
            tooltip: None,
            media,
            badge,
            action,
        }
    }

    fn avatar(&self, listing: &Listing) -> Card {
        let media = match self.resolver.resolve(listing.asset()) {
            Ok(asset) => Media::Logo {
                source: asset.reference,
            },
            Err(e) => {
                tracing::debug!(id = %listing.id(), "using initials: {e}");
                Media::Initials {
                    text: initials(listing.authority()),
                }
            }
        };

        let (description, tooltip) = match truncate(listing.description(), self.preview_chars) {
            Some(short) => (short, Some(listing.description().to_string())),
            None => (listing.description().to_string(), None),
        };

        Card {
            id: listing.id().clone(),
            mode: DisplayMode::Avatar,
            title: listing.title().to_string(),
            authority: listing.authority().to_string(),
            description,
            tooltip,
            media,
            badge: Badge {
                label: Status::ComingSoon.label(),
                variant: BadgeVariant::Secondary,
            },
            action: Action::notify_me(true),
        }
    }
}

/// Shortens `text` to at most `max` characters plus an ellipsis, cutting at a
/// word boundary where one exists. Returns `None` if `text` already fits.
fn truncate(text: &str, max: usize) -> Option<String> {
    if text.chars().count() <= max {
        return None;
    }

    let cut: String = text.chars().take(max).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    Some(format!("{}…", cut.trim_end()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::{
        domain::Catalog,
        view::{AssetError, DirectoryAssets, ResolvedAsset},
    };

    /// Resolves only the references it was given.
    struct KnownAssets(BTreeSet<&'static str>);

    impl KnownAssets {
        fn none() -> Self {
            Self(BTreeSet::new())
        }

        fn with(references: &[&'static str]) -> Self {
            Self(references.iter().copied().collect())
        }
    }

    impl AssetResolver for KnownAssets {
        fn resolve(&self, reference: &str) -> Result<ResolvedAsset, AssetError> {
            if self.0.contains(reference) {
                Ok(ResolvedAsset {
                    reference: reference.to_string(),
                    location: reference.into(),
                })
            } else {
                Err(AssetError::NotFound {
                    reference: reference.to_string(),
                    location: reference.into(),
                })
            }
        }
    }

    const PLACEHOLDER: &str = "https://placehold.co/600x400?text=Authority+Image";

    fn renderer(resolver: KnownAssets, mode: DisplayMode) -> CardRenderer<KnownAssets> {
        CardRenderer::new(resolver, mode, PLACEHOLDER, 40)
    }

    #[test]
    fn banner_subscribed_card_can_be_opened() {
        let catalog = Catalog::builtin().unwrap();
        let renderer = renderer(KnownAssets::with(&["/images/vara.png"]), DisplayMode::Banner);

        let card = renderer.render(catalog.get("1").unwrap());

        assert_eq!(
            card.media,
            Media::Image {
                source: "/images/vara.png".to_string()
            }
        );
        assert_eq!(card.badge.label, "Subscribed");
        assert_eq!(card.badge.variant, BadgeVariant::Success);
        assert_eq!(card.action.label, "View Knowledge Base");
        assert!(card.action.enabled);
        assert!(card.action.external);
        assert_eq!(card.action.variant, ButtonVariant::Outline);
        assert_eq!(card.tooltip, None);
        assert_eq!(card.activate(), Activation::Open(card.id.clone()));
    }

    #[test]
    fn banner_coming_soon_card_has_disabled_notify() {
        let catalog = Catalog::builtin().unwrap();
        let renderer = renderer(KnownAssets::none(), DisplayMode::Banner);

        let card = renderer.render(catalog.get("4").unwrap());

        assert_eq!(card.badge.label, "Coming Soon");
        assert_eq!(card.badge.variant, BadgeVariant::Secondary);
        assert_eq!(card.action.label, "Notify Me");
        assert!(!card.action.enabled);
        assert_eq!(card.activate(), Activation::Ignored);
    }

    #[test]
    fn banner_missing_image_uses_placeholder() {
        let catalog = Catalog::builtin().unwrap();
        let renderer = renderer(KnownAssets::none(), DisplayMode::Banner);

        let card = renderer.render(catalog.get("2").unwrap());

        assert_eq!(
            card.media,
            Media::Placeholder {
                source: PLACEHOLDER.to_string()
            }
        );
        assert_eq!(card.description, catalog.get("2").unwrap().description());
    }

    #[test]
    fn avatar_missing_logo_uses_initials() {
        let catalog = Catalog::builtin().unwrap();
        let renderer = renderer(KnownAssets::none(), DisplayMode::Avatar);

        let card = renderer.render(catalog.get("2").unwrap());

        assert_eq!(
            card.media,
            Media::Initials {
                text: "CBU".to_string()
            }
        );
    }

    #[test]
    fn invalid_logo_path_on_disk_falls_back_to_initials() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("images")).unwrap();
        std::fs::write(tmp.path().join("images/vara.png"), b"\x89PNG").unwrap();

        let catalog = Catalog::builtin().unwrap();
        let renderer = CardRenderer::new(
            DirectoryAssets::new(tmp.path()),
            DisplayMode::Avatar,
            PLACEHOLDER,
            80,
        );

        let cards = renderer.render_all(&catalog);
        assert_eq!(
            cards[0].media,
            Media::Logo {
                source: "/images/vara.png".to_string()
            }
        );
        assert_eq!(
            cards[1].media,
            Media::Initials {
                text: "CBU".to_string()
            }
        );
    }

    #[test]
    fn avatar_ignores_status() {
        let catalog = Catalog::builtin().unwrap();
        let renderer = renderer(KnownAssets::none(), DisplayMode::Avatar);

        for card in renderer.render_all(&catalog) {
            assert_eq!(card.badge.label, "Coming Soon");
            assert_eq!(card.action.kind, ActionKind::NotifyMe);
            assert!(card.action.enabled);
            assert_eq!(card.activate(), Activation::NotifyRequested(card.id.clone()));
        }
    }

    #[test]
    fn avatar_truncates_description_and_keeps_full_text_in_tooltip() {
        let catalog = Catalog::builtin().unwrap();
        let renderer = renderer(KnownAssets::with(&["/images/vara.png"]), DisplayMode::Avatar);
        let listing = catalog.get("1").unwrap();

        let card = renderer.render(listing);

        assert!(card.description.ends_with('…'));
        assert!(card.description.chars().count() <= 41);
        assert_eq!(card.tooltip.as_deref(), Some(listing.description()));
        assert_eq!(
            card.media,
            Media::Logo {
                source: "/images/vara.png".to_string()
            }
        );
    }

    #[test]
    fn short_description_is_not_truncated() {
        assert_eq!(truncate("Short text", 40), None);
        assert_eq!(truncate("exactly", 7), None);
    }

    #[test]
    fn truncation_prefers_word_boundaries() {
        assert_eq!(
            truncate("Abu Dhabi Global Market", 12).as_deref(),
            Some("Abu Dhabi…")
        );
        assert_eq!(truncate("Supercalifragilistic", 5).as_deref(), Some("Super…"));
    }

    #[test]
    fn render_all_preserves_order() {
        let catalog = Catalog::builtin().unwrap();
        let renderer = renderer(KnownAssets::none(), DisplayMode::Banner);

        let ids: Vec<String> = renderer
            .render_all(&catalog)
            .into_iter()
            .map(|card| card.id.to_string())
            .collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn display_mode_toggles_and_parses() {
        assert_eq!(DisplayMode::Banner.toggled(), DisplayMode::Avatar);
        assert_eq!("AVATAR".parse::<DisplayMode>(), Ok(DisplayMode::Avatar));
        assert!("grid".parse::<DisplayMode>().is_err());
    }
}
