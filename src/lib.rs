//! Knowledge Base Marketplace
//!
//! A searchable grid of regulatory knowledge base listings. The listings are
//! compiled in; the library filters them against a free-text query and turns
//! the visible subset into presentation-ready cards.

pub mod domain;
pub use domain::{Catalog, CatalogError, Listing, ListingId, Status};

mod config;
pub use config::{Config, ConfigError};

/// View state, card rendering and screen composition.
pub mod view;
pub use view::{Card, CardRenderer, DisplayMode, LoadingGate, Screen, ViewState};
