//! Domain models for the marketplace.
//!
//! This module contains the listing record, the compiled-in catalog and the
//! search filter over it.

/// Listing records and their identifiers.
pub mod listing;
pub use listing::{Listing, ListingId, Status};

/// The compiled-in catalog of listings.
pub mod catalog;
pub use catalog::{Catalog, CatalogError};

/// Case-insensitive substring search over listings.
pub mod filter;
pub use filter::{filter, Query};
