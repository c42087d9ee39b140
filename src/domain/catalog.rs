use std::collections::BTreeSet;

use crate::domain::{
    listing::{InvalidIdError, ListingId, Status},
    Listing,
};

/// Errors raised while assembling a catalog.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two listings share an identifier.
    #[error("Duplicate listing id '{0}'")]
    DuplicateId(ListingId),

    /// A listing identifier failed validation.
    #[error(transparent)]
    InvalidId(#[from] InvalidIdError),
}

/// An immutable, ordered sequence of listings.
///
/// Declaration order is display order. There is no mutation API: a catalog is
/// built once and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    listings: Vec<Listing>,
}

/// Built-in listing data in display order: id, title, description, asset,
/// status, authority.
const BUILTIN: [(&str, &str, &str, &str, Status, &str); 5] = [
    (
        "1",
        "VARA Rulebook",
        "Comprehensive regulations from the Virtual Assets Regulatory Authority (VARA) for \
         virtual assets in Dubai.",
        "/images/vara.png",
        Status::Subscribed,
        "VARA",
    ),
    (
        "2",
        "Central Bank UAE Regulations",
        "Official regulatory framework and guidelines from the UAE Central Bank.",
        "/images/central-bank.png",
        Status::Subscribed,
        "Central Bank UAE",
    ),
    (
        "3",
        "DFSA Rulebook",
        "Dubai Financial Services Authority comprehensive rules and regulations for the DIFC.",
        "/images/dfsa.png",
        Status::Subscribed,
        "DFSA",
    ),
    (
        "4",
        "SCA Regulations",
        "Securities and Commodities Authority guidelines for financial markets in the UAE.",
        "/images/sca.png",
        Status::ComingSoon,
        "SCA",
    ),
    (
        "5",
        "ADGM Rulebook",
        "Abu Dhabi Global Market financial regulations and legal framework.",
        "/images/adgm.png",
        Status::ComingSoon,
        "ADGM",
    ),
];

impl Catalog {
    /// Creates a catalog from listings in display order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two listings share an id.
    pub fn new(listings: Vec<Listing>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for listing in &listings {
            if !seen.insert(listing.id()) {
                return Err(CatalogError::DuplicateId(listing.id().clone()));
            }
        }
        Ok(Self { listings })
    }

    /// The compiled-in marketplace catalog.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in data violates the catalog invariants.
    pub fn builtin() -> Result<Self, CatalogError> {
        let listings = BUILTIN
            .iter()
            .map(|&(id, title, description, asset, status, authority)| {
                Ok(Listing::new(
                    ListingId::try_from(id)?,
                    title,
                    description,
                    asset,
                    status,
                    authority,
                ))
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        Self::new(listings)
    }

    /// All listings in display order.
    #[must_use]
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Looks up a listing by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id().as_str() == id)
    }

    /// Number of listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the catalog has no listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Listing;
    type IntoIter = std::slice::Iter<'a, Listing>;

    fn into_iter(self) -> Self::IntoIter {
        self.listings.iter()
    }
}
