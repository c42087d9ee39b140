use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// A validated, non-empty listing identifier.
///
/// Identifiers are stable across renders and are used as the render key of a
/// card. Surrounding whitespace is rejected rather than trimmed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListingId(NonEmptyString);

impl ListingId {
    /// Creates a new `ListingId`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdError` if the string is empty or contains
    /// whitespace.
    pub fn new(s: String) -> Result<Self, InvalidIdError> {
        if s.chars().any(char::is_whitespace) {
            return Err(InvalidIdError(s));
        }
        NonEmptyString::new(s).map(Self).map_err(InvalidIdError)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ListingId {
    type Error = InvalidIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ListingId {
    type Error = InvalidIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<ListingId> for String {
    fn from(id: ListingId) -> Self {
        id.as_str().to_string()
    }
}

impl FromStr for ListingId {
    type Err = InvalidIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl Deref for ListingId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a listing identifier is empty or contains whitespace.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid listing id '{0}': must be non-empty and contain no whitespace")]
pub struct InvalidIdError(String);

/// Subscription state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The knowledge base can be opened.
    Subscribed,
    /// The knowledge base is announced but not yet available.
    ComingSoon,
}

impl Status {
    /// Text shown on the status badge.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Subscribed => "Subscribed",
            Self::ComingSoon => "Coming Soon",
        }
    }

    /// Whether the listing is subscribed.
    #[must_use]
    pub const fn is_subscribed(self) -> bool {
        matches!(self, Self::Subscribed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Subscribed => "subscribed",
            Self::ComingSoon => "coming_soon",
        })
    }
}

/// A single marketplace entry representing a subscribable knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    id: ListingId,
    title: String,
    description: String,
    /// Image (banner) or logo (avatar) path. Both names refer to the same
    /// asset.
    #[serde(rename = "image", alias = "logo")]
    asset: String,
    status: Status,
    authority: String,
}

impl Listing {
    /// Creates a listing.
    #[must_use]
    pub fn new(
        id: ListingId,
        title: impl Into<String>,
        description: impl Into<String>,
        asset: impl Into<String>,
        status: Status,
        authority: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            asset: asset.into(),
            status,
            authority: authority.into(),
        }
    }

    /// The listing's identifier.
    #[must_use]
    pub const fn id(&self) -> &ListingId {
        &self.id
    }

    /// Display name of the rulebook.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-text summary.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Path of the image or logo asset.
    #[must_use]
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Subscription state.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Short name of the issuing regulator.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(""; "empty")]
    #[test_case(" 1"; "leading whitespace")]
    #[test_case("a b"; "inner whitespace")]
    fn invalid_ids_are_rejected(value: &str) {
        assert!(ListingId::try_from(value).is_err());
    }

    #[test]
    fn id_displays_as_given() {
        let id = ListingId::try_from("vara-1").unwrap();
        assert_eq!(id.to_string(), "vara-1");
        assert_eq!(&*id, "vara-1");
    }

    #[test]
    fn status_uses_snake_case_on_the_wire() {
        let json = serde_json::to_string(&Status::ComingSoon).unwrap();
        assert_eq!(json, "\"coming_soon\"");

        let status: Status = serde_json::from_str("\"subscribed\"").unwrap();
        assert_eq!(status, Status::Subscribed);
    }

    #[test]
    fn logo_is_accepted_as_asset_alias() {
        let json = r#"{
            "id": "2",
            "title": "Central Bank UAE Regulations",
            "description": "Official regulatory framework.",
            "logo": "/logos/central-bank.png",
            "status": "coming_soon",
            "authority": "Central Bank UAE"
        }"#;

        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.asset(), "/logos/central-bank.png");
        assert_eq!(listing.status(), Status::ComingSoon);
    }

    #[test]
    fn empty_id_fails_deserialization() {
        let json = r#"{
            "id": "",
            "title": "t",
            "description": "d",
            "image": "/i.png",
            "status": "subscribed",
            "authority": "A"
        }"#;

        assert!(serde_json::from_str::<Listing>(json).is_err());
    }
}
