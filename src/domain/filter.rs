use crate::domain::Listing;

/// A free-text search query.
///
/// Matching is a case-insensitive substring test against the title, the
/// description and the authority of a listing. A listing matches if any one
/// of the three fields contains the query. The empty query matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    raw: String,
    folded: String,
}

impl Query {
    /// Creates a query from user input. The input is not trimmed.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    /// The query as typed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the query is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Tests a single listing.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        if self.folded.is_empty() {
            return true;
        }

        [listing.title(), listing.description(), listing.authority()]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&self.folded))
    }

    /// Returns the matching listings, preserving their relative order.
    #[must_use]
    pub fn apply<'a, I>(&self, listings: I) -> Vec<&'a Listing>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        listings
            .into_iter()
            .filter(|listing| self.matches(listing))
            .collect()
    }
}

/// Filters `listings` by `query`.
///
/// The result is an order-preserving subsequence of `listings`; an empty
/// query returns every listing.
#[must_use]
pub fn filter<'a>(listings: &'a [Listing], query: &str) -> Vec<&'a Listing> {
    Query::new(query).apply(listings)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{Catalog, ListingId, Status};

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn ids<'a>(listings: &[&'a Listing]) -> Vec<&'a str> {
        listings.iter().map(|l| l.id().as_str()).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let catalog = catalog();
        let result = filter(catalog.listings(), "");
        let expected: Vec<&Listing> = catalog.listings().iter().collect();
        assert_eq!(result, expected);
    }

    #[test_case("vara", &["1"]; "authority match ignores case")]
    #[test_case("VARA RULEBOOK", &["1"]; "title match ignores case")]
    #[test_case("rulebook", &["1", "3", "5"]; "title token")]
    #[test_case("dubai", &["1", "3"]; "description only")]
    #[test_case("uae", &["2", "4"]; "across fields")]
    #[test_case("regulations", &["1", "2", "3", "4", "5"]; "title or description")]
    #[test_case("zzz", &[]; "no match")]
    fn matches_builtin_catalog(query: &str, expected: &[&str]) {
        let catalog = catalog();
        assert_eq!(ids(&filter(catalog.listings(), query)), expected);
    }

    #[test]
    fn query_is_not_trimmed() {
        let catalog = catalog();
        assert!(filter(catalog.listings(), " vara ").is_empty());
        assert_eq!(ids(&filter(catalog.listings(), "(vara)")), ["1"]);
    }

    #[test]
    fn match_in_any_single_field_is_sufficient() {
        let only_authority = Listing::new(
            ListingId::try_from("a").unwrap(),
            "Alpha",
            "Nothing here",
            "/a.png",
            Status::ComingSoon,
            "Needle Agency",
        );
        let no_field = Listing::new(
            ListingId::try_from("b").unwrap(),
            "Beta",
            "Nothing here either",
            "/b.png",
            Status::ComingSoon,
            "Other",
        );

        let query = Query::new("NEEDLE");
        assert!(query.matches(&only_authority));
        assert!(!query.matches(&no_field));
    }

    #[test]
    fn results_are_an_ordered_subsequence_containing_the_query() {
        let catalog = catalog();
        let all = catalog.listings();

        for query in ["a", "Au", "the", "market", "rules", "DIFC", "x", ""] {
            let result = filter(all, query);

            // Relative order matches the source.
            let positions: Vec<usize> = result
                .iter()
                .map(|l| all.iter().position(|c| c.id() == l.id()).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "{query}");

            // Every hit contains the query in at least one field.
            let needle = query.to_lowercase();
            for listing in result {
                assert!(
                    listing.title().to_lowercase().contains(&needle)
                        || listing.description().to_lowercase().contains(&needle)
                        || listing.authority().to_lowercase().contains(&needle),
                    "{query} -> {}",
                    listing.id()
                );
            }
        }
    }

    #[test]
    fn non_ascii_queries_fold_case() {
        let listing = Listing::new(
            ListingId::try_from("z").unwrap(),
            "ÉCOLE Rulebook",
            "",
            "/z.png",
            Status::Subscribed,
            "Zürich",
        );
        assert!(Query::new("école").matches(&listing));
        assert!(Query::new("ZÜRICH").matches(&listing));
    }
}
