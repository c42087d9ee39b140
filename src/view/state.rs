use std::time::{Duration, Instant};

use crate::{
    domain::{Catalog, Listing, Query},
    view::LoadingGate,
};

/// The mutable state of one mounted marketplace screen.
///
/// Holds the loading gate and the search query and nothing else. The listing
/// data is passed in explicitly, so the state can be exercised without any
/// view. After [`ViewState::unmount`] every update is ignored.
#[derive(Debug, Clone)]
pub struct ViewState {
    gate: LoadingGate,
    query: Query,
    mounted: bool,
}

impl ViewState {
    /// Mounts a screen whose loading gate opens `delay` after `now`.
    #[must_use]
    pub fn mount(delay: Duration, now: Instant) -> Self {
        Self {
            gate: LoadingGate::new(delay, now),
            query: Query::default(),
            mounted: true,
        }
    }

    /// Mounts a screen that skips the loading phase.
    #[must_use]
    pub fn ready() -> Self {
        Self {
            gate: LoadingGate::open(),
            query: Query::default(),
            mounted: true,
        }
    }

    /// The loading gate.
    #[must_use]
    pub const fn gate(&self) -> &LoadingGate {
        &self.gate
    }

    /// Whether the loading indicator is shown.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.gate.is_loading()
    }

    /// Whether the screen is still mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The current search query.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Advances the loading gate. Returns `true` on the poll that opens it.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.gate.poll(now)
    }

    /// Replaces the search query.
    pub fn set_query(&mut self, text: impl Into<String>) {
        if !self.mounted {
            tracing::trace!("ignoring query update after unmount");
            return;
        }
        self.query = Query::new(text);
        tracing::debug!(query = self.query.as_str(), "query updated");
    }

    /// Resets the search query to empty, restoring the full listing.
    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// Tears the screen down. Pending gate polls become no-ops.
    pub fn unmount(&mut self) {
        self.gate.disarm();
        self.mounted = false;
    }

    /// The listings visible under the current query, in catalog order.
    #[must_use]
    pub fn visible<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Listing> {
        self.query.apply(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(800);

    #[test]
    fn starts_loading_with_empty_query() {
        let state = ViewState::mount(DELAY, Instant::now());
        assert!(state.is_loading());
        assert!(state.query().is_empty());
    }

    #[test]
    fn query_updates_refilter() {
        let catalog = Catalog::builtin().unwrap();
        let mut state = ViewState::ready();

        state.set_query("vara");
        let visible = state.visible(&catalog);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].authority(), "VARA");
    }

    #[test]
    fn clearing_the_query_restores_everything() {
        let catalog = Catalog::builtin().unwrap();
        let mut state = ViewState::ready();

        state.set_query("zzz");
        assert!(state.visible(&catalog).is_empty());

        state.clear_query();
        assert_eq!(state.query().as_str(), "");
        assert_eq!(state.visible(&catalog).len(), catalog.len());
    }

    #[test]
    fn no_updates_after_unmount() {
        let mounted = Instant::now();
        let mut state = ViewState::mount(DELAY, mounted);
        state.set_query("dfsa");

        state.unmount();

        assert!(!state.poll(mounted + DELAY * 2));
        assert!(state.is_loading());

        state.set_query("adgm");
        assert_eq!(state.query().as_str(), "dfsa");
        assert!(!state.is_mounted());
    }

    #[test]
    fn query_and_gate_are_independent() {
        let mounted = Instant::now();
        let mut state = ViewState::mount(DELAY, mounted);

        state.set_query("sca");
        assert!(state.is_loading());

        assert!(state.poll(mounted + DELAY));
        assert_eq!(state.query().as_str(), "sca");
    }
}
