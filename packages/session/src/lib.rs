#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! The interactive search session controller.
//!
//! [`SessionState`] owns everything one search session mutates: the
//! current match set, the marker/index correspondence, the ranking
//! direction, the identity of the entity whose info display is open, and
//! the set of in-flight full-view fetches. The controller is confined to
//! a single thread (the UI event loop); all methods take `&mut self` and
//! no locking exists anywhere.
//!
//! Asynchronous full-view fetches are fire-and-forget with a guard: the
//! controller hands out [`FetchRequest`]s, the caller performs them, and
//! [`SessionState::resolve_full_view`] drops any response whose identity
//! no longer matches the open entity.

pub mod display;
pub mod ranking;

use std::collections::HashSet;

use safebite_catalog::{CatalogError, RestaurantCatalog};
use safebite_models::{Coordinate, FullRestaurant, Identity, Restaurant};
use safebite_score::{Rgb, color_for};
use serde::{Deserialize, Serialize};

pub use display::DisplayPayload;
pub use ranking::{RankRow, WINDOW_SIZE};

/// A marker to place on the map for one match-set entry.
///
/// Markers are index-addressed: the presentation layer keeps them in
/// match-set order and routes clicks and hovers back through the index,
/// so no per-marker closures are needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    /// Index of the entity in the match set.
    pub index: usize,
    /// Map position.
    pub position: Coordinate,
    /// Hover title.
    pub title: String,
    /// Pin fill color from the danger score.
    pub color: Rgb,
}

/// Outcome of submitting a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchUpdate {
    /// Empty or whitespace-only query: the previous match set and its
    /// markers are gone and the map reverts to showing the full catalog.
    FullCatalog,
    /// A new match set replaced the old one. The old markers were
    /// discarded before `markers` was built; the presentation layer must
    /// apply the teardown in the same order.
    Matches {
        /// One marker per match-set entry, in match-set order.
        markers: Vec<MarkerSpec>,
        /// The ranking window, ascending (safest first).
        rankings: Vec<RankRow>,
        /// Whether to show the ascending/descending control.
        sort_toggle_visible: bool,
    },
}

/// Outcome of selecting an entity from the map or the rankings.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Immediately-renderable payload. A placeholder when the full view
    /// has not been fetched yet.
    pub payload: DisplayPayload,
    /// Set when the caller must fetch the full view. Absent when the
    /// record is already full or the same fetch is still in flight.
    pub fetch: Option<FetchRequest>,
}

/// A full-view fetch the caller owes the session.
///
/// Resolve it with [`SessionState::resolve_full_view`] on success or
/// [`SessionState::fetch_failed`] on error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Identity to look up.
    pub identity: Identity,
}

/// All mutable state of one search session.
#[derive(Debug)]
pub struct SessionState {
    /// Current match set; `None` means no active search (full-catalog
    /// mode).
    matches: Option<Vec<Restaurant>>,
    /// Ranking direction; ascending (safest first) is the default.
    ascending: bool,
    /// Identity of the entity whose info display is open.
    open: Option<Identity>,
    /// Identities with a full-view fetch in flight.
    pending: HashSet<Identity>,
    /// Match-set index of the marker currently hovered in the rankings.
    highlight: Option<usize>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Creates a fresh session in full-catalog mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matches: None,
            ascending: true,
            open: None,
            pending: HashSet::new(),
            highlight: None,
        }
    }

    /// Submits a search query.
    ///
    /// The previous match set, its markers, its pending fetches, and the
    /// open info display are all discarded before anything new is built,
    /// so stale state can never leak across searches. An empty query
    /// reverts to full-catalog mode instead of producing a match set.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the catalog query fails; the session
    /// stays in the cleared state so the caller shows an empty result.
    pub async fn on_search_submit(
        &mut self,
        query: &str,
        catalog: &dyn RestaurantCatalog,
    ) -> Result<SearchUpdate, CatalogError> {
        // Teardown before create: the old markers must be gone before
        // new ones exist, or overlapping map state double-handles clicks.
        self.clear();

        let query = query.trim();
        if query.is_empty() {
            log::info!("Empty query; reverting to full catalog");
            return Ok(SearchUpdate::FullCatalog);
        }

        let rows = catalog.query_partial(Some(query)).await?;
        log::info!("Search {query:?} matched {} restaurants", rows.len());

        let matches: Vec<Restaurant> = rows.into_iter().map(Restaurant::Partial).collect();
        let markers = build_markers(&matches);
        let rankings = ranking::window(&matches, self.ascending);
        let sort_toggle_visible = ranking::sort_toggle_visible(matches.len());
        self.matches = Some(matches);

        Ok(SearchUpdate::Matches {
            markers,
            rankings,
            sort_toggle_visible,
        })
    }

    /// Flips the ranking direction and returns the recomputed window.
    ///
    /// Only the derived view changes; the match set itself is untouched.
    pub fn on_direction_toggle(&mut self, ascending: bool) -> Vec<RankRow> {
        self.ascending = ascending;
        self.rankings()
    }

    /// The current ranking window (empty when no search is active).
    #[must_use]
    pub fn rankings(&self) -> Vec<RankRow> {
        self.matches
            .as_deref()
            .map(|matches| ranking::window(matches, self.ascending))
            .unwrap_or_default()
    }

    /// Whether the direction control should be shown.
    #[must_use]
    pub fn sort_toggle_visible(&self) -> bool {
        self.matches
            .as_deref()
            .is_some_and(|matches| ranking::sort_toggle_visible(matches.len()))
    }

    /// Number of entities in the current match set.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.matches.as_deref().map_or(0, <[Restaurant]>::len)
    }

    /// Selects the entity at a match-set index, from either a ranking
    /// row or its marker; both address the same record.
    ///
    /// Returns `None` for an out-of-range index (e.g. a click racing a
    /// match-set replacement). A partial record produces a placeholder
    /// payload plus at most one [`FetchRequest`] per identity: clicking
    /// a still-loading entity again does not duplicate the fetch.
    pub fn on_entity_select(&mut self, index: usize) -> Option<Selection> {
        let record = self.matches.as_deref()?.get(index)?;
        let identity = record.identity();
        let payload = display::payload_for(record);

        let fetch = if record.is_full() {
            None
        } else if self.pending.insert(identity.clone()) {
            Some(FetchRequest {
                identity: identity.clone(),
            })
        } else {
            log::debug!("Fetch already in flight for {identity}");
            None
        };

        self.open = Some(identity);
        Some(Selection { payload, fetch })
    }

    /// Delivers a resolved full view.
    ///
    /// The stale-response guard: if the user has navigated away (a
    /// different entity is open, the match set was replaced, or the
    /// query was cleared) the response is dropped silently and the
    /// display left alone. On a match the record is upgraded in place
    /// (idempotent) and the complete payload returned.
    pub fn resolve_full_view(
        &mut self,
        identity: &Identity,
        full: FullRestaurant,
    ) -> Option<DisplayPayload> {
        self.pending.remove(identity);

        if self.open.as_ref() != Some(identity) {
            log::debug!("Dropping stale full view for {identity}");
            return None;
        }

        let record = self
            .matches
            .as_deref_mut()?
            .iter_mut()
            .find(|r| r.identity() == *identity)?;
        record.upgrade(full);
        Some(display::payload_for(record))
    }

    /// Records a failed full-view fetch.
    ///
    /// The placeholder payload stays on screen; a later re-selection of
    /// the entity issues a fresh fetch.
    pub fn fetch_failed(&mut self, identity: &Identity) {
        log::warn!("Full-view fetch failed for {identity}; keeping placeholder");
        self.pending.remove(identity);
    }

    /// Starts the transient highlight for a hovered ranking row/marker.
    pub fn on_marker_hover(&mut self, index: usize) {
        if index < self.match_count() {
            self.highlight = Some(index);
        }
    }

    /// Ends the transient highlight, if it is still on this marker.
    pub fn on_marker_unhover(&mut self, index: usize) {
        if self.highlight == Some(index) {
            self.highlight = None;
        }
    }

    /// The currently highlighted match-set index, if any.
    #[must_use]
    pub const fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// Discards the match set and everything keyed off it.
    fn clear(&mut self) {
        self.matches = None;
        self.open = None;
        self.pending.clear();
        self.highlight = None;
        self.ascending = true;
    }
}

/// Builds one marker per match-set entry, pin color from danger score.
fn build_markers(matches: &[Restaurant]) -> Vec<MarkerSpec> {
    matches
        .iter()
        .enumerate()
        .map(|(index, record)| MarkerSpec {
            index,
            position: record.location(),
            title: record.name().to_string(),
            color: color_for(record.danger_score()),
        })
        .collect()
}
