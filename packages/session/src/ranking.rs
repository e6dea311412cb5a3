//! The top-10 ranking window derived from a match set.
//!
//! Rankings are a pure view: the match set stays in its store-given
//! ascending order, and flipping the direction only changes which slice
//! of it is rendered and in what order.

use safebite_models::Restaurant;
use safebite_score::{Rgb, color_for};
use serde::{Deserialize, Serialize};

/// How many rows the ranking window shows.
pub const WINDOW_SIZE: usize = 10;

/// One row of the ranking display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRow {
    /// The row's index in the original match set, not its display
    /// position. Selecting this row must address the same marker a
    /// direct map click on that entity would.
    pub index: usize,
    /// Establishment name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Safety swatch color for the row.
    pub color: Rgb,
}

/// Computes the ranking window over a match set.
///
/// Ascending ("safest first") takes the first `min(10, n)` entries in
/// order; descending takes the last `min(10, n)` entries reversed, so
/// the most dangerous entity leads.
#[must_use]
pub fn window(matches: &[Restaurant], ascending: bool) -> Vec<RankRow> {
    let take = WINDOW_SIZE.min(matches.len());
    let indices: Vec<usize> = if ascending {
        (0..take).collect()
    } else {
        (matches.len() - take..matches.len()).rev().collect()
    };

    indices
        .into_iter()
        .map(|index| {
            let entry = &matches[index];
            RankRow {
                index,
                name: entry.name().to_string(),
                address: entry.address().to_string(),
                color: color_for(entry.danger_score()),
            }
        })
        .collect()
}

/// Whether the ascending/descending control is worth showing.
///
/// Below a full window the two directions show identical or overlapping
/// rows, so the toggle is hidden.
#[must_use]
pub const fn sort_toggle_visible(match_count: usize) -> bool {
    match_count >= WINDOW_SIZE
}
