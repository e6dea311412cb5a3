#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Restaurant catalog collaborator: the upstream tabular data store.
//!
//! The catalog lives in a hosted table queried over HTTP with a small
//! SQL-like grammar. This crate defines the [`RestaurantCatalog`] trait
//! the rest of the system programs against, and [`table::TableCatalog`],
//! the production implementation over that store. The store does the
//! filtering and sorting; results come back already ordered ascending by
//! danger score and are never re-sorted locally.

pub mod table;

use async_trait::async_trait;
use safebite_models::{CoordinateParseError, FullRestaurant, Identity, PartialRestaurant};

/// Errors that can occur while talking to the catalog store.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row's location column could not be parsed.
    #[error("Coordinate parse error: {0}")]
    Coordinate(#[from] CoordinateParseError),

    /// The store rejected the query statement.
    #[error("Malformed query: {message}")]
    MalformedQuery {
        /// The store's description of the problem.
        message: String,
    },

    /// A full-view lookup matched zero rows (or more than one, which the
    /// store treats the same way).
    #[error("No unique catalog row for {identity}")]
    NotFound {
        /// The identity that failed to resolve.
        identity: Identity,
    },

    /// A row was present but missing expected columns.
    #[error("Malformed catalog row: {message}")]
    MalformedRow {
        /// Description of what was missing.
        message: String,
    },
}

/// Abstract interface to the upstream restaurant table.
///
/// Implementations own the transport; callers own the interpretation of
/// results (match sets, rankings, display payloads).
#[async_trait]
pub trait RestaurantCatalog: Send + Sync {
    /// Fetches partial views matching a case-insensitive name substring,
    /// sorted ascending by danger score by the store itself.
    ///
    /// A `None` or empty filter means the caller wants full-catalog mode;
    /// implementations return every partial view.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the request or row decoding fails.
    async fn query_partial(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<PartialRestaurant>, CatalogError>;

    /// Fetches the full view for one identity.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the identity does not
    /// resolve to exactly one row, or another [`CatalogError`] on
    /// transport/decoding failure.
    async fn query_full(&self, identity: &Identity) -> Result<FullRestaurant, CatalogError>;
}

/// Escapes a single quote for embedding a value in a query statement.
///
/// Only the first occurrence is escaped, matching the store's observed
/// tolerance for the catalog's data. Known gap: a value with two or more
/// quotes still produces a statement the store may reject with
/// [`CatalogError::MalformedQuery`].
#[must_use]
pub fn escape_single_quote(value: &str) -> String {
    value.replacen('\'', "\\'", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_first_single_quote() {
        assert_eq!(escape_single_quote("Bob's Diner"), "Bob\\'s Diner");
    }

    #[test]
    fn leaves_quoteless_values_alone() {
        assert_eq!(escape_single_quote("Pizza Palace"), "Pizza Palace");
    }

    #[test]
    fn escapes_only_the_first_of_multiple_quotes() {
        // Documented limitation, kept as-is.
        assert_eq!(escape_single_quote("o''brien"), "o\\''brien");
    }
}
