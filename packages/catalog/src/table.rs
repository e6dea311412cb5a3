//! HTTP client for the hosted restaurant table.
//!
//! Queries are SQL-like statements submitted as a URL parameter; results
//! come back as a JSON object with a `rows` array of column arrays. The
//! statement shapes here mirror what the store's grammar accepts: a
//! `CONTAINS IGNORING CASE` substring search ordered by danger score, and
//! an exact name/address lookup limited to one row.

use async_trait::async_trait;
use safebite_models::{FullRestaurant, Identity, PartialRestaurant};
use serde::Deserialize;

use crate::{CatalogError, RestaurantCatalog, escape_single_quote};

/// Connection settings for the hosted table.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Query endpoint URL.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Identifier of the restaurant table.
    pub table_id: String,
}

impl CatalogConfig {
    /// Reads settings from `SAFEBITE_API_URL`, `SAFEBITE_API_KEY`, and
    /// `SAFEBITE_TABLE`, with the production defaults where unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SAFEBITE_API_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/fusiontables/v2/query".to_string()),
            api_key: std::env::var("SAFEBITE_API_KEY").unwrap_or_default(),
            table_id: std::env::var("SAFEBITE_TABLE")
                .unwrap_or_else(|_| "1b9aRnr4iFSUJwi6_MsYcHsvZLLlSm8oJuaP8w0S_".to_string()),
        }
    }
}

/// Production [`RestaurantCatalog`] over the hosted table's HTTP API.
pub struct TableCatalog {
    client: reqwest::Client,
    config: CatalogConfig,
}

/// Response envelope from the query endpoint. `rows` is omitted entirely
/// when a query matches nothing.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    rows: Vec<Vec<serde_json::Value>>,
}

impl TableCatalog {
    /// Creates a client with the given connection settings.
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn run_statement(&self, statement: &str) -> Result<QueryResponse, CatalogError> {
        log::debug!("Catalog query: {statement}");
        let response = self
            .client
            .post(self.config.base_url.as_str())
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("sql", statement),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::MalformedQuery { message });
        }

        let response = response.error_for_status()?;
        Ok(response.json::<QueryResponse>().await?)
    }
}

#[async_trait]
impl RestaurantCatalog for TableCatalog {
    async fn query_partial(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<PartialRestaurant>, CatalogError> {
        let statement = search_statement(&self.config.table_id, filter);
        let response = self.run_statement(&statement).await?;
        log::info!("Search returned {} rows", response.rows.len());
        response.rows.iter().map(|row| partial_from_row(row)).collect()
    }

    async fn query_full(&self, identity: &Identity) -> Result<FullRestaurant, CatalogError> {
        let statement = lookup_statement(&self.config.table_id, identity);
        let response = self.run_statement(&statement).await?;
        match response.rows.as_slice() {
            [row] => full_from_row(row),
            _ => Err(CatalogError::NotFound {
                identity: identity.clone(),
            }),
        }
    }
}

/// Builds the substring-search statement. The store sorts; we do not.
fn search_statement(table_id: &str, filter: Option<&str>) -> String {
    let mut statement = format!("SELECT Location, Name, Address, CrimeCost FROM {table_id}");
    if let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) {
        statement.push_str(&format!(
            " WHERE Name CONTAINS IGNORING CASE '{}'",
            escape_single_quote(filter)
        ));
    }
    statement.push_str(" ORDER BY CrimeCost ASC");
    statement
}

/// Builds the exact-identity lookup statement.
fn lookup_statement(table_id: &str, identity: &Identity) -> String {
    format!(
        "SELECT * FROM {table_id} WHERE Name = '{}' AND Address = '{}' LIMIT 1",
        escape_single_quote(&identity.name),
        escape_single_quote(&identity.address)
    )
}

/// Decodes a `Location, Name, Address, CrimeCost` row.
fn partial_from_row(row: &[serde_json::Value]) -> Result<PartialRestaurant, CatalogError> {
    let [location, name, address, cost] = row else {
        return Err(CatalogError::MalformedRow {
            message: format!("expected 4 columns, got {}", row.len()),
        });
    };
    Ok(PartialRestaurant {
        location: column_str(location, "Location")?.parse()?,
        name: column_str(name, "Name")?.to_string(),
        address: column_str(address, "Address")?.to_string(),
        danger_score: column_f64(cost, "CrimeCost")?,
    })
}

/// Decodes a full `SELECT *` row:
/// `Location, Name, Date, Address, Description, CrimeCost, Crimes`.
fn full_from_row(row: &[serde_json::Value]) -> Result<FullRestaurant, CatalogError> {
    let [location, name, date, address, description, cost, crimes] = row else {
        return Err(CatalogError::MalformedRow {
            message: format!("expected 7 columns, got {}", row.len()),
        });
    };
    Ok(FullRestaurant {
        location: column_str(location, "Location")?.parse()?,
        name: column_str(name, "Name")?.to_string(),
        address: column_str(address, "Address")?.to_string(),
        danger_score: column_f64(cost, "CrimeCost")?,
        established: column_str(date, "Date")?.to_string(),
        description: column_str(description, "Description")?.to_string(),
        incident_log: column_str(crimes, "Crimes")?.to_string(),
    })
}

fn column_str<'a>(value: &'a serde_json::Value, column: &str) -> Result<&'a str, CatalogError> {
    value.as_str().ok_or_else(|| CatalogError::MalformedRow {
        message: format!("column {column} is not a string: {value}"),
    })
}

/// Numeric columns arrive as JSON numbers or quoted strings depending on
/// how the table was imported; accept both.
fn column_f64(value: &serde_json::Value, column: &str) -> Result<f64, CatalogError> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| CatalogError::MalformedRow {
            message: format!("column {column} is not numeric: {value}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_statement_filters_and_sorts_ascending() {
        let statement = search_statement("table-1", Some("pizza"));
        assert_eq!(
            statement,
            "SELECT Location, Name, Address, CrimeCost FROM table-1 \
             WHERE Name CONTAINS IGNORING CASE 'pizza' ORDER BY CrimeCost ASC"
        );
    }

    #[test]
    fn search_statement_escapes_embedded_quote() {
        let statement = search_statement("table-1", Some("Bob's"));
        assert!(statement.contains("CONTAINS IGNORING CASE 'Bob\\'s'"));
    }

    #[test]
    fn search_statement_without_filter_selects_everything() {
        let statement = search_statement("table-1", None);
        assert_eq!(
            statement,
            "SELECT Location, Name, Address, CrimeCost FROM table-1 ORDER BY CrimeCost ASC"
        );
        // Whitespace-only filters collapse to the same statement.
        assert_eq!(search_statement("table-1", Some("   ")), statement);
    }

    #[test]
    fn lookup_statement_limits_to_one_row() {
        let identity = Identity::new("Bob's Diner", "1 Main St");
        let statement = lookup_statement("table-1", &identity);
        assert_eq!(
            statement,
            "SELECT * FROM table-1 WHERE Name = 'Bob\\'s Diner' \
             AND Address = '1 Main St' LIMIT 1"
        );
    }

    #[test]
    fn decodes_partial_row_with_numeric_or_string_cost() {
        let row = serde_json::json!(["42.35, -71.06", "Test Kitchen", "1 Main St", 12.5]);
        let partial = partial_from_row(row.as_array().unwrap()).unwrap();
        assert_eq!(partial.name, "Test Kitchen");
        assert!((partial.danger_score - 12.5).abs() < f64::EPSILON);

        let row = serde_json::json!(["42.35, -71.06", "Test Kitchen", "1 Main St", "12.5"]);
        let partial = partial_from_row(row.as_array().unwrap()).unwrap();
        assert!((partial.danger_score - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_short_partial_row() {
        let row = serde_json::json!(["42.35, -71.06", "Test Kitchen"]);
        let err = partial_from_row(row.as_array().unwrap()).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedRow { .. }));
    }

    #[test]
    fn decodes_full_row() {
        let row = serde_json::json!([
            "42.35, -71.06",
            "Test Kitchen",
            "04/01/1998",
            "1 Main St",
            "Eating & Drinking",
            "12.5",
            "|01/01/2020~5~4"
        ]);
        let full = full_from_row(row.as_array().unwrap()).unwrap();
        assert_eq!(full.established, "04/01/1998");
        assert_eq!(full.incident_log, "|01/01/2020~5~4");
        assert!((full.danger_score - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_unparseable_location() {
        let row = serde_json::json!(["somewhere downtown", "Test Kitchen", "1 Main St", 1.0]);
        let err = partial_from_row(row.as_array().unwrap()).unwrap_err();
        assert!(matches!(err, CatalogError::Coordinate(_)));
    }

    #[test]
    fn empty_response_deserializes_without_rows_key() {
        let response: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.rows.is_empty());
    }
}
