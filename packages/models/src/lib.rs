#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Core data model for the restaurant safety catalog.
//!
//! Defines the two levels of completeness a catalog record can have
//! ([`PartialRestaurant`] from search results, [`FullRestaurant`] from a
//! direct lookup), the `(name, address)` identity used to correlate them,
//! and the per-incident weapon flag bitfield shared with the upstream
//! scoring pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Error returned when a `"lat, lng"` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateParseError {
    /// The string had no comma separator.
    #[error("missing ',' separator in coordinate string: {0:?}")]
    MissingSeparator(String),
    /// One of the two components was not a valid float.
    #[error("invalid coordinate component: {0:?}")]
    InvalidComponent(String),
}

impl std::str::FromStr for Coordinate {
    type Err = CoordinateParseError;

    /// Parses the upstream store's `"lat, lng"` column format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| CoordinateParseError::MissingSeparator(s.to_string()))?;
        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateParseError::InvalidComponent(lat.trim().to_string()))?;
        let longitude = lng
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateParseError::InvalidComponent(lng.trim().to_string()))?;
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// The `(name, address)` pair that identifies a restaurant in the catalog.
///
/// Assumed unique in practice; the upstream store treats a lookup matching
/// zero or more than one row as not found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Establishment name.
    pub name: String,
    /// Street address.
    pub address: String,
}

impl Identity {
    /// Creates an identity from name and address.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

/// The partial view of a restaurant returned by a catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialRestaurant {
    /// Map position.
    pub location: Coordinate,
    /// Establishment name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Danger score: 0 = no nearby incidents, unbounded above,
    /// visually clamped at 100.
    pub danger_score: f64,
}

impl PartialRestaurant {
    /// Returns the catalog identity for this record.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.name.clone(), self.address.clone())
    }
}

/// The full view of a restaurant: everything the catalog stores.
///
/// A strict superset of [`PartialRestaurant`] for the same identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullRestaurant {
    /// Map position.
    pub location: Coordinate,
    /// Establishment name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Danger score, same scale as the partial view.
    pub danger_score: f64,
    /// Establishment date as recorded in the licensing data.
    pub established: String,
    /// Free-text description of the establishment.
    pub description: String,
    /// Raw encoded incident log (`|date~type~flags` repeated).
    pub incident_log: String,
}

impl FullRestaurant {
    /// Returns the catalog identity for this record.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.name.clone(), self.address.clone())
    }

    /// Projects the full view down to its partial fields.
    #[must_use]
    pub fn to_partial(&self) -> PartialRestaurant {
        PartialRestaurant {
            location: self.location,
            name: self.name.clone(),
            address: self.address.clone(),
            danger_score: self.danger_score,
        }
    }
}

/// A catalog record at one of its two levels of completeness.
///
/// Search returns `Partial` records; a direct lookup yields `Full`. The
/// upgrade is one-way and idempotent: once a record is `Full` it stays
/// that way, and a second upgrade with the same data is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "view")]
pub enum Restaurant {
    /// Search-result view: location, name, address, danger score.
    Partial(PartialRestaurant),
    /// Complete catalog row, including the incident log.
    Full(FullRestaurant),
}

impl Restaurant {
    /// Returns the catalog identity regardless of view level.
    #[must_use]
    pub fn identity(&self) -> Identity {
        match self {
            Self::Partial(p) => p.identity(),
            Self::Full(f) => f.identity(),
        }
    }

    /// Establishment name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Partial(p) => &p.name,
            Self::Full(f) => &f.name,
        }
    }

    /// Street address.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::Partial(p) => &p.address,
            Self::Full(f) => &f.address,
        }
    }

    /// Danger score.
    #[must_use]
    pub const fn danger_score(&self) -> f64 {
        match self {
            Self::Partial(p) => p.danger_score,
            Self::Full(f) => f.danger_score,
        }
    }

    /// Map position.
    #[must_use]
    pub const fn location(&self) -> Coordinate {
        match self {
            Self::Partial(p) => p.location,
            Self::Full(f) => f.location,
        }
    }

    /// Whether this record has been upgraded to the full view.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    /// Upgrades a partial record to the full view.
    ///
    /// Idempotent: a record that is already `Full` is left untouched, so
    /// a duplicate fetch response cannot regress or replace the view.
    pub fn upgrade(&mut self, full: FullRestaurant) {
        if let Self::Partial(_) = self {
            *self = Self::Full(full);
        }
    }
}

/// Weapon category packed into the low two bits of an incident's flags.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponCategory {
    /// No weapon involved.
    Unarmed,
    /// A weapon the incident report did not classify.
    Other,
    /// Knife or other blade.
    Knife,
    /// Firearm.
    Firearm,
}

/// Per-incident weapon flag bitfield.
///
/// Bits 0-1 encode the [`WeaponCategory`]; bit 2 (value 4) records that a
/// shooting occurred, independent of the category bits. Both reads come
/// from the same integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WeaponFlags(pub u32);

impl WeaponFlags {
    const CATEGORY_MASK: u32 = 0b11;
    const SHOOTING_BIT: u32 = 0b100;

    /// The raw flag integer.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether any bit at all is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Weapon category from the low two bits.
    #[must_use]
    pub const fn category(self) -> WeaponCategory {
        match self.0 & Self::CATEGORY_MASK {
            1 => WeaponCategory::Other,
            2 => WeaponCategory::Knife,
            3 => WeaponCategory::Firearm,
            _ => WeaponCategory::Unarmed,
        }
    }

    /// Whether the shooting bit is set.
    #[must_use]
    pub const fn shooting(self) -> bool {
        self.0 & Self::SHOOTING_BIT != 0
    }
}

/// One parsed entry from a restaurant's raw incident log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Date the incident was reported.
    pub date: NaiveDate,
    /// Incident type code from the upstream report taxonomy.
    pub type_code: u32,
    /// Weapon flag bitfield.
    pub weapon_flags: WeaponFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_space_coordinate() {
        let c: Coordinate = "42.3522, -71.0552".parse().unwrap();
        assert!((c.latitude - 42.3522).abs() < f64::EPSILON);
        assert!((c.longitude - -71.0552).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_coordinate_without_comma() {
        let err = "42.3522 -71.0552".parse::<Coordinate>().unwrap_err();
        assert!(matches!(err, CoordinateParseError::MissingSeparator(_)));
    }

    #[test]
    fn rejects_non_numeric_coordinate() {
        let err = "north, -71.0552".parse::<Coordinate>().unwrap_err();
        assert!(matches!(err, CoordinateParseError::InvalidComponent(_)));
    }

    fn partial() -> PartialRestaurant {
        PartialRestaurant {
            location: Coordinate {
                latitude: 42.35,
                longitude: -71.06,
            },
            name: "Test Kitchen".to_string(),
            address: "1 Main St".to_string(),
            danger_score: 12.0,
        }
    }

    fn full() -> FullRestaurant {
        FullRestaurant {
            location: Coordinate {
                latitude: 42.35,
                longitude: -71.06,
            },
            name: "Test Kitchen".to_string(),
            address: "1 Main St".to_string(),
            danger_score: 12.0,
            established: "04/01/1998".to_string(),
            description: "Eating & Drinking".to_string(),
            incident_log: "|01/01/2020~5~4".to_string(),
        }
    }

    #[test]
    fn upgrade_is_one_way_and_idempotent() {
        let mut record = Restaurant::Partial(partial());
        record.upgrade(full());
        assert!(record.is_full());

        let mut second = full();
        second.description = "Changed".to_string();
        record.upgrade(second);
        match &record {
            Restaurant::Full(f) => assert_eq!(f.description, "Eating & Drinking"),
            Restaurant::Partial(_) => panic!("upgrade regressed to partial"),
        }
    }

    #[test]
    fn full_view_is_superset_of_partial() {
        assert_eq!(full().to_partial(), partial());
        assert_eq!(full().identity(), partial().identity());
    }

    #[test]
    fn weapon_flags_category_and_shooting_are_orthogonal() {
        // Category bits zero, shooting bit set.
        let flags = WeaponFlags(4);
        assert_eq!(flags.category(), WeaponCategory::Unarmed);
        assert!(flags.shooting());
        assert!(!flags.is_empty());

        // Firearm with shooting.
        let flags = WeaponFlags(7);
        assert_eq!(flags.category(), WeaponCategory::Firearm);
        assert!(flags.shooting());

        // Knife, no shooting.
        let flags = WeaponFlags(2);
        assert_eq!(flags.category(), WeaponCategory::Knife);
        assert!(!flags.shooting());

        assert!(WeaponFlags(0).is_empty());
    }
}
