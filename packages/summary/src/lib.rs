#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident log parsing and the per-restaurant risk narrative.
//!
//! The catalog stores each restaurant's nearby incidents as a compact
//! encoded string: a `|`-separated list with an empty leading token, each
//! entry `date~typeCode~weaponFlags`. This crate decodes that string into
//! [`IncidentRecord`]s and composes the human-readable summary shown in
//! the info display.
//!
//! Parsing never fails: malformed entries are skipped with a warning, and
//! a log that yields no records degrades to the zero-crime sentence.

use chrono::{Datelike, NaiveDate};
use safebite_models::{IncidentRecord, WeaponCategory, WeaponFlags};

/// Incident dates use the upstream report's `MM/DD/YYYY` format.
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Sentence used whenever there is nothing to report.
const NO_CRIMES: &str = "There are 0 crimes reported within 100 meters of this establishment";

/// Decodes a raw incident log into structured records.
///
/// The first `|`-delimited token is the empty leading token and is
/// discarded. Entries that do not split into three `~`-separated fields,
/// or whose date or integers fail to parse, are skipped with a warning
/// rather than failing the whole log.
#[must_use]
pub fn parse(raw_log: &str) -> Vec<IncidentRecord> {
    raw_log
        .split('|')
        .skip(1)
        .filter_map(|entry| match parse_entry(entry) {
            Some(record) => Some(record),
            None => {
                log::warn!("Skipping malformed incident entry: {entry:?}");
                None
            }
        })
        .collect()
}

fn parse_entry(entry: &str) -> Option<IncidentRecord> {
    let mut fields = entry.split('~');
    let date = NaiveDate::parse_from_str(fields.next()?, DATE_FORMAT).ok()?;
    let type_code = fields.next()?.trim().parse::<u32>().ok()?;
    let weapon_flags = WeaponFlags(fields.next()?.trim().parse::<u32>().ok()?);
    Some(IncidentRecord {
        date,
        type_code,
        weapon_flags,
    })
}

/// Weapon tallies accumulated over one restaurant's incident records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct WeaponTally {
    weapon_crimes: u32,
    gun_crimes: u32,
    knife_crimes: u32,
    shootings: u32,
}

impl WeaponTally {
    fn from_records(records: &[IncidentRecord]) -> Self {
        let mut tally = Self::default();
        for record in records {
            let flags = record.weapon_flags;
            // The shooting bit is orthogonal to the category bits and is
            // counted even for records with no weapon category.
            if flags.shooting() {
                tally.shootings += 1;
            }
            if flags.is_empty() {
                continue;
            }
            tally.weapon_crimes += 1;
            match flags.category() {
                WeaponCategory::Knife => tally.knife_crimes += 1,
                WeaponCategory::Firearm => tally.gun_crimes += 1,
                // Unclassified weapon types count toward weapon_crimes
                // but get no clause of their own.
                WeaponCategory::Unarmed | WeaponCategory::Other => {}
            }
        }
        tally
    }
}

/// Composes the risk narrative for a restaurant's info display.
///
/// A zero danger score short-circuits to the fixed zero-crime sentence
/// without touching the log. Otherwise the narrative opens with the
/// incident count and the year of the first record in the log (the
/// upstream store emits incidents in chronological order, so that is the
/// oldest), then appends weapon clauses only for the categories that
/// actually occurred.
#[must_use]
pub fn summarize(danger_score: f64, raw_log: &str) -> String {
    if danger_score == 0.0 {
        return NO_CRIMES.to_string();
    }

    let records = parse(raw_log);
    let Some(first) = records.first() else {
        log::warn!("Non-zero danger score with an unreadable incident log");
        return NO_CRIMES.to_string();
    };

    let oldest_year = first.date.year();
    let count = records.len();
    let tally = WeaponTally::from_records(&records);

    let mut narrative = format!(
        "There have been {count} crimes reported within 100 meters of this establishment since {oldest_year}"
    );

    if tally.weapon_crimes == 0 {
        narrative.push_str(", none of which involved weapons.");
        return narrative;
    }

    narrative.push_str(&format!(
        ". In {} of those, the suspect was armed",
        tally.weapon_crimes
    ));
    if tally.shootings > 0 {
        narrative.push_str(&format!(
            ", and in {} of those, there was shooting",
            tally.shootings
        ));
    }
    narrative.push_str(". ");
    if tally.gun_crimes > 0 {
        narrative.push_str(&format!(
            "In {}, the suspect had a firearm. ",
            tally.gun_crimes
        ));
    }
    if tally.knife_crimes > 0 {
        narrative.push_str(&format!("In {}, the suspect had a knife.", tally.knife_crimes));
    }

    narrative.trim_end().to_string()
}
