//! Display payload construction for the selected restaurant.
//!
//! The info display is built in up to two phases. A partial view renders
//! immediately with a placeholder where the incident narrative belongs; a
//! full view fills in the establishment line and the narrative. The
//! payload is structured data; the presentation layer owns all markup.

use safebite_models::{FullRestaurant, PartialRestaurant, Restaurant};
use safebite_score::{Rgb, color_for};
use serde::{Deserialize, Serialize};

/// Everything the presentation layer needs to render the info display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPayload {
    /// Establishment name.
    pub title: String,
    /// Description and establishment date line; absent until the full
    /// view arrives.
    pub subtitle: Option<String>,
    /// Street address.
    pub address: String,
    /// Raw danger score, shown alongside the swatch.
    pub danger_score: f64,
    /// Safety swatch color.
    pub color: Rgb,
    /// Incident narrative; `None` is the placeholder state while the
    /// full view is still loading.
    pub narrative: Option<String>,
}

impl DisplayPayload {
    /// Whether this payload is still waiting on the full view.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.narrative.is_none()
    }
}

/// Builds the immediately-renderable payload for a partial view.
#[must_use]
pub fn partial_payload(partial: &PartialRestaurant) -> DisplayPayload {
    DisplayPayload {
        title: partial.name.clone(),
        subtitle: None,
        address: partial.address.clone(),
        danger_score: partial.danger_score,
        color: color_for(partial.danger_score),
        narrative: None,
    }
}

/// Builds the complete payload for a full view, narrative included.
#[must_use]
pub fn full_payload(full: &FullRestaurant) -> DisplayPayload {
    DisplayPayload {
        title: full.name.clone(),
        subtitle: Some(format!("{}, EST {}", full.description, full.established)),
        address: full.address.clone(),
        danger_score: full.danger_score,
        color: color_for(full.danger_score),
        narrative: Some(safebite_summary::summarize(
            full.danger_score,
            &full.incident_log,
        )),
    }
}

/// Builds the best payload the record's view level allows.
#[must_use]
pub fn payload_for(record: &Restaurant) -> DisplayPayload {
    match record {
        Restaurant::Partial(partial) => partial_payload(partial),
        Restaurant::Full(full) => full_payload(full),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safebite_models::Coordinate;

    fn full() -> FullRestaurant {
        FullRestaurant {
            location: Coordinate {
                latitude: 42.35,
                longitude: -71.06,
            },
            name: "Test Kitchen".to_string(),
            address: "1 Main St".to_string(),
            danger_score: 10.0,
            established: "04/01/1998".to_string(),
            description: "Eating & Drinking".to_string(),
            incident_log: "|01/01/2020~5~4|02/02/2021~3~3".to_string(),
        }
    }

    #[test]
    fn partial_payload_is_placeholder() {
        let payload = partial_payload(&full().to_partial());
        assert!(payload.is_placeholder());
        assert_eq!(payload.title, "Test Kitchen");
        assert!(payload.subtitle.is_none());
        assert_eq!(payload.color, color_for(10.0));
    }

    #[test]
    fn full_payload_carries_subtitle_and_narrative() {
        let payload = full_payload(&full());
        assert!(!payload.is_placeholder());
        assert_eq!(
            payload.subtitle.as_deref(),
            Some("Eating & Drinking, EST 04/01/1998")
        );
        let narrative = payload.narrative.unwrap();
        assert!(narrative.contains("since 2020"), "{narrative}");
        assert!(narrative.contains("the suspect was armed"), "{narrative}");
    }

    #[test]
    fn payload_narrative_is_markup_free() {
        let payload = full_payload(&full());
        let narrative = payload.narrative.unwrap();
        assert!(!narrative.contains('<'));
        assert!(!narrative.contains('>'));
    }
}
