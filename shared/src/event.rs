use serde::{Deserialize, Serialize};

use crate::capabilities::{FullscreenResult, GeolocationResult, MapsError};
use crate::config::StartupConfig;
use crate::model::{LatLng, RequestToken};
use crate::route::{DirectionsResponse, GeocodeResponse, PlaceRecord, Prediction};

/// Which of the two location inputs an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationField {
    Start,
    End,
}

impl LocationField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // --- Lifecycle ---
    Start(StartupConfig),
    MapSurfaceReady,

    // --- Input panel ---
    LocationTyped {
        field: LocationField,
        text: String,
    },
    PlaceSelected {
        field: LocationField,
        place: PlaceRecord,
    },
    SuggestionChosen {
        field: LocationField,
        index: usize,
    },
    EnergyTyped {
        text: String,
    },
    LocateMeRequested,
    CalculateRouteRequested,

    // --- Layout ---
    FullscreenToggled,
    FullscreenChanged {
        active: bool,
    },

    // --- Capability completions (never sent by the shell) ---
    #[serde(skip)]
    SdkLoaded(Result<(), MapsError>),
    #[serde(skip)]
    SuggestionsFetched {
        field: LocationField,
        token: RequestToken,
        result: Result<Vec<Prediction>, MapsError>,
    },
    #[serde(skip)]
    PlaceDetailsFetched {
        field: LocationField,
        token: RequestToken,
        result: Result<PlaceRecord, MapsError>,
    },
    #[serde(skip)]
    PositionReceived {
        token: RequestToken,
        result: GeolocationResult,
    },
    #[serde(skip)]
    AddressResolved {
        token: RequestToken,
        location: LatLng,
        result: Result<GeocodeResponse, MapsError>,
    },
    #[serde(skip)]
    RouteComputed {
        token: RequestToken,
        result: Result<DirectionsResponse, MapsError>,
    },
    #[serde(skip)]
    FullscreenEntered(FullscreenResult),
    #[serde(skip)]
    FullscreenExited(FullscreenResult),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::MapSurfaceReady => "map_surface_ready",
            Self::LocationTyped { .. } => "location_typed",
            Self::PlaceSelected { .. } => "place_selected",
            Self::SuggestionChosen { .. } => "suggestion_chosen",
            Self::EnergyTyped { .. } => "energy_typed",
            Self::LocateMeRequested => "locate_me_requested",
            Self::CalculateRouteRequested => "calculate_route_requested",
            Self::FullscreenToggled => "fullscreen_toggled",
            Self::FullscreenChanged { .. } => "fullscreen_changed",
            Self::SdkLoaded(_) => "sdk_loaded",
            Self::SuggestionsFetched { .. } => "suggestions_fetched",
            Self::PlaceDetailsFetched { .. } => "place_details_fetched",
            Self::PositionReceived { .. } => "position_received",
            Self::AddressResolved { .. } => "address_resolved",
            Self::RouteComputed { .. } => "route_computed",
            Self::FullscreenEntered(_) => "fullscreen_entered",
            Self::FullscreenExited(_) => "fullscreen_exited",
        }
    }

    /// Events that only make sense once the mapping SDK is up and the panel is shown.
    #[must_use]
    pub const fn requires_ready_sdk(&self) -> bool {
        matches!(
            self,
            Self::LocationTyped { .. }
                | Self::PlaceSelected { .. }
                | Self::SuggestionChosen { .. }
                | Self::EnergyTyped { .. }
                | Self::LocateMeRequested
                | Self::CalculateRouteRequested
                | Self::FullscreenToggled
                | Self::MapSurfaceReady
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_gated_classification() {
        assert!(Event::CalculateRouteRequested.requires_ready_sdk());
        assert!(Event::LocateMeRequested.requires_ready_sdk());
        assert!(!Event::Start(StartupConfig::default()).requires_ready_sdk());
        assert!(!Event::SdkLoaded(Ok(())).requires_ready_sdk());
        assert!(!Event::FullscreenChanged { active: false }.requires_ready_sdk());
    }

    #[test]
    fn test_shell_events_deserialize() {
        let event: Event = serde_json::from_str(
            r#"{"LocationTyped":{"field":"start","text":"Jakarta"}}"#,
        )
        .unwrap();
        assert!(matches!(
            event,
            Event::LocationTyped { field: LocationField::Start, ref text } if text == "Jakarta"
        ));

        let event: Event = serde_json::from_str(r#""CalculateRouteRequested""#).unwrap();
        assert_eq!(event.name(), "calculate_route_requested");
    }

    #[test]
    fn test_location_field_names() {
        assert_eq!(LocationField::Start.as_str(), "start");
        assert_eq!(LocationField::End.as_str(), "end");
    }
}
