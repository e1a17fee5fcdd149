use serde::{Deserialize, Serialize};

use crate::error::{LOADING_MESSAGE, LOAD_ERROR_MESSAGE};
use crate::model::{LatLng, Model, RequestKind, SdkState, DEFAULT_CENTER};
use crate::route::{path_to_geojson, DirectionsResult, Leg, Prediction};
use crate::DEFAULT_MAP_ZOOM;

pub const START_MARKER_COLOR: &str = "#4285F4";
pub const END_MARKER_COLOR: &str = "#EA4335";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub state: ViewState,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewState {
    Loading { message: String },
    LoadError { message: String },
    Ready(Box<NavigatorView>),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NavigatorView {
    pub inputs: InputPanel,
    pub map: MapView,
    pub summary: Option<RouteSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InputPanel {
    pub start_label: String,
    pub end_label: String,
    pub energy_text: String,
    pub start_suggestions: Vec<Prediction>,
    pub end_suggestions: Vec<Prediction>,
    pub is_locating: bool,
    pub is_calculating: bool,
    /// Panel floats over the map instead of sitting above it.
    pub overlaid: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapView {
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    pub height: String,
    pub fullscreen: bool,
    pub overlay: MapOverlay,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub fill_color: String,
}

impl Marker {
    fn new(position: LatLng, fill_color: &str) -> Self {
        Self {
            position,
            fill_color: fill_color.to_owned(),
        }
    }
}

/// What gets drawn on the map this frame. A route hides the bare markers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapOverlay {
    Empty,
    Markers {
        start: Option<Marker>,
        end: Option<Marker>,
    },
    Route {
        directions: DirectionsResult,
        path: Vec<LatLng>,
        geojson: String,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RouteSummary {
    pub distance_text: String,
    pub duration_text: String,
    pub steps: Vec<String>,
}

impl RouteSummary {
    #[must_use]
    pub fn from_leg(leg: &Leg) -> Self {
        let distance = leg.distance.as_ref().map_or("", |d| d.text.as_str());
        let duration = leg.duration.as_ref().map_or("", |d| d.text.as_str());
        Self {
            distance_text: format!("Total Jarak: {distance}"),
            duration_text: format!("Total waktu: {duration}"),
            steps: leg.steps.iter().filter_map(|s| s.instruction()).collect(),
        }
    }
}

#[must_use]
pub fn build(model: &Model) -> ViewModel {
    let state = match model.sdk {
        SdkState::NotStarted | SdkState::Loading => ViewState::Loading {
            message: LOADING_MESSAGE.to_owned(),
        },
        SdkState::Failed => ViewState::LoadError {
            message: LOAD_ERROR_MESSAGE.to_owned(),
        },
        SdkState::Ready => ViewState::Ready(Box::new(navigator_view(model))),
    };
    ViewModel { state }
}

fn navigator_view(model: &Model) -> NavigatorView {
    let (initial_center, initial_zoom) = model
        .config
        .as_ref()
        .map_or((DEFAULT_CENTER, DEFAULT_MAP_ZOOM), |c| {
            (c.initial_center, c.initial_zoom)
        });

    NavigatorView {
        inputs: InputPanel {
            start_label: model.start.label.clone(),
            end_label: model.end.label.clone(),
            energy_text: model.energy.raw().to_owned(),
            start_suggestions: model.start_suggestions.clone(),
            end_suggestions: model.end_suggestions.clone(),
            is_locating: model.in_flight.is_pending(RequestKind::Geolocation),
            is_calculating: model.in_flight.is_pending(RequestKind::Route),
            overlaid: model.view_mode.fullscreen,
        },
        map: MapView {
            initial_center,
            initial_zoom,
            height: model.view_mode.map_height().to_owned(),
            fullscreen: model.view_mode.fullscreen,
            overlay: overlay(model),
        },
        summary: model
            .route
            .as_ref()
            .and_then(DirectionsResult::primary_leg)
            .map(RouteSummary::from_leg),
    }
}

fn overlay(model: &Model) -> MapOverlay {
    if let Some(directions) = &model.route {
        let path = directions.primary_path();
        let feature = path_to_geojson(&path, directions.primary_leg());
        let geojson = serde_json::to_string(&feature).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "route GeoJSON serialisation failed");
            String::new()
        });
        return MapOverlay::Route {
            directions: directions.clone(),
            path,
            geojson,
        };
    }

    let start = model.start.coords.map(|p| Marker::new(p, START_MARKER_COLOR));
    let end = model.end.coords.map(|p| Marker::new(p, END_MARKER_COLOR));
    if start.is_none() && end.is_none() {
        MapOverlay::Empty
    } else {
        MapOverlay::Markers { start, end }
    }
}
