use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::config::NavigatorConfig;
use crate::event::LocationField;
use crate::route::{DirectionsResult, Prediction};

pub const NORMAL_MAP_HEIGHT: &str = "calc(100vh - 210px)";
pub const FULLSCREEN_MAP_HEIGHT: &str = "100vh";

/// Central Jakarta, where the map opens before anything is known.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: -6.2,
    lng: 106.816_666,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} out of range")]
    InvalidLatitude(f64),

    #[error("longitude {0} out of range")]
    InvalidLongitude(f64),
}

/// Validated lat/lng pair. Deserialisation goes through the same checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLatLng")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawLatLng> for LatLng {
    type Error = CoordinateError;

    fn try_from(raw: RawLatLng) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Per-axis minimum. Both inputs are in range, so the result is too.
    #[must_use]
    pub fn component_min(self, other: Self) -> Self {
        Self {
            lat: self.lat.min(other.lat),
            lng: self.lng.min(other.lng),
        }
    }

    #[must_use]
    pub fn component_max(self, other: Self) -> Self {
        Self {
            lat: self.lat.max(other.lat),
            lng: self.lng.max(other.lng),
        }
    }

    /// Label used when no address could be resolved for this point.
    #[must_use]
    pub fn fallback_label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Adding 0.0 turns -0.0 into 0.0.
        write!(f, "{}, {}", self.lat + 0.0, self.lng + 0.0)
    }
}

/// One end of the trip: what the user sees in the text field, plus a point if known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub label: String,
    pub coords: Option<LatLng>,
}

impl Place {
    #[must_use]
    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }
}

/// Battery charge as typed by the user. Only checked for presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyLevel {
    raw: String,
    value: Option<f64>,
}

impl EnergyLevel {
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        let value = if trimmed.is_empty() {
            Some(0.0)
        } else {
            trimmed.parse::<f64>().ok()
        };
        Self { raw, value }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Unparseable, zero and NaN all count as missing. Only plain decimal
    /// notation parses; hex such as "0x1A" is unparseable.
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self.value, Some(v) if v != 0.0 && !v.is_nan())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewMode {
    pub fullscreen: bool,
}

impl ViewMode {
    #[must_use]
    pub const fn map_height(self) -> &'static str {
        if self.fullscreen {
            FULLSCREEN_MAP_HEIGHT
        } else {
            NORMAL_MAP_HEIGHT
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdkState {
    #[default]
    NotStarted,
    Loading,
    Ready,
    Failed,
}

impl SdkState {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Whether the shell has a live map to send imperative commands to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapSurfaceState {
    #[default]
    Uninitialized,
    Ready,
}

impl MapSurfaceState {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Route,
    ReverseGeocode,
    Geolocation,
    Autocomplete(LocationField),
    PlaceDetails(LocationField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Latest outstanding request per kind. Completions carrying any other token are stale.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    next: u64,
    latest: HashMap<RequestKind, RequestToken>,
}

impl InFlight {
    pub fn issue(&mut self, kind: RequestKind) -> RequestToken {
        self.next += 1;
        let token = RequestToken(self.next);
        self.latest.insert(kind, token);
        token
    }

    /// Returns true when `token` is the latest for `kind`, and clears the slot.
    pub fn complete(&mut self, kind: RequestKind, token: RequestToken) -> bool {
        if self.latest.get(&kind) == Some(&token) {
            self.latest.remove(&kind);
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self, kind: RequestKind) {
        self.latest.remove(&kind);
    }

    #[must_use]
    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.latest.contains_key(&kind)
    }
}

#[derive(Debug, Default)]
pub struct Model {
    pub sdk: SdkState,
    pub config: Option<NavigatorConfig>,

    pub start: Place,
    pub end: Place,
    pub energy: EnergyLevel,

    pub route: Option<DirectionsResult>,

    pub view_mode: ViewMode,
    pub map_surface: MapSurfaceState,

    pub start_suggestions: Vec<Prediction>,
    pub end_suggestions: Vec<Prediction>,

    pub in_flight: InFlight,
}

impl Model {
    #[must_use]
    pub fn place(&self, field: LocationField) -> &Place {
        match field {
            LocationField::Start => &self.start,
            LocationField::End => &self.end,
        }
    }

    pub fn place_mut(&mut self, field: LocationField) -> &mut Place {
        match field {
            LocationField::Start => &mut self.start,
            LocationField::End => &mut self.end,
        }
    }

    #[must_use]
    pub fn suggestions(&self, field: LocationField) -> &[Prediction] {
        match field {
            LocationField::Start => &self.start_suggestions,
            LocationField::End => &self.end_suggestions,
        }
    }

    pub fn suggestions_mut(&mut self, field: LocationField) -> &mut Vec<Prediction> {
        match field {
            LocationField::Start => &mut self.start_suggestions,
            LocationField::End => &mut self.end_suggestions,
        }
    }

    /// All three route inputs are filled in.
    #[must_use]
    pub fn route_inputs_complete(&self) -> bool {
        self.start.has_label() && self.end.has_label() && self.energy.is_present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lat_lng_validation() {
        assert!(LatLng::new(-6.2, 106.8).is_ok());
        assert!(LatLng::new(90.0, 180.0).is_ok());
        assert_eq!(
            LatLng::new(91.0, 0.0),
            Err(CoordinateError::InvalidLatitude(91.0))
        );
        assert!(matches!(
            LatLng::new(0.0, f64::NAN),
            Err(CoordinateError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_lat_lng_deserialize_rejects_out_of_range() {
        let ok: LatLng = serde_json::from_str(r#"{"lat":-6.2,"lng":106.8}"#).unwrap();
        assert_eq!(ok, LatLng::new(-6.2, 106.8).unwrap());

        let bad = serde_json::from_str::<LatLng>(r#"{"lat":120.0,"lng":0.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_fallback_label_format() {
        let point = LatLng::new(-6.2, 106.8).unwrap();
        assert_eq!(point.fallback_label(), "-6.2, 106.8");

        let whole = LatLng::new(10.0, 106.0).unwrap();
        assert_eq!(whole.fallback_label(), "10, 106");

        let signed_zero = LatLng::new(-0.0, -0.0).unwrap();
        assert_eq!(signed_zero.fallback_label(), "0, 0");
    }

    #[test]
    fn test_energy_level_presence() {
        assert!(EnergyLevel::parse("50").is_present());
        assert!(EnergyLevel::parse(" 12.5 ").is_present());
        assert!(EnergyLevel::parse("-3").is_present());
        assert!(!EnergyLevel::parse("").is_present());
        assert!(!EnergyLevel::parse("0").is_present());
        assert!(!EnergyLevel::parse("abc").is_present());
        assert!(!EnergyLevel::parse("NaN").is_present());
        assert_eq!(EnergyLevel::parse("abc").raw(), "abc");
    }

    #[test]
    fn test_energy_level_rejects_non_decimal_notation() {
        assert!(!EnergyLevel::parse("0x1A").is_present());
        assert!(!EnergyLevel::parse("1,5").is_present());
        assert!(EnergyLevel::parse("2.6e1").is_present());
    }

    #[test]
    fn test_view_mode_height() {
        assert_eq!(ViewMode::default().map_height(), NORMAL_MAP_HEIGHT);
        assert_eq!(
            ViewMode { fullscreen: true }.map_height(),
            FULLSCREEN_MAP_HEIGHT
        );
    }

    #[test]
    fn test_in_flight_discards_superseded_tokens() {
        let mut in_flight = InFlight::default();
        let first = in_flight.issue(RequestKind::Route);
        let second = in_flight.issue(RequestKind::Route);

        assert!(second > first);
        assert!(!in_flight.complete(RequestKind::Route, first));
        assert!(in_flight.is_pending(RequestKind::Route));
        assert!(in_flight.complete(RequestKind::Route, second));
        assert!(!in_flight.is_pending(RequestKind::Route));
        assert!(!in_flight.complete(RequestKind::Route, second));
    }

    #[test]
    fn test_in_flight_kinds_are_independent() {
        let mut in_flight = InFlight::default();
        let start = in_flight.issue(RequestKind::Autocomplete(LocationField::Start));
        let end = in_flight.issue(RequestKind::Autocomplete(LocationField::End));

        assert!(in_flight.complete(RequestKind::Autocomplete(LocationField::Start), start));
        assert!(in_flight.complete(RequestKind::Autocomplete(LocationField::End), end));
    }

    #[test]
    fn test_in_flight_cancel() {
        let mut in_flight = InFlight::default();
        let token = in_flight.issue(RequestKind::ReverseGeocode);
        in_flight.cancel(RequestKind::ReverseGeocode);
        assert!(!in_flight.complete(RequestKind::ReverseGeocode, token));
    }

    #[test]
    fn test_route_inputs_complete() {
        let mut model = Model::default();
        assert!(!model.route_inputs_complete());

        model.start.label = "Jakarta".into();
        model.end.label = "Bandung".into();
        assert!(!model.route_inputs_complete());

        model.energy = EnergyLevel::parse("50");
        assert!(model.route_inputs_complete());
    }

    proptest! {
        #[test]
        fn fallback_label_is_lat_comma_lng(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
            let point = LatLng::new(lat, lng).unwrap();
            prop_assert_eq!(point.fallback_label(), format!("{lat}, {lng}"));
        }

        #[test]
        fn energy_presence_matches_parsed_value(value in -1000.0f64..1000.0) {
            let level = EnergyLevel::parse(value.to_string());
            prop_assert_eq!(level.is_present(), value != 0.0);
        }
    }
}
