//! Typed shapes of what the mapping service hands back, plus the bits of
//! geometry the core derives from them (bounds, decoded path, GeoJSON).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CoordinateError, LatLng};

/// Google encoded polylines carry five decimal places.
const POLYLINE_PRECISION: f64 = 1e5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub travel_mode: TravelMode,
}

impl DirectionsRequest {
    #[must_use]
    pub fn driving(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            travel_mode: TravelMode::Driving,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectionsStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxWaypointsExceeded,
    MaxRouteLengthExceeded,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    #[serde(other)]
    UnknownError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocoderStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    Error,
    #[serde(other)]
    UnknownError,
}

/// A human text plus the raw quantity (metres or seconds).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    #[serde(default)]
    pub value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    #[must_use]
    pub fn from_point(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Smallest box covering both points. Does not try to wrap the antimeridian.
    #[must_use]
    pub fn covering(a: LatLng, b: LatLng) -> Self {
        Self::from_point(a).extend(b)
    }

    #[must_use]
    pub fn extend(self, point: LatLng) -> Self {
        Self {
            south_west: self.south_west.component_min(point),
            north_east: self.north_east.component_max(point),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub html_instructions: Option<String>,
    #[serde(default)]
    pub distance: Option<TextValue>,
    #[serde(default)]
    pub duration: Option<TextValue>,
}

impl Step {
    /// Plain-text instruction line, e.g. "Turn left onto Jl. Sudirman (1.2 km)".
    #[must_use]
    pub fn instruction(&self) -> Option<String> {
        let text = strip_markup(self.html_instructions.as_deref()?);
        if text.is_empty() {
            return None;
        }
        Some(match &self.distance {
            Some(distance) if !distance.text.is_empty() => format!("{text} ({})", distance.text),
            _ => text,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub distance: Option<TextValue>,
    #[serde(default)]
    pub duration: Option<TextValue>,
    #[serde(default)]
    pub start_address: Option<String>,
    #[serde(default)]
    pub end_address: Option<String>,
    #[serde(default)]
    pub start_location: Option<LatLng>,
    #[serde(default)]
    pub end_location: Option<LatLng>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Leg {
    /// Box around the leg's endpoints, when both are known.
    #[must_use]
    pub fn endpoint_bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::covering(self.start_location?, self.end_location?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub overview_polyline: Option<String>,
    #[serde(default)]
    pub bounds: Option<LatLngBounds>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResult {
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl DirectionsResult {
    /// Only the first route and its first leg are ever used.
    #[must_use]
    pub fn primary_route(&self) -> Option<&Route> {
        self.routes.first()
    }

    #[must_use]
    pub fn primary_leg(&self) -> Option<&Leg> {
        self.primary_route()?.legs.first()
    }

    /// Decoded overview path of the first route; empty when absent or malformed.
    #[must_use]
    pub fn primary_path(&self) -> Vec<LatLng> {
        let Some(encoded) = self
            .primary_route()
            .and_then(|route| route.overview_polyline.as_deref())
        else {
            return Vec::new();
        };

        match decode_polyline(encoded) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed overview polyline");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub status: DirectionsStatus,
    #[serde(default)]
    pub result: Option<DirectionsResult>,
}

impl DirectionsResponse {
    /// The result, only when the service said OK and actually sent one.
    #[must_use]
    pub fn into_ok(self) -> Option<DirectionsResult> {
        match self.status {
            DirectionsStatus::Ok => self.result,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    #[serde(default)]
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub status: GeocoderStatus,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

impl GeocodeResponse {
    #[must_use]
    pub fn first_address(&self) -> Option<&str> {
        if self.status != GeocoderStatus::Ok {
            return None;
        }
        self.results
            .first()
            .map(|r| r.formatted_address.as_str())
            .filter(|a| !a.is_empty())
    }
}

/// Place as reported by an autocomplete widget or a details lookup.
/// Every field is optional; missing ones leave the input untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub place_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolylineError {
    #[error("polyline ended in the middle of a value at byte {0}")]
    Truncated(usize),

    #[error("invalid polyline character {ch:?} at byte {index}")]
    InvalidCharacter { ch: char, index: usize },

    #[error("polyline value overflowed at byte {0}")]
    Overflow(usize),

    #[error("decoded point out of range: {0}")]
    OutOfRange(#[from] CoordinateError),
}

/// Decodes the Google encoded-polyline format into points.
pub fn decode_polyline(encoded: &str) -> Result<Vec<LatLng>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut path = Vec::new();

    while index < bytes.len() {
        lat += next_delta(bytes, &mut index)?;
        lng += next_delta(bytes, &mut index)?;
        #[allow(clippy::cast_precision_loss)]
        path.push(LatLng::new(
            lat as f64 / POLYLINE_PRECISION,
            lng as f64 / POLYLINE_PRECISION,
        )?);
    }

    Ok(path)
}

fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated(*index));
        };
        if !(63..127).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                ch: char::from(byte),
                index: *index,
            });
        }
        if shift > 30 {
            return Err(PolylineError::Overflow(*index));
        }
        *index += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Route path as a GeoJSON `LineString` feature (`[lng, lat]` order).
#[must_use]
pub fn path_to_geojson(path: &[LatLng], leg: Option<&Leg>) -> geojson::Feature {
    let coordinates = path.iter().map(|p| vec![p.lng(), p.lat()]).collect();
    let geometry = geojson::Geometry::new(geojson::Value::LineString(coordinates));

    let mut properties = geojson::JsonObject::new();
    if let Some(leg) = leg {
        if let Some(distance) = &leg.distance {
            properties.insert("distance".into(), distance.text.clone().into());
        }
        if let Some(duration) = &leg.duration {
            properties.insert("duration".into(), duration.text.clone().into());
        }
    }

    geojson::Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
