use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::LatLng;
use crate::route::{DirectionsRequest, DirectionsResponse, GeocodeResponse, PlaceRecord, Prediction};

/// Requests to the mapping SDK the shell has embedded.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "data")]
pub enum MapsOperation {
    LoadSdk {
        api_key: String,
        libraries: Vec<String>,
    },
    Autocomplete {
        input: String,
    },
    PlaceDetails {
        place_id: String,
    },
    Directions(DirectionsRequest),
    ReverseGeocode {
        location: LatLng,
    },
}

impl MapsOperation {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LoadSdk { .. } => "load_sdk",
            Self::Autocomplete { .. } => "autocomplete",
            Self::PlaceDetails { .. } => "place_details",
            Self::Directions(_) => "directions",
            Self::ReverseGeocode { .. } => "reverse_geocode",
        }
    }
}

// The API key must never end up in a log line.
impl fmt::Debug for MapsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadSdk { libraries, .. } => f
                .debug_struct("LoadSdk")
                .field("api_key", &"[REDACTED]")
                .field("libraries", libraries)
                .finish(),
            Self::Autocomplete { input } => {
                f.debug_struct("Autocomplete").field("input", input).finish()
            }
            Self::PlaceDetails { place_id } => f
                .debug_struct("PlaceDetails")
                .field("place_id", place_id)
                .finish(),
            Self::Directions(request) => f.debug_tuple("Directions").field(request).finish(),
            Self::ReverseGeocode { location } => f
                .debug_struct("ReverseGeocode")
                .field("location", location)
                .finish(),
        }
    }
}

impl Operation for MapsOperation {
    type Output = MapsResult;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MapsOutput {
    SdkLoaded,
    Predictions(Vec<Prediction>),
    Place(PlaceRecord),
    Directions(DirectionsResponse),
    Geocode(GeocodeResponse),
}

impl MapsOutput {
    const fn kind(&self) -> &'static str {
        match self {
            Self::SdkLoaded => "sdk_loaded",
            Self::Predictions(_) => "predictions",
            Self::Place(_) => "place",
            Self::Directions(_) => "directions",
            Self::Geocode(_) => "geocode",
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum MapsError {
    #[error("mapping SDK failed to load: {reason}")]
    LoadFailed { reason: String },

    #[error("mapping service rejected the API key")]
    InvalidKey,

    #[error("network error: {message}")]
    Network { message: String },

    #[error("mapping service error: {message}")]
    Service { message: String },

    #[error("unexpected {got} output for {operation} request")]
    UnexpectedOutput { operation: String, got: String },
}

impl MapsError {
    fn unexpected(operation: &str, got: &MapsOutput) -> Self {
        Self::UnexpectedOutput {
            operation: operation.to_owned(),
            got: got.kind().to_owned(),
        }
    }
}

pub type MapsResult = Result<MapsOutput, MapsError>;

pub struct Maps<E> {
    context: CapabilityContext<MapsOperation, E>,
}

impl<Ev> Capability<Ev> for Maps<Ev> {
    type Operation = MapsOperation;
    type MappedSelf<MappedEv> = Maps<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Maps::new(self.context.map_event(f))
    }
}

impl<E> Maps<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<MapsOperation, E>) -> Self {
        Self { context }
    }

    pub fn load_sdk<F>(&self, api_key: String, libraries: Vec<String>, callback: F)
    where
        F: FnOnce(Result<(), MapsError>) -> E + Send + 'static,
    {
        self.request(MapsOperation::LoadSdk { api_key, libraries }, move |result| {
            callback(result.and_then(|output| match output {
                MapsOutput::SdkLoaded => Ok(()),
                other => Err(MapsError::unexpected("load_sdk", &other)),
            }))
        });
    }

    pub fn autocomplete<F>(&self, input: String, callback: F)
    where
        F: FnOnce(Result<Vec<Prediction>, MapsError>) -> E + Send + 'static,
    {
        self.request(MapsOperation::Autocomplete { input }, move |result| {
            callback(result.and_then(|output| match output {
                MapsOutput::Predictions(predictions) => Ok(predictions),
                other => Err(MapsError::unexpected("autocomplete", &other)),
            }))
        });
    }

    pub fn place_details<F>(&self, place_id: String, callback: F)
    where
        F: FnOnce(Result<PlaceRecord, MapsError>) -> E + Send + 'static,
    {
        self.request(MapsOperation::PlaceDetails { place_id }, move |result| {
            callback(result.and_then(|output| match output {
                MapsOutput::Place(place) => Ok(place),
                other => Err(MapsError::unexpected("place_details", &other)),
            }))
        });
    }

    pub fn directions<F>(&self, request: DirectionsRequest, callback: F)
    where
        F: FnOnce(Result<DirectionsResponse, MapsError>) -> E + Send + 'static,
    {
        self.request(MapsOperation::Directions(request), move |result| {
            callback(result.and_then(|output| match output {
                MapsOutput::Directions(response) => Ok(response),
                other => Err(MapsError::unexpected("directions", &other)),
            }))
        });
    }

    pub fn reverse_geocode<F>(&self, location: LatLng, callback: F)
    where
        F: FnOnce(Result<GeocodeResponse, MapsError>) -> E + Send + 'static,
    {
        self.request(MapsOperation::ReverseGeocode { location }, move |result| {
            callback(result.and_then(|output| match output {
                MapsOutput::Geocode(response) => Ok(response),
                other => Err(MapsError::unexpected("reverse_geocode", &other)),
            }))
        });
    }

    fn request<F>(&self, operation: MapsOperation, callback: F)
    where
        F: FnOnce(MapsResult) -> E + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(callback(result));
        });
    }
}
