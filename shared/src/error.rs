use thiserror::Error;

use crate::capabilities::{FullscreenError, MapsError, PositionError};
use crate::config::ConfigError;

pub const VALIDATION_MESSAGE: &str = "Tolong masukkan titk awal, akhir, dan kWh mobil.";
pub const ROUTE_FAILURE_MESSAGE: &str =
    "Could not calculate directions. Please check your locations and try again.";
pub const GEOLOCATION_FAILURE_MESSAGE: &str =
    "Unable to access your current location. Please check your browser permissions.";
pub const LOAD_ERROR_MESSAGE: &str = "Error loading Google Maps";
pub const LOADING_MESSAGE: &str = "Loading Maps...";

/// Everything that can go wrong in the view, as far as the user is concerned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigatorError {
    #[error("mapping service failed to load: {0}")]
    ServiceLoad(String),

    #[error("route inputs incomplete")]
    Validation,

    #[error("route computation failed: {0}")]
    RouteComputation(String),

    #[error("geolocation failed: {0}")]
    Geolocation(#[from] PositionError),

    #[error("fullscreen request denied: {0}")]
    FullscreenDenied(String),
}

impl NavigatorError {
    /// Text shown in the blocking alert (or the error view for load failures).
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ServiceLoad(_) => LOAD_ERROR_MESSAGE.to_owned(),
            Self::Validation => VALIDATION_MESSAGE.to_owned(),
            Self::RouteComputation(_) => ROUTE_FAILURE_MESSAGE.to_owned(),
            Self::Geolocation(_) => GEOLOCATION_FAILURE_MESSAGE.to_owned(),
            Self::FullscreenDenied(reason) => {
                format!("Error attempting to enable fullscreen: {reason}")
            }
        }
    }

    /// Only a failed SDK load takes the whole view down.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ServiceLoad(_))
    }
}

impl From<ConfigError> for NavigatorError {
    fn from(e: ConfigError) -> Self {
        Self::ServiceLoad(e.to_string())
    }
}

impl From<MapsError> for NavigatorError {
    fn from(e: MapsError) -> Self {
        match e {
            MapsError::LoadFailed { .. } | MapsError::InvalidKey => Self::ServiceLoad(e.to_string()),
            other => Self::RouteComputation(other.to_string()),
        }
    }
}

impl From<FullscreenError> for NavigatorError {
    fn from(e: FullscreenError) -> Self {
        Self::FullscreenDenied(e.reason().to_owned())
    }
}
