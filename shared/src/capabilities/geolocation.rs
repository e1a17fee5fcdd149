use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::LatLng;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
    /// Oldest cached fix the device may return; zero forces a fresh reading.
    pub maximum_age_ms: u64,
}

impl PositionOptions {
    /// High accuracy, ten second timeout, no cached fixes.
    #[must_use]
    pub const fn fresh_high_accuracy() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            maximum_age_ms: 0,
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::fresh_high_accuracy()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeolocationOperation {
    CurrentPosition(PositionOptions),
}

impl Operation for GeolocationOperation {
    type Output = GeolocationResult;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coords: LatLng,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
    #[serde(default)]
    pub timestamp_ms: Option<u64>,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PositionError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("position unavailable: {message}")]
    PositionUnavailable { message: String },

    #[error("timed out waiting for a position")]
    Timeout,

    #[error("geolocation not supported on this platform")]
    Unsupported,
}

pub type GeolocationResult = Result<Position, PositionError>;

pub struct Geolocation<E> {
    context: CapabilityContext<GeolocationOperation, E>,
}

impl<Ev> Capability<Ev> for Geolocation<Ev> {
    type Operation = GeolocationOperation;
    type MappedSelf<MappedEv> = Geolocation<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Geolocation::new(self.context.map_event(f))
    }
}

impl<E> Geolocation<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<GeolocationOperation, E>) -> Self {
        Self { context }
    }

    pub fn current_position<F>(&self, options: PositionOptions, callback: F)
    where
        F: FnOnce(GeolocationResult) -> E + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(GeolocationOperation::CurrentPosition(options))
                .await;
            context.update_app(callback(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_fresh_high_accuracy() {
        let options = PositionOptions::default();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.timeout_ms, 10_000);
        assert_eq!(options.maximum_age_ms, 0);
    }

    #[test]
    fn test_position_error_from_shell() {
        let error: PositionError = serde_json::from_str(r#""PermissionDenied""#).unwrap();
        assert_eq!(error, PositionError::PermissionDenied);
        assert_eq!(error.to_string(), "permission denied");
    }

    #[test]
    fn test_position_without_optional_fields() {
        let position: Position =
            serde_json::from_str(r#"{"coords":{"lat":-6.2,"lng":106.8}}"#).unwrap();
        assert_eq!(position.coords, LatLng::new(-6.2, 106.8).unwrap());
        assert_eq!(position.accuracy_m, None);
    }
}
