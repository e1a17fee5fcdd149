use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::{LatLng, DEFAULT_CENTER};
use crate::{DEFAULT_MAP_ZOOM, MAX_ZOOM, MIN_ZOOM};

/// SDK libraries the view needs loaded alongside the base map.
pub const SDK_LIBRARIES: &[&str] = &["places"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("mapping service API key is missing")]
    MissingApiKey,

    #[error("mapping service API key contains whitespace")]
    MalformedApiKey,

    #[error("initial zoom {0} outside 0..=22")]
    InvalidZoom(String),
}

/// What the shell sends at startup. Validated into [`NavigatorConfig`].
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartupConfig {
    #[serde(default)]
    pub google_maps_api_key: Option<String>,
    #[serde(default)]
    pub initial_center: Option<LatLng>,
    #[serde(default)]
    pub initial_zoom: Option<f64>,
}

// Keep the key out of logs.
impl fmt::Debug for StartupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartupConfig")
            .field("api_key_present", &self.google_maps_api_key.is_some())
            .field("initial_center", &self.initial_center)
            .field("initial_zoom", &self.initial_zoom)
            .finish()
    }
}

impl StartupConfig {
    #[must_use]
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            google_maps_api_key: Some(key.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct NavigatorConfig {
    api_key: SecretString,
    pub initial_center: LatLng,
    pub initial_zoom: f64,
}

impl NavigatorConfig {
    pub fn from_startup(startup: StartupConfig) -> Result<Self, ConfigError> {
        let key = startup
            .google_maps_api_key
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        if key.chars().any(char::is_whitespace) {
            return Err(ConfigError::MalformedApiKey);
        }

        let initial_zoom = startup.initial_zoom.unwrap_or(DEFAULT_MAP_ZOOM);
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&initial_zoom) {
            return Err(ConfigError::InvalidZoom(initial_zoom.to_string()));
        }

        Ok(Self {
            api_key: SecretString::new(key),
            initial_center: startup.initial_center.unwrap_or(DEFAULT_CENTER),
            initial_zoom,
        })
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    #[must_use]
    pub fn sdk_libraries(&self) -> Vec<String> {
        SDK_LIBRARIES.iter().map(|&lib| lib.to_owned()).collect()
    }
}
