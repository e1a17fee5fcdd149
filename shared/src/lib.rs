//! Headless core of the route navigator: two location inputs, an energy figure,
//! a map and a computed driving route. The shell owns the mapping SDK, the
//! browser geolocation and fullscreen APIs; this crate decides what to ask for
//! and what to show.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod route;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::{ConfigError, NavigatorConfig, StartupConfig};
pub use crux_core::{render::Render, App as CruxApp};
pub use error::NavigatorError;
pub use event::{Event, LocationField};
pub use model::{LatLng, Model};
pub use route::{DirectionsResult, LatLngBounds, PlaceRecord, Prediction};
pub use view::{MapOverlay, ViewModel, ViewState};

pub const DEFAULT_MAP_ZOOM: f64 = 13.0;
/// Zoom used when centring on the user's own position.
pub const LOCATE_ZOOM: f64 = 15.0;
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;
