mod alert;
mod fullscreen;
mod geolocation;
mod map_surface;
mod maps;

pub use self::alert::{Alert, AlertOperation};
pub use self::fullscreen::{Fullscreen, FullscreenError, FullscreenOperation, FullscreenResult};
pub use self::geolocation::{
    Geolocation, GeolocationOperation, GeolocationResult, Position, PositionError,
    PositionOptions,
};
pub use self::map_surface::{MapSurface, MapSurfaceOperation};
pub use self::maps::{Maps, MapsError, MapsOperation, MapsOutput, MapsResult};

// Crux's built-in Render capability covers view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub maps: Maps<Event>,
    pub geolocation: Geolocation<Event>,
    pub map_surface: MapSurface<Event>,
    pub fullscreen: Fullscreen<Event>,
    pub alert: Alert<Event>,
    pub render: Render<Event>,
}
