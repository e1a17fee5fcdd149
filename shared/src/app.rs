use tracing::{debug, error, info, instrument, warn};

use crate::capabilities::{Capabilities, MapsError, PositionOptions};
use crate::config::{NavigatorConfig, StartupConfig};
use crate::error::NavigatorError;
use crate::event::{Event, LocationField};
use crate::model::{EnergyLevel, LatLng, MapSurfaceState, Model, RequestKind, SdkState};
use crate::route::{DirectionsRequest, DirectionsResponse, DirectionsResult, GeocodeResponse, PlaceRecord};
use crate::view::{self, ViewModel};
use crate::LOCATE_ZOOM;

#[derive(Default)]
pub struct App;

impl App {
    /// Fatal errors replace the whole view, everything else is a blocking alert.
    fn report(error: &NavigatorError, model: &mut Model, caps: &Capabilities) {
        if error.is_fatal() {
            model.sdk = SdkState::Failed;
        } else {
            caps.alert.show(error.user_message());
        }
    }

    fn start(startup: StartupConfig, model: &mut Model, caps: &Capabilities) {
        if model.sdk != SdkState::NotStarted {
            debug!(state = ?model.sdk, "start ignored, already started");
            return;
        }

        match NavigatorConfig::from_startup(startup) {
            Ok(config) => {
                model.sdk = SdkState::Loading;
                caps.maps.load_sdk(
                    config.api_key().to_owned(),
                    config.sdk_libraries(),
                    Event::SdkLoaded,
                );
                model.config = Some(config);
            }
            Err(e) => {
                let error = NavigatorError::from(e);
                error!(error = %error, "navigator configuration rejected");
                Self::report(&error, model, caps);
            }
        }
    }

    fn sdk_loaded(result: Result<(), MapsError>, model: &mut Model, caps: &Capabilities) {
        if model.sdk != SdkState::Loading {
            debug!(state = ?model.sdk, "unexpected sdk load completion");
            return;
        }

        match result {
            Ok(()) => {
                info!("mapping SDK loaded");
                model.sdk = SdkState::Ready;
            }
            Err(e) => {
                let error = NavigatorError::ServiceLoad(e.to_string());
                error!(error = %error, "mapping SDK failed to load");
                Self::report(&error, model, caps);
            }
        }
    }

    /// Typing or picking anything in the start field wins over a pending address lookup.
    fn start_field_edited(field: LocationField, model: &mut Model) {
        if field == LocationField::Start {
            model.in_flight.cancel(RequestKind::ReverseGeocode);
        }
    }

    fn location_typed(field: LocationField, text: String, model: &mut Model, caps: &Capabilities) {
        Self::start_field_edited(field, model);

        let kind = RequestKind::Autocomplete(field);
        if text.trim().is_empty() {
            model.in_flight.cancel(kind);
            model.suggestions_mut(field).clear();
        } else {
            let token = model.in_flight.issue(kind);
            caps.maps.autocomplete(text.clone(), move |result| Event::SuggestionsFetched {
                field,
                token,
                result,
            });
        }

        model.place_mut(field).label = text;
    }

    fn suggestion_chosen(field: LocationField, index: usize, model: &mut Model, caps: &Capabilities) {
        let Some(prediction) = model.suggestions(field).get(index).cloned() else {
            warn!(field = field.as_str(), index, "suggestion index out of range");
            return;
        };

        Self::start_field_edited(field, model);
        model.in_flight.cancel(RequestKind::Autocomplete(field));
        model.suggestions_mut(field).clear();
        model.place_mut(field).label = prediction.description;

        let token = model.in_flight.issue(RequestKind::PlaceDetails(field));
        caps.maps.place_details(prediction.place_id, move |result| {
            Event::PlaceDetailsFetched {
                field,
                token,
                result,
            }
        });
    }

    /// Adopts whatever the place record carries; absent fields leave the input alone.
    fn apply_place(field: LocationField, place: PlaceRecord, model: &mut Model) {
        let target = model.place_mut(field);
        if let Some(address) = place.formatted_address.filter(|a| !a.is_empty()) {
            target.label = address;
        }
        if let Some(location) = place.location {
            target.coords = Some(location);
        }
    }

    fn locate_me(model: &mut Model, caps: &Capabilities) {
        model.in_flight.cancel(RequestKind::ReverseGeocode);
        let token = model.in_flight.issue(RequestKind::Geolocation);
        caps.geolocation
            .current_position(PositionOptions::fresh_high_accuracy(), move |result| {
                Event::PositionReceived { token, result }
            });
    }

    fn position_received(location: LatLng, model: &mut Model, caps: &Capabilities) {
        model.start.coords = Some(location);

        if model.sdk.is_ready() {
            let token = model.in_flight.issue(RequestKind::ReverseGeocode);
            caps.maps.reverse_geocode(location, move |result| Event::AddressResolved {
                token,
                location,
                result,
            });
        } else {
            model.start.label = location.fallback_label();
        }

        if model.map_surface.is_ready() {
            caps.map_surface.set_center(location, LOCATE_ZOOM);
        }
    }

    fn address_resolved(
        location: LatLng,
        result: Result<GeocodeResponse, MapsError>,
        model: &mut Model,
    ) {
        let address = match result {
            Ok(response) => response.first_address().map(str::to_owned),
            Err(e) => {
                warn!(error = %e, "reverse geocoding failed");
                None
            }
        };
        model.start.label = address.unwrap_or_else(|| location.fallback_label());
    }

    fn calculate_route(model: &mut Model, caps: &Capabilities) {
        if !model.route_inputs_complete() {
            debug!("route inputs incomplete");
            Self::report(&NavigatorError::Validation, model, caps);
            return;
        }

        let token = model.in_flight.issue(RequestKind::Route);
        let request = DirectionsRequest::driving(model.start.label.clone(), model.end.label.clone());
        caps.maps
            .directions(request, move |result| Event::RouteComputed { token, result });
    }

    fn route_computed(
        result: Result<DirectionsResponse, MapsError>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let outcome = match result {
            Ok(response) => {
                let status = response.status;
                response
                    .into_ok()
                    .ok_or_else(|| NavigatorError::RouteComputation(format!("{status:?}")))
            }
            Err(e) => Err(NavigatorError::RouteComputation(e.to_string())),
        };

        match outcome {
            Ok(directions) => Self::apply_route(directions, model, caps),
            Err(error) => {
                warn!(error = %error, "directions request failed");
                Self::report(&error, model, caps);
            }
        }
    }

    fn apply_route(directions: DirectionsResult, model: &mut Model, caps: &Capabilities) {
        if let Some(leg) = directions.primary_leg() {
            if let Some(start) = leg.start_location {
                model.start.coords = Some(start);
            }
            if let Some(end) = leg.end_location {
                model.end.coords = Some(end);
            }
            if let Some(bounds) = leg.endpoint_bounds() {
                if model.map_surface.is_ready() {
                    caps.map_surface.fit_bounds(bounds);
                }
            }
            info!(
                distance = leg.distance.as_ref().map_or("", |d| d.text.as_str()),
                duration = leg.duration.as_ref().map_or("", |d| d.text.as_str()),
                "route computed"
            );
        }
        model.route = Some(directions);
    }

    fn toggle_fullscreen(model: &mut Model, caps: &Capabilities) {
        if model.view_mode.fullscreen {
            caps.fullscreen.exit(Event::FullscreenExited);
            model.view_mode.fullscreen = false;
        } else {
            caps.fullscreen.enter(Event::FullscreenEntered);
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    #[instrument(level = "debug", skip_all, fields(event = event.name()))]
    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        if event.requires_ready_sdk() && !model.sdk.is_ready() {
            debug!(state = ?model.sdk, "ignoring event before the mapping SDK is ready");
            return;
        }

        match event {
            Event::Start(startup) => Self::start(startup, model, caps),

            Event::SdkLoaded(result) => Self::sdk_loaded(result, model, caps),

            Event::MapSurfaceReady => {
                info!("map surface ready");
                model.map_surface = MapSurfaceState::Ready;
            }

            Event::LocationTyped { field, text } => Self::location_typed(field, text, model, caps),

            Event::SuggestionsFetched {
                field,
                token,
                result,
            } => {
                if !model.in_flight.complete(RequestKind::Autocomplete(field), token) {
                    debug!(%token, field = field.as_str(), "discarding stale suggestions");
                    return;
                }
                match result {
                    Ok(predictions) => *model.suggestions_mut(field) = predictions,
                    Err(e) => {
                        warn!(error = %e, field = field.as_str(), "autocomplete failed");
                        model.suggestions_mut(field).clear();
                    }
                }
            }

            Event::SuggestionChosen { field, index } => {
                Self::suggestion_chosen(field, index, model, caps);
            }

            Event::PlaceDetailsFetched {
                field,
                token,
                result,
            } => {
                if !model.in_flight.complete(RequestKind::PlaceDetails(field), token) {
                    debug!(%token, field = field.as_str(), "discarding stale place details");
                    return;
                }
                match result {
                    Ok(place) => Self::apply_place(field, place, model),
                    Err(e) => warn!(error = %e, field = field.as_str(), "place details failed"),
                }
            }

            Event::PlaceSelected { field, place } => {
                Self::start_field_edited(field, model);
                model.in_flight.cancel(RequestKind::Autocomplete(field));
                model.in_flight.cancel(RequestKind::PlaceDetails(field));
                model.suggestions_mut(field).clear();
                Self::apply_place(field, place, model);
            }

            Event::EnergyTyped { text } => model.energy = EnergyLevel::parse(text),

            Event::LocateMeRequested => Self::locate_me(model, caps),

            Event::PositionReceived { token, result } => {
                if !model.in_flight.complete(RequestKind::Geolocation, token) {
                    debug!(%token, "discarding stale position");
                    return;
                }
                match result {
                    Ok(position) => Self::position_received(position.coords, model, caps),
                    Err(e) => {
                        let error = NavigatorError::from(e);
                        error!(error = %error, "geolocation error");
                        Self::report(&error, model, caps);
                    }
                }
            }

            Event::AddressResolved {
                token,
                location,
                result,
            } => {
                if !model.in_flight.complete(RequestKind::ReverseGeocode, token) {
                    debug!(%token, "discarding stale address");
                    return;
                }
                Self::address_resolved(location, result, model);
            }

            Event::CalculateRouteRequested => Self::calculate_route(model, caps),

            Event::RouteComputed { token, result } => {
                if !model.in_flight.complete(RequestKind::Route, token) {
                    debug!(%token, "discarding stale route");
                    return;
                }
                Self::route_computed(result, model, caps);
            }

            Event::FullscreenToggled => Self::toggle_fullscreen(model, caps),

            Event::FullscreenEntered(result) => match result {
                Ok(()) => model.view_mode.fullscreen = true,
                Err(e) => {
                    let error = NavigatorError::from(e);
                    warn!(error = %error, "fullscreen request denied");
                    Self::report(&error, model, caps);
                    return;
                }
            },

            Event::FullscreenExited(result) => {
                if let Err(e) = result {
                    warn!(error = %e, "leaving fullscreen failed");
                }
                return;
            }

            Event::FullscreenChanged { active } => {
                if model.view_mode.fullscreen == active {
                    return;
                }
                model.view_mode.fullscreen = active;
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::build(model)
    }
}
