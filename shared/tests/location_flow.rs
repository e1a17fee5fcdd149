use crux_core::testing::AppTester;
use navigator_core::capabilities::{
    GeolocationOperation, MapSurfaceOperation, MapsOperation, MapsOutput, Position,
};
use navigator_core::route::{GeocodeResponse, GeocodeResult, GeocoderStatus};
use navigator_core::{
    App, Effect, Event, LatLng, LocationField, Model, PlaceRecord, Prediction, StartupConfig,
};

fn ready() -> (AppTester<App, Effect>, Model) {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::Start(StartupConfig::with_api_key("test-key")),
        &mut model,
    );
    for effect in update.effects {
        if let Effect::Maps(mut request) = effect {
            let update = app
                .resolve(&mut request, Ok(MapsOutput::SdkLoaded))
                .expect("load resolves");
            for event in update.events {
                app.update(event, &mut model);
            }
        }
    }
    (app, model)
}

fn position(lat: f64, lng: f64) -> Position {
    Position {
        coords: LatLng::new(lat, lng).unwrap(),
        accuracy_m: Some(12.0),
        timestamp_ms: None,
    }
}

#[test]
fn test_locate_me_resolves_address() {
    let (app, mut model) = ready();
    app.update(Event::MapSurfaceReady, &mut model);

    let update = app.update(Event::LocateMeRequested, &mut model);
    let mut request = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Geolocation(request) => Some(request),
            _ => None,
        })
        .expect("geolocation request");
    let GeolocationOperation::CurrentPosition(options) = request.operation;
    assert!(options.enable_high_accuracy);
    assert_eq!(options.timeout_ms, 10_000);
    assert_eq!(options.maximum_age_ms, 0);

    let update = app
        .resolve(&mut request, Ok(position(-6.2, 106.8)))
        .expect("position resolves");
    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, &mut model).effects);
    }

    assert_eq!(model.start.coords, LatLng::new(-6.2, 106.8).ok());
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::MapSurface(r) if matches!(
            r.operation,
            MapSurfaceOperation::SetCenter { zoom, .. } if (zoom - 15.0).abs() < f64::EPSILON
        )
    )));

    let mut geocode = effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Maps(request) => Some(request),
            _ => None,
        })
        .expect("reverse geocode request");
    assert!(matches!(
        geocode.operation,
        MapsOperation::ReverseGeocode { .. }
    ));

    let update = app
        .resolve(
            &mut geocode,
            Ok(MapsOutput::Geocode(GeocodeResponse {
                status: GeocoderStatus::Ok,
                results: vec![GeocodeResult {
                    formatted_address: "Jl. M.H. Thamrin, Jakarta".into(),
                    location: None,
                }],
            })),
        )
        .expect("geocode resolves");
    for event in update.events {
        app.update(event, &mut model);
    }
    assert_eq!(model.start.label, "Jl. M.H. Thamrin, Jakarta");
}

#[test]
fn test_locate_me_falls_back_to_coordinates() {
    let (app, mut model) = ready();

    let update = app.update(Event::LocateMeRequested, &mut model);
    let mut request = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Geolocation(request) => Some(request),
            _ => None,
        })
        .expect("geolocation request");
    let update = app
        .resolve(&mut request, Ok(position(-6.2, 106.8)))
        .expect("position resolves");

    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, &mut model).effects);
    }
    // No live map yet, so nothing to recentre.
    assert!(!effects.iter().any(|e| matches!(e, Effect::MapSurface(_))));

    let mut geocode = effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Maps(request) => Some(request),
            _ => None,
        })
        .expect("reverse geocode request");
    let update = app
        .resolve(
            &mut geocode,
            Ok(MapsOutput::Geocode(GeocodeResponse {
                status: GeocoderStatus::ZeroResults,
                results: Vec::new(),
            })),
        )
        .expect("geocode resolves");
    for event in update.events {
        app.update(event, &mut model);
    }
    assert_eq!(model.start.label, "-6.2, 106.8");
}

#[test]
fn test_autocomplete_then_choose_suggestion() {
    let (app, mut model) = ready();

    let update = app.update(
        Event::LocationTyped {
            field: LocationField::End,
            text: "Band".into(),
        },
        &mut model,
    );
    let mut request = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Maps(request) => Some(request),
            _ => None,
        })
        .expect("autocomplete request");
    assert_eq!(
        request.operation,
        MapsOperation::Autocomplete {
            input: "Band".into()
        }
    );

    let update = app
        .resolve(
            &mut request,
            Ok(MapsOutput::Predictions(vec![
                Prediction {
                    place_id: "bdg".into(),
                    description: "Bandung, West Java".into(),
                },
                Prediction {
                    place_id: "bdl".into(),
                    description: "Bandar Lampung".into(),
                },
            ])),
        )
        .expect("predictions resolve");
    for event in update.events {
        app.update(event, &mut model);
    }
    assert_eq!(model.end_suggestions.len(), 2);

    let update = app.update(
        Event::SuggestionChosen {
            field: LocationField::End,
            index: 0,
        },
        &mut model,
    );
    assert_eq!(model.end.label, "Bandung, West Java");
    assert!(model.end_suggestions.is_empty());

    let mut details = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Maps(request) => Some(request),
            _ => None,
        })
        .expect("place details request");
    assert_eq!(
        details.operation,
        MapsOperation::PlaceDetails {
            place_id: "bdg".into()
        }
    );

    let bandung = LatLng::new(-6.917, 107.619).unwrap();
    let update = app
        .resolve(
            &mut details,
            Ok(MapsOutput::Place(PlaceRecord {
                place_id: Some("bdg".into()),
                formatted_address: Some("Bandung, Bandung City, West Java, Indonesia".into()),
                location: Some(bandung),
            })),
        )
        .expect("details resolve");
    for event in update.events {
        app.update(event, &mut model);
    }
    assert_eq!(model.end.label, "Bandung, Bandung City, West Java, Indonesia");
    assert_eq!(model.end.coords, Some(bandung));
}

#[test]
fn test_outdated_suggestions_dropped() {
    let (app, mut model) = ready();

    let update = app.update(
        Event::LocationTyped {
            field: LocationField::Start,
            text: "Ja".into(),
        },
        &mut model,
    );
    let mut early = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Maps(request) => Some(request),
            _ => None,
        })
        .expect("autocomplete request");

    app.update(
        Event::LocationTyped {
            field: LocationField::Start,
            text: "Jakarta".into(),
        },
        &mut model,
    );

    let update = app
        .resolve(
            &mut early,
            Ok(MapsOutput::Predictions(vec![Prediction {
                place_id: "jmb".into(),
                description: "Jambi".into(),
            }])),
        )
        .expect("predictions resolve");
    for event in update.events {
        app.update(event, &mut model);
    }
    assert!(model.start_suggestions.is_empty());
}

#[test]
fn test_position_error_alerts() {
    let (app, mut model) = ready();

    let update = app.update(Event::LocateMeRequested, &mut model);
    let mut request = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Geolocation(request) => Some(request),
            _ => None,
        })
        .expect("geolocation request");
    let update = app
        .resolve(
            &mut request,
            Err(navigator_core::capabilities::PositionError::Timeout),
        )
        .expect("position resolves");

    let mut alerts = Vec::new();
    for event in update.events {
        for effect in app.update(event, &mut model).effects {
            if let Effect::Alert(request) = effect {
                alerts.push(request.operation.message);
            }
        }
    }
    assert_eq!(
        alerts,
        vec![
            "Unable to access your current location. Please check your browser permissions."
                .to_string()
        ]
    );
    assert!(model.start.coords.is_none());
}

#[test]
fn test_position_before_map_surface_is_not_recentred_later() {
    let (app, mut model) = ready();

    let update = app.update(Event::LocateMeRequested, &mut model);
    let mut request = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Geolocation(request) => Some(request),
            _ => None,
        })
        .expect("geolocation request");
    let update = app
        .resolve(&mut request, Ok(position(-6.2, 106.8)))
        .expect("position resolves");
    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, &mut model).effects);
    }

    assert!(!effects.iter().any(|e| matches!(e, Effect::MapSurface(_))));
    assert_eq!(model.start.coords, LatLng::new(-6.2, 106.8).ok());

    let update = app.update(Event::MapSurfaceReady, &mut model);
    assert!(!update.effects.iter().any(|e| matches!(e, Effect::MapSurface(_))));
    assert_eq!(model.start.coords, LatLng::new(-6.2, 106.8).ok());
}
