use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::model::LatLng;
use crate::route::LatLngBounds;

/// Imperative camera commands for the live map owned by the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapSurfaceOperation {
    SetCenter { center: LatLng, zoom: f64 },
    FitBounds { bounds: LatLngBounds },
}

impl Operation for MapSurfaceOperation {
    type Output = ();
}

pub struct MapSurface<E> {
    context: CapabilityContext<MapSurfaceOperation, E>,
}

impl<Ev> Capability<Ev> for MapSurface<Ev> {
    type Operation = MapSurfaceOperation;
    type MappedSelf<MappedEv> = MapSurface<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        MapSurface::new(self.context.map_event(f))
    }
}

impl<E> MapSurface<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<MapSurfaceOperation, E>) -> Self {
        Self { context }
    }

    pub fn set_center(&self, center: LatLng, zoom: f64) {
        self.notify(MapSurfaceOperation::SetCenter { center, zoom });
    }

    pub fn fit_bounds(&self, bounds: LatLngBounds) {
        self.notify(MapSurfaceOperation::FitBounds { bounds });
    }

    fn notify(&self, operation: MapSurfaceOperation) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(operation).await;
        });
    }
}
