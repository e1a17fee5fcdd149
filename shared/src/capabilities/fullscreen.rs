use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FullscreenOperation {
    /// Exclusive presentation of the map container element.
    Enter,
    Exit,
}

impl Operation for FullscreenOperation {
    type Output = FullscreenResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FullscreenError {
    #[error("fullscreen denied: {reason}")]
    Denied { reason: String },

    #[error("fullscreen not supported")]
    Unsupported,
}

impl FullscreenError {
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Denied { reason } => reason,
            Self::Unsupported => "fullscreen is not supported",
        }
    }
}

pub type FullscreenResult = Result<(), FullscreenError>;

pub struct Fullscreen<E> {
    context: CapabilityContext<FullscreenOperation, E>,
}

impl<Ev> Capability<Ev> for Fullscreen<Ev> {
    type Operation = FullscreenOperation;
    type MappedSelf<MappedEv> = Fullscreen<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Fullscreen::new(self.context.map_event(f))
    }
}

impl<E> Fullscreen<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<FullscreenOperation, E>) -> Self {
        Self { context }
    }

    pub fn enter<F>(&self, callback: F)
    where
        F: FnOnce(FullscreenResult) -> E + Send + 'static,
    {
        self.request(FullscreenOperation::Enter, callback);
    }

    pub fn exit<F>(&self, callback: F)
    where
        F: FnOnce(FullscreenResult) -> E + Send + 'static,
    {
        self.request(FullscreenOperation::Exit, callback);
    }

    fn request<F>(&self, operation: FullscreenOperation, callback: F)
    where
        F: FnOnce(FullscreenResult) -> E + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(callback(result));
        });
    }
}
