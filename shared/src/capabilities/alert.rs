use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Blocking modal message. The only feedback channel for failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertOperation {
    pub message: String,
}

impl Operation for AlertOperation {
    type Output = ();
}

pub struct Alert<E> {
    context: CapabilityContext<AlertOperation, E>,
}

impl<Ev> Capability<Ev> for Alert<Ev> {
    type Operation = AlertOperation;
    type MappedSelf<MappedEv> = Alert<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Alert::new(self.context.map_event(f))
    }
}

impl<E> Alert<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<AlertOperation, E>) -> Self {
        Self { context }
    }

    pub fn show(&self, message: impl Into<String>) {
        let context = self.context.clone();
        let operation = AlertOperation {
            message: message.into(),
        };
        self.context.spawn(async move {
            context.notify_shell(operation).await;
        });
    }
}
