use std::time::Duration;

use crate::client::{BoxFuture, EvolutionClient, EvolutionError};
use crate::domain::{InstanceName, MessageText, NumberCheck, RecipientId, SendText};

/// The two remote calls a bulk run needs.
pub trait MessageGateway: Send + Sync {
    /// One batched existence lookup for every number.
    fn check_existence<'a>(
        &'a self,
        instance: &'a InstanceName,
        numbers: &'a [RecipientId],
    ) -> BoxFuture<'a, Result<Vec<NumberCheck>, EvolutionError>>;

    /// One text message to one recipient.
    fn deliver_text<'a>(
        &'a self,
        instance: &'a InstanceName,
        recipient: &'a RecipientId,
        text: &'a MessageText,
    ) -> BoxFuture<'a, Result<(), EvolutionError>>;
}

impl MessageGateway for EvolutionClient {
    fn check_existence<'a>(
        &'a self,
        instance: &'a InstanceName,
        numbers: &'a [RecipientId],
    ) -> BoxFuture<'a, Result<Vec<NumberCheck>, EvolutionError>> {
        Box::pin(self.check_whatsapp_numbers(instance, numbers))
    }

    fn deliver_text<'a>(
        &'a self,
        instance: &'a InstanceName,
        recipient: &'a RecipientId,
        text: &'a MessageText,
    ) -> BoxFuture<'a, Result<(), EvolutionError>> {
        Box::pin(async move {
            let request = SendText::new(recipient.clone(), text.clone());
            self.send_text(instance, &request).await.map(|_| ())
        })
    }
}

/// Pacing capability, so runs can be tested without waiting on the wall clock.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
