use std::time::Duration;

use crate::bulk::gateway::{MessageGateway, Sleeper};
use crate::bulk::progress::ProgressReporter;
use crate::bulk::report::DeliveryOutcome;
use crate::client::EvolutionError;
use crate::domain::{InstanceName, MessageText, RecipientId};

/// Detail recorded when a failed send carries no message of its own.
pub const UNKNOWN_FAILURE: &str = "ERROR";

/// Sequential sender: exactly one send per recipient, in order, never two in flight.
///
/// `delay` is waited between consecutive sends (not after the last one), independent of how
/// long each send took.
pub struct Dispatcher<'a> {
    pub gateway: &'a dyn MessageGateway,
    pub sleeper: &'a dyn Sleeper,
    pub progress: &'a dyn ProgressReporter,
}

impl Dispatcher<'_> {
    pub async fn dispatch(
        &self,
        instance: &InstanceName,
        recipients: &[RecipientId],
        text: &MessageText,
        delay: Duration,
    ) -> Vec<DeliveryOutcome> {
        let total = recipients.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, recipient) in recipients.iter().enumerate() {
            let outcome = match self.gateway.deliver_text(instance, recipient, text).await {
                Ok(()) => DeliveryOutcome::sent(recipient.clone()),
                Err(err) => DeliveryOutcome::failed(recipient.clone(), failure_detail(&err)),
            };
            self.progress.item_finished(index + 1, total, &outcome);
            outcomes.push(outcome);

            if !delay.is_zero() && index + 1 < total {
                self.sleeper.sleep(delay).await;
            }
        }

        outcomes
    }
}

fn failure_detail(err: &EvolutionError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNKNOWN_FAILURE.to_owned()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_messages_fall_back_to_error_label() {
        let err = EvolutionError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(failure_detail(&err), UNKNOWN_FAILURE);

        let err = EvolutionError::Api {
            status: 400,
            message: "number not found".to_owned(),
        };
        assert_eq!(failure_detail(&err), "number not found");
    }
}
