use tracing::{info, warn};

use crate::bulk::report::{DeliveryOutcome, DeliveryStatus, DispatchReport};
use crate::client::EvolutionError;

/// Phase checkpoints of a bulk run. Purely observational: nothing a reporter does can change
/// the run's outcome.
pub trait ProgressReporter: Send + Sync {
    fn duplicates_removed(&self, _count: usize) {}

    fn no_candidates(&self) {}

    fn validating(&self, candidates: usize);

    /// The existence check failed; the run continues without it.
    fn validation_failed(&self, error: &EvolutionError);

    fn sending(&self, deliverable: usize);

    /// `position` is 1-based.
    fn item_finished(&self, _position: usize, _total: usize, _outcome: &DeliveryOutcome) {}

    fn summary(&self, report: &DispatchReport);
}

#[derive(Debug, Clone, Copy, Default)]
/// Emits every checkpoint as a `tracing` event.
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn duplicates_removed(&self, count: usize) {
        info!(duplicates = count, "removed duplicate numbers");
    }

    fn no_candidates(&self) {
        warn!("no numbers provided");
    }

    fn validating(&self, candidates: usize) {
        info!(candidates, "validating numbers");
    }

    fn validation_failed(&self, error: &EvolutionError) {
        warn!(%error, "number validation failed, proceeding without validation");
    }

    fn sending(&self, deliverable: usize) {
        info!(deliverable, "sending messages");
    }

    fn item_finished(&self, position: usize, total: usize, outcome: &DeliveryOutcome) {
        let recipient = outcome.recipient.raw();
        match outcome.status {
            DeliveryStatus::Sent => info!(position, total, recipient, "message sent"),
            DeliveryStatus::Failed => warn!(
                position,
                total,
                recipient,
                detail = outcome.detail.as_deref().unwrap_or_default(),
                "message failed"
            ),
            DeliveryStatus::Skipped => info!(position, total, recipient, "message skipped"),
        }
    }

    fn summary(&self, report: &DispatchReport) {
        let summary = report.summary_line();
        if report.has_failures() {
            warn!(
                sent = report.sent(),
                failed = report.failed(),
                skipped = report.skipped(),
                total = report.total(),
                "{summary}"
            );
        } else {
            info!(
                sent = report.sent(),
                failed = report.failed(),
                skipped = report.skipped(),
                total = report.total(),
                "{summary}"
            );
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn validating(&self, _candidates: usize) {}

    fn validation_failed(&self, _error: &EvolutionError) {}

    fn sending(&self, _deliverable: usize) {}

    fn summary(&self, _report: &DispatchReport) {}
}
