//! Bulk messaging: one text to many recipients, paced and reported.
//!
//! [`check_numbers`] runs the existence check alone and groups the numbers into a
//! [`NumberReport`].
//!
//! A run goes through four stages:
//! 1. [`CandidateSet::parse`] turns free text into unique recipients,
//! 2. an optional existence check splits them into deliverable and skipped,
//! 3. the [`Dispatcher`] sends to each deliverable recipient in order, sleeping `delay`
//!    between sends,
//! 4. [`DispatchReport`] collects one outcome per candidate and renders the text report.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use evoapi::bulk::{BulkCommand, BulkRequest, RunOutcome};
//! use evoapi::{ApiKey, BaseUrl, EvolutionClient, InstanceName, MessageText};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EvolutionClient::new(BaseUrl::new("http://localhost:8080")?, ApiKey::new("...")?);
//!     let command = BulkCommand::new(Arc::new(client));
//!     let request = BulkRequest {
//!         instance: InstanceName::new("my-business")?,
//!         numbers: "5511999999999, 5511888888888".to_owned(),
//!         text: MessageText::new("hello")?,
//!         delay: Duration::from_millis(800),
//!         validate: true,
//!     };
//!     if let RunOutcome::Completed(report) = command.run(&request).await {
//!         println!("{}", report.render());
//!     }
//!     Ok(())
//! }
//! ```

mod candidates;
mod dispatch;
mod gateway;
mod lookup;
mod progress;
mod report;
mod validate;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::domain::{InstanceName, MessageText};

pub use candidates::CandidateSet;
pub use dispatch::{Dispatcher, UNKNOWN_FAILURE};
pub use gateway::{MessageGateway, Sleeper, TokioSleeper};
pub use lookup::{INVALID_HEADER, NumberReport, VALID_HEADER, check_numbers};
pub use progress::{NoProgress, ProgressReporter, TracingProgress};
pub use report::{DeliveryOutcome, DeliveryStatus, DispatchReport, REPORT_HEADER};
pub use validate::{NOT_IN_RESPONSE, NOT_REGISTERED, Partition, check_candidates, partition};

#[derive(Debug, Clone)]
/// Everything one submitted bulk form carries.
pub struct BulkRequest {
    pub instance: InstanceName,
    /// Raw recipient list: numbers separated by newlines and/or commas.
    pub numbers: String,
    pub text: MessageText,
    /// Pause between consecutive sends. Zero sends back to back.
    pub delay: Duration,
    /// Check which numbers are registered before sending.
    pub validate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Another run on the same command was still in flight; nothing was done.
    Busy,
    /// The input held no recipients; no remote call was made.
    NoCandidates,
    Completed(DispatchReport),
}

/// A bulk-send command. At most one run is in flight per instance of this type.
pub struct BulkCommand {
    gateway: Arc<dyn MessageGateway>,
    sleeper: Arc<dyn Sleeper>,
    progress: Arc<dyn ProgressReporter>,
    busy: AtomicBool,
}

impl BulkCommand {
    /// Command with wall-clock pacing and `tracing` progress events.
    pub fn new(gateway: Arc<dyn MessageGateway>) -> Self {
        Self {
            gateway,
            sleeper: Arc::new(TokioSleeper),
            progress: Arc::new(TracingProgress),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Execute one run.
    ///
    /// A call made while another run is in flight returns [`RunOutcome::Busy`] at once.
    /// Once sending starts, every candidate ends up in the report: send failures are recorded,
    /// never retried, and never abort the run.
    pub async fn run(&self, request: &BulkRequest) -> RunOutcome {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            debug!("bulk run already in progress, ignoring duplicate submission");
            return RunOutcome::Busy;
        };

        let candidates = CandidateSet::parse(&request.numbers);
        if candidates.duplicates() > 0 {
            self.progress.duplicates_removed(candidates.duplicates());
        }
        if candidates.is_empty() {
            self.progress.no_candidates();
            return RunOutcome::NoCandidates;
        }

        let Partition {
            deliverable,
            skipped,
        } = if request.validate {
            self.progress.validating(candidates.len());
            match check_candidates(self.gateway.as_ref(), &request.instance, &candidates).await {
                Ok(partition) => partition,
                Err(err) => {
                    self.progress.validation_failed(&err);
                    Partition {
                        deliverable: candidates.as_slice().to_vec(),
                        skipped: Vec::new(),
                    }
                }
            }
        } else {
            Partition {
                deliverable: candidates.as_slice().to_vec(),
                skipped: Vec::new(),
            }
        };

        let dispatched = if deliverable.is_empty() {
            Vec::new()
        } else {
            self.progress.sending(deliverable.len());
            let dispatcher = Dispatcher {
                gateway: self.gateway.as_ref(),
                sleeper: self.sleeper.as_ref(),
                progress: self.progress.as_ref(),
            };
            dispatcher
                .dispatch(&request.instance, &deliverable, &request.text, request.delay)
                .await
        };

        let report = DispatchReport::assemble(&candidates, skipped, dispatched, request.validate);
        self.progress.summary(&report);
        RunOutcome::Completed(report)
    }
}

/// Clears the busy flag on drop, including when a run future is dropped mid-flight.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
