use std::fmt;

use tracing::info;

use crate::bulk::candidates::CandidateSet;
use crate::bulk::gateway::MessageGateway;
use crate::client::EvolutionError;
use crate::domain::{InstanceName, NumberCheck};

pub const VALID_HEADER: &str = "=== VALID NUMBERS ===";
pub const INVALID_HEADER: &str = "=== INVALID NUMBERS ===";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Standalone number check, split by registration. Both groups keep the gateway's order.
pub struct NumberReport {
    valid: Vec<NumberCheck>,
    invalid: Vec<NumberCheck>,
}

impl NumberReport {
    /// Anything the gateway did not confirm as existing lands in `invalid`.
    pub fn from_checks(checks: Vec<NumberCheck>) -> Self {
        let (valid, invalid) = checks.into_iter().partition(|check| check.exists);
        Self { valid, invalid }
    }

    pub fn valid(&self) -> &[NumberCheck] {
        &self.valid
    }

    pub fn invalid(&self) -> &[NumberCheck] {
        &self.invalid
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Summary: {} valid, {} invalid",
            self.valid.len(),
            self.invalid.len()
        )
    }

    /// Valid section (`number (jid)`), invalid section, then the summary; sections are
    /// separated by a blank line.
    pub fn render(&self) -> String {
        let mut lines = vec![VALID_HEADER.to_owned()];
        lines.extend(self.valid.iter().map(|check| match check.jid.as_deref() {
            Some(jid) => format!("{} ({jid})", check.number),
            None => check.number.clone(),
        }));
        lines.push(String::new());
        lines.push(INVALID_HEADER.to_owned());
        lines.extend(self.invalid.iter().map(|check| check.number.clone()));
        lines.push(String::new());
        lines.push(self.summary_line());
        lines.join("\n")
    }
}

impl fmt::Display for NumberReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// One batched existence lookup for the whole set.
///
/// Unlike a bulk run there is no fallback here: a failed lookup is the caller's error.
pub async fn check_numbers(
    gateway: &dyn MessageGateway,
    instance: &InstanceName,
    candidates: &CandidateSet,
) -> Result<NumberReport, EvolutionError> {
    let checks = gateway
        .check_existence(instance, candidates.as_slice())
        .await?;
    let report = NumberReport::from_checks(checks);
    info!(
        valid = report.valid().len(),
        invalid = report.invalid().len(),
        "number check complete"
    );
    Ok(report)
}
