use std::collections::HashMap;
use std::fmt;

use crate::bulk::candidates::CandidateSet;
use crate::domain::RecipientId;

/// Header row of the rendered report.
pub const REPORT_HEADER: &str = "number,status,message";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    Sent,
    Failed,
    Skipped,
}

impl DeliveryStatus {
    /// Label used in the report's status column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sent => "OK",
            Self::Failed => "ERROR",
            Self::Skipped => "SKIPPED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What happened to one candidate. `detail` is stored unescaped.
pub struct DeliveryOutcome {
    pub recipient: RecipientId,
    pub status: DeliveryStatus,
    pub detail: Option<String>,
}

impl DeliveryOutcome {
    pub fn sent(recipient: RecipientId) -> Self {
        Self {
            recipient,
            status: DeliveryStatus::Sent,
            detail: None,
        }
    }

    pub fn failed(recipient: RecipientId, detail: impl Into<String>) -> Self {
        Self {
            recipient,
            status: DeliveryStatus::Failed,
            detail: Some(detail.into()),
        }
    }

    pub fn skipped(recipient: RecipientId, detail: impl Into<String>) -> Self {
        Self {
            recipient,
            status: DeliveryStatus::Skipped,
            detail: Some(detail.into()),
        }
    }

    fn render_row(&self) -> String {
        let recipient = self.recipient.raw();
        let status = self.status.label();
        match self.detail.as_deref().map(escape_detail) {
            Some(detail) if !detail.is_empty() => format!("{recipient},{status},{detail}"),
            _ => format!("{recipient},{status}"),
        }
    }
}

/// Keep a detail inside its column: commas and line breaks become spaces.
fn escape_detail(detail: &str) -> String {
    detail
        .chars()
        .map(|c| if matches!(c, ',' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of one dispatch run.
///
/// Invariant: `sent + failed + skipped == total == outcomes.len()`.
pub struct DispatchReport {
    sent: usize,
    failed: usize,
    skipped: usize,
    validated: bool,
    outcomes: Vec<DeliveryOutcome>,
}

impl DispatchReport {
    /// Merge pre-dispatch skips and dispatcher results back into candidate order.
    ///
    /// `dispatched` must follow candidate order with the skipped candidates left out, which is
    /// how the dispatcher produces it.
    pub fn assemble(
        candidates: &CandidateSet,
        skipped: Vec<DeliveryOutcome>,
        dispatched: Vec<DeliveryOutcome>,
        validated: bool,
    ) -> Self {
        let mut skipped = skipped
            .into_iter()
            .map(|outcome| (outcome.recipient.clone(), outcome))
            .collect::<HashMap<_, _>>();
        let mut dispatched = dispatched.into_iter();

        let outcomes = candidates
            .iter()
            .filter_map(|candidate| skipped.remove(candidate).or_else(|| dispatched.next()))
            .collect();
        Self::from_outcomes(outcomes, validated)
    }

    pub fn from_outcomes(outcomes: Vec<DeliveryOutcome>, validated: bool) -> Self {
        let count = |status| {
            outcomes
                .iter()
                .filter(|outcome| outcome.status == status)
                .count()
        };
        Self {
            sent: count(DeliveryStatus::Sent),
            failed: count(DeliveryStatus::Failed),
            skipped: count(DeliveryStatus::Skipped),
            validated,
            outcomes,
        }
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the existence check was enabled for the run.
    pub fn validated(&self) -> bool {
        self.validated
    }

    pub fn outcomes(&self) -> &[DeliveryOutcome] {
        &self.outcomes
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// `Sent: n, Failed: n[, Skipped: n], Total: n`; the skipped count only appears for
    /// validated runs.
    pub fn summary_line(&self) -> String {
        if self.validated {
            format!(
                "Sent: {}, Failed: {}, Skipped: {}, Total: {}",
                self.sent,
                self.failed,
                self.skipped,
                self.total()
            )
        } else {
            format!(
                "Sent: {}, Failed: {}, Total: {}",
                self.sent,
                self.failed,
                self.total()
            )
        }
    }

    /// Line-oriented report: header, one row per candidate, a blank line, the summary.
    pub fn render(&self) -> String {
        let mut out = String::from(REPORT_HEADER);
        out.push('\n');
        for outcome in &self.outcomes {
            out.push_str(&outcome.render_row());
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.summary_line());
        out
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> RecipientId {
        RecipientId::new(raw).unwrap()
    }

    #[test]
    fn renders_unvalidated_report_without_skipped_segment() {
        let report = DispatchReport::from_outcomes(
            vec![
                DeliveryOutcome::sent(id("5511")),
                DeliveryOutcome::failed(id("5522"), "HTTP 500"),
            ],
            false,
        );
        assert_eq!(
            report.render(),
            "number,status,message\n5511,OK\n5522,ERROR,HTTP 500\n\nSent: 1, Failed: 1, Total: 2"
        );
        assert!(report.has_failures());
    }

    #[test]
    fn renders_validated_report_with_skipped_segment() {
        let report = DispatchReport::from_outcomes(
            vec![
                DeliveryOutcome::sent(id("5511")),
                DeliveryOutcome::skipped(id("5522"), "not registered"),
            ],
            true,
        );
        assert_eq!(
            report.to_string(),
            "number,status,message\n5511,OK\n5522,SKIPPED,not registered\n\nSent: 1, Failed: 0, Skipped: 1, Total: 2"
        );
    }

    #[test]
    fn details_are_escaped_only_when_rendered() {
        let outcome = DeliveryOutcome::failed(id("5511"), "bad request, number invalid\r\nretry");
        let report = DispatchReport::from_outcomes(vec![outcome.clone()], false);
        assert_eq!(
            report.outcomes()[0].detail.as_deref(),
            Some("bad request, number invalid\r\nretry")
        );
        assert!(
            report
                .render()
                .contains("\n5511,ERROR,bad request  number invalid  retry\n")
        );
    }

    #[test]
    fn empty_report_keeps_layout() {
        let report = DispatchReport::from_outcomes(Vec::new(), true);
        assert_eq!(
            report.render(),
            "number,status,message\n\nSent: 0, Failed: 0, Skipped: 0, Total: 0"
        );
    }

    #[test]
    fn assemble_restores_candidate_order() {
        let candidates = CandidateSet::parse("a,b,c,d");
        let skipped = vec![
            DeliveryOutcome::skipped(id("c"), "not registered"),
            DeliveryOutcome::skipped(id("a"), "not registered"),
        ];
        let dispatched = vec![
            DeliveryOutcome::sent(id("b")),
            DeliveryOutcome::failed(id("d"), "boom"),
        ];

        let report = DispatchReport::assemble(&candidates, skipped, dispatched, true);
        let order = report
            .outcomes()
            .iter()
            .map(|outcome| (outcome.recipient.raw(), outcome.status))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            [
                ("a", DeliveryStatus::Skipped),
                ("b", DeliveryStatus::Sent),
                ("c", DeliveryStatus::Skipped),
                ("d", DeliveryStatus::Failed),
            ]
        );
        assert_eq!(
            report.sent() + report.failed() + report.skipped(),
            report.total()
        );
        assert_eq!(report.total(), candidates.len());
    }
}
