use std::collections::HashMap;

use tracing::{debug, warn};

use crate::bulk::candidates::CandidateSet;
use crate::bulk::gateway::MessageGateway;
use crate::bulk::report::DeliveryOutcome;
use crate::client::EvolutionError;
use crate::domain::{InstanceName, NumberCheck, RecipientId};

pub const NOT_REGISTERED: &str = "not registered";
pub const NOT_IN_RESPONSE: &str = "not in validation response";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Candidates split by the existence check. Both halves keep candidate order.
pub struct Partition {
    pub deliverable: Vec<RecipientId>,
    pub skipped: Vec<DeliveryOutcome>,
}

/// Run the batched existence check for the whole set and partition the result.
pub async fn check_candidates(
    gateway: &dyn MessageGateway,
    instance: &InstanceName,
    candidates: &CandidateSet,
) -> Result<Partition, EvolutionError> {
    let checks = gateway
        .check_existence(instance, candidates.as_slice())
        .await?;
    Ok(partition(candidates, &checks))
}

/// Missing candidates are skipped rather than delivered blind.
pub fn partition(candidates: &CandidateSet, checks: &[NumberCheck]) -> Partition {
    let mut lookup = HashMap::<&str, &NumberCheck>::new();
    for check in checks {
        lookup.entry(match_key(&check.number)).or_insert(check);
    }

    let mut result = Partition::default();
    let mut missing = 0usize;
    for candidate in candidates {
        match lookup.get(match_key(candidate.raw())) {
            Some(check) if check.exists => {
                debug!(
                    number = candidate.raw(),
                    jid = check.jid.as_deref().unwrap_or_default(),
                    "number registered"
                );
                result.deliverable.push(candidate.clone());
            }
            Some(_) => result
                .skipped
                .push(DeliveryOutcome::skipped(candidate.clone(), NOT_REGISTERED)),
            None => {
                missing += 1;
                result
                    .skipped
                    .push(DeliveryOutcome::skipped(candidate.clone(), NOT_IN_RESPONSE));
            }
        }
    }

    if missing > 0 {
        warn!(missing, "validation response did not cover every number");
    }
    result
}

/// The gateway may echo numbers with or without a leading `+`.
fn match_key(number: &str) -> &str {
    let trimmed = number.trim();
    trimmed.strip_prefix('+').unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::report::DeliveryStatus;

    fn check(number: &str, exists: bool) -> NumberCheck {
        NumberCheck {
            number: number.to_owned(),
            exists,
            jid: exists.then(|| format!("{number}@s.whatsapp.net")),
        }
    }

    #[test]
    fn splits_registered_from_unregistered() {
        let candidates = CandidateSet::parse("A,B");
        let result = partition(&candidates, &[check("A", true), check("B", false)]);

        assert_eq!(result.deliverable, vec![RecipientId::new("A").unwrap()]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].recipient.raw(), "B");
        assert_eq!(result.skipped[0].status, DeliveryStatus::Skipped);
        assert_eq!(result.skipped[0].detail.as_deref(), Some(NOT_REGISTERED));
    }

    #[test]
    fn uncovered_candidates_are_skipped() {
        let candidates = CandidateSet::parse("A\nB\nC");
        let result = partition(&candidates, &[check("B", true)]);

        assert_eq!(result.deliverable, vec![RecipientId::new("B").unwrap()]);
        let skipped = result
            .skipped
            .iter()
            .map(|outcome| (outcome.recipient.raw(), outcome.detail.as_deref()))
            .collect::<Vec<_>>();
        assert_eq!(
            skipped,
            [("A", Some(NOT_IN_RESPONSE)), ("C", Some(NOT_IN_RESPONSE))]
        );
    }

    #[test]
    fn plus_prefix_differences_still_match() {
        let candidates = CandidateSet::parse("+5511, 5522");
        let result = partition(&candidates, &[check("5511", true), check("+5522", false)]);

        assert_eq!(result.deliverable, vec![RecipientId::new("+5511").unwrap()]);
        assert_eq!(result.skipped[0].recipient.raw(), "5522");
        assert_eq!(result.skipped[0].detail.as_deref(), Some(NOT_REGISTERED));
    }

    #[test]
    fn first_entry_wins_for_repeated_numbers() {
        let candidates = CandidateSet::parse("5511");
        let result = partition(&candidates, &[check("5511", false), check("5511", true)]);
        assert!(result.deliverable.is_empty());
        assert_eq!(result.skipped.len(), 1);
    }
}
