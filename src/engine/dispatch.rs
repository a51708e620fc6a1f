//! Bounded fan-out of publish units across tokio tasks.

use crate::engine::unit::{PublishUnit, UnitOutcome};
use crate::types::Entity;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Counts of unit outcomes for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub published: usize,
    pub empty: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[UnitOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome {
                UnitOutcome::Published(_) => summary.published += 1,
                UnitOutcome::Empty(_) | UnitOutcome::Unsupported(_) => summary.empty += 1,
                UnitOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

/// Run one unit per entity with at most `max_workers` in flight.
///
/// Every entity spawns its own task, so a stalled channel call holds only
/// one permit. Outcomes are returned in completion order.
pub(crate) async fn dispatch(
    unit: PublishUnit,
    entities: Vec<Entity>,
    max_workers: usize,
) -> Vec<UnitOutcome> {
    let unit = Arc::new(unit);
    let permits = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut workers = JoinSet::new();
    let total = entities.len();

    for entity in entities {
        let unit = Arc::clone(&unit);
        let permits = Arc::clone(&permits);
        workers.spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return UnitOutcome::Failed {
                        guid: entity.guid,
                        reason: "worker pool closed".to_string(),
                    }
                }
            };
            unit.run(entity).await
        });
    }

    let mut outcomes = Vec::with_capacity(total);
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => warn!(error = %e, "Publish worker did not complete"),
        }
    }
    debug!(total, completed = outcomes.len(), "Dispatch finished");
    outcomes
}
