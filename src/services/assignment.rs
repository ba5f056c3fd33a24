//! Zone-preferential routing of new leads to salespeople.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::config::StrategyKind;
use crate::models::user_model::User;

/// Chooses one salesperson out of a candidate set.
pub trait AssignmentStrategy: Send + Sync {
    /// Returns `None` only when `candidates` is empty.
    fn pick<'a>(&self, candidates: &[&'a User]) -> Option<&'a User>;
}

/// Independent uniform draw on every call. Repeated calls carry no memory,
/// so one salesperson can receive several leads in a row.
#[derive(Debug, Default)]
pub struct UniformRandom;

impl AssignmentStrategy for UniformRandom {
    fn pick<'a>(&self, candidates: &[&'a User]) -> Option<&'a User> {
        candidates.choose(&mut rand::thread_rng()).copied()
    }
}

/// Rotating cursor shared across all candidate sets.
#[derive(Debug, Default)]
pub struct RoundRobin {
    next: AtomicUsize,
}

impl AssignmentStrategy for RoundRobin {
    fn pick<'a>(&self, candidates: &[&'a User]) -> Option<&'a User> {
        if candidates.is_empty() {
            return None;
        }
        let i = self.next.fetch_add(1, Ordering::Relaxed) % candidates.len();
        Some(candidates[i])
    }
}

pub fn build_strategy(kind: StrategyKind) -> Arc<dyn AssignmentStrategy> {
    match kind {
        StrategyKind::Random => Arc::new(UniformRandom),
        StrategyKind::RoundRobin => Arc::new(RoundRobin::default()),
    }
}

/// Pick an assignee for a lead in `zone`.
///
/// Salespeople whose zone equals `zone` are preferred. With none there, any
/// salesperson is picked. With no salespeople at all the lead stays
/// unassigned. An empty zone never matches.
pub fn assign(zone: &str, users: &[User], strategy: &dyn AssignmentStrategy) -> Option<Uuid> {
    let salespeople: Vec<&User> = users.iter().filter(|u| u.is_salesman()).collect();

    if !zone.is_empty() {
        let in_zone: Vec<&User> = salespeople
            .iter()
            .copied()
            .filter(|u| u.zone == zone)
            .collect();
        if let Some(user) = strategy.pick(&in_zone) {
            return Some(user.id);
        }
    }

    strategy.pick(&salespeople).map(|u| u.id)
}
