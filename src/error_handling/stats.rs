//! Processing statistics tracking.
//!
//! This module provides thread-safe counters for transport errors, entry
//! outcomes and the strategies that produced responses during a run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ErrorType, OutcomeType};
use crate::fetch::StrategyKind;

/// Thread-safe processing statistics tracker.
///
/// All counters are created up front (one per enum variant) so increments never
/// allocate. Shared across tasks through `Arc`.
pub struct ProcessingStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    outcomes: HashMap<OutcomeType, AtomicUsize>,
    strategies: HashMap<StrategyKind, AtomicUsize>,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    pub fn new() -> Self {
        ProcessingStats {
            errors: ErrorType::iter().map(|e| (e, AtomicUsize::new(0))).collect(),
            outcomes: OutcomeType::iter()
                .map(|o| (o, AtomicUsize::new(0)))
                .collect(),
            strategies: StrategyKind::iter()
                .map(|s| (s, AtomicUsize::new(0)))
                .collect(),
        }
    }

    /// Increment an error counter.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map",
                error
            );
        }
    }

    /// Increment an outcome counter.
    pub fn increment_outcome(&self, outcome: OutcomeType) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment outcome counter for {:?} which is not in the map",
                outcome
            );
        }
    }

    /// Record that `strategy` produced a response.
    pub fn increment_strategy(&self, strategy: StrategyKind) {
        if let Some(counter) = self.strategies.get(&strategy) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn get_outcome_count(&self, outcome: OutcomeType) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn get_strategy_count(&self, strategy: StrategyKind) -> usize {
        self.strategies
            .get(&strategy)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }

    /// Get total number of entries with a recorded outcome.
    pub fn total_outcomes(&self) -> usize {
        OutcomeType::iter().map(|o| self.get_outcome_count(o)).sum()
    }
}
