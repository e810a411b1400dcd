//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, OutcomeType, ProcessingStats};
use crate::fetch::StrategyKind;

/// Logs outcome, strategy and transport error counters.
pub fn print_processing_statistics(stats: &ProcessingStats) {
    let total_outcomes = stats.total_outcomes();
    if total_outcomes > 0 {
        info!("Outcome Counts ({} total):", total_outcomes);
        for outcome in OutcomeType::iter() {
            let count = stats.get_outcome_count(outcome);
            if count > 0 {
                info!("   {}: {}", outcome.as_str(), count);
            }
        }
    }

    let answered: usize = StrategyKind::iter()
        .map(|s| stats.get_strategy_count(s))
        .sum();
    if answered > 0 {
        info!("Responses by strategy ({} total):", answered);
        for strategy in StrategyKind::iter() {
            let count = stats.get_strategy_count(strategy);
            if count > 0 {
                info!("   {}: {}", strategy, count);
            }
        }
    }

    let total_errors = stats.total_errors();
    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_processing_statistics_empty() {
        let stats = ProcessingStats::new();
        // Should not panic when nothing was recorded
        print_processing_statistics(&stats);
    }

    #[test]
    fn test_print_processing_statistics_all_types() {
        let stats = ProcessingStats::new();
        stats.increment_outcome(OutcomeType::Updated);
        stats.increment_strategy(StrategyKind::Impersonate);
        stats.increment_error(ErrorType::HttpRequestConnectError);
        print_processing_statistics(&stats);
    }
}
