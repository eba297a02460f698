//! Benefit estimation from the contribution history.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::config::BenefitConfig;

/// Estimate the monthly benefit as the mean of the most recent
/// `window_months` contributions, floored at the minimum wage and rounded to
/// two decimal places. No contributions means no estimate, and neither does
/// a total too large to represent.
///
/// `YYYY-MM` keys are zero-padded, so key order is chronological order.
pub fn estimate_benefit(
    contributions: &BTreeMap<String, Decimal>,
    config: &BenefitConfig,
) -> Option<Decimal> {
    let selected: Vec<Decimal> = contributions
        .keys()
        .rev()
        .take(config.window_months)
        .filter_map(|month| contributions.get(month).copied())
        .collect();

    if selected.is_empty() {
        return None;
    }

    let Some(total) = selected
        .iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(*amount))
    else {
        warn!(
            "Contribution total over {} months overflows, no benefit estimate",
            selected.len()
        );
        return None;
    };

    let mean = total / Decimal::from(selected.len());
    let estimate = mean.max(config.minimum_wage).round_dp(2);

    debug!(
        "Benefit estimate over {} months: mean {} -> {}",
        selected.len(),
        mean.round_dp(2),
        estimate
    );

    Some(estimate)
}
