//! Covered call candidate selection and ranking

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{EnrichedOption, FilterConfig};

/// Counts from one selection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionStats {
    /// Rows in the combined table
    pub considered: usize,
    /// Rows that matched the predicate but carried a non-finite ranking field
    pub rejected_non_finite: usize,
    /// Rows kept
    pub selected: usize,
}

/// Candidate predicate, ignoring finiteness of the ranking fields
pub fn is_candidate(option: &EnrichedOption, config: &FilterConfig) -> bool {
    let row = &option.row;

    row.option_type == config.option_type
        && !option.expired
        && row.is_otm()
        && option.days_until_expiration >= config.min_days
        && row.volume > config.volume_above
        && row.open_interest > config.open_interest_above
}

/// Keep candidates with finite ranking fields, preserving input order
pub fn select_candidates(
    rows: Vec<EnrichedOption>,
    config: &FilterConfig,
) -> (Vec<EnrichedOption>, SelectionStats) {
    let mut stats = SelectionStats {
        considered: rows.len(),
        ..Default::default()
    };

    let mut selected = Vec::new();
    for option in rows {
        if !is_candidate(&option, config) {
            continue;
        }

        if !option.has_finite_ranking() {
            tracing::debug!(
                "Skipping {}: non-finite ranking {:?}",
                option.row.symbol,
                option.ranking_key()
            );
            stats.rejected_non_finite += 1;
            continue;
        }

        selected.push(option);
    }

    stats.selected = selected.len();
    (selected, stats)
}

/// Descending by annualized current profit, then insurance, then
/// annualized max profit
pub fn compare_ranking(a: &EnrichedOption, b: &EnrichedOption) -> Ordering {
    let (ka, kb) = (a.ranking_key(), b.ranking_key());

    kb[0]
        .total_cmp(&ka[0])
        .then_with(|| kb[1].total_cmp(&ka[1]))
        .then_with(|| kb[2].total_cmp(&ka[2]))
}

/// Stable sort; full ties keep their combined-table order
pub fn rank(rows: &mut [EnrichedOption]) {
    rows.sort_by(compare_ranking);
}
