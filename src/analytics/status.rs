//! Pure predicates classifying a single objective from its key results.
//! All of them are side-effect free and run over already-loaded rows, so
//! they can be tested against in-memory fixtures without a store.

use chrono::NaiveDate;

use crate::storage::models::{KeyResult, KeyResultStatus};

/// Date-windowed on-track check: the objective has at least one key result
/// and none of them is both incomplete and updated on or after `cutoff`.
/// A key result without an update date never matches the date predicate.
pub fn is_on_track(key_results: &[KeyResult], cutoff: NaiveDate) -> bool {
    !key_results.is_empty()
        && !key_results.iter().any(|kr| {
            kr.status != KeyResultStatus::Complete
                && kr.updated_on.is_some_and(|d| d >= cutoff)
        })
}

/// The department-rollup on-track rule: at least one key result and none
/// pending, with no date gate. Deliberately distinct from [`is_on_track`];
/// the overview summary and the per-department ratios use different rules.
pub fn has_no_pending(key_results: &[KeyResult]) -> bool {
    !key_results.is_empty()
        && key_results
            .iter()
            .all(|kr| kr.status == KeyResultStatus::Complete)
}

/// True iff any key result was updated on or after `cutoff`. Vacuously false
/// for an objective without key results.
pub fn is_recently_updated(key_results: &[KeyResult], cutoff: NaiveDate) -> bool {
    key_results
        .iter()
        .any(|kr| kr.updated_on.is_some_and(|d| d >= cutoff))
}

/// True iff any key result was updated in `[start, end]`, inclusive on both
/// ends. `start` is always the earlier of the two cutoff dates.
pub fn is_updated_between(key_results: &[KeyResult], start: NaiveDate, end: NaiveDate) -> bool {
    key_results
        .iter()
        .any(|kr| kr.updated_on.is_some_and(|d| d >= start && d <= end))
}
