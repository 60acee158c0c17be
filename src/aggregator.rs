// src/aggregator.rs
use crate::types::{ProbeOutcome, ProbeReport, ProbeStatus};

/// Merges per-platform outcomes into a single report.
///
/// Stable partition: `found` outcomes go into one sequence and
/// `not_found`/`error` into the other, both preserving the order the
/// outcomes were given in (the prober hands them over in catalog
/// order). Pure and total; network timing never leaks into the output.
pub fn aggregate(username: &str, outcomes: Vec<ProbeOutcome>) -> ProbeReport {
    let total_searched = outcomes.len();
    let (found_profiles, not_found_profiles): (Vec<_>, Vec<_>) = outcomes
        .into_iter()
        .partition(|outcome| outcome.status == ProbeStatus::Found);

    ProbeReport {
        username: username.to_string(),
        found_count: found_profiles.len(),
        total_searched,
        found_profiles,
        not_found_profiles,
        success: true,
    }
}
