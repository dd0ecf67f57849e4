use std::collections::HashSet;

use stokvel_core::Transaction;
use tracing::info;

/// Validate, deduplicate and sort raw candidate transactions.
///
/// Filters rows failing the core validity rules, drops later duplicates by
/// `(date, description, cents)` since multi-page statements repeat rows
/// across page boundaries, and sorts ascending by that same composite key.
/// Deterministic: the same input set always yields the same output,
/// regardless of page order, including distinct rows sharing a date.
pub fn validate_transactions(raw: Vec<Transaction>) -> Vec<Transaction> {
    let candidates = raw.len();
    let mut seen = HashSet::new();
    let mut valid: Vec<Transaction> = raw
        .into_iter()
        .filter(|tx| tx.is_valid())
        .filter(|tx| seen.insert(tx.dedup_key()))
        .collect();

    valid.sort_by_key(|tx| tx.dedup_key());

    if candidates > valid.len() {
        info!(
            dropped = candidates - valid.len(),
            kept = valid.len(),
            "validation dropped rows"
        );
    }
    valid
}
