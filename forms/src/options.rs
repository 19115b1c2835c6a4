//! Per-row option filtering.
//!
//! DESIGN
//! ======
//! Uniqueness of selections across a section is enforced here, at the query
//! that decides what a row may pick, rather than when a selection is stored.
//! A row always sees its own current choice so re-selecting it never locks
//! the row out.

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;

use std::collections::HashSet;

use crate::candidate::{Candidate, CandidateId};
use crate::row::{Row, RowKey};

/// Candidates row `key` may pick, in catalog order.
///
/// Every candidate not held by some *other* row is returned, plus the
/// candidate `key` itself currently holds. An unknown `key` sees every
/// unused candidate.
#[must_use]
pub fn available_options<'a>(rows: &[Row], candidates: &'a [Candidate], key: RowKey) -> Vec<&'a Candidate> {
    let own = rows.iter().find(|row| row.key == key).and_then(|row| row.selection);
    let taken: HashSet<CandidateId> = rows
        .iter()
        .filter(|row| row.key != key)
        .filter_map(|row| row.selection)
        .collect();

    candidates
        .iter()
        .filter(|candidate| own == Some(candidate.id) || !taken.contains(&candidate.id))
        .collect()
}

/// Candidates no row currently holds, in catalog order.
#[must_use]
pub fn unused_candidates<'a>(rows: &[Row], candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
    let taken: HashSet<CandidateId> = rows.iter().filter_map(|row| row.selection).collect();
    candidates
        .iter()
        .filter(|candidate| !taken.contains(&candidate.id))
        .collect()
}
