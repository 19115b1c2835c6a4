//! Selectable catalog entries offered to a dynamic section.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an external catalog entry (product, competitor, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub i64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CandidateId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One option a row may bind to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub label: String,
}

impl Candidate {
    #[must_use]
    pub fn new(id: impl Into<CandidateId>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}
