//! Rows of a dynamic section and the edits that mutate them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateId;

/// Opaque row identity, issued by the owning section's counter.
///
/// Keys are only used to address rows while the form is open; they are
/// never sent to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(pub(crate) u64);

impl RowKey {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One user-entered line in a section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub key: RowKey,
    /// `None` until the user picks a candidate.
    pub selection: Option<CandidateId>,
    pub texts: BTreeMap<String, String>,
    pub flags: BTreeMap<String, bool>,
}

impl Row {
    pub(crate) fn blank(key: RowKey) -> Self {
        Self { key, selection: None, texts: BTreeMap::new(), flags: BTreeMap::new() }
    }

    /// Text value of `name`, or `""` when the user never typed into it.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.texts.get(name).map_or("", String::as_str)
    }

    /// Switch value of `name`, or `false` when never toggled.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

/// A single field change addressed to one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowEdit {
    /// The reserved selection field.
    Select(Option<CandidateId>),
    /// A numeric or free-text input.
    Text { name: String, value: String },
    /// A boolean switch.
    Toggle { name: String, value: bool },
}

impl RowEdit {
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text { name: name.into(), value: value.into() }
    }

    #[must_use]
    pub fn toggle(name: impl Into<String>, value: bool) -> Self {
        Self::Toggle { name: name.into(), value }
    }

    pub(crate) fn apply(self, row: &mut Row) {
        match self {
            Self::Select(selection) => row.selection = selection,
            Self::Text { name, value } => {
                row.texts.insert(name, value);
            }
            Self::Toggle { name, value } => {
                row.flags.insert(name, value);
            }
        }
    }
}
