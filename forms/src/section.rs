//! Dynamic multi-row section state.
//!
//! DESIGN
//! ======
//! A section owns an ordered row list and a fixed candidate list. Rows are
//! appended by explicit action, edited field by field, and removed by key;
//! positions are never used as identity. The section refuses to grow past
//! the candidate count so every row can end up with a distinct selection.
//!
//! Adding a row when no candidate is left is a disabled affordance, not an
//! error: `add_row` returns `None` and leaves the state untouched.

#[cfg(test)]
#[path = "section_test.rs"]
mod section_test;

use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, CandidateId};
use crate::options;
use crate::row::{Row, RowEdit, RowKey};

/// Error returned by [`DynamicSection::update_row`] and [`DynamicSection::select`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    #[error("no row {0} in this section")]
    UnknownRow(RowKey),
    #[error("field `{0}` is not part of this section")]
    UnknownField(String),
    #[error("candidate {id} is not available for row {key}")]
    Unavailable { key: RowKey, id: CandidateId },
}

/// Input kind of a free-form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Numeric,
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub placeholder: String,
}

impl FieldSpec {
    #[must_use]
    pub fn numeric(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self { name: name.into(), kind: FieldKind::Numeric, placeholder: placeholder.into() }
    }

    #[must_use]
    pub fn text(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self { name: name.into(), kind: FieldKind::Text, placeholder: placeholder.into() }
    }
}

/// A boolean switch shown on every row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleSpec {
    pub name: String,
    pub label: String,
}

impl ToggleSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self { name: name.into(), label: label.into() }
    }
}

/// Construction-time configuration of a section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub title: String,
    /// Prompt shown on the selection input before a candidate is picked.
    pub placeholder: String,
    pub candidates: Vec<Candidate>,
    pub fields: Vec<FieldSpec>,
    pub toggles: Vec<ToggleSpec>,
}

impl SectionConfig {
    #[must_use]
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            title: title.into(),
            placeholder: placeholder.into(),
            candidates,
            fields: Vec::new(),
            toggles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_toggle(mut self, toggle: ToggleSpec) -> Self {
        self.toggles.push(toggle);
        self
    }

    fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    fn has_toggle(&self, name: &str) -> bool {
        self.toggles.iter().any(|toggle| toggle.name == name)
    }
}

/// Ordered rows bound without repetition to a fixed candidate list.
#[derive(Clone, Debug)]
pub struct DynamicSection {
    config: SectionConfig,
    rows: Vec<Row>,
    next_key: u64,
}

impl DynamicSection {
    #[must_use]
    pub fn new(config: SectionConfig) -> Self {
        Self { config, rows: Vec::new(), next_key: 0 }
    }

    /// Build a section with one row per distinct known candidate in
    /// `selections`. Unknown and repeated ids are skipped.
    #[must_use]
    pub fn prefilled(config: SectionConfig, selections: impl IntoIterator<Item = CandidateId>) -> Self {
        let mut section = Self::new(config);
        for id in selections {
            let known = section.config.candidates.iter().any(|candidate| candidate.id == id);
            let used = section.rows.iter().any(|row| row.selection == Some(id));
            if !known || used {
                continue;
            }
            if section.add_row().is_some() {
                if let Some(row) = section.rows.last_mut() {
                    row.selection = Some(id);
                }
            }
        }
        section
    }

    #[must_use]
    pub fn config(&self) -> &SectionConfig {
        &self.config
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.config.title
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.config.candidates
    }

    /// Current rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, key: RowKey) -> Option<&Row> {
        self.rows.iter().find(|row| row.key == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn can_add_row(&self) -> bool {
        self.rows.len() < self.config.candidates.len()
    }

    /// Append a blank row. Returns `None` without touching state when every
    /// candidate already has a row.
    pub fn add_row(&mut self) -> Option<RowKey> {
        if !self.can_add_row() {
            return None;
        }
        let key = RowKey(self.next_key);
        self.next_key = self.next_key.saturating_add(1);
        self.rows.push(Row::blank(key));
        tracing::debug!(section = %self.config.title, %key, "row added");
        Some(key)
    }

    /// Apply one field edit to the row matching `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::UnknownRow`] when no row has `key` and
    /// [`SectionError::UnknownField`] when a text or toggle name is not part
    /// of this section's schema. Selections are not checked for uniqueness
    /// here; callers pick from [`DynamicSection::available_options_for`].
    pub fn update_row(&mut self, key: RowKey, edit: RowEdit) -> Result<(), SectionError> {
        match &edit {
            RowEdit::Select(_) => {}
            RowEdit::Text { name, .. } => {
                if !self.config.has_field(name) {
                    return Err(SectionError::UnknownField(name.clone()));
                }
            }
            RowEdit::Toggle { name, .. } => {
                if !self.config.has_toggle(name) {
                    return Err(SectionError::UnknownField(name.clone()));
                }
            }
        }

        let row = self
            .rows
            .iter_mut()
            .find(|row| row.key == key)
            .ok_or(SectionError::UnknownRow(key))?;
        tracing::debug!(section = %self.config.title, %key, ?edit, "row updated");
        edit.apply(row);
        Ok(())
    }

    /// Bind row `key` to candidate `id`, refusing candidates the row is not
    /// offered.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::UnknownRow`] for a missing row and
    /// [`SectionError::Unavailable`] when `id` is unknown or held by another row.
    pub fn select(&mut self, key: RowKey, id: CandidateId) -> Result<(), SectionError> {
        if self.row(key).is_none() {
            return Err(SectionError::UnknownRow(key));
        }
        let offered = self.available_options_for(key).iter().any(|candidate| candidate.id == id);
        if !offered {
            return Err(SectionError::Unavailable { key, id });
        }
        self.update_row(key, RowEdit::Select(Some(id)))
    }

    /// Remove the row matching `key`. Remaining rows keep their order and keys.
    pub fn remove_row(&mut self, key: RowKey) -> Option<Row> {
        let index = self.rows.iter().position(|row| row.key == key)?;
        tracing::debug!(section = %self.config.title, %key, "row removed");
        Some(self.rows.remove(index))
    }

    /// Candidates row `key` may pick, in catalog order.
    #[must_use]
    pub fn available_options_for(&self, key: RowKey) -> Vec<&Candidate> {
        options::available_options(&self.rows, &self.config.candidates, key)
    }

    /// Label of the candidate bound to `key`, if any.
    #[must_use]
    pub fn selection_label(&self, key: RowKey) -> Option<&str> {
        let id = self.row(key)?.selection?;
        self.config
            .candidates
            .iter()
            .find(|candidate| candidate.id == id)
            .map(|candidate| candidate.label.as_str())
    }
}
