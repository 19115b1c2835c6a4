//! Draft files: the on-disk form of a visit report before submission.
//!
//! DESIGN
//! ======
//! A draft file lists rows per section the way a merchandiser enters them.
//! Building a `VisitDraft` replays every row through the section operations
//! (`add_row`, `select`, `update_row`) instead of writing state directly, so
//! a file can never produce a draft the interactive form would refuse: a
//! product picked twice in one section fails with the same `Unavailable`
//! error the picker would have prevented.
//!
//! Field values are kept as raw text. Numbers in the file are accepted and
//! stringified; coercion happens once, in payload assembly.

#[cfg(test)]
#[path = "draft_test.rs"]
mod draft_test;

use std::collections::BTreeMap;

use api::types::{Competitor, Product};
use forms::{Candidate, CandidateId, RowEdit, SectionError, SectionName, VisitDraft};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("{section}: row {index} exceeds the {available} selectable entries")]
    TooManyRows { section: SectionName, index: usize, available: usize },
    #[error("{section}: row {index}: {source}")]
    Row {
        section: SectionName,
        index: usize,
        source: SectionError,
    },
}

fn default_true() -> bool {
    true
}

/// One visit report as stored in a draft file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DraftFile {
    #[serde(default = "default_true")]
    pub fifo: bool,
    #[serde(default = "default_true")]
    pub planogramme: bool,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub stocks: Vec<DraftRow>,
    #[serde(default)]
    pub incidents: Vec<DraftRow>,
    #[serde(default)]
    pub orders: Vec<DraftRow>,
    #[serde(default)]
    pub watches: Vec<DraftRow>,
}

/// One row: the picked catalog id plus raw field text and switches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub toggles: BTreeMap<String, bool>,
}

impl DraftFile {
    #[must_use]
    pub fn rows(&self, name: SectionName) -> &[DraftRow] {
        match name {
            SectionName::Stocks => &self.stocks,
            SectionName::Incidents => &self.incidents,
            SectionName::Orders => &self.orders,
            SectionName::Watches => &self.watches,
        }
    }

    /// A file with one blank row per section naming every field and switch.
    #[must_use]
    pub fn template() -> Self {
        let blank = VisitDraft::new(0, Vec::new(), Vec::new());
        let row_for = |name: SectionName| {
            let config = blank.section(name).config();
            DraftRow {
                id: None,
                fields: config
                    .fields
                    .iter()
                    .map(|field| (field.name.clone(), Value::String(String::new())))
                    .collect(),
                toggles: config.toggles.iter().map(|toggle| (toggle.name.clone(), false)).collect(),
            }
        };
        Self {
            fifo: true,
            planogramme: true,
            observations: String::new(),
            stocks: vec![row_for(SectionName::Stocks)],
            incidents: vec![row_for(SectionName::Incidents)],
            orders: vec![row_for(SectionName::Orders)],
            watches: vec![row_for(SectionName::Watches)],
        }
    }

    /// Replay this file into a fresh draft for `client_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::TooManyRows`] when a section lists more rows
    /// than it has candidates, and [`DraftError::Row`] when a row picks an
    /// unknown or already-used id or names a field the section lacks.
    pub fn build_visit(
        &self,
        client_id: i64,
        products: Vec<Candidate>,
        competitors: Vec<Candidate>,
    ) -> Result<VisitDraft, DraftError> {
        let mut draft = VisitDraft::new(client_id, products, competitors);
        draft.fifo = self.fifo;
        draft.planogramme = self.planogramme;
        draft.observations.clone_from(&self.observations);

        for name in SectionName::ALL {
            let section = draft.section_mut(name);
            for (index, row) in self.rows(name).iter().enumerate() {
                let key = section.add_row().ok_or_else(|| DraftError::TooManyRows {
                    section: name,
                    index,
                    available: section.candidates().len(),
                })?;
                let at = |source| DraftError::Row { section: name, index, source };

                if let Some(id) = row.id {
                    section.select(key, CandidateId(id)).map_err(at)?;
                }
                for (field, value) in &row.fields {
                    section.update_row(key, RowEdit::text(field, field_text(value))).map_err(at)?;
                }
                for (toggle, on) in &row.toggles {
                    section.update_row(key, RowEdit::toggle(toggle, *on)).map_err(at)?;
                }
            }
            tracing::debug!(section = %name, rows = section.len(), "draft section replayed");
        }
        Ok(draft)
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[must_use]
pub fn product_candidates(products: &[Product]) -> Vec<Candidate> {
    products.iter().map(|product| Candidate::new(product.id, product.name.clone())).collect()
}

#[must_use]
pub fn competitor_candidates(competitors: &[Competitor]) -> Vec<Candidate> {
    competitors
        .iter()
        .map(|competitor| Candidate::new(competitor.id, competitor.name.clone()))
        .collect()
}
