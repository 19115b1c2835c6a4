//! Submission payload assembly.
//!
//! DESIGN
//! ======
//! Assembly is a pure, total function of the draft. Rows without a selection
//! are dropped silently, numeric text degrades to `0` instead of failing, and
//! absent switches read as `false`. A report that is submittable but possibly
//! wrong is preferred over a blocked submission.
//!
//! Incidents and orders share one backend collection (`details_produits`)
//! distinguished by a literal `type_detail` tag; they are concatenated, never
//! deduplicated, so the same product may appear once per tag.

#[cfg(test)]
#[path = "payload_test.rs"]
mod payload_test;

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateId;
use crate::row::Row;
use crate::section::DynamicSection;
use crate::visit::{self, VisitDraft};

/// Discriminator of a `details_produits` entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailKind {
    #[serde(rename = "incident")]
    Incident,
    #[serde(rename = "commande")]
    Order,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    #[serde(rename = "produit_id")]
    pub product_id: CandidateId,
    #[serde(rename = "quantite_en_stock")]
    pub quantity_in_stock: i64,
    #[serde(rename = "est_en_rupture")]
    pub out_of_stock: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetailLine {
    #[serde(rename = "produit_id")]
    pub product_id: CandidateId,
    #[serde(rename = "quantite")]
    pub quantity: i64,
    pub observation: String,
    #[serde(rename = "type_detail")]
    pub kind: DetailKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorWatchLine {
    #[serde(rename = "concurrent_id")]
    pub competitor_id: CandidateId,
    #[serde(rename = "nombre_packs")]
    pub packs: i64,
    #[serde(rename = "activite_observee")]
    pub activity: String,
    #[serde(rename = "mecanisme")]
    pub mechanism: String,
    #[serde(rename = "marque")]
    pub brand: String,
}

/// Request body of `POST /visites/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitPayload {
    pub client_id: i64,
    pub fifo: bool,
    pub planogramme: bool,
    pub observations_generales: String,
    pub releves_stock: Vec<StockLine>,
    pub details_produits: Vec<ProductDetailLine>,
    pub veilles_concurrentielles: Vec<CompetitorWatchLine>,
}

/// Parse the leading integer of `raw` the way a lenient form field would.
///
/// Leading whitespace and one sign are accepted, then the longest run of
/// ASCII digits is taken; anything after it is ignored. No digits yields
/// `0`. Values beyond `i64` saturate.
#[must_use]
pub fn parse_int_lenient(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(byte - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Rows of `section` that have a selection, paired with it, in row order.
pub fn complete_rows(section: &DynamicSection) -> impl Iterator<Item = (&Row, CandidateId)> {
    section
        .rows()
        .iter()
        .filter_map(|row| row.selection.map(|id| (row, id)))
}

/// Concatenate the complete rows of several sections into one list, passing
/// each section's tag to `convert`. Order follows `parts`, then row order.
pub fn merge_tagged<'a, K, T>(
    parts: impl IntoIterator<Item = (K, &'a DynamicSection)>,
    convert: impl Fn(K, &Row, CandidateId) -> T,
) -> Vec<T>
where
    K: Copy,
{
    let mut merged = Vec::new();
    for (tag, section) in parts {
        merged.extend(complete_rows(section).map(|(row, id)| convert(tag, row, id)));
    }
    merged
}

fn stock_line(row: &Row, id: CandidateId) -> StockLine {
    StockLine {
        product_id: id,
        quantity_in_stock: parse_int_lenient(row.text(visit::QUANTITY)),
        out_of_stock: row.flag(visit::OUT_OF_STOCK),
    }
}

fn product_detail_line(kind: DetailKind, row: &Row, id: CandidateId) -> ProductDetailLine {
    ProductDetailLine {
        product_id: id,
        quantity: parse_int_lenient(row.text(visit::QUANTITY)),
        observation: row.text(visit::OBSERVATION).to_owned(),
        kind,
    }
}

fn competitor_watch_line(row: &Row, id: CandidateId) -> CompetitorWatchLine {
    CompetitorWatchLine {
        competitor_id: id,
        packs: parse_int_lenient(row.text(visit::PACKS)),
        activity: row.text(visit::ACTIVITY).to_owned(),
        mechanism: row.text(visit::MECHANISM).to_owned(),
        brand: String::new(),
    }
}

/// Build the request body for a finished draft. Never fails.
#[must_use]
pub fn assemble_visit(draft: &VisitDraft) -> VisitPayload {
    VisitPayload {
        client_id: draft.client_id,
        fifo: draft.fifo,
        planogramme: draft.planogramme,
        observations_generales: draft.observations.clone(),
        releves_stock: complete_rows(&draft.stocks).map(|(row, id)| stock_line(row, id)).collect(),
        details_produits: merge_tagged(
            [(DetailKind::Incident, &draft.incidents), (DetailKind::Order, &draft.orders)],
            product_detail_line,
        ),
        veilles_concurrentielles: complete_rows(&draft.watches)
            .map(|(row, id)| competitor_watch_line(row, id))
            .collect(),
    }
}
