//! The visit-report form: summary switches, free observations, and four
//! dynamic sections built from the product and competitor catalogs.

#[cfg(test)]
#[path = "visit_test.rs"]
mod visit_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::section::{DynamicSection, FieldSpec, SectionConfig, ToggleSpec};

pub const QUANTITY: &str = "quantite";
pub const OBSERVATION: &str = "observation";
pub const OUT_OF_STOCK: &str = "en_rupture";
pub const PACKS: &str = "packs";
pub const ACTIVITY: &str = "activite";
pub const MECHANISM: &str = "mecanisme";

const PRODUCT_PLACEHOLDER: &str = "Select a product...";
const COMPETITOR_PLACEHOLDER: &str = "Select a competitor...";

/// Names of the dynamic sections of a visit report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    Stocks,
    Incidents,
    Orders,
    Watches,
}

impl SectionName {
    pub const ALL: [Self; 4] = [Self::Stocks, Self::Incidents, Self::Orders, Self::Watches];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::Incidents => "incidents",
            Self::Orders => "orders",
            Self::Watches => "watches",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[must_use]
pub fn stock_section(products: Vec<Candidate>) -> DynamicSection {
    DynamicSection::new(
        SectionConfig::new("Stock levels & stock-outs", PRODUCT_PLACEHOLDER, products)
            .with_field(FieldSpec::numeric(QUANTITY, "Quantity in stock"))
            .with_toggle(ToggleSpec::new(OUT_OF_STOCK, "Out of stock")),
    )
}

#[must_use]
pub fn incident_section(products: Vec<Candidate>) -> DynamicSection {
    DynamicSection::new(
        SectionConfig::new("Incidents", PRODUCT_PLACEHOLDER, products)
            .with_field(FieldSpec::numeric(QUANTITY, "Quantity"))
            .with_field(FieldSpec::text(OBSERVATION, "Observation (e.g. damaged)")),
    )
}

#[must_use]
pub fn order_section(products: Vec<Candidate>) -> DynamicSection {
    DynamicSection::new(
        SectionConfig::new("Order taking", PRODUCT_PLACEHOLDER, products)
            .with_field(FieldSpec::numeric(QUANTITY, "Quantity ordered"))
            .with_field(FieldSpec::text(OBSERVATION, "Observation")),
    )
}

#[must_use]
pub fn competitor_watch_section(competitors: Vec<Candidate>) -> DynamicSection {
    DynamicSection::new(
        SectionConfig::new("Competitive intelligence", COMPETITOR_PLACEHOLDER, competitors)
            .with_field(FieldSpec::numeric(PACKS, "Number of packs"))
            .with_field(FieldSpec::text(ACTIVITY, "Observed activity"))
            .with_field(FieldSpec::text(MECHANISM, "Mechanism")),
    )
}

/// Everything a merchandiser enters for one client visit.
///
/// Each draft owns its sections exclusively; nothing is shared between
/// drafts, and the whole draft is dropped once its payload is assembled.
#[derive(Clone, Debug)]
pub struct VisitDraft {
    pub client_id: i64,
    pub fifo: bool,
    pub planogramme: bool,
    pub observations: String,
    pub stocks: DynamicSection,
    pub incidents: DynamicSection,
    pub orders: DynamicSection,
    pub watches: DynamicSection,
}

impl VisitDraft {
    /// Empty draft. FIFO and planogram compliance start checked.
    #[must_use]
    pub fn new(client_id: i64, products: Vec<Candidate>, competitors: Vec<Candidate>) -> Self {
        Self {
            client_id,
            fifo: true,
            planogramme: true,
            observations: String::new(),
            stocks: stock_section(products.clone()),
            incidents: incident_section(products.clone()),
            orders: order_section(products),
            watches: competitor_watch_section(competitors),
        }
    }

    #[must_use]
    pub fn section(&self, name: SectionName) -> &DynamicSection {
        match name {
            SectionName::Stocks => &self.stocks,
            SectionName::Incidents => &self.incidents,
            SectionName::Orders => &self.orders,
            SectionName::Watches => &self.watches,
        }
    }

    pub fn section_mut(&mut self, name: SectionName) -> &mut DynamicSection {
        match name {
            SectionName::Stocks => &mut self.stocks,
            SectionName::Incidents => &mut self.incidents,
            SectionName::Orders => &mut self.orders,
            SectionName::Watches => &mut self.watches,
        }
    }
}
