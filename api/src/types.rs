//! Wire DTOs mirroring the backend's JSON schemas.
//!
//! DESIGN
//! ======
//! Rust field names are English; `#[serde(rename)]` maps them onto the
//! backend's French keys. Optional backend columns are `Option` with
//! `#[serde(default)]` so older servers that omit them still deserialize.
//! Update bodies skip `None` fields so a partial update never clears data.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

pub use forms::VisitPayload;

/// Role names the backend is known to issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserRole {
    Administrator,
    Supervisor,
    Merchandiser,
    Other(String),
}

impl UserRole {
    /// Case-insensitive mapping from the backend's role name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "administrateur" | "admin" => Self::Administrator,
            "superviseur" => Self::Supervisor,
            "merchandiser" => Self::Merchandiser,
            _ => Self::Other(name.to_owned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(rename = "nom")]
    pub name: String,
    pub is_active: bool,
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchandiser {
    pub id: i64,
    pub user: User,
    #[serde(rename = "zone_geographique", default)]
    pub zone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supervisor {
    pub id: i64,
    pub user: User,
}

/// Response of `POST /token`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub user_role: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    #[serde(rename = "nom_client")]
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(rename = "typologie", default)]
    pub kind: Option<String>,
    #[serde(rename = "localisation", default)]
    pub location: Option<String>,
}

/// Body of client create and update requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInput {
    #[serde(rename = "nom_client", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(rename = "typologie", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "localisation", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    #[serde(rename = "nom")]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "nom_produit")]
    pub name: String,
    #[serde(rename = "marque", default)]
    pub brand: Option<String>,
    #[serde(rename = "categorie_id")]
    pub category_id: i64,
    #[serde(rename = "categorie", default)]
    pub category: Option<ProductCategory>,
}

/// Body of product create and update requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(rename = "nom_produit", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "marque", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(rename = "categorie_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
}

/// Body of `POST /admin/full-user`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "nom")]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "role_nom")]
    pub role_name: String,
    #[serde(rename = "zone_geographique", skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<i64>,
}

/// Body of `PUT /admin/users/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Supervisor decision state of a visit report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    #[serde(rename = "soumis")]
    Submitted,
    #[serde(rename = "valide")]
    Validated,
    #[serde(rename = "rejete")]
    Rejected,
}

/// Response of visit create, validate, and reject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: i64,
    pub client_id: i64,
    pub merchandiser_id: i64,
    #[serde(rename = "date_visite")]
    pub date: String,
    #[serde(rename = "statut_validation")]
    pub status: ValidationStatus,
    #[serde(rename = "observations_generales", default)]
    pub observations: String,
    #[serde(rename = "fifo_respecte", default)]
    pub fifo: bool,
    #[serde(rename = "planogramme_respecte", default)]
    pub planogramme: bool,
}

/// Row of the pending, history, and validated report lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitInfo {
    pub id: i64,
    #[serde(rename = "date_visite")]
    pub date: String,
    #[serde(rename = "statut_validation")]
    pub status: ValidationStatus,
    pub client: Client,
    pub merchandiser: Merchandiser,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: i64,
    #[serde(rename = "produit")]
    pub product: Product,
    #[serde(rename = "quantite_en_stock")]
    pub quantity_in_stock: i64,
    #[serde(rename = "est_en_rupture")]
    pub out_of_stock: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetailRecord {
    pub id: i64,
    #[serde(rename = "produit")]
    pub product: Product,
    #[serde(rename = "type_detail")]
    pub kind: String,
    #[serde(rename = "quantite")]
    pub quantity: i64,
    #[serde(default)]
    pub observation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorWatchRecord {
    pub id: i64,
    #[serde(rename = "concurrent")]
    pub competitor: Competitor,
    #[serde(rename = "nombre_packs")]
    pub packs: i64,
    #[serde(rename = "activite_observee", default)]
    pub activity: String,
    #[serde(rename = "mecanisme", default)]
    pub mechanism: String,
}

/// Full report as shown on the supervisor's detail page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitDetail {
    #[serde(flatten)]
    pub visit: Visit,
    pub client: Client,
    pub merchandiser: Merchandiser,
    #[serde(rename = "releves_stock", default)]
    pub stock: Vec<StockRecord>,
    #[serde(rename = "details_produits", default)]
    pub product_details: Vec<ProductDetailRecord>,
    #[serde(rename = "veilles_concurrentielles", default)]
    pub competitor_watches: Vec<CompetitorWatchRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: i64,
    pub timestamp: String,
    pub action: String,
    #[serde(default)]
    pub user: Option<User>,
}
