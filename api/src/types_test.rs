use serde_json::json;

use super::*;

fn user_json() -> serde_json::Value {
    json!({
        "id": 4,
        "email": "awa@example.test",
        "nom": "Awa",
        "is_active": true,
        "role": {"id": 3, "nom": "merchandiser", "description": null}
    })
}

#[test]
fn user_role_maps_known_names_case_insensitively() {
    assert_eq!(UserRole::from_name("Administrateur"), UserRole::Administrator);
    assert_eq!(UserRole::from_name("superviseur"), UserRole::Supervisor);
    assert_eq!(UserRole::from_name(" MERCHANDISER "), UserRole::Merchandiser);
    assert_eq!(UserRole::from_name("auditor"), UserRole::Other("auditor".to_owned()));
}

#[test]
fn user_deserializes_french_keys() {
    let user: User = serde_json::from_value(user_json()).expect("user");
    assert_eq!(user.name, "Awa");
    assert_eq!(user.role.name, "merchandiser");
    assert_eq!(user.role.description, None);
}

#[test]
fn client_input_skips_unset_fields() {
    let input = ClientInput { contact: Some("0102".to_owned()), ..ClientInput::default() };
    assert_eq!(serde_json::to_value(input).expect("serialize"), json!({"contact": "0102"}));
}

#[test]
fn new_user_omits_merchandiser_fields_for_other_roles() {
    let user = NewUser {
        name: "Sam".to_owned(),
        email: "sam@example.test".to_owned(),
        password: "pw".to_owned(),
        role_name: "superviseur".to_owned(),
        zone: None,
        manager_id: None,
    };
    assert_eq!(
        serde_json::to_value(user).expect("serialize"),
        json!({"nom": "Sam", "email": "sam@example.test", "password": "pw", "role_nom": "superviseur"})
    );
}

#[test]
fn user_update_serializes_only_toggle() {
    let update = UserUpdate { is_active: Some(false), ..UserUpdate::default() };
    assert_eq!(serde_json::to_value(update).expect("serialize"), json!({"is_active": false}));
}

#[test]
fn product_tolerates_missing_category_object() {
    let product: Product =
        serde_json::from_value(json!({"id": 1, "nom_produit": "Water", "categorie_id": 2})).expect("product");
    assert_eq!(product.brand, None);
    assert_eq!(product.category, None);
    assert_eq!(product.category_id, 2);
}

#[test]
fn validation_status_uses_backend_literals() {
    let statuses: Vec<ValidationStatus> =
        serde_json::from_value(json!(["soumis", "valide", "rejete"])).expect("statuses");
    assert_eq!(
        statuses,
        vec![ValidationStatus::Submitted, ValidationStatus::Validated, ValidationStatus::Rejected]
    );
}

#[test]
fn visit_detail_deserializes_nested_lines() {
    let product = json!({
        "id": 7,
        "nom_produit": "Water 1.5L",
        "marque": "Source",
        "categorie_id": 1,
        "categorie": {"id": 1, "nom": "Water"}
    });
    let raw = json!({
        "id": 12,
        "client_id": 2,
        "merchandiser_id": 5,
        "date_visite": "2024-05-02",
        "statut_validation": "soumis",
        "observations_generales": "ok",
        "fifo_respecte": true,
        "planogramme_respecte": false,
        "client": {"id": 2, "nom_client": "Shop", "contact": null, "typologie": null, "localisation": "Dakar"},
        "merchandiser": {"id": 5, "user": user_json(), "zone_geographique": "North"},
        "releves_stock": [
            {"id": 1, "produit_id": 7, "produit": product, "quantite_en_stock": 4, "est_en_rupture": false, "type_rupture": ""}
        ],
        "details_produits": [
            {"id": 2, "produit_id": 7, "produit": product, "type_detail": "commande", "quantite": 10, "observation": ""}
        ],
        "veilles_concurrentielles": [
            {"id": 3, "concurrent_id": 1, "concurrent": {"id": 1, "nom": "Rival"}, "marque": "", "nombre_packs": 2, "activite_observee": "promo", "mecanisme": "2+1"}
        ]
    });

    let detail: VisitDetail = serde_json::from_value(raw).expect("detail");
    assert_eq!(detail.visit.id, 12);
    assert_eq!(detail.visit.status, ValidationStatus::Submitted);
    assert!(!detail.visit.planogramme);
    assert_eq!(detail.client.location.as_deref(), Some("Dakar"));
    assert_eq!(detail.merchandiser.zone.as_deref(), Some("North"));
    assert_eq!(detail.stock[0].quantity_in_stock, 4);
    assert_eq!(detail.product_details[0].kind, "commande");
    assert_eq!(detail.competitor_watches[0].competitor.name, "Rival");
}
