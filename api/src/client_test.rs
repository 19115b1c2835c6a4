use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, Path, Query, State};
use axum::http::{HeaderMap as AxumHeaders, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use forms::{Candidate, CandidateId, RowEdit, VisitDraft, assemble_visit};
use serde_json::json;

use super::*;
use crate::types::ValidationStatus;

type Captured = Arc<Mutex<Vec<Value>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{addr}")
}

fn session(base_url: &str, token: Option<&str>) -> SessionContext {
    SessionContext {
        base_url: Some(base_url.to_owned()),
        token: token.map(ToOwned::to_owned),
        role: None,
    }
}

fn client(base_url: &str, token: Option<&str>) -> ApiClient {
    ApiClient::new(&session(base_url, token), &ClientConfig::default()).expect("client")
}

fn user_json() -> Value {
    json!({
        "id": 1,
        "email": "awa@example.test",
        "nom": "Awa",
        "is_active": true,
        "role": {"id": 3, "nom": "merchandiser"}
    })
}

fn visit_json(status: &str) -> Value {
    json!({
        "id": 9,
        "client_id": 2,
        "merchandiser_id": 5,
        "date_visite": "2024-05-02",
        "statut_validation": status,
        "observations_generales": "",
        "fifo_respecte": true,
        "planogramme_respecte": true
    })
}

async fn me(headers: AxumHeaders) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    if bearer == Some("Bearer tok-1") {
        Ok(Json(user_json()))
    } else {
        Err((StatusCode::UNAUTHORIZED, Json(json!({"detail": "Not authenticated"}))))
    }
}

// =============================================================
// construction
// =============================================================

#[test]
fn new_without_server_address_is_refused() {
    let err = ApiClient::new(&SessionContext::default(), &ClientConfig::default()).expect_err("no server");
    assert!(matches!(err, ApiError::ServerNotConfigured));
}

#[test]
fn new_trims_trailing_slash() {
    let client = client("http://127.0.0.1:8000/", None);
    assert_eq!(client.base_url(), "http://127.0.0.1:8000");
}

// =============================================================
// auth
// =============================================================

#[tokio::test]
async fn me_sends_bearer_token() {
    let base = serve(Router::new().route("/users/me/", get(me))).await;
    let user = client(&base, Some("tok-1")).me().await.expect("me");
    assert_eq!(user.name, "Awa");
}

#[tokio::test]
async fn me_without_token_is_unauthorized_with_detail() {
    let base = serve(Router::new().route("/users/me/", get(me))).await;
    let err = client(&base, None).me().await.expect_err("unauthorized");
    assert!(err.is_unauthorized());
    match err {
        ApiError::Status { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail, "Not authenticated");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn login_posts_form_credentials() {
    async fn token(Form(form): Form<HashMap<String, String>>) -> Result<Json<Value>, StatusCode> {
        if form.get("username").map(String::as_str) == Some("awa@example.test")
            && form.get("password").map(String::as_str) == Some("s3cret")
        {
            Ok(Json(json!({"access_token": "tok-1", "token_type": "bearer", "user_role": "merchandiser"})))
        } else {
            Err(StatusCode::UNAUTHORIZED)
        }
    }
    let base = serve(Router::new().route("/token", post(token))).await;
    let api = client(&base, None);

    let token = api.login("awa@example.test", "s3cret").await.expect("login");
    assert_eq!(token.access_token, "tok-1");
    assert_eq!(token.user_role, "merchandiser");

    let err = api.login("awa@example.test", "wrong").await.expect_err("bad password");
    assert!(err.is_unauthorized());
}

// =============================================================
// visits
// =============================================================

#[tokio::test]
async fn submit_visit_posts_assembled_payload() {
    async fn create(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
        captured.lock().expect("lock").push(body);
        Json(visit_json("soumis"))
    }
    let captured: Captured = Arc::default();
    let router = Router::new().route("/visites/", post(create)).with_state(captured.clone());
    let base = serve(router).await;

    let mut draft = VisitDraft::new(2, vec![Candidate::new(7, "Water")], vec![]);
    let key = draft.incidents.add_row().expect("row");
    draft.incidents.select(key, CandidateId(7)).expect("select");
    draft.incidents.update_row(key, RowEdit::text("quantite", "3")).expect("qty");
    let order = draft.orders.add_row().expect("row");
    draft.orders.select(order, CandidateId(7)).expect("select");
    draft.orders.update_row(order, RowEdit::text("quantite", "2")).expect("qty");

    let visit = client(&base, Some("tok-1"))
        .submit_visit(&assemble_visit(&draft))
        .await
        .expect("submit");
    assert_eq!(visit.status, ValidationStatus::Submitted);

    let bodies = captured.lock().expect("lock");
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["client_id"], json!(2));
    assert_eq!(
        bodies[0]["details_produits"],
        json!([
            {"produit_id": 7, "quantite": 3, "observation": "", "type_detail": "incident"},
            {"produit_id": 7, "quantite": 2, "observation": "", "type_detail": "commande"}
        ])
    );
}

#[tokio::test]
async fn validate_and_reject_hit_distinct_endpoints() {
    async fn validate(Path(id): Path<i64>) -> Json<Value> {
        let mut visit = visit_json("valide");
        visit["id"] = json!(id);
        Json(visit)
    }
    async fn reject(Path(id): Path<i64>) -> Json<Value> {
        let mut visit = visit_json("rejete");
        visit["id"] = json!(id);
        Json(visit)
    }
    let router = Router::new()
        .route("/visites/{id}/valider", put(validate))
        .route("/visites/{id}/rejeter", put(reject));
    let base = serve(router).await;
    let api = client(&base, Some("tok-1"));

    let validated = api.validate_visit(4).await.expect("validate");
    assert_eq!((validated.id, validated.status), (4, ValidationStatus::Validated));
    let rejected = api.reject_visit(5).await.expect("reject");
    assert_eq!((rejected.id, rejected.status), (5, ValidationStatus::Rejected));
}

#[tokio::test]
async fn unknown_visit_maps_to_not_found_status() {
    async fn missing() -> (StatusCode, Json<Value>) {
        (StatusCode::NOT_FOUND, Json(json!({"detail": "Visite non trouvée"})))
    }
    let base = serve(Router::new().route("/visites/{id}", get(missing))).await;
    let err = client(&base, Some("tok-1")).visit(99).await.expect_err("missing");
    assert!(matches!(err, ApiError::Status { status: 404, ref detail } if detail == "Visite non trouvée"));
    assert!(!err.is_unauthorized());
}

#[tokio::test]
async fn export_returns_raw_csv_bytes() {
    async fn export() -> &'static str {
        "ID Visite,Date\n1,2024-05-02\n"
    }
    let base = serve(Router::new().route("/superviseur/export/visites-validees", get(export))).await;
    let bytes = client(&base, Some("tok-1")).export_validated_csv().await.expect("export");
    assert_eq!(bytes, b"ID Visite,Date\n1,2024-05-02\n");
}

// =============================================================
// administration
// =============================================================

#[tokio::test]
async fn search_clients_sends_query_parameter() {
    async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let query = params.get("query").cloned().unwrap_or_default();
        Json(json!([{"id": 1, "nom_client": format!("match:{query}")}]))
    }
    let base = serve(Router::new().route("/admin/clients/search", get(search))).await;
    let clients = client(&base, Some("tok-1")).search_clients("dakar shop").await.expect("search");
    assert_eq!(clients[0].name, "match:dakar shop");
}

#[tokio::test]
async fn delete_accepts_no_content() {
    async fn remove() -> StatusCode {
        StatusCode::NO_CONTENT
    }
    let base = serve(Router::new().route("/admin/users/{id}", delete(remove))).await;
    client(&base, Some("tok-1")).delete_user(3).await.expect("delete");
}

#[tokio::test]
async fn validation_error_detail_is_rendered_as_json() {
    async fn reject() -> (StatusCode, Json<Value>) {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body", "email"], "msg": "invalid"}]})),
        )
    }
    let base = serve(Router::new().route("/admin/full-user", post(reject))).await;
    let user = NewUser {
        name: "Sam".to_owned(),
        email: "nope".to_owned(),
        password: "pw".to_owned(),
        role_name: "superviseur".to_owned(),
        zone: None,
        manager_id: None,
    };
    let err = client(&base, Some("tok-1")).create_user(&user).await.expect_err("422");
    match err {
        ApiError::Status { status, detail } => {
            assert_eq!(status, 422);
            assert!(detail.contains("invalid"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================
// error_detail
// =============================================================

#[test]
fn error_detail_prefers_string_detail() {
    assert_eq!(error_detail(r#"{"detail":"nope"}"#), "nope");
}

#[test]
fn error_detail_falls_back_to_raw_body() {
    assert_eq!(error_detail("  Internal Server Error\n"), "Internal Server Error");
    assert_eq!(error_detail(r#"{"error":"x"}"#), r#"{"error":"x"}"#);
}
