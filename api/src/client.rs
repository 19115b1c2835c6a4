//! Authenticated REST client.
//!
//! ERROR HANDLING
//! ==============
//! A client cannot be built without a server address, so a missing address
//! surfaces as [`ApiError::ServerNotConfigured`] before any request is made.
//! Non-success responses become [`ApiError::Status`] carrying the backend's
//! `detail` message so callers can show it verbatim.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionContext;
use crate::types::{
    ActivityLog, Client, ClientInput, Competitor, NewCategory, NewUser, Product, ProductCategory, ProductInput,
    Role, Supervisor, Token, User, UserUpdate, Visit, VisitDetail, VisitInfo, VisitPayload,
};

/// HTTP client bound to one server address and (optionally) one token.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from an explicit session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ServerNotConfigured`] when the session has no
    /// server address, or an error if the token is not a valid header value.
    pub fn new(session: &SessionContext, config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = session
            .base_url
            .as_deref()
            .ok_or(ApiError::ServerNotConfigured)?
            .trim_end_matches('/')
            .to_owned();

        let mut headers = HeaderMap::new();
        if let Some(token) = &session.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        tracing::debug!(%method, path, "api request");
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body);
        tracing::warn!(%method, path, status = status.as_u16(), %detail, "api request failed");
        Err(ApiError::Status { status: status.as_u16(), detail })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path);
        let response = self.send(Method::GET, path, request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn get_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path).query(query);
        let response = self.send(Method::GET, path, request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method.clone(), path);
        let request = if let Some(body) = body { request.json(body) } else { request };
        let response = self.send(method, path, request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, path);
        self.send(Method::DELETE, path, request).await?;
        Ok(())
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// Exchange credentials for a bearer token via the form-encoded
    /// `POST /token` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with status 401 on bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<Token, ApiError> {
        let path = "/token";
        let request = self
            .request(Method::POST, path)
            .form(&[("username", email), ("password", password)]);
        let response = self.send(Method::POST, path, request).await?;
        Ok(response.json::<Token>().await?)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_json("/users/me/").await
    }

    // =========================================================================
    // REFERENCE DATA
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn clients(&self) -> Result<Vec<Client>, ApiError> {
        self.get_json("/clients/").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/produits/").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn competitors(&self) -> Result<Vec<Competitor>, ApiError> {
        self.get_json("/concurrents/").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn categories(&self) -> Result<Vec<ProductCategory>, ApiError> {
        self.get_json("/categories-produit/").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn roles(&self) -> Result<Vec<Role>, ApiError> {
        self.get_json("/roles/").await
    }

    // =========================================================================
    // MERCHANDISER
    // =========================================================================

    /// Submit an assembled visit report.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with status 403 when the signed-in user
    /// has no merchandiser profile.
    pub async fn submit_visit(&self, payload: &VisitPayload) -> Result<Visit, ApiError> {
        self.send_json(Method::POST, "/visites/", Some(payload)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn merchandiser_stats(&self) -> Result<Value, ApiError> {
        self.get_json("/merchandiser/dashboard-stats").await
    }

    // =========================================================================
    // SUPERVISOR
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with status 404 for an unknown visit.
    pub async fn visit(&self, visit_id: i64) -> Result<VisitDetail, ApiError> {
        self.get_json(&format!("/visites/{visit_id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not a supervisor.
    pub async fn validate_visit(&self, visit_id: i64) -> Result<Visit, ApiError> {
        self.send_json::<Value, _>(Method::PUT, &format!("/visites/{visit_id}/valider"), None)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not a supervisor.
    pub async fn reject_visit(&self, visit_id: i64) -> Result<Visit, ApiError> {
        self.send_json::<Value, _>(Method::PUT, &format!("/visites/{visit_id}/rejeter"), None)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not a supervisor.
    pub async fn pending_visits(&self) -> Result<Vec<VisitInfo>, ApiError> {
        self.get_json("/superviseur/visites/en-attente").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not a supervisor.
    pub async fn visit_history(&self) -> Result<Vec<VisitInfo>, ApiError> {
        self.get_json("/superviseur/visites/historique").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not a supervisor.
    pub async fn supervisor_stats(&self) -> Result<Value, ApiError> {
        self.get_json("/superviseur/dashboard-stats").await
    }

    /// Download the team's validated reports as CSV bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not a supervisor.
    pub async fn export_validated_csv(&self) -> Result<Vec<u8>, ApiError> {
        let path = "/superviseur/export/visites-validees";
        let request = self.request(Method::GET, path);
        let response = self.send(Method::GET, path, request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // =========================================================================
    // ADMINISTRATOR
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not an administrator.
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError> {
        self.get_query("/admin/users/search", &[("query", query.to_owned())]).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the user.
    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.send_json(Method::POST, "/admin/full-user", Some(user)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    pub async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        self.send_json(Method::PUT, &format!("/admin/users/{user_id}"), Some(update))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/admin/users/{user_id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not an administrator.
    pub async fn supervisors(&self) -> Result<Vec<Supervisor>, ApiError> {
        self.get_json("/superviseurs/").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not an administrator.
    pub async fn search_clients(&self, query: &str) -> Result<Vec<Client>, ApiError> {
        self.get_query("/admin/clients/search", &[("query", query.to_owned())]).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the client.
    pub async fn create_client(&self, client: &ClientInput) -> Result<Client, ApiError> {
        self.send_json(Method::POST, "/admin/clients/", Some(client)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the client does not exist.
    pub async fn update_client(&self, client_id: i64, client: &ClientInput) -> Result<Client, ApiError> {
        self.send_json(Method::PUT, &format!("/admin/clients/{client_id}"), Some(client))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the client does not exist.
    pub async fn delete_client(&self, client_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/admin/clients/{client_id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not an administrator.
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        self.get_query("/admin/produits/search", &[("query", query.to_owned())]).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the product.
    pub async fn create_product(&self, product: &ProductInput) -> Result<Product, ApiError> {
        self.send_json(Method::POST, "/produits/", Some(product)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the product does not exist.
    pub async fn update_product(&self, product_id: i64, product: &ProductInput) -> Result<Product, ApiError> {
        self.send_json(Method::PUT, &format!("/admin/produits/{product_id}"), Some(product))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the product does not exist.
    pub async fn delete_product(&self, product_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/produits/{product_id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not an administrator.
    pub async fn create_category(&self, category: &NewCategory) -> Result<ProductCategory, ApiError> {
        self.send_json(Method::POST, "/admin/categories-produit/", Some(category))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not an administrator.
    pub async fn validated_visits(&self) -> Result<Vec<VisitInfo>, ApiError> {
        self.get_json("/admin/visites/validees").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not an administrator.
    pub async fn admin_stats(&self) -> Result<Value, ApiError> {
        self.get_json("/admin/dashboard-stats").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the user is not an administrator.
    pub async fn activity_logs(&self, limit: u32) -> Result<Vec<ActivityLog>, ApiError> {
        self.get_query("/admin/activity-logs", &[("limit", limit.to_string())]).await
    }
}

/// Extract a human-readable message from an error body.
///
/// The backend answers `{"detail": "..."}` for handled errors and
/// `{"detail": [...]}` for validation failures; anything else is returned
/// as-is.
fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_owned();
    };
    match value.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(other) => other.to_string(),
        None => value.to_string(),
    }
}
