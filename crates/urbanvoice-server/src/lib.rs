//! HTTP layer for UrbanVoice.
//!
//! Exposes an axum [`Router`] with the citizen and administrator JSON
//! endpoints, backed by any [`ComplaintStore`].

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use urbanvoice_core::store::ComplaintStore;

use auth::AuthConfig;
use handlers::{admin, citizen, register};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 3000 }

/// Runtime server configuration, deserialised from `config.toml` and
/// `URBANVOICE_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  pub store_path:          PathBuf,
  pub admin_username:      String,
  pub admin_password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ComplaintStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

impl<S: ComplaintStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let auth = AuthConfig {
      username:      config.admin_username.clone(),
      password_hash: config.admin_password_hash.clone(),
    };
    Self {
      store:  Arc::new(store),
      config: Arc::new(config),
      auth:   Arc::new(auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the complaint desk.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/register",                      post(register::handler::<S>))
    // Citizens
    .route("/citizen/complaints",            get(citizen::list::<S>).post(citizen::submit::<S>))
    .route("/citizen/complaints/{id}",       delete(citizen::delete_one::<S>))
    // Administrators
    .route("/admin/complaints",              get(admin::list::<S>))
    .route("/admin/complaints/resolved",     get(admin::resolved::<S>))
    .route("/admin/complaints/{id}/status",  post(admin::set_status::<S>))
    .route("/admin/stats",                   get(admin::stats::<S>))
    .route("/admin/backups",                 get(admin::backups::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use urbanvoice_store_sqlite::SqliteStore;
  use uuid::Uuid;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(store, ServerConfig {
      host:                "127.0.0.1".to_string(),
      port:                3000,
      store_path:          PathBuf::from(":memory:"),
      admin_username:      "admin".to_string(),
      admin_password_hash: auth::hash_password("admin123").unwrap(),
    })
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  fn admin_auth() -> String { basic("admin", "admin123") }

  async fn send(
    state:  &AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    auth:   Option<&str>,
    body:   Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    router(state.clone()).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// Register a citizen and return their Basic auth header.
  async fn register(state: &AppState<SqliteStore>, name: &str, phone: &str) -> String {
    let resp = send(state, "POST", "/register", None, Some(json!({
      "name": name,
      "phone": phone,
      "password": "pw",
      "confirm_password": "pw",
    })))
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    basic(phone, "pw")
  }

  async fn submit_leak(state: &AppState<SqliteStore>, auth: &str) -> Value {
    let resp = send(state, "POST", "/citizen/complaints", Some(auth), Some(json!({
      "complaint_name": "Burst main",
      "complaint_type": "Water",
      "address": "12 Elm St",
      "description": "Leak",
    })))
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
  }

  fn id_of(complaint: &Value) -> String {
    complaint["id"].as_str().unwrap().to_string()
  }

  // ── Registration ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_hides_password_hash() {
    let state = make_state().await;
    let resp = send(&state, "POST", "/register", None, Some(json!({
      "name": "Alice",
      "phone": "0711000001",
      "password": "pw",
      "confirm_password": "pw",
    })))
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["phone"], "0711000001");
    assert!(body.get("password_hash").is_none());
  }

  #[tokio::test]
  async fn register_duplicate_phone_is_409() {
    let state = make_state().await;
    register(&state, "Alice", "0711000001").await;
    let resp = send(&state, "POST", "/register", None, Some(json!({
      "name": "Mallory",
      "phone": "0711000001",
      "password": "x",
      "confirm_password": "x",
    })))
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn register_mismatched_passwords_is_400() {
    let state = make_state().await;
    let resp = send(&state, "POST", "/register", None, Some(json!({
      "name": "Alice",
      "phone": "0711000001",
      "password": "a",
      "confirm_password": "b",
    })))
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Citizen endpoints ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn submit_requires_authentication() {
    let state = make_state().await;
    let resp = send(&state, "POST", "/citizen/complaints", None, Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let resp = send(
      &state,
      "GET",
      "/citizen/complaints",
      Some(&basic("0700000000", "guess")),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn submit_returns_sent_complaint() {
    let state = make_state().await;
    let alice = register(&state, "Alice", "0711000001").await;

    let complaint = submit_leak(&state, &alice).await;
    assert_eq!(complaint["status"], "Sent");
    assert_eq!(complaint["citizen_name"], "Alice");
    assert!(complaint["complaint_number"].as_str().unwrap().starts_with("UV-"));
    assert!(complaint["image_url"].is_null());

    let resp = send(&state, "GET", "/citizen/complaints", Some(&alice), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let mine = json_body(resp).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn submit_invalid_type_names_field() {
    let state = make_state().await;
    let alice = register(&state, "Alice", "0711000001").await;

    let resp = send(&state, "POST", "/citizen/complaints", Some(&alice), Some(json!({
      "complaint_name": "Noise",
      "complaint_type": "Noise",
      "address": "1 Main",
      "description": "Loud",
    })))
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["field"], "complaint_type");
  }

  #[tokio::test]
  async fn delete_by_other_citizen_is_indistinguishable_from_missing() {
    let state = make_state().await;
    let alice = register(&state, "Alice", "0711000001").await;
    let bob = register(&state, "Bob", "0711000002").await;
    let complaint = submit_leak(&state, &alice).await;

    let foreign = send(
      &state,
      "DELETE",
      &format!("/citizen/complaints/{}", id_of(&complaint)),
      Some(&bob),
      None,
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
    let foreign_body = json_body(foreign).await;

    let missing = send(
      &state,
      "DELETE",
      &format!("/citizen/complaints/{}", Uuid::new_v4()),
      Some(&bob),
      None,
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(missing).await, foreign_body);

    let resp = send(&state, "GET", "/admin/backups", Some(&admin_auth()), None).await;
    assert!(json_body(resp).await.as_array().unwrap().is_empty());
  }

  // ── Admin endpoints ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_endpoints_reject_citizens() {
    let state = make_state().await;
    let alice = register(&state, "Alice", "0711000001").await;
    let resp = send(&state, "GET", "/admin/stats", Some(&alice), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn unknown_status_filter_is_400() {
    let state = make_state().await;
    let resp = send(
      &state,
      "GET",
      "/admin/complaints?status=Closed",
      Some(&admin_auth()),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn set_status_on_missing_complaint_is_404() {
    let state = make_state().await;
    let resp = send(
      &state,
      "POST",
      &format!("/admin/complaints/{}/status", Uuid::new_v4()),
      Some(&admin_auth()),
      Some(json!({ "status": "Viewed" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn set_status_rejects_unknown_value() {
    let state = make_state().await;
    let alice = register(&state, "Alice", "0711000001").await;
    let complaint = submit_leak(&state, &alice).await;

    let resp = send(
      &state,
      "POST",
      &format!("/admin/complaints/{}/status", id_of(&complaint)),
      Some(&admin_auth()),
      Some(json!({ "status": "Closed" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["field"], "status");
  }

  #[tokio::test]
  async fn resolve_then_delete_flow() {
    let state = make_state().await;
    let admin = admin_auth();
    let alice = register(&state, "Alice", "0711000001").await;
    let complaint = submit_leak(&state, &alice).await;
    let id = id_of(&complaint);

    let resp = send(&state, "GET", "/admin/stats", Some(&admin), None).await;
    assert_eq!(
      json_body(resp).await,
      json!({ "total": 1, "resolved": 0, "in_progress": 0 })
    );

    let resp = send(
      &state,
      "POST",
      &format!("/admin/complaints/{id}/status"),
      Some(&admin),
      Some(json!({ "status": "Resolved" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "Resolved");

    let resp = send(&state, "GET", "/admin/stats", Some(&admin), None).await;
    assert_eq!(json_body(resp).await["resolved"], 1);

    let resp = send(&state, "GET", "/admin/complaints", Some(&admin), None).await;
    assert!(json_body(resp).await.as_array().unwrap().is_empty());

    let resp = send(
      &state,
      "GET",
      "/admin/complaints?status=Resolved&phone=0711",
      Some(&admin),
      None,
    )
    .await;
    let listed = json_body(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());

    let resp = send(&state, "GET", "/admin/complaints/resolved", Some(&admin), None).await;
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);

    let resp = send(
      &state,
      "DELETE",
      &format!("/citizen/complaints/{id}"),
      Some(&alice),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&state, "GET", "/admin/backups", Some(&admin), None).await;
    let backups = json_body(resp).await;
    assert_eq!(backups.as_array().unwrap().len(), 1);
    assert_eq!(backups[0]["original_id"], id.as_str());
    assert_eq!(backups[0]["status"], "Resolved");

    let resp = send(&state, "GET", "/admin/stats", Some(&admin), None).await;
    assert_eq!(json_body(resp).await["total"], 0);
  }
}
