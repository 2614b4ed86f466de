//! Handlers for `/citizen/complaints` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/citizen/complaints` | The caller's own complaints, newest first |
//! | `POST`   | `/citizen/complaints` | Body: [`SubmitBody`]; returns 201 + stored complaint |
//! | `DELETE` | `/citizen/complaints/{id}` | Archives then removes; 404 if missing or not the caller's |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use urbanvoice_core::{
  complaint::Complaint,
  lifecycle,
  query,
  store::ComplaintStore,
  validate::RawSubmission,
};
use uuid::Uuid;

use crate::{AppState, auth::CitizenIdentity, error::Error};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /citizen/complaints`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CitizenIdentity(citizen): CitizenIdentity,
) -> Result<Json<Vec<Complaint>>, Error>
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  let complaints = query::list_owned(state.store.as_ref(), &citizen).await?;
  Ok(Json(complaints))
}

// ─── Submit ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /citizen/complaints`.
#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  #[serde(flatten)]
  pub fields:    RawSubmission,
  /// Reference produced by the upload handler, if a photo was attached.
  pub image_url: Option<String>,
}

/// `POST /citizen/complaints`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  CitizenIdentity(citizen): CitizenIdentity,
  Json(body): Json<SubmitBody>,
) -> Result<impl IntoResponse, Error>
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  let complaint = lifecycle::submit(
    state.store.as_ref(),
    &citizen,
    &body.fields,
    body.image_url,
  )
  .await?;
  Ok((StatusCode::CREATED, Json(complaint)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /citizen/complaints/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  CitizenIdentity(citizen): CitizenIdentity,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Error>
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  lifecycle::delete_owned(state.store.as_ref(), &citizen, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
