//! Handlers for `/admin` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/admin/complaints` | Optional `?phone=` substring and `?status=All\|<status>` |
//! | `GET`  | `/admin/complaints/resolved` | Most recently updated first |
//! | `POST` | `/admin/complaints/{id}/status` | Body: `{"status":"On Progress"}` |
//! | `GET`  | `/admin/stats` | `{"total", "resolved", "in_progress"}` |
//! | `GET`  | `/admin/backups` | Archive of citizen-deleted complaints |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use urbanvoice_core::{
  complaint::{BackupComplaint, Complaint},
  lifecycle,
  query::{self, ComplaintFilter, Stats, StatusFilter},
  store::ComplaintStore,
};
use uuid::Uuid;

use crate::{AppState, auth::AdminIdentity, error::Error};

// ─── Dashboard list ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Substring of the citizen phone, with ASCII letters matched case-insensitively.
  pub phone:  Option<String>,
  /// `All` (the default) hides resolved complaints.
  pub status: Option<String>,
}

/// `GET /admin/complaints[?phone=...][&status=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  AdminIdentity(_admin): AdminIdentity,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Complaint>>, Error>
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  let status = match params.status.as_deref() {
    Some(s) => s.parse::<StatusFilter>()?,
    None => StatusFilter::All,
  };
  let filter = ComplaintFilter { phone: params.phone, status };

  let complaints = query::list_active(state.store.as_ref(), &filter).await?;
  Ok(Json(complaints))
}

/// `GET /admin/complaints/resolved`
pub async fn resolved<S>(
  State(state): State<AppState<S>>,
  AdminIdentity(_admin): AdminIdentity,
) -> Result<Json<Vec<Complaint>>, Error>
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  Ok(Json(query::list_resolved(state.store.as_ref()).await?))
}

// ─── Status ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  #[serde(default)]
  pub status: String,
}

/// `POST /admin/complaints/{id}/status`; returns the updated complaint.
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  AdminIdentity(admin): AdminIdentity,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Complaint>, Error>
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  let status = lifecycle::parse_status(&body.status)?;
  let complaint =
    lifecycle::set_status(state.store.as_ref(), &admin, id, status).await?;
  Ok(Json(complaint))
}

// ─── Stats / backups ──────────────────────────────────────────────────────────

/// `GET /admin/stats`
pub async fn stats<S>(
  State(state): State<AppState<S>>,
  AdminIdentity(_admin): AdminIdentity,
) -> Result<Json<Stats>, Error>
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  Ok(Json(query::stats(state.store.as_ref()).await?))
}

/// `GET /admin/backups`
pub async fn backups<S>(
  State(state): State<AppState<S>>,
  AdminIdentity(_admin): AdminIdentity,
) -> Result<Json<Vec<BackupComplaint>>, Error>
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  Ok(Json(query::list_backups(state.store.as_ref()).await?))
}
