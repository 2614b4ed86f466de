//! Citizen sign-up: `POST /register`.
//!
//! Body: `{"name": "...", "phone": "...", "password": "...",
//! "confirm_password": "..."}`. Returns 201 + the stored citizen.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use urbanvoice_core::{identity::NewCitizen, store::ComplaintStore};

use crate::{AppState, auth::hash_password, error::Error};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  #[serde(default)]
  pub name:             String,
  #[serde(default)]
  pub phone:            String,
  #[serde(default)]
  pub password:         String,
  #[serde(default)]
  pub confirm_password: String,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, Error>
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  let name  = body.name.trim();
  let phone = body.phone.trim();

  if name.is_empty() || phone.is_empty() || body.password.is_empty() {
    return Err(Error::BadRequest(
      "name, phone and password are required".to_string(),
    ));
  }
  if body.password != body.confirm_password {
    return Err(Error::BadRequest("passwords do not match".to_string()));
  }

  let citizen = state
    .store
    .add_citizen(NewCitizen {
      name:          name.to_owned(),
      phone:         phone.to_owned(),
      password_hash: hash_password(&body.password)?,
    })
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::Conflict("citizen already exists".to_string()))?;

  tracing::info!(citizen = %citizen.id, "citizen registered");
  Ok((StatusCode::CREATED, Json(citizen)))
}
