//! Identities the desk acts on behalf of.
//!
//! Credentials are verified upstream (the HTTP layer); by the time a
//! [`Citizen`] or [`Admin`] reaches an operation it is trusted as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered citizen. The password hash is deliberately not part of this
/// type so it cannot leak through serialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citizen {
  pub id:         Uuid,
  pub name:       String,
  /// Unique across the registry; doubles as the login name.
  pub phone:      String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::ComplaintStore::add_citizen`].
#[derive(Debug, Clone)]
pub struct NewCitizen {
  pub name:          String,
  pub phone:         String,
  /// PHC string produced by argon2.
  pub password_hash: String,
}

/// A citizen together with the stored password hash, for login checks only.
#[derive(Debug, Clone)]
pub struct CitizenCredentials {
  pub citizen:       Citizen,
  pub password_hash: String,
}

/// An authenticated administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
  pub username: String,
}
