//! HTTP Basic-auth extractors for administrators and citizens.
//!
//! Administrators authenticate against the single account in the server
//! configuration. Citizens authenticate with their registered phone and
//! password. Both passwords are stored as argon2 PHC strings.

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use urbanvoice_core::{
  identity::{Admin, Citizen},
  store::ComplaintStore,
};

use crate::{AppState, error::Error};

/// The administrator account accepted by this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// An authenticated administrator.
pub struct AdminIdentity(pub Admin);

/// An authenticated, registered citizen.
pub struct CitizenIdentity(pub Citizen);

/// Hash `password` with argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Internal(format!("cannot hash password: {e}")))
}

/// Hash checked when a login names an unknown phone, so that path costs the
/// same argon2 work as a real password check.
static UNKNOWN_CITIZEN_HASH: LazyLock<Option<String>> =
  LazyLock::new(|| hash_password("urbanvoice-unknown-citizen").ok());

/// Reject a login for an unregistered phone after a full password check.
fn reject_unknown_citizen(password: &str) -> Error {
  if let Some(hash) = UNKNOWN_CITIZEN_HASH.as_deref() {
    let _ = verify_password(password, hash);
  }
  Error::Unauthorized
}

fn verify_password(password: &str, password_hash: &str) -> Result<(), Error> {
  let parsed_hash =
    PasswordHash::new(password_hash).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)
}

/// Decode the `Authorization: Basic …` header into `(user, password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (user, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  Ok((user.to_owned(), password.to_owned()))
}

/// Verify administrator credentials directly from headers.
pub fn verify_admin(headers: &HeaderMap, config: &AuthConfig) -> Result<Admin, Error> {
  let (username, password) = basic_credentials(headers)?;

  if username != config.username {
    return Err(Error::Unauthorized);
  }
  verify_password(&password, &config.password_hash)?;

  Ok(Admin { username })
}

impl<S> FromRequestParts<AppState<S>> for AdminIdentity
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_admin(&parts.headers, &state.auth).map(AdminIdentity)
  }
}

impl<S> FromRequestParts<AppState<S>> for CitizenIdentity
where
  S: ComplaintStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let (phone, password) = basic_credentials(&parts.headers)?;

    let creds = state
      .store
      .find_citizen_by_phone(phone)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| reject_unknown_citizen(&password))?;

    verify_password(&password, &creds.password_hash)?;
    Ok(CitizenIdentity(creds.citizen))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::{HeaderValue, header};

  fn config(password: &str) -> AuthConfig {
    AuthConfig {
      username:      "admin".to_string(),
      password_hash: hash_password(password).unwrap(),
    }
  }

  fn headers(value: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    map
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[test]
  fn correct_admin_credentials() {
    let cfg = config("admin123");
    let admin = verify_admin(&headers(&basic("admin", "admin123")), &cfg).unwrap();
    assert_eq!(admin.username, "admin");
  }

  #[test]
  fn wrong_password() {
    let cfg = config("admin123");
    let result = verify_admin(&headers(&basic("admin", "nope")), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn wrong_username() {
    let cfg = config("admin123");
    let result = verify_admin(&headers(&basic("root", "admin123")), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn missing_header() {
    let cfg = config("admin123");
    let result = verify_admin(&HeaderMap::new(), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn invalid_base64() {
    let result = basic_credentials(&headers("Basic !!!not-base64!!!"));
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn password_may_contain_colons() {
    let (user, pass) = basic_credentials(&headers(&basic("0711", "a:b:c"))).unwrap();
    assert_eq!(user, "0711");
    assert_eq!(pass, "a:b:c");
  }

  #[test]
  fn unknown_citizen_runs_a_real_hash_check() {
    let hash = UNKNOWN_CITIZEN_HASH.as_deref().unwrap();
    assert!(PasswordHash::new(hash).is_ok());
    assert!(verify_password("guess", hash).is_err());
    assert!(matches!(reject_unknown_citizen("guess"), Error::Unauthorized));
  }

  #[test]
  fn hashes_are_salted() {
    let a = hash_password("same").unwrap();
    let b = hash_password("same").unwrap();
    assert_ne!(a, b);
    assert!(verify_password("same", &a).is_ok());
    assert!(verify_password("same", &b).is_ok());
  }
}
