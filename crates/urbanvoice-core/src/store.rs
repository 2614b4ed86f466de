//! The `ComplaintStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `urbanvoice-store-sqlite`). The lifecycle and query layers, and through
//! them the HTTP server, depend on this abstraction rather than on a backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  complaint::{BackupComplaint, Complaint, ComplaintStatus, NewComplaint},
  identity::{Citizen, CitizenCredentials, NewCitizen},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Status restriction applied by [`ComplaintStore::query_complaints`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusClause {
  #[default]
  Any,
  Exactly(ComplaintStatus),
  Not(ComplaintStatus),
}

/// Result ordering; both are newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  #[default]
  CreatedDesc,
  UpdatedDesc,
}

/// Parameters for [`ComplaintStore::query_complaints`].
#[derive(Debug, Clone, Default)]
pub struct ComplaintQuery {
  /// Restrict to complaints submitted by this citizen.
  pub citizen_id:     Option<Uuid>,
  /// Substring of the denormalized `citizen_phone`; ASCII letters match
  /// case-insensitively.
  pub phone_contains: Option<String>,
  pub status:         StatusClause,
  pub sort:           SortOrder,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an UrbanVoice storage backend.
///
/// Each method must be atomic with respect to the others. In particular
/// [`archive_complaint`](Self::archive_complaint) writes the backup and
/// removes the active record as one unit: either both happen or neither does.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ComplaintStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Citizens ──────────────────────────────────────────────────────────

  /// Register a citizen. Returns `None` if the phone is already registered.
  fn add_citizen(
    &self,
    input: NewCitizen,
  ) -> impl Future<Output = Result<Option<Citizen>, Self::Error>> + Send + '_;

  fn get_citizen(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Citizen>, Self::Error>> + Send + '_;

  /// Look up a citizen and their password hash by login phone.
  fn find_citizen_by_phone(
    &self,
    phone: String,
  ) -> impl Future<Output = Result<Option<CitizenCredentials>, Self::Error>>
  + Send
  + '_;

  // ── Complaints ────────────────────────────────────────────────────────

  /// Persist a new complaint with status `Sent`. The id and both
  /// timestamps are set by the store.
  fn insert_complaint(
    &self,
    input: NewComplaint,
  ) -> impl Future<Output = Result<Complaint, Self::Error>> + Send + '_;

  fn get_complaint(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Complaint>, Self::Error>> + Send + '_;

  /// Set the status of a complaint and return the stored record, or `None`
  /// if it does not exist. When the complaint already has `status` nothing
  /// is written and `updated_at` is left alone.
  fn update_status(
    &self,
    id: Uuid,
    status: ComplaintStatus,
  ) -> impl Future<Output = Result<Option<Complaint>, Self::Error>> + Send + '_;

  /// Move the complaint `id` owned by `owner` into the backup archive.
  ///
  /// Returns `None`, and changes nothing, if no complaint with that id is
  /// owned by `owner`.
  fn archive_complaint(
    &self,
    id: Uuid,
    owner: Uuid,
  ) -> impl Future<Output = Result<Option<BackupComplaint>, Self::Error>>
  + Send
  + '_;

  fn query_complaints<'a>(
    &'a self,
    query: &'a ComplaintQuery,
  ) -> impl Future<Output = Result<Vec<Complaint>, Self::Error>> + Send + 'a;

  /// Count active complaints, optionally restricted to one status.
  fn count_complaints(
    &self,
    status: Option<ComplaintStatus>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Backups ───────────────────────────────────────────────────────────

  /// All archived complaints, most recently archived first.
  fn list_backups(
    &self,
  ) -> impl Future<Output = Result<Vec<BackupComplaint>, Self::Error>> + Send + '_;
}
