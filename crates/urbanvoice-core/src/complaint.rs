//! Complaint types — the active record and its archived snapshot.
//!
//! A complaint carries a denormalized copy of the submitting citizen's name
//! and phone taken at submission time. Later profile edits never flow back
//! into existing complaints.

use std::{
  fmt,
  str::FromStr,
  sync::atomic::{AtomicI64, Ordering},
};

use chrono::{DateTime, SubsecRound as _, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// The category of municipal service a complaint concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintType {
  Electricity,
  Water,
  Road,
  Garbage,
}

impl ComplaintType {
  pub const ALL: [Self; 4] =
    [Self::Electricity, Self::Water, Self::Road, Self::Garbage];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Electricity => "Electricity",
      Self::Water => "Water",
      Self::Road => "Road",
      Self::Garbage => "Garbage",
    }
  }
}

impl fmt::Display for ComplaintType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ComplaintType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| Error::Validation {
        field:  "complaint_type",
        reason: format!(
          "{s:?} is not one of Electricity, Water, Road, Garbage"
        ),
      })
  }
}

/// Where a complaint sits in its lifecycle.
///
/// Only an administrator moves a complaint between statuses, and any status
/// may follow any other.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum ComplaintStatus {
  #[default]
  Sent,
  Viewed,
  #[serde(rename = "On Progress")]
  OnProgress,
  Resolved,
}

impl ComplaintStatus {
  pub const ALL: [Self; 4] =
    [Self::Sent, Self::Viewed, Self::OnProgress, Self::Resolved];

  /// The display string; also the value stored in the database.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Sent => "Sent",
      Self::Viewed => "Viewed",
      Self::OnProgress => "On Progress",
      Self::Resolved => "Resolved",
    }
  }
}

impl fmt::Display for ComplaintStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ComplaintStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|st| st.as_str() == s)
      .ok_or_else(|| Error::Validation {
        field:  "status",
        reason: format!(
          "{s:?} is not one of Sent, Viewed, On Progress, Resolved"
        ),
      })
  }
}

// ─── Complaint number ────────────────────────────────────────────────────────

pub const COMPLAINT_NUMBER_PREFIX: &str = "UV-";

static LAST_ISSUED_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Reserve the creation instant for a new complaint.
///
/// Every reserved instant falls in a distinct millisecond across the process:
/// a second request in the same millisecond is moved to the next unissued
/// one, so the complaint numbers derived from them never collide within one
/// server. The result is truncated to microseconds, the precision the store
/// keeps.
pub fn reserve_creation_time(now: DateTime<Utc>) -> DateTime<Utc> {
  let now_ms = now.timestamp_millis();
  let prev = LAST_ISSUED_MILLIS
    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
      Some(now_ms.max(prev + 1))
    })
    .unwrap_or_else(|prev| prev);

  let issued_ms = now_ms.max(prev + 1);
  if issued_ms == now_ms {
    now.trunc_subsecs(6)
  } else {
    DateTime::from_timestamp_millis(issued_ms).unwrap_or(now)
  }
}

/// The human-readable number `UV-<epoch millis>` of a complaint created at
/// `created_at`.
pub fn complaint_number(created_at: DateTime<Utc>) -> String {
  format!("{COMPLAINT_NUMBER_PREFIX}{}", created_at.timestamp_millis())
}

// ─── Complaint ───────────────────────────────────────────────────────────────

/// An active complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
  pub id:               Uuid,
  /// `UV-<epoch millis>`; never changes after creation.
  pub complaint_number: String,
  pub citizen_id:       Uuid,
  pub citizen_name:     String,
  pub citizen_phone:    String,
  pub complaint_name:   String,
  pub complaint_type:   ComplaintType,
  pub address:          String,
  pub description:      String,
  /// Opaque reference supplied by the upload handler; never interpreted.
  pub image_url:        Option<String>,
  pub status:           ComplaintStatus,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

/// Input to [`crate::store::ComplaintStore::insert_complaint`].
/// `id` and `status` are assigned by the store; `updated_at` starts equal to
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewComplaint {
  pub complaint_number: String,
  pub created_at:       DateTime<Utc>,
  pub citizen_id:       Uuid,
  pub citizen_name:     String,
  pub citizen_phone:    String,
  pub complaint_name:   String,
  pub complaint_type:   ComplaintType,
  pub address:          String,
  pub description:      String,
  pub image_url:        Option<String>,
}

// ─── BackupComplaint ─────────────────────────────────────────────────────────

/// An archived snapshot of a complaint its owner deleted. Written once, never
/// updated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupComplaint {
  pub backup_id:           Uuid,
  /// The `id` the complaint had while active.
  pub original_id:         Uuid,
  pub complaint_number:    String,
  pub citizen_id:          Uuid,
  pub citizen_name:        String,
  pub citizen_phone:       String,
  pub complaint_name:      String,
  pub complaint_type:      ComplaintType,
  pub address:             String,
  pub description:         String,
  pub image_url:           Option<String>,
  /// Status at the moment of deletion.
  pub status:              ComplaintStatus,
  pub original_created_at: DateTime<Utc>,
  /// When the backup was taken.
  pub created_at:          DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
}
