//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order equals chronological order.
//! Enumerations are stored as their display strings. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use urbanvoice_core::{
  complaint::{BackupComplaint, Complaint, ComplaintStatus, ComplaintType},
  identity::{Citizen, CitizenCredentials},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time, truncated to the precision the database keeps, so a
/// value returned from a write compares equal to the same row read back.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enumerations ─────────────────────────────────────────────────────────────

pub fn encode_status(s: ComplaintStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<ComplaintStatus> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "status",
    value:  s.to_owned(),
  })
}

pub fn encode_complaint_type(t: ComplaintType) -> &'static str { t.as_str() }

pub fn decode_complaint_type(s: &str) -> Result<ComplaintType> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "complaint_type",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawComplaint::from_row`].
pub const COMPLAINT_COLUMNS: &str = "complaint_id, complaint_number, \
  citizen_id, citizen_name, citizen_phone, complaint_name, complaint_type, \
  address, description, image_url, status, created_at, updated_at";

/// Raw strings read directly from a `complaints` row.
pub struct RawComplaint {
  pub complaint_id:     String,
  pub complaint_number: String,
  pub citizen_id:       String,
  pub citizen_name:     String,
  pub citizen_phone:    String,
  pub complaint_name:   String,
  pub complaint_type:   String,
  pub address:          String,
  pub description:      String,
  pub image_url:        Option<String>,
  pub status:           String,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawComplaint {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      complaint_id:     row.get(0)?,
      complaint_number: row.get(1)?,
      citizen_id:       row.get(2)?,
      citizen_name:     row.get(3)?,
      citizen_phone:    row.get(4)?,
      complaint_name:   row.get(5)?,
      complaint_type:   row.get(6)?,
      address:          row.get(7)?,
      description:      row.get(8)?,
      image_url:        row.get(9)?,
      status:           row.get(10)?,
      created_at:       row.get(11)?,
      updated_at:       row.get(12)?,
    })
  }

  pub fn into_complaint(self) -> Result<Complaint> {
    Ok(Complaint {
      id:               decode_uuid(&self.complaint_id)?,
      complaint_number: self.complaint_number,
      citizen_id:       decode_uuid(&self.citizen_id)?,
      citizen_name:     self.citizen_name,
      citizen_phone:    self.citizen_phone,
      complaint_name:   self.complaint_name,
      complaint_type:   decode_complaint_type(&self.complaint_type)?,
      address:          self.address,
      description:      self.description,
      image_url:        self.image_url,
      status:           decode_status(&self.status)?,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawBackup::from_row`].
pub const BACKUP_COLUMNS: &str = "backup_id, original_id, complaint_number, \
  citizen_id, citizen_name, citizen_phone, complaint_name, complaint_type, \
  address, description, image_url, status, original_created_at, created_at, \
  updated_at";

/// Raw strings read directly from a `backup_complaints` row.
pub struct RawBackup {
  pub backup_id:           String,
  pub original_id:         String,
  pub complaint_number:    String,
  pub citizen_id:          String,
  pub citizen_name:        String,
  pub citizen_phone:       String,
  pub complaint_name:      String,
  pub complaint_type:      String,
  pub address:             String,
  pub description:         String,
  pub image_url:           Option<String>,
  pub status:              String,
  pub original_created_at: String,
  pub created_at:          String,
  pub updated_at:          String,
}

impl RawBackup {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      backup_id:           row.get(0)?,
      original_id:         row.get(1)?,
      complaint_number:    row.get(2)?,
      citizen_id:          row.get(3)?,
      citizen_name:        row.get(4)?,
      citizen_phone:       row.get(5)?,
      complaint_name:      row.get(6)?,
      complaint_type:      row.get(7)?,
      address:             row.get(8)?,
      description:         row.get(9)?,
      image_url:           row.get(10)?,
      status:              row.get(11)?,
      original_created_at: row.get(12)?,
      created_at:          row.get(13)?,
      updated_at:          row.get(14)?,
    })
  }

  pub fn into_backup(self) -> Result<BackupComplaint> {
    Ok(BackupComplaint {
      backup_id:           decode_uuid(&self.backup_id)?,
      original_id:         decode_uuid(&self.original_id)?,
      complaint_number:    self.complaint_number,
      citizen_id:          decode_uuid(&self.citizen_id)?,
      citizen_name:        self.citizen_name,
      citizen_phone:       self.citizen_phone,
      complaint_name:      self.complaint_name,
      complaint_type:      decode_complaint_type(&self.complaint_type)?,
      address:             self.address,
      description:         self.description,
      image_url:           self.image_url,
      status:              decode_status(&self.status)?,
      original_created_at: decode_dt(&self.original_created_at)?,
      created_at:          decode_dt(&self.created_at)?,
      updated_at:          decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `citizens` row.
pub struct RawCitizen {
  pub citizen_id:    String,
  pub name:          String,
  pub phone:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawCitizen {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      citizen_id:    row.get(0)?,
      name:          row.get(1)?,
      phone:         row.get(2)?,
      password_hash: row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_credentials(self) -> Result<CitizenCredentials> {
    Ok(CitizenCredentials {
      citizen:       Citizen {
        id:         decode_uuid(&self.citizen_id)?,
        name:       self.name,
        phone:      self.phone,
        created_at: decode_dt(&self.created_at)?,
      },
      password_hash: self.password_hash,
    })
  }

  pub fn into_citizen(self) -> Result<Citizen> {
    Ok(self.into_credentials()?.citizen)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_sortable() {
    let whole = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let later = whole + chrono::Duration::microseconds(1500);

    let a = encode_dt(whole);
    let b = encode_dt(later);
    assert_eq!(a.len(), b.len());
    assert!(a < b, "{a} should sort before {b}");
    assert_eq!(decode_dt(&b).unwrap(), later);
  }

  #[test]
  fn unknown_status_column_is_an_error() {
    let err = decode_status("Closed").unwrap_err();
    assert!(matches!(err, Error::UnknownVariant { column: "status", .. }));
  }
}
