//! [`SqliteStore`] — the SQLite implementation of [`ComplaintStore`].

use std::path::Path;

use chrono::SubsecRound as _;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use urbanvoice_core::{
  complaint::{BackupComplaint, Complaint, ComplaintStatus, NewComplaint},
  identity::{Citizen, CitizenCredentials, NewCitizen},
  store::{ComplaintQuery, ComplaintStore, SortOrder, StatusClause},
};

use crate::{
  Result,
  encode::{
    BACKUP_COLUMNS, COMPLAINT_COLUMNS, RawBackup, RawCitizen, RawComplaint,
    encode_complaint_type, encode_dt, encode_status, encode_uuid, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An UrbanVoice store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// are executed one at a time on the connection's background thread, so a
/// single `call` closure never interleaves with another.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ComplaintStore impl ─────────────────────────────────────────────────────

impl ComplaintStore for SqliteStore {
  type Error = crate::Error;

  // ── Citizens ──────────────────────────────────────────────────────────────

  async fn add_citizen(&self, input: NewCitizen) -> Result<Option<Citizen>> {
    let citizen = Citizen {
      id:         Uuid::new_v4(),
      name:       input.name,
      phone:      input.phone,
      created_at: now(),
    };

    let id_str = encode_uuid(citizen.id);
    let name   = citizen.name.clone();
    let phone  = citizen.phone.clone();
    let at_str = encode_dt(citizen.created_at);
    let hash   = input.password_hash;

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM citizens WHERE phone = ?1",
            rusqlite::params![phone],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if taken {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO citizens (citizen_id, name, phone, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, phone, hash, at_str],
        )?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some(citizen))
  }

  async fn get_citizen(&self, id: Uuid) -> Result<Option<Citizen>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCitizen> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT citizen_id, name, phone, password_hash, created_at
               FROM citizens WHERE citizen_id = ?1",
              rusqlite::params![id_str],
              RawCitizen::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCitizen::into_citizen).transpose()
  }

  async fn find_citizen_by_phone(
    &self,
    phone: String,
  ) -> Result<Option<CitizenCredentials>> {
    let raw: Option<RawCitizen> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT citizen_id, name, phone, password_hash, created_at
               FROM citizens WHERE phone = ?1",
              rusqlite::params![phone],
              RawCitizen::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCitizen::into_credentials).transpose()
  }

  // ── Complaints ────────────────────────────────────────────────────────────

  async fn insert_complaint(&self, input: NewComplaint) -> Result<Complaint> {
    let at = input.created_at.trunc_subsecs(6);
    let complaint = Complaint {
      id:               Uuid::new_v4(),
      complaint_number: input.complaint_number,
      citizen_id:       input.citizen_id,
      citizen_name:     input.citizen_name,
      citizen_phone:    input.citizen_phone,
      complaint_name:   input.complaint_name,
      complaint_type:   input.complaint_type,
      address:          input.address,
      description:      input.description,
      image_url:        input.image_url,
      status:           ComplaintStatus::Sent,
      created_at:       at,
      updated_at:       at,
    };

    let id_str      = encode_uuid(complaint.id);
    let number      = complaint.complaint_number.clone();
    let citizen_str = encode_uuid(complaint.citizen_id);
    let name        = complaint.citizen_name.clone();
    let phone       = complaint.citizen_phone.clone();
    let title       = complaint.complaint_name.clone();
    let type_str    = encode_complaint_type(complaint.complaint_type);
    let address     = complaint.address.clone();
    let description = complaint.description.clone();
    let image_url   = complaint.image_url.clone();
    let status_str  = encode_status(complaint.status);
    let at_str      = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO complaints (
             complaint_id, complaint_number, citizen_id, citizen_name,
             citizen_phone, complaint_name, complaint_type, address,
             description, image_url, status, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
          rusqlite::params![
            id_str,
            number,
            citizen_str,
            name,
            phone,
            title,
            type_str,
            address,
            description,
            image_url,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(complaint)
  }

  async fn get_complaint(&self, id: Uuid) -> Result<Option<Complaint>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawComplaint> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE complaint_id = ?1"
              ),
              rusqlite::params![id_str],
              RawComplaint::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawComplaint::into_complaint).transpose()
  }

  async fn update_status(
    &self,
    id:     Uuid,
    status: ComplaintStatus,
  ) -> Result<Option<Complaint>> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status);
    let at_str     = encode_dt(now());

    let raw: Option<RawComplaint> = self
      .conn
      .call(move |conn| {
        // Re-setting the current status must not bump `updated_at`.
        conn.execute(
          "UPDATE complaints SET status = ?2, updated_at = ?3
           WHERE complaint_id = ?1 AND status != ?2",
          rusqlite::params![id_str, status_str, at_str],
        )?;

        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE complaint_id = ?1"
              ),
              rusqlite::params![id_str],
              RawComplaint::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawComplaint::into_complaint).transpose()
  }

  async fn archive_complaint(
    &self,
    id:    Uuid,
    owner: Uuid,
  ) -> Result<Option<BackupComplaint>> {
    let backup_id_str = encode_uuid(Uuid::new_v4());
    let id_str        = encode_uuid(id);
    let owner_str     = encode_uuid(owner);
    let at_str        = encode_dt(now());

    let raw: Option<RawBackup> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Snapshot first; the ownership check is part of the same statement.
        let archived = tx.execute(
          "INSERT INTO backup_complaints (
             backup_id, original_id, complaint_number, citizen_id,
             citizen_name, citizen_phone, complaint_name, complaint_type,
             address, description, image_url, status,
             original_created_at, created_at, updated_at
           )
           SELECT ?1, complaint_id, complaint_number, citizen_id,
                  citizen_name, citizen_phone, complaint_name, complaint_type,
                  address, description, image_url, status,
                  created_at, ?4, ?4
           FROM complaints
           WHERE complaint_id = ?2 AND citizen_id = ?3",
          rusqlite::params![backup_id_str, id_str, owner_str, at_str],
        )?;

        if archived == 0 {
          // Dropping `tx` rolls back; nothing was written anyway.
          return Ok(None);
        }

        tx.execute(
          "DELETE FROM complaints WHERE complaint_id = ?1",
          rusqlite::params![id_str],
        )?;

        let raw = tx.query_row(
          &format!(
            "SELECT {BACKUP_COLUMNS} FROM backup_complaints WHERE backup_id = ?1"
          ),
          rusqlite::params![backup_id_str],
          RawBackup::from_row,
        )?;

        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawBackup::into_backup).transpose()
  }

  async fn query_complaints(&self, query: &ComplaintQuery) -> Result<Vec<Complaint>> {
    // Every bound value is text, so the parameters are collected as strings
    // and numbered in the order their conditions are pushed.
    let mut conds: Vec<String> = vec![];
    let mut values: Vec<String> = vec![];

    if let Some(citizen_id) = query.citizen_id {
      values.push(encode_uuid(citizen_id));
      conds.push(format!("citizen_id = ?{}", values.len()));
    }
    if let Some(phone) = &query.phone_contains {
      // SQLite's lower() folds ASCII only; fold the needle the same way.
      values.push(phone.to_ascii_lowercase());
      conds.push(format!("instr(lower(citizen_phone), ?{}) > 0", values.len()));
    }
    match query.status {
      StatusClause::Any => {}
      StatusClause::Exactly(s) => {
        values.push(encode_status(s).to_owned());
        conds.push(format!("status = ?{}", values.len()));
      }
      StatusClause::Not(s) => {
        values.push(encode_status(s).to_owned());
        conds.push(format!("status != ?{}", values.len()));
      }
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    let order_clause = match query.sort {
      SortOrder::CreatedDesc => "ORDER BY created_at DESC, rowid DESC",
      SortOrder::UpdatedDesc => "ORDER BY updated_at DESC, rowid DESC",
    };

    let sql = format!(
      "SELECT {COMPLAINT_COLUMNS} FROM complaints {where_clause} {order_clause}"
    );

    let raws: Vec<RawComplaint> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(values.iter()), RawComplaint::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComplaint::into_complaint).collect()
  }

  async fn count_complaints(&self, status: Option<ComplaintStatus>) -> Result<u64> {
    let status_str = status.map(encode_status);

    let count: i64 = self
      .conn
      .call(move |conn| {
        let n = match status_str {
          Some(s) => conn.query_row(
            "SELECT COUNT(*) FROM complaints WHERE status = ?1",
            rusqlite::params![s],
            |r| r.get(0),
          )?,
          None => conn.query_row("SELECT COUNT(*) FROM complaints", [], |r| r.get(0))?,
        };
        Ok(n)
      })
      .await?;

    Ok(count.max(0) as u64)
  }

  // ── Backups ───────────────────────────────────────────────────────────────

  async fn list_backups(&self) -> Result<Vec<BackupComplaint>> {
    let raws: Vec<RawBackup> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {BACKUP_COLUMNS} FROM backup_complaints
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawBackup::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBackup::into_backup).collect()
  }
}
