//! Dashboard queries over the active complaint store.
//!
//! The admin dashboard hides resolved complaints unless the admin explicitly
//! filters for them; resolved complaints have their own list ordered by when
//! they were last touched. Backups never appear here except through
//! [`list_backups`], and never count towards [`Stats`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  complaint::{BackupComplaint, Complaint, ComplaintStatus},
  identity::Citizen,
  store::{ComplaintQuery, ComplaintStore, SortOrder, StatusClause},
};

// ─── Filter ──────────────────────────────────────────────────────────────────

/// The dashboard's status dropdown: `All` or one concrete status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
  #[default]
  All,
  Only(ComplaintStatus),
}

impl FromStr for StatusFilter {
  type Err = Error;

  /// `"All"` and the empty string select the sentinel.
  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "" | "All" => Ok(Self::All),
      other => Ok(Self::Only(other.parse()?)),
    }
  }
}

/// Admin dashboard search.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
  /// Case-insensitive substring of the citizen's phone.
  pub phone:  Option<String>,
  pub status: StatusFilter,
}

impl ComplaintFilter {
  /// Translate the dashboard filter into a store query.
  ///
  /// With no explicit status, resolved complaints are excluded. An explicit
  /// status replaces that exclusion, so filtering for `Resolved` returns
  /// resolved complaints.
  pub fn to_query(&self) -> ComplaintQuery {
    let status = match self.status {
      StatusFilter::All => StatusClause::Not(ComplaintStatus::Resolved),
      StatusFilter::Only(s) => StatusClause::Exactly(s),
    };
    ComplaintQuery {
      citizen_id: None,
      phone_contains: self
        .phone
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(str::to_owned),
      status,
      sort: SortOrder::CreatedDesc,
    }
  }
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Dashboard counters over the active store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
  pub total:       u64,
  pub resolved:    u64,
  pub in_progress: u64,
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// Dashboard listing, newest first.
pub async fn list_active<S: ComplaintStore>(
  store: &S,
  filter: &ComplaintFilter,
) -> Result<Vec<Complaint>> {
  store
    .query_complaints(&filter.to_query())
    .await
    .map_err(Error::store)
}

/// Resolved complaints, most recently updated first.
pub async fn list_resolved<S: ComplaintStore>(
  store: &S,
) -> Result<Vec<Complaint>> {
  let query = ComplaintQuery {
    status: StatusClause::Exactly(ComplaintStatus::Resolved),
    sort: SortOrder::UpdatedDesc,
    ..ComplaintQuery::default()
  };
  store.query_complaints(&query).await.map_err(Error::store)
}

/// The citizen's own complaints in every status, newest first.
pub async fn list_owned<S: ComplaintStore>(
  store: &S,
  citizen: &Citizen,
) -> Result<Vec<Complaint>> {
  let query = ComplaintQuery {
    citizen_id: Some(citizen.id),
    ..ComplaintQuery::default()
  };
  store.query_complaints(&query).await.map_err(Error::store)
}

pub async fn stats<S: ComplaintStore>(store: &S) -> Result<Stats> {
  let total = store.count_complaints(None).await.map_err(Error::store)?;
  let resolved = store
    .count_complaints(Some(ComplaintStatus::Resolved))
    .await
    .map_err(Error::store)?;
  let in_progress = store
    .count_complaints(Some(ComplaintStatus::OnProgress))
    .await
    .map_err(Error::store)?;
  Ok(Stats { total, resolved, in_progress })
}

pub async fn list_backups<S: ComplaintStore>(
  store: &S,
) -> Result<Vec<BackupComplaint>> {
  store.list_backups().await.map_err(Error::store)
}
