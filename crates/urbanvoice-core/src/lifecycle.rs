//! The complaint lifecycle: submission, status changes, and owner deletion.
//!
//! A complaint starts as `Sent`. From there only an administrator moves it,
//! and any status may be set from any other (reopening a resolved complaint
//! is allowed). A citizen may delete their own complaint at any status; the
//! deletion archives a snapshot into the backup store in the same store
//! operation that removes the active record.

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  complaint::{
    BackupComplaint, Complaint, ComplaintStatus, NewComplaint,
    complaint_number, reserve_creation_time,
  },
  identity::{Admin, Citizen},
  store::ComplaintStore,
  validate::{RawSubmission, validate_submission},
};

/// Validate a submission and persist it as a new `Sent` complaint.
///
/// The citizen's name and phone are copied onto the complaint as they are
/// now; later profile changes do not affect it.
pub async fn submit<S: ComplaintStore>(
  store: &S,
  citizen: &Citizen,
  raw: &RawSubmission,
  image_url: Option<String>,
) -> Result<Complaint> {
  let draft = validate_submission(raw, image_url)?;

  let created_at = reserve_creation_time(Utc::now());
  let input = NewComplaint {
    complaint_number: complaint_number(created_at),
    created_at,
    citizen_id:       citizen.id,
    citizen_name:     citizen.name.clone(),
    citizen_phone:    citizen.phone.clone(),
    complaint_name:   draft.complaint_name,
    complaint_type:   draft.complaint_type,
    address:          draft.address,
    description:      draft.description,
    image_url:        draft.image_url,
  };

  let complaint = store.insert_complaint(input).await.map_err(|e| {
    error!(citizen = %citizen.id, error = %e, "failed to store complaint");
    Error::store(e)
  })?;

  info!(
    complaint = %complaint.complaint_number,
    citizen = %citizen.id,
    kind = %complaint.complaint_type,
    "complaint submitted"
  );
  Ok(complaint)
}

/// Parse an admin-supplied status string.
pub fn parse_status(raw: &str) -> Result<ComplaintStatus> { raw.trim().parse() }

/// Set the status of a complaint on behalf of `admin`.
///
/// No ordering between statuses is enforced. Setting the status a complaint
/// already has returns it unchanged.
pub async fn set_status<S: ComplaintStore>(
  store: &S,
  admin: &Admin,
  complaint_id: Uuid,
  status: ComplaintStatus,
) -> Result<Complaint> {
  let complaint = store
    .update_status(complaint_id, status)
    .await
    .map_err(|e| {
      error!(complaint = %complaint_id, error = %e, "failed to update status");
      Error::store(e)
    })?
    .ok_or(Error::NotFound)?;

  info!(
    complaint = %complaint.complaint_number,
    admin = %admin.username,
    status = %status,
    "complaint status set"
  );
  Ok(complaint)
}

/// Delete a complaint owned by `citizen`, archiving it first.
///
/// A missing complaint and one owned by somebody else both yield
/// [`Error::NotFound`]. If the store fails, nothing is archived and the
/// active complaint is kept.
pub async fn delete_owned<S: ComplaintStore>(
  store: &S,
  citizen: &Citizen,
  complaint_id: Uuid,
) -> Result<BackupComplaint> {
  let backup = store
    .archive_complaint(complaint_id, citizen.id)
    .await
    .map_err(|e| {
      error!(
        complaint = %complaint_id,
        citizen = %citizen.id,
        error = %e,
        "archive failed; active complaint kept"
      );
      Error::store(e)
    })?;

  let Some(backup) = backup else {
    warn!(
      complaint = %complaint_id,
      citizen = %citizen.id,
      "delete refused: complaint missing or not owned"
    );
    return Err(Error::NotFound);
  };

  info!(
    complaint = %backup.complaint_number,
    backup = %backup.backup_id,
    citizen = %citizen.id,
    "complaint archived and deleted"
  );
  Ok(backup)
}
