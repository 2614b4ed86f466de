//! Submission validation.
//!
//! Pure functions; nothing here touches the store. The browser form checks
//! the same fields, but this is the authoritative check.

use serde::Deserialize;

use crate::{
  Error, Result,
  complaint::ComplaintType,
};

/// Fields exactly as a citizen submitted them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubmission {
  #[serde(default)]
  pub complaint_name: String,
  #[serde(default)]
  pub complaint_type: String,
  #[serde(default)]
  pub address:        String,
  #[serde(default)]
  pub description:    String,
}

/// A submission that passed validation, trimmed and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintDraft {
  pub complaint_name: String,
  pub complaint_type: ComplaintType,
  pub address:        String,
  pub description:    String,
  pub image_url:      Option<String>,
}

fn required(field: &'static str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::missing(field));
  }
  Ok(trimmed.to_owned())
}

/// Validate `raw` and normalise it into a [`ComplaintDraft`].
///
/// Reports the first offending field in form order: `complaint_name`,
/// `complaint_type`, `address`, `description`.
pub fn validate_submission(
  raw: &RawSubmission,
  image_url: Option<String>,
) -> Result<ComplaintDraft> {
  let complaint_name = required("complaint_name", &raw.complaint_name)?;
  let complaint_type =
    required("complaint_type", &raw.complaint_type)?.parse()?;
  let address = required("address", &raw.address)?;
  let description = required("description", &raw.description)?;

  let image_url = image_url
    .map(|u| u.trim().to_owned())
    .filter(|u| !u.is_empty());

  Ok(ComplaintDraft {
    complaint_name,
    complaint_type,
    address,
    description,
    image_url,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn leak() -> RawSubmission {
    RawSubmission {
      complaint_name: "Burst main".into(),
      complaint_type: "Water".into(),
      address:        "12 Elm St".into(),
      description:    "Leak".into(),
    }
  }

  fn invalid_field(err: Error) -> &'static str {
    match err {
      Error::Validation { field, .. } => field,
      other => panic!("expected validation error, got {other:?}"),
    }
  }

  #[test]
  fn accepts_complete_submission() {
    let draft = validate_submission(&leak(), None).unwrap();
    assert_eq!(draft.complaint_type, ComplaintType::Water);
    assert_eq!(draft.address, "12 Elm St");
    assert_eq!(draft.image_url, None);
  }

  #[test]
  fn trims_fields() {
    let mut raw = leak();
    raw.complaint_name = "  Burst main \n".into();
    let draft = validate_submission(&raw, Some(" /uploads/a.jpg ".into()))
      .unwrap();
    assert_eq!(draft.complaint_name, "Burst main");
    assert_eq!(draft.image_url.as_deref(), Some("/uploads/a.jpg"));
  }

  #[test]
  fn blank_image_url_is_absent() {
    let draft = validate_submission(&leak(), Some("   ".into())).unwrap();
    assert_eq!(draft.image_url, None);
  }

  #[test]
  fn reports_first_missing_field() {
    let raw = RawSubmission {
      complaint_type: "Road".into(),
      ..RawSubmission::default()
    };
    let err = validate_submission(&raw, None).unwrap_err();
    assert_eq!(invalid_field(err), "complaint_name");

    let mut raw = leak();
    raw.address = "   ".into();
    raw.description = String::new();
    let err = validate_submission(&raw, None).unwrap_err();
    assert_eq!(invalid_field(err), "address");
  }

  #[test]
  fn rejects_unknown_complaint_type() {
    for bad in ["Sewage", "water", "ELECTRICITY", "On Progress"] {
      let mut raw = leak();
      raw.complaint_type = bad.into();
      let err = validate_submission(&raw, None).unwrap_err();
      assert_eq!(invalid_field(err), "complaint_type", "{bad:?}");
    }
  }
}
