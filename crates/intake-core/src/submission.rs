//! Submission — a contact-form lead record.
//!
//! One versioned record type with every field always present (nullable where
//! optional). The public contact form creates a submission once; everything
//! after that is an admin mutation through the store.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The pipeline stage of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  New,
  Lead,
  Client,
  Closed,
}

impl Status {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::New => "new",
      Self::Lead => "lead",
      Self::Client => "client",
      Self::Closed => "closed",
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Status {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "new" => Ok(Self::New),
      "lead" => Ok(Self::Lead),
      "client" => Ok(Self::Client),
      "closed" => Ok(Self::Closed),
      other => Err(Error::Validation(format!("unknown status: {other:?}"))),
    }
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// A contact-form lead as stored. Tag insertion order is preserved (the UI
/// shows recently added tags last); duplicates never occur — the store applies
/// tag edits through [`crate::lifecycle::apply_tag_edit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
  pub id:             Uuid,
  pub created_at:     DateTime<Utc>,
  pub first_name:     String,
  pub last_name:      String,
  pub email:          String,
  pub company:        Option<String>,
  pub role:           Option<String>,
  pub interest_area:  Option<String>,
  pub goals:          Option<String>,
  pub status:         Status,
  pub tags:           Vec<String>,
  /// When present and in the past, the submission is due for manual revisit
  /// regardless of its status.
  pub resurface_date: Option<DateTime<Utc>>,
  /// Non-null marks a soft delete; the record stays on disk for audit.
  pub deleted_at:     Option<DateTime<Utc>>,
}

impl Submission {
  /// Display name used by note templates and operator-facing messages.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

// ─── NewSubmission ───────────────────────────────────────────────────────────

const MAX_NAME: usize = 100;
const MAX_EMAIL: usize = 255;
const MAX_COMPANY: usize = 255;
const MAX_ROLE: usize = 100;
const MAX_INTEREST: usize = 100;
const MAX_GOALS: usize = 2000;

/// Input to [`crate::store::SubmissionStore::create`].
///
/// `id`, `created_at`, `status` (always `new`) and the empty tag set are
/// assigned by the store. The client address and user agent are kept for
/// rate-limit bookkeeping and audit; they are not part of the read model.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubmission {
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub company:       Option<String>,
  pub role:          Option<String>,
  pub interest_area: Option<String>,
  pub goals:         Option<String>,
  #[serde(skip)]
  pub ip_address:    Option<String>,
  #[serde(skip)]
  pub user_agent:    Option<String>,
}

impl NewSubmission {
  /// Trim and normalise the input, then enforce the contact-form
  /// constraints. Returns the cleaned value or a [`Error::Validation`].
  pub fn validated(mut self) -> Result<Self> {
    self.first_name = self.first_name.trim().to_owned();
    self.last_name = self.last_name.trim().to_owned();
    self.email = self.email.trim().to_lowercase();
    self.company = normalize(self.company);
    self.role = normalize(self.role);
    self.interest_area = normalize(self.interest_area);
    self.goals = normalize(self.goals);

    require("first name", &self.first_name, MAX_NAME)?;
    require("last name", &self.last_name, MAX_NAME)?;
    require("email", &self.email, MAX_EMAIL)?;

    if !well_formed_email(&self.email) {
      return Err(Error::Validation("invalid email format".to_owned()));
    }

    bounded("company", self.company.as_deref(), MAX_COMPANY)?;
    bounded("role", self.role.as_deref(), MAX_ROLE)?;
    bounded("interest area", self.interest_area.as_deref(), MAX_INTEREST)?;
    bounded("goals", self.goals.as_deref(), MAX_GOALS)?;

    Ok(self)
  }
}

/// Trim an optional field; blank collapses to `None`.
fn normalize(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

fn require(field: &str, value: &str, max: usize) -> Result<()> {
  if value.is_empty() {
    return Err(Error::Validation(format!("{field} is required")));
  }
  bounded(field, Some(value), max)
}

fn bounded(field: &str, value: Option<&str>, max: usize) -> Result<()> {
  if value.is_some_and(|v| v.chars().count() > max) {
    return Err(Error::Validation(format!(
      "{field} must be at most {max} characters"
    )));
  }
  Ok(())
}

/// `local@domain.tld` with non-empty parts and no whitespace. Deliberately
/// shallow — the form filter, not an RFC 5321 validator.
fn well_formed_email(email: &str) -> bool {
  if email.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  matches!(
    domain.rsplit_once('.'),
    Some((host, tld)) if !host.is_empty() && !tld.is_empty()
  )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn input() -> NewSubmission {
    NewSubmission {
      first_name:    "Ada".to_owned(),
      last_name:     "Lovelace".to_owned(),
      email:         "Ada@Example.COM".to_owned(),
      company:       Some("Analytical Engines".to_owned()),
      role:          None,
      interest_area: None,
      goals:         None,
      ip_address:    None,
      user_agent:    None,
    }
  }

  #[test]
  fn validated_lowercases_email_and_trims() {
    let mut raw = input();
    raw.first_name = "  Ada ".to_owned();
    raw.company = Some("   ".to_owned());

    let clean = raw.validated().unwrap();
    assert_eq!(clean.first_name, "Ada");
    assert_eq!(clean.email, "ada@example.com");
    assert_eq!(clean.company, None);
  }

  #[test]
  fn missing_required_field_is_rejected() {
    let mut raw = input();
    raw.last_name = String::new();
    assert!(matches!(raw.validated(), Err(Error::Validation(_))));
  }

  #[test]
  fn overlong_goals_are_rejected() {
    let mut raw = input();
    raw.goals = Some("x".repeat(2001));
    assert!(matches!(raw.validated(), Err(Error::Validation(_))));
  }

  #[test]
  fn email_shapes() {
    assert!(well_formed_email("a@b.c"));
    assert!(well_formed_email("first.last@mail.example.com"));
    assert!(!well_formed_email("no-at-sign"));
    assert!(!well_formed_email("@example.com"));
    assert!(!well_formed_email("a@nodot"));
    assert!(!well_formed_email("a@b."));
    assert!(!well_formed_email("a b@example.com"));
  }

  #[test]
  fn status_round_trips_through_strings() {
    for status in [Status::New, Status::Lead, Status::Client, Status::Closed] {
      assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
    }
    assert!("archived".parse::<Status>().is_err());
  }
}
