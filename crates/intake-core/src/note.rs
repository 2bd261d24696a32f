//! Note — one entry in a submission's interaction log.
//!
//! Notes are immutable once created; the timeline is append-only. A
//! submission exclusively owns its notes, but soft-deleting the submission
//! does not cascade — the log stays readable for audit.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The kind of interaction a note records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
  Call,
  Email,
  Meeting,
  General,
}

impl NoteType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Call => "call",
      Self::Email => "email",
      Self::Meeting => "meeting",
      Self::General => "general",
    }
  }

  /// Operator-facing label.
  pub fn label(self) -> &'static str {
    match self {
      Self::Call => "Phone Call",
      Self::Email => "Email",
      Self::Meeting => "Meeting",
      Self::General => "General",
    }
  }
}

impl fmt::Display for NoteType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for NoteType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "call" => Ok(Self::Call),
      "email" => Ok(Self::Email),
      "meeting" => Ok(Self::Meeting),
      "general" => Ok(Self::General),
      other => Err(Error::Validation(format!("unknown note type: {other:?}"))),
    }
  }
}

/// An immutable timeline entry. Once written, no field ever changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
  pub note_id:       Uuid,
  pub submission_id: Uuid,
  pub note_type:     NoteType,
  pub note_text:     String,
  pub created_by:    String,
  /// Server-assigned; never accepted from callers.
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::SubmissionStore::add_note`].
#[derive(Debug, Clone)]
pub struct NewNote {
  pub submission_id: Uuid,
  pub note_type:     NoteType,
  pub note_text:     String,
  pub created_by:    String,
}
