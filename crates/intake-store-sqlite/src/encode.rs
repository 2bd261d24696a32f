//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. The tag set is stored as a
//! compact JSON array. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use intake_core::{
  note::{Note, NoteType},
  submission::{Status, Submission},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn encode_status(s: Status) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<Status> {
  match s {
    "new" => Ok(Status::New),
    "lead" => Ok(Status::Lead),
    "client" => Ok(Status::Client),
    "closed" => Ok(Status::Closed),
    other => Err(Error::Decode(format!("unknown status: {other:?}"))),
  }
}

// ─── NoteType ────────────────────────────────────────────────────────────────

pub fn encode_note_type(t: NoteType) -> &'static str { t.as_str() }

pub fn decode_note_type(s: &str) -> Result<NoteType> {
  match s {
    "call" => Ok(NoteType::Call),
    "email" => Ok(NoteType::Email),
    "meeting" => Ok(NoteType::Meeting),
    "general" => Ok(NoteType::General),
    other => Err(Error::Decode(format!("unknown note type: {other:?}"))),
  }
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `submissions` row.
pub struct RawSubmission {
  pub id:             String,
  pub created_at:     String,
  pub first_name:     String,
  pub last_name:      String,
  pub email:          String,
  pub company:        Option<String>,
  pub role:           Option<String>,
  pub interest_area:  Option<String>,
  pub goals:          Option<String>,
  pub status:         String,
  pub tags:           String,
  pub resurface_date: Option<String>,
  pub deleted_at:     Option<String>,
}

impl RawSubmission {
  pub fn into_submission(self) -> Result<Submission> {
    Ok(Submission {
      id:             decode_uuid(&self.id)?,
      created_at:     decode_dt(&self.created_at)?,
      first_name:     self.first_name,
      last_name:      self.last_name,
      email:          self.email,
      company:        self.company,
      role:           self.role,
      interest_area:  self.interest_area,
      goals:          self.goals,
      status:         decode_status(&self.status)?,
      tags:           decode_tags(&self.tags)?,
      resurface_date: self
        .resurface_date
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      deleted_at:     self.deleted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// The column list matching [`RawSubmission`]; keep the two in sync.
pub const SUBMISSION_COLUMNS: &str = "id, created_at, first_name, last_name, \
  email, company, role, interest_area, goals, status, tags, resurface_date, \
  deleted_at";

/// Raw strings read directly from a `submission_notes` row.
pub struct RawNote {
  pub note_id:       String,
  pub submission_id: String,
  pub note_type:     String,
  pub note_text:     String,
  pub created_by:    String,
  pub created_at:    String,
}

impl RawNote {
  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      note_id:       decode_uuid(&self.note_id)?,
      submission_id: decode_uuid(&self.submission_id)?,
      note_type:     decode_note_type(&self.note_type)?,
      note_text:     self.note_text,
      created_by:    self.created_by,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
