//! [`SqliteStore`] — the SQLite implementation of [`SubmissionStore`].

use std::{path::Path, time::Duration};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use intake_core::{
  lifecycle::{TagEdit, apply_tag_edit},
  note::{NewNote, Note},
  store::SubmissionStore,
  submission::{NewSubmission, Status, Submission},
};

use crate::{
  Error, Result,
  encode::{
    RawNote, RawSubmission, SUBMISSION_COLUMNS, decode_tags, encode_dt,
    encode_note_type, encode_status, encode_uuid,
  },
  schema::SCHEMA,
};

/// Applied to every database call unless overridden with
/// [`SqliteStore::with_op_timeout`].
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// An intake submission store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls on
/// one store share a single connection thread, which is what serialises the
/// tag read-modify-write.
#[derive(Clone)]
pub struct SqliteStore {
  conn:       tokio_rusqlite::Connection,
  op_timeout: Duration,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, op_timeout: DEFAULT_OP_TIMEOUT };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, op_timeout: DEFAULT_OP_TIMEOUT };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the per-operation deadline.
  pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
    self.op_timeout = timeout;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Run `op` on the connection thread under the store's deadline.
  async fn call<T, F>(&self, op: F) -> Result<T>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<T>
      + Send
      + 'static,
    T: Send + 'static,
  {
    match tokio::time::timeout(self.op_timeout, self.conn.call(op)).await {
      Ok(result) => Ok(result?),
      Err(_) => Err(Error::Timeout(self.op_timeout)),
    }
  }
}

/// Lift a non-rusqlite error out of a connection closure.
fn other_err<E>(e: E) -> tokio_rusqlite::Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  tokio_rusqlite::Error::Other(Box::new(e))
}

fn raw_submission(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSubmission> {
  Ok(RawSubmission {
    id:             row.get(0)?,
    created_at:     row.get(1)?,
    first_name:     row.get(2)?,
    last_name:      row.get(3)?,
    email:          row.get(4)?,
    company:        row.get(5)?,
    role:           row.get(6)?,
    interest_area:  row.get(7)?,
    goals:          row.get(8)?,
    status:         row.get(9)?,
    tags:           row.get(10)?,
    resurface_date: row.get(11)?,
    deleted_at:     row.get(12)?,
  })
}

fn raw_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawNote> {
  Ok(RawNote {
    note_id:       row.get(0)?,
    submission_id: row.get(1)?,
    note_type:     row.get(2)?,
    note_text:     row.get(3)?,
    created_by:    row.get(4)?,
    created_at:    row.get(5)?,
  })
}

// ─── SubmissionStore impl ────────────────────────────────────────────────────

impl SubmissionStore for SqliteStore {
  type Error = Error;

  // ── Submissions ───────────────────────────────────────────────────────────

  async fn create(&self, input: NewSubmission) -> Result<Submission> {
    let NewSubmission {
      first_name,
      last_name,
      email,
      company,
      role,
      interest_area,
      goals,
      ip_address,
      user_agent,
    } = input;

    let submission = Submission {
      id: Uuid::new_v4(),
      created_at: Utc::now(),
      first_name,
      last_name,
      email,
      company,
      role,
      interest_area,
      goals,
      status: Status::New,
      tags: Vec::new(),
      resurface_date: None,
      deleted_at: None,
    };

    let id_str        = encode_uuid(submission.id);
    let at_str        = encode_dt(submission.created_at);
    let first_name    = submission.first_name.clone();
    let last_name     = submission.last_name.clone();
    let email         = submission.email.clone();
    let company       = submission.company.clone();
    let role          = submission.role.clone();
    let interest_area = submission.interest_area.clone();
    let goals         = submission.goals.clone();
    let status_str    = encode_status(submission.status).to_owned();

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO submissions (
             id, created_at, first_name, last_name, email,
             company, role, interest_area, goals,
             status, tags, ip_address, user_agent
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, '[]', ?11, ?12)",
          rusqlite::params![
            id_str,
            at_str,
            first_name,
            last_name,
            email,
            company,
            role,
            interest_area,
            goals,
            status_str,
            ip_address,
            user_agent,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(submission)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Submission>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSubmission> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?1"),
              rusqlite::params![id_str],
              raw_submission,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubmission::into_submission).transpose()
  }

  async fn list_active(&self) -> Result<Vec<Submission>> {
    let raws: Vec<RawSubmission> = self
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBMISSION_COLUMNS} FROM submissions
           WHERE deleted_at IS NULL
           ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map([], raw_submission)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubmission::into_submission).collect()
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn update_status(&self, id: Uuid, status: Status) -> Result<()> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status).to_owned();

    let updated = self
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE submissions SET status = ?1 WHERE id = ?2 AND deleted_at IS NULL",
          rusqlite::params![status_str, id_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::SubmissionNotFound(id));
    }
    Ok(())
  }

  async fn edit_tags(&self, id: Uuid, edit: TagEdit) -> Result<Vec<String>> {
    let id_str = encode_uuid(id);

    // Read, transform, and write inside one connection call: calls on this
    // store run on a single thread, so concurrent edits on the same
    // submission cannot interleave and lose updates.
    let updated: Option<String> = self
      .call(move |conn| {
        let current: Option<String> = conn
          .query_row(
            "SELECT tags FROM submissions WHERE id = ?1 AND deleted_at IS NULL",
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;

        let Some(tags_json) = current else {
          return Ok(None);
        };

        let tags: Vec<String> =
          serde_json::from_str(&tags_json).map_err(other_err)?;
        let next = apply_tag_edit(&tags, &edit);
        let next_json = serde_json::to_string(&next).map_err(other_err)?;

        conn.execute(
          "UPDATE submissions SET tags = ?1 WHERE id = ?2",
          rusqlite::params![next_json, id_str],
        )?;

        Ok(Some(next_json))
      })
      .await?;

    match updated {
      Some(json) => decode_tags(&json),
      None => Err(Error::SubmissionNotFound(id)),
    }
  }

  async fn update_resurface_date(
    &self,
    id: Uuid,
    date: Option<DateTime<Utc>>,
  ) -> Result<()> {
    let id_str   = encode_uuid(id);
    let date_str = date.map(encode_dt);

    let updated = self
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE submissions SET resurface_date = ?1
           WHERE id = ?2 AND deleted_at IS NULL",
          rusqlite::params![date_str, id_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::SubmissionNotFound(id));
    }
    Ok(())
  }

  async fn soft_delete(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    let exists = self
      .call(move |conn| {
        let updated = conn.execute(
          "UPDATE submissions SET deleted_at = ?1
           WHERE id = ?2 AND deleted_at IS NULL",
          rusqlite::params![at_str, id_str],
        )?;

        if updated > 0 {
          return Ok(true);
        }

        // Already deleted is fine; never existed is not.
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM submissions WHERE id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        Ok(exists)
      })
      .await?;

    if !exists {
      return Err(Error::SubmissionNotFound(id));
    }
    Ok(())
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  async fn add_note(&self, input: NewNote) -> Result<Note> {
    let note = Note {
      note_id:       Uuid::new_v4(),
      submission_id: input.submission_id,
      note_type:     input.note_type,
      note_text:     input.note_text,
      created_by:    input.created_by,
      created_at:    Utc::now(),
    };

    let note_id_str       = encode_uuid(note.note_id);
    let submission_id_str = encode_uuid(note.submission_id);
    let type_str          = encode_note_type(note.note_type).to_owned();
    let text              = note.note_text.clone();
    let by                = note.created_by.clone();
    let at_str            = encode_dt(note.created_at);

    let inserted = self
      .call(move |conn| {
        // Notes may only be appended to live submissions; the existing
        // timeline of a deleted one stays readable, it just stops growing.
        let live: Option<Option<String>> = conn
          .query_row(
            "SELECT deleted_at FROM submissions WHERE id = ?1",
            rusqlite::params![submission_id_str],
            |row| row.get(0),
          )
          .optional()?;

        match live {
          Some(None) => {
            conn.execute(
              "INSERT INTO submission_notes (
                 note_id, submission_id, note_type, note_text, created_by, created_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              rusqlite::params![
                note_id_str,
                submission_id_str,
                type_str,
                text,
                by,
                at_str,
              ],
            )?;
            Ok(true)
          }
          _ => Ok(false),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::SubmissionNotFound(note.submission_id));
    }
    Ok(note)
  }

  async fn list_notes(&self, submission_id: Uuid) -> Result<Vec<Note>> {
    let id_str = encode_uuid(submission_id);

    let raws: Vec<RawNote> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT note_id, submission_id, note_type, note_text, created_by, created_at
           FROM submission_notes
           WHERE submission_id = ?1
           ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], raw_note)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNote::into_note).collect()
  }

  // ── Rate-limit bookkeeping ────────────────────────────────────────────────

  async fn recent_submissions_from(
    &self,
    ip: &str,
    since: DateTime<Utc>,
  ) -> Result<u64> {
    let ip        = ip.to_owned();
    let since_str = encode_dt(since);

    let count: i64 = self
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM submissions
           WHERE ip_address = ?1 AND created_at >= ?2",
          rusqlite::params![ip, since_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }
}
