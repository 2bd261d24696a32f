//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use intake_core::{
  lifecycle::{self, AutoResurfacePolicy, TagEdit},
  note::{NewNote, NoteType},
  store::SubmissionStore,
  submission::{NewSubmission, Status},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn submission_input(email: &str) -> NewSubmission {
  NewSubmission {
    first_name:    "Ada".into(),
    last_name:     "Lovelace".into(),
    email:         email.into(),
    company:       Some("Analytical Engines".into()),
    role:          Some("Founder".into()),
    interest_area: Some("AI Strategy".into()),
    goals:         None,
    ip_address:    Some("203.0.113.7".into()),
    user_agent:    Some("tests".into()),
  }
}

fn note_input(submission_id: Uuid, text: &str) -> NewNote {
  NewNote {
    submission_id,
    note_type: NoteType::Call,
    note_text: text.into(),
    created_by: "admin".into(),
  }
}

/// Creates get distinct timestamps so newest-first ordering is deterministic.
async fn settle() {
  tokio::time::sleep(Duration::from_millis(5)).await;
}

// ─── Create / get / list ─────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_new_status_and_empty_tags() {
  let s = store().await;

  let created = s.create(submission_input("ada@example.com")).await.unwrap();
  assert_eq!(created.status, Status::New);
  assert!(created.tags.is_empty());
  assert!(created.resurface_date.is_none());
  assert!(created.deleted_at.is_none());

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, created.id);
  assert_eq!(fetched.email, "ada@example.com");
  assert_eq!(fetched.company.as_deref(), Some("Analytical Engines"));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_active_is_newest_first() {
  let s = store().await;

  let first = s.create(submission_input("a@example.com")).await.unwrap();
  settle().await;
  let second = s.create(submission_input("b@example.com")).await.unwrap();
  settle().await;
  let third = s.create(submission_input("c@example.com")).await.unwrap();

  let listing = s.list_active().await.unwrap();
  let ids: Vec<_> = listing.iter().map(|x| x.id).collect();
  assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn list_active_excludes_soft_deleted() {
  let s = store().await;

  let keep = s.create(submission_input("keep@example.com")).await.unwrap();
  let gone = s.create(submission_input("gone@example.com")).await.unwrap();
  s.soft_delete(gone.id).await.unwrap();

  let listing = s.list_active().await.unwrap();
  assert_eq!(listing.len(), 1);
  assert_eq!(listing[0].id, keep.id);

  // The record itself survives for audit.
  let audit = s.get(gone.id).await.unwrap().unwrap();
  assert!(audit.deleted_at.is_some());
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_status_replaces_and_leaves_resurface_alone() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();

  s.update_status(created.id, Status::Lead).await.unwrap();
  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.status, Status::Lead);
  assert!(fetched.resurface_date.is_none());
}

#[tokio::test]
async fn update_status_unknown_id_errors() {
  let s = store().await;
  let err = s.update_status(Uuid::new_v4(), Status::Lead).await.unwrap_err();
  assert!(matches!(err, crate::Error::SubmissionNotFound(_)));
}

#[tokio::test]
async fn update_status_on_soft_deleted_errors() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();
  s.soft_delete(created.id).await.unwrap();

  let err = s.update_status(created.id, Status::Client).await.unwrap_err();
  assert!(matches!(err, crate::Error::SubmissionNotFound(_)));
}

// ─── Tags ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn tag_add_twice_then_remove_round_trip() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();

  let tags = s
    .edit_tags(created.id, TagEdit::Add("Hot Lead".into()))
    .await
    .unwrap();
  assert_eq!(tags, vec!["Hot Lead".to_owned()]);

  // Second add: unchanged, still exactly one entry.
  let tags = s
    .edit_tags(created.id, TagEdit::Add("Hot Lead".into()))
    .await
    .unwrap();
  assert_eq!(tags, vec!["Hot Lead".to_owned()]);

  let tags = s
    .edit_tags(created.id, TagEdit::Remove("Hot Lead".into()))
    .await
    .unwrap();
  assert!(tags.is_empty());
}

#[tokio::test]
async fn tag_remove_absent_is_noop_and_clear_empties() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();

  s.edit_tags(created.id, TagEdit::Add("Email Sent".into()))
    .await
    .unwrap();
  s.edit_tags(created.id, TagEdit::Add("AI Strategy".into()))
    .await
    .unwrap();

  let tags = s
    .edit_tags(created.id, TagEdit::Remove("Budget Approved".into()))
    .await
    .unwrap();
  assert_eq!(tags, vec!["Email Sent".to_owned(), "AI Strategy".to_owned()]);

  let tags = s.edit_tags(created.id, TagEdit::Clear).await.unwrap();
  assert!(tags.is_empty());

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert!(fetched.tags.is_empty());
}

#[tokio::test]
async fn tag_edit_on_soft_deleted_errors() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();
  s.soft_delete(created.id).await.unwrap();

  let err = s
    .edit_tags(created.id, TagEdit::Add("Hot Lead".into()))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::SubmissionNotFound(_)));
}

#[tokio::test]
async fn concurrent_tag_adds_lose_nothing() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();

  let mut handles = Vec::new();
  for tag in ["Hot Lead", "Email Sent", "Call Made", "Budget Approved"] {
    let s = s.clone();
    let id = created.id;
    handles.push(tokio::spawn(async move {
      s.edit_tags(id, TagEdit::Add(tag.to_owned())).await
    }));
  }
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.tags.len(), 4);
}

// ─── Resurface date ──────────────────────────────────────────────────────────

#[tokio::test]
async fn resurface_date_set_and_clear() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();

  let date = Utc::now() + TimeDelta::days(30);
  s.update_resurface_date(created.id, Some(date)).await.unwrap();
  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.resurface_date, Some(date));

  s.update_resurface_date(created.id, None).await.unwrap();
  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert!(fetched.resurface_date.is_none());
}

// ─── Soft delete ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn soft_delete_is_idempotent() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();

  s.soft_delete(created.id).await.unwrap();
  // Deleting twice is not an error.
  s.soft_delete(created.id).await.unwrap();

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert!(fetched.deleted_at.is_some());
}

#[tokio::test]
async fn soft_delete_unknown_id_errors() {
  let s = store().await;
  let err = s.soft_delete(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::SubmissionNotFound(_)));
}

// ─── Notes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn notes_list_newest_first() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();

  s.add_note(note_input(created.id, "first call")).await.unwrap();
  settle().await;
  s.add_note(note_input(created.id, "second call")).await.unwrap();

  let notes = s.list_notes(created.id).await.unwrap();
  assert_eq!(notes.len(), 2);
  assert_eq!(notes[0].note_text, "second call");
  assert_eq!(notes[1].note_text, "first call");
  assert_eq!(notes[0].created_by, "admin");
}

#[tokio::test]
async fn notes_survive_soft_delete_of_their_submission() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();

  s.add_note(note_input(created.id, "before deletion")).await.unwrap();
  s.soft_delete(created.id).await.unwrap();

  let notes = s.list_notes(created.id).await.unwrap();
  assert_eq!(notes.len(), 1);
  assert_eq!(notes[0].note_text, "before deletion");

  // The timeline stops growing, though.
  let err = s
    .add_note(note_input(created.id, "after deletion"))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::SubmissionNotFound(_)));
}

#[tokio::test]
async fn add_note_unknown_submission_errors() {
  let s = store().await;
  let err = s
    .add_note(note_input(Uuid::new_v4(), "orphan"))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::SubmissionNotFound(_)));
}

// ─── Rate-limit bookkeeping ──────────────────────────────────────────────────

#[tokio::test]
async fn recent_submissions_count_per_ip() {
  let s = store().await;
  let since = Utc::now() - TimeDelta::hours(1);

  s.create(submission_input("a@example.com")).await.unwrap();
  s.create(submission_input("b@example.com")).await.unwrap();

  let mut other = submission_input("c@example.com");
  other.ip_address = Some("198.51.100.1".into());
  s.create(other).await.unwrap();

  assert_eq!(s.recent_submissions_from("203.0.113.7", since).await.unwrap(), 2);
  assert_eq!(s.recent_submissions_from("198.51.100.1", since).await.unwrap(), 1);
  assert_eq!(s.recent_submissions_from("192.0.2.1", since).await.unwrap(), 0);
}

// ─── Lifecycle orchestration over the store ──────────────────────────────────

#[tokio::test]
async fn closing_with_on_close_policy_schedules_six_months_out() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();
  s.update_status(created.id, Status::Client).await.unwrap();

  let before = Utc::now();
  let scheduled = lifecycle::transition_status(
    &s,
    AutoResurfacePolicy::OnClose { months: 6 },
    created.id,
    Status::Closed,
  )
  .await
  .unwrap()
  .expect("policy should schedule a resurface");

  // Six calendar months from "now", give or take the test's own runtime.
  let lower = before.checked_add_months(chrono::Months::new(6)).unwrap();
  let upper = Utc::now().checked_add_months(chrono::Months::new(6)).unwrap();
  assert!(scheduled >= lower && scheduled <= upper);

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.status, Status::Closed);
  assert_eq!(fetched.resurface_date, Some(scheduled));
}

#[tokio::test]
async fn closing_with_disabled_policy_leaves_resurface_unchanged() {
  let s = store().await;
  let created = s.create(submission_input("x@example.com")).await.unwrap();
  s.update_status(created.id, Status::Client).await.unwrap();

  let scheduled = lifecycle::transition_status(
    &s,
    AutoResurfacePolicy::Disabled,
    created.id,
    Status::Closed,
  )
  .await
  .unwrap();
  assert!(scheduled.is_none());

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.status, Status::Closed);
  assert!(fetched.resurface_date.is_none());
}

#[tokio::test]
async fn transition_errors_carry_the_core_taxonomy() {
  let s = store().await;

  let err = lifecycle::transition_status(
    &s,
    AutoResurfacePolicy::Disabled,
    Uuid::new_v4(),
    Status::Lead,
  )
  .await
  .unwrap_err();
  assert!(matches!(err, intake_core::Error::NotFound(_)));
}
