//! Lifecycle rules — the pipeline invariants enforced atop raw storage.
//!
//! Status transitions are unrestricted (any stage may move to any other);
//! what this module pins down is everything derived from them: the optional
//! auto-resurface on close, the revisit predicate and bucket precedence, the
//! idempotent tag edits, and the single authoritative action-label table.

use std::str::FromStr;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  store::SubmissionStore,
  submission::{Status, Submission},
};

// ─── Tag edits ───────────────────────────────────────────────────────────────

/// A pure tag-set transformation, applied atomically at the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEdit {
  /// No-op if the tag is already present.
  Add(String),
  /// No-op if the tag is absent.
  Remove(String),
  Clear,
}

/// The single definition of tag-mutation semantics. Both the store backends
/// and the tests go through this; insertion order of surviving tags is
/// preserved.
pub fn apply_tag_edit(tags: &[String], edit: &TagEdit) -> Vec<String> {
  match edit {
    TagEdit::Add(tag) => {
      let mut next = tags.to_vec();
      if !next.iter().any(|t| t == tag) {
        next.push(tag.clone());
      }
      next
    }
    TagEdit::Remove(tag) => tags.iter().filter(|t| *t != tag).cloned().collect(),
    TagEdit::Clear => Vec::new(),
  }
}

// ─── Auto-resurface policy ───────────────────────────────────────────────────

/// Whether a transition to `closed` schedules an automatic revisit.
///
/// The product history disagrees with itself here: one UI iteration scheduled
/// a six-month resurface on close, the wired-up data layer never touched the
/// date. The policy makes that choice explicit and configurable; the default
/// matches the wired behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AutoResurfacePolicy {
  #[default]
  Disabled,
  OnClose { months: u32 },
}

impl AutoResurfacePolicy {
  /// The resurface date a transition to `next` should schedule, if any.
  pub fn resurface_after(
    &self,
    next: Status,
    now: DateTime<Utc>,
  ) -> Option<DateTime<Utc>> {
    match *self {
      Self::OnClose { months } if next == Status::Closed => {
        now.checked_add_months(Months::new(months))
      }
      _ => None,
    }
  }
}

// ─── Revisit predicate and buckets ───────────────────────────────────────────

/// A submission is due for revisit iff its resurface date has arrived.
/// Independent of status: a closed submission can still be due.
pub fn due_for_revisit(submission: &Submission, now: DateTime<Utc>) -> bool {
  submission.resurface_date.is_some_and(|date| date <= now)
}

/// A status-filtered listing view.
///
/// `Revisit` takes priority over the status buckets — a due submission never
/// appears under its own status. `All` by convention excludes anything with a
/// resurface date at all: such a submission has left the normal flow until
/// handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketFilter {
  All,
  Revisit,
  Status(Status),
}

impl FromStr for BucketFilter {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "all" => Ok(Self::All),
      "revisit" => Ok(Self::Revisit),
      other => other.parse::<Status>().map(Self::Status),
    }
  }
}

pub fn matches_filter(
  submission: &Submission,
  filter: BucketFilter,
  now: DateTime<Utc>,
) -> bool {
  match filter {
    BucketFilter::All => submission.resurface_date.is_none(),
    BucketFilter::Revisit => due_for_revisit(submission, now),
    BucketFilter::Status(status) => {
      submission.status == status && !due_for_revisit(submission, now)
    }
  }
}

/// Surface due-for-revisit submissions ahead of their peers. Stable, so the
/// newest-first order from the store is preserved within each group.
pub fn sort_for_listing(submissions: &mut [Submission], now: DateTime<Utc>) {
  submissions.sort_by_key(|s| !due_for_revisit(s, now));
}

// ─── Action labels ───────────────────────────────────────────────────────────

/// The authoritative status → suggested-operator-action table. Every call
/// site goes through here; do not duplicate this mapping.
pub fn suggested_action(status: Status) -> &'static str {
  match status {
    Status::New => "Draft Intro Email",
    Status::Lead => "Plan Follow-Up",
    Status::Client => "Draft Next Steps",
    Status::Closed => "Send Thank-You",
  }
}

/// Label lookup for a raw status string (e.g. straight from a query
/// parameter). Unknown strings fall back to a generic prompt.
pub fn suggested_action_label(status: &str) -> &'static str {
  status
    .parse::<Status>()
    .map(suggested_action)
    .unwrap_or("Suggest Action")
}

// ─── Orchestration over the store ────────────────────────────────────────────

/// Transition a submission to `next` and apply the auto-resurface policy.
/// Returns the scheduled resurface date when the policy fired.
pub async fn transition_status<S>(
  store: &S,
  policy: AutoResurfacePolicy,
  id: Uuid,
  next: Status,
) -> Result<Option<DateTime<Utc>>>
where
  S: SubmissionStore,
  S::Error: Into<Error>,
{
  store.update_status(id, next).await.map_err(Into::into)?;

  match policy.resurface_after(next, Utc::now()) {
    Some(date) => {
      store
        .update_resurface_date(id, Some(date))
        .await
        .map_err(Into::into)?;
      Ok(Some(date))
    }
    None => Ok(None),
  }
}

/// Add a tag; idempotent. Returns the resulting tag set.
pub async fn add_tag<S>(store: &S, id: Uuid, tag: &str) -> Result<Vec<String>>
where
  S: SubmissionStore,
  S::Error: Into<Error>,
{
  store
    .edit_tags(id, TagEdit::Add(tag.to_owned()))
    .await
    .map_err(Into::into)
}

/// Remove a tag; a no-op if absent. Returns the resulting tag set.
pub async fn remove_tag<S>(store: &S, id: Uuid, tag: &str) -> Result<Vec<String>>
where
  S: SubmissionStore,
  S::Error: Into<Error>,
{
  store
    .edit_tags(id, TagEdit::Remove(tag.to_owned()))
    .await
    .map_err(Into::into)
}

/// Empty the tag set regardless of prior contents.
pub async fn clear_tags<S>(store: &S, id: Uuid) -> Result<Vec<String>>
where
  S: SubmissionStore,
  S::Error: Into<Error>,
{
  store.edit_tags(id, TagEdit::Clear).await.map_err(Into::into)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
