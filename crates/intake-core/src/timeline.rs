//! Notes timeline — pure helpers for rendering the interaction log.
//!
//! Calendar math runs in the viewer's zone: every function takes `now` as a
//! zoned timestamp and converts note times into that zone, so the caller
//! passes `Local::now()` in production and a fixed zone in tests.

use std::fmt;

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::note::{Note, NoteType};

// ─── Relative age ────────────────────────────────────────────────────────────

/// "Just now", "5m ago", "3h ago", "2d ago", then an absolute date.
pub fn relative_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let elapsed = now.signed_duration_since(created_at);

  let minutes = elapsed.num_minutes();
  if minutes < 1 {
    return "Just now".to_owned();
  }
  if minutes < 60 {
    return format!("{minutes}m ago");
  }

  let hours = elapsed.num_hours();
  if hours < 24 {
    return format!("{hours}h ago");
  }

  let days = elapsed.num_days();
  if days < 7 {
    return format!("{days}d ago");
  }

  created_at.format("%b %-d, %H:%M").to_string()
}

// ─── Day dividers ────────────────────────────────────────────────────────────

/// The divider text shown above a note, or `None` when the previous listed
/// note falls on the same calendar day.
pub fn day_divider<Tz>(
  at: DateTime<Tz>,
  previous: Option<DateTime<Tz>>,
  now: DateTime<Tz>,
) -> Option<String>
where
  Tz: TimeZone,
  Tz::Offset: fmt::Display,
{
  let day = at.date_naive();
  if previous.is_some_and(|p| p.date_naive() == day) {
    return None;
  }

  let today = now.date_naive();
  if day == today {
    return Some("Today".to_owned());
  }
  if today.pred_opt() == Some(day) {
    return Some("Yesterday".to_owned());
  }

  let formatted = if day.year() == today.year() {
    at.format("%A, %B %-d")
  } else {
    at.format("%A, %B %-d, %Y")
  };
  Some(formatted.to_string())
}

/// One note in display order, with its divider (if the day changed).
#[derive(Debug, Clone)]
pub struct TimelineEntry<'a> {
  pub divider: Option<String>,
  pub note:    &'a Note,
}

/// Walk notes in display order (newest first) inserting day dividers.
pub fn group_by_day<'a, Tz>(
  notes: &'a [Note],
  now: DateTime<Tz>,
) -> Vec<TimelineEntry<'a>>
where
  Tz: TimeZone,
  Tz::Offset: fmt::Display,
{
  let tz = now.timezone();
  let mut previous: Option<DateTime<Tz>> = None;

  notes
    .iter()
    .map(|note| {
      let at = note.created_at.with_timezone(&tz);
      let divider = day_divider(at.clone(), previous.clone(), now.clone());
      previous = Some(at);
      TimelineEntry { divider, note }
    })
    .collect()
}

// ─── Text filter ─────────────────────────────────────────────────────────────

/// Case-insensitive substring match over note text. An empty query matches
/// everything; order is preserved.
pub fn filter_by_text<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
  if query.is_empty() {
    return notes.iter().collect();
  }
  let needle = query.to_lowercase();
  notes
    .iter()
    .filter(|note| note.note_text.to_lowercase().contains(&needle))
    .collect()
}

// ─── Quick templates ─────────────────────────────────────────────────────────

/// A canned note body with a `{{name}}` placeholder.
#[derive(Debug, Clone, Copy)]
pub struct NoteTemplate {
  pub label:     &'static str,
  pub note_type: NoteType,
  pub body:      &'static str,
}

impl NoteTemplate {
  /// Substitute the placeholder with the submission's full name. Pure string
  /// templating, no parsing.
  pub fn instantiate(&self, full_name: &str) -> String {
    self.body.replace("{{name}}", full_name)
  }
}

/// The quick-start compositions offered when logging an interaction. The
/// follow-up template has no dedicated note type and is saved as `general`.
pub const QUICK_TEMPLATES: [NoteTemplate; 4] = [
  NoteTemplate {
    label:     "Call",
    note_type: NoteType::Call,
    body:      "Had a call with {{name}}. Discussed:\n\n• \n• \n\nNext steps:\n• ",
  },
  NoteTemplate {
    label:     "Email",
    note_type: NoteType::Email,
    body:      "Sent email to {{name}} regarding:\n\n• \n\nWaiting for response on:\n• ",
  },
  NoteTemplate {
    label:     "Meeting",
    note_type: NoteType::Meeting,
    body:      "Meeting with {{name}}:\n\nAttendees: \nTopics covered:\n• \n• \n\nAction items:\n• ",
  },
  NoteTemplate {
    label:     "Follow-up",
    note_type: NoteType::General,
    body:      "Follow-up required:\n\n• When: \n• What: \n• Why: ",
  },
];

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::TimeDelta;
  use uuid::Uuid;

  use super::*;

  fn note_at(created_at: DateTime<Utc>, text: &str) -> Note {
    Note {
      note_id:       Uuid::new_v4(),
      submission_id: Uuid::new_v4(),
      note_type:     NoteType::General,
      note_text:     text.to_owned(),
      created_by:    "admin".to_owned(),
      created_at,
    }
  }

  fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
  }

  // ── relative_age ────────────────────────────────────────────────────────

  #[test]
  fn relative_age_buckets() {
    let now = at("2026-08-06T12:00:00Z");

    assert_eq!(relative_age(now - TimeDelta::seconds(30), now), "Just now");
    assert_eq!(relative_age(now - TimeDelta::minutes(5), now), "5m ago");
    assert_eq!(relative_age(now - TimeDelta::minutes(59), now), "59m ago");
    assert_eq!(relative_age(now - TimeDelta::hours(3), now), "3h ago");
    assert_eq!(relative_age(now - TimeDelta::days(2), now), "2d ago");
  }

  #[test]
  fn relative_age_falls_back_to_absolute_date() {
    let now = at("2026-08-06T12:00:00Z");
    let old = at("2026-07-01T09:30:00Z");
    assert_eq!(relative_age(old, now), "Jul 1, 09:30");
  }

  // ── day dividers ────────────────────────────────────────────────────────

  #[test]
  fn same_day_neighbours_get_no_divider() {
    let now = at("2026-08-06T18:00:00Z");
    let notes = vec![
      note_at(at("2026-08-06T15:00:00Z"), "afternoon"),
      note_at(at("2026-08-06T09:00:00Z"), "morning"),
      note_at(at("2026-08-05T17:00:00Z"), "day before"),
    ];

    let grouped = group_by_day(&notes, now);
    assert_eq!(grouped[0].divider.as_deref(), Some("Today"));
    assert_eq!(grouped[1].divider, None);
    assert_eq!(grouped[2].divider.as_deref(), Some("Yesterday"));
  }

  #[test]
  fn older_days_get_full_dividers_with_year_only_when_it_differs() {
    let now = at("2026-08-06T12:00:00Z");

    // 2026-08-01 was a Saturday.
    let same_year = day_divider(at("2026-08-01T10:00:00Z"), None, now).unwrap();
    assert_eq!(same_year, "Saturday, August 1");

    // 2025-12-31 was a Wednesday.
    let other_year = day_divider(at("2025-12-31T10:00:00Z"), None, now).unwrap();
    assert_eq!(other_year, "Wednesday, December 31, 2025");
  }

  #[test]
  fn first_note_always_gets_a_divider() {
    let now = at("2026-08-06T12:00:00Z");
    let notes = vec![note_at(at("2026-08-06T08:00:00Z"), "only one")];
    let grouped = group_by_day(&notes, now);
    assert_eq!(grouped.len(), 1);
    assert!(grouped[0].divider.is_some());
  }

  // ── text filter ─────────────────────────────────────────────────────────

  #[test]
  fn empty_query_matches_all_in_order() {
    let now = at("2026-08-06T12:00:00Z");
    let notes = vec![
      note_at(now - TimeDelta::hours(1), "call me back"),
      note_at(now - TimeDelta::hours(2), "sent the proposal"),
    ];

    let all = filter_by_text(&notes, "");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].note_text, "call me back");
  }

  #[test]
  fn filter_is_case_insensitive_substring() {
    let now = at("2026-08-06T12:00:00Z");
    let notes = vec![
      note_at(now, "call me back"),
      note_at(now, "sent the proposal"),
    ];

    let hits = filter_by_text(&notes, "CALL");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].note_text, "call me back");

    assert!(filter_by_text(&notes, "meeting").is_empty());
  }

  // ── templates ───────────────────────────────────────────────────────────

  #[test]
  fn templates_substitute_the_name_placeholder() {
    let call = &QUICK_TEMPLATES[0];
    let body = call.instantiate("Ada Lovelace");
    assert!(body.starts_with("Had a call with Ada Lovelace."));
    assert!(!body.contains("{{name}}"));
  }

  #[test]
  fn followup_template_saves_as_general() {
    let followup = QUICK_TEMPLATES
      .iter()
      .find(|t| t.label == "Follow-up")
      .unwrap();
    assert_eq!(followup.note_type, NoteType::General);
  }
}
