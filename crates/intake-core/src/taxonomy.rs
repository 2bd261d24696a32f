//! Tag taxonomy — fixed classification of submission tags.
//!
//! Three immutable lists, initialised once at compile time. Classification is
//! total over all strings: anything outside the lists counts as a status
//! qualifier, which keeps ad-hoc tags displayable without special cases.

use serde::{Deserialize, Serialize};

// ─── Fixed tag lists ─────────────────────────────────────────────────────────

/// Actions taken on a lead.
pub const ACTIVITY_TAGS: [&str; 5] = [
  "Email Sent",
  "Call Made",
  "Meeting Held",
  "Proposal Sent",
  "Follow-up Scheduled",
];

/// What the client is asking for.
pub const SERVICE_TAGS: [&str; 5] = [
  "AI Strategy",
  "Team Training",
  "Implementation",
  "Ongoing Mentorship",
  "Resource Access",
];

/// Lead qualification.
pub const STATUS_TAGS: [&str; 5] = [
  "Hot Lead",
  "Budget Approved",
  "Decision Maker",
  "Follow-up Required",
  "Waiting on Client",
];

/// Every known tag, in category order.
pub fn all_tags() -> impl Iterator<Item = &'static str> {
  ACTIVITY_TAGS
    .into_iter()
    .chain(SERVICE_TAGS)
    .chain(STATUS_TAGS)
}

// ─── Classification ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
  Activity,
  Service,
  Status,
}

/// Classify a tag string. Total: unknown tags fall back to [`TagCategory::Status`].
pub fn category_of(tag: &str) -> TagCategory {
  if ACTIVITY_TAGS.contains(&tag) {
    TagCategory::Activity
  } else if SERVICE_TAGS.contains(&tag) {
    TagCategory::Service
  } else {
    TagCategory::Status
  }
}

/// Display treatment for a tag — a pure function of its category.
pub fn color_class_of(tag: &str) -> &'static str {
  match category_of(tag) {
    TagCategory::Activity => "bg-blue-100 text-blue-800 border-blue-200",
    TagCategory::Service => "bg-green-100 text-green-800 border-green-200",
    TagCategory::Status => "bg-orange-100 text-orange-800 border-orange-200",
  }
}

/// Neutral treatment for UI elements with no tag at all (the "+N more"
/// overflow badge and similar).
pub const NEUTRAL_COLOR_CLASS: &str = "bg-gray-100 text-gray-800 border-gray-200";

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_tags_classify_into_their_lists() {
    assert_eq!(category_of("Email Sent"), TagCategory::Activity);
    assert_eq!(category_of("AI Strategy"), TagCategory::Service);
    assert_eq!(category_of("Hot Lead"), TagCategory::Status);
  }

  #[test]
  fn unknown_tags_default_to_status() {
    assert_eq!(category_of(""), TagCategory::Status);
    assert_eq!(category_of("Unheard Of"), TagCategory::Status);
    // Case matters: the lists are exact strings.
    assert_eq!(category_of("email sent"), TagCategory::Status);
  }

  #[test]
  fn color_follows_category_for_every_known_tag() {
    for tag in all_tags() {
      let class = color_class_of(tag);
      match category_of(tag) {
        TagCategory::Activity => assert!(class.contains("blue")),
        TagCategory::Service => assert!(class.contains("green")),
        TagCategory::Status => assert!(class.contains("orange")),
      }
    }
  }

  #[test]
  fn lists_are_disjoint() {
    let mut seen = std::collections::HashSet::new();
    for tag in all_tags() {
      assert!(seen.insert(tag), "duplicate tag across lists: {tag}");
    }
  }
}
