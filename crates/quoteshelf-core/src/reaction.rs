//! Reactions and the create/flip/delete toggle.
//!
//! A user holds at most one reaction per quote. Toggling with the kind they
//! already hold removes it; toggling with any other kind overwrites it.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// The fixed set of reaction kinds. Serialised as their upper-case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionKind {
  Like,
  Love,
  Think,
  Inspire,
}

impl ReactionKind {
  pub const ALL: [ReactionKind; 4] =
    [Self::Like, Self::Love, Self::Think, Self::Inspire];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Like => "LIKE",
      Self::Love => "LOVE",
      Self::Think => "THINK",
      Self::Inspire => "INSPIRE",
    }
  }

  pub fn emoji(self) -> &'static str {
    match self {
      Self::Like => "👍",
      Self::Love => "❤️",
      Self::Think => "🤔",
      Self::Inspire => "✨",
    }
  }
}

impl fmt::Display for ReactionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ReactionKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|k| k.as_str() == s)
      .ok_or_else(|| Error::UnknownReactionKind(s.to_owned()))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
  pub reaction_id: Uuid,
  pub user_id:     Uuid,
  pub quote_id:    Uuid,
  #[serde(rename = "type")]
  pub kind:        ReactionKind,
  pub created_at:  DateTime<Utc>,
}

/// What a toggle did to the (user, quote) reaction slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
  Created,
  Updated,
  Removed,
}

/// Decide the effect of toggling `requested` given the kind currently held.
pub fn plan_toggle(
  existing: Option<ReactionKind>,
  requested: ReactionKind,
) -> ToggleOutcome {
  match existing {
    None => ToggleOutcome::Created,
    Some(k) if k == requested => ToggleOutcome::Removed,
    Some(_) => ToggleOutcome::Updated,
  }
}

/// Result of [`LibraryStore::toggle_reaction`](crate::store::LibraryStore::toggle_reaction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggledReaction {
  pub status:   ToggleOutcome,
  /// The reaction now held; `None` after a removal.
  pub reaction: Option<Reaction>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_accepts_only_known_kinds() {
    assert_eq!("LOVE".parse::<ReactionKind>().unwrap(), ReactionKind::Love);
    assert!(matches!(
      "love".parse::<ReactionKind>(),
      Err(Error::UnknownReactionKind(_))
    ));
    assert!("ANGRY".parse::<ReactionKind>().is_err());
  }

  #[test]
  fn display_round_trips_through_parse() {
    for kind in ReactionKind::ALL {
      assert_eq!(kind.to_string().parse::<ReactionKind>().unwrap(), kind);
    }
  }

  #[test]
  fn toggle_plan_covers_all_three_transitions() {
    use ReactionKind::*;
    assert_eq!(plan_toggle(None, Like), ToggleOutcome::Created);
    assert_eq!(plan_toggle(Some(Like), Like), ToggleOutcome::Removed);
    assert_eq!(plan_toggle(Some(Like), Think), ToggleOutcome::Updated);
    assert_eq!(plan_toggle(Some(Think), Inspire), ToggleOutcome::Updated);
  }
}
