use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle tag for a flashcard.
///
/// Descriptive only: the scheduling formula never reads it, but stamps
/// Review/Relearning after each graded review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
  New,
  Learning,
  Review,
  Relearning,
}

impl CardState {
  pub fn from_str(s: &str) -> Self {
    match s {
      "Learning" => Self::Learning,
      "Review" => Self::Review,
      "Relearning" => Self::Relearning,
      _ => Self::New,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::New => "New",
      Self::Learning => "Learning",
      Self::Review => "Review",
      Self::Relearning => "Relearning",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
  pub id: i64,
  pub front: String,
  pub back: String,

  // SM-2 scheduling fields, written only by the scheduler
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
  /// When the card becomes due again. None means never scheduled,
  /// which counts as due immediately.
  pub next_review: Option<DateTime<Utc>>,
  pub state: CardState,
}

impl Flashcard {
  pub fn new(id: i64, front: String, back: String, now: DateTime<Utc>) -> Self {
    Self {
      id,
      front,
      back,
      ease_factor: 2.5,
      interval_days: 0,
      repetitions: 0,
      next_review: Some(now),
      state: CardState::New,
    }
  }

  /// Due when the card has no schedule yet or its review time has arrived.
  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_review.is_none_or(|t| t <= now)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
  }

  // CardState tests

  #[test]
  fn test_card_state_from_str() {
    assert_eq!(CardState::from_str("Learning"), CardState::Learning);
    assert_eq!(CardState::from_str("Review"), CardState::Review);
    assert_eq!(CardState::from_str("Relearning"), CardState::Relearning);
  }

  #[test]
  fn test_card_state_from_str_default() {
    // Unknown strings default to New
    assert_eq!(CardState::from_str("New"), CardState::New);
    assert_eq!(CardState::from_str("unknown"), CardState::New);
    assert_eq!(CardState::from_str(""), CardState::New);
    assert_eq!(CardState::from_str("review"), CardState::New); // case sensitive
  }

  #[test]
  fn test_card_state_as_str_roundtrip() {
    let states = vec![
      CardState::New,
      CardState::Learning,
      CardState::Review,
      CardState::Relearning,
    ];

    for state in states {
      let s = state.as_str();
      assert_eq!(CardState::from_str(s), state);
    }
  }

  // Flashcard constructor tests

  #[test]
  fn test_flashcard_new_defaults() {
    let card = Flashcard::new(1, "mitochondria".to_string(), "powerhouse of the cell".to_string(), now());

    assert_eq!(card.id, 1);
    assert_eq!(card.front, "mitochondria");
    assert_eq!(card.back, "powerhouse of the cell");
    assert!((card.ease_factor - 2.5).abs() < f64::EPSILON);
    assert_eq!(card.interval_days, 0);
    assert_eq!(card.repetitions, 0);
    assert_eq!(card.next_review, Some(now()));
    assert_eq!(card.state, CardState::New);
  }

  #[test]
  fn test_new_card_is_due() {
    let card = Flashcard::new(1, "q".to_string(), "a".to_string(), now());
    assert!(card.is_due(now()));
  }

  #[test]
  fn test_is_due_without_schedule() {
    let mut card = Flashcard::new(1, "q".to_string(), "a".to_string(), now());
    card.next_review = None;
    assert!(card.is_due(now()));
  }

  #[test]
  fn test_is_due_boundaries() {
    let mut card = Flashcard::new(1, "q".to_string(), "a".to_string(), now());
    card.next_review = Some(now() + Duration::days(1));

    assert!(!card.is_due(now()));
    // Exactly at the review time counts as due
    assert!(card.is_due(now() + Duration::days(1)));
    assert!(card.is_due(now() + Duration::days(2)));
  }

  #[test]
  fn test_flashcard_serde_roundtrip() {
    let card = Flashcard::new(7, "front".to_string(), "back".to_string(), now());
    let json = serde_json::to_string(&card).unwrap();
    let parsed: Flashcard = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.id, card.id);
    assert_eq!(parsed.front, card.front);
    assert_eq!(parsed.next_review, card.next_review);
    assert_eq!(parsed.state, card.state);
  }
}
