use chrono::{DateTime, Utc};

use crate::domain::Flashcard;

/// Which pool a study queue is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueMode {
  /// Only cards whose review time has arrived (or that have none yet).
  Due,
  /// Every card in the deck, regardless of due status.
  All,
}

impl QueueMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Due => "due",
      Self::All => "all",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "due" => Some(Self::Due),
      "all" => Some(Self::All),
      _ => None,
    }
  }
}

/// Ordered snapshot of cards for one study session.
///
/// Cards are cloned out of the source collection, so deck writes made
/// mid-session do not show up here. The mode tag is kept so an empty
/// queue can be reported as "nothing due" vs "empty deck".
#[derive(Debug, Clone)]
pub struct StudyQueue {
  mode: QueueMode,
  cards: Vec<Flashcard>,
}

impl StudyQueue {
  pub fn mode(&self) -> QueueMode {
    self.mode
  }

  pub fn len(&self) -> usize {
    self.cards.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cards.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Flashcard> {
    self.cards.get(index)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Flashcard> {
    self.cards.iter()
  }
}

/// Number of cards due at `now`. Always equals the length of
/// `build_queue(cards, QueueMode::Due, now)`.
pub fn due_count(cards: &[Flashcard], now: DateTime<Utc>) -> usize {
  cards.iter().filter(|c| c.is_due(now)).count()
}

/// Build the ordered queue for one session.
///
/// Sorted ascending by next review time; cards that were never
/// scheduled sort first, so the most overdue cards come up first.
pub fn build_queue(cards: &[Flashcard], mode: QueueMode, now: DateTime<Utc>) -> StudyQueue {
  let mut queue: Vec<Flashcard> = match mode {
    QueueMode::Due => cards.iter().filter(|c| c.is_due(now)).cloned().collect(),
    QueueMode::All => cards.to_vec(),
  };
  queue.sort_by_key(|c| c.next_review);
  StudyQueue { mode, cards: queue }
}
