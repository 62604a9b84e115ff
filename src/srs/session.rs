//! Study session state machine.
//!
//! Owns the transient queue/position/reveal state for one sitting and
//! hands every graded card back to the caller for merging. It never
//! writes to the authoritative collection itself.

use chrono::{DateTime, Utc};

use crate::domain::{Flashcard, ReviewGrade};
use crate::srs::queue::StudyQueue;
use crate::srs::sm2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
  Idle,
  Active,
  Finished,
}

/// Usage errors for session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
  /// `start` was called with an empty queue.
  EmptyQueue,
  /// `reveal` or `grade` was called while no session is active.
  NotActive,
  /// `grade` was called before the current card was revealed.
  NotRevealed,
}

impl std::fmt::Display for SessionError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::EmptyQueue => write!(f, "cannot start a session with an empty queue"),
      Self::NotActive => write!(f, "no active study session"),
      Self::NotRevealed => write!(f, "card must be revealed before grading"),
    }
  }
}

impl std::error::Error for SessionError {}

#[derive(Debug, Clone)]
pub struct StudySession {
  state: SessionState,
  queue: Option<StudyQueue>,
  position: usize,
  revealed: bool,
}

impl StudySession {
  pub fn new() -> Self {
    Self {
      state: SessionState::Idle,
      queue: None,
      position: 0,
      revealed: false,
    }
  }

  /// Begin a session over `queue`, showing the first card unrevealed.
  /// Starting over from any state is allowed and discards the previous
  /// queue without grading its remaining cards.
  pub fn start(&mut self, queue: StudyQueue) -> Result<(), SessionError> {
    if queue.is_empty() {
      return Err(SessionError::EmptyQueue);
    }
    self.state = SessionState::Active;
    self.queue = Some(queue);
    self.position = 0;
    self.revealed = false;
    Ok(())
  }

  pub fn state(&self) -> SessionState {
    self.state
  }

  pub fn is_revealed(&self) -> bool {
    self.revealed
  }

  /// Zero-based position of the current card.
  pub fn position(&self) -> usize {
    self.position
  }

  /// Cards in the loaded queue (0 when idle).
  pub fn len(&self) -> usize {
    self.queue.as_ref().map_or(0, |q| q.len())
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// The card currently being shown, if a session is active.
  pub fn current(&self) -> Option<&Flashcard> {
    if self.state != SessionState::Active {
      return None;
    }
    self.queue.as_ref().and_then(|q| q.get(self.position))
  }

  /// Show the back of the current card. Idempotent.
  pub fn reveal(&mut self) -> Result<(), SessionError> {
    if self.state != SessionState::Active {
      return Err(SessionError::NotActive);
    }
    self.revealed = true;
    Ok(())
  }

  /// Grade the revealed card and advance to the next one.
  ///
  /// Returns the rescheduled card for the caller to merge back into
  /// the collection; the session keeps only its queue snapshot.
  pub fn grade(
    &mut self,
    grade: ReviewGrade,
    now: DateTime<Utc>,
  ) -> Result<Flashcard, SessionError> {
    if self.state != SessionState::Active {
      return Err(SessionError::NotActive);
    }
    if !self.revealed {
      return Err(SessionError::NotRevealed);
    }

    let card = self
      .queue
      .as_ref()
      .and_then(|q| q.get(self.position))
      .ok_or(SessionError::NotActive)?;
    let updated = sm2::schedule(card, grade, now);

    self.revealed = false;
    if self.position + 1 < self.len() {
      self.position += 1;
    } else {
      self.state = SessionState::Finished;
    }
    Ok(updated)
  }

  /// Abandon the session. Remaining cards keep their prior schedule
  /// and will come back in a future due set.
  pub fn cancel(&mut self) {
    if self.state == SessionState::Active {
      self.state = SessionState::Finished;
    }
  }
}

impl Default for StudySession {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  use crate::domain::Flashcard;
  use crate::srs::queue::{QueueMode, build_queue};

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
  }

  fn queue_of(count: usize) -> StudyQueue {
    let cards: Vec<Flashcard> = (1..=count as i64)
      .map(|id| Flashcard::new(id, format!("front {}", id), format!("back {}", id), now()))
      .collect();
    build_queue(&cards, QueueMode::All, now())
  }

  #[test]
  fn test_new_session_is_idle() {
    let session = StudySession::new();
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.current().is_none());
    assert_eq!(session.len(), 0);
  }

  #[test]
  fn test_start_empty_queue_rejected() {
    let mut session = StudySession::new();
    let empty = build_queue(&[], QueueMode::Due, now());

    assert_eq!(session.start(empty), Err(SessionError::EmptyQueue));
    assert_eq!(session.state(), SessionState::Idle);
  }

  #[test]
  fn test_start_enters_active() {
    let mut session = StudySession::new();
    session.start(queue_of(3)).unwrap();

    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.position(), 0);
    assert_eq!(session.len(), 3);
    assert!(!session.is_revealed());
    assert_eq!(session.current().unwrap().id, 1);
  }

  #[test]
  fn test_reveal_is_idempotent() {
    let mut session = StudySession::new();
    session.start(queue_of(1)).unwrap();

    session.reveal().unwrap();
    assert!(session.is_revealed());
    session.reveal().unwrap();
    assert!(session.is_revealed());
    assert_eq!(session.position(), 0);
  }

  #[test]
  fn test_grade_before_reveal_rejected() {
    let mut session = StudySession::new();
    session.start(queue_of(2)).unwrap();

    assert_eq!(
      session.grade(ReviewGrade::Good, now()),
      Err(SessionError::NotRevealed)
    );
    // Session still usable afterwards
    session.reveal().unwrap();
    assert!(session.grade(ReviewGrade::Good, now()).is_ok());
  }

  #[test]
  fn test_reveal_outside_active_rejected() {
    let mut session = StudySession::new();
    assert_eq!(session.reveal(), Err(SessionError::NotActive));

    session.start(queue_of(1)).unwrap();
    session.reveal().unwrap();
    session.grade(ReviewGrade::Good, now()).unwrap();
    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(session.reveal(), Err(SessionError::NotActive));
  }

  #[test]
  fn test_grade_outside_active_rejected() {
    let mut session = StudySession::new();
    assert_eq!(
      session.grade(ReviewGrade::Good, now()),
      Err(SessionError::NotActive)
    );
  }

  #[test]
  fn test_grade_advances_and_clears_reveal() {
    let mut session = StudySession::new();
    session.start(queue_of(3)).unwrap();

    session.reveal().unwrap();
    let updated = session.grade(ReviewGrade::Good, now()).unwrap();

    assert_eq!(updated.id, 1);
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.position(), 1);
    assert!(!session.is_revealed());
    assert_eq!(session.current().unwrap().id, 2);
  }

  #[test]
  fn test_grade_returns_rescheduled_card() {
    let mut session = StudySession::new();
    session.start(queue_of(1)).unwrap();
    session.reveal().unwrap();

    let updated = session.grade(ReviewGrade::Good, now()).unwrap();

    assert_eq!(updated.interval_days, 1);
    assert_eq!(updated.repetitions, 1);
    assert_eq!(updated.next_review, Some(now() + Duration::days(1)));
  }

  #[test]
  fn test_last_card_finishes_session() {
    let mut session = StudySession::new();
    session.start(queue_of(2)).unwrap();

    for _ in 0..2 {
      session.reveal().unwrap();
      session.grade(ReviewGrade::Good, now()).unwrap();
    }

    assert_eq!(session.state(), SessionState::Finished);
    assert!(session.current().is_none());
  }

  #[test]
  fn test_cancel_discards_remaining_cards() {
    let mut session = StudySession::new();
    session.start(queue_of(3)).unwrap();

    session.reveal().unwrap();
    session.grade(ReviewGrade::Good, now()).unwrap();
    session.cancel();

    assert_eq!(session.state(), SessionState::Finished);
    assert!(session.current().is_none());
  }

  #[test]
  fn test_cancel_outside_active_is_noop() {
    let mut session = StudySession::new();
    session.cancel();
    assert_eq!(session.state(), SessionState::Idle);
  }

  #[test]
  fn test_restart_after_finished() {
    let mut session = StudySession::new();
    session.start(queue_of(1)).unwrap();
    session.reveal().unwrap();
    session.grade(ReviewGrade::Good, now()).unwrap();
    assert_eq!(session.state(), SessionState::Finished);

    session.start(queue_of(2)).unwrap();
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.position(), 0);
    assert_eq!(session.len(), 2);
  }

  #[test]
  fn test_full_walkthrough_emits_every_card() {
    let mut session = StudySession::new();
    session.start(queue_of(4)).unwrap();

    let mut graded = Vec::new();
    while session.state() == SessionState::Active {
      session.reveal().unwrap();
      graded.push(session.grade(ReviewGrade::Good, now()).unwrap().id);
    }

    assert_eq!(graded, vec![1, 2, 3, 4]);
    assert_eq!(session.state(), SessionState::Finished);
  }
}
