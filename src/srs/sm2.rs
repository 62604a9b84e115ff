use chrono::{DateTime, Duration, Utc};

use crate::domain::{CardState, Flashcard, ReviewGrade};

const MIN_EASE_FACTOR: f64 = 1.3;
const HARD_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.15;

/// Apply a graded review to a card, returning the rescheduled card.
///
/// Pure: `now` is injected by the caller and the input card is left
/// untouched. The caller merges the result back into its collection.
pub fn schedule(card: &Flashcard, grade: ReviewGrade, now: DateTime<Utc>) -> Flashcard {
  let mut ease_factor = card.ease_factor;

  let (interval_days, repetitions, state) = if !grade.is_pass() {
    // Failed: reset progress, due again immediately. Ease factor
    // is not touched on failure.
    (0, 0, CardState::Relearning)
  } else {
    // The interval ladder uses the ease factor from before this review.
    let interval = match card.repetitions {
      0 => 1,
      1 => 6,
      _ => ((card.interval_days as f64) * ease_factor).round() as i64,
    };

    match grade {
      ReviewGrade::Hard => ease_factor = (ease_factor - HARD_EASE_PENALTY).max(MIN_EASE_FACTOR),
      ReviewGrade::Easy => ease_factor += EASY_EASE_BONUS,
      _ => {}
    }

    (interval, card.repetitions + 1, CardState::Review)
  };

  Flashcard {
    id: card.id,
    front: card.front.clone(),
    back: card.back.clone(),
    ease_factor,
    interval_days,
    repetitions,
    next_review: Some(now + Duration::days(interval_days)),
    state,
  }
}

/// Projected interval in days if the card were graded now; 0 means
/// "again immediately". Mirrors the pass branch of `schedule` and is
/// used for the labels on the grade buttons.
pub fn preview_interval(card: &Flashcard, grade: ReviewGrade) -> i64 {
  if !grade.is_pass() {
    return 0;
  }
  match card.repetitions {
    0 => 1,
    1 => 6,
    _ => ((card.interval_days as f64) * card.ease_factor).round() as i64,
  }
}
