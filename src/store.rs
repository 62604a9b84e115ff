//! Persistence boundary for the card collection.
//!
//! The engine never talks to storage directly: callers load cards,
//! run sessions, and hand every updated card back through this trait.
//! Implementations must round-trip all scheduling fields, including an
//! unset next_review.

use chrono::{DateTime, Utc};

use crate::db::{self, DbPool};
use crate::domain::{Flashcard, ReviewLog};

#[derive(Debug)]
pub enum StoreError {
  /// The database lock is poisoned
  Locked,
  Db(rusqlite::Error),
}

impl std::fmt::Display for StoreError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Locked => write!(f, "card store unavailable"),
      Self::Db(e) => write!(f, "card store error: {}", e),
    }
  }
}

impl std::error::Error for StoreError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Locked => None,
      Self::Db(e) => Some(e),
    }
  }
}

impl From<rusqlite::Error> for StoreError {
  fn from(e: rusqlite::Error) -> Self {
    Self::Db(e)
  }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Load/save pair over the card collection.
pub trait CardStore {
  /// All cards, ordered by id.
  fn load_cards(&self) -> StoreResult<Vec<Flashcard>>;

  /// Persist a brand-new card and return its assigned id.
  fn add_card(&self, card: &Flashcard) -> StoreResult<i64>;

  /// Merge an updated card back by id.
  fn save_card(&self, card: &Flashcard) -> StoreResult<()>;

  /// Delete a card. Returns false if the id is unknown.
  fn remove_card(&self, id: i64) -> StoreResult<bool>;

  /// Append one graded review to the history.
  fn log_review(&self, log: &ReviewLog) -> StoreResult<i64>;

  /// Number of cards due at `now` (the badge value).
  fn due_count(&self, now: DateTime<Utc>) -> StoreResult<i64>;
}

/// SQLite-backed store over the shared connection.
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  fn conn(&self) -> StoreResult<std::sync::MutexGuard<'_, rusqlite::Connection>> {
    db::try_lock(&self.pool).map_err(|_| StoreError::Locked)
  }
}

impl CardStore for SqliteStore {
  fn load_cards(&self) -> StoreResult<Vec<Flashcard>> {
    Ok(db::get_all_cards(&*self.conn()?)?)
  }

  fn add_card(&self, card: &Flashcard) -> StoreResult<i64> {
    Ok(db::insert_card(&*self.conn()?, card)?)
  }

  fn save_card(&self, card: &Flashcard) -> StoreResult<()> {
    Ok(db::update_card_after_review(&*self.conn()?, card)?)
  }

  fn remove_card(&self, id: i64) -> StoreResult<bool> {
    Ok(db::delete_card(&*self.conn()?, id)?)
  }

  fn log_review(&self, log: &ReviewLog) -> StoreResult<i64> {
    Ok(db::insert_review_log(&*self.conn()?, log)?)
  }

  fn due_count(&self, now: DateTime<Utc>) -> StoreResult<i64> {
    Ok(db::get_due_count(&*self.conn()?, now)?)
  }
}
