//! Card CRUD and due queries

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result, params};

use crate::domain::{CardState, Flashcard};

pub fn insert_card(conn: &Connection, card: &Flashcard) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO cards (front, back, ease_factor, interval_days, repetitions, next_review, state)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
    params![
      card.front,
      card.back,
      card.ease_factor,
      card.interval_days,
      card.repetitions,
      card.next_review.map(|t| t.to_rfc3339()),
      card.state.as_str(),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_card_by_id(conn: &Connection, id: i64) -> Result<Option<Flashcard>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, front, back, ease_factor, interval_days, repetitions, next_review, state
    FROM cards WHERE id = ?1
    "#,
  )?;

  let mut rows = stmt.query(params![id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_card(row)?))
  } else {
    Ok(None)
  }
}

pub fn get_all_cards(conn: &Connection) -> Result<Vec<Flashcard>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, front, back, ease_factor, interval_days, repetitions, next_review, state
    FROM cards
    ORDER BY id ASC
    "#,
  )?;

  let cards = stmt
    .query_map([], |row| row_to_card(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(cards)
}

pub fn get_due_cards(conn: &Connection, now: DateTime<Utc>) -> Result<Vec<Flashcard>> {
  // NULLs sort first under ASC, which matches "never scheduled comes first"
  let mut stmt = conn.prepare(
    r#"
    SELECT id, front, back, ease_factor, interval_days, repetitions, next_review, state
    FROM cards
    WHERE next_review IS NULL OR next_review <= ?1
    ORDER BY next_review ASC, id ASC
    "#,
  )?;

  let cards = stmt
    .query_map(params![now.to_rfc3339()], |row| row_to_card(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(cards)
}

pub fn get_due_count(conn: &Connection, now: DateTime<Utc>) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM cards WHERE next_review IS NULL OR next_review <= ?1",
    params![now.to_rfc3339()],
    |row| row.get(0),
  )
}

pub fn update_card_after_review(conn: &Connection, card: &Flashcard) -> Result<()> {
  conn.execute(
    r#"
    UPDATE cards
    SET ease_factor = ?1, interval_days = ?2, repetitions = ?3, next_review = ?4, state = ?5
    WHERE id = ?6
    "#,
    params![
      card.ease_factor,
      card.interval_days,
      card.repetitions,
      card.next_review.map(|t| t.to_rfc3339()),
      card.state.as_str(),
      card.id,
    ],
  )?;
  Ok(())
}

pub fn delete_card(conn: &Connection, id: i64) -> Result<bool> {
  let deleted = conn.execute("DELETE FROM cards WHERE id = ?1", params![id])?;
  Ok(deleted > 0)
}

/// Convert a database row to a Flashcard
pub(crate) fn row_to_card(row: &rusqlite::Row) -> Result<Flashcard> {
  let next_review_str: Option<String> = row.get(6)?;
  let state_str: String = row.get(7)?;

  Ok(Flashcard {
    id: row.get(0)?,
    front: row.get(1)?,
    back: row.get(2)?,
    ease_factor: row.get(3)?,
    interval_days: row.get(4)?,
    repetitions: row.get(5)?,
    next_review: next_review_str.and_then(|s| {
      DateTime::parse_from_rfc3339(&s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
    }),
    state: CardState::from_str(&state_str),
  })
}
