//! Review history logging

use rusqlite::{Connection, Result, params};

use crate::domain::ReviewLog;

pub fn insert_review_log(conn: &Connection, log: &ReviewLog) -> Result<i64> {
  conn.execute(
    "INSERT INTO review_logs (card_id, grade, reviewed_at) VALUES (?1, ?2, ?3)",
    params![log.card_id, log.grade, log.reviewed_at.to_rfc3339()],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_review_count(conn: &Connection, card_id: i64) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM review_logs WHERE card_id = ?1",
    params![card_id],
    |row| row.get(0),
  )
}

/// Total reviews and passing reviews across the whole deck
pub fn get_review_totals(conn: &Connection) -> Result<(i64, i64)> {
  conn.query_row(
    "SELECT COUNT(*), COALESCE(SUM(CASE WHEN grade >= 3 THEN 1 ELSE 0 END), 0) FROM review_logs",
    [],
    |row| Ok((row.get(0)?, row.get(1)?)),
  )
}
