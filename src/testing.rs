//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so test code never
//! duplicates DDL.

use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

/// Test database in a temporary directory with all migrations applied.
pub struct TestEnv {
  /// Temporary directory (kept alive for database file persistence)
  pub temp: TempDir,
  pub conn: Connection,
}

impl TestEnv {
  pub fn new() -> rusqlite::Result<Self> {
    let temp =
      TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    let conn = Connection::open(temp.path().join("cards.db"))?;
    crate::db::schema::run_migrations(&conn)?;

    Ok(Self { temp, conn })
  }

  /// Get the temporary directory path for creating test files.
  pub fn path(&self) -> &Path {
    self.temp.path()
  }
}
