//! Application configuration.
//!
//! The database location is the only configurable value; everything
//! the scheduler needs is fixed by the algorithm itself.

use serde::Deserialize;
use std::path::PathBuf;

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
  database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
  path: Option<String>,
}

/// Load the database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
  // Load .env file if present
  let _ = dotenvy::dotenv();

  if let Some(path) = config_file_database_path() {
    tracing::info!("Using database from config.toml: {}", path.display());
    return path;
  }

  if let Ok(path) = std::env::var("DATABASE_PATH") {
    tracing::info!("Using database from DATABASE_PATH env: {}", path);
    return PathBuf::from(path);
  }

  let default = PathBuf::from("data/notebook.db");
  tracing::info!("Using default database path: {}", default.display());
  default
}

fn config_file_database_path() -> Option<PathBuf> {
  let contents = std::fs::read_to_string("config.toml").ok()?;
  let config: AppConfig = toml::from_str(&contents).ok()?;
  Some(PathBuf::from(config.database?.path?))
}
