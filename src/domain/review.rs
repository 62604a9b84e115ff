use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grade for a revealed card.
///
/// The gaps in the numbering are intentional: 0 is the single failing
/// grade, 3-5 are the three passing levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewGrade {
  Again = 0,
  Hard = 3,
  Good = 4,
  Easy = 5,
}

impl ReviewGrade {
  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      0 => Some(Self::Again),
      3 => Some(Self::Hard),
      4 => Some(Self::Good),
      5 => Some(Self::Easy),
      _ => None,
    }
  }

  pub fn is_pass(&self) -> bool {
    matches!(self, Self::Hard | Self::Good | Self::Easy)
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Again => "Again",
      Self::Hard => "Hard",
      Self::Good => "Good",
      Self::Easy => "Easy",
    }
  }
}

/// Grade value outside {0, 3, 4, 5}, rejected before it reaches the
/// scheduling formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidGrade(pub u8);

impl std::fmt::Display for InvalidGrade {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "invalid review grade {} (expected 0, 3, 4 or 5)", self.0)
  }
}

impl std::error::Error for InvalidGrade {}

impl TryFrom<u8> for ReviewGrade {
  type Error = InvalidGrade;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Self::from_u8(value).ok_or(InvalidGrade(value))
  }
}

/// One graded review, kept for history and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLog {
  pub id: i64,
  pub card_id: i64,
  pub grade: u8,
  pub reviewed_at: DateTime<Utc>,
}

impl ReviewLog {
  pub fn new(card_id: i64, grade: ReviewGrade, reviewed_at: DateTime<Utc>) -> Self {
    Self {
      id: 0,
      card_id,
      grade: grade as u8,
      reviewed_at,
    }
  }
}
