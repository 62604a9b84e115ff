//! In-memory card collection.
//!
//! The deck is an arena keyed by card id. Grading produces an updated
//! card value that is merged back by id, so the deck is the single
//! mutation point for the authoritative collection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::Flashcard;

#[derive(Debug, Clone, Default)]
pub struct Deck {
  cards: HashMap<i64, Flashcard>,
  next_id: i64,
}

impl Deck {
  pub fn new() -> Self {
    Self::default()
  }

  /// Rebuild a deck from loaded cards, continuing id assignment past
  /// the highest existing id.
  pub fn from_cards(cards: Vec<Flashcard>) -> Self {
    let next_id = cards.iter().map(|c| c.id).max().unwrap_or(0);
    Self {
      cards: cards.into_iter().map(|c| (c.id, c)).collect(),
      next_id,
    }
  }

  /// Create a card with scheduling defaults and a fresh id.
  /// Ids are never reused, including after removal.
  pub fn add(&mut self, front: String, back: String, now: DateTime<Utc>) -> i64 {
    self.next_id += 1;
    let card = Flashcard::new(self.next_id, front, back, now);
    self.cards.insert(card.id, card);
    self.next_id
  }

  /// Insert a card whose id was assigned elsewhere (e.g. by the store).
  pub fn insert(&mut self, card: Flashcard) {
    self.next_id = self.next_id.max(card.id);
    self.cards.insert(card.id, card);
  }

  pub fn remove(&mut self, id: i64) -> Option<Flashcard> {
    self.cards.remove(&id)
  }

  pub fn get(&self, id: i64) -> Option<&Flashcard> {
    self.cards.get(&id)
  }

  /// Replace the stored card with the same id. Returns false when the
  /// id is unknown (e.g. the card was deleted mid-session).
  pub fn merge(&mut self, card: Flashcard) -> bool {
    if self.cards.contains_key(&card.id) {
      self.cards.insert(card.id, card);
      true
    } else {
      false
    }
  }

  pub fn len(&self) -> usize {
    self.cards.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cards.is_empty()
  }

  /// Snapshot of all cards, ordered by id.
  pub fn to_vec(&self) -> Vec<Flashcard> {
    let mut cards: Vec<_> = self.cards.values().cloned().collect();
    cards.sort_by_key(|c| c.id);
    cards
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&self.to_vec())
  }

  pub fn from_json(json: &str) -> serde_json::Result<Self> {
    let cards: Vec<Flashcard> = serde_json::from_str(json)?;
    Ok(Self::from_cards(cards))
  }
}
