pub mod card;
pub mod deck;
pub mod review;

pub use card::{CardState, Flashcard};
pub use deck::Deck;
pub use review::{InvalidGrade, ReviewGrade, ReviewLog};
