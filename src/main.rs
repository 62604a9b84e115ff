use std::io::{self, Write};

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use study_notebook::config;
use study_notebook::db::{self, DbPool, LogOnError};
use study_notebook::domain::{Deck, Flashcard, ReviewGrade, ReviewLog};
use study_notebook::srs::{self, QueueMode, SessionState, StudySession};
use study_notebook::store::{CardStore, SqliteStore};

fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "study_notebook=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_path = config::load_database_path();
  let pool = db::init_db(&db_path).expect("Failed to initialize database");
  let store = SqliteStore::new(pool.clone());

  let cards = store.load_cards().expect("Failed to load cards");
  let mut deck = Deck::from_cards(cards);
  tracing::info!("Loaded {} cards", deck.len());

  println!("study notebook - type 'help' for commands");
  print_status(&deck);

  let mut line = String::new();
  loop {
    print!("> ");
    let _ = io::stdout().flush();

    line.clear();
    if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
      break;
    }

    let input = line.trim();
    let (command, rest) = match input.split_once(' ') {
      Some((cmd, rest)) => (cmd, rest.trim()),
      None => (input, ""),
    };

    match command {
      "" => {}
      "help" => print_help(),
      "status" => print_status(&deck),
      "add" => add_card(&mut deck, &store, rest),
      "list" => list_cards(&deck),
      "remove" => remove_card(&mut deck, &store, rest),
      "study" => {
        let mode = if rest == "all" { QueueMode::All } else { QueueMode::Due };
        run_study_session(&mut deck, &store, mode);
      }
      "export" => export_deck(&deck, rest),
      "backup" => backup(&pool, rest),
      "quit" | "exit" => break,
      _ => println!("Unknown command '{}'. Type 'help' for commands.", command),
    }
  }
}

fn print_help() {
  println!("Commands:");
  println!("  status               due and total card counts");
  println!("  add <front> | <back> create a card");
  println!("  list                 list all cards");
  println!("  remove <id>          delete a card");
  println!("  study                review cards that are due");
  println!("  study all            review the whole deck");
  println!("  export <path>        write the deck as JSON");
  println!("  backup <path>        back up the database file");
  println!("  quit                 exit");
}

fn print_status(deck: &Deck) {
  let due = srs::due_count(&deck.to_vec(), Utc::now());
  println!("{} due / {} total", due, deck.len());
}

fn add_card(deck: &mut Deck, store: &SqliteStore, rest: &str) {
  let Some((front, back)) = rest.split_once('|') else {
    println!("Usage: add <front> | <back>");
    return;
  };
  let (front, back) = (front.trim(), back.trim());
  if front.is_empty() || back.is_empty() {
    println!("Both front and back are required.");
    return;
  }

  let mut card = Flashcard::new(0, front.to_string(), back.to_string(), Utc::now());
  match store.add_card(&card) {
    Ok(id) => {
      card.id = id;
      deck.insert(card);
      println!("Added card {}.", id);
    }
    Err(e) => println!("Could not add card: {}", e),
  }
}

fn list_cards(deck: &Deck) {
  if deck.is_empty() {
    println!("No cards yet.");
    return;
  }

  let now = Utc::now();
  for card in deck.to_vec() {
    let due_label = match card.next_review {
      _ if card.is_due(now) => "now".to_string(),
      Some(at) => at.format("%Y-%m-%d").to_string(),
      None => "now".to_string(),
    };
    println!(
      "  #{:<4} {:<30} reps {:<3} {} due {}",
      card.id,
      card.front,
      card.repetitions,
      card.state.as_str(),
      due_label
    );
  }
}

fn remove_card(deck: &mut Deck, store: &SqliteStore, rest: &str) {
  let Ok(id) = rest.parse::<i64>() else {
    println!("Usage: remove <id>");
    return;
  };

  match store.remove_card(id) {
    Ok(true) => {
      deck.remove(id);
      println!("Removed card {}.", id);
    }
    Ok(false) => println!("No card with id {}.", id),
    Err(e) => println!("Could not remove card: {}", e),
  }
}

fn run_study_session(deck: &mut Deck, store: &SqliteStore, mode: QueueMode) {
  let queue = srs::build_queue(&deck.to_vec(), mode, Utc::now());
  if queue.is_empty() {
    match queue.mode() {
      QueueMode::Due => println!("No cards due right now."),
      QueueMode::All => println!("The deck is empty."),
    }
    return;
  }

  let mut session = StudySession::new();
  if let Err(e) = session.start(queue) {
    println!("{}", e);
    return;
  }

  println!("Starting session: {} cards. Enter to reveal, q to stop.", session.len());

  let mut cancelled = false;
  while session.state() == SessionState::Active {
    let Some(card) = session.current().cloned() else {
      break;
    };

    println!();
    println!("[{}/{}] {}", session.position() + 1, session.len(), card.front);
    if !prompt_reveal() {
      session.cancel();
      cancelled = true;
      break;
    }
    if let Err(e) = session.reveal() {
      println!("{}", e);
      break;
    }
    println!("  -> {}", card.back);

    let Some(grade) = prompt_grade(&card) else {
      session.cancel();
      cancelled = true;
      break;
    };

    match session.grade(grade, Utc::now()) {
      Ok(updated) => {
        let log = ReviewLog::new(updated.id, grade, Utc::now());
        store.save_card(&updated).log_warn("Failed to save card");
        store.log_review(&log).log_warn("Failed to log review");
        deck.merge(updated);
      }
      Err(e) => println!("{}", e),
    }
  }

  if cancelled {
    println!("Session stopped; ungraded cards keep their schedule.");
  } else {
    println!("Session complete.");
  }
  print_status(deck);
}

/// Returns false when the user wants to stop the session.
fn prompt_reveal() -> bool {
  print!("(enter = show answer, q = stop) ");
  let _ = io::stdout().flush();

  let mut line = String::new();
  if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
    return false;
  }
  line.trim() != "q"
}

/// Returns None when the user wants to stop the session.
fn prompt_grade(card: &Flashcard) -> Option<ReviewGrade> {
  let mut line = String::new();
  loop {
    print!(
      "grade [0=Again(now) 3=Hard({}d) 4=Good({}d) 5=Easy({}d), q=stop]: ",
      srs::preview_interval(card, ReviewGrade::Hard),
      srs::preview_interval(card, ReviewGrade::Good),
      srs::preview_interval(card, ReviewGrade::Easy)
    );
    let _ = io::stdout().flush();

    line.clear();
    if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
      return None;
    }
    let input = line.trim();
    if input == "q" {
      return None;
    }

    match input.parse::<u8>() {
      Ok(value) => match ReviewGrade::try_from(value) {
        Ok(grade) => return Some(grade),
        Err(e) => println!("{}", e),
      },
      Err(_) => println!("Enter one of 0, 3, 4, 5."),
    }
  }
}

fn export_deck(deck: &Deck, rest: &str) {
  if rest.is_empty() {
    println!("Usage: export <path>");
    return;
  }

  match deck.to_json() {
    Ok(json) => match std::fs::write(rest, json) {
      Ok(()) => println!("Exported {} cards to {}.", deck.len(), rest),
      Err(e) => println!("Could not write {}: {}", rest, e),
    },
    Err(e) => println!("Could not serialize deck: {}", e),
  }
}

fn backup(pool: &DbPool, rest: &str) {
  if rest.is_empty() {
    println!("Usage: backup <path>");
    return;
  }

  let Some(conn) = db::try_lock(pool).log_warn("Backup failed") else {
    return;
  };
  match db::backup_database(&conn, std::path::Path::new(rest)) {
    Ok(()) => println!("Backup written to {}.", rest),
    Err(e) => println!("Backup failed: {}", e),
  }
}
