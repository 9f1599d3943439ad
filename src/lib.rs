//! Spaced repetition core of the cardstack flashcard app

pub mod clock;
pub mod config;
pub mod flashcards;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError, StorageBackend};
