//! Spaced repetition scheduling for flashcard study sets
//!
//! This module provides:
//! - Card and status models
//! - SM-2 review updates (`algorithm`)
//! - Selection of the cards due in a session (`stack`)
//! - Status persistence (JSON files, SQLite, in-memory)
//! - Study sessions tying the above together

pub mod algorithm;
pub mod models;
pub mod session;
pub mod source;
pub mod sqlite;
pub mod stack;
pub mod storage;

pub use algorithm::{review_card, Grade, SchedulerError, SchedulerPolicy, Swipe};
pub use models::*;
pub use session::{reset_statuses, AnswerOutcome, SessionError, StudySession};
pub use source::{CardSource, CardSourceError, JsonDeckSource};
pub use sqlite::SqliteStatusStore;
pub use stack::initial_stack;
pub use storage::{JsonStatusStore, MemoryStatusStore, StatusStore, StatusStoreError};
