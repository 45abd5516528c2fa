//! Persistence for the question bank and the leaderboard.

pub mod codec;
mod leaderboard;
mod loader;
mod questions;
mod store;

use std::io;
use std::path::PathBuf;

pub use leaderboard::{DEFAULT_LEADERBOARD_PATH, LeaderboardRepository};
pub use loader::load_questions_from_json;
pub use questions::{
    DEFAULT_EXPORT_PATH, DEFAULT_QUESTIONS_PATH, QuestionRepository, starter_questions,
};
pub use store::RecordFile;

/// Errors from the on-disk stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no question number {number} (valid range is 1-{len})")]
    InvalidIndex { number: usize, len: usize },
}
