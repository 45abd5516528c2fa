//! # timed-quiz
//!
//! A single-player, timed multiple-choice quiz for the terminal, with a
//! question bank and a leaderboard kept in plain text files.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timed_quiz::{Config, Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     // questions.txt and leaderboard.txt in the working directory
//!     Quiz::new(Config::default()).run().await
//! }
//! ```
//!
//! ## File format
//!
//! One record per line, fields joined with `|||`:
//!
//! ```text
//! questions.txt    text|||option1|||option2|||option3|||option4|||correctIndex
//! leaderboard.txt  name|||score|||total|||YYYY-MM-DD HH:MM:SS
//! ```

mod app;
pub mod config;
pub mod data;
pub mod input;
mod models;
pub mod session;
pub mod terminal;

use std::io;

pub use app::App;
pub use config::{Config, QuizDefaults};
pub use data::{LeaderboardRepository, QuestionRepository, StoreError};
pub use input::{TimedInputReader, TimedLine};
pub use models::{LeaderboardEntry, Question};
pub use session::{AnswerOutcome, QuizSession, SessionSettings, SessionState};
use terminal::StdConsole;

/// Error type for quiz operations.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Error reading or writing one of the stores.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// IO error on the console.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A quiz was started against an empty question bank.
    #[error("no questions in the bank")]
    EmptyBank,

    /// Operator input ended while a prompt was waiting.
    #[error("input closed")]
    InputClosed,

    /// A session transition was attempted from the wrong state.
    #[error("quiz session is {found:?}, expected {expected:?}")]
    OutOfOrder {
        expected: SessionState,
        found: SessionState,
    },
}

/// The quiz wired to the process's standard input and output.
pub struct Quiz {
    config: Config,
}

impl Quiz {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the menu until the operator exits or input ends.
    pub async fn run(self) -> Result<(), QuizError> {
        let input = TimedInputReader::stdin()?;
        let mut app = App::new(self.config, input, StdConsole::stdout());
        app.run().await
    }
}
