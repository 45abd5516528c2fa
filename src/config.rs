use std::path::PathBuf;

use crate::data::{DEFAULT_EXPORT_PATH, DEFAULT_LEADERBOARD_PATH, DEFAULT_QUESTIONS_PATH};

/// Fallbacks for the quiz prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizDefaults {
    pub question_count: usize,
    pub seconds_per_question: u64,
}

impl Default for QuizDefaults {
    fn default() -> Self {
        Self {
            question_count: 5,
            seconds_per_question: 20,
        }
    }
}

/// Where the stores live and how sessions are defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub questions_path: PathBuf,
    pub leaderboard_path: PathBuf,
    pub export_path: PathBuf,
    pub defaults: QuizDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from(DEFAULT_QUESTIONS_PATH),
            leaderboard_path: PathBuf::from(DEFAULT_LEADERBOARD_PATH),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            defaults: QuizDefaults::default(),
        }
    }
}
