use serde::Deserialize;

pub const NUM_OPTIONS: usize = 4;

/// A multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [String; NUM_OPTIONS],
    #[serde(alias = "correct_answer")]
    pub correct_index: usize,
}

impl Question {
    /// Build a question. An index outside `0..4` falls back to the first option.
    pub fn new(text: impl Into<String>, options: [String; NUM_OPTIONS], correct_index: usize) -> Self {
        Self {
            text: text.into(),
            options,
            correct_index: normalize_index(correct_index),
        }
    }

    pub fn correct_option(&self) -> &str {
        &self.options[normalize_index(self.correct_index)]
    }

    /// Whether a 1-based operator answer picks the correct option.
    pub fn is_correct(&self, answer: i64) -> bool {
        answer.checked_sub(1) == Some(self.correct_index as i64)
    }
}

fn normalize_index(index: usize) -> usize {
    if index < NUM_OPTIONS { index } else { 0 }
}
