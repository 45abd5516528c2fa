use std::path::Path;

use tracing::info;

use super::codec::{Record, parse_or};
use super::loader::load_questions_from_json;
use super::{RecordFile, StoreError};
use crate::models::Question;

pub const DEFAULT_QUESTIONS_PATH: &str = "questions.txt";
pub const DEFAULT_EXPORT_PATH: &str = "export.txt";

impl Record for Question {
    const MIN_FIELDS: usize = 6;

    fn to_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(Self::MIN_FIELDS);
        fields.push(self.text.clone());
        fields.extend(self.options.iter().cloned());
        fields.push(self.correct_index.to_string());
        fields
    }

    fn from_fields(fields: &[&str]) -> Self {
        let options = [1, 2, 3, 4].map(|i| fields[i].to_string());
        Question::new(fields[0], options, parse_or(fields[5], 0))
    }
}

/// The question bank file.
///
/// Every edit is load, change in memory, save the whole bank.
#[derive(Debug, Clone)]
pub struct QuestionRepository {
    file: RecordFile<Question>,
}

impl QuestionRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: RecordFile::new(path.as_ref()),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn load(&self) -> Vec<Question> {
        self.file.load()
    }

    pub fn save(&self, questions: &[Question]) -> Result<(), StoreError> {
        self.file.save(questions)
    }

    pub fn add(&self, question: Question) -> Result<(), StoreError> {
        let mut questions = self.load();
        questions.push(question);
        self.save(&questions)
    }

    /// Delete by the 1-based number shown to the operator.
    pub fn delete_at(&self, number: usize) -> Result<Question, StoreError> {
        let mut questions = self.load();
        if number == 0 || number > questions.len() {
            return Err(StoreError::InvalidIndex {
                number,
                len: questions.len(),
            });
        }
        let removed = questions.remove(number - 1);
        self.save(&questions)?;
        Ok(removed)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.save(&[])
    }

    /// Append `incoming` after the existing questions.
    pub fn import(&self, incoming: Vec<Question>) -> Result<usize, StoreError> {
        let count = incoming.len();
        let mut questions = self.load();
        questions.extend(incoming);
        self.save(&questions)?;
        info!(count, path = %self.path().display(), "imported questions");
        Ok(count)
    }

    /// Import questions from another file, returning how many were added.
    ///
    /// `.json` files hold an array of questions, anything else uses the
    /// record format. A file without any valid question leaves the bank
    /// untouched.
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<usize, StoreError> {
        let path = path.as_ref();
        let incoming = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            load_questions_from_json(path)?
        } else {
            RecordFile::<Question>::new(path).read_all()?
        };

        if incoming.is_empty() {
            return Ok(0);
        }
        self.import(incoming)
    }

    /// Write the current bank to another file in the same format.
    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<usize, StoreError> {
        let questions = self.load();
        RecordFile::<Question>::new(path.as_ref()).save(&questions)?;
        Ok(questions.len())
    }

    /// Seed the bank with [`starter_questions`] if its file does not exist.
    pub fn seed_if_missing(&self) -> Result<bool, StoreError> {
        if self.file.exists() {
            return Ok(false);
        }
        self.save(&starter_questions())?;
        info!(path = %self.path().display(), "seeded question bank");
        Ok(true)
    }
}

impl Default for QuestionRepository {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTIONS_PATH)
    }
}

/// The questions written on first run.
pub fn starter_questions() -> Vec<Question> {
    vec![
        Question::new(
            "Which constructor is called when an object is passed by value to a function?",
            [
                "Default constructor",
                "Parameterized constructor",
                "Copy constructor",
                "Move constructor",
            ]
            .map(String::from),
            1,
        ),
        Question::new(
            "Which language is primarily used for AI development?",
            ["Python", "C", "Java", "C++"].map(String::from),
            0,
        ),
        Question::new(
            "Who developed C++?",
            [
                "Dennis Ritchie",
                "James Gosling",
                "Bjarne Stroustrup",
                "Guido van Rossum",
            ]
            .map(String::from),
            2,
        ),
    ]
}
