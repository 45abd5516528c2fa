use std::fs;
use std::path::Path;

use super::StoreError;
use crate::models::Question;

/// Load questions from a JSON array.
///
/// Each object needs `text`, four `options` and a `correct_answer` (or
/// `correct_index`). Unknown keys are ignored and an out-of-range answer index
/// falls back to the first option.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, StoreError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let questions: Vec<Question> =
        serde_json::from_str(&json_content).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(questions
        .into_iter()
        .map(|q| Question::new(q.text, q.options, q.correct_index))
        .collect())
}
