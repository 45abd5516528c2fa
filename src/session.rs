//! One timed quiz run.
//!
//! A session moves through [`SessionState`] in one direction:
//! configured, running, scored, then either persisted to the leaderboard or
//! discarded.

use std::io::Write;
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::QuizError;
use crate::config::QuizDefaults;
use crate::data::LeaderboardRepository;
use crate::data::codec::parse_or;
use crate::input::{TimedInputReader, TimedLine};
use crate::models::{LeaderboardEntry, Question};
use crate::terminal::Console;

/// Player name used when none is given.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Configuring,
    Running,
    Scored,
    Persisted,
    Discarded,
}

/// Validated parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub question_count: usize,
    pub seconds_per_question: u64,
    pub player_name: String,
}

impl SessionSettings {
    /// Build settings from the operator's raw answers.
    ///
    /// A blank, non-numeric or non-positive count or time takes the default.
    /// The count is then clamped to `1..=bank_len`, and a blank name becomes
    /// [`ANONYMOUS`].
    pub fn from_answers(
        count: &str,
        seconds: &str,
        name: &str,
        bank_len: usize,
        defaults: &QuizDefaults,
    ) -> Self {
        let requested = positive_or(count, defaults.question_count as u64) as usize;
        let question_count = requested.clamp(1, bank_len.max(1));
        let seconds_per_question = positive_or(seconds, defaults.seconds_per_question).max(1);

        let name = name.trim();
        let player_name = if name.is_empty() { ANONYMOUS } else { name };

        Self {
            question_count,
            seconds_per_question,
            player_name: player_name.to_string(),
        }
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.seconds_per_question)
    }
}

fn positive_or(field: &str, default: u64) -> u64 {
    match parse_or::<i64>(field, 0) {
        n if n > 0 => n as u64,
        _ => default,
    }
}

/// Pick `count` distinct indices of a bank of `bank_len`, in random order.
///
/// Shuffles the identity permutation and keeps its prefix.
pub fn sample_indices<R: Rng + ?Sized>(bank_len: usize, count: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..bank_len).collect();
    indices.shuffle(rng);
    indices.truncate(count);
    indices
}

/// How a single question went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Wrong { given: String },
    TimedOut,
}

impl AnswerOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerOutcome::Correct)
    }
}

/// Grade one response. Anything that is not a number counts as option 0.
pub fn grade(question: &Question, response: TimedLine) -> AnswerOutcome {
    let (text, on_time) = response.into_parts();
    if !on_time {
        return AnswerOutcome::TimedOut;
    }

    let given = text.trim();
    if question.is_correct(parse_or(given, 0)) {
        AnswerOutcome::Correct
    } else {
        AnswerOutcome::Wrong {
            given: given.to_string(),
        }
    }
}

pub struct QuizSession {
    settings: SessionSettings,
    questions: Vec<Question>,
    outcomes: Vec<AnswerOutcome>,
    state: SessionState,
}

impl QuizSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            questions: Vec::new(),
            outcomes: Vec::new(),
            state: SessionState::Configuring,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Questions in presentation order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn outcomes(&self) -> &[AnswerOutcome] {
        &self.outcomes
    }

    pub fn score(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_correct()).count()
    }

    /// Questions asked, timeouts included.
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Sample the questions for this run from `bank`.
    pub fn start<R: Rng + ?Sized>(&mut self, bank: &[Question], rng: &mut R) -> Result<(), QuizError> {
        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        let count = self.settings.question_count.clamp(1, bank.len());
        let picked = sample_indices(bank.len(), count, rng)
            .into_iter()
            .map(|i| bank[i].clone())
            .collect();
        self.start_with(picked)
    }

    /// Run over `questions` in the given order.
    pub fn start_with(&mut self, questions: Vec<Question>) -> Result<(), QuizError> {
        self.expect(SessionState::Configuring)?;
        if questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        self.settings.question_count = questions.len();
        self.questions = questions;
        self.state = SessionState::Running;
        debug!(count = self.questions.len(), "quiz started");
        Ok(())
    }

    /// Ask every question against its own deadline and return the score.
    pub async fn run<W: Write>(
        &mut self,
        input: &mut TimedInputReader,
        console: &mut Console<W>,
    ) -> Result<usize, QuizError> {
        self.expect(SessionState::Running)?;
        let limit = self.settings.time_limit();
        let total = self.questions.len();

        for (number, question) in self.questions.iter().enumerate() {
            console.blank()?;
            console.heading(&format!("Question {} / {}", number + 1, total))?;
            console.line(&question.text)?;
            for (option, text) in question.options.iter().enumerate() {
                console.line(format!("  {}. {}", option + 1, text))?;
            }
            console.prompt(format!(
                "Answer (1-4). You have {}s: ",
                self.settings.seconds_per_question
            ))?;

            let outcome = grade(question, input.read_line_within(limit).await);
            match &outcome {
                AnswerOutcome::Correct => console.success("Correct!")?,
                AnswerOutcome::Wrong { .. } => console.error(&format!(
                    "Wrong. Correct: {}. {}",
                    question.correct_index + 1,
                    question.correct_option()
                ))?,
                AnswerOutcome::TimedOut => {
                    console.blank()?;
                    console.warning("Time's up!")?;
                }
            }
            self.outcomes.push(outcome);
        }

        self.state = SessionState::Scored;
        info!(
            player = %self.settings.player_name,
            score = self.score(),
            total,
            "quiz finished"
        );
        Ok(self.score())
    }

    /// The leaderboard entry this run would record.
    pub fn entry(&self, timestamp: impl Into<String>) -> LeaderboardEntry {
        LeaderboardEntry::new(
            self.settings.player_name.clone(),
            self.score() as u32,
            self.total() as u32,
            timestamp,
        )
    }

    /// Append the result to the leaderboard.
    ///
    /// On a write failure the session stays scored and may still be discarded.
    pub fn commit(
        &mut self,
        leaderboard: &LeaderboardRepository,
        timestamp: impl Into<String>,
    ) -> Result<LeaderboardEntry, QuizError> {
        self.expect(SessionState::Scored)?;
        let entry = self.entry(timestamp);
        leaderboard.record(entry.clone())?;
        self.state = SessionState::Persisted;
        Ok(entry)
    }

    pub fn discard(&mut self) -> Result<(), QuizError> {
        self.expect(SessionState::Scored)?;
        self.state = SessionState::Discarded;
        Ok(())
    }

    fn expect(&self, expected: SessionState) -> Result<(), QuizError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(QuizError::OutOfOrder {
                expected,
                found: self.state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::tempdir;
    use tokio::sync::mpsc;
    use tokio::time;

    use super::*;

    fn fixed_questions() -> Vec<Question> {
        [1, 0, 2]
            .into_iter()
            .enumerate()
            .map(|(i, correct)| {
                Question::new(format!("Q{i}"), ["a", "b", "c", "d"].map(String::from), correct)
            })
            .collect()
    }

    fn settings(count: usize, seconds: u64) -> SessionSettings {
        SessionSettings {
            question_count: count,
            seconds_per_question: seconds,
            player_name: "tester".to_string(),
        }
    }

    async fn scripted(answers: &[&str]) -> (TimedInputReader, mpsc::Sender<String>) {
        let (tx, rx) = mpsc::channel(16);
        for answer in answers {
            tx.send(answer.to_string()).await.unwrap();
        }
        (TimedInputReader::from_channel(rx), tx)
    }

    async fn play(answers: &[&str]) -> QuizSession {
        let (mut input, _tx) = scripted(answers).await;
        let mut console = Console::new(Vec::new());
        let mut session = QuizSession::new(settings(3, 20));
        session.start_with(fixed_questions()).unwrap();
        session.run(&mut input, &mut console).await.unwrap();
        session
    }

    #[test]
    fn test_settings_defaults() {
        let defaults = QuizDefaults::default();
        let s = SessionSettings::from_answers("", "", "  ", 10, &defaults);
        assert_eq!(s.question_count, 5);
        assert_eq!(s.seconds_per_question, 20);
        assert_eq!(s.player_name, ANONYMOUS);

        for bad in ["0", "-3", "five"] {
            let s = SessionSettings::from_answers(bad, bad, "ann", 10, &defaults);
            assert_eq!(s.question_count, 5, "count {bad:?}");
            assert_eq!(s.seconds_per_question, 20, "seconds {bad:?}");
        }
    }

    #[test]
    fn test_settings_clamp_to_bank() {
        let defaults = QuizDefaults::default();
        assert_eq!(
            SessionSettings::from_answers("50", "5", "ann", 3, &defaults).question_count,
            3
        );
        assert_eq!(
            SessionSettings::from_answers("abc", "5", "ann", 3, &defaults).question_count,
            3
        );
        assert_eq!(
            SessionSettings::from_answers(" 2 ", "5", "ann", 3, &defaults).question_count,
            2
        );
    }

    #[test]
    fn test_sample_indices_are_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = sample_indices(10, 4, &mut rng);
            assert_eq!(picked.len(), 4);
            assert!(picked.iter().all(|&i| i < 10));
            assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 4);
        }
        let mut all = sample_indices(5, 9, &mut rng);
        all.sort_unstable();
        assert_eq!(all, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_start_clamps_to_bank_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = QuizSession::new(settings(5, 20));
        session.start(&fixed_questions(), &mut rng).unwrap();

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.total(), 3);
        let texts: HashSet<_> = session.questions().iter().map(|q| q.text.clone()).collect();
        assert_eq!(texts.len(), 3);
    }

    #[test]
    fn test_questions_are_presented_shuffled() {
        let bank: Vec<Question> = (0..10)
            .map(|i| Question::new(format!("Q{i}"), ["a", "b", "c", "d"].map(String::from), 0))
            .collect();
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = QuizSession::new(settings(10, 20));
        session.start(&bank, &mut rng).unwrap();

        assert_ne!(session.questions(), bank.as_slice());
        let mut asked = session.questions().to_vec();
        asked.sort_by(|a, b| a.text.cmp(&b.text));
        assert_eq!(asked, bank);
    }

    #[test]
    fn test_start_with_empty_bank() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = QuizSession::new(settings(5, 20));
        assert!(matches!(
            session.start(&[], &mut rng),
            Err(QuizError::EmptyBank)
        ));
        assert_eq!(session.state(), SessionState::Configuring);
    }

    #[test]
    fn test_grade() {
        let question = &fixed_questions()[0];
        assert!(grade(question, TimedLine::OnTime(" 2 ".into())).is_correct());
        assert_eq!(
            grade(question, TimedLine::OnTime("two".into())),
            AnswerOutcome::Wrong {
                given: "two".into()
            }
        );
        assert_eq!(grade(question, TimedLine::Expired), AnswerOutcome::TimedOut);
        assert_eq!(grade(question, TimedLine::Closed), AnswerOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_all_correct() {
        let session = play(&["2", "1", "3"]).await;
        assert_eq!(session.state(), SessionState::Scored);
        assert_eq!((session.score(), session.total()), (3, 3));
    }

    #[tokio::test]
    async fn test_out_of_range_answer_is_wrong() {
        let session = play(&["9", "1", "3"]).await;
        assert_eq!((session.score(), session.total()), (2, 3));
        assert_eq!(
            session.outcomes()[0],
            AnswerOutcome::Wrong { given: "9".into() }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_wrong_but_stays_in_total() {
        let (mut input, tx) = scripted(&["2"]).await;
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(1500)).await;
            tx.send("3".to_string()).await.unwrap();
        });

        let mut console = Console::new(Vec::new());
        let mut session = QuizSession::new(settings(3, 1));
        session.start_with(fixed_questions()).unwrap();
        let score = session.run(&mut input, &mut console).await.unwrap();

        assert_eq!(score, 2);
        assert_eq!(session.total(), 3);
        assert_eq!(session.outcomes()[1], AnswerOutcome::TimedOut);
        let shown = String::from_utf8_lossy(console.get_ref());
        assert!(shown.contains("Time's up!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_answer_is_not_graded_for_next_question() {
        let (mut input, tx) = scripted(&[]).await;
        let mut console = Console::new(Vec::new());
        let question = fixed_questions().swap_remove(0);

        let mut first = QuizSession::new(settings(1, 1));
        first.start_with(vec![question.clone()]).unwrap();
        first.run(&mut input, &mut console).await.unwrap();
        assert_eq!(first.outcomes(), [AnswerOutcome::TimedOut]);

        // correct for the next question, but typed after the first deadline
        tx.send("2".to_string()).await.unwrap();

        let mut second = QuizSession::new(settings(1, 20));
        second.start_with(vec![question]).unwrap();
        assert_eq!(second.run(&mut input, &mut console).await.unwrap(), 0);
        assert_eq!(second.outcomes(), [AnswerOutcome::TimedOut]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_answer_does_not_answer_save_prompt() {
        let (mut input, tx) = scripted(&[]).await;
        let mut console = Console::new(Vec::new());
        let mut session = QuizSession::new(settings(1, 1));
        session.start_with(vec![fixed_questions().swap_remove(2)]).unwrap();
        session.run(&mut input, &mut console).await.unwrap();
        assert_eq!(session.outcomes(), [AnswerOutcome::TimedOut]);

        tx.send("y".to_string()).await.unwrap();
        assert!(
            time::timeout(Duration::from_secs(60), input.read_line())
                .await
                .is_err()
        );

        tx.send("n".to_string()).await.unwrap();
        assert_eq!(input.read_line().await.as_deref(), Some("n"));
    }

    #[tokio::test]
    async fn test_commit_records_entry() {
        let dir = tempdir().unwrap();
        let leaderboard = LeaderboardRepository::new(dir.path().join("leaderboard.txt"));
        let mut session = play(&["2", "x", "3"]).await;

        let entry = session.commit(&leaderboard, "2024-06-01 10:00:00").unwrap();
        assert_eq!(session.state(), SessionState::Persisted);
        assert_eq!(
            entry,
            LeaderboardEntry::new("tester", 2, 3, "2024-06-01 10:00:00")
        );
        assert_eq!(leaderboard.load(), vec![entry]);
    }

    #[tokio::test]
    async fn test_discard_writes_nothing() {
        let dir = tempdir().unwrap();
        let leaderboard = LeaderboardRepository::new(dir.path().join("leaderboard.txt"));
        let mut session = play(&["2", "1", "3"]).await;

        session.discard().unwrap();
        assert_eq!(session.state(), SessionState::Discarded);
        assert!(matches!(
            session.commit(&leaderboard, "2024-06-01 10:00:00"),
            Err(QuizError::OutOfOrder {
                expected: SessionState::Scored,
                found: SessionState::Discarded,
            })
        ));
        assert!(!leaderboard.path().exists());
    }

    #[test]
    fn test_run_requires_start() {
        let mut session = QuizSession::new(settings(3, 20));
        assert!(matches!(
            session.discard(),
            Err(QuizError::OutOfOrder {
                found: SessionState::Configuring,
                ..
            })
        ));
    }
}
