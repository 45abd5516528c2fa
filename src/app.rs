use std::io::Write;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::warn;

use crate::QuizError;
use crate::config::Config;
use crate::data::{LeaderboardRepository, QuestionRepository, StoreError};
use crate::data::codec::parse_or;
use crate::input::TimedInputReader;
use crate::models::{NUM_OPTIONS, Question, local_timestamp};
use crate::session::{QuizSession, SessionSettings};
use crate::terminal::Console;

const MAIN_MENU: [&str; 6] = [
    "1. Play Quiz",
    "2. Instructions",
    "3. Leaderboard",
    "4. Manage Questions",
    "5. Import/Export",
    "0. Exit",
];

const MANAGE_MENU: [&str; 5] = ["1. List", "2. Add", "3. Delete", "4. Clear all", "0. Back"];

const TRANSFER_MENU: [&str; 3] = [
    "1. Export questions to file",
    "2. Import from file",
    "0. Back",
];

/// The interactive menu around the quiz.
pub struct App<W: Write> {
    config: Config,
    questions: QuestionRepository,
    leaderboard: LeaderboardRepository,
    input: TimedInputReader,
    console: Console<W>,
    rng: StdRng,
}

impl<W: Write> App<W> {
    pub fn new(config: Config, input: TimedInputReader, console: Console<W>) -> Self {
        Self {
            questions: QuestionRepository::new(&config.questions_path),
            leaderboard: LeaderboardRepository::new(&config.leaderboard_path),
            config,
            input,
            console,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed random source for question sampling.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    /// Seed the bank on first run, then show the menu until the operator exits.
    ///
    /// End of input is treated as choosing exit.
    pub async fn run(&mut self) -> Result<(), QuizError> {
        if let Err(e) = self.questions.seed_if_missing() {
            warn!("could not create the starter question bank: {e}");
        }
        self.console.heading("Timed quiz ready")?;

        match self.main_menu().await {
            Err(QuizError::InputClosed) => {
                self.console.blank()?;
                self.console.line("Goodbye.")?;
                Ok(())
            }
            other => other,
        }
    }

    async fn main_menu(&mut self) -> Result<(), QuizError> {
        loop {
            let choice = self.choose("Menu:", &MAIN_MENU).await?;
            match choice.as_str() {
                "1" => self.play_quiz().await?,
                "2" => self.show_instructions()?,
                "3" => self.view_leaderboard()?,
                "4" => self.manage_questions().await?,
                "5" => self.import_export().await?,
                "0" => {
                    self.console.line("Goodbye.")?;
                    return Ok(());
                }
                _ => self.console.error("Invalid.")?,
            }
        }
    }

    async fn play_quiz(&mut self) -> Result<(), QuizError> {
        let bank = self.questions.load();
        if bank.is_empty() {
            self.console.warning("No questions. Add some first.")?;
            return Ok(());
        }

        let defaults = self.config.defaults;
        let count = self
            .ask(&format!(
                "Number of questions to attempt (max {}, default {}): ",
                bank.len(),
                defaults.question_count
            ))
            .await?;
        let seconds = self
            .ask(&format!(
                "Time per question in seconds (default {}): ",
                defaults.seconds_per_question
            ))
            .await?;
        let name = self.ask("Enter your name: ").await?;

        let settings = SessionSettings::from_answers(&count, &seconds, &name, bank.len(), &defaults);
        let mut session = QuizSession::new(settings);
        session.start(&bank, &mut self.rng)?;
        let score = session.run(&mut self.input, &mut self.console).await?;

        self.console.blank()?;
        self.console
            .heading(&format!("Quiz finished. Score: {} / {}", score, session.total()))?;

        let consent = self.ask("Save to leaderboard? (y/n): ").await?;
        if !is_yes(&consent) {
            return session.discard();
        }
        match session.commit(&self.leaderboard, local_timestamp()) {
            Ok(_) => self.console.success("Saved.")?,
            Err(QuizError::Store(e)) => {
                self.report(&e)?;
                session.discard()?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn show_instructions(&mut self) -> Result<(), QuizError> {
        self.console.blank()?;
        self.console.heading("Instructions:")?;
        self.console.line(" - Each correct answer gives 1 point.")?;
        self.console.line(" - Enter option number (1-4) and press Enter.")?;
        self.console
            .line(" - If time runs out, the question is marked wrong.")?;
        self.console.blank()?;
        Ok(())
    }

    fn view_leaderboard(&mut self) -> Result<(), QuizError> {
        let entries = self.leaderboard.load();
        if entries.is_empty() {
            self.console.blank()?;
            self.console.line("No leaderboard entries yet.")?;
            return Ok(());
        }

        self.console.blank()?;
        self.console.heading("Leaderboard:")?;
        for (rank, entry) in entries.iter().enumerate() {
            self.console.line(format!(
                "{}. {} - {} / {} ({})",
                rank + 1,
                entry.name,
                entry.score,
                entry.total,
                entry.timestamp
            ))?;
        }
        self.console.blank()?;
        Ok(())
    }

    async fn manage_questions(&mut self) -> Result<(), QuizError> {
        loop {
            let choice = self.choose("Manage Questions:", &MANAGE_MENU).await?;
            match choice.as_str() {
                "1" => self.list_questions()?,
                "2" => self.add_question().await?,
                "3" => self.delete_question().await?,
                "4" => self.clear_questions().await?,
                "0" => return Ok(()),
                _ => self.console.error("Invalid.")?,
            }
        }
    }

    fn list_questions(&mut self) -> Result<(), QuizError> {
        let questions = self.questions.load();
        if questions.is_empty() {
            self.console.line("No questions.")?;
            return Ok(());
        }

        for (number, question) in questions.iter().enumerate() {
            self.console.line(format!("{}. {}", number + 1, question.text))?;
            for (index, option) in question.options.iter().enumerate() {
                let marker = if index == question.correct_index {
                    " [correct]"
                } else {
                    ""
                };
                self.console
                    .line(format!("   {}) {}{}", index + 1, option, marker))?;
            }
        }
        Ok(())
    }

    async fn add_question(&mut self) -> Result<(), QuizError> {
        let text = self.ask("Enter question text: ").await?;
        let mut options: [String; NUM_OPTIONS] = Default::default();
        for (index, option) in options.iter_mut().enumerate() {
            *option = self.ask(&format!("Option {}: ", index + 1)).await?;
        }
        let correct = self.ask("Correct option number (1-4): ").await?;
        let correct_index = match parse_or::<usize>(&correct, 1) {
            n @ 1..=NUM_OPTIONS => n - 1,
            _ => 0,
        };

        match self.questions.add(Question::new(text, options, correct_index)) {
            Ok(()) => self.console.success("Added.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    async fn delete_question(&mut self) -> Result<(), QuizError> {
        if self.questions.load().is_empty() {
            self.console.line("No questions.")?;
            return Ok(());
        }

        let answer = self.ask("Enter question number to delete: ").await?;
        match self.questions.delete_at(parse_or(&answer, 0)) {
            Ok(_) => self.console.success("Deleted.")?,
            Err(StoreError::InvalidIndex { .. }) => self.console.error("Invalid.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    async fn clear_questions(&mut self) -> Result<(), QuizError> {
        let answer = self.ask("Clear ALL questions? (y/n): ").await?;
        if !is_yes(&answer) {
            return Ok(());
        }
        match self.questions.clear() {
            Ok(()) => self.console.success("Cleared.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    async fn import_export(&mut self) -> Result<(), QuizError> {
        let choice = self.choose("Import/Export:", &TRANSFER_MENU).await?;
        match choice.as_str() {
            "1" => {
                let default_path = self.config.export_path.clone();
                let answer = self
                    .ask(&format!(
                        "Enter export filename (e.g. {}): ",
                        default_path.display()
                    ))
                    .await?;
                let path = match answer.trim() {
                    "" => default_path,
                    name => name.into(),
                };
                match self.questions.export_to(&path) {
                    Ok(count) => self.console.success(&format!(
                        "Exported {count} questions to {}",
                        path.display()
                    ))?,
                    Err(e) => self.report(&e)?,
                }
            }
            "2" => {
                let answer = self.ask("Enter import filename: ").await?;
                match self.questions.import_file(answer.trim()) {
                    Ok(0) => self.console.warning("No valid items.")?,
                    Ok(count) => self
                        .console
                        .success(&format!("Imported {count} questions."))?,
                    Err(StoreError::Read { .. }) => self.console.error("Failed to open.")?,
                    Err(e) => self.report(&e)?,
                }
            }
            "0" => {}
            _ => self.console.error("Invalid.")?,
        }
        Ok(())
    }

    /// Show a titled menu and read the choice.
    async fn choose(&mut self, title: &str, entries: &[&str]) -> Result<String, QuizError> {
        self.console.blank()?;
        self.console.heading(title)?;
        for entry in entries {
            self.console.line(entry)?;
        }
        let choice = self.ask("Choice: ").await?;
        Ok(choice.trim().to_string())
    }

    async fn ask(&mut self, prompt: &str) -> Result<String, QuizError> {
        self.console.prompt(prompt)?;
        self.input.read_line().await.ok_or(QuizError::InputClosed)
    }

    fn report(&mut self, error: &StoreError) -> Result<(), QuizError> {
        warn!("{error}");
        self.console.error(&format!("Failed: {error}"))?;
        Ok(())
    }
}

fn is_yes(answer: &str) -> bool {
    answer.starts_with(['y', 'Y'])
}
