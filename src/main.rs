use std::path::PathBuf;

use clap::Parser;
use timed_quiz::data::{DEFAULT_EXPORT_PATH, DEFAULT_LEADERBOARD_PATH, DEFAULT_QUESTIONS_PATH};
use timed_quiz::{Config, Quiz, QuizDefaults};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Question bank file, created with starter questions if missing
    #[arg(short, long, env = "QUIZ_QUESTIONS", default_value = DEFAULT_QUESTIONS_PATH)]
    questions: PathBuf,

    /// Leaderboard file
    #[arg(short, long, env = "QUIZ_LEADERBOARD", default_value = DEFAULT_LEADERBOARD_PATH)]
    leaderboard: PathBuf,

    /// Default file name offered when exporting questions
    #[arg(long, default_value = DEFAULT_EXPORT_PATH)]
    export: PathBuf,

    /// Questions per quiz when the player gives no valid number
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    question_count: u64,

    /// Seconds per question when the player gives no valid number
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    seconds: u64,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            questions_path: args.questions,
            leaderboard_path: args.leaderboard,
            export_path: args.export,
            defaults: QuizDefaults {
                question_count: args.question_count as usize,
                seconds_per_question: args.seconds,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = Quiz::new(args.into()).run().await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("QUIZ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
