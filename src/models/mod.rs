mod leaderboard;
mod question;

pub use leaderboard::{LeaderboardEntry, local_timestamp, rank};
pub use question::{NUM_OPTIONS, Question};
