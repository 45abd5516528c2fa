use std::cmp::Ordering;

/// Format of leaderboard timestamps, local time with second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A completed quiz result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub total: u32,
    pub timestamp: String,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: u32, total: u32, timestamp: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score,
            total,
            timestamp: timestamp.into(),
        }
    }
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn local_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Sort by score descending, then by timestamp descending.
///
/// Among equal scores the most recent result comes first. Timestamps compare
/// as text, which is chronological for [`TIMESTAMP_FORMAT`].
pub fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(compare);
}

fn compare(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_prefers_recent_on_ties() {
        let mut entries = vec![
            LeaderboardEntry::new("early", 5, 10, "2024-01-01 10:00:00"),
            LeaderboardEntry::new("best", 8, 10, "2024-01-01 09:00:00"),
            LeaderboardEntry::new("late", 5, 10, "2024-01-02 10:00:00"),
        ];
        rank(&mut entries);

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["best", "late", "early"]);
    }

    #[test]
    fn test_local_timestamp_shape() {
        let stamp = local_timestamp();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
        assert_eq!(&stamp[13..14], ":");
    }
}
