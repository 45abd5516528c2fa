//! Deadline-bounded line input.
//!
//! One worker thread owns the input source for the lifetime of the reader and
//! forwards every line it reads into a bounded channel. Reads, timed or not,
//! take the next line from that channel. Giving up on a deadline leaves the
//! worker where it is, so consecutive timeouts never pile up blocked readers.
//! Lines that complete after a deadline, before the next read starts, belong
//! to the abandoned read and are discarded.

use std::io::{self, BufRead, BufReader};
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, warn};

/// Lines the worker may read ahead of the consumer.
const LINE_BUFFER: usize = 8;

/// Outcome of a deadline-bounded read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimedLine {
    /// A line arrived before the deadline.
    OnTime(String),
    /// The deadline passed first.
    Expired,
    /// The input source has ended.
    Closed,
}

impl TimedLine {
    /// The `(text, on_time)` pair; text is empty unless the line was on time.
    pub fn into_parts(self) -> (String, bool) {
        match self {
            TimedLine::OnTime(text) => (text, true),
            TimedLine::Expired | TimedLine::Closed => (String::new(), false),
        }
    }
}

/// Operator input multiplexed over a single reader worker.
pub struct TimedInputReader {
    lines: mpsc::Receiver<String>,
    expired: bool,
}

impl TimedInputReader {
    /// Read lines from standard input.
    pub fn stdin() -> io::Result<Self> {
        Self::spawn(BufReader::new(io::stdin()))
    }

    /// Start the worker thread over `source`.
    ///
    /// The worker is a plain thread, not a runtime task: a read blocked on the
    /// terminal must not hold up runtime shutdown.
    pub fn spawn<R>(source: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        thread::Builder::new()
            .name("input-reader".to_string())
            .spawn(move || forward_lines(source, tx))?;
        Ok(Self::from_channel(rx))
    }

    /// Read from lines produced elsewhere.
    pub fn from_channel(lines: mpsc::Receiver<String>) -> Self {
        Self {
            lines,
            expired: false,
        }
    }

    /// Wait for the next line with no deadline. `None` once input has ended.
    pub async fn read_line(&mut self) -> Option<String> {
        self.discard_late_lines();
        self.lines.recv().await
    }

    /// Wait for the next line for at most `limit`.
    pub async fn read_line_within(&mut self, limit: Duration) -> TimedLine {
        self.discard_late_lines();
        match time::timeout(limit, self.lines.recv()).await {
            Ok(Some(line)) => TimedLine::OnTime(line),
            Ok(None) => TimedLine::Closed,
            Err(_) => {
                debug!(?limit, "timed read expired");
                self.expired = true;
                TimedLine::Expired
            }
        }
    }

    // The channel was empty when the last read expired, so anything buffered
    // since then was typed for that read.
    fn discard_late_lines(&mut self) {
        if !std::mem::take(&mut self.expired) {
            return;
        }
        let mut discarded = 0;
        while self.lines.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!(discarded, "dropped lines completed after a deadline");
        }
    }
}

fn forward_lines<R: BufRead>(mut source: R, tx: mpsc::Sender<String>) {
    loop {
        let mut line = String::new();
        match source.read_line(&mut line) {
            Ok(0) => {
                debug!("input ended");
                break;
            }
            Ok(_) => {
                let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
                line.truncate(trimmed_len);
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("failed to read input: {e}");
                break;
            }
        }
    }
}
