// Console transcript shared by the main thread, OS threads and tasks

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::current_thread_name;

/// One line written to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    /// Time since the console was created.
    pub at: Duration,
    /// Thread that actually printed the line.
    pub thread: String,
}

#[derive(Debug)]
struct Inner {
    started: Instant,
    echo: bool,
    lines: Mutex<Vec<Line>>,
}

/// Prints lines to stdout and keeps a copy of each one.
///
/// Cloning is cheap; all clones write to the same transcript.
#[derive(Debug, Clone)]
pub struct Console {
    inner: Arc<Inner>,
}

impl Console {
    /// A console that echoes every line to stdout.
    pub fn stdout() -> Self {
        Self::with_echo(true)
    }

    /// A console that only records.
    pub fn silent() -> Self {
        Self::with_echo(false)
    }

    fn with_echo(echo: bool) -> Self {
        Console {
            inner: Arc::new(Inner {
                started: Instant::now(),
                echo,
                lines: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn say(&self, text: impl Into<String>) {
        let line = Line {
            text: text.into(),
            at: self.inner.started.elapsed(),
            thread: current_thread_name(),
        };

        tracing::debug!(
            thread = %line.thread,
            elapsed = ?line.at,
            "{}",
            line.text
        );

        // Print while holding the lock so stdout order matches the transcript
        let mut lines = self.inner.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if self.inner.echo {
            println!("{}", line.text);
        }
        lines.push(line);
    }

    pub fn lines(&self) -> Vec<Line> {
        self.inner
            .lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines().into_iter().map(|line| line.text).collect()
    }

    /// Position of the first line with exactly this text.
    pub fn position(&self, text: &str) -> Option<usize> {
        self.lines().iter().position(|line| line.text == text)
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}
