use std::time::Duration;

use clap::Args;

/// How long each demo sleeps, delays and waits.
///
/// The defaults reproduce the classic one and two second timings; tests use
/// much shorter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Args)]
pub struct Timings {
    /// Blocking sleep inside the OS thread demo, in milliseconds
    #[arg(long, env = "TVC_THREAD_WORK_MS", default_value_t = 2000)]
    pub thread_work_ms: u64,

    /// Sleep or delay inside each launched task, in milliseconds
    #[arg(long, env = "TVC_TASK_WORK_MS", default_value_t = 1000)]
    pub task_work_ms: u64,

    /// How long the caller waits for launched tasks, in milliseconds
    #[arg(long, env = "TVC_MAIN_WAIT_MS", default_value_t = 2000)]
    pub main_wait_ms: u64,

    /// Worker threads backing the global scope
    #[arg(
        long,
        env = "TVC_WORKERS",
        default_value_t = 2,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub workers: u16,
}

impl Timings {
    pub fn thread_work(&self) -> Duration {
        Duration::from_millis(self.thread_work_ms)
    }

    pub fn task_work(&self) -> Duration {
        Duration::from_millis(self.task_work_ms)
    }

    pub fn main_wait(&self) -> Duration {
        Duration::from_millis(self.main_wait_ms)
    }

    /// True when a caller waiting `main_wait` outlasts a task working `task_work`.
    pub fn wait_covers_task(&self) -> bool {
        self.main_wait_ms > self.task_work_ms
    }
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            thread_work_ms: 2000,
            task_work_ms: 1000,
            main_wait_ms: 2000,
            workers: 2,
        }
    }
}
