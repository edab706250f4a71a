//! Where launched tasks run, and how to block a thread on async work.

use std::future::Future;

use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

use crate::DemoError;

/// Thread-name prefix of the global scope's workers.
pub const WORKER_NAME: &str = "global-worker";

/// A pool of worker threads that launched tasks run on.
///
/// Launching never waits: the task starts on one of the workers and the caller
/// carries on. Shutting the scope down abandons whatever has not finished yet.
#[derive(Debug)]
pub struct GlobalScope {
    runtime: Runtime,
}

impl GlobalScope {
    pub fn new(workers: u16) -> Result<Self, DemoError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(usize::from(workers.max(1)))
            .thread_name(WORKER_NAME)
            .enable_all()
            .build()
            .map_err(|source| DemoError::Runtime {
                kind: "global",
                source,
            })?;

        tracing::debug!(workers, "global scope started");
        Ok(GlobalScope { runtime })
    }

    /// Fire-and-forget launch. The handle may be dropped without affecting the task.
    pub fn launch<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.spawn(task)
    }

    /// Stops the workers without waiting for unfinished tasks.
    pub fn shutdown(self) {
        tracing::debug!("global scope shutting down");
        self.runtime.shutdown_background();
    }
}

/// Runs the future built by `make` to completion on the calling thread,
/// blocking it meanwhile.
///
/// `make` is called inside the runtime, so futures that need a timer or
/// reactor at construction (`tokio::time::sleep`, `timeout`) are safe to
/// build there. Builds a fresh single-threaded runtime each time, so it must
/// not be called from inside another runtime's async context.
pub fn run_blocking<F, Fut>(make: F) -> Result<Fut::Output, DemoError>
where
    F: FnOnce() -> Fut,
    Fut: Future,
{
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| DemoError::Runtime {
            kind: "blocking",
            source,
        })?;

    Ok(runtime.block_on(async move { make().await }))
}
