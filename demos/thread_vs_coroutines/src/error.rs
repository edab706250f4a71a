use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("failed to build the {kind} runtime")]
    Runtime {
        kind: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn thread `{name}`")]
    SpawnThread {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("thread `{name}` panicked")]
    ThreadPanicked { name: String },

    #[error("launched task did not complete")]
    Task(#[from] tokio::task::JoinError),
}
