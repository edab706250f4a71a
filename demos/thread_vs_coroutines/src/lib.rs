//! Threads vs. lightweight tasks
//!
//! A handful of small demonstrations contrasting OS threads with tokio tasks:
//!
//! - a blocking sleep (`std::thread::sleep`) parks the whole thread it runs on
//! - a suspending delay (`tokio::time::sleep`) hands the worker back to other tasks
//! - a spawned OS thread keeps the program alive, a launched task does not
//! - `run_blocking` turns async waiting back into a thread-blocking wait
//!
//! Every demo prints its lines through a [`Console`], which also records them
//! so the ordering can be checked afterwards.

pub mod console;
pub mod demos;
pub mod error;
pub mod scope;
pub mod settings;

use std::sync::OnceLock;
use std::thread;

pub use console::{Console, Line};
pub use demos::{Demo, ForegroundThreads};
pub use error::DemoError;
pub use scope::{run_blocking, GlobalScope};
pub use settings::Timings;

static ORIGIN: OnceLock<String> = OnceLock::new();

/// Name of the thread that started the program.
///
/// Captured by the first call and never changed afterwards, so a line printed
/// from a worker thread still reports the thread that kicked the work off.
pub fn origin() -> &'static str {
    ORIGIN.get_or_init(current_thread_name)
}

pub(crate) fn current_thread_name() -> String {
    let current = thread::current();
    match current.name() {
        Some(name) => name.to_owned(),
        None => format!("{:?}", current.id()),
    }
}
