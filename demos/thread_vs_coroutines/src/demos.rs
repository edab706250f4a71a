//! The demonstrations themselves.
//!
//! Each one prints a "start" line, waits in some way and prints an "end"
//! line. What differs is *what* waits: an OS thread, a task parking its
//! worker, a task suspending on a timer, or the calling thread itself.

use std::fmt;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use clap::ValueEnum;
use futures::future::join_all;

use crate::scope::{run_blocking, GlobalScope};
use crate::{origin, Console, DemoError, Timings};

/// Label of the work done on a plain OS thread.
pub const THREAD_WORK: &str = "Fake work1";
/// Label of the work done inside a launched task.
pub const TASK_WORK: &str = "Fake work 2";

const THREAD_NAME: &str = "worker-1";

pub fn start_of(work: &str) -> String {
    format!("{work} start {}", origin())
}

pub fn end_of(work: &str) -> String {
    format!("{work} end {}", origin())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// A background OS thread; the program waits for it before exiting
    Thread,
    /// A launched task that blocks its worker, waited for by sleeping the caller
    GlobalLaunch,
    /// A launched task that suspends; nobody waits for it
    Delay,
    /// A launched task, waited for with `run_blocking { delay }`
    RunBlocking,
    /// The launch happens inside `run_blocking`
    RunBlockingNested,
    /// Waits for the launched task by joining it
    Join,
    /// Blocking sleeps inside tasks stall every task sharing the thread
    BlockingInTask,
}

impl Demo {
    /// Runs the demo and returns the OS threads the caller still has to join.
    pub fn run(
        self,
        console: &Console,
        scope: &GlobalScope,
        timings: &Timings,
    ) -> Result<ForegroundThreads, DemoError> {
        tracing::info!(demo = %self, "running demo");

        match self {
            Demo::Thread => thread_example(console, timings),
            Demo::GlobalLaunch => {
                global_launch_example(console, scope, timings);
                Ok(ForegroundThreads::default())
            }
            Demo::Delay => {
                delay_example(console, scope, timings);
                Ok(ForegroundThreads::default())
            }
            Demo::RunBlocking => {
                run_blocking_example(console, scope, timings)?;
                Ok(ForegroundThreads::default())
            }
            Demo::RunBlockingNested => {
                run_blocking_nested_example(console, scope, timings)?;
                Ok(ForegroundThreads::default())
            }
            Demo::Join => {
                join_example(console, scope, timings)?;
                Ok(ForegroundThreads::default())
            }
            Demo::BlockingInTask => {
                blocking_in_task_example(console, timings)?;
                Ok(ForegroundThreads::default())
            }
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{self:?}"),
        }
    }
}

/// OS threads that keep the program alive until joined.
#[derive(Debug, Default)]
#[must_use = "foreground threads must be joined before the program exits"]
pub struct ForegroundThreads {
    handles: Vec<(String, JoinHandle<()>)>,
}

impl ForegroundThreads {
    fn push(&mut self, name: &str, handle: JoinHandle<()>) {
        self.handles.push((name.to_owned(), handle));
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Blocks until every thread has finished.
    pub fn join(self) -> Result<(), DemoError> {
        for (name, handle) in self.handles {
            tracing::debug!(thread = %name, "waiting for foreground thread");
            handle
                .join()
                .map_err(|_| DemoError::ThreadPanicked { name })?;
        }
        Ok(())
    }
}

/// Spawns a worker thread that sleeps, without waiting for it.
pub fn thread_example(console: &Console, timings: &Timings) -> Result<ForegroundThreads, DemoError> {
    let console = console.clone();
    let work = timings.thread_work();

    let handle = thread::Builder::new()
        .name(THREAD_NAME.into())
        .spawn(move || {
            console.say(start_of(THREAD_WORK));
            thread::sleep(work);
            console.say(end_of(THREAD_WORK));
        })
        .map_err(|source| DemoError::SpawnThread {
            name: THREAD_NAME.into(),
            source,
        })?;

    let mut foreground = ForegroundThreads::default();
    foreground.push(THREAD_NAME, handle);
    Ok(foreground)
}

/// Launches a task that blocks its worker, then blocks the caller long
/// enough for the task to finish.
pub fn global_launch_example(console: &Console, scope: &GlobalScope, timings: &Timings) {
    let task_console = console.clone();
    let work = timings.task_work();

    scope.launch(async move {
        task_console.say(start_of(TASK_WORK));
        // Parks the worker thread, not just this task
        thread::sleep(work);
        task_console.say(end_of(TASK_WORK));
    });

    thread::sleep(timings.main_wait());
}

/// Launches a task that suspends and returns straight away.
pub fn delay_example(console: &Console, scope: &GlobalScope, timings: &Timings) {
    launch_delayed_work(console, scope, timings.task_work());
}

/// Launches a suspending task, then blocks the caller with an async delay.
pub fn run_blocking_example(
    console: &Console,
    scope: &GlobalScope,
    timings: &Timings,
) -> Result<(), DemoError> {
    launch_delayed_work(console, scope, timings.task_work());

    // Same effect as thread::sleep(main_wait)
    let wait = timings.main_wait();
    run_blocking(move || tokio::time::sleep(wait))
}

/// Like [`run_blocking_example`], but the launch happens inside the blocking scope.
pub fn run_blocking_nested_example(
    console: &Console,
    scope: &GlobalScope,
    timings: &Timings,
) -> Result<(), DemoError> {
    run_blocking(move || async move {
        launch_delayed_work(console, scope, timings.task_work());
        tokio::time::sleep(timings.main_wait()).await;
    })
}

/// Waits for the launched task by joining it instead of guessing a duration.
pub fn join_example(
    console: &Console,
    scope: &GlobalScope,
    timings: &Timings,
) -> Result<(), DemoError> {
    run_blocking(move || async move {
        let job = launch_delayed_work(console, scope, timings.task_work());
        job.await?;
        Ok::<_, DemoError>(())
    })?
}

fn launch_delayed_work(
    console: &Console,
    scope: &GlobalScope,
    work: Duration,
) -> tokio::task::JoinHandle<()> {
    let console = console.clone();
    scope.launch(async move {
        console.say(start_of(TASK_WORK));
        // Suspends the task; the worker is free for other tasks meanwhile
        tokio::time::sleep(work).await;
        console.say(end_of(TASK_WORK));
    })
}

/// Wall-clock time taken by two tasks sharing a single thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooperation {
    /// Both tasks sleep with `std::thread::sleep`.
    pub blocking: Duration,
    /// Both tasks sleep with `tokio::time::sleep`.
    pub suspending: Duration,
}

pub fn blocking_in_task_example(console: &Console, timings: &Timings) -> Result<Cooperation, DemoError> {
    let cooperation = measure_cooperation(console, timings.task_work())?;

    console.say(format!(
        "Two blocking tasks took {} ms on one thread",
        cooperation.blocking.as_millis()
    ));
    console.say(format!(
        "Two suspending tasks took {} ms on one thread",
        cooperation.suspending.as_millis()
    ));
    Ok(cooperation)
}

/// Runs two blocking tasks, then two suspending tasks, on one thread.
pub fn measure_cooperation(console: &Console, work: Duration) -> Result<Cooperation, DemoError> {
    run_blocking(move || async move {
        let blocking = time_pair(|n| {
            let console = console.clone();
            async move {
                console.say(format!("Blocking task {n} start"));
                thread::sleep(work);
                console.say(format!("Blocking task {n} end"));
            }
        })
        .await?;

        let suspending = time_pair(|n| {
            let console = console.clone();
            async move {
                console.say(format!("Suspending task {n} start"));
                tokio::time::sleep(work).await;
                console.say(format!("Suspending task {n} end"));
            }
        })
        .await?;

        Ok::<_, DemoError>(Cooperation {
            blocking,
            suspending,
        })
    })?
}

async fn time_pair<F, Fut>(make: F) -> Result<Duration, DemoError>
where
    F: Fn(usize) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let started = Instant::now();
    let handles: Vec<_> = (1..=2).map(|n| tokio::spawn(make(n))).collect();

    for result in join_all(handles).await {
        result?;
    }
    Ok(started.elapsed())
}
