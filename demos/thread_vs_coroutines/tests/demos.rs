use std::thread;
use std::time::Instant;

use thread_vs_coroutines::demos::{end_of, start_of, TASK_WORK, THREAD_WORK};
use thread_vs_coroutines::scope::WORKER_NAME;
use thread_vs_coroutines::{Console, Demo, GlobalScope, Timings};

const MAIN_ENDS: &str = "main ends";

fn timings() -> Timings {
    Timings {
        thread_work_ms: 150,
        task_work_ms: 100,
        main_wait_ms: 400,
        workers: 2,
    }
}

/// Runs a demo the way the binary does and returns the transcript.
fn run_like_main(demo: Demo, timings: &Timings) -> Console {
    let console = Console::silent();
    let scope = GlobalScope::new(timings.workers).unwrap();

    let foreground = demo.run(&console, &scope, timings).unwrap();
    console.say(MAIN_ENDS);
    foreground.join().unwrap();
    scope.shutdown();

    console
}

fn assert_task_finished_before_main(console: &Console) {
    let start = console.position(&start_of(TASK_WORK)).expect("task started");
    let end = console.position(&end_of(TASK_WORK)).expect("task finished");
    let main_ends = console.position(MAIN_ENDS).unwrap();
    assert!(start < end && end < main_ends, "{:?}", console.texts());
}

#[test]
fn thread_outlives_main_but_is_waited_for() {
    let console = run_like_main(Demo::Thread, &timings());

    let end = console.position(&end_of(THREAD_WORK)).expect("thread finished");
    let main_ends = console.position(MAIN_ENDS).unwrap();
    assert!(main_ends < end, "{:?}", console.texts());
    assert!(console.position(&start_of(THREAD_WORK)).is_some());

    let lines = console.lines();
    assert_eq!(lines[end].thread, "worker-1");
}

#[test]
fn thread_demo_returns_without_waiting() {
    let timings = timings();
    let console = Console::silent();
    let scope = GlobalScope::new(1).unwrap();

    let started = Instant::now();
    let foreground = Demo::Thread.run(&console, &scope, &timings).unwrap();
    assert!(started.elapsed() < timings.thread_work());
    assert_eq!(foreground.len(), 1);

    foreground.join().unwrap();
    assert!(console.position(&end_of(THREAD_WORK)).is_some());
    scope.shutdown();
}

#[test]
fn global_launch_blocks_the_caller_until_the_wait_elapses() {
    let timings = timings();
    let started = Instant::now();
    let console = run_like_main(Demo::GlobalLaunch, &timings);

    assert!(started.elapsed() >= timings.main_wait());
    assert_task_finished_before_main(&console);

    let lines = console.lines();
    let start = console.position(&start_of(TASK_WORK)).unwrap();
    assert!(lines[start].thread.starts_with(WORKER_NAME), "{:?}", lines[start]);
}

#[test]
fn delayed_task_is_abandoned_when_nobody_waits() {
    let timings = timings();
    let console = run_like_main(Demo::Delay, &timings);

    // Give an orphaned task every chance to print
    thread::sleep(timings.task_work() * 3);

    assert!(console.position(MAIN_ENDS).is_some());
    assert_eq!(console.position(&end_of(TASK_WORK)), None, "{:?}", console.texts());
}

#[test]
fn run_blocking_waits_like_a_sleep() {
    let timings = timings();
    let started = Instant::now();
    let console = run_like_main(Demo::RunBlocking, &timings);

    assert!(started.elapsed() >= timings.main_wait());
    assert_task_finished_before_main(&console);
}

#[test]
fn nested_launch_inside_run_blocking_behaves_the_same() {
    let timings = timings();
    let started = Instant::now();
    let console = run_like_main(Demo::RunBlockingNested, &timings);

    assert!(started.elapsed() >= timings.main_wait());
    assert_task_finished_before_main(&console);
}

#[test]
fn join_waits_only_as_long_as_the_task() {
    let timings = timings();
    let started = Instant::now();
    let console = run_like_main(Demo::Join, &timings);
    let elapsed = started.elapsed();

    assert!(elapsed >= timings.task_work());
    assert!(elapsed < timings.main_wait(), "took {elapsed:?}");
    assert_task_finished_before_main(&console);
}

#[test]
fn blocking_sleeps_serialise_tasks_on_one_thread() {
    let timings = Timings {
        task_work_ms: 60,
        ..timings()
    };
    let console = Console::silent();

    let cooperation =
        thread_vs_coroutines::demos::blocking_in_task_example(&console, &timings).unwrap();

    let work = timings.task_work();
    assert!(cooperation.blocking >= work * 2, "{cooperation:?}");
    assert!(cooperation.suspending >= work, "{cooperation:?}");
    assert!(cooperation.suspending < work * 2, "{cooperation:?}");

    let texts = console.texts();
    assert!(texts[texts.len() - 2].starts_with("Two blocking tasks took"));
    assert!(texts[texts.len() - 1].starts_with("Two suspending tasks took"));
}

#[test]
fn every_demo_runs_with_tiny_timings() {
    use clap::ValueEnum;

    let timings = Timings {
        thread_work_ms: 5,
        task_work_ms: 5,
        main_wait_ms: 20,
        workers: 1,
    };

    for demo in Demo::value_variants() {
        let console = run_like_main(*demo, &timings);
        assert!(console.position(MAIN_ENDS).is_some(), "{demo}");
    }
}

#[test]
fn suspended_tasks_share_a_single_worker() {
    let timings = timings();
    let console = Console::silent();
    let scope = GlobalScope::new(1).unwrap();

    // Three suspending launches on one worker still overlap
    let started = Instant::now();
    let jobs: Vec<_> = (0..3)
        .map(|_| {
            let console = console.clone();
            let work = timings.task_work();
            scope.launch(async move {
                tokio::time::sleep(work).await;
                console.say("done");
            })
        })
        .collect();

    let results = thread_vs_coroutines::run_blocking(move || futures::future::join_all(jobs)).unwrap();
    for result in results {
        result.unwrap();
    }

    assert!(started.elapsed() < timings.task_work() * 3);
    assert_eq!(console.texts(), vec!["done"; 3]);
    scope.shutdown();
}
