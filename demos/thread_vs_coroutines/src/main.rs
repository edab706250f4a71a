// Example: Threads vs. coroutines
// Pick a demo on the command line instead of un-commenting a call in main

use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser};
use thread_vs_coroutines::{origin, Console, Demo, GlobalScope, Timings};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(version, about = "Threads vs. lightweight tasks, one demo at a time")]
struct Cli {
    /// Which demonstration to run
    #[clap(value_enum, default_value_t = Demo::Thread)]
    demo: Demo,

    #[clap(flatten)]
    timings: Timings,

    /// Enables verbose logging on stderr
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    // Capture before anything else so every line reports the main thread
    let origin = origin();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli, origin) {
        tracing::error!("{err:?}");
        process::exit(1);
    }
}

fn run(cli: Cli, origin: &str) -> anyhow::Result<()> {
    let console = Console::stdout();
    let scope = GlobalScope::new(cli.timings.workers).context("starting the global scope")?;

    console.say(format!("Main program start {origin}"));

    let foreground = cli
        .demo
        .run(&console, &scope, &cli.timings)
        .with_context(|| format!("running the `{}` demo", cli.demo))?;

    console.say(format!("Main program ends {origin}"));

    // OS threads keep the program alive, launched tasks do not
    foreground.join().context("waiting for foreground threads")?;
    scope.shutdown();

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .init();
}
