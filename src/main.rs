use anyhow::Result;
use clap::Parser;
use log::error;
use std::time::Instant;

use fetchfile::cli::Args;
use fetchfile::{logging, FetchError, Fetcher, StepLogger};

fn abort(log: &StepLogger, e: FetchError) -> ! {
    log.step(format_args!("{}, aborting..", e.kind()));
    error!("{}", e);
    std::process::exit(1);
}

fn main() -> Result<()> {
    let args = Args::parse();
    let started = Instant::now();

    let log_file = logging::init(args.verbose, args.log_file.as_deref())?;

    let log = StepLogger::new(args.verbose);
    log.step("parsed flags");

    let fetcher = match Fetcher::from_args(&args.from, &args.to, &log, started) {
        Ok(fetcher) => fetcher,
        Err(e) => abort(&log, e),
    };

    // Inputs are valid from here on, so the log file may be created.
    if let Some(file) = &log_file {
        file.open()?;
    }

    match fetcher.run() {
        Ok(_) => {
            println!("Done!");
            Ok(())
        }
        Err(e) => abort(&log, e),
    }
}
