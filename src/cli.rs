use clap::Parser;
use std::path::PathBuf;

/// Download a single file over HTTP into a local path
#[derive(Parser, Debug)]
#[command(name = "fetchfile")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Origin of the file (absolute http/https URL)
    #[arg(long, value_name = "URL")]
    pub from: String,

    /// Destination of the file, including the file name
    #[arg(long, value_name = "PATH", default_value = "./")]
    pub to: String,

    /// Log every step to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write log records to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}
