use std::path::PathBuf;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;

use crate::destination::Destination;
use crate::download::{default_client, download_file};
use crate::error::FetchError;
use crate::logging::StepLogger;
use crate::origin::OriginUrl;

/// Outcome of a finished transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub bytes: u64,
    pub elapsed: Duration,
    pub path: PathBuf,
}

/// One origin, one destination, one GET.
pub struct Fetcher<'a> {
    client: Client,
    origin: OriginUrl,
    destination: Destination,
    log: &'a StepLogger,
    started: Instant,
}

impl<'a> Fetcher<'a> {
    /// `started` marks the beginning of the run and is used for the
    /// elapsed time reported at the end.
    pub fn new(
        origin: OriginUrl,
        destination: Destination,
        log: &'a StepLogger,
        started: Instant,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            client: default_client()?,
            origin,
            destination,
            log,
            started,
        })
    }

    /// Validates both inputs and builds a fetcher from raw strings.
    pub fn from_args(
        from: &str,
        to: &str,
        log: &'a StepLogger,
        started: Instant,
    ) -> Result<Self, FetchError> {
        let origin = OriginUrl::parse(from)?;
        let destination = Destination::resolve(to, log)?;
        Self::new(origin, destination, log, started)
    }

    pub fn run(&self) -> Result<TransferResult, FetchError> {
        self.destination.ensure_parent_dir(self.log)?;

        let path = self.destination.path();
        let bytes = download_file(&self.client, &self.origin, path, self.log)?;
        let elapsed = self.started.elapsed();

        self.log.step(format_args!(
            "downloaded {} bytes in {:?}, saved to {}",
            bytes,
            elapsed,
            path.display()
        ));

        Ok(TransferResult {
            bytes,
            elapsed,
            path: path.to_path_buf(),
        })
    }
}
