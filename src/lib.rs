pub mod cli;
pub mod destination;
pub mod download;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod origin;

pub use error::{ErrorKind, FetchError};
pub use fetch::{Fetcher, TransferResult};
pub use logging::StepLogger;
