use anyhow::{anyhow, Context, Result};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::cell::Cell;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Installs the global logger. Verbose mode lets step lines through, otherwise
/// only errors reach the terminal.
///
/// With `log_file` set, records are also mirrored to that file. The file is
/// not created until [`LogFile::open`] is called; earlier records are held in
/// memory and written out then.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<Option<LogFile>> {
    let level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Error
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .add_filter_allow_str(env!("CARGO_CRATE_NAME"))
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    )];

    let log_file = log_file.map(LogFile::pending);
    if let Some(file) = &log_file {
        loggers.push(WriteLogger::new(level, config, file.writer()));
    }

    CombinedLogger::init(loggers).context("Failed to install logger")?;

    Ok(log_file)
}

enum LogFileState {
    Pending(Vec<u8>),
    Open(fs::File),
}

/// Log file whose creation is deferred until the run's inputs are valid.
pub struct LogFile {
    path: PathBuf,
    state: Arc<Mutex<LogFileState>>,
}

impl LogFile {
    fn pending(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            state: Arc::new(Mutex::new(LogFileState::Pending(Vec::new()))),
        }
    }

    fn writer(&self) -> LogFileWriter {
        LogFileWriter(Arc::clone(&self.state))
    }

    /// Creates the file and flushes everything logged so far into it.
    pub fn open(&self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow!("log file lock poisoned"))?;

        if let LogFileState::Pending(buffered) = &mut *state {
            let mut file = fs::File::create(&self.path)
                .with_context(|| format!("Failed to create log file {:?}", self.path))?;
            file.write_all(&mem::take(buffered))
                .with_context(|| format!("Failed to write log file {:?}", self.path))?;
            *state = LogFileState::Open(file);
        }

        Ok(())
    }
}

struct LogFileWriter(Arc<Mutex<LogFileState>>);

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        match &mut *state {
            LogFileState::Pending(buffered) => {
                buffered.extend_from_slice(buf);
                Ok(buf.len())
            }
            LogFileState::Open(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        match &mut *state {
            LogFileState::Pending(_) => Ok(()),
            LogFileState::Open(file) => file.flush(),
        }
    }
}

/// Step-by-step diagnostics for a single run. Built once from the verbose
/// flag and handed to every stage.
#[derive(Debug)]
pub struct StepLogger {
    verbose: bool,
    emitted: Cell<usize>,
}

impl StepLogger {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            emitted: Cell::new(0),
        }
    }

    pub fn step(&self, msg: impl fmt::Display) {
        if !self.verbose {
            return;
        }
        log::info!("-> {}", msg);
        self.emitted.set(self.emitted.get() + 1);
    }

    /// Number of step lines written so far.
    pub fn emitted(&self) -> usize {
        self.emitted.get()
    }
}
