//! Console + file logging behind the `log` facade.
//!
//! Console output is `env_logger` (so `RUST_LOG` works as usual). When a log
//! file is configured, every record that passes the console filter is also
//! appended to it as one `[LEVEL]message` line:
//!
//! ```text
//! [INFO]Loaded texture 'apple' from ./assets/apple.png as tex#1
//! [ERROR]Grass #4 update failed: ...
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use log::{Level, Log, Metadata, Record};

use crate::config::LogConfig;

/// Append-only log file, flushed after every line.
pub struct LogFile {
    file: Mutex<File>,
}

impl LogFile {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    pub fn write_record(&self, record: &Record<'_>) {
        let line = format_line(record.level(), record.args());
        // A poisoned lock only means another thread panicked mid-write.
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(file, "{line}").and_then(|()| file.flush());
    }
}

/// `[INFO]message`
pub fn format_line(level: Level, message: &std::fmt::Arguments<'_>) -> String {
    format!("[{level}]{message}")
}

pub struct EngineLogger {
    console: env_logger::Logger,
    file: Option<LogFile>,
}

impl EngineLogger {
    /// Build the logger without installing it. Returns the file error, if
    /// any, alongside a console-only logger.
    pub fn new(config: &LogConfig) -> (Self, Option<io::Error>) {
        let filter = format!(
            "{},wgpu_core=warn,wgpu_hal=warn,naga=warn",
            config.level
        );
        let console =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
                .build();

        let (file, error) = match &config.log_file {
            Some(path) => match LogFile::open(path) {
                Ok(file) => (Some(file), None),
                Err(e) => (None, Some(e)),
            },
            None => (None, None),
        };
        (Self { console, file }, error)
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }
}

impl Log for EngineLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.console.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.console.matches(record) {
            return;
        }
        self.console.log(record);
        if let Some(file) = &self.file {
            file.write_record(record);
        }
    }

    fn flush(&self) {
        self.console.flush();
    }
}

/// Install the engine logger as the global `log` backend.
///
/// A log file that cannot be opened is reported through the logger itself
/// and file output is skipped.
pub fn init(config: &LogConfig) -> Result<(), log::SetLoggerError> {
    let (logger, file_error) = EngineLogger::new(config);
    let max_level = logger.console.filter();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(max_level);

    if let (Some(e), Some(path)) = (file_error, &config.log_file) {
        log::warn!("Cannot open log file {}: {e}; logging to console only", path.display());
    }
    Ok(())
}
