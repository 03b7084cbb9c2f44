//! File-backed `log` sink. The terminal belongs to the UI, so records never go to stderr.

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file: {0}")]
    Open(#[from] std::io::Error),
    #[error("a logger is already installed")]
    AlreadySet(#[from] log::SetLoggerError),
}

struct FileLogger {
    level: LevelFilter,
    out: Mutex<LineWriter<File>>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(
                out,
                "{secs:.3} {:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.flush();
        }
    }
}

/// Append log records at `level` and above to `path`.
pub fn init(path: &Path, level: LevelFilter) -> Result<(), LoggingError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let logger = FileLogger {
        level,
        out: Mutex::new(LineWriter::new(file)),
    };
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}
