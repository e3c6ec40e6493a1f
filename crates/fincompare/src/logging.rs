//! File logging for CLI runs
//!
//! Every run appends to `<data_dir>/fincompare.log`. Before opening it, a log
//! grown past [`LogLimits::max_bytes`] is cut down to its most recent
//! [`LogLimits::keep_bytes`], starting at a line boundary.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE: &str = "fincompare.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLimits {
    pub max_bytes: u64,
    pub keep_bytes: u64,
}

impl Default for LogLimits {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            keep_bytes: 1024 * 1024,
        }
    }
}

/// What happened to an existing log before a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trim {
    NoLog,
    WithinLimits,
    Trimmed { dropped_bytes: u64 },
}

/// Cut `path` down to the tail allowed by `limits`
pub fn trim_log(path: &Path, limits: LogLimits) -> io::Result<Trim> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Trim::NoLog),
        Err(e) => return Err(e),
    };
    if size <= limits.max_bytes {
        return Ok(Trim::WithinLimits);
    }

    let mut tail = Vec::new();
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(size.saturating_sub(limits.keep_bytes)))?;
    file.read_to_end(&mut tail)?;

    let line_start = tail
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |newline| newline + 1);
    let kept = &tail[line_start..];
    let dropped_bytes = size - kept.len() as u64;

    let mut file = File::create(path)?;
    writeln!(
        file,
        "--- log trimmed at {} ({dropped_bytes} older bytes dropped) ---",
        jiff::Timestamp::now()
    )?;
    file.write_all(kept)?;

    Ok(Trim::Trimmed { dropped_bytes })
}

/// Shared handle to the open log file; each event writes through a clone
#[derive(Clone)]
struct SharedLog(Arc<Mutex<File>>);

impl SharedLog {
    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut file)
    }
}

impl Write for SharedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for SharedLog {
    type Writer = SharedLog;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Filter used when `RUST_LOG` is not set: the CLI at `level`, the engine at `warn`
pub fn default_filter(level: &str) -> String {
    format!("fincompare={level},fincompare_core=warn")
}

/// Start logging to `{data_dir}/fincompare.log` and return the log path
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE);

    let trim = trim_log(&log_path, LogLimits::default()).unwrap_or_else(|e| {
        eprintln!("Warning: could not trim {}: {e}", log_path.display());
        Trim::WithinLimits
    });

    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(SharedLog(Arc::new(Mutex::new(file))))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    if let Trim::Trimmed { dropped_bytes } = trim {
        tracing::info!(dropped_bytes, "log trimmed");
    }
    tracing::info!(log_path = %log_path.display(), "logging initialized");
    Ok(log_path)
}
