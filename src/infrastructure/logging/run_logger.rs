//! Per-run error log and transcript files.

use crate::error::AppError;
use chrono::{DateTime, Local, SecondsFormat};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Filename timestamp layout, e.g. `errors_20261016_142501.log`.
const FILE_STAMP: &str = "%Y%m%d_%H%M%S";

/// Append-only log artifacts for a single run.
///
/// [`RunLogger::open`] creates both files. The error log receives one
/// timestamped line per [`RunLogger::log_error`] call; the transcript file is
/// handed to the tracing subscriber (see [`super::init_tracing`]) so every
/// event the run emits is captured there.
///
/// Files are opened in append mode and named after the run start time, so
/// runs never overwrite each other. Buffers are flushed by [`RunLogger::close`]
/// and again on drop, so early returns still leave readable logs.
pub struct RunLogger {
    error_log_path: PathBuf,
    transcript_path: PathBuf,
    error_log: Mutex<Option<BufWriter<File>>>,
    transcript: Mutex<Option<File>>,
    errors_logged: AtomicUsize,
}

impl RunLogger {
    /// Opens the error log and transcript under `log_dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if the directory or either file cannot be created.
    pub fn open(log_dir: &Path, started_at: DateTime<Local>) -> Result<Self, AppError> {
        fs::create_dir_all(log_dir).map_err(|e| {
            AppError::io(format!("Failed to create log directory {}", log_dir.display()), e)
        })?;

        let stamp = started_at.format(FILE_STAMP).to_string();
        let error_log_path = log_dir.join(format!("errors_{stamp}.log"));
        let transcript_path = log_dir.join(format!("transcript_{stamp}.log"));

        let error_log = open_append(&error_log_path)?;
        let transcript = open_append(&transcript_path)?;

        Ok(Self {
            error_log_path,
            transcript_path,
            error_log: Mutex::new(Some(BufWriter::new(error_log))),
            transcript: Mutex::new(Some(transcript)),
            errors_logged: AtomicUsize::new(0),
        })
    }

    /// Appends `[<timestamp>] <message>` and, if given, an indented detail line.
    ///
    /// Never fails: a write error is reported through tracing instead, because
    /// losing a log line must not abort the run that is being logged.
    pub fn log_error(&self, message: &str, detail: Option<&str>) {
        self.errors_logged.fetch_add(1, Ordering::Relaxed);
        tracing::error!(detail = detail.unwrap_or_default(), "{}", message);

        let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        let mut guard = match self.error_log.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(writer) = guard.as_mut() else {
            tracing::warn!("Error log already closed, dropping: {}", message);
            return;
        };

        let mut result = writeln!(writer, "[{}] {}", timestamp, message);
        if let Some(detail) = detail {
            result = result.and_then(|_| writeln!(writer, "    {}", detail));
        }
        if let Err(e) = result.and_then(|_| writer.flush()) {
            tracing::warn!(
                "Failed to write to {}: {}",
                self.error_log_path.display(),
                e
            );
        }
    }

    /// Appends plain lines to the transcript without going through tracing.
    ///
    /// Used for the report printed to stdout at the end of a command, so the
    /// transcript holds the same summary the operator saw. Write errors are
    /// reported through tracing and otherwise ignored.
    pub fn write_transcript(&self, lines: &[String]) {
        let mut guard = match self.transcript.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(file) = guard.as_mut() else {
            return;
        };

        let result = lines.iter().try_for_each(|line| writeln!(file, "{}", line));
        if let Err(e) = result.and_then(|_| file.flush()) {
            tracing::warn!(
                "Failed to write to {}: {}",
                self.transcript_path.display(),
                e
            );
        }
    }

    /// `Error log: ...` and `Transcript: ...` lines for end-of-run output.
    pub fn log_path_lines(&self) -> Vec<String> {
        vec![
            format!("Error log:  {}", self.error_log_path.display()),
            format!("Transcript: {}", self.transcript_path.display()),
        ]
    }

    /// A second handle to the transcript file for the tracing subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if the handle cannot be cloned or the logger is closed.
    pub fn transcript_writer(&self) -> Result<File, AppError> {
        let guard = match self.transcript.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_ref() {
            Some(file) => file
                .try_clone()
                .map_err(|e| AppError::io("Failed to clone transcript handle", e)),
            None => Err(AppError::io(
                "Transcript already closed",
                std::io::Error::other("closed"),
            )),
        }
    }

    pub fn error_log_path(&self) -> &Path {
        &self.error_log_path
    }

    pub fn transcript_path(&self) -> &Path {
        &self.transcript_path
    }

    /// Number of `log_error` calls so far.
    pub fn errors_logged(&self) -> usize {
        self.errors_logged.load(Ordering::Relaxed)
    }

    /// Flushes and closes both files. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if a final flush fails.
    pub fn close(&self) -> Result<(), AppError> {
        let error_log = match self.error_log.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(mut writer) = error_log {
            writer
                .flush()
                .map_err(|e| AppError::io("Failed to flush error log", e))?;
        }

        let transcript = match self.transcript.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(mut file) = transcript {
            file.flush()
                .map_err(|e| AppError::io("Failed to flush transcript", e))?;
        }

        Ok(())
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Failed to close run logs: {}", e);
        }
    }
}

fn open_append(path: &Path) -> Result<File, AppError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::io(format!("Failed to open {}", path.display()), e))
}
