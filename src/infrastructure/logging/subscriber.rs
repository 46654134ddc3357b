//! Tracing subscriber setup: console output plus the run transcript.

use anyhow::Result;
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Installs the global subscriber.
///
/// - Console layer: human-readable text or JSON, per `log_format`
/// - Transcript layer: plain text without ANSI codes, written to `transcript`
///
/// Both layers share one `EnvFilter` built from `log_level`; an unparsable
/// filter falls back to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(log_level: &str, log_format: &str, transcript: Option<File>) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).or_else(|_| EnvFilter::try_new("info"))?;

    let console = match log_format {
        "json" => fmt::layer().json().with_target(false).boxed(),
        _ => fmt::layer().with_target(false).boxed(),
    };

    let transcript = transcript.map(transcript_layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(transcript)
        .try_init()?;

    Ok(())
}

/// Plain-text layer writing every event to the run transcript.
fn transcript_layer<S>(file: File) -> fmt::Layer<S, DefaultFields, Format, Mutex<File>> {
    fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::RunLogger;
    use chrono::Local;

    #[test]
    fn test_events_reach_transcript_without_ansi() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::open(dir.path(), Local::now()).unwrap();

        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(transcript_layer(logger.transcript_writer().unwrap()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(created = 3, "Run finished");
            tracing::error!("Failed to create link 'Beta'");
            tracing::debug!("filtered out");
        });
        logger.close().unwrap();

        let content = std::fs::read_to_string(logger.transcript_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("Run finished created=3"));
        assert!(lines[1].contains("ERROR"));
        assert!(lines[1].contains("Failed to create link 'Beta'"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    fn test_log_error_is_captured_in_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::open(dir.path(), Local::now()).unwrap();

        let subscriber = tracing_subscriber::registry()
            .with(transcript_layer(logger.transcript_writer().unwrap()));
        tracing::subscriber::with_default(subscriber, || {
            logger.log_error("Rejected input row 3", Some("URL is empty"));
        });
        logger.close().unwrap();

        let transcript = std::fs::read_to_string(logger.transcript_path()).unwrap();
        assert!(transcript.contains("Rejected input row 3"));
        assert!(transcript.contains("URL is empty"));
    }
}
