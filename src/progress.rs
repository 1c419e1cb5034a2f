//! Per-file outcome reporting.
//!
//! Reports one line per unlocked or failed file, plus a notice when the
//! source directory holds nothing to unlock. Notices go to **stderr** so
//! stdout stays parseable for scripts.

use std::io::Write;
use std::path::Path;

/// A single notice emitted by the orchestrator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnlockEvent<'a> {
    /// No eligible files were found in `dir`.
    NoFiles { dir: &'a Path, extension: &'a str },
    /// `file` was unlocked and written to the destination.
    Unlocked { file: &'a str },
    /// `file` could not be unlocked; `detail` is the utility's diagnostic.
    Failed { file: &'a str, detail: &'a str },
}

/// Receives unlock notices. Implementations write to stderr (human or JSON).
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: UnlockEvent<'_>);
}

/// Human-friendly lines on stderr: "✓ Unlocked: a.pdf".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: UnlockEvent<'_>) {
        let line = match &event {
            UnlockEvent::NoFiles { dir, extension } => format!(
                "No {} files found in {}\n",
                extension.to_uppercase(),
                dir.display()
            ),
            UnlockEvent::Unlocked { file } => format!("✓ Unlocked: {}\n", file),
            UnlockEvent::Failed { file, detail } => {
                format!("✗ Failed to unlock {}: {}\n", file, detail)
            }
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: UnlockEvent<'_>) {
        if let Ok(line) = serde_json::to_string(&event_json(&event)) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

fn event_json(event: &UnlockEvent<'_>) -> serde_json::Value {
    match event {
        UnlockEvent::NoFiles { dir, extension } => serde_json::json!({
            "event": "no_files",
            "dir": dir.display().to_string(),
            "extension": extension,
        }),
        UnlockEvent::Unlocked { file } => serde_json::json!({
            "event": "unlocked",
            "file": file,
        }),
        UnlockEvent::Failed { file, detail } => serde_json::json!({
            "event": "failed",
            "file": file,
            "detail": detail,
        }),
    }
}

/// No-op reporter when notices are disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: UnlockEvent<'_>) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    #[default]
    Human,
    Json,
}

impl ProgressMode {
    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
