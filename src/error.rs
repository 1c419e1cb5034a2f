//! Error types for unlock runs.
//!
//! [`UnlockError`] aborts a whole run. [`DecryptFailure`] belongs to a single
//! file and is recorded in the run result instead of being propagated.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal error for a run. No partial result is produced.
#[derive(Debug, Error)]
pub enum UnlockError {
    /// A required setting (the password) is missing or a setting is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The source directory cannot be read or the destination cannot be created.
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UnlockError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UnlockError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Why the decryption utility did not unlock one file.
#[derive(Debug, Error)]
pub enum DecryptFailure {
    /// The utility could not be started (not installed, not executable).
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The utility ran and exited with a non-zero status.
    #[error("{}", exit_detail(.code, .stderr))]
    Exit { code: Option<i32>, stderr: String },

    /// The utility did not finish within the configured timeout and was killed.
    #[error("timed out after {0}s")]
    Timeout(u64),
}

impl DecryptFailure {
    /// Text shown to the operator: the utility's own diagnostics when it printed any.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

fn exit_detail(code: &Option<i32>, stderr: &str) -> String {
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match code {
        Some(code) => format!("command failed with exit status {}", code),
        None => "command terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_detail_prefers_stderr() {
        let failure = DecryptFailure::Exit {
            code: Some(2),
            stderr: "invalid password".to_string(),
        };
        assert_eq!(failure.detail(), "invalid password");
    }

    #[test]
    fn exit_detail_falls_back_to_status() {
        let failure = DecryptFailure::Exit {
            code: Some(2),
            stderr: String::new(),
        };
        assert_eq!(failure.detail(), "command failed with exit status 2");

        let killed = DecryptFailure::Exit {
            code: None,
            stderr: String::new(),
        };
        assert_eq!(killed.detail(), "command terminated by signal");
    }

    #[test]
    fn filesystem_error_names_path() {
        let err = UnlockError::fs(
            "/nope",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/nope"));
        assert!(msg.contains("missing"));
    }
}
