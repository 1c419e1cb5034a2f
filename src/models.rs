//! Core data models used throughout pdf-unlock.
//!
//! These types describe a single unlock job, the files discovered for it,
//! and the outcome handed back to the caller.

use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// The secret passed to the decryption utility.
///
/// `Debug` is redacted so a password never ends up in logs or panic output.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl From<&str> for Password {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for Password {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

/// One unlock run: where to read, which password to use, where to write.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub source_dir: PathBuf,
    pub password: Password,
    /// Destination directory. `None` means unlock in place.
    pub out_dir: Option<PathBuf>,
    /// Eligible file extension without the leading dot, matched case-insensitively.
    pub extension: String,
}

impl JobRequest {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        password: impl Into<Password>,
        out_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            password: password.into(),
            out_dir,
            extension: crate::config::DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

/// A file found directly inside the source directory that will be unlocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Name as stored on disk; output paths are built from this.
    pub os_name: OsString,
    /// Lossy UTF-8 form for results and notices.
    pub file_name: String,
    pub path: PathBuf,
}

/// Outcome of a run, in directory-listing order.
///
/// Every candidate lands in exactly one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub processed: Vec<String>,
    pub failed: Vec<String>,
}

impl RunResult {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }
}
