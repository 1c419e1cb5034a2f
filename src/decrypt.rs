//! External decryption utility invocation.
//!
//! [`Decryptor`] is the seam between the orchestrator and whatever removes
//! the password from a single file. [`QpdfDecryptor`] is the built-in
//! implementation and runs `qpdf` once per file.
//!
//! Arguments are always passed as a vector, never through a shell, so
//! passwords and paths containing spaces, quotes or `$` reach qpdf verbatim.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::error::DecryptFailure;
use crate::models::Password;

/// Removes password protection from one file.
///
/// Implementations write the unlocked document to `dest`. When `src` and
/// `dest` are the same path the file is rewritten in place.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use pdf_unlock::decrypt::Decryptor;
/// use pdf_unlock::error::DecryptFailure;
/// use pdf_unlock::models::Password;
/// use std::path::Path;
///
/// struct CopyDecryptor;
///
/// #[async_trait]
/// impl Decryptor for CopyDecryptor {
///     async fn decrypt(&self, _pw: &Password, src: &Path, dest: &Path) -> Result<(), DecryptFailure> {
///         if src != dest {
///             std::fs::copy(src, dest).map_err(|e| DecryptFailure::Spawn {
///                 program: "copy".into(),
///                 source: e,
///             })?;
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Decryptor: Send + Sync {
    async fn decrypt(
        &self,
        password: &Password,
        src: &Path,
        dest: &Path,
    ) -> Result<(), DecryptFailure>;
}

/// Runs `qpdf --password=<pw> --decrypt <src> <dest>`.
#[derive(Debug, Clone)]
pub struct QpdfDecryptor {
    program: String,
    timeout: Option<Duration>,
}

impl Default for QpdfDecryptor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PROGRAM)
    }
}

impl QpdfDecryptor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.timeout = secs.map(Duration::from_secs);
        self
    }

    fn command(&self, password: &Password, src: &Path, dest: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(format!("--password={}", password.expose()));
        cmd.arg("--decrypt");
        cmd.arg(src);
        // qpdf refuses to write over its own input unless asked to.
        if src == dest {
            cmd.arg("--replace-input");
        } else {
            cmd.arg(dest);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Decryptor for QpdfDecryptor {
    async fn decrypt(
        &self,
        password: &Password,
        src: &Path,
        dest: &Path,
    ) -> Result<(), DecryptFailure> {
        let dest_existed = dest.exists();
        let result = self.run(password, src, dest).await;

        if result.is_err() && !dest_existed && src != dest && dest.exists() {
            // Don't leave partial output behind for a file that failed.
            if let Err(e) = std::fs::remove_file(dest) {
                tracing::warn!(path = %dest.display(), error = %e, "failed to remove partial output");
            }
        }

        result
    }
}

impl QpdfDecryptor {
    async fn run(&self, password: &Password, src: &Path, dest: &Path) -> Result<(), DecryptFailure> {
        tracing::debug!(
            program = %self.program,
            src = %src.display(),
            dest = %dest.display(),
            "invoking decryptor"
        );

        let child = self
            .command(password, src, dest)
            .spawn()
            .map_err(|e| DecryptFailure::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                // Dropping the future drops the child, and kill_on_drop reaps it.
                Err(_) => return Err(DecryptFailure::Timeout(limit.as_secs())),
            },
            None => child.wait_with_output().await,
        }
        .map_err(|e| DecryptFailure::Spawn {
            program: self.program.clone(),
            source: e,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DecryptFailure::Exit {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(())
    }
}
