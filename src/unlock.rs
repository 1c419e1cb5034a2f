//! Batch unlock orchestration.
//!
//! Coordinates a run: path resolution → scan → destination setup →
//! sequential per-file decryption. A failing file is recorded and skipped;
//! only filesystem problems with the source or destination abort the run.
//! Nothing here terminates the process.

use std::path::{Component, Path, PathBuf};

use crate::decrypt::{Decryptor, QpdfDecryptor};
use crate::error::UnlockError;
use crate::models::{JobRequest, Password, RunResult};
use crate::progress::{ProgressReporter, StderrProgress, UnlockEvent};
use crate::scan;

/// Unlock every eligible file in `source_dir` with qpdf.
///
/// `out_dir` defaults to `source_dir`, in which case files are rewritten in
/// place. Notices are printed to stderr.
pub async fn unlock(
    source_dir: impl AsRef<Path>,
    password: impl Into<Password>,
    out_dir: Option<&Path>,
) -> Result<RunResult, UnlockError> {
    let request = JobRequest::new(
        source_dir.as_ref(),
        password,
        out_dir.map(Path::to_path_buf),
    );
    unlock_dir(&request, &QpdfDecryptor::default(), &StderrProgress).await
}

/// Run one job with an explicit decryptor and reporter.
///
/// Files are processed one at a time in directory-listing order, and each
/// appears in exactly one of `processed` or `failed`.
pub async fn unlock_dir(
    request: &JobRequest,
    decryptor: &dyn Decryptor,
    reporter: &dyn ProgressReporter,
) -> Result<RunResult, UnlockError> {
    let source = resolve_path(&request.source_dir)?;
    let dest = match &request.out_dir {
        Some(dir) => resolve_path(dir)?,
        None => source.clone(),
    };
    let in_place = source == dest;

    tracing::info!(
        source = %source.display(),
        dest = %dest.display(),
        in_place,
        "starting unlock run"
    );

    let candidates = scan::scan_candidates(&source, &request.extension)?;

    if candidates.is_empty() {
        reporter.report(UnlockEvent::NoFiles {
            dir: &source,
            extension: &request.extension,
        });
        return Ok(RunResult::default());
    }

    if !in_place {
        std::fs::create_dir_all(&dest).map_err(|e| UnlockError::fs(&dest, e))?;
    }

    let mut result = RunResult::default();

    for candidate in &candidates {
        let target = dest.join(&candidate.os_name);

        match decryptor
            .decrypt(&request.password, &candidate.path, &target)
            .await
        {
            Ok(()) => {
                reporter.report(UnlockEvent::Unlocked {
                    file: &candidate.file_name,
                });
                result.processed.push(candidate.file_name.clone());
            }
            Err(failure) => {
                let detail = failure.detail();
                tracing::debug!(file = %candidate.file_name, error = ?failure, "decrypt failed");
                reporter.report(UnlockEvent::Failed {
                    file: &candidate.file_name,
                    detail: &detail,
                });
                result.failed.push(candidate.file_name.clone());
            }
        }
    }

    tracing::info!(
        processed = result.processed.len(),
        failed = result.failed.len(),
        "unlock run finished"
    );

    Ok(result)
}

/// Make `path` absolute and collapse `.` and `..` without touching the filesystem.
pub fn resolve_path(path: &Path) -> Result<PathBuf, UnlockError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| UnlockError::fs(path, e))?;
        cwd.join(path)
    };
    Ok(normalize(&absolute))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to go above the root.
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
