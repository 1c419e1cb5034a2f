//! Source directory scanning.
//!
//! Lists the direct entries of the source directory and keeps the regular
//! files whose name carries the target extension. Subdirectories are never
//! descended into and symlinks are not followed.

use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;
use walkdir::WalkDir;

use crate::config::normalize_extension;
use crate::error::UnlockError;
use crate::models::Candidate;

/// Return eligible files in the order the filesystem lists them.
///
/// The order is not sorted: it decides processing order and the order of
/// the run result lists.
pub fn scan_candidates(dir: &Path, extension: &str) -> Result<Vec<Candidate>, UnlockError> {
    let metadata = std::fs::metadata(dir).map_err(|e| UnlockError::fs(dir, e))?;
    if !metadata.is_dir() {
        return Err(UnlockError::fs(
            dir,
            std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
        ));
    }

    let extension = normalize_extension(extension)
        .map_err(|e| UnlockError::Config(format!("extension {}", e)))?;
    let matcher = build_matcher(&extension)?;
    let mut candidates = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false);
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            UnlockError::fs(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let os_name = entry.file_name().to_owned();
        if !matcher.is_match(&os_name) {
            continue;
        }

        candidates.push(Candidate {
            file_name: os_name.to_string_lossy().to_string(),
            os_name,
            path: entry.path().to_path_buf(),
        });
    }

    Ok(candidates)
}

fn build_matcher(extension: &str) -> Result<GlobMatcher, UnlockError> {
    let glob = GlobBuilder::new(&format!("*.{}", extension))
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map_err(|e| UnlockError::Config(format!("invalid extension '{}': {}", extension, e)))?;
    Ok(glob.compile_matcher())
}
