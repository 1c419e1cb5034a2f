//! Integration tests for the library entry points.
//!
//! These drive `unlock_dir` through custom `Decryptor` and
//! `ProgressReporter` implementations, the way another program embedding
//! the crate would.

use async_trait::async_trait;
use pdf_unlock::config::{CliOverrides, Config, Settings};
use pdf_unlock::decrypt::Decryptor;
use pdf_unlock::progress::{NoProgress, ProgressReporter, UnlockEvent};
use pdf_unlock::{unlock_dir, DecryptFailure, JobRequest, Password, UnlockError};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

// ─── Test Decryptor ─────────────────────────────────────────────────

/// Accepts a file when its contents equal the password, like a real
/// encrypted document would.
struct ContentPasswordDecryptor;

#[async_trait]
impl Decryptor for ContentPasswordDecryptor {
    async fn decrypt(
        &self,
        password: &Password,
        src: &Path,
        dest: &Path,
    ) -> Result<(), DecryptFailure> {
        let body = fs::read_to_string(src).map_err(|e| DecryptFailure::Spawn {
            program: "content".into(),
            source: e,
        })?;
        if body.trim() != password.expose() {
            return Err(DecryptFailure::Exit {
                code: Some(2),
                stderr: format!("{}: invalid password", src.display()),
            });
        }
        fs::write(dest, "plain").map_err(|e| DecryptFailure::Spawn {
            program: "content".into(),
            source: e,
        })?;
        Ok(())
    }
}

// ─── Test Reporter ──────────────────────────────────────────────────

#[derive(Default)]
struct CollectingReporter {
    unlocked: Mutex<Vec<String>>,
    failed: Mutex<Vec<(String, String)>>,
    empty: Mutex<u32>,
}

impl ProgressReporter for CollectingReporter {
    fn report(&self, event: UnlockEvent<'_>) {
        match event {
            UnlockEvent::Unlocked { file } => self.unlocked.lock().unwrap().push(file.to_string()),
            UnlockEvent::Failed { file, detail } => self
                .failed
                .lock()
                .unwrap()
                .push((file.to_string(), detail.to_string())),
            UnlockEvent::NoFiles { .. } => *self.empty.lock().unwrap() += 1,
        }
    }
}

#[tokio::test]
async fn every_eligible_file_lands_in_exactly_one_list() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    fs::create_dir(&src).unwrap();

    let mut eligible = BTreeSet::new();
    for i in 0..25 {
        let name = if i % 4 == 0 {
            format!("doc{:02}.PDF", i)
        } else {
            format!("doc{:02}.pdf", i)
        };
        let pw = if i % 3 == 0 { "wrong" } else { "right" };
        fs::write(src.join(&name), pw).unwrap();
        eligible.insert(name);
    }
    fs::write(src.join("skip.txt"), "right").unwrap();
    fs::create_dir(src.join("sub.pdf")).unwrap();
    fs::write(src.join("sub.pdf").join("inner.pdf"), "right").unwrap();

    let request = JobRequest::new(&src, "right", Some(tmp.path().join("out")));
    let reporter = CollectingReporter::default();
    let result = unlock_dir(&request, &ContentPasswordDecryptor, &reporter)
        .await
        .unwrap();

    let processed: BTreeSet<String> = result.processed.iter().cloned().collect();
    let failed: BTreeSet<String> = result.failed.iter().cloned().collect();
    assert!(processed.is_disjoint(&failed));
    assert_eq!(processed.len(), result.processed.len());
    assert_eq!(failed.len(), result.failed.len());
    assert_eq!(
        processed.union(&failed).cloned().collect::<BTreeSet<_>>(),
        eligible
    );

    assert_eq!(*reporter.unlocked.lock().unwrap(), result.processed);
    let failed_notices = reporter.failed.lock().unwrap();
    assert_eq!(failed_notices.len(), result.failed.len());
    assert!(failed_notices
        .iter()
        .all(|(_, detail)| detail.contains("invalid password")));
    assert_eq!(*reporter.empty.lock().unwrap(), 0);

    for name in &result.processed {
        assert!(tmp.path().join("out").join(name).is_file());
    }
    for name in &result.failed {
        assert!(!tmp.path().join("out").join(name).exists());
    }
}

#[tokio::test]
async fn filesystem_error_yields_no_result() {
    let tmp = TempDir::new().unwrap();
    let request = JobRequest::new(tmp.path().join("nope"), "pw", None);
    let result = unlock_dir(&request, &ContentPasswordDecryptor, &NoProgress).await;
    assert!(matches!(result, Err(UnlockError::Filesystem { .. })));
}

#[tokio::test]
async fn custom_extension_from_settings() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.pdf"), "pw").unwrap();
    fs::write(tmp.path().join("b.xps"), "pw").unwrap();

    let cli = CliOverrides {
        dir: Some(tmp.path().display().to_string()),
        password: Some("pw".into()),
        out_dir: Some(tmp.path().join("out").display().to_string()),
        extension: Some(".xps".into()),
        ..Default::default()
    };
    let settings = Settings::resolve(&cli, |_| None, &Config::default()).unwrap();
    let result = unlock_dir(
        &settings.job_request(),
        &ContentPasswordDecryptor,
        &NoProgress,
    )
    .await
    .unwrap();

    assert_eq!(result.processed, vec!["b.xps"]);
    assert!(result.failed.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn qpdf_decryptor_from_settings_runs_program() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let script = tmp.path().join("qpdf");
    fs::write(
        &script,
        "#!/bin/sh\n[ \"$1\" = \"--password=pw\" ] || { echo bad >&2; exit 2; }\ncp \"$3\" \"$4\"\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let docs = tmp.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("a.pdf"), "data").unwrap();

    let cli = CliOverrides {
        dir: Some(docs.display().to_string()),
        password: Some("pw".into()),
        out_dir: Some(tmp.path().join("out").display().to_string()),
        program: Some(script.display().to_string()),
        ..Default::default()
    };
    let settings = Settings::resolve(&cli, |_| None, &Config::default()).unwrap();
    let result = unlock_dir(&settings.job_request(), &settings.decryptor(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(result.processed, vec!["a.pdf"]);
    assert_eq!(
        fs::read_to_string(tmp.path().join("out").join("a.pdf")).unwrap(),
        "data"
    );
}
