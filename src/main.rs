//! # pdf-unlock CLI (`unlock-pdfs`)
//!
//! Unlocks every PDF in a directory with qpdf.
//!
//! ## Usage
//!
//! ```bash
//! unlock-pdfs [DIR] [PASSWORD] [OUT_DIR]
//! ```
//!
//! Each positional falls back to an environment variable, then to the
//! config file, then to a default:
//!
//! | Argument | Env var | Default |
//! |----------|---------|---------|
//! | `DIR` | `UNLOCK_DIR` | `.` |
//! | `PASSWORD` | `UNLOCK_PASSWORD` | none, required |
//! | `OUT_DIR` | `UNLOCK_OUTDIR` | `./unlocked` |
//!
//! A `.env` file in the working directory is loaded before resolution.
//!
//! ## Exit status
//!
//! Non-zero when no password is available or the source directory cannot
//! be read. Files that fail to unlock are reported but do not change the
//! exit status.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pdf_unlock::config::{self, CliOverrides, Settings};
use pdf_unlock::models::RunResult;
use pdf_unlock::progress::ProgressMode;
use pdf_unlock::unlock::unlock_dir;

/// Batch-remove password protection from PDF files using qpdf.
#[derive(Parser)]
#[command(
    name = "unlock-pdfs",
    version,
    about = "Batch-remove password protection from PDF files using qpdf",
    after_help = "Environment: UNLOCK_DIR, UNLOCK_PASSWORD, UNLOCK_OUTDIR. \
    Priority: CLI args > env vars > config file > defaults."
)]
struct Cli {
    /// Directory containing the password-protected files.
    dir: Option<String>,

    /// Password passed to qpdf.
    password: Option<String>,

    /// Destination directory. Same as DIR means unlock in place.
    out_dir: Option<String>,

    /// Path to configuration file (TOML).
    ///
    /// When omitted, `./config/unlock.toml` is read if it exists.
    #[arg(long)]
    config: Option<PathBuf>,

    /// File extension to pick up, matched case-insensitively.
    #[arg(long)]
    extension: Option<String>,

    /// Decryption program to run instead of `qpdf` from PATH.
    #[arg(long)]
    program: Option<String>,

    /// Kill a decryption that runs longer than this many seconds.
    #[arg(long = "timeout", value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Per-file notices on stderr.
    #[arg(long, value_enum, default_value_t = ProgressMode::Human)]
    progress: ProgressMode,

    /// Print the run result as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; its values only fill in unset variables,
    // including RUST_LOG, so it is read before logging starts.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let overrides = CliOverrides {
        dir: cli.dir,
        password: cli.password,
        out_dir: cli.out_dir,
        extension: cli.extension,
        program: cli.program,
        timeout_secs: cli.timeout_secs,
    };

    let file_config = config::load_optional_config(cli.config.as_deref())?;
    let settings = Settings::resolve(&overrides, |key| std::env::var(key).ok(), &file_config)
        .context("Usage: unlock-pdfs [directory] [password] [outputDir]")?;

    let request = settings.job_request();
    let decryptor = settings.decryptor();
    let reporter = cli.progress.reporter();

    let result = unlock_dir(&request, &decryptor, reporter.as_ref())
        .await
        .context("Fatal")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&settings, &result);
    }

    Ok(())
}

fn print_summary(settings: &Settings, result: &RunResult) {
    let source = pdf_unlock::unlock::resolve_path(&settings.source_dir)
        .unwrap_or_else(|_| settings.source_dir.clone());
    let dest = pdf_unlock::unlock::resolve_path(&settings.out_dir)
        .unwrap_or_else(|_| settings.out_dir.clone());

    println!("unlock {} -> {}", source.display(), dest.display());
    println!("  unlocked: {}", result.processed.len());
    println!("  failed: {}", result.failed.len());
    for name in &result.failed {
        println!("    {}", name);
    }
    println!("ok");
}
