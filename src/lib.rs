//! # pdf-unlock
//!
//! Batch-remove password protection from a folder of PDF files.
//!
//! Every PDF directly inside the source directory is handed to `qpdf`, one
//! file at a time, and the unlocked copy is written to the destination
//! directory under the same name. A file that fails to unlock is reported
//! and skipped; the rest of the batch still runs.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌─────────────┐   ┌───────────┐
//! │  Config  │──▶│   Scan   │──▶│   Unlock    │──▶│ RunResult │
//! │ CLI/env  │   │ *.pdf    │   │ per file    │   │ processed │
//! └──────────┘   └──────────┘   └──────┬──────┘   │ failed    │
//!                                      ▼          └───────────┘
//!                                ┌───────────┐
//!                                │ Decryptor │
//!                                │   qpdf    │
//!                                └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! unlock-pdfs ./payslips 5851 ./unlocked
//! UNLOCK_PASSWORD=5851 unlock-pdfs ./payslips
//! ```
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), pdf_unlock::UnlockError> {
//! let result = pdf_unlock::unlock("./payslips", "5851", None).await?;
//! if result.has_failures() {
//!     eprintln!("could not unlock: {:?}", result.failed);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Config file, environment and CLI resolution |
//! | [`models`] | Job request and run result types |
//! | [`scan`] | Source directory listing and filtering |
//! | [`decrypt`] | `Decryptor` trait and the qpdf invoker |
//! | [`unlock`] | Batch orchestration |
//! | [`progress`] | Per-file notices |
//! | [`error`] | Error types |

pub mod config;
pub mod decrypt;
pub mod error;
pub mod models;
pub mod progress;
pub mod scan;
pub mod unlock;

pub use error::{DecryptFailure, UnlockError};
pub use models::{JobRequest, Password, RunResult};
pub use unlock::{unlock, unlock_dir};
