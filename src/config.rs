//! Configuration loading and parameter resolution.
//!
//! Settings come from four places, highest priority first:
//! command-line arguments, environment variables, the optional TOML config
//! file, and built-in defaults. [`Settings::resolve`] merges them once at
//! startup into an immutable snapshot that the binary hands to the core.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::decrypt::QpdfDecryptor;
use crate::error::UnlockError;
use crate::models::{JobRequest, Password};

pub const DEFAULT_EXTENSION: &str = "pdf";
pub const DEFAULT_PROGRAM: &str = "qpdf";
pub const DEFAULT_SOURCE_DIR: &str = ".";
pub const DEFAULT_OUT_DIR: &str = "./unlocked";
pub const DEFAULT_CONFIG_PATH: &str = "./config/unlock.toml";

pub const ENV_DIR: &str = "UNLOCK_DIR";
pub const ENV_PASSWORD: &str = "UNLOCK_PASSWORD";
pub const ENV_OUTDIR: &str = "UNLOCK_OUTDIR";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub unlock: UnlockConfig,
    #[serde(default)]
    pub decrypt: DecryptConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UnlockConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            dir: None,
            out_dir: None,
            extension: default_extension(),
        }
    }
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DecryptConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for DecryptConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            timeout_secs: None,
        }
    }
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    normalize_extension(&config.unlock.extension)
        .map_err(|e| anyhow::anyhow!("unlock.extension {}", e))?;

    if config.decrypt.program.trim().is_empty() {
        anyhow::bail!("decrypt.program must not be empty");
    }

    if config.decrypt.timeout_secs == Some(0) {
        anyhow::bail!("decrypt.timeout_secs must be > 0");
    }

    Ok(config)
}

/// Load the config file if one was requested or the default file exists.
///
/// An explicitly requested file must exist. Without `--config`, a missing
/// `./config/unlock.toml` just means built-in defaults.
pub fn load_optional_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.is_file() {
                load_config(default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// Values given on the command line. Empty strings count as not given.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dir: Option<String>,
    pub password: Option<String>,
    pub out_dir: Option<String>,
    pub extension: Option<String>,
    pub program: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved, immutable run configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source_dir: PathBuf,
    pub password: Password,
    pub out_dir: PathBuf,
    pub extension: String,
    pub program: String,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Merge CLI values, environment and config file into one snapshot.
    ///
    /// `env` is the environment lookup, normally `|k| std::env::var(k).ok()`.
    /// Fails with [`UnlockError::Config`] when no password is available; no
    /// filesystem access happens here.
    pub fn resolve<F>(cli: &CliOverrides, env: F, file: &Config) -> Result<Self, UnlockError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let password = non_empty(cli.password.clone())
            .or_else(|| non_empty(env(ENV_PASSWORD)))
            .ok_or_else(|| {
                UnlockError::Config(format!(
                    "password must be provided via CLI or {} env var",
                    ENV_PASSWORD
                ))
            })?;

        let source_dir = non_empty(cli.dir.clone())
            .or_else(|| non_empty(env(ENV_DIR)))
            .map(PathBuf::from)
            .or_else(|| file.unlock.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR));

        let out_dir = non_empty(cli.out_dir.clone())
            .or_else(|| non_empty(env(ENV_OUTDIR)))
            .map(PathBuf::from)
            .or_else(|| file.unlock.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

        let extension = non_empty(cli.extension.clone())
            .unwrap_or_else(|| file.unlock.extension.clone());
        let extension = normalize_extension(&extension)
            .map_err(|e| UnlockError::Config(format!("extension {}", e)))?;

        let program =
            non_empty(cli.program.clone()).unwrap_or_else(|| file.decrypt.program.clone());

        let timeout_secs = cli.timeout_secs.or(file.decrypt.timeout_secs);
        if timeout_secs == Some(0) {
            return Err(UnlockError::Config("timeout must be > 0".to_string()));
        }

        Ok(Self {
            source_dir,
            password: Password::new(password),
            out_dir,
            extension,
            program,
            timeout_secs,
        })
    }

    pub fn job_request(&self) -> JobRequest {
        JobRequest::new(
            self.source_dir.clone(),
            self.password.clone(),
            Some(self.out_dir.clone()),
        )
        .with_extension(self.extension.clone())
    }

    pub fn decryptor(&self) -> QpdfDecryptor {
        QpdfDecryptor::new(self.program.clone()).with_timeout_secs(self.timeout_secs)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Strip a leading dot and reject values that cannot be a plain extension.
pub fn normalize_extension(raw: &str) -> std::result::Result<String, String> {
    let ext = raw.trim().trim_start_matches('.');
    if ext.is_empty() {
        return Err("must not be empty".to_string());
    }
    if ext
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '*' | '?' | '[' | ']' | '{' | '}' | '!'))
    {
        return Err(format!("'{}' must be a plain file extension", raw));
    }
    Ok(ext.to_string())
}
