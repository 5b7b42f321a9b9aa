//! CLI configuration: an optional TOML file layered under `PERSONAL_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

const DEFAULT_STORE_PATH: &str = "personal.db";
const DEFAULT_REPORT_PATH: &str = "reports/person_report.txt";

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
  /// SQLite database file.
  #[serde(default = "default_store_path")]
  pub store_path:  PathBuf,
  /// Where `personal report` writes when `--out` is not given.
  #[serde(default = "default_report_path")]
  pub report_path: PathBuf,
}

fn default_store_path() -> PathBuf { PathBuf::from(DEFAULT_STORE_PATH) }

fn default_report_path() -> PathBuf { PathBuf::from(DEFAULT_REPORT_PATH) }

impl CliConfig {
  /// Read `file` (if it exists) and the environment. Missing keys fall back
  /// to the defaults; `~` is expanded in both paths.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("PERSONAL"))
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise CliConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.report_path = expand_tilde(&cfg.report_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
