use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const DATA_DIR_VAR: &str = "EXPENSEDASH_DATA_DIR";
const LOG_VAR: &str = "EXPENSEDASH_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) log_filter: String,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let data_dir = match std::env::var(DATA_DIR_VAR) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };
        let log_filter = std::env::var(LOG_VAR).ok();
        Ok(Self::new(data_dir, log_filter))
    }

    pub(crate) fn new(data_dir: PathBuf, log_filter: Option<String>) -> Self {
        let log_filter = log_filter
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.into());
        Self {
            db_path: data_dir.join("expensedash.db"),
            log_path: data_dir.join("expensedash.log"),
            data_dir,
            log_filter,
        }
    }

    pub(crate) fn ensure_data_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.data_dir.display()
            )
        })?;
        Ok(&self.data_dir)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "expensedash", "ExpenseDash")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
