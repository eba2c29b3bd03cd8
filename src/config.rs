use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

pub const DB_PATH_ENV: &str = "IRON_CALC_DB";
pub const DB_FILE_NAME: &str = "history.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub webview_data_dir: PathBuf,
}

impl AppConfig {
    /// Resolves paths from the environment, falling back to the per-user data
    /// directory.
    pub fn load() -> Result<Self> {
        let override_path = std::env::var_os(DB_PATH_ENV).map(PathBuf::from);
        Self::resolve(override_path, default_data_dir()?)
    }

    pub fn resolve(db_override: Option<PathBuf>, data_dir: PathBuf) -> Result<Self> {
        let db_path = match db_override {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => data_dir.join(DB_FILE_NAME),
        };
        Ok(Self {
            db_path,
            webview_data_dir: ensure_webview_data_dir(&data_dir)?,
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "ironcalc", "iron-calc")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().to_path_buf())
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}
