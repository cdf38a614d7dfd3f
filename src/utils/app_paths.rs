use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "dashboard-search";

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Cannot determine data directory"))?
            .join(APP_DIR);

        fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    /// Where session logs go; falls back to the temp dir when there is no data dir
    pub fn log_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join("logs"))
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR))
    }
}
