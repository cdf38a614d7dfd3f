use crate::utils::logging::LogEntry;
use anyhow::Result;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Session log file, one per run, with a `latest.log` pointer next to it
pub struct LogFile {
    file: Mutex<File>,
    path: PathBuf,
}

impl LogFile {
    pub fn create(log_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(log_dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = log_dir.join(format!("dashboard-search_{}.log", timestamp));

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let latest_path = log_dir.join("latest.log");

        #[cfg(unix)]
        {
            let _ = std::fs::remove_file(&latest_path);
            let _ = std::os::unix::fs::symlink(&path, &latest_path);
        }

        #[cfg(windows)]
        {
            // Symlinks need elevated rights on Windows
            let _ = std::fs::write(
                &latest_path,
                format!("Current log file: {}\n", path.display()),
            );
        }

        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_entry(&self, entry: &LogEntry) {
        if let Ok(mut file) = self.file.lock() {
            let line = format!(
                "[{}] {} [{}] {}\n",
                entry.timestamp, entry.level, entry.target, entry.message
            );
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush(); // keep the tail useful after a crash
        }

        if std::env::var("DASHBOARD_SEARCH_DEBUG").is_ok() {
            eprintln!("{}", entry.format_for_display());
        }
    }

    pub fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
