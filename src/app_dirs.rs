use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Default log file; the TUI owns the terminal so logs go to disk
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("foolcools");
            Some(state_dir.join("foolcools.log"))
        } else {
            ProjectDirs::from("", "", "foolcools")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("foolcools.log"))
        }
    }
}
