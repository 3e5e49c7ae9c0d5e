use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::search::DEFAULT_TARGETS;

/// Recognized focus durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FocusPreset {
    #[value(name = "5")]
    Five,
    #[default]
    #[value(name = "17")]
    Seventeen,
    #[value(name = "25")]
    TwentyFive,
    #[value(name = "50")]
    Fifty,
}

impl FocusPreset {
    pub const ALL: [FocusPreset; 4] = [
        FocusPreset::Five,
        FocusPreset::Seventeen,
        FocusPreset::TwentyFive,
        FocusPreset::Fifty,
    ];

    pub fn minutes(self) -> u32 {
        match self {
            FocusPreset::Five => 5,
            FocusPreset::Seventeen => 17,
            FocusPreset::TwentyFive => 25,
            FocusPreset::Fifty => 50,
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.minutes() == minutes)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&p| p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for FocusPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} min", self.minutes())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub duration_minutes: u32,
    pub targets: String,
    pub skip_warmup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_minutes: FocusPreset::default().minutes(),
            targets: DEFAULT_TARGETS.iter().collect(),
            skip_warmup: false,
        }
    }
}

impl Config {
    /// Stored duration as a preset; unknown values fall back to the default
    pub fn preset(&self) -> FocusPreset {
        FocusPreset::from_minutes(self.duration_minutes).unwrap_or_default()
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "foolcools") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("foolcools_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(io::Error::other)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
        assert_eq!(loaded.targets, "fc");
        assert_eq!(loaded.preset(), FocusPreset::Seventeen);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            duration_minutes: 50,
            targets: "xq".into(),
            skip_warmup: true,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn corrupt_or_missing_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let missing = FileConfigStore::with_path(dir.path().join("missing.json"));
        assert_eq!(missing.load(), Config::default());

        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn unknown_duration_maps_to_default_preset() {
        let cfg = Config {
            duration_minutes: 42,
            ..Config::default()
        };
        assert_eq!(cfg.preset(), FocusPreset::Seventeen);
    }

    #[test]
    fn preset_cycling() {
        assert_eq!(FocusPreset::Five.next(), FocusPreset::Seventeen);
        assert_eq!(FocusPreset::Fifty.next(), FocusPreset::Five);
        assert_eq!(FocusPreset::Five.prev(), FocusPreset::Fifty);
        assert_eq!(FocusPreset::TwentyFive.to_string(), "25 min");
        assert_eq!(FocusPreset::from_minutes(17), Some(FocusPreset::Seventeen));
        assert_eq!(FocusPreset::from_minutes(3), None);
    }
}
