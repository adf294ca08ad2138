use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_TICK_MS: u64 = 1000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tick_ms: u64,
    pub enable_color: bool,
    pub enable_emoji: bool,
    pub last_pet: Option<String>,
    pub last_played_utc: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            enable_color: true,
            enable_emoji: true,
            last_pet: None,
            last_played_utc: None,
        }
    }
}

impl Settings {
    /// Bounded to 50ms..=60s.
    pub fn tick_ms_clamped(&self) -> u64 {
        self.tick_ms.clamp(50, 60_000)
    }

    /// The settings this run uses. `self` stays what the file holds.
    pub fn with_overrides(&self, o: &Overrides) -> Settings {
        let mut s = self.clone();
        if let Some(ms) = o.tick_ms {
            s.tick_ms = ms;
        }
        if o.mono {
            s.enable_color = false;
        }
        if o.ascii {
            s.enable_emoji = false;
        }
        s
    }
}

/// Command-line flags that apply to one run and are never saved.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub tick_ms: Option<u64>,
    pub mono: bool,
    pub ascii: bool,
}

pub struct Paths {
    pub data_dir: PathBuf,
    pub store_dir: PathBuf,
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
}

impl Paths {
    pub fn under(dir: &Path) -> Self {
        Self {
            data_dir: dir.to_path_buf(),
            store_dir: dir.join("pets"),
            settings_path: dir.join("settings.json"),
            log_path: dir.join("tamagotchi.log"),
        }
    }
}

pub fn project_paths(override_dir: Option<&Path>) -> Result<Paths> {
    let dir = match override_dir {
        Some(d) => d.to_path_buf(),
        None => ProjectDirs::from("com", "tamagotchi", "Tamagotchi")
            .context("could not resolve project directories")?
            .data_local_dir()
            .to_path_buf(),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create data dir {}", dir.display()))?;
    Ok(Paths::under(&dir))
}

pub fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
    }
    Settings::default()
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let data = serde_json::to_vec_pretty(s)?;
    write_atomic(path, &data)
}

/// Writes next to `path` and renames over it.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).with_context(|| format!("could not write {}", tmp.display()))?;
    // rename-over-existing is not atomic on Windows; drop the old file first
    if cfg!(windows) && path.exists() {
        let _ = fs::remove_file(path);
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("could not move {} into place", tmp.display()))?;
    Ok(())
}
