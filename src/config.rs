//! Persistent viewer preferences.
//!
//! Stored as JSON in the platform config directory. A missing or unreadable
//! file is never fatal; the defaults are used instead.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::gui::pipeline::DEFAULT_UNIT;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Image opened at startup when none is given on the command line.
    pub image_path: Option<PathBuf>,
    /// Label shown next to the colorbar until the user edits it.
    pub default_unit: String,
    /// Logical window size in points.
    pub window_size: [f64; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            image_path: None,
            default_unit: DEFAULT_UNIT.to_string(),
            window_size: [1200.0, 760.0],
        }
    }
}

impl AppConfig {
    /// `<config dir>/config.json`, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "velmodel", "velmodel")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Loads the stored configuration, falling back to defaults.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed config {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("no config directory on this platform"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The image to open: the command-line argument wins over the stored path.
    pub fn resolve_image(&self, cli_arg: Option<PathBuf>) -> Option<PathBuf> {
        cli_arg.or_else(|| self.image_path.clone())
    }
}
