// Settings: where the generation service lives and where downloads land.
// Persisted as JSON in the user's home directory so values survive across
// runs; the `AUTOCRUD_URL` environment variable overrides the base URL for a
// single invocation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name of the persisted settings in the user's home directory.
const SETTINGS_FILE: &str = ".autocrud-cli.json";

/// Environment variable overriding the generation service base URL.
pub const URL_ENV_VAR: &str = "AUTOCRUD_URL";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the generation service, no trailing slash.
    pub base_url: String,
    /// Directory where generated archives are saved.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: "http://localhost:8080".to_string(),
            output_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl Settings {
    /// Path of the settings file in the user's home directory.
    pub fn default_path() -> PathBuf {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.join(SETTINGS_FILE)
    }

    /// Load settings from `path`. A missing file falls back to defaults; a
    /// present-but-malformed file is an error. The `AUTOCRUD_URL` variable
    /// takes precedence over whatever the file says.
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings = if path.exists() {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Malformed settings file {}", path.display()))?
        } else {
            Settings::default()
        };
        if let Ok(url) = std::env::var(URL_ENV_VAR) {
            settings.base_url = url;
        }
        Ok(settings)
    }

    /// Persist settings to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Failed to encode settings")?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write settings file {}", path.display()))?;
        Ok(())
    }
}
