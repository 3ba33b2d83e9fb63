use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TELEMARKETING_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "telemarketing.json";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Picture shown at the top of the sidebar; skipped if it cannot be read.
    pub branding_image: Option<PathBuf>,
    /// Rows shown in the before/after previews.
    pub preview_rows: usize,
    /// Delimiter of uploaded text files.
    pub csv_delimiter: char,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            branding_image: Some(PathBuf::from("Bank-Branding.jpg")),
            preview_rows: 5,
            csv_delimiter: ';',
            window_size: [1280.0, 900.0],
        }
    }
}

impl AppConfig {
    /// Resolve the config: `$TELEMARKETING_CONFIG`, then `./telemarketing.json`,
    /// then defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_path(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_path(local);
        }
        log::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Delimiter as the byte the csv reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.csv_delimiter as u8
    }

    fn validate(&self) -> Result<()> {
        if !self.csv_delimiter.is_ascii() {
            bail!("csv_delimiter must be an ASCII character, got {:?}", self.csv_delimiter);
        }
        if self.preview_rows == 0 {
            bail!("preview_rows must be at least 1");
        }
        Ok(())
    }
}
