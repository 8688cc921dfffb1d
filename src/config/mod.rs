use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::currency::LocaleConfig;
use crate::errors::{DisplayError, DisplayResult};
use crate::utils::{app_data_dir, config_file_in};

const TMP_SUFFIX: &str = "tmp";
const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Display preferences shared by the formatter, the builder and the caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Symbol prefixed to every formatted currency amount.
    pub currency_symbol: String,
    /// Values containing any of these markers are treated as already formatted.
    pub passthrough_markers: Vec<String>,
    pub locale: LocaleConfig,
    /// Upper bound on entries held by each memoisation cache.
    pub cache_capacity: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₱".into(),
            passthrough_markers: vec!["$".into(), "₱".into(), "PHP".into()],
            locale: LocaleConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl DisplayConfig {
    /// Rejects settings the formatter cannot honour.
    pub fn validate(&self) -> DisplayResult<()> {
        if self.locale.decimal_separator == self.locale.grouping_separator {
            return Err(DisplayError::Config(format!(
                "decimal and grouping separators must differ (both `{}`)",
                self.locale.decimal_separator
            )));
        }
        if self.cache_capacity == 0 {
            return Err(DisplayError::Config(
                "cache_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Loads and saves [`DisplayConfig`] as pretty-printed JSON.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at the application data directory.
    pub fn new() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: impl AsRef<Path>) -> Self {
        Self {
            path: config_file_in(base.as_ref()),
        }
    }

    /// Manager reading an explicit file, as passed with `--config`.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the stored configuration, or defaults when no file exists yet.
    pub fn load(&self) -> DisplayResult<DisplayConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(DisplayConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: DisplayConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &DisplayConfig) -> DisplayResult<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> DisplayResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
