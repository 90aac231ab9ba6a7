//! User settings persisted as JSON.
//!
//! Settings live at `<config dir>/sensor-dashboard/settings.json`. A missing
//! or malformed file falls back to defaults; every field is optional.

use crate::constants::{DEFAULT_EXPORT_BASENAME, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_REFRESH_INTERVAL_MS};
use crate::data::{RecordSource, SheetEndpoint, SheetsSource};
use crate::provider::ProviderConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Auto-refresh period in milliseconds; zero or negative disables it
    pub refresh_interval_ms: i64,
    pub fetch_timeout_secs: u64,
    pub export_basename: String,
    /// Sheet to load from. Without one the dashboard shows sample data.
    pub source: Option<SheetEndpoint>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            export_basename: DEFAULT_EXPORT_BASENAME.to_string(),
            source: None,
        }
    }
}

/// Get the default settings file path
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sensor-dashboard").join("settings.json"))
}

impl DashboardSettings {
    /// Load from the default path, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = default_settings_path() else {
            tracing::debug!("No config directory; using default settings");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "Failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            refresh_interval_ms: self.refresh_interval_ms,
            fetch_timeout: self.fetch_timeout(),
        }
    }

    /// Build the configured source. Returns `None` when no sheet is set or
    /// the HTTP client cannot be created; the provider then shows sample data.
    pub fn build_source(&self) -> Option<Arc<dyn RecordSource>> {
        let endpoint = self.source.clone()?;
        let label = endpoint.label();
        match SheetsSource::new(endpoint, self.fetch_timeout()) {
            Ok(source) => Some(Arc::new(source)),
            Err(e) => {
                tracing::error!(source = %label, error = %e, "Failed to build sheet source");
                None
            }
        }
    }
}
