// crates/core/src/config.rs
//! Project configuration (`.taskconfig.json`).
//!
//! The project file is deep-merged over [`TaskConfig::default`]: nested
//! objects merge key by key, arrays and scalars replace. A missing file is
//! not an error; a malformed one logs a warning and falls back to defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::paths::CONFIG_FILE;

/// Fallback color for statuses without a known default.
pub const FALLBACK_COLOR: &str = "#6b7280";

/// Default viewer port.
pub const DEFAULT_PORT: u16 = 5500;

/// Default auto-refresh interval in milliseconds.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub version: String,
    pub statuses: Vec<StatusConfig>,
    pub port: u16,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureFlags {
    pub search: bool,
    pub full_text_search: bool,
    pub auto_refresh: bool,
    /// Milliseconds between automatic reloads.
    pub refresh_interval: u64,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            search: true,
            full_text_search: true,
            auto_refresh: true,
            refresh_interval: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            statuses: ["backlog", "todo", "review", "done"]
                .into_iter()
                .map(StatusConfig::for_key)
                .collect(),
            port: DEFAULT_PORT,
            features: FeatureFlags::default(),
        }
    }
}

impl StatusConfig {
    /// Status with an uppercase label and its default color.
    pub fn for_key(key: &str) -> Self {
        let key = key.trim().to_lowercase();
        Self {
            label: key.to_uppercase(),
            color: default_color(&key).to_string(),
            key,
        }
    }
}

impl TaskConfig {
    /// Build a config whose statuses come from a comma-separated list.
    ///
    /// Blank entries are skipped; everything else keeps its default value.
    pub fn from_statuses(list: &str) -> Self {
        let statuses: Vec<StatusConfig> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(StatusConfig::for_key)
            .collect();
        if statuses.is_empty() {
            return Self::default();
        }
        Self {
            statuses,
            ..Self::default()
        }
    }

    pub fn status_keys(&self) -> Vec<&str> {
        self.statuses.iter().map(|s| s.key.as_str()).collect()
    }

    pub fn has_status(&self, key: &str) -> bool {
        self.statuses.iter().any(|s| s.key == key)
    }

    pub fn status(&self, key: &str) -> Option<&StatusConfig> {
        self.statuses.iter().find(|s| s.key == key)
    }
}

/// Default border color for well-known status keys.
pub fn default_color(status: &str) -> &'static str {
    match status {
        "backlog" => "#6b7280",
        "todo" => "#3b82f6",
        "doing" => "#10b981",
        "review" => "#eab308",
        "done" => "#22c55e",
        "blocked" => "#ef4444",
        "cancelled" => "#6b7280",
        "idea" => "#9333ea",
        "planning" => "#ec4899",
        "testing" => "#f97316",
        _ => FALLBACK_COLOR,
    }
}

/// Read `.taskconfig.json` under `project_dir`, merged over the defaults.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn try_load_project_config(project_dir: &Path) -> Result<Option<TaskConfig>, ConfigError> {
    let path = project_dir.join(CONFIG_FILE);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::io(&path, e)),
    };
    parse_config(&raw)
        .map(Some)
        .map_err(|message| ConfigError::MalformedJson { path, message })
}

/// Parse config JSON and merge it over the defaults.
pub fn parse_config(raw: &str) -> Result<TaskConfig, String> {
    let project: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let mut merged = serde_json::to_value(TaskConfig::default()).map_err(|e| e.to_string())?;
    deep_merge(&mut merged, project);
    serde_json::from_value(merged).map_err(|e| e.to_string())
}

/// Load the project config, never failing.
pub fn load_project_config(project_dir: &Path) -> TaskConfig {
    match try_load_project_config(project_dir) {
        Ok(Some(config)) => config,
        Ok(None) => {
            debug!(dir = %project_dir.display(), "No project config, using defaults");
            TaskConfig::default()
        }
        Err(e) => {
            warn!(error = %e, "Failed to load project config, using defaults");
            TaskConfig::default()
        }
    }
}

/// Write the config as pretty JSON to `.taskconfig.json` under `project_dir`.
pub fn save_project_config(config: &TaskConfig, project_dir: &Path) -> Result<(), ConfigError> {
    let path = project_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config).map_err(|e| ConfigError::MalformedJson {
        path: path.clone(),
        message: e.to_string(),
    })?;
    std::fs::write(&path, json).map_err(|e| ConfigError::io(&path, e))
}

/// Recursively merge `source` into `target`.
fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value);
                    }
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}
