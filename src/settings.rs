use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ErrorRendering {
    /// Every failure shows the same placeholder.
    #[default]
    Collapsed,
    /// Failures append their reason to the placeholder.
    Detailed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelSettings {
    pub unit: String,
    pub live_prefix: String,
    pub unavailable_text: String,
    pub error_rendering: ErrorRendering,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            unit: "steps".into(),
            live_prefix: "Now".into(),
            unavailable_text: "Could not retrieve step count".into(),
            error_rendering: ErrorRendering::Collapsed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub refresh_interval_secs: u64,
    /// IANA zone name; `None` uses the machine's local zone.
    pub time_zone: Option<String>,
    pub labels: LabelSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            time_zone: None,
            labels: LabelSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring unreadable settings at {}: {err}; using defaults",
                    path.display()
                );
                AppSettings::default()
            })
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> AppSettings {
        self.read().clone()
    }

    pub fn labels(&self) -> LabelSettings {
        self.read().labels.clone()
    }

    pub fn update_error_rendering(&self, mode: ErrorRendering) -> Result<LabelSettings> {
        let mut guard = self.write();
        guard.labels.error_rendering = mode;
        self.persist(&guard)?;
        Ok(guard.labels.clone())
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, AppSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
