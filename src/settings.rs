use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::timer::{Durations, DurationsUpdate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChimeSettings {
    pub enabled: bool,
    pub volume: f32,
}

impl Default for ChimeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub timer_durations: Durations,
    /// Privacy opt-out for the mood log; on by default.
    pub log_mood_data: bool,
    pub chime: ChimeSettings,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            timer_durations: Durations::default(),
            log_mood_data: true,
            chime: ChimeSettings::default(),
        }
    }
}

/// JSON-backed settings; every update is written through to disk.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring unreadable settings at {}: {err}",
                    path.display()
                );
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn timer_durations(&self) -> Durations {
        self.read().timer_durations
    }

    pub fn log_mood_data(&self) -> bool {
        self.read().log_mood_data
    }

    pub fn chime(&self) -> ChimeSettings {
        self.read().chime.clone()
    }

    /// Merges `update` into the stored durations and returns the result.
    pub fn update_timer_durations(&self, update: &DurationsUpdate) -> Result<Durations> {
        let mut guard = self.write();
        guard.timer_durations = guard.timer_durations.merge(update);
        self.persist(&guard)?;
        Ok(guard.timer_durations)
    }

    pub fn set_log_mood_data(&self, enabled: bool) -> Result<()> {
        let mut guard = self.write();
        guard.log_mood_data = enabled;
        self.persist(&guard)
    }

    pub fn update_chime(&self, settings: ChimeSettings) -> Result<()> {
        let mut guard = self.write();
        guard.chime = settings;
        self.persist(&guard)
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
