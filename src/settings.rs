//! Game settings and preferences
//!
//! Persisted in the key-value store, separately from the high score.

use serde::{Deserialize, Serialize};

use crate::persistence::{KvStore, StoreError};
use crate::tuning::Tuning;

/// Ball speed preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedSetting {
    #[default]
    Slow,
    Normal,
    Fast,
}

impl SpeedSetting {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedSetting::Slow => "slow",
            SpeedSetting::Normal => "normal",
            SpeedSetting::Fast => "fast",
        }
    }

    /// Parse a speed name as typed by a user (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(SpeedSetting::Slow),
            "normal" => Some(SpeedSetting::Normal),
            "fast" => Some(SpeedSetting::Fast),
            _ => None,
        }
    }

    /// Multiplier on the base serve speed
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            SpeedSetting::Slow => 0.6,
            SpeedSetting::Normal => 1.0,
            SpeedSetting::Fast => 1.5,
        }
    }

    /// Factor applied to ball speed on every paddle hit
    pub fn bounce_increase(&self) -> f32 {
        match self {
            SpeedSetting::Slow => 1.01,
            SpeedSetting::Normal => 1.02,
            SpeedSetting::Fast => 1.03,
        }
    }

    /// Serve speed for this preset
    pub fn ball_speed(&self, tuning: &Tuning) -> f32 {
        tuning.base_ball_speed * self.speed_multiplier()
    }
}

/// Player preferences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Ball speed preset
    pub speed: SpeedSetting,
}

impl Settings {
    /// Store key for the speed preset
    pub const SPEED_KEY: &'static str = "space-cat-pong-speed";

    /// Load settings from the store, falling back to defaults
    pub fn load<S: KvStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::SPEED_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<SpeedSetting>(&json) {
                Ok(speed) => {
                    log::info!("Loaded speed setting: {}", speed.as_str());
                    return Self { speed };
                }
                Err(e) => log::warn!("Ignoring unreadable speed setting {json:?}: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    ///
    /// A failed write is logged; the in-memory value still applies.
    pub fn save<S: KvStore + ?Sized>(&self, store: &mut S) {
        let result = serde_json::to_string(&self.speed)
            .map_err(StoreError::from)
            .and_then(|json| store.set(Self::SPEED_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved (speed {})", self.speed.as_str()),
            Err(e) => log::warn!("Could not save settings: {e}"),
        }
    }
}
