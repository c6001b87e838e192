//! Game settings and preferences
//!
//! Persisted separately from the leaderboard as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_POWER, MIN_CHARGE_POWER};
use crate::persistence::{self, StorageError};

/// Sensitivity limits exposed by the settings screen
pub const MIN_SENSITIVITY: f32 = 0.25;
pub const MAX_SENSITIVITY: f32 = 4.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Cue ===
    /// Drag-to-power sensitivity (higher = less drag for full power)
    pub sensitivity: f32,
    /// Power cap for a shot
    pub max_power: f32,
    /// Draw the aim line and deflection guides
    pub show_aim_guide: bool,

    // === Audio ===
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            max_power: MAX_POWER,
            show_aim_guide: true,

            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Clamp every value into its usable range; non-finite values fall back
    /// to the default
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let fix = |value: f32, default: f32, min: f32, max: f32| {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                default
            }
        };
        self.sensitivity = fix(self.sensitivity, defaults.sensitivity, MIN_SENSITIVITY, MAX_SENSITIVITY);
        self.max_power = fix(self.max_power, defaults.max_power, MIN_CHARGE_POWER, MAX_POWER);
        self.master_volume = fix(self.master_volume, defaults.master_volume, 0.0, 1.0);
        self.sfx_volume = fix(self.sfx_volume, defaults.sfx_volume, 0.0, 1.0);
        self
    }

    /// Final gain for sound effects (0 when sound is off)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sound_enabled {
            self.master_volume * self.sfx_volume
        } else {
            0.0
        }
    }

    /// Step sensitivity up or down by `delta`, staying in range
    pub fn adjust_sensitivity(&mut self, delta: f32) {
        self.sensitivity = (self.sensitivity + delta).clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
    }

    /// Load settings, using defaults when the file is missing or unreadable
    pub fn load(path: &Path) -> Self {
        let settings: Self = persistence::load_or_default(path);
        log::info!("Settings loaded (sensitivity {:.2})", settings.sensitivity);
        settings.sanitized()
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        persistence::save_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
