use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Hard mode can only be enabled at the start")]
    HardModeAfterStart,
}

/// Display and difficulty preferences. Hard mode is recorded but does not
/// change which guesses are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dark_mode: bool,
    pub color_blind: bool,
    pub hard_mode: bool,
}

impl Settings {
    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
    }

    pub fn set_color_blind(&mut self, enabled: bool) {
        self.color_blind = enabled;
    }

    /// Turning hard mode on is only allowed before the first guess of the day.
    /// Turning it off is always allowed.
    pub fn set_hard_mode(&mut self, enabled: bool, game_started: bool) -> Result<(), SettingsError> {
        if enabled && !self.hard_mode && game_started {
            return Err(SettingsError::HardModeAfterStart);
        }

        self.hard_mode = enabled;
        Ok(())
    }
}
