/// Scrobbling status state machine
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the scrobbling settings screen shows
///
/// Never stored; always derived from [`ScrobblingSignals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrobblingStatus {
    /// The toggle was never switched on
    NotSetUp,
    /// Switched on, but the OS permission to read playback is missing
    PermissionNeeded,
    /// Switched on and permitted; plays are captured and synced
    Active,
    /// Switched off after having been set up
    Paused,
}

impl ScrobblingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrobblingStatus::NotSetUp => "not_set_up",
            ScrobblingStatus::PermissionNeeded => "permission_needed",
            ScrobblingStatus::Active => "active",
            ScrobblingStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for ScrobblingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The inputs scrobbling status is derived from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrobblingSignals {
    /// The OS lets us observe playback
    pub permission_granted: bool,
    /// The user's toggle
    pub enabled: bool,
    /// The toggle has been switched on at least once
    pub set_up: bool,
}

impl ScrobblingSignals {
    pub fn status(&self) -> ScrobblingStatus {
        match (self.enabled, self.permission_granted, self.set_up) {
            (true, true, _) => ScrobblingStatus::Active,
            (true, false, _) => ScrobblingStatus::PermissionNeeded,
            (false, _, true) => ScrobblingStatus::Paused,
            (false, _, false) => ScrobblingStatus::NotSetUp,
        }
    }

    /// Flip the toggle; switching on also marks scrobbling as set up
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.set_up = true;
        }
    }
}
