use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a controller hands us a mode string outside the dispatch
/// table. There is no sensible fallback branch, so this is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown drive mode '{0}'")]
pub struct ModeParseError(pub String);

/// Which command source drives the vehicle on a given tick.
///
/// The active mode is supplied externally (joystick / web controller) and
/// re-evaluated every tick; the kernel never transitions it on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveMode {
    /// Human drives both steering and throttle.
    #[default]
    User,
    /// Model steers, human keeps throttle.
    LocalAngle,
    /// Model drives both (full autonomous).
    Local,
}

impl DriveMode {
    /// Whether autonomous inference should run this tick.
    /// False only when the human has full control.
    pub fn run_pilot(self) -> bool {
        !matches!(self, DriveMode::User)
    }
}

impl FromStr for DriveMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(DriveMode::User),
            "local_angle" => Ok(DriveMode::LocalAngle),
            // "local_pilot" is the historical alias used by the web controller
            "local" | "local_pilot" => Ok(DriveMode::Local),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriveMode::User => "user",
            DriveMode::LocalAngle => "local_angle",
            DriveMode::Local => "local",
        };
        f.write_str(s)
    }
}

/// Recording gate for autonomous ticks: respect the operator's recording
/// flag in user mode, record unconditionally otherwise.
///
/// Only consulted when `record_during_ai` is configured on; the pipeline
/// passes the upstream flag through untouched otherwise.
pub fn ai_recording(mode: DriveMode, recording: bool) -> bool {
    match mode {
        DriveMode::User => recording,
        _ => true,
    }
}
