use serde::{Deserialize, Serialize};

/// A steering/throttle pair. Angle is normalized to [-1.0, 1.0]
/// (full left to full right); throttle sign encodes direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlCommand {
    pub angle: f32,
    pub throttle: f32,
}

impl ControlCommand {
    pub fn new(angle: f32, throttle: f32) -> Self {
        Self { angle, throttle }
    }
}

/// Candidate command from the autonomous pilot. Values are absent until
/// the model has produced its first output; absent is treated as 0.0
/// downstream so the control loop never stalls on a cold model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PilotCommand {
    pub angle: Option<f32>,
    pub throttle: Option<f32>,
}

impl PilotCommand {
    pub fn new(angle: Option<f32>, throttle: Option<f32>) -> Self {
        Self { angle, throttle }
    }
}

/// The perturbation actually applied to the user command this tick.
/// Identity pair (0, 0) whenever injection conditions did not hold, so the
/// recorded tuple stays structurally uniform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseSample {
    pub angle: f32,
    pub throttle: f32,
}

/// Clamp to the normalized steering range [-1.0, 1.0].
pub fn clamp_unit(value: f32) -> f32 {
    value.clamp(-1.0, 1.0)
}

/// Round to 3 decimal digits, the precision recorded for noise values.
pub fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}
