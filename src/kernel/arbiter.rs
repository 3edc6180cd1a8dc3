use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::command::{clamp_unit, round3, ControlCommand, NoiseSample, PilotCommand};
use super::mode::DriveMode;
use crate::config::DriveConfig;

/// Amplification applied to light reverse taps so the car actually backs
/// up instead of crawling. Full-reverse inputs below the window are
/// passed through untouched.
pub const REVERSE_ASSIST_FACTOR: f32 = 1.5;

/// Reverse-assist applies on throttle in [-0.3, 0).
const REVERSE_ASSIST_FLOOR: f32 = -0.3;

/// Post-noise throttle floor in user mode. Noise is only injected on
/// forward motion, so this floor never touches a reverse command.
const USER_MIN_THROTTLE: f32 = 0.05;

/// Result of one arbitration pass: the fused command plus the noise pair
/// that was applied (zeros outside the user-forward case).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arbitration {
    pub command: ControlCommand,
    pub noise: NoiseSample,
}

/// Fuses the human and pilot candidate commands into the final
/// (angle, throttle) pair, per mode.
///
/// Pure per-tick projection of (mode, commands, config) with no internal
/// transitions. The only held state is the RNG for exploration noise,
/// seedable for deterministic runs.
pub struct ControlArbiter {
    cfg: Arc<DriveConfig>,
    rng: StdRng,
}

impl ControlArbiter {
    pub fn new(cfg: Arc<DriveConfig>) -> Self {
        let rng = match cfg.noise_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { cfg, rng }
    }

    /// Arbitrate one tick.
    ///
    /// - `User`: reverse-assist shaping, then optional exploration noise
    ///   (forward motion only) with post-noise clamps.
    /// - `LocalAngle`: pilot steers, human keeps throttle.
    /// - `Local`: pilot drives both; throttle scaled by `ai_throttle_mult`
    ///   and clamped to [`ai_min_throttle`, `ai_max_throttle`].
    ///
    /// Absent pilot values are 0.0. A model that has not produced output
    /// yet must not stall the loop.
    pub fn arbitrate(
        &mut self,
        mode: DriveMode,
        user: ControlCommand,
        pilot: PilotCommand,
    ) -> Arbitration {
        match mode {
            DriveMode::User => self.arbitrate_user(user),
            DriveMode::LocalAngle => Arbitration {
                command: ControlCommand {
                    angle: pilot.angle.unwrap_or(0.0),
                    throttle: user.throttle,
                },
                noise: NoiseSample::default(),
            },
            DriveMode::Local => {
                let throttle = pilot
                    .throttle
                    .map(|t| t * self.cfg.ai_throttle_mult)
                    .unwrap_or(0.0)
                    .clamp(self.cfg.ai_min_throttle, self.cfg.ai_max_throttle);
                Arbitration {
                    command: ControlCommand {
                        angle: clamp_unit(pilot.angle.unwrap_or(0.0)),
                        throttle,
                    },
                    noise: NoiseSample::default(),
                }
            }
        }
    }

    fn arbitrate_user(&mut self, user: ControlCommand) -> Arbitration {
        let mut angle = user.angle;
        let mut throttle = user.throttle;

        // Quick reverse: amplify light braking/reverse taps.
        if throttle < 0.0 && throttle >= REVERSE_ASSIST_FLOOR {
            throttle *= REVERSE_ASSIST_FACTOR;
        }

        let mut noise = NoiseSample::default();
        if self.cfg.control_noise && throttle > 0.0 {
            noise = self.draw_noise();
            angle += noise.angle;
            throttle += noise.throttle;
            // Bounds apply along the injection path only; reverse throttle
            // never reaches this floor.
            throttle = throttle.clamp(USER_MIN_THROTTLE, 1.0);
            angle = clamp_unit(angle);
        }

        Arbitration {
            command: ControlCommand { angle, throttle },
            noise,
        }
    }

    fn draw_noise(&mut self) -> NoiseSample {
        let angle = self
            .rng
            .gen_range(-self.cfg.angle_noise..=self.cfg.angle_noise);
        let throttle = self
            .rng
            .gen_range(-self.cfg.throttle_noise..=self.cfg.throttle_noise);
        NoiseSample {
            angle: round3(angle),
            throttle: round3(throttle),
        }
    }
}
