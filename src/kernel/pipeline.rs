use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use super::arbiter::ControlArbiter;
use super::command::ControlCommand;
use super::event::{TickInput, TickOutput};
use super::filter::ThrottleFilter;
use super::mode;
use super::telemetry::{TelemetryGate, TubWriter};
use super::time::Tick;
use super::tracker::RecordTracker;
use crate::config::DriveConfig;

/// The per-tick decision pipeline: gating, throttle shaping, arbitration,
/// conditional persistence, record tracking.
///
/// `tick_step` is synchronous and never blocks; the async `run` driver
/// around it owns wall-clock time. Collaborators (camera, controller,
/// pilot) hand in already-resolved values for the tick; if a threaded
/// collaborator has nothing fresh, the driver re-uses its most recent
/// value rather than waiting. The `run_pilot` flag in the output tells the
/// inference collaborator whether to produce values for the next tick.
pub struct DrivePipeline {
    cfg: Arc<DriveConfig>,
    filter: ThrottleFilter,
    arbiter: ControlArbiter,
    gate: TelemetryGate,
    tracker: RecordTracker,
    tub: Box<dyn TubWriter + Send>,
    pub tick: Tick,
}

impl DrivePipeline {
    pub fn new(cfg: Arc<DriveConfig>, tub: Box<dyn TubWriter + Send>) -> Self {
        Self {
            filter: ThrottleFilter::new(),
            arbiter: ControlArbiter::new(cfg.clone()),
            gate: TelemetryGate::new(cfg.clone()),
            tracker: RecordTracker::new(cfg.record_alert_levels.clone()),
            cfg,
            tub,
            tick: Tick::new(),
        }
    }

    pub fn gate(&self) -> &TelemetryGate {
        &self.gate
    }

    /// Execute one tick. Ordering within the tick is fixed: the gate flags
    /// are computed before the operations they control, and arbitration
    /// runs before telemetry since the fused command is part of the sample.
    pub fn tick_step(&mut self, input: TickInput) -> anyhow::Result<TickOutput> {
        self.tick = self.tick.next();

        let run_pilot = input.mode.run_pilot();
        let recording = if self.cfg.record_during_ai {
            mode::ai_recording(input.mode, input.recording)
        } else {
            input.recording
        };

        // Shape the user throttle before arbitration; the filtered value is
        // also what gets recorded as user/throttle.
        let user = ControlCommand {
            angle: input.user.angle,
            throttle: self.filter.apply(input.user.throttle),
        };

        let arbitration = self.arbiter.arbitrate(input.mode, user, input.pilot);

        let mut milestone = None;
        if self.gate.should_persist(recording) {
            let sample = self
                .gate
                .collect(&input.image, input.mode, user, input.pilot, &arbitration);
            let count = self.tub.write_record(sample)?;
            milestone = self.tracker.observe(Some(count));
        }

        Ok(TickOutput {
            command: arbitration.command,
            noise: arbitration.noise,
            run_pilot,
            recording,
            milestone,
        })
    }

    /// Fixed-rate driver loop. Drains the input channel each tick and keeps
    /// the most recent value; a missed deadline skips rather than bursts.
    pub async fn run(&mut self, mut inputs: mpsc::Receiver<TickInput>) -> anyhow::Result<()> {
        info!(rate_hz = self.cfg.drive_loop_hz, "drive loop started");

        let period = Duration::from_secs_f64(1.0 / self.cfg.drive_loop_hz as f64);
        let mut cadence = interval(period);
        cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut latest = TickInput::default();
        let mut loops: u64 = 0;

        loop {
            cadence.tick().await;

            while let Ok(input) = inputs.try_recv() {
                latest = input;
            }

            let output = self.tick_step(latest.clone())?;
            debug!(
                frame = self.tick.frame,
                mode = %latest.mode,
                angle = output.command.angle,
                throttle = output.command.throttle,
                recording = output.recording,
                "tick"
            );

            loops += 1;
            if let Some(max) = self.cfg.max_loops {
                if loops >= max {
                    info!(loops, "drive loop finished");
                    return Ok(());
                }
            }
        }
    }
}
