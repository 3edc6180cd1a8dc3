use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Duration;

use rover::kernel::command::{ControlCommand, PilotCommand};
use rover::kernel::event::{ImageRef, TickInput};
use rover::kernel::mode::DriveMode;
use rover::kernel::telemetry::MemoryTub;
use rover::{DriveConfig, DrivePipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("rover kernel booting");

    // Optional config file path as first argument; defaults otherwise.
    let mut cfg = match std::env::args().nth(1) {
        Some(path) => DriveConfig::load(path)?,
        None => DriveConfig::default(),
    };
    // The demo session is bounded unless the config says otherwise.
    if cfg.max_loops.is_none() {
        cfg.max_loops = Some(400);
    }
    cfg.validate()?;
    let cfg = Arc::new(cfg);

    let tub = MemoryTub::new();
    let mut pipeline = DrivePipeline::new(cfg.clone(), Box::new(tub));

    let (tx, rx) = mpsc::channel(100);

    // Simulated collaborators: an operator driving a short session, then
    // handing over to the pilot. Stands in for the joystick/web controller
    // and the inference part.
    let sim_cfg = cfg.clone();
    tokio::spawn(async move {
        let period = Duration::from_secs_f64(1.0 / sim_cfg.drive_loop_hz as f64);
        let mut frame: u64 = 0;

        loop {
            frame += 1;
            let phase = frame / 100;

            let input = match phase {
                // Recorded manual lap: gentle weave, steady forward throttle.
                0 => TickInput {
                    mode: DriveMode::User,
                    image: ImageRef::new(frame, Arc::new(Vec::new())),
                    user: ControlCommand::new(((frame as f32) * 0.05).sin() * 0.4, 0.3),
                    pilot: PilotCommand::default(),
                    recording: true,
                },
                // A reverse tap, recording off.
                1 => TickInput {
                    mode: DriveMode::User,
                    image: ImageRef::new(frame, Arc::new(Vec::new())),
                    user: ControlCommand::new(0.0, -0.2),
                    pilot: PilotCommand::default(),
                    recording: false,
                },
                // Autonomous steering, human throttle.
                2 => TickInput {
                    mode: DriveMode::LocalAngle,
                    image: ImageRef::new(frame, Arc::new(Vec::new())),
                    user: ControlCommand::new(0.0, 0.25),
                    pilot: PilotCommand::new(Some(((frame as f32) * 0.05).cos() * 0.5), None),
                    recording: false,
                },
                // Full autonomous.
                _ => TickInput {
                    mode: DriveMode::Local,
                    image: ImageRef::new(frame, Arc::new(Vec::new())),
                    user: ControlCommand::default(),
                    pilot: PilotCommand::new(Some(0.1), Some(0.5)),
                    recording: false,
                },
            };

            if tx.send(input).await.is_err() {
                return;
            }
            tokio::time::sleep(period).await;
        }
    });

    pipeline.run(rx).await
}
