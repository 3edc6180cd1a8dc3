use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::sample::{FieldValue, Sample};
use super::schema::SampleSchema;
use crate::kernel::arbiter::Arbitration;
use crate::kernel::command::{ControlCommand, PilotCommand};
use crate::kernel::event::ImageRef;
use crate::kernel::mode::DriveMode;
use crate::config::DriveConfig;

/// The external persistence collaborator ("tub"). Writes one sample and
/// returns the updated record count.
pub trait TubWriter {
    fn write_record(&mut self, sample: Sample) -> anyhow::Result<u64>;
}

/// Assembles samples per the session schema and decides when one is
/// written.
pub struct TelemetryGate {
    cfg: Arc<DriveConfig>,
    schema: SampleSchema,
}

impl TelemetryGate {
    pub fn new(cfg: Arc<DriveConfig>) -> Self {
        let schema = SampleSchema::build(&cfg);
        Self { cfg, schema }
    }

    pub fn schema(&self) -> &SampleSchema {
        &self.schema
    }

    /// A sample is written exactly when the recording flag is up for this
    /// tick. The flag itself is produced by the gating logic upstream.
    pub fn should_persist(&self, recording: bool) -> bool {
        recording
    }

    /// Build this tick's sample. `user` is the shaped user command as fed
    /// to arbitration; absent pilot values record as 0.0, matching their
    /// treatment in the arbiter.
    pub fn collect(
        &self,
        image: &ImageRef,
        mode: DriveMode,
        user: ControlCommand,
        pilot: PilotCommand,
        arbitration: &Arbitration,
    ) -> Sample {
        let mut fields = Vec::with_capacity(self.schema.len());
        fields.push(("cam/image_array", FieldValue::Image(image.clone())));
        fields.push(("user/angle", FieldValue::Float(user.angle)));
        fields.push(("user/throttle", FieldValue::Float(user.throttle)));
        fields.push(("user/mode", FieldValue::Str(mode.to_string())));

        if self.cfg.record_during_ai {
            fields.push(("pilot/angle", FieldValue::Float(pilot.angle.unwrap_or(0.0))));
            fields.push((
                "pilot/throttle",
                FieldValue::Float(pilot.throttle.unwrap_or(0.0)),
            ));
        }

        if self.cfg.control_noise {
            fields.push(("user/angle_noise", FieldValue::Float(arbitration.noise.angle)));
            fields.push((
                "user/throttle_noise",
                FieldValue::Float(arbitration.noise.throttle),
            ));
        }

        fields.push(("angle", FieldValue::Float(arbitration.command.angle)));
        fields.push(("throttle", FieldValue::Float(arbitration.command.throttle)));

        let sample = Sample::new(fields);
        debug_assert!(sample.names().eq(self.schema.names()));
        sample
    }
}

/// In-memory tub for tests and the demo driver. The real datastore lives
/// outside this crate behind the same trait.
#[derive(Debug)]
pub struct MemoryTub {
    session_id: Uuid,
    records: Vec<Sample>,
}

impl MemoryTub {
    pub fn new() -> Self {
        let session_id = Uuid::new_v4();
        info!(%session_id, "opened in-memory tub");
        Self {
            session_id,
            records: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn records(&self) -> &[Sample] {
        &self.records
    }

    /// Dump all records as pretty JSON (image fields as frame ids).
    pub fn dump_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }
}

impl Default for MemoryTub {
    fn default() -> Self {
        Self::new()
    }
}

impl TubWriter for MemoryTub {
    fn write_record(&mut self, sample: Sample) -> anyhow::Result<u64> {
        self.records.push(sample);
        Ok(self.records.len() as u64)
    }
}
