use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::command::{ControlCommand, NoiseSample, PilotCommand};
use super::mode::DriveMode;

/// Opaque camera frame handle.
///
/// The kernel never inspects pixel data; it only routes the current frame
/// into the recorded sample. Serializes as the frame id so telemetry dumps
/// stay free of pixel payloads.
#[derive(Debug, Clone, Default)]
pub struct ImageRef {
    pub frame_id: u64,
    pub data: Arc<Vec<u8>>,
}

impl ImageRef {
    pub fn new(frame_id: u64, data: Arc<Vec<u8>>) -> Self {
        Self { frame_id, data }
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.frame_id)
    }
}

/// Everything the external collaborators resolved for the current tick:
/// operating mode, the operator's command and recording flag, the pilot's
/// most recent output, and the camera frame.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub mode: DriveMode,
    pub image: ImageRef,
    pub user: ControlCommand,
    pub pilot: PilotCommand,
    pub recording: bool,
}

/// What the kernel hands back to the actuation/inference collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// The fused command to actuate.
    pub command: ControlCommand,
    /// Noise actually applied to the user command this tick.
    pub noise: NoiseSample,
    /// Whether inference should run.
    pub run_pilot: bool,
    /// Whether recording is active after gating.
    pub recording: bool,
    /// Set when the record count crossed a fresh milestone this tick.
    pub milestone: Option<u64>,
}
