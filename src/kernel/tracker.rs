use tracing::info;

use crate::config::AlertLevel;

/// Milestone granularity for operator feedback.
const MILESTONE_INTERVAL: u64 = 10;

/// Sentinel below any valid count so the very first milestone reports.
const UNREPORTED: i64 = -100;

/// Observes the tub's record count and reports every new multiple of ten.
///
/// Purely an operator-feedback observer: the count is owned by the
/// persistence layer, never incremented here. Reporting is idempotent per
/// distinct count value no matter how often the same count is observed.
#[derive(Debug)]
pub struct RecordTracker {
    last_reported: i64,
    alert_levels: Vec<AlertLevel>,
}

impl RecordTracker {
    pub fn new(alert_levels: Vec<AlertLevel>) -> Self {
        Self {
            last_reported: UNREPORTED,
            alert_levels,
        }
    }

    /// Observe the current record count, if the tub produced one this tick.
    /// Returns the count when it crosses a fresh milestone.
    pub fn observe(&mut self, count: Option<u64>) -> Option<u64> {
        let count = count?;
        if count % MILESTONE_INTERVAL == 0 && count as i64 != self.last_reported {
            info!(records = count, "recorded {} records", count);
            self.last_reported = count as i64;
            return Some(count);
        }
        None
    }

    /// Feedback color for the current count: the color of the highest
    /// configured threshold not exceeding it, black below all thresholds.
    pub fn alert_color(&self, count: u64) -> [u8; 3] {
        let mut color = [0, 0, 0];
        for level in &self.alert_levels {
            if count >= level.count {
                color = level.color;
            }
        }
        color
    }
}
