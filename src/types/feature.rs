//! Output feature record

use serde::{Deserialize, Serialize};

use super::{DriverNumber, Event};

/// Feature vector for one driver at one event.
///
/// Every metric is optional: an extractor that cannot produce a value leaves its
/// field `None` rather than failing the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub event: Event,
    pub driver_number: DriverNumber,

    // Current event
    /// Fastest qualifying lap in seconds
    pub fastest_quali_lap: Option<f64>,
    pub finish_position: Option<u32>,
    /// Points scored by the driver's whole team in the race
    pub team_points: Option<f64>,
    pub quali_position: Option<u32>,
    pub positions_gained: Option<i32>,

    // Rolling window
    pub rolling_avg_positions_gained: Option<f64>,
    pub rolling_avg_team_points: Option<f64>,
    pub rolling_avg_finish_position: Option<f64>,
    pub rolling_avg_quali_position: Option<f64>,

    // Race weather
    pub rained: Option<bool>,
    pub avg_track_temp: Option<f64>,

    /// Configured window size
    pub window_size: usize,
    /// Race sessions actually present in the rolling window
    pub race_window_len: usize,
    /// Qualifying sessions actually present in the rolling window
    pub quali_window_len: usize,

    /// Finished in the top three; `None` when the finish position is unknown
    pub podium: Option<bool>,
}

impl FeatureRecord {
    /// Whether both rolling windows reached the configured size.
    pub fn has_full_history(&self) -> bool {
        self.race_window_len == self.window_size && self.quali_window_len == self.window_size
    }
}

/// Podium flag derived from a finish position; unknown positions stay unknown.
pub fn podium(finish_position: Option<u32>) -> Option<bool> {
    finish_position.map(|position| position <= 3)
}
