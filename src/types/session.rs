//! Session tables: classification results, laps and weather samples

use serde::{Deserialize, Serialize};

use super::{DriverNumber, Event, EventKey, SessionType};
use crate::{FeatureError, Result, Table};

/// One classified row of a session's results table
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct ResultRow {
    /// Car number (join key)
    pub driver_number: DriverNumber,
    /// Constructor name
    pub team_name: Option<String>,
    /// Final classified position
    pub position: Option<u32>,
    /// Starting grid slot
    pub grid_position: Option<u32>,
    /// Championship points scored in this session
    pub points: Option<f64>,
}

/// One timed lap
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct LapRow {
    /// Car number (join key)
    pub driver_number: DriverNumber,
    /// Lap counter within the session
    pub lap_number: Option<u32>,
    /// Lap time in nanoseconds, absent for deleted or untimed laps
    pub lap_time: Option<i64>,
}

/// One weather station reading
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct WeatherSample {
    /// Offset from session start in milliseconds
    pub time: i64,
    /// Whether rain was falling at the time of the sample
    pub rainfall: bool,
    /// Track surface temperature in degrees Celsius
    pub track_temp: f64,
}

/// A single session of an event.
///
/// Tables are `None` until a [`SessionProvider`](crate::provider::SessionProvider)
/// hydrates the session; a session is only usable in a window once all three are present.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub event: Event,
    pub session_type: SessionType,
    pub results: Option<Vec<ResultRow>>,
    pub laps: Option<Vec<LapRow>>,
    pub weather: Option<Vec<WeatherSample>>,
}

impl SessionRecord {
    /// Create an unhydrated session handle.
    pub fn new(event: Event, session_type: SessionType) -> Self {
        Self { event, session_type, results: None, laps: None, weather: None }
    }

    /// Attach all three tables, marking the session as loaded.
    pub fn with_tables(
        mut self,
        results: Vec<ResultRow>,
        laps: Vec<LapRow>,
        weather: Vec<WeatherSample>,
    ) -> Self {
        self.results = Some(results);
        self.laps = Some(laps);
        self.weather = Some(weather);
        self
    }

    pub fn key(&self) -> EventKey {
        self.event.key()
    }

    /// Whether results, laps and weather are all present.
    pub fn is_loaded(&self) -> bool {
        self.results.is_some() && self.laps.is_some() && self.weather.is_some()
    }

    pub fn results(&self) -> Result<&[ResultRow]> {
        self.results.as_deref().ok_or_else(|| FeatureError::table_unavailable(Table::Results))
    }

    pub fn laps(&self) -> Result<&[LapRow]> {
        self.laps.as_deref().ok_or_else(|| FeatureError::table_unavailable(Table::Laps))
    }

    pub fn weather(&self) -> Result<&[WeatherSample]> {
        self.weather.as_deref().ok_or_else(|| FeatureError::table_unavailable(Table::Weather))
    }

    /// The driver's row in the results table.
    pub fn result_for(&self, driver: &DriverNumber) -> Result<&ResultRow> {
        self.results()?
            .iter()
            .find(|row| &row.driver_number == driver)
            .ok_or_else(|| FeatureError::missing_join_key(driver.as_str(), Table::Results))
    }

    /// Drivers listed in the results table, in classification order.
    pub fn drivers(&self) -> Vec<DriverNumber> {
        self.results
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|row| row.driver_number.clone())
            .collect()
    }
}
