//! Single-event driver metrics
//!
//! Every extractor is a pure function of one loaded session. Failures are returned
//! as typed [`FeatureError`]s so callers can tell a driver who did not take part
//! ([`FeatureError::MissingJoinKey`]) from a session that was never hydrated
//! ([`FeatureError::DataUnavailable`]); the assembler turns both into null fields.

use crate::types::{DriverNumber, SessionRecord};
use crate::{FeatureError, Result, Table};

/// A metric evaluated for one driver in one session.
///
/// All extractors in this module coerce to this signature, which is what
/// [`rolling_mean`](super::aggregate::rolling_mean) consumes.
pub type Metric<T> = fn(&DriverNumber, &SessionRecord) -> Result<T>;

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Convert a nanosecond lap time to seconds, rounded to the millisecond.
pub fn nanos_to_seconds(nanos: i64) -> f64 {
    (nanos as f64 / NANOS_PER_MILLI).round() / 1000.0
}

/// Fastest timed lap of the driver, in seconds rounded to 3 decimals.
pub fn fastest_lap_time(driver: &DriverNumber, session: &SessionRecord) -> Result<f64> {
    session
        .laps()?
        .iter()
        .filter(|lap| &lap.driver_number == driver)
        .filter_map(|lap| lap.lap_time)
        .min()
        .map(nanos_to_seconds)
        .ok_or_else(|| FeatureError::missing_join_key(driver.as_str(), Table::Laps))
}

/// Classified finishing position.
pub fn finish_position(driver: &DriverNumber, session: &SessionRecord) -> Result<u32> {
    session
        .result_for(driver)?
        .position
        .ok_or_else(|| FeatureError::missing_value(driver.as_str(), "Position"))
}

/// Starting grid position.
pub fn grid_position(driver: &DriverNumber, session: &SessionRecord) -> Result<u32> {
    session
        .result_for(driver)?
        .grid_position
        .ok_or_else(|| FeatureError::missing_value(driver.as_str(), "GridPosition"))
}

/// Places gained from grid to flag; negative when places were lost.
pub fn positions_gained(driver: &DriverNumber, session: &SessionRecord) -> Result<i32> {
    let grid = i32::try_from(grid_position(driver, session)?)
        .map_err(|_| FeatureError::missing_value(driver.as_str(), "GridPosition"))?;
    let finish = i32::try_from(finish_position(driver, session)?)
        .map_err(|_| FeatureError::missing_value(driver.as_str(), "Position"))?;
    Ok(grid - finish)
}

/// Points scored by every car of the driver's team in this session.
///
/// Rows without points count as zero; only the driver's own team name is required.
pub fn team_points(driver: &DriverNumber, session: &SessionRecord) -> Result<f64> {
    let team = session
        .result_for(driver)?
        .team_name
        .as_deref()
        .ok_or_else(|| FeatureError::missing_value(driver.as_str(), "TeamName"))?;

    Ok(session
        .results()?
        .iter()
        .filter(|row| row.team_name.as_deref() == Some(team))
        .filter_map(|row| row.points)
        .sum())
}
