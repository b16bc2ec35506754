//! Session weather summaries

use crate::types::SessionRecord;
use crate::{FeatureError, Result};

/// Whether the share of rainy samples reaches `threshold`.
///
/// Fails when the weather series is missing or holds no samples.
pub fn rained(session: &SessionRecord, threshold: f64) -> Result<bool> {
    let samples = session.weather()?;
    if samples.is_empty() {
        return Err(FeatureError::data_unavailable("weather series has no samples"));
    }

    let wet = samples.iter().filter(|sample| sample.rainfall).count();
    Ok(wet as f64 / samples.len() as f64 >= threshold)
}

/// Mean track surface temperature over all samples.
pub fn avg_track_temp(session: &SessionRecord) -> Result<f64> {
    let samples = session.weather()?;
    if samples.is_empty() {
        return Err(FeatureError::data_unavailable("weather series has no samples"));
    }

    Ok(samples.iter().map(|sample| sample.track_temp).sum::<f64>() / samples.len() as f64)
}
