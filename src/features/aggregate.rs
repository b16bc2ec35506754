//! Rolling means over a window
//!
//! A metric that fails for a window entry is left out of the mean rather than
//! poisoning it: the mean covers the entries that produced a value, and is only
//! null when none did.

use tracing::trace;

use super::metrics::Metric;
use super::window::RollingWindow;
use crate::types::DriverNumber;

/// Mean of a metric over a window, with the number of entries behind it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingMean {
    /// Mean of the entries that produced a value
    pub value: Option<f64>,
    /// Entries that produced a value
    pub used: usize,
    /// Entries whose metric failed
    pub skipped: usize,
}

impl RollingMean {
    /// Mean of the values an iterator yields, ignoring `None`.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut sum = 0.0;
        let mut used = 0;
        let mut skipped = 0;

        for value in values {
            match value {
                Some(value) => {
                    sum += value;
                    used += 1;
                }
                None => skipped += 1,
            }
        }

        let value = (used > 0).then(|| sum / used as f64);
        Self { value, used, skipped }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// Evaluate `metric` for `driver` on every window entry and average the successes.
pub fn rolling_mean<T: Into<f64>>(
    window: &RollingWindow,
    driver: &DriverNumber,
    metric: Metric<T>,
) -> RollingMean {
    let mean = RollingMean::from_values(window.iter().map(|session| match metric(driver, session) {
        Ok(value) => Some(value.into()),
        Err(e) => {
            trace!("Skipping {} for driver {}: {}", session.event, driver, e);
            None
        }
    }));

    trace!(
        "Rolling mean for driver {} over {} sessions: {:?} ({} skipped)",
        driver,
        window.len(),
        mean.value,
        mean.skipped
    );

    mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::metrics::{finish_position, positions_gained, team_points};
    use crate::test_utils::SessionBuilder;
    use crate::types::{SessionRecord, SessionType};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn window_of(sessions: Vec<SessionRecord>) -> RollingWindow {
        let requested = sessions.len();
        RollingWindow::new(
            SessionType::Race,
            sessions.into_iter().map(Arc::new).collect(),
            requested,
        )
    }

    fn race(round: u32, finish: Option<u32>, grid: Option<u32>, points: f64) -> SessionRecord {
        SessionBuilder::new(2024, round, SessionType::Race)
            .result("44", "Mercedes", finish, grid, points)
            .result("63", "Mercedes", Some(10), Some(10), 1.0)
            .build()
    }

    #[test]
    fn test_mean_over_every_entry() {
        let window = window_of(vec![
            race(5, Some(1), Some(2), 25.0),
            race(4, Some(3), Some(3), 15.0),
            race(3, Some(2), Some(6), 18.0),
        ]);
        let driver = DriverNumber::from("44");

        let finish = rolling_mean(&window, &driver, finish_position);
        assert_eq!(finish.value(), Some(2.0));
        assert_eq!((finish.used, finish.skipped), (3, 0));

        let gained = rolling_mean(&window, &driver, positions_gained);
        assert!((gained.value().unwrap() - 5.0 / 3.0).abs() < 1e-12);

        let points = rolling_mean(&window, &driver, team_points);
        assert_eq!(points.value(), Some((26.0 + 16.0 + 19.0) / 3.0));
    }

    #[test]
    fn test_null_entries_are_excluded() {
        let window = window_of(vec![
            race(5, Some(4), Some(4), 12.0),
            race(4, None, Some(8), 0.0),
            race(3, Some(8), Some(9), 4.0),
        ]);

        let finish = rolling_mean(&window, &"44".into(), finish_position);
        assert_eq!(finish.value(), Some(6.0));
        assert_eq!((finish.used, finish.skipped), (2, 1));
    }

    #[test]
    fn test_all_null_is_null() {
        let window = window_of(vec![race(5, None, None, 0.0), race(4, None, Some(3), 0.0)]);
        let finish = rolling_mean(&window, &"44".into(), finish_position);
        assert_eq!(finish.value(), None);
        assert_eq!(finish.skipped, 2);

        // Driver absent from every entry
        let absent = rolling_mean(&window, &"1".into(), team_points);
        assert_eq!(absent.value(), None);
    }

    #[test]
    fn test_empty_window_is_null() {
        let window = window_of(vec![]);
        let finish = rolling_mean(&window, &"44".into(), finish_position);
        assert_eq!(finish, RollingMean { value: None, used: 0, skipped: 0 });
    }

    proptest! {
        #[test]
        fn mean_ignores_nones(values in prop::collection::vec(prop::option::of(-50.0f64..50.0), 0..12)) {
            let mean = RollingMean::from_values(values.clone());
            let present: Vec<f64> = values.iter().flatten().copied().collect();

            prop_assert_eq!(mean.used, present.len());
            prop_assert_eq!(mean.skipped, values.len() - present.len());
            match mean.value {
                None => prop_assert!(present.is_empty()),
                Some(value) => {
                    let expected = present.iter().sum::<f64>() / present.len() as f64;
                    prop_assert!((value - expected).abs() < 1e-9);
                }
            }
        }
    }
}
