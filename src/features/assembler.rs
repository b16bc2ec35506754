//! Feature record assembly
//!
//! Windows are built once per event and shared by every driver's record; the
//! per-driver step is a pure function of the loaded sessions and windows.

use tracing::debug;

use super::aggregate::rolling_mean;
use super::metrics::{fastest_lap_time, finish_position, positions_gained, team_points};
use super::weather::{avg_track_temp, rained};
use super::window::{RollingWindow, RollingWindowBuilder};
use crate::provider::{CalendarProvider, SessionProvider};
use crate::types::{DriverNumber, FeatureRecord, SessionRecord, SessionType, podium};
use crate::{FeatureConfig, RollingWindowSpec};

/// Historical windows shared by every driver of one event
#[derive(Debug, Clone)]
pub struct EventWindows {
    pub race: RollingWindow,
    pub quali: RollingWindow,
}

/// Composes metrics, weather and rolling means into [`FeatureRecord`]s
pub struct FeatureAssembler<'a, P> {
    provider: &'a P,
    spec: RollingWindowSpec,
    rain_threshold: f64,
}

impl<'a, P> FeatureAssembler<'a, P>
where
    P: SessionProvider + CalendarProvider,
{
    /// Windows are always built exclusive of the event being described.
    pub fn new(provider: &'a P, spec: RollingWindowSpec, rain_threshold: f64) -> Self {
        Self { provider, spec: spec.with_inclusive(false), rain_threshold }
    }

    pub fn from_config(provider: &'a P, config: &FeatureConfig) -> Self {
        Self::new(provider, config.window_spec(), config.rain_threshold)
    }

    /// Race and qualifying windows behind `race`.
    ///
    /// Both walk back through the race calendar; the qualifying window loads the
    /// qualifying session of each race round.
    pub async fn event_windows(&self, race: &SessionRecord) -> EventWindows {
        let builder = RollingWindowBuilder::new(self.provider, self.spec);
        let (race_window, quali_window) = futures::join!(
            builder.build(race, SessionType::Race),
            builder.build(race, SessionType::Qualifying)
        );
        EventWindows { race: race_window, quali: quali_window }
    }

    /// One driver's record; unavailable metrics become `None`.
    pub fn assemble(
        &self,
        driver: &DriverNumber,
        race: &SessionRecord,
        quali: &SessionRecord,
        windows: &EventWindows,
    ) -> FeatureRecord {
        let finish = finish_position(driver, race).ok();

        FeatureRecord {
            event: race.event.clone(),
            driver_number: driver.clone(),
            fastest_quali_lap: fastest_lap_time(driver, quali).ok(),
            finish_position: finish,
            team_points: team_points(driver, race).ok(),
            quali_position: finish_position(driver, quali).ok(),
            positions_gained: positions_gained(driver, race).ok(),
            rolling_avg_positions_gained: rolling_mean(&windows.race, driver, positions_gained)
                .value(),
            rolling_avg_team_points: rolling_mean(&windows.race, driver, team_points).value(),
            rolling_avg_finish_position: rolling_mean(&windows.race, driver, finish_position)
                .value(),
            rolling_avg_quali_position: rolling_mean(&windows.quali, driver, finish_position)
                .value(),
            rained: rained(race, self.rain_threshold).ok(),
            avg_track_temp: avg_track_temp(race).ok(),
            window_size: self.spec.size,
            race_window_len: windows.race.len(),
            quali_window_len: windows.quali.len(),
            podium: podium(finish),
        }
    }

    /// Records for every driver classified in the race.
    pub async fn assemble_event(
        &self,
        race: &SessionRecord,
        quali: &SessionRecord,
    ) -> Vec<FeatureRecord> {
        let windows = self.event_windows(race).await;
        let drivers = race.drivers();

        debug!(
            "Assembling {} records for {} (race window {}, quali window {})",
            drivers.len(),
            race.event,
            windows.race.len(),
            windows.quali.len()
        );

        drivers.iter().map(|driver| self.assemble(driver, race, quali, &windows)).collect()
    }
}
