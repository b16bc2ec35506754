//! Test utilities: session builders, generated season fixtures and test-data access
//!
//! Shared by unit tests and the benchmarks (behind the `benchmark` feature).

#![cfg(any(test, feature = "benchmark"))]

use std::path::{Path, PathBuf};

use crate::providers::ArchiveProvider;
use crate::types::{
    DriverNumber, Event, LapRow, ResultRow, SessionRecord, SessionType, WeatherSample,
};

/// Guidance shown when a test-data fixture is missing from the checkout.
pub const FIXTURE_INSTALL_GUIDANCE: &str =
    "Session archives are stored under test-data/archive. Restore them from the repository.";

/// Error returned when a required fixture cannot be located.
#[derive(Debug, Clone)]
pub struct FixtureError {
    message: String,
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FixtureError {}

/// The crate's `test-data/` directory.
pub fn test_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

/// Require that a fixture exists inside `test-data/` and return its path.
pub fn require_fixture(relative: &str) -> Result<PathBuf, FixtureError> {
    let path = test_data_dir().join(relative);
    if path.exists() {
        Ok(path)
    } else {
        Err(FixtureError {
            message: format!(
                "Missing fixture: {}. {}",
                path.display(),
                FIXTURE_INSTALL_GUIDANCE
            ),
        })
    }
}

/// Lap time in nanoseconds from minutes and seconds.
pub fn lap_nanos(minutes: u32, seconds: f64) -> i64 {
    ((minutes as f64 * 60.0 + seconds) * 1e9).round() as i64
}

/// Fluent builder for loaded sessions
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    event: Event,
    session_type: SessionType,
    results: Vec<ResultRow>,
    laps: Vec<LapRow>,
    weather: Vec<WeatherSample>,
}

impl SessionBuilder {
    pub fn new(year: i32, round_number: u32, session_type: SessionType) -> Self {
        Self {
            event: Event::new(year, round_number, format!("Grand Prix {}", round_number)),
            session_type,
            results: Vec::new(),
            laps: Vec::new(),
            weather: Vec::new(),
        }
    }

    pub fn result(
        mut self,
        driver: &str,
        team: &str,
        finish: Option<u32>,
        grid: Option<u32>,
        points: f64,
    ) -> Self {
        self.results.push(ResultRow {
            driver_number: DriverNumber::from(driver),
            team_name: Some(team.to_string()),
            position: finish,
            grid_position: grid,
            points: Some(points),
        });
        self
    }

    pub fn lap(mut self, driver: &str, lap_time: i64) -> Self {
        let lap_number = self.laps.iter().filter(|l| l.driver_number.as_str() == driver).count();
        self.laps.push(LapRow {
            driver_number: DriverNumber::from(driver),
            lap_number: Some(lap_number as u32 + 1),
            lap_time: Some(lap_time),
        });
        self
    }

    pub fn untimed_lap(mut self, driver: &str) -> Self {
        self.laps.push(LapRow {
            driver_number: DriverNumber::from(driver),
            lap_number: None,
            lap_time: None,
        });
        self
    }

    pub fn weather(mut self, rainfall: bool, track_temp: f64) -> Self {
        let time = self.weather.len() as i64 * 60_000;
        self.weather.push(WeatherSample { time, rainfall, track_temp });
        self
    }

    /// Session with all three tables present.
    pub fn build(self) -> SessionRecord {
        SessionRecord::new(self.event, self.session_type).with_tables(
            self.results,
            self.laps,
            self.weather,
        )
    }

    /// Session handle with no tables.
    pub fn unloaded(self) -> SessionRecord {
        SessionRecord::new(self.event, self.session_type)
    }
}

/// Drivers present in generated fixtures: (number, team)
pub const FIXTURE_DRIVERS: [(&str, &str); 4] =
    [("1", "Red Bull Racing"), ("11", "Red Bull Racing"), ("44", "Mercedes"), ("63", "Mercedes")];

/// Deterministic race and qualifying sessions for one round.
///
/// Driver `i` (index into [`FIXTURE_DRIVERS`]) qualifies and starts in
/// `(i + round) % 4 + 1` and finishes in `(i + 2 * round) % 4 + 1`; points follow
/// the finish order (25, 18, 15, 12). Every fourth round is wet.
pub fn fixture_round(year: i32, round_number: u32) -> [SessionRecord; 2] {
    let slot = |i: usize, step: u32| ((i as u32 + step * round_number) % 4) + 1;
    let points = |position: u32| [25.0, 18.0, 15.0, 12.0][position as usize - 1];
    let wet = round_number % 4 == 0;

    let mut race = SessionBuilder::new(year, round_number, SessionType::Race);
    let mut quali = SessionBuilder::new(year, round_number, SessionType::Qualifying);

    for (i, (driver, team)) in FIXTURE_DRIVERS.iter().enumerate() {
        let grid = slot(i, 1);
        let finish = slot(i, 2);
        race = race
            .result(driver, team, Some(finish), Some(grid), points(finish))
            .lap(driver, lap_nanos(1, 30.0 + finish as f64));
        quali = quali
            .result(driver, team, Some(grid), None, 0.0)
            .lap(driver, lap_nanos(1, 28.0 + grid as f64 / 10.0));
    }

    for sample in 0..10 {
        let temp = 30.0 + sample as f64;
        race = race.weather(wet && sample < 5, temp);
        quali = quali.weather(false, temp);
    }

    [race.build(), quali.build()]
}

/// Provider serving generated fixtures for `(year, rounds)` seasons.
pub fn fixture_provider(seasons: &[(i32, u32)]) -> ArchiveProvider {
    let sessions = seasons
        .iter()
        .flat_map(|&(year, rounds)| (1..=rounds).flat_map(move |round| fixture_round(year, round)));

    match ArchiveProvider::from_sessions(sessions) {
        Ok(provider) => provider,
        Err(e) => panic!("generated fixtures are always valid: {e}"),
    }
}
