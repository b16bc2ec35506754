//! Archive provider for exported session data
//!
//! Serves sessions and calendars from a YAML archive of seasons → events → sessions,
//! with no network access. The archive layout mirrors the column names of common
//! timing exports:
//!
//! ```yaml
//! Seasons:
//!   - Year: 2024
//!     Events:
//!       - RoundNumber: 1
//!         EventName: Bahrain Grand Prix
//!         Race:
//!           Results:
//!             - { DriverNumber: '1', TeamName: Red Bull Racing, Position: 1, GridPosition: 1, Points: 26 }
//!           Laps:
//!             - { DriverNumber: '1', LapNumber: 1, LapTime: 97284000000 }
//!           Weather:
//!             - { Time: 0, Rainfall: false, TrackTemp: 29.4 }
//!         Qualifying:
//!           Results: []
//! ```
//!
//! Car numbers may be written quoted or as bare integers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, trace};

use crate::provider::{CalendarProvider, SessionProvider};
use crate::types::{
    Event, EventKey, LapRow, ResultRow, SessionRecord, SessionRef, SessionType, WeatherSample,
};
use crate::yaml_utils::{clean_yaml, decode_yaml_bytes};
use crate::{FeatureError, Result};

/// Root of a session archive document
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct SessionArchive {
    pub seasons: Vec<ArchiveSeason>,
}

/// One season of the archive
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct ArchiveSeason {
    pub year: i32,
    pub events: Vec<ArchiveEvent>,
}

/// One event of a season and the sessions recorded for it
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct ArchiveEvent {
    pub round_number: u32,
    pub event_name: String,
    pub race: Option<ArchiveTables>,
    pub qualifying: Option<ArchiveTables>,
}

/// Tables of one archived session; a missing table stays unhydrated after `load`
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct ArchiveTables {
    pub results: Option<Vec<ResultRow>>,
    pub laps: Option<Vec<LapRow>>,
    pub weather: Option<Vec<WeatherSample>>,
}

impl SessionArchive {
    /// Parse an archive document, cleaning stray control characters first.
    pub fn parse(yaml: &str) -> Result<Self> {
        let cleaned = clean_yaml(yaml)?;
        serde_yaml_ng::from_str(&cleaned).map_err(|e| FeatureError::Parse {
            context: "Session archive deserialization".to_string(),
            details: e.to_string(),
        })
    }

    /// Add a session's tables to the archive, creating its season and event as needed.
    pub fn insert(&mut self, session: SessionRecord) {
        let SessionRecord { event, session_type, results, laps, weather } = session;

        let season_index = match self.seasons.iter().position(|s| s.year == event.year) {
            Some(index) => index,
            None => {
                self.seasons.push(ArchiveSeason { year: event.year, events: Vec::new() });
                self.seasons.len() - 1
            }
        };
        let events = &mut self.seasons[season_index].events;

        let event_index = match events.iter().position(|e| e.round_number == event.round_number) {
            Some(index) => index,
            None => {
                events.push(ArchiveEvent {
                    round_number: event.round_number,
                    event_name: event.name,
                    race: None,
                    qualifying: None,
                });
                events.len() - 1
            }
        };
        let archived = &mut events[event_index];

        let tables = ArchiveTables { results, laps, weather };
        match session_type {
            SessionType::Race => archived.race = Some(tables),
            SessionType::Qualifying => archived.qualifying = Some(tables),
        }
    }
}

/// Session and calendar provider backed by an in-memory [`SessionArchive`]
pub struct ArchiveProvider {
    /// Season calendars ordered by round
    calendars: BTreeMap<i32, Vec<Event>>,

    /// Session tables by event and session type
    sessions: HashMap<(EventKey, SessionType), ArchiveTables>,

    /// Number of `load` calls served
    loads: AtomicUsize,
}

impl ArchiveProvider {
    /// Open a YAML archive file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).map_err(|e| FeatureError::file_error(path.to_path_buf(), e))?;
        let yaml = decode_yaml_bytes(&bytes)?;
        let provider = Self::from_archive(SessionArchive::parse(&yaml)?)?;

        info!(
            "Opened session archive {}: {} seasons, {} sessions",
            path.display(),
            provider.calendars.len(),
            provider.sessions.len()
        );

        Ok(provider)
    }

    /// Build a provider from an archive document
    ///
    /// Fails with [`FeatureError::Parse`] when a season lists the same round twice.
    pub fn from_archive(archive: SessionArchive) -> Result<Self> {
        let mut calendars: BTreeMap<i32, Vec<Event>> = BTreeMap::new();
        let mut sessions = HashMap::new();

        for season in archive.seasons {
            let calendar = calendars.entry(season.year).or_default();

            for archived in season.events {
                let event = Event::new(season.year, archived.round_number, archived.event_name);

                if calendar.iter().any(|e| e.round_number == event.round_number) {
                    return Err(FeatureError::Parse {
                        context: "Session archive validation".to_string(),
                        details: format!("duplicate event {}", event.key()),
                    });
                }

                if let Some(tables) = archived.race {
                    sessions.insert((event.key(), SessionType::Race), tables);
                }
                if let Some(tables) = archived.qualifying {
                    sessions.insert((event.key(), SessionType::Qualifying), tables);
                }
                calendar.push(event);
            }

            calendar.sort_by_key(|event| event.round_number);
        }

        Ok(Self { calendars, sessions, loads: AtomicUsize::new(0) })
    }

    /// Build a provider directly from session records
    pub fn from_sessions<I>(sessions: I) -> Result<Self>
    where
        I: IntoIterator<Item = SessionRecord>,
    {
        let mut archive = SessionArchive::default();
        for session in sessions {
            archive.insert(session);
        }
        Self::from_archive(archive)
    }

    /// Number of sessions hydrated so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    fn calendar(&self, year: i32) -> Result<&[Event]> {
        self.calendars
            .get(&year)
            .map(Vec::as_slice)
            .ok_or_else(|| FeatureError::data_unavailable(format!("season {} not in archive", year)))
    }

    fn find_event(&self, year: i32, event: &SessionRef) -> Result<&Event> {
        let calendar = self.calendar(year)?;

        let found = match event {
            SessionRef::Round(round) => calendar.iter().find(|e| e.round_number == *round),
            SessionRef::Name(name) => {
                let wanted = name.to_lowercase();
                calendar
                    .iter()
                    .find(|e| e.name.to_lowercase() == wanted)
                    .or_else(|| calendar.iter().find(|e| e.name.to_lowercase().contains(&wanted)))
            }
        };

        found.ok_or_else(|| {
            FeatureError::data_unavailable(format!("no event {} in season {}", event, year))
        })
    }
}

#[async_trait::async_trait]
impl SessionProvider for ArchiveProvider {
    async fn resolve(
        &self,
        year: i32,
        event: SessionRef,
        session_type: SessionType,
    ) -> Result<SessionRecord> {
        let found = self.find_event(year, &event)?;

        if !self.sessions.contains_key(&(found.key(), session_type)) {
            return Err(FeatureError::data_unavailable(format!(
                "no {} session archived for {}",
                session_type, found
            )));
        }

        trace!("Resolved {} {} to {}", session_type, event, found);
        Ok(SessionRecord::new(found.clone(), session_type))
    }

    async fn load(&self, session: SessionRecord) -> Result<SessionRecord> {
        let tables = self.sessions.get(&(session.key(), session.session_type)).ok_or_else(|| {
            FeatureError::data_unavailable(format!(
                "no {} session archived for {}",
                session.session_type, session.event
            ))
        })?;

        self.loads.fetch_add(1, Ordering::Relaxed);
        debug!("Loading {} {}", session.session_type, session.event);

        Ok(SessionRecord {
            results: tables.results.clone(),
            laps: tables.laps.clone(),
            weather: tables.weather.clone(),
            ..session
        })
    }
}

#[async_trait::async_trait]
impl CalendarProvider for ArchiveProvider {
    async fn season_events(&self, year: i32) -> Result<Vec<Event>> {
        Ok(self.calendar(year)?.to_vec())
    }
}
