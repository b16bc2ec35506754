//! Collaborator traits for session and calendar data

use crate::types::{Event, SessionRecord, SessionRef, SessionType};
use crate::{FeatureError, Result};

/// Source of session data
///
/// Providers abstract over where sessions come from (a local archive, a remote
/// timing service, a cache). Resolution and hydration are separate steps so a
/// caller can identify a session cheaply and pay for the tables only when needed.
/// Implementations must be safe to call concurrently; the window builder issues
/// several `load` calls at once.
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    /// Identify a session of an event
    ///
    /// Returns an unhydrated [`SessionRecord`] (tables are `None`), or
    /// [`FeatureError::DataUnavailable`] when the season, event or session is unknown.
    async fn resolve(
        &self,
        year: i32,
        event: SessionRef,
        session_type: SessionType,
    ) -> Result<SessionRecord>;

    /// Hydrate a resolved session with its results, laps and weather tables
    async fn load(&self, session: SessionRecord) -> Result<SessionRecord>;

    /// Resolve and hydrate in one step
    async fn resolve_loaded(
        &self,
        year: i32,
        event: SessionRef,
        session_type: SessionType,
    ) -> Result<SessionRecord> {
        let session = self.resolve(year, event, session_type).await?;
        self.load(session).await
    }
}

/// Source of season calendars
#[async_trait::async_trait]
pub trait CalendarProvider: Send + Sync {
    /// All competition events of a season (testing excluded), ordered by round
    async fn season_events(&self, year: i32) -> Result<Vec<Event>>;

    /// The final event of a season
    async fn last_event_of_season(&self, year: i32) -> Result<Event> {
        self.season_events(year)
            .await?
            .into_iter()
            .max_by_key(|event| event.round_number)
            .ok_or_else(|| {
                FeatureError::data_unavailable(format!("season {} has no events", year))
            })
    }
}
