//! Previous-event resolution
//!
//! Stepping back one event is a pure function of the `(year, round)` key, except at
//! a season opener, where the previous season's calendar decides which round was
//! last. Sessions are only touched once the key is known.

use tracing::debug;

use crate::provider::{CalendarProvider, SessionProvider};
use crate::types::{Event, EventKey, SessionRecord, SessionRef, SessionType};
use crate::{FeatureError, Result};

/// Outcome of stepping back from an event key without consulting a calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviousStep {
    /// Earlier round of the same season
    SameSeason(EventKey),
    /// Last round of the given season, which only its calendar knows
    LastOfSeason(i32),
    /// Season opener with rollover disabled
    SeasonStart,
}

/// Step back one event from `key`.
pub fn step_back(key: EventKey, cross_season: bool) -> PreviousStep {
    if !key.is_season_opener() {
        PreviousStep::SameSeason(EventKey::new(key.year, key.round_number - 1))
    } else if cross_season {
        PreviousStep::LastOfSeason(key.year - 1)
    } else {
        PreviousStep::SeasonStart
    }
}

/// Finds the session of the event immediately before an anchor
pub struct PreviousEventResolver<'a, P> {
    provider: &'a P,
    cross_season: bool,
}

impl<'a, P> PreviousEventResolver<'a, P>
where
    P: SessionProvider + CalendarProvider,
{
    pub fn new(provider: &'a P, cross_season: bool) -> Self {
        Self { provider, cross_season }
    }

    /// Key of the event before `key`, consulting the calendar across a season boundary.
    pub async fn previous_key(&self, key: EventKey) -> Result<EventKey> {
        match step_back(key, self.cross_season) {
            PreviousStep::SameSeason(previous) => Ok(previous),
            PreviousStep::LastOfSeason(year) => {
                let last = self.provider.last_event_of_season(year).await?;
                Ok(last.key())
            }
            PreviousStep::SeasonStart => Err(FeatureError::data_unavailable(format!(
                "{} opens its season and rollover is disabled",
                key
            ))),
        }
    }

    /// Resolve and fully hydrate the `session_type` session of the event at `key`.
    pub async fn load_key(&self, key: EventKey, session_type: SessionType) -> Result<SessionRecord> {
        let session = self
            .provider
            .resolve(key.year, SessionRef::Round(key.round_number), session_type)
            .await?;
        let session = self.provider.load(session).await?;

        if !session.is_loaded() {
            return Err(FeatureError::data_unavailable(format!(
                "{} session of {} is missing tables after load",
                session_type, key
            )));
        }

        Ok(session)
    }

    /// Previous event's session, with the reason when there is none.
    pub async fn try_resolve(
        &self,
        anchor: &Event,
        session_type: SessionType,
    ) -> Result<SessionRecord> {
        let previous = self.previous_key(anchor.key()).await?;
        self.load_key(previous, session_type).await
    }

    /// Previous event's session, or `None` if it cannot be resolved or loaded.
    pub async fn resolve(&self, anchor: &Event, session_type: SessionType) -> Option<SessionRecord> {
        match self.try_resolve(anchor, session_type).await {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("No {} session before {}: {}", session_type, anchor, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture_provider;
    use proptest::prelude::*;

    #[test]
    fn test_step_back_within_season() {
        assert_eq!(
            step_back(EventKey::new(2024, 6), true),
            PreviousStep::SameSeason(EventKey::new(2024, 5))
        );
        assert_eq!(
            step_back(EventKey::new(2024, 2), false),
            PreviousStep::SameSeason(EventKey::new(2024, 1))
        );
    }

    #[test]
    fn test_step_back_at_season_opener() {
        assert_eq!(step_back(EventKey::new(2024, 1), true), PreviousStep::LastOfSeason(2023));
        assert_eq!(step_back(EventKey::new(2024, 1), false), PreviousStep::SeasonStart);
    }

    #[test]
    fn test_step_back_from_round_zero_never_underflows() {
        assert_eq!(step_back(EventKey::new(2024, 0), true), PreviousStep::LastOfSeason(2023));
        assert_eq!(step_back(EventKey::new(2024, 0), false), PreviousStep::SeasonStart);
    }

    proptest! {
        #[test]
        fn step_back_is_strictly_earlier(year in 1950i32..2100, round in 2u32..30, cross in any::<bool>()) {
            match step_back(EventKey::new(year, round), cross) {
                PreviousStep::SameSeason(previous) => prop_assert!(previous < EventKey::new(year, round)),
                other => prop_assert!(false, "unexpected step {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_resolves_previous_round() {
        let provider = fixture_provider(&[(2024, 6)]);
        let resolver = PreviousEventResolver::new(&provider, true);

        let anchor = Event::new(2024, 6, "Grand Prix 6");
        let previous = resolver.resolve(&anchor, SessionType::Race).await.unwrap();
        assert_eq!(previous.key(), EventKey::new(2024, 5));
        assert_eq!(previous.session_type, SessionType::Race);
        assert!(previous.is_loaded());
    }

    #[tokio::test]
    async fn test_rolls_over_to_last_event_of_previous_season() {
        let provider = fixture_provider(&[(2023, 22), (2024, 3)]);
        let resolver = PreviousEventResolver::new(&provider, true);

        let anchor = Event::new(2024, 1, "Grand Prix 1");
        let previous = resolver.resolve(&anchor, SessionType::Qualifying).await.unwrap();
        assert_eq!(previous.key(), EventKey::new(2023, 22));
        assert_eq!(previous.session_type, SessionType::Qualifying);
    }

    #[tokio::test]
    async fn test_season_opener_without_rollover_is_not_found() {
        let provider = fixture_provider(&[(2023, 22), (2024, 3)]);
        let resolver = PreviousEventResolver::new(&provider, false);

        let anchor = Event::new(2024, 1, "Grand Prix 1");
        assert!(resolver.resolve(&anchor, SessionType::Race).await.is_none());
        assert!(matches!(
            resolver.try_resolve(&anchor, SessionType::Race).await,
            Err(FeatureError::DataUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_provider_failures_become_not_found() {
        // 2023 is not archived, so rollover from the 2024 opener has nothing to land on
        let provider = fixture_provider(&[(2024, 3)]);
        let resolver = PreviousEventResolver::new(&provider, true);

        let opener = Event::new(2024, 1, "Grand Prix 1");
        assert!(resolver.resolve(&opener, SessionType::Race).await.is_none());

        // Anchor from a season the provider has never heard of
        let unknown = Event::new(1990, 4, "Unknown");
        assert!(resolver.resolve(&unknown, SessionType::Race).await.is_none());
    }
}
