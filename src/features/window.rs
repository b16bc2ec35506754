//! Rolling window construction
//!
//! A window is built in two phases. Event keys are planned first by stepping back
//! through the calendar from the anchor; only season openers need a calendar lookup.
//! The planned sessions are then resolved and hydrated concurrently and collected
//! most-recent-first.
//!
//! When a planned session cannot be resolved or hydrated, the window is cut at that
//! point: it keeps every entry before the gap and nothing after it, so it never skips
//! over a missing event.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use super::resolver::PreviousEventResolver;
use crate::RollingWindowSpec;
use crate::provider::{CalendarProvider, SessionProvider};
use crate::types::{EventKey, SessionRecord, SessionType};

/// Historical sessions ordered most-recent-first
#[derive(Debug, Clone)]
pub struct RollingWindow {
    session_type: SessionType,
    entries: Vec<Arc<SessionRecord>>,
    requested: usize,
}

impl RollingWindow {
    pub fn new(session_type: SessionType, entries: Vec<Arc<SessionRecord>>, requested: usize) -> Self {
        Self { session_type, entries, requested }
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn entries(&self) -> &[Arc<SessionRecord>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionRecord> {
        self.entries.iter().map(|entry| entry.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured window size
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Whether the window holds the configured number of sessions
    pub fn is_complete(&self) -> bool {
        self.entries.len() == self.requested
    }

    pub fn keys(&self) -> Vec<EventKey> {
        self.entries.iter().map(|entry| entry.key()).collect()
    }
}

/// Builds rolling windows of historical sessions
pub struct RollingWindowBuilder<'a, P> {
    provider: &'a P,
    spec: RollingWindowSpec,
}

impl<'a, P> RollingWindowBuilder<'a, P>
where
    P: SessionProvider + CalendarProvider,
{
    pub fn new(provider: &'a P, spec: RollingWindowSpec) -> Self {
        Self { provider, spec }
    }

    pub fn spec(&self) -> RollingWindowSpec {
        self.spec
    }

    /// Build a window of `session_type` sessions behind `anchor`.
    ///
    /// Never fails; a window that could not be filled is returned short.
    pub async fn build(&self, anchor: &SessionRecord, session_type: SessionType) -> RollingWindow {
        let resolver = PreviousEventResolver::new(self.provider, self.spec.cross_season);
        let size = self.spec.size;

        let mut entries = Vec::with_capacity(size);
        let mut plan = Vec::with_capacity(size);

        if self.spec.inclusive && size > 0 {
            if anchor.session_type == session_type && anchor.is_loaded() {
                entries.push(Arc::new(anchor.clone()));
            } else {
                plan.push(anchor.key());
            }
        }

        let mut cursor = anchor.key();
        while entries.len() + plan.len() < size {
            match resolver.previous_key(cursor).await {
                Ok(previous) => {
                    plan.push(previous);
                    cursor = previous;
                }
                Err(e) => {
                    debug!("Calendar walk stopped at {}: {}", cursor, e);
                    break;
                }
            }
        }

        let loaded = join_all(plan.iter().map(|&key| resolver.load_key(key, session_type))).await;

        for (key, result) in plan.iter().zip(loaded) {
            match result {
                Ok(session) => entries.push(Arc::new(session)),
                Err(e) => {
                    debug!("{} window entry {} unavailable: {}", session_type, key, e);
                    break;
                }
            }
        }

        if entries.len() < size {
            warn!(
                "{} window for {} holds {} of {} sessions",
                session_type,
                anchor.event,
                entries.len(),
                size
            );
        }

        RollingWindow::new(session_type, entries, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ArchiveProvider;
    use crate::test_utils::{fixture_provider, fixture_round};

    fn keys(pairs: &[(i32, u32)]) -> Vec<EventKey> {
        pairs.iter().map(|&(year, round)| EventKey::new(year, round)).collect()
    }

    fn race_anchor(year: i32, round: u32) -> SessionRecord {
        let [race, _] = fixture_round(year, round);
        race
    }

    #[tokio::test]
    async fn test_exclusive_window_from_round_six() {
        let provider = fixture_provider(&[(2024, 8)]);
        let builder = RollingWindowBuilder::new(&provider, RollingWindowSpec::new(5));

        let window = builder.build(&race_anchor(2024, 6), SessionType::Race).await;

        assert_eq!(window.keys(), keys(&[(2024, 5), (2024, 4), (2024, 3), (2024, 2), (2024, 1)]));
        assert!(window.is_complete());
        assert!(window.iter().all(|session| session.is_loaded()));
        assert!(window.iter().all(|session| session.session_type == SessionType::Race));
    }

    #[tokio::test]
    async fn test_window_rolls_over_season_boundary() {
        let provider = fixture_provider(&[(2023, 22), (2024, 3)]);
        let builder = RollingWindowBuilder::new(&provider, RollingWindowSpec::new(5));

        let window = builder.build(&race_anchor(2024, 1), SessionType::Race).await;

        assert_eq!(
            window.keys(),
            keys(&[(2023, 22), (2023, 21), (2023, 20), (2023, 19), (2023, 18)])
        );
    }

    #[tokio::test]
    async fn test_window_spans_partial_seasons() {
        let provider = fixture_provider(&[(2023, 22), (2024, 3)]);
        let builder = RollingWindowBuilder::new(&provider, RollingWindowSpec::new(5));

        let window = builder.build(&race_anchor(2024, 3), SessionType::Qualifying).await;

        assert_eq!(
            window.keys(),
            keys(&[(2024, 2), (2024, 1), (2023, 22), (2023, 21), (2023, 20)])
        );
        assert!(window.iter().all(|session| session.session_type == SessionType::Qualifying));
    }

    #[tokio::test]
    async fn test_inclusive_window_starts_at_anchor() {
        let provider = fixture_provider(&[(2024, 8)]);
        let spec = RollingWindowSpec::new(3).with_inclusive(true);
        let builder = RollingWindowBuilder::new(&provider, spec);

        let race = builder.build(&race_anchor(2024, 6), SessionType::Race).await;
        assert_eq!(race.keys(), keys(&[(2024, 6), (2024, 5), (2024, 4)]));

        // Anchor is a race, so the qualifying slot 0 is loaded from the provider
        let quali = builder.build(&race_anchor(2024, 6), SessionType::Qualifying).await;
        assert_eq!(quali.keys(), keys(&[(2024, 6), (2024, 5), (2024, 4)]));
        assert_eq!(quali.entries()[0].session_type, SessionType::Qualifying);
    }

    #[tokio::test]
    async fn test_window_shrinks_at_season_start_without_rollover() {
        let provider = fixture_provider(&[(2023, 22), (2024, 8)]);
        let spec = RollingWindowSpec::new(5).with_cross_season(false);
        let builder = RollingWindowBuilder::new(&provider, spec);

        let window = builder.build(&race_anchor(2024, 3), SessionType::Race).await;

        assert_eq!(window.keys(), keys(&[(2024, 2), (2024, 1)]));
        assert_eq!(window.requested(), 5);
        assert!(!window.is_complete());

        let opener = builder.build(&race_anchor(2024, 1), SessionType::Race).await;
        assert!(opener.is_empty());
    }

    #[tokio::test]
    async fn test_window_is_cut_at_first_missing_session() {
        // Round 4 qualifying was never archived
        let sessions = (1..=6).flat_map(|round| fixture_round(2024, round)).filter(|session| {
            !(session.event.round_number == 4 && session.session_type == SessionType::Qualifying)
        });
        let provider = ArchiveProvider::from_sessions(sessions).unwrap();
        let builder = RollingWindowBuilder::new(&provider, RollingWindowSpec::new(5));

        let quali = builder.build(&race_anchor(2024, 6), SessionType::Qualifying).await;
        assert_eq!(quali.keys(), keys(&[(2024, 5)]));

        let race = builder.build(&race_anchor(2024, 6), SessionType::Race).await;
        assert_eq!(race.len(), 5);
    }

    #[tokio::test]
    async fn test_unhydrated_sessions_are_excluded() {
        let mut sessions: Vec<SessionRecord> =
            (1..=3).flat_map(|round| fixture_round(2024, round)).collect();
        for session in &mut sessions {
            if session.event.round_number == 2 && session.session_type == SessionType::Race {
                session.weather = None;
            }
        }
        let provider = ArchiveProvider::from_sessions(sessions).unwrap();
        let builder = RollingWindowBuilder::new(&provider, RollingWindowSpec::new(2));

        let window = builder.build(&race_anchor(2024, 3), SessionType::Race).await;
        assert!(window.is_empty());
    }

    #[tokio::test]
    async fn test_each_entry_is_loaded_once() {
        let provider = fixture_provider(&[(2024, 8)]);
        let builder = RollingWindowBuilder::new(&provider, RollingWindowSpec::new(5));

        builder.build(&race_anchor(2024, 8), SessionType::Race).await;
        assert_eq!(provider.load_count(), 5);
    }
}
