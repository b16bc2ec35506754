//! Per-call timeouts at the provider boundary
//!
//! The feature core never cancels a hydration request itself; callers that talk to
//! slow or unreliable sources wrap their provider in [`TimeoutProvider`] so a stuck
//! call surfaces as [`FeatureError::Timeout`] and degrades like any other missing data.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::provider::{CalendarProvider, SessionProvider};
use crate::types::{Event, SessionRecord, SessionRef, SessionType};
use crate::{FeatureError, Result};

/// Provider wrapper that bounds every call by a fixed duration
pub struct TimeoutProvider<P> {
    inner: P,
    timeout: Duration,
}

impl<P> TimeoutProvider<P> {
    pub fn new(inner: P, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    async fn bounded<T>(&self, operation: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Provider {} timed out after {:?}", operation, self.timeout);
                Err(FeatureError::Timeout { duration: self.timeout })
            }
        }
    }
}

#[async_trait::async_trait]
impl<P: SessionProvider> SessionProvider for TimeoutProvider<P> {
    async fn resolve(
        &self,
        year: i32,
        event: SessionRef,
        session_type: SessionType,
    ) -> Result<SessionRecord> {
        self.bounded("resolve", self.inner.resolve(year, event, session_type)).await
    }

    async fn load(&self, session: SessionRecord) -> Result<SessionRecord> {
        self.bounded("load", self.inner.load(session)).await
    }
}

#[async_trait::async_trait]
impl<P: CalendarProvider> CalendarProvider for TimeoutProvider<P> {
    async fn season_events(&self, year: i32) -> Result<Vec<Event>> {
        self.bounded("season_events", self.inner.season_events(year)).await
    }

    async fn last_event_of_season(&self, year: i32) -> Result<Event> {
        self.bounded("last_event_of_season", self.inner.last_event_of_season(year)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Provider whose loads never complete
    struct StalledProvider;

    #[async_trait::async_trait]
    impl SessionProvider for StalledProvider {
        async fn resolve(
            &self,
            year: i32,
            event: SessionRef,
            session_type: SessionType,
        ) -> Result<SessionRecord> {
            let round = match event {
                SessionRef::Round(round) => round,
                SessionRef::Name(_) => 1,
            };
            Ok(SessionRecord::new(Event::new(year, round, "Stalled Grand Prix"), session_type))
        }

        async fn load(&self, _session: SessionRecord) -> Result<SessionRecord> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_load_times_out() {
        let provider = TimeoutProvider::new(StalledProvider, Duration::from_secs(5));

        let resolved = provider.resolve(2024, SessionRef::Round(3), SessionType::Race).await;
        assert!(resolved.is_ok());

        let loaded = provider.load(resolved.unwrap()).await;
        match loaded {
            Err(FeatureError::Timeout { duration }) => assert_eq!(duration, Duration::from_secs(5)),
            other => panic!("Expected timeout, got {other:?}"),
        }
    }
}
