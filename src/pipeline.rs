//! Batch feature generation
//!
//! Walks every season of the configured year range, resolves each event's race
//! and qualifying sessions, assembles one record per classified driver and hands
//! the records to a [`FeatureSink`]. Records are committed every `batch_size`
//! writes and once more at the end of the run.
//!
//! Events whose race session cannot be loaded are skipped with a warning, as are
//! seasons without a calendar. A missing qualifying session only nulls the
//! qualifying fields. A failing sink aborts the run, except when clearing it.

use tracing::{debug, info, warn};

use crate::features::FeatureAssembler;
use crate::provider::{CalendarProvider, SessionProvider};
use crate::sink::FeatureSink;
use crate::types::{Event, FeatureRecord, SessionRecord, SessionRef, SessionType};
use crate::{FeatureConfig, Result};

/// Counters for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub seasons_processed: usize,
    pub seasons_skipped: usize,
    pub events_processed: usize,
    pub events_skipped: usize,
    pub records_written: usize,
    pub commits: usize,
}

/// Drives feature generation over a range of seasons
pub struct FeaturePipeline<P> {
    provider: P,
    config: FeatureConfig,
}

impl<P> FeaturePipeline<P>
where
    P: SessionProvider + CalendarProvider,
{
    /// Fails with [`FeatureError::Configuration`](crate::FeatureError::Configuration)
    /// when the configuration is invalid; nothing is processed in that case.
    pub fn new(provider: P, config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Records for every driver of one event.
    ///
    /// Fails when the event's race session cannot be loaded. Without a qualifying
    /// session the records are still produced, with qualifying fields left `None`.
    pub async fn process_event(&self, event: &Event) -> Result<Vec<FeatureRecord>> {
        let round = SessionRef::Round(event.round_number);
        let race =
            self.provider.resolve_loaded(event.year, round.clone(), SessionType::Race).await?;
        let quali =
            match self.provider.resolve_loaded(event.year, round, SessionType::Qualifying).await {
                Ok(quali) => quali,
                Err(e) => {
                    warn!("No qualifying for {}, qualifying fields will be empty: {}", event, e);
                    SessionRecord::new(event.clone(), SessionType::Qualifying)
                }
            };

        let assembler = FeatureAssembler::from_config(&self.provider, &self.config);
        Ok(assembler.assemble_event(&race, &quali).await)
    }

    /// Generate records for every season in the year range and write them to `sink`.
    pub async fn run<S>(&self, sink: &mut S) -> Result<PipelineSummary>
    where
        S: FeatureSink + ?Sized,
    {
        let mut summary = PipelineSummary::default();
        let mut pending = 0;

        if self.config.clear_sink {
            info!("Clearing feature sink before run");
            if let Err(e) = sink.clear().await {
                warn!("Could not clear feature sink, appending instead: {}", e);
            }
        }

        for year in self.config.year_range.years() {
            let events = match self.provider.season_events(year).await {
                Ok(events) => events,
                Err(e) => {
                    warn!("Skipping season {}: {}", year, e);
                    summary.seasons_skipped += 1;
                    continue;
                }
            };

            info!("Processing season {} ({} events)", year, events.len());

            for event in &events {
                let records = match self.process_event(event).await {
                    Ok(records) => records,
                    Err(e) => {
                        warn!("Skipping {}: {}", event, e);
                        summary.events_skipped += 1;
                        continue;
                    }
                };

                debug!("{}: {} records", event, records.len());

                for record in records {
                    sink.write(record).await?;
                    summary.records_written += 1;
                    pending += 1;

                    if pending >= self.config.batch_size {
                        sink.commit().await?;
                        summary.commits += 1;
                        pending = 0;
                    }
                }

                summary.events_processed += 1;
            }

            summary.seasons_processed += 1;
        }

        if pending > 0 {
            sink.commit().await?;
            summary.commits += 1;
        }

        info!(
            "Feature run complete: {} records from {} events ({} events skipped, {} commits)",
            summary.records_written,
            summary.events_processed,
            summary.events_skipped,
            summary.commits
        );

        Ok(summary)
    }
}
