//! Rolling-window feature engineering for motorsport session results.
//!
//! Paddock turns race and qualifying classifications, lap times and weather
//! samples into one feature record per driver and event, suitable for downstream
//! modeling.
//!
//! # Features
//!
//! - **Null-safe metrics**: finish, grid, positions gained, team points, fastest lap
//! - **Rolling windows**: the N previous events, rolling over season boundaries
//! - **Weather summaries**: rain classification and mean track temperature
//! - **Pluggable sources**: sessions and calendars come from async provider traits
//! - **Batch pipeline**: season-by-season generation into a committing sink
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use paddock::{ArchiveProvider, FeatureConfig, FeaturePipeline, MemorySink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FeatureConfig::load("config.yml")?;
//!     let provider = ArchiveProvider::open("sessions.yml")?;
//!
//!     let pipeline = FeaturePipeline::new(provider, config)?;
//!     let mut sink = MemorySink::new();
//!     let summary = pipeline.run(&mut sink).await?;
//!
//!     println!("{} records written", summary.records_written);
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod config;
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;
mod yaml_utils;

// Feature computation
pub mod features;

// Collaborators
pub mod provider;
pub mod providers;
pub mod sink;

// Orchestration
pub mod logging;
pub mod pipeline;

// Core exports
pub use config::{FeatureConfig, RollingWindowSpec, YearRange};
pub use error::*;
pub use types::*;

// Feature exports
pub use features::{
    EventWindows, FeatureAssembler, PreviousEventResolver, RollingMean, RollingWindow,
    RollingWindowBuilder,
};

// Collaborator exports
pub use provider::{CalendarProvider, SessionProvider};
pub use providers::{ArchiveProvider, SessionArchive, TimeoutProvider};
pub use sink::{FeatureSink, MemorySink};

// Pipeline exports
pub use pipeline::{FeaturePipeline, PipelineSummary};
