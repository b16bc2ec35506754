//! Feature engineering over loaded sessions
//!
//! - [`metrics`]: per-driver values from a single session
//! - [`weather`]: per-session weather summaries
//! - [`resolver`]: stepping back to the previous event, across seasons if allowed
//! - [`window`]: the N most recent historical sessions behind an event
//! - [`aggregate`]: null-tolerant means of a metric over a window
//! - [`assembler`]: one [`FeatureRecord`](crate::types::FeatureRecord) per driver and event

pub mod aggregate;
pub mod assembler;
pub mod metrics;
pub mod resolver;
pub mod weather;
pub mod window;

pub use aggregate::{RollingMean, rolling_mean};
pub use assembler::{EventWindows, FeatureAssembler};
pub use metrics::{
    Metric, fastest_lap_time, finish_position, grid_position, nanos_to_seconds, positions_gained,
    team_points,
};
pub use resolver::{PreviousEventResolver, PreviousStep, step_back};
pub use weather::{avg_track_temp, rained};
pub use window::{RollingWindow, RollingWindowBuilder};
