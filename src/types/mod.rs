//! Core types for session data and feature output.
//!
//! ## Architecture
//!
//! - [`Event`] / [`EventKey`] identify a round; keys order chronologically by `(year, round)`
//! - [`SessionRecord`] holds one session's results, laps and weather tables
//! - [`DriverNumber`] is the join key between a driver's race and qualifying rows
//! - [`FeatureRecord`] is the per-driver, per-event output
//!
//! ## Usage Example
//!
//! ```rust
//! use paddock::types::{Event, ResultRow, SessionRecord, SessionType};
//!
//! let race = SessionRecord::new(Event::new(2025, 9, "Spanish Grand Prix"), SessionType::Race)
//!     .with_tables(
//!         vec![ResultRow {
//!             driver_number: "81".into(),
//!             team_name: Some("McLaren".to_string()),
//!             position: Some(1),
//!             grid_position: Some(1),
//!             points: Some(25.0),
//!         }],
//!         vec![],
//!         vec![],
//!     );
//!
//! assert!(race.is_loaded());
//! assert_eq!(race.result_for(&"81".into()).unwrap().position, Some(1));
//! ```

mod event;
mod feature;
mod session;

pub use event::{DriverNumber, Event, EventKey, SessionRef, SessionType};
pub use feature::{FeatureRecord, podium};
pub use session::{LapRow, ResultRow, SessionRecord, WeatherSample};
