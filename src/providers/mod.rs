//! Provider implementations

pub mod archive;
pub mod timeout;

pub use archive::{ArchiveEvent, ArchiveProvider, ArchiveSeason, ArchiveTables, SessionArchive};
pub use timeout::TimeoutProvider;
