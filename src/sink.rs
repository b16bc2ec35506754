//! Persistence collaborator for feature records
//!
//! The pipeline writes records as they are assembled and commits them in batches.
//! Records written since the last commit are not durable.

use async_trait::async_trait;
use tracing::debug;

use crate::types::FeatureRecord;
use crate::{FeatureError, Result};

/// Receives assembled feature records
#[async_trait]
pub trait FeatureSink: Send {
    /// Stage one record for the next commit.
    async fn write(&mut self, record: FeatureRecord) -> Result<()>;

    /// Make every staged record durable.
    async fn commit(&mut self) -> Result<()>;

    /// Remove every record from the sink, committed or staged.
    async fn clear(&mut self) -> Result<()> {
        Err(FeatureError::sink_failed("this sink cannot be cleared"))
    }
}

/// In-memory sink; committed records stay in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    staged: Vec<FeatureRecord>,
    committed: Vec<FeatureRecord>,
    commits: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn committed(&self) -> &[FeatureRecord] {
        &self.committed
    }

    pub fn staged(&self) -> &[FeatureRecord] {
        &self.staged
    }

    /// Number of commits that made at least one record durable
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    pub fn into_records(self) -> Vec<FeatureRecord> {
        self.committed
    }
}

#[async_trait]
impl FeatureSink for MemorySink {
    async fn write(&mut self, record: FeatureRecord) -> Result<()> {
        self.staged.push(record);
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }

        debug!("Committing {} feature records", self.staged.len());
        self.committed.append(&mut self.staged);
        self.commits += 1;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        self.staged.clear();
        self.committed.clear();
        Ok(())
    }
}
