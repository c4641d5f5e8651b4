//! Usage statistics and the progress dashboard.

use std::sync::Arc;

use wavee_core::clock::Clock;
use wavee_core::error::Result;
use wavee_core::progress::{ProgressSummary, Tool, UsageStats};
use wavee_core::store::RecordStore;

/// Records finished tool sessions and builds the dashboard.
#[derive(Clone)]
pub struct ProgressService {
    records: RecordStore,
    clock: Arc<dyn Clock>,
}

impl ProgressService {
    pub fn new(records: RecordStore, clock: Arc<dyn Clock>) -> Self {
        Self { records, clock }
    }

    /// Counts one session of `tool` today and updates the streak.
    pub async fn record_use(&self, tool: Tool) -> Result<UsageStats> {
        let today = self.clock.today();
        let stats = self
            .records
            .update::<UsageStats, _>(|stats| stats.record_use(tool, today))
            .await?;
        tracing::debug!(
            "[ProgressService] {} used ({} total, streak {})",
            tool,
            stats.count(tool),
            stats.streak_days
        );
        Ok(stats)
    }

    pub async fn stats(&self) -> Result<UsageStats> {
        self.records.load().await
    }

    pub async fn summary(&self) -> Result<ProgressSummary> {
        let stats = self.stats().await?;
        Ok(ProgressSummary::from_stats(&stats, self.clock.today()))
    }
}
