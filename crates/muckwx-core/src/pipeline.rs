use anyhow::Result;

use crate::observation::Observation;

/// Anything that can produce the observation for this run
#[async_trait::async_trait]
pub trait ObservationSource: Send + Sync {
    async fn latest(&self) -> Result<Observation>;
}

/// Anything that can receive the finished weather message
#[async_trait::async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&mut self, message: &str) -> Result<()>;
}
