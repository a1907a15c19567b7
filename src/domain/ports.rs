use crate::domain::model::AggregateRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn emit(&self, aggregates: &[AggregateRecord]) -> Result<()>;
}
