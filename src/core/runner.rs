use crate::config::MonitorConfig;
use crate::core::aggregate::Aggregator;
use crate::core::calc::CalculationEngine;
use crate::core::extract::FieldExtractor;
use crate::core::fetch::EndpointFetcher;
use crate::core::schema::SchemaValidator;
use crate::domain::model::{AggregateRecord, FlatRecord};
use crate::domain::ports::OutputSink;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome of one pass. `records + skipped` equals the number of endpoints
/// polled.
#[derive(Debug)]
pub struct PassSummary {
    pub records: usize,
    pub skipped: usize,
    pub aggregates: Vec<AggregateRecord>,
}

/// Orchestrates one pass: concurrent Fetch→Validate→Extract→Calculate per
/// endpoint, a join barrier, then every aggregation rule over the full record
/// set, then every sink once.
pub struct PollRunner {
    config: Arc<MonitorConfig>,
    sinks: Vec<Box<dyn OutputSink>>,
}

impl PollRunner {
    pub fn new(config: MonitorConfig, sinks: Vec<Box<dyn OutputSink>>) -> Self {
        Self {
            config: Arc::new(config),
            sinks,
        }
    }

    pub async fn run(&self, endpoints: &[String]) -> Result<PassSummary> {
        let fetcher = Arc::new(EndpointFetcher::new(Duration::from_secs(
            self.config.config.timeout,
        )));
        let semaphore = Arc::new(Semaphore::new(self.config.config.concurrent_requests));
        let mut tasks = JoinSet::new();
        let mut polled = 0usize;

        for line in endpoints {
            let host = line.trim();
            if host.is_empty() {
                continue;
            }
            let url = format!("http://{}{}", host, self.config.check.path);
            let fetcher = Arc::clone(&fetcher);
            let config = Arc::clone(&self.config);
            let semaphore = Arc::clone(&semaphore);
            polled += 1;

            tasks.spawn(async move {
                // Pool slot bounds in-flight fetches; the semaphore is never
                // closed while the pass runs.
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("fetch pool closed mid-pass");
                Self::process_endpoint(&fetcher, &config, &url).await
            });
        }

        tracing::info!(
            "📡 Polling {} endpoints ({} concurrent, {}s timeout)",
            polled,
            self.config.config.concurrent_requests,
            self.config.config.timeout
        );

        let mut records: Vec<FlatRecord> = Vec::new();
        let mut skipped = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(record)) => records.push(record),
                Ok(Err(e)) => {
                    skipped += 1;
                    tracing::warn!("⏭️ Skipping endpoint: {}", e);
                }
                Err(e) => {
                    skipped += 1;
                    tracing::error!("❌ Fetch task failed: {}", e);
                }
            }
        }

        tracing::info!(
            "📥 Collected {} records, skipped {} endpoints",
            records.len(),
            skipped
        );

        let mut aggregates = Vec::new();
        for rule in &self.config.check.aggregations {
            aggregates.extend(Aggregator::aggregate(&records, rule));
        }

        tracing::info!(
            "🔄 Computed {} aggregate rows from {} aggregation rules",
            aggregates.len(),
            self.config.check.aggregations.len()
        );

        for sink in &self.sinks {
            sink.emit(&aggregates).await?;
        }

        Ok(PassSummary {
            records: records.len(),
            skipped,
            aggregates,
        })
    }

    async fn process_endpoint(
        fetcher: &EndpointFetcher,
        config: &MonitorConfig,
        url: &str,
    ) -> Result<FlatRecord> {
        let response = fetcher.fetch(url).await?;
        SchemaValidator::validate(url, &response, &config.check.validate_properties)?;
        let mut record = FieldExtractor::project(&response, &config.check.extractions)?;
        CalculationEngine::apply(&mut record, &config.check.calculations)?;
        Ok(record)
    }
}
