pub mod template;

use crate::config::{FileFormat, OutputSpec};
use crate::domain::model::AggregateRecord;
use crate::domain::ports::OutputSink;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Prints one templated line per aggregate row.
pub struct ConsoleSink {
    template: String,
}

impl ConsoleSink {
    pub fn new(template: String) -> Self {
        Self { template }
    }
}

#[async_trait]
impl OutputSink for ConsoleSink {
    async fn emit(&self, aggregates: &[AggregateRecord]) -> Result<()> {
        for row in aggregates {
            println!("{}", template::substitute(&self.template, &row.fields)?);
        }
        Ok(())
    }
}

/// Serializes the full aggregate collection to a file, overwriting any
/// existing content at the path.
pub struct FileSink {
    format: FileFormat,
    path: String,
}

impl FileSink {
    pub fn new(format: FileFormat, path: String) -> Self {
        Self { format, path }
    }
}

#[async_trait]
impl OutputSink for FileSink {
    async fn emit(&self, aggregates: &[AggregateRecord]) -> Result<()> {
        tracing::info!("💾 Writing output to the file {}", self.path);

        let body = match self.format {
            FileFormat::Json => serde_json::to_string_pretty(aggregates)?,
            FileFormat::Yaml => serde_yaml::to_string(aggregates)?,
        };

        std::fs::write(&self.path, body)?;
        Ok(())
    }
}

pub fn build_sinks(outputs: &[OutputSpec]) -> Vec<Box<dyn OutputSink>> {
    outputs
        .iter()
        .map(|spec| match spec {
            OutputSpec::Console { template } => {
                Box::new(ConsoleSink::new(template.clone())) as Box<dyn OutputSink>
            }
            OutputSpec::File { format, path } => {
                Box::new(FileSink::new(*format, path.clone())) as Box<dyn OutputSink>
            }
        })
        .collect()
}
