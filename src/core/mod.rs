pub mod aggregate;
pub mod calc;
pub mod extract;
pub mod fetch;
pub mod runner;
pub mod schema;

pub use crate::domain::model::{AggregateRecord, FlatRecord, RawResponse};
pub use crate::domain::ports::OutputSink;
pub use crate::utils::error::Result;
