pub mod config;
pub mod core;
pub mod domain;
pub mod output;
pub mod utils;

pub use config::{cli::CliArgs, MonitorConfig};
pub use core::runner::{PassSummary, PollRunner};
pub use utils::error::{ProbeError, Result};
