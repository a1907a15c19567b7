use anyhow::Context;
use clap::Parser;
use status_probe::output::build_sinks;
use status_probe::utils::{logger, validation::Validate};
use status_probe::{CliArgs, MonitorConfig, PollRunner};
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting status-probe");
    tracing::info!("📁 Loading configuration from: {}", args.config_file);

    let config = match MonitorConfig::from_file(&args.config_file) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load config file '{}': {}", args.config_file, e);
            eprintln!("❌ Failed to load config file '{}': {}", args.config_file, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    let servers = std::fs::read_to_string(&args.server_list)
        .with_context(|| format!("unable to read server list '{}'", args.server_list))?;
    let endpoints: Vec<String> = servers
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if args.verbose {
        tracing::debug!("📋 Check path: {}", config.check.path);
        tracing::debug!("📋 Endpoints: {:?}", endpoints);
    }

    let sinks = build_sinks(&config.check.outputs);
    let runner = PollRunner::new(config, sinks);

    let start = Instant::now();
    match runner.run(&endpoints).await {
        Ok(summary) => {
            tracing::info!(
                "✅ Pass complete: {} records, {} skipped, {} aggregate rows",
                summary.records,
                summary.skipped,
                summary.aggregates.len()
            );
        }
        Err(e) => {
            tracing::error!("❌ Pass failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    println!("Duration: {:.3} seconds", start.elapsed().as_secs_f64());

    Ok(())
}
