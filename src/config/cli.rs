use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "status-probe")]
#[command(about = "Configuration-driven HTTP status probe with grouped aggregation")]
pub struct CliArgs {
    /// Path to the YAML configuration file
    #[arg(short = 'c', long = "config")]
    pub config_file: String,

    /// File with the list of servers to poll, one host[:port] per line
    #[arg(short = 's', long = "servers")]
    pub server_list: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
