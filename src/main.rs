use clap::Parser;
use nuru::adapter::inbound::cli::command::Cli;
use nuru::adapter::inbound::cli::dispatch;
use nuru::adapter::inbound::cli::output::{self, OutputConfig};
use nuru::infrastructure::config::settings::Config;
use tracing::debug;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let mut config = match Config::load_or_env(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };
    if cli.verbose > 0 {
        config.logging.verbose();
    }
    config.init_logging();
    debug!(environment = %config.environment, "nuru starting");

    if let Err(e) = dispatch::execute(cli, &config).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
