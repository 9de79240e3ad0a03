use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use prm_contacts::cli::{commands, Cli, CliContext};
use prm_contacts::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(file) = cli.file.clone() {
        config.database_path = file;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = CliContext::open(&config)
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    let output = commands::execute(&mut ctx, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
