use anyhow::Context;
use clap::Parser;
use flexi_logger::Logger;
use waygraph_bench::{BenchConfig, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = BenchConfig::resolve(&cli)?;

    let _logger = Logger::try_with_env_or_str(&config.log_level)
        .with_context(|| format!("invalid log specification `{}`", config.log_level))?
        .start()
        .context("failed to start logger")?;

    log::debug!("configuration: {config:?}");
    waygraph_bench::run(&config)?;
    Ok(())
}
