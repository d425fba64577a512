//! ton80: run the bundled benchmark kernels and print throughput reports.
//!
//! Report lines go to stdout; progress logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use ton80::RunnerConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ton80",
    version,
    about = "Run the bundled micro-benchmark kernels",
    long_about = "
Each kernel is measured ten times (100ms warmup + 2000ms exercise per
measurement) and reported as runs/sec with a 95% confidence interval.

Example:
    ton80                      # Run every kernel
    ton80 --filter Tracer      # Only kernels whose name contains 'Tracer'
    ton80 --single             # One measurement per kernel, raw microseconds
    ton80 --list               # List kernels without running them
"
)]
struct Cli {
    /// Only run kernels whose name contains this substring
    #[arg(long)]
    filter: Option<String>,

    /// List kernels without running them
    #[arg(long)]
    list: bool,

    /// Measure each kernel once and print microseconds per exercise call
    #[arg(long)]
    single: bool,

    /// Print JSON lines instead of the tab-separated report
    #[arg(long)]
    json: bool,

    /// Verbose logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = RunnerConfig::from_env();
    if let Some(f) = cli.filter {
        config = config.filter(f);
    }
    config.verbose |= cli.verbose;
    config.json |= cli.json;

    let level = if config.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut runner = ton80::default_runner(config);

    if cli.list {
        for name in runner.kernel_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    if cli.single {
        runner.run_single().context("benchmark run aborted")?;
    } else {
        runner.run().context("benchmark run aborted")?;
    }

    Ok(())
}
