mod cli;

use std::process::ExitCode;

use amalyzer_library::{AmalyzerConfig, BatchRunner};
use amalyzer_probe::Probe;
use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Args;

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<AmalyzerConfig> {
    let cfg = match &args.config {
        Some(path) => AmalyzerConfig::load_or_create(path)?,
        None => AmalyzerConfig::load_default()?,
    };
    Ok(cfg)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.default_filter());

    let config = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "cannot load configuration");
            return ExitCode::FAILURE;
        }
    };

    if args.show_config {
        match config.to_toml() {
            Ok(text) => {
                print!("{text}");
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                error!(error = %e, "cannot render configuration");
                return ExitCode::FAILURE;
            }
        }
    }

    if args.paths.is_empty() {
        error!("no input paths; run `amalyzer --help`");
        return ExitCode::FAILURE;
    }

    let opts = args.run_options();
    debug!(?opts, "run options");

    let runner = BatchRunner::new(Probe::default(), config);
    match runner.run(&opts) {
        Ok(summary) => {
            if !opts.quiet && !opts.csv && !opts.json {
                println!("{} files ({} failed)", summary.retained, summary.failed);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
