use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use fqtrim::cli::{Cli, SummaryFormat};
use fqtrim::config::{effective_summary_format, BatchConfig};
use fqtrim::config_file::ConfigFile;
use fqtrim::outcome::RunSummary;
use fqtrim::platform::ExitCode;
use fqtrim::{BatchProcessor, TrimError};

fn main() -> Result<()> {
    // clap exits with status 2 on usage errors
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level()))
        .format_timestamp_millis()
        .init();

    let defaults = load_defaults(&cli);

    let config = match BatchConfig::from_cli(&cli, &defaults) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("fqtrim: Error: {}", e);
            ExitCode::InvalidUsage.exit();
        }
    };

    info!(
        "Trimming {} -> {} (5': {}, 3': {}, keep: {}, force: {}, workers: {})",
        config.input_dir.display(),
        config.output_dir.display(),
        config.policy.trim_leading,
        config.policy.trim_trailing,
        config.policy.retain_trimmed,
        config.force,
        config.workers.get()
    );

    let summary = match BatchProcessor::new(config).run() {
        Ok(summary) => summary,
        Err(e @ TrimError::Directory { .. }) => {
            eprintln!("fqtrim: Error: {}", e);
            ExitCode::GeneralError.exit();
        }
        Err(e) => return Err(e).context("Batch run failed"),
    };

    print_summary(&summary, effective_summary_format(&cli, &defaults))?;

    ExitCode::for_run(summary.has_failures(), cli.strict).exit();
}

/// Defaults file for this invocation; empty when --ignore-config is given
fn load_defaults(cli: &Cli) -> ConfigFile {
    if cli.ignore_config {
        return ConfigFile::default();
    }
    match ConfigFile::load_with_custom_path(cli.config_file.as_deref()) {
        Ok(defaults) => {
            debug!("Config defaults: {:?}", defaults);
            defaults
        }
        Err(e) => {
            eprintln!("fqtrim: Config file error: {}", e);
            ExitCode::GeneralError.exit();
        }
    }
}

fn print_summary(summary: &RunSummary, format: SummaryFormat) -> Result<()> {
    match format {
        SummaryFormat::Table => println!("{}", summary.format_table()),
        SummaryFormat::Json => {
            let json =
                serde_json::to_string_pretty(summary).context("Failed to serialize run summary")?;
            println!("{}", json);
        }
    }
    Ok(())
}
