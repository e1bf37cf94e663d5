use crate::commands::{Cli, Commands};
use crate::logging::setup_logging;
use anyhow::{Context, Result};
use clap::Parser;
use runlog_client::config_manager::{Config, ConfigLoader};
use runlog_client::exporters::{LogSink, LogSinkEnum, StdoutSink};
use runlog_client::modules::{datadog_tags, echo_fields};
use runlog_client::EventForwarder;
use runlog_common::event::RunnerEvent;
use runlog_common::session::Session;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Parses the command line and runs the command. Returns the process exit code.
pub fn process_cli() -> Result<i32> {
    let cli = Cli::parse();
    let config = ConfigLoader::load_config(cli.config.as_deref())?;
    setup_logging(&config.log_level, config.log_dir.as_deref())?;

    let _guard = (!cfg!(test)).then(|| {
        config.sentry_dsn.as_deref().map(|dsn| {
            sentry::init((
                dsn,
                sentry::ClientOptions {
                    release: sentry::release_name!(),
                    ..Default::default()
                },
            ))
        })
    });

    match cli.command {
        Commands::Forward { input, dry_run } => {
            tokio::runtime::Runtime::new()?.block_on(forward(input.as_deref(), dry_run, &config))?;
            Ok(0)
        }
        Commands::Tags { args_file } => {
            let response =
                tokio::runtime::Runtime::new()?.block_on(datadog_tags::run_from_file(&args_file));
            Ok(response.emit())
        }
        Commands::Echo { args_file } => Ok(echo_fields::run_from_file(&args_file).emit()),
        Commands::Info => {
            print_config_info(&config);
            Ok(0)
        }
    }
}

async fn forward(input: Option<&Path>, dry_run: bool, config: &Config) -> Result<()> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut forwarder = if dry_run {
        EventForwarder::new(LogSinkEnum::Stdout(StdoutSink), Session::for_local_host())
    } else {
        EventForwarder::connect(config).await
    };

    let handled = forward_lines(reader, &mut forwarder)?;
    info!("Forwarded {} events", handled);

    forwarder.close().await;
    Ok(())
}

/// Feeds every well-formed event line to the forwarder. Malformed lines are
/// reported and skipped; the number of handled events is returned.
pub fn forward_lines<R: BufRead, S: LogSink>(
    reader: R,
    forwarder: &mut EventForwarder<S>,
) -> Result<usize> {
    let mut handled = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read event stream")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<RunnerEvent>(line) {
            Ok(event) => {
                forwarder.handle(&event);
                handled += 1;
            }
            Err(err) => warn!("Skipping malformed event on line {}: {}", index + 1, err),
        }
    }
    Ok(handled)
}

pub fn print_config_info(config: &Config) {
    let mut info = String::new();
    info.push_str("Runlog configuration\n");
    info.push_str(&format!("  AWS credentials: {}\n", config.aws_init_type()));
    info.push_str(&format!("  AWS region:      {}\n", config.aws_region));
    info.push_str(&format!("  Log group:       {}\n", config.log_group));
    info.push_str(&format!("  Log stream:      {}\n", config.log_stream));
    info.push_str(&format!("  Batch size:      {}\n", config.batch_size));
    info.push_str(&format!("  Log level:       {}\n", config.log_level));
    info.push_str(&format!(
        "  Log file:        {}\n",
        config.log_dir.as_deref().unwrap_or("(stderr only)")
    ));
    info.push_str(&format!(
        "  Sentry:          {}",
        if config.sentry_dsn.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    ));
    println!("{}", info);
}
