//! sciscan - inspect and patch SciScan raw image stacks.

use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sciscan_stack::{
    config::{Cli, Command, GetConfig, InfoConfig, OutputFormat, SetConfig},
    SciScanStack,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Command::Info(config) => run_info(config),
        Command::Get(config) => run_get(config),
        Command::Set(config) => run_set(config),
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so `info --format json` output stays parseable.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "sciscan_stack=debug,sciscan=debug"
    } else {
        "sciscan_stack=info,sciscan=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Info Command
// =============================================================================

fn run_info(config: InfoConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let stack = match SciScanStack::open_with_options(&config.stack.dir, &config.options()) {
        Ok(stack) => stack,
        Err(e) => {
            error!("Failed to open stack: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match config.format {
        OutputFormat::Text => print_info_text(&stack),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "ini_path": stack.ini_path().display().to_string(),
                "raw_path": stack.raw_path().display().to_string(),
                "shape": stack.shape(),
                "dim_names": stack.dim_names(),
                "warnings": stack
                    .warnings()
                    .iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>(),
                "metadata": stack.metadata(),
            });
            match serde_json::to_string_pretty(&json) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    error!("Failed to serialize stack info: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_info_text(stack: &SciScanStack) {
    println!("Descriptor: {}", stack.ini_path().display());
    println!("Raw data:   {}", stack.raw_path().display());
    println!("Shape:      {}", stack.schema().describe());
    println!("Samples:    {}", stack.frames().len());

    if !stack.warnings().is_empty() {
        println!();
        println!("Warnings:");
        for warning in stack.warnings() {
            println!("  ! {}", warning);
        }
    }

    println!();
    println!("Metadata ({} attributes):", stack.metadata().len());
    let width = stack
        .metadata()
        .iter()
        .map(|(k, _)| k.len())
        .max()
        .unwrap_or(0);
    for (key, value) in stack.metadata().iter() {
        println!("  {:<width$} = {} ({})", key, value, value.type_name(), width = width);
    }
}

// =============================================================================
// Get Command
// =============================================================================

fn run_get(config: GetConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let result = SciScanStack::open_with_options(&config.stack.dir, &config.options())
        .and_then(|stack| stack.frames().get(&config.index));

    match result {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Set Command
// =============================================================================

fn run_set(config: SetConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let result = SciScanStack::open_with_options(&config.stack.dir, &config.options())
        .and_then(|mut stack| {
            let frames = stack.frames_mut();
            let previous = frames.get(&config.index)?;
            frames.set(&config.index, config.value)?;
            frames.flush()?;
            Ok(previous)
        });

    match result {
        Ok(previous) => {
            println!("{:?}: {} -> {}", config.index, previous, config.value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
