//! CLI entrypoint for segpipe
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use segpipe_application::{AssemblePipelineUseCase, AssemblyOptions};
use segpipe_domain::parameters::known_keys;
use segpipe_infrastructure::ParameterFileLoader;
use segpipe_presentation::{Cli, ConsoleFormatter, OutputFormatter};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // stdout carries the rendered configuration
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting segpipe");

    // === Dependency Injection ===
    let loader = if cli.no_config {
        ParameterFileLoader::defaults_only()
    } else {
        ParameterFileLoader::new(cli.config.clone())
    };

    if cli.show_config {
        loader.print_config_sources();
        print!("{}", ConsoleFormatter::format_known_keys(known_keys()));
        return Ok(());
    }

    let file_output = loader.load_file_parameters()?.output;
    if !file_output.color {
        colored::control::set_override(false);
    }
    let format = cli
        .output
        .map(Into::into)
        .or(file_output.format)
        .unwrap_or_default();

    let mut options = AssemblyOptions::default()
        .with_overrides(cli.override_map())
        .with_strict(cli.strict);
    if let Some(root) = &cli.experiment_dir {
        options = options.with_experiment_root(root);
    }

    let use_case = AssemblePipelineUseCase::new(loader);
    let output = use_case
        .execute(&options)
        .context("failed to assemble pipeline configuration")?;

    if !output.issues.is_empty() {
        eprintln!("{}", ConsoleFormatter.format_issues(&output.issues));
    }

    let rendered = ConsoleFormatter.render(&output.config, format)?;
    println!("{}", rendered.trim_end());

    Ok(())
}
