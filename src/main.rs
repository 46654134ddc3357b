//! Command-line entry point for linkfix.
//!
//! # Usage
//!
//! ```bash
//! # Check configuration, schema, and template without changing anything
//! linkfix check
//!
//! # Move the template into its hidden folder
//! linkfix template
//!
//! # Recreate every link listed in links.csv
//! linkfix recreate --input links.csv
//! ```
//!
//! # Exit Codes
//!
//! - `0` - Every record was created
//! - `1` - Fatal error (template, input, schema, connection)
//! - `2` - Run finished but some records failed

use linkfix::application::services::{
    EXIT_FATAL, EXIT_OK, Preflight, RemediationService, RunSettings, RunSummary,
};
use linkfix::config::Config;
use linkfix::domain::entities::LinkStatus;
use linkfix::infrastructure::clients::LocalFsClient;
use linkfix::infrastructure::logging::{RunLogger, init_tracing};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Recreates SharePoint link items from a known-good template.
#[derive(Parser)]
#[command(name = "linkfix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Site endpoint (overrides LINKFIX_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Target library path (overrides LINKFIX_LIBRARY)
    #[arg(long, global = true)]
    library: Option<String>,

    /// Template item name (overrides LINKFIX_TEMPLATE)
    #[arg(long, global = true)]
    template: Option<String>,

    /// Hidden folder for the template (overrides LINKFIX_HIDDEN_FOLDER)
    #[arg(long, global = true)]
    hidden_folder: Option<String>,

    /// Log directory (overrides LINKFIX_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recreate every link in the input record set
    Recreate {
        /// Input record set (overrides LINKFIX_INPUT)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Locate the template and move it into the hidden folder
    Template,

    /// Read-only check of connection, schema, and template
    Check,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let logger = RunLogger::open(&config.log_dir, Local::now()).context("Failed to open run logs")?;
    init_tracing(
        &config.log_level,
        &config.log_format,
        Some(logger.transcript_writer()?),
    )?;
    config.print_summary();

    let code = match dispatch(cli.command, &config, &logger).await {
        Ok(code) => code,
        Err(e) => {
            println!();
            println!("{} {:#}", "Run aborted:".red().bold(), e);
            print_log_paths(&logger);

            let mut lines = vec![format!("Run aborted: {:#}", e)];
            lines.extend(logger.log_path_lines());
            logger.write_transcript(&lines);
            ExitCode::from(EXIT_FATAL)
        }
    };

    if let Err(e) = logger.close() {
        eprintln!("{} {}", "Failed to close run logs:".red(), e);
    }

    Ok(code)
}

/// Environment configuration with CLI overrides applied, validated.
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env();

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(library) = &cli.library {
        config.library = linkfix::utils::resource_path::normalize(library);
    }
    if let Some(template) = &cli.template {
        config.template_name = template.clone();
    }
    if let Some(hidden_folder) = &cli.hidden_folder {
        config.hidden_folder = hidden_folder.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = log_dir.clone();
    }
    if let Commands::Recreate {
        input: Some(input), ..
    } = &cli.command
    {
        config.input_path = input.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn dispatch(command: Commands, config: &Config, logger: &RunLogger) -> Result<ExitCode> {
    let client = match LocalFsClient::connect(&config.endpoint).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            logger.log_error("Failed to connect", Some(&e.log_detail()));
            return Err(e.into());
        }
    };

    let service = RemediationService::new(client, RunSettings::from(config));

    match command {
        Commands::Recreate { yes, .. } => handle_recreate(&service, logger, yes).await,
        Commands::Template => handle_template(&service, logger).await,
        Commands::Check => handle_check(&service, logger).await,
    }
}

async fn handle_recreate(
    service: &RemediationService<LocalFsClient>,
    logger: &RunLogger,
    skip_confirm: bool,
) -> Result<ExitCode> {
    let settings = service.settings();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Recreate links from {} into {}?",
                settings.input_path.display(),
                settings.library
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            logger.write_transcript(&["Cancelled".to_string()]);
            return Ok(ExitCode::from(EXIT_OK));
        }
    }

    let summary = service.run(logger).await?;
    print_run_summary(&summary);
    logger.write_transcript(&summary.report_lines());

    Ok(ExitCode::from(summary.exit_code()))
}

async fn handle_template(
    service: &RemediationService<LocalFsClient>,
    logger: &RunLogger,
) -> Result<ExitCode> {
    match service.prepare_template(logger).await {
        Ok(handle) => {
            println!("{} {}", "Template ready at".green(), handle.path().cyan());
            print_log_paths(logger);

            let mut lines = vec![format!("Template ready at {}", handle.path())];
            lines.extend(logger.log_path_lines());
            logger.write_transcript(&lines);
            Ok(ExitCode::from(EXIT_OK))
        }
        Err(e) => {
            logger.log_error("Template resolution failed", Some(&e.log_detail()));
            Err(e.into())
        }
    }
}

async fn handle_check(
    service: &RemediationService<LocalFsClient>,
    logger: &RunLogger,
) -> Result<ExitCode> {
    let preflight = service.preflight().await?;
    print_preflight(service.settings(), &preflight);
    logger.write_transcript(&preflight.report_lines(service.settings()));

    if preflight.is_ok() {
        Ok(ExitCode::from(EXIT_OK))
    } else {
        Ok(ExitCode::from(EXIT_FATAL))
    }
}

fn print_run_summary(summary: &RunSummary) {
    println!();
    println!("{}", "Recreate summary".bright_white().bold());
    println!("  Template:  {}", summary.template_path.cyan());
    println!("  Attempted: {}", summary.attempted);
    println!("  Created:   {}", summary.created.to_string().green());
    if summary.failed > 0 {
        println!("  Failed:    {}", summary.failed.to_string().red().bold());
    } else {
        println!("  Failed:    0");
    }
    if summary.rejected > 0 {
        println!("  Rejected:  {} (input rows)", summary.rejected.to_string().yellow());
    }

    let failures: Vec<_> = summary
        .results
        .iter()
        .filter(|r| r.status == LinkStatus::Failed)
        .collect();
    if !failures.is_empty() {
        println!();
        println!("{}", "Failed records:".red().bold());
        for link in failures {
            println!(
                "  {} -> {}",
                link.record.title().bright_white(),
                link.failure_detail.as_deref().unwrap_or_default()
            );
        }
    }

    println!();
    println!("  Error log:  {}", summary.error_log.display());
    println!("  Transcript: {}", summary.transcript.display());
}

fn print_preflight(settings: &RunSettings, preflight: &Preflight) {
    println!("{}", "Preflight".bright_white().bold());

    if preflight.library_exists {
        println!("  {} Library {}", "OK".green(), settings.library);
    } else {
        println!("  {} Library {} not found", "FAIL".red(), settings.library);
        return;
    }

    if preflight.missing_fields.is_empty() {
        println!("  {} Required fields present", "OK".green());
    } else {
        println!(
            "  {} Missing fields: {}",
            "FAIL".red(),
            preflight.missing_fields.join(", ")
        );
    }

    match &preflight.template_location {
        Some(path) => println!("  {} Template at {}", "OK".green(), path.cyan()),
        None => println!(
            "  {} Template {} not found in {} or {}/{}",
            "FAIL".red(),
            settings.template_name,
            settings.library,
            settings.library,
            settings.hidden_folder
        ),
    }
}

fn print_log_paths(logger: &RunLogger) {
    println!("  Error log:  {}", logger.error_log_path().display());
    println!("  Transcript: {}", logger.transcript_path().display());
}
