//! Report card watcher CLI
//!
//! Polls the student portal and emails the report card when it changes.

use std::fs::OpenOptions;
use std::path::PathBuf;

use bulletin::{
    config,
    error::Result,
    models::Config,
    pipeline,
    services::{PortalClient, SmtpNotifier},
    storage::{LocalStorage, ReportStore},
    utils::log as progress,
};
use clap::{Parser, Subcommand};

/// bulletin - report card change notifier
#[derive(Parser, Debug)]
#[command(
    name = "bulletin",
    version,
    about = "Emails the PolyMTL report card whenever it changes"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "bulletin.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Append log lines to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the portal on a fixed interval until interrupted
    Watch {
        /// Run the first check right away instead of after one interval
        #[arg(long)]
        run_now: bool,
    },

    /// Run a single check and exit
    Once {
        /// Print the outcome as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration and environment
    Validate,

    /// Show the persisted report
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

/// Resolve once Ctrl-C is received.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_ref())?;

    log::info!("Report watcher starting...");

    match cli.command {
        Command::Watch { run_now } => {
            let config = config::load_all(&cli.config)?;
            log::info!("Loaded configuration from {}", cli.config.display());

            let source = PortalClient::new(&config.portal, config.credentials.clone())?;
            let store = LocalStorage::from_config(&config.storage);
            let notifier = SmtpNotifier::new(config.mail.clone())?;

            let mut schedule = config.schedule.clone();
            schedule.run_on_start |= run_now;

            pipeline::run_scheduler(&schedule, &source, &store, &notifier, ctrl_c()).await;
        }

        Command::Once { json } => {
            let config = config::load_all(&cli.config)?;

            let source = PortalClient::new(&config.portal, config.credentials.clone())?;
            let store = LocalStorage::from_config(&config.storage);
            let notifier = SmtpNotifier::new(config.mail.clone())?;

            match pipeline::run_tick(&source, &store, &notifier).await {
                Ok(outcome) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&outcome)?);
                    } else {
                        progress::summary(
                            "Check complete",
                            &[
                                ("Detection", outcome.detection.to_string()),
                                ("Digest", outcome.digest.to_string()),
                                ("Saved", outcome.persisted.to_string()),
                                ("Emailed", outcome.notified.to_string()),
                            ],
                        );
                    }
                }
                Err(e) => {
                    pipeline::report_failure(&e);
                    return Err(e);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config::load_all(&cli.config) {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (portal, credentials, mail, storage, schedule)");
        }

        Command::Info => {
            let config = Config::load_or_default(&cli.config);
            let store = LocalStorage::from_config(&config.storage);

            log::info!("Report location: {}", store.location());
            match store.load().await? {
                Some(report) => {
                    log::info!("Report size: {} bytes", report.len());
                    match pipeline::fingerprint(&report) {
                        Ok(digest) => log::info!("Content digest: {}", digest),
                        Err(e) => log::warn!("Report is unreadable: {}", e),
                    }
                }
                None => log::info!("No report saved yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
