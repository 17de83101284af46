//! CLI interface for loan-tracker

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::config::{self, Config};
use crate::mailer::{Notifier, SmtpMailer};
use crate::store::RecordStore;
use crate::{server, sweep};

#[derive(Parser)]
#[command(name = "loan-tracker")]
#[command(about = "Library loan tracker with due-date email reminders", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the periodic reminder sweep
    Serve {
        /// Listen host (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one reminder sweep against today's date, then exit
    Sweep,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the configuration file location
    Path,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => serve(None, None).await,
        Some(Commands::Serve { host, port }) => serve(host, port).await,
        Some(Commands::Sweep) => single_sweep().await,
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => {
                let config = Config::load()?;
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigCommands::Path => {
                println!("{}", config::config_path()?.display());
                Ok(())
            }
        },
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let config = Arc::new(config);

    let store = Arc::new(RecordStore::new(&config.server.store_path));
    let notifier = Notifier::spawn(Arc::new(SmtpMailer::new(&config.mail)?));

    sweep::spawn(store.clone(), config.clone(), notifier);
    server::start(config, store).await
}

async fn single_sweep() -> Result<()> {
    let config = Config::load()?;
    let store = RecordStore::new(&config.server.store_path);
    let notifier = Notifier::spawn(Arc::new(SmtpMailer::new(&config.mail)?));

    sweep::run_sweep(&store, &config, &notifier, chrono::Local::now().date_naive()).await;
    // Wait for the queue to drain before the process exits.
    notifier.shutdown().await;

    Ok(())
}
