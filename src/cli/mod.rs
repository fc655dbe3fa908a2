//! CLI commands for Courier using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::broker::Broker;
use crate::config::{self, load_settings_or_default};
use crate::gatekeeper::{Gatekeeper, PrefixGatekeeper};
use crate::web::{self, AppState, WebServerConfig};

/// Courier - in-memory agent-to-agent messaging broker.
#[derive(Parser)]
#[command(name = "courier")]
#[command(version = "0.1.0")]
#[command(about = "Courier - agent-to-agent messaging broker", long_about = None)]
pub struct Commands {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write the default settings file
    Setup {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },

    /// Run the broker with the built-in web screens
    Serve {
        /// Bind port (overrides settings)
        #[arg(long)]
        port: Option<u16>,

        /// Bind host (overrides settings)
        #[arg(long)]
        host: Option<String>,
    },
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Setup { force } => run_setup(force),
            Command::Serve { port, host } => run_serve(port, host).await,
        }
    }
}

fn run_setup(force: bool) -> Result<()> {
    let path = config::get_settings_path()?;

    if path.exists() && !force {
        println!(
            "Settings already exist at {}. Use --force to overwrite.",
            path.display()
        );
        return Ok(());
    }

    let path = config::save_settings(&config::Settings::default())?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}

async fn run_serve(port: Option<u16>, host: Option<String>) -> Result<()> {
    let settings = load_settings_or_default();

    let broker = Arc::new(Broker::new(settings.broker.clone()));
    let gatekeeper: Arc<dyn Gatekeeper> = Arc::new(PrefixGatekeeper::new(
        broker.clone(),
        settings.gatekeeper.denied_prefixes.clone(),
    ));

    let config = WebServerConfig {
        host: host.unwrap_or(settings.web.host),
        port: port.unwrap_or(settings.web.port),
    };

    web::run_server(config, AppState { broker, gatekeeper }).await?;
    Ok(())
}
