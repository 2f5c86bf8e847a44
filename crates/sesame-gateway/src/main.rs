mod routes;
mod session;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sesame_api::SesameError;
use sesame_core::{
    Settings, default_config_dir, demo_settings, load_settings_from_dir, load_settings_from_file,
    write_default_settings,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "sesame-gateway", about = "Sesame SSO bridge gateway")]
struct Cli {
    /// Settings file; defaults to sesame.toml under the config dir.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured listen address.
    #[arg(long)]
    listen: Option<String>,

    /// Write a default settings file into the config dir and exit.
    #[arg(long)]
    init: bool,

    /// Run with built-in demo settings instead of a config file.
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sesame_gateway=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if cli.init {
        let dir = default_config_dir();
        write_default_settings(&dir)?;
        info!("wrote default settings under {}", dir.display());
        return Ok(());
    }

    let mut settings = load_settings(&cli)?;
    if let Some(listen) = cli.listen {
        settings.listen_addr = listen;
    }

    let app = routes::app(&settings)?;
    let listener = tokio::net::TcpListener::bind(&settings.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen_addr))?;
    info!(addr = %settings.listen_addr, "sesame gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    if cli.demo {
        return Ok(demo_settings());
    }

    match &cli.config {
        Some(path) => Ok(load_settings_from_file(path)?),
        None => {
            let dir = default_config_dir();
            match load_settings_from_dir(&dir) {
                Ok(settings) => Ok(settings),
                Err(SesameError::NotFound(_)) => {
                    info!(
                        "no settings under {}, falling back to demo settings",
                        dir.display()
                    );
                    Ok(demo_settings())
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
