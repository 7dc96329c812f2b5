//! `capinhas-eval`: evaluate one JSON request against the core rules
//!
//! Reads the request from the file named by the first argument, or from
//! stdin, and writes the JSON response to stdout. Logs go to stderr.

mod request;

use anyhow::{Context, Result};
use capinhas_core::Config;
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = load_config()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        service = %config.service_name,
        version = %config.service_version,
        "Configuration loaded"
    );

    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read request file {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read request from stdin")?;
            buffer
        }
    };

    let request: request::Request =
        serde_json::from_str(&input).context("Malformed request")?;
    let response = request::handle(request, &config)?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn load_config() -> Result<Config> {
    match std::env::var("CAPINHAS_CONFIG") {
        Ok(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path)),
        Err(_) => Config::from_env().context("Invalid configuration in environment"),
    }
}
