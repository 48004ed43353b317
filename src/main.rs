use clap::Parser;
use tracing::{info, warn};

use litereplica::cli::Cli;
use litereplica::config::read_config_file;
use litereplica::shutdown::{spawn_exec, wait_for_shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = read_config_file(cli.config.as_deref(), !cli.no_expand_env)?;
    if !config.addr.is_empty() {
        info!(addr = %config.addr, "metrics bind address configured");
    }

    let mut server = cli.backup_server(&config)?;

    server.start().await?;
    info!("litereplica running");

    let mut child = if config.exec.is_empty() {
        None
    } else {
        Some(spawn_exec(&config.exec)?)
    };

    wait_for_shutdown(child.as_mut()).await?;

    server.stop();
    if let Some(child) = child.as_mut() {
        if let Err(e) = child.start_kill() {
            warn!(error = %e, "failed to kill exec subcommand");
        }
    }

    info!("shutdown complete");
    Ok(())
}
