use std::process::ExitStatus;

use tokio::process::{Child, Command};
use tokio::signal;
use tokio::signal::unix::{signal as unix_signal, SignalKind};
use tracing::{error, info};

/// Runs the `exec` subcommand through the shell.
pub fn spawn_exec(command: &str) -> std::io::Result<Child> {
    info!(command = %command, "starting exec subcommand");
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .kill_on_drop(true)
        .spawn()
}

/// Waits for Ctrl+C, SIGTERM, or the exec subcommand to exit.
pub async fn wait_for_shutdown(child: Option<&mut Child>) -> std::io::Result<()> {
    let mut sigterm = unix_signal(SignalKind::terminate())?;

    let exec_exit = async {
        match child {
            Some(child) => child.wait().await,
            None => std::future::pending::<std::io::Result<ExitStatus>>().await,
        }
    };

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
        }
        status = exec_exit => match status {
            Ok(status) => info!(status = %status, "exec subcommand exited, shutting down"),
            Err(e) => error!(error = %e, "failed waiting for exec subcommand"),
        }
    }

    Ok(())
}
