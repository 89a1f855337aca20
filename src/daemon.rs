//! aria2 daemon lifecycle: start, kill, and readiness polling.
//!
//! Starting and force-killing go through [`run_command`](crate::process);
//! everything else (graceful shutdown, the liveness probe) goes through the
//! RPC client. No process handle is tracked: the daemon may have been started
//! by another process entirely, so "running" is always decided by the network
//! probe in [`Aria2Client::is_running`].

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::{Aria2Error, Result};
use crate::process::run_command;
use crate::rpc::client::Aria2Client;

const READY_POLL_ATTEMPTS: u32 = 10;
const READY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Assemble the aria2c command line for a daemonized start.
fn start_command(rpc_port: u16, extra_flags: &[&str], secret: Option<&str>) -> String {
    let mut cmd = format!(
        "aria2c --enable-rpc --continue=true --rpc-listen-port={} --rpc-listen-all=true --daemon=true",
        rpc_port
    );
    for flag in extra_flags {
        cmd.push(' ');
        cmd.push_str(flag);
    }
    if let Some(secret) = secret {
        cmd.push_str(" --rpc-secret ");
        cmd.push_str(secret);
    }
    cmd
}

/// Start aria2c as a detached background daemon.
///
/// The daemon is spawned with RPC enabled on `rpc_port`, listening on all
/// interfaces, continuing partial downloads, plus any caller-supplied
/// `extra_flags`. When the client carries a secret, `--rpc-secret` is
/// appended so the daemon enforces the same token the client injects.
///
/// aria2c daemonizes itself (`--daemon=true`), so the spawned process exits
/// quickly; a non-empty stderr capture is treated as a failed start.
pub async fn start(client: &Aria2Client, rpc_port: u16, extra_flags: &[&str]) -> Result<()> {
    let cmd = start_command(rpc_port, extra_flags, client.secret());

    info!(rpc_port, "starting aria2c daemon");
    let output = run_command(&cmd, None).await?;

    if output.stderr.is_empty() {
        Ok(())
    } else {
        Err(Aria2Error::Process(format!(
            "aria2c failed to start (exit code {}): {}",
            output.exit_code.unwrap_or(-1),
            output.stderr.trim()
        )))
    }
}

/// Forcibly terminate every aria2c process on this host.
///
/// This is the blunt fallback for a daemon that no longer answers RPC; prefer
/// [`Aria2Client::stop`] for a graceful shutdown.
pub async fn kill() -> Result<()> {
    info!("killing aria2c processes");
    let output = run_command("killall aria2c", None).await?;

    if output.stderr.is_empty() {
        Ok(())
    } else {
        Err(Aria2Error::Process(format!(
            "killall failed (exit code {}): {}",
            output.exit_code.unwrap_or(-1),
            output.stderr.trim()
        )))
    }
}

/// Ensure the daemon is reachable, starting it if necessary.
///
/// Probes the client's endpoint first; when unreachable, starts the daemon
/// and polls the probe until it answers or the attempt budget runs out.
///
/// # Errors
///
/// Propagates start failures, non-connection probe failures, and reports
/// [`Aria2Error::Process`] when the daemon never becomes reachable.
pub async fn ensure_running(
    client: &Aria2Client,
    rpc_port: u16,
    extra_flags: &[&str],
) -> Result<()> {
    if client.is_running().await? {
        debug!(url = client.url(), "aria2 daemon already reachable");
        return Ok(());
    }

    start(client, rpc_port, extra_flags).await?;

    for _ in 0..READY_POLL_ATTEMPTS {
        sleep(READY_POLL_INTERVAL).await;
        if client.is_running().await? {
            return Ok(());
        }
    }

    Err(Aria2Error::Process(format!(
        "aria2 daemon did not become reachable at {}",
        client.url()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_command_carries_fixed_flags() {
        let cmd = start_command(6800, &[], None);
        assert!(cmd.starts_with("aria2c "));
        assert!(cmd.contains("--enable-rpc"));
        assert!(cmd.contains("--continue=true"));
        assert!(cmd.contains("--rpc-listen-port=6800"));
        assert!(cmd.contains("--rpc-listen-all=true"));
        assert!(cmd.contains("--daemon=true"));
        assert!(!cmd.contains("--rpc-secret"));
    }

    #[test]
    fn start_command_appends_extra_flags_then_secret() {
        let cmd = start_command(7000, &["--dir=/tmp/dl"], Some("hunter2"));
        assert!(cmd.contains("--rpc-listen-port=7000"));
        let dir = cmd.find("--dir=/tmp/dl").unwrap();
        let secret = cmd.find("--rpc-secret hunter2").unwrap();
        assert!(dir < secret);
    }
}
