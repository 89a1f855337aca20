//! Async child-process execution with full stream capture.
//!
//! This module runs an external command and returns its complete stdout and
//! stderr once both streams have closed. The stdin write and the two output
//! drains run concurrently: draining one stream to completion before touching
//! the other can deadlock once the child fills the undrained pipe's OS-level
//! buffer and blocks on it.

use std::process::Stdio;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::debug;

use crate::error::{Aria2Error, Result};

/// Output of a completed child process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Captured stdout, decoded as UTF-8.
    pub stdout: String,
    /// Captured stderr, decoded as UTF-8.
    pub stderr: String,
    /// Process exit code (`None` if the process was killed by a signal).
    pub exit_code: Option<i32>,
}

/// Run a command and capture its complete stdout and stderr.
///
/// The command string is split into an argument vector with shell-like
/// tokenization: quoting is respected, but no variable expansion or globbing
/// is performed. If `stdin_data` is present it is written to the child's
/// stdin; stdin is closed afterwards (or immediately when absent) to signal
/// end-of-input.
///
/// Both output streams are drained to completion before the child is reaped,
/// so a partial read is never returned. Exit codes are captured but not
/// interpreted here; callers decide what counts as failure.
///
/// # Arguments
/// * `command` - The command line to run, e.g. `"killall aria2c"`
/// * `stdin_data` - Bytes to feed to the child's stdin, if any
///
/// # Errors
///
/// Returns [`Aria2Error::Process`] for an empty or untokenizable command and
/// [`Aria2Error::Io`] when spawning or stream IO fails.
pub async fn run_command(command: &str, stdin_data: Option<&[u8]>) -> Result<CommandOutput> {
    let argv = shell_words::split(command).map_err(|e| {
        Aria2Error::Process(format!("Failed to tokenize command '{}': {}", command, e))
    })?;
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| Aria2Error::Process("Empty command".to_string()))?;

    debug!(program = program.as_str(), "spawning child process");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            Aria2Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to spawn '{}': {}", program, e),
            ))
        })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| Aria2Error::Process("Failed to open stdin of spawned process".to_string()))?;
    let mut stdout = child.stdout.take().ok_or_else(|| {
        Aria2Error::Process("Failed to capture stdout of spawned process".to_string())
    })?;
    let mut stderr = child.stderr.take().ok_or_else(|| {
        Aria2Error::Process("Failed to capture stderr of spawned process".to_string())
    })?;

    let data = stdin_data.map(|data| data.to_vec());
    let feed_stdin = async move {
        if let Some(data) = data {
            stdin.write_all(&data).await?;
        }
        // Dropping the handle closes the pipe, signalling end-of-input.
        drop(stdin);
        Ok::<(), std::io::Error>(())
    };

    let mut out = Vec::new();
    let mut err = Vec::new();
    let drain_stdout = async {
        stdout.read_to_end(&mut out).await?;
        Ok::<(), std::io::Error>(())
    };
    let drain_stderr = async {
        stderr.read_to_end(&mut err).await?;
        Ok::<(), std::io::Error>(())
    };

    tokio::try_join!(feed_stdin, drain_stdout, drain_stderr)?;

    let status = child.wait().await?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
        exit_code: status.code(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let output = run_command("echo hello", None).await.unwrap();
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "");
        assert_eq!(output.exit_code, Some(0));
    }

    #[tokio::test]
    async fn feeds_stdin_to_child() {
        let output = run_command("cat", Some(b"x")).await.unwrap();
        assert_eq!(output.stdout, "x");
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn respects_quoting_in_tokenization() {
        let output = run_command("echo 'hello world'", None).await.unwrap();
        assert_eq!(output.stdout, "hello world\n");
    }

    #[tokio::test]
    async fn captures_stderr_separately() {
        let output = run_command("sh -c 'echo oops >&2'", None).await.unwrap();
        assert_eq!(output.stdout, "");
        assert_eq!(output.stderr, "oops\n");
    }

    #[tokio::test]
    async fn reports_nonzero_exit_code() {
        let output = run_command("false", None).await.unwrap();
        assert_eq!(output.exit_code, Some(1));
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn rejects_empty_command() {
        let result = run_command("", None).await;
        assert!(matches!(result, Err(Aria2Error::Process(_))));
    }

    #[tokio::test]
    async fn fails_for_missing_binary() {
        let result = run_command("nonexistent_command_12345", None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn closes_stdin_without_data() {
        // cat with no input must see EOF immediately instead of hanging
        let output = run_command("cat", None).await.unwrap();
        assert_eq!(output.stdout, "");
        assert_eq!(output.exit_code, Some(0));
    }
}
