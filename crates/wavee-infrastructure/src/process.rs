//! Helpers for the external programs used for speech and playback.

use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use wavee_core::error::{Result, WaveeError};

/// Checks whether `program` can be found on `PATH`.
///
/// Uses `which` on Unix/macOS or `where` on Windows.
pub async fn is_available(program: &str) -> bool {
    #[cfg(unix)]
    let check_cmd = "which";
    #[cfg(windows)]
    let check_cmd = "where";

    Command::new(check_cmd)
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Returns the first available program from `candidates`.
pub async fn first_available(candidates: &[&str]) -> Option<String> {
    for candidate in candidates {
        if is_available(candidate).await {
            return Some((*candidate).to_string());
        }
    }
    None
}

/// Runs `cmd` to completion, killing it if `cancel` fires first.
///
/// Returns [`WaveeError::Cancelled`] when killed, and `on_failure` applied to
/// a description of the problem when the program fails.
pub async fn run_cancellable(
    mut cmd: Command,
    cancel: CancellationToken,
    on_failure: fn(String) -> WaveeError,
) -> Result<()> {
    let program = cmd.as_std().get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| on_failure(format!("Failed to spawn {program}: {e}")))?;

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|e| on_failure(format!("{program} failed: {e}")))?;
            if status.success() {
                Ok(())
            } else {
                Err(on_failure(format!("{program} exited with {status}")))
            }
        }
        _ = cancel.cancelled() => {
            if let Err(e) = child.kill().await {
                tracing::warn!("[Process] Failed to kill {}: {}", program, e);
            }
            Err(WaveeError::Cancelled)
        }
    }
}
