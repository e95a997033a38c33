//! Bounded execution of enumeration commands

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::application::ports::EnumerationError;

/// Run `tool` and return its stdout.
///
/// The child is killed when the deadline passes. Output is decoded
/// lossily; parsers only look at ASCII markers and addresses.
pub async fn run_command(
    tool: &'static str,
    args: &[&str],
    timeout: Duration,
) -> Result<String, EnumerationError> {
    let child = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EnumerationError::ToolMissing { tool }
            } else {
                EnumerationError::CommandFailed {
                    tool,
                    message: e.to_string(),
                }
            }
        })?;

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| EnumerationError::Timeout {
            tool,
            secs: timeout.as_secs(),
        })?
        .map_err(|e| EnumerationError::CommandFailed {
            tool,
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EnumerationError::CommandFailed {
            tool,
            message: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let out = run_command("echo", &["inet 10.0.0.1"], Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out.trim(), "inet 10.0.0.1");
    }

    #[tokio::test]
    async fn missing_tool() {
        let err = run_command("snappaste-no-such-tool", &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, EnumerationError::ToolMissing { .. }));
    }

    #[tokio::test]
    async fn times_out() {
        let err = run_command("sleep", &["30"], Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, EnumerationError::Timeout { tool: "sleep", .. }));
    }

    #[tokio::test]
    async fn non_zero_exit_is_failure() {
        let err = run_command("false", &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, EnumerationError::CommandFailed { tool: "false", .. }));
    }
}
