//! Clipboard strategies backed by helper processes
//!
//! The image is streamed into the helper's stdin; nothing is written to
//! disk. The helper's exit status alone decides success.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::{ClipboardStrategy, StrategyError};
use crate::domain::image::{ClipboardFormat, NormalizedImage};

/// A helper program fed through stdin and bounded by a deadline
#[derive(Debug, Clone)]
pub struct HelperCommand {
    tool: &'static str,
    args: Vec<String>,
    timeout: Duration,
}

impl HelperCommand {
    pub fn new(tool: &'static str, args: &[&str], timeout: Duration) -> Self {
        Self {
            tool,
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout,
        }
    }

    pub fn tool(&self) -> &'static str {
        self.tool
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the helper with `input` on stdin.
    ///
    /// The child is killed if it outlives the deadline or if this future is
    /// dropped early.
    pub async fn feed(&self, input: &[u8]) -> Result<(), StrategyError> {
        // Some helpers (xclip, wl-copy) fork a daemon that inherits stdout
        // and stderr, so both stay detached and only the exit is awaited.
        let mut child = Command::new(self.tool)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    StrategyError::ToolMissing { tool: self.tool }
                } else {
                    StrategyError::Failed(format!("failed to start {}: {}", self.tool, e))
                }
            })?;

        let stdin = child.stdin.take();
        let run = async {
            if let Some(mut stdin) = stdin {
                // A helper that exits early closes the pipe; its status is
                // still what counts.
                if let Err(e) = stdin.write_all(input).await {
                    log::debug!("{} closed stdin early: {}", self.tool, e);
                }
                drop(stdin);
            }
            child.wait().await
        };

        let outcome = tokio::time::timeout(self.timeout, run).await;
        match outcome {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(StrategyError::ExitStatus {
                tool: self.tool,
                status: status.to_string(),
            }),
            Ok(Err(e)) => Err(StrategyError::Failed(format!(
                "failed waiting for {}: {}",
                self.tool, e
            ))),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    log::debug!("Failed to kill {}: {}", self.tool, e);
                }
                Err(StrategyError::Timeout {
                    tool: self.tool,
                    after: self.timeout,
                })
            }
        }
    }
}

#[cfg(windows)]
const POWERSHELL_SET_IMAGE: &str = "\
Add-Type -AssemblyName System.Windows.Forms; \
Add-Type -AssemblyName System.Drawing; \
$ms = New-Object System.IO.MemoryStream; \
[Console]::OpenStandardInput().CopyTo($ms); \
$ms.Position = 0; \
$img = [System.Drawing.Image]::FromStream($ms); \
[System.Windows.Forms.Clipboard]::SetImage($img)";

#[cfg(target_os = "macos")]
const OSASCRIPT_SET_TIFF: &str =
    "set the clipboard to (read (POSIX file \"/dev/stdin\") as TIFF picture)";

/// Clipboard strategy that pipes the encoded image to a helper program
#[derive(Debug, Clone)]
pub struct HelperStrategy {
    name: &'static str,
    format: ClipboardFormat,
    command: HelperCommand,
}

impl HelperStrategy {
    pub fn new(name: &'static str, format: ClipboardFormat, command: HelperCommand) -> Self {
        Self {
            name,
            format,
            command,
        }
    }

    /// `wl-copy --type image/png` (Wayland sessions)
    #[cfg(all(unix, not(target_os = "macos")))]
    pub fn wl_copy(timeout: Duration) -> Self {
        Self::new(
            "wl-copy",
            ClipboardFormat::Png,
            HelperCommand::new("wl-copy", &["--type", "image/png"], timeout),
        )
    }

    /// `xclip -selection clipboard -t image/png -i` (X11)
    #[cfg(all(unix, not(target_os = "macos")))]
    pub fn xclip(timeout: Duration) -> Self {
        Self::new(
            "xclip",
            ClipboardFormat::Png,
            HelperCommand::new(
                "xclip",
                &["-selection", "clipboard", "-t", "image/png", "-i"],
                timeout,
            ),
        )
    }

    /// `xsel --clipboard --input` (X11, when xclip is not installed)
    #[cfg(all(unix, not(target_os = "macos")))]
    pub fn xsel(timeout: Duration) -> Self {
        Self::new(
            "xsel",
            ClipboardFormat::Png,
            HelperCommand::new("xsel", &["--clipboard", "--input"], timeout),
        )
    }

    /// AppleScript reading TIFF data from stdin
    #[cfg(target_os = "macos")]
    pub fn osascript(timeout: Duration) -> Self {
        Self::new(
            "osascript",
            ClipboardFormat::Tiff,
            HelperCommand::new("osascript", &["-e", OSASCRIPT_SET_TIFF], timeout),
        )
    }

    /// Windows Forms clipboard via PowerShell, fed the untouched upload
    #[cfg(windows)]
    pub fn powershell(timeout: Duration) -> Self {
        Self::new(
            "powershell",
            ClipboardFormat::Original,
            HelperCommand::new(
                "powershell",
                &[
                    "-NoProfile",
                    "-NonInteractive",
                    "-STA",
                    "-Command",
                    POWERSHELL_SET_IMAGE,
                ],
                timeout,
            ),
        )
    }

    pub fn command(&self) -> &HelperCommand {
        &self.command
    }
}

#[async_trait]
impl ClipboardStrategy for HelperStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn format(&self) -> ClipboardFormat {
        self.format
    }

    async fn commit(&self, image: &NormalizedImage) -> Result<(), StrategyError> {
        log::debug!(
            "Piping {} bytes of {} into {}",
            image.len(),
            image.format(),
            self.command.tool()
        );
        self.command.feed(image.bytes()).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use std::time::Instant;

    const INPUT: &[u8] = &[7u8; 4096];

    #[tokio::test]
    async fn successful_helper() {
        let helper = HelperCommand::new("cat", &[], Duration::from_secs(5));
        assert!(helper.feed(INPUT).await.is_ok());
    }

    #[tokio::test]
    async fn failing_exit_status() {
        let script = ["-c", "cat >/dev/null; exit 3"];
        let helper = HelperCommand::new("sh", &script, Duration::from_secs(5));
        let err = helper.feed(INPUT).await.unwrap_err();
        assert!(matches!(err, StrategyError::ExitStatus { tool: "sh", .. }));
        assert_eq!(err.kind(), ErrorKind::ClipboardCommitFailed);
    }

    #[tokio::test]
    async fn helper_that_ignores_stdin_is_judged_by_status() {
        let helper = HelperCommand::new("true", &[], Duration::from_secs(5));
        assert!(helper.feed(&vec![1u8; 1 << 20]).await.is_ok());
    }

    #[tokio::test]
    async fn missing_tool() {
        let helper = HelperCommand::new(
            "snappaste-no-such-helper",
            &[],
            Duration::from_secs(5),
        );
        let err = helper.feed(INPUT).await.unwrap_err();
        assert!(err.is_tool_missing());
        assert_eq!(err.kind(), ErrorKind::ExternalToolMissing);
    }

    #[tokio::test]
    async fn slow_helper_is_killed_at_deadline() {
        let helper = HelperCommand::new("sleep", &["30"], Duration::from_millis(200));
        let started = Instant::now();

        let err = helper.feed(INPUT).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ClipboardTimeout);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    #[cfg(not(target_os = "macos"))]
    fn xclip_targets_png_clipboard_selection() {
        let strategy = HelperStrategy::xclip(Duration::from_secs(10));
        assert_eq!(strategy.format, ClipboardFormat::Png);
        assert_eq!(
            strategy.command().args(),
            ["-selection", "clipboard", "-t", "image/png", "-i"]
        );
    }
}
