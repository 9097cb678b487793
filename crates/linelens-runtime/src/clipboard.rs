//! Clipboard adapter over the host's command-line clipboard tools.
//!
//! Text is piped to the tool's stdin rather than passed as an argument, so
//! multi-line source code and shell-hostile characters survive untouched.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use linelens_core::{ClipboardError, ClipboardPort};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Clipboard tools in order of preference (Wayland, X11, macOS).
const CLIPBOARD_TOOLS: &[&str] = &["wl-copy", "xclip", "xsel", "pbcopy"];

/// [`ClipboardPort`] implementation that shells out to the first clipboard
/// tool found on `PATH`.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    tool: PathBuf,
}

impl SystemClipboard {
    /// Finds a clipboard tool on `PATH`.
    ///
    /// Returns `None` on hosts without one; the embedding app then runs
    /// without the copy affordance.
    #[must_use]
    pub fn detect() -> Option<Self> {
        let tool = crate::which::find_in_path(CLIPBOARD_TOOLS)?;
        debug!(tool = %tool.display(), "clipboard tool detected");
        Some(Self { tool })
    }

    /// Uses a specific tool instead of scanning `PATH`.
    #[must_use]
    pub fn with_tool(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.tool);
        // xclip and xsel write to the primary selection unless told
        // otherwise; the others default to the clipboard already.
        match self.tool.file_name().and_then(OsStr::to_str) {
            Some("xclip") => {
                command.arg("-selection").arg("clipboard");
            }
            Some("xsel") => {
                command.arg("--clipboard").arg("--input");
            }
            _ => {}
        }
        command
    }

    fn error(&self, context: &str, detail: impl std::fmt::Display) -> ClipboardError {
        ClipboardError {
            message: format!("{context} {}: {detail}", self.tool.display()),
        }
    }
}

#[async_trait]
impl ClipboardPort for SystemClipboard {
    async fn copy_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|error| self.error("failed to start", error))?;

        let Some(mut stdin) = child.stdin.take() else {
            let _ = child.wait().await;
            return Err(self.error("no stdin pipe for", "stdin was not captured"));
        };
        if let Err(error) = stdin.write_all(text.as_bytes()).await {
            drop(stdin);
            let _ = child.wait().await;
            return Err(self.error("failed to pipe text to", error));
        }
        // Close the pipe so the tool sees end-of-input and can finish.
        drop(stdin);

        let status = child
            .wait()
            .await
            .map_err(|error| self.error("failed to wait for", error))?;
        if status.success() {
            Ok(())
        } else {
            Err(self.error("non-zero exit from", status))
        }
    }
}
