use anyhow::{Context, Result, anyhow};
use arboard::Clipboard;
#[cfg(target_os = "linux")]
use arboard::SetExtLinux;
use tracing::{debug, warn};

/// Hidden argument that turns the process into a clipboard owner.
pub const DAEMON_FLAG: &str = "__repoclip_clipboard_daemon";

// On Linux the clipboard content lives only as long as its owning process,
// so a forked copy of ourselves keeps serving it after the CLI exits.
#[cfg(target_os = "linux")]
fn run_daemon_mode() -> Result<()> {
    let text = std::io::read_to_string(std::io::stdin())?;
    let mut clipboard = Clipboard::new()?;
    clipboard
        .set()
        .wait()
        .text(text)
        .map_err(anyhow::Error::from)?;
    Ok(())
}

/// Runs daemon mode when [`DAEMON_FLAG`] is present.
/// Returns Ok(true) if daemon mode ran, Ok(false) otherwise.
pub fn check_and_run_daemon_if_requested() -> Result<bool> {
    if !std::env::args().any(|a| a == DAEMON_FLAG) {
        return Ok(false);
    }
    #[cfg(target_os = "linux")]
    {
        run_daemon_mode()?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        warn!("{} flag used on non-Linux system, ignoring", DAEMON_FLAG);
    }
    Ok(true)
}

pub fn copy_text_to_clipboard(text: String) -> Result<()> {
    debug!(bytes = text.len(), "copying to clipboard");

    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
    }

    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        let mut child = Command::new(std::env::current_exe()?)
            .arg(DAEMON_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()
            .context("Failed to spawn clipboard daemon")?;

        let Some(mut stdin) = child.stdin.take() else {
            warn!("clipboard daemon has no stdin");
            return Err(anyhow!("Failed to get stdin for clipboard daemon"));
        };
        stdin.write_all(text.as_bytes())?;
        stdin.flush()?;
    }
    Ok(())
}
