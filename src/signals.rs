use anyhow::{Result, bail};

/// Restore the default SIGINT disposition so Ctrl-C outside raw mode
/// terminates the process instead of being swallowed by an inherited handler
pub fn restore_default_sigint() -> Result<()> {
    // SAFETY: SIG_DFL is a valid disposition for SIGINT and no Rust state
    // depends on a previously installed handler.
    let previous = unsafe { libc::signal(libc::SIGINT, libc::SIG_DFL) };
    if previous == libc::SIG_ERR {
        bail!(
            "Failed to reset SIGINT handler: {}",
            std::io::Error::last_os_error()
        );
    }
    Ok(())
}
