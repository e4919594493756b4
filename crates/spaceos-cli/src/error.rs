//! Startup failures reported at the process boundary.

use thiserror::Error;

/// Anything that keeps the dashboard from starting or tears it down early.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("could not install the Ctrl+C handler: {0}")]
    Interrupt(#[from] ctrlc::Error),

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("refresh interval must be a positive number of seconds, got {0}")]
    InvalidRefresh(f64),
}

/// Printed after any [`StartupError`].
pub const REMEDIES: [&str; 3] = [
    "Run inside an interactive terminal that understands ANSI escape codes (or pass --plain)",
    "Use a terminal window with enough width (at least 80 columns)",
    "If on Windows, try running in Windows Terminal or PowerShell",
];
