//! Terminal capabilities, decided once at startup from the global flags.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

/// Narrower `COLUMNS` values are ignored.
const MIN_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Terminal {
    /// ANSI colors in `--format table` output.
    pub color: bool,
    /// Spinners and bars on stderr.
    pub progress: bool,
    /// Table width limit.
    pub width: Option<usize>,
}

static TERMINAL: OnceLock<Terminal> = OnceLock::new();

impl Terminal {
    fn detect(
        flags: &GlobalFlags,
        stdout_tty: bool,
        stderr_tty: bool,
        no_color: bool,
        columns: Option<&str>,
    ) -> Self {
        Self {
            color: stdout_tty && flags.format == OutputFormat::Table && !flags.quiet && !no_color,
            // Debug logs share stderr with the bar.
            progress: stderr_tty && !flags.quiet && !flags.verbose,
            width: columns
                .and_then(|value| value.trim().parse().ok())
                .filter(|width| *width >= MIN_WIDTH),
        }
    }
}

pub fn init(flags: &GlobalFlags) {
    let columns = std::env::var("COLUMNS").ok();
    let terminal = Terminal::detect(
        flags,
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        columns.as_deref(),
    );
    if TERMINAL.set(terminal).is_err() {
        tracing::debug!("terminal settings already initialized");
    }
}

/// Settings from [`init`], or plain output when it was never called.
#[must_use]
pub fn terminal() -> Terminal {
    TERMINAL.get().copied().unwrap_or_default()
}
