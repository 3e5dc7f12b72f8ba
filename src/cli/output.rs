//! Output helpers for CLI commands

/// Output helper for consistent formatting
///
/// Results go to stdout. Debug diagnostics go to stderr and only when
/// `--debug` is on.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    debug: bool,
}

impl Output {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        println!("{}", message);
    }

    /// Prints a blank line
    pub fn blank(&self) {
        println!();
    }

    /// Prints a debug message (only when --debug is set)
    pub fn debug(&self, message: &str) {
        if self.debug {
            eprintln!("[debug] {}", message);
        }
    }

    /// Prints a debug message with context (only when --debug is set)
    pub fn debug_ctx(&self, context: &str, message: &str) {
        if self.debug {
            eprintln!("[debug:{}] {}", context, message);
        }
    }
}
