//! Debug traces, warnings and failure reporting.
//!
//! All user-facing output goes to stdout, including failures.

use crate::palette;

/// Output sink shared by the credential store, gateway and commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostics {
    /// Whether debug traces are printed.
    debug: bool,
    /// Whether output is colorized.
    use_color: bool,
}

impl Diagnostics {
    /// Create a new diagnostics sink.
    pub fn new(debug: bool, use_color: bool) -> Self {
        Self { debug, use_color }
    }

    /// Whether colored output is enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a trace line when debug output is enabled.
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.debug {
            let line = format!("[debug] {}", message.as_ref());
            println!("{}", palette::fmt_debug(&line, self.use_color));
        }
    }

    /// Print a non-fatal warning.
    pub fn warn(&self, message: impl AsRef<str>) {
        let line = format!("Warning: {}", message.as_ref());
        println!("{}", palette::fmt_warning(&line, self.use_color));
    }

    /// Print a failure that the caller recovers from.
    pub fn failure(&self, message: impl AsRef<str>) {
        println!("{}", palette::fmt_failure(message.as_ref(), self.use_color));
    }

    /// Print a plain progress line.
    pub fn note(&self, message: impl AsRef<str>) {
        println!("{}", message.as_ref());
    }
}
