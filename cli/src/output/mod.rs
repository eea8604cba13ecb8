//! Output formatting module

pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
pub use reporter::TerminalReporter;
pub use styles::{Severity, Styles};

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && !no_color_env();

        let styles = if use_colors {
            Styles::colored()
        } else {
            Styles::default()
        };

        Self { styles, is_tty }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty
    }
}

/// `NO_COLOR` set to any non-empty value disables colors (no-color.org).
fn no_color_env() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}
