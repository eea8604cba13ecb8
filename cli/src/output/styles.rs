//! Output styles using owo-colors stylesheet pattern

use owo_colors::{OwoColorize as _, Style};

/// How severe a report line is; selects its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Block headers (green).
    Header,
    /// Debug echo of an item before it runs (yellow).
    Trace,
    /// Captured item output (unstyled).
    Plain,
    /// Failure that the run survives (red).
    Controlled,
    /// Failure that ends the run (bold red).
    Fatal,
}

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Block headers
    pub header: Style,
    /// Debug echo
    pub trace: Style,
    /// Controlled failures
    pub controlled: Style,
    /// Fatal failures
    pub fatal: Style,
}

impl Styles {
    /// Stylesheet with colors applied.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            header: Style::new().green(),
            trace: Style::new().yellow(),
            controlled: Style::new().bright_red(),
            fatal: Style::new().bright_red().bold(),
        }
    }

    /// Render `text` in the style for `severity`.
    #[must_use]
    pub fn paint(&self, severity: Severity, text: &str) -> String {
        let style = match severity {
            Severity::Header => self.header,
            Severity::Trace => self.trace,
            Severity::Plain => return text.to_string(),
            Severity::Controlled => self.controlled,
            Severity::Fatal => self.fatal,
        };
        text.style(style).to_string()
    }
}
