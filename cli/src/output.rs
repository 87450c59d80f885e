//! CLI output helpers for consistent formatting.

use colored::Colorize;
use std::time::Duration;

pub fn heading(text: &str) -> String {
    format!("{}", text.bright_cyan())
}

pub fn label(text: &str) -> String {
    format!("{}", text.green())
}

pub fn muted(text: &str) -> String {
    format!("{}", text.bright_black())
}

pub fn warning(text: &str) -> String {
    format!("{}", text.yellow())
}

pub fn warn_line(text: &str) -> String {
    format!("{} {}", "warning".yellow(), text)
}

/// `label value` line, e.g. `using adapter sqlite`
pub fn setting(name: &str, value: impl std::fmt::Display) -> String {
    format!("{} {}", label(name), value)
}

pub fn elapsed(elapsed: Duration) -> String {
    warning(&format!("All Done. Took {:.4}s", elapsed.as_secs_f64()))
}
