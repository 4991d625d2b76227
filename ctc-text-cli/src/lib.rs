//! ctc-text CLI library: argument parsing, configuration loading and
//! subcommand execution.

pub mod beam;
pub mod cli;
pub mod config;
pub mod greedy;
pub mod text;

/// Format seconds as a string with two decimal places.
pub(crate) fn format_secs(secs: f32) -> String {
    format!("{:.2}s", secs)
}
