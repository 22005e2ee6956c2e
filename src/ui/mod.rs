//! Terminal UI: colored status lines, a spinner, and interactive prompts.

mod prompt;

pub use prompt::{
    Field, FieldState, Prompter, UiError, BACKGROUND_FIELD, COLOR_MAPPING_FIELD, IDENTITY_FIELD,
    MASK_FIELD, MAX_RESULTS_FIELD, QUERY_FIELD,
};

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::pipeline::RunReport;
use crate::render::ColorMap;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: impl std::fmt::Display) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => println!("{} {}", icon.yellow().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print the supported color maps, one per line.
pub fn print_color_maps() {
    for map in ColorMap::ALL {
        let start = map.sample(0.0).to_hex();
        let end = map.sample(1.0).to_hex();
        println!("{:<10} {} → {}", map.name().bold(), start.dimmed(), end.dimmed());
    }
}

/// Summarize a finished run.
pub fn print_report(report: &RunReport) {
    print_section("Run summary");
    println!("  Records found:    {}", report.ids_found.to_string().green());
    println!("  Abstracts used:   {}", report.abstracts.to_string().green());
    if report.skipped > 0 {
        println!("  Skipped records:  {}", report.skipped.to_string().yellow());
    }
    println!("  Fetched text:     {}", report.corpus_path.display());
    println!("  Settings:         {}", report.settings_path.display());

    if report.abstracts == 0 {
        print_status(
            Status::Warning,
            "No abstracts were found; the word cloud is empty",
        );
    }
    print_status(
        Status::Success,
        format!("Wordcloud file saved: {}", report.image_path.display()),
    );
}

/// Spinner shown while the remote database is queried.
pub struct FetchSpinner {
    spinner: indicatif::ProgressBar,
}

impl FetchSpinner {
    pub fn new(message: impl Into<String>) -> Self {
        let spinner = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        spinner.set_message(message.into());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    /// Stop the spinner and leave a final message
    pub fn finish(self, message: impl Into<String>) {
        self.spinner.finish_with_message(message.into());
    }

    /// Stop the spinner and clear its line
    pub fn abandon(self) {
        self.spinner.finish_and_clear();
    }
}
