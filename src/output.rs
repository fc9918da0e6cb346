//! Console output
//!
//! Formatting is kept separate from printing so it can be tested.

use std::path::Path;

/// Console presenter for validation outcomes
pub struct Output {
    show_colors: bool,
}

impl Output {
    pub fn new() -> Self {
        Self {
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn plain() -> Self {
        Self { show_colors: false }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    /// Report printed to the console when no output path is configured
    pub fn format_report(&self, report: &str) -> String {
        format!("{}\n{}\n \n", self.colorize("Resulting report:", "31"), report)
    }

    /// Notice printed before a report is written to disk
    pub fn format_destination(&self, path: &Path) -> String {
        format!(
            "{}\n{}\n",
            self.colorize("Resulting report will be written in path:", "33"),
            path.display()
        )
    }

    /// Wrapper-side failure (config, spawn, write)
    pub fn format_error(&self, error: &anyhow::Error) -> String {
        let mut output = format!("{} {}", self.colorize("error:", "31"), error);
        for cause in error.chain().skip(1) {
            output.push_str(&format!("\n  caused by: {}", cause));
        }
        output
    }

    pub fn print_report(&self, report: &str) {
        print!("{}", self.format_report(report));
    }

    pub fn print_destination(&self, path: &Path) {
        print!("{}", self.format_destination(path));
    }

    pub fn print_error(&self, error: &anyhow::Error) {
        eprintln!("{}", self.format_error(error));
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
