//! Validation options and their translation into validator arguments
//!
//! [`ValidationOptions`] is what callers (the CLI, a config file, library users)
//! fill in. It is normalized exactly once into [`NormalizedOptions`], which is
//! the only type that can be serialized into command-line tokens. The `html`
//! meta-format therefore can never reach the validator.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format requested from the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Gnu,
    Xml,
    Json,
    Text,
    /// Meta-format: JSON from the validator, rendered into an HTML report
    Html,
}

impl OutputFormat {
    /// Token passed after `--format`, or `None` for the meta-format
    pub fn wire_name(self) -> Option<&'static str> {
        match self {
            OutputFormat::Gnu => Some("gnu"),
            OutputFormat::Xml => Some("xml"),
            OutputFormat::Json => Some("json"),
            OutputFormat::Text => Some("text"),
            OutputFormat::Html => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name().unwrap_or("html"))
    }
}

/// User-supplied validation options
///
/// Every field is optional; `None` means "not set", which is distinct from
/// `Some(false)` for `stream`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ValidationOptions {
    pub format: Option<OutputFormat>,
    pub asciiquotes: Option<bool>,
    pub errors_only: Option<bool>,
    pub exit_zero_always: Option<bool>,
    pub skip_non_html: Option<bool>,
    /// Force the HTML parser for `*.xhtml`/`*.xht`. Accepted but not forwarded.
    pub html: Option<bool>,
    /// Streaming parse mode; the validator streams unless this is `Some(false)`
    pub stream: Option<bool>,
    pub verbose: Option<bool>,
    /// Ask the validator for its own version
    pub version: Option<bool>,
    /// Report destination; `None` prints to the console
    pub output: Option<PathBuf>,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Expand the `html` meta-format. Never mutates `self`.
    pub fn normalize(&self) -> NormalizedOptions {
        let mut options = self.clone();
        let mut output_as_html = false;

        if options.format == Some(OutputFormat::Html) {
            output_as_html = true;
            options.verbose = Some(true);
            options.format = Some(OutputFormat::Json);
        }

        NormalizedOptions {
            options,
            output_as_html,
        }
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merge(mut self, other: &ValidationOptions) -> Self {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field.clone();
                })*
            };
        }
        overlay!(
            format,
            asciiquotes,
            errors_only,
            exit_zero_always,
            skip_non_html,
            html,
            stream,
            verbose,
            version,
            output
        );
        self
    }
}

/// Options after meta-format expansion, ready for serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOptions {
    options: ValidationOptions,
    output_as_html: bool,
}

/// Flags that take no value, in emission order
fn boolean_flags(options: &ValidationOptions) -> [(&'static str, Option<bool>); 5] {
    [
        ("errorsOnly", options.errors_only),
        ("exitZeroAlways", options.exit_zero_always),
        ("skipNonHtml", options.skip_non_html),
        ("verbose", options.verbose),
        ("version", options.version),
    ]
}

impl NormalizedOptions {
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Whether failure output must be rendered as an HTML report
    pub fn output_as_html(&self) -> bool {
        self.output_as_html
    }

    /// Normalizing twice is the same as normalizing once
    pub fn normalize(&self) -> NormalizedOptions {
        let mut again = self.options.normalize();
        again.output_as_html |= self.output_as_html;
        again
    }

    /// Serialize into validator argument tokens
    pub fn to_args(&self) -> Vec<String> {
        let options = &self.options;
        let mut argv = Vec::new();

        if let Some(format) = options.format.and_then(OutputFormat::wire_name) {
            argv.push("--format".to_string());
            argv.push(format.to_string());
        }

        if options.asciiquotes == Some(true) {
            argv.push("--asciiquotes".to_string());
            argv.push("yes".to_string());
        }

        if options.stream == Some(false) {
            argv.push("--no-stream".to_string());
        }

        for (name, value) in boolean_flags(options) {
            if value == Some(true) {
                argv.push(format!("--{}", camel_to_dash(name)));
            }
        }

        argv
    }
}

/// `errorsOnly` -> `errors-only`
fn camel_to_dash(name: &str) -> String {
    let mut dashed = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            dashed.push('-');
            dashed.push(c.to_ascii_lowercase());
        } else {
            dashed.push(c);
        }
    }
    dashed
}
