use clap::Parser;
use std::path::PathBuf;

use crate::options::{OutputFormat, ValidationOptions};

/// Validate HTML documents with the Nu HTML Checker (vnu.jar)
#[derive(Parser, Debug, Clone)]
#[command(name = "w3c-validator")]
#[command(about = "Validate HTML files, globs and URLs with the Nu HTML Checker")]
#[command(version)]
pub struct Cli {
    /// File, directory, glob or URL to validate (defaults to the current directory)
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: Option<String>,

    /// Substitute ASCII quotation marks for Unicode smart quotes in messages
    #[arg(short = 'a', long = "asciiquotes")]
    pub asciiquotes: bool,

    /// Report only error-level messages and non-document errors
    #[arg(short = 'e', long = "errors-only")]
    pub errors_only: bool,

    /// File of regular expressions; matching messages are dropped (not yet forwarded)
    #[arg(long = "filterfile", value_name = "FILE")]
    pub filterfile: Option<PathBuf>,

    /// Regular expression; matching messages are dropped (not yet forwarded)
    #[arg(long = "filterpattern", value_name = "PATTERN")]
    pub filterpattern: Option<String>,

    /// Output format for reporting the results
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Skip documents without *.html, *.htm, *.xhtml or *.xht extensions
    #[arg(short = 's', long = "skip-non-html")]
    pub skip_non_html: bool,

    /// Parse *.xhtml and *.xht documents with the HTML parser
    #[arg(short = 'H', long = "html")]
    pub html: bool,

    /// Disable language detection (not yet forwarded)
    #[arg(long = "no-langdetect")]
    pub no_langdetect: bool,

    /// Parse in buffered mode instead of streaming mode
    #[arg(long = "no-stream")]
    pub no_stream: bool,

    /// Verbose output (names of checked files are written to stdout)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Write the report to this path instead of the console
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Java executable used to run the validator
    #[arg(long = "java", value_name = "PROGRAM")]
    pub java: Option<String>,

    /// Location of vnu.jar
    #[arg(long = "vnu-jar", value_name = "JAR")]
    pub vnu_jar: Option<PathBuf>,

    /// Print the validator's version and exit
    #[arg(long = "validator-version")]
    pub validator_version: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Options set on the command line; flags that were not given stay unset
    pub fn to_options(&self) -> ValidationOptions {
        let flag = |set: bool| set.then_some(true);

        ValidationOptions {
            format: self.format,
            asciiquotes: flag(self.asciiquotes),
            errors_only: flag(self.errors_only),
            exit_zero_always: None,
            skip_non_html: flag(self.skip_non_html),
            html: flag(self.html),
            stream: self.no_stream.then_some(false),
            verbose: flag(self.verbose),
            version: flag(self.validator_version),
            output: self.output.clone().filter(|p| !p.as_os_str().is_empty()),
        }
    }
}
