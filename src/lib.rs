//! # w3c-validator Library
//!
//! Runs the Nu HTML Checker (`vnu.jar`) against files, globs and URLs,
//! translating typed options into validator arguments and optionally
//! rendering failures as an HTML report.
//!
//! ```no_run
//! use w3c_validator::{OutputFormat, Target, ValidationOptions, Validator, ValidatorCommand};
//!
//! # async fn demo() {
//! let validator = Validator::new(ValidatorCommand::new("/opt/vnu/vnu.jar"));
//! let target = Target::detect(Some("tmp/*.html"), std::path::Path::new("/site"));
//! let options = ValidationOptions::new().with_format(OutputFormat::Html);
//!
//! if let Err(failure) = validator.run(&target, &options).await {
//!     w3c_validator::write_file("results/vnu.html", &failure.output).unwrap();
//! }
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod file_discovery;
pub mod options;
pub mod output;
pub mod report;
pub mod runner;
pub mod target;
pub mod writer;

pub use cli::Cli;
pub use config::{Config, ConfigError, ConfigManager, EnvProvider, ValidatorConfig};
pub use error::{ValidationFailure, ValidatorError};
pub use file_discovery::FileDiscovery;
pub use options::{NormalizedOptions, OutputFormat, ValidationOptions};
pub use output::Output;
pub use report::render_html;
pub use runner::{
    Invocation, ProcessOutput, ProcessRunner, TokioProcessRunner, Validator, ValidatorCommand,
};
pub use target::Target;
pub use writer::{write_file, write_file_async};
