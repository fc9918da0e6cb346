//! Spawning the validator
//!
//! The external process sits behind [`ProcessRunner`] so the rest of the
//! pipeline can be exercised without a JVM. [`Validator`] owns the
//! invocation prefix (`java <java-args> -jar vnu.jar`) and turns one
//! `(target, options)` pair into exactly one process.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::config::{ConfigError, ValidatorConfig};
use crate::error::{ValidationFailure, ValidatorError};
use crate::file_discovery::FileDiscovery;
use crate::options::{NormalizedOptions, ValidationOptions};
use crate::report::render_html;
use crate::target::Target;

/// A fully built command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Space-joined form, for logging
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs one process to completion
pub trait ProcessRunner: Send + Sync {
    /// Fails only when the process cannot be started
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = std::io::Result<ProcessOutput>> + Send;
}

/// Production runner backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Invocation prefix for the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorCommand {
    pub java: String,
    pub java_args: Vec<String>,
    pub jar: PathBuf,
}

impl ValidatorCommand {
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        let defaults = ValidatorConfig::default();
        Self {
            java: defaults.java,
            java_args: defaults.java_args,
            jar: jar.into(),
        }
    }

    /// Build from configuration; the jar location is mandatory here
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        let jar = config.jar.clone().ok_or_else(|| {
            ConfigError::Validation(
                "Location of vnu.jar is not set (use --vnu-jar or VNU_JAR)".to_string(),
            )
        })?;

        Ok(Self {
            java: config.java.clone(),
            java_args: config.java_args.clone(),
            jar,
        })
    }

    /// `<java-args...> -jar <jar>`
    fn prefix_args(&self) -> Vec<String> {
        let mut args = self.java_args.clone();
        args.push("-jar".to_string());
        args.push(path_arg(&self.jar));
        args
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Runs the validator against one target per call
pub struct Validator<R = TokioProcessRunner> {
    command: ValidatorCommand,
    runner: R,
    discovery: FileDiscovery,
}

impl Validator<TokioProcessRunner> {
    pub fn new(command: ValidatorCommand) -> Self {
        Self::with_runner(command, TokioProcessRunner)
    }
}

impl<R: ProcessRunner> Validator<R> {
    pub fn with_runner(command: ValidatorCommand, runner: R) -> Self {
        Self {
            command,
            runner,
            discovery: FileDiscovery::new(),
        }
    }

    /// Build the command line: prefix, serialized options, then the target(s).
    ///
    /// Globs are expanded; a glob matching nothing is passed through as-is.
    pub async fn invocation(
        &self,
        target: &Target,
        options: &NormalizedOptions,
    ) -> Result<Invocation, ValidatorError> {
        let mut args = self.command.prefix_args();
        args.extend(options.to_args());

        match target {
            Target::Glob(pattern) => {
                let matches = self.discovery.expand(pattern).await?;
                if matches.is_empty() {
                    log::warn!("Pattern {} matched no files", pattern);
                    args.push(pattern.clone());
                } else {
                    log::debug!("Pattern {} matched {} entries", pattern, matches.len());
                    args.extend(matches.iter().map(|p| path_arg(p)));
                }
            }
            Target::Url(s) | Target::Path(s) => args.push(s.clone()),
        }

        Ok(Invocation {
            program: self.command.java.clone(),
            args,
        })
    }

    /// Validate `target`.
    ///
    /// `Ok` carries the validator's stdout. `Err` carries the error and the
    /// validator's stderr, rendered as HTML if the `html` format was asked for.
    pub async fn run(
        &self,
        target: &Target,
        options: &ValidationOptions,
    ) -> Result<String, ValidationFailure> {
        let options = options.normalize();
        let invocation = self
            .invocation(target, &options)
            .await
            .map_err(|e| ValidationFailure::new(e, String::new()))?;

        log::debug!("Running {}", invocation.command_line());

        // No validator output exists to render, so html runs get an empty report too
        let output = self.runner.run(&invocation).await.map_err(|source| {
            ValidationFailure::new(
                ValidatorError::Spawn {
                    program: invocation.program.clone(),
                    source,
                },
                String::new(),
            )
        })?;

        if output.success() {
            return Ok(output.stdout);
        }

        let report = if options.output_as_html() {
            render_html(&output.stderr)
        } else {
            output.stderr
        };

        Err(ValidationFailure::new(
            ValidatorError::ProcessFailed { code: output.code },
            report,
        ))
    }
}
