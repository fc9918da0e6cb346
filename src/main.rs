use std::process::ExitCode;

use anyhow::Context;
use env_logger::Env;

use w3c_validator::{
    Cli, ConfigManager, Output, Target, Validator, ValidatorCommand, write_file_async,
};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse_args();
    let console = Output::new();

    match run(&cli, &console).await {
        Ok(code) => code,
        Err(e) => {
            console.print_error(&e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: &Cli, console: &Output) -> anyhow::Result<ExitCode> {
    let config = ConfigManager::load_config(cli)
        .await
        .context("Failed to load configuration")?;
    let command = ValidatorCommand::from_config(&config.validator)?;

    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    let target = Target::detect(cli.input.as_deref(), &cwd);
    let options = &config.options;

    let validator = Validator::new(command);

    match validator.run(&target, options).await {
        Ok(stdout) => {
            if options.verbose == Some(true) || options.version == Some(true) {
                print!("{}", stdout);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) if failure.error.is_process_failure() => {
            match &options.output {
                Some(path) => {
                    console.print_destination(path);
                    write_file_async(path, &failure.output).await?;
                }
                None => console.print_report(&failure.output),
            }
            Ok(ExitCode::FAILURE)
        }
        Err(failure) => Err(failure.into()),
    }
}
