mod commands;
mod helpers;

use clap::Parser;
use specline_core::SpeclineError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let domain_error = error.as_specline_error();
            eprintln!("{}", domain_error.diagnostic_line());
            domain_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("specline-rs".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(name = "specline-rs", about = "Sparse spectral-line emulator")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Detect lines in a native spectrum and write the fitted state record
    Detect(commands::DetectArgs),
    /// Reconstruct a spectrum from a state record
    Reconstruct(commands::ReconstructArgs),
    /// Detect lines in every spectrum matching a glob pattern
    BatchDetect(commands::BatchDetectArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Detect(args) => commands::run_detect_command(args),
        CliCommand::Reconstruct(args) => commands::run_reconstruct_command(args),
        CliCommand::BatchDetect(args) => commands::run_batch_detect_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(SpeclineError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<SpeclineError> for CliError {
    fn from(error: SpeclineError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_specline_error(&self) -> SpeclineError {
        match self {
            Self::Usage(message) => {
                SpeclineError::input_validation("INPUT.CLI_USAGE", message.clone())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => SpeclineError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
