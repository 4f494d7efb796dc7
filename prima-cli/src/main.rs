//! CLI entry point for the `prima` binary.
//!
//! Parses command-line arguments with clap, executes the selected command,
//! renders its outcome to stdout and maps errors to exit codes. Logging is
//! initialised first so every later step can emit structured diagnostics via
//! `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use prima_cli::{
    cli::{Cli, CliError, render_outcome, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments, execute the command, render the outcome and flush the
/// output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let outcome = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_outcome(&outcome, &mut writer).context("failed to render outcome")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let cli_error = err.downcast_ref::<CliError>();
        let code = cli_error.and_then(CliError::code).map(field::display);
        let detail_code = cli_error
            .and_then(CliError::detail_code)
            .map(field::display);

        error!(
            error = %format!("{err:#}"),
            code,
            detail_code,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[allow(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
