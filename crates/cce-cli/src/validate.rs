//! # Validate Subcommand
//!
//! Checks one event against the bundled schema and reports every violation.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cce_parser::{CloudEventError, ConsoleCloudEventParser};

use crate::{display_name, read_input, EXIT_OK, EXIT_REJECTED};

/// Arguments for the `cce validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Event file to validate, or `-` for stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the event is valid, 1 when it is rejected.
pub fn run_validate(
    args: &ValidateArgs,
    parser: &ConsoleCloudEventParser,
    out: &mut impl Write,
) -> Result<u8> {
    let text = read_input(&args.input)?;
    report(&display_name(&args.input), parser.validate(&text), out)
}

/// Print the outcome of a validation and map it to an exit code.
pub fn report(
    name: &str,
    outcome: Result<(), CloudEventError>,
    out: &mut impl Write,
) -> Result<u8> {
    match outcome {
        Ok(()) => {
            writeln!(out, "OK: {name}")?;
            Ok(EXIT_OK)
        }
        Err(CloudEventError::Validation { violations, .. }) => {
            tracing::debug!(count = violations.len(), "event failed validation");
            writeln!(out, "FAIL: {name} — {} violation(s)", violations.len())?;
            writeln!(out, "{violations}")?;
            Ok(EXIT_REJECTED)
        }
        Err(CloudEventError::Parsing { source, .. }) => {
            writeln!(out, "FAIL: {name} — malformed event")?;
            writeln!(out, "  {source}")?;
            Ok(EXIT_REJECTED)
        }
    }
}
