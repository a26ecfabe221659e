//! # Parse Subcommand
//!
//! Reads an event, applies schema defaults, validates it, and prints the
//! normalized result.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cce_parser::{serialize, ConsoleCloudEventParser, ConverterConfig};

use crate::validate::report;
use crate::{display_name, read_input, EXIT_OK};

/// Arguments for the `cce parse` subcommand.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Event file to parse, or `-` for stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the parse subcommand.
///
/// Returns exit code: 0 with the normalized event on `out`, 1 when the
/// event is rejected.
pub fn run_parse(
    args: &ParseArgs,
    parser: &ConsoleCloudEventParser,
    out: &mut impl Write,
) -> Result<u8> {
    let text = read_input(&args.input)?;
    let converter = ConverterConfig {
        pretty: args.pretty,
        ..*parser.converter()
    };

    let rendered = parser
        .parse(&text)
        .and_then(|event| serialize(parser.schema(), &event, &converter));

    match rendered {
        Ok(json) => {
            writeln!(out, "{json}")?;
            Ok(EXIT_OK)
        }
        Err(e) => report(&display_name(&args.input), Err(e), out),
    }
}
