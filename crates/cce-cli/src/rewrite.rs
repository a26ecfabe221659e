//! # Rewrite Subcommand
//!
//! Prints the offline location a public schema URI resolves to.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use cce_schema::{SchemaBundle, UriRewriter};

use crate::EXIT_OK;

/// Arguments for the `cce rewrite` subcommand.
#[derive(Args, Debug)]
pub struct RewriteArgs {
    /// Schema URI to rewrite. URIs outside the public base are printed unchanged.
    #[arg(value_name = "URI")]
    pub uri: String,
}

/// Execute the rewrite subcommand.
pub fn run_rewrite(args: &RewriteArgs, bundle: &SchemaBundle, out: &mut impl Write) -> Result<u8> {
    let rewriter =
        UriRewriter::for_bundle(bundle).context("failed to locate the schema bundle")?;
    writeln!(out, "{}", rewriter.rewrite(&args.uri))?;
    Ok(EXIT_OK)
}
