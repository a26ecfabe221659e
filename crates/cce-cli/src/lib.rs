//! # cce-cli — Console Cloud Events CLI
//!
//! Provides the `cce` command-line interface over the parser facade.
//!
//! ## Subcommands
//!
//! - `cce validate` — Check an event against the bundled schema.
//! - `cce parse` — Print the defaulted, validated, re-serialized event.
//! - `cce rewrite` — Show where a public schema URI resolves offline.
//!
//! ```bash
//! cce validate event.json
//! cat event.json | cce parse - --pretty
//! cce --schema-dir ./bundle rewrite https://console.redhat.com/api/schemas/core/v1/tag.json
//! ```
//!
//! Exit codes: 0 on success, 1 when the event is rejected, 2 on an
//! operational error (unreadable input, unloadable schema).

pub mod parse;
pub mod rewrite;
pub mod validate;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use cce_parser::{ConsoleCloudEventParser, ConverterConfig};
use cce_schema::SchemaBundle;

/// Exit code for an accepted event.
pub const EXIT_OK: u8 = 0;
/// Exit code for an event rejected by parsing or validation.
pub const EXIT_REJECTED: u8 = 1;
/// Exit code for operational failures.
pub const EXIT_ERROR: u8 = 2;

/// The bundle selected by `--schema-dir`, or the embedded one.
pub fn select_bundle(schema_dir: Option<&Path>) -> SchemaBundle {
    match schema_dir {
        Some(dir) => SchemaBundle::directory(dir),
        None => SchemaBundle::Embedded,
    }
}

/// Build a parser over `bundle`.
pub fn load_parser(bundle: SchemaBundle) -> Result<ConsoleCloudEventParser> {
    let parser = ConsoleCloudEventParser::with_bundle(bundle, ConverterConfig::default())
        .context("failed to load the event schema")?;
    tracing::debug!(
        schema_id = parser.schema().schema_id(),
        documents = parser.schema().documents().len(),
        "parser ready"
    );
    Ok(parser)
}

/// Read event text from a file, or from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// How an input is named in output lines.
pub fn display_name(path: &Path) -> String {
    if path.as_os_str() == "-" {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}
