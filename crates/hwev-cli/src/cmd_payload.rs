/// Implementation of `hwev payload`.
///
/// Decodes a standalone payload record and prints its two fields. The
/// `data` value is shown exactly as it appeared in the input:
///
/// ```text
/// version: v1
/// data:    "AAEC/w=="
/// ```
use std::borrow::Cow;
use std::io::{self, Write as _};

use anyhow::{Context, Result};
use hwev_decoder::decode_payload;

use crate::{PayloadArgs, open_input};

/// Run the `hwev payload` command.
///
/// # Errors
///
/// Returns an error if the input cannot be opened, is not well-formed
/// JSON, or stdout cannot be written.
pub fn run(args: &PayloadArgs) -> Result<()> {
    let source = open_input(&args.file)?;
    let payload = decode_payload(source)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    let data = if payload.data.is_empty() {
        Cow::Borrowed("(absent)")
    } else {
        String::from_utf8_lossy(&payload.data)
    };

    let mut out = io::stdout().lock();
    writeln!(out, "version: {}", payload.version).context("cannot write to stdout")?;
    writeln!(out, "data:    {data}").context("cannot write to stdout")?;
    Ok(())
}
