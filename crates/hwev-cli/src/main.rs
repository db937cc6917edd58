/// hwev command-line tool: decode and validate hardware-event envelopes
/// from files or stdin.
///
/// # Command overview
///
/// ```text
/// hwev <COMMAND> [OPTIONS]
///
/// Commands:
///   decode     Decode one envelope and print it as JSON
///   payload    Decode a standalone payload, keeping `data` raw
///   validate   Decode each file and report pass/fail
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder activity to stderr (debug level)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// `RUST_LOG` overrides the log filter when set.
///
/// # Exit codes
///
/// | Code | Meaning                                      |
/// |------|----------------------------------------------|
/// | 0    | Success                                      |
/// | 1    | Error (I/O failure, undecodable input, etc.) |
///
/// All diagnostics go to stderr so stdout can be piped cleanly.
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hwev_decoder::{DecoderConfig, EventDecoder};
use tracing_subscriber::EnvFilter;

mod cmd_decode;
mod cmd_payload;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Hardware-event envelope decoder.
#[derive(Parser)]
#[command(name = "hwev", version, about = "Hardware event envelope CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder activity (pool growth, dropped payloads) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode one envelope and print it as JSON.
    Decode(DecodeArgs),
    /// Decode a standalone `{version, data}` payload.
    Payload(PayloadArgs),
    /// Decode each file as an envelope and report pass/fail.
    Validate(ValidateArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `hwev decode`.
///
/// ```text
/// ┌───────────┬──────────────────────────────────────────────────────────┐
/// │ Flag      │ Effect                                                   │
/// ├───────────┼──────────────────────────────────────────────────────────┤
/// │ --strict  │ Fail on a bad payload instead of dropping it, and stop   │
/// │           │ at a bad timestamp without reading further               │
/// │ --compact │ Print single-line JSON instead of pretty-printed         │
/// └───────────┴──────────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Envelope file to decode, or `-` for stdin.
    pub file: PathBuf,

    /// Use the strict fault policy.
    #[arg(long)]
    pub strict: bool,

    /// Print compact single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for `hwev payload`.
#[derive(clap::Args)]
pub struct PayloadArgs {
    /// Payload file to decode, or `-` for stdin.
    pub file: PathBuf,
}

/// Arguments for `hwev validate`.
///
/// Every file is decoded even after a failure, so one run reports on
/// the whole batch.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Envelope files to check.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Use the strict fault policy.
    #[arg(long)]
    pub strict: bool,
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Open `path` for reading; `-` means stdin.
pub(crate) fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        tracing::debug!("reading stdin");
        return Ok(Box::new(io::stdin().lock()));
    }
    tracing::debug!(path = %path.display(), "opening input");
    let file = File::open(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(Box::new(file))
}

/// Build a decoder for the `--strict` flag.
pub(crate) fn decoder_for(strict: bool) -> EventDecoder {
    if strict {
        EventDecoder::strict()
    } else {
        EventDecoder::new(DecoderConfig::default())
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Payload(args) => cmd_payload::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
