//! adsweep - filename-based adware scanner.
//!
//! Usage:
//!   adsweep                      Scan the default roots (hidden files only)
//!   adsweep scan [ROOTS...]      Scan the given roots
//!   adsweep threats              Print the configured threat list
//!   adsweep whitelist            Print the configured whitelist
//!   adsweep --help               Show help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use adsweep_core::{PrefixMode, ScanRequest, ThreatList, Whitelist};
use adsweep_scan::Scanner;

#[derive(Parser)]
#[command(
    name = "adsweep",
    version,
    about = "Filename-based adware scanner",
    long_about = "adsweep walks directory trees and reports files whose names \
                  appear on a known adware list, skipping whitelisted paths and \
                  optionally restricting findings to hidden files.\n\n\
                  Run `adsweep` with no arguments for a hidden-only scan of the \
                  default roots, or use subcommands for explicit control."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan directories for known adware filenames
    Scan {
        /// Root directories to scan (defaults to the built-in root set)
        roots: Vec<PathBuf>,

        /// Report only files hidden per OS convention
        #[arg(long)]
        hidden_only: bool,

        /// Threads for within-root traversal (0 = serial)
        #[arg(long, default_value = "0")]
        threads: usize,

        /// Walk roots in parallel
        #[arg(long)]
        parallel_roots: bool,

        /// Byte-wise whitelist prefix matching (reference-compatible)
        #[arg(long)]
        literal_prefix: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// File with threat basenames, one per line
        #[arg(long, value_name = "FILE")]
        threats: Option<PathBuf>,

        /// File with whitelist path prefixes, one per line
        #[arg(long, value_name = "FILE")]
        whitelist: Option<PathBuf>,
    },

    /// Print the configured threat list
    Threats {
        /// File with threat basenames, one per line
        #[arg(long, value_name = "FILE")]
        threats: Option<PathBuf>,
    },

    /// Print the configured whitelist
    Whitelist {
        /// File with whitelist path prefixes, one per line
        #[arg(long, value_name = "FILE")]
        whitelist: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Scan {
            roots,
            hidden_only,
            threads,
            parallel_roots,
            literal_prefix,
            format,
            threats,
            whitelist,
        }) => {
            let threat_list = load_threats(threats.as_deref())?;
            let mode = if literal_prefix {
                PrefixMode::Literal
            } else {
                PrefixMode::Segment
            };
            let whitelist = load_whitelist(whitelist.as_deref(), mode)?;

            let mut request = if roots.is_empty() {
                ScanRequest::default()
            } else {
                ScanRequest::new(roots)
            };
            request.only_hidden = hidden_only;
            request.threads = threads;
            request.parallel_roots = parallel_roots;

            run_scan(threat_list, whitelist, request, format).await?;
        }
        Some(Command::Threats { threats }) => {
            for entry in load_threats(threats.as_deref())?.entries() {
                println!("{entry}");
            }
        }
        Some(Command::Whitelist { whitelist }) => {
            for entry in load_whitelist(whitelist.as_deref(), PrefixMode::Segment)?.entries() {
                println!("{entry}");
            }
        }
        None => {
            // The reference behavior: default roots, hidden files only.
            run_scan(
                ThreatList::default(),
                Whitelist::default(),
                ScanRequest::default(),
                OutputFormat::Text,
            )
            .await?;
        }
    }

    Ok(())
}

/// Run a scan on a blocking task, streaming progress to stderr and
/// cancelling cooperatively on Ctrl-C.
async fn run_scan(
    threats: ThreatList,
    whitelist: Whitelist,
    request: ScanRequest,
    format: OutputFormat,
) -> Result<()> {
    eprintln!("Scanning {} root(s)...", request.roots.len());

    let scanner = Scanner::new(threats, whitelist);

    let cancel = scanner.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling scan...");
            cancel.cancel();
        }
    });

    let mut progress_rx = scanner.subscribe();
    tokio::spawn(async move {
        while let Ok(progress) = progress_rx.recv().await {
            eprintln!(
                "  {} entries visited, {} finding(s)",
                progress.total_items(),
                progress.findings
            );
        }
    });

    let report = scanner
        .spawn(request)
        .await
        .context("Scan task panicked")??;

    if !report.is_complete() {
        eprintln!("Scan cancelled; partial report follows.");
    }

    match format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Load a threat list from a file, or the built-in default.
fn load_threats(path: Option<&Path>) -> Result<ThreatList> {
    match path {
        Some(path) => {
            let entries = read_list(path)?;
            ThreatList::new(entries)
                .with_context(|| format!("Invalid threat list in {}", path.display()))
        }
        None => Ok(ThreatList::default()),
    }
}

/// Load a whitelist from a file, or the built-in default.
fn load_whitelist(path: Option<&Path>, mode: PrefixMode) -> Result<Whitelist> {
    match path {
        Some(path) => {
            let entries = read_list(path)?;
            Whitelist::new(entries, mode)
                .with_context(|| format!("Invalid whitelist in {}", path.display()))
        }
        None => Ok(Whitelist::default().with_mode(mode)),
    }
}

/// Read one entry per line, skipping blanks and `#` comments.
fn read_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}
