//! Command-line interface definitions for treedupe.
//!
//! All arguments use the clap derive API. Resolver flags are repeatable and
//! order-significant: the chain runs in the order the `--resolve` flags were
//! given. Exactly one sink is selected per run.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates across two archives without touching anything
//! treedupe --resolve source-order --resolve arbitrary --sink output-only ~/photos ~/backup
//!
//! # Prefer the newest copy, move the rest aside
//! treedupe --resolve mod-date:desc --resolve arbitrary \
//!     --sink sequester --sequester-root ~/dupes ~/photos ~/backup
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::resolve::{Direction, Resolver};

/// Deterministic duplicate file resolver for merging directory trees.
///
/// treedupe scans one or more source trees, groups byte-identical files by
/// size and SHA-512 digest, reduces each group to a single original via an
/// ordered resolver chain, and applies one sink action to the rest.
#[derive(Debug, Parser)]
#[command(name = "treedupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Ignore configuration file (JSON), if not ~/.deduperc
    ///
    /// Supplying a file, even one with empty lists, replaces the built-in
    /// ignore set entirely.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Resolver to apply, in order (repeatable)
    ///
    /// KIND is one of: path-depth, source-order, mod-date, copy-pattern,
    /// interactive, arbitrary. Sort-based kinds take an optional direction
    /// suffix, e.g. mod-date:desc (default asc).
    #[arg(
        long = "resolve",
        value_name = "KIND[:asc|desc]",
        value_parser = parse_resolver,
        required = true
    )]
    pub resolvers: Vec<Resolver>,

    /// Action applied to every non-original file
    #[arg(long, value_enum)]
    pub sink: SinkArg,

    /// Destination root for the sequester sink
    #[arg(long, value_name = "DIR", required_if_eq("sink", "sequester"))]
    pub sequester_root: Option<PathBuf>,

    /// Output file for the output-only sink (default: standard output)
    #[arg(long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Directory trees to scan, in preference order
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,
}

/// Sink kinds selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkArg {
    /// Delete non-original files immediately
    Delete,
    /// Move non-original files beneath --sequester-root
    Sequester,
    /// Only record non-original paths, one per line
    OutputOnly,
}

/// Parse a `--resolve` value of the form `KIND` or `KIND:asc|desc`.
///
/// # Errors
///
/// Returns a message for unknown kinds, unknown directions, or a direction
/// supplied to a resolver that does not sort.
pub fn parse_resolver(s: &str) -> Result<Resolver, String> {
    let (kind, direction) = match s.split_once(':') {
        Some((kind, direction)) => (kind, Some(direction)),
        None => (s, None),
    };

    let direction = match direction {
        None => None,
        Some("asc") => Some(Direction::Ascending),
        Some("desc") => Some(Direction::Descending),
        Some(other) => {
            return Err(format!(
                "unknown direction '{other}' (expected 'asc' or 'desc')"
            ))
        }
    };

    let resolver = match kind {
        "path-depth" => Resolver::PathDepth(direction.unwrap_or_default()),
        "source-order" => Resolver::SourceOrder(direction.unwrap_or_default()),
        "mod-date" => Resolver::ModDate(direction.unwrap_or_default()),
        "copy-pattern" => Resolver::CopyPattern,
        "interactive" => Resolver::Interactive,
        "arbitrary" => Resolver::Arbitrary,
        other => {
            return Err(format!(
                "unknown resolver '{other}' (expected path-depth, source-order, \
                 mod-date, copy-pattern, interactive, or arbitrary)"
            ))
        }
    };

    if direction.is_some() && !resolver.is_sort_based() {
        return Err(format!(
            "resolver '{kind}' does not take a sort direction"
        ));
    }

    Ok(resolver)
}
