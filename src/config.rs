//! Run configuration: CLI assembly and ignore-file loading.
//!
//! The ignore configuration is a JSON document:
//!
//! ```json
//! { "ignore_names": [".git"], "ignore_patterns": ["^~.*"] }
//! ```
//!
//! loaded from `--config` or, by default, `~/.deduperc`. An absent file
//! means the built-in ignore set applies; a present file replaces it
//! entirely, so empty lists disable ignoring altogether. A file that cannot
//! be parsed is a fatal configuration error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use regex::Regex;
use serde::Deserialize;

use crate::cli::{Cli, SinkArg};
use crate::resolve::Resolver;
use crate::scanner::IgnoreRules;
use crate::sink::SinkSpec;

/// Name of the default ignore configuration file in the home directory.
pub const DEFAULT_CONFIG_NAME: &str = ".deduperc";

/// Process-wide configuration, read once at startup and immutable after.
#[derive(Debug)]
pub struct Config {
    /// Source tree roots, in preference order.
    pub sources: Vec<PathBuf>,
    /// Resolver chain, in application order.
    pub resolvers: Vec<Resolver>,
    /// The single sink for this run.
    pub sink: SinkSpec,
    /// Ignore rules applied during scanning.
    pub ignore: IgnoreRules,
}

impl Config {
    /// Assemble the run configuration from parsed CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for invalid flag combinations or an unusable
    /// ignore file. All of these abort the run before scanning.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.resolvers.is_empty() {
            return Err(ConfigError::NoResolvers);
        }

        let sink = match cli.sink {
            SinkArg::Delete => SinkSpec::Delete,
            SinkArg::Sequester => SinkSpec::Sequester {
                root: cli
                    .sequester_root
                    .clone()
                    .ok_or(ConfigError::MissingSequesterRoot)?,
            },
            SinkArg::OutputOnly => SinkSpec::OutputOnly {
                path: cli.output_path.clone(),
            },
        };

        let ignore = load_ignore_rules(cli.config.as_deref())?;

        Ok(Self {
            sources: cli.sources.clone(),
            resolvers: cli.resolvers.clone(),
            sink,
            ignore,
        })
    }
}

/// On-disk shape of the ignore configuration file.
#[derive(Debug, Default, Deserialize)]
struct IgnoreFileFormat {
    #[serde(default)]
    ignore_names: Vec<String>,
    #[serde(default)]
    ignore_patterns: Vec<String>,
}

/// Default location of the ignore configuration file.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(DEFAULT_CONFIG_NAME))
}

/// Load ignore rules from the given path, or the default location.
///
/// An absent file yields the built-in default set; a present file replaces
/// the defaults wholesale, with no merging.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read, parsed,
/// or its patterns compiled.
pub fn load_ignore_rules(path: Option<&Path>) -> Result<IgnoreRules, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => {
                log::debug!("No home directory found; using built-in ignore defaults");
                return Ok(IgnoreRules::default());
            }
        },
    };

    if !path.exists() {
        log::debug!(
            "No ignore configuration at {}; using built-in defaults",
            path.display()
        );
        return Ok(IgnoreRules::default());
    }

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let parsed: IgnoreFileFormat =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

    let mut patterns = Vec::with_capacity(parsed.ignore_patterns.len());
    for pattern in parsed.ignore_patterns {
        let compiled = Regex::new(&pattern).map_err(|source| ConfigError::Pattern {
            pattern: pattern.clone(),
            path: path.clone(),
            source,
        })?;
        patterns.push(compiled);
    }

    let rules = IgnoreRules::new(parsed.ignore_names, patterns);
    log::info!(
        "Loaded ignore configuration from {} ({} names, {} patterns)",
        path.display(),
        rules.name_count(),
        rules.pattern_count()
    );
    Ok(rules)
}

/// Configuration errors; all are fatal and abort the run before scanning.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// No resolver was configured.
    #[error("no resolvers configured; supply at least one --resolve flag")]
    NoResolvers,

    /// The sequester sink was selected without a destination root.
    #[error("the sequester sink requires --sequester-root")]
    MissingSequesterRoot,

    /// The ignore configuration file exists but could not be read.
    #[error("unable to read configuration file {path}: {source}")]
    Read {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The ignore configuration file is not valid JSON of the expected shape.
    #[error("malformed configuration file {path}: {source}")]
    Parse {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An ignore pattern in the configuration file is not a valid regex.
    #[error("invalid ignore pattern '{pattern}' in {path}: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// The configuration file path.
        path: PathBuf,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}
