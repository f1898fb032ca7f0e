//! Sink actions applied to files classified as non-original.
//!
//! Exactly one sink is selected for the whole run. Per-file failures are
//! reported and do not abort the run; filesystem mutations are per-file,
//! not transactional.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::scanner::FileRecord;

/// Sink selection plus its parameters, as assembled from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkSpec {
    /// Remove non-originals immediately.
    Delete,
    /// Move non-originals beneath a destination root.
    Sequester {
        /// Destination root directory.
        root: PathBuf,
    },
    /// Only record non-original paths, one per line.
    OutputOnly {
        /// Output file; standard output when absent.
        path: Option<PathBuf>,
    },
}

impl SinkSpec {
    /// Open the sink for this run.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if an output destination cannot be created.
    pub fn open(&self) -> io::Result<Sink> {
        Ok(match self {
            Self::Delete => Sink::Delete,
            Self::Sequester { root } => Sink::Sequester { root: root.clone() },
            Self::OutputOnly { path } => {
                let out: Box<dyn Write> = match path {
                    Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                    None => Box::new(io::stdout()),
                };
                Sink::OutputOnly { out }
            }
        })
    }
}

/// The terminal action applied to every non-original file.
pub enum Sink {
    /// Remove the file immediately.
    Delete,
    /// Move the file beneath `root`, reconstructing its source-relative path.
    Sequester {
        /// Destination root directory.
        root: PathBuf,
    },
    /// Append the absolute path to the output, one per line. Never touches
    /// the filesystem beyond the output destination.
    OutputOnly {
        /// Output destination.
        out: Box<dyn Write>,
    },
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => f.write_str("Sink::Delete"),
            Self::Sequester { root } => f.debug_struct("Sink::Sequester").field("root", root).finish(),
            Self::OutputOnly { .. } => f.write_str("Sink::OutputOnly"),
        }
    }
}

impl Sink {
    /// Apply the sink action to one non-original file.
    ///
    /// # Errors
    ///
    /// Per-file failures are returned as [`SinkError`]; callers report them
    /// and continue with subsequent files.
    pub fn consume(&mut self, record: &FileRecord) -> Result<(), SinkError> {
        match self {
            Self::Delete => {
                log::debug!("Deleting duplicate file {}", record.path.display());
                fs::remove_file(&record.path).map_err(|source| SinkError::Delete {
                    path: record.path.clone(),
                    source,
                })
            }
            Self::Sequester { root } => {
                let destination = root.join(&record.relative);
                log::debug!(
                    "Sequestering {} -> {}",
                    record.path.display(),
                    destination.display()
                );

                if destination.exists() {
                    return Err(SinkError::Conflict {
                        path: record.path.clone(),
                        destination,
                    });
                }
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent).map_err(|source| SinkError::Sequester {
                        path: record.path.clone(),
                        source,
                    })?;
                }
                fs::rename(&record.path, &destination).map_err(|source| SinkError::Sequester {
                    path: record.path.clone(),
                    source,
                })
            }
            Self::OutputOnly { out } => writeln!(out, "{}", record.path.display()).map_err(
                |source| SinkError::Write {
                    path: record.path.clone(),
                    source,
                },
            ),
        }
    }

    /// Flush any buffered output at the end of the run.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output destination cannot be flushed.
    pub fn finish(&mut self) -> io::Result<()> {
        if let Self::OutputOnly { out } = self {
            out.flush()?;
        }
        Ok(())
    }
}

/// Per-file sink failures. None of these abort the run.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    /// The file could not be deleted.
    #[error("unable to delete {path}: {source}")]
    Delete {
        /// File that could not be deleted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The sequester destination is already occupied; the file is left in
    /// place.
    #[error("sequester conflict for {path}: destination {destination} already exists")]
    Conflict {
        /// File that was not moved.
        path: PathBuf,
        /// The occupied destination.
        destination: PathBuf,
    },

    /// The file could not be moved into the sequester tree.
    #[error("unable to sequester {path}: {source}")]
    Sequester {
        /// File that could not be moved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The output destination could not be written.
    #[error("unable to record {path}: {source}")]
    Write {
        /// Path that was being recorded.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}
