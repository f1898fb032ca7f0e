//! Pipeline driver: scan, group, resolve, sink.
//!
//! The pipeline is a single sequential flow. Sources are scanned in order,
//! records are grouped in two phases, each group runs through the resolver
//! chain one at a time (the interactive resolver suspends the whole
//! pipeline while it waits), and finally every file marked non-original is
//! handed to the sink in group-then-candidate order.
//!
//! Warnings accumulate into a [`RunReport`] and are summarized at the end of
//! the run; only configuration errors, user cancellation, and a run where no
//! source at all could be scanned are fatal. Unresolved groups keep all of
//! their remaining candidates, so repeated runs over the same trees may
//! report the same groups again.

use std::io;

use bytesize::ByteSize;

use crate::config::Config;
use crate::duplicates::{confirm_groups, group_by_size};
use crate::resolve::{resolve_group, Outcome, Prompt, ResolveError};
use crate::scanner::{FileRecord, Source, Walker};

/// Counters and accumulated warnings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Sources that were scanned.
    pub sources_scanned: usize,
    /// Sources skipped because their root was unusable.
    pub sources_skipped: usize,
    /// File records produced by scanning.
    pub files_scanned: usize,
    /// Unreadable entries skipped during scanning and digesting.
    pub scan_warnings: usize,
    /// Confirmed duplicate groups.
    pub groups_found: usize,
    /// Groups reduced to a single original.
    pub groups_resolved: usize,
    /// Groups whose chain exhausted with candidates remaining.
    pub groups_unresolved: usize,
    /// Files marked non-original and handed to the sink.
    pub duplicates_found: usize,
    /// Per-file sink failures (including sequester conflicts).
    pub sink_errors: usize,
    /// Bytes held by non-originals the sink processed successfully.
    pub bytes_reclaimable: u64,
}

impl RunReport {
    /// Log the end-of-run summary.
    pub fn log_summary(&self) {
        log::info!(
            "Run complete: {} files scanned across {} sources, {} duplicate groups \
             ({} resolved, {} unresolved)",
            self.files_scanned,
            self.sources_scanned,
            self.groups_found,
            self.groups_resolved,
            self.groups_unresolved
        );
        log::info!(
            "{} non-original files processed, {} reclaimable",
            self.duplicates_found,
            ByteSize::b(self.bytes_reclaimable)
        );
        if self.scan_warnings > 0 {
            log::warn!("{} entries were skipped as unreadable", self.scan_warnings);
        }
        if self.sink_errors > 0 {
            log::warn!("{} sink actions failed", self.sink_errors);
        }
        if self.sources_skipped > 0 {
            log::warn!("{} sources could not be scanned", self.sources_skipped);
        }
    }
}

/// Fatal pipeline failures. Everything else is reported and survived.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Every configured source was unusable.
    #[error("none of the configured sources could be scanned")]
    NoUsableSources,

    /// The user aborted the run from an interactive prompt.
    #[error("resolution canceled by user")]
    Canceled,

    /// The interactive prompt channel failed.
    #[error("interactive prompt failed: {source}")]
    Prompt {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The sink destination could not be opened.
    #[error("unable to open sink destination: {source}")]
    SinkOpen {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// The duplicate-resolution pipeline for one configured run.
#[derive(Debug)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a pipeline over the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Execute the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] for the fatal conditions only; per-file
    /// problems are counted in the returned [`RunReport`].
    pub fn run(&self, prompt: &mut dyn Prompt) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::default();

        let sources = self.usable_sources(&mut report)?;
        let records = self.scan(&sources, &mut report);

        let (buckets, _grouping) = group_by_size(records);
        let (groups, confirm) = confirm_groups(buckets);
        for error in &confirm.errors {
            log::warn!("Scan warning: {}", error);
        }
        report.scan_warnings += confirm.failed_files;
        report.groups_found = groups.len();

        // Open the sink before any prompting so a bad destination fails fast.
        let mut sink = self
            .config
            .sink
            .open()
            .map_err(|source| PipelineError::SinkOpen { source })?;

        let mut to_sink: Vec<FileRecord> = Vec::new();
        for group in groups {
            let resolution =
                resolve_group(group, &self.config.resolvers, prompt).map_err(|e| match e {
                    ResolveError::Canceled => PipelineError::Canceled,
                    ResolveError::Prompt(source) => PipelineError::Prompt { source },
                })?;

            match resolution.outcome {
                Outcome::Resolved(original) => {
                    report.groups_resolved += 1;
                    log::debug!("Keeping original {}", original.path.display());
                }
                Outcome::Unresolved(remaining) => {
                    report.groups_unresolved += 1;
                    let listing = remaining
                        .iter()
                        .map(|r| r.path.display().to_string())
                        .collect::<Vec<_>>()
                        .join("\n  ");
                    log::warn!(
                        "Unable to resolve duplicate group; retaining all {} candidates:\n  {}",
                        remaining.len(),
                        listing
                    );
                }
            }
            to_sink.extend(resolution.non_originals);
        }

        report.duplicates_found = to_sink.len();
        log::info!("{} duplicate files located", to_sink.len());

        for record in &to_sink {
            match sink.consume(record) {
                Ok(()) => report.bytes_reclaimable += record.size,
                Err(e) => {
                    log::error!("{}", e);
                    report.sink_errors += 1;
                }
            }
        }
        if let Err(e) = sink.finish() {
            log::error!("Failed to flush sink output: {}", e);
            report.sink_errors += 1;
        }

        Ok(report)
    }

    /// Validate configured source roots, in order. Unusable roots are
    /// warnings unless none survive.
    fn usable_sources(&self, report: &mut RunReport) -> Result<Vec<Source>, PipelineError> {
        let mut sources = Vec::with_capacity(self.config.sources.len());
        for (ordinal, path) in self.config.sources.iter().enumerate() {
            match Source::new(path, ordinal) {
                Ok(source) => sources.push(source),
                Err(e) => {
                    log::warn!("Skipping source {}: {}", path.display(), e);
                    report.sources_skipped += 1;
                }
            }
        }
        if sources.is_empty() {
            return Err(PipelineError::NoUsableSources);
        }
        report.sources_scanned = sources.len();
        Ok(sources)
    }

    /// Scan every source in order into a flat record list.
    fn scan(&self, sources: &[Source], report: &mut RunReport) -> Vec<FileRecord> {
        let mut records = Vec::new();
        for source in sources {
            log::info!(
                "Scanning source {} at {}",
                source.ordinal,
                source.root.display()
            );
            for item in Walker::new(source, &self.config.ignore).walk() {
                match item {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        log::warn!("Scan warning: {}", e);
                        report.scan_warnings += 1;
                    }
                }
            }
        }
        report.files_scanned = records.len();
        records
    }
}
